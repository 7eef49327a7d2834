//! Static option tables surfaced by the filter panel and sort control.

use serde::Serialize;

use crate::domain::SortOption;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    pub name: &'static str,
    pub category_id: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingOption {
    pub rating_id: &'static str,
    pub image_url: &'static str,
}

pub const CATEGORY_OPTIONS: &[CategoryOption] = &[
    CategoryOption {
        name: "Clothing",
        category_id: "1",
    },
    CategoryOption {
        name: "Electronics",
        category_id: "2",
    },
    CategoryOption {
        name: "Appliances",
        category_id: "3",
    },
    CategoryOption {
        name: "Grocery",
        category_id: "4",
    },
    CategoryOption {
        name: "Toys",
        category_id: "5",
    },
];

pub const RATING_OPTIONS: &[RatingOption] = &[
    RatingOption {
        rating_id: "4",
        image_url: "https://assets.ccbp.in/frontend/react-js/rating-four-stars-img.png",
    },
    RatingOption {
        rating_id: "3",
        image_url: "https://assets.ccbp.in/frontend/react-js/rating-three-stars-img.png",
    },
    RatingOption {
        rating_id: "2",
        image_url: "https://assets.ccbp.in/frontend/react-js/rating-two-stars-img.png",
    },
    RatingOption {
        rating_id: "1",
        image_url: "https://assets.ccbp.in/frontend/react-js/rating-one-star-img.png",
    },
];

pub const SORT_OPTIONS: &[SortOption] = &SortOption::ALL;

pub fn category_by_id(category_id: &str) -> Option<&'static CategoryOption> {
    CATEGORY_OPTIONS
        .iter()
        .find(|option| option.category_id == category_id)
}

/// Case-insensitive lookup by display name, for text front ends.
pub fn category_by_name(name: &str) -> Option<&'static CategoryOption> {
    CATEGORY_OPTIONS
        .iter()
        .find(|option| option.name.eq_ignore_ascii_case(name.trim()))
}

pub fn rating_by_id(rating_id: &str) -> Option<&'static RatingOption> {
    RATING_OPTIONS
        .iter()
        .find(|option| option.rating_id == rating_id)
}
