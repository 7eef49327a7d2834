//! Stateless filter panel: surfaces the current search text and option lists
//! and forwards every user edit to the owner through [`FilterPanelCallbacks`].

use std::fmt;

use shared::options::{CategoryOption, RatingOption, CATEGORY_OPTIONS, RATING_OPTIONS};

/// Child-to-parent contract for filter edits. Implementations must accept any
/// number of calls in any order.
pub trait FilterPanelCallbacks {
    fn on_search_change(&self, text: &str);
    fn on_category_change(&self, category_id: &str);
    fn on_rating_change(&self, rating_id: &str);
    fn on_clear_filters(&self);
}

pub struct FilterPanel<'a> {
    categories: &'a [CategoryOption],
    ratings: &'a [RatingOption],
    search_text: &'a str,
    callbacks: &'a dyn FilterPanelCallbacks,
}

impl<'a> FilterPanel<'a> {
    pub fn new(
        categories: &'a [CategoryOption],
        ratings: &'a [RatingOption],
        search_text: &'a str,
        callbacks: &'a dyn FilterPanelCallbacks,
    ) -> Self {
        Self {
            categories,
            ratings,
            search_text,
            callbacks,
        }
    }

    pub fn with_default_options(
        search_text: &'a str,
        callbacks: &'a dyn FilterPanelCallbacks,
    ) -> Self {
        Self::new(CATEGORY_OPTIONS, RATING_OPTIONS, search_text, callbacks)
    }

    pub fn edit_search(&self, text: &str) {
        self.callbacks.on_search_change(text);
    }

    pub fn activate_category(&self, category_id: &str) {
        self.callbacks.on_category_change(category_id);
    }

    pub fn activate_rating(&self, rating_id: &str) {
        self.callbacks.on_rating_change(rating_id);
    }

    pub fn clear(&self) {
        self.callbacks.on_clear_filters();
    }

    pub fn render(&self) -> FilterPanelView {
        FilterPanelView {
            search_text: self.search_text.to_string(),
            categories: self
                .categories
                .iter()
                .map(|option| CategoryEntry {
                    category_id: option.category_id.to_string(),
                    label: option.name.to_string(),
                })
                .collect(),
            ratings: self
                .ratings
                .iter()
                .map(|option| RatingEntry {
                    rating_id: option.rating_id.to_string(),
                    image_url: option.image_url.to_string(),
                    label: rating_label(option.rating_id),
                })
                .collect(),
        }
    }
}

fn rating_label(rating_id: &str) -> String {
    match rating_id.parse::<usize>() {
        Ok(stars) if (1..=5).contains(&stars) => format!("{} & up", "★".repeat(stars)),
        _ => format!("{rating_id} & up"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPanelView {
    pub search_text: String,
    pub categories: Vec<CategoryEntry>,
    pub ratings: Vec<RatingEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub category_id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingEntry {
    pub rating_id: String,
    pub image_url: String,
    pub label: String,
}

impl fmt::Display for FilterPanelView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Search: [{}]", self.search_text)?;
        writeln!(f, "Category")?;
        for entry in &self.categories {
            writeln!(f, "  {:>2}  {}", entry.category_id, entry.label)?;
        }
        writeln!(f, "Rating")?;
        for entry in &self.ratings {
            writeln!(f, "  {:>2}  {}", entry.rating_id, entry.label)?;
        }
        write!(f, "[Clear Filters]")
    }
}
