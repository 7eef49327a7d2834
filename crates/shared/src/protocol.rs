use serde::{Deserialize, Serialize};

use crate::domain::{FilterState, ProductId, ProductSummary, SortOption};

/// Query string sent to `GET /products`.
///
/// Every key is always sent; empty values mean "no constraint".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductsQuery {
    pub sort_by: SortOption,
    pub category: String,
    pub title_search: String,
    pub rating: String,
}

impl From<&FilterState> for ProductsQuery {
    fn from(filters: &FilterState) -> Self {
        Self {
            sort_by: filters.sort_option,
            category: filters.category.clone(),
            title_search: filters.title_search.clone(),
            rating: filters.rating.clone(),
        }
    }
}

/// Product record as returned by the API. Fields beyond these are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub title: String,
    pub brand: String,
    pub price: f64,
    pub image_url: String,
    pub rating: f64,
}

impl From<ProductRecord> for ProductSummary {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            brand: record.brand,
            price: record.price,
            image_url: record.image_url,
            rating: record.rating,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<ProductRecord>,
}
