use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

/// Product identifier as issued by the catalog API.
///
/// The API is not consistent about sending ids as strings or integers, so both
/// are accepted and kept in their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProductId(pub String);

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(value) => Self(value),
            RawId::Signed(value) => Self(value.to_string()),
            RawId::Unsigned(value) => Self(value.to_string()),
        })
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOption {
    #[default]
    PriceHigh,
    PriceLow,
}

impl SortOption {
    pub const ALL: [SortOption; 2] = [SortOption::PriceHigh, SortOption::PriceLow];

    pub fn option_id(self) -> &'static str {
        match self {
            SortOption::PriceHigh => "PRICE_HIGH",
            SortOption::PriceLow => "PRICE_LOW",
        }
    }

    pub fn display_text(self) -> &'static str {
        match self {
            SortOption::PriceHigh => "Price (High-Low)",
            SortOption::PriceLow => "Price (Low-High)",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.option_id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort option '{0}'")]
pub struct UnknownSortOption(pub String);

impl FromStr for SortOption {
    type Err = UnknownSortOption;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        SortOption::ALL
            .into_iter()
            .find(|option| option.option_id() == raw)
            .ok_or_else(|| UnknownSortOption(raw.to_string()))
    }
}

/// User-selected constraints applied to the product query.
///
/// Empty strings mean "unconstrained" for the category, rating and search
/// dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub title_search: String,
    pub category: String,
    pub rating: String,
    pub sort_option: SortOption,
}

impl FilterState {
    pub fn is_unconstrained(&self) -> bool {
        self.title_search.is_empty() && self.category.is_empty() && self.rating.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub title: String,
    pub brand: String,
    pub price: f64,
    pub image_url: String,
    pub rating: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    Pending,
    Empty,
    Ready,
    Failed,
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FetchStatus::Pending => "pending",
            FetchStatus::Empty => "empty",
            FetchStatus::Ready => "ready",
            FetchStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filters_use_first_sort_option() {
        let filters = FilterState::default();
        assert_eq!(filters.sort_option, SortOption::ALL[0]);
        assert!(filters.is_unconstrained());
    }

    #[test]
    fn sort_option_parses_wire_ids_only() {
        assert_eq!("PRICE_LOW".parse::<SortOption>(), Ok(SortOption::PriceLow));
        assert_eq!(
            "price_low".parse::<SortOption>(),
            Err(UnknownSortOption("price_low".into()))
        );
    }

    #[test]
    fn product_id_accepts_numbers_and_strings() {
        let numeric: ProductId = serde_json::from_str("16").expect("numeric id");
        let text: ProductId = serde_json::from_str("\"sku-9\"").expect("text id");
        assert_eq!(numeric, ProductId("16".into()));
        assert_eq!(text.to_string(), "sku-9");
    }
}
