//! View selection and plain-text rendering of the catalog states.

use std::fmt;

use shared::{
    domain::{FetchStatus, ProductSummary, SortOption},
    options::SORT_OPTIONS,
};

use crate::CatalogSnapshot;

const NO_PRODUCTS_IMAGE_URL: &str =
    "https://assets.ccbp.in/frontend/react-js/nxt-trendz/nxt-trendz-no-products-view.png";
const FAILURE_IMAGE_URL: &str =
    "https://assets.ccbp.in/frontend/react-js/nxt-trendz/nxt-trendz-products-error-view.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Loading,
    ProductList,
    Empty,
    Failure,
}

/// Status is the only input deciding which view is shown.
pub fn select_view(status: FetchStatus) -> ViewKind {
    match status {
        FetchStatus::Pending => ViewKind::Loading,
        FetchStatus::Ready => ViewKind::ProductList,
        FetchStatus::Empty => ViewKind::Empty,
        FetchStatus::Failed => ViewKind::Failure,
    }
}

pub trait SortControlCallbacks {
    fn on_sort_change(&self, option_id: &str);
}

/// Sort selector shown above the product list.
pub struct SortControl<'a> {
    active: SortOption,
    callbacks: &'a dyn SortControlCallbacks,
}

impl<'a> SortControl<'a> {
    pub fn new(active: SortOption, callbacks: &'a dyn SortControlCallbacks) -> Self {
        Self { active, callbacks }
    }

    pub fn select(&self, option_id: &str) {
        self.callbacks.on_sort_change(option_id);
    }

    pub fn render(&self) -> SortHeaderView {
        SortHeaderView::for_active(self.active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortHeaderView {
    pub options: Vec<SortOptionView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOptionView {
    pub option_id: &'static str,
    pub display_text: &'static str,
    pub active: bool,
}

impl SortHeaderView {
    pub fn for_active(active: SortOption) -> Self {
        Self {
            options: SORT_OPTIONS
                .iter()
                .map(|option| SortOptionView {
                    option_id: option.option_id(),
                    display_text: option.display_text(),
                    active: *option == active,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductCardView {
    pub id: String,
    pub title: String,
    pub brand: String,
    pub price_label: String,
    pub rating_label: String,
    pub image_url: String,
}

impl From<&ProductSummary> for ProductCardView {
    fn from(product: &ProductSummary) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            brand: product.brand.clone(),
            price_label: format!("Rs {}/-", format_amount(product.price)),
            rating_label: format!("{} ★", format_amount(product.rating)),
            image_url: product.image_url.clone(),
        }
    }
}

fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageView {
    pub heading: &'static str,
    pub body: &'static str,
    pub image_url: &'static str,
}

pub const NO_PRODUCTS_MESSAGE: MessageView = MessageView {
    heading: "No Products Found",
    body: "We could not find any products. Try other filters.",
    image_url: NO_PRODUCTS_IMAGE_URL,
};

pub const FAILURE_MESSAGE: MessageView = MessageView {
    heading: "Oops! Something Went Wrong",
    body: "We are having some trouble processing your request. Please try again.",
    image_url: FAILURE_IMAGE_URL,
};

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogView {
    Loading,
    ProductList {
        sort: SortHeaderView,
        products: Vec<ProductCardView>,
    },
    Empty(MessageView),
    Failure(MessageView),
}

impl CatalogView {
    pub fn from_snapshot(snapshot: &CatalogSnapshot) -> Self {
        match select_view(snapshot.status) {
            ViewKind::Loading => CatalogView::Loading,
            ViewKind::ProductList => CatalogView::ProductList {
                sort: SortHeaderView::for_active(snapshot.filters.sort_option),
                products: snapshot.products.iter().map(ProductCardView::from).collect(),
            },
            ViewKind::Empty => CatalogView::Empty(NO_PRODUCTS_MESSAGE),
            ViewKind::Failure => CatalogView::Failure(FAILURE_MESSAGE),
        }
    }

    pub fn kind(&self) -> ViewKind {
        match self {
            CatalogView::Loading => ViewKind::Loading,
            CatalogView::ProductList { .. } => ViewKind::ProductList,
            CatalogView::Empty(_) => ViewKind::Empty,
            CatalogView::Failure(_) => ViewKind::Failure,
        }
    }
}

impl fmt::Display for SortHeaderView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sort by:")?;
        for option in &self.options {
            let marker = if option.active { '*' } else { ' ' };
            write!(f, " [{marker}] {} ({})", option.display_text, option.option_id)?;
        }
        Ok(())
    }
}

impl fmt::Display for ProductCardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | by {} | {} | {}",
            self.title, self.brand, self.price_label, self.rating_label
        )
    }
}

impl fmt::Display for MessageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.heading, self.body)
    }
}

impl fmt::Display for CatalogView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogView::Loading => write!(f, "Loading products..."),
            CatalogView::ProductList { sort, products } => {
                writeln!(f, "All Products")?;
                write!(f, "{sort}")?;
                for product in products {
                    write!(f, "\n  - {product}")?;
                }
                Ok(())
            }
            CatalogView::Empty(message) | CatalogView::Failure(message) => {
                write!(f, "{message}")
            }
        }
    }
}
