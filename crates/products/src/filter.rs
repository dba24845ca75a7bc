//! Search predicate over an in-memory product list.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use stocktake_core::DomainError;

use crate::coerce::number_text;
use crate::product::Product;

/// Which field a search term is tested against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchField {
    #[default]
    All,
    Name,
    Quantity,
    Price,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::All => "All",
            SearchField::Name => "Name",
            SearchField::Quantity => "Quantity",
            SearchField::Price => "Price",
        }
    }
}

impl FromStr for SearchField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(SearchField::All),
            "name" => Ok(SearchField::Name),
            "quantity" => Ok(SearchField::Quantity),
            "price" => Ok(SearchField::Price),
            other => Err(DomainError::validation(format!(
                "unknown search field '{other}' (expected All, Name, Quantity or Price)"
            ))),
        }
    }
}

/// Whether `product` matches `term` on `field`.
///
/// Case-insensitive substring match on each field's display text. A term that
/// is empty after trimming matches every product.
pub fn matches(product: &Product, term: &str, field: SearchField) -> bool {
    if term.trim().is_empty() {
        return true;
    }
    let needle = term.to_lowercase();

    let name = || product.product_name.to_lowercase().contains(&needle);
    let quantity = || product.quantity.to_string().contains(&needle);
    let price = || number_text(product.price).contains(&needle);

    match field {
        SearchField::All => name() || quantity() || price(),
        SearchField::Name => name(),
        SearchField::Quantity => quantity(),
        SearchField::Price => price(),
    }
}

/// Products matching `term` on `field`, in input order.
pub fn filter_products<'a>(products: &'a [Product], term: &str, field: SearchField) -> Vec<&'a Product> {
    products.iter().filter(|p| matches(p, term, field)).collect()
}
