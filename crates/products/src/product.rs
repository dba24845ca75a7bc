use serde::{Deserialize, Serialize};
use serde_json::Value;

use stocktake_core::{DocumentId, DomainError, DomainResult};

use crate::coerce::{coerce_float, coerce_int, is_truthy};

/// A stored product document.
///
/// Field names follow the document shape used on the wire
/// (`_id`, `productName`, `quantity`, `price`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(rename = "productName")]
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
}

impl Product {
    /// Attach a store-assigned identifier to a validated candidate.
    pub fn from_new(id: DocumentId, new: NewProduct) -> Self {
        Self {
            id,
            product_name: new.product_name,
            quantity: new.quantity,
            price: new.price,
        }
    }

    /// Overwrite the mutable stock fields in place (name stays as created).
    pub fn apply_stock_update(&mut self, update: &StockUpdate) {
        self.quantity = update.quantity;
        self.price = update.price;
    }
}

/// A validated product that has not been stored yet (no identifier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(rename = "productName")]
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
}

impl NewProduct {
    /// Validate a create request body.
    ///
    /// Presence is a truthiness check: a missing, `null`, empty, `false` or
    /// zero field counts as absent, so a product cannot be created with
    /// `quantity: 0` or `price: 0`. Updates use a null-check instead (see
    /// [`StockUpdate::from_body`]).
    pub fn from_candidate(body: &Value) -> DomainResult<Self> {
        let name = required_truthy(body, "productName")?;
        let quantity = required_truthy(body, "quantity")?;
        let price = required_truthy(body, "price")?;

        let product_name = name
            .as_str()
            .ok_or_else(|| DomainError::validation("productName must be a string"))?
            .to_string();

        let quantity = whole_number(quantity)
            .ok_or_else(|| DomainError::validation("quantity must be an integer"))?;
        if quantity < 0 {
            return Err(DomainError::validation("quantity must not be negative"));
        }

        let price = price
            .as_f64()
            .filter(|p| p.is_finite())
            .ok_or_else(|| DomainError::validation("price must be a number"))?;
        if price < 0.0 {
            return Err(DomainError::validation("price must not be negative"));
        }

        Ok(Self {
            product_name,
            quantity,
            price,
        })
    }
}

/// Validated stock fields for an in-place update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockUpdate {
    pub quantity: i64,
    pub price: f64,
}

impl StockUpdate {
    /// Validate and coerce an update request body.
    ///
    /// Only `null`/missing counts as absent here, so `0` is a legal value.
    /// `quantity` is truncated to an integer and `price` read as a float;
    /// numeric strings are accepted for both. `productName` is ignored.
    pub fn from_body(body: &Value) -> DomainResult<Self> {
        let quantity = required_non_null(body, "quantity")?;
        let price = required_non_null(body, "price")?;

        let quantity = coerce_int(quantity)
            .ok_or_else(|| DomainError::validation("quantity is not a number"))?;
        let price =
            coerce_float(price).ok_or_else(|| DomainError::validation("price is not a number"))?;

        if quantity < 0 {
            return Err(DomainError::validation("quantity must not be negative"));
        }
        if price < 0.0 {
            return Err(DomainError::validation("price must not be negative"));
        }

        Ok(Self { quantity, price })
    }
}

fn required_truthy<'a>(body: &'a Value, field: &'static str) -> DomainResult<&'a Value> {
    body.get(field)
        .filter(|v| is_truthy(v))
        .ok_or(DomainError::MissingField(field))
}

fn required_non_null<'a>(body: &'a Value, field: &'static str) -> DomainResult<&'a Value> {
    body.get(field)
        .filter(|v| !v.is_null())
        .ok_or(DomainError::MissingField(field))
}

fn whole_number(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    let f = value.as_f64()?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id(s: &str) -> DocumentId {
        s.parse().unwrap()
    }

    #[test]
    fn product_serializes_with_document_field_names() {
        let p = Product {
            id: id("abc"),
            product_name: "Bolt".to_string(),
            quantity: 10,
            price: 1.5,
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(
            v,
            json!({"_id": "abc", "productName": "Bolt", "quantity": 10, "price": 1.5})
        );
    }

    #[test]
    fn create_accepts_complete_candidate() {
        let new = NewProduct::from_candidate(&json!({
            "productName": "Bolt",
            "quantity": 10,
            "price": 1.5
        }))
        .unwrap();
        assert_eq!(new.product_name, "Bolt");
        assert_eq!(new.quantity, 10);
        assert_eq!(new.price, 1.5);
    }

    #[test]
    fn create_rejects_missing_and_falsy_fields() {
        let cases = [
            (json!({"quantity": 1, "price": 1.0}), "productName"),
            (json!({"productName": "", "quantity": 1, "price": 1.0}), "productName"),
            (json!({"productName": "Nut", "price": 1.0}), "quantity"),
            (json!({"productName": "Nut", "quantity": 0, "price": 1.0}), "quantity"),
            (json!({"productName": "Nut", "quantity": 3, "price": 0}), "price"),
            (json!({"productName": "Nut", "quantity": 3, "price": null}), "price"),
        ];
        for (body, field) in cases {
            assert_eq!(
                NewProduct::from_candidate(&body),
                Err(DomainError::MissingField(field)),
                "body: {body}"
            );
        }
    }

    #[test]
    fn create_rejects_wrong_types() {
        let err = NewProduct::from_candidate(&json!({
            "productName": "Nut",
            "quantity": 2.5,
            "price": 1.0
        }))
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = NewProduct::from_candidate(&json!({
            "productName": "Nut",
            "quantity": 2,
            "price": "cheap"
        }))
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = NewProduct::from_candidate(&json!({
            "productName": "Nut",
            "quantity": -2,
            "price": 1.0
        }))
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn update_accepts_zero_values() {
        let update = StockUpdate::from_body(&json!({"quantity": 0, "price": 0})).unwrap();
        assert_eq!(update, StockUpdate { quantity: 0, price: 0.0 });
    }

    #[test]
    fn update_coerces_numeric_fields() {
        let update = StockUpdate::from_body(&json!({"quantity": "12", "price": "3.25"})).unwrap();
        assert_eq!(update, StockUpdate { quantity: 12, price: 3.25 });

        let update = StockUpdate::from_body(&json!({"quantity": 7.9, "price": 2})).unwrap();
        assert_eq!(update, StockUpdate { quantity: 7, price: 2.0 });
    }

    #[test]
    fn update_ignores_product_name() {
        let update = StockUpdate::from_body(&json!({
            "productName": "Renamed",
            "quantity": 1,
            "price": 1.0
        }))
        .unwrap();
        assert_eq!(update.quantity, 1);
    }

    #[test]
    fn update_rejects_null_and_garbage() {
        assert_eq!(
            StockUpdate::from_body(&json!({"quantity": null, "price": 1})),
            Err(DomainError::MissingField("quantity"))
        );
        assert_eq!(
            StockUpdate::from_body(&json!({"quantity": 1})),
            Err(DomainError::MissingField("price"))
        );
        assert!(matches!(
            StockUpdate::from_body(&json!({"quantity": "lots", "price": 1})),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn stock_update_leaves_name_untouched() {
        let mut p = Product::from_new(
            id("x"),
            NewProduct {
                product_name: "Bolt".into(),
                quantity: 1,
                price: 1.0,
            },
        );
        p.apply_stock_update(&StockUpdate { quantity: 0, price: 9.5 });
        assert_eq!(p.product_name, "Bolt");
        assert_eq!(p.quantity, 0);
        assert_eq!(p.price, 9.5);
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Any positive, well-typed candidate passes create validation unchanged.
            #[test]
            fn valid_candidates_are_accepted(
                name in "[A-Za-z][A-Za-z0-9 ]{0,40}",
                quantity in 1i64..1_000_000,
                cents in 1u32..10_000_000
            ) {
                let price = f64::from(cents) / 100.0;
                let body = json!({"productName": name, "quantity": quantity, "price": price});
                let new = NewProduct::from_candidate(&body).unwrap();
                prop_assert_eq!(new.product_name, name);
                prop_assert_eq!(new.quantity, quantity);
                prop_assert_eq!(new.price, price);
            }

            /// Update validation accepts every non-negative pair, zero included.
            #[test]
            fn update_accepts_non_negative_pairs(quantity in 0i64..1_000_000, price in 0.0f64..1e6) {
                let update = StockUpdate::from_body(&json!({"quantity": quantity, "price": price})).unwrap();
                prop_assert_eq!(update.quantity, quantity);
                prop_assert_eq!(update.price, price);
            }
        }
    }
}
