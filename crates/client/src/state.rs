//! Inventory page state.
//!
//! Every action talks to a [`ProductService`] and, when the write succeeds,
//! re-fetches the full list. Failures are logged and leave the local list as
//! it was; the latest failure is kept in [`InventoryState::last_error`].

use stocktake_core::DocumentId;
use stocktake_products::coerce::{number_text, parse_float_prefix, parse_int_prefix};
use stocktake_products::{Product, SearchField, filter_products};

use crate::api::{ClientError, CreateRequest, ProductService, UpdateRequest};

/// Text fields of the "add product" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub product_name: String,
    pub quantity: String,
    pub price: String,
}

impl ProductForm {
    fn to_request(&self) -> CreateRequest {
        CreateRequest {
            product_name: self.product_name.clone(),
            quantity: parse_int_prefix(&self.quantity),
            price: parse_float_prefix(&self.price),
        }
    }
}

/// Row currently in edit mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub id: DocumentId,
    pub quantity: String,
    pub price: String,
}

impl EditState {
    fn to_request(&self) -> UpdateRequest {
        UpdateRequest {
            quantity: parse_int_prefix(&self.quantity),
            price: parse_float_prefix(&self.price),
        }
    }
}

pub struct InventoryState<S> {
    service: S,
    products: Vec<Product>,
    form: ProductForm,
    edit: Option<EditState>,
    search_term: String,
    search_field: SearchField,
    last_error: Option<String>,
}

impl<S: ProductService> InventoryState<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            products: Vec::new(),
            form: ProductForm::default(),
            edit: None,
            search_term: String::new(),
            search_field: SearchField::default(),
            last_error: None,
        }
    }

    /// Initial load. A failed fetch leaves the list empty.
    pub async fn mount(&mut self) {
        self.refresh().await;
    }

    /// Replace the local list with the server's. Returns whether the fetch
    /// succeeded.
    pub async fn refresh(&mut self) -> bool {
        match self.service.list().await {
            Ok(products) => {
                tracing::debug!(count = products.len(), "fetched products");
                self.products = products;
                true
            }
            Err(e) => {
                self.record("fetch products", e);
                false
            }
        }
    }

    /// Submit the add form. On success the list is re-fetched and the form
    /// cleared; on failure the form keeps its values.
    pub async fn add(&mut self) -> bool {
        let request = self.form.to_request();
        match self.service.create(&request).await {
            Ok(created) => {
                tracing::info!(id = %created.id, "product added");
                self.form = ProductForm::default();
                self.last_error = None;
                self.refresh().await;
                true
            }
            Err(e) => {
                self.record("add product", e);
                false
            }
        }
    }

    /// Delete a product after `confirm` approves it. A declined confirmation
    /// sends nothing.
    pub async fn delete(&mut self, id: &DocumentId, confirm: impl FnOnce(&DocumentId) -> bool) -> bool {
        if !confirm(id) {
            return false;
        }

        match self.service.delete(id).await {
            Ok(()) => {
                tracing::info!(%id, "product deleted");
                if self.edit.as_ref().is_some_and(|e| &e.id == id) {
                    self.edit = None;
                }
                self.last_error = None;
                self.refresh().await;
                true
            }
            Err(e) => {
                self.record("delete product", e);
                false
            }
        }
    }

    /// Put a row into edit mode, seeding the fields from its current stock.
    /// Returns false if the id is not in the local list.
    pub fn begin_edit(&mut self, id: &DocumentId) -> bool {
        let Some(product) = self.products.iter().find(|p| &p.id == id) else {
            return false;
        };
        self.edit = Some(EditState {
            id: product.id.clone(),
            quantity: product.quantity.to_string(),
            price: number_text(product.price),
        });
        true
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Send the edited quantity and price. Edit mode ends only on success.
    pub async fn save_edit(&mut self) -> bool {
        let Some(edit) = self.edit.as_ref() else {
            return false;
        };
        let id = edit.id.clone();
        let request = edit.to_request();

        match self.service.update(&id, &request).await {
            Ok(()) => {
                tracing::info!(%id, "product updated");
                self.edit = None;
                self.last_error = None;
                self.refresh().await;
                true
            }
            Err(e) => {
                self.record("update product", e);
                false
            }
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Select the search field by its label. Unknown labels keep the current
    /// selection.
    pub fn set_search_field(&mut self, label: &str) -> bool {
        match label.parse() {
            Ok(field) => {
                self.search_field = field;
                true
            }
            Err(e) => {
                tracing::warn!(label, error = %e, "ignoring unknown search field");
                false
            }
        }
    }

    /// Products matching the current search, in list order.
    pub fn visible(&self) -> Vec<&Product> {
        filter_products(&self.products, &self.search_term, self.search_field)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn form(&self) -> &ProductForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ProductForm {
        &mut self.form
    }

    pub fn editing(&self) -> Option<&EditState> {
        self.edit.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut EditState> {
        self.edit.as_mut()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn search_field(&self) -> SearchField {
        self.search_field
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn record(&mut self, action: &'static str, err: ClientError) {
        match &err {
            ClientError::Api(status, _) if *status < 500 => {
                tracing::warn!(action, error = %err, "request rejected")
            }
            _ => tracing::error!(action, error = %err, "request failed"),
        }
        self.last_error = Some(err.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use stocktake_products::NewProduct;

    /// Service that fails every call, counting how many were made.
    #[derive(Default)]
    struct Offline {
        calls: Mutex<usize>,
    }

    impl Offline {
        fn fail(&self) -> ClientError {
            *self.calls.lock().unwrap() += 1;
            ClientError::Network("connection refused".to_string())
        }
    }

    #[async_trait::async_trait]
    impl ProductService for Offline {
        async fn list(&self) -> Result<Vec<Product>, ClientError> {
            Err(self.fail())
        }
        async fn create(&self, _: &CreateRequest) -> Result<Product, ClientError> {
            Err(self.fail())
        }
        async fn update(&self, _: &DocumentId, _: &UpdateRequest) -> Result<(), ClientError> {
            Err(self.fail())
        }
        async fn delete(&self, _: &DocumentId) -> Result<(), ClientError> {
            Err(self.fail())
        }
    }

    fn product(id: &str, name: &str, quantity: i64, price: f64) -> Product {
        Product::from_new(
            id.parse().unwrap(),
            NewProduct {
                product_name: name.to_string(),
                quantity,
                price,
            },
        )
    }

    fn seeded() -> InventoryState<Offline> {
        let mut state = InventoryState::new(Offline::default());
        state.products = vec![product("a", "Bolt", 10, 1.5), product("b", "Nut", 5, 0.5)];
        state
    }

    #[test]
    fn form_text_is_parsed_like_a_number_field() {
        let form = ProductForm {
            product_name: "Bolt".to_string(),
            quantity: "12abc".to_string(),
            price: "abc".to_string(),
        };
        let req = form.to_request();
        assert_eq!(req.quantity, Some(12));
        assert_eq!(req.price, None);
    }

    #[tokio::test]
    async fn failed_mount_leaves_list_empty() {
        let mut state = InventoryState::new(Offline::default());
        state.mount().await;
        assert!(state.products().is_empty());
        assert!(state.last_error().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn failed_add_keeps_form_and_list() {
        let mut state = seeded();
        state.form_mut().product_name = "Washer".to_string();
        state.form_mut().quantity = "3".to_string();

        assert!(!state.add().await);
        assert_eq!(state.products().len(), 2);
        assert_eq!(state.form().product_name, "Washer");
    }

    #[tokio::test]
    async fn declined_delete_sends_nothing() {
        let mut state = seeded();
        let id: DocumentId = "a".parse().unwrap();

        assert!(!state.delete(&id, |_| false).await);
        assert_eq!(*state.service.calls.lock().unwrap(), 0);
        assert_eq!(state.products().len(), 2);
    }

    #[tokio::test]
    async fn failed_save_stays_in_edit_mode() {
        let mut state = seeded();
        let id: DocumentId = "b".parse().unwrap();

        assert!(state.begin_edit(&id));
        let edit = state.editing().unwrap();
        assert_eq!(edit.quantity, "5");
        assert_eq!(edit.price, "0.5");

        state.editing_mut().unwrap().quantity = "7".to_string();
        assert!(!state.save_edit().await);
        assert_eq!(state.editing().unwrap().quantity, "7");
        assert_eq!(state.products()[1].quantity, 5);

        state.cancel_edit();
        assert!(state.editing().is_none());
    }

    #[test]
    fn edit_fields_round_trip_extreme_prices() {
        let mut state = seeded();
        state.products.push(product("c", "Gold", 1, 1e21));

        assert!(state.begin_edit(&"c".parse().unwrap()));
        let edit = state.editing().unwrap();
        assert_eq!(edit.price, "1e+21");
        assert_eq!(edit.to_request().price, Some(1e21));
    }

    #[test]
    fn begin_edit_of_unknown_id_is_ignored() {
        let mut state = seeded();
        assert!(!state.begin_edit(&"zzz".parse().unwrap()));
        assert!(state.editing().is_none());
    }

    #[test]
    fn search_filters_visible_rows() {
        let mut state = seeded();
        assert_eq!(state.visible().len(), 2);

        state.set_search_term("bo");
        assert_eq!(state.visible().len(), 1);
        assert_eq!(state.visible()[0].product_name, "Bolt");

        assert!(state.set_search_field("price"));
        state.set_search_term("0.5");
        let visible = state.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].product_name, "Nut");
    }

    #[test]
    fn unknown_search_field_keeps_previous_selection() {
        let mut state = seeded();
        assert!(state.set_search_field("quantity"));
        assert!(!state.set_search_field("colour"));
        assert_eq!(state.search_field(), SearchField::Quantity);
    }
}
