// ============================================================================
// PRODUCT DETAILS VIEWMODEL - Single product page with gallery and delete
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::models::Product;
use crate::query::{QueryKey, ResourceTag};
use crate::services::{ApiClient, ApiError};
use crate::state::{AppState, Route, SubscriptionSlot};

#[derive(Clone)]
pub struct ProductDetailsViewModel {
    api_client: ApiClient,
    state: AppState,
    slug: String,

    product: Rc<RefCell<Option<Product>>>,
    is_loading: Rc<Cell<bool>>,
    error: Rc<RefCell<Option<ApiError>>>,
    active_image: Rc<Cell<usize>>,

    delete_requested: Rc<Cell<bool>>,
    deleting: Rc<Cell<bool>>,
    delete_error: Rc<RefCell<Option<ApiError>>>,

    subscription: SubscriptionSlot,
    on_change: Rc<RefCell<Option<Rc<dyn Fn()>>>>,
}

impl ProductDetailsViewModel {
    pub fn new(state: AppState, slug: String) -> Self {
        let subscription = state.new_subscription_slot();
        Self {
            api_client: ApiClient::new(),
            state,
            slug,
            product: Rc::new(RefCell::new(None)),
            is_loading: Rc::new(Cell::new(false)),
            error: Rc::new(RefCell::new(None)),
            active_image: Rc::new(Cell::new(0)),
            delete_requested: Rc::new(Cell::new(false)),
            deleting: Rc::new(Cell::new(false)),
            delete_error: Rc::new(RefCell::new(None)),
            subscription,
            on_change: Rc::new(RefCell::new(None)),
        }
    }

    pub fn start<F>(&self, on_change: F)
    where
        F: Fn() + 'static,
    {
        *self.on_change.borrow_mut() = Some(Rc::new(on_change));

        let token = match self.state.session.token() {
            Some(token) => token,
            None => return,
        };

        #[derive(serde::Serialize)]
        struct Args<'a> {
            slug: &'a str,
        }

        let api = self.api_client.clone();
        let slug = self.slug.clone();
        let vm = self.clone();
        let subscription = self.state.queries.subscribe_query(
            QueryKey::new("getProductBySlug", &Args { slug: &self.slug }),
            &[ResourceTag::Product],
            move || {
                let api = api.clone();
                let token = token.clone();
                let slug = slug.clone();
                async move { api.get_product_by_slug(&token, &slug).await }
            },
            move |query_state| {
                if let Some(product) = query_state.decode::<Product>() {
                    let changed = vm
                        .product
                        .borrow()
                        .as_ref()
                        .map(|p| p.id != product.id)
                        .unwrap_or(true);
                    if changed {
                        vm.active_image.set(0);
                    }
                    *vm.product.borrow_mut() = Some(product);
                }
                vm.is_loading.set(query_state.is_loading);
                *vm.error.borrow_mut() = query_state.error;
                vm.emit();
            },
        );
        *self.subscription.borrow_mut() = Some(subscription);
    }

    pub fn product(&self) -> Option<Product> {
        self.product.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading.get()
    }

    pub fn error(&self) -> Option<ApiError> {
        self.error.borrow().clone()
    }

    pub fn active_image(&self) -> usize {
        self.active_image.get()
    }

    /// Select a gallery thumbnail. Out-of-range indices are ignored.
    pub fn select_image(&self, index: usize) {
        let count = self
            .product
            .borrow()
            .as_ref()
            .map(|p| p.display_images().len())
            .unwrap_or(0);
        if index < count {
            self.active_image.set(index);
            self.emit();
        }
    }

    pub fn is_delete_requested(&self) -> bool {
        self.delete_requested.get()
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting.get()
    }

    pub fn delete_error(&self) -> Option<ApiError> {
        self.delete_error.borrow().clone()
    }

    pub fn request_delete(&self) {
        self.delete_requested.set(true);
        *self.delete_error.borrow_mut() = None;
        self.emit();
    }

    pub fn cancel_delete(&self) {
        self.delete_requested.set(false);
        *self.delete_error.borrow_mut() = None;
        self.emit();
    }

    /// Delete the shown product and return to the list
    pub fn confirm_delete(&self) {
        let product = match self.product.borrow().clone() {
            Some(product) => product,
            None => return,
        };
        let token = match self.state.session.token() {
            Some(token) => token,
            None => {
                *self.delete_error.borrow_mut() =
                    Some(ApiError::Auth("You are not authenticated".to_string()));
                self.emit();
                return;
            }
        };

        self.deleting.set(true);
        *self.delete_error.borrow_mut() = None;
        self.emit();

        let vm = self.clone();
        let api = self.api_client.clone();
        let id = product.id.clone();
        self.state.queries.mutate(
            vec![ResourceTag::Product],
            async move { api.delete_product(&token, &id).await },
            move |result| {
                vm.deleting.set(false);
                match result {
                    Ok(_) => {
                        vm.delete_requested.set(false);
                        vm.state.navigate(Route::Products);
                    }
                    Err(error) => {
                        log::error!("❌ Delete failed: {}", error);
                        *vm.delete_error.borrow_mut() = Some(error);
                        vm.emit();
                    }
                }
            },
        );
    }

    fn emit(&self) {
        let callback = self.on_change.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewmodel() -> ProductDetailsViewModel {
        ProductDetailsViewModel::new(AppState::new(), "wooden-chair".to_string())
    }

    fn product_with_images(images: Vec<&str>) -> Product {
        let json = serde_json::json!({
            "id": "p1",
            "slug": "wooden-chair",
            "name": "Chair",
            "description": "Wooden chair",
            "price": 49.99,
            "images": images,
            "category": {
                "id": "cat1",
                "name": "Furniture",
                "description": null,
                "image": "https://x/cat.jpg",
                "createdAt": "2024-01-01T00:00:00.000Z",
                "updatedAt": "2024-01-02T00:00:00.000Z"
            },
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-02T00:00:00.000Z"
        });
        serde_json::from_value(json).expect("product json")
    }

    #[test]
    fn out_of_range_thumbnail_clicks_are_ignored() {
        let vm = viewmodel();
        *vm.product.borrow_mut() = Some(product_with_images(vec![
            "https://x/1.jpg",
            "https://x/2.jpg",
        ]));

        vm.select_image(1);
        assert_eq!(vm.active_image(), 1);
        vm.select_image(5);
        assert_eq!(vm.active_image(), 1);
    }

    #[test]
    fn delete_modal_state_round_trip() {
        let vm = viewmodel();
        assert!(!vm.is_delete_requested());

        vm.request_delete();
        assert!(vm.is_delete_requested());

        vm.cancel_delete();
        assert!(!vm.is_delete_requested());
        assert!(vm.delete_error().is_none());
    }
}
