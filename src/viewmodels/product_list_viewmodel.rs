// ============================================================================
// PRODUCT LIST VIEWMODEL - Paging, debounced search, delete flow
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::CONFIG;
use crate::models::Product;
use crate::query::{QueryKey, ResourceTag};
use crate::services::{ApiClient, ApiError, ProductQueryArgs};
use crate::state::{AppState, SubscriptionSlot};
use crate::utils::Debouncer;

#[derive(Clone)]
pub struct ProductListViewModel {
    api_client: ApiClient,
    state: AppState,

    offset: Rc<Cell<usize>>,
    limit: usize,
    /// What the user typed, exactly
    search: Rc<RefCell<String>>,
    /// What the last debounce tick committed; this drives the request
    debounced_search: Rc<RefCell<String>>,
    debounce: Debouncer,

    products: Rc<RefCell<Vec<Product>>>,
    is_loading: Rc<Cell<bool>>,
    /// Whether any page for the current key has landed; distinguishes the
    /// first load (skeleton) from a background refetch (keep showing data)
    has_loaded: Rc<Cell<bool>>,
    error: Rc<RefCell<Option<ApiError>>>,

    delete_target: Rc<RefCell<Option<Product>>>,
    deleting: Rc<Cell<bool>>,
    delete_error: Rc<RefCell<Option<ApiError>>>,

    subscription: SubscriptionSlot,
    on_change: Rc<RefCell<Option<Rc<dyn Fn()>>>>,
}

impl ProductListViewModel {
    pub fn new(state: AppState) -> Self {
        let subscription = state.new_subscription_slot();
        Self {
            api_client: ApiClient::new(),
            state,
            offset: Rc::new(Cell::new(0)),
            limit: CONFIG.page_size,
            search: Rc::new(RefCell::new(String::new())),
            debounced_search: Rc::new(RefCell::new(String::new())),
            debounce: Debouncer::new(CONFIG.search_debounce_ms),
            products: Rc::new(RefCell::new(Vec::new())),
            is_loading: Rc::new(Cell::new(false)),
            has_loaded: Rc::new(Cell::new(false)),
            error: Rc::new(RefCell::new(None)),
            delete_target: Rc::new(RefCell::new(None)),
            deleting: Rc::new(Cell::new(false)),
            delete_error: Rc::new(RefCell::new(None)),
            subscription,
            on_change: Rc::new(RefCell::new(None)),
        }
    }

    /// Wire the view's re-render callback and kick off the first fetch
    pub fn start<F>(&self, on_change: F)
    where
        F: Fn() + 'static,
    {
        *self.on_change.borrow_mut() = Some(Rc::new(on_change));
        self.resubscribe();
    }

    // ------------------------------------------------------------------
    // Read accessors for the view
    // ------------------------------------------------------------------

    pub fn products(&self) -> Vec<Product> {
        self.products.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading.get()
    }

    /// True only while the first page for the current key is still in flight.
    /// Background refetches keep rendering whatever is already on screen.
    pub fn is_initial_load(&self) -> bool {
        self.is_loading.get() && !self.has_loaded.get()
    }

    pub fn error(&self) -> Option<ApiError> {
        self.error.borrow().clone()
    }

    pub fn search_text(&self) -> String {
        self.search.borrow().clone()
    }

    /// Search mode hides the pagination controls
    pub fn is_searching(&self) -> bool {
        !self.debounced_search.borrow().trim().is_empty()
    }

    pub fn offset(&self) -> usize {
        self.offset.get()
    }

    pub fn delete_target(&self) -> Option<Product> {
        self.delete_target.borrow().clone()
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting.get()
    }

    pub fn delete_error(&self) -> Option<ApiError> {
        self.delete_error.borrow().clone()
    }

    // ------------------------------------------------------------------
    // Search and paging
    // ------------------------------------------------------------------

    /// Record a keystroke. The request only goes out once the debounce
    /// window elapses without further typing; a new search always restarts
    /// from the first page.
    pub fn set_search(&self, text: String) {
        self.apply_search_input(&text);

        let vm = self.clone();
        self.debounce.schedule(move || {
            vm.commit_search(text);
        });
    }

    fn apply_search_input(&self, text: &str) {
        *self.search.borrow_mut() = text.to_string();
        self.offset.set(0);
    }

    fn commit_search(&self, text: String) {
        *self.debounced_search.borrow_mut() = text;
        self.resubscribe();
        self.emit();
    }

    pub fn next_page(&self) {
        self.offset.set(self.offset.get() + self.limit);
        self.resubscribe();
        self.emit();
    }

    pub fn prev_page(&self) {
        if self.offset.get() == 0 {
            return;
        }
        self.offset.set(self.offset.get().saturating_sub(self.limit));
        self.resubscribe();
        self.emit();
    }

    pub fn query_args(&self) -> ProductQueryArgs {
        let debounced = self.debounced_search.borrow();
        let searched_text = if debounced.trim().is_empty() {
            None
        } else {
            Some(debounced.clone())
        };
        ProductQueryArgs {
            offset: Some(self.offset.get()),
            limit: Some(self.limit),
            searched_text,
        }
    }

    // ------------------------------------------------------------------
    // Delete flow
    // ------------------------------------------------------------------

    pub fn request_delete(&self, product: Product) {
        *self.delete_target.borrow_mut() = Some(product);
        *self.delete_error.borrow_mut() = None;
        self.emit();
    }

    pub fn cancel_delete(&self) {
        *self.delete_target.borrow_mut() = None;
        *self.delete_error.borrow_mut() = None;
        self.emit();
    }

    /// Delete the targeted product. The row disappears as soon as the server
    /// confirms; the tag invalidation then refreshes the page in the
    /// background.
    pub fn confirm_delete(&self) {
        let target = match self.delete_target.borrow().clone() {
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
        let id = target.id.clone();
        self.state.queries.mutate(
            vec![ResourceTag::Product],
            async move { api.delete_product(&token, &id).await },
            move |result| {
                vm.deleting.set(false);
                match result {
                    Ok(deleted) => {
                        vm.remove_locally(&deleted.id);
                        *vm.delete_target.borrow_mut() = None;
                    }
                    Err(error) => {
                        log::error!("❌ Delete failed: {}", error);
                        *vm.delete_error.borrow_mut() = Some(error);
                    }
                }
                vm.emit();
            },
        );
    }

    /// Drop a product from the local page without waiting for the refetch
    fn remove_locally(&self, id: &str) {
        self.products.borrow_mut().retain(|p| p.id != id);
    }

    // ------------------------------------------------------------------
    // Query wiring
    // ------------------------------------------------------------------

    fn resubscribe(&self) {
        let token = match self.state.session.token() {
            Some(token) => token,
            None => return,
        };

        let args = self.query_args();
        let key = QueryKey::new("getProducts", &args);
        self.has_loaded.set(false);

        let api = self.api_client.clone();
        let fetch_args = args.clone();
        let vm = self.clone();
        let subscription = self.state.queries.subscribe_query(
            key,
            &[ResourceTag::Product],
            move || {
                let api = api.clone();
                let token = token.clone();
                let args = fetch_args.clone();
                async move { api.get_products(&token, &args).await }
            },
            move |query_state| {
                if let Some(products) = query_state.decode::<Vec<Product>>() {
                    *vm.products.borrow_mut() = products;
                    vm.has_loaded.set(true);
                }
                vm.is_loading.set(query_state.is_loading);
                *vm.error.borrow_mut() = query_state.error;
                vm.emit();
            },
        );
        *self.subscription.borrow_mut() = Some(subscription);
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
    use chrono::Utc;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            slug: format!("product-{}", id),
            name: format!("Product {}", id),
            description: "A product".to_string(),
            price: 10.0,
            images: Vec::new(),
            category: crate::models::Category {
                id: "cat1".to_string(),
                name: "Furniture".to_string(),
                description: None,
                image: "https://x/cat.jpg".to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn viewmodel() -> ProductListViewModel {
        // Unauthenticated state: resubscribe is a no-op, so paging and
        // search logic can be exercised without any network machinery
        ProductListViewModel::new(AppState::new())
    }

    #[test]
    fn prev_page_stops_at_zero() {
        let vm = viewmodel();
        vm.prev_page();
        assert_eq!(vm.offset(), 0);

        vm.next_page();
        vm.next_page();
        assert_eq!(vm.offset(), vm.limit * 2);
        vm.prev_page();
        vm.prev_page();
        vm.prev_page();
        assert_eq!(vm.offset(), 0);
    }

    #[test]
    fn typing_resets_to_the_first_page() {
        let vm = viewmodel();
        vm.next_page();
        assert!(vm.offset() > 0);

        vm.apply_search_input("chair");
        assert_eq!(vm.offset(), 0);
        assert_eq!(vm.search_text(), "chair");
        // Not committed until the debounce tick fires
        assert!(!vm.is_searching());

        vm.commit_search("chair".to_string());
        assert!(vm.is_searching());
    }

    #[test]
    fn query_args_include_search_only_when_committed_and_non_blank() {
        let vm = viewmodel();
        assert_eq!(vm.query_args().searched_text, None);

        *vm.debounced_search.borrow_mut() = "   ".to_string();
        assert_eq!(vm.query_args().searched_text, None);
        assert!(!vm.is_searching());

        *vm.debounced_search.borrow_mut() = "chair".to_string();
        let args = vm.query_args();
        assert_eq!(args.searched_text.as_deref(), Some("chair"));
        assert!(args.is_search());
        assert!(vm.is_searching());
    }

    #[test]
    fn first_fetch_is_an_initial_load() {
        let vm = viewmodel();
        vm.is_loading.set(true);
        assert!(vm.is_initial_load());
    }

    #[test]
    fn background_refetch_after_delete_shows_empty_state_not_skeleton() {
        let vm = viewmodel();
        *vm.products.borrow_mut() = vec![product("1")];
        vm.has_loaded.set(true);

        // Deleting the last product: local removal, then the tag
        // invalidation puts the query back into loading
        vm.remove_locally("1");
        vm.is_loading.set(true);

        assert!(vm.products().is_empty());
        assert!(!vm.is_initial_load());
    }

    #[test]
    fn remove_locally_drops_only_the_deleted_row() {
        let vm = viewmodel();
        *vm.products.borrow_mut() = vec![product("1"), product("2"), product("3")];

        vm.remove_locally("2");
        let remaining: Vec<String> =
            vm.products().into_iter().map(|p| p.id).collect();
        assert_eq!(remaining, vec!["1".to_string(), "3".to_string()]);
    }
}
