// ============================================================================
// APP STATE - Route, session and shared query client for the whole app
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::query::{QueryClient, QuerySubscription};
use crate::state::session_state::SessionState;

/// Pages of the admin interface
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Products,
    CreateProduct,
    EditProduct(String),
    ProductDetails(String),
}

impl Route {
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

/// Holder for a view's active query subscription. The render loop clears
/// every slot before tearing the DOM down, which drops the subscription and
/// detaches its callbacks.
pub type SubscriptionSlot = Rc<RefCell<Option<QuerySubscription>>>;

#[derive(Clone)]
pub struct AppState {
    pub session: SessionState,
    pub queries: QueryClient,
    route: Rc<RefCell<Route>>,
    view_subscriptions: Rc<RefCell<Vec<SubscriptionSlot>>>,
    change_subscribers: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl AppState {
    pub fn new() -> Self {
        let state = Self {
            session: SessionState::new(),
            queries: QueryClient::new(),
            route: Rc::new(RefCell::new(Route::Products)),
            view_subscriptions: Rc::new(RefCell::new(Vec::new())),
            change_subscribers: Rc::new(RefCell::new(Vec::new())),
        };

        // Login/logout re-renders the whole app
        let for_session = state.clone();
        state.session.subscribe(move || for_session.notify_change());

        state
    }

    pub fn route(&self) -> Route {
        self.route.borrow().clone()
    }

    /// Change the route and schedule a re-render
    pub fn navigate(&self, route: Route) {
        log::info!("🧭 Navigating to {:?}", route);
        *self.route.borrow_mut() = route;
        self.notify_change();
    }

    /// Change the route without notifying. Used while a render is already in
    /// progress (auth redirects) to avoid re-entrant render loops.
    pub fn redirect(&self, route: Route) {
        *self.route.borrow_mut() = route;
    }

    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.change_subscribers.borrow_mut().push(Rc::new(callback));
    }

    pub fn notify_change(&self) {
        let callbacks: Vec<Rc<dyn Fn()>> =
            self.change_subscribers.borrow().iter().cloned().collect();
        for callback in callbacks {
            callback();
        }
    }

    /// Create a subscription slot tied to the current view generation
    pub fn new_subscription_slot(&self) -> SubscriptionSlot {
        let slot: SubscriptionSlot = Rc::new(RefCell::new(None));
        self.view_subscriptions.borrow_mut().push(slot.clone());
        slot
    }

    /// Drop every view subscription. Called before each render so pending
    /// responses never reach views that were torn down.
    pub fn drop_view_subscriptions(&self) {
        let slots: Vec<SubscriptionSlot> =
            self.view_subscriptions.borrow_mut().drain(..).collect();
        for slot in slots {
            slot.borrow_mut().take();
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn navigate_notifies_change_subscribers() {
        let state = AppState::new();
        let calls = Rc::new(Cell::new(0u32));
        let calls_clone = calls.clone();
        state.subscribe_to_changes(move || calls_clone.set(calls_clone.get() + 1));

        state.navigate(Route::CreateProduct);
        assert_eq!(state.route(), Route::CreateProduct);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn redirect_changes_route_silently() {
        let state = AppState::new();
        let calls = Rc::new(Cell::new(0u32));
        let calls_clone = calls.clone();
        state.subscribe_to_changes(move || calls_clone.set(calls_clone.get() + 1));

        state.redirect(Route::Login);
        assert_eq!(state.route(), Route::Login);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn only_login_is_public() {
        assert!(!Route::Login.requires_auth());
        assert!(Route::Products.requires_auth());
        assert!(Route::EditProduct("slug".to_string()).requires_auth());
    }

    #[test]
    fn dropping_view_subscriptions_empties_slots() {
        let state = AppState::new();
        let slot = state.new_subscription_slot();
        assert!(slot.borrow().is_none());

        state.drop_view_subscriptions();
        assert!(slot.borrow().is_none());
        assert!(state.view_subscriptions.borrow().is_empty());
    }
}
