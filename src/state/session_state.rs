// ============================================================================
// SESSION STATE - Auth token holder
// ============================================================================
// The token lives in memory only: a page reload requires a new login. Only
// the login/logout entry points mutate it; every authenticated call reads it.
// ============================================================================

use crate::state::reactivity::ReactiveState;

#[derive(Clone)]
pub struct SessionState {
    token: ReactiveState<Option<String>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            token: ReactiveState::new(None),
        }
    }

    /// Store the token after a successful login
    pub fn set_token(&self, token: String) {
        log::info!("🔐 Session token stored");
        self.token.set(Some(token));
    }

    /// Clear the session unconditionally (logout)
    pub fn clear(&self) {
        log::info!("👋 Session cleared");
        self.token.set(None);
    }

    pub fn token(&self) -> Option<String> {
        self.token.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.with(|t| t.is_some())
    }

    /// Subscribe to login/logout transitions
    pub fn subscribe<F>(&self, callback: F) -> u64
    where
        F: Fn() + 'static,
    {
        self.token.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: u64) {
        self.token.unsubscribe(id);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_then_logout_round_trip() {
        let session = SessionState::new();
        assert!(!session.is_authenticated());

        session.set_token("abc123".to_string());
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("abc123"));

        session.clear();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }
}
