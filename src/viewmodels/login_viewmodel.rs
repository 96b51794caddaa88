// ============================================================================
// LOGIN VIEWMODEL - Email to token exchange
// ============================================================================

use crate::services::{ApiClient, ApiError};
use crate::state::{AppState, Route};

#[derive(Clone)]
pub struct LoginViewModel {
    api_client: ApiClient,
    state: AppState,
}

impl LoginViewModel {
    pub fn new(state: AppState) -> Self {
        Self {
            api_client: ApiClient::new(),
            state,
        }
    }

    /// Exchange the email for a token and enter the product list. The email
    /// is trimmed; a blank one is rejected without a network round trip.
    pub async fn login(&self, email: &str) -> Result<(), ApiError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ApiError::Auth("Email is required".to_string()));
        }

        let auth = self.api_client.post_auth(email).await?;
        self.state.session.set_token(auth.token);
        self.state.navigate(Route::Products);
        Ok(())
    }
}
