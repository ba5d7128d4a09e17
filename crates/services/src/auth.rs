use std::sync::Arc;

use api::AuthApi;
use interview_core::model::AuthedUser;

use crate::error::AuthError;

/// Forwards the mock token exchange; real authentication lives server-side.
pub struct AuthService {
    api: Arc<dyn AuthApi>,
}

impl AuthService {
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self { api }
    }

    /// Exchange a token for a user identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` on transport or backend failure.
    pub async fn login(&self, token: &str) -> Result<AuthedUser, AuthError> {
        Ok(self.api.exchange(token).await?)
    }
}
