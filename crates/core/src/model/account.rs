use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of the mock token exchange.
///
/// The user object is backend-defined and passed through for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthedUser {
    pub jwt: String,
    pub user: Value,
}
