//! The root client and root policy.
//!
//! Protocol constants here are part of the external contract and must stay
//! byte-for-byte stable.

use gate_model::{Client, Effect, PolicyTemplate};

use crate::resolver::RootCredentials;

/// Default administrative scope token, also the resource namespace.
pub const DEFAULT_ADMIN_SCOPE: &str = "gate";

/// Name given to the root client.
pub const ROOT_CLIENT_NAME: &str = "This temporary client is generated by Gatehouse and is granted all of \
     Gatehouse's administrative privileges. It must be removed when everything is set up.";

/// Response types permitted for the root client.
pub const ROOT_RESPONSE_TYPES: [&str; 3] = ["id_token", "code", "token"];

/// Grant types permitted for the root client.
pub const ROOT_GRANT_TYPES: [&str; 5] = [
    "implicit",
    "refresh_token",
    "authorization_code",
    "password",
    "client_credentials",
];

/// The root client's only redirect URI.
pub const ROOT_REDIRECT_URI: &str = "http://localhost:4445/callback";

/// Description of the root policy.
pub const ROOT_POLICY_DESCRIPTION: &str = "This is a policy created by Gatehouse and issued to the \
     first client. It grants all of Gatehouse's administrative privileges to the client and enables \
     the client_credentials response type.";

/// Action pattern matching every action.
pub const ALL_ACTIONS: &str = "<.*>";

/// Scope string of the root client: `"<admin-scope> openid offline"`.
#[must_use]
pub fn root_scope(admin_scope: &str) -> String {
    format!("{admin_scope} openid offline")
}

/// Resource pattern matching everything under the admin namespace.
#[must_use]
pub fn admin_resource_pattern(admin_scope: &str) -> String {
    format!("rn:{admin_scope}:<.*>")
}

/// Builds the root client for the resolved credentials.
///
/// An empty `credentials.id` leaves the choice of identifier to the store.
#[must_use]
pub fn root_client(credentials: &RootCredentials, admin_scope: &str) -> Client {
    Client::new(credentials.id.clone())
        .with_name(ROOT_CLIENT_NAME)
        .with_secret(credentials.secret.clone())
        .with_response_types(ROOT_RESPONSE_TYPES)
        .with_grant_types(ROOT_GRANT_TYPES)
        .with_scope(root_scope(admin_scope))
        .with_redirect_uri(ROOT_REDIRECT_URI)
}

/// Builds the all-access policy template for the root client.
#[must_use]
pub fn root_policy_template(admin_scope: &str) -> PolicyTemplate {
    PolicyTemplate {
        description: ROOT_POLICY_DESCRIPTION.to_string(),
        effect: Effect::Allow,
        resources: vec![admin_resource_pattern(admin_scope)],
        actions: vec![ALL_ACTIONS.to_string()],
    }
}
