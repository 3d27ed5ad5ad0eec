//! Traits describing provider capabilities and shared error types.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::{Coordinate, Email, Role, User};

/// Coarse classification of why a resolution fell back to the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No provider credential is configured.
    ConfigurationMissing,
    /// The provider rejected the request, usually a bad or disabled key.
    ProviderDenied,
    /// The provider answered with a status other than `OK`, or without results.
    ProviderNonOk,
    /// The request failed or the response was not the expected JSON.
    TransportFailure,
}

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to a geocoding provider.
pub enum GeocodeError {
    /// No credential is available for the provider.
    #[error("Geocoding provider is not configured")]
    ConfigurationMissing,
    /// Provider answered with `REQUEST_DENIED`.
    #[error("Request denied by provider{}", detail(.message.as_deref()))]
    ProviderDenied {
        /// Provider supplied `error_message`.
        message: Option<String>,
    },
    /// Provider answered with any other non-success status.
    #[error("Provider status {status}{}", detail(.message.as_deref()))]
    ProviderStatus {
        /// Raw status string, e.g. `ZERO_RESULTS`.
        status: String,
        /// Provider supplied `error_message`.
        message: Option<String>,
    },
    /// Network layer failed before a response was received.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Provider answered with a non-success HTTP status.
    #[error("HTTP status {status}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },
    /// Response body could not be decoded.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

fn detail(message: Option<&str>) -> String {
    message.map(|text| format!(": {text}")).unwrap_or_default()
}

impl GeocodeError {
    /// Map the error onto the resolver's failure taxonomy.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            GeocodeError::ConfigurationMissing => FailureKind::ConfigurationMissing,
            GeocodeError::ProviderDenied { .. } => FailureKind::ProviderDenied,
            GeocodeError::ProviderStatus { .. } => FailureKind::ProviderNonOk,
            GeocodeError::Network(_) | GeocodeError::Http { .. } | GeocodeError::Decode(_) => {
                FailureKind::TransportFailure
            }
        }
    }
}

#[async_trait]
/// Trait for geocoding backends that turn an address into a coordinate.
pub trait GeocodePort: Send + Sync {
    /// Short provider name used in log lines.
    fn name(&self) -> &str;

    /// Resolve an already locality-qualified address.
    ///
    /// # Errors
    ///
    /// Returns a [`GeocodeError`] when the request fails or the provider
    /// does not return a usable location.
    async fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeError>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Errors raised by user stores.
pub enum StoreError {
    /// A user with this email already exists.
    #[error("User already exists: {0}")]
    Duplicate(Email),
    /// Input is not a usable email address.
    #[error("Invalid email address: {0:?}")]
    InvalidEmail(String),
    /// A writer panicked while holding the store lock.
    #[error("User store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Validated user data waiting for the store to assign an id.
pub struct UserDraft {
    /// Normalized email address.
    pub email: Email,
    /// Name shown next to posts.
    pub display_name: String,
    /// Access level.
    pub role: Role,
}

/// Storage for registered users.
pub trait UserStore: Send + Sync {
    /// Look up a user by normalized email.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store is unavailable.
    fn find_by_email(&self, email: &Email) -> Result<Option<User>, StoreError>;

    /// Persist a new user under a fresh id not yet held by the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] when the email is already taken.
    fn insert(&self, draft: UserDraft) -> Result<User, StoreError>;

    /// All stored users in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store is unavailable.
    fn all(&self) -> Result<Vec<User>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_onto_failure_kinds() {
        let denied = GeocodeError::ProviderDenied { message: None };
        let zero = GeocodeError::ProviderStatus {
            status: "ZERO_RESULTS".to_owned(),
            message: None,
        };
        let http = GeocodeError::Http {
            status: 503,
            body: String::new(),
        };
        assert_eq!(denied.kind(), FailureKind::ProviderDenied);
        assert_eq!(zero.kind(), FailureKind::ProviderNonOk);
        assert_eq!(http.kind(), FailureKind::TransportFailure);
        assert_eq!(
            GeocodeError::ConfigurationMissing.kind(),
            FailureKind::ConfigurationMissing
        );
    }

    #[test]
    fn provider_message_is_part_of_display() {
        let err = GeocodeError::ProviderDenied {
            message: Some("The provided API key is invalid.".to_owned()),
        };
        assert_eq!(
            err.to_string(),
            "Request denied by provider: The provided API key is invalid."
        );
        let err = GeocodeError::ProviderStatus {
            status: "OVER_QUERY_LIMIT".to_owned(),
            message: None,
        };
        assert_eq!(err.to_string(), "Provider status OVER_QUERY_LIMIT");
    }
}
