//! Best-effort address resolution that always yields a coordinate.

use std::sync::Arc;

use crate::model::Coordinate;
use crate::ports::{GeocodeError, GeocodePort};

/// Campus-area coordinate returned whenever geocoding cannot be performed.
pub const DEFAULT_FALLBACK: Coordinate = Coordinate::new(40.7308, -73.9973);

/// Locality appended to every address to bias the provider toward campus.
pub const DEFAULT_LOCALITY: &str = "New York, NY";

#[derive(Debug, Clone, PartialEq)]
/// Tunables for [`AddressResolver`].
pub struct ResolverSettings {
    /// Coordinate returned on every failure path.
    pub fallback: Coordinate,
    /// Qualifier appended as `"<address>, <locality>"`; `None` submits the
    /// address unchanged.
    pub locality: Option<String>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            fallback: DEFAULT_FALLBACK,
            locality: Some(DEFAULT_LOCALITY.to_owned()),
        }
    }
}

/// Public entry point for turning free-text addresses into coordinates.
///
/// The resolver never fails: a missing provider, a rejected request, an
/// empty result set, or a broken connection all yield the configured
/// fallback coordinate and a log line.
pub struct AddressResolver {
    provider: Option<Arc<dyn GeocodePort>>,
    settings: ResolverSettings,
}

impl AddressResolver {
    /// Create a resolver bound to the given provider.
    ///
    /// Passing `None` models a missing provider credential.
    #[must_use]
    pub fn new(provider: Option<Arc<dyn GeocodePort>>, settings: ResolverSettings) -> Self {
        Self { provider, settings }
    }

    /// Resolver without a provider that always answers with the fallback.
    #[must_use]
    pub fn offline(settings: ResolverSettings) -> Self {
        Self::new(None, settings)
    }

    /// Settings in effect for this resolver.
    #[must_use]
    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Whether a provider is configured.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.provider.is_some()
    }

    /// Resolve an address to a coordinate, falling back on any failure.
    pub async fn resolve(&self, address: &str) -> Coordinate {
        let Some(provider) = &self.provider else {
            log::warn!(
                "{}: using default coordinate for {address:?}",
                GeocodeError::ConfigurationMissing
            );
            return self.settings.fallback;
        };

        let query = self.qualify(address);
        log::debug!("Geocoding {query:?} via {}", provider.name());

        match provider.geocode(&query).await {
            Ok(coordinate) => coordinate,
            Err(err) => {
                self.report(provider.name(), &query, &err);
                self.settings.fallback
            }
        }
    }

    fn qualify(&self, address: &str) -> String {
        match self.settings.locality.as_deref().map(str::trim) {
            Some(locality) if !locality.is_empty() => format!("{address}, {locality}"),
            _ => address.to_owned(),
        }
    }

    fn report(&self, provider: &str, query: &str, err: &GeocodeError) {
        let fallback = self.settings.fallback;
        match err {
            GeocodeError::ProviderDenied { .. } => {
                log::error!("{provider} denied geocoding of {query:?}: {err}; using {fallback}");
            }
            GeocodeError::ProviderStatus { .. } => {
                log::warn!("{provider} could not geocode {query:?}: {err}; using {fallback}");
            }
            GeocodeError::Http { status, body } => {
                log::error!(
                    "Geocoding request to {provider} failed: {err}; status: {status}, body: {body}; using {fallback}"
                );
            }
            GeocodeError::Network(_)
            | GeocodeError::Decode(_)
            | GeocodeError::ConfigurationMissing => {
                log::error!("Geocoding request to {provider} failed: {err}; using {fallback}");
            }
        }
    }
}

/// Resolve an address through the given resolver.
///
/// Entry point for the routing layer, which only needs the coordinate.
pub async fn geocode_address(resolver: &AddressResolver, address: &str) -> Coordinate {
    resolver.resolve(address).await
}
