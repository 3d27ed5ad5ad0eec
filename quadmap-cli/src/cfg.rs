use std::{env, time::Duration};

use anyhow::{Context as _, Result, ensure};
use quadmap_core::{
    model::Coordinate,
    resolver::{DEFAULT_FALLBACK, ResolverSettings},
};
use quadmap_provider_google::GoogleConfig;

const ENV_API_KEY: &str = "GOOGLE_MAPS_API_KEY";
const ENV_LOCALITY: &str = "GEOCODE_LOCALITY";
const ENV_FALLBACK_LAT: &str = "GEOCODE_FALLBACK_LAT";
const ENV_FALLBACK_LNG: &str = "GEOCODE_FALLBACK_LNG";
const ENV_TIMEOUT_SECS: &str = "GEOCODE_TIMEOUT_SECS";
const ENV_BASE_URL: &str = "GEOCODE_BASE_URL";

#[derive(Debug, Clone, Default)]
pub(crate) struct Cfg {
    pub(crate) google: GoogleConfig,
    pub(crate) resolver: ResolverSettings,
}

impl Cfg {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        match lookup(ENV_API_KEY).filter(|key| !key.trim().is_empty()) {
            Some(key) => cfg.google.api_key = Some(key),
            None => log::warn!("No Google Maps API key found ({ENV_API_KEY})"),
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            cfg.google.base_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid {ENV_TIMEOUT_SECS}: {secs:?}"))?;
            ensure!(secs > 0, "Invalid {ENV_TIMEOUT_SECS}: must be at least 1 second");
            cfg.google.timeout = Duration::from_secs(secs);
        }

        if let Some(locality) = lookup(ENV_LOCALITY) {
            let locality = locality.trim();
            cfg.resolver.locality = (!locality.is_empty()).then(|| locality.to_owned());
        }
        let latitude = parse_degrees(&lookup, ENV_FALLBACK_LAT)?;
        let longitude = parse_degrees(&lookup, ENV_FALLBACK_LNG)?;
        cfg.resolver.fallback = Coordinate::new(
            latitude.unwrap_or(DEFAULT_FALLBACK.latitude),
            longitude.unwrap_or(DEFAULT_FALLBACK.longitude),
        );

        Ok(cfg)
    }
}

fn parse_degrees<F>(lookup: &F, name: &str) -> Result<Option<f64>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|degrees| degrees.is_finite())
                .with_context(|| format!("Invalid {name}: {raw:?}"))
        })
        .transpose()
}
