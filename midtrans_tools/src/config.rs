use std::time::Duration;

use log::*;
use resto_common::{parse_boolean_flag, parse_env_value, Secret};

pub const PRODUCTION_BASE_URL: &str = "https://api.midtrans.com";
pub const SANDBOX_BASE_URL: &str = "https://api.sandbox.midtrans.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct MidtransConfig {
    pub server_key: Secret<String>,
    pub is_production: bool,
    /// Replaces the production/sandbox host. Only useful for pointing the client at a local stub.
    pub base_url_override: Option<String>,
    pub timeout: Duration,
}

impl Default for MidtransConfig {
    fn default() -> Self {
        Self {
            server_key: Secret::default(),
            is_production: false,
            base_url_override: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl MidtransConfig {
    pub fn new(server_key: impl Into<String>, is_production: bool) -> Self {
        Self { server_key: Secret::new(server_key.into()), is_production, ..Default::default() }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url_override = Some(url.into());
        self
    }

    pub fn new_from_env_or_default() -> Self {
        let server_key = Secret::new(std::env::var("RESTO_MIDTRANS_SERVER_KEY").unwrap_or_else(|_| {
            warn!("RESTO_MIDTRANS_SERVER_KEY not set. Payment charges will fail until it is configured.");
            String::default()
        }));
        let is_production = parse_boolean_flag(std::env::var("RESTO_MIDTRANS_IS_PRODUCTION").ok(), false);
        if is_production {
            info!("💳️ Midtrans is in PRODUCTION mode. Charges move real money.");
        } else {
            info!("💳️ Midtrans is in sandbox mode.");
        }
        let base_url_override = std::env::var("RESTO_MIDTRANS_BASE_URL").ok().filter(|s| !s.trim().is_empty());
        if let Some(url) = &base_url_override {
            warn!("💳️ RESTO_MIDTRANS_BASE_URL is set. All charges will be sent to {url}");
        }
        let timeout = match parse_env_value::<u64>(std::env::var("RESTO_MIDTRANS_TIMEOUT_SECS").ok()) {
            Some(Ok(secs)) => Duration::from_secs(secs),
            Some(Err(s)) => {
                warn!("🪛️ Invalid RESTO_MIDTRANS_TIMEOUT_SECS value '{s}'. Using {DEFAULT_TIMEOUT_SECS}s instead.");
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        Self { server_key, is_production, base_url_override, timeout }
    }

    pub fn base_url(&self) -> &str {
        match (&self.base_url_override, self.is_production) {
            (Some(url), _) => url.trim_end_matches('/'),
            (None, true) => PRODUCTION_BASE_URL,
            (None, false) => SANDBOX_BASE_URL,
        }
    }
}
