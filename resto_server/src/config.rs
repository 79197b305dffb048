use std::env;

use log::*;
use midtrans_tools::MidtransConfig;
use resto_common::{parse_boolean_flag, parse_env_value, Secret};

use crate::errors::ServerError;

const DEFAULT_RESTO_HOST: &str = "127.0.0.1";
const DEFAULT_RESTO_PORT: u16 = 8360;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/resto_store.db";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 25;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub auth: BasicAuthConfig,
    /// If true, the status a client declares for a new non-cash transaction is stored as-is. Otherwise non-cash
    /// transactions always start out as pending and only the gateway notification moves them on.
    pub trust_client_status: bool,
    pub midtrans: MidtransConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RESTO_HOST.to_string(),
            port: DEFAULT_RESTO_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            auth: BasicAuthConfig::default(),
            trust_client_status: true,
            midtrans: MidtransConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("RESTO_HOST").ok().unwrap_or_else(|| DEFAULT_RESTO_HOST.into());
        let port = match parse_env_value::<u16>(env::var("RESTO_PORT").ok()) {
            Some(Ok(p)) => p,
            Some(Err(s)) => {
                error!("🪛️ {s} is not a valid port for RESTO_PORT. Using the default, {DEFAULT_RESTO_PORT}, instead.");
                DEFAULT_RESTO_PORT
            },
            None => DEFAULT_RESTO_PORT,
        };
        let database_url = env::var("RESTO_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ RESTO_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let max_connections = match parse_env_value::<u32>(env::var("RESTO_DB_MAX_CONNECTIONS").ok()) {
            Some(Ok(n)) if n > 0 => n,
            Some(_) => {
                warn!(
                    "🪛️ Invalid value for RESTO_DB_MAX_CONNECTIONS. Using the default, {DEFAULT_DB_MAX_CONNECTIONS}, \
                     instead."
                );
                DEFAULT_DB_MAX_CONNECTIONS
            },
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };
        let auth = BasicAuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🚨️🚨️🚨️ Could not load the basic auth credentials from environment variables. {e}. All protected \
                 routes will refuse every request until they are set. 🚨️🚨️🚨️"
            );
            BasicAuthConfig::default()
        });
        let trust_client_status = parse_boolean_flag(env::var("RESTO_TRUST_CLIENT_STATUS").ok(), true);
        if !trust_client_status {
            info!("🪛️ Client-declared transaction statuses are ignored. Non-cash transactions start out pending.");
        }
        let midtrans = MidtransConfig::new_from_env_or_default();
        Self { host, port, database_url, max_connections, auth, trust_client_status, midtrans }
    }
}

//-------------------------------------------------  BasicAuthConfig  --------------------------------------------------
/// The single set of credentials that grants access to the protected routes.
#[derive(Clone, Debug, Default)]
pub struct BasicAuthConfig {
    pub username: String,
    pub password: Secret<String>,
}

impl BasicAuthConfig {
    pub fn new(username: &str, password: &str) -> Self {
        Self { username: username.to_string(), password: Secret::new(password.to_string()) }
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let username = env::var("RESTO_BASIC_AUTH_USERNAME")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [RESTO_BASIC_AUTH_USERNAME]")))?;
        let password = env::var("RESTO_BASIC_AUTH_PASSWORD")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [RESTO_BASIC_AUTH_PASSWORD]")))?;
        let config = Self::new(&username, &password);
        if config.is_configured() {
            Ok(config)
        } else {
            Err(ServerError::ConfigurationError("The basic auth username and password may not be empty".into()))
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    /// Unconfigured credentials never match anything.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.is_configured() && self.username == username && self.password.reveal() == password
    }
}
