pub mod capture;
pub mod fetch;

use anyhow::Result;
use streetlens_core::ClientConfig;

/// Backend origin from the flag, else the environment, else the default.
pub(crate) fn client_config(api_url: Option<String>) -> Result<ClientConfig> {
    let config = match api_url {
        Some(url) => ClientConfig::new(&url)?,
        None => ClientConfig::from_env()?,
    };
    Ok(config)
}
