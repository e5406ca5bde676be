use std::sync::Arc;

use anyhow::Context;
use lectern_api::HttpEntityService;
use lectern_auth::CredentialStore;
use lectern_config::LecternConfig;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: LecternConfig,
    pub credentials: Arc<CredentialStore>,
    service: Option<HttpEntityService>,
}

impl AppContext {
    /// Load stored credentials and, when an API base URL is configured, build
    /// the HTTP client. Auth commands work without one.
    pub fn init(config: LecternConfig) -> anyhow::Result<Self> {
        let credentials =
            Arc::new(CredentialStore::load_default().context("failed to load stored credentials")?);

        let service = if config.api.is_configured() {
            Some(
                HttpEntityService::new(&config.api, Arc::clone(&credentials))
                    .context("failed to build API client")?,
            )
        } else {
            tracing::debug!("api.base_url not set; backend commands are unavailable");
            None
        };

        Ok(Self {
            config,
            credentials,
            service,
        })
    }

    /// The backend client, or the configuration error explaining why there is none.
    pub fn service(&self) -> anyhow::Result<&HttpEntityService> {
        match &self.service {
            Some(service) => Ok(service),
            None => {
                self.config.require_api()?;
                anyhow::bail!("API client is not initialized")
            }
        }
    }
}
