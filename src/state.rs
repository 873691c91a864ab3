use crate::auth::{repo::UserStore, services::IdentityService};
use crate::config::{AppConfig, MockConfig};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub identity: Arc<IdentityService>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: AppConfig) -> Self {
        let identity = Arc::new(IdentityService::new(
            UserStore::seeded(),
            config.mock.clone(),
        ));
        Self {
            config: Arc::new(config),
            identity,
        }
    }

    /// Seeded state with no latency and no random failures.
    pub fn fake() -> Self {
        Self::from_config(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            mock: MockConfig {
                login_delay: std::time::Duration::ZERO,
                register_delay: std::time::Duration::ZERO,
                refresh_failure_rate: 0.0,
                refresh_failure_seed: Some(0),
                ..MockConfig::default()
            },
        })
    }
}
