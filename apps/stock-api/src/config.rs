//! Configuration for Stock API

use core_config::{AppInfo, FromEnv, app_info, env_parse, server::ServerConfig};
use domain_stock::UnknownMovementPolicy;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    /// STOCK_UNKNOWN_MOVEMENT: `reject` (default) or `ignore`
    pub unknown_movement: UnknownMovementPolicy,
    /// SEED_DEMO_DATA: start with the demo catalog and stock records
    pub seed_demo_data: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let unknown_movement = env_parse("STOCK_UNKNOWN_MOVEMENT", UnknownMovementPolicy::Reject)?;
        let seed_demo_data = env_parse("SEED_DEMO_DATA", false)?;

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            unknown_movement,
            seed_demo_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 4] = ["APP_ENV", "PORT", "STOCK_UNKNOWN_MOVEMENT", "SEED_DEMO_DATA"];

    #[test]
    fn test_defaults() {
        temp_env::with_vars_unset(KEYS, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.environment, Environment::Development);
            assert_eq!(config.unknown_movement, UnknownMovementPolicy::Reject);
            assert!(!config.seed_demo_data);
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.app.name, "stock_api");
        });
    }

    #[test]
    fn test_overrides() {
        temp_env::with_vars(
            [
                ("APP_ENV", Some("production")),
                ("PORT", Some("9090")),
                ("STOCK_UNKNOWN_MOVEMENT", Some("Ignore")),
                ("SEED_DEMO_DATA", Some("true")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert!(config.environment.is_production());
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.unknown_movement, UnknownMovementPolicy::Ignore);
                assert!(config.seed_demo_data);
            },
        );
    }

    #[test]
    fn test_invalid_policy_fails() {
        temp_env::with_var("STOCK_UNKNOWN_MOVEMENT", Some("shrug"), || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("STOCK_UNKNOWN_MOVEMENT"));
        });
    }
}
