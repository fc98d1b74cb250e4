use core_config::FromEnv;
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Demo configuration
///
/// Every setting has a default, so the demo runs against a local server
/// with no environment set.
#[derive(Clone, Debug)]
pub struct Config {
    pub mongodb: MongoConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?.with_app_name(env!("CARGO_PKG_NAME"));

        Ok(Self {
            mongodb,
            environment,
        })
    }
}
