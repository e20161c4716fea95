pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_relative_path, validate_url, Validate,
};

pub const DEFAULT_REPOSITORY_URL: &str = "https://github.com/WebGoat/WebGoat";
pub const DEFAULT_DESTINATION: &str = "webgoat-master";
pub const DEFAULT_MANIFEST_PATH: &str = "pom.xml";
pub const DEFAULT_API_ENDPOINT: &str = "https://api.dusti.co/v1/packages";
pub const API_TOKEN_ENV: &str = "API_TOKEN";

/// Shared checks for every configuration source.
pub(crate) fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_non_empty_string("repository_url", config.repository_url())?;
    validate_path("destination", config.destination())?;
    validate_relative_path("manifest_path", config.manifest_path())?;
    validate_url("api_endpoint", config.api_endpoint())?;
    Ok(())
}

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use super::*;
    use clap::Parser;
    use std::fmt;
    use std::path::PathBuf;

    #[derive(Clone, Parser)]
    #[command(name = "pom-inventory")]
    #[command(
        about = "Clone a repository, read the dependencies from its pom.xml and report them to an inventory API"
    )]
    pub struct CliConfig {
        #[arg(long, default_value = DEFAULT_REPOSITORY_URL)]
        pub repository_url: String,

        #[arg(long, default_value = DEFAULT_DESTINATION)]
        pub destination: String,

        #[arg(long, default_value = DEFAULT_MANIFEST_PATH)]
        pub manifest_path: String,

        #[arg(long, default_value = DEFAULT_API_ENDPOINT)]
        pub api_endpoint: String,

        #[arg(long, env = API_TOKEN_ENV, hide_env_values = true)]
        pub api_token: Option<String>,

        #[arg(long, help = "Load settings from a TOML file instead of the flags above")]
        pub config: Option<PathBuf>,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log CPU and memory usage per phase")]
        pub monitor: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,
    }

    // token 不可出現在日誌中
    impl fmt::Debug for CliConfig {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("CliConfig")
                .field("repository_url", &self.repository_url)
                .field("destination", &self.destination)
                .field("manifest_path", &self.manifest_path)
                .field("api_endpoint", &self.api_endpoint)
                .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
                .field("config", &self.config)
                .field("verbose", &self.verbose)
                .field("monitor", &self.monitor)
                .field("json_logs", &self.json_logs)
                .finish()
        }
    }

    impl ConfigProvider for CliConfig {
        fn repository_url(&self) -> &str {
            &self.repository_url
        }

        fn destination(&self) -> &str {
            &self.destination
        }

        fn manifest_path(&self) -> &str {
            &self.manifest_path
        }

        fn api_endpoint(&self) -> &str {
            &self.api_endpoint
        }

        fn api_token(&self) -> Option<&str> {
            self.api_token.as_deref().filter(|token| !token.is_empty())
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_provider(self)
        }
    }

}
