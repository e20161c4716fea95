use crate::config::{validate_provider, DEFAULT_MANIFEST_PATH};
use crate::core::ConfigProvider;
use crate::utils::error::{InventoryError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub repository_url: String,
    pub destination: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            manifest_path: default_manifest_path(),
        }
    }
}

fn default_manifest_path() -> String {
    DEFAULT_MANIFEST_PATH.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub api_endpoint: String,
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(InventoryError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| InventoryError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_TOKEN})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| {
            InventoryError::ConfigError {
                message: format!("invalid substitution pattern: {}", e),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().is_some_and(|m| m.enabled)
    }

    /// 檔案沒有可用的 token 時改用 `--api-token` / `API_TOKEN`
    pub fn with_fallback_token(mut self, token: Option<String>) -> Self {
        if self.api_token().is_none() {
            if let Some(token) = token.filter(|t| !t.is_empty()) {
                self.load.api_token = Some(token);
            }
        }
        self
    }
}

impl ConfigProvider for TomlConfig {
    fn repository_url(&self) -> &str {
        &self.source.repository_url
    }

    fn destination(&self) -> &str {
        &self.source.destination
    }

    fn manifest_path(&self) -> &str {
        &self.extract.manifest_path
    }

    fn api_endpoint(&self) -> &str {
        &self.load.api_endpoint
    }

    /// An unresolved `${VAR}` counts as no token at all.
    fn api_token(&self) -> Option<&str> {
        self.load
            .api_token
            .as_deref()
            .filter(|token| !token.is_empty() && !token.contains("${"))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
