//! Azure OpenAI connection settings, read from the environment.

/// Fixed `api-version` query parameter.
pub const AZURE_API_VERSION: &str = "2024-02-15-preview";

const ENV_API_KEY: &str = "AZURE_OPENAI_API_KEY";
const ENV_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
const ENV_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT_NAME";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
}

/// Endpoint, key and deployment for the upstream completion API. No defaults.
#[derive(Clone)]
pub struct AzureSettings {
    pub api_key: String,
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: String,
    /// Deployment name; also sent as the model id.
    pub deployment: String,
    pub api_version: String,
}

impl std::fmt::Debug for AzureSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureSettings")
            .field("api_key", &"***")
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl AzureSettings {
    /// Reads `AZURE_OPENAI_API_KEY`, `AZURE_OPENAI_ENDPOINT` and
    /// `AZURE_OPENAI_DEPLOYMENT_NAME`. A missing or empty variable is an error.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(SettingsError::Missing(key))
        };
        Ok(Self {
            api_key: get(ENV_API_KEY)?,
            endpoint: get(ENV_ENDPOINT)?.trim_end_matches('/').to_string(),
            deployment: get(ENV_DEPLOYMENT)?,
            api_version: AZURE_API_VERSION.to_string(),
        })
    }
}
