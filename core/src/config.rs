//! Connection settings for hosts that configure the service outside the
//! workflow, from the environment or a TOML file.
//!
//! Sources, lowest to highest precedence:
//! 1. the TOML file named by `MAXIMO_CONFIG`, if set
//! 2. `MAXIMO_*` environment variables (`MAXIMO_URL`, `MAXIMO_API_KEY`, ...)

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::activities::CreateMaximoServiceInputs;
use crate::error::MaximoError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

impl ServiceConfig {
    pub fn load() -> Result<Self, MaximoError> {
        Self::figment()
            .extract()
            .map_err(|e| MaximoError::Config(format!("invalid Maximo configuration: {e}")))
    }

    pub fn figment() -> Figment {
        let mut figment = Figment::new();
        if let Ok(path) = std::env::var("MAXIMO_CONFIG") {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed("MAXIMO_").ignore(&["CONFIG"]))
    }

    /// Inputs for `CreateMaximoService` equivalent to this configuration.
    pub fn to_inputs(&self) -> CreateMaximoServiceInputs {
        CreateMaximoServiceInputs {
            url: self.url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            api_key: self.api_key.clone(),
            context: self.context.clone(),
        }
    }
}
