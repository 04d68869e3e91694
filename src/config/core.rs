use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};
use std::path::Path;

use super::{ConfigOverrides, RunConfiguration, smart_load};

// Embed the default config at compile time
pub(super) const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

const ENV_PREFIX: &str = "TIDYRUN_";

impl RunConfiguration {
    /// Load the merged configuration.
    ///
    /// Priority, lowest first: embedded defaults, user config, repository
    /// config (or only `custom_config` when given), `TIDYRUN_*` environment
    /// variables, then `overrides` from the command line.
    pub fn load(custom_config: Option<&Path>, overrides: Option<&ConfigOverrides>) -> Result<Self> {
        let figment = Self::figment(custom_config, overrides);

        let config: RunConfiguration = figment
            .extract()
            .context("Failed to load configuration")?;
        config.validate()?;

        tracing::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Build the layered provider stack without extracting it.
    pub fn figment(custom_config: Option<&Path>, overrides: Option<&ConfigOverrides>) -> Figment {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(custom_path) = custom_config {
            tracing::debug!("Using custom config file: {}", custom_path.display());
            figment = figment.merge(smart_load::auto(custom_path));
        } else {
            let user_config = Self::user_config_path();
            figment = figment
                // User config - support multiple formats
                .merge(Toml::file(&user_config))
                .merge(Json::file(user_config.replace(".toml", ".json")))
                .merge(Yaml::file(user_config.replace(".toml", ".yaml")))
                .merge(Yaml::file(user_config.replace(".toml", ".yml")))
                // Repository config - support multiple formats
                .merge(Toml::file("tidyrun.toml"))
                .merge(Json::file("tidyrun.json"))
                .merge(Yaml::file("tidyrun.yaml"))
                .merge(Yaml::file("tidyrun.yml"));
        }

        // Environment variables override every file
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        // Command-line flags win over everything
        if let Some(overrides) = overrides {
            figment = figment.merge(Serialized::defaults(overrides));
        }

        figment
    }

    fn user_config_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{home}/.config/tidyrun/config.toml"),
            Err(_) => "~/.config/tidyrun/config.toml".to_string(),
        }
    }
}
