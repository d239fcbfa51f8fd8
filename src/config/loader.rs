//! Configuration loader: merges defaults, an optional file, then
//! environment variables.

use super::{models::*, validation, ConfigError, Result, DEFAULT_CONFIG_FILES, ENV_PREFIX};
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use figment::Figment;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ConfigLoader {
    figment: Figment,
}

impl ConfigLoader {
    pub fn new() -> Self {
        let figment = Figment::new().merge(Serialized::defaults(DatabayesConfig::default()));
        Self { figment }
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileLoadError(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => {
                self.figment = std::mem::take(&mut self.figment).merge(Toml::file(path));
            }
            Some("yaml") | Some("yml") => {
                self.figment = std::mem::take(&mut self.figment).merge(Yaml::file(path));
            }
            Some("json") => {
                self.figment = std::mem::take(&mut self.figment).merge(Json::file(path));
            }
            _ => {
                return Err(ConfigError::FileLoadError(format!(
                    "unsupported file format: {}",
                    path.display()
                )));
            }
        }

        Ok(self)
    }

    /// Try each well-known config file name, then the OS's XDG-style
    /// project config directory. Stops at the first one found.
    pub fn load_default_files(&mut self) -> &mut Self {
        for file in DEFAULT_CONFIG_FILES {
            let path = PathBuf::from(file);
            if path.exists() && self.load_file(&path).is_ok() {
                return self;
            }
        }

        if let Some(proj_dirs) = directories::ProjectDirs::from("io", "databayes", "databayes") {
            let config_dir = proj_dirs.config_dir();
            for ext in &["toml", "yaml", "yml", "json"] {
                let path = config_dir.join(format!("config.{}", ext));
                if path.exists() && self.load_file(&path).is_ok() {
                    return self;
                }
            }
        }

        self
    }

    pub fn load_env(&mut self) -> &mut Self {
        self.figment = std::mem::take(&mut self.figment).merge(Env::prefixed(ENV_PREFIX).ignore(&["_"]));
        self
    }

    pub fn merge<T: figment::Provider>(&mut self, provider: T) -> &mut Self {
        self.figment = std::mem::take(&mut self.figment).merge(provider);
        self
    }

    pub fn extract(&self) -> Result<DatabayesConfig> {
        let config: DatabayesConfig = self
            .figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        validation::validate_config(&config)?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
