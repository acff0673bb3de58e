use serde::{Deserialize, Serialize};

use crate::currency::LocaleConfig;
use crate::domain::CategoryCatalog;

/// Stores presentation preferences and the category catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub locale: LocaleConfig,
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub categories: CategoryCatalog,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: LocaleConfig::default(),
            currency: Self::default_currency(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            categories: CategoryCatalog::builtin(),
        }
    }
}

impl Config {
    pub fn default_currency() -> String {
        "USD".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Applies a `key value` pair coming from the shell.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "currency" => {
                let code = value.trim().to_ascii_uppercase();
                if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(format!("`{}` is not a three-letter currency code", value));
                }
                self.currency = code;
            }
            "locale" => self.locale.language_tag = value.trim().to_string(),
            "color" => {
                self.ui_color_enabled = match value.trim().to_ascii_lowercase().as_str() {
                    "on" | "true" | "yes" => true,
                    "off" | "false" | "no" => false,
                    other => return Err(format!("expected on/off, got `{}`", other)),
                }
            }
            other => return Err(format!("unknown setting `{}`", other)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"currency":"EUR"}"#).unwrap();
        assert_eq!(config.currency, "EUR");
        assert!(config.ui_color_enabled);
        assert_eq!(config.categories, CategoryCatalog::builtin());
    }

    #[test]
    fn set_validates_values() {
        let mut config = Config::default();
        config.set("currency", "eur").unwrap();
        assert_eq!(config.currency, "EUR");
        assert!(config.set("currency", "euro").is_err());
        config.set("color", "off").unwrap();
        assert!(!config.ui_color_enabled);
        assert!(config.set("theme", "dark").is_err());
    }
}
