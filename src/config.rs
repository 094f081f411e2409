//! Configuration management for the annotation engine

use serde::Deserialize;
use std::env;

use crate::markers::MarkerConfig;
use crate::typography::{ToggleState, TypographyConfig, DEFAULT_FORMULAS};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Run the typographic text decorations after markers are placed
    pub typography: bool,
    /// State of collapse handles after loading
    pub toggle_state: ToggleState,
    /// Icon shown in the link to the law's official source
    pub law_link_icon: String,
    /// Class of the span wrapping whole-article deletions
    pub art_deletion_class: String,
    pub chemical_formulas: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber` filter directive
    pub filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            engine: EngineConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            typography: true,
            toggle_state: ToggleState::Open,
            law_link_icon: "/static/core/img/parliament-tiny.png".to_string(),
            art_deletion_class: "art-deletion".to_string(),
            chemical_formulas: DEFAULT_FORMULAS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "lagasafn_annotate=info".to_string(),
        }
    }
}

impl Config {
    /// Read configuration from `ANNOTATE_*` variables and `RUST_LOG`,
    /// falling back to defaults per field
    pub fn from_env() -> Self {
        let defaults = EngineConfig::default();
        Config {
            engine: EngineConfig {
                typography: env::var("ANNOTATE_TYPOGRAPHY")
                    .map(|v| parse_flag(&v))
                    .unwrap_or(defaults.typography),
                toggle_state: env::var("ANNOTATE_TOGGLE_STATE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.toggle_state),
                law_link_icon: env::var("ANNOTATE_LAW_LINK_ICON").unwrap_or(defaults.law_link_icon),
                art_deletion_class: env::var("ANNOTATE_ART_DELETION_CLASS")
                    .unwrap_or(defaults.art_deletion_class),
                chemical_formulas: env::var("ANNOTATE_CHEMICAL_FORMULAS")
                    .map(|v| split_list(&v))
                    .unwrap_or(defaults.chemical_formulas),
            },
            logging: LoggingConfig {
                filter: env::var("RUST_LOG").unwrap_or_else(|_| LoggingConfig::default().filter),
            },
        }
    }

    /// Parse configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl EngineConfig {
    pub fn markers(&self) -> MarkerConfig {
        MarkerConfig {
            art_deletion_class: self.art_deletion_class.clone(),
        }
    }

    pub fn typography(&self) -> TypographyConfig {
        TypographyConfig {
            enabled: self.typography,
            chemical_formulas: self.chemical_formulas.clone(),
            toggle_state: self.toggle_state,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.engine.typography);
        assert_eq!(config.engine.toggle_state, ToggleState::Open);
        assert_eq!(config.engine.art_deletion_class, "art-deletion");
        assert_eq!(config.logging.filter, "lagasafn_annotate=info");
    }

    #[test]
    fn test_from_json_partial() {
        let config = Config::from_json(
            r#"{"engine": {"toggle_state": "closed", "chemical_formulas": ["CO2"]}}"#,
        )
        .unwrap();
        assert_eq!(config.engine.toggle_state, ToggleState::Closed);
        assert_eq!(config.engine.chemical_formulas, vec!["CO2".to_string()]);
        assert!(config.engine.typography);
        assert_eq!(config.logging.filter, "lagasafn_annotate=info");
    }

    #[test]
    fn test_flag_and_list_parsing() {
        assert!(!parse_flag("off"));
        assert!(!parse_flag(" False "));
        assert!(parse_flag("1"));
        assert_eq!(split_list("CO2, SO2,,"), vec!["CO2", "SO2"]);
    }
}
