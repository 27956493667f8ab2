//! Configuration.
//!
//! Read from `<config dir>/recede/config.toml`. Every section is
//! `#[serde(default)]`, so a partial file only overrides what it names.
//!
//! The `[overlay]` section can extend the built-in overlays: `languages`
//! maps a language to a rule set name, `rule_sets` defines named rule sets
//! as lists of `{ pattern, style? }`. Both are validated when the registry
//! is built, not when a buffer is looked up.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use recede_syntax::{
    DEEMPHASIS_STYLE, FeatureName, LanguageId, OVERLAY_FEATURE, OverlayRegistry, RuleEntry,
    RuleTable, Style, SyntaxError, tables,
};

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Host highlighting settings
    pub highlight: HighlightConfig,

    /// Overlay settings
    pub overlay: OverlayConfig,
}

impl Config {
    /// Loads config from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::load_from_default_path() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default config: {}", e);
                Self::default()
            }
        }
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads from the default config path.
    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("recede").join("config.toml"))
    }

    /// Saves the config to a file, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Saves the config to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path()?)
    }
}

/// Host highlighting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Number of feature tiers enabled
    pub level: usize,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self { level: 3 }
    }
}

/// Overlay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Feature name the overlay rules are tagged with
    pub feature: String,

    /// Style for entries that do not name one
    pub default_style: String,

    /// Status-line indicator while the overlay is on
    pub lighter: String,

    /// Turn the overlay on for every newly opened document
    pub enable_by_default: bool,

    /// Language → rule set name, on top of the built-in map
    pub languages: BTreeMap<String, String>,

    /// Named rule sets, on top of (or replacing) the built-in ones
    pub rule_sets: BTreeMap<String, Vec<RuleEntry>>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            feature: OVERLAY_FEATURE.to_string(),
            default_style: DEEMPHASIS_STYLE.to_string(),
            lighter: " Recede".to_string(),
            enable_by_default: false,
            languages: BTreeMap::new(),
            rule_sets: BTreeMap::new(),
        }
    }
}

impl OverlayConfig {
    /// Compiles the overlay registry: built-in tables and mapping, extended
    /// by `rule_sets` and `languages`.
    pub fn build_registry(&self) -> Result<OverlayRegistry, ConfigError> {
        let mut named: HashMap<String, RuleTable> = tables::overlay_tables()
            .into_iter()
            .map(|table| (table.name.clone(), table))
            .collect();
        for (name, entries) in &self.rule_sets {
            named.insert(name.clone(), RuleTable::new(name.clone(), entries.clone()));
        }

        let mut mapping: BTreeMap<LanguageId, String> = tables::overlay_language_map()
            .into_iter()
            .map(|(lang, name)| (lang, name.to_string()))
            .collect();
        for (lang, name) in &self.languages {
            let language =
                LanguageId::from_name(lang).ok_or_else(|| ConfigError::UnknownLanguage(lang.clone()))?;
            mapping.insert(language, name.clone());
        }

        let pairs = mapping
            .iter()
            .map(|(language, name)| {
                named
                    .get(name)
                    .map(|table| (*language, table))
                    .ok_or_else(|| ConfigError::UnknownRuleSet {
                        language: *language,
                        name: name.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OverlayRegistry::from_tables(
            pairs,
            &FeatureName::new(&self.feature),
            &Style::new(&self.default_style),
        )?)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown language in overlay.languages: {0}")]
    UnknownLanguage(String),

    #[error("No rule set named '{name}' (mapped from {language})")]
    UnknownRuleSet { language: LanguageId, name: String },

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.highlight.level, 3);
        assert_eq!(config.overlay.feature, "recede");
        assert_eq!(config.overlay.default_style, "deemphasis");
        assert!(!config.overlay.enable_by_default);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str("[overlay]\nlighter = \" R\"\n").unwrap();
        assert_eq!(config.overlay.lighter, " R");
        assert_eq!(config.overlay.feature, "recede");
        assert_eq!(config.highlight.level, 3);
    }

    #[test]
    fn test_default_registry_is_builtin() {
        let registry = Config::default().overlay.build_registry().unwrap();
        assert_eq!(registry.languages(), OverlayRegistry::builtin().unwrap().languages());
    }

    #[test]
    fn test_user_rule_set_extends_registry() {
        let config: Config = toml::from_str(
            r#"
            [overlay]
            default_style = "muted"

            [overlay.languages]
            python = "python-quiet"

            [[overlay.rule_sets.python-quiet]]
            pattern = '["def" "class" "import" "from" "return"]'

            [[overlay.rule_sets.python-quiet]]
            pattern = "(comment)"
            style = "comment"
            "#,
        )
        .unwrap();

        let registry = config.overlay.build_registry().unwrap();
        let python = registry.lookup(LanguageId::Python).unwrap();

        assert_eq!(python.len(), 2);
        assert_eq!(python.get(0).unwrap().style().as_str(), "muted");
        assert_eq!(python.get(1).unwrap().style().as_str(), "comment");
        assert!(registry.lookup(LanguageId::Rust).is_some());
    }

    #[test]
    fn test_user_rule_set_replaces_builtin() {
        let mut config = Config::default();
        config
            .overlay
            .rule_sets
            .insert("json".to_string(), vec![RuleEntry::new("\",\"")]);

        let registry = config.overlay.build_registry().unwrap();
        assert_eq!(registry.lookup(LanguageId::Json).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_language_rejected() {
        let mut config = Config::default();
        config
            .overlay
            .languages
            .insert("cobol".to_string(), "rust".to_string());

        assert!(matches!(
            config.overlay.build_registry(),
            Err(ConfigError::UnknownLanguage(name)) if name == "cobol"
        ));
    }

    #[test]
    fn test_unknown_rule_set_rejected() {
        let mut config = Config::default();
        config
            .overlay
            .languages
            .insert("python".to_string(), "missing".to_string());

        assert!(matches!(
            config.overlay.build_registry(),
            Err(ConfigError::UnknownRuleSet { language: LanguageId::Python, .. })
        ));
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let mut config = Config::default();
        config
            .overlay
            .rule_sets
            .insert("rust".to_string(), vec![RuleEntry::new("(((")]);

        assert!(matches!(
            config.overlay.build_registry(),
            Err(ConfigError::Syntax(SyntaxError::InvalidPattern { .. }))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.highlight.level = 2;
        config
            .overlay
            .rule_sets
            .insert("quiet".to_string(), vec![RuleEntry::styled("(comment)", "comment")]);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.highlight.level, 2);
        assert_eq!(
            loaded.overlay.rule_sets["quiet"],
            vec![RuleEntry::styled("(comment)", "comment")]
        );
    }
}
