use crate::constants;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub references: ReferencesConfig,
    #[serde(default)]
    pub selector: SelectorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferencesConfig {
    #[serde(default = "default_marker")]
    pub marker: String,
    #[serde(default = "default_link_class")]
    pub link_class: String,
    #[serde(default = "default_skip_elements")]
    pub skip_elements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    /// Maximum rendered entries; 0 keeps every match.
    #[serde(default)]
    pub max_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_marker() -> String {
    constants::DEFAULT_REFERENCE_MARKER.to_string()
}
fn default_link_class() -> String {
    constants::DEFAULT_LINK_CLASS.into()
}
fn default_skip_elements() -> Vec<String> {
    constants::DEFAULT_SKIP_ELEMENTS
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_min_score() -> f64 {
    constants::DEFAULT_MIN_SCORE
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for ReferencesConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            link_class: default_link_class(),
            skip_elements: default_skip_elements(),
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            max_entries: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ReferencesConfig {
    /// The marker as a single character. Only valid after [`Config::load`]
    /// or [`ReferencesConfig::validate`] succeeded.
    pub fn marker_char(&self) -> char {
        self.marker
            .chars()
            .next()
            .unwrap_or(constants::DEFAULT_REFERENCE_MARKER)
    }

    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let mut chars = self.marker.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_alphanumeric() && !c.is_whitespace() && c != '<' => {}
            _ => {
                return Err(ConfigError::InvalidValue {
                    field: "references.marker".into(),
                    reason: format!(
                        "expected a single punctuation character, got {:?}",
                        self.marker
                    ),
                });
            }
        }
        if self.link_class.trim().is_empty() {
            self.link_class = default_link_class();
        }
        self.skip_elements = self
            .skip_elements
            .iter()
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Ok(())
    }
}

impl SelectorConfig {
    fn normalize(&mut self) {
        if !self.min_score.is_finite() || self.min_score < 0.0 {
            self.min_score = 0.0;
        } else if self.min_score >= 1.0 {
            // Exact matches score 1.0 and must always survive the filter.
            self.min_score = 0.99;
        }
    }
}

impl Config {
    /// Load configuration with layered precedence:
    /// 1. Environment variables (`FORGEVIEW_<SECTION>_<KEY>`, highest priority)
    /// 2. Explicit config file (from `--config` flag)
    /// 3. Project config: `<root>/.forgeview/config.toml`
    /// 4. Global config: `~/.forgeview/config.toml`
    /// 5. Built-in defaults (lowest priority)
    ///
    /// Only fields explicitly set in a higher-priority file override lower layers.
    pub fn load(root: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_file(root, None)
    }

    pub fn load_with_file(
        root: Option<&Path>,
        config_file: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let global = dirs::home_dir()
            .map(|home| home.join(constants::DEFAULT_DATA_DIR).join("config.toml"));
        Self::load_layers(global.as_deref(), root, config_file)
    }

    fn load_layers(
        global_path: Option<&Path>,
        root: Option<&Path>,
        config_file: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut merged = toml::Value::Table(toml::map::Map::new());

        if let Some(global_path) = global_path
            && global_path.exists()
        {
            let raw = load_toml_value(global_path)?;
            merge_toml_values(&mut merged, &raw);
        }

        if let Some(root) = root {
            let project_path = root.join(constants::PROJECT_CONFIG_FILE);
            if project_path.exists() {
                let raw = load_toml_value(&project_path)?;
                merge_toml_values(&mut merged, &raw);
            }
        }

        if let Some(cf) = config_file {
            if !cf.exists() {
                return Err(ConfigError::NotFound {
                    path: cf.display().to_string(),
                });
            }
            let raw = load_toml_value(cf)?;
            merge_toml_values(&mut merged, &raw);
        }

        let config_str =
            toml::to_string(&merged).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        let mut config: Config =
            toml::from_str(&config_str).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        apply_env_overrides(&mut config);

        config.references.validate()?;
        config.selector.normalize();
        Ok(config)
    }
}

fn load_toml_value(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    content
        .parse::<toml::Value>()
        .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
}

/// Deep-merge `overlay` into `base`. Only keys present in `overlay` are written.
fn merge_toml_values(base: &mut toml::Value, overlay: &toml::Value) {
    if let (toml::Value::Table(base_map), toml::Value::Table(overlay_map)) = (base, overlay) {
        for (key, overlay_val) in overlay_map {
            if let Some(base_val) = base_map.get_mut(key) {
                if base_val.is_table() && overlay_val.is_table() {
                    merge_toml_values(base_val, overlay_val);
                } else {
                    *base_val = overlay_val.clone();
                }
            } else {
                base_map.insert(key.clone(), overlay_val.clone());
            }
        }
    }
}

fn apply_env_overrides(config: &mut Config) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

/// Convention: `FORGEVIEW_<SECTION>_<KEY>` in UPPER_SNAKE_CASE.
fn apply_overrides_from(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("FORGEVIEW_REFERENCES_MARKER") {
        config.references.marker = v;
    }
    if let Some(v) = var("FORGEVIEW_REFERENCES_LINK_CLASS") {
        config.references.link_class = v;
    }
    if let Some(v) = var("FORGEVIEW_REFERENCES_SKIP_ELEMENTS") {
        config.references.skip_elements = v.split(',').map(str::to_string).collect();
    }
    if let Some(v) = var("FORGEVIEW_SELECTOR_MIN_SCORE")
        && let Ok(n) = v.parse()
    {
        config.selector.min_score = n;
    }
    if let Some(v) = var("FORGEVIEW_SELECTOR_MAX_ENTRIES")
        && let Ok(n) = v.parse()
    {
        config.selector.max_entries = n;
    }
    if let Some(v) = var("FORGEVIEW_LOGGING_LEVEL") {
        config.logging.level = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn defaults_without_any_layer() {
        let config = Config::load_layers(None, None, None).unwrap();
        assert_eq!(config.references.marker_char(), '#');
        assert_eq!(config.references.link_class, "issue");
        assert_eq!(config.references.skip_elements, vec!["a", "code", "pre"]);
        assert_eq!(config.selector.min_score, 0.0);
        assert_eq!(config.selector.max_entries, 0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn project_layer_overrides_only_explicit_global_keys() {
        let dir = tempdir().unwrap();
        let global = dir.path().join("home/config.toml");
        write(
            &global,
            "[references]\nlink_class = \"ref\"\n[selector]\nmax_entries = 20\n",
        );
        let root = dir.path().join("repo");
        write(
            &root.join(constants::PROJECT_CONFIG_FILE),
            "[selector]\nmax_entries = 5\n",
        );

        let config = Config::load_layers(Some(&global), Some(&root), None).unwrap();
        assert_eq!(config.references.link_class, "ref");
        assert_eq!(config.selector.max_entries, 5);
        assert_eq!(config.references.marker, "#");
    }

    #[test]
    fn explicit_file_wins_and_must_exist() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("custom.toml");
        write(&file, "[logging]\nlevel = \"debug\"\n");
        let config = Config::load_layers(None, None, Some(&file)).unwrap();
        assert_eq!(config.logging.level, "debug");

        let missing = dir.path().join("missing.toml");
        let err = Config::load_layers(None, None, Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn invalid_marker_is_rejected() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("bad.toml");
        write(&file, "[references]\nmarker = \"ab\"\n");
        let err = Config::load_layers(None, None, Some(&file)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "references.marker"));
    }

    #[test]
    fn env_overrides_apply_and_are_normalized() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("FORGEVIEW_REFERENCES_MARKER", "!"),
            ("FORGEVIEW_REFERENCES_SKIP_ELEMENTS", " A ,Code,,"),
            ("FORGEVIEW_SELECTOR_MIN_SCORE", "3.5"),
            ("FORGEVIEW_SELECTOR_MAX_ENTRIES", "not-a-number"),
        ]);
        let mut config = Config::default();
        apply_overrides_from(&mut config, |key| vars.get(key).map(|v| v.to_string()));
        config.references.validate().unwrap();
        config.selector.normalize();

        assert_eq!(config.references.marker_char(), '!');
        assert_eq!(config.references.skip_elements, vec!["a", "code"]);
        assert_eq!(config.selector.min_score, 0.99);
        assert_eq!(config.selector.max_entries, 0);
    }

    #[test]
    fn malformed_toml_reports_path() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("broken.toml");
        write(&file, "[selector\n");
        let err = Config::load_layers(None, None, Some(&file)).unwrap_err();
        match err {
            ConfigError::ParseError(msg) => assert!(msg.contains("broken.toml")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
