use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::content::ContentPattern;
use crate::discovery;
use crate::errors::{ManifestError, Result};
use crate::js_source;

/// How dark-mode variants are activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DarkMode {
    /// Follow the OS/browser `prefers-color-scheme` preference
    #[default]
    Media,
    /// Activate when a `dark` class is present on an ancestor element
    Class,
}

impl DarkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DarkMode::Media => "media",
            DarkMode::Class => "class",
        }
    }
}

impl fmt::Display for DarkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DarkMode {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "media" => Ok(DarkMode::Media),
            "class" => Ok(DarkMode::Class),
            other => Err(ManifestError::malformed(
                "darkMode",
                format!("expected 'media' or 'class', got '{}'", other),
            )),
        }
    }
}

/// Theme section: additive `extend` tokens plus keys that replace the defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default)]
    extend: IndexMap<String, Value>,

    #[serde(flatten)]
    overrides: IndexMap<String, Value>,
}

impl Theme {
    /// Tokens layered on top of the framework defaults
    pub fn extend(&self) -> &IndexMap<String, Value> {
        &self.extend
    }

    /// Tokens replacing the framework defaults
    pub fn overrides(&self) -> &IndexMap<String, Value> {
        &self.overrides
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.overrides.get(key)
    }

    /// True when the framework defaults are used untouched
    pub fn is_empty(&self) -> bool {
        self.extend.is_empty() && self.overrides.is_empty()
    }
}

/// A plugin reference, optionally with options passed to the plugin factory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PluginSpec {
    Module(String),
    Configured(ConfiguredPlugin),
}

/// Plugin module together with the options its factory is called with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfiguredPlugin {
    pub module: String,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

impl PluginSpec {
    pub fn configured(module: impl Into<String>, options: Value) -> Self {
        PluginSpec::Configured(ConfiguredPlugin {
            module: module.into(),
            options,
        })
    }

    pub fn module(&self) -> &str {
        match self {
            PluginSpec::Module(module) => module,
            PluginSpec::Configured(plugin) => &plugin.module,
        }
    }

    pub fn options(&self) -> Option<&Value> {
        match self {
            PluginSpec::Module(_) => None,
            PluginSpec::Configured(plugin) if plugin.options.is_null() => None,
            PluginSpec::Configured(plugin) => Some(&plugin.options),
        }
    }
}

/// Syntax a configuration source is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SourceFormat {
    /// CommonJS or ES module (`.js`, `.cjs`, `.mjs`)
    Js,
    /// TypeScript module (`.ts`)
    #[value(name = "ts")]
    TypeScript,
    Json,
    Yaml,
}

impl SourceFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("js") | Some("cjs") | Some("mjs") => Ok(SourceFormat::Js),
            Some("ts") | Some("cts") | Some("mts") => Ok(SourceFormat::TypeScript),
            Some("json") => Ok(SourceFormat::Json),
            Some("yaml") | Some("yml") => Ok(SourceFormat::Yaml),
            _ => Err(ManifestError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Tailwind configuration manifest.
///
/// Values are immutable once loaded or built; every constructor validates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TailwindConfig {
    /// Glob patterns of files scanned for class names
    #[serde(default)]
    content: Vec<String>,

    #[serde(default)]
    dark_mode: DarkMode,

    #[serde(default)]
    theme: Theme,

    #[serde(default)]
    plugins: Vec<PluginSpec>,

    /// Prefix prepended to every generated utility
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,

    /// Classes generated even when no content file uses them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    safelist: Vec<String>,
}

impl TailwindConfig {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Load the manifest by convention, searching from the current directory upwards
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let path = discovery::locate(&cwd)?;
        Self::from_file(&path)
    }

    /// Load the manifest found under one of the conventional names in `dir`
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = discovery::find_in_dir(dir).ok_or_else(|| ManifestError::NotFound {
            start: dir.to_path_buf(),
        })?;
        Self::from_file(&path)
    }

    /// Load configuration from a file (auto-detect format)
    pub fn from_file(path: &Path) -> Result<Self> {
        let format = SourceFormat::from_path(path)?;
        let source = std::fs::read_to_string(path).map_err(|e| ManifestError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        debug!(path = %path.display(), ?format, "parsing configuration");
        Self::parse(&source, format, &path.display().to_string())
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        Self::parse(source, SourceFormat::Json, "JSON input")
    }

    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Self::parse(source, SourceFormat::Yaml, "YAML input")
    }

    pub fn from_js_str(source: &str) -> Result<Self> {
        Self::parse(source, SourceFormat::Js, "JavaScript input")
    }

    /// Parse and validate a configuration source; `source_name` labels errors
    pub fn parse(source: &str, format: SourceFormat, source_name: &str) -> Result<Self> {
        let config: Self = match format {
            SourceFormat::Json => serde_json::from_str(source)
                .map_err(|e| ManifestError::malformed(source_name, e.to_string()))?,
            SourceFormat::Yaml => serde_yaml::from_str(source)
                .map_err(|e| ManifestError::malformed(source_name, e.to_string()))?,
            SourceFormat::Js | SourceFormat::TypeScript => {
                let value = js_source::evaluate(source, source_name, format)?;
                serde_json::from_value(value)
                    .map_err(|e| ManifestError::malformed(source_name, e.to_string()))?
            }
        };

        config.validate_as(source_name)?;
        Ok(config)
    }

    pub fn content(&self) -> &[String] {
        &self.content
    }

    pub fn dark_mode(&self) -> DarkMode {
        self.dark_mode
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn plugins(&self) -> &[PluginSpec] {
        &self.plugins
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn safelist(&self) -> &[String] {
        &self.safelist
    }

    /// A manifest without content patterns is valid but produces no output
    pub fn is_complete(&self) -> bool {
        !self.content.is_empty()
    }

    /// Check the structural invariants of the manifest
    pub fn validate(&self) -> Result<()> {
        self.validate_as("configuration")
    }

    fn validate_as(&self, source_name: &str) -> Result<()> {
        for raw in &self.content {
            ContentPattern::parse(raw)
                .map_err(|e| ManifestError::invalid_pattern(source_name, raw, e))?;
        }

        if self.theme.overrides.contains_key("extend") {
            return Err(ManifestError::malformed(
                source_name,
                "theme.extend cannot also be a theme override",
            ));
        }

        for plugin in &self.plugins {
            if plugin.module().trim().is_empty() {
                return Err(ManifestError::malformed(source_name, "plugin module name is empty"));
            }
        }

        if let Some(prefix) = &self.prefix {
            if prefix.chars().any(char::is_whitespace) {
                return Err(ManifestError::malformed(
                    source_name,
                    format!("prefix '{}' contains whitespace", prefix),
                ));
            }
        }

        if self.safelist.iter().any(|class| class.trim().is_empty()) {
            return Err(ManifestError::malformed(source_name, "safelist entries must not be empty"));
        }

        Ok(())
    }

    /// Convert configuration to JSON value
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_json_compact(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Builder pattern for authoring configurations in code
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: TailwindConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append content patterns
    pub fn content<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.content.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn dark_mode(mut self, mode: DarkMode) -> Self {
        self.config.dark_mode = mode;
        self
    }

    pub fn extend_theme(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config.theme.extend.insert(key.into(), value);
        self
    }

    pub fn override_theme(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config.theme.overrides.insert(key.into(), value);
        self
    }

    pub fn plugin(mut self, plugin: PluginSpec) -> Self {
        self.config.plugins.push(plugin);
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = Some(prefix.into());
        self
    }

    pub fn safelist<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.safelist.extend(classes.into_iter().map(Into::into));
        self
    }

    /// Validate and return the finished configuration
    pub fn build(self) -> Result<TailwindConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = TailwindConfig::default();
        assert!(!config.is_complete());
        assert_eq!(config.dark_mode(), DarkMode::Media);
        assert!(config.theme().is_empty());
        assert!(config.plugins().is_empty());
    }

    #[test]
    fn test_dark_mode_from_str() {
        assert_eq!("media".parse::<DarkMode>().unwrap(), DarkMode::Media);
        assert_eq!("class".parse::<DarkMode>().unwrap(), DarkMode::Class);
        assert!("selector".parse::<DarkMode>().is_err());
        assert!("Class".parse::<DarkMode>().is_err());
        assert!("".parse::<DarkMode>().is_err());
    }

    #[test]
    fn test_yaml_config_loading() {
        let yaml_content = r##"
content:
  - "./src/**/*.js"
  - "./components/**/*.jsx"
darkMode: class
theme:
  extend:
    colors:
      primary: "#1a73e8"
  screens:
    sm: "480px"
plugins:
  - "@tailwindcss/forms"
  - module: "@tailwindcss/typography"
    options:
      className: prose
"##;

        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(yaml_content.as_bytes()).unwrap();

        let config = TailwindConfig::from_file(file.path()).unwrap();
        assert_eq!(config.content().len(), 2);
        assert_eq!(config.dark_mode(), DarkMode::Class);
        assert_eq!(config.theme().extend()["colors"]["primary"], json!("#1a73e8"));
        assert_eq!(config.theme().get("screens"), Some(&json!({"sm": "480px"})));
        assert_eq!(config.plugins()[0], PluginSpec::Module("@tailwindcss/forms".to_string()));
        assert_eq!(config.plugins()[1].module(), "@tailwindcss/typography");
        assert_eq!(config.plugins()[1].options(), Some(&json!({"className": "prose"})));
    }

    #[test]
    fn test_json_config_loading() {
        let json_content = r##"{
  "content": ["./dist/**/*.js"],
  "theme": {
    "extend": {
      "colors": {
        "brand": "#0066cc"
      }
    }
  }
}"##;

        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(json_content.as_bytes()).unwrap();

        let config = TailwindConfig::from_file(file.path()).unwrap();
        assert_eq!(config.content(), ["./dist/**/*.js"]);
        assert_eq!(config.dark_mode(), DarkMode::Media);
        assert_eq!(config.theme().extend()["colors"]["brand"], json!("#0066cc"));
    }

    #[test]
    fn test_unknown_top_level_key_is_malformed() {
        let err = TailwindConfig::from_json_str(r#"{"content": [], "darkmode": "class"}"#).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("darkmode"));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = NamedTempFile::with_suffix(".toml").unwrap();
        let err = TailwindConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ManifestError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_builder_validates_patterns() {
        let err = ConfigBuilder::new()
            .content(["./src/**/*.{js,ts"])
            .build()
            .unwrap_err();
        assert!(err.is_malformed());

        let config = ConfigBuilder::new()
            .content(["./src/**/*.{js,ts}"])
            .dark_mode(DarkMode::Class)
            .extend_theme("colors", json!({"brand": "#0066cc"}))
            .plugin(PluginSpec::Module("@tailwindcss/forms".into()))
            .build()
            .unwrap();
        assert!(config.is_complete());
        assert_eq!(config.plugins().len(), 1);
    }

    #[test]
    fn test_builder_rejects_extend_override() {
        let err = ConfigBuilder::new()
            .override_theme("extend", json!({}))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("theme.extend"));
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let config = ConfigBuilder::new().content(["./a/*.html"]).build().unwrap();
        let json = config.to_json().unwrap();
        assert!(json.get("prefix").is_none());
        assert!(json.get("safelist").is_none());
        assert_eq!(json["theme"], json!({"extend": {}}));

        let config = ConfigBuilder::new()
            .prefix("tw-")
            .safelist(["hidden"])
            .build()
            .unwrap();
        let json = config.to_json().unwrap();
        assert_eq!(json["prefix"], json!("tw-"));
        assert_eq!(json["safelist"], json!(["hidden"]));
    }

    #[test]
    fn test_prefix_with_whitespace_is_malformed() {
        assert!(ConfigBuilder::new().prefix("tw -").build().is_err());
        assert!(ConfigBuilder::new().safelist([" "]).build().is_err());
    }
}
