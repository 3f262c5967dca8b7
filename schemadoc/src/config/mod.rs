use crate::error::{Result, SchemadocError};
use crate::schema::ParseOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "schemadoc.yaml";
pub const DEFAULT_LINE_WIDTH: usize = 87;
const MIN_LINE_WIDTH: usize = 20;

/// Settings for one documentation run, usually read from `schemadoc.yaml`.
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemadocConfig {
    /// Top-level element bound to the root class
    pub root_element: Option<String>,
    /// Preferred `xml:lang` of documentation nodes
    pub doc_lang: Option<String>,
    pub line_width: usize,
    /// Render `name (type[min..max]): doc` instead of `name: doc`
    pub show_cardinality: bool,
    /// Remove the `namespace = "..."` line from the root class
    pub strip_namespace: bool,
    /// Every named complex type must have a placeholder in the source
    pub require_all_types: bool,
    /// Root preamble template; `{root}` is replaced by the root element tag
    pub preamble: Option<String>,
}

impl Default for SchemadocConfig {
    fn default() -> Self {
        SchemadocConfig {
            root_element: None,
            doc_lang: None,
            line_width: DEFAULT_LINE_WIDTH,
            show_cardinality: false,
            strip_namespace: true,
            require_all_types: true,
            preamble: None,
        }
    }
}

impl SchemadocConfig {
    /// Read and validate a YAML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `schemadoc.yaml` from `dir` when present, defaults otherwise
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as a mapping
        let config: SchemadocConfig = if content.trim().is_empty() {
            SchemadocConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.line_width < MIN_LINE_WIDTH {
            return Err(SchemadocError::Config(format!(
                "line_width must be at least {MIN_LINE_WIDTH}, got {}",
                self.line_width
            )));
        }
        if let Some(preamble) = &self.preamble {
            if preamble.trim().is_empty() {
                return Err(SchemadocError::Config("preamble must not be empty".into()));
            }
        }
        Ok(())
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            root_element: self.root_element.clone(),
            doc_lang: self.doc_lang.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = SchemadocConfig::from_yaml_str("").unwrap();
        assert_eq!(config, SchemadocConfig::default());
        assert_eq!(config.line_width, 87);
        assert!(config.strip_namespace);
        assert!(config.require_all_types);
        assert!(!config.show_cardinality);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config =
            SchemadocConfig::from_yaml_str("root_element: ORI-A\nshow_cardinality: true\n")
                .unwrap();
        assert_eq!(config.root_element.as_deref(), Some("ORI-A"));
        assert!(config.show_cardinality);
        assert_eq!(config.line_width, DEFAULT_LINE_WIDTH);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = SchemadocConfig::from_yaml_str("line_wdith: 80\n").unwrap_err();
        assert!(matches!(err, SchemadocError::Yaml(_)));
    }

    #[test]
    fn test_line_width_too_small() {
        let err = SchemadocConfig::from_yaml_str("line_width: 5\n").unwrap_err();
        match err {
            SchemadocError::Config(msg) => assert!(msg.contains("line_width")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_discover() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(
            SchemadocConfig::discover(tmp.path()).unwrap(),
            SchemadocConfig::default()
        );

        std::fs::write(tmp.path().join(CONFIG_FILE_NAME), "doc_lang: nl\n").unwrap();
        let config = SchemadocConfig::discover(tmp.path()).unwrap();
        assert_eq!(config.doc_lang.as_deref(), Some("nl"));
        assert_eq!(config.parse_options().doc_lang.as_deref(), Some("nl"));
    }
}
