use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemadocError {
    #[error("Schema parse error: {0}")]
    SchemaParse(String),

    #[error("Unknown type: '{name}' is referenced by the generated bindings but not declared in the schema")]
    UnknownType { name: String },

    #[error("Binding key collision: types '{first}' and '{second}' both bind to class key '{key}'")]
    KeyCollision {
        key: String,
        first: String,
        second: String,
    },

    #[error("Patch anchor error: pattern {pattern:?} matched {matches} times (expected exactly 1)")]
    PatchAnchor { pattern: String, matches: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<roxmltree::Error> for SchemadocError {
    fn from(e: roxmltree::Error) -> Self {
        SchemadocError::SchemaParse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SchemadocError>;
