pub mod annotations;
pub mod config;
pub mod error;
pub mod schema;

pub use annotations::{extract_annotations, AnnotationMap, MemberAnnotation, TypeAnnotation};
pub use config::SchemadocConfig;
pub use error::{Result, SchemadocError};
pub use schema::{parse_schema, parse_schema_str, SchemaModel};
