//! XSD schema model and loader.

mod parser;
mod types;

pub use parser::{
    parse_schema, parse_schema_str, parse_schema_str_with, parse_schema_with, ParseOptions,
};
pub use types::{
    Cardinality, MaxOccurs, MemberKind, RootBinding, SchemaMember, SchemaModel, SchemaType,
    TypeKind,
};
