use serde::{Deserialize, Serialize};
use std::fmt;

/// Parsed XSD document, reduced to the parts that carry documentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaModel {
    #[serde(default)]
    pub target_namespace: Option<String>,
    /// Named types in schema declaration order
    pub types: Vec<SchemaType>,
    pub root: RootBinding,
}

impl SchemaModel {
    /// Look up a type by its local name
    pub fn get_type(&self, name: &str) -> Option<&SchemaType> {
        self.types.iter().find(|t| t.name == name)
    }

    /// The type bound to the schema's top-level element
    pub fn root_type(&self) -> Option<&SchemaType> {
        self.get_type(&self.root.type_name)
    }
}

/// The top-level element and the type that binds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootBinding {
    /// Element tag as written in the schema, e.g. `ORI-A`
    pub element: String,
    /// Local name of the root type. Equals `element` for an inline anonymous type.
    pub type_name: String,
}

/// A named complex or simple type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaType {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    pub kind: TypeKind,
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(default)]
    pub members: Vec<SchemaMember>,
}

impl SchemaType {
    /// `{namespace}local` in Clark notation, or the bare local name
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{{{ns}}}{}", self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Complex,
    Simple,
}

/// An element or attribute declared inside a complex type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaMember {
    pub name: String,
    pub kind: MemberKind,
    /// Declared `type` attribute, absent for inline or referenced declarations
    #[serde(rename = "type", default)]
    pub type_ref: Option<String>,
    #[serde(default)]
    pub documentation: Option<String>,
    pub cardinality: Cardinality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Element,
    Attribute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cardinality {
    pub min: u32,
    pub max: MaxOccurs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxOccurs {
    Bounded(u32),
    Unbounded,
}

impl Cardinality {
    pub const REQUIRED: Cardinality = Cardinality {
        min: 1,
        max: MaxOccurs::Bounded(1),
    };

    pub const OPTIONAL: Cardinality = Cardinality {
        min: 0,
        max: MaxOccurs::Bounded(1),
    };
}

impl Default for Cardinality {
    fn default() -> Self {
        Cardinality::REQUIRED
    }
}

/// Renders as `[min..max]`, with `*` for unbounded
impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            MaxOccurs::Bounded(max) => write!(f, "[{}..{}]", self.min, max),
            MaxOccurs::Unbounded => write!(f, "[{}..*]", self.min),
        }
    }
}
