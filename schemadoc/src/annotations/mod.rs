//! Documentation view over a parsed schema.
//!
//! The [`AnnotationMap`] is derived once from a [`SchemaModel`] and handed by
//! reference to everything that renders documentation. It keeps the schema's
//! declaration order for types and members, so serializing an unchanged
//! schema's map always produces the same bytes.

use crate::schema::{Cardinality, MemberKind, RootBinding, SchemaModel, SchemaType, TypeKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationMap {
    pub root: RootBinding,
    #[serde(default)]
    pub target_namespace: Option<String>,
    pub types: Vec<TypeAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAnnotation {
    pub name: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub own_doc: Option<String>,
    #[serde(default)]
    pub members: Vec<MemberAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberAnnotation {
    pub name: String,
    pub kind: MemberKind,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(rename = "type", default)]
    pub type_ref: Option<String>,
    pub cardinality: Cardinality,
}

impl AnnotationMap {
    pub fn get(&self, type_name: &str) -> Option<&TypeAnnotation> {
        self.types.iter().find(|t| t.name == type_name)
    }

    pub fn is_root(&self, type_name: &str) -> bool {
        self.root.type_name == type_name
    }

    pub fn root_type(&self) -> Option<&TypeAnnotation> {
        self.get(&self.root.type_name)
    }
}

impl TypeAnnotation {
    /// Members with non-empty documentation, in schema order
    pub fn documented_members(&self) -> impl Iterator<Item = &MemberAnnotation> {
        self.members
            .iter()
            .filter(|m| m.doc.as_deref().is_some_and(|d| !d.is_empty()))
    }
}

/// Build the annotation map for every type in the schema
pub fn extract_annotations(schema: &SchemaModel) -> AnnotationMap {
    AnnotationMap {
        root: schema.root.clone(),
        target_namespace: schema.target_namespace.clone(),
        types: schema.types.iter().map(type_annotation).collect(),
    }
}

fn type_annotation(ty: &SchemaType) -> TypeAnnotation {
    TypeAnnotation {
        name: ty.name.clone(),
        kind: ty.kind,
        own_doc: ty.documentation.clone(),
        members: ty
            .members
            .iter()
            .map(|m| MemberAnnotation {
                name: m.name.clone(),
                kind: m.kind,
                doc: m.documentation.clone(),
                type_ref: m.type_ref.clone(),
                cardinality: m.cardinality,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_schema_str;

    fn test_schema() -> SchemaModel {
        parse_schema_str(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:test">
  <xs:element name="ORI-A">
    <xs:annotation><xs:documentation>Root container.</xs:documentation></xs:annotation>
    <xs:complexType>
      <xs:sequence>
        <xs:element name="zeta" type="xs:string">
          <xs:annotation><xs:documentation>Last letter.</xs:documentation></xs:annotation>
        </xs:element>
        <xs:element name="alpha" type="xs:string"/>
        <xs:element name="mu" type="xs:string">
          <xs:annotation><xs:documentation>Middle letter.</xs:documentation></xs:annotation>
        </xs:element>
      </xs:sequence>
    </xs:complexType>
  </xs:element>
  <xs:complexType name="bare">
    <xs:sequence><xs:element name="x" type="xs:int"/></xs:sequence>
  </xs:complexType>
</xs:schema>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_extract_keeps_schema_order() {
        let map = extract_annotations(&test_schema());
        let root = map.root_type().unwrap();
        let names: Vec<_> = root.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mu"]);

        let documented: Vec<_> = root.documented_members().map(|m| m.name.as_str()).collect();
        assert_eq!(documented, vec!["zeta", "mu"]);
    }

    #[test]
    fn test_absent_documentation_stays_absent() {
        let map = extract_annotations(&test_schema());
        let bare = map.get("bare").unwrap();
        assert_eq!(bare.own_doc, None);
        assert_eq!(bare.members[0].doc, None);
        assert_eq!(bare.documented_members().count(), 0);
    }

    #[test]
    fn test_root_designation() {
        let map = extract_annotations(&test_schema());
        assert!(map.is_root("ORI-A"));
        assert!(!map.is_root("bare"));
        assert_eq!(map.root.element, "ORI-A");
        assert_eq!(map.target_namespace.as_deref(), Some("urn:test"));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let first = serde_json::to_string(&extract_annotations(&test_schema())).unwrap();
        let second = serde_json::to_string(&extract_annotations(&test_schema())).unwrap();
        assert_eq!(first, second);

        let yaml_a = serde_yaml::to_string(&extract_annotations(&test_schema())).unwrap();
        let yaml_b = serde_yaml::to_string(&extract_annotations(&test_schema())).unwrap();
        assert_eq!(yaml_a, yaml_b);
    }

    #[test]
    fn test_map_round_trips_through_yaml() {
        let map = extract_annotations(&test_schema());
        let yaml = serde_yaml::to_string(&map).unwrap();
        let back: AnnotationMap = serde_yaml::from_str(&yaml).unwrap();
        pretty_assertions::assert_eq!(map, back);
    }
}
