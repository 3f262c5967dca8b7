use super::types::{
    Cardinality, MaxOccurs, MemberKind, RootBinding, SchemaMember, SchemaModel, SchemaType,
    TypeKind,
};
use crate::error::{Result, SchemadocError};
use roxmltree::Node;
use std::path::Path;

const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Knobs that change how a schema is read
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Top-level element to treat as root. Required when the schema declares several.
    pub root_element: Option<String>,
    /// Preferred `xml:lang` when a type carries several documentation nodes
    pub doc_lang: Option<String>,
}

/// Parse an XSD file into a SchemaModel
pub fn parse_schema(path: &Path) -> Result<SchemaModel> {
    parse_schema_with(path, &ParseOptions::default())
}

/// Parse an XSD file with explicit options
pub fn parse_schema_with(path: &Path, options: &ParseOptions) -> Result<SchemaModel> {
    let content = std::fs::read_to_string(path)?;
    parse_schema_str_with(&content, options).map_err(|e| match e {
        SchemadocError::SchemaParse(msg) => {
            SchemadocError::SchemaParse(format!("{}: {msg}", path.display()))
        }
        other => other,
    })
}

/// Parse an XSD string into a SchemaModel
pub fn parse_schema_str(content: &str) -> Result<SchemaModel> {
    parse_schema_str_with(content, &ParseOptions::default())
}

/// Parse an XSD string with explicit options
pub fn parse_schema_str_with(content: &str, options: &ParseOptions) -> Result<SchemaModel> {
    let doc = roxmltree::Document::parse(content)?;
    let schema = doc.root_element();
    if !is_xs(schema, "schema") {
        return Err(SchemadocError::SchemaParse(format!(
            "document element is <{}>, expected xs:schema",
            schema.tag_name().name()
        )));
    }

    let reader = SchemaReader {
        schema,
        target_namespace: schema.attribute("targetNamespace"),
        doc_lang: options.doc_lang.as_deref(),
    };

    let root_element = reader.select_root(options.root_element.as_deref())?;
    let root_tag = attr(root_element, "name")?.to_string();
    let inline_root = xs_children(root_element).find(|n| is_xs(*n, "complexType"));

    let mut types: Vec<SchemaType> = Vec::new();
    for child in xs_children(schema) {
        let ty = match child.tag_name().name() {
            "complexType" => reader.complex_type(attr(child, "name")?, child)?,
            "simpleType" => reader.simple_type(attr(child, "name")?, child),
            "element" if child == root_element => match inline_root {
                Some(inline) => {
                    let mut ty = reader.complex_type(&root_tag, inline)?;
                    if ty.documentation.is_none() {
                        ty.documentation = reader.documentation(root_element);
                    }
                    ty
                }
                None => continue,
            },
            _ => continue,
        };
        if types.iter().any(|t| t.name == ty.name) {
            return Err(SchemadocError::SchemaParse(format!(
                "type '{}' is declared more than once",
                ty.qualified_name()
            )));
        }
        types.push(ty);
    }

    let root_type_name = match (inline_root, root_element.attribute("type")) {
        (Some(_), _) => root_tag.clone(),
        (None, Some(type_ref)) => {
            let name = local_name(type_ref);
            let root_doc = reader.documentation(root_element);
            let ty = types
                .iter_mut()
                .find(|t| t.name == name && t.kind == TypeKind::Complex)
                .ok_or_else(|| {
                    SchemadocError::SchemaParse(format!(
                        "root element '{root_tag}' references undeclared complex type '{name}'"
                    ))
                })?;
            if ty.documentation.is_none() {
                ty.documentation = root_doc;
            }
            name.to_string()
        }
        (None, None) => {
            return Err(SchemadocError::SchemaParse(format!(
                "root element '{root_tag}' declares no complex type"
            )))
        }
    };

    Ok(SchemaModel {
        target_namespace: reader.target_namespace.map(str::to_string),
        types,
        root: RootBinding {
            element: root_tag,
            type_name: root_type_name,
        },
    })
}

struct SchemaReader<'a, 'input> {
    schema: Node<'a, 'input>,
    target_namespace: Option<&'a str>,
    doc_lang: Option<&'a str>,
}

impl<'a, 'input> SchemaReader<'a, 'input> {
    /// Pick the top-level element that binds the root type
    fn select_root(&self, requested: Option<&str>) -> Result<Node<'a, 'input>> {
        let candidates: Vec<_> = xs_children(self.schema)
            .filter(|n| is_xs(*n, "element"))
            .collect();

        match requested {
            Some(name) => candidates
                .into_iter()
                .find(|n| n.attribute("name") == Some(name))
                .ok_or_else(|| {
                    SchemadocError::SchemaParse(format!(
                        "root element '{name}' is not declared at the top level of the schema"
                    ))
                }),
            None => match candidates.as_slice() {
                [only] => Ok(*only),
                [] => Err(SchemadocError::SchemaParse(
                    "schema declares no top-level element".into(),
                )),
                many => {
                    let names: Vec<_> = many.iter().filter_map(|n| n.attribute("name")).collect();
                    Err(SchemadocError::SchemaParse(format!(
                        "schema declares {} top-level elements ({}); choose a root element",
                        many.len(),
                        names.join(", ")
                    )))
                }
            },
        }
    }

    fn complex_type(&self, name: &str, node: Node<'a, 'input>) -> Result<SchemaType> {
        let mut members = Vec::new();
        self.collect_members(name, node, &mut members)?;
        Ok(SchemaType {
            name: name.to_string(),
            namespace: self.target_namespace.map(str::to_string),
            kind: TypeKind::Complex,
            documentation: self.documentation(node),
            members,
        })
    }

    fn simple_type(&self, name: &str, node: Node) -> SchemaType {
        SchemaType {
            name: name.to_string(),
            namespace: self.target_namespace.map(str::to_string),
            kind: TypeKind::Simple,
            documentation: self.documentation(node),
            members: Vec::new(),
        }
    }

    /// Walk model groups and content derivations in document order
    fn collect_members(
        &self,
        owner: &str,
        node: Node<'a, 'input>,
        members: &mut Vec<SchemaMember>,
    ) -> Result<()> {
        for child in xs_children(node) {
            match child.tag_name().name() {
                "sequence" | "choice" | "all" | "complexContent" | "simpleContent"
                | "extension" | "restriction" => self.collect_members(owner, child, members)?,
                "element" => members.push(self.element_member(owner, child)?),
                "attribute" => {
                    if child.attribute("use") == Some("prohibited") {
                        continue;
                    }
                    members.push(self.attribute_member(owner, child)?);
                }
                "group" | "attributeGroup" | "any" | "anyAttribute" => {
                    log::debug!(
                        "Skipping xs:{} in type '{owner}': group references are not expanded",
                        child.tag_name().name()
                    );
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn element_member(&self, owner: &str, node: Node<'a, 'input>) -> Result<SchemaMember> {
        let (name, global) = self.member_name(owner, node, "element")?;
        if xs_children(node).any(|n| is_xs(n, "complexType")) {
            log::debug!("Skipping anonymous complex type of element '{name}' in type '{owner}'");
        }

        let min = parse_occurs(owner, &name, "minOccurs", node.attribute("minOccurs"))?;
        let max = match node.attribute("maxOccurs") {
            Some("unbounded") => MaxOccurs::Unbounded,
            other => MaxOccurs::Bounded(parse_occurs(owner, &name, "maxOccurs", other)?),
        };

        Ok(SchemaMember {
            documentation: self
                .documentation(node)
                .or_else(|| global.and_then(|g| self.documentation(g))),
            type_ref: node.attribute("type").map(str::to_string),
            kind: MemberKind::Element,
            cardinality: Cardinality { min, max },
            name,
        })
    }

    fn attribute_member(&self, owner: &str, node: Node<'a, 'input>) -> Result<SchemaMember> {
        let (name, global) = self.member_name(owner, node, "attribute")?;
        let cardinality = if node.attribute("use") == Some("required") {
            Cardinality::REQUIRED
        } else {
            Cardinality::OPTIONAL
        };

        Ok(SchemaMember {
            documentation: self
                .documentation(node)
                .or_else(|| global.and_then(|g| self.documentation(g))),
            type_ref: node.attribute("type").map(str::to_string),
            kind: MemberKind::Attribute,
            cardinality,
            name,
        })
    }

    /// Resolve a member's name from `name` or `ref`, returning the referenced
    /// global declaration when there is one.
    fn member_name(
        &self,
        owner: &str,
        node: Node<'a, 'input>,
        tag: &str,
    ) -> Result<(String, Option<Node<'a, 'input>>)> {
        if let Some(name) = node.attribute("name") {
            return Ok((name.to_string(), None));
        }
        match node.attribute("ref") {
            Some(reference) => {
                let name = local_name(reference);
                let global = xs_children(self.schema)
                    .find(|n| is_xs(*n, tag) && n.attribute("name") == Some(name));
                Ok((name.to_string(), global))
            }
            None => Err(SchemadocError::SchemaParse(format!(
                "xs:{tag} in type '{owner}' has neither a name nor a ref"
            ))),
        }
    }

    /// Normalized text of the node's `xs:annotation/xs:documentation`.
    ///
    /// `None` when the node has no documentation at all, `Some("")` when it
    /// is present but empty.
    fn documentation(&self, node: Node) -> Option<String> {
        let docs: Vec<Node> = xs_children(node)
            .filter(|n| is_xs(*n, "annotation"))
            .flat_map(|n| xs_children(n))
            .filter(|n| is_xs(*n, "documentation"))
            .collect();

        let chosen = self
            .doc_lang
            .and_then(|lang| {
                docs.iter()
                    .find(|d| d.attribute((XML_NAMESPACE, "lang")) == Some(lang))
            })
            .or_else(|| docs.first())?;

        let raw: String = chosen
            .descendants()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text())
            .collect();
        Some(normalize_whitespace(&raw))
    }
}

/// Trim and collapse every whitespace run, line breaks included, to one space
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn xs_children<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(|n| n.is_element() && n.tag_name().namespace() == Some(XS_NAMESPACE))
}

fn is_xs(node: Node, name: &str) -> bool {
    node.is_element()
        && node.tag_name().namespace() == Some(XS_NAMESPACE)
        && node.tag_name().name() == name
}

fn attr<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| {
        SchemadocError::SchemaParse(format!(
            "top-level xs:{} without a '{name}' attribute",
            node.tag_name().name()
        ))
    })
}

fn local_name(qname: &str) -> &str {
    qname.rsplit_once(':').map_or(qname, |(_, local)| local)
}

fn parse_occurs(owner: &str, member: &str, which: &str, value: Option<&str>) -> Result<u32> {
    match value {
        None => Ok(1),
        Some(raw) => raw.trim().parse().map_err(|_| {
            SchemadocError::SchemaParse(format!(
                "invalid {which}=\"{raw}\" on '{member}' in type '{owner}'"
            ))
        }),
    }
}
