use schemadoc::config::DEFAULT_LINE_WIDTH;
use schemadoc::{
    AnnotationMap, MemberAnnotation, Result, SchemadocConfig, SchemadocError, TypeAnnotation,
};

use crate::text_utils::{binding_key, builtin_type, class_name, wrap};

pub const DEFAULT_PREAMBLE: &str = "Binding for the root element `{root}`.";

#[derive(Debug, Clone)]
pub struct DocstringOptions {
    pub line_width: usize,
    pub show_cardinality: bool,
    /// Template for the root preamble; `{root}` is replaced by the element tag
    pub preamble: String,
}

impl Default for DocstringOptions {
    fn default() -> Self {
        DocstringOptions {
            line_width: DEFAULT_LINE_WIDTH,
            show_cardinality: false,
            preamble: DEFAULT_PREAMBLE.to_string(),
        }
    }
}

impl From<&SchemadocConfig> for DocstringOptions {
    fn from(config: &SchemadocConfig) -> Self {
        DocstringOptions {
            line_width: config.line_width,
            show_cardinality: config.show_cardinality,
            preamble: config
                .preamble
                .clone()
                .unwrap_or_else(|| DEFAULT_PREAMBLE.to_string()),
        }
    }
}

/// Docstring content for one generated class, before layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Docstring {
    pub class_key: String,
    /// Preamble and type documentation, one entry per paragraph
    pub paragraphs: Vec<String>,
    /// One `name: doc` entry per documented member, in schema order
    pub attributes: Vec<String>,
    line_width: usize,
}

impl Docstring {
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty() && self.attributes.is_empty()
    }

    /// Lay the docstring out for a class body indented by `indent`.
    ///
    /// The result goes between the opening and closing triple quotes: the
    /// first line follows the opening quotes directly, and a multi-line
    /// docstring ends with `indent` so the closing quotes line up.
    pub fn render(&self, indent: &str) -> String {
        let mut blocks: Vec<String> = Vec::new();

        for paragraph in &self.paragraphs {
            let initial = if blocks.is_empty() { "" } else { indent };
            blocks.push(wrap(paragraph, self.line_width, initial, indent));
        }

        if !self.attributes.is_empty() {
            let header_indent = if blocks.is_empty() { "" } else { indent };
            let item_indent = indent.repeat(2);
            let continuation = format!("{item_indent}  ");

            let mut block = format!("{header_indent}Attributes:");
            for attribute in &self.attributes {
                block.push('\n');
                block.push_str(&wrap(
                    attribute,
                    self.line_width,
                    &item_indent,
                    &continuation,
                ));
            }
            blocks.push(block);
        }

        let body = blocks.join("\n\n");
        if body.contains('\n') {
            format!("{body}\n{indent}")
        } else {
            body
        }
    }
}

/// Build the docstring for the class bound to `class_key`.
///
/// `class_key` is either the schema type name or its binding key
/// (`ORI-A` and `ORI_A` address the same class).
pub fn synthesize(
    class_key: &str,
    annotations: &AnnotationMap,
    options: &DocstringOptions,
) -> Result<Docstring> {
    let ty = find_type(class_key, annotations)?;

    let mut paragraphs = Vec::new();
    if annotations.is_root(&ty.name) {
        paragraphs.push(options.preamble.replace("{root}", &annotations.root.element));
    }
    if let Some(doc) = ty.own_doc.as_deref().filter(|d| !d.is_empty()) {
        paragraphs.push(doc.to_string());
    }

    let attributes = ty
        .documented_members()
        .map(|m| attribute_line(m, annotations, options.show_cardinality))
        .collect();

    Ok(Docstring {
        class_key: binding_key(&ty.name),
        paragraphs,
        attributes,
        line_width: options.line_width,
    })
}

/// Exact type name first, then a unique binding key match
fn find_type<'m>(class_key: &str, annotations: &'m AnnotationMap) -> Result<&'m TypeAnnotation> {
    if let Some(ty) = annotations.get(class_key) {
        return Ok(ty);
    }
    let mut matches = annotations
        .types
        .iter()
        .filter(|t| binding_key(&t.name) == class_key);
    match (matches.next(), matches.next()) {
        (Some(ty), None) => Ok(ty),
        (Some(first), Some(second)) => Err(SchemadocError::KeyCollision {
            key: class_key.to_string(),
            first: first.name.clone(),
            second: second.name.clone(),
        }),
        (None, _) => Err(SchemadocError::UnknownType {
            name: class_key.to_string(),
        }),
    }
}

fn attribute_line(
    member: &MemberAnnotation,
    annotations: &AnnotationMap,
    show_cardinality: bool,
) -> String {
    let label = if show_cardinality {
        format!(
            "{} ({}{})",
            member.name,
            binding_type(member.type_ref.as_deref(), annotations),
            member.cardinality
        )
    } else {
        member.name.clone()
    };

    match member.doc.as_deref() {
        Some(doc) if !doc.is_empty() => format!("{label}: {doc}"),
        _ => format!("{label}:"),
    }
}

/// The member type as the generated bindings spell it: the class name for
/// schema types, the Python type for XSD builtins. Empty for inline types.
fn binding_type(type_ref: Option<&str>, annotations: &AnnotationMap) -> String {
    let Some(type_ref) = type_ref else {
        return String::new();
    };
    let local = type_ref.rsplit_once(':').map_or(type_ref, |(_, local)| local);
    if annotations.get(local).is_some() {
        return class_name(local);
    }
    builtin_type(local).map_or_else(|| local.to_string(), str::to_string)
}
