use regex::Regex;
use schemadoc::schema::TypeKind;
use schemadoc::{AnnotationMap, Result, SchemadocConfig, SchemadocError};
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::synthesizer::{synthesize, Docstring, DocstringOptions};
use crate::text_utils::{binding_key, class_name, placeholder_anchor};

/// Replace one class's stub docstring with its synthesized docstring
#[derive(Debug, Clone)]
pub struct DocstringPatch {
    pub class_key: String,
    /// Exact text expected once in the generated source
    pub anchor: String,
    pub docstring: Docstring,
}

/// Remove the `namespace = "..."` line from the root class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespacePatch {
    pub class_name: String,
    /// Expected namespace value; any value matches when the schema has none
    pub namespace: Option<String>,
}

/// Every substitution of one run, in application order.
#[derive(Debug, Clone)]
pub struct PatchTable {
    pub docstrings: Vec<DocstringPatch>,
    pub namespace: Option<NamespacePatch>,
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{docs\.([A-Za-z_][A-Za-z0-9_]*)\}\}").expect("placeholder regex is valid")
    })
}

/// Placeholder keys present in the source, in order of first appearance
pub fn discover_placeholders(source: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for caps in placeholder_regex().captures_iter(source) {
        let key = &caps[1];
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }
    keys
}

/// Fail when two schema types would bind to the same generated class
fn check_binding_keys(annotations: &AnnotationMap) -> Result<()> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for ty in &annotations.types {
        let key = binding_key(&ty.name);
        if let Some(first) = seen.get(&key) {
            return Err(SchemadocError::KeyCollision {
                key,
                first: first.to_string(),
                second: ty.name.clone(),
            });
        }
        seen.insert(key, &ty.name);
    }
    Ok(())
}

impl PatchTable {
    /// Build the table for `source`.
    ///
    /// Required classes come first in schema order (every named complex type
    /// with `require_all_types`, otherwise only the root), then any other
    /// placeholder found in the source. A placeholder naming a type the
    /// schema lacks fails with `UnknownType`.
    pub fn build(
        source: &str,
        annotations: &AnnotationMap,
        config: &SchemadocConfig,
    ) -> Result<Self> {
        check_binding_keys(annotations)?;
        let options = DocstringOptions::from(config);

        let mut keys: Vec<String> = annotations
            .types
            .iter()
            .filter(|t| {
                annotations.is_root(&t.name)
                    || (config.require_all_types && t.kind == TypeKind::Complex)
            })
            .map(|t| binding_key(&t.name))
            .collect();
        for key in discover_placeholders(source) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        let docstrings = keys
            .into_iter()
            .map(|key| {
                let docstring = synthesize(&key, annotations, &options)?;
                Ok(DocstringPatch {
                    anchor: placeholder_anchor(&key),
                    class_key: key,
                    docstring,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let namespace = config.strip_namespace.then(|| NamespacePatch {
            class_name: class_name(&annotations.root.type_name),
            namespace: annotations.target_namespace.clone(),
        });

        Ok(PatchTable {
            docstrings,
            namespace,
        })
    }

    pub fn class_keys(&self) -> impl Iterator<Item = &str> {
        self.docstrings.iter().map(|p| p.class_key.as_str())
    }
}
