use regex::Regex;
use schemadoc::{Result, SchemadocError};

use crate::table::{DocstringPatch, NamespacePatch, PatchTable};
use crate::text_utils::line_indent;

/// What a patch run changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// Binding keys of the classes whose docstrings were replaced
    pub classes: Vec<String>,
    pub namespace_stripped: bool,
}

/// Apply every entry of `table` to `source`, failing on the first anchor
/// that does not match exactly once.
pub fn apply_table(source: &str, table: &PatchTable) -> Result<(String, PatchReport)> {
    let mut text = source.to_string();
    let mut report = PatchReport::default();

    for patch in &table.docstrings {
        text = apply_docstring_patch(&text, patch)?;
        log::debug!("Patched docstring of class '{}'", patch.class_key);
        report.classes.push(patch.class_key.clone());
    }

    if let Some(namespace) = &table.namespace {
        text = strip_namespace_line(&text, namespace)?;
        log::debug!("Removed namespace line from class '{}'", namespace.class_name);
        report.namespace_stripped = true;
    }

    Ok((text, report))
}

/// Byte offset of the single occurrence of `pattern` in `text`
pub fn find_unique(text: &str, pattern: &str) -> Result<usize> {
    let positions: Vec<usize> = text.match_indices(pattern).map(|(i, _)| i).collect();
    match positions.as_slice() {
        [pos] => Ok(*pos),
        _ => Err(SchemadocError::PatchAnchor {
            pattern: pattern.to_string(),
            matches: positions.len(),
        }),
    }
}

/// Replace the stub docstring with the rendered one, indented like the stub's line
pub fn apply_docstring_patch(text: &str, patch: &DocstringPatch) -> Result<String> {
    let pos = find_unique(text, &patch.anchor)?;
    let indent = line_indent(text, pos);
    let replacement = format!("\"\"\"{}\"\"\"", patch.docstring.render(indent));

    let mut out = String::with_capacity(text.len() + replacement.len());
    out.push_str(&text[..pos]);
    out.push_str(&replacement);
    out.push_str(&text[pos + patch.anchor.len()..]);
    Ok(out)
}

/// Remove the one `namespace = "..."` line inside the root class body.
///
/// The class body runs from the `class <Name>` header to the next line that
/// starts in column zero with anything but a comment.
pub fn strip_namespace_line(text: &str, patch: &NamespacePatch) -> Result<String> {
    let header = anchor_regex(&format!(r"(?m)^class {}\b", regex::escape(&patch.class_name)))?;
    let header_match = unique_regex_match(text, &header)?;

    let body_start = text[header_match.end()..]
        .find('\n')
        .map_or(text.len(), |i| header_match.end() + i + 1);
    let top_level = anchor_regex(r"(?m)^[^\s#]")?;
    let body_end = top_level
        .find(&text[body_start..])
        .map_or(text.len(), |m| body_start + m.start());
    let body = &text[body_start..body_end];

    let value = match &patch.namespace {
        Some(ns) => regex::escape(ns),
        None => "[^\"]*".to_string(),
    };
    let line = anchor_regex(&format!(r#"(?m)^[ \t]+namespace = "{value}"[ \t]*(?:\r?\n|\z)"#))?;
    let line_match = unique_regex_match(body, &line)?;

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..body_start + line_match.start()]);
    out.push_str(&text[body_start + line_match.end()..]);
    Ok(out)
}

fn anchor_regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| SchemadocError::PatchAnchor {
        pattern: format!("{pattern} ({e})"),
        matches: 0,
    })
}

fn unique_regex_match<'t>(text: &'t str, re: &Regex) -> Result<regex::Match<'t>> {
    let matches: Vec<_> = re.find_iter(text).collect();
    match matches.as_slice() {
        [m] => Ok(*m),
        _ => Err(SchemadocError::PatchAnchor {
            pattern: re.as_str().to_string(),
            matches: matches.len(),
        }),
    }
}
