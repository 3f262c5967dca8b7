//! schemadoc code patching - writes XSD documentation into generated bindings.
//!
//! The main entry point is [`patch_docstrings`], which reads an XSD file,
//! synthesizes a docstring for every bound class, and rewrites the stub
//! docstrings of a freshly generated source file in place.

pub mod patcher;
pub mod permissions;
pub mod synthesizer;
pub mod table;
pub mod text_utils;

use schemadoc::schema::{parse_schema_str_with, parse_schema_with};
use schemadoc::{extract_annotations, AnnotationMap, Result, SchemadocConfig};
use std::path::Path;

pub use patcher::PatchReport;
pub use permissions::WritableFile;
pub use synthesizer::{synthesize, Docstring, DocstringOptions};
pub use table::PatchTable;

/// Patch the generated source at `source_path` with documentation from the
/// XSD at `schema_path`, using the default configuration.
///
/// The source must be freshly generated: its stub docstrings are the anchors,
/// so a file that was already patched fails with `PatchAnchor`. The file is
/// made writable for the run and left read-only afterwards, also on failure.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// schemadoc_codegen::patch_docstrings(Path::new("ORI-A.xsd"), Path::new("ORI_A/ORI_A.py"))
///     .unwrap();
/// ```
pub fn patch_docstrings(schema_path: &Path, source_path: &Path) -> Result<()> {
    let window = WritableFile::open(source_path)?;
    patch_docstrings_with(schema_path, window.path(), &SchemadocConfig::default()).map(|_| ())
}

/// Like [`patch_docstrings`] with an explicit configuration. Returns what changed.
///
/// Does not touch file permissions; hold a [`WritableFile`] around the call
/// for that.
pub fn patch_docstrings_with(
    schema_path: &Path,
    source_path: &Path,
    config: &SchemadocConfig,
) -> Result<PatchReport> {
    config.validate()?;
    let schema = parse_schema_with(schema_path, &config.parse_options())?;
    let annotations = extract_annotations(&schema);
    log::info!(
        "Loaded {} types from {} (root element '{}')",
        annotations.types.len(),
        schema_path.display(),
        annotations.root.element
    );

    let source = std::fs::read_to_string(source_path)?;
    let (patched, report) = patch_source(&source, &annotations, config)?;
    std::fs::write(source_path, patched)?;

    log::info!(
        "Patched {} docstrings in {}",
        report.classes.len(),
        source_path.display()
    );
    Ok(report)
}

/// Patch source text in memory. Pure: no file access.
pub fn patch_source(
    source: &str,
    annotations: &AnnotationMap,
    config: &SchemadocConfig,
) -> Result<(String, PatchReport)> {
    let table = PatchTable::build(source, annotations, config)?;
    patcher::apply_table(source, &table)
}

/// Patch source text against an XSD given as a string.
///
/// Like [`patch_docstrings_with`] but takes both documents directly instead
/// of reading files. Useful for testing.
pub fn patch_source_str(
    schema_xsd: &str,
    source: &str,
    config: &SchemadocConfig,
) -> Result<String> {
    config.validate()?;
    let schema = parse_schema_str_with(schema_xsd, &config.parse_options())?;
    let annotations = extract_annotations(&schema);
    patch_source(source, &annotations, config).map(|(text, _)| text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schemadoc::SchemadocError;
    use tempfile::TempDir;

    const ORI_A_XSD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns="https://ori-a.nl"
           targetNamespace="https://ori-a.nl"
           elementFormDefault="qualified">
  <xs:element name="ORI-A">
    <xs:annotation>
      <xs:documentation>Root container.</xs:documentation>
    </xs:annotation>
    <xs:complexType>
      <xs:sequence>
        <xs:element name="identifier" type="xs:string">
          <xs:annotation>
            <xs:documentation>
              Unique
              identifier.
            </xs:documentation>
          </xs:annotation>
        </xs:element>
      </xs:sequence>
    </xs:complexType>
  </xs:element>
</xs:schema>
"#;

    const ORI_A_SOURCE: &str = r#"from dataclasses import dataclass


@dataclass
class ORI_A:
    """{{docs.ORI_A}}"""

    identifier: str

    class Meta:
        name = "ORI-A"
        namespace = "https://ori-a.nl"
"#;

    const ORI_A_EXPECTED: &str = r#"from dataclasses import dataclass


@dataclass
class ORI_A:
    """Binding for the root element `ORI-A`.

    Root container.

    Attributes:
        identifier: Unique identifier.
    """

    identifier: str

    class Meta:
        name = "ORI-A"
"#;

    #[test]
    fn test_patch_source_str_end_to_end() {
        let patched =
            patch_source_str(ORI_A_XSD, ORI_A_SOURCE, &SchemadocConfig::default()).unwrap();
        assert_eq!(patched, ORI_A_EXPECTED);
        assert!(!patched.contains("namespace = "));
    }

    #[test]
    fn test_patch_docstrings_overwrites_file() {
        let tmp = TempDir::new().unwrap();
        let schema_path = tmp.path().join("ORI-A.xsd");
        let source_path = tmp.path().join("ORI_A.py");
        std::fs::write(&schema_path, ORI_A_XSD).unwrap();
        std::fs::write(&source_path, ORI_A_SOURCE).unwrap();

        patch_docstrings(&schema_path, &source_path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&source_path).unwrap(),
            ORI_A_EXPECTED
        );
        assert!(std::fs::metadata(&source_path)
            .unwrap()
            .permissions()
            .readonly());
    }

    #[test]
    fn test_patching_twice_fails() {
        let tmp = TempDir::new().unwrap();
        let schema_path = tmp.path().join("ORI-A.xsd");
        let source_path = tmp.path().join("ORI_A.py");
        std::fs::write(&schema_path, ORI_A_XSD).unwrap();
        std::fs::write(&source_path, ORI_A_SOURCE).unwrap();

        patch_docstrings(&schema_path, &source_path).unwrap();
        let err = patch_docstrings(&schema_path, &source_path).unwrap_err();
        assert!(matches!(err, SchemadocError::PatchAnchor { matches: 0, .. }));
        assert!(std::fs::metadata(&source_path)
            .unwrap()
            .permissions()
            .readonly());
    }

    #[test]
    fn test_regenerated_file_patches_identically() {
        let config = SchemadocConfig::default();
        let first = patch_source_str(ORI_A_XSD, ORI_A_SOURCE, &config).unwrap();
        let second = patch_source_str(ORI_A_XSD, ORI_A_SOURCE, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_keep_namespace() {
        let config = SchemadocConfig {
            strip_namespace: false,
            ..Default::default()
        };
        let patched = patch_source_str(ORI_A_XSD, ORI_A_SOURCE, &config).unwrap();
        assert!(patched.contains("        namespace = \"https://ori-a.nl\"\n"));
    }

    #[test]
    fn test_malformed_schema() {
        let err = patch_source_str("<xs:schema", ORI_A_SOURCE, &SchemadocConfig::default())
            .unwrap_err();
        assert!(matches!(err, SchemadocError::SchemaParse(_)));
    }

    #[test]
    fn test_invalid_config_rejected_before_reading() {
        let tmp = TempDir::new().unwrap();
        let config = SchemadocConfig {
            line_width: 3,
            ..Default::default()
        };
        let err = patch_docstrings_with(
            &tmp.path().join("missing.xsd"),
            &tmp.path().join("missing.py"),
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, SchemadocError::Config(_)));
    }
}
