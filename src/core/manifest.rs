//! Maven `pom.xml` dependency extraction.
//!
//! Parsing runs in two passes. The first walks the XML and collects every
//! namespaced `<dependency>` element with its direct `groupId`, `artifactId`
//! and `version` children; a syntax error rejects the whole document. The
//! second pass validates each dependency in document order and applies the
//! placeholder filter, stopping at the first dependency with a missing child.

use crate::domain::model::{DependencyRecord, ParseReport, SkippedDependency};
use crate::utils::error::{InventoryError, Result};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

pub const POM_NAMESPACE: &str = "http://maven.apache.org/POM/4.0.0";

const PLACEHOLDER_MARKER: &str = "${";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    GroupId,
    ArtifactId,
    Version,
}

impl Field {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"groupId" => Some(Field::GroupId),
            b"artifactId" => Some(Field::ArtifactId),
            b"version" => Some(Field::Version),
            _ => None,
        }
    }

    fn element_name(self) -> &'static str {
        match self {
            Field::GroupId => "groupId",
            Field::ArtifactId => "artifactId",
            Field::Version => "version",
        }
    }
}

/// `None` means the child element is absent, `Some("")` means it is present but empty.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct RawDependency {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
}

impl RawDependency {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::GroupId => &mut self.group_id,
            Field::ArtifactId => &mut self.artifact_id,
            Field::Version => &mut self.version,
        }
    }

    fn require(&self, field: Field) -> Result<()> {
        let present = match field {
            Field::GroupId => self.group_id.is_some(),
            Field::ArtifactId => self.artifact_id.is_some(),
            Field::Version => self.version.is_some(),
        };
        if present {
            Ok(())
        } else {
            Err(InventoryError::MissingElementError {
                artifact: self
                    .artifact_id
                    .clone()
                    .unwrap_or_else(|| "<unknown>".to_string()),
                element: field.element_name().to_string(),
            })
        }
    }
}

/// Accepts a version only when it is present, non-empty and free of `${`.
pub fn is_concrete_version(version: Option<&str>) -> bool {
    matches!(version, Some(v) if !v.is_empty() && !v.contains(PLACEHOLDER_MARKER))
}

/// Parses manifest bytes. Failures end up in [`ParseReport::error`], never in a panic or `Err`.
pub fn parse_manifest_bytes(bytes: &[u8]) -> ParseReport {
    match std::str::from_utf8(bytes) {
        Ok(xml) => parse_manifest(xml),
        Err(e) => {
            let error = InventoryError::ManifestParseError {
                message: format!("manifest is not valid UTF-8: {}", e),
            };
            tracing::error!("❌ Error occurred while parsing manifest: {}", error);
            ParseReport {
                error: Some(error),
                ..Default::default()
            }
        }
    }
}

pub fn parse_manifest(xml: &str) -> ParseReport {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);

    let raw = match collect_dependencies(xml) {
        Ok(raw) => raw,
        Err(error) => {
            tracing::error!("❌ Error occurred while parsing manifest: {}", error);
            return ParseReport {
                error: Some(error),
                ..Default::default()
            };
        }
    };

    tracing::info!("Number of dependency elements found: {}", raw.len());
    if raw.is_empty() {
        tracing::info!("No dependency elements found");
    }

    let mut report = ParseReport::default();
    for dependency in raw {
        let checked = dependency
            .require(Field::GroupId)
            .and_then(|_| dependency.require(Field::ArtifactId))
            .and_then(|_| dependency.require(Field::Version));
        if let Err(error) = checked {
            tracing::error!("❌ Error occurred while parsing manifest: {}", error);
            report.error = Some(error);
            break;
        }

        let RawDependency {
            group_id,
            artifact_id,
            version,
        } = dependency;
        let artifact_id = artifact_id.unwrap_or_default();

        if is_concrete_version(version.as_deref()) {
            report.records.push(DependencyRecord::new(
                group_id.unwrap_or_default(),
                artifact_id,
                version.unwrap_or_default(),
            ));
        } else {
            tracing::info!(
                "⏭️  Skipping dependency {} due to placeholder version",
                artifact_id
            );
            report.skipped.push(SkippedDependency {
                artifact_id,
                version: version.filter(|v| !v.is_empty()),
            });
        }
    }

    for record in &report.records {
        tracing::debug!(
            "Artifact ID: {}, Version: {}",
            record.artifact_id,
            record.version
        );
    }

    report
}

fn collect_dependencies(xml: &str) -> Result<Vec<RawDependency>> {
    let mut reader = NsReader::from_str(xml);

    let mut found = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    // (depth of the open <dependency>, its children so far)
    let mut current: Option<(usize, RawDependency)> = None;
    let mut capture: Option<Field> = None;

    loop {
        let (ns, event) = reader.read_resolved_event()?;
        let in_pom = matches!(ns, ResolveResult::Bound(Namespace(uri)) if uri == POM_NAMESPACE.as_bytes());

        match event {
            Event::Start(e) => {
                depth += 1;
                seen_root = true;
                let local = e.local_name();
                if current.is_none() {
                    if in_pom && local.as_ref() == b"dependency" {
                        current = Some((depth, RawDependency::default()));
                    }
                } else if let Some((dep_depth, dependency)) = current.as_mut() {
                    if depth == *dep_depth + 1 {
                        capture = if in_pom {
                            Field::from_local_name(local.as_ref())
                        } else {
                            None
                        };
                        if let Some(field) = capture {
                            // 同名欄位只取第一個
                            let slot = dependency.slot(field);
                            if slot.is_some() {
                                capture = None;
                            } else {
                                *slot = Some(String::new());
                            }
                        }
                    } else {
                        // 欄位文字到第一個子元素為止
                        capture = None;
                    }
                }
            }
            Event::Empty(e) => {
                seen_root = true;
                let local = e.local_name();
                if current.is_none() {
                    if in_pom && local.as_ref() == b"dependency" {
                        found.push(RawDependency::default());
                    }
                } else if let Some((dep_depth, dependency)) = current.as_mut() {
                    if depth == *dep_depth {
                        let field = Field::from_local_name(local.as_ref()).filter(|_| in_pom);
                        if let Some(field) = field {
                            dependency.slot(field).get_or_insert_with(String::new);
                        }
                    } else if depth == *dep_depth + 1 {
                        capture = None;
                    }
                }
            }
            Event::End(_) => {
                let open_at = current.as_ref().map(|(dep_depth, _)| *dep_depth);
                if open_at == Some(depth) {
                    if let Some((_, dependency)) = current.take() {
                        found.push(dependency);
                    }
                } else if open_at.map(|d| d + 1) == Some(depth) {
                    capture = None;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(t) => {
                let text = std::str::from_utf8(&t).map_err(|e| InventoryError::ManifestParseError {
                    message: format!("invalid UTF-8 in text node: {}", e),
                })?;
                append_captured(&mut current, capture, depth, text);
            }
            Event::CData(c) => {
                let text = std::str::from_utf8(&c).map_err(|e| InventoryError::ManifestParseError {
                    message: format!("invalid UTF-8 in CDATA section: {}", e),
                })?;
                append_captured(&mut current, capture, depth, text);
            }
            Event::GeneralRef(r) => {
                let name = std::str::from_utf8(&r).map_err(|e| InventoryError::ManifestParseError {
                    message: format!("invalid UTF-8 in entity reference: {}", e),
                })?;
                let resolved = resolve_entity(name)?;
                append_captured(&mut current, capture, depth, &resolved.to_string());
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(InventoryError::ManifestParseError {
            message: "no root element found".to_string(),
        });
    }
    if depth != 0 {
        return Err(InventoryError::ManifestParseError {
            message: format!("document ended with {} unclosed element(s)", depth),
        });
    }

    Ok(found)
}

fn append_captured(
    current: &mut Option<(usize, RawDependency)>,
    capture: Option<Field>,
    depth: usize,
    text: &str,
) {
    if let (Some(field), Some((dep_depth, dependency))) = (capture, current.as_mut()) {
        // 只取欄位元素本身的文字
        if depth == *dep_depth + 1 {
            dependency
                .slot(field)
                .get_or_insert_with(String::new)
                .push_str(text);
        }
    }
}

fn resolve_entity(name: &str) -> Result<char> {
    let resolved = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => name.strip_prefix('#').and_then(|code| {
            let value = match code.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => code.parse::<u32>().ok(),
            };
            value.and_then(char::from_u32)
        }),
    };

    resolved.ok_or_else(|| InventoryError::ManifestParseError {
        message: format!("undefined entity: &{};", name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pom(dependencies: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>org.example</groupId>
  <artifactId>demo</artifactId>
  <version>1.0.0</version>
  <dependencies>{}</dependencies>
</project>"#,
            dependencies
        )
    }

    #[test]
    fn test_placeholder_version_is_skipped() {
        let xml = pom(
            r#"
    <dependency>
      <groupId>org.springframework</groupId>
      <artifactId>spring-core</artifactId>
      <version>3.2.1</version>
    </dependency>
    <dependency>
      <groupId>org.springframework</groupId>
      <artifactId>spring-web</artifactId>
      <version>${spring.version}</version>
    </dependency>"#,
        );

        let report = parse_manifest(&xml);

        assert!(report.is_complete());
        assert_eq!(
            report.records,
            vec![DependencyRecord::new(
                "org.springframework",
                "spring-core",
                "3.2.1"
            )]
        );
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].artifact_id, "spring-web");
        assert_eq!(
            report.skipped[0].version.as_deref(),
            Some("${spring.version}")
        );
    }

    #[test]
    fn test_no_dependencies_yields_empty_report() {
        let report = parse_manifest(&pom(""));
        assert!(report.is_complete());
        assert!(report.records.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_version_is_passed_through_verbatim() {
        let xml = pom(
            r#"<dependency><groupId>g</groupId><artifactId>a</artifactId><version> 1.0-SNAPSHOT </version></dependency>"#,
        );
        let report = parse_manifest(&xml);
        assert_eq!(report.records[0].version, " 1.0-SNAPSHOT ");
    }

    #[test]
    fn test_empty_version_is_skipped() {
        let xml = pom(
            r#"<dependency><groupId>g</groupId><artifactId>a</artifactId><version/></dependency>
               <dependency><groupId>g</groupId><artifactId>b</artifactId><version></version></dependency>"#,
        );
        let report = parse_manifest(&xml);
        assert!(report.is_complete());
        assert!(report.records.is_empty());
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].version, None);
    }

    #[test]
    fn test_repeated_field_keeps_first_value() {
        let xml = pom(
            r#"<dependency><groupId>g</groupId><artifactId>a</artifactId><artifactId>b</artifactId><version>1.0</version><version>2.0</version></dependency>"#,
        );
        let report = parse_manifest(&xml);
        assert_eq!(report.records, vec![DependencyRecord::new("g", "a", "1.0")]);
    }

    #[test]
    fn test_empty_first_field_is_not_replaced_by_later_sibling() {
        let xml = pom(
            r#"<dependency><groupId>g</groupId><artifactId>a</artifactId><version/><version>2.0</version></dependency>"#,
        );
        let report = parse_manifest(&xml);
        assert!(report.records.is_empty());
        assert_eq!(report.skipped.len(), 1);
    }

    #[test]
    fn test_field_text_stops_at_nested_element() {
        let xml = pom(
            r#"<dependency><groupId>g</groupId><artifactId>a</artifactId><version>1.0<x/>tail</version></dependency>
               <dependency><groupId>g</groupId><artifactId>b</artifactId><version>2.0<x>inner</x>tail</version></dependency>"#,
        );
        let report = parse_manifest(&xml);
        let versions: Vec<&str> = report
            .records
            .iter()
            .map(|r| r.version.as_str())
            .collect();
        assert_eq!(versions, vec!["1.0", "2.0"]);
    }

    #[test]
    fn test_exclusions_do_not_leak_into_parent() {
        let xml = pom(
            r#"
    <dependency>
      <groupId>org.hibernate</groupId>
      <artifactId>hibernate-core</artifactId>
      <version>5.4.0</version>
      <exclusions>
        <exclusion>
          <groupId>org.jboss</groupId>
          <artifactId>jandex</artifactId>
        </exclusion>
      </exclusions>
    </dependency>"#,
        );
        let report = parse_manifest(&xml);
        assert_eq!(
            report.records,
            vec![DependencyRecord::new(
                "org.hibernate",
                "hibernate-core",
                "5.4.0"
            )]
        );
    }

    #[test]
    fn test_dependencies_found_at_any_depth() {
        let xml = r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
  <dependencyManagement>
    <dependencies>
      <dependency><groupId>g</groupId><artifactId>managed</artifactId><version>1</version></dependency>
    </dependencies>
  </dependencyManagement>
  <build><plugins><plugin>
    <artifactId>maven-surefire-plugin</artifactId>
    <dependencies>
      <dependency><groupId>g</groupId><artifactId>plugin-dep</artifactId><version>2</version></dependency>
    </dependencies>
  </plugin></plugins></build>
</project>"#;
        let report = parse_manifest(xml);
        let names: Vec<&str> = report
            .records
            .iter()
            .map(|r| r.artifact_id.as_str())
            .collect();
        assert_eq!(names, vec!["managed", "plugin-dep"]);
    }

    #[test]
    fn test_foreign_namespace_is_ignored() {
        let xml = r#"<project>
  <dependencies>
    <dependency><groupId>g</groupId><artifactId>a</artifactId><version>1</version></dependency>
  </dependencies>
</project>"#;
        let report = parse_manifest(xml);
        assert!(report.is_complete());
        assert!(report.records.is_empty());
    }

    #[test]
    fn test_prefixed_namespace_is_matched() {
        let xml = r#"<m:project xmlns:m="http://maven.apache.org/POM/4.0.0">
  <m:dependencies>
    <m:dependency><m:groupId>g</m:groupId><m:artifactId>a</m:artifactId><m:version>1</m:version></m:dependency>
  </m:dependencies>
</m:project>"#;
        let report = parse_manifest(xml);
        assert_eq!(report.records, vec![DependencyRecord::new("g", "a", "1")]);
    }

    #[test]
    fn test_missing_child_keeps_earlier_records() {
        let xml = pom(
            r#"
    <dependency><groupId>g</groupId><artifactId>first</artifactId><version>1.0</version></dependency>
    <dependency><groupId>g</groupId><artifactId>managed</artifactId></dependency>
    <dependency><groupId>g</groupId><artifactId>never-reached</artifactId><version>2.0</version></dependency>"#,
        );
        let report = parse_manifest(&xml);

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].artifact_id, "first");
        match report.error {
            Some(InventoryError::MissingElementError { artifact, element }) => {
                assert_eq!(artifact, "managed");
                assert_eq!(element, "version");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_xml_yields_no_records() {
        let xml = r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
  <dependencies>
    <dependency><groupId>g</groupId><artifactId>a</artifactId><version>1</version></dependency>
  </dependencies>
</projet>"#;
        let report = parse_manifest(xml);
        assert!(report.records.is_empty());
        assert!(report.error.is_some());
    }

    #[test]
    fn test_truncated_document_is_an_error() {
        let xml = r#"<project xmlns="http://maven.apache.org/POM/4.0.0"><dependencies>"#;
        let report = parse_manifest(xml);
        assert!(report.error.is_some());
    }

    #[test]
    fn test_empty_document_is_an_error() {
        let report = parse_manifest("");
        assert!(report.error.is_some());
    }

    #[test]
    fn test_entities_and_cdata_are_resolved() {
        let xml = pom(
            r#"<dependency><groupId>g</groupId><artifactId>a&amp;b</artifactId><version><![CDATA[1.0]]>&#x2D;rc</version></dependency>"#,
        );
        let report = parse_manifest(&xml);
        assert_eq!(report.records[0].artifact_id, "a&b");
        assert_eq!(report.records[0].version, "1.0-rc");
    }

    #[test]
    fn test_invalid_utf8_is_reported() {
        let report = parse_manifest_bytes(&[0x3c, 0xff, 0xfe]);
        assert!(matches!(
            report.error,
            Some(InventoryError::ManifestParseError { .. })
        ));
    }

    #[test]
    fn test_is_concrete_version() {
        assert!(is_concrete_version(Some("3.2.1")));
        assert!(!is_concrete_version(Some("${project.version}")));
        assert!(!is_concrete_version(Some("1.${minor}")));
        assert!(!is_concrete_version(Some("")));
        assert!(!is_concrete_version(None));
    }
}
