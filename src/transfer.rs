//! Import/export of the whole model.
//!
//! The exported document is versioned JSON:
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "exportDate": "2024-05-01T12:00:00Z",
//!   "data": {
//!     "links": { "0": [ { "name": "A", "url": "http://a" } ] },
//!     "categories": { "default": [ ... ], "custom": [ ... ] }
//!   }
//! }
//! ```
//!
//! Import is two-phase.  [`parse_import`] validates a document without
//! touching any state and yields an [`ImportDocument`]; applying it is left
//! to the [`Launcher`](crate::launcher::Launcher) once the user confirmed.

use crate::error::LauncherError;
use crate::model::{CategorizedLinks, Category, MAX_LINKS_PER_CATEGORY};
use crate::storage::StorageError;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Version written into every export.
pub const EXPORT_VERSION: &str = "1.0";

/// The portable export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub data: ExportData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    pub links: CategorizedLinks,
    pub categories: ExportCategories,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportCategories {
    /// Built-in descriptors, informational only; never imported.
    #[serde(default)]
    pub default: Vec<Category>,
    #[serde(default)]
    pub custom: Vec<Category>,
}

/// A validated import, waiting for confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDocument {
    pub version: String,
    pub links: CategorizedLinks,
    pub custom_categories: Vec<Category>,
}

impl ImportDocument {
    /// Total number of links across all categories.
    pub fn link_count(&self) -> usize {
        self.links.values().map(Vec::len).sum()
    }
}

/// Build an export of the given model state.
pub fn export_document(
    links: &CategorizedLinks,
    builtins: &[Category],
    custom: &[Category],
    now: DateTime<Utc>,
) -> ExportDocument {
    ExportDocument {
        version: EXPORT_VERSION.to_string(),
        export_date: now,
        data: ExportData {
            links: links.clone(),
            categories: ExportCategories {
                default: builtins.to_vec(),
                custom: custom.to_vec(),
            },
        },
    }
}

/// File name for an export made at `date`.
pub fn export_file_name(date: DateTime<Utc>) -> String {
    format!("linkgrid-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Write `doc` into `dir` under [`export_file_name`] and return the path.
pub fn write_export(doc: &ExportDocument, dir: &Path) -> Result<PathBuf, LauncherError> {
    let path = dir.join(export_file_name(doc.export_date));
    let json = serde_json::to_string_pretty(doc).map_err(serialize_error)?;
    std::fs::write(&path, json).map_err(|source| LauncherError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!("exported to {}", path.display());
    Ok(path)
}

fn serialize_error(e: serde_json::Error) -> LauncherError {
    LauncherError::Storage(StorageError::Json(e))
}

/// Parse and structurally validate an import document.
///
/// The document must carry `version`, `data.links` and `data.categories`;
/// every link list must fit the category capacity.  Nothing is mutated.
pub fn parse_import(json: &str) -> Result<ImportDocument, LauncherError> {
    let root: Value = serde_json::from_str(json)
        .map_err(|e| LauncherError::InvalidFormat(format!("not valid JSON: {}", e)))?;

    let version = root
        .get("version")
        .and_then(Value::as_str)
        .ok_or_else(|| LauncherError::InvalidFormat("missing \"version\"".into()))?
        .to_string();
    if version != EXPORT_VERSION {
        warn!("importing document with version {:?}, expected {:?}", version, EXPORT_VERSION);
    }

    let data = root
        .get("data")
        .ok_or_else(|| LauncherError::InvalidFormat("missing \"data\"".into()))?;
    let links_value = data
        .get("links")
        .ok_or_else(|| LauncherError::InvalidFormat("missing \"data.links\"".into()))?;
    let categories_value = data
        .get("categories")
        .ok_or_else(|| LauncherError::InvalidFormat("missing \"data.categories\"".into()))?;

    if !links_value.is_object() {
        return Err(LauncherError::InvalidFormat("\"data.links\" must be an object".into()));
    }
    if !categories_value.is_object() {
        return Err(LauncherError::InvalidFormat(
            "\"data.categories\" must be an object".into(),
        ));
    }

    let links: CategorizedLinks = serde_json::from_value(links_value.clone())
        .map_err(|e| LauncherError::InvalidFormat(format!("bad \"data.links\": {}", e)))?;
    let categories: ExportCategories = serde_json::from_value(categories_value.clone())
        .map_err(|e| LauncherError::InvalidFormat(format!("bad \"data.categories\": {}", e)))?;

    if let Some((id, list)) = links.iter().find(|(_, l)| l.len() > MAX_LINKS_PER_CATEGORY) {
        return Err(LauncherError::InvalidFormat(format!(
            "category {} holds {} links, more than {}",
            id,
            list.len(),
            MAX_LINKS_PER_CATEGORY
        )));
    }

    Ok(ImportDocument {
        version,
        links,
        custom_categories: categories.custom,
    })
}

/// Read and validate an import document from disk.
pub fn read_import(path: &Path) -> Result<ImportDocument, LauncherError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LauncherError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_import(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::builtin_categories;
    use crate::icon::Icon;
    use crate::model::{CategoryId, Link};
    use chrono::TimeZone;

    fn fixed_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn export_has_expected_shape() {
        let mut links = CategorizedLinks::new();
        links.insert(CategoryId(0), vec![Link::new("A", "http://a")]);
        let custom = vec![Category::new(CategoryId(1_700_000_000_000), "Mine", Icon::Star)];
        let doc = export_document(&links, &builtin_categories(), &custom, fixed_date());
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["exportDate"], "2024-05-01T12:00:00Z");
        assert_eq!(json["data"]["links"]["0"][0]["name"], "A");
        assert_eq!(json["data"]["categories"]["default"].as_array().unwrap().len(), 5);
        assert_eq!(json["data"]["categories"]["custom"][0]["icon"], "Star");
    }

    #[test]
    fn export_file_name_embeds_date() {
        assert_eq!(export_file_name(fixed_date()), "linkgrid-backup-2024-05-01.json");
    }

    #[test]
    fn exported_document_parses_back() {
        let mut links = CategorizedLinks::new();
        links.insert(CategoryId(2), vec![Link::new("A", "http://a").with_icon("<svg/>")]);
        let custom = vec![Category::new(CategoryId(1_700_000_000_001), "Mine", Icon::Cpu)];
        let doc = export_document(&links, &builtin_categories(), &custom, fixed_date());
        let text = serde_json::to_string(&doc).unwrap();
        let parsed = parse_import(&text).unwrap();
        assert_eq!(parsed.links, links);
        assert_eq!(parsed.custom_categories, custom);
    }

    #[test]
    fn minimal_document_is_accepted() {
        let json = r#"{
            "version": "1.0",
            "data": {
                "links": { "0": [ { "name": "A", "url": "http://a" } ] },
                "categories": { "default": [], "custom": [] }
            }
        }"#;
        let doc = parse_import(json).unwrap();
        assert_eq!(doc.links[&CategoryId(0)], vec![Link::new("A", "http://a")]);
        assert!(doc.custom_categories.is_empty());
        assert_eq!(doc.link_count(), 1);
    }

    #[test]
    fn string_category_ids_are_accepted() {
        let json = r#"{
            "version": "1.0",
            "data": {
                "links": {},
                "categories": { "custom": [ { "id": "1700000000000", "name": "X", "icon": "Star" } ] }
            }
        }"#;
        let doc = parse_import(json).unwrap();
        assert_eq!(doc.custom_categories[0].id, CategoryId(1_700_000_000_000));
    }

    #[test]
    fn missing_sections_are_invalid_format() {
        let cases = [
            r#"not json"#,
            r#"{"data":{"links":{},"categories":{}}}"#,
            r#"{"version":"1.0"}"#,
            r#"{"version":"1.0","data":{"categories":{}}}"#,
            r#"{"version":"1.0","data":{"links":{}}}"#,
            r#"{"version":"1.0","data":{"links":[1,2],"categories":{}}}"#,
            r#"{"version":"1.0","data":{"links":{},"categories":[]}}"#,
            r#"{"version":"1.0","data":{"links":[],"categories":{}}}"#,
            r#"{"version":"1.0","data":{"links":{},"categories":null}}"#,
            r#"{"version":"1.0","data":{"links":{"0":[{"name":"no url"}]},"categories":{}}}"#,
        ];
        for case in cases {
            assert!(
                matches!(parse_import(case), Err(LauncherError::InvalidFormat(_))),
                "accepted: {}",
                case
            );
        }
    }

    #[test]
    fn serialization_failures_are_not_import_errors() {
        let e = serde_json::from_str::<Value>("{").unwrap_err();
        let err = serialize_error(e);
        assert!(matches!(err, LauncherError::Storage(StorageError::Json(_))));
        assert!(!err.to_string().contains("import"));
    }

    #[test]
    fn write_export_to_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let doc = export_document(&CategorizedLinks::new(), &builtin_categories(), &[], fixed_date());
        let err = write_export(&doc, &dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, LauncherError::Io { .. }));
    }

    #[test]
    fn oversized_category_is_rejected() {
        let links: Vec<Value> = (0..46)
            .map(|i| serde_json::json!({"name": format!("L{}", i), "url": "http://x"}))
            .collect();
        let doc = serde_json::json!({
            "version": "1.0",
            "data": { "links": { "1": links }, "categories": { "custom": [] } }
        });
        assert!(matches!(
            parse_import(&doc.to_string()),
            Err(LauncherError::InvalidFormat(_))
        ));
    }

    #[test]
    fn write_and_read_export_file() {
        let dir = tempfile::tempdir().unwrap();
        let doc = export_document(&CategorizedLinks::new(), &builtin_categories(), &[], fixed_date());
        let path = write_export(&doc, dir.path()).unwrap();
        assert!(path.ends_with("linkgrid-backup-2024-05-01.json"));
        let back = read_import(&path).unwrap();
        assert_eq!(back.version, "1.0");
        assert!(back.links.is_empty());
    }
}
