use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Date;

use super::selection::{SelectedRow, Selection};
use crate::error::Error;

/// Current draft file format.
pub const DRAFT_VERSION: u32 = 1;

/// Report header fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    #[serde(default)]
    pub entity: String,
    #[serde(default)]
    pub manager: String,
}

impl ReportMetadata {
    /// Header fields required for a final export: both at least two
    /// characters after trimming.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the short field.
    pub fn validate(&self) -> Result<(), Error> {
        for (field, value) in [("entity", &self.entity), ("manager", &self.manager)] {
            if value.trim().chars().count() < 2 {
                return Err(Error::Validation {
                    field,
                    message: "must be at least 2 characters",
                });
            }
        }
        Ok(())
    }
}

/// Saved report-in-progress, exchanged as a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftPayload {
    pub version: u32,
    pub metadata: ReportMetadata,
    pub items: Vec<SelectedRow>,
}

impl DraftPayload {
    /// Snapshot a selection. The entity is trimmed and must not be blank.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the entity is blank.
    pub fn new(metadata: &ReportMetadata, selection: &Selection) -> Result<Self, Error> {
        let entity = metadata.entity.trim();
        if entity.is_empty() {
            return Err(Error::Validation {
                field: "entity",
                message: "is required before exporting a draft",
            });
        }

        Ok(Self {
            version: DRAFT_VERSION,
            metadata: ReportMetadata {
                entity: entity.to_string(),
                manager: metadata.manager.clone(),
            },
            items: selection.rows().into_iter().cloned().collect(),
        })
    }

    /// Pretty-printed JSON, as written to the draft file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a draft file back into header fields and a selection.
    ///
    /// Rows that cannot be read as a selected catalog item are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Draft`] if the text is not JSON, the version is not
    /// [`DRAFT_VERSION`], or `items` is not an array.
    pub fn import(json: &str) -> Result<(ReportMetadata, Selection), Error> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| Error::Draft(format!("not JSON: {e}")))?;

        if value.get("version").and_then(Value::as_u64) != Some(u64::from(DRAFT_VERSION)) {
            return Err(Error::Draft("unsupported version".into()));
        }
        let items = value
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::Draft("items must be an array".into()))?;

        let metadata = value
            .get("metadata")
            .cloned()
            .and_then(|m| serde_json::from_value(m).ok())
            .unwrap_or_default();

        let total = items.len();
        let rows: Vec<SelectedRow> = items
            .iter()
            .filter_map(|row| serde_json::from_value(row.clone()).ok())
            .collect();
        if rows.len() < total {
            tracing::debug!(skipped = total - rows.len(), "Skipped unreadable draft rows");
        }

        Ok((metadata, Selection::from_rows(rows)))
    }
}

/// `<prefix>-<YYYY-MM-DD>-<entity slug>.<extension>`.
#[must_use]
pub fn export_filename(prefix: &str, date: Date, entity: &str, extension: &str) -> String {
    format!("{prefix}-{date}-{}.{extension}", entity_slug(entity))
}

/// ASCII letters, digits, `-`, `_` kept; whitespace runs become `-`.
/// Falls back to `entidad` when nothing is left.
#[must_use]
pub fn entity_slug(entity: &str) -> String {
    let kept: String = entity
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' '))
        .collect();
    let slug = kept.split_whitespace().collect::<Vec<_>>().join("-");
    if slug.is_empty() {
        "entidad".to_string()
    } else {
        slug
    }
}
