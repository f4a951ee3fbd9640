use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::ItemId;

/// Year assigned to catalog rows that do not carry one.
pub const DEFAULT_YEAR: i32 = 2026;

const MIN_YEAR: i32 = 2000;

/// Raw `configuration_items` row as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationItemRecord {
    pub id: ItemId,
    pub created_at: String,
    #[serde(default)]
    pub instruction_id: Option<String>,
    #[serde(default)]
    pub item_objective: Option<String>,
    #[serde(default)]
    pub commission: Option<String>,
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default)]
    pub matter: Option<String>,
    #[serde(default)]
    pub submatter: Option<String>,
    #[serde(default)]
    pub work_line_id: Option<String>,
    #[serde(default)]
    pub work_line: Option<String>,
    #[serde(default)]
    pub work_line_unified: Option<String>,
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub item_objective_2: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

/// Catalog item as shown to report builders.
///
/// The four classification fields are guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationItem {
    pub id: ItemId,
    pub created_at: String,
    pub instruction_id: Option<String>,
    pub work_line_id: Option<String>,
    pub item_id: Option<String>,
    pub commission: String,
    pub instruction: String,
    pub matter: String,
    pub submatter: String,
    pub work_line: Option<String>,
    pub item_objective: Option<String>,
    pub item_objective_2: Option<String>,
    pub status: Option<String>,
    pub year: i32,
}

impl ConfigurationItemRecord {
    /// Normalize a raw row, or `None` if a classification field is missing.
    ///
    /// The unified work line wins over the per-row one.
    #[must_use]
    pub fn normalize(self) -> Option<ConfigurationItem> {
        let commission = non_empty(self.commission)?;
        let instruction = non_empty(self.instruction)?;
        let matter = non_empty(self.matter)?;
        let submatter = non_empty(self.submatter)?;

        Some(ConfigurationItem {
            id: self.id,
            created_at: self.created_at,
            instruction_id: self.instruction_id,
            work_line_id: self.work_line_id,
            item_id: self.item_id,
            commission,
            instruction,
            matter,
            submatter,
            work_line: self.work_line_unified.or(self.work_line),
            item_objective: self.item_objective,
            item_objective_2: self.item_objective_2,
            status: self.status,
            year: self.year.unwrap_or(DEFAULT_YEAR),
        })
    }

    /// Build a stored row from validated admin input.
    #[must_use]
    pub fn from_input(id: ItemId, created_at: String, input: ConfigurationItemInput) -> Self {
        Self {
            id,
            created_at,
            instruction_id: input.instruction_id,
            item_objective: Some(input.item_objective),
            commission: Some(input.commission),
            instruction: Some(input.instruction),
            matter: Some(input.matter),
            submatter: Some(input.submatter),
            work_line_id: input.work_line_id,
            work_line: input.work_line,
            work_line_unified: input.work_line_unified,
            item_id: input.item_id,
            item_objective_2: input.item_objective_2,
            status: input.status,
            year: Some(input.year),
        }
    }
}

/// Admin form submission, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemForm {
    #[serde(default)]
    pub instruction_id: Option<String>,
    #[serde(default)]
    pub work_line_id: Option<String>,
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub commission: Option<String>,
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default)]
    pub matter: Option<String>,
    #[serde(default)]
    pub submatter: Option<String>,
    #[serde(default)]
    pub work_line: Option<String>,
    #[serde(default)]
    pub work_line_unified: Option<String>,
    #[serde(default)]
    pub item_objective: Option<String>,
    #[serde(default)]
    pub item_objective_2: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

/// Validated insert/update body for the catalog backend.
///
/// Serialized with explicit `null`s so an update clears optional columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationItemInput {
    pub instruction_id: Option<String>,
    pub work_line_id: Option<String>,
    pub item_id: Option<String>,
    pub commission: String,
    pub instruction: String,
    pub matter: String,
    pub submatter: String,
    pub work_line: Option<String>,
    pub work_line_unified: Option<String>,
    pub item_objective: String,
    pub item_objective_2: Option<String>,
    pub status: Option<String>,
    pub year: i32,
}

impl ItemForm {
    /// Trim and validate the form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first offending field.
    pub fn validate(self) -> Result<ConfigurationItemInput, Error> {
        let commission = required("commission", self.commission)?;
        let instruction = required("instruction", self.instruction)?;
        let matter = required("matter", self.matter)?;
        let submatter = required("submatter", self.submatter)?;
        let item_objective = required("item_objective", self.item_objective)?;

        let year = self.year.unwrap_or(DEFAULT_YEAR);
        if year < MIN_YEAR {
            return Err(Error::Validation {
                field: "year",
                message: "must be 2000 or later",
            });
        }

        let work_line = optional(self.work_line);
        Ok(ConfigurationItemInput {
            instruction_id: optional(self.instruction_id),
            work_line_id: optional(self.work_line_id),
            item_id: optional(self.item_id),
            commission,
            instruction,
            matter,
            submatter,
            work_line_unified: optional(self.work_line_unified).or_else(|| work_line.clone()),
            work_line,
            item_objective,
            item_objective_2: optional(self.item_objective_2),
            status: optional(self.status),
            year,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(field: &'static str, value: Option<String>) -> Result<String, Error> {
    optional(value).ok_or(Error::Validation {
        field,
        message: "is required",
    })
}
