use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::ConfigurationItem;
use crate::error::Error;
use crate::types::ItemId;

/// Group label for rows whose instruction is blank.
pub const NO_INSTRUCTION: &str = "Sin instruccion";

/// A catalog item included in a report, with its per-row annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedRow {
    pub item: ConfigurationItem,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub observations: String,
}

impl SelectedRow {
    #[must_use]
    pub fn new(item: ConfigurationItem) -> Self {
        Self {
            item,
            deadline: String::new(),
            observations: String::new(),
        }
    }
}

/// The set of catalog items chosen for a report, keyed by item id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    rows: BTreeMap<ItemId, SelectedRow>,
}

impl Selection {
    /// Every catalog item selected, with empty annotations.
    #[must_use]
    pub fn all(items: &[ConfigurationItem]) -> Self {
        Self::from_rows(items.iter().cloned().map(SelectedRow::new))
    }

    /// Build from rows; a later row with the same id replaces an earlier one.
    #[must_use]
    pub fn from_rows(rows: impl IntoIterator<Item = SelectedRow>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|row| (row.item.id.clone(), row))
                .collect(),
        }
    }

    /// Add an item. Returns `false` and keeps the existing row if already present.
    pub fn add(&mut self, item: ConfigurationItem) -> bool {
        if self.rows.contains_key(&item.id) {
            return false;
        }
        self.rows.insert(item.id.clone(), SelectedRow::new(item));
        true
    }

    pub fn remove(&mut self, id: &ItemId) -> Option<SelectedRow> {
        self.rows.remove(id)
    }

    /// Reselect the whole catalog, keeping annotations on rows already present.
    ///
    /// Rows for items no longer in `items` are dropped.
    pub fn restore_all(&mut self, items: &[ConfigurationItem]) {
        let mut previous = std::mem::take(&mut self.rows);
        self.rows = items
            .iter()
            .map(|item| {
                let row = previous
                    .remove(&item.id)
                    .unwrap_or_else(|| SelectedRow::new(item.clone()));
                (item.id.clone(), row)
            })
            .collect();
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Set a row's deadline. Returns `false` if the item is not selected.
    pub fn set_deadline(&mut self, id: &ItemId, deadline: impl Into<String>) -> bool {
        let Some(row) = self.rows.get_mut(id) else {
            return false;
        };
        row.deadline = deadline.into();
        true
    }

    /// Set a row's observations. Returns `false` if the item is not selected.
    pub fn set_observations(&mut self, id: &ItemId, observations: impl Into<String>) -> bool {
        let Some(row) = self.rows.get_mut(id) else {
            return false;
        };
        row.observations = observations.into();
        true
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.rows.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows ordered by instruction, then work line, then objective.
    #[must_use]
    pub fn rows(&self) -> Vec<&SelectedRow> {
        let mut rows: Vec<&SelectedRow> = self.rows.values().collect();
        rows.sort_by(|a, b| {
            a.item
                .instruction
                .cmp(&b.item.instruction)
                .then_with(|| opt(&a.item.work_line).cmp(opt(&b.item.work_line)))
                .then_with(|| opt(&a.item.item_objective).cmp(opt(&b.item.item_objective)))
        });
        rows
    }

    /// Catalog items not yet selected, in catalog order.
    #[must_use]
    pub fn available<'a>(&self, all: &'a [ConfigurationItem]) -> Vec<&'a ConfigurationItem> {
        all.iter().filter(|item| !self.contains(&item.id)).collect()
    }
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Distinct non-empty instructions across `items`, sorted.
#[must_use]
pub fn instruction_options(items: &[ConfigurationItem]) -> Vec<String> {
    items
        .iter()
        .filter(|item| !item.instruction.is_empty())
        .map(|item| item.instruction.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Instruction filter; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstructionFilter(BTreeSet<String>);

impl InstructionFilter {
    #[must_use]
    pub fn new(instructions: impl IntoIterator<Item = String>) -> Self {
        Self(instructions.into_iter().collect())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn matches(&self, instruction: &str) -> bool {
        self.0.is_empty() || self.0.contains(instruction)
    }

    #[must_use]
    pub fn apply_rows<'a>(&self, rows: Vec<&'a SelectedRow>) -> Vec<&'a SelectedRow> {
        rows.into_iter()
            .filter(|row| self.matches(&row.item.instruction))
            .collect()
    }

    /// Filter catalog items. Items with a blank instruction never match a
    /// non-empty filter.
    #[must_use]
    pub fn apply_items<'a>(&self, items: Vec<&'a ConfigurationItem>) -> Vec<&'a ConfigurationItem> {
        items
            .into_iter()
            .filter(|item| {
                self.is_empty() || (!item.instruction.is_empty() && self.matches(&item.instruction))
            })
            .collect()
    }
}

/// Rows sharing one instruction.
#[derive(Debug, Clone, Serialize)]
pub struct InstructionGroup<'a> {
    pub instruction: &'a str,
    pub rows: Vec<&'a SelectedRow>,
}

/// Group rows by instruction, groups sorted by label, row order preserved.
#[must_use]
pub fn group_by_instruction<'a>(rows: &[&'a SelectedRow]) -> Vec<InstructionGroup<'a>> {
    let mut groups: BTreeMap<&'a str, Vec<&'a SelectedRow>> = BTreeMap::new();
    for &row in rows {
        let label = if row.item.instruction.is_empty() {
            NO_INSTRUCTION
        } else {
            row.item.instruction.as_str()
        };
        groups.entry(label).or_default().push(row);
    }
    groups
        .into_iter()
        .map(|(instruction, rows)| InstructionGroup { instruction, rows })
        .collect()
}

/// Rows must be non-empty and every row must carry a deadline before a
/// report can be exported.
///
/// # Errors
///
/// Returns [`Error::Validation`] on `rows` for an empty selection, or on
/// `deadline` when any row has a blank one.
pub fn ensure_exportable(rows: &[&SelectedRow]) -> Result<(), Error> {
    if rows.is_empty() {
        return Err(Error::Validation {
            field: "rows",
            message: "select at least one item before exporting",
        });
    }
    if rows.iter().any(|row| row.deadline.trim().is_empty()) {
        return Err(Error::Validation {
            field: "deadline",
            message: "is required for every item",
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn item(
        id: &str,
        instruction: &str,
        work_line: Option<&str>,
        objective: &str,
    ) -> ConfigurationItem {
        ConfigurationItem {
            id: ItemId::from(id),
            created_at: "2026-01-01T00:00:00Z".into(),
            instruction_id: None,
            work_line_id: None,
            item_id: Some(format!("OBJ-{id}")),
            commission: "Comisión A".into(),
            instruction: instruction.into(),
            matter: "Materia".into(),
            submatter: "Submateria".into(),
            work_line: work_line.map(str::to_string),
            item_objective: Some(objective.into()),
            item_objective_2: None,
            status: None,
            year: 2026,
        }
    }

    fn catalog() -> Vec<ConfigurationItem> {
        vec![
            item("1", "Instrucción 2", Some("Línea 1"), "B"),
            item("2", "Instrucción 1", Some("Línea 2"), "A"),
            item("3", "Instrucción 1", Some("Línea 1"), "Z"),
            item("4", "Instrucción 1", None, "C"),
        ]
    }

    fn ids(rows: &[&SelectedRow]) -> Vec<String> {
        rows.iter().map(|r| r.item.id.to_string()).collect()
    }

    #[test]
    fn test_rows_sorted() {
        let selection = Selection::all(&catalog());
        assert_eq!(ids(&selection.rows()), ["4", "3", "2", "1"]);
    }

    #[test]
    fn test_add_is_idempotent() {
        let items = catalog();
        let mut selection = Selection::default();
        assert!(selection.add(items[0].clone()));
        assert!(selection.set_deadline(&items[0].id, "Primer trimestre"));
        assert!(!selection.add(items[0].clone()));
        assert_eq!(selection.len(), 1);
        assert_eq!(selection.rows()[0].deadline, "Primer trimestre");
    }

    #[test]
    fn test_remove_and_available() {
        let items = catalog();
        let mut selection = Selection::all(&items);
        assert!(selection.remove(&ItemId::from("2")).is_some());
        assert!(selection.remove(&ItemId::from("2")).is_none());
        let available: Vec<&str> = selection
            .available(&items)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(available, ["2"]);
    }

    #[test]
    fn test_restore_all_keeps_annotations() {
        let items = catalog();
        let mut selection = Selection::all(&items);
        selection.set_observations(&ItemId::from("1"), "revisar");
        selection.remove(&ItemId::from("3"));
        selection.restore_all(&items);

        assert_eq!(selection.len(), 4);
        let row = selection
            .rows()
            .into_iter()
            .find(|r| r.item.id.as_str() == "1")
            .unwrap();
        assert_eq!(row.observations, "revisar");
    }

    #[test]
    fn test_restore_all_drops_items_gone_from_catalog() {
        let items = catalog();
        let mut selection = Selection::all(&items);
        selection.restore_all(&items[..2]);
        assert_eq!(selection.len(), 2);
        assert!(!selection.contains(&ItemId::from("4")));
    }

    #[test]
    fn test_clear() {
        let mut selection = Selection::all(&catalog());
        selection.clear();
        assert!(selection.is_empty());
        assert!(!selection.set_deadline(&ItemId::from("1"), "x"));
    }

    #[test]
    fn test_instruction_options() {
        let mut items = catalog();
        items.push(item("5", "", None, "D"));
        assert_eq!(instruction_options(&items), ["Instrucción 1", "Instrucción 2"]);
    }

    #[test]
    fn test_filter_rows() {
        let selection = Selection::all(&catalog());
        let filter = InstructionFilter::new(["Instrucción 2".to_string()]);
        assert_eq!(ids(&filter.apply_rows(selection.rows())), ["1"]);

        let everything = InstructionFilter::default();
        assert_eq!(everything.apply_rows(selection.rows()).len(), 4);
    }

    #[test]
    fn test_filter_items_skips_blank_instruction() {
        let mut items = catalog();
        items.push(item("5", "", None, "D"));
        let refs: Vec<&ConfigurationItem> = items.iter().collect();

        let filter = InstructionFilter::new(["Instrucción 1".to_string()]);
        assert_eq!(filter.apply_items(refs.clone()).len(), 3);
        assert_eq!(InstructionFilter::default().apply_items(refs).len(), 5);
    }

    #[test]
    fn test_group_by_instruction() {
        let mut items = catalog();
        items.push(item("5", "", None, "D"));
        let selection = Selection::all(&items);
        let rows = selection.rows();
        let groups = group_by_instruction(&rows);

        let labels: Vec<&str> = groups.iter().map(|g| g.instruction).collect();
        assert_eq!(labels, ["Instrucción 1", "Instrucción 2", NO_INSTRUCTION]);
        assert_eq!(ids(&groups[0].rows), ["4", "3", "2"]);
    }

    #[test]
    fn test_from_rows_last_wins() {
        let a = item("1", "I", None, "A");
        let mut first = SelectedRow::new(a.clone());
        first.deadline = "old".into();
        let mut second = SelectedRow::new(a);
        second.deadline = "new".into();

        let selection = Selection::from_rows([first, second]);
        assert_eq!(selection.len(), 1);
        assert_eq!(selection.rows()[0].deadline, "new");
    }

    #[test]
    fn test_ensure_exportable() {
        let mut selection = Selection::all(&catalog());
        assert!(matches!(
            ensure_exportable(&[]),
            Err(Error::Validation { field: "rows", .. })
        ));
        assert!(matches!(
            ensure_exportable(&selection.rows()),
            Err(Error::Validation { field: "deadline", .. })
        ));

        for id in ["1", "2", "3"] {
            selection.set_deadline(&ItemId::from(id), "Primer trimestre");
        }
        selection.set_deadline(&ItemId::from("4"), "  ");
        assert!(ensure_exportable(&selection.rows()).is_err());

        selection.set_deadline(&ItemId::from("4"), "Año completo");
        assert!(ensure_exportable(&selection.rows()).is_ok());
    }
}
