use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::RwLock;

use super::record::{ConfigurationItem, ConfigurationItemInput, ConfigurationItemRecord};
use crate::error::Error;
use crate::types::ItemId;

/// Request/response CRUD access to the `configuration_items` table.
///
/// Implementations are constructed once at startup and shared through router
/// state.
pub trait CatalogStore: Send + Sync + 'static {
    /// All rows, ordered by commission.
    fn list_raw(
        &self,
    ) -> impl Future<Output = Result<Vec<ConfigurationItemRecord>, Error>> + Send;

    /// Insert a row and return it as stored.
    fn create(
        &self,
        input: ConfigurationItemInput,
    ) -> impl Future<Output = Result<ConfigurationItemRecord, Error>> + Send;

    /// Replace a row's editable columns. [`Error::NotFound`] if `id` is unknown.
    fn update(
        &self,
        id: &ItemId,
        input: ConfigurationItemInput,
    ) -> impl Future<Output = Result<ConfigurationItemRecord, Error>> + Send;

    /// Remove a row. Deleting an unknown id is not an error.
    fn delete(&self, id: &ItemId) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Normalized catalog for the report builder.
///
/// Incomplete rows are dropped; the rest are sorted by commission.
///
/// # Errors
///
/// Propagates the store's error.
pub async fn list_items<C: CatalogStore>(store: &C) -> Result<Vec<ConfigurationItem>, Error> {
    let records = store.list_raw().await?;
    let total = records.len();
    let mut items: Vec<ConfigurationItem> = records
        .into_iter()
        .filter_map(ConfigurationItemRecord::normalize)
        .collect();
    if items.len() < total {
        tracing::debug!(
            dropped = total - items.len(),
            "Skipped incomplete catalog rows"
        );
    }
    items.sort_by(|a, b| a.commission.cmp(&b.commission));
    Ok(items)
}

/// In-process catalog for local runs without a backend, and for tests.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    rows: RwLock<Vec<ConfigurationItemRecord>>,
    next_id: AtomicU64,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new(rows: Vec<ConfigurationItemRecord>) -> Self {
        let next_id = AtomicU64::new(rows.len() as u64 + 1);
        Self {
            rows: RwLock::new(rows),
            next_id,
        }
    }

    /// Demo catalog used when no backend is configured.
    #[must_use]
    pub fn with_sample_items() -> Self {
        let row = |id: &str, ins: &str, wl: &str, obj: &str, commission: &str, instruction: &str| {
            ConfigurationItemRecord {
                id: ItemId::from(id),
                created_at: "2026-01-01T00:00:00Z".into(),
                instruction_id: Some(ins.into()),
                item_objective: Some(format!("Objetivo principal {id}")),
                commission: Some(commission.into()),
                instruction: Some(instruction.into()),
                matter: Some(format!("Materia {id}")),
                submatter: Some("Submateria 1".into()),
                work_line_id: Some(wl.into()),
                work_line: Some(format!("Línea {id}")),
                work_line_unified: None,
                item_id: Some(obj.into()),
                item_objective_2: None,
                status: Some("Activo".into()),
                year: Some(super::record::DEFAULT_YEAR),
            }
        };

        Self::new(vec![
            row("1", "INS-01", "WL-01", "OBJ-001", "Comisión A", "Instrucción 1"),
            row("2", "INS-01", "WL-02", "OBJ-002", "Comisión A", "Instrucción 2"),
            row("3", "INS-02", "WL-03", "OBJ-003", "Comisión B", "Instrucción 1"),
            row("4", "INS-03", "WL-04", "OBJ-004", "Comisión C", "Instrucción 3"),
        ])
    }

    fn allocate_id(&self) -> ItemId {
        ItemId(format!("mem-{}", self.next_id.fetch_add(1, Ordering::Relaxed)))
    }
}

impl CatalogStore for MemoryCatalog {
    async fn list_raw(&self) -> Result<Vec<ConfigurationItemRecord>, Error> {
        let mut rows = self.rows.read().await.clone();
        // Ascending with missing commissions last, like the backend's default.
        rows.sort_by(|a, b| match (&a.commission, &b.commission) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        Ok(rows)
    }

    async fn create(
        &self,
        input: ConfigurationItemInput,
    ) -> Result<ConfigurationItemRecord, Error> {
        let created_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        let record = ConfigurationItemRecord::from_input(self.allocate_id(), created_at, input);
        self.rows.write().await.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: &ItemId,
        input: ConfigurationItemInput,
    ) -> Result<ConfigurationItemRecord, Error> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|row| &row.id == id)
            .ok_or_else(|| Error::NotFound(id.clone()))?;
        *row = ConfigurationItemRecord::from_input(row.id.clone(), row.created_at.clone(), input);
        Ok(row.clone())
    }

    async fn delete(&self, id: &ItemId) -> Result<(), Error> {
        self.rows.write().await.retain(|row| &row.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::ItemForm;

    fn input(commission: &str) -> ConfigurationItemInput {
        ItemForm {
            commission: Some(commission.into()),
            instruction: Some("Instrucción".into()),
            matter: Some("Materia".into()),
            submatter: Some("Submateria".into()),
            item_objective: Some("Objetivo".into()),
            ..ItemForm::default()
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_items_sorted_and_filtered() {
        let mut incomplete = ConfigurationItemRecord::from_input(
            ItemId::from("x"),
            "now".into(),
            input("Comisión 0"),
        );
        incomplete.matter = None;

        let store = MemoryCatalog::new(vec![
            ConfigurationItemRecord::from_input(ItemId::from("b"), "now".into(), input("Zeta")),
            incomplete,
            ConfigurationItemRecord::from_input(ItemId::from("a"), "now".into(), input("Alfa")),
        ]);

        let items = list_items(&store).await.unwrap();
        let commissions: Vec<&str> = items.iter().map(|i| i.commission.as_str()).collect();
        assert_eq!(commissions, ["Alfa", "Zeta"]);
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let store = MemoryCatalog::default();
        let created = store.create(input("Comisión A")).await.unwrap();
        assert_eq!(store.list_raw().await.unwrap().len(), 1);

        let updated = store.update(&created.id, input("Comisión B")).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.commission.as_deref(), Some("Comisión B"));

        store.delete(&created.id).await.unwrap();
        assert!(store.list_raw().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let store = MemoryCatalog::default();
        let err = store.update(&ItemId::from("nope"), input("A")).await;
        assert!(matches!(err, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_created_ids_are_unique() {
        let store = MemoryCatalog::with_sample_items();
        let a = store.create(input("A")).await.unwrap();
        let b = store.create(input("B")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.list_raw().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_sample_items_normalize() {
        let store = MemoryCatalog::with_sample_items();
        assert_eq!(list_items(&store).await.unwrap().len(), 4);
    }
}
