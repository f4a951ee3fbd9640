use axum::Json;
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::error::ApiError;
use super::state::AppState;
use crate::catalog::{self, CatalogStore, ConfigurationItem};
use crate::error::Error;
use crate::report::{
    DraftPayload, InstructionFilter, InstructionGroup, ReportMetadata, SelectedRow, Selection,
    csv, ensure_exportable, export_filename, group_by_instruction, instruction_options,
};
use crate::types::ItemId;

/// Report builder state posted by the client.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ReportRequest {
    #[serde(default)]
    metadata: ReportMetadata,
    #[serde(default)]
    rows: Vec<SelectedRow>,
    /// Restricts the selected rows to these instructions.
    #[serde(default)]
    instructions: InstructionFilter,
    /// Restricts the not-yet-selected catalog items to these instructions.
    #[serde(default)]
    available_instructions: InstructionFilter,
}

#[derive(Serialize)]
struct Preview<'a> {
    selected: usize,
    shown: usize,
    groups: Vec<InstructionGroup<'a>>,
    instruction_options: Vec<String>,
    available: Vec<&'a ConfigurationItem>,
}

/// Grouped view of the selection plus the catalog items still available.
pub(super) async fn preview<C: CatalogStore>(
    State(state): State<AppState<C>>,
    Json(request): Json<ReportRequest>,
) -> Result<Response, ApiError> {
    let items = catalog::list_items(state.catalog.as_ref()).await?;
    let selection = Selection::from_rows(request.rows);

    let rows = request.instructions.apply_rows(selection.rows());
    let preview = Preview {
        selected: selection.len(),
        shown: rows.len(),
        groups: group_by_instruction(&rows),
        instruction_options: instruction_options(&items),
        available: request
            .available_instructions
            .apply_items(selection.available(&items)),
    };
    Ok(Json(&preview).into_response())
}

/// One change to the report selection.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub(super) enum SelectionEdit {
    Add { id: ItemId },
    Remove { id: ItemId },
    /// Reselect the whole catalog, keeping existing annotations.
    RestoreAll,
    Clear,
    SetDeadline { id: ItemId, deadline: String },
    SetObservations { id: ItemId, observations: String },
}

#[derive(Debug, Deserialize)]
pub(super) struct SelectionRequest {
    #[serde(default)]
    rows: Vec<SelectedRow>,
    edit: SelectionEdit,
}

#[derive(Serialize)]
struct EditedSelection<'a> {
    rows: Vec<&'a SelectedRow>,
}

/// Apply one edit to the posted selection and return the resulting rows.
///
/// Unknown item ids answer 404.
pub(super) async fn edit_selection<C: CatalogStore>(
    State(state): State<AppState<C>>,
    Json(request): Json<SelectionRequest>,
) -> Result<Response, ApiError> {
    let mut selection = Selection::from_rows(request.rows);

    match request.edit {
        SelectionEdit::Add { id } => {
            let items = catalog::list_items(state.catalog.as_ref()).await?;
            let item = items
                .into_iter()
                .find(|item| item.id == id)
                .ok_or(Error::NotFound(id))?;
            selection.add(item);
        }
        SelectionEdit::Remove { id } => {
            selection.remove(&id).ok_or(Error::NotFound(id))?;
        }
        SelectionEdit::RestoreAll => {
            let items = catalog::list_items(state.catalog.as_ref()).await?;
            selection.restore_all(&items);
        }
        SelectionEdit::Clear => selection.clear(),
        SelectionEdit::SetDeadline { id, deadline } => {
            if !selection.set_deadline(&id, deadline) {
                return Err(Error::NotFound(id).into());
            }
        }
        SelectionEdit::SetObservations { id, observations } => {
            if !selection.set_observations(&id, observations) {
                return Err(Error::NotFound(id).into());
            }
        }
    }

    let edited = EditedSelection {
        rows: selection.rows(),
    };
    Ok(Json(&edited).into_response())
}

pub(super) async fn csv_export(Json(request): Json<ReportRequest>) -> Result<Response, ApiError> {
    request.metadata.validate()?;
    let selection = Selection::from_rows(request.rows);
    let rows = request.instructions.apply_rows(selection.rows());
    ensure_exportable(&rows)?;
    let body = csv::render(&request.metadata, &rows);

    let filename = export_filename("informe", today(), &request.metadata.entity, "csv");
    tracing::info!(rows = rows.len(), %filename, "CSV report exported");
    Ok(attachment("text/csv; charset=utf-8", &filename, body))
}

pub(super) async fn draft_export(Json(request): Json<ReportRequest>) -> Result<Response, ApiError> {
    let selection = Selection::from_rows(request.rows);
    let draft = DraftPayload::new(&request.metadata, &selection)?;
    let body = draft.to_json_pretty()?;

    let filename = export_filename("borrador-informe", today(), &draft.metadata.entity, "json");
    Ok(attachment("application/json; charset=utf-8", &filename, body))
}

#[derive(Serialize)]
struct ImportedDraft<'a> {
    metadata: ReportMetadata,
    rows: Vec<&'a SelectedRow>,
}

pub(super) async fn draft_import(body: String) -> Result<Response, ApiError> {
    let (metadata, selection) = DraftPayload::import(&body)?;
    let imported = ImportedDraft {
        metadata,
        rows: selection.rows(),
    };
    Ok(Json(&imported).into_response())
}

fn today() -> time::Date {
    OffsetDateTime::now_utc().date()
}

fn attachment(content_type: &str, filename: &str, body: String) -> Response {
    (
        [
            (CONTENT_TYPE, content_type.to_string()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
        ],
        body,
    )
        .into_response()
}
