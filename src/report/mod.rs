//! Report assembly: item selection, CSV export, and JSON drafts.

pub mod csv;
mod draft;
mod selection;

pub use draft::{DRAFT_VERSION, DraftPayload, ReportMetadata, entity_slug, export_filename};
pub use selection::{
    InstructionFilter, InstructionGroup, NO_INSTRUCTION, SelectedRow, Selection, ensure_exportable,
    group_by_instruction, instruction_options,
};
