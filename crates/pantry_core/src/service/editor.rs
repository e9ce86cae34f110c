//! Create/edit state machine for the working item.
//!
//! # Invariants
//! - `Create` always starts from an empty draft.
//! - `Edit(id)` starts from the stored item with that id, or from a
//!   caller-supplied replacement draft for a direct update.
//! - `prepare` never mutates editor state; a failed submission can be retried
//!   with the same draft and mode.

use crate::model::item::{Item, ItemDraft, ItemFields, ItemId};
use crate::service::session::SessionError;
use chrono::{DateTime, Utc};

/// Which kind of submission the editor will produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Closed,
    Create,
    Edit(ItemId),
}

/// Validated, normalized store call ready to dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum PreparedSubmission {
    Create(ItemFields),
    Update(ItemId, ItemFields),
}

/// Working item plus the mode it is being edited in.
#[derive(Debug, Clone, Default)]
pub struct ItemEditor {
    mode: EditorMode,
    draft: ItemDraft,
}

impl ItemEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters create mode with an empty draft.
    pub fn begin_create(&mut self) {
        self.mode = EditorMode::Create;
        self.draft = ItemDraft::default();
    }

    /// Enters edit mode with a draft loaded from `item`.
    pub fn begin_edit(&mut self, item: &Item) {
        self.mode = EditorMode::Edit(item.id);
        self.draft = ItemDraft::from_item(item);
    }

    /// Enters edit mode for `id` with a caller-supplied replacement draft.
    pub fn begin_update(&mut self, id: ItemId, draft: ItemDraft) {
        self.mode = EditorMode::Edit(id);
        self.draft = draft;
    }

    /// Leaves the editor and discards the draft.
    pub fn close(&mut self) {
        self.mode = EditorMode::Closed;
        self.draft = ItemDraft::default();
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != EditorMode::Closed
    }

    pub fn draft(&self) -> &ItemDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ItemDraft {
        &mut self.draft
    }

    /// Validates the draft and builds the store call for the current mode.
    ///
    /// Blank notes become `notes_placeholder` and `last_updated` becomes `now`.
    pub fn prepare(
        &self,
        now: DateTime<Utc>,
        notes_placeholder: &str,
    ) -> Result<PreparedSubmission, SessionError> {
        let target = match self.mode {
            EditorMode::Closed => return Err(SessionError::EditorClosed),
            EditorMode::Create => None,
            EditorMode::Edit(id) => Some(id),
        };

        let fields = self
            .draft
            .clone()
            .into_fields(now, notes_placeholder)
            .map_err(SessionError::Validation)?;

        Ok(match target {
            None => PreparedSubmission::Create(fields),
            Some(id) => PreparedSubmission::Update(id, fields),
        })
    }
}
