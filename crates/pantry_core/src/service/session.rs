//! Per-user pantry session.
//!
//! # Responsibility
//! - Hold the session context explicitly: owner handle, cache, editor,
//!   filter/search state and derived notifications.
//! - Run every mutation as `dispatch -> full cache refresh -> re-derive`.
//!
//! # Invariants
//! - Validation failures never reach the store.
//! - A failed store call leaves the cache at its last known-good snapshot and
//!   keeps the editor's mode and draft for retry.
//! - Notifications always correspond to the current cache snapshot.
//! - Direct updates go to the store even for ids missing from the cache, so
//!   an unknown id surfaces as a store `NotFound`. `UnknownItem` is only the
//!   local precheck of `begin_edit`, which needs a cached item to load.

use crate::alerts::derive_alerts;
use crate::config::PantryConfig;
use crate::inventory::cache::InventoryCache;
use crate::model::item::{Item, ItemDraft, ItemId, ValidationError};
use crate::model::notification::Notification;
use crate::search::debounce::Debouncer;
use crate::search::filter::{visible, ItemFilter};
use crate::service::editor::{EditorMode, ItemEditor, PreparedSubmission};
use crate::store::{ItemStore, OwnerId, StoreError};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

/// User-level action a store call was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Add,
    Update,
    Remove,
    Refresh,
}

impl SessionAction {
    fn describe(self) -> &'static str {
        match self {
            Self::Add => "add item",
            Self::Update => "update item",
            Self::Remove => "delete item",
            Self::Refresh => "fetch items",
        }
    }

    fn event(self) -> &'static str {
        match self {
            Self::Add => "item_create",
            Self::Update => "item_update",
            Self::Remove => "item_delete",
            Self::Refresh => "item_list",
        }
    }
}

/// Recoverable session failure. None of these leave the session inconsistent.
#[derive(Debug, Clone)]
pub enum SessionError {
    /// Working item is incomplete; nothing was sent to the store.
    Validation(ValidationError),
    /// Store call failed; the user may re-trigger the action.
    Store {
        action: SessionAction,
        source: Arc<StoreError>,
    },
    /// `submit` was called while the editor was closed.
    EditorClosed,
    /// Edit was requested for an id that is not in the cache.
    UnknownItem(ItemId),
}

impl SessionError {
    fn store(action: SessionAction, source: StoreError) -> Self {
        Self::Store {
            action,
            source: Arc::new(source),
        }
    }

    /// Whether this failure came from the store rather than local checks.
    pub fn is_store_error(&self) -> bool {
        matches!(self, Self::Store { .. })
    }
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store { action, source } => {
                write!(f, "failed to {}: {source}", action.describe())
            }
            Self::EditorClosed => write!(f, "no item is being edited"),
            Self::UnknownItem(id) => write!(f, "item not found in inventory: {id}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store { source, .. } => Some(source.as_ref()),
            Self::EditorClosed | Self::UnknownItem(_) => None,
        }
    }
}

impl From<ValidationError> for SessionError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Success notice for a completed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub action: SessionAction,
    pub item_id: ItemId,
}

impl Confirmation {
    pub fn message(&self) -> &'static str {
        match self.action {
            SessionAction::Add => "Item added successfully!",
            SessionAction::Update => "Item updated successfully!",
            SessionAction::Remove => "Item deleted successfully!",
            SessionAction::Refresh => "Inventory refreshed.",
        }
    }
}

/// Inventory workflow for one signed-in user (or an unscoped session).
pub struct PantrySession<S: ItemStore> {
    store: S,
    owner: Option<OwnerId>,
    config: PantryConfig,
    cache: InventoryCache,
    editor: ItemEditor,
    filter: ItemFilter,
    search_text: String,
    search_input: Debouncer<String>,
    notifications: Vec<Notification>,
    last_error: Option<SessionError>,
    last_confirmation: Option<Confirmation>,
}

impl<S: ItemStore> PantrySession<S> {
    /// Creates an idle session. Call [`PantrySession::start`] to load items.
    pub fn new(store: S, owner: Option<OwnerId>, config: PantryConfig) -> Self {
        let search_input = Debouncer::new(config.search_debounce());
        Self {
            store,
            owner,
            config,
            cache: InventoryCache::new(),
            editor: ItemEditor::new(),
            filter: ItemFilter::default(),
            search_text: String::new(),
            search_input,
            notifications: Vec::new(),
            last_error: None,
            last_confirmation: None,
        }
    }

    /// Initial load on session start.
    pub fn start(&mut self) -> Result<(), SessionError> {
        info!(
            "event=session_start module=session status=start scoped={}",
            self.owner.is_some()
        );
        self.refresh()
    }

    /// Re-fetches the full item list and re-derives notifications.
    pub fn refresh(&mut self) -> Result<(), SessionError> {
        match self.cache.refresh(&self.store, self.owner.as_ref()) {
            Ok(()) => {
                self.refresh_alerts(Utc::now());
                Ok(())
            }
            Err(source) => Err(self.record_failure(SessionError::store(
                SessionAction::Refresh,
                source,
            ))),
        }
    }

    /// Re-derives notifications from the cache as of `now`.
    pub fn refresh_alerts(&mut self, now: DateTime<Utc>) {
        self.notifications = derive_alerts(self.cache.items(), now, &self.config.alerts);
    }

    /// Replaces the identity handle and reloads items for it.
    pub fn switch_owner(&mut self, owner: Option<OwnerId>) -> Result<(), SessionError> {
        self.owner = owner;
        self.cache.clear();
        self.notifications.clear();
        self.editor.close();
        self.clear_status();
        self.refresh()
    }

    /// Opens the editor in create mode with an empty working item.
    pub fn begin_create(&mut self) {
        self.editor.begin_create();
    }

    /// Opens the editor in edit mode, loading the cached item `id`.
    pub fn begin_edit(&mut self, id: ItemId) -> Result<(), SessionError> {
        let Some(item) = self.cache.get(id) else {
            return Err(self.record_failure(SessionError::UnknownItem(id)));
        };
        self.editor.begin_edit(item);
        Ok(())
    }

    /// Mutable access to the working item while the editor is open.
    pub fn draft_mut(&mut self) -> &mut ItemDraft {
        self.editor.draft_mut()
    }

    pub fn close_editor(&mut self) {
        self.editor.close();
    }

    /// Validates, normalizes and dispatches the working item.
    ///
    /// On success the cache is refreshed and the editor closed. If that
    /// refresh fails the mutation is still confirmed and the refresh failure
    /// is recorded as [`PantrySession::last_error`].
    pub fn submit(&mut self) -> Result<Confirmation, SessionError> {
        self.clear_status();
        let prepared = match self
            .editor
            .prepare(timestamp_now(), &self.config.notes_placeholder)
        {
            Ok(prepared) => prepared,
            Err(err) => return Err(self.record_failure(err)),
        };

        let owner = self.owner.as_ref();
        let (action, result) = match &prepared {
            PreparedSubmission::Create(fields) => {
                (SessionAction::Add, self.store.create_item(owner, fields))
            }
            PreparedSubmission::Update(id, fields) => (
                SessionAction::Update,
                self.store.update_item(owner, *id, fields).map(|()| *id),
            ),
        };

        match result {
            Ok(id) => {
                self.editor.close();
                Ok(self.complete(action, id))
            }
            Err(source) => Err(self.record_failure(SessionError::store(action, source))),
        }
    }

    /// Creates `draft` as a new item.
    pub fn add_item(&mut self, draft: ItemDraft) -> Result<Confirmation, SessionError> {
        self.editor.begin_create();
        *self.editor.draft_mut() = draft;
        self.submit()
    }

    /// Rewrites the cached item `id` with `draft`.
    pub fn update_item(
        &mut self,
        id: ItemId,
        draft: ItemDraft,
    ) -> Result<Confirmation, SessionError> {
        self.editor.begin_update(id, draft);
        self.submit()
    }

    /// Deletes the item `id` and refreshes the cache.
    pub fn remove_item(&mut self, id: ItemId) -> Result<Confirmation, SessionError> {
        self.clear_status();
        if let Err(source) = self.store.delete_item(self.owner.as_ref(), id) {
            return Err(self.record_failure(SessionError::store(SessionAction::Remove, source)));
        }

        if self.editor.mode() == EditorMode::Edit(id) {
            self.editor.close();
        }
        Ok(self.complete(SessionAction::Remove, id))
    }

    pub fn set_filter(&mut self, filter: ItemFilter) {
        self.filter = filter;
    }

    /// Applies search text immediately, discarding any pending typed input.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_input.flush();
        self.search_text = text.into();
    }

    /// Queues search text typed at `at`; it applies once input settles.
    pub fn type_search_text(&mut self, text: impl Into<String>, at: Instant) {
        self.search_input.push(text.into(), at);
    }

    /// Applies queued search text if input has been quiet long enough.
    ///
    /// Returns `true` when the visible list changed inputs.
    pub fn settle_search(&mut self, at: Instant) -> bool {
        match self.search_input.poll(at) {
            Some(text) => {
                self.search_text = text;
                true
            }
            None => false,
        }
    }

    /// Cached items narrowed by the current filter and search text.
    pub fn visible_items(&self) -> Vec<&Item> {
        visible(self.cache.items(), &self.filter, &self.search_text)
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    pub fn last_confirmation(&self) -> Option<&Confirmation> {
        self.last_confirmation.as_ref()
    }

    pub fn clear_status(&mut self) {
        self.last_error = None;
        self.last_confirmation = None;
    }

    pub fn filter(&self) -> &ItemFilter {
        &self.filter
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn cache(&self) -> &InventoryCache {
        &self.cache
    }

    pub fn editor(&self) -> &ItemEditor {
        &self.editor
    }

    pub fn owner(&self) -> Option<&OwnerId> {
        self.owner.as_ref()
    }

    pub fn config(&self) -> &PantryConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn complete(&mut self, action: SessionAction, id: ItemId) -> Confirmation {
        info!(
            "event={} module=session status=ok item_id={id}",
            action.event()
        );
        let confirmation = Confirmation {
            action,
            item_id: id,
        };
        // A refresh failure is recorded in `last_error` by `refresh` itself.
        let _ = self.refresh();
        self.last_confirmation = Some(confirmation.clone());
        confirmation
    }

    fn record_failure(&mut self, err: SessionError) -> SessionError {
        let action = match &err {
            SessionError::Store { action, .. } => action.event(),
            _ => "submit",
        };
        warn!("event={action} module=session status=error error={err}");
        self.last_error = Some(err.clone());
        err
    }
}

/// Current time at the millisecond precision the store keeps.
fn timestamp_now() -> DateTime<Utc> {
    ceil_to_millis(Utc::now())
}

/// Rounds up so a stored stamp is never earlier than the instant it records.
fn ceil_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    let truncated = at.trunc_subsecs(3);
    if truncated < at {
        truncated + Duration::milliseconds(1)
    } else {
        truncated
    }
}
