//! UI mode state machine on top of the registry.
//!
//! The inventory screen is always in exactly one [`UiMode`]: browsing the
//! grid, viewing one record, filling in the add form, or editing a copy of a
//! record. [`GallerySession`] owns the registry and routes mutations through
//! it so the mode never points at a record that no longer exists.

use log::debug;
use serde::Serialize;

use crate::artwork_model::{ArtworkDraft, ArtworkRecord, Taggable};
use crate::registry::ArtworkRegistry;
use crate::registry_config::RegistryConfig;
use crate::registry_error::{RegistryError, SessionError};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum UiMode {
    #[default]
    Browsing,
    Viewing { id: u64 },
    Adding { draft: ArtworkDraft },
    /// Holds a working copy; the registry is untouched until submit.
    Editing { record: ArtworkRecord },
}

impl UiMode {
    /// Id of the record this mode is about, if any.
    pub fn target_id(&self) -> Option<u64> {
        match self {
            UiMode::Viewing { id } => Some(*id),
            UiMode::Editing { record } => Some(record.id),
            UiMode::Browsing | UiMode::Adding { .. } => None,
        }
    }
}

pub struct GallerySession {
    registry: ArtworkRegistry,
    mode: UiMode,
}

impl GallerySession {
    pub fn new(registry: ArtworkRegistry) -> Self {
        Self { registry, mode: UiMode::Browsing }
    }

    pub fn open(config: &RegistryConfig) -> Result<Self, RegistryError> {
        Ok(Self::new(ArtworkRegistry::open(config)?))
    }

    pub fn registry(&self) -> &ArtworkRegistry {
        &self.registry
    }

    pub fn mode(&self) -> &UiMode {
        &self.mode
    }

    /// Opens a blank add form.
    pub fn open_add(&mut self) {
        self.registry.select(None);
        self.set_mode(UiMode::Adding { draft: ArtworkDraft::default() });
    }

    /// Shows the detail view for `id`. An unknown id drops back to browsing.
    pub fn view(&mut self, id: u64) -> Result<&ArtworkRecord, SessionError> {
        if self.registry.select(Some(id)).is_none() {
            self.set_mode(UiMode::Browsing);
            return Err(SessionError::NotFound(id));
        }
        self.set_mode(UiMode::Viewing { id });
        self.registry.get(id).ok_or(SessionError::NotFound(id))
    }

    /// Opens the edit form on a copy of record `id`. The detail view closes.
    pub fn open_edit(&mut self, id: u64) -> Result<(), SessionError> {
        let record = self.registry.get(id).cloned().ok_or(SessionError::NotFound(id))?;
        self.registry.select(None);
        self.set_mode(UiMode::Editing { record });
        Ok(())
    }

    /// Leaves whatever mode is active, discarding any open form.
    pub fn cancel(&mut self) {
        self.registry.select(None);
        self.set_mode(UiMode::Browsing);
    }

    /// The add form, when it is open.
    pub fn draft_mut(&mut self) -> Option<&mut ArtworkDraft> {
        match &mut self.mode {
            UiMode::Adding { draft } => Some(draft),
            _ => None,
        }
    }

    /// The record copy under edit, when the edit form is open.
    pub fn editing_mut(&mut self) -> Option<&mut ArtworkRecord> {
        match &mut self.mode {
            UiMode::Editing { record } => Some(record),
            _ => None,
        }
    }

    /// Replaces the open form's contents. The edited record keeps its id.
    pub fn set_form(&mut self, fields: ArtworkDraft) -> Result<(), SessionError> {
        match &mut self.mode {
            UiMode::Adding { draft } => *draft = fields,
            UiMode::Editing { record } => *record = ArtworkRecord::from_draft(record.id, fields),
            _ => return Err(SessionError::NoOpenForm),
        }
        Ok(())
    }

    pub fn add_form_tag(&mut self, tag: &str) -> Result<bool, SessionError> {
        Ok(self.open_form()?.add_tag(tag))
    }

    pub fn remove_form_tag(&mut self, tag: &str) -> Result<bool, SessionError> {
        Ok(self.open_form()?.remove_tag(tag))
    }

    fn open_form(&mut self) -> Result<&mut dyn Taggable, SessionError> {
        match &mut self.mode {
            UiMode::Adding { draft } => Ok(draft as &mut dyn Taggable),
            UiMode::Editing { record } => Ok(record as &mut dyn Taggable),
            _ => Err(SessionError::NoOpenForm),
        }
    }

    /// Validates and commits the open form, then returns to browsing.
    ///
    /// Returns the id of the created or updated record. On a validation
    /// failure the form stays open and unchanged.
    pub fn submit(&mut self) -> Result<u64, SessionError> {
        let id = match &self.mode {
            UiMode::Adding { draft } => {
                draft.validate()?;
                let draft = draft.clone();
                self.registry.create(draft)?.id
            }
            UiMode::Editing { record } => {
                record.validate()?;
                let id = record.id;
                let fields = ArtworkDraft::from(record.clone());
                if !self.registry.update(id, fields)? {
                    self.set_mode(UiMode::Browsing);
                    return Err(SessionError::NotFound(id));
                }
                id
            }
            UiMode::Browsing | UiMode::Viewing { .. } => return Err(SessionError::NoOpenForm),
        };
        self.set_mode(UiMode::Browsing);
        Ok(id)
    }

    pub fn create(&mut self, draft: ArtworkDraft) -> Result<&ArtworkRecord, SessionError> {
        Ok(self.registry.create(draft)?)
    }

    pub fn update(&mut self, id: u64, fields: ArtworkDraft) -> Result<bool, SessionError> {
        Ok(self.registry.update(id, fields)?)
    }

    /// Deletes a record. Viewing or editing it returns the session to
    /// browsing.
    pub fn delete(&mut self, id: u64) -> Result<bool, SessionError> {
        let removed = self.registry.delete(id)?;
        if removed && self.mode.target_id() == Some(id) {
            self.set_mode(UiMode::Browsing);
        }
        Ok(removed)
    }

    /// Selection without a mode change, for hosts that drive their own
    /// views. `None` clears it.
    pub fn select(&mut self, id: Option<u64>) -> Option<&ArtworkRecord> {
        if let UiMode::Viewing { id: viewing } = self.mode {
            if id != Some(viewing) {
                self.set_mode(UiMode::Browsing);
            }
        }
        self.registry.select(id)
    }

    pub fn add_tag(&mut self, id: u64, tag: &str) -> Result<bool, SessionError> {
        Ok(self.registry.add_tag(id, tag)?)
    }

    pub fn remove_tag(&mut self, id: u64, tag: &str) -> Result<bool, SessionError> {
        Ok(self.registry.remove_tag(id, tag)?)
    }

    pub fn clear(&mut self) -> Result<usize, SessionError> {
        let removed = self.registry.clear()?;
        if self.mode.target_id().is_some() {
            self.set_mode(UiMode::Browsing);
        }
        Ok(removed)
    }

    fn set_mode(&mut self, mode: UiMode) {
        debug!("Mode change: {} -> {}", mode_name(&self.mode), mode_name(&mode));
        self.mode = mode;
    }
}

fn mode_name(mode: &UiMode) -> &'static str {
    match mode {
        UiMode::Browsing => "browsing",
        UiMode::Viewing { .. } => "viewing",
        UiMode::Adding { .. } => "adding",
        UiMode::Editing { .. } => "editing",
    }
}
