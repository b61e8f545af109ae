//! Editing one selection's configuration against a manifest.
//!
//! The session ties the pieces together: the manifest is indexed once on
//! open, the configuration lives in a [`ConfigStore`], and both validation
//! results are recomputed after every edit so callers can show them next to
//! the form.

use std::convert::Infallible;
use std::path::Path;

use serde_json::Value;

use crate::array;
use crate::index::GroupIndex;
use crate::logger;
use crate::manifest::{Control, Manifest, PropertyDef};
use crate::site::{self, Selection, SiteError};
use crate::store::{ConfigStore, PendingSave, Persist, StoreError};
use crate::validate::{self, Diagnostics, ValidationError};

/// Latest results of both checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationState {
    /// Configuration shape problems.
    pub schema: Diagnostics,
    /// Manifest integrity problems.
    pub references: Diagnostics,
}

impl ValidationState {
    pub fn compute(manifest: &Manifest, config: &Value) -> Self {
        Self {
            schema: validate::validate_shape(config),
            references: validate::validate_references(manifest),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.schema.has_errors() || self.references.has_errors()
    }

    /// Schema errors first, then reference errors.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.schema.errors().iter().chain(self.references.errors())
    }
}

/// What a renderer needs to draw one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub mandatory: bool,
    pub control: Control,
    pub property: &'a PropertyDef,
    /// Current value, if the configuration holds one.
    pub value: Option<&'a Value>,
}

/// State of the latest save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    /// Between [`EditorSession::begin_save`] and [`EditorSession::finish_save`].
    Saving,
    Saved,
    Failed(String),
}

pub struct EditorSession {
    selection: Selection,
    manifest: Manifest,
    index: GroupIndex,
    store: ConfigStore,
    validation: ValidationState,
    status: Option<SaveStatus>,
}

impl EditorSession {
    /// Start editing `configuration` for `selection`.
    pub fn open(selection: Selection, manifest: Manifest, configuration: Value) -> Self {
        let index = GroupIndex::build(&manifest);
        let validation = ValidationState::compute(&manifest, &configuration);
        crate::debug!(
            "session";
            "opened {} with {} groups, {} validation errors",
            selection,
            index.len(),
            validation.errors().count()
        );

        Self {
            selection,
            manifest,
            index,
            store: ConfigStore::load(configuration),
            validation,
            status: None,
        }
    }

    /// Open a selection, reading its stored configuration from `configs`.
    pub async fn load(
        selection: Selection,
        manifest: Manifest,
        configs: &Path,
    ) -> Result<Self, SiteError> {
        let configuration = site::load_configuration(&selection.config_path(configs)).await?;
        Ok(Self::open(selection, manifest, configuration))
    }

    /// Discard the session and go back to choosing a selection.
    pub fn close(self) -> Selection {
        if self.store.is_dirty() {
            crate::debug!("session"; "closing {} with unsaved changes", self.selection);
        }
        self.selection
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn index(&self) -> &GroupIndex {
        &self.index
    }

    pub fn configuration(&self) -> &Value {
        self.store.current()
    }

    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    pub fn status(&self) -> Option<&SaveStatus> {
        self.status.as_ref()
    }

    // ========================================================================
    // fields
    // ========================================================================

    /// Render data for an indexed property. Unindexed ids yield `None`.
    pub fn field<'a>(&'a self, id: &'a str) -> Option<FieldView<'a>> {
        let property = self.index.property(id)?;
        Some(FieldView {
            id,
            title: property.display_title(id),
            description: property.description.as_deref(),
            mandatory: property.mandatory,
            control: property.control(),
            property,
            value: self.store.get_field(id),
        })
    }

    pub fn get_field(&self, path: &str) -> Option<&Value> {
        self.store.get_field(path)
    }

    pub fn set_field(&mut self, path: &str, value: Value) {
        self.store.set_field(path, value);
        self.revalidate();
    }

    /// Append a blank element to an array property.
    pub fn push_item(&mut self, id: &str) {
        let items = self.index.property(id).and_then(|p| p.items.as_deref());
        let next = array::push_item(self.store.get_field(id), items);
        self.set_field(id, next);
    }

    pub fn remove_item(&mut self, id: &str, index: usize) {
        let next = array::remove_item(self.store.get_field(id), index);
        self.set_field(id, next);
    }

    pub fn update_item(&mut self, id: &str, index: usize, value: Value) {
        let next = array::update_item(self.store.get_field(id), index, value);
        self.set_field(id, next);
    }

    pub fn update_item_property(&mut self, id: &str, index: usize, key: &str, value: Value) {
        let next = array::update_item_property(self.store.get_field(id), index, key, value);
        self.set_field(id, next);
    }

    fn revalidate(&mut self) {
        self.validation = ValidationState::compute(&self.manifest, self.store.current());
    }

    // ========================================================================
    // validation & save
    // ========================================================================

    /// All current errors, schema errors first.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.validation.errors()
    }

    pub fn has_validation_errors(&self) -> bool {
        self.validation.has_errors()
    }

    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    /// Saving is offered only for unsaved changes and never twice at once.
    ///
    /// Validation errors are shown but do not block saving.
    pub fn can_save(&self) -> bool {
        self.store.is_dirty() && !self.store.is_saving()
    }

    /// Snapshot the configuration for saving; `status()` reports `Saving`
    /// until [`finish_save`](Self::finish_save). Editing may continue meanwhile.
    pub fn begin_save(&mut self) -> Result<PendingSave, StoreError<Infallible>> {
        let pending = self.store.begin_save()?;
        self.status = Some(SaveStatus::Saving);
        logger::status_saving(&self.selection.to_string());
        Ok(pending)
    }

    /// Settle a save with the persistence result.
    pub fn finish_save<E: std::error::Error>(
        &mut self,
        pending: PendingSave,
        result: Result<(), E>,
    ) -> SaveStatus {
        let target = self.selection.to_string();
        let status = match result {
            Ok(()) => {
                self.store.complete_save(pending);
                logger::status_saved(&target);
                SaveStatus::Saved
            }
            Err(err) => {
                self.store.abort_save(pending);
                let detail = error_chain(&err);
                logger::status_failed(&target, &detail);
                SaveStatus::Failed(detail)
            }
        };

        self.status = Some(status.clone());
        status
    }

    /// Persist the current configuration in one step.
    pub async fn save<P: Persist>(&mut self, persist: &P) -> SaveStatus {
        let pending = match self.begin_save() {
            Ok(pending) => pending,
            Err(err) => return SaveStatus::Failed(err.to_string()),
        };
        let result = persist.persist(pending.snapshot()).await;
        self.finish_save(pending, result)
    }
}

/// Flatten an error and its sources into one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
