//! List-and-form state for one record collection.
//!
//! A [`ResourcePanel`] mirrors a backend collection in memory and drives the
//! create/edit/delete cycle through a single modal form. Every failure leaves
//! the panel as it was before the call.

use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::client::ApiClient;
use crate::errors::{AdminError, AdminResult};
use crate::resource::{Resource, SyncPolicy};

/// Gate asked before a record is deleted.
pub trait ConfirmDelete {
    fn confirm(&self, label: &str, id: &str) -> bool;
}

/// Approves every deletion without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl ConfirmDelete for AutoConfirm {
    fn confirm(&self, _label: &str, _id: &str) -> bool {
        true
    }
}

impl<F> ConfirmDelete for F
where
    F: Fn(&str, &str) -> bool,
{
    fn confirm(&self, label: &str, id: &str) -> bool {
        self(label, id)
    }
}

#[derive(Debug, Clone)]
pub struct ResourcePanel<R: Resource> {
    collection: Vec<R>,
    form: R::Form,
    modal_open: bool,
    editing: bool,
    edit_id: Option<String>,
    sync: SyncPolicy,
    last_error: Option<String>,
}

impl<R: Resource> Default for ResourcePanel<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> ResourcePanel<R> {
    pub fn new() -> Self {
        Self {
            collection: Vec::new(),
            form: R::Form::default(),
            modal_open: false,
            editing: false,
            edit_id: None,
            sync: R::SYNC,
            last_error: None,
        }
    }

    /// Overrides the record type's default sync policy.
    pub fn with_sync(mut self, sync: SyncPolicy) -> Self {
        self.sync = sync;
        self
    }

    pub fn collection(&self) -> &[R] {
        &self.collection
    }

    pub fn form(&self) -> &R::Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut R::Form {
        &mut self.form
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn edit_id(&self) -> Option<&str> {
        self.edit_id.as_deref()
    }

    pub fn sync_policy(&self) -> SyncPolicy {
        self.sync
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn find(&self, id: &str) -> Option<&R> {
        self.collection.iter().find(|record| record.id() == id)
    }

    /// Case-insensitive substring match over each record's search fields.
    /// A blank term matches everything.
    pub fn search(&self, term: &str) -> Vec<&R> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.collection.iter().collect();
        }
        self.collection
            .iter()
            .filter(|record| {
                record
                    .search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Merges JSON field values into the open form. Keys use the wire names.
    pub fn set_fields(&mut self, fields: Map<String, Value>) -> AdminResult<()> {
        let mut current = match serde_json::to_value(&self.form)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        current.extend(fields);
        let mut merged: R::Form = serde_json::from_value(Value::Object(current))
            .map_err(|e| AdminError::InvalidInput(e.to_string()))?;
        R::carry_local_fields(&self.form, &mut merged);
        self.form = merged;
        Ok(())
    }

    /// Replaces the collection with the backend's current list.
    pub async fn load(&mut self, client: &ApiClient) -> AdminResult<()> {
        match client.list::<R>().await {
            Ok(records) => {
                info!(kind = %R::KIND, count = records.len(), "Collection loaded");
                self.collection = records;
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                error!(kind = %R::KIND, error = %err, "Failed to load collection");
                self.last_error = Some(err.display_message());
                Err(err)
            }
        }
    }

    pub fn open_create(&mut self) {
        self.form = R::Form::default();
        self.editing = false;
        self.edit_id = None;
        self.modal_open = true;
        self.last_error = None;
    }

    pub fn open_edit(&mut self, id: &str) -> AdminResult<()> {
        let Some(record) = self.find(id) else {
            warn!(kind = %R::KIND, id, "Record to edit is not in the collection");
            return Err(AdminError::NotFound(format!(
                "{} {}",
                R::KIND.record_label(),
                id
            )));
        };
        self.form = record.to_form();
        self.editing = true;
        self.edit_id = Some(id.to_string());
        self.modal_open = true;
        self.last_error = None;
        Ok(())
    }

    /// Closes the modal and resets the form. The collection is untouched.
    pub fn close(&mut self) {
        self.form = R::Form::default();
        self.editing = false;
        self.edit_id = None;
        self.modal_open = false;
    }

    /// Validates and submits the form as a create or an update. Returns the
    /// stored record when the backend echoes it back.
    ///
    /// Invalid forms never reach the network. When the write fails the modal
    /// stays open with the form as it was and the collection is unchanged.
    /// A failed refresh after an accepted write only lands in `last_error`.
    pub async fn save(&mut self, client: &ApiClient) -> AdminResult<Option<R>> {
        if let Err(errors) = R::check(&self.form) {
            let err = AdminError::from(errors);
            warn!(kind = %R::KIND, fields = ?err.invalid_fields(), "Form is invalid");
            self.last_error = Some(err.display_message());
            return Err(err);
        }

        let mut outgoing = self.form.clone();
        let saved = match self.submit(client, &mut outgoing).await {
            Ok(saved) => saved,
            Err(err) => {
                error!(kind = %R::KIND, error = %err, "Failed to save record");
                self.last_error = Some(err.display_message());
                return Err(err);
            }
        };

        info!(
            kind = %R::KIND,
            id = self.edit_id.as_deref().unwrap_or("new"),
            "Record saved"
        );
        self.last_error = None;
        self.sync_after_write(client, saved.clone()).await;
        self.close();
        Ok(saved)
    }

    async fn submit(&self, client: &ApiClient, form: &mut R::Form) -> AdminResult<Option<R>> {
        R::prepare(form, client).await?;
        match (self.editing, self.edit_id.as_deref()) {
            (true, Some(id)) => client.update::<R>(id, form).await,
            _ => client.create::<R>(form).await,
        }
    }

    async fn sync_after_write(&mut self, client: &ApiClient, saved: Option<R>) {
        if let (SyncPolicy::Patch, Some(record)) = (self.sync, &saved) {
            self.upsert(record.clone());
            return;
        }
        // Reload policy, or the backend only acknowledged the write.
        match client.list::<R>().await {
            Ok(records) => self.collection = records,
            Err(err) => {
                warn!(kind = %R::KIND, error = %err, "Refresh after save failed");
                self.last_error = Some(err.display_message());
                if let Some(record) = saved {
                    self.upsert(record);
                }
            }
        }
    }

    fn upsert(&mut self, record: R) {
        match self
            .collection
            .iter()
            .position(|existing| existing.id() == record.id())
        {
            Some(index) => self.collection[index] = record,
            None => self.collection.push(record),
        }
    }

    /// Deletes a record after `confirm` approves it. Returns `Ok(false)` when
    /// the deletion was declined, in which case no request is made.
    pub async fn remove(
        &mut self,
        client: &ApiClient,
        id: &str,
        confirm: &dyn ConfirmDelete,
    ) -> AdminResult<bool> {
        if !confirm.confirm(R::KIND.record_label(), id) {
            info!(kind = %R::KIND, id, "Deletion declined");
            return Ok(false);
        }

        if let Err(err) = client.delete::<R>(id).await {
            error!(kind = %R::KIND, id, error = %err, "Failed to delete record");
            self.last_error = Some(err.display_message());
            return Err(err);
        }

        match self.sync {
            SyncPolicy::Patch => self.collection.retain(|record| record.id() != id),
            SyncPolicy::Reload => {
                if let Err(err) = self.load(client).await {
                    // The record is gone server-side even if the refresh failed.
                    self.collection.retain(|record| record.id() != id);
                    return Err(err);
                }
            }
        }
        info!(kind = %R::KIND, id, "Record deleted");
        self.last_error = None;
        Ok(true)
    }
}
