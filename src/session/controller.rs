use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::form::changes::ChangeTracker;
use crate::form::progress::{self, ProgressState};
use crate::form::snapshot::{Snapshot, apply_to_form, capture_from_form, reset_form};
use crate::form::visibility::{VisibilityMachine, VisibilityState};
use crate::report::html::render_report;
use crate::report::report_model::StatusReport;
use crate::session::debounce::{DEFAULT_DEBOUNCE, Debouncer};
use crate::session::error::FormError;
use crate::session::port::{PresentationPort, Severity};
use crate::store::identity::{FormId, IdentityManager};
use crate::store::kv::{KeyValueStore, StorageError};
use crate::store::layout::{
    clear_export_time, delete_snapshot, last_export_time, load_snapshot, record_export_time,
    save_snapshot,
};
use crate::transfer::export::{
    self, ExportArtifact, report_file_name, saved_snapshot, write_artifact,
};
use crate::transfer::import::{self, UnknownFieldPolicy, check_file_name};

/// Tunables of a form session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Quiet period coalescing field edits into one save
    pub debounce: Duration,

    /// Handling of unknown keys in imported files
    pub unknown_fields: UnknownFieldPolicy,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            unknown_fields: UnknownFieldPolicy::Preserve,
        }
    }
}

/// Top-level controller owning the session context.
///
/// All entry points run to completion on the caller's turn; the presentation
/// layer calls the `on_*` methods when its controls change and `poll`
/// periodically so debounced saves can fire.
pub struct FormSession<S: KeyValueStore, P: PresentationPort> {
    store: S,
    port: P,
    identity: IdentityManager,
    changes: ChangeTracker,
    visibility: VisibilityMachine,
    autosave: Debouncer,
    unknown_fields: UnknownFieldPolicy,

    /// Unknown keys of the current snapshot, carried into every save
    carried: Map<String, Value>,
    progress: ProgressState,
}

impl<S: KeyValueStore, P: PresentationPort> FormSession<S, P> {
    /// Open a session and load whatever is stored for the current identity.
    pub fn open(store: S, port: P, options: SessionOptions) -> Result<Self, FormError> {
        let mut session = Self {
            store,
            port,
            identity: IdentityManager::new(),
            changes: ChangeTracker::new(),
            visibility: VisibilityMachine::new(),
            autosave: Debouncer::new(options.debounce),
            unknown_fields: options.unknown_fields,
            carried: Map::new(),
            progress: ProgressState::default(),
        };
        session.load()?;
        Ok(session)
    }

    // ------------------------------------------------------------------------
    // Load & derived views
    // ------------------------------------------------------------------------

    /// Push the stored snapshot into the form and re-derive every view.
    /// The change tracker starts clean on every load.
    ///
    /// A stored snapshot that cannot be read or decoded is reported and the
    /// session continues with an empty form under the same identity; the
    /// next save or a clear overwrites it.
    pub fn load(&mut self) -> Result<(), FormError> {
        let id = self.identity.get_identity(&mut self.store)?;

        let stored = match load_snapshot(&self.store, &id) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(form_id = %id, error = %e, "saved form data unreadable, starting empty");
                self.port
                    .notify(&FormError::from(e).user_message(), Severity::Error);
                None
            }
        };

        match stored {
            Some(snapshot) => {
                let applied = apply_to_form(&snapshot, &mut self.port);
                tracing::info!(form_id = %id, applied, "loaded saved form data");
                self.adopt(&snapshot);
            }
            None => {
                tracing::debug!(form_id = %id, "no saved form data");
                self.carried.clear();
                self.visibility = VisibilityMachine::new();
            }
        }

        self.visibility.render(&mut self.port);
        self.refresh_progress()?;
        Ok(())
    }

    fn adopt(&mut self, snapshot: &Snapshot) {
        self.carried = snapshot.extra.clone();
        self.visibility.derive(snapshot);
    }

    fn capture(&mut self) -> Result<Snapshot, FormError> {
        let id = self.identity.get_identity(&mut self.store)?;
        Ok(capture_from_form(id, &self.port.read_answers(), &self.carried))
    }

    fn refresh_progress(&mut self) -> Result<ProgressState, FormError> {
        let snapshot = self.capture()?;
        self.progress = progress::compute_for(&snapshot);
        self.port
            .set_progress(self.progress.percent, self.progress.filled, self.progress.total);
        Ok(self.progress)
    }

    // ------------------------------------------------------------------------
    // Presentation-layer events
    // ------------------------------------------------------------------------

    pub fn on_field_changed(&mut self) {
        self.on_field_changed_at(Instant::now());
    }

    /// A field was edited at `now`. Marks the session dirty right away and
    /// (re)starts the autosave window.
    pub fn on_field_changed_at(&mut self, now: Instant) {
        self.changes.mark_edited(&mut self.port);
        self.autosave.touch(now);
    }

    /// Fire the debounced save if its window has elapsed. Returns whether a
    /// save was attempted.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.autosave.take_due(now) {
            self.persist();
            true
        } else {
            false
        }
    }

    /// Save immediately if an autosave is pending.
    pub fn flush(&mut self) -> Result<(), FormError> {
        if self.autosave.take_pending() {
            self.save()?;
            self.refresh_progress()?;
        }
        Ok(())
    }

    pub fn on_protocol_changed(&mut self, value: &str) {
        self.visibility.on_protocol(value);
        self.after_section_toggle();
    }

    pub fn on_roles_toggle(&mut self, value: &str) {
        self.visibility.on_roles(value);
        self.after_section_toggle();
    }

    pub fn on_provisioning_toggle(&mut self, value: &str) {
        self.visibility.on_provisioning(value);
        self.after_section_toggle();
    }

    /// Section toggles are edits too, and are saved without waiting.
    fn after_section_toggle(&mut self) {
        self.visibility.render(&mut self.port);
        self.changes.mark_edited(&mut self.port);
        self.autosave.cancel();
        self.persist();
    }

    /// Save and refresh progress; failures become a notification and the
    /// in-memory answers stay authoritative.
    fn persist(&mut self) {
        let result = self.save().and_then(|_| self.refresh_progress());
        if let Err(e) = result {
            tracing::warn!(error = %e, "autosave failed");
            self.port.notify(&e.user_message(), Severity::Error);
        }
    }

    /// Capture the form and overwrite the stored snapshot.
    pub fn save(&mut self) -> Result<Snapshot, FormError> {
        let snapshot = self.capture()?;
        save_snapshot(&mut self.store, &snapshot)?;
        Ok(snapshot)
    }

    // ------------------------------------------------------------------------
    // Export / import
    // ------------------------------------------------------------------------

    /// Produce the progress file for the saved snapshot and commit the
    /// export right away. For callers that take the artifact in memory.
    pub fn export_progress(&mut self) -> Result<ExportArtifact, FormError> {
        let result = self
            .prepare_progress_export()
            .inspect(|artifact| self.confirm_export(artifact));
        self.surface(result)
    }

    /// Produce the progress file and write it into `dir`. The export time,
    /// the clean state and the success notice are recorded only once the
    /// file exists.
    pub fn export_progress_to(&mut self, dir: &Path) -> Result<PathBuf, FormError> {
        let result = self.prepare_progress_export().and_then(|artifact| {
            let path = write_artifact(dir, &artifact)?;
            self.confirm_export(&artifact);
            Ok(path)
        });
        self.surface(result)
    }

    /// Build the progress file without committing anything. Pending edits
    /// are flushed first so the file includes them.
    pub fn prepare_progress_export(&mut self) -> Result<ExportArtifact, FormError> {
        self.flush()?;
        let id = self.identity.get_identity(&mut self.store)?;
        export::export_progress(&self.store, &id)
    }

    /// Commit a delivered export: record its time, mark the session clean
    /// and tell the user.
    pub fn confirm_export(&mut self, artifact: &ExportArtifact) {
        if let Err(e) = record_export_time(&mut self.store, Utc::now()) {
            tracing::warn!(error = %e, "could not record export time");
            self.port.notify(
                "Progress exported, but the export time could not be saved on this device",
                Severity::Info,
            );
        }
        self.changes.mark_clean(&mut self.port);
        tracing::info!(file = %artifact.file_name, "progress exported");
        self.port
            .notify("Progress exported to file successfully! \u{2713}", Severity::Success);
    }

    /// Replace the stored snapshot with an imported file's contents.
    ///
    /// Either the whole replacement happens and every view refreshes, or
    /// nothing changes.
    pub fn import_progress(
        &mut self,
        file_name: &str,
        payload: impl AsRef<[u8]>,
    ) -> Result<Snapshot, FormError> {
        let result = check_file_name(file_name).and_then(|_| self.apply_import(payload));
        self.surface(result)
    }

    /// Import a progress file from disk. The name is checked before the
    /// file is read; unreadable files are reported like any other failure.
    pub fn import_progress_file(&mut self, path: &Path) -> Result<Snapshot, FormError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let result = check_file_name(&file_name)
            .and_then(|_| {
                std::fs::read(path).map_err(|source| FormError::Io {
                    path: path.display().to_string(),
                    source,
                })
            })
            .and_then(|payload| self.apply_import(payload));
        self.surface(result)
    }

    fn apply_import(&mut self, payload: impl AsRef<[u8]>) -> Result<Snapshot, FormError> {
        let id = self.identity.get_identity(&mut self.store)?;
        let snapshot = import::import_progress(&mut self.store, &id, payload, self.unknown_fields)?;

        self.autosave.cancel();
        reset_form(&mut self.port);
        apply_to_form(&snapshot, &mut self.port);
        self.adopt(&snapshot);
        self.visibility.render(&mut self.port);
        self.refresh_progress()?;
        self.changes.mark_clean(&mut self.port);

        tracing::info!(form_id = %id, unknown = snapshot.extra.len(), "progress imported");
        self.port
            .notify("Progress imported successfully! \u{2713}", Severity::Success);
        Ok(snapshot)
    }

    /// Render the saved snapshot as the onboarding report. Leaves the change
    /// tracker alone.
    pub fn export_report(&mut self) -> Result<ExportArtifact, FormError> {
        let result = self.prepare_report().inspect(|artifact| self.confirm_report(artifact));
        self.surface(result)
    }

    /// Render the report and write it into `dir`; success is announced only
    /// once the file exists.
    pub fn export_report_to(&mut self, dir: &Path) -> Result<PathBuf, FormError> {
        let result = self.prepare_report().and_then(|artifact| {
            let path = write_artifact(dir, &artifact)?;
            self.confirm_report(&artifact);
            Ok(path)
        });
        self.surface(result)
    }

    fn prepare_report(&mut self) -> Result<ExportArtifact, FormError> {
        self.flush()?;
        let id = self.identity.get_identity(&mut self.store)?;
        let snapshot = saved_snapshot(&self.store, &id)?;

        Ok(ExportArtifact {
            file_name: report_file_name(&id),
            media_type: "text/html",
            contents: render_report(&snapshot),
        })
    }

    fn confirm_report(&mut self, artifact: &ExportArtifact) {
        tracing::info!(file = %artifact.file_name, "report exported");
        self.port
            .notify("Form exported to HTML successfully! \u{2713}", Severity::Success);
    }

    // ------------------------------------------------------------------------
    // Clear
    // ------------------------------------------------------------------------

    /// Delete the snapshot, the identity and the export time, then start
    /// over with an empty form under a fresh identity.
    ///
    /// Keys are deleted one by one; an interruption can leave the identity
    /// without data, which loads as an empty form.
    pub fn clear(&mut self) -> Result<FormId, FormError> {
        let result = self.try_clear();
        self.surface(result)
    }

    fn try_clear(&mut self) -> Result<FormId, FormError> {
        self.autosave.cancel();
        let old = self.identity.get_identity(&mut self.store)?;

        delete_snapshot(&mut self.store, &old)?;
        self.identity.clear(&mut self.store)?;
        clear_export_time(&mut self.store)?;

        self.changes.mark_clean(&mut self.port);
        reset_form(&mut self.port);
        self.load()?;

        let fresh = self.identity.get_identity(&mut self.store)?;
        tracing::info!(cleared = %old, form_id = %fresh, "form data cleared");
        Ok(fresh)
    }

    /// Report a failed operation to the user before handing it back.
    fn surface<T>(&mut self, result: Result<T, FormError>) -> Result<T, FormError> {
        if let Err(e) = &result {
            tracing::warn!(error = %e, "operation failed");
            self.port.notify(&e.user_message(), Severity::Error);
        }
        result
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn identity(&mut self) -> Result<FormId, FormError> {
        Ok(self.identity.get_identity(&mut self.store)?)
    }

    pub fn progress(&self) -> ProgressState {
        self.progress
    }

    pub fn visibility(&self) -> VisibilityState {
        self.visibility.state()
    }

    pub fn is_dirty(&self) -> bool {
        self.changes.is_dirty()
    }

    pub fn has_pending_save(&self) -> bool {
        self.autosave.is_pending()
    }

    pub fn last_export_time(&self) -> Result<Option<DateTime<Utc>>, FormError> {
        Ok(last_export_time(&self.store)?)
    }

    pub fn status(&mut self) -> Result<StatusReport, FormError> {
        let id = self.identity.get_identity(&mut self.store)?;
        let saved_at = match load_snapshot(&self.store, &id) {
            Ok(stored) => stored.map(|s| s.timestamp),
            Err(StorageError::Corrupt { .. }) => None,
            Err(e) => return Err(e.into()),
        };
        Ok(StatusReport::new(id.as_str(), self.progress, self.visibility())
            .with_saved_at(saved_at)
            .with_dirty(self.is_dirty())
            .with_last_export(self.last_export_time()?))
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_parts(self) -> (S, P) {
        (self.store, self.port)
    }
}
