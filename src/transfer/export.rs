use std::path::{Path, PathBuf};

use crate::form::snapshot::Snapshot;
use crate::session::error::FormError;
use crate::store::identity::FormId;
use crate::store::kv::KeyValueStore;
use crate::store::layout::load_snapshot;

/// A file ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub media_type: &'static str,
    pub contents: String,
}

pub fn progress_file_name(id: &FormId) -> String {
    format!("SSO-Form-Progress-{id}.json")
}

pub fn report_file_name(id: &FormId) -> String {
    format!("SSO-Application-Onboarding-{id}.html")
}

/// Saved snapshot for `id`, or `NoData` when nothing has been saved yet.
pub fn saved_snapshot<S: KeyValueStore>(store: &S, id: &FormId) -> Result<Snapshot, FormError> {
    load_snapshot(store, id)?.ok_or(FormError::NoData)
}

/// Serialize the saved snapshot (unknown keys included) as the portable
/// progress file.
pub fn export_progress<S: KeyValueStore>(store: &S, id: &FormId) -> Result<ExportArtifact, FormError> {
    let snapshot = saved_snapshot(store, id)?;
    let contents = snapshot.to_json().map_err(FormError::Encode)?;

    Ok(ExportArtifact {
        file_name: progress_file_name(id),
        media_type: "application/json",
        contents,
    })
}

/// Write an artifact into `dir`, returning the full path.
pub fn write_artifact(dir: &Path, artifact: &ExportArtifact) -> Result<PathBuf, FormError> {
    let io_error = |path: &Path, source| FormError::Io {
        path: path.display().to_string(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
    let path = dir.join(&artifact.file_name);
    std::fs::write(&path, &artifact.contents).map_err(|e| io_error(&path, e))?;
    Ok(path)
}
