use std::path::Path;

use crate::form::schema::Field;
use crate::report::console::format_status;
use crate::session::controller::{FormSession, SessionOptions};
use crate::session::port::Severity;
use crate::session::sheet::AnswerSheet;
use crate::store::file::FileStore;
use crate::store::kv::KeyValueStore;

/// Session as driven from the command line: file store, headless sheet.
pub type CliSession = FormSession<FileStore, AnswerSheet>;

pub fn open_session(store_dir: &str, options: SessionOptions) -> Result<CliSession, Box<dyn std::error::Error>> {
    let store = FileStore::open(store_dir)?;
    tracing::debug!(dir = %store.dir().display(), "opened form store");
    Ok(FormSession::open(store, AnswerSheet::new(), options)?)
}

// ============================================================================
// status subcommand
// ============================================================================

pub fn cmd_status<S: KeyValueStore>(
    session: &mut FormSession<S, AnswerSheet>,
    format: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let report = session.status()?;
    match format {
        "json" => Ok(format!("{}\n", serde_json::to_string_pretty(&report)?)),
        _ => Ok(format_status(&report)),
    }
}

// ============================================================================
// set subcommand
// ============================================================================

/// Answer one field the way the form would: update the control, raise the
/// matching event, and persist before returning.
pub fn cmd_set<S: KeyValueStore>(
    session: &mut FormSession<S, AnswerSheet>,
    key: &str,
    value: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let field = Field::from_key(key).ok_or_else(|| format!("unknown field '{key}'"))?;
    if !session.port_mut().set_from_input(field, value) {
        return Err(format!("invalid value '{value}' for field '{key}'").into());
    }

    match field {
        Field::SsoProtocol => session.on_protocol_changed(value),
        Field::RolesRequired => session.on_roles_toggle(value),
        Field::ProvisioningRequired => session.on_provisioning_toggle(value),
        _ => {
            session.on_field_changed();
            session.flush()?;
        }
    }
    fail_on_error_notification(session)?;

    Ok(format!("Saved {}. Progress: {}\n", key, session.progress()))
}

// ============================================================================
// export / import subcommands
// ============================================================================

pub fn cmd_export_progress<S: KeyValueStore>(
    session: &mut FormSession<S, AnswerSheet>,
    output_dir: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let path = session.export_progress_to(Path::new(output_dir))?;
    Ok(format!("Progress exported to {}\n", path.display()))
}

pub fn cmd_import_progress<S: KeyValueStore>(
    session: &mut FormSession<S, AnswerSheet>,
    file: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let path = Path::new(file);
    session.import_progress_file(path)?;
    Ok(format!(
        "Progress imported from {}. Progress: {}\n",
        path.display(),
        session.progress()
    ))
}

pub fn cmd_export_report<S: KeyValueStore>(
    session: &mut FormSession<S, AnswerSheet>,
    output_dir: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let path = session.export_report_to(Path::new(output_dir))?;
    Ok(format!("Report exported to {}\n", path.display()))
}

// ============================================================================
// clear subcommand
// ============================================================================

pub fn cmd_clear<S: KeyValueStore>(
    session: &mut FormSession<S, AnswerSheet>,
    confirmed: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    if !confirmed {
        return Err("clearing deletes all saved form data and cannot be undone; rerun with --yes".into());
    }
    let fresh = session.clear()?;
    Ok(format!("Form data cleared. New form {fresh}\n"))
}

// ============================================================================
// Helpers
// ============================================================================

/// Event handlers report storage failures as notifications; surface the
/// first one as this command's error.
fn fail_on_error_notification<S: KeyValueStore>(
    session: &mut FormSession<S, AnswerSheet>,
) -> Result<(), Box<dyn std::error::Error>> {
    let notifications = session.port_mut().take_notifications();
    match notifications.into_iter().find(|(_, severity)| *severity == Severity::Error) {
        Some((message, _)) => Err(message.into()),
        None => Ok(()),
    }
}
