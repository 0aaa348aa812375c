use crate::report::report_model::StatusReport;

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a session status for terminal output.
///
/// Produces output like:
/// ```text
/// === Form sso-1717000000000 ===
///
/// Progress:     60% (3 of 5 required fields)
/// Saved:        2024-05-29 16:26:40 UTC
/// Sections:     protocol=saml roles=shown provisioning=hidden
/// Last export:  never
/// ```
pub fn format_status(report: &StatusReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Form {} ===\n\n", report.form_id));

    let marker = if report.is_complete() { "\u{2713} " } else { "" };
    out.push_str(&format!(
        "Progress:     {}{}% ({} of {} required fields)\n",
        marker, report.percent, report.filled_required, report.total_required
    ));

    match report.saved_at {
        Some(at) => out.push_str(&format!("Saved:        {}\n", at.format("%Y-%m-%d %H:%M:%S UTC"))),
        None => out.push_str("Saved:        nothing saved yet\n"),
    }

    out.push_str(&format!(
        "Sections:     protocol={} roles={} provisioning={}\n",
        report.protocol_section,
        shown(report.roles_panel_visible),
        shown(report.provisioning_panel_visible)
    ));

    match report.last_export {
        Some(at) => out.push_str(&format!(
            "Last export:  {}\n",
            at.format("%Y-%m-%d %H:%M:%S UTC")
        )),
        None => out.push_str("Last export:  never\n"),
    }

    if report.dirty {
        out.push_str("\n\u{26a0} Changes since last export are only stored on this device.\n");
    }

    out
}

fn shown(visible: bool) -> &'static str {
    if visible { "shown" } else { "hidden" }
}
