use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::form::progress::ProgressState;
use crate::form::visibility::{ProtocolSection, VisibilityState};

// ============================================================================
// Session status: what the console and JSON status outputs are built from
// ============================================================================

/// Point-in-time summary of a form session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusReport {
    /// Current session identity
    pub form_id: String,

    /// Whether a snapshot has been saved for this identity
    pub has_saved_data: bool,

    /// When the saved snapshot was written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,

    pub filled_required: usize,
    pub total_required: usize,
    pub percent: u8,

    /// Active protocol section: none, saml, oidc_oauth, other
    pub protocol_section: String,
    pub roles_panel_visible: bool,
    pub provisioning_panel_visible: bool,

    /// Changes since the last export
    pub dirty: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_export: Option<DateTime<Utc>>,
}

impl StatusReport {
    pub fn new(form_id: &str, progress: ProgressState, visibility: VisibilityState) -> Self {
        Self {
            form_id: form_id.to_string(),
            has_saved_data: false,
            saved_at: None,
            filled_required: progress.filled,
            total_required: progress.total,
            percent: progress.percent,
            protocol_section: protocol_name(visibility.protocol_section).to_string(),
            roles_panel_visible: visibility.roles_panel_visible,
            provisioning_panel_visible: visibility.provisioning_panel_visible,
            dirty: false,
            last_export: None,
        }
    }

    pub fn with_saved_at(mut self, saved_at: Option<DateTime<Utc>>) -> Self {
        self.has_saved_data = saved_at.is_some();
        self.saved_at = saved_at;
        self
    }

    pub fn with_dirty(mut self, dirty: bool) -> Self {
        self.dirty = dirty;
        self
    }

    pub fn with_last_export(mut self, last_export: Option<DateTime<Utc>>) -> Self {
        self.last_export = last_export;
        self
    }

    pub fn is_complete(&self) -> bool {
        self.total_required > 0 && self.filled_required == self.total_required
    }
}

fn protocol_name(section: ProtocolSection) -> &'static str {
    match section {
        ProtocolSection::None => "none",
        ProtocolSection::Saml => "saml",
        ProtocolSection::OidcOAuth => "oidc_oauth",
        ProtocolSection::Other => "other",
    }
}
