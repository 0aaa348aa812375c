use crate::form::schema::Field;
use crate::form::snapshot::Snapshot;
use crate::session::port::PresentationPort;

/// Protocol-dependent section currently shown. At most one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolSection {
    #[default]
    None,
    Saml,
    OidcOAuth,
    Other,
}

impl ProtocolSection {
    pub fn from_protocol(value: &str) -> Self {
        match value {
            "saml" => ProtocolSection::Saml,
            "oidc" | "oauth" => ProtocolSection::OidcOAuth,
            "other" => ProtocolSection::Other,
            _ => ProtocolSection::None,
        }
    }
}

/// Conditional question groups the presentation layer can show or hide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Saml,
    OidcOAuth,
    OtherProtocol,
    Roles,
    Provisioning,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Saml,
        Section::OidcOAuth,
        Section::OtherProtocol,
        Section::Roles,
        Section::Provisioning,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibilityState {
    pub protocol_section: ProtocolSection,
    pub roles_panel_visible: bool,
    pub provisioning_panel_visible: bool,
}

impl VisibilityState {
    pub fn is_visible(&self, section: Section) -> bool {
        match section {
            Section::Saml => self.protocol_section == ProtocolSection::Saml,
            Section::OidcOAuth => self.protocol_section == ProtocolSection::OidcOAuth,
            Section::OtherProtocol => self.protocol_section == ProtocolSection::Other,
            Section::Roles => self.roles_panel_visible,
            Section::Provisioning => self.provisioning_panel_visible,
        }
    }
}

/// Derives which conditional sections are shown. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct VisibilityMachine {
    state: VisibilityState,
}

impl VisibilityMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    /// Replace the active protocol section. A single enum slot holds it, so
    /// activating one deactivates the others.
    pub fn on_protocol(&mut self, value: &str) -> VisibilityState {
        self.state.protocol_section = ProtocolSection::from_protocol(value);
        tracing::debug!(protocol = value, section = ?self.state.protocol_section, "protocol section");
        self.state
    }

    pub fn on_roles(&mut self, value: &str) -> VisibilityState {
        self.state.roles_panel_visible = value == "yes";
        self.state
    }

    pub fn on_provisioning(&mut self, value: &str) -> VisibilityState {
        self.state.provisioning_panel_visible = value == "yes";
        self.state
    }

    /// Rebuild the whole state from a loaded snapshot.
    pub fn derive(&mut self, snapshot: &Snapshot) -> VisibilityState {
        self.state = VisibilityState::default();
        self.on_protocol(snapshot.text(Field::SsoProtocol).unwrap_or_default());
        self.on_roles(snapshot.text(Field::RolesRequired).unwrap_or_default());
        self.on_provisioning(snapshot.text(Field::ProvisioningRequired).unwrap_or_default())
    }

    /// Push every section's visibility to the presentation layer.
    pub fn render<P: PresentationPort + ?Sized>(&self, port: &mut P) {
        for section in Section::ALL {
            port.set_section_visible(section, self.state.is_visible(section));
        }
    }
}
