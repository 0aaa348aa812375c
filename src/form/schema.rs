// ============================================================================
// Field schema of the SSO application onboarding form
// ============================================================================

/// How a field is captured by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, textarea, url, email
    Text,
    /// Single-choice dropdown
    Select,
    /// Boolean toggle
    Checkbox,
    /// Radio group with its option values
    Radio(&'static [&'static str]),
}

const YES_NO: &[&str] = &["yes", "no"];

macro_rules! fields {
    ($( $variant:ident => ($key:literal, $label:literal, $kind:expr, $required:literal) ),+ $(,)?) => {
        /// Every field the form declares, in form order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Field {
            $( $variant, )+
        }

        impl Field {
            pub const ALL: &'static [Field] = &[ $( Field::$variant, )+ ];

            /// Storage/export key.
            pub fn key(self) -> &'static str {
                match self { $( Field::$variant => $key, )+ }
            }

            /// Label used in the rendered report.
            pub fn label(self) -> &'static str {
                match self { $( Field::$variant => $label, )+ }
            }

            pub fn kind(self) -> FieldKind {
                match self { $( Field::$variant => $kind, )+ }
            }

            /// Whether the field counts towards progress.
            pub fn required(self) -> bool {
                match self { $( Field::$variant => $required, )+ }
            }
        }
    };
}

fields! {
    // 1. General application information
    AppName => ("appName", "Application Name", FieldKind::Text, true),
    AppType => ("appType", "Application Type", FieldKind::Select, true),
    AppUrl => ("appUrl", "Application URL", FieldKind::Text, true),
    AppDescription => ("appDescription", "Application Description", FieldKind::Text, false),
    BusinessOwner => ("businessOwner", "Business Owner / Requestor", FieldKind::Text, true),
    OwnerEmail => ("ownerEmail", "Owner Email", FieldKind::Text, true),
    TechnicalContact => ("technicalContact", "Internal Technical Contact", FieldKind::Text, true),
    TechnicalEmail => ("technicalEmail", "Internal Technical Contact Email", FieldKind::Text, true),
    VendorContact => ("vendorContact", "Vendor Technical Contact", FieldKind::Text, false),
    VendorEmail => ("vendorEmail", "Vendor Technical Contact Email", FieldKind::Text, false),

    // 2. Protocol
    VendorSsoDocUrl => ("vendorSsoDocUrl", "Vendor SSO Documentation URL", FieldKind::Text, false),
    SsoProtocol => ("ssoProtocol", "SSO Protocol", FieldKind::Select, true),
    OtherProtocol => ("otherProtocol", "Other Protocol", FieldKind::Text, false),

    // 3. SAML
    SamlEntityId => ("samlEntityId", "Entity ID / Issuer", FieldKind::Text, false),
    SamlAcsUrl => ("samlAcsUrl", "Assertion Consumer Service (ACS) URL", FieldKind::Text, false),
    SamlSignOnUrl => ("samlSignOnUrl", "Sign-On URL", FieldKind::Text, false),
    SamlLogoutUrl => ("samlLogoutUrl", "Single Logout URL", FieldKind::Text, false),
    SamlRelayState => ("samlRelayState", "Relay State", FieldKind::Text, false),
    SamlSignResponse => ("samlSignResponse", "Sign SAML Response", FieldKind::Select, false),
    SamlSigningAlgorithm => ("samlSigningAlgorithm", "Signing Algorithm", FieldKind::Select, false),
    SamlNameIdFormat => ("samlNameIdFormat", "NameID Format", FieldKind::Select, false),
    SamlAttributes => ("samlAttributes", "Required SAML Attributes/Claims", FieldKind::Text, false),

    // 4. OpenID Connect / OAuth
    OidcRedirectUri => ("oidcRedirectUri", "Redirect URI(s)", FieldKind::Text, false),
    OidcLogoutUri => ("oidcLogoutUri", "Post Logout Redirect URI", FieldKind::Text, false),
    OidcAppType => ("oidcAppType", "Application Type", FieldKind::Select, false),
    GrantAuthCode => ("grantAuthCode", "Authorization Code", FieldKind::Checkbox, false),
    GrantImplicit => ("grantImplicit", "Implicit", FieldKind::Checkbox, false),
    GrantClientCreds => ("grantClientCreds", "Client Credentials", FieldKind::Checkbox, false),
    GrantRefreshToken => ("grantRefreshToken", "Refresh Token", FieldKind::Checkbox, false),
    OidcScopes => ("oidcScopes", "Required Scopes", FieldKind::Text, false),
    TokenIdToken => ("tokenIdToken", "ID Token", FieldKind::Checkbox, false),
    TokenAccessToken => ("tokenAccessToken", "Access Token", FieldKind::Checkbox, false),
    OidcClaims => ("oidcClaims", "Required Claims in Token", FieldKind::Text, false),

    // 5. User assignment & access control
    UserAssignmentRequired => ("userAssignmentRequired", "User Assignment Required", FieldKind::Radio(YES_NO), false),
    AssignedGroups => ("assignedGroups", "Security Groups to Assign", FieldKind::Text, false),
    AssignedUsers => ("assignedUsers", "Specific Users to Assign", FieldKind::Text, false),
    RolesRequired => ("rolesRequired", "Application Roles Required", FieldKind::Radio(YES_NO), false),
    AppRoles => ("appRoles", "Application Roles", FieldKind::Text, false),

    // 6. Additional configuration
    HomepageUrl => ("homepageUrl", "MyApps Portal Sign-On URL", FieldKind::Text, false),
    LogoUrl => ("logoUrl", "Application Logo URL", FieldKind::Text, false),
    SupportEmail => ("supportEmail", "Application Support Email", FieldKind::Text, false),
    PrivacyUrl => ("privacyUrl", "Privacy Statement URL", FieldKind::Text, false),
    TermsUrl => ("termsUrl", "Terms of Service URL", FieldKind::Text, false),
    ProvisioningRequired => ("provisioningRequired", "Provisioning Required", FieldKind::Radio(YES_NO), false),
    ScimEndpoint => ("scimEndpoint", "SCIM Endpoint URL", FieldKind::Text, false),
    AdditionalNotes => ("additionalNotes", "Additional Notes / Special Requirements", FieldKind::Text, false),
}

/// Grant-type checkboxes, in report order.
pub const GRANT_TYPES: &[Field] = &[
    Field::GrantAuthCode,
    Field::GrantImplicit,
    Field::GrantClientCreds,
    Field::GrantRefreshToken,
];

/// Token-type checkboxes, in report order.
pub const TOKEN_TYPES: &[Field] = &[Field::TokenIdToken, Field::TokenAccessToken];

impl Field {
    /// Look a field up by its storage key.
    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.key() == key)
    }

    /// Initial value of the control, used as the "not yet filled" marker.
    pub fn default_value(self) -> &'static str {
        ""
    }

    pub fn required_fields() -> impl Iterator<Item = Field> {
        Field::ALL.iter().copied().filter(|f| f.required())
    }
}
