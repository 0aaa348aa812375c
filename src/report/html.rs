use crate::form::schema::{Field, GRANT_TYPES, TOKEN_TYPES};
use crate::form::snapshot::Snapshot;

// ============================================================================
// HTML onboarding report: self-contained document rendered from a snapshot
// ============================================================================

/// Shown in place of a blank or missing answer.
pub const NOT_PROVIDED: &str = "Not provided";

/// Separator between checked members of a checkbox set.
pub const LIST_SEPARATOR: &str = ", ";

/// Render the onboarding report for a snapshot.
///
/// - Every listed field gets a row; blank answers show "Not provided"
/// - SAML section only for protocol `saml`, OIDC/OAuth section only for
///   `oidc` or `oauth`
/// - Role list only when roles are required, SCIM endpoint only when
///   provisioning is required
/// - Inline CSS (no external dependencies)
///
/// Pure: the same snapshot always renders the same document.
pub fn render_report(snapshot: &Snapshot) -> String {
    let protocol = snapshot.text(Field::SsoProtocol).unwrap_or_default();
    let mut body = String::new();

    body.push_str("<h2>1. General Application Information</h2>\n");
    body.push_str(&rows(
        snapshot,
        &[
            Field::AppName,
            Field::AppType,
            Field::AppUrl,
            Field::AppDescription,
            Field::BusinessOwner,
            Field::OwnerEmail,
            Field::TechnicalContact,
            Field::TechnicalEmail,
            Field::VendorContact,
            Field::VendorEmail,
        ],
    ));

    body.push_str("<h2>2. SSO Protocol Information</h2>\n");
    body.push_str(&rows(snapshot, &[Field::VendorSsoDocUrl, Field::SsoProtocol]));
    if protocol == "other" {
        body.push_str(&field_row(snapshot, Field::OtherProtocol));
    }

    if protocol == "saml" {
        body.push_str("<h2>3. SAML 2.0 Configuration</h2>\n");
        body.push_str(&rows(
            snapshot,
            &[
                Field::SamlEntityId,
                Field::SamlAcsUrl,
                Field::SamlSignOnUrl,
                Field::SamlLogoutUrl,
                Field::SamlRelayState,
                Field::SamlSignResponse,
                Field::SamlSigningAlgorithm,
                Field::SamlNameIdFormat,
                Field::SamlAttributes,
            ],
        ));
    }

    if protocol == "oidc" || protocol == "oauth" {
        body.push_str("<h2>4. OpenID Connect / OAuth 2.0 Configuration</h2>\n");
        body.push_str(&rows(
            snapshot,
            &[Field::OidcRedirectUri, Field::OidcLogoutUri, Field::OidcAppType],
        ));
        body.push_str(&composite_row("Grant Types", &checked_labels(snapshot, GRANT_TYPES)));
        body.push_str(&field_row(snapshot, Field::OidcScopes));
        body.push_str(&composite_row(
            "Token Configuration",
            &checked_labels(snapshot, TOKEN_TYPES),
        ));
        body.push_str(&field_row(snapshot, Field::OidcClaims));
    }

    body.push_str("<h2>5. User Assignment &amp; Access Control</h2>\n");
    body.push_str(&rows(
        snapshot,
        &[
            Field::UserAssignmentRequired,
            Field::AssignedGroups,
            Field::AssignedUsers,
            Field::RolesRequired,
        ],
    ));
    if snapshot.text(Field::RolesRequired) == Some("yes") {
        body.push_str(&field_row(snapshot, Field::AppRoles));
    }

    body.push_str("<h2>6. Additional Configuration</h2>\n");
    body.push_str(&rows(
        snapshot,
        &[
            Field::HomepageUrl,
            Field::LogoUrl,
            Field::SupportEmail,
            Field::PrivacyUrl,
            Field::TermsUrl,
            Field::ProvisioningRequired,
        ],
    ));
    if snapshot.text(Field::ProvisioningRequired) == Some("yes") {
        body.push_str(&field_row(snapshot, Field::ScimEndpoint));
    }
    body.push_str(&field_row(snapshot, Field::AdditionalNotes));

    let app_name = snapshot
        .text(Field::AppName)
        .filter(|name| !name.is_empty())
        .unwrap_or("Untitled");
    let form_id = if snapshot.identity.as_str().is_empty() {
        "N/A"
    } else {
        snapshot.identity.as_str()
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>SSO Application Intake - {app_name}</title>
<style>
body {{ font-family: "Segoe UI", Tahoma, Geneva, Verdana, sans-serif; line-height: 1.6; color: #323130; max-width: 900px; margin: 0 auto; padding: 20px; background: #f5f5f5; }}
.container {{ background: white; padding: 40px; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.1); }}
h1 {{ color: #0078d4; border-bottom: 3px solid #0078d4; padding-bottom: 10px; }}
h2 {{ color: #0078d4; margin-top: 30px; border-bottom: 2px solid #50e6ff; padding-bottom: 5px; }}
.info-row {{ display: grid; grid-template-columns: 200px 1fr; margin: 10px 0; padding: 10px 0; border-bottom: 1px solid #e1e1e1; }}
.label {{ font-weight: 600; color: #605e5c; }}
.value {{ color: #323130; white-space: pre-wrap; }}
.header-info {{ background: #f0f0f0; padding: 15px; border-radius: 4px; margin-bottom: 20px; }}
.header-info .info-row {{ border: none; }}
.empty {{ color: #999; font-style: italic; }}
@media print {{ body {{ background: white; }} .container {{ box-shadow: none; }} }}
</style>
</head>
<body>
<div class="container">
<h1>Microsoft Entra ID SSO Application Onboarding Form</h1>
<div class="header-info">
<div class="info-row"><span class="label">Form ID:</span><span class="value">{form_id}</span></div>
<div class="info-row"><span class="label">Submission Date:</span><span class="value">{date}</span></div>
</div>
{body}</div>
</body>
</html>
"##,
        app_name = escape_html(app_name),
        form_id = escape_html(form_id),
        date = snapshot.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        body = body,
    )
}

/// Labels of the checked members of `set`, in declared order.
/// Empty when none is checked.
pub fn checked_labels(snapshot: &Snapshot, set: &[Field]) -> String {
    set.iter()
        .filter(|field| snapshot.is_checked(**field))
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

fn rows(snapshot: &Snapshot, fields: &[Field]) -> String {
    fields.iter().map(|field| field_row(snapshot, *field)).collect()
}

fn field_row(snapshot: &Snapshot, field: Field) -> String {
    info_row(field.label(), snapshot.text(field))
}

/// Labeled row; blank or missing values get the placeholder.
fn info_row(label: &str, value: Option<&str>) -> String {
    let display = match value {
        Some(v) if !v.trim().is_empty() => escape_html(v),
        _ => format!("<span class=\"empty\">{NOT_PROVIDED}</span>"),
    };
    format!(
        "<div class=\"info-row\"><span class=\"label\">{}:</span><span class=\"value\">{}</span></div>\n",
        escape_html(label),
        display
    )
}

/// Row for a derived list. Rendered as-is, empty when nothing is checked.
fn composite_row(label: &str, joined: &str) -> String {
    format!(
        "<div class=\"info-row\"><span class=\"label\">{}:</span><span class=\"value\">{}</span></div>\n",
        escape_html(label),
        escape_html(joined)
    )
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
