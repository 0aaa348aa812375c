use sso_intake::store::layout::{load_snapshot, load_snapshot_json, save_snapshot};
use sso_intake::transfer::export::{
    export_progress, progress_file_name, report_file_name, write_artifact,
};
use sso_intake::transfer::import::{
    UnknownFieldPolicy, check_file_name, import_progress, parse_payload,
};
use sso_intake::{Field, FieldValue, FormError, KeyValueStore, MemoryStore, Snapshot};

use crate::common::utils::{at, form_id};

mod common;

fn saved_store() -> (MemoryStore, Snapshot) {
    let mut store = MemoryStore::new();
    let mut snapshot = Snapshot::new(form_id("sso-1000"), at(8, 0, 0));
    snapshot.set(Field::AppName, FieldValue::Text("Acme".into()));
    snapshot.set(Field::SsoProtocol, FieldValue::Text("saml".into()));
    snapshot.set(Field::GrantAuthCode, FieldValue::Toggle(true));
    snapshot.set(Field::RolesRequired, FieldValue::Choice(Some("yes".into())));
    snapshot
        .extra
        .insert("legacyField".into(), serde_json::json!({"kept": true}));
    save_snapshot(&mut store, &snapshot).unwrap();
    (store, snapshot)
}

// ============================================================================
// Export
// ============================================================================

#[test]
fn export_without_saved_data_fails() {
    let store = MemoryStore::new();
    let err = export_progress(&store, &form_id("sso-1000")).unwrap_err();
    assert!(matches!(err, FormError::NoData));
    assert_eq!(err.to_string(), "No form data to export");
}

#[test]
fn export_names_and_formats_the_file() {
    let (store, _) = saved_store();
    let artifact = export_progress(&store, &form_id("sso-1000")).unwrap();

    assert_eq!(artifact.file_name, "SSO-Form-Progress-sso-1000.json");
    assert_eq!(artifact.media_type, "application/json");
    assert!(artifact.contents.starts_with("{\n  \"timestamp\""), "pretty printed");
    assert!(artifact.contents.contains("\"legacyField\""), "unknown keys survive export");

    let parsed: serde_json::Value = serde_json::from_str(&artifact.contents).unwrap();
    assert_eq!(parsed["formId"], "sso-1000");
    assert_eq!(parsed["grantAuthCode"], true);
    assert_eq!(parsed["rolesRequired"], "yes");
}

#[test]
fn report_and_progress_file_names() {
    let id = form_id("sso-42");
    assert_eq!(progress_file_name(&id), "SSO-Form-Progress-sso-42.json");
    assert_eq!(report_file_name(&id), "SSO-Application-Onboarding-sso-42.html");
}

#[test]
fn write_artifact_creates_directory() {
    let (store, _) = saved_store();
    let artifact = export_progress(&store, &form_id("sso-1000")).unwrap();

    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("exports");
    let path = write_artifact(&dir, &artifact).unwrap();

    assert_eq!(path, dir.join("SSO-Form-Progress-sso-1000.json"));
    assert_eq!(std::fs::read_to_string(path).unwrap(), artifact.contents);
}

// ============================================================================
// Import validation
// ============================================================================

#[test]
fn file_name_must_be_json() {
    assert!(check_file_name("progress.json").is_ok());
    assert!(check_file_name("PROGRESS.JSON").is_ok());
    for name in ["progress.txt", "progress.json.bak", "json", ""] {
        let err = check_file_name(name).unwrap_err();
        assert!(matches!(err, FormError::UnsupportedFile { .. }), "{name}");
    }
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = parse_payload("{not json").unwrap_err();
    assert!(matches!(err, FormError::ImportParse(_)));
    assert_eq!(err.user_message(), "Error reading file. Please check the file format.");
}

#[test]
fn missing_identity_or_timestamp_is_rejected() {
    let cases = [
        (r#"{"fields":{"appName":"Acme"}}"#, "formId"),
        (r#"{"formId":"sso-1","appName":"Acme"}"#, "timestamp"),
        (r#"{"formId":"","timestamp":"2024-05-01T08:00:00.000Z"}"#, "formId"),
        (r#"{"formId":"sso-1","timestamp":null}"#, "timestamp"),
        (r#"["formId","timestamp"]"#, "formId"),
    ];
    for (payload, expected) in cases {
        match parse_payload(payload) {
            Err(FormError::ImportSchema { missing }) => assert_eq!(missing, expected, "{payload}"),
            other => panic!("expected schema error for {payload}, got {other:?}"),
        }
    }
}

// ============================================================================
// Import
// ============================================================================

#[test]
fn failed_import_leaves_store_untouched() {
    let (mut store, _) = saved_store();
    let before = load_snapshot_json(&store, &form_id("sso-1000")).unwrap();

    for payload in ["{not json", r#"{"fields":{"appName":"Acme"}}"#] {
        assert!(
            import_progress(&mut store, &form_id("sso-1000"), payload, UnknownFieldPolicy::Preserve)
                .is_err()
        );
        assert_eq!(load_snapshot_json(&store, &form_id("sso-1000")).unwrap(), before);
    }
}

#[test]
fn export_then_import_round_trips_answers() {
    let (store, original) = saved_store();
    let exported = export_progress(&store, &form_id("sso-1000")).unwrap();

    let mut other = MemoryStore::new();
    let current = form_id("sso-2000");
    let imported = import_progress(&mut other, &current, &exported.contents, UnknownFieldPolicy::Preserve)
        .unwrap();

    assert_eq!(imported.identity, current, "import adopts the current identity");
    assert_ne!(imported.timestamp, original.timestamp);
    assert_eq!(imported.fields, original.fields);
    assert_eq!(imported.extra, original.extra);

    let stored = load_snapshot(&other, &current).unwrap().unwrap();
    assert_eq!(stored.identity, current);
    assert_eq!(stored.fields, original.fields);
}

#[test]
fn import_replaces_rather_than_merges() {
    let (mut store, _) = saved_store();
    let payload = r#"{"formId":"sso-9","timestamp":"2024-05-01T08:00:00.000Z","appUrl":"https://b.example"}"#;

    let snapshot =
        import_progress(&mut store, &form_id("sso-1000"), payload, UnknownFieldPolicy::Preserve).unwrap();
    assert_eq!(snapshot.text(Field::AppUrl), Some("https://b.example"));
    assert_eq!(snapshot.text(Field::AppName), None, "old answers do not survive");
    assert!(snapshot.extra.is_empty());
}

#[test]
fn strip_policy_drops_unknown_keys() {
    let mut store = MemoryStore::new();
    let payload = r#"{"formId":"sso-9","timestamp":"2024-05-01T08:00:00.000Z","appName":"Acme","future":1}"#;

    let kept = import_progress(&mut store, &form_id("sso-1"), payload, UnknownFieldPolicy::Preserve).unwrap();
    assert!(kept.extra.contains_key("future"));

    let stripped = import_progress(&mut store, &form_id("sso-1"), payload, UnknownFieldPolicy::Strip).unwrap();
    assert!(stripped.extra.is_empty());
    assert_eq!(stripped.text(Field::AppName), Some("Acme"));
    let raw = store.get("formData_sso-1").unwrap().unwrap();
    assert!(!raw.contains("future"));
}

#[test]
fn unknown_field_policy_reads_lowercase() {
    let policy: UnknownFieldPolicy = serde_yaml::from_str("strip").unwrap();
    assert_eq!(policy, UnknownFieldPolicy::Strip);
    assert_eq!(UnknownFieldPolicy::default(), UnknownFieldPolicy::Preserve);
}
