use sso_intake::form::progress::{ProgressState, RequiredField, compute, compute_for, required_fields};
use sso_intake::{Field, FieldValue, Snapshot};

use crate::common::utils::{at, form_id};

mod common;

fn field(name: &str, value: &str, default: &str) -> RequiredField {
    RequiredField {
        name: name.into(),
        value: value.into(),
        default: default.into(),
    }
}

fn fields(filled: usize, total: usize) -> Vec<RequiredField> {
    (0..total)
        .map(|i| {
            let value = if i < filled { "answer" } else { "" };
            field(&format!("f{i}"), value, "")
        })
        .collect()
}

#[test]
fn three_of_five_is_sixty_percent() {
    let required = vec![
        field("appName", "Acme", ""),
        field("appUrl", "https://acme.example", ""),
        field("ownerEmail", "", ""),
        field("appType", "saas", "select"),
        field("ssoProtocol", "select", "select"),
    ];
    let progress = compute(&required);
    assert_eq!(
        progress,
        ProgressState {
            filled: 3,
            total: 5,
            percent: 60
        }
    );
    assert_eq!(progress.to_string(), "60% (3 of 5 required fields)");
}

#[test]
fn no_required_fields_is_zero() {
    assert_eq!(compute(&[]), ProgressState { filled: 0, total: 0, percent: 0 });
}

#[test]
fn blank_and_default_values_do_not_count() {
    let required = vec![
        field("a", "   ", ""),
        field("b", "placeholder", "placeholder"),
        field("c", " placeholder ", "placeholder"),
    ];
    let progress = compute(&required);
    assert_eq!(progress.filled, 1, "only a value differing from its default counts");
}

#[test]
fn percent_rounds_half_up() {
    assert_eq!(compute(&fields(1, 3)).percent, 33);
    assert_eq!(compute(&fields(2, 3)).percent, 67);
    assert_eq!(compute(&fields(1, 8)).percent, 13);
}

#[test]
fn percent_is_monotonic_in_filled_fields() {
    for total in 1..=12 {
        let mut previous = 0;
        for filled in 0..=total {
            let percent = compute(&fields(filled, total)).percent;
            assert!(percent >= previous, "{filled}/{total} dropped to {percent}");
            previous = percent;
        }
    }
}

#[test]
fn hundred_only_when_complete() {
    for total in 1..=400 {
        assert_eq!(compute(&fields(total, total)).percent, 100);
        assert!(compute(&fields(total - 1, total)).percent < 100, "{}/{total}", total - 1);
        assert_eq!(compute(&fields(0, total)).percent, 0);
    }
}

#[test]
fn progress_from_snapshot_uses_schema_required_fields() {
    let mut snapshot = Snapshot::new(form_id("sso-1"), at(9, 0, 0));
    assert_eq!(required_fields(&snapshot).len(), 8);
    assert_eq!(compute_for(&snapshot).filled, 0);

    snapshot.set(Field::AppName, FieldValue::Text("Acme".into()));
    snapshot.set(Field::SsoProtocol, FieldValue::Text("oidc".into()));
    snapshot.set(Field::AppDescription, FieldValue::Text("not required".into()));

    let progress = compute_for(&snapshot);
    assert_eq!((progress.filled, progress.total, progress.percent), (2, 8, 25));
}
