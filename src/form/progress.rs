use std::fmt;

use crate::form::schema::Field;
use crate::form::snapshot::Snapshot;

/// Required field as seen by the progress bar: its current value and the
/// value the control starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredField {
    pub name: String,
    pub value: String,
    pub default: String,
}

impl RequiredField {
    /// Filled means non-blank and changed from the default.
    pub fn is_filled(&self) -> bool {
        !self.value.trim().is_empty() && self.value != self.default
    }
}

/// Completion of the required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressState {
    pub filled: usize,
    pub total: usize,
    /// 0..=100, rounded half up
    pub percent: u8,
}

impl fmt::Display for ProgressState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}% ({} of {} required fields)",
            self.percent, self.filled, self.total
        )
    }
}

pub fn compute(required: &[RequiredField]) -> ProgressState {
    let total = required.len();
    let filled = required.iter().filter(|f| f.is_filled()).count();
    ProgressState {
        filled,
        total,
        percent: percent(filled, total),
    }
}

/// `round(filled / total * 100)` in integer arithmetic, 0 when `total` is 0.
/// Only a complete set reads 100.
fn percent(filled: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    if filled >= total {
        return 100;
    }
    let rounded = (200 * filled + total) / (2 * total);
    rounded.min(99) as u8
}

/// Required fields of the schema with their values from `snapshot`.
pub fn required_fields(snapshot: &Snapshot) -> Vec<RequiredField> {
    Field::required_fields()
        .map(|field| RequiredField {
            name: field.key().to_string(),
            value: snapshot.text(field).unwrap_or_default().to_string(),
            default: field.default_value().to_string(),
        })
        .collect()
}

pub fn compute_for(snapshot: &Snapshot) -> ProgressState {
    compute(&required_fields(snapshot))
}
