#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use sso_intake::form::visibility::Section;
use sso_intake::{
    AnswerSheet, Control, FieldValue, FormId, KeyValueStore, MemoryStore, PresentationPort,
    Severity, StorageError,
};

pub fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, h, m, s).unwrap()
}

pub fn form_id(id: &str) -> FormId {
    FormId(id.to_string())
}

// ============================================================================
// Recording port: AnswerSheet plus call counters
// ============================================================================

#[derive(Debug, Default)]
pub struct RecordingPort {
    pub sheet: AnswerSheet,
    pub warnings_created: usize,
    pub progress_updates: Vec<(u8, usize, usize)>,
    pub section_updates: usize,
}

impl RecordingPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.sheet
            .notifications()
            .iter()
            .filter(|(_, severity)| *severity == Severity::Error)
            .map(|(message, _)| message.clone())
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.sheet
            .notifications()
            .iter()
            .filter(|(_, severity)| *severity == Severity::Success)
            .map(|(message, _)| message.clone())
            .collect()
    }
}

impl PresentationPort for RecordingPort {
    fn read_answers(&self) -> Vec<Control> {
        self.sheet.read_answers()
    }

    fn write_answer(&mut self, field: &str, value: &FieldValue) -> bool {
        self.sheet.write_answer(field, value)
    }

    fn set_section_visible(&mut self, section: Section, visible: bool) {
        self.section_updates += 1;
        self.sheet.set_section_visible(section, visible);
    }

    fn set_progress(&mut self, percent: u8, filled: usize, total: usize) {
        self.progress_updates.push((percent, filled, total));
        self.sheet.set_progress(percent, filled, total);
    }

    fn create_warning(&mut self, text: &str) {
        self.warnings_created += 1;
        self.sheet.create_warning(text);
    }

    fn set_warning_visible(&mut self, visible: bool) {
        self.sheet.set_warning_visible(visible);
    }

    fn notify(&mut self, message: &str, severity: Severity) {
        self.sheet.notify(message, severity);
    }
}

// ============================================================================
// Store that can be switched into failure
// ============================================================================

#[derive(Debug, Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_writes: bool,
    pub writes: usize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "storage disabled"),
            });
        }
        self.writes += 1;
        self.inner.set(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        self.inner.delete(key)
    }
}
