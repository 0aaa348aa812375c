use std::collections::HashMap;

use crate::form::schema::{Field, FieldKind};
use crate::form::snapshot::FieldValue;
use crate::form::visibility::Section;
use crate::session::port::{Control, PresentationPort, Severity};

/// Headless presentation layer: the form's controls held in memory, built
/// from the field schema. Backs the CLI and keeps whatever the core pushes
/// to it so callers can inspect it afterwards.
#[derive(Debug, Clone)]
pub struct AnswerSheet {
    controls: Vec<Control>,
    sections: HashMap<Section, bool>,
    progress: (u8, usize, usize),
    warning_text: Option<String>,
    warning_visible: bool,
    notifications: Vec<(String, Severity)>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        let mut controls = Vec::new();
        for &field in Field::ALL {
            let name = field.key().to_string();
            match field.kind() {
                FieldKind::Text | FieldKind::Select => controls.push(Control::Text {
                    name,
                    value: field.default_value().to_string(),
                }),
                FieldKind::Checkbox => controls.push(Control::Checkbox { name, checked: false }),
                FieldKind::Radio(options) => {
                    for option in options {
                        controls.push(Control::Radio {
                            name: name.clone(),
                            value: option.to_string(),
                            checked: false,
                        });
                    }
                }
            }
        }

        Self {
            controls,
            sections: HashMap::new(),
            progress: (0, 0, 0),
            warning_text: None,
            warning_visible: false,
            notifications: Vec::new(),
        }
    }

    /// Set a control from user input text, interpreted by the field's kind:
    /// checkboxes take `true`/`false`/`yes`/`no`/`on`/`off`, radio groups an
    /// option value (empty to deselect). Returns `false` when nothing matched.
    pub fn set_from_input(&mut self, field: Field, input: &str) -> bool {
        let value = match field.kind() {
            FieldKind::Text | FieldKind::Select => FieldValue::Text(input.to_string()),
            FieldKind::Checkbox => match input.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => FieldValue::Toggle(true),
                "false" | "no" | "off" | "0" => FieldValue::Toggle(false),
                _ => return false,
            },
            FieldKind::Radio(options) => {
                if input.is_empty() {
                    FieldValue::Choice(None)
                } else if options.contains(&input) {
                    FieldValue::Choice(Some(input.to_string()))
                } else {
                    return false;
                }
            }
        };
        self.write_answer(field.key(), &value)
    }

    pub fn is_section_visible(&self, section: Section) -> bool {
        self.sections.get(&section).copied().unwrap_or(false)
    }

    /// Last progress pushed: (percent, filled, total).
    pub fn progress(&self) -> (u8, usize, usize) {
        self.progress
    }

    pub fn warning_text(&self) -> Option<&str> {
        self.warning_text.as_deref()
    }

    pub fn is_warning_visible(&self) -> bool {
        self.warning_visible
    }

    pub fn notifications(&self) -> &[(String, Severity)] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<(String, Severity)> {
        std::mem::take(&mut self.notifications)
    }
}

impl Default for AnswerSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentationPort for AnswerSheet {
    fn read_answers(&self) -> Vec<Control> {
        self.controls.clone()
    }

    fn write_answer(&mut self, field: &str, value: &FieldValue) -> bool {
        if !self.controls.iter().any(|c| c.name() == field) {
            return false;
        }

        // A radio value matching none of the options leaves the group as is.
        let selected = value.as_str();
        let group_has_option = self.controls.iter().any(|c| {
            matches!(c, Control::Radio { name, value: option, .. }
                if name == field && Some(option.as_str()) == selected)
        });

        for control in self.controls.iter_mut().filter(|c| c.name() == field) {
            match control {
                Control::Checkbox { checked, .. } => *checked = value.is_checked(),
                Control::Radio { value: option, checked, .. } => {
                    if group_has_option || selected.is_none() {
                        *checked = Some(option.as_str()) == selected;
                    }
                }
                Control::Text { value: current, .. } => {
                    *current = match value {
                        FieldValue::Toggle(b) => b.to_string(),
                        other => other.as_str().unwrap_or_default().to_string(),
                    };
                }
            }
        }
        true
    }

    fn set_section_visible(&mut self, section: Section, visible: bool) {
        self.sections.insert(section, visible);
    }

    fn set_progress(&mut self, percent: u8, filled: usize, total: usize) {
        self.progress = (percent, filled, total);
    }

    fn create_warning(&mut self, text: &str) {
        self.warning_text = Some(text.to_string());
    }

    fn set_warning_visible(&mut self, visible: bool) {
        self.warning_visible = visible;
    }

    fn notify(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => tracing::warn!(%message, "notification"),
            _ => tracing::info!(%message, "notification"),
        }
        self.notifications.push((message.to_string(), severity));
    }
}
