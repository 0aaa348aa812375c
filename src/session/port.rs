use crate::form::snapshot::FieldValue;
use crate::form::visibility::Section;

/// One input control as read from the presentation layer, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Text input, textarea or select
    Text { name: String, value: String },
    Checkbox { name: String, checked: bool },
    /// One option of a radio group
    Radio {
        name: String,
        value: String,
        checked: bool,
    },
}

impl Control {
    pub fn name(&self) -> &str {
        match self {
            Control::Text { name, .. } | Control::Checkbox { name, .. } | Control::Radio { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Capabilities the core needs from whatever renders the questionnaire.
///
/// The presentation layer feeds events back by calling the session's
/// `on_*` entry points.
pub trait PresentationPort {
    /// Current state of every control.
    fn read_answers(&self) -> Vec<Control>;

    /// Push a stored value into the control named `field`. Returns `false`
    /// when no such control exists.
    fn write_answer(&mut self, field: &str, value: &FieldValue) -> bool;

    fn set_section_visible(&mut self, section: Section, visible: bool);

    fn set_progress(&mut self, percent: u8, filled: usize, total: usize);

    /// Create the unsaved-changes indicator. Called at most once.
    fn create_warning(&mut self, text: &str);

    fn set_warning_visible(&mut self, visible: bool);

    fn notify(&mut self, message: &str, severity: Severity);
}
