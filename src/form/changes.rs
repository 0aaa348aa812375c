use crate::session::port::PresentationPort;

/// Text of the unsaved-changes reminder.
pub const EXPORT_WARNING_TEXT: &str = "Reminder: You have made changes since your last file export. \
Your progress is auto-saved locally in this session and will persist after closing, \
but it is only stored on this device. To create a backup or share with others, \
remember to export your progress to file.";

/// Dirty/clean relative to the last export or import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeState {
    #[default]
    Clean,
    Dirty,
}

/// Tracks unsaved-to-file changes and drives the warning indicator.
///
/// The indicator is created on the first transition to dirty; afterwards
/// only its visibility is toggled.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    state: ChangeState,
    indicator_created: bool,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ChangeState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == ChangeState::Dirty
    }

    pub fn mark_edited<P: PresentationPort + ?Sized>(&mut self, port: &mut P) {
        self.state = ChangeState::Dirty;
        self.render(port);
    }

    /// After a successful export or import.
    pub fn mark_clean<P: PresentationPort + ?Sized>(&mut self, port: &mut P) {
        self.state = ChangeState::Clean;
        self.render(port);
    }

    fn render<P: PresentationPort + ?Sized>(&mut self, port: &mut P) {
        match self.state {
            ChangeState::Dirty => {
                if !self.indicator_created {
                    port.create_warning(EXPORT_WARNING_TEXT);
                    self.indicator_created = true;
                }
                port.set_warning_visible(true);
            }
            ChangeState::Clean => {
                if self.indicator_created {
                    port.set_warning_visible(false);
                }
            }
        }
    }
}
