//! Linear wizard step tracking.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A wizard step, numbered 1 through 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Step {
    UploadData = 1,
    Metadata = 2,
    UploadModel = 3,
    AnalyzeBias = 4,
    Mitigate = 5,
    Compare = 6,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::UploadData,
        Step::Metadata,
        Step::UploadModel,
        Step::AnalyzeBias,
        Step::Mitigate,
        Step::Compare,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    /// Step for a 1-based number; out-of-range numbers are clamped.
    pub fn from_number(n: u8) -> Self {
        let idx = n.clamp(1, Self::ALL.len() as u8) as usize - 1;
        Self::ALL[idx]
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::UploadData => "Upload Data",
            Self::Metadata => "Metadata",
            Self::UploadModel => "Upload Model",
            Self::AnalyzeBias => "Analyze Bias",
            Self::Mitigate => "Mitigate",
            Self::Compare => "Compare",
        }
    }

    pub fn next(self) -> Self {
        Self::from_number(self.number().saturating_add(1))
    }

    pub fn prev(self) -> Self {
        Self::from_number(self.number().saturating_sub(1))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.title())
    }
}

/// Progress-indicator state of one step relative to the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Active,
    Pending,
}

/// Population work the caller must do after entering a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryHook {
    /// Refill the metadata selectors from the uploaded columns.
    PopulateMetadata,
    /// Refill the mitigation attribute selector from the saved metadata.
    PopulateMitigation,
}

/// Tracks the current step. Moves are free in both directions; forward gating
/// is left to the controllers that call `go_to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepNavigator {
    current: Step,
}

impl Default for StepNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl StepNavigator {
    pub fn new() -> Self {
        Self {
            current: Step::UploadData,
        }
    }

    pub fn current(&self) -> Step {
        self.current
    }

    /// Move to `step` and report the entry hook it triggers, if any.
    /// The hook fires on every entry, including re-entering the current step.
    pub fn go_to(&mut self, step: Step) -> Option<EntryHook> {
        tracing::debug!(from = %self.current, to = %step, "Step change");
        self.current = step;
        match step {
            Step::Metadata => Some(EntryHook::PopulateMetadata),
            Step::Mitigate => Some(EntryHook::PopulateMitigation),
            _ => None,
        }
    }

    pub fn next(&mut self) -> Option<EntryHook> {
        self.go_to(self.current.next())
    }

    pub fn prev(&mut self) -> Option<EntryHook> {
        self.go_to(self.current.prev())
    }

    pub fn status_of(&self, step: Step) -> StepStatus {
        match step.cmp(&self.current) {
            std::cmp::Ordering::Less => StepStatus::Completed,
            std::cmp::Ordering::Equal => StepStatus::Active,
            std::cmp::Ordering::Greater => StepStatus::Pending,
        }
    }

    /// Status of every step, in order, for the progress indicator.
    pub fn progress(&self) -> Vec<(Step, StepStatus)> {
        Step::ALL.iter().map(|&s| (s, self.status_of(s))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_number_clamps() {
        assert_eq!(Step::from_number(0), Step::UploadData);
        assert_eq!(Step::from_number(4), Step::AnalyzeBias);
        assert_eq!(Step::from_number(9), Step::Compare);
    }

    #[test]
    fn test_next_prev_clamp_at_edges() {
        assert_eq!(Step::Compare.next(), Step::Compare);
        assert_eq!(Step::UploadData.prev(), Step::UploadData);
        assert_eq!(Step::Metadata.next(), Step::UploadModel);
    }

    #[test]
    fn test_entry_hooks() {
        let mut nav = StepNavigator::new();
        assert_eq!(nav.next(), Some(EntryHook::PopulateMetadata));
        assert_eq!(nav.next(), None);
        assert_eq!(nav.go_to(Step::Mitigate), Some(EntryHook::PopulateMitigation));
        assert_eq!(nav.prev(), None);
        assert_eq!(nav.current(), Step::AnalyzeBias);
    }

    #[test]
    fn test_reentering_fires_hook_again() {
        let mut nav = StepNavigator::new();
        nav.go_to(Step::Mitigate);
        assert_eq!(nav.go_to(Step::Mitigate), Some(EntryHook::PopulateMitigation));
    }

    #[test]
    fn test_progress_statuses() {
        let mut nav = StepNavigator::new();
        nav.go_to(Step::UploadModel);
        let progress = nav.progress();
        assert_eq!(progress.len(), 6);
        assert_eq!(progress[0].1, StepStatus::Completed);
        assert_eq!(progress[1].1, StepStatus::Completed);
        assert_eq!(progress[2].1, StepStatus::Active);
        assert_eq!(progress[5].1, StepStatus::Pending);
    }

    #[test]
    fn test_display() {
        assert_eq!(Step::AnalyzeBias.to_string(), "4. Analyze Bias");
    }
}
