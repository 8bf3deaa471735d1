use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DueCategory {
    NeverDone,
    Overdue,
    DueSoon,
    DueWithinMonth,
    Current,
}

impl DueCategory {
    pub fn label(&self) -> &'static str {
        match self {
            DueCategory::NeverDone => "Never done",
            DueCategory::Overdue => "Overdue",
            DueCategory::DueSoon => "Due soon",
            DueCategory::DueWithinMonth => "Due within month",
            DueCategory::Current => "Current",
        }
    }

    /// NeverDone and Overdue go ahead of everything else when capping a week.
    pub fn is_urgent(&self) -> bool {
        matches!(self, DueCategory::NeverDone | DueCategory::Overdue)
    }
}

/// Result of the due-date calculation for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DueStatus {
    pub category: DueCategory,
    /// Days from today to the effective due date; negative when overdue.
    pub days_delta: Option<i64>,
}
