/// ANSI color helper utilities for terminal output.
use crate::models::due::DueCategory;
use crate::models::equipment_status::EquipmentStatus;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

/// Overdue → red, due soon → yellow, never done → magenta, rest → plain.
pub fn color_for_due(category: DueCategory) -> &'static str {
    match category {
        DueCategory::Overdue => RED,
        DueCategory::DueSoon => YELLOW,
        DueCategory::NeverDone => MAGENTA,
        DueCategory::DueWithinMonth => CYAN,
        DueCategory::Current => RESET,
    }
}

pub fn color_for_status(status: EquipmentStatus) -> &'static str {
    match status {
        EquipmentStatus::Active => GREEN,
        EquipmentStatus::Missing => YELLOW,
        EquipmentStatus::RunToFailure => GREY,
    }
}

/// Wrap `value` in `color` unless the field is empty, which renders grey.
pub fn paint(value: &str, color: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--" {
        format!("{GREY}{value}{RESET}")
    } else {
        format!("{color}{value}{RESET}")
    }
}
