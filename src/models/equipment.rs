use super::{cycle::CycleType, equipment_status::EquipmentStatus};
use chrono::NaiveDate;
use serde::Serialize;

/// PM dates of one recurring cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleDates {
    pub enabled: bool,
    pub last: Option<NaiveDate>, // ⇔ equipment.last_<cycle>
    pub next: Option<NaiveDate>, // ⇔ equipment.next_<cycle>
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Equipment {
    pub id: String,
    pub description: String,
    pub location: String,
    pub monthly: CycleDates,
    pub six_month: CycleDates,
    pub annual: CycleDates,
    pub status: EquipmentStatus,
}

impl Equipment {
    /// New active equipment with all three cycles enabled and no history.
    pub fn new(id: &str) -> Self {
        let enabled = CycleDates {
            enabled: true,
            ..Default::default()
        };
        Self {
            id: id.trim().to_string(),
            description: String::new(),
            location: String::new(),
            monthly: enabled,
            six_month: enabled,
            annual: enabled,
            status: EquipmentStatus::Active,
        }
    }

    /// Dates of a normal cycle; `None` for pseudo-cycles.
    pub fn cycle(&self, cycle: CycleType) -> Option<&CycleDates> {
        match cycle {
            CycleType::Monthly => Some(&self.monthly),
            CycleType::SixMonth => Some(&self.six_month),
            CycleType::Annual => Some(&self.annual),
            CycleType::CannotFind | CycleType::RunToFailure => None,
        }
    }

    pub fn cycle_mut(&mut self, cycle: CycleType) -> Option<&mut CycleDates> {
        match cycle {
            CycleType::Monthly => Some(&mut self.monthly),
            CycleType::SixMonth => Some(&mut self.six_month),
            CycleType::Annual => Some(&mut self.annual),
            CycleType::CannotFind | CycleType::RunToFailure => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == EquipmentStatus::Active
    }
}
