pub mod completion;
pub mod cycle;
pub mod due;
pub mod equipment;
pub mod equipment_status;
pub mod schedule_entry;
