pub mod due;
pub mod offset;
