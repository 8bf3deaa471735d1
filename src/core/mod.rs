pub mod calculator;
pub mod catalog;
pub mod complete;
pub mod log;
pub mod validator;
pub mod weekly;
