pub mod bus;
pub mod persistence;
pub mod runtime;
pub mod status;
