pub mod extractors;
pub mod gate;
pub mod session;
