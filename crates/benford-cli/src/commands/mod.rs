pub mod analyze;
pub mod reference;
