pub mod cascade;
pub mod exam;
pub mod lookup;
