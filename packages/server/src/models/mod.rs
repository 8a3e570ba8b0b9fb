pub mod assessment;
pub mod course;
pub mod enrollment;
pub mod identity;
pub mod lesson;
pub mod roster;
pub mod shared;
pub mod submission;
