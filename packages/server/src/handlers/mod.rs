pub mod admin;
pub mod course;
pub mod enrollment;
pub mod identity;
pub mod lesson;
pub mod question;
pub mod roster;
pub mod submission;
