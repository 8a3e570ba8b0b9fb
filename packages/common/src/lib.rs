pub mod choices;
pub mod grading;

pub use choices::{EnrollmentMode, Occupation, ParseChoiceError};
pub use grading::{CorrectTally, ExamResult, QuestionOutcome, is_get_score};
