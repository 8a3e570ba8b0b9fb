//! Exam scoring.
//!
//! A question is worth its full grade when every correct choice was selected.
//! Selecting incorrect choices in addition does not cost anything, and a question
//! with no correct choice is scored by any selection, including an empty one.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Correct-choice counts for one question.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CorrectTally {
    /// Choices of the question marked correct.
    pub correct_total: u64,
    /// Selected identifiers naming a correct choice of the question.
    pub correct_selected: u64,
}

impl CorrectTally {
    /// Count correct choices of a question, given as `(choice_id, is_correct)` pairs.
    ///
    /// Repeated identifiers in `selected` count once.
    pub fn count<I>(choices: I, selected: &HashSet<i32>) -> Self
    where
        I: IntoIterator<Item = (i32, bool)>,
    {
        choices
            .into_iter()
            .filter(|&(_, is_correct)| is_correct)
            .fold(Self::default(), |mut tally, (id, _)| {
                tally.correct_total += 1;
                if selected.contains(&id) {
                    tally.correct_selected += 1;
                }
                tally
            })
    }

    pub fn is_full_credit(&self) -> bool {
        self.correct_total == self.correct_selected
    }
}

/// Whether `selected_ids` earns full credit on a question with the given choices.
pub fn is_get_score<I>(choices: I, selected_ids: &[i32]) -> bool
where
    I: IntoIterator<Item = (i32, bool)>,
{
    let selected: HashSet<i32> = selected_ids.iter().copied().collect();
    CorrectTally::count(choices, &selected).is_full_credit()
}

/// Grading outcome for one question of an exam.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QuestionOutcome {
    #[schema(example = 1)]
    pub question_id: i32,
    /// Points the question is worth.
    #[schema(example = 50)]
    pub grade: i32,
    /// Choices selected for this question.
    pub selected_choice_ids: Vec<i32>,
    /// True when the full grade was awarded.
    pub is_get_score: bool,
}

/// Aggregate grading outcome for a submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExamResult {
    pub questions: Vec<QuestionOutcome>,
    /// Sum of grades of fully scored questions.
    #[schema(example = 50)]
    pub score: i64,
    /// Sum of grades of all questions.
    #[schema(example = 100)]
    pub possible: i64,
}

impl ExamResult {
    pub fn from_outcomes(questions: Vec<QuestionOutcome>) -> Self {
        let possible = questions.iter().map(|q| i64::from(q.grade)).sum();
        let score = questions
            .iter()
            .filter(|q| q.is_get_score)
            .map(|q| i64::from(q.grade))
            .sum();
        Self {
            questions,
            score,
            possible,
        }
    }
}
