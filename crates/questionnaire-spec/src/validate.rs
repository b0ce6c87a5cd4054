use crate::answers::{Answer, ValidationResult};
use crate::spec::question::Question;

/// True when every required question has a recorded answer.
///
/// Slots are matched to questions by position. `Questionnaire` guarantees
/// that position and `id - 1` agree.
pub fn is_form_valid(questions: &[Question], answers: &[Option<Answer>]) -> bool {
    questions
        .iter()
        .enumerate()
        .all(|(index, question)| !question.required || is_answered(answers, index))
}

/// Same verdict as [`is_form_valid`], naming the unanswered required questions.
pub fn validate(questions: &[Question], answers: &[Option<Answer>]) -> ValidationResult {
    let missing_required: Vec<u32> = questions
        .iter()
        .enumerate()
        .filter(|(index, question)| question.required && !is_answered(answers, *index))
        .map(|(_, question)| question.id)
        .collect();

    ValidationResult {
        valid: missing_required.is_empty(),
        missing_required,
    }
}

fn is_answered(answers: &[Option<Answer>], index: usize) -> bool {
    matches!(answers.get(index), Some(Some(_)))
}
