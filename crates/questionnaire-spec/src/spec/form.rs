use std::collections::BTreeSet;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spec::question::Question;

/// Reasons a question list is refused at load time.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("failed to parse questions: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("a questionnaire needs at least one question")]
    Empty,
    #[error("question at position {position} has id {found}, expected {expected}")]
    IdMismatch {
        position: usize,
        expected: u32,
        found: u32,
    },
    #[error("question {id} is a choice question without options")]
    MissingOptions { id: u32 },
    #[error("question {id} lists option value '{value}' more than once")]
    DuplicateOption { id: u32, value: String },
}

/// Checked, non-empty question list whose ids match their 1-based positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Question>", into = "Vec<Question>")]
pub struct Questionnaire {
    questions: Vec<Question>,
}

impl Questionnaire {
    pub fn new(questions: Vec<Question>) -> Result<Self, SpecError> {
        if questions.is_empty() {
            return Err(SpecError::Empty);
        }

        for (position, question) in questions.iter().enumerate() {
            let expected = position as u32 + 1;
            if question.id != expected {
                return Err(SpecError::IdMismatch {
                    position,
                    expected,
                    found: question.id,
                });
            }

            if question.kind.uses_options() {
                if question.options.is_empty() {
                    return Err(SpecError::MissingOptions { id: question.id });
                }
                let mut seen = BTreeSet::new();
                for option in &question.options {
                    if !seen.insert(option.value.as_str()) {
                        return Err(SpecError::DuplicateOption {
                            id: question.id,
                            value: option.value.clone(),
                        });
                    }
                }
            }
        }

        log::debug!("loaded questionnaire with {} questions", questions.len());
        Ok(Self { questions })
    }

    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        let questions: Vec<Question> = serde_json::from_str(json).map_err(SpecError::Parse)?;
        Self::new(questions)
    }
}

impl Deref for Questionnaire {
    type Target = [Question];

    fn deref(&self) -> &Self::Target {
        &self.questions
    }
}

impl TryFrom<Vec<Question>> for Questionnaire {
    type Error = SpecError;

    fn try_from(questions: Vec<Question>) -> Result<Self, Self::Error> {
        Self::new(questions)
    }
}

impl From<Questionnaire> for Vec<Question> {
    fn from(questionnaire: Questionnaire) -> Self {
        questionnaire.questions
    }
}
