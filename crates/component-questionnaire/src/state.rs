use questionnaire_spec::{Answer, Question, is_form_valid};

/// Where the form is in its submit cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed { detail: Vec<String> },
}

impl SubmissionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionPhase::Idle => "idle",
            SubmissionPhase::Validating => "validating",
            SubmissionPhase::Submitting => "submitting",
            SubmissionPhase::Succeeded => "succeeded",
            SubmissionPhase::Failed { .. } => "failed",
        }
    }
}

/// Per-form state store. Lives as long as the form that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub(crate) current_index: usize,
    pub(crate) answers: Vec<Option<Answer>>,
    pub(crate) is_valid: bool,
    pub(crate) phase: SubmissionPhase,
}

impl FormState {
    /// Fresh state with every slot unanswered.
    pub fn new(questions: &[Question]) -> Self {
        let answers = vec![None; questions.len()];
        let is_valid = is_form_valid(questions, &answers);
        Self {
            current_index: 0,
            answers,
            is_valid,
            phase: SubmissionPhase::Idle,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn answers(&self) -> &[Option<Answer>] {
        &self.answers
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn phase(&self) -> &SubmissionPhase {
        &self.phase
    }

    pub fn has_error(&self) -> bool {
        matches!(self.phase, SubmissionPhase::Failed { .. })
    }

    pub fn error_detail(&self) -> Option<&[String]> {
        match &self.phase {
            SubmissionPhase::Failed { detail } => Some(detail),
            _ => None,
        }
    }
}
