use questionnaire_spec::{
    Answer, FileHandle, FormView, Question, Questionnaire, RenderContext, is_form_valid,
    render_form, validate,
};
use serde_json::Value;
use thiserror::Error;

use crate::notify::{FAILURE_NOTICE, Notifier, SUCCESS_NOTICE};
use crate::state::{FormState, SubmissionPhase};
use crate::transport::{AnswerTransport, SubmissionPayload, TransportError, TransportResponse};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("page {page} is outside 1..={count}")]
    PageOutOfRange { page: usize, count: usize },
}

/// Raw value reported by whichever control is active.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    TextChanged(String),
    OptionSelected(String),
    /// Files chosen in the picker; only the first one is kept.
    FilesSelected(Vec<FileHandle>),
    /// `None` clears the rating.
    RatingChanged(Option<u8>),
}

/// Result of one submit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The endpoint answered 200.
    Accepted,
    /// The endpoint refused the answers or could not be reached.
    Rejected { detail: Vec<String> },
    /// Required questions are unanswered; nothing was sent.
    Blocked { missing_required: Vec<u32> },
    /// A previous submission is still outstanding; nothing was sent.
    InFlight,
}

/// A questionnaire together with the state of one user filling it in.
#[derive(Debug, Clone)]
pub struct QuestionnaireForm {
    questions: Questionnaire,
    state: FormState,
}

impl QuestionnaireForm {
    pub fn new(questions: Questionnaire) -> Self {
        let state = FormState::new(&questions);
        Self { questions, state }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.state.current_index]
    }

    pub fn page_count(&self) -> usize {
        self.questions.len()
    }

    /// Show the question on 1-based `page`.
    pub fn select_page(&mut self, page: usize) -> Result<(), NavigationError> {
        let count = self.page_count();
        if page == 0 || page > count {
            return Err(NavigationError::PageOutOfRange { page, count });
        }
        self.state.current_index = page - 1;
        log::debug!("showing question {} of {}", page, count);
        Ok(())
    }

    /// Store `answer` for the visible question and return the new validity.
    pub fn record(&mut self, answer: Option<Answer>) -> bool {
        let mut answers = self.state.answers.clone();
        answers[self.state.current_index] = answer;
        self.state.is_valid = is_form_valid(&self.questions, &answers);
        self.state.answers = answers;
        self.state.is_valid
    }

    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::TextChanged(text) | InputEvent::OptionSelected(text) => {
                self.record(Some(Answer::Text(text)))
            }
            InputEvent::FilesSelected(files) => match files.into_iter().next() {
                Some(file) => self.record(Some(Answer::File(file))),
                None => self.state.is_valid,
            },
            InputEvent::RatingChanged(value) => self.record(value.map(Answer::Rating)),
        }
    }

    pub fn submit_disabled(&self) -> bool {
        !self.state.is_valid
    }

    pub fn render(&self) -> FormView {
        let ctx = RenderContext {
            current_index: self.state.current_index,
            answers: &self.state.answers,
            is_valid: self.state.is_valid,
            submitting: self.state.phase == SubmissionPhase::Submitting,
            error_details: self.state.error_detail(),
        };
        render_form(&self.questions, &ctx)
    }

    pub fn payload(&self) -> SubmissionPayload {
        SubmissionPayload {
            answers: self.state.answers.clone(),
        }
    }

    /// Gate a submission. On success the form is `Submitting` and the caller
    /// must deliver the payload and hand the result to [`finish_submit`].
    ///
    /// [`finish_submit`]: QuestionnaireForm::finish_submit
    pub fn begin_submit(&mut self) -> Result<SubmissionPayload, SubmitOutcome> {
        if self.state.phase == SubmissionPhase::Submitting {
            log::debug!("submit ignored: a submission is already in flight");
            return Err(SubmitOutcome::InFlight);
        }

        let previous = std::mem::replace(&mut self.state.phase, SubmissionPhase::Validating);
        let validation = validate(&self.questions, &self.state.answers);
        if !validation.valid {
            self.state.phase = previous;
            log::debug!(
                "submit blocked: required questions {:?} are unanswered",
                validation.missing_required
            );
            return Err(SubmitOutcome::Blocked {
                missing_required: validation.missing_required,
            });
        }

        self.state.phase = SubmissionPhase::Submitting;
        log::info!("submitting {} answers", self.state.answers.len());
        Ok(self.payload())
    }

    /// Settle the in-flight submission and tell the user how it went.
    pub fn finish_submit(
        &mut self,
        result: Result<TransportResponse, TransportError>,
        notifier: &dyn Notifier,
    ) -> SubmitOutcome {
        if self.state.phase != SubmissionPhase::Submitting {
            log::warn!(
                "settling a submission while the form is {}",
                self.state.phase.as_str()
            );
        }

        match result {
            Ok(response) if response.status == 200 => {
                self.state.phase = SubmissionPhase::Succeeded;
                log::info!("answers accepted");
                notifier.alert(SUCCESS_NOTICE);
                notifier.alert(&self.answers_json());
                SubmitOutcome::Accepted
            }
            Ok(response) => {
                log::warn!("answers rejected with status {}", response.status);
                self.fail(failure_detail(response.status, &response.body), notifier)
            }
            Err(err) => {
                log::warn!("answers could not be delivered: {}", err);
                self.fail(vec![err.to_string()], notifier)
            }
        }
    }

    /// Give up on the in-flight submission without notifying anyone.
    ///
    /// For hosts driving [`begin_submit`] themselves whose request will never
    /// settle. Returns `false` when nothing was in flight.
    ///
    /// [`begin_submit`]: QuestionnaireForm::begin_submit
    pub fn abort_submit(&mut self) -> bool {
        if self.state.phase != SubmissionPhase::Submitting {
            return false;
        }
        log::info!("submission abandoned");
        self.state.phase = SubmissionPhase::Idle;
        true
    }

    /// Validate, post once, and settle.
    ///
    /// Dropping the returned future before the endpoint answers puts the form
    /// back in the phase it had before the call.
    pub async fn submit(
        &mut self,
        transport: &dyn AnswerTransport,
        notifier: &dyn Notifier,
    ) -> SubmitOutcome {
        let previous = self.state.phase.clone();
        let payload = match self.begin_submit() {
            Ok(payload) => payload,
            Err(outcome) => return outcome,
        };
        let pending = PendingSubmit {
            form: self,
            previous: Some(previous),
        };
        let result = transport.post_answers(&payload).await;
        pending.settle(result, notifier)
    }

    fn fail(&mut self, detail: Vec<String>, notifier: &dyn Notifier) -> SubmitOutcome {
        self.state.phase = SubmissionPhase::Failed {
            detail: detail.clone(),
        };
        notifier.alert(FAILURE_NOTICE);
        SubmitOutcome::Rejected { detail }
    }

    fn answers_json(&self) -> String {
        serde_json::to_string_pretty(&self.state.answers)
            .unwrap_or_else(|err| format!("<answers unavailable: {}>", err))
    }
}

/// A submission between `begin_submit` and `finish_submit`.
///
/// Restores the earlier phase if dropped without being settled.
struct PendingSubmit<'a> {
    form: &'a mut QuestionnaireForm,
    previous: Option<SubmissionPhase>,
}

impl PendingSubmit<'_> {
    fn settle(
        mut self,
        result: Result<TransportResponse, TransportError>,
        notifier: &dyn Notifier,
    ) -> SubmitOutcome {
        self.previous = None;
        self.form.finish_submit(result, notifier)
    }
}

impl Drop for PendingSubmit<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            log::warn!("submission dropped before the endpoint answered");
            self.form.state.phase = previous;
        }
    }
}

/// Turn a failure body into displayable entries.
fn failure_detail(status: u16, body: &str) -> Vec<String> {
    let trimmed = body.trim();
    let entries: Vec<String> = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(items)) => items.iter().map(value_to_display).collect(),
        Ok(Value::Object(map)) => map
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value_to_display(value)))
            .collect(),
        Ok(Value::String(text)) => vec![text],
        _ => vec![trimmed.to_string()],
    };

    if entries.iter().all(|entry| entry.trim().is_empty()) {
        vec![format!("request failed with status {}", status)]
    } else {
        entries
    }
}

fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
