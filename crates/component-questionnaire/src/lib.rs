//! The questionnaire form component.
//!
//! [`QuestionnaireForm`] owns the answer state of one user, moves between
//! pages, records input, and submits the answers through an
//! [`AnswerTransport`]. Acknowledgments go through a [`Notifier`].

pub mod form;
pub mod notify;
pub mod state;
pub mod transport;

pub use form::{InputEvent, NavigationError, QuestionnaireForm, SubmitOutcome};
pub use notify::{FAILURE_NOTICE, Notifier, SUCCESS_NOTICE};
pub use state::{FormState, SubmissionPhase};
pub use transport::{
    AnswerTransport, DEFAULT_ENDPOINT, ENDPOINT_ENV, HttpTransport, SubmissionPayload, SubmitConfig,
    TransportError, TransportResponse,
};
