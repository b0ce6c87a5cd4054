pub mod form;
pub mod question;

pub use form::{Questionnaire, SpecError};
pub use question::{ChoiceOption, Question, QuestionType};
