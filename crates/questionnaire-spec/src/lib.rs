#![allow(missing_docs)]

pub mod answers;
pub mod render;
pub mod schema;
pub mod spec;
pub mod validate;

pub use answers::{Answer, FileHandle, ValidationResult};
pub use render::{
    Control, FormView, MenuItem, Pagination, RadioButton, RenderContext, SubmitButton, render_card,
    render_form, render_json_ui, render_text,
};
pub use schema::questions_schema;
pub use spec::{ChoiceOption, Question, QuestionType, Questionnaire, SpecError};
pub use validate::{is_form_valid, validate};
