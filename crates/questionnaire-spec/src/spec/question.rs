use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input control family for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Text,
    Dropdown,
    Radio,
    File,
    Rating,
}

impl QuestionType {
    /// Whether the type draws its values from `options`.
    pub fn uses_options(&self) -> bool {
        matches!(self, QuestionType::Dropdown | QuestionType::Radio)
    }
}

/// One selectable value of a dropdown or radio question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A single questionnaire item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Question {
    /// 1-based position of the question in its questionnaire.
    pub id: u32,
    pub question: String,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
}

impl Question {
    pub fn new(id: u32, question: impl Into<String>, kind: QuestionType) -> Self {
        Self {
            id,
            question: question.into(),
            required: false,
            kind,
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options(mut self, options: Vec<ChoiceOption>) -> Self {
        self.options = options;
        self
    }

    pub fn option(&self, value: &str) -> Option<&ChoiceOption> {
        self.options.iter().find(|option| option.value == value)
    }
}
