use serde_json::{Map, Value, json};

use crate::answers::Answer;
use crate::spec::question::{Question, QuestionType};

/// Highest value offered by rating controls.
pub const RATING_MAX: u8 = 5;
/// Files accepted by the file picker.
pub const FILE_ACCEPT: &str = "image/*";
pub const FILE_BUTTON_LABEL: &str = "Upload Image";

/// Form state the renderer reads from.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub current_index: usize,
    pub answers: &'a [Option<Answer>],
    pub is_valid: bool,
    pub submitting: bool,
    pub error_details: Option<&'a [String]>,
}

/// One entry of a dropdown list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub key: String,
    pub value: String,
    pub label: String,
}

/// One button of a radio group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioButton {
    pub value: String,
    pub label: String,
    pub checked: bool,
}

/// Input control for the visible question.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    TextInput { value: String, required: bool },
    Dropdown {
        value: String,
        items: Vec<MenuItem>,
        required: bool,
    },
    /// One exclusive group per question; the stored answer decides which button is checked.
    RadioGroup {
        name: String,
        buttons: Vec<RadioButton>,
        required: bool,
    },
    FilePicker {
        accept: &'static str,
        button_label: &'static str,
        selected: Option<String>,
        required: bool,
    },
    Rating {
        value: Option<u8>,
        max: u8,
        required: bool,
    },
}

impl Control {
    pub fn kind_label(&self) -> &'static str {
        match self {
            Control::TextInput { .. } => "text_input",
            Control::Dropdown { .. } => "dropdown",
            Control::RadioGroup { .. } => "radio_group",
            Control::FilePicker { .. } => "file_picker",
            Control::Rating { .. } => "rating",
        }
    }

    pub fn required(&self) -> bool {
        match self {
            Control::TextInput { required, .. }
            | Control::Dropdown { required, .. }
            | Control::RadioGroup { required, .. }
            | Control::FilePicker { required, .. }
            | Control::Rating { required, .. } => *required,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitButton {
    pub disabled: bool,
    pub busy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page of the visible question.
    pub page: usize,
    pub count: usize,
}

/// Everything needed to draw the visible page of the form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub heading: String,
    pub question_id: u32,
    pub question: String,
    pub required: bool,
    pub control: Control,
    pub submit: SubmitButton,
    pub pagination: Pagination,
    pub error_details: Option<Vec<String>>,
}

/// Build the view for the question at `ctx.current_index`.
///
/// The index must lie within `questions`; the form component guarantees it.
pub fn render_form(questions: &[Question], ctx: &RenderContext<'_>) -> FormView {
    let question = &questions[ctx.current_index];
    let stored = ctx.answers.get(ctx.current_index).and_then(Option::as_ref);

    FormView {
        heading: format!("Question #{}", ctx.current_index + 1),
        question_id: question.id,
        question: question.question.clone(),
        required: question.required,
        control: build_control(question, stored),
        submit: SubmitButton {
            disabled: !ctx.is_valid,
            busy: ctx.submitting,
        },
        pagination: Pagination {
            page: ctx.current_index + 1,
            count: questions.len(),
        },
        error_details: ctx.error_details.map(<[String]>::to_vec),
    }
}

fn build_control(question: &Question, stored: Option<&Answer>) -> Control {
    let required = question.required;
    match question.kind {
        QuestionType::Text => Control::TextInput {
            value: stored.map(Answer::display).unwrap_or_default(),
            required,
        },
        QuestionType::Dropdown => Control::Dropdown {
            value: stored.map(Answer::display).unwrap_or_default(),
            items: question
                .options
                .iter()
                .map(|option| MenuItem {
                    key: option.value.clone(),
                    value: option.value.clone(),
                    label: option.label.clone(),
                })
                .collect(),
            required,
        },
        QuestionType::Radio => {
            let selected = stored.and_then(Answer::as_text);
            Control::RadioGroup {
                name: format!("question-{}", question.id),
                buttons: question
                    .options
                    .iter()
                    .map(|option| RadioButton {
                        value: option.value.clone(),
                        label: option.label.clone(),
                        checked: selected == Some(option.value.as_str()),
                    })
                    .collect(),
                required,
            }
        }
        QuestionType::File => Control::FilePicker {
            accept: FILE_ACCEPT,
            button_label: FILE_BUTTON_LABEL,
            selected: stored.map(Answer::display),
            required,
        },
        QuestionType::Rating => Control::Rating {
            value: stored.and_then(Answer::as_rating),
            max: RATING_MAX,
            required,
        },
    }
}

/// Render the view as a structured JSON value.
pub fn render_json_ui(view: &FormView) -> Value {
    json!({
        "heading": view.heading,
        "question_id": view.question_id,
        "question": view.question,
        "required": view.required,
        "control": control_json(&view.control),
        "submit": {
            "disabled": view.submit.disabled,
            "busy": view.submit.busy,
        },
        "pagination": {
            "page": view.pagination.page,
            "count": view.pagination.count,
        },
        "error_details": view.error_details,
    })
}

fn control_json(control: &Control) -> Value {
    let mut map = Map::new();
    map.insert("type".into(), Value::String(control.kind_label().into()));
    map.insert("required".into(), Value::Bool(control.required()));
    match control {
        Control::TextInput { value, .. } => {
            map.insert("value".into(), Value::String(value.clone()));
        }
        Control::Dropdown { value, items, .. } => {
            map.insert("value".into(), Value::String(value.clone()));
            map.insert(
                "items".into(),
                Value::Array(
                    items
                        .iter()
                        .map(|item| {
                            json!({
                                "key": item.key,
                                "value": item.value,
                                "label": item.label,
                            })
                        })
                        .collect(),
                ),
            );
        }
        Control::RadioGroup { name, buttons, .. } => {
            map.insert("name".into(), Value::String(name.clone()));
            map.insert(
                "buttons".into(),
                Value::Array(
                    buttons
                        .iter()
                        .map(|button| {
                            json!({
                                "value": button.value,
                                "label": button.label,
                                "checked": button.checked,
                            })
                        })
                        .collect(),
                ),
            );
        }
        Control::FilePicker {
            accept,
            button_label,
            selected,
            ..
        } => {
            map.insert("accept".into(), Value::String((*accept).into()));
            map.insert("button_label".into(), Value::String((*button_label).into()));
            map.insert(
                "selected".into(),
                selected.clone().map(Value::String).unwrap_or(Value::Null),
            );
        }
        Control::Rating { value, max, .. } => {
            map.insert(
                "value".into(),
                value.map(Value::from).unwrap_or(Value::Null),
            );
            map.insert("max".into(), Value::from(*max));
        }
    }
    Value::Object(map)
}

/// Render the view as human-friendly text.
pub fn render_text(view: &FormView) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} ({}/{})",
        view.heading, view.pagination.page, view.pagination.count
    ));

    let mut title = view.question.clone();
    if view.required {
        title.push_str(" *");
    }
    lines.push(title);

    match &view.control {
        Control::TextInput { value, .. } => {
            lines.push(format!("  [text] {}", value));
        }
        Control::Dropdown { value, items, .. } => {
            for (position, item) in items.iter().enumerate() {
                let marker = if &item.value == value { ">" } else { " " };
                let number = position + 1;
                lines.push(format!(
                    " {} {}. {} ({})",
                    marker, number, item.label, item.value
                ));
            }
        }
        Control::RadioGroup { buttons, .. } => {
            for (position, button) in buttons.iter().enumerate() {
                let marker = if button.checked { "(x)" } else { "( )" };
                lines.push(format!("  {} {}. {}", marker, position + 1, button.label));
            }
        }
        Control::FilePicker {
            accept,
            button_label,
            selected,
            ..
        } => {
            lines.push(format!("  [{}] accepts {}", button_label, accept));
            if let Some(name) = selected {
                lines.push(format!("  Selected: {}", name));
            }
        }
        Control::Rating { value, max, .. } => {
            let filled = value.unwrap_or(0).min(*max) as usize;
            lines.push(format!(
                "  {}{} ({}/{})",
                "★".repeat(filled),
                "☆".repeat(*max as usize - filled),
                filled,
                max
            ));
        }
    }

    let submit = if view.submit.busy {
        "submitting"
    } else if view.submit.disabled {
        "disabled"
    } else {
        "enabled"
    };
    lines.push(format!("Submit: {}", submit));

    if let Some(details) = &view.error_details {
        lines.push("Errors:".to_string());
        for detail in details {
            lines.push(format!(" - {}", detail));
        }
    }

    lines.join("\n")
}

/// Render the view as an Adaptive Card v1.3 transport.
pub fn render_card(view: &FormView) -> Value {
    let mut body = Vec::new();

    body.push(json!({
        "type": "TextBlock",
        "text": view.heading,
        "weight": "Bolder",
        "size": "Large",
        "wrap": true,
    }));

    let title = if view.required {
        format!("{} *", view.question)
    } else {
        view.question.clone()
    };
    body.push(json!({
        "type": "TextBlock",
        "text": title,
        "wrap": true,
    }));
    body.push(card_input(view.question_id, &view.control));

    body.push(json!({
        "type": "FactSet",
        "facts": [
            { "title": "Page", "value": view.pagination.page.to_string() },
            { "title": "Total", "value": view.pagination.count.to_string() }
        ]
    }));

    if let Some(details) = &view.error_details {
        for detail in details {
            body.push(json!({
                "type": "TextBlock",
                "text": detail,
                "color": "Attention",
                "wrap": true,
            }));
        }
    }

    let mut actions = Vec::new();
    if view.pagination.page > 1 {
        actions.push(page_action("Previous", view.pagination.page - 1));
    }
    if view.pagination.page < view.pagination.count {
        actions.push(page_action("Next", view.pagination.page + 1));
    }
    if !view.submit.disabled && !view.submit.busy {
        actions.push(json!({
            "type": "Action.Submit",
            "title": "Submit",
            "data": { "questionnaire": { "action": "submit" } }
        }));
    }

    json!({
        "$schema": "http://adaptivecards.io/schemas/adaptive-card.json",
        "type": "AdaptiveCard",
        "version": "1.3",
        "body": body,
        "actions": actions,
    })
}

fn page_action(title: &str, page: usize) -> Value {
    json!({
        "type": "Action.Submit",
        "title": title,
        "data": { "questionnaire": { "action": "page", "page": page } }
    })
}

fn card_input(question_id: u32, control: &Control) -> Value {
    let id = format!("q{}", question_id);
    match control {
        Control::TextInput { value, required } => json!({
            "type": "Input.Text",
            "id": id,
            "isRequired": required,
            "value": value,
        }),
        Control::Dropdown {
            value,
            items,
            required,
        } => json!({
            "type": "Input.ChoiceSet",
            "id": id,
            "style": "compact",
            "isRequired": required,
            "value": value,
            "choices": items
                .iter()
                .map(|item| json!({ "title": item.label, "value": item.value }))
                .collect::<Vec<_>>(),
        }),
        Control::RadioGroup {
            buttons,
            required,
            ..
        } => {
            let mut map = Map::new();
            map.insert("type".into(), Value::String("Input.ChoiceSet".into()));
            map.insert("id".into(), Value::String(id));
            map.insert("style".into(), Value::String("expanded".into()));
            map.insert("isRequired".into(), Value::Bool(*required));
            map.insert(
                "choices".into(),
                Value::Array(
                    buttons
                        .iter()
                        .map(|button| json!({ "title": button.label, "value": button.value }))
                        .collect(),
                ),
            );
            if let Some(checked) = buttons.iter().find(|button| button.checked) {
                map.insert("value".into(), Value::String(checked.value.clone()));
            }
            Value::Object(map)
        }
        Control::FilePicker {
            button_label,
            selected,
            ..
        } => json!({
            "type": "TextBlock",
            "text": match selected {
                Some(name) => format!("{}: {}", button_label, name),
                None => format!("{}: no file selected", button_label),
            },
            "wrap": true,
        }),
        Control::Rating {
            value,
            max,
            required,
        } => {
            let mut map = Map::new();
            map.insert("type".into(), Value::String("Input.Number".into()));
            map.insert("id".into(), Value::String(id));
            map.insert("min".into(), Value::from(1));
            map.insert("max".into(), Value::from(*max));
            map.insert("isRequired".into(), Value::Bool(*required));
            if let Some(value) = value {
                map.insert("value".into(), Value::from(*value));
            }
            Value::Object(map)
        }
    }
}
