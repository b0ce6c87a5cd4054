use std::io::{self, BufRead, Write};

use component_questionnaire::{
    AnswerTransport, InputEvent, Notifier, QuestionnaireForm, SubmitOutcome,
};
use questionnaire_spec::{
    FileHandle, FormView, Question, QuestionType, render::RATING_MAX, render_text,
};

/// Controls which bits of state the session prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: the visible page only.
    Clean,
    /// Verbose output: submit phase, progress, command help.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Prints pages and submit results.
pub struct Presenter {
    verbosity: Verbosity,
    help_printed: bool,
}

impl Presenter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            help_printed: false,
        }
    }

    pub fn show_help(&mut self) {
        if self.help_printed {
            return;
        }
        println!("Type an answer, or one of {}", COMMANDS);
        println!("Start an answer with :: to begin it with a colon.");
        self.help_printed = true;
    }

    pub fn show_page(&self, view: &FormView, form: &QuestionnaireForm) {
        println!();
        println!("{}", render_text(view));
        if self.verbosity.is_verbose() {
            let answered = form
                .state()
                .answers()
                .iter()
                .filter(|answer| answer.is_some())
                .count();
            println!(
                "Status: {} ({}/{} answered)",
                form.state().phase().as_str(),
                answered,
                form.page_count()
            );
        }
    }

    pub fn show_hint(&self, question: &Question) {
        if let Some(hint) = input_hint(question) {
            println!("{}", hint);
        }
    }

    pub fn show_parse_error(&self, error: &AnswerParseError) {
        eprintln!("Invalid answer: {}", error.user_message);
        if let Some(debug) = &error.debug_message {
            eprintln!("  Expected: {}", debug);
        }
    }

    pub fn show_outcome(&self, outcome: &SubmitOutcome) {
        match outcome {
            SubmitOutcome::Accepted => println!("Submitted."),
            SubmitOutcome::Rejected { detail } => {
                println!("Submission failed:");
                for entry in detail {
                    println!(" - {}", entry);
                }
            }
            SubmitOutcome::Blocked { missing_required } => {
                let ids = missing_required
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                println!(
                    "Submit is disabled until required questions are answered: {}",
                    ids
                );
            }
            SubmitOutcome::InFlight => println!("A submission is already in progress."),
        }
    }
}

/// Alerts on the terminal and waits for Enter.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn alert(&self, message: &str) {
        println!("!! {}", message);
        print!("[press Enter] ");
        io::stdout().flush().ok();
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).ok();
    }
}

const COMMANDS: &str = ":page N, :next, :prev, :clear, :submit, :quit";

/// One line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Page(usize),
    Next,
    Previous,
    Clear,
    Submit,
    Quit,
    Answer(String),
}

impl SessionCommand {
    /// Lines starting with `:` are commands and `::` escapes a leading colon.
    /// Anything else is an answer, kept as typed minus the line ending.
    pub fn parse(line: &str) -> Result<Self, AnswerParseError> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        let Some(command) = line.trim_start().strip_prefix(':') else {
            return Ok(SessionCommand::Answer(line.to_string()));
        };
        if command.starts_with(':') {
            return Ok(SessionCommand::Answer(command.to_string()));
        }

        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("page"), Some(page)) => parse_page(page),
            (Some("next"), None) => Ok(SessionCommand::Next),
            (Some("prev"), None) => Ok(SessionCommand::Previous),
            (Some("clear"), None) => Ok(SessionCommand::Clear),
            (Some("submit"), None) => Ok(SessionCommand::Submit),
            (Some("quit" | "exit"), None) => Ok(SessionCommand::Quit),
            _ => Err(AnswerParseError::new(
                format!("unknown command ':{}'", command.trim()),
                Some(COMMANDS.into()),
            )),
        }
    }
}

fn parse_page(page: &str) -> Result<SessionCommand, AnswerParseError> {
    match page.parse() {
        Ok(page) => Ok(SessionCommand::Page(page)),
        Err(_) => Err(AnswerParseError::new(
            format!("'{}' is not a page number", page),
            Some(":page N with N starting at 1".into()),
        )),
    }
}

/// Drive `form` from stdin until the user quits or input ends.
pub async fn run_session(
    form: &mut QuestionnaireForm,
    transport: &dyn AnswerTransport,
    presenter: &mut Presenter,
) -> io::Result<()> {
    let notifier = TerminalNotifier;
    presenter.show_help();

    loop {
        presenter.show_page(&form.render(), form);
        presenter.show_hint(form.current_question());
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            log::debug!("input closed; leaving session");
            return Ok(());
        }

        let command = match SessionCommand::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                presenter.show_parse_error(&err);
                continue;
            }
        };

        let index = form.state().current_index();
        match command {
            SessionCommand::Quit => return Ok(()),
            SessionCommand::Page(page) => go_to(form, page),
            SessionCommand::Next => go_to(form, index + 2),
            SessionCommand::Previous => go_to(form, index),
            SessionCommand::Clear => {
                form.record(None);
            }
            SessionCommand::Submit => {
                let outcome = form.submit(transport, &notifier).await;
                presenter.show_outcome(&outcome);
            }
            SessionCommand::Answer(raw) => match parse_input(form.current_question(), &raw) {
                Ok(event) => {
                    form.handle_input(event);
                }
                Err(err) => presenter.show_parse_error(&err),
            },
        }
    }
}

fn go_to(form: &mut QuestionnaireForm, page: usize) {
    if let Err(err) = form.select_page(page) {
        eprintln!("{}", err);
    }
}

/// Turn typed text into the event the question's control would report.
///
/// Text answers are taken verbatim; the other controls ignore surrounding spaces.
pub fn parse_input(question: &Question, raw: &str) -> Result<InputEvent, AnswerParseError> {
    let trimmed = raw.trim();
    match question.kind {
        QuestionType::Text => Ok(InputEvent::TextChanged(raw.to_string())),
        QuestionType::Dropdown | QuestionType::Radio => parse_choice(question, trimmed),
        QuestionType::File => parse_file(trimmed),
        QuestionType::Rating => parse_rating(trimmed),
    }
}

fn parse_choice(question: &Question, raw: &str) -> Result<InputEvent, AnswerParseError> {
    let by_position = raw
        .parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
        .and_then(|index| question.options.get(index));
    let chosen = question
        .option(raw)
        .or_else(|| {
            question
                .options
                .iter()
                .find(|option| option.label.eq_ignore_ascii_case(raw))
        })
        .or(by_position);

    match chosen {
        Some(option) => Ok(InputEvent::OptionSelected(option.value.clone())),
        None => Err(AnswerParseError::new(
            format!("'{}' is not one of the choices", raw),
            Some(
                question
                    .options
                    .iter()
                    .map(|option| option.value.as_str())
                    .collect::<Vec<_>>()
                    .join("/"),
            ),
        )),
    }
}

fn parse_file(raw: &str) -> Result<InputEvent, AnswerParseError> {
    let handle = match FileHandle::from_path(raw) {
        Ok(handle) => handle,
        Err(err) => {
            return Err(AnswerParseError::new(
                format!("cannot use '{}': {}", raw, err),
                None,
            ));
        }
    };
    if !handle.is_image() {
        return Err(AnswerParseError::new(
            format!("'{}' is not an image", handle.name),
            Some("a path to a png, jpg, gif, webp, bmp, or svg file".into()),
        ));
    }
    Ok(InputEvent::FilesSelected(vec![handle]))
}

fn parse_rating(raw: &str) -> Result<InputEvent, AnswerParseError> {
    match raw.parse::<u8>() {
        Ok(value) if (1..=RATING_MAX).contains(&value) => {
            Ok(InputEvent::RatingChanged(Some(value)))
        }
        _ => Err(AnswerParseError::new(
            format!("'{}' is not a rating", raw),
            Some(format!("a whole number from 1 to {}", RATING_MAX)),
        )),
    }
}

fn input_hint(question: &Question) -> Option<String> {
    match question.kind {
        QuestionType::Text => None,
        QuestionType::Dropdown | QuestionType::Radio => Some(format!(
            "(choose by number or value: {})",
            question
                .options
                .iter()
                .map(|option| option.value.as_str())
                .collect::<Vec<_>>()
                .join("/")
        )),
        QuestionType::File => Some("(path to an image file)".to_string()),
        QuestionType::Rating => Some(format!("(1-{})", RATING_MAX)),
    }
}

/// Error produced when parsing input from the user.
#[derive(Debug)]
pub struct AnswerParseError {
    pub user_message: String,
    pub debug_message: Option<String>,
}

impl AnswerParseError {
    pub fn new(user_message: impl Into<String>, debug_message: Option<String>) -> Self {
        Self {
            user_message: user_message.into(),
            debug_message,
        }
    }
}
