mod session;

use clap::{Parser, Subcommand, ValueEnum};
use component_questionnaire::{HttpTransport, QuestionnaireForm, SubmitConfig};
use questionnaire_spec::{
    Answer, Questionnaire, ValidationResult, questions_schema, render_card, render_json_ui,
    render_text, validate,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use session::{Presenter, Verbosity, run_session};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Questionnaire form runner",
    long_about = "Fills in, renders, and validates paginated questionnaires and submits the answers to a remote endpoint"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RenderMode {
    Text,
    Card,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Fill in a questionnaire interactively and submit it.
    Run {
        /// Path to the questions JSON.
        #[arg(long, value_name = "QUESTIONS")]
        questions: PathBuf,
        /// Endpoint receiving the answers (default: QUESTIONNAIRE_ENDPOINT, then the built-in URL).
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,
        /// Show submit phase and progress after each page.
        #[arg(long)]
        verbose: bool,
    },
    /// Render one page of a questionnaire.
    Render {
        /// Path to the questions JSON.
        #[arg(long, value_name = "QUESTIONS")]
        questions: PathBuf,
        /// Optional answers JSON (an array, or an object with an `answers` array).
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
        /// 1-based page to render.
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Output format.
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
    },
    /// Check answers against the required questions.
    Validate {
        /// Path to the questions JSON.
        #[arg(long, value_name = "QUESTIONS")]
        questions: PathBuf,
        /// Path to the answers JSON.
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
    },
    /// Print the JSON Schema of the questions file.
    Schema,
}

#[tokio::main]
async fn main() -> CliResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            questions,
            endpoint,
            verbose,
        } => run_form(questions, endpoint, verbose).await,
        Command::Render {
            questions,
            answers,
            page,
            format,
        } => run_render(questions, answers, page, format),
        Command::Validate { questions, answers } => run_validate(questions, answers),
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&questions_schema())?);
            Ok(())
        }
    }
}

async fn run_form(
    questions_path: PathBuf,
    endpoint: Option<String>,
    verbose: bool,
) -> CliResult<()> {
    let questions = load_questionnaire(&questions_path)?;
    let config = SubmitConfig::resolve(endpoint);
    let transport = HttpTransport::new(&config)?;
    log::info!(
        "running {} questions against {}",
        questions.len(),
        transport.endpoint()
    );

    let mut form = QuestionnaireForm::new(questions);
    let mut presenter = Presenter::new(Verbosity::from_verbose(verbose));
    run_session(&mut form, &transport, &mut presenter).await?;
    Ok(())
}

fn run_render(
    questions_path: PathBuf,
    answers_path: Option<PathBuf>,
    page: usize,
    format: RenderMode,
) -> CliResult<()> {
    let questions = load_questionnaire(&questions_path)?;
    let answers = match answers_path {
        Some(path) => load_answers(&path, questions.len())?,
        None => vec![None; questions.len()],
    };

    let mut form = QuestionnaireForm::new(questions);
    for (index, answer) in answers.into_iter().enumerate() {
        form.select_page(index + 1)?;
        form.record(answer);
    }
    form.select_page(page)?;

    let view = form.render();
    match format {
        RenderMode::Text => println!("{}", render_text(&view)),
        RenderMode::Json => println!("{}", serde_json::to_string_pretty(&render_json_ui(&view))?),
        RenderMode::Card => println!("{}", serde_json::to_string_pretty(&render_card(&view))?),
    }
    Ok(())
}

fn run_validate(questions_path: PathBuf, answers_path: PathBuf) -> CliResult<()> {
    let questions = load_questionnaire(&questions_path)?;
    let answers = load_answers(&answers_path, questions.len())?;

    let result = validate(&questions, &answers);
    println!(
        "Validation result: {}",
        if result.valid { "valid" } else { "invalid" }
    );
    describe_validation(&result);

    if result.valid {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

fn describe_validation(result: &ValidationResult) {
    if !result.missing_required.is_empty() {
        println!(
            "Missing required answers: {}",
            result
                .missing_required
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
}

fn load_questionnaire(path: &Path) -> CliResult<Questionnaire> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("cannot read {}: {}", path.display(), err))?;
    Ok(Questionnaire::from_json(&contents)?)
}

fn load_answers(path: &Path, expected: usize) -> CliResult<Vec<Option<Answer>>> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("cannot read {}: {}", path.display(), err))?;
    let value: Value = serde_json::from_str(&contents)?;
    let list = match value {
        Value::Object(mut map) => map
            .remove("answers")
            .ok_or("answers object is missing an `answers` array")?,
        other => other,
    };
    let Value::Array(slots) = list else {
        return Err("answers must be a JSON array".into());
    };
    if slots.len() != expected {
        return Err(format!(
            "expected {} answers, found {}",
            expected,
            slots.len()
        )
        .into());
    }

    let mut answers = Vec::with_capacity(slots.len());
    for (index, slot) in slots.into_iter().enumerate() {
        match serde_json::from_value::<Option<Answer>>(slot.clone()) {
            Ok(answer) => answers.push(answer),
            Err(_) => {
                return Err(format!(
                    "answer {} is not text, a rating from 0 to 255, or a file: {}",
                    index + 1,
                    slot
                )
                .into());
            }
        }
    }
    Ok(answers)
}
