use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use serde_json::Value;

const QUESTIONS: &str =
    include_str!("../../questionnaire-spec/tests/fixtures/sample_questionnaire.json");

fn workspace_with(answers: &str) -> TempDir {
    let workspace = TempDir::new().expect("temp dir");
    workspace
        .child("questions.json")
        .write_str(QUESTIONS)
        .expect("write questions");
    workspace
        .child("answers.json")
        .write_str(answers)
        .expect("write answers");
    workspace
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn validate_command_reports_missing_required() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = workspace_with(r#"["Ada", null, null, null, null]"#);
    let output = Command::cargo_bin("questionnaire")?
        .arg("validate")
        .arg("--questions")
        .arg(workspace.child("questions.json").path())
        .arg("--answers")
        .arg(workspace.child("answers.json").path())
        .output()?;

    assert!(!output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Validation result: invalid"));
    assert!(stdout.contains("Missing required answers: 2, 5"));
    Ok(())
}

#[test]
fn validate_command_accepts_complete_answers() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = workspace_with(r#"["Ada", "team", null, null, 4]"#);
    Command::cargo_bin("questionnaire")?
        .arg("validate")
        .arg("--questions")
        .arg(workspace.child("questions.json").path())
        .arg("--answers")
        .arg(workspace.child("answers.json").path())
        .assert()
        .success();
    Ok(())
}

#[test]
fn validate_command_rejects_misnumbered_questions() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = workspace_with("[null]");
    workspace
        .child("questions.json")
        .write_str(r#"[{"id": 2, "question": "Name?", "type": "text"}]"#)?;
    let output = Command::cargo_bin("questionnaire")?
        .arg("validate")
        .arg("--questions")
        .arg(workspace.child("questions.json").path())
        .arg("--answers")
        .arg(workspace.child("answers.json").path())
        .output()?;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("IdMismatch"));
    Ok(())
}

#[test]
fn validate_command_names_unreadable_answer() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = workspace_with(r#"["Ada", "team", null, null, 300]"#);
    let output = Command::cargo_bin("questionnaire")?
        .arg("validate")
        .arg("--questions")
        .arg(workspace.child("questions.json").path())
        .arg("--answers")
        .arg(workspace.child("answers.json").path())
        .output()?;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("answer 5 is not"));
    Ok(())
}

#[test]
fn render_command_emits_json_for_page() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = workspace_with(r#"["Ada", "team", "yes", null, 4]"#);
    let output = Command::cargo_bin("questionnaire")?
        .arg("render")
        .arg("--questions")
        .arg(workspace.child("questions.json").path())
        .arg("--answers")
        .arg(workspace.child("answers.json").path())
        .arg("--page")
        .arg("3")
        .arg("--format")
        .arg("json")
        .output()?;

    assert!(output.status.success());
    let ui: Value = serde_json::from_str(&stdout_of(&output))?;
    assert_eq!(ui["heading"], "Question #3");
    assert_eq!(ui["control"]["type"], "radio_group");
    assert_eq!(ui["control"]["buttons"][0]["checked"], true);
    assert_eq!(ui["control"]["buttons"][1]["checked"], false);
    assert_eq!(ui["submit"]["disabled"], false);
    Ok(())
}

#[test]
fn render_command_rejects_page_outside_range() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = workspace_with("[]");
    Command::cargo_bin("questionnaire")?
        .arg("render")
        .arg("--questions")
        .arg(workspace.child("questions.json").path())
        .arg("--page")
        .arg("9")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn run_command_blocks_incomplete_submit() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = workspace_with("[]");
    let output = Command::cargo_bin("questionnaire")?
        .arg("run")
        .arg("--questions")
        .arg(workspace.child("questions.json").path())
        .arg("--endpoint")
        .arg("http://127.0.0.1:9/accept")
        .write_stdin("Ada\n:page 5\n4\n:submit\n:quit\n")
        .output()?;

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Question #5"));
    assert!(stdout.contains("Submit is disabled until required questions are answered: 2"));
    Ok(())
}

#[test]
fn schema_command_prints_question_schema() -> Result<(), Box<dyn std::error::Error>> {
    let output = Command::cargo_bin("questionnaire")?
        .arg("schema")
        .output()?;
    assert!(output.status.success());
    let schema: Value = serde_json::from_str(&stdout_of(&output))?;
    assert_eq!(schema["type"], "array");
    Ok(())
}
