use component_questionnaire::{
    AnswerTransport, FAILURE_NOTICE, HttpTransport, InputEvent, Notifier, QuestionnaireForm,
    SUCCESS_NOTICE, SubmissionPayload, SubmitConfig, SubmitOutcome,
};
use questionnaire_spec::{Answer, Question, QuestionType, Questionnaire};
use serde_json::{Value, json};
use std::sync::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Captured request: header block and body.
struct Captured {
    head: String,
    body: String,
}

/// Serves exactly one HTTP request with the given status line and body.
async fn serve_once(
    status_line: &'static str,
    body: &'static str,
) -> (String, oneshot::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let address = listener.local_addr().expect("local addr");
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 1024];
        let (head_end, content_length) = loop {
            let read = socket.read(&mut chunk).await.expect("read");
            assert!(read > 0, "connection closed before headers");
            buffer.extend_from_slice(&chunk[..read]);
            if let Some(position) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buffer[..position]).to_string();
                let length = head
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                break (position + 4, length);
            }
        };
        while buffer.len() < head_end + content_length {
            let read = socket.read(&mut chunk).await.expect("read body");
            assert!(read > 0, "connection closed before body");
            buffer.extend_from_slice(&chunk[..read]);
        }

        let response = format!(
            "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.expect("write");
        socket.shutdown().await.ok();

        let _ = tx.send(Captured {
            head: String::from_utf8_lossy(&buffer[..head_end]).to_string(),
            body: String::from_utf8_lossy(&buffer[head_end..head_end + content_length]).to_string(),
        });
    });

    (format!("http://{}/accept", address), rx)
}

/// Local endpoints must not be routed through a proxy from the environment.
fn local_transport(endpoint: String) -> HttpTransport {
    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("client");
    HttpTransport::with_client(&SubmitConfig { endpoint }, client).expect("transport")
}

#[derive(Default)]
struct CollectingNotifier {
    messages: Mutex<Vec<String>>,
}

impl Notifier for CollectingNotifier {
    fn alert(&self, message: &str) {
        self.messages
            .lock()
            .expect("lock")
            .push(message.to_string());
    }
}

fn survey() -> QuestionnaireForm {
    QuestionnaireForm::new(
        Questionnaire::new(vec![
            Question::new(1, "Name", QuestionType::Text).required(),
            Question::new(2, "Rating", QuestionType::Rating),
        ])
        .expect("questionnaire"),
    )
}

#[tokio::test]
async fn posts_answers_as_json() {
    let (endpoint, captured) = serve_once("HTTP/1.1 200 OK", "{}").await;
    let transport = local_transport(endpoint);

    let payload = SubmissionPayload {
        answers: vec![Some(Answer::from("Ada")), Some(Answer::Rating(4)), None],
    };
    let response = transport.post_answers(&payload).await.expect("response");
    assert_eq!(response.status, 200);

    let request = captured.await.expect("captured request");
    assert!(request.head.starts_with("POST /accept"));
    assert!(
        request
            .head
            .to_ascii_lowercase()
            .contains("content-type: application/json")
    );
    let body: Value = serde_json::from_str(&request.body).expect("json body");
    assert_eq!(body, json!({ "answers": ["Ada", 4, null] }));
}

#[tokio::test]
async fn form_submission_succeeds_against_http_endpoint() {
    let (endpoint, _captured) = serve_once("HTTP/1.1 200 OK", "{}").await;
    let transport = local_transport(endpoint);
    let notifier = CollectingNotifier::default();
    let mut form = survey();
    form.handle_input(InputEvent::TextChanged("Ada".into()));

    let outcome = form.submit(&transport, &notifier).await;

    assert_eq!(outcome, SubmitOutcome::Accepted);
    let messages = notifier.messages.lock().expect("lock").clone();
    assert_eq!(messages[0], SUCCESS_NOTICE);
    assert!(messages[1].contains("Ada"));
}

#[tokio::test]
async fn non_200_status_is_a_failure() {
    let (endpoint, _captured) =
        serve_once("HTTP/1.1 400 Bad Request", r#"{"name": "must be longer"}"#).await;
    let transport = local_transport(endpoint);
    let notifier = CollectingNotifier::default();
    let mut form = survey();
    form.handle_input(InputEvent::TextChanged("A".into()));

    let outcome = form.submit(&transport, &notifier).await;

    assert_eq!(
        outcome,
        SubmitOutcome::Rejected {
            detail: vec!["name: must be longer".to_string()]
        }
    );
    assert!(form.state().has_error());
    assert_eq!(
        *notifier.messages.lock().expect("lock"),
        vec![FAILURE_NOTICE.to_string()]
    );
}

#[tokio::test]
async fn unreachable_endpoint_is_a_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let address = listener.local_addr().expect("local addr");
    drop(listener);

    let transport = local_transport(format!("http://{}/accept", address));
    let notifier = CollectingNotifier::default();
    let mut form = survey();
    form.handle_input(InputEvent::TextChanged("Ada".into()));

    match form.submit(&transport, &notifier).await {
        SubmitOutcome::Rejected { detail } => assert_eq!(detail.len(), 1),
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(form.state().has_error());
    assert_eq!(
        form.render().error_details.map(|details| details.len()),
        Some(1)
    );
}
