use futures_util::StreamExt;
use localpilot::{
    ai::{GenerateService, MockGenerateClient, OllamaClient},
    app::{App, Task},
    chat::{self, ConversationSession, TurnOutcome},
    models::Config,
    Error,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(backend_url: String) -> Config {
    Config {
        backend_url,
        model: "mistral".to_string(),
        max_history_turns: 5,
    }
}

#[tokio::test]
async fn test_chat_turn_streams_and_records_full_reply() {
    let client = MockGenerateClient::new().with_fragments(vec![
        "fi".to_string(),
        "ne".to_string(),
    ]);
    let mut session = ConversationSession::new(5);
    session.record_turn("hi".to_string(), "hello".to_string());

    let mut out = Vec::new();
    let outcome = chat::take_turn(&client, &mut session, "how are you", &mut out)
        .await
        .unwrap();

    // Forwarded fragments, accumulated reply, and recorded turn all agree.
    assert_eq!(String::from_utf8(out).unwrap(), "fine");
    assert_eq!(outcome, TurnOutcome::Completed("fine".to_string()));
    assert_eq!(
        session.render_context(),
        "Human: hi\nAssistant: hello\nHuman: how are you\nAssistant: fine"
    );

    // The request carried only the prior turn as context.
    let requests = client.recorded_requests();
    assert_eq!(requests[0].1, "Human: hi\nAssistant: hello");
}

#[tokio::test]
async fn test_context_window_keeps_last_five_turns() {
    let client = MockGenerateClient::new();
    let mut session = ConversationSession::new(5);
    for i in 1..=7 {
        session.record_turn(format!("question {}", i), format!("answer {}", i));
    }

    let mut out = Vec::new();
    chat::take_turn(&client, &mut session, "next", &mut out)
        .await
        .unwrap();

    let context = &client.recorded_requests()[0].1;
    assert_eq!(context.matches("Human: ").count(), 5);
    assert!(!context.contains("question 1"));
    assert!(!context.contains("question 2"));
    assert!(context.contains("question 3"));
    assert!(context.contains("question 7"));
}

#[tokio::test]
async fn test_clear_then_generate_sends_empty_context() {
    let client = MockGenerateClient::new();
    let mut session = ConversationSession::new(5);
    session.record_turn("hi".to_string(), "hello".to_string());

    session.reset();
    assert_eq!(session.render_context(), "");

    let mut out = Vec::new();
    chat::take_turn(&client, &mut session, "fresh start", &mut out)
        .await
        .unwrap();

    assert_eq!(client.recorded_requests()[0].1, "");
}

#[tokio::test]
async fn test_unreachable_backend_end_to_end() {
    // Take a port from a server we immediately shut down.
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = OllamaClient::new(&test_config(uri));

    // The stream yields exactly one diagnostic item and ends.
    let mut stream = client.stream_generate("hi", "").await;
    let first = stream.next().await.unwrap();
    assert!(matches!(first, Err(Error::BackendUnreachable(_))));
    assert!(stream.next().await.is_none());

    // At the loop boundary that becomes inline text and no recorded turn.
    let mut session = ConversationSession::new(5);
    let mut out = Vec::new();
    let outcome = chat::take_turn(&client, &mut session, "hi", &mut out)
        .await
        .unwrap();
    assert_eq!(outcome, TurnOutcome::Failed);
    assert!(session.is_empty());
    assert!(String::from_utf8(out).unwrap().contains("ollama serve"));
}

#[tokio::test]
async fn test_streaming_chat_against_http_backend() {
    let server = MockServer::start().await;

    let body = concat!(
        "{\"response\":\"Hello\",\"done\":false}\n",
        "not a json record\n",
        "{\"response\":\" there\",\"done\":false}\n",
        "{\"response\":\"\",\"done\":true}\n",
    );
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains("\"model\":\"mistral\""))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let client = OllamaClient::new(&test_config(server.uri()));
    let mut session = ConversationSession::new(5);
    let mut out = Vec::new();

    let outcome = chat::take_turn(&client, &mut session, "hi", &mut out)
        .await
        .unwrap();

    // The malformed record is dropped without corrupting the reply.
    assert_eq!(String::from_utf8(out).unwrap(), "Hello there");
    assert_eq!(outcome, TurnOutcome::Completed("Hello there".to_string()));
    assert_eq!(session.len(), 1);
    assert_eq!(session.render_context(), "Human: hi\nAssistant: Hello there");
}

#[tokio::test]
async fn test_one_shot_task_builds_prompt_and_streams_reply() {
    let client = MockGenerateClient::new().with_reply("CREATE TABLE preferences (...)".to_string());
    let probe = client.clone();
    let app = App::with_service(Box::new(client), 5);

    app.run_task(Task::Schema {
        description: "add user preferences table".to_string(),
    })
    .await
    .unwrap();

    let requests = probe.recorded_requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].0.contains("add user preferences table"));
    assert_eq!(requests[0].1, "");
}

#[tokio::test]
async fn test_one_shot_task_fails_fast_without_backend() {
    let client = MockGenerateClient::new().with_unreachable("refused".to_string());
    let app = App::with_service(Box::new(client), 5);

    let err = app
        .run_task(Task::Analyze {
            path: ".".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::BackendUnreachable(_)));
}
