use super::*;

fn sample_request() -> ChatRequest {
    ChatRequest {
        system: "You are Nuke.".into(),
        messages: vec![Turn::user("hi"), Turn::assistant("hey!"), Turn::user("what do you do?")],
    }
}

#[test]
fn request_body_matches_messages_api() {
    let request = sample_request();
    let json = serde_json::to_value(request_body("claude-haiku-4-5-20251001", 256, &request)).unwrap();

    assert_eq!(json["model"], "claude-haiku-4-5-20251001");
    assert_eq!(json["max_tokens"], 256);
    assert_eq!(json["system"], "You are Nuke.");
    assert_eq!(json["stream"], true);

    let messages = json["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0], serde_json::json!({ "role": "user", "content": "hi" }));
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[2]["content"], "what do you do?");
}

#[test]
fn client_builds_with_configured_timeouts() {
    let client = AnthropicClient::new(
        "key".into(),
        "http://127.0.0.1:9/v1/messages".into(),
        LlmTimeouts { request_secs: 5, connect_secs: 1 },
    );
    assert!(client.is_ok());
}

#[tokio::test]
async fn unreachable_upstream_is_a_request_error() {
    let client = AnthropicClient::new(
        "key".into(),
        "http://127.0.0.1:9/v1/messages".into(),
        LlmTimeouts { request_secs: 5, connect_secs: 1 },
    )
    .unwrap();
    let result = client.stream("m", 16, &sample_request()).await;
    assert!(matches!(result, Err(LlmError::ApiRequest(_))));
}
