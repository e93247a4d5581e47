use httpmock::prelude::*;
use menu_advisor::domain::model::GenerationRequest;
use menu_advisor::domain::ports::GenerationService;
use menu_advisor::{AdvisorError, ChatCompletionClient, ServiceConfig};
use serde_json::json;

fn text_request(prompt: &str) -> GenerationRequest {
    GenerationRequest {
        system: Some("你是专业营养师".to_string()),
        prompt: prompt.to_string(),
        image_base64: None,
        max_tokens: 1000,
    }
}

fn config(base_url: String) -> ServiceConfig {
    ServiceConfig {
        api_base_url: base_url,
        vision_api_key: Some("vision-key".to_string()),
        reasoning_api_key: Some("reasoning-key".to_string()),
        request_timeout_seconds: 5,
        ..ServiceConfig::default()
    }
}

#[tokio::test]
async fn test_sends_chat_completion_payload() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/chat")
            .header("Authorization", "Bearer reasoning-key")
            .json_body(json!({
                "model": "glm-4-flash",
                "temperature": 0.9,
                "top_k": 4,
                "max_tokens": 1000,
                "messages": [
                    {"role": "system", "content": "你是专业营养师"},
                    {"role": "user", "content": "汇总营养"}
                ]
            }));
        then.status(200)
            .json_body(json!({"choices": [{"message": {"content": "ok"}}]}));
    });

    let client = ChatCompletionClient::reasoning(&config(server.url("/chat"))).unwrap();
    let content = client.generate(text_request("汇总营养")).await.unwrap();

    mock.assert();
    assert_eq!(content, "ok");
}

#[tokio::test]
async fn test_missing_choices_is_empty_text() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/chat");
        then.status(200).json_body(json!({"choices": []}));
    });

    let client = ChatCompletionClient::reasoning(&config(server.url("/chat"))).unwrap();
    assert_eq!(client.generate(text_request("x")).await.unwrap(), "");
}

#[tokio::test]
async fn test_error_status_is_service_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/chat");
        then.status(401).body("{\"error\": \"invalid api key\"}");
    });

    let client = ChatCompletionClient::reasoning(&config(server.url("/chat"))).unwrap();
    let err = client.generate(text_request("x")).await.unwrap_err();

    match &err {
        AdvisorError::GenerationServiceError {
            service,
            status,
            body,
        } => {
            assert_eq!(service, "reasoning");
            assert_eq!(*status, 401);
            assert!(body.contains("invalid api key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn test_reasoning_without_key_sends_no_auth() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/chat").header_missing("Authorization");
        then.status(200)
            .json_body(json!({"choices": [{"message": {"content": "anonymous"}}]}));
    });

    let mut config = config(server.url("/chat"));
    config.reasoning_api_key = None;
    let client = ChatCompletionClient::reasoning(&config).unwrap();

    assert_eq!(client.generate(text_request("x")).await.unwrap(), "anonymous");
    mock.assert();
}

#[test]
fn test_vision_client_requires_key() {
    let mut config = config("http://localhost/chat".to_string());
    config.vision_api_key = None;

    let err = ChatCompletionClient::vision(&config).unwrap_err();
    assert!(matches!(err, AdvisorError::MissingConfigError { ref field } if field == "GLM_4_1V_API_KEY"));
}
