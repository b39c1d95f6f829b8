use super::*;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

// ===== response parsing =====

#[test]
fn parse_chat_completions_shape() {
    let json = serde_json::json!({
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": "Step 1: Cleanse." } }]
    })
    .to_string();
    assert_eq!(parse_reply(&json).unwrap(), "Step 1: Cleanse.");
}

#[test]
fn parse_output_fallback_shape() {
    let json = serde_json::json!({ "output": "Fallback text" }).to_string();
    assert_eq!(parse_reply(&json).unwrap(), "Fallback text");
}

#[test]
fn parse_prefers_choices_over_output() {
    let json = serde_json::json!({
        "choices": [{ "message": { "content": "primary" } }],
        "output": "secondary"
    })
    .to_string();
    assert_eq!(parse_reply(&json).unwrap(), "primary");
}

#[test]
fn parse_null_content_falls_back_to_output() {
    let json = serde_json::json!({
        "choices": [{ "message": { "content": null } }],
        "output": "from output"
    })
    .to_string();
    assert_eq!(parse_reply(&json).unwrap(), "from output");
}

#[test]
fn parse_empty_choices_is_malformed() {
    let json = serde_json::json!({ "choices": [] }).to_string();
    assert!(matches!(parse_reply(&json), Err(ProxyError::MalformedResponse(_))));
}

#[test]
fn parse_non_json_is_malformed() {
    assert!(matches!(parse_reply("<html>ok</html>"), Err(ProxyError::MalformedResponse(_))));
}

#[test]
fn client_keeps_configured_endpoint_and_model() {
    let client = ProxyClient::new("https://proxy.example.test/", "gpt-4o").unwrap();
    assert_eq!(client.endpoint(), "https://proxy.example.test/");
    assert_eq!(client.model(), "gpt-4o");
}

// ===== live round trips against a local server =====

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}/")
}

#[tokio::test]
async fn complete_posts_messages_and_model() {
    let app = Router::new().route(
        "/",
        post(|Json(body): Json<Value>| async move {
            let model = body["model"].as_str().unwrap_or_default().to_string();
            let count = body["messages"].as_array().map_or(0, Vec::len);
            let last_role = body["messages"][count - 1]["role"].as_str().unwrap_or_default().to_string();
            Json(serde_json::json!({
                "choices": [{ "message": { "content": format!("{model}:{count}:{last_role}") } }]
            }))
        }),
    );
    let endpoint = serve(app).await;
    let client = ProxyClient::new(endpoint, "gpt-4o").unwrap();

    let messages = vec![Message::system("be brief"), Message::user("hello")];
    let reply = client.complete(&messages).await.unwrap();
    assert_eq!(reply, "gpt-4o:2:user");
}

#[tokio::test]
async fn complete_maps_server_error_to_remote() {
    let app = Router::new().route("/", post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "server error") }));
    let client = ProxyClient::new(serve(app).await, "gpt-4o").unwrap();

    let err = client.complete(&[Message::user("hi")]).await.unwrap_err();
    match err {
        ProxyError::Remote { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "server error");
        }
        other => panic!("expected Remote, got {other:?}"),
    }
}

#[tokio::test]
async fn complete_unexpected_success_shape_is_malformed() {
    let app = Router::new().route("/", post(|| async { Json(serde_json::json!({ "result": "?" })) }));
    let client = ProxyClient::new(serve(app).await, "gpt-4o").unwrap();

    let err = client.complete(&[Message::user("hi")]).await.unwrap_err();
    assert!(matches!(err, ProxyError::MalformedResponse(_)));
}

#[tokio::test]
async fn complete_unreachable_endpoint_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ProxyClient::new(format!("http://{addr}/"), "gpt-4o").unwrap();
    let err = client.complete(&[Message::user("hi")]).await.unwrap_err();
    assert!(matches!(err, ProxyError::Network(_)));
}
