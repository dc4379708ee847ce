use composer_core::ai_client::AiClient;
use composer_core::config::SdkSettings;
use composer_interaction::{McpIntegration, TamboClient, TurnRole};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn settings(response_delay_ms: u64, stream_interval_ms: u64) -> SdkSettings {
    SdkSettings {
        response_delay_ms,
        stream_interval_ms,
        seed: Some(7),
        ..SdkSettings::default()
    }
}

#[tokio::test]
async fn test_streaming_replays_response_word_by_word() {
    let client = TamboClient::new(&settings(0, 0));
    let chunks = Mutex::new(Vec::<String>::new());
    let on_chunk = |chunk: &str| chunks.lock().unwrap().push(chunk.to_string());

    let response = client.send_message("stream please", Some(&on_chunk)).await.unwrap();

    let chunks = chunks.into_inner().unwrap();
    assert_eq!(chunks.len(), response.content.split_whitespace().count());
    assert_eq!(chunks.concat(), response.content);
}

#[tokio::test]
async fn test_transcript_records_both_turns() {
    let client = TamboClient::new(&settings(0, 0));
    client.send_message("first", None).await.unwrap();
    client.generate_code("a login form").await.unwrap();

    let history = client.history().await;
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].role, TurnRole::User);
    assert_eq!(history[0].content, "first");
    assert_eq!(history[2].content, "Generate code: a login form");
    assert_eq!(history[3].role, TurnRole::Assistant);
    assert!(TamboClient::canned_responses().contains(&history[3].content.as_str()));
}

#[tokio::test]
async fn test_response_delay_is_applied() {
    let client = TamboClient::new(&settings(50, 0));
    let started = Instant::now();
    client.send_message("slow", None).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(50));
}

#[tokio::test]
async fn test_stream_interval_paces_each_word() {
    let client = TamboClient::new(&settings(0, 20));
    let on_chunk = |_: &str| {};

    let started = Instant::now();
    let response = client.send_message("pace me", Some(&on_chunk)).await.unwrap();
    let elapsed = started.elapsed();

    let words = response.content.split_whitespace().count() as u32;
    assert!(elapsed >= Duration::from_millis(20) * words, "{elapsed:?} for {words} words");
}

#[tokio::test]
async fn test_stream_interval_is_skipped_without_callback() {
    let client = TamboClient::new(&settings(0, 1000));
    let started = Instant::now();
    client.send_message("no stream", None).await.unwrap();
    assert!(started.elapsed() < Duration::from_millis(1000));
}

#[tokio::test]
async fn test_mcp_over_tambo_returns_canned_text() {
    let client: Arc<dyn AiClient> = Arc::new(TamboClient::new(&settings(0, 0)));
    let mcp = McpIntegration::new(client);

    let analysis = mcp
        .analyze_code("export function Shop() { if (x) { return 1; } return 2; }")
        .await
        .unwrap();
    assert_eq!(analysis.metrics.complexity, 2);
    assert!(TamboClient::canned_responses().contains(&analysis.insights.as_str()));
}
