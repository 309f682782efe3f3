use httpmock::MockServer;
use prompt_share_bridge::config::UpstreamConfig;
use prompt_share_bridge::mcp::PromptBridge;
use prompt_share_bridge::upstream::UpstreamClient;
use rmcp::model::{CallToolResult, JsonObject, RawContent};
use std::sync::Arc;

pub const API_KEY: &str = "test-api-key";

/// Upstream config pointing at the given mock server.
pub fn upstream_config(server: &MockServer) -> UpstreamConfig {
    UpstreamConfig::new(server.base_url(), API_KEY)
}

/// Build a bridge wired to a real client talking to the mock server.
pub fn build_bridge(config: &UpstreamConfig) -> PromptBridge {
    let client = UpstreamClient::new(config).unwrap();
    PromptBridge::new(Arc::new(client))
}

pub fn args(value: serde_json::Value) -> Option<JsonObject> {
    value.as_object().cloned()
}

/// Extract the single text block of a tool result.
pub fn text_of(result: &CallToolResult) -> String {
    assert_eq!(result.content.len(), 1, "expected exactly one content block");
    match &result.content[0].raw {
        RawContent::Text(text) => text.text.clone(),
        other => panic!("expected text content, got {:?}", other),
    }
}
