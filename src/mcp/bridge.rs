// MCP server that exposes the Prompt Share tools and forwards each call upstream.

use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, Implementation, JsonObject,
    ListToolsResult, PaginatedRequestParams, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};

use super::catalogue::Tool;
use super::format::format_tool_result;
use crate::error::{BridgeError, Result};
use crate::upstream::types::{
    CommentPromptParams, CreatePromptParams, LikePromptParams, PromptDetailParams,
    SearchPromptsParams,
};
use crate::upstream::PromptApi;

/// Translates MCP tool calls into Prompt Share API calls.
/// Holds no per-call state; concurrent calls do not share anything mutable.
#[derive(Clone)]
pub struct PromptBridge {
    api: Arc<dyn PromptApi>,
    span: Span,
}

impl PromptBridge {
    pub fn new(api: Arc<dyn PromptApi>) -> Self {
        Self {
            api,
            span: info_span!("bridge"),
        }
    }

    /// Replace the span this bridge logs under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Check the upstream once and warn when it is not healthy. Never fails.
    pub async fn check_upstream(&self) -> bool {
        let healthy = self.api.health_check().await;
        if !healthy {
            warn!(
                parent: &self.span,
                "Prompt Share API is not healthy, tool calls may fail"
            );
        }
        healthy
    }

    pub fn tools() -> Vec<rmcp::model::Tool> {
        Tool::ALL.into_iter().map(Tool::to_mcp_tool).collect()
    }

    /// Run one tool call end to end and render the reply as a single text block.
    ///
    /// Unknown tools fail with METHOD_NOT_FOUND; every other failure is
    /// reported as an internal error carrying the original message.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let args = Value::Object(arguments.unwrap_or_default());
        info!(parent: &self.span, "Calling tool: {} {}", name, args);

        let outcome = async {
            let tool = Tool::from_name(name)
                .ok_or_else(|| BridgeError::MethodNotFound(name.to_string()))?;
            let result = self.invoke(tool, args).await?;
            Ok::<_, BridgeError>(format_tool_result(&result, tool))
        }
        .instrument(self.span.clone())
        .await;

        match outcome {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(e) => {
                error!(parent: &self.span, "Tool call failed ({}): {}", name, e);
                Err(e.into())
            }
        }
    }

    async fn invoke(&self, tool: Tool, args: Value) -> Result<Value> {
        match tool {
            Tool::SearchPrompts => self.api.search_prompts(coerce(tool, args)?).await,
            Tool::GetPromptDetail => {
                let params: PromptDetailParams = coerce(tool, args)?;
                self.api.get_prompt_detail(&params.id).await
            }
            Tool::CreatePrompt => {
                let params: CreatePromptParams = coerce(tool, args)?;
                params.validate()?;
                self.api.create_prompt(params).await
            }
            Tool::LikePrompt => {
                let params: LikePromptParams = coerce(tool, args)?;
                self.api.like_prompt(params).await
            }
            Tool::CommentPrompt => {
                let params: CommentPromptParams = coerce(tool, args)?;
                params.validate()?;
                self.api.comment_prompt(params).await
            }
            Tool::ListCategories => self.api.list_categories().await,
            Tool::GetUserFavorites => self.api.get_user_favorites().await,
        }
    }
}

fn coerce<T: DeserializeOwned>(tool: Tool, args: Value) -> Result<T> {
    serde_json::from_value(args)
        .map_err(|e| BridgeError::InvalidArguments(format!("{}: {}", tool, e)))
}

impl ServerHandler for PromptBridge {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Search, read, create and rate prompts on Prompt Share".to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _params: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        debug!(parent: &self.span, "Listing tools");

        Ok(ListToolsResult {
            meta: None,
            tools: Self::tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        params: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.dispatch(&params.name, params.arguments).await
    }
}
