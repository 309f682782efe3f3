// Static catalogue of the tools exposed to the MCP host.

use crate::upstream::types::{
    CATEGORIES, DEFAULT_SEARCH_LIMIT, MAX_DESC_CHARS, MAX_TAGS, MAX_TITLE_CHARS,
};
use rmcp::model::JsonObject;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    SearchPrompts,
    GetPromptDetail,
    CreatePrompt,
    LikePrompt,
    CommentPrompt,
    ListCategories,
    GetUserFavorites,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::SearchPrompts,
        Tool::GetPromptDetail,
        Tool::CreatePrompt,
        Tool::LikePrompt,
        Tool::CommentPrompt,
        Tool::ListCategories,
        Tool::GetUserFavorites,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::SearchPrompts => "search_prompts",
            Tool::GetPromptDetail => "get_prompt_detail",
            Tool::CreatePrompt => "create_prompt",
            Tool::LikePrompt => "like_prompt",
            Tool::CommentPrompt => "comment_prompt",
            Tool::ListCategories => "list_categories",
            Tool::GetUserFavorites => "get_user_favorites",
        }
    }

    pub fn from_name(name: &str) -> Option<Tool> {
        Tool::ALL.into_iter().find(|tool| tool.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            Tool::SearchPrompts => {
                "Search prompts, matching a need description against the most relevant prompts"
            }
            Tool::GetPromptDetail => "Get the full details of a prompt",
            Tool::CreatePrompt => {
                "Create a new prompt and share something useful with other users"
            }
            Tool::LikePrompt => "Like a prompt, or remove a like",
            Tool::CommentPrompt => "Add a comment and feedback to a prompt",
            Tool::ListCategories => "List all available prompt categories",
            Tool::GetUserFavorites => "List the prompts the user has favorited",
        }
    }

    pub fn input_schema(self) -> Value {
        match self {
            Tool::SearchPrompts => json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search keywords or a description of the need"
                    },
                    "category": {
                        "type": "string",
                        "description": "Prompt category"
                    },
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of results, default 10",
                        "default": DEFAULT_SEARCH_LIMIT
                    },
                    "sortBy": {
                        "type": "string",
                        "enum": ["relevance", "popularity", "recent"],
                        "description": "Sort order: relevance, popularity or recency",
                        "default": "relevance"
                    }
                },
                "required": ["query"]
            }),
            Tool::GetPromptDetail => json!({
                "type": "object",
                "properties": {
                    "id": { "type": "string", "description": "Prompt ID" }
                },
                "required": ["id"]
            }),
            Tool::CreatePrompt => json!({
                "type": "object",
                "properties": {
                    "title": {
                        "type": "string",
                        "description": "Prompt title, short and clear",
                        "maxLength": MAX_TITLE_CHARS
                    },
                    "chineseDesc": {
                        "type": "string",
                        "description": "Complete Chinese version of the prompt, copied as-is by users",
                        "maxLength": MAX_DESC_CHARS
                    },
                    "englishDesc": {
                        "type": "string",
                        "description": "Complete English version of the prompt, copied as-is by users",
                        "maxLength": MAX_DESC_CHARS
                    },
                    "category": {
                        "type": "string",
                        "enum": CATEGORIES,
                        "description": "Prompt category"
                    },
                    "tags": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Tags that help users discover the prompt",
                        "maxItems": MAX_TAGS
                    }
                },
                "required": ["title", "chineseDesc", "englishDesc", "category"]
            }),
            Tool::LikePrompt => json!({
                "type": "object",
                "properties": {
                    "promptId": { "type": "string", "description": "Prompt ID" },
                    "action": {
                        "type": "string",
                        "enum": ["like", "unlike"],
                        "description": "Like or remove a like",
                        "default": "like"
                    }
                },
                "required": ["promptId"]
            }),
            Tool::CommentPrompt => json!({
                "type": "object",
                "properties": {
                    "promptId": { "type": "string", "description": "Prompt ID" },
                    "content": { "type": "string", "description": "Comment text" },
                    "rating": {
                        "type": "number",
                        "description": "Rating from 1 to 5",
                        "minimum": 1,
                        "maximum": 5
                    }
                },
                "required": ["promptId", "content"]
            }),
            Tool::ListCategories | Tool::GetUserFavorites => json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    pub fn to_mcp_tool(self) -> rmcp::model::Tool {
        let schema: JsonObject = match self.input_schema() {
            Value::Object(map) => map,
            _ => JsonObject::default(),
        };
        rmcp::model::Tool::new(self.name(), self.description(), Arc::new(schema))
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
