use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_DESC_CHARS: usize = 10_000;
pub const MAX_TAGS: usize = 10;
pub const RATING_RANGE: std::ops::RangeInclusive<f64> = 1.0..=5.0;

/// Categories accepted by `create_prompt`
pub const CATEGORIES: [&str; 29] = [
    "writing",
    "article",
    "programming",
    "ai",
    "life",
    "business",
    "marketing",
    "psychology",
    "philosophy",
    "game",
    "education",
    "academic",
    "tool",
    "analysis",
    "language",
    "creative",
    "eval",
    "copywriting",
    "enterprise",
    "seo",
    "doctor",
    "finance",
    "music",
    "industry",
    "social",
    "cursor",
    "product",
    "testing",
    "ai-art",
];

/// JSON body posted to the upstream RPC endpoint
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub method: &'static str,
    pub params: Value,
}

impl Envelope {
    pub fn new<P: Serialize>(method: &'static str, params: &P) -> Result<Self> {
        Ok(Self {
            method,
            params: serde_json::to_value(params)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Relevance,
    Popularity,
    Recent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeAction {
    #[default]
    Like,
    Unlike,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPromptsParams {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub limit: Option<Number>,
    #[serde(default)]
    pub sort_by: Option<SortBy>,
}

/// Search parameters after defaults are applied, as sent upstream.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchQuery {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub limit: Number,
    pub sort_by: SortBy,
}

impl From<SearchPromptsParams> for SearchQuery {
    fn from(params: SearchPromptsParams) -> Self {
        Self {
            query: params.query.unwrap_or_default(),
            category: params.category,
            // a zero limit means "unspecified"; anything else is forwarded as given
            limit: params
                .limit
                .filter(|limit| limit.as_f64().is_some_and(|l| l != 0.0))
                .unwrap_or_else(|| Number::from(DEFAULT_SEARCH_LIMIT)),
            sort_by: params.sort_by.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDetailParams {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromptParams {
    pub title: String,
    pub chinese_desc: String,
    pub english_desc: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreatePromptParams {
    pub fn validate(&self) -> Result<()> {
        check_len("title", &self.title, MAX_TITLE_CHARS)?;
        check_len("chineseDesc", &self.chinese_desc, MAX_DESC_CHARS)?;
        check_len("englishDesc", &self.english_desc, MAX_DESC_CHARS)?;
        if self.tags.len() > MAX_TAGS {
            return Err(BridgeError::InvalidArguments(format!(
                "tags allows at most {} items, got {}",
                MAX_TAGS,
                self.tags.len()
            )));
        }
        Ok(())
    }
}

fn check_len(field: &str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(BridgeError::InvalidArguments(format!(
            "{} allows at most {} characters, got {}",
            field, max, len
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikePromptParams {
    pub prompt_id: String,
    #[serde(default)]
    pub action: Option<LikeAction>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LikeRequest {
    pub prompt_id: String,
    pub action: LikeAction,
}

impl From<LikePromptParams> for LikeRequest {
    fn from(params: LikePromptParams) -> Self {
        Self {
            prompt_id: params.prompt_id,
            action: params.action.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPromptParams {
    pub prompt_id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Number>,
}

impl CommentPromptParams {
    pub fn validate(&self) -> Result<()> {
        match &self.rating {
            Some(rating) if !rating.as_f64().is_some_and(|r| RATING_RANGE.contains(&r)) => {
                Err(BridgeError::InvalidArguments(format!(
                    "rating must be between {} and {}, got {}",
                    RATING_RANGE.start(),
                    RATING_RANGE.end(),
                    rating
                )))
            }
            _ => Ok(()),
        }
    }
}
