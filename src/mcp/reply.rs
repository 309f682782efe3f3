use super::catalogue::Tool;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Number, Value};

/// Shape of an upstream reply, as far as rendering is concerned.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamReply {
    /// The service attached guidance text for the caller
    Guided { guidance: String, payload: Value },
    Search(Vec<PromptSummary>),
    Detail(PromptDetail),
    Created(CreatedPrompt),
    Categories(Vec<Category>),
    /// Anything without a dedicated rendering, or missing the fields one needs
    Generic,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PromptSummary {
    pub id: Value,
    pub title: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub usage: Option<Number>,
    pub favorite_count: Option<Number>,
    pub likes: Option<Number>,
    pub chinese_desc: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PromptDetail {
    pub title: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub usage: Option<Number>,
    pub favorite_count: Option<Number>,
    pub likes: Option<Number>,
    pub comments: Option<Number>,
    pub chinese_desc: Option<String>,
    pub english_desc: Option<String>,
    pub created_at: Value,
    pub updated_at: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CreatedPrompt {
    pub title: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(skip)]
    pub guidance: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Category {
    pub key: Option<String>,
    pub label: Option<String>,
    pub emoji: Option<String>,
}

impl UpstreamReply {
    /// Classify a raw reply for the tool that produced it.
    pub fn classify(result: &Value, tool: Tool) -> Self {
        if let Some(guidance) = result.get("cursorGuidance").filter(|v| is_truthy(v)) {
            let payload = result
                .get("data")
                .filter(|v| is_truthy(v))
                .unwrap_or(result)
                .clone();
            return UpstreamReply::Guided {
                guidance: display(guidance),
                payload,
            };
        }

        let data = result.get("data").filter(|v| is_truthy(v));

        let reply = match tool {
            Tool::SearchPrompts => data
                .filter(|v| v.is_array())
                .and_then(parse)
                .map(UpstreamReply::Search),
            Tool::GetPromptDetail => data
                .filter(|v| v.is_object())
                .and_then(parse)
                .map(UpstreamReply::Detail),
            Tool::CreatePrompt => {
                let success = result.get("success").is_some_and(is_truthy);
                if success {
                    let created = match data {
                        Some(data) if data.is_object() => parse::<CreatedPrompt>(data),
                        Some(_) => None,
                        None => Some(CreatedPrompt::default()),
                    };
                    created.map(|mut created| {
                        created.guidance = result
                            .get("guidance")
                            .filter(|v| is_truthy(v))
                            .map(display);
                        UpstreamReply::Created(created)
                    })
                } else {
                    None
                }
            }
            Tool::ListCategories => data
                .filter(|v| v.is_array())
                .and_then(parse)
                .map(UpstreamReply::Categories),
            Tool::LikePrompt | Tool::CommentPrompt | Tool::GetUserFavorites => None,
        };

        reply.unwrap_or(UpstreamReply::Generic)
    }
}

fn parse<T: DeserializeOwned>(value: &Value) -> Option<T> {
    T::deserialize(value).ok()
}

/// JSON truthiness: null, false, 0, and "" count as absent.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a scalar the way it reads to a person: strings without quotes.
pub(crate) fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
