//! Rendering of upstream replies into the text block returned to the caller.
//!
//! Formatting is total: every reply yields non-empty text. Whenever a reply does
//! not have the shape a dedicated renderer needs, the whole reply is returned as
//! pretty-printed JSON instead.

use super::catalogue::Tool;
use super::reply::{
    display, Category, CreatedPrompt, PromptDetail, PromptSummary, UpstreamReply,
};
use serde_json::{Number, Value};
use std::fmt::Write;

const PREVIEW_CHARS: usize = 100;
const NO_TAGS: &str = "none";
const DEFAULT_CATEGORY_EMOJI: &str = "📁";
const DEFAULT_CREATE_GUIDANCE: &str = "Thanks for contributing to the community!";

/// Format a raw upstream reply for the given tool.
pub fn format_tool_result(result: &Value, tool: Tool) -> String {
    match UpstreamReply::classify(result, tool) {
        UpstreamReply::Guided { guidance, payload } => {
            format!("{}\n\n📊 Details:\n{}", guidance, pretty_json(&payload))
        }
        UpstreamReply::Search(prompts) => render_search(&prompts),
        UpstreamReply::Detail(prompt) => render_detail(&prompt),
        UpstreamReply::Created(prompt) => render_created(&prompt),
        UpstreamReply::Categories(categories) => render_categories(&categories),
        UpstreamReply::Generic => pretty_json(result),
    }
}

/// Two-space indented JSON, never empty.
pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn render_search(prompts: &[PromptSummary]) -> String {
    let mut output = format!("🎯 Found {} matching prompts:\n\n", prompts.len());

    for (index, prompt) in prompts.iter().enumerate() {
        let _ = writeln!(output, "{}. **{}**", index + 1, text(&prompt.title));
        let _ = writeln!(output, "   ID: {}", display(&prompt.id));
        let _ = writeln!(output, "   Category: {}", text(&prompt.category));
        let _ = writeln!(output, "   Tags: {}", tags(&prompt.tags));
        let _ = writeln!(
            output,
            "   Usage: {} | Favorites: {} | Likes: {}",
            count(&prompt.usage),
            count(&prompt.favorite_count),
            count(&prompt.likes)
        );
        if let Some(desc) = prompt.chinese_desc.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(output, "   Preview: {}", preview(desc));
        }
        output.push('\n');
    }

    output
}

fn render_detail(prompt: &PromptDetail) -> String {
    format!(
        "📝 Prompt details:

**{title}**
Category: {category}
Tags: {tags}

📊 Stats:
- Usage: {usage}
- Favorites: {favorites}
- Likes: {likes}
- Comments: {comments}

🇨🇳 Chinese version:
{chinese}

🇺🇸 English version:
{english}

⏰ Created: {created}
⏰ Updated: {updated}",
        title = text(&prompt.title),
        category = text(&prompt.category),
        tags = tags(&prompt.tags),
        usage = count(&prompt.usage),
        favorites = count(&prompt.favorite_count),
        likes = count(&prompt.likes),
        comments = count(&prompt.comments),
        chinese = text(&prompt.chinese_desc),
        english = text(&prompt.english_desc),
        created = display(&prompt.created_at),
        updated = display(&prompt.updated_at),
    )
}

fn render_created(prompt: &CreatedPrompt) -> String {
    format!(
        "✅ Prompt created!

🎉 \"{title}\" has been added to the platform
📂 Category: {category}
🏷️ Tags: {tags}

{guidance}",
        title = text(&prompt.title),
        category = text(&prompt.category),
        tags = tags(&prompt.tags),
        guidance = prompt.guidance.as_deref().unwrap_or(DEFAULT_CREATE_GUIDANCE),
    )
}

fn render_categories(categories: &[Category]) -> String {
    let mut output = String::from("📂 Available categories:\n\n");
    for category in categories {
        let emoji = category
            .emoji
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_CATEGORY_EMOJI);
        let _ = writeln!(
            output,
            "{} **{}** ({})",
            emoji,
            text(&category.label),
            text(&category.key)
        );
    }
    output
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

fn tags(tags: &Option<Vec<String>>) -> String {
    match tags {
        Some(tags) if !tags.is_empty() => tags.join(", "),
        _ => NO_TAGS.to_string(),
    }
}

fn count(value: &Option<Number>) -> String {
    value
        .as_ref()
        .map(Number::to_string)
        .unwrap_or_else(|| "0".to_string())
}

fn preview(desc: &str) -> String {
    let mut chars = desc.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_rendering() {
        let result = json!({
            "data": [
                {
                    "id": "p1",
                    "title": "SQL helper",
                    "category": "programming",
                    "tags": ["sql", "db"],
                    "usage": 12,
                    "favoriteCount": 4,
                    "likes": 9,
                    "chineseDesc": "写SQL"
                },
                {"id": "p2", "title": "Bare"}
            ]
        });

        let text = format_tool_result(&result, Tool::SearchPrompts);
        assert!(text.starts_with("🎯 Found 2 matching prompts:"));
        assert!(text.contains("1. **SQL helper**"));
        assert!(text.contains("   ID: p1"));
        assert!(text.contains("   Tags: sql, db"));
        assert!(text.contains("   Usage: 12 | Favorites: 4 | Likes: 9"));
        assert!(text.contains("   Preview: 写SQL\n"));
        assert!(text.contains("2. **Bare**"));
        assert!(text.contains("   Tags: none"));
        assert!(text.contains("   Usage: 0 | Favorites: 0 | Likes: 0"));
    }

    #[test]
    fn test_preview_is_truncated_by_chars() {
        let long = "字".repeat(150);
        let rendered = preview(&long);
        assert_eq!(rendered.chars().count(), 103);
        assert!(rendered.ends_with("..."));

        let exact = "a".repeat(100);
        assert_eq!(preview(&exact), exact);
    }

    #[test]
    fn test_detail_rendering() {
        let result = json!({
            "data": {
                "title": "T",
                "category": "c",
                "tags": ["a"],
                "usage": 3,
                "favoriteCount": 1,
                "likes": 2,
                "comments": 0,
                "chineseDesc": "中文",
                "englishDesc": "en",
                "createdAt": "t1",
                "updatedAt": "t2"
            }
        });

        let text = format_tool_result(&result, Tool::GetPromptDetail);
        assert!(text.contains("**T**"));
        assert!(text.contains("Category: c"));
        assert!(text.contains("Tags: a"));
        assert!(text.contains("- Usage: 3"));
        assert!(text.contains("- Favorites: 1"));
        assert!(text.contains("- Likes: 2"));
        assert!(text.contains("- Comments: 0"));
        assert!(text.contains("🇨🇳 Chinese version:\n中文"));
        assert!(text.contains("🇺🇸 English version:\nen"));
        assert!(text.contains("⏰ Created: t1"));
        assert!(text.contains("⏰ Updated: t2"));
    }

    #[test]
    fn test_created_rendering() {
        let result = json!({
            "success": true,
            "data": {"title": "New", "category": "ai", "tags": []}
        });

        let text = format_tool_result(&result, Tool::CreatePrompt);
        assert!(text.starts_with("✅ Prompt created!"));
        assert!(text.contains("🎉 \"New\" has been added"));
        assert!(text.contains("📂 Category: ai"));
        assert!(text.contains("🏷️ Tags: none"));
        assert!(text.ends_with(DEFAULT_CREATE_GUIDANCE));
    }

    #[test]
    fn test_failed_create_is_json() {
        let result = json!({"success": false, "message": "duplicate"});
        assert_eq!(
            format_tool_result(&result, Tool::CreatePrompt),
            pretty_json(&result)
        );
    }

    #[test]
    fn test_categories_rendering() {
        let result = json!({
            "data": [
                {"key": "ai", "label": "AI", "emoji": "🤖"},
                {"key": "seo", "label": "SEO"}
            ]
        });

        let text = format_tool_result(&result, Tool::ListCategories);
        assert!(text.starts_with("📂 Available categories:\n\n"));
        assert!(text.contains("🤖 **AI** (ai)\n"));
        assert!(text.contains("📁 **SEO** (seo)\n"));
    }

    #[test]
    fn test_guidance_comes_first() {
        let result = json!({"cursorGuidance": "Pick one of these", "data": {"count": 2}});
        for tool in Tool::ALL {
            let text = format_tool_result(&result, tool);
            assert_eq!(text.lines().next(), Some("Pick one of these"));
            assert!(text.contains("\"count\": 2"));
        }
    }

    #[test]
    fn test_missing_fields_fall_back_to_json() {
        let result = json!({"success": true, "total": 0});
        for tool in Tool::ALL {
            let text = format_tool_result(&result, tool);
            if tool == Tool::CreatePrompt {
                assert!(text.starts_with("✅ Prompt created!"));
            } else {
                assert_eq!(text, pretty_json(&result));
            }
            assert!(!text.is_empty());
        }
    }

    #[test]
    fn test_non_object_reply_is_json() {
        let result = json!("plain text reply");
        let text = format_tool_result(&result, Tool::SearchPrompts);
        assert_eq!(text, "\"plain text reply\"");

        let result = json!(null);
        assert_eq!(format_tool_result(&result, Tool::GetPromptDetail), "null");
    }

    #[test]
    fn test_pretty_json_uses_two_spaces() {
        assert_eq!(pretty_json(&json!({"a": 1})), "{\n  \"a\": 1\n}");
    }
}
