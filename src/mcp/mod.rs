pub mod bridge;
pub mod catalogue;
pub mod format;
pub mod reply;

pub use bridge::PromptBridge;
pub use catalogue::Tool;
pub use format::format_tool_result;
