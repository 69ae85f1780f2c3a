//! Plain-text rendering of a chat session.
//!
//! Pure functions of session state; the chat loop decides when to print them.

use parley::{Message, Role, UserProfile};

pub const HEADER: &str = "AI 助手";
pub const PLACEHOLDER: &str = "开始与AI助手对话吧！";
pub const BUSY_INDICATOR: &str = "正在思考...";

const USER_PREFIX: &str = "你";
const ASSISTANT_PREFIX: &str = "AI";

/// Header line; shows the signed-in user's label when there is one.
pub fn render_header(user: Option<&UserProfile>) -> String {
    match user {
        Some(u) => format!("{} ({})", HEADER, u.label()),
        None => HEADER.to_string(),
    }
}

/// `你: text` or `AI: text`. Continuation lines are indented under the text.
pub fn render_message(message: &Message) -> String {
    let prefix = match message.role {
        Role::User => USER_PREFIX,
        Role::Assistant => ASSISTANT_PREFIX,
    };
    let indent = " ".repeat(prefix.chars().count() + 2);
    let mut lines = message.content.lines();
    let mut out = format!("{}: {}", prefix, lines.next().unwrap_or_default());
    for line in lines {
        out.push('\n');
        out.push_str(&indent);
        out.push_str(line);
    }
    out
}

/// Whole view: header, messages (or the placeholder), busy indicator.
pub fn render_session(user: Option<&UserProfile>, messages: &[Message], busy: bool) -> String {
    let mut lines = vec![render_header(user)];
    if messages.is_empty() {
        lines.push(PLACEHOLDER.to_string());
    }
    lines.extend(messages.iter().map(render_message));
    if busy {
        lines.push(BUSY_INDICATOR.to_string());
    }
    lines.join("\n")
}
