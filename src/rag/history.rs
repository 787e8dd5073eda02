use crate::models::chat::Message;

/// Serializes prior turns as `"<role> said <content>"` lines joined by `\n`.
pub fn flatten_history(history: &[Message]) -> String {
    history
        .iter()
        .map(|msg| format!("{} said {}", msg.role, msg.content))
        .collect::<Vec<_>>()
        .join("\n")
}
