// src/prompt/builder.rs

use crate::llm::ChatMessage;
use crate::models::{HistoryTurn, TrainingSnippet};
use crate::persona::Persona;

/// Substituted for the training block when the user has submitted nothing yet
pub const FALLBACK_TRAINING_CONTEXT: &str =
    "Limited training data available. Adapt to the user's style as you learn.";

/// Joins snippets in the order given (the store hands them over newest-first),
/// prefixing `[category] ` only when the category is non-empty.
pub fn build_training_context(snippets: &[TrainingSnippet]) -> String {
    let context = snippets
        .iter()
        .map(|snippet| match snippet.category.as_deref() {
            Some(category) if !category.is_empty() => {
                format!("[{}] {}", category, snippet.content)
            }
            _ => snippet.content.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    if context.is_empty() {
        FALLBACK_TRAINING_CONTEXT.to_string()
    } else {
        context
    }
}

/// Builds the complete system prompt for a persona from the user's training data
pub fn build_system_prompt(persona: Persona, snippets: &[TrainingSnippet]) -> String {
    persona.system_prompt(&build_training_context(snippets))
}

/// System prompt, then history exactly as given (oldest-first), then the new user turn
pub fn build_messages(
    system_prompt: String,
    history: Vec<HistoryTurn>,
    new_message: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend(history.into_iter().map(ChatMessage::from));
    messages.push(ChatMessage::user(new_message));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatRole;
    use crate::models::Role;

    fn snippet(content: &str, category: Option<&str>) -> TrainingSnippet {
        TrainingSnippet {
            content: content.to_string(),
            category: category.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_training_uses_fallback() {
        assert_eq!(build_training_context(&[]), FALLBACK_TRAINING_CONTEXT);
    }

    #[test]
    fn test_category_prefix_only_when_present() {
        let snippets = vec![
            snippet("newest thought", Some("Beliefs")),
            snippet("middle thought", None),
            snippet("oldest thought", Some("")),
        ];
        assert_eq!(
            build_training_context(&snippets),
            "[Beliefs] newest thought\n\nmiddle thought\n\noldest thought"
        );
    }

    #[test]
    fn test_category_only_sample_is_kept() {
        let snippets = vec![snippet("", Some("Work"))];
        assert_eq!(build_training_context(&snippets), "[Work] ");
    }

    #[test]
    fn test_system_prompt_embeds_context() {
        let prompt = build_system_prompt(Persona::Mirroring, &[]);
        assert!(prompt.contains(FALLBACK_TRAINING_CONTEXT));
        assert!(prompt.contains("Mirror the user's:"));

        let prompt = build_system_prompt(Persona::Challenger, &[snippet("x", Some("y"))]);
        assert!(prompt.contains("[y] x"));
        assert!(prompt.contains("In Mirror Mode:"));
    }

    #[test]
    fn test_message_order() {
        let history = vec![
            HistoryTurn {
                role: Role::User,
                content: "first".into(),
            },
            HistoryTurn {
                role: Role::Assistant,
                content: "second".into(),
            },
        ];
        let messages = build_messages("sys".into(), history, "third");

        let roles: Vec<ChatRole> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![ChatRole::System, ChatRole::User, ChatRole::Assistant, ChatRole::User]
        );
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["sys", "first", "second", "third"]);
    }

    #[test]
    fn test_empty_history_is_system_then_user() {
        let messages = build_messages("sys".into(), vec![], "Hello");
        assert_eq!(messages, vec![ChatMessage::system("sys"), ChatMessage::user("Hello")]);
    }
}
