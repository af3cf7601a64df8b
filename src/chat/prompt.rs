//! System instruction handling.
//!
//! The instruction ships inside the binary (from `config/prompts/system.md`)
//! and can be replaced at startup with `chat.prompt_file`. Either way it is
//! read once and never changes while the server runs.

use std::fs;
use std::path::Path;

use crate::error::AppError;
use crate::llm::ChatMessage;

/// Built-in system instruction.
pub const SYSTEM_INSTRUCTION: &str = include_str!("../../config/prompts/system.md");

/// Resolve the system instruction: the file at `path` when given, otherwise
/// the built-in text. A configured file that is missing or empty is an error.
pub fn load_system_prompt(path: Option<&Path>) -> Result<String, AppError> {
    let Some(path) = path else {
        return Ok(SYSTEM_INSTRUCTION.trim().to_string());
    };
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read prompt file {}: {e}", path.display())))?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::Config(format!("prompt file {} is empty", path.display())));
    }
    Ok(trimmed.to_string())
}

/// The provider conversation: exactly one system entry, then `history`.
pub fn build_conversation(system: &str, history: Vec<ChatMessage>) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::system(system));
    messages.extend(history);
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn builtin_instruction_keeps_its_rules() {
        let text = load_system_prompt(None).unwrap();
        assert!(text.contains("Georgia"));
        assert!(text.contains("markdown"));
        assert!(text.contains("rules and dates can change"));
        assert!(text.contains("politely decline"));
    }

    #[test]
    fn prompt_file_overrides_builtin() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"\n  Only answer about ballots.  \n").unwrap();
        assert_eq!(load_system_prompt(Some(f.path())).unwrap(), "Only answer about ballots.");
    }

    #[test]
    fn missing_prompt_file_errors() {
        let err = load_system_prompt(Some(Path::new("/nonexistent/prompt.md"))).unwrap_err();
        assert!(err.to_string().contains("cannot read prompt file"));
    }

    #[test]
    fn empty_prompt_file_errors() {
        let f = NamedTempFile::new().unwrap();
        let err = load_system_prompt(Some(f.path())).unwrap_err();
        assert!(err.to_string().contains("is empty"));
    }

    #[test]
    fn system_entry_first_and_only_once() {
        let history = vec![ChatMessage::user("a"), ChatMessage::assistant("b")];
        let conv = build_conversation("rules", history.clone());
        assert_eq!(conv.len(), 3);
        assert_eq!(conv[0], ChatMessage::system("rules"));
        assert_eq!(&conv[1..], history.as_slice());
        assert_eq!(conv.iter().filter(|m| m.role == Role::System).count(), 1);
    }

    #[test]
    fn empty_history_still_gets_instruction() {
        let conv = build_conversation("rules", Vec::new());
        assert_eq!(conv, vec![ChatMessage::system("rules")]);
    }
}
