//! Tests for the shipped system prompt in config/prompts

use std::fs;

const SYSTEM_PROMPT: &str = "config/prompts/system.md";

#[test]
fn test_system_prompt_file_exists() {
    assert!(fs::metadata(SYSTEM_PROMPT).is_ok(), "system.md prompt file missing");
}

#[test]
fn test_system_prompt_matches_compiled_copy() {
    let text = fs::read_to_string(SYSTEM_PROMPT).unwrap();
    assert_eq!(text, ballotbuddy::chat::SYSTEM_INSTRUCTION);
}

#[test]
fn test_system_prompt_scopes_to_georgia() {
    let text = fs::read_to_string(SYSTEM_PROMPT).unwrap();
    assert!(text.contains("Georgia"), "system.md should name Georgia");
    assert!(text.contains("politely decline"), "system.md should decline off-topic requests");
}

#[test]
fn test_system_prompt_asks_for_markdown_and_caution() {
    let text = fs::read_to_string(SYSTEM_PROMPT).unwrap();
    assert!(text.contains("markdown"), "system.md should ask for markdown answers");
    assert!(text.contains("rules and dates can change"), "system.md should warn that rules change");
}

#[test]
fn test_system_prompt_loads_through_config_path() {
    let loaded = ballotbuddy::chat::load_system_prompt(Some(std::path::Path::new(SYSTEM_PROMPT))).unwrap();
    assert!(!loaded.is_empty());
    assert_eq!(loaded, loaded.trim());
}
