//! REPL command parsing.

use firefly_core::session::SessionId;

/// Slash commands offered for completion, with their argument hint.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/new", ""),
    ("/sessions", ""),
    ("/open", " <id>"),
    ("/delete", " <id>"),
    ("/rename", " <id>"),
    ("/clear", ""),
    ("/help", ""),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: send it as a chat message.
    Send(String),
    New,
    Sessions,
    Open(SessionId),
    Delete(SessionId),
    Rename(SessionId),
    Clear,
    Help,
    Quit,
    /// A known command used wrongly; carries the usage text.
    Usage(&'static str),
    Unknown(String),
}

impl Command {
    /// Parses one input line. Returns `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed == "quit" || trimmed == "exit" {
            return Some(Self::Quit);
        }
        if !trimmed.starts_with('/') {
            return Some(Self::Send(trimmed.to_string()));
        }

        let mut parts = trimmed.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        let command = match name {
            "/new" => Self::New,
            "/sessions" => Self::Sessions,
            "/clear" => Self::Clear,
            "/help" => Self::Help,
            "/open" => with_id(arg, Self::Open, "Usage: /open <id>"),
            "/delete" => with_id(arg, Self::Delete, "Usage: /delete <id>"),
            "/rename" => with_id(arg, Self::Rename, "Usage: /rename <id>"),
            other => Self::Unknown(other.to_string()),
        };
        Some(command)
    }
}

fn with_id(arg: Option<&str>, make: fn(SessionId) -> Command, usage: &'static str) -> Command {
    arg.and_then(|value| value.parse::<i64>().ok())
        .map(|id| make(SessionId(id)))
        .unwrap_or(Command::Usage(usage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_sent_trimmed() {
        assert_eq!(
            Command::parse("  hello world "),
            Some(Command::Send("hello world".to_string()))
        );
    }

    #[test]
    fn test_blank_line_is_ignored() {
        assert_eq!(Command::parse("   "), None);
    }

    #[test]
    fn test_quit_words() {
        assert_eq!(Command::parse("quit"), Some(Command::Quit));
        assert_eq!(Command::parse("exit"), Some(Command::Quit));
    }

    #[test]
    fn test_commands_with_ids() {
        assert_eq!(Command::parse("/open 3"), Some(Command::Open(SessionId(3))));
        assert_eq!(Command::parse("/delete 12"), Some(Command::Delete(SessionId(12))));
        assert_eq!(Command::parse("/rename 1"), Some(Command::Rename(SessionId(1))));
    }

    #[test]
    fn test_missing_or_bad_id_shows_usage() {
        assert_eq!(Command::parse("/open"), Some(Command::Usage("Usage: /open <id>")));
        assert_eq!(
            Command::parse("/delete abc"),
            Some(Command::Usage("Usage: /delete <id>"))
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            Command::parse("/frobnicate"),
            Some(Command::Unknown("/frobnicate".to_string()))
        );
    }
}
