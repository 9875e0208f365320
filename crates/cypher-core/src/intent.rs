//! Classifies one inbound message into exactly one [`Action`].
//!
//! Rules, first match wins:
//! 1. explicit command: mapped by name
//! 2. plain text starting with "scan url" (any case) followed by a non-empty URL
//! 3. anything else is free-form chat

use crate::messaging::types::IncomingMessage;

/// Plain-text trigger for a URL scan.
pub const SCAN_URL_PREFIX: &str = "scan url";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Start,
    Help,
    CheckScam(String),
    ListVerifiedTokens,
    ScanUrl(String),
    FreeformChat(String),
    /// Nothing actionable: an unknown command or a blank message.
    Unrecognized { command: Option<String> },
}

impl Action {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Help => "help",
            Action::CheckScam(_) => "check_scam",
            Action::ListVerifiedTokens => "verified_tokens",
            Action::ScanUrl(_) => "scan_url",
            Action::FreeformChat(_) => "chat",
            Action::Unrecognized { .. } => "unrecognized",
        }
    }

    /// Whether handling this action waits on an external collaborator.
    pub fn calls_collaborator(&self) -> bool {
        matches!(
            self,
            Action::CheckScam(_)
                | Action::ListVerifiedTokens
                | Action::ScanUrl(_)
                | Action::FreeformChat(_)
        )
    }
}

/// Commands that require an argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgCommand {
    CheckScam,
    ScanUrl,
}

impl ArgCommand {
    pub fn usage(self) -> &'static str {
        match self {
            ArgCommand::CheckScam => "Please provide the text to check. Usage: /check_scam <text>",
            ArgCommand::ScanUrl => "Please provide a URL to scan. Usage: /scan_url <url>",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Action(Action),
    /// A command that needs an argument arrived without one.
    MissingArgument(ArgCommand),
}

pub fn route(msg: &IncomingMessage) -> Route {
    match msg {
        IncomingMessage::Command(c) => route_command(&c.name, &c.args),
        IncomingMessage::Text(t) => Route::Action(route_text(&t.text)),
    }
}

pub fn route_command(name: &str, args: &str) -> Route {
    let arg = args.split_whitespace().collect::<Vec<_>>().join(" ");

    let action = match name {
        "start" => Action::Start,
        "help" => Action::Help,
        "verified_tokens" => Action::ListVerifiedTokens,
        "check_scam" if arg.is_empty() => return Route::MissingArgument(ArgCommand::CheckScam),
        "check_scam" => Action::CheckScam(arg),
        "scan_url" if arg.is_empty() => return Route::MissingArgument(ArgCommand::ScanUrl),
        "scan_url" => Action::ScanUrl(arg),
        "" => Action::Unrecognized { command: None },
        other => Action::Unrecognized {
            command: Some(other.to_string()),
        },
    };
    Route::Action(action)
}

pub fn route_text(text: &str) -> Action {
    if text.trim().is_empty() {
        return Action::Unrecognized { command: None };
    }
    if let Some(url) = scan_url_argument(text) {
        return Action::ScanUrl(url);
    }
    Action::FreeformChat(text.to_string())
}

fn scan_url_argument(text: &str) -> Option<String> {
    let head = text.get(..SCAN_URL_PREFIX.len())?;
    if !head.eq_ignore_ascii_case(SCAN_URL_PREFIX) {
        return None;
    }
    let url = text[SCAN_URL_PREFIX.len()..].trim();
    (!url.is_empty()).then(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_map_by_name() {
        assert_eq!(route_command("start", ""), Route::Action(Action::Start));
        assert_eq!(route_command("help", "ignored"), Route::Action(Action::Help));
        assert_eq!(
            route_command("verified_tokens", ""),
            Route::Action(Action::ListVerifiedTokens)
        );
    }

    #[test]
    fn command_arguments_are_joined_with_single_spaces() {
        assert_eq!(
            route_command("check_scam", "  send   me\t2 ETH  "),
            Route::Action(Action::CheckScam("send me 2 ETH".into()))
        );
        assert_eq!(
            route_command("scan_url", " https://example.com "),
            Route::Action(Action::ScanUrl("https://example.com".into()))
        );
    }

    #[test]
    fn argument_commands_without_argument_signal_missing_argument() {
        assert_eq!(
            route_command("check_scam", ""),
            Route::MissingArgument(ArgCommand::CheckScam)
        );
        assert_eq!(
            route_command("scan_url", "   "),
            Route::MissingArgument(ArgCommand::ScanUrl)
        );
    }

    #[test]
    fn unknown_command_is_unrecognized() {
        assert_eq!(
            route_command("launch", "x"),
            Route::Action(Action::Unrecognized {
                command: Some("launch".into())
            })
        );
    }

    #[test]
    fn empty_command_name_has_no_command_to_report() {
        assert_eq!(
            route_command("", ""),
            Route::Action(Action::Unrecognized { command: None })
        );
    }

    #[test]
    fn scan_url_prefix_is_case_insensitive() {
        assert_eq!(
            route_text("Scan URL https://example.com"),
            Action::ScanUrl("https://example.com".into())
        );
        assert_eq!(
            route_text("SCAN URL   http://a.b/c?d=E  "),
            Action::ScanUrl("http://a.b/c?d=E".into())
        );
    }

    #[test]
    fn scan_url_without_url_falls_through_to_chat() {
        assert_eq!(route_text("scan url"), Action::FreeformChat("scan url".into()));
        assert_eq!(
            route_text("scan url   "),
            Action::FreeformChat("scan url   ".into())
        );
    }

    #[test]
    fn other_text_is_chat_verbatim() {
        assert_eq!(
            route_text("Is this airdrop legit?"),
            Action::FreeformChat("Is this airdrop legit?".into())
        );
        assert_eq!(route_text("scan"), Action::FreeformChat("scan".into()));
        // Multi-byte text shorter than the prefix must not panic on slicing.
        assert_eq!(route_text("sçan"), Action::FreeformChat("sçan".into()));
        assert_eq!(
            route_text("scan urlé"),
            Action::ScanUrl("é".into())
        );
    }

    #[test]
    fn blank_text_is_unrecognized() {
        assert_eq!(route_text("  \n"), Action::Unrecognized { command: None });
    }
}
