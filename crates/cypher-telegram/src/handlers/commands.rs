/// Split `/cmd@botname arg1 ...` into a lowercased command name and its arguments.
pub fn parse_command(text: &str) -> (String, String) {
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_name_and_arguments() {
        assert_eq!(
            parse_command("/check_scam  you won 5 BTC "),
            ("check_scam".to_string(), "you won 5 BTC".to_string())
        );
    }

    #[test]
    fn strips_bot_mention_and_lowercases() {
        assert_eq!(
            parse_command("/Scan_URL@AgentCypherBot https://example.com"),
            ("scan_url".to_string(), "https://example.com".to_string())
        );
        assert_eq!(
            parse_command("/start@AgentCypherBot"),
            ("start".to_string(), String::new())
        );
    }
}
