/// Chat commands the bot reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `/start`
    Start,
    /// `/bigmatch` or `/today`
    BigMatchToday,
    /// `/result` or `/yesterday`
    ResultYesterday,
}

impl Command {
    /// Reads the first `/command` of a message, ignoring case and an optional
    /// `@botname` suffix.
    pub fn parse(text: &str) -> Option<Self> {
        let token = text
            .split_whitespace()
            .find(|word| word.starts_with('/'))?;
        let name = token[1..].split('@').next()?.to_lowercase();

        match name.as_str() {
            "start" => Some(Self::Start),
            "bigmatch" | "today" => Some(Self::BigMatchToday),
            "result" | "yesterday" => Some(Self::ResultYesterday),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_every_alias() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/bigmatch"), Some(Command::BigMatchToday));
        assert_eq!(Command::parse("/today"), Some(Command::BigMatchToday));
        assert_eq!(Command::parse("/result"), Some(Command::ResultYesterday));
        assert_eq!(Command::parse("/yesterday"), Some(Command::ResultYesterday));
    }

    #[test]
    fn ignores_case_and_mention_suffix() {
        assert_eq!(Command::parse("/TODAY"), Some(Command::BigMatchToday));
        assert_eq!(
            Command::parse("/result@BigMatchBot"),
            Some(Command::ResultYesterday)
        );
        assert_eq!(
            Command::parse("/Yesterday@big_match_bot please"),
            Some(Command::ResultYesterday)
        );
    }

    #[test]
    fn unknown_or_missing_commands_are_ignored() {
        assert_eq!(Command::parse("hello there"), None);
        assert_eq!(Command::parse("/results"), None);
        assert_eq!(Command::parse("/todayx"), None);
        assert_eq!(Command::parse("/"), None);
        assert_eq!(Command::parse(""), None);
    }
}
