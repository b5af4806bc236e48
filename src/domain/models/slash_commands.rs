#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

use std::str::FromStr;

use super::LogoSlot;

/// Which slots a `/regenerate` call should render again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegenerateTarget {
    One(LogoSlot),
    All,
}

pub struct SlashCommand {
    command: String,
    rest: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let text = text.trim_start();
        if text.is_empty() {
            return None;
        }
        let (prefix, rest) = match text.find(char::is_whitespace) {
            Some(idx) => (&text[..idx], text[idx..].trim_start()),
            None => (text, ""),
        };

        let cmd = SlashCommand {
            command: prefix.to_string(),
            rest: rest.to_string(),
            args: rest
                .split_whitespace()
                .map(|e| return e.to_string())
                .collect(),
        };
        if cmd.is_quit()
            || cmd.is_new()
            || cmd.is_regenerate()
            || cmd.is_show()
            || cmd.is_history()
            || cmd.is_help()
        {
            return Some(cmd);
        }

        return None;
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_new(&self) -> bool {
        return ["/n", "/new"].contains(&self.command.as_str());
    }

    pub fn is_regenerate(&self) -> bool {
        return ["/r", "/regenerate", "/regen"].contains(&self.command.as_str());
    }

    pub fn is_show(&self) -> bool {
        return ["/s", "/show"].contains(&self.command.as_str());
    }

    pub fn is_history(&self) -> bool {
        return ["/history"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }

    /// Everything after the command and its separator, as typed.
    pub fn rest(&self) -> &str {
        return &self.rest;
    }

    pub fn regenerate_target(&self) -> Option<RegenerateTarget> {
        let arg = self.args.first()?.to_lowercase();
        if arg == "all" || arg == "both" {
            return Some(RegenerateTarget::All);
        }

        return LogoSlot::from_str(&arg).ok().map(RegenerateTarget::One);
    }
}
