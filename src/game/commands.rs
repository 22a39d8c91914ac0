//! Parsing of the game's chat commands.

use std::sync::LazyLock;

use regex::Regex;

use crate::game::message::IncomingMessage;
use crate::game::waiters::MessageWaiters;

/// Command names that start a game.
pub const GAME_COMMANDS: &[&str] = &["strategem", "strats", "hero"];

static COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^/([A-Za-z0-9_]+)(?:@([A-Za-z0-9_]+))?(?:\s+(.*))?$").expect("valid command regex")
});

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCommand {
    /// Start a game. `rounds` is `None` when not given or not a number.
    Start { command: String, rounds: Option<i64> },
    /// Show one random strategem and how to answer it.
    Example { command: String },
    Help,
}

/// Parse `text` as a command addressed to this bot.
///
/// Commands with an `@username` for another bot are ignored.
pub fn parse_command(text: &str, bot_username: Option<&str>) -> Option<GameCommand> {
    let caps = COMMAND_RE.captures(text.trim())?;
    let name = caps.get(1)?.as_str().to_lowercase();

    if let Some(target) = caps.get(2) {
        match bot_username {
            Some(me) if me.eq_ignore_ascii_case(target.as_str()) => {}
            _ => return None,
        }
    }

    let args = caps.get(3).map(|m| m.as_str().trim()).unwrap_or("");

    if name == "help" {
        return Some(GameCommand::Help);
    }
    if !GAME_COMMANDS.contains(&name.as_str()) {
        return None;
    }

    let first = args.split_whitespace().next().unwrap_or("");
    if first.eq_ignore_ascii_case("example") {
        return Some(GameCommand::Example { command: name });
    }

    Some(GameCommand::Start {
        command: name,
        rounds: first.parse().ok(),
    })
}

/// Offer `msg` to running games first; only unclaimed messages can be commands.
pub fn route_message(
    waiters: &MessageWaiters,
    msg: &IncomingMessage,
    bot_username: Option<&str>,
) -> Option<GameCommand> {
    if waiters.dispatch(msg) {
        return None;
    }
    parse_command(&msg.text, bot_username)
}

/// Clamp a requested round count into `[min, max]`, using `default` when absent.
pub fn clamp_rounds(requested: Option<i64>, default: usize, min: usize, max: usize) -> usize {
    let requested = requested.unwrap_or(default as i64);
    requested.clamp(min as i64, max as i64) as usize
}
