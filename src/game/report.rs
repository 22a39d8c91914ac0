//! Text shown to players. All output is Telegram HTML.

use std::time::Duration;

use crate::game::catalog::Strategem;
use crate::game::session::{StrategemGame, round2};

pub const ELAPSED_MESSAGE: &str = "Sorry, your time to create liberty has elapsed.";

pub const ALREADY_RUNNING_MESSAGE: &str = "You already have a game running.";

/// Escape text for Telegram's HTML parse mode.
pub fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            _ => result.push(c),
        }
    }
    result
}

/// Render seconds the way `round(x, 2)` prints: `3.1`, `2.25`, `4.0`.
pub fn format_seconds(value: f64) -> String {
    let value = round2(value);
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Round time with one keystroke's share taken off.
///
/// An answer of `n` keys takes `n + 1` presses once Enter is counted, so the
/// average per press is removed once.
pub fn adjusted_seconds(elapsed: Duration, strategem: &Strategem) -> f64 {
    let raw = elapsed.as_secs_f64();
    let presses = (strategem.len() + 1) as f64;
    round2(raw - raw / presses)
}

/// The prompt posted for each round.
pub fn format_prompt(strategem: &Strategem) -> String {
    format!("<b>{}</b> :: {}", html_escape(strategem.name), strategem.icons())
}

/// Summary of a completed game.
pub fn format_results(game: &StrategemGame) -> String {
    let mut lines = vec![
        format!("Total game time taken was <b>{} seconds</b>.", format_seconds(game.total_time())),
        String::new(),
    ];

    for (idx, resolution) in game.resolutions().iter().enumerate() {
        let Some(strategem) = game.strategems.get(resolution.round) else {
            continue;
        };
        lines.push(format!(
            "{}. {} ({}) :: <b>{} seconds</b>.",
            idx + 1,
            html_escape(strategem.name),
            strategem.icons(),
            format_seconds(adjusted_seconds(resolution.elapsed, strategem)),
        ));
    }

    lines.join("\n")
}

/// Walkthrough for `/strategem example`.
pub fn format_example(strategem: &Strategem, command: &str) -> String {
    format!(
        "An example run of the game is that we send the name and input for the strategem:\n\
         {}\n\
         You would then send the WASD/HJKL equivalent input as a message, like so:\n\
         <code>{}</code> // <code>{}</code>\n\
         and this would be counted and recorded if correct. A reaction will be added when correct. \
         We average the time taken per keystroke to remove the one used to hit 'enter'.\n\n\
         Now you can start the game with /{}",
        format_prompt(strategem),
        strategem.input,
        strategem.hjkl(),
        command,
    )
}

/// Reply to `/help`.
pub fn format_help(default_rounds: usize, min_rounds: usize, max_rounds: usize) -> String {
    format!(
        "<b>Strategem input</b>\n\
         /strategem [rounds] - start a timed game ({min_rounds}-{max_rounds} rounds, default {default_rounds})\n\
         /strategem example - show how a round works\n\
         Aliases: /strats, /hero"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::STRATEGEMS;
    use chrono::Utc;

    const RESUPPLY: Strategem = Strategem::new("Resupply", "sswd");
    const ROVER: Strategem = Strategem::new("AX/LAS-5 'Guard Dog' Rover", "swawdd");

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(3.1), "3.1");
        assert_eq!(format_seconds(2.254), "2.25");
        assert_eq!(format_seconds(4.0), "4.0");
        assert_eq!(format_seconds(0.0), "0.0");
    }

    #[test]
    fn test_adjusted_removes_one_keystroke() {
        // 4 keys + enter = 5 presses, 5s total -> 1s per press
        assert_eq!(adjusted_seconds(Duration::from_secs(5), &RESUPPLY), 4.0);
        // 6 keys + enter = 7 presses
        assert_eq!(adjusted_seconds(Duration::from_secs(7), &ROVER), 6.0);
        assert_eq!(adjusted_seconds(Duration::ZERO, &RESUPPLY), 0.0);
    }

    #[test]
    fn test_adjusted_never_exceeds_raw() {
        for s in STRATEGEMS {
            let raw = Duration::from_millis(3333);
            let adj = adjusted_seconds(raw, s);
            assert!(adj <= raw.as_secs_f64());
            assert!(adj > 0.0);
        }
    }

    #[test]
    fn test_format_prompt() {
        assert_eq!(format_prompt(&RESUPPLY), "<b>Resupply</b> :: ⬇️ ⬇️ ⬆️ ➡️");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a<b>&c"), "a&lt;b&gt;&amp;c");
        assert_eq!(html_escape("'Guard Dog'"), "'Guard Dog'");
    }

    #[test]
    fn test_format_results() {
        static PICKED: [Strategem; 2] = [RESUPPLY, ROVER];
        let mut game = StrategemGame::with_strategems(1, PICKED.iter().collect());
        game.begin(Utc::now());
        game.record_success(Duration::from_secs(5), Utc::now());
        game.record_success(Duration::from_millis(3500), Utc::now());

        let text = format_results(&game);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Total game time taken was <b>8.5 seconds</b>.");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "1. Resupply (⬇️ ⬇️ ⬆️ ➡️) :: <b>4.0 seconds</b>.");
        assert_eq!(
            lines[3],
            "2. AX/LAS-5 'Guard Dog' Rover (⬇️ ⬆️ ⬅️ ⬆️ ➡️ ➡️) :: <b>3.0 seconds</b>."
        );
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_format_example_shows_both_layouts() {
        let text = format_example(&RESUPPLY, "strategem");
        assert!(text.contains("<b>Resupply</b> :: ⬇️ ⬇️ ⬆️ ➡️"));
        assert!(text.contains("<code>sswd</code> // <code>jjkl</code>"));
        assert!(text.ends_with("/strategem"));
    }

    #[test]
    fn test_format_help_mentions_limits() {
        let text = format_help(5, 3, 10);
        assert!(text.contains("3-10 rounds, default 5"));
    }
}
