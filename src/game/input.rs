//! Normalization of typed answers onto the WASD alphabet.

use crate::game::catalog::Strategem;

/// Map an HJKL key to its WASD equivalent. Other characters pass through.
fn translate_hjkl(c: char) -> char {
    match c {
        'k' => 'w',
        'j' => 's',
        'h' => 'a',
        'l' => 'd',
        other => other,
    }
}

/// Case-fold `text` and translate HJKL keys to WASD.
///
/// Full Unicode folding, so `ß` becomes `ss`.
pub fn normalize(text: &str) -> String {
    caseless::default_case_fold_str(text)
        .chars()
        .map(translate_hjkl)
        .collect()
}

/// Whether `text` is a correct answer for `strategem`.
pub fn matches_input(text: &str, strategem: &Strategem) -> bool {
    !text.is_empty() && normalize(text) == strategem.input
}
