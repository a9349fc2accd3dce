//! Player-supplied text (usernames, guesses) reaches the logs through [`LogSafe`], which
//! keeps a record on one line and bounds how much of a guess gets echoed.

use std::fmt;

/// Longest player string echoed into a log line, in characters.
pub const MAX_LOGGED_CHARS: usize = 64;

/// Formats a guess or username for a log line. Line breaks, tabs and backslashes are shown
/// as escapes, other control characters as `\xNN`, and input past [`MAX_LOGGED_CHARS`]
/// ends in `…`.
pub struct LogSafe<'a>(pub &'a str);

impl fmt::Display for LogSafe<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = self.0.chars();
        for ch in chars.by_ref().take(MAX_LOGGED_CHARS) {
            match ch {
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                c if c.is_control() => write!(f, "\\x{:02X}", c as u32)?,
                c => fmt::Write::write_char(f, c)?,
            }
        }
        if chars.next().is_some() {
            f.write_str("…")?;
        }
        Ok(())
    }
}

/// Owned form of [`LogSafe`].
pub fn escape_log(s: &str) -> String {
    LogSafe(s).to_string()
}
