//! Shared helpers for command handlers.

use std::io::IsTerminal;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Search terms arrive as separate shell words.
pub fn join_term(words: &[String]) -> String {
    words.join(" ")
}

/// Cents as a decimal amount: `199` -> `"1.99"`.
pub fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Blank for missing values in table cells.
pub fn or_blank(value: Option<&str>) -> String {
    value.unwrap_or_default().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_render_with_two_decimals() {
        assert_eq!(format_price(199), "1.99");
        assert_eq!(format_price(5), "0.05");
        assert_eq!(format_price(1200), "12.00");
        assert_eq!(format_price(-250), "-2.50");
    }

    #[test]
    fn search_words_are_joined_with_spaces() {
        assert_eq!(join_term(&["halfvolle".into(), "melk".into()]), "halfvolle melk");
    }
}
