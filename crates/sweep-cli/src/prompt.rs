//! Interactive stdin prompts for credentials and confirmations.

use std::io::{self, IsTerminal, Write};

use anyhow::Context;

/// Whether stdin is attached to a terminal. Prompting is only attempted
/// when it is; piped or redirected input never blocks on a question.
pub fn stdin_is_interactive() -> bool {
    io::stdin().is_terminal()
}

/// Print `label: ` and read one trimmed line from stdin.
pub fn read_line(label: &str) -> anyhow::Result<String> {
    print!("{label}: ");
    io::stdout().flush().context("failed to flush stdout")?;
    let mut buffer = String::new();
    io::stdin()
        .read_line(&mut buffer)
        .context("failed to read from stdin")?;
    Ok(buffer.trim().to_owned())
}

/// Ask a yes/no question, defaulting to no. Only `y` or `yes` (any case)
/// counts as consent.
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    let answer = read_line(&format!("{question}; proceed? [y/N]"))?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consent_matching_is_case_insensitive() {
        for answer in ["y", "Y", "yes", "YES", "Yes"] {
            assert!(matches!(answer.to_lowercase().as_str(), "y" | "yes"));
        }
        for answer in ["", "n", "no", "yep", "sure"] {
            assert!(!matches!(answer.to_lowercase().as_str(), "y" | "yes"));
        }
    }
}
