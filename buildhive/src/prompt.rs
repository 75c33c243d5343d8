//! Interactive selection fallback when no names were given on the command
//! line. Plain stdin: a numbered list, space-separated picks, or `all`.

use std::io::Write;

use buildhive_core::{Error, Project, Result, SelectionProvider};
use owo_colors::OwoColorize;

/// Shows a numbered list and reads picks from stdin. Returns indices into
/// `items`; empty input cancels with an empty selection.
pub fn pick_indices(message: &str, items: &[&str]) -> Result<Vec<usize>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    println!("{}", message.cyan().bold());
    for (i, item) in items.iter().enumerate() {
        println!("  {} {}", format!("{}.", i + 1).bright_black(), item);
    }
    print!(
        "{} ",
        "Numbers separated by spaces, 'all', or empty to cancel:".bright_black()
    );
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let line = line.trim();

    if line.is_empty() {
        return Ok(Vec::new());
    }
    if line.eq_ignore_ascii_case("all") {
        return Ok((0..items.len()).collect());
    }

    let mut picks = Vec::new();
    for token in line.split_whitespace() {
        let index: usize = token
            .parse()
            .map_err(|_| Error::Config(format!("'{}' is not a selection number", token)))?;
        if index == 0 || index > items.len() {
            return Err(Error::Config(format!(
                "selection {} out of range 1-{}",
                index,
                items.len()
            )));
        }
        if !picks.contains(&(index - 1)) {
            picks.push(index - 1);
        }
    }
    Ok(picks)
}

/// The interactive `SelectionProvider` used when the build command gets no
/// platform arguments.
pub struct PromptSelection {
    message: String,
}

impl PromptSelection {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl SelectionProvider for PromptSelection {
    fn select<'a>(&self, platforms: &'a [Project]) -> Result<Vec<&'a Project>> {
        let names: Vec<&str> = platforms.iter().map(|p| p.name.as_str()).collect();
        let picks = pick_indices(&self.message, &names)?;
        Ok(picks.into_iter().map(|i| &platforms[i]).collect())
    }
}
