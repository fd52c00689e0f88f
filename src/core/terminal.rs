//! Line-based terminal front-end: a [`Prompter`] reading answers from stdin
//! and a [`ViewObserver`] printing listings and detail views.

use crate::commands::{Listing, ViewObserver};
use crate::core::{
    colors::{format_change, format_entry},
    gate::{Notice, Prompter},
    git::RepoDetail,
    output::{print_notice, print_section_header},
};
use chrono::Utc;
use colored::*;
use std::cell::RefCell;
use std::io::{self, BufRead, Write};

pub struct TerminalPrompter {
    input: RefCell<Box<dyn BufRead>>,
}

impl TerminalPrompter {
    pub fn stdin() -> Self {
        Self::from_reader(Box::new(io::BufReader::new(io::stdin())))
    }

    pub fn from_reader(input: Box<dyn BufRead>) -> Self {
        Self {
            input: RefCell::new(input),
        }
    }

    /// One line without its terminator; `None` at end of input
    fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{prompt} ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match self.input.borrow_mut().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                log::warn!("Could not read answer: {e}");
                None
            }
        }
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, title: &str, message: &str) -> bool {
        println!("\n{}\n\n{message}\n", title.bold());
        self.read_line(&format!("{}", "Proceed? [y/N]".blue()))
            .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false)
    }

    fn ask_text(&self, title: &str, prompt: &str, default: Option<&str>) -> Option<String> {
        println!("\n{}", title.bold());
        let prompt = match default {
            Some(default) => format!("{prompt} [{}]", default.bright_black()),
            None => prompt.to_string(),
        };
        let answer = self.read_line(&prompt)?;
        match default {
            Some(default) if answer.is_empty() => Some(default.to_string()),
            _ => Some(answer),
        }
    }

    fn choose(&self, title: &str, options: &[String], default: Option<&str>) -> Option<String> {
        println!("\n{}\n", title.bold());
        for (i, option) in options.iter().enumerate() {
            let marker = if Some(option.as_str()) == default { "*" } else { " " };
            println!("  {marker} [{}] {option}", i + 1);
        }

        let answer = self.read_line("\nSelect by number or name:")?;
        let answer = answer.trim();
        if answer.is_empty() {
            return default.map(str::to_string);
        }
        match answer.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => Some(options[n - 1].clone()),
            _ => Some(answer.to_string()),
        }
    }

    fn notify(&self, notice: Notice) {
        print_notice(&notice);
    }
}

/// Prints what the reconciler reports
#[derive(Debug, Default)]
pub struct TerminalView {
    /// Print only entries added since the last update
    incremental: bool,
    shown: usize,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// For rebuilds, where the listing grows one repository at a time
    pub fn incremental() -> Self {
        Self {
            incremental: true,
            shown: 0,
        }
    }
}

impl ViewObserver for TerminalView {
    fn listing_changed(&mut self, listing: &Listing) {
        let start = if self.incremental && self.shown <= listing.entries.len() {
            self.shown
        } else {
            0
        };
        if start == 0 {
            print_section_header(&format!("Repositories in {}", listing.base.display()));
            if listing.entries.is_empty() {
                println!("  {}", "no repositories".bright_black());
            }
        }

        for entry in &listing.entries[start..] {
            let selected = listing.selected.as_deref() == Some(entry.name.as_str());
            println!("{}", format_entry(entry, selected));
        }
        self.shown = listing.entries.len();
    }

    fn detail_changed(&mut self, detail: &RepoDetail) {
        print_section_header(&detail.path.display().to_string());
        println!("Branch: {}", detail.head.to_string().green());
        match &detail.last_commit {
            Some(commit) => println!("Last commit: {}", commit.describe(Utc::now())),
            None => println!("Last commit: {}", "- no commits yet -".bright_black()),
        }

        let headline = detail.summary.headline();
        let headline = if detail.summary.is_clean() {
            headline.green()
        } else if detail.summary.has_unstaged() {
            headline.red()
        } else {
            headline.yellow()
        };
        println!("\n{headline}");
        for change in &detail.changes {
            let staged = if change.staged { "+" } else { " " };
            println!(
                "  {staged} {}",
                format_change(change.status, &change.path.to_string_lossy())
            );
        }

        if !detail.branches.is_empty() {
            println!("\nBranches:");
            for branch in &detail.branches {
                if detail.head.branch_name() == Some(branch.as_str()) {
                    println!("  * {}", branch.green());
                } else {
                    println!("    {branch}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> TerminalPrompter {
        TerminalPrompter::from_reader(Box::new(Cursor::new(input.to_string())))
    }

    fn options() -> Vec<String> {
        vec!["main".to_string(), "topic".to_string()]
    }

    #[test]
    fn test_confirm_accepts_only_yes() {
        assert!(prompter("y\n").confirm("t", "m"));
        assert!(prompter("YES\n").confirm("t", "m"));
        assert!(!prompter("n\n").confirm("t", "m"));
        assert!(!prompter("\n").confirm("t", "m"));
        assert!(!prompter("").confirm("t", "m"));
    }

    #[test]
    fn test_ask_text_uses_default_on_empty_line() {
        assert_eq!(
            prompter("\n").ask_text("t", "p", Some("updated")).as_deref(),
            Some("updated")
        );
        assert_eq!(
            prompter("fix typo\n").ask_text("t", "p", Some("updated")).as_deref(),
            Some("fix typo")
        );
        assert_eq!(prompter("\n").ask_text("t", "p", None).as_deref(), Some(""));
        assert_eq!(prompter("").ask_text("t", "p", Some("updated")), None);
    }

    #[test]
    fn test_choose_by_index_or_name() {
        assert_eq!(prompter("2\n").choose("t", &options(), None).as_deref(), Some("topic"));
        assert_eq!(prompter("main\n").choose("t", &options(), None).as_deref(), Some("main"));
        assert_eq!(
            prompter("\n").choose("t", &options(), Some("topic")).as_deref(),
            Some("topic")
        );
        assert_eq!(prompter("\n").choose("t", &options(), None), None);
        assert_eq!(prompter("").choose("t", &options(), Some("main")), None);
        // out of range falls through as a name and is rejected by the caller
        assert_eq!(prompter("9\n").choose("t", &options(), None).as_deref(), Some("9"));
    }
}
