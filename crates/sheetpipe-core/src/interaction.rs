//! User-facing seam of a run: previews and confirmations.

use polars::prelude::DataFrame;

/// Reply to a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    /// Stop the whole run.
    Abort,
}

impl Answer {
    /// `y`, `n` or `a`, case-insensitive; anything else is `None`.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "y" => Some(Answer::Yes),
            "n" => Some(Answer::No),
            "a" => Some(Answer::Abort),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    /// Asked before column cleanup; `No` loads the data as fetched.
    PerformCleanup,
    /// Asked after cleanup; `No` skips the load.
    PushToDatabase,
}

impl Question {
    pub fn prompt(self) -> &'static str {
        match self {
            Question::PerformCleanup => "Would you like to perform cleanup? (y/n/a): ",
            Question::PushToDatabase => "Would you like to push to the database? (y/n/a): ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preview {
    BeforeCleanup,
    AfterCleanup,
}

impl Preview {
    pub fn title(self) -> &'static str {
        match self {
            Preview::BeforeCleanup => "PRE-CLEANING PREVIEW",
            Preview::AfterCleanup => "POST-CLEANING PREVIEW",
        }
    }
}

/// Shows datasets and collects answers on behalf of the pipeline.
pub trait Interaction {
    fn preview(&mut self, stage: Preview, df: &DataFrame);

    fn confirm(&mut self, question: Question) -> Answer;
}

/// Interaction for unattended runs: previews are dropped and every
/// question is answered `Yes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unattended;

impl Interaction for Unattended {
    fn preview(&mut self, _stage: Preview, _df: &DataFrame) {}

    fn confirm(&mut self, _question: Question) -> Answer {
        Answer::Yes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_letter_answers() {
        assert_eq!(Answer::parse("Y\n"), Some(Answer::Yes));
        assert_eq!(Answer::parse(" n "), Some(Answer::No));
        assert_eq!(Answer::parse("a"), Some(Answer::Abort));
        assert_eq!(Answer::parse("yes"), None);
        assert_eq!(Answer::parse(""), None);
    }
}
