//! The person running the sync
//!
//! Progress output and every yes/no decision go through [`Operator`], so the
//! engine never touches a terminal itself.

use std::collections::VecDeque;

use crate::error::Result;
use crate::existing::ExistingMatch;
use crate::merge::ChangeSet;

/// Interactive capabilities the engine needs from its caller.
pub trait Operator {
    /// Report a phase or per-component progress line.
    fn progress(&mut self, message: &str);

    /// Ask whether an unresolved component is the given declared package.
    fn confirm_match(&mut self, candidate: &ExistingMatch) -> Result<bool>;

    /// Show the proposed changes and ask whether to write them.
    fn confirm_changes(&mut self, changes: &ChangeSet) -> Result<bool>;
}

/// An operator with canned answers, for tests and non-interactive runs.
///
/// Match answers are consumed in order; once they run out every further
/// match is declined.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOperator {
    match_answers: VecDeque<bool>,
    approve_changes: bool,
    messages: Vec<String>,
    asked_matches: Vec<String>,
    shown_changes: Option<ChangeSet>,
}

impl ScriptedOperator {
    /// An operator that declines everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// An operator that approves the change set and declines every match.
    pub fn approving() -> Self {
        Self::new().approve_changes(true)
    }

    pub fn approve_changes(mut self, approve: bool) -> Self {
        self.approve_changes = approve;
        self
    }

    pub fn answer_match(mut self, answer: bool) -> Self {
        self.match_answers.push_back(answer);
        self
    }

    /// Progress lines received so far.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Packages proposed through [`Operator::confirm_match`], in order.
    pub fn asked_matches(&self) -> &[String] {
        &self.asked_matches
    }

    /// The change set last presented for confirmation.
    pub fn shown_changes(&self) -> Option<&ChangeSet> {
        self.shown_changes.as_ref()
    }
}

impl Operator for ScriptedOperator {
    fn progress(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn confirm_match(&mut self, candidate: &ExistingMatch) -> Result<bool> {
        self.asked_matches.push(candidate.package.clone());
        Ok(self.match_answers.pop_front().unwrap_or(false))
    }

    fn confirm_changes(&mut self, changes: &ChangeSet) -> Result<bool> {
        self.shown_changes = Some(changes.clone());
        Ok(self.approve_changes)
    }
}
