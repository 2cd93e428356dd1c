/*!
 * Interactive file selection
 *
 * The session alternates between asking for a search query and asking the
 * user to pick one entry from the resulting list, until "Done" is picked.
 */

use tracing::{debug, warn};

use crate::bail;
use crate::error::Result;
use crate::fuzzy::FuzzyIndex;
use crate::prompt::Prompter;
use crate::types::{CandidatePath, CandidateSet, Choice, Query};

const SEARCH_LABEL: &str = "Search files (leave empty to list all)";
const PICK_LABEL: &str = "Pick a file";

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Still accepting picks
    Selecting,
    /// "Done" was picked; the selection is final
    Finished,
}

/// Accumulates an ordered, duplicate-free selection of candidates
pub struct SelectionSession<'a> {
    candidates: &'a CandidateSet,
    index: &'a FuzzyIndex,
    selection: Vec<CandidatePath>,
    state: SessionState,
}

impl<'a> SelectionSession<'a> {
    /// Start an empty session over `candidates`
    pub fn new(candidates: &'a CandidateSet, index: &'a FuzzyIndex) -> Self {
        Self {
            candidates,
            index,
            selection: Vec::new(),
            state: SessionState::Selecting,
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Files picked so far, in pick order
    pub fn selection(&self) -> &[CandidatePath] {
        &self.selection
    }

    /// Entries offered for a query
    ///
    /// An empty query lists "Done" followed by every candidate; a text
    /// query lists the fuzzy matches, best first.
    pub fn choices_for(&self, query: &Query) -> Vec<Choice> {
        match query {
            Query::Empty => std::iter::once(Choice::Done)
                .chain(self.candidates.iter().cloned().map(Choice::File))
                .collect(),
            Query::Text(text) => self
                .index
                .search(text)
                .into_iter()
                .map(|m| Choice::File(m.path))
                .collect(),
        }
    }

    /// Apply one pick to the session
    pub fn select(&mut self, choice: Choice) -> SessionState {
        if self.state == SessionState::Finished {
            return self.state;
        }

        match choice {
            Choice::Done => {
                debug!(files = self.selection.len(), "Selection finished");
                self.state = SessionState::Finished;
            }
            Choice::File(path) => {
                if !self.candidates.contains(&path) {
                    warn!("Ignoring {}: not among the scanned files", path);
                } else if self.selection.contains(&path) {
                    debug!("{} already selected", path);
                } else {
                    debug!("Selected {}", path);
                    self.selection.push(path);
                }
            }
        }

        self.state
    }

    /// Drive the session with `prompter` until "Done" is picked
    pub fn run<P: Prompter>(mut self, prompter: &mut P) -> Result<Vec<CandidatePath>> {
        while self.state == SessionState::Selecting {
            let label = if self.selection.is_empty() {
                SEARCH_LABEL.to_string()
            } else {
                format!("{} [{} selected]", SEARCH_LABEL, self.selection.len())
            };

            let query = Query::parse(&prompter.input(&label, true)?);
            let mut choices = self.choices_for(&query);

            if choices.is_empty() {
                warn!("No files match {:?}", query);
                continue;
            }

            let labels: Vec<String> = choices.iter().map(Choice::to_string).collect();
            let picked = prompter.choose(PICK_LABEL, &labels)?;
            if picked >= choices.len() {
                bail!(InvalidArgument, "Choice {} is out of range", picked);
            }

            self.select(choices.swap_remove(picked));
        }

        Ok(self.selection)
    }
}
