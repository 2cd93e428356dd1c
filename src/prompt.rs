/*!
 * User interaction boundary
 *
 * The selection loop only ever asks for two things: pick one entry from a
 * list, or type one line of text. `Prompter` captures exactly that so the
 * loop can run against a terminal or a script.
 */

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

use crate::error::Result;

/// Request/response capability used by the selection session
pub trait Prompter {
    /// Offer `items` in order and return the index of the one chosen
    fn choose(&mut self, label: &str, items: &[String]) -> Result<usize>;

    /// Ask for one line of free text
    fn input(&mut self, label: &str, allow_empty: bool) -> Result<String>;
}

/// Prompter backed by an interactive terminal
pub struct TerminalPrompter {
    theme: ColorfulTheme,
    page_size: usize,
}

impl TerminalPrompter {
    /// Create a terminal prompter showing `page_size` list entries at once
    pub fn new(page_size: usize) -> Self {
        Self {
            theme: ColorfulTheme::default(),
            page_size,
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new(15)
    }
}

impl Prompter for TerminalPrompter {
    fn choose(&mut self, label: &str, items: &[String]) -> Result<usize> {
        let index = Select::with_theme(&self.theme)
            .with_prompt(label)
            .items(items)
            .default(0)
            .max_length(self.page_size)
            .interact()?;
        Ok(index)
    }

    fn input(&mut self, label: &str, allow_empty: bool) -> Result<String> {
        let text = Input::<String>::with_theme(&self.theme)
            .with_prompt(label)
            .allow_empty(allow_empty)
            .interact_text()?;
        Ok(text)
    }
}

/// Prompter that replays canned answers, for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedPrompter {
    steps: std::collections::VecDeque<Step>,
    /// Every list offered through `choose`, in order
    pub offered: Vec<Vec<String>>,
}

#[cfg(test)]
#[derive(Debug)]
enum Step {
    Text(String),
    Pick(String),
}

#[cfg(test)]
impl ScriptedPrompter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue a line of text for the next `input` call
    pub(crate) fn text(mut self, text: &str) -> Self {
        self.steps.push_back(Step::Text(text.to_string()));
        self
    }

    /// Queue the label to pick on the next `choose` call
    pub(crate) fn pick(mut self, label: &str) -> Self {
        self.steps.push_back(Step::Pick(label.to_string()));
        self
    }

    /// Whether every queued answer was consumed
    pub(crate) fn is_exhausted(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn choose(&mut self, label: &str, items: &[String]) -> Result<usize> {
        self.offered.push(items.to_vec());
        match self.steps.pop_front() {
            Some(Step::Pick(wanted)) => {
                items.iter().position(|item| *item == wanted).ok_or_else(|| {
                    crate::error!(InvalidArgument, "{:?} not offered for {}", wanted, label)
                })
            }
            other => Err(crate::error!(
                InvalidArgument,
                "expected a pick for {}, script has {:?}",
                label,
                other
            )),
        }
    }

    fn input(&mut self, label: &str, _allow_empty: bool) -> Result<String> {
        match self.steps.pop_front() {
            Some(Step::Text(text)) => Ok(text),
            other => Err(crate::error!(
                InvalidArgument,
                "expected text for {}, script has {:?}",
                label,
                other
            )),
        }
    }
}
