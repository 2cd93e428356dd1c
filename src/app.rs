/*!
 * The bundling pipeline: scan, select, prompt, assemble, write
 */

use std::sync::Arc;
use std::time::Instant;

use indicatif::ProgressBar;
use tracing::{debug, warn};

use crate::config::{load_rules, Config};
use crate::error::Result;
use crate::fuzzy::FuzzyIndex;
use crate::prompt::Prompter;
use crate::report::BundleReport;
use crate::scanner::Scanner;
use crate::session::SelectionSession;
use crate::writer::DocumentWriter;

const PROMPT_LABEL: &str = "Prompt";

/// Run one interactive bundling session against `config.target_dir`
///
/// The spinner is finished before the first question is asked.
pub fn bundle<P: Prompter>(
    config: &Config,
    prompter: &mut P,
    progress: Arc<ProgressBar>,
) -> Result<BundleReport> {
    let start_time = Instant::now();

    let rules = load_rules(&config.rules_path())?;

    let mut scanner = Scanner::new(&config.target_dir, rules, Arc::clone(&progress));
    let candidates = scanner.scan()?;
    progress.finish_and_clear();

    if candidates.is_empty() {
        warn!(
            "No eligible files under {}; check wpr.conf",
            config.target_dir.display()
        );
    }

    let index = FuzzyIndex::new(&candidates, config.fuzzy);
    let selection = SelectionSession::new(&candidates, &index).run(prompter)?;
    if selection.is_empty() {
        warn!("No files selected; the document will only contain the prompt");
    }

    let prompt = prompter.input(PROMPT_LABEL, true)?;
    debug!(files = selection.len(), "Assembling document");

    let writer = DocumentWriter::new(&config.target_dir, config.output_dir());
    let document = writer.build(&prompt, &selection)?;
    let output = writer.write(&document)?;

    Ok(BundleReport {
        output_file: output.display().to_string(),
        duration: start_time.elapsed(),
        candidates: candidates.len(),
        document_bytes: document.content.len() as u64,
        files: document.files,
    })
}
