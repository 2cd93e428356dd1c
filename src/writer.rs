/*!
 * Markdown document assembly for wpr
 */

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::error::{Result, WprError};
use crate::types::CandidatePath;

/// Longest filename stem produced by `derive_filename`
pub const MAX_FILENAME_LEN: usize = 50;

/// Stem used when the prompt has no usable characters
pub const FALLBACK_FILENAME: &str = "prompt";

static SEPARATOR_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Turn a prompt into a filesystem-friendly filename stem
pub fn derive_filename(prompt: &str) -> String {
    let lowered = prompt.to_lowercase();
    let dashed = SEPARATOR_RUN.replace_all(&lowered, "-");
    let trimmed = dashed.trim_matches('-');

    // Only ASCII survives the regex, so byte and char positions agree
    let truncated = &trimmed[..trimmed.len().min(MAX_FILENAME_LEN)];
    let stem = truncated.trim_end_matches('-');

    if stem.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        stem.to_string()
    }
}

/// Per-file figures gathered during assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStats {
    /// Relative path of the embedded file
    pub path: CandidatePath,
    /// Number of lines
    pub lines: usize,
    /// Number of characters
    pub chars: usize,
    /// Size in bytes
    pub bytes: u64,
}

/// A fully rendered document, not yet written
#[derive(Debug, Clone)]
pub struct Document {
    /// Filename stem derived from the prompt
    pub name: String,
    /// Rendered Markdown
    pub content: String,
    /// Figures for each embedded file, in document order
    pub files: Vec<FileStats>,
}

/// Builds documents from a prompt and a selection and writes them under the output directory
pub struct DocumentWriter {
    /// Directory selected paths are relative to
    root: PathBuf,
    /// Directory documents are written to
    output_dir: PathBuf,
}

impl DocumentWriter {
    /// Create a new document writer
    pub fn new(root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Read every selected file and render the document
    ///
    /// Fails on the first file that cannot be read; nothing is rendered in
    /// that case.
    pub fn build(&self, prompt: &str, selection: &[CandidatePath]) -> Result<Document> {
        let mut content = String::new();
        let mut files = Vec::with_capacity(selection.len());

        content.push_str("# Prompt\n\n");
        content.push_str(prompt);
        content.push_str("\n\n# Files\n");

        for path in selection {
            let text = fs::read_to_string(path.resolve(&self.root)).map_err(|source| {
                WprError::Read {
                    path: PathBuf::from(path.as_str()),
                    source,
                }
            })?;

            debug!(path = %path, bytes = text.len(), "Embedding file");
            write_file_section(&mut content, path, &text);

            files.push(FileStats {
                path: path.clone(),
                lines: text.lines().count(),
                chars: text.chars().count(),
                bytes: text.len() as u64,
            });
        }

        Ok(Document {
            name: derive_filename(prompt),
            content,
            files,
        })
    }

    /// Path the document will be written to
    pub fn output_path(&self, document: &Document) -> PathBuf {
        self.output_dir.join(format!("{}.md", document.name))
    }

    /// Write the document, replacing any previous one with the same name
    ///
    /// The content goes to a temporary sibling first and is renamed into
    /// place, so a failed write never leaves a partial document behind.
    pub fn write(&self, document: &Document) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).map_err(|source| WprError::Write {
            path: self.output_dir.clone(),
            source,
        })?;

        let target = self.output_path(document);
        let staging = self.output_dir.join(format!(".{}.md.tmp", document.name));

        if let Err(source) = fs::write(&staging, &document.content) {
            let _ = fs::remove_file(&staging);
            return Err(WprError::Write {
                path: staging,
                source,
            });
        }

        fs::rename(&staging, &target).map_err(|source| {
            let _ = fs::remove_file(&staging);
            WprError::Write {
                path: target.clone(),
                source,
            }
        })?;

        info!("Wrote {}", target.display());
        Ok(target)
    }
}

fn write_file_section(out: &mut String, path: &CandidatePath, text: &str) {
    let fence = "`".repeat(longest_backtick_run(text).max(2) + 1);

    let _ = write!(out, "\n## {}\n\n{}\n", path, fence);
    out.push_str(text);
    if !text.is_empty() && !text.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&fence);
    out.push('\n');
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c: char| c != '`').map(str::len).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn filename_collapses_punctuation() {
        assert_eq!(derive_filename("Hello, World!!!"), "hello-world");
        assert_eq!(derive_filename("  Fix the   parser  "), "fix-the-parser");
        assert_eq!(derive_filename("v2.0 release notes"), "v2-0-release-notes");
    }

    #[test]
    fn filename_falls_back_when_nothing_is_left() {
        assert_eq!(derive_filename("   "), "prompt");
        assert_eq!(derive_filename(""), "prompt");
        assert_eq!(derive_filename("?!#"), "prompt");
    }

    #[test]
    fn filename_is_truncated_without_trailing_dash() {
        let long = "a".repeat(200);
        let name = derive_filename(&long);
        assert_eq!(name.len(), MAX_FILENAME_LEN);
        assert!(!name.ends_with('-'));

        // Cut lands right after a separator
        let words = format!("{} tail", "b".repeat(49));
        let name = derive_filename(&words);
        assert_eq!(name, "b".repeat(49));
    }

    #[test]
    fn filename_is_deterministic() {
        let prompt = "Refactor the Scanner: keep order!";
        assert_eq!(derive_filename(prompt), derive_filename(prompt));
    }

    #[test]
    fn document_embeds_prompt_and_files_verbatim() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "line one\nline two").unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/b.rs"), "fn b() {}\n").unwrap();

        let writer = DocumentWriter::new(dir.path(), dir.path().join("wpr"));
        let selection = vec![CandidatePath::from("src/b.rs"), CandidatePath::from("a.txt")];
        let doc = writer.build("Explain this", &selection).unwrap();

        assert_eq!(doc.name, "explain-this");
        assert_eq!(
            doc.content,
            "# Prompt\n\nExplain this\n\n# Files\n\
             \n## src/b.rs\n\n```\nfn b() {}\n```\n\
             \n## a.txt\n\n```\nline one\nline two\n```\n"
        );
        assert_eq!(doc.files.len(), 2);
        assert_eq!(doc.files[1].lines, 2);
        assert_eq!(doc.files[1].chars, 17);
    }

    #[test]
    fn fence_outgrows_backticks_in_content() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "```rust\nlet x = 1;\n```\n").unwrap();

        let writer = DocumentWriter::new(dir.path(), dir.path().join("wpr"));
        let doc = writer
            .build("p", &[CandidatePath::from("README.md")])
            .unwrap();

        assert!(doc
            .content
            .contains("````\n```rust\nlet x = 1;\n```\n````\n"));
    }

    #[test]
    fn missing_file_aborts_assembly() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();

        let writer = DocumentWriter::new(dir.path(), dir.path().join("wpr"));
        let selection = vec![CandidatePath::from("a.txt"), CandidatePath::from("gone.txt")];

        match writer.build("p", &selection) {
            Err(WprError::Read { path, .. }) => assert_eq!(path, PathBuf::from("gone.txt")),
            other => panic!("expected Read error, got {:?}", other),
        }
    }

    #[test]
    fn write_creates_directory_and_overwrites() {
        let dir = tempdir().unwrap();
        let writer = DocumentWriter::new(dir.path(), dir.path().join("wpr"));

        let first = writer.build("Same name", &[]).unwrap();
        let path = writer.write(&first).unwrap();
        assert_eq!(path, dir.path().join("wpr").join("same-name.md"));

        let mut second = first.clone();
        second.content = "# Prompt\n\nreplaced\n".to_string();
        writer.write(&second).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), second.content);
        let leftovers: Vec<_> = fs::read_dir(dir.path().join("wpr"))
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn blocked_output_directory_is_a_write_error() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("wpr");
        fs::write(&output_dir, "not a directory").unwrap();

        let writer = DocumentWriter::new(dir.path(), &output_dir);
        let doc = writer.build("Blocked", &[]).unwrap();

        match writer.write(&doc) {
            Err(WprError::Write { path, .. }) => assert_eq!(path, output_dir),
            other => panic!("expected Write error, got {:?}", other),
        }

        // Nothing but the original entries is left behind
        assert_eq!(fs::read_to_string(&output_dir).unwrap(), "not a directory");
        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["wpr".to_string()]);
    }

    #[test]
    fn empty_selection_keeps_prompt_section() {
        let dir = tempdir().unwrap();
        let writer = DocumentWriter::new(dir.path(), dir.path().join("wpr"));
        let doc = writer.build("Just a question", &[]).unwrap();
        assert_eq!(doc.content, "# Prompt\n\nJust a question\n\n# Files\n");
        assert!(doc.files.is_empty());
    }
}
