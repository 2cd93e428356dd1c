/*!
 * Fuzzy search over candidate paths
 *
 * A query matches a path when it is within a small number of edits of some
 * contiguous part of that path. Edits are insertions, deletions,
 * substitutions and transpositions; the match cost is the fewest edits
 * needed, and lower is better. Matching ignores case.
 */

use tracing::debug;

use crate::types::{CandidatePath, CandidateSet};

/// Tuning knobs for fuzzy matching
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyOptions {
    /// Allowed edits per query character; the budget is `floor(len * threshold)`
    pub threshold: f64,
    /// Furthest apart two swapped characters may be and still cost one edit (0 disables)
    pub max_transposition: usize,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self {
            threshold: 0.34,
            max_transposition: 2,
        }
    }
}

impl FuzzyOptions {
    /// Maximum match cost accepted for a query of `query_len` characters
    pub fn budget(&self, query_len: usize) -> usize {
        (query_len as f64 * self.threshold.max(0.0)).floor() as usize
    }
}

/// A candidate that matched a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    /// The matching path
    pub path: CandidatePath,
    /// Number of edits needed; lower is better
    pub cost: usize,
}

/// Searchable index over a candidate set
pub struct FuzzyIndex {
    entries: Vec<(CandidatePath, Vec<char>)>,
    options: FuzzyOptions,
}

impl FuzzyIndex {
    /// Build an index over `candidates`, keeping their order for tie-breaking
    pub fn new(candidates: &CandidateSet, options: FuzzyOptions) -> Self {
        let entries = candidates
            .iter()
            .map(|path| (path.clone(), fold(path.as_str())))
            .collect();

        Self { entries, options }
    }

    /// Number of indexed candidates
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no candidates
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return every candidate within budget, best match first
    ///
    /// Candidates with equal cost keep their original order.
    pub fn search(&self, query: &str) -> Vec<FuzzyMatch> {
        let query = fold(query);
        let budget = self.options.budget(query.len());

        let mut matches: Vec<FuzzyMatch> = self
            .entries
            .iter()
            .filter_map(|(path, text)| {
                let cost = substring_distance(&query, text, self.options.max_transposition);
                (cost <= budget).then(|| FuzzyMatch {
                    path: path.clone(),
                    cost,
                })
            })
            .collect();

        // sort_by_key is stable, so ties stay in candidate order
        matches.sort_by_key(|m| m.cost);

        debug!(
            query_len = query.len(),
            budget,
            matched = matches.len(),
            "Fuzzy search"
        );

        matches
    }
}

fn fold(text: &str) -> Vec<char> {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Fewest edits turning `query` into some contiguous slice of `text`
///
/// `d[i][j]` is the cost of aligning the first `i` query characters with a
/// slice of `text` ending at `j`. Row zero is all zeros since the slice may
/// start anywhere.
fn substring_distance(query: &[char], text: &[char], max_transposition: usize) -> usize {
    let m = query.len();
    let n = text.len();
    if m == 0 {
        return 0;
    }

    let width = n + 1;
    let mut d = vec![0usize; (m + 1) * width];
    for i in 1..=m {
        d[i * width] = i;
    }

    for i in 1..=m {
        for j in 1..=n {
            let substitution = usize::from(query[i - 1] != text[j - 1]);
            let mut best = (d[(i - 1) * width + j - 1] + substitution)
                .min(d[(i - 1) * width + j] + 1)
                .min(d[i * width + j - 1] + 1);

            // Swap of query[i-1-gap] and query[i-1] with the characters
            // between them unchanged
            for gap in 1..=max_transposition {
                if i <= gap || j <= gap {
                    break;
                }
                if query[i - 1] == text[j - 1 - gap]
                    && query[i - 1 - gap] == text[j - 1]
                    && query[i - gap..i - 1] == text[j - gap..j - 1]
                {
                    best = best.min(d[(i - 1 - gap) * width + j - 1 - gap] + 1);
                }
            }

            d[i * width + j] = best;
        }
    }

    (0..=n).map(|j| d[m * width + j]).min().unwrap_or(m)
}
