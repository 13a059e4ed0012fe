use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// One fetched paper, fully normalized: single-line title and abstract,
/// human-readable dates, short identifier plus canonical abstract link.
/// Built once by the parser, optionally author-truncated, then rendered.
#[derive(Debug, Clone, Serialize)]
pub struct ArxivEntry {
    pub title: String,
    pub authors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub submitted: String,
    pub updated: String,
    #[serde(rename = "arxivID")]
    pub arxiv_id: String,
    pub link: String,
    pub categories: Vec<String>,
}

static COLLABORATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w ]+Collaboration").unwrap());

impl ArxivEntry {
    /// Collapses author lists longer than ten entries to a single credit:
    /// the collaboration name when the first author is one, otherwise
    /// "<first author> et. al.".
    pub fn truncate_authors(&mut self) {
        if self.authors.len() <= 10 {
            return;
        }
        let first = self.authors[0].clone();
        if COLLABORATION.is_match(&first) {
            self.authors = vec![first];
        } else {
            self.authors = vec![format!("{} et. al.", first)];
        }
    }
}

/// Both axes of one run, in the API's requested order (newest first).
/// After `dedupe` no identifier appears in both lists.
#[derive(Debug, Serialize)]
pub struct ResultSet {
    pub submitted: Vec<ArxivEntry>,
    #[serde(rename = "lastUpdated")]
    pub last_updated: Vec<ArxivEntry>,
}

impl ResultSet {
    /// A paper both submitted and revised in the window counts as newly
    /// submitted: drop it from the updated list. Order is preserved and the
    /// operation is idempotent.
    pub fn dedupe(&mut self) {
        let submitted: HashSet<&str> = self
            .submitted
            .iter()
            .map(|entry| entry.arxiv_id.as_str())
            .collect();
        self.last_updated
            .retain(|entry| !submitted.contains(entry.arxiv_id.as_str()));
    }
}
