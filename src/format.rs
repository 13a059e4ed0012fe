use crate::model::{ArxivEntry, ResultSet};

// Markdown digest for the deduplicated result set.
pub struct Formatter;

impl Formatter {
    pub fn to_report(title: &str, results: &ResultSet) -> String {
        let mut out = format!("# {}\n\n", title);
        Self::section(&mut out, "Newly Submitted", &results.submitted);
        Self::section(&mut out, "Recently Updated", &results.last_updated);
        out
    }

    fn section(out: &mut String, heading: &str, entries: &[ArxivEntry]) {
        out.push_str(&format!("## {}\n\n", heading));
        if entries.is_empty() {
            out.push_str("No papers in this window.\n\n");
            return;
        }
        for entry in entries {
            out.push_str(&Self::subsection(entry));
        }
    }

    fn subsection(entry: &ArxivEntry) -> String {
        format!(
            concat!(
                "### {}\n\n",
                "| | |\n",
                "|---|---|\n",
                "| Authors | {} |\n",
                "| arXiv ID | [{}]({}) |\n",
                "| Submitted | {} |\n",
                "| Updated | {} |\n",
                "| Categories | {} |\n",
                "\n{}\n\n"
            ),
            entry.title,
            entry.authors.join(", "),
            entry.arxiv_id,
            entry.link,
            entry.submitted,
            entry.updated,
            entry.categories.join(", "),
            entry.abstract_text
        )
    }
}
