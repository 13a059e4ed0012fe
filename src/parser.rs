use std::sync::LazyLock;

use chrono::NaiveDateTime;
use quick_xml::de::from_str;
use regex::Regex;
use serde::Deserialize;

use crate::config::RunConfig;
use crate::error::Error;
use crate::model::{ArxivEntry, ResultSet};
use crate::query::{compile, Axis, DateWindow};

const ARXIV_API: &str = "https://export.arxiv.org/api/query";

// Fixed result cap per axis; there is no pagination.
const MAX_RESULTS: u32 = 10;

/// Fetches and normalizes both axes of one search run.
#[derive(Debug)]
pub struct ArxivFetcher {
    config: RunConfig,
    window: DateWindow,
}

impl ArxivFetcher {
    pub fn new(config: RunConfig, window: DateWindow) -> Self {
        ArxivFetcher { config, window }
    }

    fn query_url(&self, axis: Axis) -> Result<String, Error> {
        let query = compile(&self.config, axis, &self.window)?;
        Ok(format!(
            "{}?search_query={}&max_results={}&sortBy={}&sortOrder=descending",
            ARXIV_API,
            query,
            MAX_RESULTS,
            axis.date_field()
        ))
    }

    fn fetch_axis(&self, axis: Axis) -> Result<Vec<ArxivEntry>, Error> {
        let url = self.query_url(axis)?;
        let response = reqwest::blocking::get(url)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::ExternalFetchFailed(status.as_u16()));
        }
        let body = response.text()?;
        let feed: Feed = from_str(&body)?;
        feed.entries.into_iter().map(parse_entry).collect()
    }

    /// Runs both axes and removes freshly-submitted papers from the updated
    /// list. The first failure aborts the run; no partial results.
    pub fn fetch(&self) -> Result<ResultSet, Error> {
        let mut results = ResultSet {
            submitted: self.fetch_axis(Axis::Submitted)?,
            last_updated: self.fetch_axis(Axis::LastUpdated)?,
        };
        results.dedupe();
        Ok(results)
    }
}

// Atom feed model. An entry missing any required field fails
// deserialization outright; no partial records are emitted.

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(default, rename = "entry")]
    entries: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    title: String,
    summary: String,
    published: String,
    updated: String,
    id: String,
    #[serde(rename = "author")]
    authors: Vec<RawAuthor>,
    #[serde(default, rename = "category")]
    categories: Vec<RawCategory>,
}

#[derive(Debug, Deserialize)]
struct RawAuthor {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    #[serde(rename = "@term")]
    term: String,
}

fn parse_entry(raw: RawEntry) -> Result<ArxivEntry, Error> {
    let (arxiv_id, link) = split_link(&raw.id)?;
    Ok(ArxivEntry {
        title: normalize_whitespace(&raw.title),
        authors: raw
            .authors
            .iter()
            .map(|author| normalize_whitespace(&author.name))
            .collect(),
        abstract_text: normalize_whitespace(&raw.summary),
        submitted: format_timestamp(&raw.published)?,
        updated: format_timestamp(&raw.updated)?,
        arxiv_id,
        link,
        categories: raw.categories.into_iter().map(|c| c.term).collect(),
    })
}

static LEADING_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s+").unwrap());
static NEWLINE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*").unwrap());

// arXiv wraps titles and abstracts across indented lines; collapse each
// newline run to a single space.
fn normalize_whitespace(text: &str) -> String {
    let stripped = LEADING_WHITESPACE.replace(text, "");
    NEWLINE_RUN.replace_all(&stripped, " ").into_owned()
}

fn format_timestamp(raw: &str) -> Result<String, Error> {
    let parsed = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%SZ")
        .map_err(|_| Error::MalformedTimestamp(raw.to_string()))?;
    Ok(parsed.format("%Y %B %d").to_string())
}

static ABS_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^/]+/abs/([0-9]{4}\.[0-9]{4,5})").unwrap());

// The entry id is the canonical abstract URL; the short identifier is its
// tail. Anything past the identifier (a version suffix) is discarded.
fn split_link(url: &str) -> Result<(String, String), Error> {
    let caps = ABS_LINK
        .captures(url)
        .ok_or_else(|| Error::InvalidLinkFormat(url.to_string()))?;
    Ok((caps[1].to_string(), caps[0].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_normalization() {
        assert_eq!(
            normalize_whitespace("  Title\n   spanning\n lines"),
            "Title spanning lines"
        );
        assert_eq!(normalize_whitespace("already flat"), "already flat");
    }

    #[test]
    fn test_timestamp_reformatting() {
        assert_eq!(
            format_timestamp("2024-03-07T11:22:33Z").unwrap(),
            "2024 March 07"
        );
    }

    #[test]
    fn test_timestamp_rejects_other_shapes() {
        for raw in ["2024-03-07 11:22:33", "2024-03-07T11:22:33+00:00", "yesterday"] {
            assert!(matches!(
                format_timestamp(raw),
                Err(Error::MalformedTimestamp(_))
            ));
        }
    }

    #[test]
    fn test_link_extraction_discards_version() {
        let (id, link) = split_link("https://example.org/abs/2401.12345v2").unwrap();
        assert_eq!(id, "2401.12345");
        assert_eq!(link, "https://example.org/abs/2401.12345");
    }

    #[test]
    fn test_link_rejects_non_abs_urls() {
        let err = split_link("https://example.org/pdf/2401.12345").unwrap_err();
        assert!(matches!(err, Error::InvalidLinkFormat(_)));
    }

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query Results</title>
  <entry>
    <id>http://arxiv.org/abs/2401.12345v2</id>
    <updated>2024-03-08T17:00:00Z</updated>
    <published>2024-03-07T18:30:00Z</published>
    <title>Observation of a new
   tetraquark candidate</title>
    <summary>  We report
   an observation.</summary>
    <author>
      <name>Jane Doe</name>
    </author>
    <author>
      <name>John Roe</name>
    </author>
    <link href="http://arxiv.org/abs/2401.12345v2" rel="alternate" type="text/html"/>
    <category term="hep-ex" scheme="http://arxiv.org/schemas/atom"/>
    <category term="hep-ph" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
</feed>"#;

    #[test]
    fn test_entry_parsing() {
        let feed: Feed = from_str(FEED).unwrap();
        assert_eq!(feed.entries.len(), 1);
        let entry = parse_entry(feed.entries.into_iter().next().unwrap()).unwrap();
        assert_eq!(entry.title, "Observation of a new tetraquark candidate");
        assert_eq!(entry.authors, vec!["Jane Doe", "John Roe"]);
        assert_eq!(entry.abstract_text, "We report an observation.");
        assert_eq!(entry.submitted, "2024 March 07");
        assert_eq!(entry.updated, "2024 March 08");
        assert_eq!(entry.arxiv_id, "2401.12345");
        assert_eq!(entry.link, "http://arxiv.org/abs/2401.12345");
        assert_eq!(entry.categories, vec!["hep-ex", "hep-ph"]);
    }

    #[test]
    fn test_missing_field_is_fatal() {
        let feed = FEED.replace("<summary>  We report\n   an observation.</summary>", "");
        assert!(from_str::<Feed>(&feed).is_err());
    }

    #[test]
    fn test_empty_feed_has_no_entries() {
        let feed: Feed =
            from_str(r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>none</title></feed>"#)
                .unwrap();
        assert!(feed.entries.is_empty());
    }

    const SUBMITTED_URL: &str = concat!(
        "https://export.arxiv.org/api/query?search_query=",
        "%28%28%28ti:quark*%29+OR+%28abs:quark*%29%29",
        "+ANDNOT+%28ti:Higgs+OR+abs:Higgs%29%29",
        "+AND+%28cat:hep-ex%29",
        "+AND+submittedDate:[202401050000+TO+202401072359]",
        "&max_results=10&sortBy=submittedDate&sortOrder=descending"
    );

    #[test]
    fn test_url_generation() {
        let config = RunConfig {
            title: String::from("Digest"),
            queries: vec![String::from("quark*")],
            vetoes: vec![String::from("Higgs")],
            categories: vec![String::from("hep-ex")],
        };
        let window = DateWindow::new("2024-01-05", "2024-01-07").unwrap();
        let fetcher = ArxivFetcher::new(config, window);
        let url = fetcher.query_url(Axis::Submitted).unwrap();
        assert_eq!(url, SUBMITTED_URL, "URL improperly formatted");
        let updated = fetcher.query_url(Axis::LastUpdated).unwrap();
        assert!(updated.contains("sortBy=lastUpdatedDate"));
    }
}
