use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

/// Immutable search configuration, consumed once per run. Search and veto
/// terms are stored pre-encoded for the arXiv query grammar (`%22` quotes,
/// `+` spaces, `*` wildcards); the expression tree inserts them verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub title: String,
    pub queries: Vec<String>,
    pub vetoes: Vec<String>,
    pub categories: Vec<String>,
}

impl RunConfig {
    pub fn default() -> Self {
        RunConfig {
            title: String::from("Heavy Flavour and Exotic Hadron Papers"),
            queries: vec![
                String::from("quarkoni*"),
                String::from("charmoni*"),
                String::from("bottomoni*"),
                String::from("tetra*quark*"),
                String::from("penta*quark*"),
                String::from("%22exotic+hadron*%22"),
                String::from("%22heavy+quark*%22"),
                String::from("%22heavy+flavo*r%22"),
                String::from("B_*c"),
                String::from("%22doubl*+bottom%22"),
                String::from("%22doubl*+beauty%22"),
                String::from("%22doubl*+charm%22"),
                String::from("%22bottom+spectr*%22"),
                String::from("%22beauty+spectr*%22"),
                String::from("%22charm+spectr*%22"),
                String::from("P_*c"),
            ],
            vetoes: vec![
                String::from("Higgs"),
                String::from("boson"),
            ],
            categories: vec![
                String::from("hep-ex"),
                String::from("hep-lat"),
                String::from("hep-ph"),
                String::from("hep-th"),
                String::from("nucl-ex"),
                String::from("nucl-th"),
            ],
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    // A missing required key is a schema error, fatal before any fetch.
    fn parse(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|e| Error::MissingConfiguration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let text = r#"{
            "title": "Digest",
            "queries": ["quark*"],
            "vetoes": [],
            "categories": ["hep-ex"]
        }"#;
        let config = RunConfig::parse(text).unwrap();
        assert_eq!(config.title, "Digest");
        assert_eq!(config.queries, vec!["quark*"]);
        assert!(config.vetoes.is_empty());
        assert_eq!(config.categories, vec!["hep-ex"]);
    }

    #[test]
    fn test_missing_key_is_fatal() {
        let text = r#"{"title": "Digest", "queries": [], "vetoes": []}"#;
        let err = RunConfig::parse(text).unwrap_err();
        assert!(matches!(err, Error::MissingConfiguration(_)));
    }
}
