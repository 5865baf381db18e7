//! Citation-related metadata

use crate::keys::{CitationKey, Doi, HttpUrl, LocalFile};
use schemars::JsonSchema;
use serde::Serialize;

/// How a dataset or publication should be cited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Citation {
    #[schemars(length(min = 1))]
    pub title: String,
    pub authors: Vec<String>,
    pub doi: Doi,
}

/// Entry of the `literature` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum Reference {
    Doi(Doi),
    Url(HttpUrl),
    Citation(Citation),
}

/// Where the data of a calculation comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum DataSource {
    /// Entry of the `literature` table
    Citation(CitationKey),
    /// File shipped next to the dataset
    LocalFile(LocalFile),
}

impl DataSource {
    /// Citation key, if this source points into the literature table
    #[must_use]
    pub fn citation(&self) -> Option<&CitationKey> {
        match self {
            DataSource::Citation(key) => Some(key),
            DataSource::LocalFile(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_serializes_untagged() {
        let doi = Reference::Doi(Doi::parse("10.1021/ja00001a001").unwrap());
        assert_eq!(
            serde_json::to_value(&doi).unwrap(),
            serde_json::json!("10.1021/ja00001a001")
        );

        let citation = Reference::Citation(Citation {
            title: "Über die Reaktionsgeschwindigkeit".to_string(),
            authors: vec!["S. Arrhenius".to_string()],
            doi: Doi::parse("10.1515/zpch-1889-0116").unwrap(),
        });
        let value = serde_json::to_value(&citation).unwrap();
        assert_eq!(value["authors"][0], "S. Arrhenius");
        assert_eq!(value["doi"], "10.1515/zpch-1889-0116");
    }

    #[test]
    fn test_data_source_citation() {
        let key = DataSource::Citation(CitationKey::parse("doe2020").unwrap());
        let file = DataSource::LocalFile(LocalFile::parse("./out/freq.log").unwrap());

        assert_eq!(key.citation().map(CitationKey::as_str), Some("doe2020"));
        assert!(file.citation().is_none());
    }
}
