use serde::{Deserialize, Serialize};

pub const DEFAULT_GROUP: &str = "Custom lists";
pub const UPLOADED_GROUP: &str = "Uploaded lists";
pub const DEFAULT_COLOR: &str = "gray";

/// Persisted bucket for a list. The caller always states the kind
/// explicitly; there is no fallback classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Gene,
    Generic,
}

impl ListKind {
    pub fn file_stem(&self) -> &'static str {
        match self {
            ListKind::Gene => "gene_lists",
            ListKind::Generic => "lists",
        }
    }
}

/// A named, user-owned ordered collection of identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRecord {
    pub name: String,
    pub items: Vec<String>,
    pub color: String,
    pub group: String,
}

impl ListRecord {
    pub fn new(name: &str, items: Vec<String>, group: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            items,
            color: color.to_string(),
            group: group.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_file_stems_are_distinct() {
        assert_ne!(
            ListKind::Gene.file_stem(),
            ListKind::Generic.file_stem()
        );
    }

    #[test]
    fn test_record_roundtrips_through_json() {
        let record = ListRecord::new(
            "Selected genes",
            vec!["opsin1".to_string(), "opsin2".to_string()],
            DEFAULT_GROUP,
            DEFAULT_COLOR,
        );
        let text = serde_json::to_string(&record).unwrap();
        let back: ListRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
    }
}
