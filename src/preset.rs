use crate::error::{ListError, ListErrorCode};
use crate::query_links::{gene_list_members_url, preset_summaries_url};
use serde::{Deserialize, Serialize};

/// Summary of one server-curated list. Membership is not part of the
/// summary; it is fetched on demand and never cached client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetList {
    pub name: String,
    #[serde(rename = "type")]
    pub group: String,
    #[serde(rename = "gene_count")]
    pub item_count: usize,
}

/// Read-only remote collaborator serving preset lists per scope.
pub trait PresetProvider {
    /// Summary descriptors in the order the server returns them.
    fn summaries(&self, scope: &str) -> Result<Vec<PresetList>, ListError>;

    /// Full membership of one named preset list.
    fn members(&self, scope: &str, name: &str) -> Result<Vec<String>, ListError>;
}

/// Paginated envelope around the summary endpoint.
#[derive(Debug, Deserialize)]
struct SummaryPage {
    results: Vec<PresetList>,
}

/// A member row; only the identifier is of interest here.
#[derive(Debug, Deserialize)]
struct MemberRow {
    name: String,
}

/// `PresetProvider` over the atlas REST API.
#[derive(Debug, Clone)]
pub struct HttpPresetProvider {
    base_url: String,
}

impl HttpPresetProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn fetch(&self, url: &str) -> Result<reqwest::blocking::Response, ListError> {
        let response = reqwest::blocking::get(url).map_err(|e| ListError {
            code: ListErrorCode::Network,
            message: format!("Could not fetch '{url}': {e}"),
        })?;
        if !response.status().is_success() {
            return Err(ListError {
                code: ListErrorCode::Network,
                message: format!("Request '{url}' failed with status {}", response.status()),
            });
        }
        Ok(response)
    }
}

impl PresetProvider for HttpPresetProvider {
    fn summaries(&self, scope: &str) -> Result<Vec<PresetList>, ListError> {
        let url = preset_summaries_url(&self.base_url, scope);
        let page: SummaryPage = self.fetch(&url)?.json().map_err(|e| ListError {
            code: ListErrorCode::Serde,
            message: format!("Could not decode preset list summaries: {e}"),
        })?;
        Ok(page.results)
    }

    fn members(&self, scope: &str, name: &str) -> Result<Vec<String>, ListError> {
        // limit=0 disables pagination server-side, so the whole membership
        // arrives as one plain array.
        let url = gene_list_members_url(&self.base_url, scope, name, Some(0));
        let rows: Vec<MemberRow> = self.fetch(&url)?.json().map_err(|e| ListError {
            code: ListErrorCode::Serde,
            message: format!("Could not decode members of list '{name}': {e}"),
        })?;
        Ok(rows.into_iter().map(|row| row.name).collect())
    }
}
