//! Query links for the downstream search, table, and plotting endpoints.
//!
//! Identifier arrays are joined by commas that must stay literal in the
//! final URL; the consuming pages split on the raw `,` and do not decode
//! `%2C`.

/// Joins identifiers for use as a single query-string value.
pub fn join_identifiers<S: AsRef<str>>(identifiers: &[S]) -> String {
    identifiers
        .iter()
        .map(|id| id.as_ref())
        .collect::<Vec<_>>()
        .join(",")
}

/// URL listing the genes of a set, e.g. for the list editor table.
pub fn genes_url<S: AsRef<str>>(base_url: &str, scope: &str, genes: &[S]) -> String {
    format!(
        "{base_url}/genes/?species={scope}&genes={}",
        join_identifiers(genes)
    )
}

/// URL resolving the membership of a named gene list. `limit` of zero
/// disables server-side pagination.
pub fn gene_list_members_url(
    base_url: &str,
    scope: &str,
    list_name: &str,
    limit: Option<usize>,
) -> String {
    let mut url = format!("{base_url}/genes/?species={scope}&genes={list_name}");
    if let Some(limit) = limit {
        url.push_str(&format!("&limit={limit}"));
    }
    url
}

/// URL listing preset list summaries for a scope.
pub fn preset_summaries_url(base_url: &str, scope: &str) -> String {
    format!("{base_url}/gene_lists/?species={scope}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commas_stay_literal() {
        let url = genes_url("https://atlas.test/rest", "hydra", &["a", "b", "c"]);
        assert_eq!(url, "https://atlas.test/rest/genes/?species=hydra&genes=a,b,c");
        assert!(!url.contains("%2C"));
    }

    #[test]
    fn test_member_url_with_and_without_limit() {
        assert_eq!(
            gene_list_members_url("https://atlas.test/rest", "hydra", "Neuropeptides", Some(0)),
            "https://atlas.test/rest/genes/?species=hydra&genes=Neuropeptides&limit=0"
        );
        assert_eq!(
            gene_list_members_url("https://atlas.test/rest", "hydra", "Neuropeptides", None),
            "https://atlas.test/rest/genes/?species=hydra&genes=Neuropeptides"
        );
    }

    #[test]
    fn test_single_identifier_has_no_separator() {
        assert_eq!(join_identifiers(&["only"]), "only");
        assert_eq!(join_identifiers(&Vec::<String>::new()), "");
    }
}
