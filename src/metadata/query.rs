//! Outbound metadata queries.

use ytsdebrid_common::{Error, Result};

/// Path of the provider's listing endpoint.
pub const LIST_MOVIES_PATH: &str = "/api/v2/list_movies.json";

/// Default sort order for catalog pages.
pub const DEFAULT_SORT: &str = "seeds";

/// A query against the provider's `list_movies` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieQuery {
    /// A catalog page, optionally filtered by genre.
    Listing {
        genre: Option<String>,
        limit: u32,
        sort_by: String,
        page: u32,
    },
    /// A single-item lookup by external id.
    Lookup { query_term: String },
}

impl MovieQuery {
    pub fn lookup(id: impl Into<String>) -> Self {
        MovieQuery::Lookup {
            query_term: id.into(),
        }
    }

    pub fn listing(genre: Option<String>, limit: u32, page: u32) -> Self {
        MovieQuery::Listing {
            genre,
            limit,
            sort_by: DEFAULT_SORT.to_string(),
            page,
        }
    }

    /// Query parameters in a fixed order, so equal queries serialize equally.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            MovieQuery::Listing {
                genre,
                limit,
                sort_by,
                page,
            } => {
                let mut params = Vec::with_capacity(4);
                if let Some(genre) = genre {
                    params.push(("genre", genre.clone()));
                }
                params.push(("limit", limit.to_string()));
                params.push(("sort_by", sort_by.clone()));
                params.push(("page", page.to_string()));
                params
            }
            MovieQuery::Lookup { query_term } => vec![("query_term", query_term.clone())],
        }
    }

    /// Full request URL against `base_url`; also used as the cache key.
    pub fn url(&self, base_url: &str) -> Result<reqwest::Url> {
        let endpoint = format!("{}{}", base_url.trim_end_matches('/'), LIST_MOVIES_PATH);
        reqwest::Url::parse_with_params(&endpoint, self.params())
            .map_err(|e| Error::fetch_failed(endpoint, format!("invalid URL: {e}")))
    }
}

impl std::fmt::Display for MovieQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self
            .params()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        f.write_str(&rendered.join("&"))
    }
}
