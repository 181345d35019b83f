use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
}

/// Full repository metadata as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDetail {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "stargazers_count")]
    pub stars: u32,
    #[serde(default, rename = "forks_count")]
    pub forks: u32,
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub open_issues: u32,
}

impl RepositoryDetail {
    pub fn owner_login(&self) -> &str {
        self.owner
            .as_ref()
            .map(|o| o.login.as_str())
            .unwrap_or("Unknown")
    }
}

/// A listing entry. `is_new` marks entries created in this session that the
/// authoritative listing has not returned yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub repo: RepositoryDetail,
    pub is_new: bool,
}

impl RepositoryRef {
    pub fn name(&self) -> &str {
        &self.repo.name
    }

    pub fn description(&self) -> Option<&str> {
        self.repo.description.as_deref()
    }
}

impl From<RepositoryDetail> for RepositoryRef {
    fn from(repo: RepositoryDetail) -> Self {
        Self {
            repo,
            is_new: false,
        }
    }
}

/// Search term plus page number. An empty term selects the plain listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub search_term: String,
    pub page: u32,
}

impl ListingQuery {
    pub fn is_search(&self) -> bool {
        !self.search_term.is_empty()
    }
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            page: 1,
        }
    }
}

/// One page of results with the exhaustion signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            has_next: self.has_next,
        }
    }
}

/// Body of a repository creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRepo {
    pub name: String,
    pub description: String,
}
