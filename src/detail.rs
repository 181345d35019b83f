use crate::forge::Forge;
use crate::listing::next_generation;
use crate::types::{RepositoryDetail, RepositoryRef};

pub type DetailOutcome = std::result::Result<RepositoryDetail, String>;

/// State behind the repository detail screen
#[derive(Debug, Clone)]
pub struct DetailView {
    pub name: String,
    pub detail: Option<RepositoryDetail>,
    /// Created in this session; only these may be updated or deleted.
    pub is_new: bool,
    pub loading: bool,
    /// A mutation succeeded while this view was open.
    pub mutated: bool,
    pub scroll_offset: usize,
    generation: u64,
}

impl DetailView {
    /// Open from a listing entry; its data is shown as-is.
    pub fn seeded(item: &RepositoryRef) -> Self {
        Self {
            name: item.repo.name.clone(),
            detail: Some(item.repo.clone()),
            is_new: item.is_new,
            loading: false,
            mutated: false,
            scroll_offset: 0,
            generation: 0,
        }
    }

    /// Open by name only; the caller must fetch.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: None,
            is_new: false,
            loading: false,
            mutated: false,
            scroll_offset: 0,
            generation: 0,
        }
    }

    pub fn can_mutate(&self) -> bool {
        self.is_new
    }

    pub fn web_url(&self) -> Option<&str> {
        self.detail
            .as_ref()
            .map(|d| d.html_url.as_str())
            .filter(|url| !url.is_empty())
    }

    pub fn begin_refresh(&mut self) -> u64 {
        self.generation = next_generation();
        self.loading = true;
        self.generation
    }

    /// Replace the detail wholesale. Failures keep whatever was shown before.
    pub fn apply(&mut self, generation: u64, outcome: DetailOutcome) -> bool {
        if generation != self.generation {
            tracing::debug!(generation, name = %self.name, "discarding stale detail response");
            return false;
        }
        match outcome {
            Ok(detail) => self.detail = Some(detail),
            Err(msg) => {
                tracing::error!(error = %msg, name = %self.name, "error fetching repository details");
            }
        }
        self.loading = false;
        true
    }
}

pub async fn load(forge: &dyn Forge, name: &str) -> DetailOutcome {
    forge.get_repo(name).await.map_err(|e| e.to_string())
}
