use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ListingQuery, NewRepo, Page, RepositoryDetail};

/// Repository host scoped to one account
#[async_trait]
pub trait Forge: Send + Sync + std::fmt::Debug {
    fn account(&self) -> &str;
    fn web_url(&self, name: &str) -> String;
    fn profile_url(&self) -> String;

    async fn list_repos(&self, page: u32) -> Result<Page<RepositoryDetail>>;
    async fn search_repos(&self, term: &str, page: u32) -> Result<Page<RepositoryDetail>>;
    async fn get_repo(&self, name: &str) -> Result<RepositoryDetail>;
    async fn create_repo(&self, repo: &NewRepo) -> Result<RepositoryDetail>;
    async fn update_description(&self, name: &str, description: &str) -> Result<()>;
    async fn delete_repo(&self, name: &str) -> Result<()>;

    /// Plain listing for an empty search term, search endpoint otherwise.
    async fn fetch_page(&self, query: &ListingQuery) -> Result<Page<RepositoryDetail>> {
        if query.is_search() {
            self.search_repos(&query.search_term, query.page).await
        } else {
            self.list_repos(query.page).await
        }
    }
}
