use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::header::{ACCEPT, LINK};
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::{FolioError, Result};
use crate::forge::Forge;
use crate::types::{NewRepo, Page, RepositoryDetail};

pub struct GitHub {
    client: Octocrab,
    rest: Rest,
}

impl std::fmt::Debug for GitHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHub")
            .field("account", &self.rest.config.account)
            .finish_non_exhaustive()
    }
}

impl From<octocrab::Error> for FolioError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. } => {
                FolioError::from_status(source.status_code.as_u16(), source.message.clone())
            }
            _ => FolioError::Api(err.to_string()),
        }
    }
}

/// Which envelope a listing response arrives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListingKind {
    Plain,
    Search,
}

#[derive(Deserialize)]
struct SearchEnvelope {
    items: Vec<RepositoryDetail>,
}

#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

/// Plain `reqwest` calls, used where the `Link` header or the raw
/// response envelope has to be read.
struct Rest {
    http: reqwest::Client,
    config: ClientConfig,
}

impl Rest {
    fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { http, config })
    }

    fn repo_path(&self, name: &str) -> String {
        format!(
            "/repos/{}/{}",
            self.config.account,
            urlencoding::encode(name)
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self
            .http
            .request(method, format!("{}{}", self.config.api_base, path))
            .header(ACCEPT, "application/vnd.github+json");
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| FolioError::Api(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = api_message(&body)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "Unknown error".to_string());
        Err(FolioError::from_status(status.as_u16(), message))
    }

    async fn get_listing(
        &self,
        request: RequestBuilder,
        kind: ListingKind,
    ) -> Result<Page<RepositoryDetail>> {
        let response = self.send(request).await?;
        let has_next = has_next_link(
            response
                .headers()
                .get(LINK)
                .and_then(|value| value.to_str().ok()),
        );
        let body = response.bytes().await?;
        let items = normalize_listing(&body, kind)?;
        Ok(Page { items, has_next })
    }

    async fn list_repos(&self, page: u32) -> Result<Page<RepositoryDetail>> {
        let request = self
            .request(Method::GET, &format!("/users/{}/repos", self.config.account))
            .query(&[("page", page), ("per_page", self.config.per_page)]);
        self.get_listing(request, ListingKind::Plain).await
    }

    async fn search_repos(&self, term: &str, page: u32) -> Result<Page<RepositoryDetail>> {
        let request = self
            .request(Method::GET, "/search/repositories")
            .query(&[("q", search_query(term, &self.config.account))])
            .query(&[("page", page), ("per_page", self.config.per_page)]);
        self.get_listing(request, ListingKind::Search).await
    }

    async fn create_repo(&self, repo: &NewRepo) -> Result<RepositoryDetail> {
        let request = self.request(Method::POST, "/user/repos").json(repo);
        let created = self.send(request).await?.json().await?;
        Ok(created)
    }

    async fn update_description(&self, name: &str, description: &str) -> Result<()> {
        let body = serde_json::json!({ "description": description });
        let request = self.request(Method::PATCH, &self.repo_path(name)).json(&body);
        self.send(request).await?;
        Ok(())
    }
}

impl GitHub {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Octocrab::builder()
            .base_uri(config.api_base.as_str())
            .map_err(|e| FolioError::Config(e.to_string()))?;
        if let Some(token) = &config.token {
            builder = builder.personal_token(token.clone());
        }
        let client = builder
            .build()
            .map_err(|e| FolioError::Auth(e.to_string()))?;

        Ok(Self {
            client,
            rest: Rest::new(config)?,
        })
    }
}

#[async_trait]
impl Forge for GitHub {
    fn account(&self) -> &str {
        &self.rest.config.account
    }

    fn web_url(&self, name: &str) -> String {
        format!("https://github.com/{}/{}", self.rest.config.account, name)
    }

    fn profile_url(&self) -> String {
        format!("https://github.com/{}", self.rest.config.account)
    }

    async fn list_repos(&self, page: u32) -> Result<Page<RepositoryDetail>> {
        self.rest.list_repos(page).await
    }

    async fn search_repos(&self, term: &str, page: u32) -> Result<Page<RepositoryDetail>> {
        self.rest.search_repos(term, page).await
    }

    async fn get_repo(&self, name: &str) -> Result<RepositoryDetail> {
        let repo: RepositoryDetail = self
            .client
            .get(self.rest.repo_path(name), None::<&()>)
            .await?;
        Ok(repo)
    }

    async fn create_repo(&self, repo: &NewRepo) -> Result<RepositoryDetail> {
        let created = self.rest.create_repo(repo).await?;
        tracing::info!(name = %repo.name, "repository created");
        Ok(created)
    }

    async fn update_description(&self, name: &str, description: &str) -> Result<()> {
        self.rest.update_description(name, description).await?;
        tracing::info!(%name, "repository description updated");
        Ok(())
    }

    async fn delete_repo(&self, name: &str) -> Result<()> {
        self.client
            .repos(self.rest.config.account.clone(), name.to_string())
            .delete()
            .await?;
        tracing::info!(%name, "repository deleted");
        Ok(())
    }
}

/// Scope a free-text term to the configured account.
fn search_query(term: &str, account: &str) -> String {
    format!("{} user:{}", term, account)
}

fn api_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiMessage>(body)
        .ok()
        .map(|m| m.message)
}

/// Reduce both response envelopes to one sequence of repositories.
fn normalize_listing(body: &[u8], kind: ListingKind) -> Result<Vec<RepositoryDetail>> {
    let parsed = match kind {
        ListingKind::Plain => serde_json::from_slice::<Vec<RepositoryDetail>>(body),
        ListingKind::Search => serde_json::from_slice::<SearchEnvelope>(body).map(|e| e.items),
    };
    parsed.map_err(|e| FolioError::Api(format!("unexpected listing response: {}", e)))
}

/// True when an RFC 8288 `Link` header carries a `rel="next"` entry.
pub fn has_next_link(header: Option<&str>) -> bool {
    let Some(header) = header else {
        return false;
    };

    header.split(',').any(|link| {
        link.split(';').skip(1).any(|param| {
            let Some((key, value)) = param.split_once('=') else {
                return false;
            };
            key.trim().eq_ignore_ascii_case("rel")
                && value
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .any(|rel| rel.eq_ignore_ascii_case("next"))
        })
    })
}
