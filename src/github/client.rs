use anyhow::Result;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::CommentSource;
use crate::error::SummaryError;
use crate::models::{IssueContext, IssueRef, RawComment};

pub const GITHUB_API_URL: &str = "https://api.github.com";

const PER_PAGE: usize = 100;

pub struct GitHubClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct IssueResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: Option<String>,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_api_url(token, GITHUB_API_URL)
    }

    pub fn with_api_url(token: Option<String>, api_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );

        let client = Client::builder()
            .user_agent(concat!("issue-digest/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let request = self.client.get(format!("{}{}", self.api_url, path));
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SummaryError::Api {
                service: "GitHub",
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            }
            .into());
        }
        Ok(response.json::<T>()?)
    }

    /// Fetches title and body of an issue given only its number.
    pub fn fetch_issue(&self, issue: &IssueRef) -> Result<IssueContext> {
        let path = format!(
            "/repos/{}/{}/issues/{}",
            issue.owner, issue.repo, issue.number
        );
        let response: IssueResponse = self.fetch_json(self.get(&path))?;
        Ok(IssueContext {
            issue: issue.clone(),
            title: response.title,
            body: response.body,
        })
    }
}

impl CommentSource for GitHubClient {
    fn list_issue_comments(&self, issue: &IssueRef) -> Result<Vec<RawComment>> {
        let path = format!(
            "/repos/{}/{}/issues/{}/comments",
            issue.owner, issue.repo, issue.number
        );
        let mut page = 1_u32;
        let mut comments = Vec::new();

        loop {
            let request = self.get(&path).query(&[
                ("per_page", PER_PAGE.to_string()),
                ("page", page.to_string()),
            ]);
            let batch: Vec<RawComment> = self.fetch_json(request)?;
            let batch_len = batch.len();
            debug!(%issue, page, batch_len, "fetched comment page");

            comments.extend(batch);
            if batch_len < PER_PAGE {
                break;
            }
            page = page.saturating_add(1);
        }

        Ok(comments)
    }
}
