use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::{Octocrab, service::middleware::retry::RetryConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::{Commit, Forge, PullRequest, Repo};

/// Handle GitHub reports for pull requests whose author account was deleted.
const GHOST_LOGIN: &str = "ghost";

const TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Reads the GitHub token from the environment.
pub fn get_github_token() -> Result<String> {
    TOKEN_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
        .with_context(|| {
            format!(
                "No GitHub token found. Set {} (or {}) to a personal access token",
                TOKEN_VARS[0], TOKEN_VARS[1]
            )
        })
}

#[derive(Debug, Deserialize)]
struct RepositoryRecord {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct CompareRecord {
    total_commits: Option<usize>,
    commits: Vec<CommitRecord>,
}

impl CompareRecord {
    /// Commits in the range that GitHub left out of the response. The
    /// compare endpoint lists at most 250.
    fn missing_commits(&self) -> usize {
        self.total_commits
            .map_or(0, |total| total.saturating_sub(self.commits.len()))
    }
}

#[derive(Debug, Deserialize)]
struct CommitRecord {
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestRecord {
    number: u64,
    title: String,
    html_url: String,
    user: Option<UserRecord>,
    #[serde(default)]
    labels: Vec<LabelRecord>,
    milestone: Option<MilestoneRecord>,
    merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    login: String,
}

#[derive(Debug, Deserialize)]
struct LabelRecord {
    name: String,
}

#[derive(Debug, Deserialize)]
struct MilestoneRecord {
    title: String,
}

impl From<PullRequestRecord> for PullRequest {
    fn from(record: PullRequestRecord) -> Self {
        Self {
            number: record.number,
            title: record.title,
            url: record.html_url,
            author: record
                .user
                .map(|user| user.login)
                .unwrap_or_else(|| GHOST_LOGIN.to_string()),
            labels: record.labels.into_iter().map(|label| label.name).collect(),
            milestone: record.milestone.map(|milestone| milestone.title),
            merged: record.merged_at.is_some(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ListParams {
    state: &'static str,
    per_page: u8,
    page: u32,
}

/// Turns an octocrab failure into an error that names the HTTP status when
/// GitHub answered with one.
fn describe_api_error(err: octocrab::Error) -> anyhow::Error {
    match err {
        octocrab::Error::GitHub { source, .. } => anyhow::anyhow!(
            "GitHub returned {}: {}",
            source.status_code,
            source.message
        ),
        octocrab::Error::Json { source, .. } => {
            anyhow::anyhow!("Failed to decode GitHub response: {source}")
        }
        octocrab::Error::Serde { source, .. } => {
            anyhow::anyhow!("Failed to decode GitHub response: {source}")
        }
        other => anyhow::anyhow!(other),
    }
}

/// GitHub REST API client.
pub struct GitHub {
    client: Octocrab,
}

impl GitHub {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::build(token.into(), None)
    }

    /// Client for a GitHub Enterprise or test server at `base_uri`.
    pub fn with_base_uri(token: impl Into<String>, base_uri: &str) -> Result<Self> {
        Self::build(token.into(), Some(base_uri))
    }

    fn build(token: String, base_uri: Option<&str>) -> Result<Self> {
        // Every request is sent exactly once; octocrab retries by default.
        let mut builder = Octocrab::builder()
            .personal_token(token)
            .add_retry_config(RetryConfig::None);

        if let Some(uri) = base_uri {
            builder = builder
                .base_uri(uri)
                .with_context(|| format!("Invalid GitHub base URI: '{uri}'"))?;
        }

        let client = builder.build().context("Failed to create GitHub client")?;
        Ok(Self { client })
    }

    async fn get<R>(&self, route: &str) -> Result<R>
    where
        R: serde::de::DeserializeOwned,
    {
        debug!(%route, "GET");
        self.client
            .get::<R, _, ()>(route, None)
            .await
            .map_err(describe_api_error)
    }
}

#[async_trait]
impl Forge for GitHub {
    async fn default_branch(&self, repo: &Repo) -> Result<String> {
        let route = format!("/repos/{}/{}", repo.owner(), repo.name());
        let record: RepositoryRecord = self
            .get(&route)
            .await
            .with_context(|| format!("Failed to look up default branch of {repo}"))?;
        Ok(record.default_branch)
    }

    async fn compare_commits(&self, repo: &Repo, base: &str, head: &str) -> Result<Vec<Commit>> {
        let route = format!(
            "/repos/{}/{}/compare/{base}...{head}",
            repo.owner(),
            repo.name()
        );
        let record: CompareRecord = self.get(&route).await?;

        let missing = record.missing_commits();
        if missing > 0 {
            warn!(
                "Comparison {base}...{head} in {repo} returned {} commits, {missing} more were left out; merges among them are not listed",
                record.commits.len()
            );
        }

        Ok(record
            .commits
            .into_iter()
            .map(|c| Commit::new(c.commit.message))
            .collect())
    }

    async fn pull_request(&self, repo: &Repo, number: u64) -> Result<PullRequest> {
        let route = format!("/repos/{}/{}/pulls/{number}", repo.owner(), repo.name());
        let record: PullRequestRecord = self.get(&route).await?;
        Ok(record.into())
    }

    async fn closed_pull_requests(
        &self,
        repo: &Repo,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<PullRequest>> {
        let route = format!("/repos/{}/{}/pulls", repo.owner(), repo.name());
        let params = ListParams {
            state: "closed",
            per_page,
            page,
        };
        debug!(%route, page, per_page, "GET");
        let records: Vec<PullRequestRecord> = self
            .client
            .get(route, Some(&params))
            .await
            .map_err(describe_api_error)?;
        Ok(records.into_iter().map(PullRequest::from).collect())
    }
}
