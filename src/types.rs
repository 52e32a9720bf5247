use std::fmt;

use anyhow::Result;
use async_trait::async_trait;

/// Errors produced when parsing an `owner/name` repository identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    Empty,
    MissingSlash(String),
    EmptyOwner(String),
    EmptyName(String),
    TooManySegments(String),
    Whitespace(String),
}

impl fmt::Display for RepoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoError::Empty => write!(f, "repository cannot be empty"),
            RepoError::MissingSlash(s) => {
                write!(f, "repository must be in format 'owner/repo', got: '{s}'")
            }
            RepoError::EmptyOwner(s) => write!(f, "repository owner is empty in '{s}'"),
            RepoError::EmptyName(s) => write!(f, "repository name is empty in '{s}'"),
            RepoError::TooManySegments(s) => {
                write!(f, "repository has too many path segments: '{s}'")
            }
            RepoError::Whitespace(s) => write!(f, "repository contains whitespace: '{s}'"),
        }
    }
}

impl std::error::Error for RepoError {}

/// A GitHub repository identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repo {
    owner: String,
    name: String,
}

impl Repo {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, RepoError> {
        let owner = owner.into();
        let name = name.into();
        let full = format!("{owner}/{name}");

        if owner.is_empty() {
            return Err(RepoError::EmptyOwner(full));
        }
        if name.is_empty() {
            return Err(RepoError::EmptyName(full));
        }
        if owner.contains('/') || name.contains('/') {
            return Err(RepoError::TooManySegments(full));
        }
        if full.chars().any(char::is_whitespace) {
            return Err(RepoError::Whitespace(full));
        }

        Ok(Self { owner, name })
    }

    /// Parses an `owner/name` string.
    pub fn parse(repo: &str) -> Result<Self, RepoError> {
        if repo.is_empty() {
            return Err(RepoError::Empty);
        }
        let Some((owner, name)) = repo.split_once('/') else {
            return Err(RepoError::MissingSlash(repo.to_string()));
        };
        Self::new(owner, name)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Pull request information as used for release notes.
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub author: String,
    pub labels: Vec<String>,
    pub milestone: Option<String>,
    pub merged: bool,
}

impl PullRequest {
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label == name)
    }

    pub fn has_any_label(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.has_label(name))
    }
}

/// A commit as returned by a branch comparison. Only the message is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub message: String,
}

impl Commit {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Release-note section a pull request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Addition,
    Change,
    Fix,
}

impl Category {
    /// Section order used when rendering release notes.
    pub const ALL: [Category; 3] = [Category::Addition, Category::Change, Category::Fix];

    pub fn heading(&self) -> &'static str {
        match self {
            Category::Addition => "Addition",
            Category::Change => "Change",
            Category::Fix => "Fix",
        }
    }
}

/// Input for branch-diff mode.
#[derive(Debug, Clone)]
pub struct BranchDiffSpec {
    pub repo: Repo,
    pub base: String,
    /// Branch to compare against `base`. `None` means the repository's
    /// default branch.
    pub head: Option<String>,
}

/// Input for milestone mode.
#[derive(Debug, Clone)]
pub struct MilestoneSpec {
    pub repo: Repo,
    pub milestone: String,
    pub per_page: u8,
    pub max_pages: u32,
    pub include_uncategorized: bool,
}

/// Merged pull requests found between two branches, in merge-commit order.
#[derive(Debug, Clone, Default)]
pub struct MergedPrReport {
    pub pull_requests: Vec<PullRequest>,
    pub authors: Vec<String>,
}

/// Merged pull requests of a milestone, bucketed by category.
#[derive(Debug, Clone, Default)]
pub struct MilestoneNotes {
    pub additions: Vec<PullRequest>,
    pub changes: Vec<PullRequest>,
    pub fixes: Vec<PullRequest>,
    pub uncategorized: Vec<PullRequest>,
    pub include_uncategorized: bool,
    pub authors: Vec<String>,
}

impl MilestoneNotes {
    pub fn section(&self, category: Category) -> &[PullRequest] {
        match category {
            Category::Addition => &self.additions,
            Category::Change => &self.changes,
            Category::Fix => &self.fixes,
        }
    }

    pub(crate) fn push(&mut self, category: Option<Category>, pr: PullRequest) {
        match category {
            Some(Category::Addition) => self.additions.push(pr),
            Some(Category::Change) => self.changes.push(pr),
            Some(Category::Fix) => self.fixes.push(pr),
            None => self.uncategorized.push(pr),
        }
    }
}

/// Source of repository data.
///
/// Implemented by [`crate::GitHub`] for the live API and by mocks in tests.
/// Every method is a single remote call.
#[async_trait]
pub trait Forge {
    /// Returns the name of the repository's default branch.
    async fn default_branch(&self, repo: &Repo) -> Result<String>;

    /// Returns the commits reachable from `head` but not from `base`, oldest
    /// first.
    async fn compare_commits(&self, repo: &Repo, base: &str, head: &str) -> Result<Vec<Commit>>;

    /// Fetches a single pull request by number.
    async fn pull_request(&self, repo: &Repo, number: u64) -> Result<PullRequest>;

    /// Fetches one page (1-based) of closed pull requests.
    async fn closed_pull_requests(
        &self,
        repo: &Repo,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<PullRequest>>;
}
