//! Relnotes: release-note summaries from GitHub pull requests.
//!
//! Two flows are provided. Branch-diff mode finds merge commits that are on
//! the default branch but not on a baseline branch and lists the pull
//! requests they merged. Milestone mode lists the merged pull requests of a
//! milestone grouped into addition, change and fix sections. Both end with
//! the list of contributing authors.

pub mod categorize;
pub mod cli;
pub mod commits;
pub mod display;
pub mod github;
pub mod query;
pub mod types;

pub use categorize::in_milestone;
pub use cli::{parse_merged_prs_args, parse_milestone_notes_args};
pub use commits::{merged_pr_number, merged_pr_numbers};
pub use display::{render_merged_prs, render_milestone_notes};
pub use github::{GitHub, get_github_token};
pub use query::{
    collect_merged_prs, collect_milestone_notes, fetch_closed_pull_requests, fetch_commit_range,
    resolve_pull_requests, sorted_authors,
};
pub use types::{
    BranchDiffSpec, Category, Commit, Forge, MergedPrReport, MilestoneNotes, MilestoneSpec,
    PullRequest, Repo, RepoError,
};
