use crate::types::{Category, PullRequest};

const ADDITION_LABELS: &[&str] = &["addition", "feature"];
const FIX_LABELS: &[&str] = &["fix", "bug"];
const CHANGE_LABELS: &[&str] = &["change", "improvement"];

impl Category {
    /// Picks the release-note section for a pull request from its labels.
    ///
    /// Precedence is addition, then fix, then change. Returns `None` when no
    /// label maps to a section.
    pub fn for_pr(pr: &PullRequest) -> Option<Category> {
        if pr.has_any_label(ADDITION_LABELS) {
            Some(Category::Addition)
        } else if pr.has_any_label(FIX_LABELS) {
            Some(Category::Fix)
        } else if pr.has_any_label(CHANGE_LABELS) {
            Some(Category::Change)
        } else {
            None
        }
    }
}

/// Tests if a PR was merged as part of the given milestone.
///
/// The milestone title must match exactly. PRs without a milestone never
/// match.
pub fn in_milestone(pr: &PullRequest, milestone: &str) -> bool {
    pr.merged && pr.milestone.as_deref() == Some(milestone)
}
