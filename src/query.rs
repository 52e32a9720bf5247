use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::{
    categorize::in_milestone,
    commits::merged_pr_numbers,
    types::{
        BranchDiffSpec, Category, Commit, Forge, MergedPrReport, MilestoneNotes, MilestoneSpec,
        PullRequest, Repo,
    },
};

/// Collects the pull requests merged into the head branch since `base`.
///
/// A failed comparison is reported and treated as an empty range. PRs that
/// cannot be fetched are reported and left out.
pub async fn collect_merged_prs<F>(spec: &BranchDiffSpec, forge: &F) -> Result<MergedPrReport>
where
    F: Forge + Sync,
{
    let head = match &spec.head {
        Some(head) => head.clone(),
        None => forge.default_branch(&spec.repo).await?,
    };

    let commits = fetch_commit_range(forge, &spec.repo, &spec.base, &head).await;
    let numbers = merged_pr_numbers(&commits);
    info!(
        commits = commits.len(),
        merges = numbers.len(),
        "Scanned {}...{head}",
        spec.base
    );

    let pull_requests = resolve_pull_requests(forge, &spec.repo, &numbers).await;
    let authors = sorted_authors(&pull_requests);

    Ok(MergedPrReport {
        pull_requests,
        authors,
    })
}

/// Returns the commits on `head` that are not on `base`, or nothing when the
/// comparison fails.
pub async fn fetch_commit_range<F>(forge: &F, repo: &Repo, base: &str, head: &str) -> Vec<Commit>
where
    F: Forge + Sync,
{
    match forge.compare_commits(repo, base, head).await {
        Ok(commits) => commits,
        Err(err) => {
            warn!("Failed to compare {base}...{head} in {repo}: {err:#}");
            Vec::new()
        }
    }
}

/// Fetches each pull request in order, skipping the ones whose lookup fails.
pub async fn resolve_pull_requests<F>(forge: &F, repo: &Repo, numbers: &[u64]) -> Vec<PullRequest>
where
    F: Forge + Sync,
{
    let mut pull_requests = Vec::with_capacity(numbers.len());
    for &number in numbers {
        match forge.pull_request(repo, number).await {
            Ok(pr) => pull_requests.push(pr),
            Err(err) => warn!("Failed to fetch PR #{number} from {repo}: {err:#}"),
        }
    }
    pull_requests
}

/// Pages through all closed pull requests until an empty page.
///
/// Fails on the first page that cannot be fetched, and when `max_pages`
/// pages have been read without reaching an empty one.
pub async fn fetch_closed_pull_requests<F>(
    forge: &F,
    repo: &Repo,
    per_page: u8,
    max_pages: u32,
) -> Result<Vec<PullRequest>>
where
    F: Forge + Sync,
{
    let mut all_prs = Vec::new();

    for page in 1..=max_pages {
        let batch = forge
            .closed_pull_requests(repo, page, per_page)
            .await
            .with_context(|| format!("Failed to list closed pull requests of {repo} (page {page})"))?;

        if batch.is_empty() {
            debug!(pages = page - 1, total = all_prs.len(), "Pagination complete");
            return Ok(all_prs);
        }

        debug!(page, count = batch.len(), "Fetched page");
        all_prs.extend(batch);
    }

    anyhow::bail!(
        "Listing closed pull requests of {repo} did not finish within {max_pages} pages"
    )
}

/// Collects the merged pull requests of a milestone, bucketed by category.
pub async fn collect_milestone_notes<F>(spec: &MilestoneSpec, forge: &F) -> Result<MilestoneNotes>
where
    F: Forge + Sync,
{
    let closed = fetch_closed_pull_requests(forge, &spec.repo, spec.per_page, spec.max_pages).await?;
    let total = closed.len();

    let retained: Vec<PullRequest> = closed
        .into_iter()
        .filter(|pr| in_milestone(pr, &spec.milestone))
        .collect();
    info!(
        closed = total,
        retained = retained.len(),
        milestone = %spec.milestone,
        "Filtered closed pull requests"
    );

    let mut notes = MilestoneNotes {
        authors: sorted_authors(&retained),
        include_uncategorized: spec.include_uncategorized,
        ..Default::default()
    };

    for pr in retained {
        let category = Category::for_pr(&pr);
        if category.is_none() {
            warn!(
                "PR #{} \"{}\" has no addition, change or fix label",
                pr.number, pr.title
            );
        }
        notes.push(category, pr);
    }

    Ok(notes)
}

/// Returns unique author handles sorted case-insensitively.
pub fn sorted_authors(prs: &[PullRequest]) -> Vec<String> {
    let mut authors: Vec<String> = prs.iter().map(|pr| pr.author.clone()).collect();
    authors.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    authors.dedup();
    authors
}
