use std::sync::LazyLock;

use regex::Regex;

use crate::types::Commit;

static MERGE_PR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)merge pull request #(\d+)").expect("Failed to compile merge commit pattern")
});

/// Extracts the pull request number from a GitHub merge commit message.
///
/// Matches `Merge pull request #<N>` case-insensitively anywhere in the
/// message, including later lines. Only the first occurrence is used.
pub fn merged_pr_number(message: &str) -> Option<u64> {
    MERGE_PR_PATTERN
        .captures(message)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// Returns the referenced pull request numbers in commit order, keeping only
/// the first occurrence of each number.
pub fn merged_pr_numbers(commits: &[Commit]) -> Vec<u64> {
    let mut numbers: Vec<u64> = Vec::new();
    for number in commits.iter().filter_map(|c| merged_pr_number(&c.message)) {
        if !numbers.contains(&number) {
            numbers.push(number);
        }
    }
    numbers
}
