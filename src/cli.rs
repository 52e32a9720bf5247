use anyhow::Result;
use clap::Parser;

use crate::types::{BranchDiffSpec, MilestoneSpec, Repo};

/// Largest page size the pull request listing accepts.
pub const MAX_PER_PAGE: u8 = 100;
pub const DEFAULT_MAX_PAGES: u32 = 100;
/// Repository release notes are written for unless `--repo` says otherwise.
pub const DEFAULT_REPO: &str = "iced-rs/iced";

#[derive(Parser, Debug)]
#[command(
    name = "merged-prs",
    version,
    about = "List the pull requests merged into the default branch since a baseline branch, with their authors"
)]
struct MergedPrsArgs {
    /// GitHub personal access token
    #[arg(value_name = "TOKEN")]
    pub token: String,

    /// Branch the release is compared against (e.g. the previous release branch)
    #[arg(value_name = "BASE_BRANCH")]
    pub base: String,

    /// GitHub repository in format 'owner/repo'
    #[arg(short = 'r', long = "repo", value_name = "OWNER/REPO", default_value = DEFAULT_REPO)]
    pub repo: String,

    /// Branch holding the new commits (defaults to the repository's default branch)
    #[arg(long, value_name = "BRANCH")]
    pub head: Option<String>,
}

impl MergedPrsArgs {
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            anyhow::bail!("TOKEN cannot be empty");
        }
        if self.base.trim().is_empty() {
            anyhow::bail!("BASE_BRANCH cannot be empty");
        }
        if self.head.as_deref().is_some_and(|h| h.trim().is_empty()) {
            anyhow::bail!("--head cannot be empty");
        }
        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "milestone-notes",
    version,
    about = "Write release notes for the pull requests merged in a milestone, grouped by label",
    after_help = "The GitHub token is read from GITHUB_TOKEN or GH_TOKEN."
)]
struct MilestoneNotesArgs {
    /// GitHub repository in format 'owner/repo'
    #[arg(short = 'r', long = "repo", value_name = "OWNER/REPO", default_value = DEFAULT_REPO)]
    pub repo: String,

    /// Milestone title to collect (exact, case-sensitive match)
    #[arg(short = 'm', long, value_name = "TITLE")]
    pub milestone: String,

    /// Pull requests requested per page
    #[arg(
        long = "per-page",
        value_name = "NUM",
        default_value_t = MAX_PER_PAGE,
        value_parser = clap::value_parser!(u8).range(1..=MAX_PER_PAGE as i64)
    )]
    pub per_page: u8,

    /// Stop with an error after this many pages
    #[arg(
        long = "max-pages",
        value_name = "NUM",
        default_value_t = DEFAULT_MAX_PAGES,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_pages: u32,

    /// Also list merged pull requests that carry no category label
    #[arg(long = "include-uncategorized")]
    pub include_uncategorized: bool,
}

fn parse_repo(repo: &str) -> Result<Repo> {
    Repo::parse(repo).map_err(|e| anyhow::anyhow!("Invalid repository format '{}': {}", repo, e))
}

fn collect_args<I, T>(args: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    args.into_iter()
        .map(|arg| {
            arg.into()
                .into_string()
                .map_err(|arg| anyhow::anyhow!("Argument is not valid UTF-8: {:?}", arg))
        })
        .collect()
}

/// Parses `merged-prs` arguments into the token and a branch-diff spec.
pub fn parse_merged_prs_args<I, T>(args: I) -> Result<(String, BranchDiffSpec)>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = MergedPrsArgs::try_parse_from(collect_args(args)?)?;
    cli.validate()?;

    let spec = BranchDiffSpec {
        repo: parse_repo(&cli.repo)?,
        base: cli.base,
        head: cli.head,
    };
    Ok((cli.token, spec))
}

/// Parses `milestone-notes` arguments into a milestone spec.
pub fn parse_milestone_notes_args<I, T>(args: I) -> Result<MilestoneSpec>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = MilestoneNotesArgs::try_parse_from(collect_args(args)?)?;

    if cli.milestone.is_empty() {
        anyhow::bail!("--milestone cannot be empty");
    }

    Ok(MilestoneSpec {
        repo: parse_repo(&cli.repo)?,
        milestone: cli.milestone,
        per_page: cli.per_page,
        max_pages: cli.max_pages,
        include_uncategorized: cli.include_uncategorized,
    })
}

/// Exits the process for a clap error: help and version go to stdout with
/// status 0, usage errors to stderr with status 2.
pub fn handle_clap_help_version(clap_err: &clap::Error) -> ! {
    use clap::error::ErrorKind;
    match clap_err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{clap_err}");
            std::process::exit(0);
        }
        _ => {
            eprint!("{clap_err}");
            std::process::exit(2);
        }
    }
}

/// Installs a stderr subscriber filtered by `RUST_LOG`, defaulting to `warn`.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
