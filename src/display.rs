use std::io::Write;

use anyhow::Result;

use crate::types::{Category, MergedPrReport, MilestoneNotes, PullRequest};

const UNCATEGORIZED_HEADING: &str = "Uncategorized";
const AUTHORS_HEADING: &str = "Authors:";
const THANKS_HEADING: &str = "Many thanks to...";

/// Formats a pull request as a Markdown list item. A trailing period in the
/// title is dropped so the line ends the sentence only once.
pub fn format_pr_line(pr: &PullRequest) -> String {
    let title = pr.title.strip_suffix('.').unwrap_or(&pr.title);
    format!("- {title}. [#{}]({})", pr.number, pr.url)
}

pub fn format_author_line(author: &str) -> String {
    format!("- @{author}")
}

fn write_prs<W: Write>(prs: &[PullRequest], writer: &mut W) -> Result<()> {
    for pr in prs {
        writeln!(writer, "{}", format_pr_line(pr))?;
    }
    Ok(())
}

fn write_authors<W: Write>(heading: &str, authors: &[String], writer: &mut W) -> Result<()> {
    writeln!(writer, "{heading}")?;
    for author in authors {
        writeln!(writer, "{}", format_author_line(author))?;
    }
    Ok(())
}

fn write_section<W: Write>(heading: &str, prs: &[PullRequest], writer: &mut W) -> Result<()> {
    if prs.is_empty() {
        return Ok(());
    }
    writeln!(writer, "{heading}")?;
    write_prs(prs, writer)?;
    writeln!(writer)?;
    Ok(())
}

/// Renders branch-diff release notes: PR lines in merge order, then authors.
pub fn render_merged_prs<W: Write>(report: &MergedPrReport, writer: &mut W) -> Result<()> {
    write_prs(&report.pull_requests, writer)?;
    writeln!(writer)?;
    write_authors(AUTHORS_HEADING, &report.authors, writer)
}

/// Renders milestone release notes: one section per non-empty category,
/// then the thanks list.
pub fn render_milestone_notes<W: Write>(notes: &MilestoneNotes, writer: &mut W) -> Result<()> {
    for category in Category::ALL {
        write_section(category.heading(), notes.section(category), writer)?;
    }
    if notes.include_uncategorized {
        write_section(UNCATEGORIZED_HEADING, &notes.uncategorized, writer)?;
    }
    write_authors(THANKS_HEADING, &notes.authors, writer)
}
