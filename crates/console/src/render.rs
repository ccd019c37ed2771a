//! Plain-text rendering for the console

use std::fmt::Write;

use dailypapers_client::models::{
    ConversationMessage, PaperDetail, PaperListItem, PaperStatus, Role, Severity, TaskStatus,
};
use dailypapers_client::overview::LibraryStats;
use dailypapers_client::submission::ReconciledBatch;

const ABSTRACT_PREVIEW: usize = 160;

pub fn status_tag(status: &PaperStatus) -> String {
    let badge = status.badge();
    match badge.tone {
        Some(_) => format!("[{}]", badge.label),
        None => format!("[{}?]", badge.label),
    }
}

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "ok",
        Severity::Warning => "warn",
        Severity::Failure => "fail",
    }
}

/// Cut `text` to at most `max` characters, marking the cut
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}

pub fn paper_row(paper: &PaperListItem) -> String {
    let mut line = format!(
        "#{:<5} {:<14} {} {}",
        paper.id,
        paper.source_id,
        status_tag(&paper.status),
        paper.title
    );
    if let Some(categories) = &paper.categories {
        if !categories.is_empty() {
            let _ = write!(line, " ({})", categories.join(", "));
        }
    }
    line
}

pub fn paper_list(papers: &[&PaperListItem], page: u32, has_next: bool) -> String {
    if papers.is_empty() {
        return format!("No papers on page {page}.");
    }
    let mut out = String::new();
    for paper in papers {
        let _ = writeln!(out, "{}", paper_row(paper));
        if let Some(text) = &paper.abstract_text {
            let _ = writeln!(out, "       {}", truncate(text, ABSTRACT_PREVIEW));
        }
    }
    let _ = write!(out, "-- page {page}");
    if has_next {
        let _ = write!(out, ", more with --page {}", page + 1);
    }
    out
}

pub fn paper_detail(detail: &PaperDetail) -> String {
    let paper = &detail.paper;
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", paper.title, status_tag(&paper.status));
    let _ = writeln!(out, "{}: {}", paper.source, paper.source_id);

    let authors = paper.author_names();
    if !authors.is_empty() {
        let _ = writeln!(out, "Authors: {}", authors.join(", "));
    }
    if let Some(categories) = paper.categories.as_deref().filter(|c| !c.is_empty()) {
        let _ = writeln!(out, "Categories: {}", categories.join(", "));
    }
    if let Some(keywords) = paper.keywords.as_deref().filter(|k| !k.is_empty()) {
        let _ = writeln!(out, "Keywords: {}", keywords.join(", "));
    }
    if let Some(published) = paper.published_at {
        let _ = writeln!(out, "Published: {}", published.format("%Y-%m-%d"));
    }
    if let Some(url) = &detail.pdf_url {
        let _ = writeln!(out, "PDF: {url}");
    }
    if let Some(text) = &paper.abstract_text {
        let _ = writeln!(out, "\nAbstract\n{text}");
    }
    if let Some(summary) = &detail.summary {
        let _ = writeln!(out, "\nSummary\n{summary}");
    }
    if let Some(summary) = &detail.summary_zh {
        let _ = writeln!(out, "\nSummary (zh)\n{summary}");
    }
    if let Some(contributions) = detail.contributions.as_deref().filter(|c| !c.is_empty()) {
        let _ = writeln!(out, "\nContributions");
        for (i, item) in contributions.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, item);
        }
    }
    out.trim_end().to_string()
}

pub fn submission(batch: &ReconciledBatch) -> String {
    let mut out = String::new();
    for row in batch.rows() {
        let _ = write!(
            out,
            "{:<4} {:<14} {}",
            severity_tag(row.severity),
            row.result.source_id,
            row.result.status
        );
        if let Some(id) = row.result.paper_id {
            let _ = write!(out, " #{id}");
        }
        if !row.result.message.is_empty() {
            let _ = write!(out, " {}", row.result.message);
        }
        out.push('\n');
    }
    let _ = write!(
        out,
        "{} submitted: {} queued, {} duplicate, {} failed",
        batch.total(),
        batch.count(Severity::Success),
        batch.count(Severity::Warning),
        batch.count(Severity::Failure)
    );
    out
}

pub fn task(status: &TaskStatus) -> String {
    let mut out = format!("{} {}", status.task_id, status.status);
    if let Some(error) = &status.error {
        let _ = write!(out, " error: {error}");
    }
    if let Some(result) = &status.result {
        let _ = write!(out, " result: {result}");
    }
    out
}

pub fn stats(stats: &LibraryStats) -> String {
    format!(
        "Papers {}  Analyzed {}  Processing {}",
        stats.total_label(),
        stats.analyzed_label(),
        stats.processing_label()
    )
}

pub fn reply(message: &ConversationMessage) -> String {
    let speaker = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    let mut out = format!("{speaker}> {}", message.content);
    let sources = message.cited_papers();
    if !sources.is_empty() {
        let ids: Vec<String> = sources.iter().map(|id| format!("#{id}")).collect();
        let _ = write!(out, "\n  sources: {}", ids.join(" "));
    }
    for chunk in message.cited_chunks() {
        let _ = write!(out, "\n  > {}", truncate(chunk, ABSTRACT_PREVIEW));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dailypapers_client::api::fixture_paper;
    use dailypapers_client::models::{ChatResponse, TaskState};

    #[test]
    fn test_unknown_status_is_marked() {
        assert_eq!(status_tag(&PaperStatus::Ready), "[Ready]");
        assert_eq!(status_tag(&PaperStatus::from("archived")), "[archived?]");
    }

    #[test]
    fn test_row_shows_categories() {
        let paper = fixture_paper(3, "Scaling Laws", "parsed");
        assert_eq!(paper_row(&paper), "#3     2401.00003     [Parsed] Scaling Laws (cs.AI)");
    }

    #[test]
    fn test_empty_page() {
        assert_eq!(paper_list(&[], 2, false), "No papers on page 2.");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("注意力机制", 2), "注意...");
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_reply_lists_sources() {
        let message = ConversationMessage::assistant(ChatResponse {
            answer: "See these.".into(),
            source_papers: vec![1, 2],
            source_chunks: vec![],
        });
        assert_eq!(reply(&message), "assistant> See these.\n  sources: #1 #2");
    }

    fn detail(keywords: Option<Vec<String>>) -> PaperDetail {
        let mut paper = fixture_paper(7, "Attention Is All You Need", "ready");
        paper.keywords = keywords;
        PaperDetail {
            paper,
            summary: None,
            summary_zh: None,
            contributions: None,
            pdf_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_detail_shows_keywords_with_categories() {
        let text = paper_detail(&detail(Some(vec!["attention".into(), "transformer".into()])));
        assert!(text.contains("\nCategories: cs.AI\nKeywords: attention, transformer"));
    }

    #[test]
    fn test_detail_omits_missing_keywords() {
        assert!(!paper_detail(&detail(None)).contains("Keywords:"));
        assert!(!paper_detail(&detail(Some(vec![]))).contains("Keywords:"));
    }

    #[test]
    fn test_task_line() {
        let status = TaskStatus {
            task_id: "crawl-1".into(),
            status: TaskState::Failure,
            result: None,
            error: Some("timeout".into()),
        };
        assert_eq!(task(&status), "crawl-1 failure error: timeout");
    }
}
