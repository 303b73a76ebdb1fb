//! Splits the match webhook's markdown-ish text into verdict, reasoning and the
//! drafted outreach responses.
//!
//! Expected shape:
//!
//! ```text
//! **Verdict:** Strong match
//! **Reasoning:** ...
//! Response A:
//!
//! subject: ...
//!
//! content:
//!
//! ...
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub const NOT_FOUND: &str = "Not found";

/// A report needs at least this many drafted responses to count as complete.
pub const MIN_RESPONSES: usize = 2;

static VERDICT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*Verdict:\*\*\s*(.+)").expect("verdict pattern is valid"));

static REASONING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\*\*Reasoning:\*\*\s*(.+?)Response A:").expect("reasoning pattern is valid")
});

static RESPONSE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)Response\s([A-Z]):\s*\n\nsubject:\s(.+?)\n\ncontent:\n\n")
        .expect("response header pattern is valid")
});

static RESPONSE_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\nResponse [A-Z]:").expect("response boundary pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftResponse {
    pub label: String,
    pub subject: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub verdict: String,
    pub reasoning: String,
    pub responses: Vec<DraftResponse>,
    /// False when fewer than `MIN_RESPONSES` drafts were found.
    pub complete: bool,
}

impl MatchReport {
    /// Labels of drafts whose content came back blank.
    pub fn empty_responses(&self) -> Vec<&str> {
        self.responses
            .iter()
            .filter(|r| r.content.is_empty())
            .map(|r| r.label.as_str())
            .collect()
    }
}

pub fn parse_match_report(text: &str) -> MatchReport {
    let verdict = VERDICT
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| NOT_FOUND.to_string());

    let reasoning = REASONING
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| NOT_FOUND.to_string());

    let mut responses = Vec::new();
    let mut pos = 0;
    while let Some(caps) = RESPONSE_HEADER.captures_at(text, pos) {
        let (Some(header), Some(label), Some(subject)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            break;
        };
        let body_start = header.end();
        let body_end = RESPONSE_BOUNDARY
            .find_at(text, body_start)
            .map(|m| m.start())
            .unwrap_or(text.len());

        responses.push(DraftResponse {
            label: label.as_str().to_string(),
            subject: subject.as_str().trim().to_string(),
            content: text[body_start..body_end].trim().to_string(),
        });
        pos = body_end;
    }

    MatchReport {
        verdict,
        reasoning,
        complete: responses.len() >= MIN_RESPONSES,
        responses,
    }
}
