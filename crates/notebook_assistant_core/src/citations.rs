//! crates/notebook_assistant_core/src/citations.rs
//!
//! Prompt construction and citation handling: building the source context,
//! scanning completions for `[n]` markers, and splitting message content into
//! text and citation spans for display.

use crate::domain::{new_id, Citation, Source};
use crate::ports::{CompletionMessage, CompletionRole};
use regex::Regex;
use std::sync::LazyLock;

const SYSTEM_INSTRUCTIONS: &str = "You are an AI assistant that helps users understand their documents and sources.
When answering, cite specific sources using [1], [2], etc. format.
Here are the sources:";

static CITATION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([0-9]+)\]").expect("citation marker pattern is valid"));

//=========================================================================================
// Prompt Construction
//=========================================================================================

/// Renders the sources as numbered blocks. The 1-based number is what the model cites.
pub fn build_context(sources: &[Source]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| format!("Source {}: {}\n{}", i + 1, source.title, source.reference()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The two-turn exchange sent to the completion service.
pub fn build_messages(prompt: &str, sources: &[Source]) -> Vec<CompletionMessage> {
    vec![
        CompletionMessage {
            role: CompletionRole::System,
            content: format!("{}\n\n{}", SYSTEM_INSTRUCTIONS, build_context(sources)),
        },
        CompletionMessage {
            role: CompletionRole::User,
            content: prompt.to_string(),
        },
    ]
}

//=========================================================================================
// Citation Extraction
//=========================================================================================

/// Scans `text` left to right for `[n]` markers and maps each valid one to `sources[n - 1]`.
///
/// Markers outside `1..=sources.len()` (including `[0]` and numbers too large
/// to parse) produce nothing.
pub fn extract_citations(text: &str, sources: &[Source]) -> Vec<Citation> {
    CITATION_MARKER
        .captures_iter(text)
        .filter_map(|captures| {
            let marker = captures.get(0)?;
            let ordinal: usize = captures.get(1)?.as_str().parse().ok()?;
            let source = sources.get(ordinal.checked_sub(1)?)?;
            Some(Citation {
                id: new_id(),
                source_id: source.id.clone(),
                text: marker.as_str().to_string(),
            })
        })
        .collect()
}

//=========================================================================================
// Render-time Splitting
//=========================================================================================

/// A span of message content, as a renderer would display it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Citation {
        citation_id: String,
        source_id: String,
        text: String,
    },
}

/// Splits `content` into alternating text and citation spans.
///
/// Citations are ordered by the first occurrence of their marker in the
/// content, then each is located with a forward search from the end of the
/// previous one, so repeated identical markers are consumed left to right.
/// A citation whose marker is not found past that point is skipped.
pub fn split_content(content: &str, citations: &[Citation]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut sorted: Vec<&Citation> = citations.iter().collect();
    sorted.sort_by_key(|c| content.find(c.text.as_str()));

    let mut cursor = 0;
    for citation in sorted {
        if citation.text.is_empty() {
            continue;
        }
        let Some(offset) = content[cursor..].find(citation.text.as_str()) else {
            continue;
        };
        let start = cursor + offset;
        if start > cursor {
            segments.push(Segment::Text(content[cursor..start].to_string()));
        }
        segments.push(Segment::Citation {
            citation_id: citation.id.clone(),
            source_id: citation.source_id.clone(),
            text: citation.text.clone(),
        });
        cursor = start + citation.text.len();
    }

    if cursor < content.len() {
        segments.push(Segment::Text(content[cursor..].to_string()));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceKind;
    use chrono::Utc;

    fn source(id: &str, title: &str, kind: SourceKind, payload: &str) -> Source {
        let (content, url) = match kind {
            SourceKind::Text => (Some(payload.to_string()), None),
            _ => (None, Some(payload.to_string())),
        };
        Source {
            id: id.to_string(),
            kind,
            title: title.to_string(),
            content,
            url,
            date_added: Utc::now(),
        }
    }

    fn two_sources() -> Vec<Source> {
        vec![
            source("s1", "Neural Networks", SourceKind::Pdf, "https://example.com/nn.pdf"),
            source("s2", "Notes", SourceKind::Text, "gradient descent"),
        ]
    }

    fn citation(source_id: &str, text: &str) -> Citation {
        Citation {
            id: new_id(),
            source_id: source_id.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn context_numbers_sources_in_order() {
        assert_eq!(
            build_context(&two_sources()),
            "Source 1: Neural Networks\nhttps://example.com/nn.pdf\n\nSource 2: Notes\ngradient descent"
        );
        assert_eq!(build_context(&[]), "");
    }

    #[test]
    fn messages_carry_context_and_prompt_verbatim() {
        let messages = build_messages("  Summarize  ", &two_sources());
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, CompletionRole::System);
        assert!(messages[0].content.contains("[1], [2]"));
        assert!(messages[0].content.ends_with(&build_context(&two_sources())));
        assert_eq!(messages[1].role, CompletionRole::User);
        assert_eq!(messages[1].content, "  Summarize  ");
    }

    #[test]
    fn markers_map_to_sources_by_ordinal() {
        let citations = extract_citations("A [1] B [2] C", &two_sources());
        let pairs: Vec<(&str, &str)> = citations
            .iter()
            .map(|c| (c.source_id.as_str(), c.text.as_str()))
            .collect();
        assert_eq!(pairs, [("s1", "[1]"), ("s2", "[2]")]);
        assert_ne!(citations[0].id, citations[1].id);
    }

    #[test]
    fn out_of_range_and_zero_markers_are_dropped() {
        assert!(extract_citations("[5]", &two_sources()).is_empty());
        assert!(extract_citations("[0]", &two_sources()).is_empty());
        assert!(extract_citations("[99999999999999999999999]", &two_sources()).is_empty());
        assert!(extract_citations("[-1] [a] [] [1.5]", &two_sources()).is_empty());
        assert!(extract_citations("[1]", &[]).is_empty());
    }

    #[test]
    fn repeated_markers_each_produce_a_citation() {
        let citations = extract_citations("[2] then [1] and [2] again, [3]", &two_sources());
        let texts: Vec<&str> = citations.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["[2]", "[1]", "[2]"]);
    }

    #[test]
    fn only_ascii_digits_form_markers() {
        assert!(extract_citations("see [\u{ff11}] and [\u{0661}]", &two_sources()).is_empty());
    }

    #[test]
    fn leading_zeros_keep_the_literal_marker() {
        let citations = extract_citations("see [01]", &two_sources());
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].source_id, "s1");
        assert_eq!(citations[0].text, "[01]");
    }

    #[test]
    fn content_without_citations_is_one_text_span() {
        assert_eq!(
            split_content("plain", &[]),
            vec![Segment::Text("plain".to_string())]
        );
        assert!(split_content("", &[]).is_empty());
    }

    #[test]
    fn split_orders_citations_by_position() {
        let second = citation("s2", "[2]");
        let first = citation("s1", "[1]");
        let segments = split_content("Point one [1]. Point two [2].", &[second.clone(), first.clone()]);

        assert_eq!(
            segments,
            vec![
                Segment::Text("Point one ".to_string()),
                Segment::Citation {
                    citation_id: first.id,
                    source_id: "s1".to_string(),
                    text: "[1]".to_string(),
                },
                Segment::Text(". Point two ".to_string()),
                Segment::Citation {
                    citation_id: second.id,
                    source_id: "s2".to_string(),
                    text: "[2]".to_string(),
                },
                Segment::Text(".".to_string()),
            ]
        );
    }

    #[test]
    fn duplicate_markers_are_consumed_left_to_right() {
        let a = citation("s1", "[1]");
        let b = citation("s1", "[1]");
        let segments = split_content("[1] and [1]", &[a.clone(), b.clone()]);

        let ids: Vec<&str> = segments
            .iter()
            .filter_map(|s| match s {
                Segment::Citation { citation_id, .. } => Some(citation_id.as_str()),
                Segment::Text(_) => None,
            })
            .collect();
        assert_eq!(ids, [a.id.as_str(), b.id.as_str()]);
        assert_eq!(segments[1], Segment::Text(" and ".to_string()));
    }

    #[test]
    fn citations_missing_from_content_are_skipped() {
        let stale = citation("gone", "[7]");
        let segments = split_content("no markers here", &[stale]);
        assert_eq!(segments, vec![Segment::Text("no markers here".to_string())]);
    }
}
