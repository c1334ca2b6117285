//! Best-effort parsing of the model's free-text reply
//!
//! The reply is requested in a fixed five-section layout, but nothing enforces
//! it. Each field is recovered independently: a labelled regex span first,
//! then a line scan when the labels drifted. Nothing here returns an error.

use crate::processing::document::AnalysisResult;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

/// Returned in place of a section that could not be located.
pub const EXTRACTION_FAILED: &str = "❌ Could not extract this section properly.";

pub const MATCH_SCORE: &str = "Match Score";
pub const KEY_STRENGTHS: &str = "Key Strengths";
pub const AREAS_FOR_IMPROVEMENT: &str = "Areas for Improvement";
pub const KEYWORDS_MISSING: &str = "Keywords Missing";
pub const SUMMARY: &str = "Summary";

/// Score phrasings, highest priority first. Only ASCII digits count as a
/// score; other Unicode digits are not read as numbers.
static SCORE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"Match Score:\s*([0-9]+)",
        r"Score:\s*([0-9]+)",
        r"([0-9]+)/100",
        r"([0-9]+)\s*out of\s*100",
        r"([0-9]+)\s*/\s*100",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("score pattern is valid"))
    .collect()
});

/// Find the match score in `text`.
///
/// Each pattern is tried once, against its first match anywhere in the text.
/// A capture that does not parse or lies outside 0..=100 moves on to the next
/// pattern rather than to the next occurrence.
pub fn extract_score(text: &str) -> Option<u8> {
    for pattern in SCORE_PATTERNS.iter() {
        let Some(captures) = pattern.captures(text) else {
            continue;
        };

        match captures[1].parse::<u32>() {
            Ok(score) if score <= 100 => return Some(score as u8),
            Ok(score) => debug!("Ignoring out-of-range score {} from /{}/", score, pattern),
            Err(e) => debug!("Ignoring unparsable score from /{}/: {}", pattern, e),
        }
    }

    None
}

/// Text between `section_name:` and `next_section:` (or end of text), trimmed.
///
/// Falls back to a line scan when the labelled span is not found, and returns
/// [`EXTRACTION_FAILED`] when no line mentions `section_name` at all.
pub fn extract_section(text: &str, section_name: &str, next_section: Option<&str>) -> String {
    let next_section = next_section.filter(|next| !next.is_empty());

    if let Some(section) = labelled_span(text, section_name, next_section) {
        return section;
    }

    debug!("No labelled span for '{}', scanning lines", section_name);
    scan_lines(text, section_name, next_section).unwrap_or_else(|| EXTRACTION_FAILED.to_string())
}

fn labelled_span(text: &str, section_name: &str, next_section: Option<&str>) -> Option<String> {
    let pattern = match next_section {
        Some(next) => format!(
            r"(?s){}:(.*?){}:",
            regex::escape(section_name),
            regex::escape(next)
        ),
        None => format!(r"(?s){}:(.*?)$", regex::escape(section_name)),
    };

    let re = Regex::new(&pattern).ok()?;
    re.captures(text)
        .map(|captures| captures[1].trim().to_string())
}

fn scan_lines(text: &str, section_name: &str, next_section: Option<&str>) -> Option<String> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut start = None;
    let mut end = None;

    // A later mention of the section name moves the start; known to over-skip
    // when the name recurs inside earlier prose.
    for (idx, line) in lines.iter().enumerate() {
        if line.contains(section_name) {
            start = Some(idx);
        } else if let (Some(_), Some(next)) = (start, next_section) {
            if line.contains(next) {
                end = Some(idx);
                break;
            }
        }
    }

    let start = start?;
    let body = match end {
        Some(end) => &lines[start + 1..end],
        None => &lines[start + 1..],
    };

    Some(body.join("\n").trim().to_string())
}

/// Split a raw reply into its score and four sections.
pub fn parse_response(raw_text: &str) -> AnalysisResult {
    AnalysisResult {
        score: extract_score(raw_text),
        strengths: extract_section(raw_text, KEY_STRENGTHS, Some(AREAS_FOR_IMPROVEMENT)),
        improvements: extract_section(raw_text, AREAS_FOR_IMPROVEMENT, Some(KEYWORDS_MISSING)),
        missing_keywords: extract_section(raw_text, KEYWORDS_MISSING, Some(SUMMARY)),
        summary: extract_section(raw_text, SUMMARY, None),
        raw_text: raw_text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "Match Score: 85

Key Strengths:
• Strong Rust background
• Led two database migrations

Areas for Improvement:
• No cloud certifications

Keywords Missing:
• Kubernetes
• Terraform

Summary:
Strong candidate overall. Add cloud keywords before applying.
";

    #[test]
    fn test_score_for_every_phrasing_and_value() {
        let phrasings: [fn(u32) -> String; 5] = [
            |n| format!("Match Score: {}", n),
            |n| format!("Overall Score: {} based on fit", n),
            |n| format!("I would rate this {}/100.", n),
            |n| format!("Roughly {} out of 100 overall", n),
            |n| format!("Fit is {} / 100", n),
        ];

        for n in 0..=100u32 {
            for phrase in &phrasings {
                let text = format!("Analysis follows.\n{}\nMore text.", phrase(n));
                assert_eq!(extract_score(&text), Some(n as u8), "text: {}", text);
            }
        }
    }

    #[test]
    fn test_out_of_range_score_is_never_returned() {
        for n in ["101", "150", "999", "12345678901234567890"] {
            assert_eq!(extract_score(&format!("Match Score: {}", n)), None);
            assert_eq!(extract_score(&format!("{} out of 100", n)), None);
        }
    }

    #[test]
    fn test_out_of_range_falls_through_to_next_pattern() {
        let text = "Match Score: 150\nRealistically this is 85/100.";
        assert_eq!(extract_score(text), Some(85));
    }

    #[test]
    fn test_score_absent_is_not_an_error() {
        assert_eq!(extract_score("The candidate looks promising."), None);
        assert_eq!(extract_score(""), None);
    }

    #[test]
    fn test_non_ascii_digits_are_not_a_score() {
        assert_eq!(extract_score("Match Score: ٧٢"), None);
        assert_eq!(extract_score("Match Score: ٧٢\nOverall this is 64/100."), Some(64));
    }

    #[test]
    fn test_match_score_takes_priority() {
        assert_eq!(extract_score("Score: 40\nMatch Score: 70"), Some(70));
    }

    #[test]
    fn test_well_formed_sections_are_interior_text() {
        assert_eq!(
            extract_section(WELL_FORMED, KEY_STRENGTHS, Some(AREAS_FOR_IMPROVEMENT)),
            "• Strong Rust background\n• Led two database migrations"
        );
        assert_eq!(
            extract_section(WELL_FORMED, AREAS_FOR_IMPROVEMENT, Some(KEYWORDS_MISSING)),
            "• No cloud certifications"
        );
        assert_eq!(
            extract_section(WELL_FORMED, KEYWORDS_MISSING, Some(SUMMARY)),
            "• Kubernetes\n• Terraform"
        );
        assert_eq!(
            extract_section(WELL_FORMED, SUMMARY, None),
            "Strong candidate overall. Add cloud keywords before applying."
        );
    }

    #[test]
    fn test_reextracting_a_section_is_stable() {
        let first = extract_section(WELL_FORMED, KEY_STRENGTHS, Some(AREAS_FOR_IMPROVEMENT));
        let framed = format!("{}:\n{}\n{}:", KEY_STRENGTHS, first, AREAS_FOR_IMPROVEMENT);

        assert_eq!(
            extract_section(&framed, KEY_STRENGTHS, Some(AREAS_FOR_IMPROVEMENT)),
            first
        );
        assert_eq!(
            extract_section(WELL_FORMED, KEY_STRENGTHS, Some(AREAS_FOR_IMPROVEMENT)),
            first
        );
    }

    #[test]
    fn test_line_scan_when_colons_are_missing() {
        let text = "Match Score 70\nKey Strengths\n• Go experience\nAreas for Improvement\n• Cloud skills\nKeywords Missing\n• Kubernetes\nSummary\nSolid match.";

        assert_eq!(
            extract_section(text, KEY_STRENGTHS, Some(AREAS_FOR_IMPROVEMENT)),
            "• Go experience"
        );
        assert_eq!(
            extract_section(text, AREAS_FOR_IMPROVEMENT, Some(KEYWORDS_MISSING)),
            "• Cloud skills"
        );
        assert_eq!(extract_section(text, SUMMARY, None), "Solid match.");
    }

    #[test]
    fn test_line_scan_when_only_next_label_drifts() {
        let text = "Key Strengths:\n• Go\n\nAreas for Improvement\n• Cloud";
        assert_eq!(
            extract_section(text, KEY_STRENGTHS, Some(AREAS_FOR_IMPROVEMENT)),
            "• Go"
        );
    }

    #[test]
    fn test_line_scan_starts_after_last_mention() {
        let text = "Key Strengths\nthe Key Strengths below are notable\n• Rust\nAreas for Improvement\n• none";
        assert_eq!(
            extract_section(text, KEY_STRENGTHS, Some(AREAS_FOR_IMPROVEMENT)),
            "• Rust"
        );
    }

    #[test]
    fn test_line_scan_without_end_runs_to_end_of_text() {
        let text = "Key Strengths\n• Rust\n• Go\n";
        assert_eq!(
            extract_section(text, KEY_STRENGTHS, Some(AREAS_FOR_IMPROVEMENT)),
            "• Rust\n• Go"
        );
    }

    #[test]
    fn test_section_on_last_line_is_empty_not_sentinel() {
        assert_eq!(extract_section("intro\nSummary", SUMMARY, None), "");
    }

    #[test]
    fn test_missing_section_yields_sentinel() {
        assert_eq!(
            extract_section("Match Score: 50", KEY_STRENGTHS, Some(AREAS_FOR_IMPROVEMENT)),
            EXTRACTION_FAILED
        );
        assert_eq!(extract_section("", SUMMARY, None), EXTRACTION_FAILED);
    }

    #[test]
    fn test_labels_are_matched_literally() {
        let text = "C++ (advanced):\n• templates\nNext.Step:\nrest";
        assert_eq!(
            extract_section(text, "C++ (advanced)", Some("Next.Step")),
            "• templates"
        );
    }

    #[test]
    fn test_parse_reference_reply() {
        let reply = "Match Score: 72\nKey Strengths:\n• Go experience\nAreas for Improvement:\n• Cloud skills\nKeywords Missing:\n• Kubernetes\nSummary:\nSolid match.";
        let result = parse_response(reply);

        assert_eq!(result.score, Some(72));
        assert!(result.strengths.contains("Go experience"));
        assert!(result.improvements.contains("Cloud skills"));
        assert!(result.missing_keywords.contains("Kubernetes"));
        assert_eq!(result.summary, "Solid match.");
        assert_eq!(result.raw_text, reply);
    }

    #[test]
    fn test_fields_degrade_independently() {
        let reply = "Match Score: 60\nKey Strengths:\n• A\nAreas for Improvement:\n• B\nSummary:\nOk.";
        let result = parse_response(reply);

        assert_eq!(result.score, Some(60));
        assert_eq!(result.strengths, "• A");
        assert_eq!(result.missing_keywords, EXTRACTION_FAILED);
        assert_eq!(result.summary, "Ok.");
        assert!(result.improvements.starts_with("• B"));
    }

    #[test]
    fn test_unstructured_reply_never_fails() {
        let result = parse_response("I'm sorry, I can't help with that.");
        assert_eq!(result.score, None);
        assert_eq!(result.strengths, EXTRACTION_FAILED);
        assert_eq!(result.improvements, EXTRACTION_FAILED);
        assert_eq!(result.missing_keywords, EXTRACTION_FAILED);
        assert_eq!(result.summary, EXTRACTION_FAILED);
    }
}
