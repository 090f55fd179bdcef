//! Heuristic protocol importer: turns raw document text (plain text or
//! PDF-derived) plus a filename into a structured `ProtocolDraft`.
//!
//! The heuristics intentionally favor producing usable, if imperfect,
//! structured output over rejecting ambiguous input. Imported drafts are
//! reviewed by a human before clinical use.

use crate::models::protocol::types::{Category, ExtractedStep, ProtocolDraft, Severity};

/// Fixed guidelines string stamped on every imported draft.
pub const IMPORT_GUIDELINES: &str =
    "Imported from uploaded document. Review against current local protocols before use.";

/// Known medication names, scanned case-insensitively against the full text.
/// Extraction output preserves this order.
pub const MEDICATION_VOCABULARY: [&str; 14] = [
    "epinephrine",
    "aspirin",
    "nitroglycerin",
    "morphine",
    "albuterol",
    "atropine",
    "amiodarone",
    "lidocaine",
    "fentanyl",
    "naloxone",
    "dextrose",
    "thiamine",
    "furosemide",
    "adenosine",
];

/// Category keyword groups, checked in priority order. First group with a
/// hit wins; no stemming or negation handling.
const CATEGORY_KEYWORDS: [(Category, [&str; 3]); 4] = [
    (Category::Cardiac, ["cardiac", "heart", "chest pain"]),
    (Category::Trauma, ["trauma", "injury", "fracture"]),
    (Category::Respiratory, ["respiratory", "breathing", "airway"]),
    (Category::Neurological, ["neurological", "stroke", "seizure"]),
];

const CRITICAL_KEYWORDS: [&str; 3] = ["emergency", "critical", "life threatening"];
const URGENT_KEYWORDS: [&str; 2] = ["urgent", "priority"];

/// Human title from the filename only, never from document content:
/// extension stripped, separators replaced with spaces.
fn title_from_filename(filename: &str) -> String {
    let stem = match filename.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => filename,
    };
    stem.replace(['-', '_'], " ").trim().to_string()
}

fn classify_category(lower: &str) -> Category {
    for (category, keywords) in &CATEGORY_KEYWORDS {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return *category;
        }
    }
    Category::General
}

fn classify_severity(lower: &str) -> Severity {
    if CRITICAL_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        Severity::Critical
    } else if URGENT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        Severity::Urgent
    } else {
        Severity::Routine
    }
}

/// Parse `"<N>. <title>"` or `"<N> <title>"`. The character after the digits
/// must be a period or whitespace, so words like "12lead" are not split.
fn leading_number(line: &str) -> Option<(i64, &str)> {
    let digits_end = line
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(line.len());
    if digits_end == 0 {
        return None;
    }
    let number: i64 = line[..digits_end].parse().ok()?;
    let rest = &line[digits_end..];

    let rest = if let Some(after_period) = rest.strip_prefix('.') {
        after_period
    } else if rest.starts_with(char::is_whitespace) {
        rest
    } else {
        return None;
    };

    let title = rest.trim_start();
    if title.is_empty() {
        None
    } else {
        Some((number, title))
    }
}

/// Parse a bullet line (`-`, `•`, or `*` marker followed by text).
fn bullet_text(line: &str) -> Option<&str> {
    let rest = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('•'))
        .or_else(|| line.strip_prefix('*'))?;
    let text = rest.trim_start();
    if text.is_empty() { None } else { Some(text) }
}

/// Plain lines can open an implicit section header, but only while no step
/// is open: longer than 10 and shorter than 100 characters, no period.
fn is_implicit_header(line: &str) -> bool {
    line.len() > 10 && line.len() < 100 && !line.contains('.')
}

fn fallback_steps() -> Vec<ExtractedStep> {
    vec![
        ExtractedStep {
            step: 1,
            title: "Assessment".to_string(),
            items: vec!["Perform primary and secondary patient assessment".to_string()],
        },
        ExtractedStep {
            step: 2,
            title: "Treatment".to_string(),
            items: vec!["Provide treatment according to patient presentation".to_string()],
        },
        ExtractedStep {
            step: 3,
            title: "Transport".to_string(),
            items: vec!["Transport to the appropriate receiving facility".to_string()],
        },
    ]
}

fn extract_steps(text: &str) -> Vec<ExtractedStep> {
    let mut steps: Vec<ExtractedStep> = Vec::new();
    let mut current: Option<ExtractedStep> = None;
    // Auto-number for implicit headers; tracks the source document's own
    // numbering once numbered lines appear.
    let mut counter: i64 = 1;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((number, title)) = leading_number(line) {
            if let Some(done) = current.take() {
                steps.push(done);
            }
            current = Some(ExtractedStep {
                step: number,
                title: title.to_string(),
                items: Vec::new(),
            });
            counter = number + 1;
        } else if let Some(item) = bullet_text(line) {
            // Bullets outside any step are discarded.
            if let Some(step) = current.as_mut() {
                step.items.push(item.to_string());
            }
        } else if current.is_none() && is_implicit_header(line) {
            current = Some(ExtractedStep {
                step: counter,
                title: line.to_string(),
                items: Vec::new(),
            });
            counter += 1;
        }
    }

    if let Some(done) = current.take() {
        steps.push(done);
    }

    if steps.is_empty() {
        steps = fallback_steps();
    }
    steps
}

fn extract_medications(lower: &str) -> Vec<String> {
    MEDICATION_VOCABULARY
        .iter()
        .filter(|med| lower.contains(*med))
        .map(|med| med.to_string())
        .collect()
}

/// Convert unstructured document text plus a filename into a protocol draft.
///
/// Pure and deterministic; never fails on non-empty text. Empty-input and
/// unsupported-type checks belong to the upload handler, not here.
pub fn extract(text: &str, filename: &str) -> ProtocolDraft {
    let lower = text.to_lowercase();

    ProtocolDraft {
        name: title_from_filename(filename),
        category: classify_category(&lower),
        severity: classify_severity(&lower),
        description: format!("Imported from {filename}"),
        steps: extract_steps(text),
        medications: extract_medications(&lower),
        guidelines: IMPORT_GUIDELINES.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_strips_extension_and_separators() {
        assert_eq!(title_from_filename("chest-pain_protocol.pdf"), "chest pain protocol");
        assert_eq!(title_from_filename("notes.txt"), "notes");
        assert_eq!(title_from_filename("no_extension"), "no extension");
    }

    #[test]
    fn leading_number_forms() {
        assert_eq!(leading_number("1. Assessment"), Some((1, "Assessment")));
        assert_eq!(leading_number("12 Airway check"), Some((12, "Airway check")));
        assert_eq!(leading_number("3.Scene safety"), Some((3, "Scene safety")));
        assert_eq!(leading_number("12lead ECG"), None);
        assert_eq!(leading_number("- bullet"), None);
        assert_eq!(leading_number("7."), None);
    }

    #[test]
    fn bullet_markers() {
        assert_eq!(bullet_text("- Check ABCs"), Some("Check ABCs"));
        assert_eq!(bullet_text("• Give oxygen"), Some("Give oxygen"));
        assert_eq!(bullet_text("* Reassess"), Some("Reassess"));
        assert_eq!(bullet_text("Check ABCs"), None);
        assert_eq!(bullet_text("-"), None);
    }

    #[test]
    fn implicit_header_bounds() {
        assert!(is_implicit_header("Scene safety survey"));
        assert!(!is_implicit_header("Short"));
        assert!(!is_implicit_header("Sentence with a period."));
        assert!(!is_implicit_header(&"x".repeat(100)));
    }
}
