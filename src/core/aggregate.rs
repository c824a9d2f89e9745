// src/core/aggregate.rs
use crate::core::layout::{LayoutResult, Line, Word};

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Rebuild the document text from high-confidence lines and compute the
/// corpus-wide average word confidence.
///
/// A line is kept when every word inside its first span meets the threshold;
/// a line with no matched words is kept unconditionally. The average runs
/// over every word matched to a line, whether or not the line was kept.
pub fn aggregate_layout(result: &LayoutResult, confidence_threshold: f64) -> (String, f64) {
    let mut full_text = String::new();
    let mut total_confidence = 0.0;
    let mut total_words = 0usize;

    for page in &result.pages {
        for line in &page.lines {
            let words: Vec<&Word> = page
                .words
                .iter()
                .filter(|word| line_contains(line, word))
                .collect();

            if words.iter().all(|word| word.confidence >= confidence_threshold) {
                full_text.push_str(&line.content);
                full_text.push('\n');
            }

            for word in &words {
                total_confidence += word.confidence;
                total_words += 1;
            }
        }
    }

    let avg_confidence = if total_words > 0 {
        total_confidence / total_words as f64
    } else {
        0.0
    };

    (full_text, avg_confidence)
}

// Containment is checked against the line's first span only; words that
// fall into a later span of a multi-span line are not attributed to it.
fn line_contains(line: &Line, word: &Word) -> bool {
    match line.spans.first() {
        Some(span) => span.contains(&word.span),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::{Page, Span};

    fn word(content: &str, offset: usize, length: usize, confidence: f64) -> Word {
        Word {
            content: content.to_string(),
            span: Span { offset, length },
            confidence,
        }
    }

    fn line(content: &str, offset: usize, length: usize) -> Line {
        Line {
            content: content.to_string(),
            spans: vec![Span { offset, length }],
        }
    }

    #[test]
    fn filters_low_confidence_lines_but_averages_over_all_words() {
        let layout = LayoutResult {
            pages: vec![Page {
                page_number: 1,
                lines: vec![line("good line", 0, 9), line("bad", 10, 3)],
                words: vec![
                    word("good", 0, 4, 0.9),
                    word("line", 5, 4, 0.85),
                    word("bad", 10, 3, 0.5),
                ],
            }],
        };

        let (text, avg) = aggregate_layout(&layout, 0.8);
        assert_eq!(text, "good line\n");
        assert!((avg - (0.9 + 0.85 + 0.5) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn line_without_contained_words_is_always_kept() {
        let layout = LayoutResult {
            pages: vec![Page {
                page_number: 1,
                lines: vec![line("orphan line", 0, 11)],
                words: vec![word("far", 100, 3, 0.1)],
            }],
        };

        let (text, avg) = aggregate_layout(&layout, 0.99);
        assert_eq!(text, "orphan line\n");
        // The stray word is outside every line range and never counted.
        assert_eq!(avg, 0.0);
    }

    #[test]
    fn threshold_comparison_is_inclusive() {
        let layout = LayoutResult {
            pages: vec![Page {
                page_number: 1,
                lines: vec![line("edge", 0, 4)],
                words: vec![word("edge", 0, 4, 0.8)],
            }],
        };

        let (text, _) = aggregate_layout(&layout, 0.8);
        assert_eq!(text, "edge\n");
    }

    #[test]
    fn only_first_span_attributes_words() {
        let multi_span_line = Line {
            content: "split line".to_string(),
            spans: vec![Span { offset: 0, length: 5 }, Span { offset: 50, length: 5 }],
        };
        let layout = LayoutResult {
            pages: vec![Page {
                page_number: 1,
                lines: vec![multi_span_line],
                // Low-confidence word in the second span; first span is empty,
                // so the line passes vacuously.
                words: vec![word("later", 50, 5, 0.1)],
            }],
        };

        let (text, avg) = aggregate_layout(&layout, 0.8);
        assert_eq!(text, "split line\n");
        assert_eq!(avg, 0.0);
    }

    #[test]
    fn empty_layout_yields_zero_confidence() {
        let (text, avg) = aggregate_layout(&LayoutResult::default(), 0.8);
        assert!(text.is_empty());
        assert_eq!(avg, 0.0);
    }
}
