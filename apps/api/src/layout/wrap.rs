//! Greedy word wrap against the static font tables.

use crate::layout::font_metrics::{get_metrics, FontFace, FontMetricTable};

/// Wraps `text` into lines no wider than `max_width_pt` at `size_pt`.
///
/// Explicit newlines start a new line; blank input lines are dropped. A single word
/// wider than the line is broken at character boundaries. Empty input returns no lines.
pub fn wrap_text(text: &str, face: FontFace, size_pt: f32, max_width_pt: f32) -> Vec<String> {
    let metrics = get_metrics(face);
    let max_em = max_width_pt / size_pt;

    text.lines()
        .flat_map(|paragraph| wrap_paragraph(paragraph, metrics, max_em))
        .collect()
}

fn wrap_paragraph(paragraph: &str, metrics: &FontMetricTable, max_em: f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in paragraph.split_whitespace() {
        let word_w = metrics.measure_str(word);

        if !current.is_empty() {
            if current_width + metrics.space_width + word_w <= max_em {
                current.push(' ');
                current.push_str(word);
                current_width += metrics.space_width + word_w;
                continue;
            }
            lines.push(std::mem::take(&mut current));
        }

        if word_w <= max_em {
            current.push_str(word);
            current_width = word_w;
        } else {
            let mut pieces = break_word(word, metrics, max_em);
            // The last fragment stays open so the next word can join it.
            let last = pieces.pop().unwrap_or_default();
            current_width = metrics.measure_str(&last);
            current = last;
            lines.extend(pieces);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Splits an over-wide word into fragments that each fit `max_em`.
/// Every fragment holds at least one character.
fn break_word(word: &str, metrics: &FontMetricTable, max_em: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0.0_f32;

    for c in word.chars() {
        let cw = metrics.char_width(c);
        if !piece.is_empty() && width + cw > max_em {
            pieces.push(std::mem::take(&mut piece));
            width = 0.0;
        }
        piece.push(c);
        width += cw;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Maps text onto the Latin-1 subset the built-in PDF fonts encode.
///
/// Typographic punctuation becomes its ASCII equivalent; anything else outside
/// Latin-1 becomes `?`. Control characters other than newline are dropped.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2010}'..='\u{2015}' | '\u{2212}' => out.push('-'),
            '\u{2022}' | '\u{25CF}' | '\u{25AA}' => out.push('*'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' | '\t' => out.push(' '),
            '\n' => out.push('\n'),
            c if c.is_control() => {}
            c if (c as u32) <= 0xFF => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: f32 = 12.0;

    fn width_pt(s: &str) -> f32 {
        get_metrics(FontFace::Helvetica).measure_pt(s, SIZE)
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(wrap_text("", FontFace::Helvetica, SIZE, 400.0).is_empty());
        assert!(wrap_text("   \n  ", FontFace::Helvetica, SIZE, 400.0).is_empty());
    }

    #[test]
    fn test_short_text_is_single_line() {
        let lines = wrap_text("Built churn models", FontFace::Helvetica, SIZE, 412.0);
        assert_eq!(lines, vec!["Built churn models"]);
    }

    #[test]
    fn test_long_text_wraps_within_width() {
        let text = "Designed and shipped a feature store that cut model training time \
                    across four teams while keeping lineage auditable end to end";
        let lines = wrap_text(text, FontFace::Helvetica, SIZE, 200.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(width_pt(line) <= 200.0, "line too wide: {line}");
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_explicit_newlines_start_new_lines() {
        let lines = wrap_text("first\n\nsecond", FontFace::Helvetica, SIZE, 412.0);
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn test_overwide_word_is_broken() {
        let word = "x".repeat(200);
        let lines = wrap_text(&word, FontFace::Helvetica, SIZE, 100.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        for line in &lines {
            assert!(width_pt(line) <= 100.0);
        }
    }

    #[test]
    fn test_word_after_broken_word_joins_last_fragment() {
        let text = format!("{} ok", "x".repeat(28));
        let lines = wrap_text(&text, FontFace::Helvetica, SIZE, 100.0);
        assert!(lines.last().unwrap().ends_with(" ok"));
    }

    #[test]
    fn test_sanitize_maps_typographic_punctuation() {
        assert_eq!(sanitize("it\u{2019}s \u{201C}ok\u{201D}"), "it's \"ok\"");
        assert_eq!(sanitize("2019\u{2013}2023"), "2019-2023");
        assert_eq!(sanitize("\u{2022} item\u{2026}"), "* item...");
    }

    #[test]
    fn test_sanitize_keeps_latin1_and_replaces_others() {
        assert_eq!(sanitize("café"), "café");
        assert_eq!(sanitize("数据"), "??");
        assert_eq!(sanitize("a\tb\u{7}"), "a b");
    }
}
