//! Page canvas arithmetic: a top-down cursor over fixed point coordinates.
//!
//! PDF user space puts the origin at the bottom-left corner, so the cursor starts
//! near `height_pt` and moves down. A line that would land below the bottom margin
//! goes to the top of a fresh page instead.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::FontFace;
use crate::layout::wrap::{sanitize, wrap_text};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub face: FontFace,
    pub size_pt: f32,
}

impl TextStyle {
    pub const HEADING: TextStyle = TextStyle {
        face: FontFace::HelveticaBold,
        size_pt: 16.0,
    };
    pub const SECTION: TextStyle = TextStyle {
        face: FontFace::HelveticaBold,
        size_pt: 12.0,
    };
    pub const BODY: TextStyle = TextStyle {
        face: FontFace::Helvetica,
        size_pt: 12.0,
    };
}

/// Page geometry in PDF points (1/72 inch).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSpec {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_left_pt: f32,
    pub margin_right_pt: f32,
    /// Distance from the top edge to the first baseline on page one.
    pub first_baseline_from_top_pt: f32,
    /// Distance from the top edge to the first baseline on continuation pages.
    pub top_margin_pt: f32,
    /// No baseline is placed below this height.
    pub bottom_margin_pt: f32,
}

impl PageSpec {
    /// US letter with a 100pt left inset.
    pub fn letter() -> Self {
        Self {
            width_pt: 612.0,
            height_pt: 792.0,
            margin_left_pt: 100.0,
            margin_right_pt: 100.0,
            first_baseline_from_top_pt: 100.0,
            top_margin_pt: 72.0,
            bottom_margin_pt: 72.0,
        }
    }

    pub fn text_width_pt(&self) -> f32 {
        self.width_pt - self.margin_left_pt - self.margin_right_pt
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::letter()
    }
}

/// One string drawn at a baseline position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedText {
    pub x: f32,
    pub y: f32,
    pub style: TextStyle,
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLayout {
    pub items: Vec<PlacedText>,
}

/// The fully positioned document, ready for a PDF writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentLayout {
    pub width_pt: f32,
    pub height_pt: f32,
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All drawn strings, page by page, top to bottom.
    #[cfg(test)]
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .flat_map(|p| p.items.iter().map(|i| i.text.as_str()))
    }

    /// Finds the first placed item whose text equals `text`, with its page index.
    #[cfg(test)]
    pub fn find(&self, text: &str) -> Option<(usize, &PlacedText)> {
        self.pages.iter().enumerate().find_map(|(page, p)| {
            p.items.iter().find(|i| i.text == text).map(|i| (page, i))
        })
    }
}

pub struct PageCursor<'a> {
    spec: &'a PageSpec,
    y: f32,
    pages: Vec<PageLayout>,
}

impl<'a> PageCursor<'a> {
    pub fn new(spec: &'a PageSpec) -> Self {
        Self {
            spec,
            y: spec.height_pt - spec.first_baseline_from_top_pt,
            pages: vec![PageLayout::default()],
        }
    }

    #[cfg(test)]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[cfg(test)]
    pub fn page_index(&self) -> usize {
        self.pages.len() - 1
    }

    /// Moves the cursor down by `dy` points.
    pub fn advance(&mut self, dy: f32) {
        self.y -= dy;
    }

    /// Starts a new page when moving down `dy` from here would cross the bottom margin.
    pub fn ensure_room(&mut self, dy: f32) {
        if self.y - dy < self.spec.bottom_margin_pt {
            self.new_page();
        }
    }

    pub fn new_page(&mut self) {
        self.pages.push(PageLayout::default());
        self.y = self.spec.height_pt - self.spec.top_margin_pt;
    }

    /// Draws `text` at the cursor, `indent_pt` right of the left margin, wrapping to
    /// the remaining text width. The cursor moves down `step_pt` after every line.
    /// Returns the number of lines drawn.
    pub fn write(&mut self, indent_pt: f32, text: &str, style: TextStyle, step_pt: f32) -> usize {
        let clean = sanitize(text);
        let max_width = (self.spec.text_width_pt() - indent_pt).max(style.size_pt);
        let lines = wrap_text(&clean, style.face, style.size_pt, max_width);
        let count = lines.len();

        for line in lines {
            self.ensure_room(step_pt);
            let x = self.spec.margin_left_pt + indent_pt;
            let y = self.y;
            if let Some(page) = self.pages.last_mut() {
                page.items.push(PlacedText {
                    x,
                    y,
                    style,
                    text: line,
                });
            }
            self.advance(step_pt);
        }
        count
    }

    pub fn finish(self) -> DocumentLayout {
        DocumentLayout {
            width_pt: self.spec.width_pt,
            height_pt: self.spec.height_pt,
            pages: self.pages,
        }
    }
}
