//! PDF output for a positioned `DocumentLayout`, using the built-in Helvetica faces.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, Pt};
use tracing::debug;

use crate::layout::{layout_resume, DocumentLayout, FontFace, PageSpec};
use crate::models::ResumeData;
use crate::render::RenderError;

const LAYER_NAME: &str = "Layer 1";

#[derive(Debug, Clone)]
pub struct PdfRender {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// Lays out `data` on `spec` pages and serializes the result.
pub fn render_resume_pdf(data: &ResumeData, spec: &PageSpec) -> Result<PdfRender, RenderError> {
    let layout = layout_resume(data, spec);
    let bytes = render_pdf(&layout, data.heading())?;
    Ok(PdfRender {
        bytes,
        pages: layout.page_count(),
    })
}

/// Writes every placed string of `layout` into a PDF, one PDF page per layout page.
pub fn render_pdf(layout: &DocumentLayout, title: &str) -> Result<Vec<u8>, RenderError> {
    let width = Mm::from(Pt(layout.width_pt));
    let height = Mm::from(Pt(layout.height_pt));

    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER_NAME);
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    for (index, page) in layout.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(width, height, LAYER_NAME);
            doc.get_page(page_idx).get_layer(layer_idx)
        };

        for item in &page.items {
            let font: &IndirectFontRef = match item.style.face {
                FontFace::Helvetica => &regular,
                FontFace::HelveticaBold => &bold,
            };
            layer.use_text(
                item.text.as_str(),
                item.style.size_pt,
                Mm::from(Pt(item.x)),
                Mm::from(Pt(item.y)),
                font,
            );
        }
    }

    let bytes = doc.save_to_bytes().map_err(pdf_error)?;
    debug!(
        pages = layout.page_count(),
        bytes = bytes.len(),
        "PDF serialized"
    );
    Ok(bytes)
}

fn pdf_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Pdf(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_produces_pdf_bytes() {
        let data = ResumeData::from_value(json!({
            "name": "Ada Lovelace",
            "skills": ["Python", "SQL"]
        }))
        .unwrap();
        let render = render_resume_pdf(&data, &PageSpec::letter()).unwrap();
        assert!(render.bytes.starts_with(b"%PDF"));
        assert_eq!(render.pages, 1);
    }

    #[test]
    fn test_render_multi_page_document() {
        let skills: Vec<String> = (0..100).map(|i| format!("Skill {i}")).collect();
        let data = ResumeData::from_value(json!({ "skills": skills })).unwrap();
        let render = render_resume_pdf(&data, &PageSpec::letter()).unwrap();
        assert!(render.bytes.starts_with(b"%PDF"));
        assert!(render.pages >= 2);
    }

    #[test]
    fn test_render_handles_non_latin_text() {
        let data = ResumeData::from_value(json!({
            "name": "Zoë \u{201C}Data\u{201D} Chen",
            "summary": "数据 scientist \u{2014} 5 years"
        }))
        .unwrap();
        let render = render_resume_pdf(&data, &PageSpec::letter()).unwrap();
        assert!(render.bytes.starts_with(b"%PDF"));
    }
}
