// Page layout for the PDF renderer.
// Implements: font metrics, greedy line wrap, top-down page cursor, résumé section placement.
// Pure CPU work. Callers run it together with PDF serialization inside spawn_blocking.

pub mod font_metrics;
pub mod page;
pub mod resume_layout;
pub mod wrap;

// Re-export the public API consumed by the renderers and handlers.
pub use font_metrics::FontFace;
pub use page::{DocumentLayout, PageSpec};
pub use resume_layout::layout_resume;
