pub mod resume;

pub use resume::{PayloadError, ResumeData};
