pub mod error;
pub mod models;
pub mod parsing;
pub mod render;

// Re-export key types for easier usage
pub use error::{ImageError, RenderError};
pub use models::*;
pub use parsing::{Cancellation, MarkdownParser, ParseOptions};
pub use render::{
    Applied, ImageFetcher, ImageOutcome, LinkSignal, Refresh, RenderContext, Rendered,
    RenderedDocument, Renderer, UpdateOutcome, VisualBackend,
};
