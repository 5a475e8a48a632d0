pub mod element;
pub mod inline;

pub use element::*;
pub use inline::Inline;
