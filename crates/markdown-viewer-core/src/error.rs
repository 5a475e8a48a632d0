use crate::models::ElementKind;

/// Error type a visual backend reports, boxed so [`RenderError`] stays
/// independent of the backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to create document container: {source}")]
    Container { source: BoxError },
    #[error("Failed to create {kind} visual: {source}")]
    Create { kind: ElementKind, source: BoxError },
    #[error("Failed to update {kind} visual: {source}")]
    Update { kind: ElementKind, source: BoxError },
    #[error("Failed to attach {kind} visual: {source}")]
    Append { kind: ElementKind, source: BoxError },
    #[error("Failed to remove replaced document: {source}")]
    Remove { source: BoxError },
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Image not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image fetch failed: {0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_element_kind() {
        let err = RenderError::Create {
            kind: ElementKind::CodeBlock,
            source: "font missing".into(),
        };
        assert_eq!(err.to_string(), "Failed to create code block visual: font missing");
    }
}
