/// Code fence detection for block segmentation.
///
/// The segmenter only needs to know whether a line opens or closes a fenced
/// region; it does not validate fence length or match openers to closers.
pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";

    /// Whether `line` starts with a backtick fence marker.
    ///
    /// Only column-zero fences count; indented fences (inside list items)
    /// are left to the single-block parser.
    pub fn is_marker(line: &str) -> bool {
        line.trim_end_matches(['\r', '\n'])
            .starts_with(Self::BACKTICKS)
    }
}
