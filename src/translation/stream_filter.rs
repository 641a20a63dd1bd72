/*!
 * Stop-marker filtering for streamed model output.
 */

/// Control tokens that end the visible output
pub const STOP_MARKERS: &[&str] = &["<end_of_turn>", "<eos>", "<bos>"];

/// A chunk with stop markers removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredChunk {
    /// Visible text
    pub text: String,
    /// A stop marker was present; the stream should end after this chunk
    pub reached_stop: bool,
}

/// Remove every stop marker from `chunk`
pub fn strip_stop_markers(chunk: &str) -> FilteredChunk {
    let mut text = chunk.to_string();
    let mut reached_stop = false;

    for marker in STOP_MARKERS {
        if text.contains(marker) {
            reached_stop = true;
            text = text.replace(marker, "");
        }
    }

    FilteredChunk { text, reached_stop }
}
