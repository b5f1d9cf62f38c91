//! Incremental decoder for the marker-framed chat stream.
//!
//! Wire format: the backend pushes plain text in frames, each introduced by
//! the literal marker `data:` and usually terminated by a blank line
//! (`\n\n`). The marker acts as a separator, not content: everything between
//! two markers is one fragment, minus one trailing `\n\n` when present.
//! Chunk boundaries carry no meaning: a marker or a multi-byte character
//! may be split across reads, so the decoder keeps a carry-over byte buffer
//! and only materializes a fragment once its bytes are complete.
//! Re-chunking the same byte stream at different split points never changes
//! the decoded output.

use bytes::BytesMut;

const FRAME_MARKER: &[u8] = b"data:";

#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: BytesMut,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of raw response bytes, returning every fragment the
    /// buffer now completes, in stream order. Bytes after the last full
    /// marker stay buffered until more input (or [`Self::finish`]) arrives.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);
        let mut fragments = Vec::new();
        while let Some(idx) = find_marker(&self.buf) {
            let head = self.buf.split_to(idx + FRAME_MARKER.len());
            let mut frame = &head[..idx];
            if let Some(stripped) = frame.strip_suffix(b"\n\n") {
                frame = stripped;
            }
            if !frame.is_empty() {
                fragments.push(String::from_utf8_lossy(frame).into_owned());
            }
        }
        fragments
    }

    /// Flush the carry-over once input is exhausted. The final frame may
    /// arrive without a terminator, so the remainder is emitted after
    /// dropping a leading marker and trailing whitespace.
    pub fn finish(self) -> Option<String> {
        let tail = self.buf.strip_prefix(FRAME_MARKER).unwrap_or(&self.buf);
        let text = String::from_utf8_lossy(tail);
        let text = text.trim_end();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}

fn find_marker(buf: &[u8]) -> Option<usize> {
    buf.windows(FRAME_MARKER.len())
        .position(|window| window == FRAME_MARKER)
}
