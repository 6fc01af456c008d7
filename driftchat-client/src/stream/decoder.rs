use tracing::trace;

/// Event-data prefix marking meaningful lines in the stream.
const DATA_PREFIX: &str = "data:";

/// Terminal sentinel payload; never forwarded to JSON parsing.
const DONE_SENTINEL: &str = "[DONE]";

/// A single decoded unit of stream data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseFrame {
    /// A frame payload ready for structured parsing.
    Payload(String),
    /// The `[DONE]` end-of-stream sentinel.
    Done,
}

/// Turns an arbitrarily chunked byte stream into complete frame payloads.
///
/// Chunks carry no framing guarantee: a line, a JSON document, or even a
/// single multi-byte character may be split across chunk boundaries. The
/// decoder buffers the trailing incomplete line and the trailing incomplete
/// UTF-8 sequence between calls, so feeding the same bytes in any
/// partitioning yields the same frames in the same order.
#[derive(Debug, Default)]
pub struct SseFrameDecoder {
    /// Undecoded trailing line fragment; holds at most one incomplete line.
    line_buffer: String,
    /// Trailing bytes of an incomplete UTF-8 sequence from the last chunk.
    utf8_carry: Vec<u8>,
}

impl SseFrameDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one transport chunk, returning every frame it completed.
    ///
    /// Feeding an empty chunk changes nothing and yields nothing.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        if chunk.is_empty() {
            return Vec::new();
        }
        let text = self.decode_chunk(chunk);
        self.line_buffer.push_str(&text);
        self.drain_complete_lines()
    }

    /// Flushes any buffered content once the transport reports completion.
    pub fn finish(&mut self) -> Vec<SseFrame> {
        if !self.utf8_carry.is_empty() {
            let carry = std::mem::take(&mut self.utf8_carry);
            self.line_buffer
                .push_str(&String::from_utf8_lossy(&carry));
        }

        let rest = std::mem::take(&mut self.line_buffer);
        let line = rest.trim_end_matches('\r');
        Self::frame_from_line(line).into_iter().collect()
    }

    /// Decodes a chunk as UTF-8, carrying incomplete sequences across calls.
    fn decode_chunk(&mut self, chunk: &[u8]) -> String {
        let joined;
        let mut rest: &[u8] = if self.utf8_carry.is_empty() {
            chunk
        } else {
            let mut bytes = std::mem::take(&mut self.utf8_carry);
            bytes.extend_from_slice(chunk);
            joined = bytes;
            &joined
        };

        let mut out = String::with_capacity(rest.len());
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, tail) = rest.split_at(err.valid_up_to());
                    // The prefix up to `valid_up_to` is well-formed.
                    out.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        // Sequence may complete in the next chunk.
                        None => {
                            self.utf8_carry = tail.to_vec();
                            break;
                        }
                        // Genuinely invalid bytes; replace and move on.
                        Some(invalid) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &tail[invalid..];
                        }
                    }
                }
            }
        }
        out
    }

    fn drain_complete_lines(&mut self) -> Vec<SseFrame> {
        let mut frames = Vec::new();
        while let Some(pos) = self.line_buffer.find('\n') {
            let line: String = self.line_buffer.drain(..=pos).collect();
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(frame) = Self::frame_from_line(line) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Maps one complete line to a frame, or discards it.
    ///
    /// Lines without the event-data prefix are transport noise (blank
    /// keep-alives, `event:`/`id:` fields, comments) and are dropped.
    fn frame_from_line(line: &str) -> Option<SseFrame> {
        let mut payload = line.strip_prefix(DATA_PREFIX)?;
        // Upstream occasionally re-wraps frames, doubling the prefix.
        // Strip until no further match before handing off to parsing.
        loop {
            payload = payload.trim();
            match payload.strip_prefix(DATA_PREFIX) {
                Some(inner) => payload = inner,
                None => break,
            }
        }

        if payload == DONE_SENTINEL {
            return Some(SseFrame::Done);
        }
        if payload.is_empty() {
            trace!("discarding empty data frame");
            return None;
        }
        Some(SseFrame::Payload(payload.to_string()))
    }
}
