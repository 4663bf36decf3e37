//! Incremental Server-Sent Events decoder.
//!
//! Feed raw transport chunks with [`SseDecoder::push`]; each call returns the
//! `data` payloads of the events completed by that chunk. Only `data` lines
//! matter here: comments and the `event`, `id` and `retry` fields are ignored.
//! Lines end with `\n`, `\r\n` or a bare `\r`.

use crate::error::StreamError;

/// Longest line the decoder buffers before giving up on the stream.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Bytes of the current, not yet terminated line.
    line: Vec<u8>,
    /// `data` lines of the event being assembled.
    data: Vec<String>,
    /// The previous byte was a `\r`, so a following `\n` belongs to it.
    after_cr: bool,
}

/// Result of decoding one chunk.
#[derive(Debug, Default, PartialEq)]
pub struct Decoded {
    /// Events completed by the chunk, in stream order.
    pub events: Vec<String>,
    /// Set when the chunk broke the stream. `events` still holds everything
    /// that completed before the fault; nothing after it is decoded.
    pub error: Option<StreamError>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk. Lines may span chunk boundaries.
    pub fn push(&mut self, chunk: &[u8]) -> Decoded {
        let mut decoded = Decoded::default();
        for &byte in chunk {
            let after_cr = std::mem::replace(&mut self.after_cr, byte == b'\r');
            let step = match byte {
                b'\n' if after_cr => continue,
                b'\n' | b'\r' => self.end_line(),
                _ if self.line.len() >= MAX_LINE_BYTES => Err(StreamError::Channel(format!(
                    "event stream line exceeds {} bytes",
                    MAX_LINE_BYTES
                ))),
                _ => {
                    self.line.push(byte);
                    Ok(None)
                }
            };
            match step {
                Ok(Some(event)) => decoded.events.push(event),
                Ok(None) => {}
                Err(e) => {
                    decoded.error = Some(e);
                    break;
                }
            }
        }
        decoded
    }

    /// Flush at end of stream: an unterminated final line and event are
    /// dispatched as if followed by a blank line.
    pub fn finish(&mut self) -> Result<Option<String>, StreamError> {
        if !self.line.is_empty() {
            if let Some(event) = self.end_line()? {
                return Ok(Some(event));
            }
        }
        Ok(self.dispatch())
    }

    fn end_line(&mut self) -> Result<Option<String>, StreamError> {
        let raw = std::mem::take(&mut self.line);
        let line = String::from_utf8(raw)
            .map_err(|e| StreamError::Channel(format!("invalid UTF-8 in event stream: {}", e)))?;
        Ok(self.process_line(&line))
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data.push(value.to_string());
        }
        None
    }

    fn dispatch(&mut self) -> Option<String> {
        if self.data.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.data).join("\n"))
    }
}
