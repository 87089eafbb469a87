//! Incremental decoder for the chat event stream.
//!
//! Bytes are buffered until a `\n` is seen, so a frame (or a multi-byte
//! character) split across network reads is reassembled before decoding.
//! Only complete lines are ever turned into text.

use super::events::{ChatFrame, FrameType, StreamEvent};

/// Prefix of every event frame line.
pub const FRAME_PREFIX: &str = "data: ";

/// Stateful decoder turning byte chunks into [`StreamEvent`]s.
///
/// Feed it every chunk in order, then call [`finish`](Self::finish) once the
/// transport reports end of stream. After an `error` or `done` frame the
/// decoder is terminated and ignores everything else.
#[derive(Debug, Default)]
pub struct EventStreamDecoder {
    /// Bytes after the last newline seen so far
    buffer: Vec<u8>,
    terminated: bool,
    skipped_frames: u64,
}

impl EventStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a chunk, returning the events of every line it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        if self.terminated {
            return Vec::new();
        }
        self.buffer.extend_from_slice(chunk);

        let mut buffer = std::mem::take(&mut self.buffer);
        let mut events = Vec::new();
        let mut consumed = 0;

        while !self.terminated {
            let Some(offset) = buffer[consumed..].iter().position(|&b| b == b'\n') else {
                break;
            };
            let line_end = consumed + offset;
            if let Some(event) = self.decode_line(&buffer[consumed..line_end]) {
                events.push(event);
            }
            consumed = line_end + 1;
        }

        if self.terminated {
            buffer.clear();
        } else {
            buffer.drain(..consumed);
        }
        self.buffer = buffer;
        events
    }

    /// Flush the trailing line once the transport has no more data.
    ///
    /// The last frame is not required to end with a newline.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let rest = std::mem::take(&mut self.buffer);
        if self.terminated || rest.is_empty() {
            return Vec::new();
        }
        self.decode_line(&rest).into_iter().collect()
    }

    /// Whether an `error` or `done` frame has been decoded.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Number of `data:` frames dropped because they could not be interpreted.
    pub fn skipped_frames(&self) -> u64 {
        self.skipped_frames
    }

    /// Bytes held back waiting for a newline.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Clear all state so the decoder can be reused for another stream.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.terminated = false;
        self.skipped_frames = 0;
    }

    fn decode_line(&mut self, raw: &[u8]) -> Option<StreamEvent> {
        let text = String::from_utf8_lossy(raw);
        let line = text.strip_suffix('\r').unwrap_or(&text);
        let payload = line.strip_prefix(FRAME_PREFIX)?;

        let frame = match serde_json::from_str::<ChatFrame>(payload) {
            Ok(frame) => frame,
            Err(e) => {
                self.skip(payload, &e.to_string());
                return None;
            }
        };

        match frame.frame_type() {
            Some(FrameType::Content) => frame.content_text().map(StreamEvent::content),
            Some(FrameType::Error) => {
                self.terminated = true;
                Some(StreamEvent::Error {
                    message: frame.error_message(),
                })
            }
            Some(FrameType::Done) => {
                self.terminated = true;
                Some(StreamEvent::Done)
            }
            None => {
                self.skip(payload, &format!("unrecognized frame type '{}'", frame.kind));
                None
            }
        }
    }

    fn skip(&mut self, payload: &str, reason: &str) {
        self.skipped_frames += 1;
        tracing::warn!(
            skipped = self.skipped_frames,
            "Failed to parse stream frame: {} (payload: {})",
            reason,
            truncate_for_log(payload)
        );
    }
}

fn truncate_for_log(payload: &str) -> &str {
    const MAX: usize = 200;
    match payload.char_indices().nth(MAX) {
        Some((idx, _)) => &payload[..idx],
        None => payload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(chunks: &[&[u8]]) -> Vec<StreamEvent> {
        let mut decoder = EventStreamDecoder::new();
        let mut events = Vec::new();
        for chunk in chunks {
            events.extend(decoder.feed(chunk));
        }
        events.extend(decoder.finish());
        events
    }

    #[test]
    fn test_single_content_frame() {
        let events = decode_all(&[b"data: {\"type\":\"content\",\"content\":\"hi\"}\n"]);
        assert_eq!(events, vec![StreamEvent::content("hi")]);
    }

    #[test]
    fn test_done_terminates_even_with_more_lines_in_chunk() {
        let mut decoder = EventStreamDecoder::new();
        let events = decoder.feed(
            b"data: {\"type\":\"done\"}\n\ndata: {\"type\":\"content\",\"content\":\"late\"}\n",
        );
        assert_eq!(events, vec![StreamEvent::Done]);
        assert!(decoder.is_terminated());
        assert_eq!(decoder.buffered_len(), 0);

        assert!(decoder
            .feed(b"data: {\"type\":\"content\",\"content\":\"later\"}\n")
            .is_empty());
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn test_error_terminates_and_suppresses_following_content() {
        let events = decode_all(&[
            b"data: {\"type\":\"content\",\"content\":\"a\"}\n\n",
            b"data: {\"type\":\"error\",\"error\":\"boom\"}\n\ndata: {\"type\":\"content\",\"content\":\"b\"}\n\n",
        ]);
        assert_eq!(
            events,
            vec![StreamEvent::content("a"), StreamEvent::error("boom")]
        );
    }

    #[test]
    fn test_error_without_message_uses_default() {
        assert_eq!(
            decode_all(&[b"data: {\"type\":\"error\"}\n"]),
            vec![StreamEvent::error("Stream error")]
        );
        assert_eq!(
            decode_all(&[b"data: {\"type\":\"error\",\"error\":\"\"}\n"]),
            vec![StreamEvent::error("Stream error")]
        );
    }

    #[test]
    fn test_error_with_object_payload_still_terminates() {
        let mut decoder = EventStreamDecoder::new();
        let events = decoder.feed(
            b"data: {\"type\":\"error\",\"error\":{\"code\":500}}\ndata: {\"type\":\"content\",\"content\":\"after\"}\n",
        );
        assert_eq!(events, vec![StreamEvent::error("{\"code\":500}")]);
        assert!(decoder.is_terminated());
        assert_eq!(decoder.skipped_frames(), 0);
    }

    #[test]
    fn test_done_with_unexpected_fields_still_terminates() {
        let mut decoder = EventStreamDecoder::new();
        let events = decoder.feed(
            b"data: {\"type\":\"done\",\"error\":123}\ndata: {\"type\":\"content\",\"content\":\"after\"}\n",
        );
        assert_eq!(events, vec![StreamEvent::Done]);
        assert!(decoder.is_terminated());
    }

    #[test]
    fn test_non_string_content_yields_no_delta() {
        let mut decoder = EventStreamDecoder::new();
        let events = decoder.feed(
            b"data: {\"type\":\"content\",\"content\":[1,2]}\ndata: {\"type\":\"content\",\"content\":\"ok\"}\n",
        );
        assert_eq!(events, vec![StreamEvent::content("ok")]);
        assert_eq!(decoder.skipped_frames(), 0);
    }

    #[test]
    fn test_malformed_frame_is_skipped() {
        let mut decoder = EventStreamDecoder::new();
        let events = decoder.feed(
            b"data: not-json\n\ndata: {\"type\":\"content\",\"content\":\"ok\"}\n\n",
        );
        assert_eq!(events, vec![StreamEvent::content("ok")]);
        assert_eq!(decoder.skipped_frames(), 1);
        assert!(!decoder.is_terminated());
    }

    #[test]
    fn test_unknown_type_is_skipped() {
        let mut decoder = EventStreamDecoder::new();
        let events = decoder.feed(b"data: {\"type\":\"ping\"}\ndata: {\"content\":\"x\"}\n");
        assert!(events.is_empty());
        assert_eq!(decoder.skipped_frames(), 2);
    }

    #[test]
    fn test_empty_content_is_not_emitted() {
        let events = decode_all(&[
            b"data: {\"type\":\"content\",\"content\":\"\"}\n",
            b"data: {\"type\":\"content\"}\n",
        ]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_non_frame_lines_ignored() {
        let events = decode_all(&[
            b": keep-alive\n\nevent: message\nid: 7\ndata:{\"type\":\"content\",\"content\":\"no space\"}\n\n",
        ]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let events = decode_all(&[b"data: {\"type\":\"content\",\"content\":\"hi\"}\r\n\r\n"]);
        assert_eq!(events, vec![StreamEvent::content("hi")]);
    }

    #[test]
    fn test_partial_line_retained_between_feeds() {
        let mut decoder = EventStreamDecoder::new();
        assert!(decoder.feed(b"data: {\"type\":\"con").is_empty());
        assert!(decoder.buffered_len() > 0);
        let events = decoder.feed(b"tent\",\"content\":\"joined\"}\n");
        assert_eq!(events, vec![StreamEvent::content("joined")]);
        assert_eq!(decoder.buffered_len(), 0);
    }

    #[test]
    fn test_finish_flushes_unterminated_last_line() {
        let mut decoder = EventStreamDecoder::new();
        assert!(decoder
            .feed(b"data: {\"type\":\"content\",\"content\":\"tail\"}")
            .is_empty());
        assert_eq!(decoder.finish(), vec![StreamEvent::content("tail")]);
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn test_multibyte_character_split_across_chunks() {
        let frame = "data: {\"type\":\"content\",\"content\":\"你好🙂\"}\n".as_bytes();
        let split = frame.iter().position(|&b| b == 0xE4).unwrap() + 1;
        let events = decode_all(&[&frame[..split], &frame[split..]]);
        assert_eq!(events, vec![StreamEvent::content("你好🙂")]);
    }

    #[test]
    fn test_chunk_boundary_invariance() {
        let stream = [
            ChatFrame::content("Hello").encode(),
            ": comment\n".to_string(),
            ChatFrame::content(", 世界").encode(),
            "data: broken\n\n".to_string(),
            ChatFrame::content("!").encode(),
            ChatFrame::done().encode(),
        ]
        .concat();
        let bytes = stream.as_bytes();
        let expected = decode_all(&[bytes]);
        assert_eq!(
            expected,
            vec![
                StreamEvent::content("Hello"),
                StreamEvent::content(", 世界"),
                StreamEvent::content("!"),
                StreamEvent::Done,
            ]
        );

        for split in 0..=bytes.len() {
            let (a, b) = bytes.split_at(split);
            assert_eq!(decode_all(&[a, b]), expected, "split at byte {}", split);
        }

        let one_by_one: Vec<&[u8]> = bytes.chunks(1).collect();
        assert_eq!(decode_all(&one_by_one), expected);
    }

    #[test]
    fn test_reset_clears_termination() {
        let mut decoder = EventStreamDecoder::new();
        decoder.feed(b"data: x\ndata: {\"type\":\"done\"}\n");
        assert!(decoder.is_terminated());
        assert_eq!(decoder.skipped_frames(), 1);

        decoder.reset();
        assert!(!decoder.is_terminated());
        assert_eq!(decoder.skipped_frames(), 0);
        assert_eq!(
            decoder.feed(b"data: {\"type\":\"content\",\"content\":\"again\"}\n"),
            vec![StreamEvent::content("again")]
        );
    }

    #[test]
    fn test_invalid_utf8_does_not_fail() {
        let mut decoder = EventStreamDecoder::new();
        let events = decoder.feed(b"data: {\"type\":\"content\",\"content\":\"a\xffb\"}\n");
        assert_eq!(events, vec![StreamEvent::content("a\u{FFFD}b")]);
    }

    #[test]
    fn test_truncate_for_log() {
        let long = "é".repeat(300);
        assert_eq!(truncate_for_log(&long).chars().count(), 200);
        assert_eq!(truncate_for_log("short"), "short");
    }
}
