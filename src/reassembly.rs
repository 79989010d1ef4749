//! Reassembly of newline-delimited records from a chunked byte stream.
//!
//! Streaming endpoints emit one JSON object per line:
//!
//! ```text
//! {"outputs": [" a"]}\n
//! {"outputs": [" challenging"]}\n
//! {"outputs": [" problem"]}\n
//! ```
//!
//! The transport chunks the response body arbitrarily: a record may span
//! several chunks and a single chunk may carry several records. This module
//! buffers incoming bytes and yields each complete line (delimiter stripped)
//! exactly once, in order.

use async_stream::try_stream;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tracing::debug;

use crate::core::EndpointError;
use crate::transport::StreamEvent;

/// Consumed prefix length past which the buffer is compacted.
const COMPACT_THRESHOLD: usize = 8 * 1024;

/// Growable byte buffer with a read cursor.
///
/// [`push`](LineBuffer::push) appends chunk bytes;
/// [`next_record`](LineBuffer::next_record) drains complete records. The
/// cursor tracks how far records have been consumed, so bytes are never
/// yielded twice. Records are emitted only once fully buffered.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
    read_pos: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append payload bytes.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Next complete record with its trailing newline stripped, or `None`
    /// when no newline is buffered past the cursor.
    pub fn next_record(&mut self) -> Option<Bytes> {
        let unread = &self.buf[self.read_pos..];
        let newline = unread.iter().position(|&b| b == b'\n')?;
        let record = Bytes::copy_from_slice(&unread[..newline]);
        self.read_pos += newline + 1;
        self.compact();
        Some(record)
    }

    /// Whether unconsumed bytes remain past the cursor.
    pub fn has_unread(&self) -> bool {
        self.read_pos < self.buf.len()
    }

    /// Number of unconsumed bytes past the cursor.
    pub fn unread_len(&self) -> usize {
        self.buf.len() - self.read_pos
    }

    // Drops the consumed prefix so long-lived streams do not grow the
    // buffer without bound. Not observable through the API.
    fn compact(&mut self) {
        if self.read_pos == self.buf.len() {
            self.buf.clear();
            self.read_pos = 0;
        } else if self.read_pos >= COMPACT_THRESHOLD {
            self.buf.drain(..self.read_pos);
            self.read_pos = 0;
        }
    }
}

/// Turn a stream of transport events into a lazy stream of complete records.
///
/// Non-payload events are skipped without touching the buffer. All records
/// already buffered are drained before the next event is pulled. A transport
/// error terminates the stream immediately; no partial record is synthesized
/// from buffered bytes. Trailing bytes without a terminating newline are
/// discarded when the source ends.
pub fn reassemble<S>(events: S) -> impl Stream<Item = Result<Bytes, EndpointError>>
where
    S: Stream<Item = Result<StreamEvent, EndpointError>>,
{
    try_stream! {
        let mut lines = LineBuffer::new();
        let mut events = std::pin::pin!(events);

        while let Some(event) = events.next().await {
            match event? {
                StreamEvent::Control(kind) => {
                    debug!(kind = %kind, "skipping non-payload stream event");
                }
                StreamEvent::Payload(chunk) => {
                    lines.push(&chunk);
                    while let Some(record) = lines.next_record() {
                        yield record;
                    }
                }
            }
        }

        if lines.has_unread() {
            debug!(
                bytes = lines.unread_len(),
                "stream ended with unterminated trailing bytes, discarding"
            );
        }
    }
}
