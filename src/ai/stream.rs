//! Streaming response decoding.
//!
//! The backend answers a streaming generate request with newline-delimited
//! JSON records. This module turns a reqwest byte stream into a fused stream
//! of text fragments: records that do not parse are skipped, records without
//! output text yield nothing, and a `done` record ends iteration.

use std::pin::Pin;

use futures_util::stream::{self, Stream, StreamExt};
use tokio::io::AsyncBufReadExt;
use tokio_util::io::StreamReader;

use crate::models::GenerateChunk;
use crate::{Error, Result};

/// Lazily produced sequence of reply fragments.
///
/// Dropping the stream aborts the underlying transfer and releases the
/// connection, whether it was drained, partially consumed, or never polled.
pub type ReplyStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// A reply stream that yields `item` once and then ends.
pub fn once(item: Result<String>) -> ReplyStream {
    stream::iter(vec![item]).boxed()
}

/// Decode the NDJSON body of `response` into a fragment stream.
pub fn fragments(response: reqwest::Response) -> ReplyStream {
    let bytes = response
        .bytes_stream()
        .map(|result| result.map_err(std::io::Error::other));
    let lines = tokio::io::BufReader::new(StreamReader::new(bytes)).lines();

    stream::unfold((lines, false), |(mut lines, finished)| async move {
        if finished {
            return None;
        }
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match parse_record(&line) {
                    Record::Text(text, done) => return Some((Ok(text), (lines, done))),
                    Record::Done => return None,
                    Record::Skip => continue,
                },
                Ok(None) => return None,
                Err(e) => {
                    tracing::error!("Generation stream failed mid-reply: {}", e);
                    let err = Error::Backend(format!("stream read failed: {}", e));
                    return Some((Err(err), (lines, true)));
                }
            }
        }
    })
    .boxed()
}

enum Record {
    /// Output text and whether this was the terminal record.
    Text(String, bool),
    Done,
    Skip,
}

fn parse_record(line: &str) -> Record {
    if line.trim().is_empty() {
        return Record::Skip;
    }
    match serde_json::from_str::<GenerateChunk>(line) {
        Ok(chunk) => match chunk.response {
            Some(text) if !text.is_empty() => Record::Text(text, chunk.done),
            _ if chunk.done => Record::Done,
            _ => Record::Skip,
        },
        Err(e) => {
            // A single bad record must not corrupt an otherwise healthy stream.
            tracing::debug!("Skipping malformed stream record: {}", e);
            Record::Skip
        }
    }
}
