//! Streaming completion events and server-sent events decoding

use crate::{LLMError, Result, StopReason, TokenUsage};
use eventsource_stream::{EventStreamError, Eventsource};
use futures::{Stream, StreamExt, future};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One event of a streamed completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A fragment of assistant text
    TextDelta(String),

    /// A complete tool call requested by the model
    ToolUse {
        /// Tool call ID
        id: String,
        /// Tool name
        name: String,
        /// Parsed arguments
        input: Value,
    },

    /// End of the completion
    Finished {
        /// Why generation stopped
        stop_reason: StopReason,
        /// Token usage, zero when the provider did not report it
        usage: TokenUsage,
    },
}

/// Payloads of a `text/event-stream` body, one per event
///
/// Multi-line `data:` fields are joined with `\n`; comments and events
/// without data are skipped.
pub fn sse_data<S, B, E>(body: S) -> impl Stream<Item = Result<String>> + Send
where
    S: Stream<Item = std::result::Result<B, E>> + Send,
    B: AsRef<[u8]> + Send,
    E: Into<LLMError> + fmt::Display + Send,
{
    body.eventsource().filter_map(|event| {
        future::ready(match event {
            Ok(event) if event.data.is_empty() => None,
            Ok(event) => Some(Ok(event.data)),
            Err(EventStreamError::Transport(e)) => Some(Err(e.into())),
            Err(e) => Some(Err(LLMError::UnexpectedResponse(format!(
                "Malformed event stream: {e}"
            )))),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    async fn payloads(chunks: Vec<&'static str>) -> Vec<String> {
        let body = stream::iter(chunks.into_iter().map(Ok::<_, LLMError>));
        sse_data(body).map(|data| data.unwrap()).collect().await
    }

    #[tokio::test]
    async fn test_one_payload_per_event() {
        let data = payloads(vec!["data: {\"a\":1}\n\ndata: [DONE]\n\n"]).await;
        assert_eq!(data, vec!["{\"a\":1}", "[DONE]"]);
    }

    #[tokio::test]
    async fn test_event_split_across_chunks() {
        let data = payloads(vec!["data: {\"content\":\"na", "usea\"}\r\n", "\r\n"]).await;
        assert_eq!(data, vec!["{\"content\":\"nausea\"}"]);
    }

    #[tokio::test]
    async fn test_multi_line_data_is_joined() {
        let data = payloads(vec![": keep-alive\n\nevent: message\ndata: first\ndata: second\n\n"]).await;
        assert_eq!(data, vec!["first\nsecond"]);
    }

    #[tokio::test]
    async fn test_transport_error_is_passed_through() {
        let body = stream::iter(vec![
            Ok("data: partial"),
            Err(LLMError::RequestFailed("connection reset".to_string())),
        ]);
        let results: Vec<_> = sse_data(body).collect().await;
        assert!(results.iter().any(
            |r| matches!(r, Err(LLMError::RequestFailed(msg)) if msg == "connection reset")
        ));
    }
}
