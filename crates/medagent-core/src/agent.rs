//! Core Agent trait definition

use crate::{AgentEvent, Result};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::pin::Pin;

/// Stream of events produced by an agent for a single prompt
pub type EventStream<'a> = Pin<Box<dyn Stream<Item = Result<AgentEvent>> + Send + 'a>>;

/// Core trait that all agents must implement
///
/// An agent accepts a prompt and answers with a stream of [`AgentEvent`]s.
/// Teams use the same interface for their members, so a delegate is just
/// another `Agent` behind an `Arc`.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Submit a prompt and receive the response incrementally
    fn stream(&self, input: String) -> EventStream<'_>;

    /// Get the agent's name
    fn name(&self) -> &str;

    /// Submit a prompt and wait for the full response text
    ///
    /// Collects every [`AgentEvent::TextDelta`] of [`Agent::stream`] in order.
    async fn process(&self, input: String) -> Result<String> {
        let mut events = self.stream(input);
        let mut text = String::new();
        while let Some(event) = events.next().await {
            if let AgentEvent::TextDelta(delta) = event? {
                text.push_str(&delta);
            }
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct EchoAgent;

    impl Agent for EchoAgent {
        fn stream(&self, input: String) -> EventStream<'_> {
            let words: Vec<Result<AgentEvent>> = input
                .split_inclusive(' ')
                .map(|w| Ok(AgentEvent::TextDelta(w.to_string())))
                .chain(std::iter::once(Ok(AgentEvent::Completed {
                    iterations: 1,
                    input_tokens: 0,
                    output_tokens: 0,
                })))
                .collect();
            Box::pin(futures::stream::iter(words))
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    struct FailingAgent;

    impl Agent for FailingAgent {
        fn stream(&self, _input: String) -> EventStream<'_> {
            Box::pin(futures::stream::iter(vec![
                Ok(AgentEvent::TextDelta("partial".to_string())),
                Err(Error::Provider("connection reset".to_string())),
            ]))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_process_collects_deltas() {
        let text = EchoAgent.process("itchy skin, nausea".to_string()).await.unwrap();
        assert_eq!(text, "itchy skin, nausea");
    }

    #[tokio::test]
    async fn test_process_propagates_errors() {
        let result = FailingAgent.process("anything".to_string()).await;
        assert!(matches!(result, Err(Error::Provider(_))));
    }
}
