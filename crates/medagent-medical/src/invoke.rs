//! Running the symptoms prompt against a team

use crate::error::Result;
use crate::output::ResponsePrinter;
use crate::prompt::symptoms_prompt;
use futures::StreamExt;
use medagent_core::{Agent, AgentEvent};
use std::io::Write;
use tracing::{info, instrument};

/// Ask `team` for possible causes of `symptoms`, streaming the answer
///
/// Every event is rendered through `printer` as it arrives. An error from
/// the agent stops the stream and is returned; whatever was already printed
/// stays printed.
#[instrument(skip(team, printer), fields(team = team.name()))]
pub async fn get_medical_causes<W: Write>(
    team: &dyn Agent,
    symptoms: &str,
    printer: &mut ResponsePrinter<W>,
) -> Result<()> {
    let mut events = team.stream(symptoms_prompt(symptoms));

    while let Some(event) = events.next().await {
        let event = event?;
        printer.handle(&event)?;

        if let AgentEvent::Completed {
            iterations,
            input_tokens,
            output_tokens,
        } = event
        {
            info!(iterations, input_tokens, output_tokens, "Response complete");
        }
    }

    Ok(())
}
