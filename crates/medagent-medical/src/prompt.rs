//! Prompt sent to the team

/// Symptoms used when none are given on the command line
pub const DEFAULT_SYMPTOMS: &str = "itchy skin, nausea, abdomen pain";

/// Ask for possible causes of `symptoms`
///
/// The symptoms are inserted verbatim: no escaping, trimming or truncation.
pub fn symptoms_prompt(symptoms: &str) -> String {
    format!("Based on the following symptoms, provide possible medical causes: {symptoms}")
}
