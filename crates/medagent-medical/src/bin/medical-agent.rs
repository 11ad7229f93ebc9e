//! Ask the medical team for possible causes of a set of symptoms

use anyhow::Context;
use clap::Parser;
use medagent_medical::{
    DEFAULT_SYMPTOMS, MedicalConfig, ResponsePrinter, create_medical_agent,
    create_medical_agent_team, get_medical_causes,
};
use medagent_utils::{EnvSource, init_tracing};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "medical-agent")]
#[command(about = "Suggest possible medical causes for symptoms", long_about = None)]
struct Args {
    /// Symptoms, comma separated
    #[arg(default_value = DEFAULT_SYMPTOMS)]
    symptoms: String,

    /// Model used by the team and the Medical Agent
    #[arg(short, long)]
    model: Option<String>,

    /// Env file with GROQ_API_KEY and MEDAGENT_* settings
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env = EnvSource::load(&args.env_file)
        .with_context(|| format!("Failed to read {}", args.env_file.display()))?;

    let mut builder = MedicalConfig::builder().env_source(&env)?;
    if let Some(model) = args.model {
        builder = builder.model(model);
    }
    let config = builder.build()?;

    init_tracing(config.log_format, env.get("RUST_LOG"))?;
    info!(model = %config.model, "Starting medical-agent");

    let runtime = config.build_runtime()?;
    let agent = Arc::new(create_medical_agent(&config.model));
    let team = runtime.create_agent(Arc::new(create_medical_agent_team(agent, &config.model)))?;

    let mut printer = ResponsePrinter::new(std::io::stdout());
    get_medical_causes(&team, &args.symptoms, &mut printer)
        .await
        .context("Failed to get medical causes")?;

    Ok(())
}
