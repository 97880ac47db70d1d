use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use canopysim::{
    scenario::ScenarioLoader,
    sim,
    web::{self, WebServerConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Urban canopy sunlight and growth simulator")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/bunkyo.yaml")]
    scenario: PathBuf,

    /// Override the simulated day count (uses the scenario default when omitted)
    #[arg(long)]
    days: Option<u32>,

    /// Write the timeline as JSON to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Serve the HTTP wrapper instead of running the scenario once
    #[arg(long)]
    serve: bool,

    /// Bind host for --serve
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Bind port for --serve
    #[arg(long, default_value_t = 5000)]
    port: u16,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;

    if cli.serve {
        let server = WebServerConfig {
            config: scenario.config.clone(),
            host: cli.host.clone(),
            port: cli.port,
        };
        let runtime = tokio::runtime::Runtime::new()?;
        return runtime.block_on(web::run(server));
    }

    let request = scenario.request(cli.days);
    let timeline = sim::run(&scenario.config, &request)?;

    let last = timeline.rows.last();
    println!(
        "Scenario '{}' completed: {} plants over {} days. Final heights: {:?}",
        scenario.name,
        timeline.species.len(),
        timeline.rows.len(),
        last.map(|row| row.heights.clone()).unwrap_or_default()
    );

    let json = serde_json::to_string_pretty(&timeline)?;
    match cli.output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}
