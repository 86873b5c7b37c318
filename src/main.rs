use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use scenario_rs::scenario::{Context, ScenarioLoader, ScenarioRunner};
use scenario_rs::sim::simulator::{OfflineSimulator, SimulationStatus, Simulator};

use std::rc::Rc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a scenario against the offline simulator
    Run {
        /// Path to the scenario file
        #[arg(short, long)]
        file: String,

        /// Simulation step in milliseconds
        #[arg(long, env = "SCENARIO_TICK_MS", default_value_t = 100)]
        tick_ms: u64,

        /// Simulated seconds before the run counts as failed
        #[arg(long, env = "SCENARIO_TIMEOUT_SECS", default_value_t = 300)]
        timeout_secs: u64,

        /// Constant ego speed in metres per second
        #[arg(long, env = "SCENARIO_SPEED", default_value_t = 10.0)]
        speed: f64,
    },
    /// Parse a scenario and report its expression trees
    Check {
        /// Path to the scenario file
        #[arg(short, long)]
        file: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Run {
            file,
            tick_ms,
            timeout_secs,
            speed,
        } => {
            if tick_ms == 0 {
                bail!("--tick-ms must be greater than zero");
            }
            let script = ScenarioLoader::new()
                .load(&file)
                .with_context(|| format!("failed to load {}", file))?;

            let simulator = Rc::new(OfflineSimulator::new(speed));
            let context = Context::with_builtins(simulator.clone());
            let mut runner = ScenarioRunner::new(&script, context)?;

            let step = Duration::from_millis(tick_ms);
            let timeout = Duration::from_secs(timeout_secs);
            let mut interval = tokio::time::interval(step);

            let status = loop {
                interval.tick().await;
                let status = runner.update();
                if status.is_terminal() {
                    break status;
                }
                if simulator.current_time() >= timeout {
                    log::warn!("Timed out after {}s", timeout_secs);
                    break SimulationStatus::Failed;
                }
                simulator.advance(step);
            };

            println!(
                "Scenario {} at {:.2}s, mileage {:.2}m",
                status,
                simulator.current_time().as_secs_f64(),
                runner.current_mileage()
            );
            if status != SimulationStatus::Succeeded {
                bail!("scenario {} in {}", status, file);
            }
        }
        Commands::Check { file } => {
            let script = ScenarioLoader::new()
                .load(&file)
                .with_context(|| format!("failed to load {}", file))?;

            let context = Context::with_builtins(Rc::new(OfflineSimulator::new(0.0)));
            let runner = ScenarioRunner::new(&script, context)?;

            for intersection in runner.intersections().iter() {
                println!("Intersection {:?}", intersection.ids());
            }
            println!("Success: {}", runner.success());
            println!("Failure: {}", runner.failure());

            let mut errors = runner.configuration_errors().to_vec();
            errors.extend(runner.intersections().errors());
            for error in &errors {
                println!("error: {}", error);
            }
            if !errors.is_empty() {
                bail!("{} configuration error(s) in {}", errors.len(), file);
            }
        }
    }

    Ok(())
}
