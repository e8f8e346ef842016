#[macro_use]
extern crate log;

use std::{
    fs::File,
    io::{self, BufWriter},
    path::PathBuf,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use dotenv::dotenv;
use openwrist::{DayPipeline, PipelineConfig, PrecomputedSleep, Recording};
use openwrist_algos::BoutDefinition;
use openwrist_types::{ActivityLevel, Cutpoints};

#[derive(Parser)]
pub struct OpenWristCli {
    /// JSON file with pipeline settings, defaults are used when absent
    #[arg(env, long)]
    pub config: Option<PathBuf>,
    #[clap(subcommand)]
    pub subcommand: OpenWristCommand,
}

#[derive(Subcommand)]
pub enum OpenWristCommand {
    ///
    /// Compute daily activity and sleep endpoints for a recording
    ///
    Process {
        input: PathBuf,
        /// Results file, stdout when absent
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    ///
    /// Print minutes spent in bouts of one intensity level over the whole recording
    ///
    Bouts {
        input: PathBuf,
        #[arg(long, default_value = "MVPA")]
        level: String,
        #[arg(long, default_value_t = 10)]
        minutes: u32,
        #[arg(long, default_value_t = 0.8)]
        fraction: f64,
        #[arg(long)]
        closed: bool,
        #[arg(long, default_value_t = 4)]
        metric: u8,
    },
    ///
    /// List cutpoint sets and the thresholds of every level
    ///
    Cutpoints,
    ///
    /// Generate shell completions
    ///
    Completions { shell: Shell },
}

fn main() -> anyhow::Result<()> {
    if let Err(error) = dotenv() {
        println!("{}", error);
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = OpenWristCli::parse();
    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };

    match cli.subcommand {
        OpenWristCommand::Process { input, output } => {
            let recording = Recording::load(&input)?;
            let days = recording.day_windows(&config.day_window)?;
            info!("Processing {} days from {}", days.len(), input.display());

            let sleep = PrecomputedSleep::new(recording.sleep.clone());
            let mut pipeline = DayPipeline::from_config(&config, recording.epoch_seconds)?;
            pipeline.process(&recording, &days, &sleep, &sleep)?;

            let results = pipeline.into_results();
            info!("{} of {} days accepted", results.n_days(), days.len());

            match output {
                Some(path) => {
                    let file = File::create(&path)?;
                    serde_json::to_writer_pretty(BufWriter::new(file), &results)?;
                    info!("Results written to {}", path.display());
                }
                None => {
                    serde_json::to_writer_pretty(io::stdout().lock(), &results)?;
                    println!();
                }
            }
            Ok(())
        }
        OpenWristCommand::Bouts {
            input,
            level,
            minutes,
            fraction,
            closed,
            metric,
        } => {
            let recording = Recording::load(&input)?;
            let cutpoints = config.endpoints.cutpoints.resolve()?;
            let level: ActivityLevel = level.parse()?;
            let thresholds = cutpoints.thresholds(level)?;
            let bout = BoutDefinition::new(metric, minutes, fraction, closed)?;

            let total: f64 = recording
                .wear_blocks()
                .iter()
                .map(|w| {
                    bout.minutes(
                        &recording.metric[w.start..w.stop],
                        &thresholds,
                        recording.epoch_seconds,
                    )
                })
                .sum();

            println!("{} {}min bouts: {:.2} min", level, minutes, total);
            Ok(())
        }
        OpenWristCommand::Cutpoints => {
            for (name, cutpoints) in Cutpoints::NAMED {
                println!("{}", name);
                for level in ActivityLevel::ALL {
                    let thresholds = cutpoints.thresholds(level)?;
                    println!(
                        "  {:<5} [{}, {})",
                        level.as_str(),
                        thresholds.lower,
                        thresholds.upper
                    );
                }
            }
            Ok(())
        }
        OpenWristCommand::Completions { shell } => {
            let mut command = OpenWristCli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut io::stdout());
            Ok(())
        }
    }
}
