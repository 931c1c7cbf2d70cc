use clap::Parser;
use dugout::cli::{self, Cli, Commands};
use dugout::config::AppConfig;
use dugout::error::Result;
use dugout::pipeline::Pipeline;
use dugout::secrets::KeyChain;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Run { days, sink } => {
            let mut config = load_config(&cli.config)?;
            if let Some(dir) = sink {
                config.sink.dir = dir.clone();
            }
            init_logging(&config);

            if let Err(errors) = config.validate() {
                for e in &errors {
                    error!("invalid config: {e}");
                }
                return Err(dugout::error::DugoutError::InvalidConfig(errors.join("; ")));
            }

            let keys = key_chain(&config);
            let days = days.unwrap_or(config.provider.lookback_days);
            let pipeline = Pipeline::from_config(config, &keys)?;
            let summary = pipeline.run(days).await?;
            info!(%summary, "done");
            println!("{summary}");
        }
        Commands::Ev {
            probability,
            odds,
            stake,
        } => {
            init_logging_simple();
            cli::calculate_ev(*probability, *odds, *stake)?;
        }
        Commands::Poisson { lambda, runs } => {
            init_logging_simple();
            cli::poisson_table(*lambda, *runs)?;
        }
        Commands::Batting {
            at_bats,
            hits,
            doubles,
            triples,
            home_runs,
            walks,
            hit_by_pitch,
            strikeouts,
            sac_flies,
        } => {
            init_logging_simple();
            let line = dugout::metrics::BattingLine {
                at_bats: *at_bats,
                hits: *hits,
                doubles: *doubles,
                triples: *triples,
                home_runs: *home_runs,
                walks: *walks,
                hit_by_pitch: *hit_by_pitch,
                strikeouts: *strikeouts,
                sac_flies: *sac_flies,
            };
            cli::batting_report(&line)?;
        }
        Commands::Fip {
            home_runs,
            walks,
            hit_by_pitch,
            strikeouts,
            innings,
        } => {
            init_logging_simple();
            let line = dugout::metrics::PitchingLine {
                home_runs_allowed: *home_runs,
                walks: *walks,
                hit_by_pitch: *hit_by_pitch,
                strikeouts: *strikeouts,
                innings_pitched: *innings,
            };
            let config = load_config(&cli.config)?;
            cli::fip_report(&line, config.evaluator.fip_constant)?;
        }
        Commands::CheckConfig => {
            init_logging_simple();
            let config = load_config(&cli.config)?;
            let keys = key_chain(&config);
            cli::check_config(&config, &keys)?;
        }
    }

    Ok(())
}

fn load_config(config_dir: &str) -> Result<AppConfig> {
    Ok(AppConfig::load_from(config_dir)?)
}

fn key_chain(config: &AppConfig) -> KeyChain {
    KeyChain::standard(config.secrets.key_file.as_deref().map(Path::new))
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    if config.logging.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn init_logging_simple() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
