use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::error::{MetricError, Result};
use crate::metrics;
use crate::pipeline::{ODDSAPI_KEY, SPORTRADAR_KEY};
use crate::secrets::KeyChain;

#[derive(Parser)]
#[command(name = "dugout")]
#[command(version = "0.1.0")]
#[command(about = "MLB stats ETL and derived-metrics pipeline", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config directory
    #[arg(short, long, default_value = "config", global = true)]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline over the lookback window
    Run {
        /// Days of history to fetch (defaults to provider.lookback_days)
        #[arg(long)]
        days: Option<u32>,
        /// Override the sink directory
        #[arg(long)]
        sink: Option<String>,
    },
    /// One-shot expected-value calculation
    Ev {
        /// Modeled win probability (0-1)
        #[arg(short, long)]
        probability: f64,
        /// American odds (e.g. -150, +130)
        #[arg(short, long, allow_hyphen_values = true)]
        odds: i32,
        /// Stake in units
        #[arg(long, default_value_t = metrics::DEFAULT_STAKE)]
        stake: f64,
    },
    /// One-shot Poisson run-probability table
    Poisson {
        /// Expected runs (lambda)
        #[arg(short, long)]
        lambda: f64,
        /// Highest run count to tabulate
        #[arg(short, long, default_value = "10")]
        runs: u32,
    },
    /// Rate stats (wOBA, BABIP, AVG/SLG/ISO) for one batting line
    Batting {
        #[arg(long)]
        at_bats: u32,
        #[arg(long)]
        hits: u32,
        #[arg(long, default_value = "0")]
        doubles: u32,
        #[arg(long, default_value = "0")]
        triples: u32,
        #[arg(long, default_value = "0")]
        home_runs: u32,
        #[arg(long, default_value = "0")]
        walks: u32,
        #[arg(long, default_value = "0")]
        hit_by_pitch: u32,
        #[arg(long, default_value = "0")]
        strikeouts: u32,
        #[arg(long, default_value = "0")]
        sac_flies: u32,
    },
    /// FIP for one pitching line
    Fip {
        #[arg(long)]
        home_runs: u32,
        #[arg(long)]
        walks: u32,
        #[arg(long, default_value = "0")]
        hit_by_pitch: u32,
        #[arg(long)]
        strikeouts: u32,
        #[arg(long)]
        innings: f64,
    },
    /// Load and validate configuration, report key availability
    CheckConfig,
}

/// Print EV, implied probability and the break-even point for a line.
pub fn calculate_ev(probability: f64, odds: i32, stake: f64) -> Result<()> {
    let implied = metrics::implied_probability(odds)?;
    let ev = metrics::expected_value(probability, odds, stake)?;
    let payout = metrics::payout_for_stake(odds, stake)?;

    println!("American odds:        {odds:+}");
    println!("Implied probability:  {:.1}%", implied * 100.0);
    println!("Modeled probability:  {:.1}%", probability * 100.0);
    println!("Payout on {stake:.0} stake:  {payout:.2}");
    println!("Expected value:       {ev:+.2}");
    if probability > implied {
        println!("Edge: model beats the implied line by {:.1} points", (probability - implied) * 100.0);
    } else {
        println!("No edge at this line");
    }
    Ok(())
}

/// Print P(k; λ) for k = 0..=max_runs plus the cumulative tail.
pub fn poisson_table(lambda: f64, max_runs: u32) -> Result<()> {
    println!("P(k; λ={lambda})");
    let mut cumulative = 0.0;
    for k in 0..=max_runs {
        let p = metrics::win_probability(lambda, k)?;
        cumulative += p;
        println!("  k={k:>2}  p={p:.4}  cdf={cumulative:.4}");
    }
    println!("  k>{max_runs}   p={:.4}", (1.0 - cumulative).max(0.0));
    Ok(())
}

/// Print the rate stats derivable from one batting line. Metrics outside
/// their input domain print as undefined rather than aborting the report.
pub fn batting_report(line: &metrics::BattingLine) -> Result<()> {
    println!("PA (wOBA denominator): {}", line.woba_plate_appearances());
    println!("wOBA:  {}", fmt_metric(metrics::woba(line)));
    println!("BABIP: {}", fmt_metric(metrics::babip(line)));

    let avg_slg = batting_avg_slg(line);
    match &avg_slg {
        Ok((avg, slg)) => {
            println!("AVG:   {avg:.3}");
            println!("SLG:   {slg:.3}");
            println!("ISO:   {}", fmt_metric(metrics::iso(*slg, *avg)));
        }
        Err(e) => println!("AVG/SLG/ISO: undefined ({e})"),
    }
    Ok(())
}

/// Print FIP for one pitching line, using the configured league constant.
pub fn fip_report(line: &metrics::PitchingLine, constant: f64) -> Result<()> {
    println!("FIP (constant {constant:.2}): {}", fmt_metric(metrics::fip(line, constant)));
    Ok(())
}

fn batting_avg_slg(line: &metrics::BattingLine) -> std::result::Result<(f64, f64), MetricError> {
    if line.at_bats == 0 {
        return Err(MetricError::undefined("AVG", "zero at-bats"));
    }
    let singles = line.singles()?;
    let ab = f64::from(line.at_bats);
    let avg = f64::from(line.hits) / ab;
    let total_bases = singles
        + 2 * line.doubles
        + 3 * line.triples
        + 4 * line.home_runs;
    Ok((avg, f64::from(total_bases) / ab))
}

fn fmt_metric(value: std::result::Result<f64, MetricError>) -> String {
    match value {
        Ok(v) => format!("{v:.3}"),
        Err(e) => format!("undefined ({e})"),
    }
}

/// Validate configuration and report which API keys resolve.
pub fn check_config(config: &AppConfig, keys: &KeyChain) -> Result<()> {
    match config.validate() {
        Ok(()) => println!("config: ok"),
        Err(errors) => {
            println!("config: {} problem(s)", errors.len());
            for error in &errors {
                println!("  - {error}");
            }
        }
    }

    for (name, required) in [(SPORTRADAR_KEY, true), (ODDSAPI_KEY, false)] {
        let status = match (keys.lookup(name), required) {
            (Some(_), _) => "found",
            (None, true) => "MISSING (required)",
            (None, false) => "missing (optional, EV columns will be undefined)",
        };
        println!("key {name}: {status}");
    }

    println!("sink dir: {}", config.sink.dir);
    println!(
        "lookback: {} days, rate limit {} ms",
        config.provider.lookback_days, config.provider.rate_limit_ms
    );
    Ok(())
}
