mod policy;
mod reports;
mod simulation;
mod storage;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use policy::AutoBuyPolicy;
use simulation::{RunSettings, RunSummary, run_station};
use starport_core::{MemoryStorage, StationConfig, StationEngine, StationStorage, UPGRADES};
use storage::FileStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "starport-cli", version)]
#[command(about = "Headless runner for the Starport Forever station simulation")]
struct Args {
    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Virtual seconds to simulate per seed
    #[arg(long, default_value_t = 3_600)]
    duration: u64,

    /// Upgrade purchasing strategy
    #[arg(long, value_enum, default_value_t = AutoBuyPolicy::Balanced)]
    policy: AutoBuyPolicy,

    /// Prestige whenever it awards a new Star Cred
    #[arg(long)]
    auto_prestige: bool,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Persist stations under this directory (one subdirectory per seed)
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Virtual seconds spent away before resuming a saved station
    #[arg(long, default_value_t = 0)]
    away_secs: u64,

    /// Wipe existing saves before running
    #[arg(long)]
    reset: bool,

    /// JSON file overriding station tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// List the upgrade catalog and exit
    #[arg(long)]
    list_upgrades: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_upgrades(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let config = load_config(args.config.as_deref())?;
    let seeds = parse_seeds(&args.seeds)?;

    let mut runs = Vec::with_capacity(seeds.len());
    for seed in seeds {
        let settings = RunSettings {
            seed,
            duration_secs: args.duration,
            policy: args.policy,
            auto_prestige: args.auto_prestige,
            away_secs: args.away_secs,
        };
        let summary = match &args.save_dir {
            Some(dir) => {
                let storage = FileStorage::new(dir.join(format!("seed-{seed}")));
                run_with_storage(storage, &config, settings, args.reset)?
            }
            None => run_with_storage(MemoryStorage::new(), &config, settings, false)?,
        };
        if args.verbose {
            println!(
                "✅ seed {} - {} lifetime credits",
                seed.to_string().green(),
                summary.lifetime_credits.floor()
            );
        }
        runs.push(summary);
    }

    write_reports(&args, &runs, start_time)
}

fn run_with_storage<S: StationStorage>(
    storage: S,
    config: &StationConfig,
    settings: RunSettings,
    reset: bool,
) -> Result<RunSummary> {
    let engine = StationEngine::new(storage, config.clone());
    if reset {
        engine.wipe().context("wiping existing save")?;
    }
    run_station(&engine, settings).with_context(|| format!("running seed {}", settings.seed))
}

fn maybe_list_upgrades(args: &Args) -> Result<bool> {
    if !args.list_upgrades {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Station upgrades:")?;
    for def in &UPGRADES {
        let max = def
            .max_level
            .map_or_else(|| "-".to_string(), |max| max.to_string());
        writeln!(
            output_target.writer(),
            "  {:10} {:18} base {:>4} x{:<5} max {:>3}  {}",
            def.id.key(),
            def.name,
            def.base_cost,
            def.cost_growth,
            max,
            def.desc
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🚀 Starport Forever Station Runner".bright_cyan().bold());
    println!("{}", "==================================".cyan());
}

fn load_config(path: Option<&Path>) -> Result<StationConfig> {
    let Some(path) = path else {
        return Ok(StationConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    StationConfig::from_json(&json).with_context(|| format!("invalid config {}", path.display()))
}

fn parse_seeds(seeds_arg: &str) -> Result<Vec<u64>> {
    let tokens = split_csv(seeds_arg);
    if tokens.is_empty() {
        bail!("no seeds given");
    }
    tokens
        .iter()
        .map(|token| {
            token
                .parse::<u64>()
                .with_context(|| format!("Unrecognized seed token: {token}"))
        })
        .collect()
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn write_reports(args: &Args, runs: &[RunSummary], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Json => reports::generate_json_report(&mut output_target, runs)?,
        ReportFormat::Markdown => reports::generate_markdown_report(&mut output_target, runs)?,
        ReportFormat::Console => {
            reports::generate_console_report(&mut output_target, runs, start_time.elapsed())?;
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
