use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use serde::Serialize;
use starport_core::numbers::{format_credits, u64_to_f64};

use crate::simulation::RunSummary;

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    runs: &'a [RunSummary],
}

pub fn generate_console_report<W: Write + ?Sized>(
    writer: &mut W,
    runs: &[RunSummary],
    total_duration: Duration,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Station Run Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "======================".cyan())?;
    writeln!(writer, "Runs: {}", runs.len())?;
    writeln!(writer, "Wall time: {total_duration:?}")?;
    writeln!(writer)?;

    for run in runs {
        writeln!(
            writer,
            "{} seed {} ({})",
            "🛰️".bold(),
            run.seed.to_string().bold(),
            run.policy
        )?;
        writeln!(writer, "   Session: {}", run.session_clock)?;
        if run.offline.gains > 0 {
            writeln!(
                writer,
                "   Offline: +{} over {}s",
                format_credits(u64_to_f64(run.offline.gains)).green(),
                run.offline.credited_secs
            )?;
        }
        writeln!(
            writer,
            "   Credits: {} (lifetime {})",
            format_credits(run.credits).yellow(),
            format_credits(run.lifetime_credits)
        )?;
        writeln!(
            writer,
            "   Ships: {} docked, {} served, {} hiccups",
            run.totals.spawns, run.totals.completions, run.totals.hiccups
        )?;
        writeln!(
            writer,
            "   Docks: {}  Purchases: {}  Star Cred: {} ({} prestiges)",
            run.dock_count, run.purchases, run.prestige_currency, run.prestiges
        )?;
        writeln!(
            writer,
            "   Rates: traffic x{:.2}, speed x{:.2}, tips x{:.2}",
            run.rates.traffic, run.rates.speed, run.rates.tips_all
        )?;
        if !run.saved {
            writeln!(writer, "   {}", "Final save failed".red())?;
        }
        writeln!(writer)?;
    }

    if let Some(best) = runs
        .iter()
        .max_by(|a, b| a.lifetime_credits.total_cmp(&b.lifetime_credits))
    {
        writeln!(writer, "{}", "⚡ Best Run".bright_yellow().bold())?;
        writeln!(writer, "{}", "==========".yellow())?;
        writeln!(
            writer,
            "Seed {} earned {} lifetime credits",
            best.seed.to_string().green(),
            format_credits(best.lifetime_credits)
        )?;
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(writer: &mut W, runs: &[RunSummary]) -> Result<()> {
    let report = JsonReport {
        generated_at: Utc::now().to_rfc3339(),
        runs,
    };
    let json_output = serde_json::to_string_pretty(&report)?;
    writeln!(writer, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    writer: &mut W,
    runs: &[RunSummary],
) -> Result<()> {
    writeln!(writer, "# Starport Station Runs\n")?;
    writeln!(
        writer,
        "_Generated {}_\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    writeln!(writer, "## Summary\n")?;
    writeln!(
        writer,
        "| Seed | Policy | Session | Lifetime | Credits | Docks | Purchases | Star Cred |"
    )?;
    writeln!(writer, "|---|---|---|---|---|---|---|---|")?;
    for run in runs {
        writeln!(
            writer,
            "| {} | {} | {} | {} | {} | {} | {} | {} |",
            run.seed,
            run.policy,
            run.session_clock,
            format_credits(run.lifetime_credits),
            format_credits(run.credits),
            run.dock_count,
            run.purchases,
            run.prestige_currency
        )?;
    }
    writeln!(writer)?;

    writeln!(writer, "## Details\n")?;
    for run in runs {
        writeln!(writer, "### Seed {}\n", run.seed)?;
        writeln!(
            writer,
            "- **Ships served**: {} of {} docked",
            run.totals.completions, run.totals.spawns
        )?;
        writeln!(writer, "- **Offline gains**: {}", run.offline.gains)?;
        writeln!(writer, "- **Random events**: {}", run.totals.modifiers_started)?;
        let levels: Vec<String> = run
            .upgrades
            .iter()
            .filter(|(_, level)| **level > 0)
            .map(|(id, level)| format!("{id} {level}"))
            .collect();
        if !levels.is_empty() {
            writeln!(writer, "- **Upgrades**: {}", levels.join(", "))?;
        }
        if !run.recent_log.is_empty() {
            writeln!(writer, "- **Recent log**:")?;
            for line in &run.recent_log {
                writeln!(writer, "  - {line}")?;
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}
