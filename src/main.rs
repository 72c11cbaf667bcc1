use anyhow::{Context, Result};
use chart_merge::{run_stage, PipelineConfig, Stage, StageReport};
use clap::{Parser, ValueEnum};
use env_logger::{Env, Target};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

#[derive(Parser)]
#[command(name = "chart_pipeline")]
#[command(about = "Normalize streaming-chart and track exports and combine them into one table")]
struct Args {
    /// Stage to run; `all` runs tracks, chart, then combine
    #[arg(value_enum, default_value = "all")]
    stage: StageArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StageArg {
    Tracks,
    Chart,
    Combine,
    All,
}

impl StageArg {
    fn stages(self) -> Vec<Stage> {
        match self {
            StageArg::Tracks => vec![Stage::Tracks],
            StageArg::Chart => vec![Stage::Chart],
            StageArg::Combine => vec![Stage::Combine],
            StageArg::All => Stage::ALL.to_vec(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    let args = Args::parse();
    let config = PipelineConfig::default();
    let stages = args.stage.stages();

    println!("🚀 Chart / track data preparation");
    println!("{}", "=".repeat(60));

    let pb = ProgressBar::new(stages.len() as u64);
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap());

    let start = std::time::Instant::now();
    let mut reports: Vec<StageReport> = Vec::new();

    for stage in stages {
        pb.set_message(stage.to_string());
        let report = run_stage(stage, &config)
            .with_context(|| format!("{} stage failed", stage))?;
        info!("{} stage wrote {} rows", stage, report.rows);
        reports.push(report);
        pb.inc(1);
    }

    pb.finish_with_message("done");

    println!("\n{}", "=".repeat(60));
    for report in &reports {
        if report.warnings.is_empty() {
            println!("✅ {}: {} rows -> {}", report.stage, report.rows, report.output.display());
        } else {
            println!(
                "⚠️  {}: {} rows -> {} ({} column(s) skipped)",
                report.stage,
                report.rows,
                report.output.display(),
                report.warnings.len()
            );
        }
    }
    println!("✅ Processing complete in {:?}!", start.elapsed());

    Ok(())
}
