mod common;
mod logic;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use seasonsim_game::ScheduleMode;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use common::scenario::{get_scenario, list_scenarios, scenario_keys};
use common::{load_roster, split_csv};
use logic::{LogicTester, SeasonPlan, SeasonRunner, SeedInfo, resolve_seed_inputs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "seasonsim-tester", version)]
#[command(about = "Seeded season runs with invariant checks for the Seasonsim engine")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seed phrases to run (comma-separated; `range:N` expands to N phrases)
    #[arg(long, default_value = "seasonsim")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 3)]
    iterations: usize,

    /// Roster JSON file; a generated league is used when omitted
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Conferences in the generated league
    #[arg(long, default_value_t = 8)]
    conferences: usize,

    /// Teams per conference in the generated league
    #[arg(long, default_value_t = 9)]
    teams_per_conference: usize,

    /// Conference round robins: single or double
    #[arg(long, default_value = "single")]
    mode: ScheduleMode,

    /// Non-conference games per team
    #[arg(long, default_value_t = seasonsim_game::constants::DEFAULT_NON_CONF_GAMES)]
    non_conf: usize,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenarios = expand_scenarios(&args.scenarios);
    let seed_infos = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let roster = load_roster(
        args.roster.as_deref(),
        args.conferences,
        args.teams_per_conference,
    )?;
    log::info!("running {} scenarios over {} teams", scenarios.len(), roster.len());
    let runner = SeasonRunner::new(Arc::new(roster), args.verbose);

    let results = run_logic_scenarios(&args, &scenarios, &seed_infos, runner);

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:15} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🏆 Seasonsim Season Tester".bright_cyan().bold());
    println!("{}", "==========================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for key in scenario_keys() {
            if !scenarios.contains(&key) {
                scenarios.push(key);
            }
        }
    }
    scenarios
}

fn run_logic_scenarios(
    args: &Args,
    scenarios: &[String],
    seeds: &[SeedInfo],
    runner: SeasonRunner,
) -> Vec<logic::ScenarioResult> {
    println!("{}", "🧠 Running Season Scenarios".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let base = SeasonPlan::new(args.mode, args.non_conf);
    let tester = LogicTester::new(runner, args.verbose);
    let mut results = Vec::new();

    for scenario_name in scenarios {
        if let Some(scenario) = get_scenario(scenario_name, &base) {
            results.extend(tester.run_scenario(&scenario, seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }

    results
}

fn write_reports(
    args: &Args,
    results: &[logic::ScenarioResult],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report {
        ReportFormat::Json => {
            if results.is_empty() {
                writeln!(&mut output_target, "[]")?;
            } else {
                logic::reports::generate_json_report(&mut output_target, results)?;
            }
        }
        ReportFormat::Markdown => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Seasonsim Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        ReportFormat::Console => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            let duration = start_time.elapsed();
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
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
        match path {
            Some(path) => {
                let file = File::create(&path)
                    .with_context(|| format!("creating report file {}", path.display()))?;
                Ok(Self::File(BufWriter::new(file)))
            }
            None => Ok(Self::Stdout(BufWriter::new(stdout()))),
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(writer) => writer,
            Self::File(writer) => writer,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        self.writer().flush()
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
