//! Command-line interface (CLI) for parlex-glr-calc
//!
//! Evaluates arithmetic expressions, one per line of the input file or a
//! single expression given inline, and prints each result together with the
//! syntax errors that were repaired to obtain it.
//!
//! Set `RUST_LOG=trace` to watch the engine fork, merge and recover.

use anyhow::{Context, Result, bail};
use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use parlex_glr_calc::{CalcParser, Evaluation, Grouping};
use smartstring::alias::String;

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Command
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parses and evaluates expressions
    Parse {
        /// Input file with one expression per line
        #[arg(short, long)]
        input: Option<String>,

        /// Expression to evaluate
        #[arg(short, long, conflicts_with = "input")]
        expr: Option<String>,

        /// How operator conflicts are handled
        #[arg(short, long, value_enum, default_value = "precedence")]
        grouping: GroupingArg,

        /// Also print engine statistics
        #[arg(long)]
        stats: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum GroupingArg {
    Ambiguous,
    Precedence,
}

impl From<GroupingArg> for Grouping {
    fn from(g: GroupingArg) -> Self {
        match g {
            GroupingArg::Ambiguous => Grouping::Ambiguous,
            GroupingArg::Precedence => Grouping::Precedence,
        }
    }
}

fn report(line_no: usize, source: &str, eval: &Evaluation, stats: bool) {
    let value = match eval.expr.value {
        Some(v) => v.to_string(),
        None => "?".to_string(),
    };
    println!("{}: {} = {}", line_no, eval.expr.text, value);
    for diag in eval.diagnostics.iter() {
        let at = diag
            .span
            .map(|s| format!("{}:{}", s.start.line + line_no, s.start.column))
            .unwrap_or_default();
        let what = diag.argument.as_deref().unwrap_or("");
        println!("  error {} at {}: {:?} in {:?}", diag.id.0, at, what, source);
    }
    if stats {
        println!("  {:?}", eval.stats);
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Parse {
            input,
            expr,
            grouping,
            stats,
        } => {
            let source = match (input, expr) {
                (Some(path), None) => std::fs::read_to_string(path.as_str())
                    .with_context(|| format!("can't open {:?}", path))?,
                (None, Some(expr)) => expr.to_string(),
                _ => bail!("either --input or --expr is required"),
            };
            let parser = CalcParser::new(grouping.into());
            for (line_no, line) in source.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let eval = parser
                    .evaluate(line)
                    .with_context(|| format!("line {}", line_no + 1))?;
                report(line_no + 1, line, &eval, stats);
            }
        }
    }
    Ok(())
}
