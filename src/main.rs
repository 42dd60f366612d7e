use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use plansheet::cli;
use plansheet::core::extractor::{FIRST_PLAN_COLUMN, HEADER_ROWS, PRIMARY_COLUMN, SECONDARY_COLUMN};
use plansheet::SheetLayout;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plansheet")]
#[command(about = "Flatten colour-grouped benefit comparison sheets into one line per plan value")]
#[command(long_about = "Plansheet - flatten benefit comparison sheets

Reads the first worksheet of an .xlsx template where:
  - a row whose first cell has a fill colour starts a benefit group
  - column A holds the coverage line (blank cells keep the one above)
  - column B holds the category
  - columns from F onward hold one plan each

and prints one line per non-empty plan value:

  benefit, coverage, category, Plan <n>, =value

COMMANDS:
  convert   - Print (or write) the flat records
  groups    - Summarize records per benefit group

EXAMPLES:
  plansheet convert Q1.xlsx
  plansheet convert Q1.xlsx -o q1.txt
  plansheet groups Q1.xlsx --first-plan-column 6

Set RUST_LOG=plansheet=debug for loader and marker-row logging.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Template column positions (0-based)
#[derive(Args, Debug, Clone, Copy)]
struct LayoutArgs {
    /// Number of header rows to skip
    #[arg(long, default_value_t = HEADER_ROWS, env = "PLANSHEET_HEADER_ROWS")]
    header_rows: u32,

    /// Column holding benefit and coverage labels
    #[arg(long, default_value_t = PRIMARY_COLUMN, env = "PLANSHEET_PRIMARY_COLUMN")]
    primary_column: u32,

    /// Column holding the category
    #[arg(long, default_value_t = SECONDARY_COLUMN, env = "PLANSHEET_SECONDARY_COLUMN")]
    secondary_column: u32,

    /// First plan value column
    #[arg(long, default_value_t = FIRST_PLAN_COLUMN, env = "PLANSHEET_FIRST_PLAN_COLUMN")]
    first_plan_column: u32,
}

impl From<LayoutArgs> for SheetLayout {
    fn from(args: LayoutArgs) -> Self {
        SheetLayout {
            header_rows: args.header_rows,
            primary_column: args.primary_column,
            secondary_column: args.secondary_column,
            first_plan_column: args.first_plan_column,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Convert the template into flat records.

Records are printed to stdout, one per line; status goes to stderr.
Use --output to write the records to a file instead.

EXAMPLE:
  plansheet convert Q1.xlsx > q1.txt")]
    /// Convert a template into flat records
    Convert {
        /// Path to Excel file (.xlsx)
        input: PathBuf,

        /// Write records to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show verbose conversion steps
        #[arg(short, long)]
        verbose: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Summarize records per benefit group
    Groups {
        /// Path to Excel file (.xlsx)
        input: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "plansheet=debug"
    } else {
        "plansheet=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            verbose,
            layout,
        } => {
            init_tracing(verbose);
            let context = format!("Error converting template {}", input.display());
            cli::convert(input, output, verbose, layout.into()).context(context)
        }

        Commands::Groups { input, layout } => {
            init_tracing(false);
            let context = format!("Error reading template {}", input.display());
            cli::groups(input, layout.into()).context(context)
        }
    }
}
