use clap::{Parser, Subcommand};
use roster_template::cli;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Excel roster template generator and upload previewer")]
#[command(long_about = "Roster - Excel template with a validated Gender dropdown

COMMANDS:
  template  - Write user_template.xlsx (Template sheet + hidden GenderMapping sheet)
  preview   - Read a filled-in .xlsx and print its rows
  lookup    - List the dropdown values

EXAMPLES:
  roster template                       # ./user_template.xlsx
  roster template -o /tmp/              # /tmp/user_template.xlsx
  roster preview user_template.xlsx
  roster template -c roster.yaml        # custom schema / lookup values

LIMITATIONS:
  Uploaded columns are read by position (Name, Email, Gender); reordering
  them in the spreadsheet misaligns the preview. Only the .xlsx suffix is
  checked before decoding.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the Excel template
    Template {
        /// Output file or directory (default: ./user_template.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Template config (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Preview the rows of a filled-in template
    Preview {
        /// Path to the .xlsx file
        file: PathBuf,

        /// Template config (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the dropdown lookup values
    Lookup {
        /// Template config (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Template {
            output,
            config,
            verbose,
        } => cli::template(output, config, verbose)?,

        Commands::Preview {
            file,
            config,
            verbose,
        } => cli::preview(file, config, verbose)?,

        Commands::Lookup { config } => cli::lookup(config)?,
    }

    Ok(())
}
