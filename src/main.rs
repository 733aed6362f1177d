use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use firmforge::workspace::Workspace;

mod cli_exec;

#[derive(Parser)]
#[command(name = "firmforge")]
#[command(about = "Configure and build printer firmware", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a workspace (.firmforge)
    Init {
        /// Re-initialize if .firmforge already exists
        #[arg(long)]
        force: bool,
        /// Path to initialize (defaults to current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Show or edit the named build sheets
    Sheets {
        #[command(subcommand)]
        command: SheetsCommands,
    },

    /// List the configuration rules applied before building
    Recipe {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Merge configuration headers and apply the recipe without compiling
    Patch {
        /// Fail if any rule matches nothing
        #[arg(long)]
        strict: bool,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch sources, configure and compile the firmware
    Build {
        /// Fail if any rule matches nothing
        #[arg(long)]
        strict: bool,
    },

    /// Show the last build
    Status {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum SheetsCommands {
    /// Show the sheets configuration
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Compile the sheets feature in
    Enable,
    /// Compile the sheets feature out
    Disable,
    /// Rename a sheet slot (1-8)
    Set { slot: usize, name: String },
    /// Change display and persistence preferences
    Flags {
        #[arg(long)]
        show_on_status_screen: Option<bool>,
        #[arg(long)]
        autosave_eeprom: Option<bool>,
    },
    /// Check sheet names against the display width
    Validate,
    /// Print the header block the build appends to Configuration_adv.h
    Render,
    /// Read the sheets configuration from a header file
    Import { header: PathBuf },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force, path } => {
            let root = path.unwrap_or(std::env::current_dir().context("get current dir")?);
            Workspace::init(&root, force)?;
            println!("Initialized firmforge workspace at {}", root.display());
        }
        Commands::Sheets { command } => {
            let ws = discover()?;
            cli_exec::handle_sheets_command(&ws, command)?;
        }
        Commands::Recipe { json } => {
            let ws = discover()?;
            cli_exec::handle_recipe(&ws, json)?;
        }
        Commands::Patch { strict, json } => {
            let ws = discover()?;
            cli_exec::handle_patch(&ws, strict, json)?;
        }
        Commands::Build { strict } => {
            let ws = discover()?;
            cli_exec::handle_build(&ws, strict)?;
        }
        Commands::Status { json } => {
            let ws = discover()?;
            cli_exec::handle_status(&ws, json)?;
        }
    }

    Ok(())
}

fn discover() -> Result<Workspace> {
    Workspace::discover(&std::env::current_dir().context("get current dir")?)
}
