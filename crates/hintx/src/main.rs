use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::process;
use tracing::Level;

mod commands;

/// 0 = OK, 2 = input error, 3 = hinting error, 1 = other.
const EXIT_OTHER: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_HINT: i32 = 3;

#[derive(Parser)]
#[command(name = "hintx", version, about = "hintx: run and disassemble TrueType hinting programs")]
struct Cli {
    /// JSON file with interpreter limits
    #[arg(long, global = true)]
    config: Option<String>,

    /// Step bound (overrides --config)
    #[arg(long, global = true, env = "HINTX_MAX_STEPS")]
    max_steps: Option<u64>,

    /// Stack slots (overrides --config)
    #[arg(long, global = true, env = "HINTX_STACK_CAPACITY")]
    stack_capacity: Option<usize>,

    /// Longest accepted program in bytes (overrides --config)
    #[arg(long, global = true, env = "HINTX_MAX_PROGRAM_LEN")]
    max_program_len: Option<usize>,

    /// -v info, -vv debug, -vvv per-instruction trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Input {
    /// Program file (or - for stdin)
    #[arg(default_value = "-")]
    file: String,
    /// Program as a hex string instead of a file
    #[arg(long, conflicts_with = "file")]
    hex: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a program and print the final stack
    Run {
        #[command(flatten)]
        input: Input,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the instruction listing of a program
    Disasm {
        #[command(flatten)]
        input: Input,
    },
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.chain().any(|c| c.is::<tt_hint::HintError>()) {
        EXIT_HINT
    } else if err.chain().any(|c| {
        c.is::<std::io::Error>()
            || c.is::<hex::FromHexError>()
            || c.is::<serde_json::Error>()
            || c.is::<tt_hint::DecodeError>()
    }) {
        EXIT_INPUT
    } else {
        EXIT_OTHER
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let overrides = commands::Limits {
        max_steps: cli.max_steps,
        stack_capacity: cli.stack_capacity,
        max_program_len: cli.max_program_len,
    };

    let result = commands::load_config(cli.config.as_deref(), &overrides).and_then(|cfg| {
        match cli.command {
            Commands::Run { input, json } => {
                commands::run(cfg, &input.file, input.hex.as_deref(), json)
            }
            Commands::Disasm { input } => commands::disasm(&input.file, input.hex.as_deref()),
        }
    });

    if let Err(e) = result {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        process::exit(exit_code_for(&e));
    }
}
