//! Listward CLI — apply tag plans to JSON results and validate declarations.
//!
//! Usage:
//!   listward apply --tag reverse --tag unique [--input file.json]
//!   listward check [--declarations path]
//!   listward run --function NAME [--declarations path] [--input file.json]

use clap::{Parser, Subcommand};
use listward::{FunctionId, Outcome, Tag, TagRegistry, TagSet, TransformPlan};
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "listward",
    version,
    about = "Declarative post-processing for collection results"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply tags to a JSON value
    Apply {
        /// Tag to apply (repeatable), e.g. `reverse` or `not_null_default(modifiable = false)`
        #[arg(long = "tag", required = true)]
        tags: Vec<Tag>,
        /// JSON input file (stdin if omitted)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Validate a declaration file and list its functions
    Check {
        /// Path to the YAML declaration file
        #[arg(long)]
        declarations: Option<PathBuf>,
    },
    /// Apply the tags declared for one function to a JSON value
    Run {
        /// Declared function name
        #[arg(long)]
        function: String,
        /// Path to the YAML declaration file
        #[arg(long)]
        declarations: Option<PathBuf>,
        /// JSON input file (stdin if omitted)
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

/// Get the default declarations path (~/.config/listward/declarations.yaml)
fn default_declarations_path() -> PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".config"));
    config_dir.join("listward").join("declarations.yaml")
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(input: Option<&Path>) -> Result<Value, String> {
    let text = match input {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("cannot read stdin: {}", e))?;
            buf
        }
    };
    serde_json::from_str(&text).map_err(|e| format!("invalid JSON input: {}", e))
}

fn load_registry(declarations: Option<PathBuf>) -> Result<TagRegistry, String> {
    let path = declarations.unwrap_or_else(default_declarations_path);
    TagRegistry::from_path(&path)
        .map_err(|e| format!("failed to load '{}': {}", path.display(), e))
}

fn apply_and_print(plan: &TransformPlan, function: &FunctionId, input: Option<&Path>) -> i32 {
    let value = match read_input(input) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let output = value.apply(plan, function);
    match serde_json::to_string_pretty(&output) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_apply(tags: Vec<Tag>, input: Option<&Path>) -> i32 {
    let function = FunctionId::new("cli::apply");
    let tags = match TagSet::new(function.as_str(), tags) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    apply_and_print(&tags.plan(), &function, input)
}

fn cmd_check(declarations: Option<PathBuf>) -> i32 {
    let registry = match load_registry(declarations) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if registry.is_empty() {
        println!("No functions declared.");
        return 0;
    }
    println!("{:<40}  {:<8}  {}", "FUNCTION", "RETURNS", "PLAN");
    println!("{}", "-".repeat(80));
    for decl in registry.iter() {
        println!("{:<40}  {:<8}  {}", decl.id, decl.returns, decl.plan());
    }
    0
}

fn cmd_run(function: &str, declarations: Option<PathBuf>, input: Option<&Path>) -> i32 {
    let registry = match load_registry(declarations) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let id = FunctionId::new(function);
    let plan = match registry.get(&id) {
        Some(decl) => decl.plan(),
        None => {
            eprintln!("Error: function '{}' not declared", function);
            return 1;
        }
    };
    apply_and_print(&plan, &id, input)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match cli.command {
        Commands::Apply { tags, input } => cmd_apply(tags, input.as_deref()),
        Commands::Check { declarations } => cmd_check(declarations),
        Commands::Run {
            function,
            declarations,
            input,
        } => cmd_run(&function, declarations, input.as_deref()),
    };
    std::process::exit(code);
}
