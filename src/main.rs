use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use prefab::commands;
use prefab::OutputFormat;

/// Prefab - project scaffolding preflight.
/// Checks dependency selections and the host environment before a single
/// file is generated.
#[derive(Parser)]
#[command(name = "prefab")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter prefab.toml in the current directory
    Init {
        /// Force overwrite an existing plan file
        #[arg(short, long)]
        force: bool,
    },

    /// List curated dependency presets for a project type
    Presets {
        /// Project type, e.g. "Java Maven", "Python", "React"
        project_type: String,
    },

    /// Run preflight checks over the plan
    Check {
        /// Plan file to check (defaults to prefab.toml)
        #[arg(short, long)]
        plan: Option<PathBuf>,
    },

    /// Probe the host for development tools
    Env,

    /// Render manifest fragments for the plan's dependencies
    Render {
        /// Plan file to render (defaults to prefab.toml)
        #[arg(short, long)]
        plan: Option<PathBuf>,
    },

    /// Generate the project tree described by the plan
    Scaffold {
        /// Plan file to scaffold (defaults to prefab.toml)
        #[arg(short, long)]
        plan: Option<PathBuf>,

        /// Directory to generate into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Query a package registry for the latest published version
    Latest {
        /// Ecosystem to query: npm, pip, maven
        ecosystem: String,

        /// Package name (maven packages as group:artifact)
        package: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let format = OutputFormat::from_str(&cli.format);
    let is_json = format.is_json();

    if !is_json {
        println!("{}", "⚡ Prefab".bold().cyan());
        println!("{}", "Project Scaffolding Preflight".dimmed());
        println!();
    }

    let result = match cli.command {
        Commands::Init { force } => commands::init::run(force, format),
        Commands::Presets { project_type } => commands::presets::run(&project_type, format),
        Commands::Check { plan } => match commands::check::run(plan, format) {
            Ok(true) => Ok(()),
            Ok(false) => std::process::exit(1),
            Err(e) => Err(e),
        },
        Commands::Env => commands::env::run(format),
        Commands::Render { plan } => commands::render::run(plan, format),
        Commands::Scaffold { plan, output } => commands::scaffold::run(plan, output, format),
        Commands::Latest { ecosystem, package } => {
            commands::latest::run(&ecosystem, &package, format)
        }
    };

    if let Err(e) = result {
        if is_json {
            let error_output = serde_json::json!({
                "success": false,
                "error": e.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&error_output).unwrap_or_default()
            );
        } else {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
        std::process::exit(1);
    }
}
