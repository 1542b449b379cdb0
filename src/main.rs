use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;
use tw_patcher::config::{resolve, RunPlan, TargetSource};
use tw_patcher::{logging, patch_files};

#[derive(Parser)]
#[command(name = "tw-patcher")]
#[command(about = "Rewrite text-muted to text-muted-foreground in place", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Patch files in place (the default when no subcommand is given)
    Apply {
        /// Files to patch (overrides the config file and the built-in list)
        paths: Vec<PathBuf>,

        /// TOML file with rules and/or target files
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Log each file's replacement count to stderr
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the rules and target files without touching them
    Rules {
        /// TOML file with rules and/or target files
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => cmd_apply(Vec::new(), None, false),
        Some(Commands::Apply {
            paths,
            config,
            verbose,
        }) => cmd_apply(paths, config, verbose),
        Some(Commands::Rules { config }) => cmd_rules(config),
    }
}

fn cmd_apply(paths: Vec<PathBuf>, config: Option<PathBuf>, verbose: bool) -> Result<()> {
    logging::init(verbose);

    let plan = resolve(config.as_deref(), &paths)?;
    let outcomes = patch_files(&plan.files, &plan.rules, |outcome| {
        println!("Fixed: {}", outcome.file.display());
    })?;

    let replacements: usize = outcomes.iter().map(|o| o.replacements).sum();
    info!(files = outcomes.len(), replacements, "patch run complete");

    Ok(())
}

fn cmd_rules(config: Option<PathBuf>) -> Result<()> {
    logging::init(false);

    let plan = resolve(config.as_deref(), &[])?;
    print_plan(&plan);
    Ok(())
}

fn print_plan(plan: &RunPlan) {
    println!("{}", "Rules:".bold());
    for rule in &plan.rules {
        println!(
            "  {} -> {}",
            rule.token().yellow(),
            rule.replacement().green()
        );
        println!("    boundaries: {:?}", rule.boundaries());
        match rule.guard() {
            Some(guard) => println!("    skip when followed by: {:?}", guard),
            None => println!("    skip when followed by: {}", "(none)".dimmed()),
        }
    }

    let origin = match plan.source {
        TargetSource::Cli => "command line",
        TargetSource::ConfigFile => "config file",
        TargetSource::Builtin => "built-in",
    };
    println!();
    println!("{} ({})", "Files:".bold(), origin.dimmed());
    for file in &plan.files {
        let marker = if file.exists() {
            "✓".green()
        } else {
            "✗".red()
        };
        println!("  {} {}", marker, file.display());
    }
}
