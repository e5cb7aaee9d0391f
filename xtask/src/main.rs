use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for chora")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates, warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
}

impl Commands {
    /// Human label and cargo arguments for a single step.
    fn cargo_step(&self) -> Option<(&'static str, &'static [&'static str])> {
        match self {
            Commands::Check => None,
            Commands::Fmt => Some(("fmt check", &["fmt", "--all", "--", "--check"])),
            Commands::Clippy => Some((
                "clippy",
                &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
            )),
            Commands::Test => Some(("test", &["test", "--workspace"])),
            Commands::Doc => Some(("doc", &["doc", "--workspace", "--no-deps"])),
            Commands::Build => Some(("build", &["build", "--workspace"])),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let steps = match cli.command {
        Commands::Check => vec![
            Commands::Fmt,
            Commands::Clippy,
            Commands::Test,
            Commands::Doc,
        ],
        other => vec![other],
    };

    for step in &steps {
        if let Some((label, args)) = step.cargo_step() {
            cargo(label, args)?;
        }
    }
    Ok(())
}

fn cargo(label: &str, args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {label} failed");
    }
    Ok(())
}
