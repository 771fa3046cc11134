//! Build automation for kubegen
//!
//! Usage: cargo xtask <command>
//!
//! Available commands:
//! - test: Run unit and integration tests
//! - ci: Format check, clippy, tests, then a demo generation smoke run
//! - demo: Generate artifacts for the bundled hello demo

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use xshell::{cmd, Shell};

/// Files every demo run must produce, relative to the output directory.
const DEMO_OUTPUTS: &[&str] = &[
    "hello_deployment.yaml",
    "hello_svc.yaml",
    "hello_ingress.yaml",
    "hello_hpa.yaml",
    "hello_config_map.yaml",
    "docker/Dockerfile",
];

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for kubegen")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run tests
    Test {
        /// Run only the tests/ directory
        #[arg(long)]
        integration: bool,
    },
    /// Run CI checks (fmt, clippy, test, demo)
    Ci,
    /// Generate artifacts for demos/hello into target/demo
    Demo {
        /// Build-time properties passed through as -D key=value
        #[arg(short = 'D', value_name = "KEY=VALUE")]
        properties: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;
    sh.change_dir(project_root()?);

    match cli.command {
        Commands::Test { integration } => test(&sh, integration),
        Commands::Ci => ci(&sh),
        Commands::Demo { properties } => demo(&sh, &properties).map(|_| ()),
    }
}

fn test(sh: &Shell, integration: bool) -> Result<()> {
    println!("🧪 Running tests...");
    if integration {
        cmd!(sh, "cargo test --test '*'").run()?;
    } else {
        cmd!(sh, "cargo test --all").run()?;
    }
    Ok(())
}

fn ci(sh: &Shell) -> Result<()> {
    println!("📝 cargo fmt");
    cmd!(sh, "cargo fmt --all -- --check").run()?;

    println!("🔧 cargo clippy");
    cmd!(sh, "cargo clippy --all-targets -- -D warnings").run()?;

    test(sh, false)?;

    let output = demo(sh, &[])?;
    let missing: Vec<&str> = DEMO_OUTPUTS
        .iter()
        .copied()
        .filter(|file| !output.join(file).exists())
        .collect();
    if !missing.is_empty() {
        bail!("demo run did not produce: {}", missing.join(", "));
    }

    println!("✅ All CI checks passed");
    Ok(())
}

/// Runs `kubegen generate` on demos/hello and returns the output directory.
fn demo(sh: &Shell, properties: &[String]) -> Result<PathBuf> {
    let root = project_root()?;
    let demo_dir = root.join("target/demo");
    sh.create_dir(&demo_dir)?;
    // The Dockerfile only copies the artifact, so any file stands in for it
    let artifact = demo_dir.join("hello.balx");
    sh.write_file(&artifact, "hello demo artifact\n")?;

    let input = root.join("demos/hello/hello.toml");
    let output = demo_dir.join("kubernetes");
    let defines: Vec<String> = if properties.is_empty() {
        vec!["-Dversion=latest".to_string()]
    } else {
        properties.iter().map(|p| format!("-D{}", p)).collect()
    };

    cmd!(
        sh,
        "cargo run --quiet -- generate --input {input} --artifact {artifact} --output {output} {defines...}"
    )
    .run()
    .context("Failed to generate demo artifacts")?;

    println!("✅ Demo artifacts written to {}", output.display());
    Ok(output)
}

fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask manifest has no parent directory")
}
