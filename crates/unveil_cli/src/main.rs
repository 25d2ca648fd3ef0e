//! Unveil CLI
//!
//! Simulate and check scroll-reveal scenes without a browser.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use unveil_core::Size;
use unveil_widgets::STYLESHEET;

mod report;
mod scene;

use report::LabeledSnapshot;
use scene::{Scene, Step};

#[derive(Parser)]
#[command(name = "unveil")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scroll-triggered reveal effects, headless", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scene's scroll script and print the recorded snapshots
    Simulate {
        /// Scene file (TOML, or JSON by extension)
        scene: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Override the scene's random seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Validate a scene file
    Check {
        /// Scene file (TOML, or JSON by extension)
        scene: PathBuf,
    },

    /// Print the stylesheet for the emitted class names
    Stylesheet {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate {
            scene,
            format,
            seed,
        } => cmd_simulate(&scene, format, seed),

        Commands::Check { scene } => cmd_check(&scene),

        Commands::Stylesheet { output } => cmd_stylesheet(output.as_deref()),
    }
}

fn cmd_simulate(path: &std::path::Path, format: Format, seed: Option<u64>) -> Result<()> {
    let mut scene = Scene::load(path)?;
    scene.validate()?;
    if seed.is_some() {
        scene.seed = seed;
    }

    info!(
        "Simulating {} ({} components, {} steps)",
        path.display(),
        scene.components.len(),
        scene.script.len()
    );

    let snapshots = run_script(&scene)?;
    let rendered = match format {
        Format::Text => report::format_text(&snapshots),
        Format::Json => report::format_json(&snapshots).context("Failed to serialize snapshots")?,
    };
    println!("{rendered}");

    Ok(())
}

/// Execute the scene's script, collecting every snapshot
///
/// A final snapshot is taken when the script records none.
fn run_script(scene: &Scene) -> Result<Vec<LabeledSnapshot>> {
    let mut stage = scene.build_stage()?;
    let mut snapshots = Vec::new();

    for step in &scene.script {
        tracing::debug!(?step, time = stage.now(), "script step");
        match step {
            Step::ScrollTo(y) => stage.scroll_to(*y),
            Step::ScrollBy(dy) => stage.scroll_by(*dy),
            Step::Advance(ms) => stage.advance(*ms),
            Step::Resize { width, height } => stage.resize(Size::new(*width, *height)),
            Step::Snapshot(label) => snapshots.push(LabeledSnapshot {
                label: label.clone(),
                snapshot: stage.snapshot(),
            }),
        }
    }

    if snapshots.is_empty() {
        snapshots.push(LabeledSnapshot {
            label: "final".to_string(),
            snapshot: stage.snapshot(),
        });
    }

    Ok(snapshots)
}

fn cmd_check(path: &std::path::Path) -> Result<()> {
    let scene = Scene::load(path)?;
    scene.validate()?;
    scene.build_stage()?;

    info!(
        "{} is valid: {} components, {} script steps",
        path.display(),
        scene.components.len(),
        scene.script.len()
    );

    Ok(())
}

fn cmd_stylesheet(output: Option<&std::path::Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, STYLESHEET.trim_start())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote stylesheet to {}", path.display());
        }
        None => print!("{}", STYLESHEET.trim_start()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_script_collects_snapshots() {
        let scene = Scene::from_toml(
            r#"
            [viewport]
            width = 800
            height = 600

            [[components]]
            key = "top"
            height = 600
            div = { type = "fade", onlyOnce = true, duration = 500 }

            [[components]]
            key = "bottom"
            height = 600
            text = { type = "fade", content = "ok", duration = 50 }

            [[script]]
            advance = 700

            [[script]]
            snapshot = "top settled"

            [[script]]
            scroll_to = 600

            [[script]]
            advance = 300

            [[script]]
            snapshot = "scrolled"
            "#,
        )
        .unwrap();

        let snapshots = run_script(&scene).unwrap();
        assert_eq!(snapshots.len(), 2);

        let first = &snapshots[0].snapshot;
        assert!(first.components[0].locked);
        assert!(!first.components[1].visible);

        let second = &snapshots[1].snapshot;
        assert_eq!(second.time, 1000);
        assert!(second.components[0].locked);
        assert!(second.components[1].visible);
        assert_eq!(report::visible_text(&second.components[1].node), "ok");
    }

    #[test]
    fn test_empty_script_takes_final_snapshot() {
        let scene = Scene::from_toml(
            r#"
            [[components]]
            key = "only"
            height = 100
            div = { type = "flicker" }
            "#,
        )
        .unwrap();

        let snapshots = run_script(&scene).unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].label, "final");
    }
}
