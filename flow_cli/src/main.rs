use clap::{Parser, Subcommand};
use flow_core::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "vinyasa")]
#[command(about = "Yoga sequence builder and transition safety checker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the pose catalog with a JSON file
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest up to five next poses for a sequence in progress (default)
    Suggest {
        /// Pose ids already in the sequence, in practice order
        pose_ids: Vec<String>,
    },

    /// Check a sequence for risky transitions
    Validate {
        /// Pose ids in practice order
        pose_ids: Vec<String>,

        /// Planned duration in seconds (informational)
        #[arg(long)]
        duration_secs: Option<u32>,

        /// Read the sequence from a JSON request file
        #[arg(long, conflicts_with_all = ["pose_ids", "preset"])]
        file: Option<PathBuf>,

        /// Validate a built-in preset flow by name
        #[arg(long, conflicts_with = "pose_ids")]
        preset: Option<String>,
    },

    /// List every pose in the catalog
    Poses,

    /// List the built-in preset flows
    Presets,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Initialize logging
    flow_core::logging::init();

    let cli = Cli::parse();

    // Catalog precedence: --catalog flag, then config file, then built-in
    let config = Config::load()?;
    let catalog_path = cli.catalog.or_else(|| config.catalog.path.clone());
    let catalog = load_catalog(catalog_path.as_deref());

    match cli.command {
        Some(Commands::Suggest { pose_ids }) => cmd_suggest(&catalog, &config, &pose_ids),
        Some(Commands::Validate {
            pose_ids,
            duration_secs,
            file,
            preset,
        }) => cmd_validate(&catalog, &config, pose_ids, duration_secs, file, preset),
        Some(Commands::Poses) => cmd_poses(&catalog),
        Some(Commands::Presets) => cmd_presets(),
        None => {
            // Default to suggesting openers for a fresh sequence
            cmd_suggest(&catalog, &config, &[])
        }
    }
}

/// Load the catalog, falling back to the built-in one on any failure
fn load_catalog(path: Option<&Path>) -> Catalog {
    match path {
        Some(path) => match Catalog::load_from_json(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                eprintln!(
                    "Failed to load catalog from {}: {}. Using built-in catalog.",
                    path.display(),
                    e
                );
                build_default_catalog()
            }
        },
        None => build_default_catalog(),
    }
}

fn warn_unknown_poses(catalog: &Catalog, pose_ids: &[String]) {
    for id in pose_ids {
        if catalog.get(id).is_none() {
            eprintln!("Warning: unknown pose id '{}'", id);
        }
    }
}

fn cmd_suggest(catalog: &Catalog, config: &Config, pose_ids: &[String]) -> Result<()> {
    warn_unknown_poses(catalog, pose_ids);

    let suggestions = suggest_next(catalog, &config.suggestion, pose_ids);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  NEXT POSE SUGGESTIONS");
    println!("╰─────────────────────────────────────────╯");
    println!();

    if pose_ids.is_empty() {
        println!("  Starting a new sequence - gentle openers:");
        println!();
    }

    if suggestions.is_empty() {
        println!("  No suggestions available for this sequence.");
        println!();
        return Ok(());
    }

    for (i, pose) in suggestions.iter().enumerate() {
        println!(
            "  {}. {} [{}]  {}, intensity {}",
            i + 1,
            pose.name,
            pose.id,
            pose.family.as_str(),
            pose.intensity
        );
    }
    println!();

    Ok(())
}

fn cmd_validate(
    catalog: &Catalog,
    config: &Config,
    pose_ids: Vec<String>,
    duration_secs: Option<u32>,
    file: Option<PathBuf>,
    preset: Option<String>,
) -> Result<()> {
    let mut request = if let Some(path) = file {
        load_request(&path)?
    } else if let Some(name) = preset {
        let preset = find_preset(&name)
            .ok_or_else(|| Error::InvalidFlow(format!("unknown preset '{}'", name)))?;
        ValidationRequest {
            flow: preset.flow.iter().map(|id| id.to_string()).collect(),
            total_seconds: None,
        }
    } else {
        ValidationRequest {
            flow: pose_ids,
            total_seconds: None,
        }
    };

    if duration_secs.is_some() {
        request.total_seconds = duration_secs;
    }

    warn_unknown_poses(catalog, &request.flow);

    let result = validate_sequence(catalog, config, Arc::new(OfflineAdvisor), &request);
    display_validation(&request, &result);

    Ok(())
}

fn cmd_poses(catalog: &Catalog) -> Result<()> {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  POSE CATALOG ({} poses)", catalog.len());
    println!("╰─────────────────────────────────────────╯");
    println!();

    for pose in catalog.poses() {
        println!("  {} [{}]", pose.name, pose.id);
        if !pose.sanskrit.is_empty() {
            println!("      {}", pose.sanskrit);
        }
        println!(
            "      {}, {}, intensity {}",
            pose.family.as_str(),
            pose.level.as_str(),
            pose.intensity
        );
        if !pose.muscles_engaged.is_empty() {
            println!("      engages: {}", pose.muscles_engaged.join(", "));
        }
        if !pose.muscles_stretched.is_empty() {
            println!("      stretches: {}", pose.muscles_stretched.join(", "));
        }
        println!();
    }

    Ok(())
}

fn cmd_presets() -> Result<()> {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  PRESET FLOWS");
    println!("╰─────────────────────────────────────────╯");
    println!();

    for preset in PRESET_FLOWS {
        println!("  {}", preset.name);
        println!("      {}", preset.flow.join(" → "));
        println!();
    }

    Ok(())
}

fn display_validation(request: &ValidationRequest, result: &SequenceValidation) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  SEQUENCE SAFETY REPORT");
    println!("╰─────────────────────────────────────────╯");
    println!();

    if request.flow.is_empty() {
        println!("  Sequence: (empty)");
    } else {
        println!("  Sequence: {}", request.flow.join(" → "));
    }
    println!(
        "  Verdict:  {}",
        result.overall_safety.as_str().to_uppercase()
    );
    println!();

    if result.transition_risks.is_empty() {
        println!("  No transition risks found.");
    } else {
        println!("  Findings:");
        for risk in &result.transition_risks {
            println!(
                "  [{}] {} → {}",
                risk.level.as_str(),
                risk.from_pose,
                risk.to_pose
            );
            println!("        {}", risk.reason);
            println!("        Hint: {}", risk.suggestion);
        }
    }
    println!();

    println!("  Advisory notes:");
    for note in &result.advisories {
        println!("  - {}", note);
    }

    if let Some(ref safer) = result.safer_alternative {
        println!();
        println!("  Safer sequence:");
        println!("  {}", safer.join(" → "));
    }

    println!();
}
