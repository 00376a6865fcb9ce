use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use classgen::codegen::recorder::render_commands;
use classgen::decl::DeclarationBundle;
use classgen::{Config, JvmTarget};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "classgen")]
#[command(about = "Lower resolved class declarations into JVM class files")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lower declaration bundles to .class files
    Lower {
        /// JSON bundle, or a directory searched for *.json bundles
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output directory for .class files
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// JVM target (1.6, 1.8, 9, 11, 17, 21)
        #[arg(long, value_name = "TARGET")]
        target: Option<JvmTarget>,

        /// Worker threads; 0 uses one per CPU
        #[arg(short, long, value_name = "N")]
        jobs: Option<usize>,

        /// Skip structural verification of the generated classes
        #[arg(long)]
        no_verify: bool,

        /// Do not emit SourceFile attributes
        #[arg(long)]
        no_debug: bool,
    },

    /// Print the writer commands issued for a bundle
    Dump {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Print commands as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the supported JVM targets
    Targets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match cli.command {
        Commands::Lower { input, output, target, jobs, no_verify, no_debug } => {
            let mut config = Config::from_env()?;
            if let Some(target) = target {
                config.target = target;
            }
            if let Some(jobs) = jobs {
                config.jobs = jobs;
            }
            config.verify &= !no_verify;
            config.debug &= !no_debug;
            lower_input(&input, output.as_deref(), &config, cli.verbose)?;
        }
        Commands::Dump { input, json } => {
            dump_input(&input, json)?;
        }
        Commands::Targets => {
            for target in JvmTarget::ALL {
                let marker = if target == JvmTarget::DEFAULT { " (default)" } else { "" };
                println!("{:<4} class file version {}{}", target.description(), target.major_version(), marker);
            }
        }
    }

    Ok(())
}

fn lower_input(input: &Path, output: Option<&Path>, config: &Config, verbose: bool) -> Result<()> {
    let bundle = load_bundle(input)?;
    let output_dir = output.unwrap_or_else(|| Path::new("."));

    let lowered = classgen::compile(&bundle, config).with_context(|| format!("failed to lower {}", input.display()))?;
    for diagnostic in lowered.diagnostics.entries() {
        eprintln!("warning: {}", diagnostic);
    }

    let written = classgen::codegen::write_class_files(&lowered.classes, output_dir, config)?;
    if verbose {
        for path in &written {
            println!("{}", path.display());
        }
    }
    println!("Lowered {} classes into {} (target {})", written.len(), output_dir.display(), config.target);
    Ok(())
}

fn dump_input(input: &Path, json: bool) -> Result<()> {
    let bundle = load_bundle(input)?;
    let config = Config::from_env()?;
    let commands = classgen::dump_commands(&bundle, &config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&commands)?);
    } else {
        print!("{}", render_commands(&commands));
    }
    Ok(())
}

/// Read one bundle file, or merge every *.json bundle under a directory
fn load_bundle(input: &Path) -> Result<DeclarationBundle> {
    if input.is_file() {
        return DeclarationBundle::from_path(input).with_context(|| format!("failed to read {}", input.display()));
    }
    if !input.is_dir() {
        bail!("input {} does not exist", input.display());
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().map_or(false, |ext| ext == "json"))
        .collect();
    paths.sort();

    if paths.is_empty() {
        bail!("no *.json bundles found under {}", input.display());
    }

    let mut bundle = DeclarationBundle::default();
    for path in paths {
        log::debug!("reading bundle {}", path.display());
        let part = DeclarationBundle::from_path(&path).with_context(|| format!("failed to read {}", path.display()))?;
        bundle.merge(part).with_context(|| format!("failed to merge {}", path.display()))?;
    }
    Ok(bundle)
}
