//! Geoforge demo launcher
//!
//! Runs a configuration search from a set of loose objects and prints each
//! accepted configuration with its newly discovered theorems as JSON lines.

use clap::Parser;
use geoforge_core::{
    Configuration, GeneratorSettings, Generator, ObjectCounts, ObjectKind, PictureSettings,
    SymmetryFilter, Theorem,
};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "geoforge")]
#[command(about = "Discover geometric theorems by configuration search")]
struct Args {
    /// Loose objects, one letter per object: P (point), L (line), C (circle)
    #[arg(long, default_value = "PPP")]
    loose: String,

    /// Number of extension iterations
    #[arg(long, default_value_t = 2)]
    iterations: usize,

    /// Number of independent pictures per configuration
    #[arg(long, default_value_t = 5)]
    pictures: usize,

    /// Seed for reproducible searches
    #[arg(long)]
    seed: Option<u64>,

    /// Keep only branches that are or can still become symmetric
    #[arg(long)]
    symmetric_only: bool,

    /// Cap on constructed objects of each kind
    #[arg(long, default_value_t = 5)]
    max_objects: usize,
}

#[derive(Serialize)]
struct AcceptedLine<'a> {
    iteration: usize,
    configuration: &'a Configuration,
    new_theorems: Vec<&'a Theorem>,
}

fn parse_loose(letters: &str) -> Result<Vec<ObjectKind>, String> {
    letters
        .chars()
        .map(|c| match c.to_ascii_uppercase() {
            'P' => Ok(ObjectKind::Point),
            'L' => Ok(ObjectKind::Line),
            'C' => Ok(ObjectKind::Circle),
            other => Err(format!("unknown loose object kind '{}'", other)),
        })
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let loose = match parse_loose(&args.loose) {
        Ok(loose) => loose,
        Err(message) => {
            error!(%message, "invalid --loose specification");
            std::process::exit(2);
        }
    };

    let mut settings = GeneratorSettings::with_full_catalog(args.iterations);
    settings.max_objects = ObjectCounts::uniform(args.max_objects);
    settings.symmetry = if args.symmetric_only {
        SymmetryFilter::SymmetricOnly
    } else {
        SymmetryFilter::All
    };
    settings.pictures = PictureSettings {
        picture_count: args.pictures,
        ..PictureSettings::default()
    };
    settings.seed = args.seed;

    let generator = match Generator::new(Configuration::new(loose), settings) {
        Ok(generator) => generator,
        Err(error) => {
            error!(%error, "could not start the search");
            std::process::exit(1);
        }
    };

    info!(
        initial_theorems = generator.initial_theorems().len(),
        "search started"
    );

    let mut generator = generator;
    while let Some(item) = generator.next() {
        match item {
            Ok(generated) => {
                let line = AcceptedLine {
                    iteration: generated.iteration,
                    configuration: &generated.configuration,
                    new_theorems: generated.new_theorems.iter().collect(),
                };
                match serde_json::to_string(&line) {
                    Ok(json) => println!("{}", json),
                    Err(error) => error!(%error, "could not serialize an accepted configuration"),
                }
            }
            // Fatal per-candidate conditions are traced and the search goes on
            Err(error) => error!(%error, "candidate failed"),
        }
    }

    let stats = generator.stats();
    info!(
        candidates = stats.candidates,
        accepted = stats.accepted,
        duplicates = stats.duplicate_keys,
        inconstructible = stats.inconstructible,
        same_objects = stats.same_objects,
        pruned = stats.asymmetric_pruned,
        errors = stats.errors,
        "search finished"
    );
}
