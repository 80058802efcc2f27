//! Command-line interface for plant_scan
//!
//! Analyzes one plant photo against a JSON disease catalogue and prints the
//! diagnosis report as JSON. Set `RUST_LOG=plant_scan=debug` for stage logs.

use plant_scan::{
    AnalyzerConfig, DiagnosisReport, JitterSource, KnowledgeBase, NoJitter, PlantAnalyzer,
    RngJitter,
};
use std::{env, path::Path, process};
use tracing_subscriber::EnvFilter;

const DEFAULT_CATALOGUE: &str = "demos/catalogue.json";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let mut catalogue_path = DEFAULT_CATALOGUE.to_string();
    let mut config_path = None;
    let mut seed: Option<u64> = None;
    let mut deterministic = false;
    let mut image_path_arg = None;

    // Parse arguments
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--catalogue" | "-c" => {
                catalogue_path = next_value(&args, &mut i);
            }
            "--config" => {
                config_path = Some(next_value(&args, &mut i));
            }
            "--seed" => {
                let value = next_value(&args, &mut i);
                match value.parse() {
                    Ok(s) => seed = Some(s),
                    Err(_) => {
                        eprintln!("Error: --seed expects an unsigned integer, got '{}'", value);
                        process::exit(1);
                    }
                }
            }
            "--no-jitter" => {
                deterministic = true;
            }
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => {
                if image_path_arg.is_none() {
                    image_path_arg = Some(arg.to_string());
                } else {
                    eprintln!("Error: Multiple image paths provided");
                    process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    let image_path_str = match image_path_arg {
        Some(path) => path,
        None => {
            print_help(&args[0]);
            process::exit(1);
        }
    };

    let image_path = Path::new(&image_path_str);

    if !image_path.exists() {
        eprintln!("Error: File '{}' does not exist", image_path.display());
        process::exit(1);
    }

    let config = match config_path {
        Some(path) => AnalyzerConfig::from_json_file(Path::new(&path)).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        }),
        None => AnalyzerConfig::default(),
    };

    let analyzer = PlantAnalyzer::with_config(config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    let knowledge = KnowledgeBase::from_json_file(Path::new(&catalogue_path)).unwrap_or_else(|e| {
        eprintln!("Error loading catalogue '{}': {}", catalogue_path, e);
        process::exit(1);
    });

    let mut jitter: Box<dyn JitterSource> = match (deterministic, seed) {
        (true, _) => Box::new(NoJitter),
        (false, Some(seed)) => Box::new(RngJitter::seeded(seed)),
        (false, None) => Box::new(RngJitter::from_entropy()),
    };

    match analyzer.analyze_file(image_path, &knowledge, jitter.as_mut()) {
        Ok(report) => print_report(&report),
        Err(error) => {
            eprintln!("Analysis failed: {}", error);
            if error.is_recoverable() {
                eprintln!("Suggestion: {}", error.user_message());
            }
            process::exit(1);
        }
    }
}

fn next_value(args: &[String], i: &mut usize) -> String {
    if *i + 1 >= args.len() {
        eprintln!("Error: {} requires a value", args[*i]);
        process::exit(1);
    }
    *i += 1;
    args[*i].clone()
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS] <image_path>", program_name);
    eprintln!();
    eprintln!("Screen a plant photo for disease symptoms.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --catalogue, -c FILE  Disease and treatment catalogue (default: {})", DEFAULT_CATALOGUE);
    eprintln!("  --config FILE         Analyzer configuration JSON");
    eprintln!("  --seed N              Seed the score jitter for reproducible output");
    eprintln!("  --no-jitter           Disable score jitter entirely");
    eprintln!("  --help, -h            Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} leaf.jpg", program_name);
    eprintln!("  {} --seed 42 -c my_catalogue.json tomato.png", program_name);
}

fn print_report(report: &DiagnosisReport) {
    // Print JSON to stdout for programmatic use
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing report: {}", e);
            process::exit(1);
        }
    }

    // Print summary to stderr for human reading
    let primary = &report.primary_diagnosis;
    eprintln!();
    eprintln!("Diagnosis Summary:");
    eprintln!("  Disease: {} ({})", primary.name, primary.scientific_name);
    eprintln!("  Confidence: {:.1}%", report.confidence);
    eprintln!("  Urgency: {:?}", report.urgency);
    eprintln!(
        "  Plant part: {} (detected: {})",
        report.plant_parts.dominant_part,
        report
            .plant_parts
            .detected_parts
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    for alt in &report.alternative_diagnoses {
        eprintln!("  Alternative: {} ({:.1}%)", alt.name, alt.confidence);
    }
    if let Some(top) = report.treatments.first() {
        eprintln!("  Top treatment: {} ({})", top.name, top.dosage);
    }

    if report.expert_consultation {
        eprintln!("  Note: Have an agricultural expert confirm this diagnosis.");
    }
    for suggestion in &report.quality_suggestions {
        eprintln!("  Warning: {}", suggestion);
    }
}
