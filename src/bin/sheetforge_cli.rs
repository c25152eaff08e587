//! CLI tool for sheetforge - generates a populated workbook from a template
//!
//! Usage:
//!   sheetforge_cli <template.xlsx> <schema.json> <entries.json> -o out.xlsx [--images <dir>]

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use sheetforge::{generate, Entry, ParameterSpec};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 4 {
        eprintln!(
            "Usage: sheetforge_cli <template.xlsx> <schema.json> <entries.json> [-o output.xlsx] [--images <dir>]"
        );
        std::process::exit(1);
    }

    let template_path = &args[1];
    let schema_path = &args[2];
    let entries_path = &args[3];

    let mut output_path = PathBuf::from("output.xlsx");
    let mut image_root = PathBuf::from(".");
    let mut i = 4;
    while i < args.len() {
        match args[i].as_str() {
            "-o" if i + 1 < args.len() => {
                output_path = PathBuf::from(&args[i + 1]);
                i += 2;
            }
            "--images" if i + 1 < args.len() => {
                image_root = PathBuf::from(&args[i + 1]);
                i += 2;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
    }

    // Read template
    let template = match fs::read(template_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading {}: {}", template_path, e);
            std::process::exit(1);
        }
    };

    let schema: Vec<ParameterSpec> = read_json(schema_path);
    let entries: Vec<Entry> = read_json(entries_path);

    // Generate workbook
    let xlsx = match generate(&template, &schema, &entries, &image_root) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error generating workbook: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = fs::write(&output_path, &xlsx) {
        eprintln!("Error writing {}: {}", output_path.display(), e);
        std::process::exit(1);
    }
    eprintln!("Written: {}", output_path.display());
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> T {
    let text = match fs::read_to_string(Path::new(path)) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            std::process::exit(1);
        }
    };
    match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error parsing {}: {}", path, e);
            std::process::exit(1);
        }
    }
}
