use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use dmmwire_core::{AnalysisOptions, ProtocolVariant, analyze_capture_file};

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let root = PathBuf::from("tests").join("golden");
    let entries =
        fs::read_dir(&root).map_err(|err| format!("failed to read {}: {}", root.display(), err))?;

    for entry in entries {
        let entry = entry.map_err(|err| format!("failed to read entry: {}", err))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let input = path.join("input.hex");
        if !input.exists() {
            continue;
        }
        let variant = variant_for(&path)?;
        let output = path.join("expected_report.json");
        regenerate_one(&input, &output, variant)?;
    }

    Ok(())
}

/// Each golden directory is named after the protocol variant it decodes.
fn variant_for(dir: &Path) -> Result<ProtocolVariant, String> {
    let name = dir
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| format!("invalid golden directory: {}", dir.display()))?;
    name.parse()
        .map_err(|err| format!("{}: {}", dir.display(), err))
}

fn regenerate_one(input: &Path, output: &Path, variant: ProtocolVariant) -> Result<(), String> {
    let options = AnalysisOptions::new(variant);
    let mut report = analyze_capture_file(input, &options)
        .map_err(|err| format!("analysis failed for {}: {}", input.display(), err))?;
    report.generated_at = dmmwire_core::DEFAULT_GENERATED_AT.to_string();
    report.input.path = input.display().to_string();
    let mut json = serde_json::to_string_pretty(&report)
        .map_err(|err| format!("JSON serialization failed: {}", err))?;
    json.push('\n');
    fs::write(output, json)
        .map_err(|err| format!("failed to write {}: {}", output.display(), err))?;
    Ok(())
}
