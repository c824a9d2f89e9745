use form_parser_rs::core::validation::validate_completeness;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let data_dir = Path::new("./data");
    if !data_dir.exists() {
        println!("No data/ directory found. Place extracted form JSON files there.");
        return Ok(());
    }

    for entry in std::fs::read_dir(data_dir)? {
        let entry = entry?;
        let path = entry.path();
        if let Some(ext) = path.extension() {
            if ext == "json" {
                println!("Validating {}", path.display());
                let raw = std::fs::read_to_string(&path)?;
                let form_data: serde_json::Value = serde_json::from_str(&raw)?;
                let report = validate_completeness(&form_data, None)?;
                println!(
                    "Score {:.2} ({}/{} fields filled)",
                    report.completeness_score,
                    report.total_fields - report.missing_count,
                    report.total_fields
                );
                for field in report.missing_fields.iter().take(5) {
                    println!("  missing: {}", field);
                }
            }
        }
    }

    Ok(())
}
