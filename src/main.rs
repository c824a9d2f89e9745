// src/main.rs
use anyhow::Result;
use log::info;

use form_parser_rs::services::config::Settings;
use form_parser_rs::utils::document_processor::FormProcessor;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <document.pdf|image>", args[0]);
        eprintln!("       {} --batch <input_dir> <output_dir>", args[0]);
        std::process::exit(2);
    }

    let settings = Settings::from_env()?;
    let processor = FormProcessor::new(settings);

    // 默认 CLI 模式：单文件处理；--batch 走目录批处理
    if args[1] == "--batch" {
        if args.len() < 4 {
            eprintln!("Usage: {} --batch <input_dir> <output_dir>", args[0]);
            std::process::exit(2);
        }
        let processed = processor.process_directory(&args[2], &args[3]).await?;
        println!("✅ Processed {} documents into {}", processed, args[3]);
    } else {
        let outcome = processor.process_document(&args[1]).await?;

        println!("🔍 Average OCR word confidence: {:.2}", outcome.average_confidence);
        println!("🌐 Detected language: {}", outcome.language);
        println!("📋 Extracted form data:");
        println!("{}", serde_json::to_string_pretty(&outcome.form_data)?);

        let report = &outcome.report;
        println!(
            "🧮 Completeness score: {:.0}% ({}/{})",
            report.completeness_score * 100.0,
            report.total_fields - report.missing_count,
            report.total_fields
        );
        if report.missing_fields.is_empty() {
            println!("🎉 All required fields are filled!");
        } else {
            println!("❗ Missing fields ({}):", report.missing_count);
            for field in &report.missing_fields {
                println!("  - {}", field);
            }
        }
    }

    let snapshot = processor.metrics_snapshot();
    info!("Metrics: {}", serde_json::to_string(&snapshot)?);

    Ok(())
}
