use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use colored::Colorize;
use lead_dedup::{find_duplicates, DedupStats, Deduplicator};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::*;
use crate::config;

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::Dedup(args) => cmd_dedup(args, &cli.format),
        Command::Verify(args) => cmd_verify(args, &cli.format),
        Command::Config(args) => cmd_config(args),
    }
}

#[derive(Serialize)]
struct DedupSummary<'a> {
    input: &'a Path,
    output: &'a Path,
    log: &'a Path,
    leads: usize,
    merges: usize,
    stats: DedupStats,
}

fn cmd_dedup(args: DedupArgs, format: &OutputFormat) -> anyhow::Result<ExitCode> {
    let config = args.matching.resolve()?;
    let deduplicator = Deduplicator::new(config)?;

    let leads = lead_io::read_leads(&args.input)?;
    info!(input = %args.input.display(), count = leads.len(), "loaded leads");

    let outcome = deduplicator.run(leads);
    let stats = outcome.stats;
    if stats.undated > 0 {
        warn!(count = stats.undated, "records with a missing or unparsable entry date");
    }

    lead_io::write_leads(&args.output, &outcome.leads)
        .context("writing deduplicated leads")?;
    lead_io::write_log(&args.log, &outcome.log).context("writing change log")?;
    info!(
        kept = outcome.leads.len(),
        merges = outcome.log.len(),
        discarded = stats.discarded,
        "deduplication completed"
    );

    match format {
        OutputFormat::Json => {
            let summary = DedupSummary {
                input: &args.input,
                output: &args.output,
                log: &args.log,
                leads: outcome.leads.len(),
                merges: outcome.log.len(),
                stats,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text => {
            println!("{} Deduplication completed. Files saved.", "✓".green().bold());
            println!(
                "  Leads: {} in, {} out",
                stats.scanned.to_string().bold(),
                outcome.leads.len().to_string().bold()
            );
            println!(
                "  Merged: {}  Fused: {}  Discarded: {}",
                stats.merged.to_string().yellow(),
                stats.fused.to_string().yellow(),
                stats.discarded.to_string().dimmed()
            );
            if stats.undated > 0 {
                println!("  Undated: {}", stats.undated.to_string().red());
            }
            println!("  Output: {}", args.output.display().to_string().cyan());
            println!("  Log: {}", args.log.display().to_string().cyan());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_verify(args: VerifyArgs, format: &OutputFormat) -> anyhow::Result<ExitCode> {
    let config = args.matching.resolve()?;
    let leads = lead_io::read_leads(&args.file)?;
    let duplicates = find_duplicates(&leads, &config);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&duplicates)?),
        OutputFormat::Text if duplicates.is_empty() => {
            println!(
                "{} {} leads, every id and email unique",
                "✓".green().bold(),
                leads.len().to_string().bold()
            );
        }
        OutputFormat::Text => {
            println!("{} {} duplicate keys", "✗".red().bold(), duplicates.len().to_string().bold());
            for dup in &duplicates {
                let positions: Vec<String> = dup.positions.iter().map(|p| p.to_string()).collect();
                println!("  {} {} at {}", dup.kind.to_string().yellow(), dup.key, positions.join(", "));
            }
        }
    }

    if duplicates.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<ExitCode> {
    let config = args.matching.resolve()?;
    print!("{}", config::to_toml(&config)?);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::{json, Value};
    use std::fs;

    fn run(args: &[&str]) -> anyhow::Result<ExitCode> {
        let mut argv = vec!["leads"];
        argv.extend_from_slice(args);
        run_command(Cli::try_parse_from(argv).unwrap())
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn dedup_writes_both_documents() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("leads.json");
        let output = dir.path().join("dedupedLeads.json");
        let log = dir.path().join("log.json");
        fs::write(
            &input,
            json!({"leads": [
                {"_id": "a1", "email": "a@x.com", "entryDate": "2014-05-07T17:30:20+00:00", "firstName": "Ann"},
                {"_id": "a1", "email": "a@x.com", "entryDate": "2014-05-07T17:32:20+00:00", "firstName": "Anna"},
                {"_id": "b1", "email": "b@x.com", "entryDate": "2014-05-07T17:31:20+00:00", "firstName": "Bo"}
            ]})
            .to_string(),
        )
        .unwrap();

        let code = run(&[
            "dedup",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-l",
            log.to_str().unwrap(),
            "--id-field",
            "_id",
        ])
        .unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        let deduped = read_json(&output);
        let leads = deduped["leads"].as_array().unwrap();
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0]["firstName"], json!("Anna"));
        assert_eq!(leads[1]["_id"], json!("b1"));

        let changes = read_json(&log);
        assert_eq!(changes["log"].as_array().unwrap().len(), 1);
        assert_eq!(changes["log"][0]["changes"]["firstName"]["from"], json!("Ann"));

        let verify = run(&["verify", output.to_str().unwrap(), "--id-field", "_id"]).unwrap();
        assert_eq!(verify, ExitCode::SUCCESS);
    }

    #[test]
    fn dedup_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("absent.json");
        let output = dir.path().join("out.json");
        let result = run(&["dedup", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
        assert!(result.is_err());
        assert!(!output.exists());
    }

    #[test]
    fn dedup_rejects_invalid_field_config() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("leads.json");
        fs::write(&input, r#"{"leads": []}"#).unwrap();
        let result = run(&["dedup", input.to_str().unwrap(), "--id-field", "email"]);
        assert!(result.is_err());
    }

    #[test]
    fn verify_reports_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("leads.json");
        fs::write(
            &file,
            json!({"leads": [
                {"id": 1, "email": "a@x.com"},
                {"id": 1, "email": "b@x.com"}
            ]})
            .to_string(),
        )
        .unwrap();

        let code = run(&["verify", file.to_str().unwrap()]).unwrap();
        assert_eq!(code, ExitCode::FAILURE);
        let code = run(&["--format", "json", "verify", file.to_str().unwrap()]).unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn config_prints_effective_settings() {
        let code = run(&["config", "--id-field", "_id"]).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }
}
