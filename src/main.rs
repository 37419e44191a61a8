mod store;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use crs_engine::config::AppConfig;
use crs_engine::error::AppError;
use crs_engine::ledger::{
    export_history_csv, CandidateId, CandidateRecord, Override, RepositoryError, ScoringService,
    ScoringServiceError,
};
use crs_engine::scoring::{Breakdown, CrsEngine, Profile};
use crs_engine::telemetry;
use tracing::{info, warn};

use crate::store::FileCandidateRepository;

#[derive(Parser, Debug)]
#[command(
    name = "crs",
    about = "Score Express Entry profiles and keep an auditable score history",
    version
)]
struct Cli {
    /// Override the configured candidate store (CRS_STORE_PATH)
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a profile without storing anything
    Score(ScoreArgs),
    /// Score a candidate and append the result to their history
    Record(RecordArgs),
    /// Manage the manual score override of a stored candidate
    Override {
        #[command(subcommand)]
        command: OverrideCommand,
    },
    /// Show the effective score and override state of a candidate
    Show(CandidateArgs),
    /// Print the computation history of a candidate
    History(HistoryArgs),
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Profile JSON document
    #[arg(long)]
    profile: PathBuf,
    /// Print the breakdown as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct RecordArgs {
    #[arg(long)]
    candidate: String,
    /// Profile JSON document; the stored inputs are rescored when omitted
    #[arg(long)]
    profile: Option<PathBuf>,
    /// Computation timestamp (RFC 3339, defaults to now)
    #[arg(long, value_parser = parse_timestamp)]
    at: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
struct CandidateArgs {
    #[arg(long)]
    candidate: String,
}

#[derive(Args, Debug)]
struct HistoryArgs {
    #[arg(long)]
    candidate: String,
    /// Emit CSV instead of a table
    #[arg(long)]
    csv: bool,
}

#[derive(Subcommand, Debug)]
enum OverrideCommand {
    /// Set and activate an override
    Set(SetOverrideArgs),
    /// Deactivate the override, keeping it for audit
    Disable(CandidateArgs),
    /// Re-activate a disabled override
    Enable(CandidateArgs),
    /// Remove the override entirely
    Clear(CandidateArgs),
}

#[derive(Args, Debug)]
struct SetOverrideArgs {
    #[arg(long)]
    candidate: String,
    #[arg(long, allow_negative_numbers = true)]
    score: i64,
    #[arg(long)]
    reason: String,
    #[arg(long)]
    author: String,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        let code = if err.is_input_error() { 2 } else { 1 };
        std::process::exit(code);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(store) = cli.store {
        config.scoring.store_path = store;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let tables = config.scoring.load_tables()?;
    let engine = CrsEngine::new(tables)?;
    info!(
        environment = ?config.environment,
        tables = %engine.tables().version,
        "scoring tables loaded"
    );

    let repository = Arc::new(FileCandidateRepository::new(&config.scoring.store_path));
    let service = ScoringService::new(engine, repository);

    match cli.command {
        Command::Score(args) => run_score(service.engine(), &args),
        Command::Record(args) => run_record(&service, args),
        Command::Override { command } => run_override(&service, command),
        Command::Show(args) => {
            let record = service.get(&CandidateId(args.candidate.clone()))?;
            render_record(&args.candidate, &record);
            Ok(())
        }
        Command::History(args) => run_history(&service, args),
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}

fn read_profile(path: &Path) -> Result<Profile, AppError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn run_score(engine: &CrsEngine, args: &ScoreArgs) -> Result<(), AppError> {
    let profile = read_profile(&args.profile)?;
    let breakdown = engine.compute(&profile)?;
    info!(score = breakdown.grand_total, "profile scored");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        render_breakdown(&breakdown);
    }
    Ok(())
}

fn run_record(
    service: &ScoringService<FileCandidateRepository>,
    args: RecordArgs,
) -> Result<(), AppError> {
    let id = CandidateId(args.candidate);
    let at = args.at.unwrap_or_else(Utc::now);
    let profile = args.profile.as_deref().map(read_profile).transpose()?;

    let exists = match service.get(&id) {
        Ok(_) => true,
        Err(ScoringServiceError::Repository(RepositoryError::NotFound(_))) => false,
        Err(err) => return Err(err.into()),
    };

    let record = match (exists, profile) {
        (false, Some(profile)) => service.register(&id, profile, at)?,
        (_, profile) => service.recalculate(&id, profile, at)?,
    };

    info!(
        candidate = %id,
        score = record.current_score,
        entries = record.history.len(),
        "computation recorded"
    );
    if record.effective_score() != record.current_score {
        warn!(candidate = %id, "an active override supersedes the computed score");
    }

    render_breakdown(&record.breakdown);
    Ok(())
}

fn run_override(
    service: &ScoringService<FileCandidateRepository>,
    command: OverrideCommand,
) -> Result<(), AppError> {
    let now = Utc::now();
    let (candidate, record) = match command {
        OverrideCommand::Set(args) => {
            let id = CandidateId(args.candidate);
            let record =
                service.set_override(&id, args.score, &args.reason, &args.author, now)?;
            info!(candidate = %id, score = args.score, author = %args.author, "override set");
            (id, record)
        }
        OverrideCommand::Disable(args) => {
            let id = CandidateId(args.candidate);
            let record = service.disable_override(&id, now)?;
            info!(candidate = %id, "override disabled");
            (id, record)
        }
        OverrideCommand::Enable(args) => {
            let id = CandidateId(args.candidate);
            let record = service.enable_override(&id, now)?;
            info!(candidate = %id, "override enabled");
            (id, record)
        }
        OverrideCommand::Clear(args) => {
            let id = CandidateId(args.candidate);
            let record = service.clear_override(&id, now)?;
            info!(candidate = %id, "override cleared");
            (id, record)
        }
    };

    render_record(&candidate.0, &record);
    Ok(())
}

fn run_history(
    service: &ScoringService<FileCandidateRepository>,
    args: HistoryArgs,
) -> Result<(), AppError> {
    let history = service.history(&CandidateId(args.candidate))?;

    if args.csv {
        export_history_csv(&history, io::stdout().lock())?;
        return Ok(());
    }

    for entry in &history {
        let breakdown = &entry.breakdown;
        println!(
            "{} | {:>4} | core {} | spouse {} | transferability {} | additional {} | {}",
            entry.calculated_at.to_rfc3339(),
            entry.score,
            breakdown.core.total,
            breakdown.spouse.total,
            breakdown.skill_transferability.total,
            breakdown.additional.total,
            breakdown.table_version
        );
    }
    Ok(())
}

fn render_breakdown(breakdown: &Breakdown) {
    let core = &breakdown.core;
    let spouse = &breakdown.spouse;
    let transfer = &breakdown.skill_transferability;
    let additional = &breakdown.additional;

    println!("CRS breakdown ({})", breakdown.table_version);

    println!("\nCore / human capital: {}", core.total);
    println!("- age: {}", core.age);
    println!("- education: {}", core.education);
    println!("- first official language: {}", core.first_language);
    println!("- second official language: {}", core.second_language);
    println!("- Canadian work experience: {}", core.canadian_work);

    println!("\nSpouse factors: {}", spouse.total);
    println!("- education: {}", spouse.education);
    println!("- language: {}", spouse.language);
    println!("- Canadian work experience: {}", spouse.canadian_work);

    println!("\nSkill transferability: {}", transfer.total);
    println!("- education + language: {}", transfer.education_language);
    println!(
        "- education + Canadian work: {}",
        transfer.education_canadian_work
    );
    println!(
        "- foreign work + language: {}",
        transfer.foreign_work_language
    );
    println!(
        "- foreign work + Canadian work: {}",
        transfer.foreign_work_canadian_work
    );
    println!(
        "- certificate + language: {}",
        transfer.certificate_language
    );

    println!("\nAdditional points: {}", additional.total);
    println!("- provincial nomination: {}", additional.provincial_nomination);
    println!("- arranged employment: {}", additional.arranged_employment);
    println!("- Canadian study: {}", additional.canadian_study);
    println!("- sibling in Canada: {}", additional.sibling_in_canada);
    println!("- French language: {}", additional.french_language);

    if breakdown.was_clamped() {
        println!(
            "\nTotal: {} (capped from {})",
            breakdown.grand_total,
            breakdown.subtotal_sum()
        );
    } else {
        println!("\nTotal: {}", breakdown.grand_total);
    }
}

fn render_record(candidate: &str, record: &CandidateRecord) {
    println!("Candidate {candidate}");
    println!("Computed score: {}", record.current_score);
    println!("Effective score: {}", record.effective_score());
    println!("History entries: {}", record.history.len());
    println!("Last updated: {}", record.last_updated.to_rfc3339());

    match &record.score_override {
        None => println!("Override: none"),
        Some(value) => {
            let details = value.details();
            let state = match value {
                Override::Active(_) => "active",
                Override::Inactive(_) => "inactive",
            };
            println!(
                "Override: {} ({state}), set by {} at {}: {}",
                details.score,
                details.set_by,
                details.set_at.to_rfc3339(),
                details.reason
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_override_set_with_global_store() {
        let cli = Cli::try_parse_from([
            "crs",
            "override",
            "set",
            "--candidate",
            "cand-1",
            "--score",
            "480",
            "--reason",
            "appeal",
            "--author",
            "officer-9",
            "--store",
            "/tmp/crs.json",
        ])
        .expect("arguments parse");

        assert_eq!(cli.store, Some(PathBuf::from("/tmp/crs.json")));
        match cli.command {
            Command::Override {
                command: OverrideCommand::Set(args),
            } => {
                assert_eq!(args.candidate, "cand-1");
                assert_eq!(args.score, 480);
            }
            other => panic!("expected override set, got {other:?}"),
        }
    }

    #[test]
    fn negative_override_scores_reach_validation() {
        let cli = Cli::try_parse_from([
            "crs", "override", "set", "--candidate", "c", "--score", "-5", "--reason", "r",
            "--author", "a",
        ])
        .expect("arguments parse");
        assert!(matches!(
            cli.command,
            Command::Override {
                command: OverrideCommand::Set(SetOverrideArgs { score: -5, .. })
            }
        ));
    }

    #[test]
    fn timestamps_parse_as_utc() {
        let parsed = parse_timestamp("2025-05-01T09:30:00-04:00").expect("valid timestamp");
        assert_eq!(parsed.to_rfc3339(), "2025-05-01T13:30:00+00:00");
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn record_command_scores_and_appends() {
        let dir = tempfile::tempdir().expect("temp dir");
        let profile_path = dir.path().join("profile.json");
        std::fs::write(
            &profile_path,
            serde_json::json!({
                "age": 29,
                "maritalStatus": "single",
                "hasAccompanyingSpouse": false,
                "firstLanguage": {
                    "test": "ielts_general",
                    "scores": { "reading": 7.0, "listening": 8.0, "speaking": 7.0, "writing": 7.0 }
                },
                "education": { "level": "masters" },
                "work": { "canadianYears": 3, "foreignYears": 0 }
            })
            .to_string(),
        )
        .expect("profile written");

        let repository = Arc::new(FileCandidateRepository::new(dir.path().join("store.json")));
        let service = ScoringService::new(CrsEngine::standard(), repository);
        let record_args = |at: &str| RecordArgs {
            candidate: "cand-3".to_string(),
            profile: Some(profile_path.clone()),
            at: Some(parse_timestamp(at).expect("valid timestamp")),
        };

        run_record(&service, record_args("2025-05-01T09:00:00Z")).expect("first record");
        run_record(&service, record_args("2025-05-02T09:00:00Z")).expect("second record");

        let history = service
            .history(&CandidateId("cand-3".to_string()))
            .expect("history");
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|entry| entry.score == 483));
    }

    #[test]
    fn record_without_profile_requires_a_stored_candidate() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repository = Arc::new(FileCandidateRepository::new(dir.path().join("store.json")));
        let service = ScoringService::new(CrsEngine::standard(), repository);

        let err = run_record(
            &service,
            RecordArgs {
                candidate: "ghost".to_string(),
                profile: None,
                at: None,
            },
        )
        .expect_err("unknown candidate");
        assert!(matches!(err, AppError::Repository(RepositoryError::NotFound(_))));
    }
}
