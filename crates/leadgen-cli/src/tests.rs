use std::path::PathBuf;

use leadgen_core::{Record, ScoringWeights, Settings};
use leadgen_export::ExportError;
use leadgen_pipeline::{PipelineReport, SinkFailure};

use super::*;

#[test]
fn parses_run_with_query_only() {
    let cli = Cli::try_parse_from(["leadgen", "run", "--query", "learning and development"])
        .expect("expected valid cli args");

    match cli.command {
        Commands::Run {
            query,
            industry,
            min_employees,
        } => {
            assert_eq!(query, "learning and development");
            assert!(industry.is_none());
            assert_eq!(min_employees, 0);
        }
        other => panic!("expected run, got {other:?}"),
    }
}

#[test]
fn parses_run_with_all_flags() {
    let cli = Cli::try_parse_from([
        "leadgen",
        "run",
        "--query",
        "training",
        "--industry",
        "software",
        "--min-employees",
        "200",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Run {
            ref industry,
            min_employees: 200,
            ..
        } if industry.as_deref() == Some("software")
    ));
}

#[test]
fn accepts_underscore_min_employees_alias() {
    let cli = Cli::try_parse_from([
        "leadgen",
        "run",
        "--query",
        "training",
        "--min_employees",
        "50",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Run {
            min_employees: 50,
            ..
        }
    ));
}

#[test]
fn run_requires_query() {
    assert!(Cli::try_parse_from(["leadgen", "run"]).is_err());
}

#[test]
fn rejects_negative_min_employees() {
    let args = ["leadgen", "run", "--query", "x", "--min-employees", "-1"];
    assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn parses_check_targets() {
    let openai = Cli::try_parse_from(["leadgen", "check", "openai"]).expect("valid");
    assert!(matches!(
        openai.command,
        Commands::Check {
            target: CheckTarget::Openai
        }
    ));

    let sheets = Cli::try_parse_from(["leadgen", "check", "sheets"]).expect("valid");
    assert!(matches!(
        sheets.command,
        Commands::Check {
            target: CheckTarget::Sheets
        }
    ));
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["leadgen"]).is_err());
}

fn settings() -> Settings {
    Settings {
        places_api_key: "k".to_string(),
        sheets_spreadsheet_id: "s".to_string(),
        sheets_service_account_json: PathBuf::from("credentials/service_account.json"),
        sheets_worksheet: "Leads".to_string(),
        openai_api_key: None,
        notes_model: "gpt-4o-mini".to_string(),
        target_cities: vec!["Delhi NCR".to_string()],
        discovery_radius_m: 30_000,
        max_results_per_city: 120,
        weights: ScoringWeights::default(),
        log_level: "info".to_string(),
        output_path: PathBuf::from("output/leads.csv"),
        http_timeout_secs: 20,
        user_agent: "leadgen-test/0.1".to_string(),
    }
}

fn report(failures: Vec<SinkFailure>, destinations: Vec<String>) -> PipelineReport {
    PipelineReport {
        discovered: 3,
        enriched: 2,
        filtered: 2,
        destinations,
        sink_failures: failures,
        records: vec![Record::default(), Record::default()],
    }
}

#[test]
fn summary_for_clean_run() {
    let destinations = vec!["output/leads.csv".to_string(), "sheet".to_string()];
    let line = run::summary_line(&report(Vec::new(), destinations), &settings());
    assert_eq!(
        line,
        "Done. 2 leads exported to output/leads.csv and Google Sheets."
    );
}

#[test]
fn summary_names_failed_sinks() {
    let failure = SinkFailure {
        sink: "google_sheets".to_string(),
        error: ExportError::Credentials("missing key".to_string()),
    };
    let line = run::summary_line(
        &report(vec![failure], vec!["output/leads.csv".to_string()]),
        &settings(),
    );
    assert_eq!(
        line,
        "Done. 2 leads exported to output/leads.csv; failed: google_sheets."
    );
}
