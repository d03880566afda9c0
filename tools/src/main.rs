//! staffing-runner: headless front end for the staffing estimator.
//!
//! Usage:
//!   staffing-runner --patients 40 --day 6 --hour 22 --event 1 --db model.db
//!   staffing-runner --db model.db --describe
//!   staffing-runner --db model.db --regenerate --seed 7
//!   staffing-runner --db model.db --ipc-mode

use anyhow::Result;
use chrono::Utc;
use staffing_core::{
    config::EstimatorConfig,
    error::StaffingError,
    query::{EventFlag, PredictionRequest, DEFAULT_DEPARTMENT},
    service::StaffingService,
    store::ModelStore,
};
use std::env;
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

const QUERY_FLAGS: [&str; 4] = ["--patients", "--day", "--hour", "--event"];

#[derive(serde::Serialize)]
struct TableSummary {
    model_id:      String,
    generation_id: String,
    seed:          u64,
    created_at:    String,
    age_seconds:   i64,
    row_count:     usize,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = has_flag(&args, "--ipc-mode");
    let db = string_arg(&args, "--db").unwrap_or(":memory:");

    let mut config = match string_arg(&args, "--config") {
        Some(path) => EstimatorConfig::load(path)?,
        None => EstimatorConfig::default(),
    };
    if let Some(seed) = parse_flag::<u64>(&args, "--seed")? {
        config = config.with_seed(seed);
    }

    let service = StaffingService::open(db, config)?;

    if has_flag(&args, "--regenerate") {
        let table = service.provider().regenerate()?;
        log::info!(
            "Regenerated '{}' with seed {} ({} rows)",
            table.model_id,
            table.seed,
            table.len()
        );
    }

    if has_flag(&args, "--describe") {
        return describe(&service, db);
    }

    if ipc_mode {
        return run_ipc_loop(&service);
    }
    if has_flag(&args, "--regenerate") && !QUERY_FLAGS.iter().any(|f| has_flag(&args, f)) {
        return Ok(());
    }

    let request = one_shot_request(&args)?;
    let prediction = service.predict(&request)?;
    println!("{}", serde_json::to_string(&prediction)?);
    Ok(())
}

/// Build the one-shot request. Every numeric flag is required.
fn one_shot_request(args: &[String]) -> Result<PredictionRequest> {
    Ok(PredictionRequest {
        patient_count: required_flag(args, "--patients")?,
        day_of_week:   required_flag(args, "--day")?,
        hour_of_day:   required_flag(args, "--hour")?,
        has_event:     EventFlag::Int(required_flag(args, "--event")?),
        department:    string_arg(args, "--department")
            .unwrap_or(DEFAULT_DEPARTMENT)
            .to_string(),
    })
}

/// One JSON request per stdin line, one JSON reply per stdout line.
/// Bad messages get an `{"error": ...}` reply; the loop keeps going.
fn run_ipc_loop(service: &StaffingService) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        let line = buffer.trim();
        if line.is_empty() {
            continue;
        }

        match service.handle_stream_message(line) {
            Ok(prediction) => writeln!(stdout, "{}", serde_json::to_string(&prediction)?)?,
            Err(e) => {
                log::warn!("Rejected stream message: {e}");
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn describe(service: &StaffingService, db: &str) -> Result<()> {
    let table = service.table()?;
    let summary = TableSummary {
        model_id:      table.model_id.clone(),
        generation_id: table.generation_id.clone(),
        seed:          table.seed,
        created_at:    table.created_at.to_rfc3339(),
        age_seconds:   Utc::now().signed_duration_since(table.created_at).num_seconds(),
        row_count:     table.len(),
    };

    println!("=== REFERENCE TABLE ===");
    println!("  db:            {db}");
    println!("  model_id:      {}", summary.model_id);
    println!("  generation_id: {}", summary.generation_id);
    println!("  seed:          {}", summary.seed);
    println!("  created_at:    {}", summary.created_at);
    println!("  age:           {}s", summary.age_seconds);
    println!("  rows:          {}", summary.row_count);

    if db != ":memory:" {
        // Re-read through a second connection to confirm the table is durable.
        let store = ModelStore::open(db)?;
        match store.table_info(&summary.model_id)? {
            Some(info) => println!("  persisted:     yes (format v{})", info.format_version),
            None => println!("  persisted:     no"),
        }
    }
    println!();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Value of `flag` if present. A flag with a missing or unparseable
/// value is a malformed query, never a silent default.
fn parse_flag<T>(args: &[String], flag: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    if !has_flag(args, flag) {
        return Ok(None);
    }
    let field = flag.trim_start_matches("--");
    let raw = string_arg(args, flag)
        .filter(|v| !v.starts_with("--"))
        .ok_or_else(|| StaffingError::malformed(field, "flag given without a value"))?;
    let value = raw
        .parse::<T>()
        .map_err(|e| StaffingError::malformed(field, format!("cannot parse '{raw}': {e}")))?;
    Ok(Some(value))
}

fn required_flag<T>(args: &[String], flag: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    parse_flag(args, flag)?
        .ok_or_else(|| StaffingError::malformed(flag.trim_start_matches("--"), "required flag missing").into())
}
