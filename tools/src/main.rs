//! pyme-desk: headless session runner for the PyME credit desk.
//!
//! Usage:
//!   pyme-desk --db applicants.db --data-dir ./data
//!   pyme-desk --db applicants.db --ipc-mode
//!
//! In IPC mode each stdin line is one JSON request and each reply is one
//! JSON line on stdout. A failed request answers `{"error": ...}` and the
//! loop keeps going.

use anyhow::Result;
use pyme_core::{
    applicant::NewApplicant,
    config::DeskConfig,
    desk::CreditDesk,
    risk::RandomRiskEstimator,
    store::ApplicantStore,
    types::RecordId,
};
use serde_json::{json, Value};
use std::env;
use std::io::{self, BufRead, Write};

type Desk = CreditDesk<RandomRiskEstimator>;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Register { applicant: NewApplicant },
    Get { id: RecordId },
    Analyze { id: RecordId },
    List,
    Portfolio,
    DeleteAll,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or("applicants.db");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");

    let mut config = DeskConfig::load(data_dir)?;
    config.risk.seed = parse_arg(&args, "--seed", config.risk.seed);

    if !ipc_mode {
        println!("PyME credit desk");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!();
    }

    // One connection per session; the desk only borrows it per request.
    let store = ApplicantStore::open(db)?;
    store.migrate()?;

    let estimator = RandomRiskEstimator::from_config(&config.risk);
    let mut desk = CreditDesk::new(config, estimator);

    if ipc_mode {
        run_ipc_loop(&mut desk, &store)?;
    } else {
        print_summary(&desk, &store)?;
    }

    Ok(())
}

fn run_ipc_loop(desk: &mut Desk, store: &ApplicantStore) -> Result<()> {
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
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                writeln!(stdout, "{}", json!({ "error": e.to_string() }))?;
                stdout.flush()?;
                continue;
            }
        };

        if matches!(cmd, IpcCommand::Quit) {
            break;
        }

        let reply = match handle_command(desk, store, cmd) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("request failed: {e}");
                json!({ "error": e.to_string() })
            }
        };
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(desk: &mut Desk, store: &ApplicantStore, cmd: IpcCommand) -> Result<Value> {
    let reply = match cmd {
        IpcCommand::Register { applicant } => {
            let id = desk.register(store, &applicant)?;
            json!({ "id": id })
        }
        IpcCommand::Get { id } => serde_json::to_value(desk.lookup(store, id)?)?,
        IpcCommand::Analyze { id } => serde_json::to_value(desk.analyze(store, id)?)?,
        IpcCommand::List => serde_json::to_value(store.get_all()?)?,
        IpcCommand::Portfolio => serde_json::to_value(desk.portfolio(store)?)?,
        IpcCommand::DeleteAll => json!({ "deleted": desk.reset(store)? }),
        IpcCommand::Quit => Value::Null,
    };
    Ok(reply)
}

fn print_summary(desk: &Desk, store: &ApplicantStore) -> Result<()> {
    println!("=== PORTFOLIO SUMMARY ===");
    println!("  schema version: {}", store.schema_version()?);
    let Some(p) = desk.portfolio(store)? else {
        println!("  (No applicants registered yet)");
        return Ok(());
    };
    println!("  applicants:          {}", p.record_count);
    println!("  avg current ratio:   {:.2}", p.avg_current_ratio);
    println!("  avg equity ratio:    {:.2}", p.avg_equity_ratio);
    println!("  avg TIE:             {:.2}", p.avg_times_interest_earned);
    println!("  avg op. margin:      {:.1}%", p.avg_operating_margin_pct);
    match p.avg_safety_margin_pct {
        Some(m) => println!(
            "  avg safety margin:   {m:.1}% ({} of {} applicants)",
            p.breakeven_sample, p.record_count
        ),
        None => println!("  avg safety margin:   n/a"),
    }
    if let Some(amount) = p.avg_loan_amount {
        println!("  avg loan amount:     {amount:.0}");
    }
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
