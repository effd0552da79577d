//! expense-ledger CLI
//!
//! Compute balances and settlement plans for a group expense file.
//!
//! # Usage
//!
//! ```bash
//! # Net balance of every participant
//! expense-ledger balances --input group.json
//!
//! # Who pays whom, as JSON
//! expense-ledger plan --input group.json --format json
//!
//! # Totals, shares and balances in one table
//! expense-ledger summary --input group.json
//!
//! # Generate a random group for testing
//! expense-ledger generate --participants 6 --expenses 40
//! ```
//!
//! Set `RUST_LOG=debug` to trace ledger and planner decisions.

use chrono::NaiveDate;
use expense_ledger::core::balance::BalanceMap;
use expense_ledger::core::expense::ExpenseRecord;
use expense_ledger::core::ledger::{Ledger, LedgerError};
use expense_ledger::core::rounding::{DEFAULT_SCALE, MAX_SCALE};
use expense_ledger::settlement::planner::{PlannerConfig, SettlementError, SettlementPlanner};
use expense_ledger::settlement::summary::LedgerSummary;
use expense_ledger::simulation::generator::{generate_random_ledger, GroupConfig};
use log::info;
use rust_decimal::Decimal;
use std::fs;
use std::process;
use thiserror::Error;

fn print_usage() {
    eprintln!(
        r#"expense-ledger — shared expense balances and settlement plans

USAGE:
    expense-ledger <COMMAND> [OPTIONS]

COMMANDS:
    balances    Net balance (paid minus fair share) of every participant
    plan        Transfers that settle every balance
    summary     Totals, fair shares and balances per participant
    generate    Generate a random group file (for testing)
    help        Show this message

OPTIONS (balances, plan, summary):
    --input <FILE>          Path to JSON group file
    --format <FORMAT>       Output format: text (default) or json
    --scale <N>             Fractional digits to round balances to, 0-28 (default: 2)
    --min-transfer <AMOUNT> Smallest transfer to record (default: one minor unit)

OPTIONS (generate):
    --participants <N>      Number of participants (default: 4)
    --expenses <N>          Number of expenses (default: 12)
    --min-amount <AMOUNT>   Smallest expense (default: 5)
    --max-amount <AMOUNT>   Largest expense (default: 500)
    --output <FILE>         Write to file instead of stdout

EXAMPLES:
    expense-ledger balances --input group.json
    expense-ledger plan --input group.json --format json
    expense-ledger plan --input group.json --scale 0
    expense-ledger generate --participants 6 --expenses 40 --output group.json"#
    );
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot write '{path}': {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid group file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid amount '{value}': {source}")]
    Amount {
        value: String,
        source: rust_decimal::Error,
    },
    #[error("invalid date '{value}': {source}")]
    Date {
        value: String,
        source: chrono::ParseError,
    },
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Settlement(#[from] SettlementError),
}

/// JSON schema for one input expense.
#[derive(serde::Deserialize, serde::Serialize)]
struct ExpenseInput {
    amount: String,
    payer: String,
    participants: Vec<String>,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<String>,
}

/// JSON schema for a group file. When `participants` is omitted the roster
/// is every name mentioned by an expense, in order of appearance.
#[derive(serde::Deserialize, serde::Serialize)]
struct GroupFile {
    #[serde(default)]
    participants: Vec<String>,
    expenses: Vec<ExpenseInput>,
}

#[derive(serde::Serialize)]
struct BalancesOutput<'a> {
    total_spent: String,
    balances: &'a BalanceMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

struct Options {
    input: Option<String>,
    format: Format,
    scale: u32,
    min_transfer: Option<Decimal>,
    participants: usize,
    expenses: usize,
    min_amount: Option<Decimal>,
    max_amount: Option<Decimal>,
    output: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            input: None,
            format: Format::Text,
            scale: DEFAULT_SCALE,
            min_transfer: None,
            participants: GroupConfig::default().participant_count,
            expenses: GroupConfig::default().expense_count,
            min_amount: None,
            max_amount: None,
            output: None,
        }
    }
}

fn parse_amount(value: &str) -> Result<Decimal, CliError> {
    value.trim().parse().map_err(|source| CliError::Amount {
        value: value.to_string(),
        source,
    })
}

fn parse_count<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, CliError> {
    value
        .parse()
        .map_err(|_| CliError::Usage(format!("{} requires a number, got '{}'", flag, value)))
}

fn parse_options(args: &[String]) -> Result<Options, CliError> {
    let mut options = Options::default();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| CliError::Usage(format!("{} requires a value", flag)))?;
        match flag.as_str() {
            "--input" => options.input = Some(value.clone()),
            "--output" => options.output = Some(value.clone()),
            "--format" => {
                options.format = match value.as_str() {
                    "text" => Format::Text,
                    "json" => Format::Json,
                    other => {
                        return Err(CliError::Usage(format!(
                            "--format requires 'text' or 'json', got '{}'",
                            other
                        )))
                    }
                }
            }
            "--scale" => {
                let scale: u32 = parse_count(flag, value)?;
                if scale > MAX_SCALE {
                    return Err(CliError::Usage(format!(
                        "--scale must be at most {}, got {}",
                        MAX_SCALE, scale
                    )));
                }
                options.scale = scale;
            }
            "--min-transfer" => options.min_transfer = Some(parse_amount(value)?),
            "--participants" => options.participants = parse_count(flag, value)?,
            "--expenses" => options.expenses = parse_count(flag, value)?,
            "--min-amount" => options.min_amount = Some(parse_amount(value)?),
            "--max-amount" => options.max_amount = Some(parse_amount(value)?),
            _ => return Err(CliError::Usage(format!("Unknown option: {}", flag))),
        }
    }
    Ok(options)
}

fn to_record(input: ExpenseInput) -> Result<ExpenseRecord, CliError> {
    let amount = parse_amount(&input.amount)?;
    let mut record = ExpenseRecord::new(amount, input.payer, input.participants)
        .with_description(input.description);
    if let Some(date) = input.date {
        let parsed = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|source| CliError::Date { value: date, source })?;
        record = record.with_date(parsed);
    }
    Ok(record)
}

fn load_ledger(options: &Options) -> Result<Ledger, CliError> {
    let path = options
        .input
        .as_deref()
        .ok_or_else(|| CliError::Usage("--input <FILE> is required".to_string()))?;
    let content = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })?;
    let file: GroupFile = serde_json::from_str(&content)?;

    let roster: Vec<String> = if file.participants.is_empty() {
        file.expenses
            .iter()
            .flat_map(|e| std::iter::once(&e.payer).chain(&e.participants))
            .cloned()
            .collect()
    } else {
        file.participants
    };
    let mut ledger = Ledger::new(roster).with_scale(options.scale);

    let records = file
        .expenses
        .into_iter()
        .map(to_record)
        .collect::<Result<Vec<_>, _>>()?;
    ledger.replace_all(records)?;
    info!(
        "loaded {} expense(s) for {} participant(s) from {}",
        ledger.len(),
        ledger.participants().len(),
        path
    );
    Ok(ledger)
}

fn planner(options: &Options) -> SettlementPlanner {
    let mut config = PlannerConfig::for_scale(options.scale);
    if let Some(min_transfer) = options.min_transfer {
        config.min_transfer = min_transfer;
    }
    SettlementPlanner::new(config)
}

fn cmd_balances(options: &Options) -> Result<(), CliError> {
    let ledger = load_ledger(options)?;
    let balances = ledger.balances();

    match options.format {
        Format::Json => {
            let output = BalancesOutput {
                total_spent: ledger.total_spent().to_string(),
                balances: &balances,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Format::Text => {
            println!("Total spent: {}\n", ledger.total_spent());
            print!("{}", balances);
        }
    }
    Ok(())
}

fn cmd_plan(options: &Options) -> Result<(), CliError> {
    let ledger = load_ledger(options)?;
    let plan = planner(options).plan(&ledger.balances())?;

    match options.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        Format::Text => print!("{}", plan),
    }
    Ok(())
}

fn cmd_summary(options: &Options) -> Result<(), CliError> {
    let ledger = load_ledger(options)?;
    let plan = planner(options).plan(&ledger.balances())?;
    let summary = LedgerSummary::from_ledger(&ledger).with_plan(&plan);

    match options.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        Format::Text => {
            println!("{}", summary);
            print!("{}", plan);
        }
    }
    Ok(())
}

fn cmd_generate(options: &Options) -> Result<(), CliError> {
    let defaults = GroupConfig::default();
    let config = GroupConfig {
        participant_count: options.participants,
        expense_count: options.expenses,
        min_amount: options.min_amount.unwrap_or(defaults.min_amount),
        max_amount: options.max_amount.unwrap_or(defaults.max_amount),
        ..defaults
    };
    let ledger = generate_random_ledger(&config);

    let output = GroupFile {
        participants: ledger.participants().iter().map(|p| p.to_string()).collect(),
        expenses: ledger
            .records()
            .iter()
            .map(|r| ExpenseInput {
                amount: r.amount().to_string(),
                payer: r.payer().to_string(),
                participants: r.participants().iter().map(|p| p.to_string()).collect(),
                description: r.description().to_string(),
                date: r.date().map(|d| d.format("%Y-%m-%d").to_string()),
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    if let Some(path) = &options.output {
        fs::write(path, &json).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;
        eprintln!(
            "Generated {} expenses across {} participants → {}",
            ledger.len(),
            ledger.participants().len(),
            path
        );
    } else {
        println!("{}", json);
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let result = match command {
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        "balances" | "plan" | "summary" | "generate" => {
            parse_options(&args[2..]).and_then(|options| match command {
                "balances" => cmd_balances(&options),
                "plan" => cmd_plan(&options),
                "summary" => cmd_summary(&options),
                _ => cmd_generate(&options),
            })
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
