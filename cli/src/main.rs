use std::io::IsTerminal;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use lite_orm_core::{Record, Value, record};
use lite_orm_sqlite::{RecordMapper, SQL_TARGET, StoreConfig, create_table_sql};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

record! {
    /// Demo record exercised by every subcommand.
    #[derive(Debug, Default, Clone, PartialEq, Serialize)]
    pub struct Employee {
        pub id: i64,
        pub first_name: Option<String>,
        pub last_name: Option<String>,
        pub hire_date: Option<DateTime<Utc>>,
    }
}

/// Output format for records.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    #[default]
    Table,
}

#[derive(Debug, Parser)]
#[command(name = "lite-orm")]
#[command(about = "Store and query Employee records in a SQLite file")]
#[command(version)]
struct Cli {
    /// SQLite database file (overrides the config file).
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// YAML store configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print every generated statement to stderr before it runs.
    #[arg(long, global = true)]
    echo_sql: bool,
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t)]
    format: CliOutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the Employee table definition and create the table.
    Schema,
    /// Add an employee and print the assigned id.
    Add(AddArgs),
    /// Show one employee.
    Get(IdArgs),
    /// List every employee in id order.
    List,
    /// Change fields of an existing employee.
    Update(UpdateArgs),
    /// Delete an employee.
    Delete(IdArgs),
    /// Run a SELECT and map its rows onto employees by column name.
    Query(QueryArgs),
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    /// RFC 3339 instant or YYYY-MM-DD (midnight UTC).
    #[arg(long, value_parser = parse_hire_date)]
    hire_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Args)]
struct IdArgs {
    id: i64,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    id: i64,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    /// RFC 3339 instant or YYYY-MM-DD (midnight UTC).
    #[arg(long, value_parser = parse_hire_date, conflicts_with = "clear_hire_date")]
    hire_date: Option<DateTime<Utc>>,
    /// Set the hire date to null.
    #[arg(long)]
    clear_hire_date: bool,
}

#[derive(Debug, Args)]
struct QueryArgs {
    /// SQL with numbered placeholders (?1, ?2, ...).
    sql: String,
    /// Value bound to the next placeholder. Integers bind as numbers.
    #[arg(long = "param")]
    params: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    let result = resolve_config(&cli).and_then(|config| {
        init_tracing(config.echo_sql)?;
        debug!(
            database = %config.database_path.display(),
            echo_sql = config.echo_sql,
            "Resolved store configuration"
        );
        let mapper = RecordMapper::new(config);
        match cli.command {
            Command::Schema => run_schema(&mapper),
            Command::Add(args) => run_add(&mapper, args, cli.format),
            Command::Get(args) => run_get(&mapper, args, cli.format),
            Command::List => run_list(&mapper, cli.format),
            Command::Update(args) => run_update(&mapper, args, cli.format),
            Command::Delete(args) => run_delete(&mapper, args),
            Command::Query(args) => run_query(&mapper, args, cli.format),
        }
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn resolve_config(cli: &Cli) -> Result<StoreConfig, String> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
        None => StoreConfig::default(),
    };
    if let Some(db) = &cli.db {
        config = config.with_database_path(db);
    }
    if cli.echo_sql {
        config = config.with_echo_sql(true);
    }
    Ok(config)
}

fn init_tracing(echo_sql: bool) -> Result<(), String> {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if echo_sql {
        let directive = format!("{SQL_TARGET}=info")
            .parse()
            .map_err(|e| format!("Invalid log directive: {e}"))?;
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {e}"))
}

fn parse_hire_date(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
        .map_err(|_| format!("invalid hire date '{raw}': expected RFC 3339 or YYYY-MM-DD"))
}

fn parse_param(raw: &str) -> Value {
    raw.parse::<i64>()
        .map(Value::Integer)
        .unwrap_or_else(|_| Value::Text(raw.to_string()))
}

fn run_schema(mapper: &RecordMapper) -> Result<(), String> {
    let sql = create_table_sql::<Employee>().map_err(|e| e.to_string())?;
    mapper
        .ensure_table::<Employee>()
        .map_err(|e| format!("Failed to create table: {e}"))?;
    println!("{sql}");
    Ok(())
}

fn run_add(mapper: &RecordMapper, args: AddArgs, format: CliOutputFormat) -> Result<(), String> {
    let employee = Employee {
        id: 0,
        first_name: args.first_name,
        last_name: args.last_name,
        hire_date: args.hire_date,
    };
    let id = mapper
        .create(&employee)
        .map_err(|e| format!("Failed to add employee: {e}"))?;
    match format {
        CliOutputFormat::Json => println!("{}", serde_json::json!({ "id": id })),
        CliOutputFormat::Table => println!("Added employee {id}"),
    }
    Ok(())
}

fn find(mapper: &RecordMapper, id: i64) -> Result<Employee, String> {
    mapper
        .find_by_id::<Employee>(id)
        .map_err(|e| format!("Failed to load employee {id}: {e}"))?
        .ok_or_else(|| format!("no employee with id {id}"))
}

fn run_get(mapper: &RecordMapper, args: IdArgs, format: CliOutputFormat) -> Result<(), String> {
    let employee = find(mapper, args.id)?;
    print_employees(std::slice::from_ref(&employee), format)
}

fn run_list(mapper: &RecordMapper, format: CliOutputFormat) -> Result<(), String> {
    let employees = mapper
        .find_all::<Employee>()
        .map_err(|e| format!("Failed to list employees: {e}"))?;
    print_employees(&employees, format)
}

fn run_update(
    mapper: &RecordMapper,
    args: UpdateArgs,
    format: CliOutputFormat,
) -> Result<(), String> {
    let mut employee = find(mapper, args.id)?;
    if let Some(first) = args.first_name {
        employee.first_name = Some(first);
    }
    if let Some(last) = args.last_name {
        employee.last_name = Some(last);
    }
    if let Some(hired) = args.hire_date {
        employee.hire_date = Some(hired);
    }
    if args.clear_hire_date {
        employee.hire_date = None;
    }
    mapper
        .update(&employee)
        .map_err(|e| format!("Failed to update employee {}: {e}", args.id))?;
    print_employees(std::slice::from_ref(&employee), format)
}

fn run_delete(mapper: &RecordMapper, args: IdArgs) -> Result<(), String> {
    let employee = find(mapper, args.id)?;
    mapper
        .delete(&employee)
        .map_err(|e| format!("Failed to delete employee {}: {e}", args.id))?;
    println!("Deleted employee {}", args.id);
    Ok(())
}

fn run_query(mapper: &RecordMapper, args: QueryArgs, format: CliOutputFormat) -> Result<(), String> {
    let params: Vec<Value> = args.params.iter().map(|p| parse_param(p)).collect();
    let employees = mapper
        .query_with::<Employee>(&args.sql, &params)
        .map_err(|e| format!("Query failed: {e}"))?;
    print_employees(&employees, format)
}

fn print_employees(employees: &[Employee], format: CliOutputFormat) -> Result<(), String> {
    match format {
        CliOutputFormat::Json => {
            let json = serde_json::to_string_pretty(employees)
                .map_err(|e| format!("Failed to serialize employees: {e}"))?;
            println!("{json}");
        }
        CliOutputFormat::Table => print!("{}", render_table(employees)),
    }
    Ok(())
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Text(s) => s.clone(),
        Value::DateTime(dt) => dt.to_rfc3339(),
        other => other.to_string(),
    }
}

fn render_table(employees: &[Employee]) -> String {
    let headers: Vec<String> = Employee::fields().iter().map(|f| f.column_name()).collect();
    let rows: Vec<Vec<String>> = employees
        .iter()
        .map(|e| e.field_map().iter().map(|(_, v)| render_cell(v)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(String::len).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let format_row = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = format_row(&headers);
    for row in &rows {
        out.push_str(&format_row(row));
    }
    out
}
