//! Command-line probe for the employee directory core.
//!
//! # Responsibility
//! - Resolve a store descriptor from flags, environment and `.env`.
//! - Run one CRUD operation and print its outcome envelope as JSON.

use clap::{Args, Parser, Subcommand};
use employee_app_core::{
    core_version, default_log_level, init_logging, open_store, parse_doj, Department,
    DepartmentService, EmployeeService, LogTarget, NewDepartment, NewEmployee, Outcome,
    SqliteDepartmentRepository, SqliteEmployeeRepository, StoreConfig, ValidationError,
};
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "employee-app", version, about = "Department and employee records")]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "EMPLOYEE_APP_DB")]
    db: PathBuf,

    /// Fail instead of creating the database file when it is missing.
    #[arg(long, env = "EMPLOYEE_APP_NO_CREATE")]
    no_create: bool,

    /// Per-statement time budget in milliseconds.
    #[arg(long, env = "EMPLOYEE_APP_STATEMENT_TIMEOUT_MS", default_value_t = 30_000)]
    statement_timeout_ms: u64,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, env = "EMPLOYEE_APP_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rotated log files; logs go to stderr otherwise.
    #[arg(long, env = "EMPLOYEE_APP_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    resource: Resource,
}

#[derive(Debug, Subcommand)]
enum Resource {
    /// Department records.
    #[command(subcommand)]
    Departments(DepartmentCommand),
    /// Employee records.
    #[command(subcommand)]
    Employees(EmployeeCommand),
}

#[derive(Debug, Subcommand)]
enum DepartmentCommand {
    List,
    Create {
        #[arg(long)]
        name: String,
    },
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum EmployeeCommand {
    List,
    Create(EmployeeFields),
    Update {
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        fields: EmployeeFields,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Args)]
struct EmployeeFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    department: String,
    #[arg(long)]
    mail: String,
    /// Date of joining; any time component is dropped.
    #[arg(long)]
    doj: String,
}

impl EmployeeFields {
    fn into_new_employee(self) -> Result<NewEmployee, ValidationError> {
        let doj = parse_doj(&self.doj)?;
        Ok(NewEmployee::new(self.name, self.department, self.mail, doj))
    }
}

fn main() -> ExitCode {
    // A missing .env file is the normal case.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(message) = setup_logging(&cli) {
        eprintln!("{message}");
        return ExitCode::from(2);
    }

    let config = StoreConfig::new(cli.db)
        .with_create_if_missing(!cli.no_create)
        .with_statement_timeout_ms(cli.statement_timeout_ms);
    let executor = match open_store(config) {
        Ok(executor) => executor,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };
    info!(
        "event=cli_start module=cli status=ok core_version={}",
        core_version()
    );

    match cli.resource {
        Resource::Departments(command) => {
            let service = DepartmentService::new(SqliteDepartmentRepository::new(&executor));
            match command {
                DepartmentCommand::List => emit(&service.list()),
                DepartmentCommand::Create { name } => {
                    emit(&service.create(&NewDepartment::new(name)))
                }
                DepartmentCommand::Update { id, name } => {
                    emit(&service.update(&Department::new(id, name)))
                }
                DepartmentCommand::Delete { id } => emit(&service.delete(id)),
            }
        }
        Resource::Employees(command) => {
            let service = EmployeeService::new(SqliteEmployeeRepository::new(&executor));
            match command {
                EmployeeCommand::List => emit(&service.list()),
                EmployeeCommand::Create(fields) => match fields.into_new_employee() {
                    Ok(employee) => emit(&service.create(&employee)),
                    Err(err) => invalid_input(err),
                },
                EmployeeCommand::Update { id, fields } => match fields.into_new_employee() {
                    Ok(employee) => emit(&service.update(&employee.into_employee(id))),
                    Err(err) => invalid_input(err),
                },
                EmployeeCommand::Delete { id } => emit(&service.delete(id)),
            }
        }
    }
}

fn setup_logging(cli: &Cli) -> Result<(), String> {
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let target = match cli.log_dir.as_deref() {
        Some(dir) => LogTarget::directory(dir).map_err(|err| err.to_string())?,
        None => LogTarget::Stderr,
    };
    init_logging(level, target).map_err(|err| err.to_string())
}

fn emit<T: Serialize>(outcome: &Outcome<T>) -> ExitCode {
    match serde_json::to_string_pretty(outcome) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("failed to encode outcome: {err}");
            return ExitCode::from(2);
        }
    }
    if outcome.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn invalid_input(err: ValidationError) -> ExitCode {
    let outcome: Outcome<()> = Outcome {
        ok: false,
        code: err.kind().into(),
        message: format!("Invalid input: {err}"),
        data: None,
    };
    emit(&outcome)
}
