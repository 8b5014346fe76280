use std::io;

use crate::config::AppConfig;
use crate::server;
use crate::server::api::{self, ApiContext};
use crate::table::{validate_table, write_rows_csv, RowFilter, WinRatioTable};

const USAGE: &str =
    "usage: quantum-calc [--table <path>] <serve|calc <query>|rows [filters] [--csv]|validate [path]>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Calc,
    Rows,
    Validate,
}

/// Arguments left once the program name and `--table <path>` are taken out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub table: Option<String>,
    pub csv: bool,
    pub positional: Vec<String>,
}

pub fn split_args(args: &[String]) -> Result<Invocation, String> {
    let mut invocation = Invocation::default();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--table" => match iter.next() {
                Some(path) => invocation.table = Some(path.clone()),
                None => return Err("--table needs a path".to_string()),
            },
            "--csv" => invocation.csv = true,
            _ => invocation.positional.push(arg.clone()),
        }
    }
    Ok(invocation)
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    let invocation = split_args(args).ok()?;
    match invocation.positional.first().map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("calc") => Some(Command::Calc),
        Some("rows") => Some(Command::Rows),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    run_with_config(args, &AppConfig::from_env())
}

pub fn run_with_config(args: &[String], config: &AppConfig) -> i32 {
    let invocation = match split_args(args) {
        Ok(invocation) => invocation,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{USAGE}");
            return 2;
        }
    };
    let table_path = invocation
        .table
        .clone()
        .unwrap_or_else(|| config.table_path.clone());

    match parse_command(args) {
        Some(Command::Serve) => handle_serve(config, &table_path),
        Some(Command::Calc) => handle_calc(&invocation, config, &table_path),
        Some(Command::Rows) => handle_rows(&invocation, config, &table_path),
        Some(Command::Validate) => handle_validate(&invocation, &table_path),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn load_context(config: &AppConfig, table_path: &str) -> Option<ApiContext> {
    match WinRatioTable::load(table_path) {
        Ok(table) => Some(ApiContext {
            table,
            pathname: config.pathname.clone(),
        }),
        Err(err) => {
            eprintln!("failed to load table: {err}");
            None
        }
    }
}

fn handle_serve(config: &AppConfig, table_path: &str) -> i32 {
    let Some(ctx) = load_context(config, table_path) else {
        return 1;
    };
    match server::run_server(&config.bind_addr, &ctx) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_calc(invocation: &Invocation, config: &AppConfig, table_path: &str) -> i32 {
    let Some(query) = invocation.positional.get(1) else {
        eprintln!("usage: quantum-calc calc <query>");
        return 2;
    };
    let Some(ctx) = load_context(config, table_path) else {
        return 1;
    };
    match api::encounters_get_payload(&ctx, query) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("calc failed: {err}");
            1
        }
    }
}

fn handle_rows(invocation: &Invocation, config: &AppConfig, table_path: &str) -> i32 {
    let filter_query = invocation.positional.get(1).map(String::as_str).unwrap_or("");
    let Some(ctx) = load_context(config, table_path) else {
        return 1;
    };

    if !invocation.csv {
        return match api::rows_payload(&ctx, filter_query) {
            Ok(payload) => {
                println!("{payload}");
                0
            }
            Err(err) => {
                eprintln!("rows failed: {err}");
                1
            }
        };
    }

    let filter = match RowFilter::from_query(filter_query) {
        Ok(filter) => filter,
        Err(err) => {
            eprintln!("rows failed: {err}");
            return 1;
        }
    };
    match write_rows_csv(&ctx.table.filtered_rows(&filter), io::stdout().lock()) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("rows failed: {err}");
            1
        }
    }
}

fn handle_validate(invocation: &Invocation, table_path: &str) -> i32 {
    let path = invocation
        .positional
        .get(1)
        .map(String::as_str)
        .unwrap_or(table_path);

    let table = match WinRatioTable::load(path) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("validation failed: {err}");
            return 1;
        }
    };

    let report = validate_table(&table);
    for diagnostic in &report.diagnostics {
        eprintln!("- {diagnostic}");
    }
    if report.has_errors() {
        eprintln!(
            "validation failed: {} issue(s) in {} entries",
            report.diagnostics.len(),
            report.entries
        );
        1
    } else {
        println!(
            "validation passed: {path} ({} entries, {} warning(s))",
            report.entries,
            report.diagnostics.len()
        );
        0
    }
}
