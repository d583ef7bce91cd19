/*
 * Copyright (c) 2026 Mohamad Al-Zawahreh (dba Sovereign Systems).
 *
 * This file is part of the Ark Sovereign Compiler.
 *
 * LICENSE: DUAL-LICENSED (AGPLv3 or COMMERCIAL).
 *
 * 1. OPEN SOURCE: You may use this file under the terms of the GNU Affero
 * General Public License v3.0. If you link to this code, your ENTIRE
 * application must be open-sourced under AGPLv3.
 *
 * 2. COMMERCIAL: For proprietary use, you must obtain a Commercial License
 * from Sovereign Systems.
 *
 * PATENT NOTICE: Protected by US Patent App #63/935,467.
 * NO IMPLIED LICENSE to rights of Mohamad Al-Zawahreh or Sovereign Systems.
 */

use anyhow::Context;
use ark_wasm_udf::samples::{FIB_EXPORT, FIB_WAT};
use ark_wasm_udf::{sqlite, BridgeConfig, WasmBridge};
use clap::Parser;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Register run_wasm on a SQLite database and evaluate the Fibonacci
/// module over a small table.
#[derive(Parser)]
#[command(name = "run_wasm_demo")]
struct Cli {
    /// Database file. Uses an in-memory database if omitted.
    #[arg(long)]
    db: Option<PathBuf>,
    /// Number of rows to insert into wasm_test.
    #[arg(long, default_value_t = 5)]
    rows: i64,
    /// JSON bridge config (function_name, fuel_limit, timeout_ms).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<BridgeConfig> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(BridgeConfig::from_json(&json)?)
        }
        None => Ok(BridgeConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    let function_name = config.function_name.clone();

    let conn = match &cli.db {
        Some(path) => Connection::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?,
        None => Connection::open_in_memory()?,
    };

    conn.execute(
        "create table if not exists wasm_test(id int primary key)",
        [],
    )?;
    for id in 1..=cli.rows {
        conn.execute("insert or replace into wasm_test(id) values (?1)", [id])?;
    }

    sqlite::register(&conn, WasmBridge::new(config))?;

    let sql = format!(
        "select id, {}(?1, ?2, id) from wasm_test order by id",
        function_name
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query((FIB_WAT, FIB_EXPORT))?;

    println!("Results:");
    while let Some(row) = rows.next()? {
        let id: i64 = row.get(0)?;
        let value: i64 = row.get(1)?;
        println!("\tfib({}) = {}", id, value);
    }
    Ok(())
}
