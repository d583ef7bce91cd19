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

//! Registers the bridge as a variadic SQLite scalar function.

use crate::bridge::WasmBridge;
use crate::value::ScalarValue;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::{Value, ValueRef};
use rusqlite::{Connection, Error};

pub fn from_sql_value(value: ValueRef<'_>) -> ScalarValue {
    match value {
        ValueRef::Null => ScalarValue::Null,
        ValueRef::Integer(v) => ScalarValue::Integer(v),
        ValueRef::Real(v) => ScalarValue::Float(v),
        ValueRef::Text(bytes) => ScalarValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => ScalarValue::Blob(bytes.to_vec()),
    }
}

pub fn to_sql_value(value: ScalarValue) -> Value {
    match value {
        ScalarValue::Null => Value::Null,
        ScalarValue::Integer(v) => Value::Integer(v),
        ScalarValue::Float(v) => Value::Real(v),
        ScalarValue::Text(s) => Value::Text(s),
        ScalarValue::Blob(b) => Value::Blob(b),
    }
}

/// Register `bridge` on `conn` under `bridge.config().function_name`,
/// accepting any number of arguments.
///
/// Bridge failures become statement errors carrying the bridge's message.
pub fn register(conn: &Connection, bridge: WasmBridge) -> rusqlite::Result<()> {
    let name = bridge.config().function_name.clone();
    tracing::debug!(function = %name, "registering wasm bridge");
    conn.create_scalar_function(name.as_str(), -1, FunctionFlags::SQLITE_UTF8, move |ctx| {
        let args = (0..ctx.len())
            .map(|i| from_sql_value(ctx.get_raw(i)))
            .collect();
        bridge
            .call(args)
            .map(to_sql_value)
            .map_err(|e| Error::UserFunctionError(Box::new(e)))
    })
}
