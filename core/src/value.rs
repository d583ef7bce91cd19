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

//! Value models on both sides of the bridge.
//!
//! `ScalarValue` is what the SQL engine hands us: dynamically typed leaf
//! values. `WasmScalar` is the numeric ABI a compiled module speaks.

use crate::error::{BridgeError, BridgeResult};
use std::fmt;

/// A dynamically typed value as produced by the calling query engine.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl ScalarValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ScalarValue::Null => "null",
            ScalarValue::Integer(_) => "integer",
            ScalarValue::Float(_) => "float",
            ScalarValue::Text(_) => "text",
            ScalarValue::Blob(_) => "blob",
        }
    }
}

impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self {
        ScalarValue::Integer(v)
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        ScalarValue::Float(v)
    }
}

impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        ScalarValue::Text(v.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(v: String) -> Self {
        ScalarValue::Text(v)
    }
}

impl From<Vec<u8>> for ScalarValue {
    fn from(v: Vec<u8>) -> Self {
        ScalarValue::Blob(v)
    }
}

/// A fixed-width numeric value in the module's ABI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WasmScalar {
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl WasmScalar {
    pub fn type_name(&self) -> &'static str {
        match self {
            WasmScalar::I32(_) => "i32",
            WasmScalar::I64(_) => "i64",
            WasmScalar::F32(_) => "f32",
            WasmScalar::F64(_) => "f64",
        }
    }
}

impl fmt::Display for WasmScalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WasmScalar::I32(v) => write!(f, "{}:i32", v),
            WasmScalar::I64(v) => write!(f, "{}:i64", v),
            WasmScalar::F32(v) => write!(f, "{}:f32", v),
            WasmScalar::F64(v) => write!(f, "{}:f64", v),
        }
    }
}

/// Position of the first call argument after the source and export name.
pub const FIRST_CALL_ARG: usize = 2;

/// One `run_wasm(source, export, args...)` invocation, split into its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRequest {
    /// Module in WAT text or binary `.wasm` form.
    pub source: Vec<u8>,
    pub export_name: String,
    /// Everything after the first two positional arguments.
    pub arguments: Vec<ScalarValue>,
}

impl CallRequest {
    pub fn new(
        source: impl Into<Vec<u8>>,
        export_name: impl Into<String>,
        arguments: Vec<ScalarValue>,
    ) -> Self {
        Self {
            source: source.into(),
            export_name: export_name.into(),
            arguments,
        }
    }

    /// Split the caller's positional arguments.
    ///
    /// Fails with `ArityError` when fewer than two are given; nothing is
    /// compiled in that case.
    pub fn from_args(args: Vec<ScalarValue>) -> BridgeResult<Self> {
        if args.len() < FIRST_CALL_ARG {
            return Err(BridgeError::ArityError { given: args.len() });
        }

        let mut args = args.into_iter();
        let source = match args.next() {
            Some(ScalarValue::Text(s)) => s.into_bytes(),
            Some(ScalarValue::Blob(b)) => b,
            Some(other) => {
                return Err(BridgeError::InvalidArgument {
                    position: "source",
                    reason: format!("expected text or blob, got {}", other.kind_name()),
                })
            }
            None => return Err(BridgeError::ArityError { given: 0 }),
        };
        let export_name = match args.next() {
            Some(ScalarValue::Text(s)) => s,
            Some(ScalarValue::Blob(b)) => {
                String::from_utf8(b).map_err(|e| BridgeError::InvalidArgument {
                    position: "export name",
                    reason: format!("blob is not valid UTF-8: {}", e),
                })?
            }
            Some(other) => {
                return Err(BridgeError::InvalidArgument {
                    position: "export name",
                    reason: format!("expected text, got {}", other.kind_name()),
                })
            }
            None => return Err(BridgeError::ArityError { given: 1 }),
        };

        Ok(Self {
            source,
            export_name,
            arguments: args.collect(),
        })
    }
}
