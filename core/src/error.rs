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

use thiserror::Error;

/// Every way a single `run_wasm` invocation can fail.
///
/// None of these are fatal to the host: the SQL engine reports them as a
/// statement error and carries on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    #[error("run_wasm needs at least 2 arguments (module source and export name), got {given}")]
    ArityError { given: usize },
    #[error("invalid {position} argument: {reason}")]
    InvalidArgument {
        position: &'static str,
        reason: String,
    },
    #[error("failed to compile module: {0}")]
    CompileError(String),
    #[error("failed to instantiate module: {0}")]
    InstantiationError(String),
    #[error("export '{0}' not found in module")]
    ExportNotFound(String),
    #[error("export '{name}' is a {kind}, not a function")]
    NotCallable { name: String, kind: &'static str },
    #[error("argument {index} has unsupported type {kind}")]
    UnsupportedArgumentType { index: usize, kind: &'static str },
    #[error("function result has unsupported type {0}")]
    UnsupportedResultType(&'static str),
    #[error("function must return exactly one value, it returns {0}")]
    ResultArityError(usize),
    #[error("execution trapped: {0}")]
    Trap(String),
    #[error("execution ran out of fuel (budget {0})")]
    FuelExhausted(u64),
    #[error("execution interrupted after {0} ms")]
    Timeout(u64),
    #[error("engine setup failed: {0}")]
    EngineError(String),
}

impl BridgeError {
    /// Stable identifier for the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::ArityError { .. } => "arity",
            BridgeError::InvalidArgument { .. } => "invalid_argument",
            BridgeError::CompileError(_) => "compile",
            BridgeError::InstantiationError(_) => "instantiation",
            BridgeError::ExportNotFound(_) => "export_not_found",
            BridgeError::NotCallable { .. } => "not_callable",
            BridgeError::UnsupportedArgumentType { .. } => "unsupported_argument_type",
            BridgeError::UnsupportedResultType(_) => "unsupported_result_type",
            BridgeError::ResultArityError(_) => "result_arity",
            BridgeError::Trap(_) => "trap",
            BridgeError::FuelExhausted(_) => "fuel_exhausted",
            BridgeError::Timeout(_) => "timeout",
            BridgeError::EngineError(_) => "engine",
        }
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;
