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

//! The `run_wasm(source, export, args...)` pipeline.
//!
//! Loader -> lookup -> invocation -> result marshalling, once per call,
//! with nothing carried over between calls. Arguments are marshalled up
//! front: an unsupported argument is rejected whatever the module says.

use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::value::{CallRequest, ScalarValue};
use crate::{invoke, loader, marshal};
use std::fmt;

/// Where a call got to. Every call starts `Idle` and ends in exactly one
/// of `Succeeded`, `Trapped` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Compiled,
    Instantiated,
    Invoked,
    Succeeded,
    Trapped,
    Failed,
}

impl CallState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CallState::Succeeded | CallState::Trapped | CallState::Failed
        )
    }

    fn terminal_for(outcome: &BridgeResult<ScalarValue>) -> CallState {
        match outcome {
            Ok(_) => CallState::Succeeded,
            Err(BridgeError::Trap(_))
            | Err(BridgeError::FuelExhausted(_))
            | Err(BridgeError::Timeout(_)) => CallState::Trapped,
            Err(_) => CallState::Failed,
        }
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            CallState::Idle => "idle",
            CallState::Compiled => "compiled",
            CallState::Instantiated => "instantiated",
            CallState::Invoked => "invoked",
            CallState::Succeeded => "succeeded",
            CallState::Trapped => "trapped",
            CallState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Runs wasm exports on behalf of a SQL engine.
///
/// Holds configuration only; each call builds and tears down its own
/// engine, store and instance, so a bridge can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct WasmBridge {
    config: BridgeConfig,
}

impl WasmBridge {
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Entry point used by SQL hosts: the raw positional arguments.
    pub fn call(&self, args: Vec<ScalarValue>) -> BridgeResult<ScalarValue> {
        let request = CallRequest::from_args(args).map_err(|e| {
            tracing::debug!(kind = e.kind(), error = %e, "rejected run_wasm arguments");
            e
        })?;
        self.execute(&request)
    }

    /// Run one already-split request.
    pub fn execute(&self, request: &CallRequest) -> BridgeResult<ScalarValue> {
        let span = tracing::debug_span!(
            "run_wasm",
            module = %loader::module_fingerprint(&request.source),
            export = %request.export_name,
            args = request.arguments.len(),
        );
        let _enter = span.enter();

        let mut state = CallState::Idle;
        let outcome = self.run(request, &mut state);
        let terminal = CallState::terminal_for(&outcome);

        match &outcome {
            Ok(value) => tracing::trace!(state = %terminal, result = ?value, "call finished"),
            Err(e) => tracing::debug!(
                stage = %state,
                state = %terminal,
                kind = e.kind(),
                error = %e,
                "call failed"
            ),
        }
        outcome
    }

    fn run(&self, request: &CallRequest, state: &mut CallState) -> BridgeResult<ScalarValue> {
        let params = marshal::marshal_arguments(&request.arguments)?;

        let engine = loader::build_engine(&self.config)?;
        let module = loader::compile(&engine, &request.source)?;
        advance(state, CallState::Compiled);

        let mut ctx = loader::instantiate(&engine, module, &self.config)?;
        advance(state, CallState::Instantiated);

        let func = invoke::lookup_export(&mut ctx, &request.export_name)?;
        let result = invoke::invoke(&mut ctx, &func, &params)?;
        advance(state, CallState::Invoked);

        marshal::unmarshal_result(result)
    }
}

fn advance(state: &mut CallState, next: CallState) {
    tracing::trace!(from = %state, to = %next, "call state");
    *state = next;
}

/// `run_wasm` with the default configuration.
pub fn call(args: Vec<ScalarValue>) -> BridgeResult<ScalarValue> {
    WasmBridge::default().call(args)
}
