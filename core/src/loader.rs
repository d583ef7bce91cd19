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

//! Module loading: WAT/binary source -> compiled module -> live instance.
//!
//! Every call gets its own `Engine`, `Store` and `Instance`. Nothing here
//! is shared between calls, so globals and linear memory never leak from
//! one invocation into the next.

use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use sha2::{Digest, Sha256};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use wasmtime::{Config, Engine, Instance, Module, Store, Trap};

// =============================================================================
// Execution Budget
// =============================================================================

/// The per-call execution limits, copied out of the config.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Budget {
    pub fuel: Option<u64>,
    pub timeout_ms: Option<u64>,
}

impl Budget {
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            fuel: config.fuel_limit,
            timeout_ms: config.timeout_ms,
        }
    }

    /// Map a runtime error onto the bridge taxonomy.
    ///
    /// Budget traps become `FuelExhausted`/`Timeout`; any other trap or
    /// runtime error goes through `fallback`.
    pub fn classify(&self, err: wasmtime::Error, fallback: fn(String) -> BridgeError) -> BridgeError {
        match err.downcast_ref::<Trap>() {
            Some(Trap::OutOfFuel) => BridgeError::FuelExhausted(self.fuel.unwrap_or_default()),
            Some(Trap::Interrupt) => BridgeError::Timeout(self.timeout_ms.unwrap_or_default()),
            Some(trap) => fallback(trap.to_string()),
            None => fallback(format!("{:#}", err)),
        }
    }
}

// =============================================================================
// Watchdog
// =============================================================================

/// Bumps the engine epoch once the deadline passes, interrupting any wasm
/// still running in a store whose epoch deadline is 1.
///
/// Dropping the watchdog disarms it and joins the timer thread.
struct Watchdog {
    disarm: Option<mpsc::Sender<()>>,
    timer: Option<JoinHandle<()>>,
}

impl Watchdog {
    fn arm(engine: &Engine, deadline: Duration) -> Self {
        let (disarm, disarmed) = mpsc::channel::<()>();
        let engine = engine.clone();
        let timer = thread::spawn(move || {
            if let Err(RecvTimeoutError::Timeout) = disarmed.recv_timeout(deadline) {
                tracing::trace!(deadline_ms = deadline.as_millis() as u64, "deadline reached");
                engine.increment_epoch();
            }
        });
        Self {
            disarm: Some(disarm),
            timer: Some(timer),
        }
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        // Closing the channel wakes the timer thread.
        self.disarm.take();
        if let Some(timer) = self.timer.take() {
            let _ = timer.join();
        }
    }
}

// =============================================================================
// Execution Context
// =============================================================================

/// One compiled module, its instance and the store that owns it.
///
/// Lives for exactly one call.
pub struct ExecutionContext {
    pub(crate) module: Module,
    pub(crate) store: Store<()>,
    pub(crate) instance: Instance,
    pub(crate) budget: Budget,
    // Declared last so it is dropped after the store stops being used.
    _watchdog: Option<Watchdog>,
}

impl ExecutionContext {
    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    /// Fuel left in the store, if metering is on.
    pub fn remaining_fuel(&self) -> Option<u64> {
        self.budget.fuel.and_then(|_| self.store.get_fuel().ok())
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Short, log-friendly identifier for a module source.
pub fn module_fingerprint(source: &[u8]) -> String {
    let digest = Sha256::digest(source);
    hex::encode(&digest[..6])
}

/// Build a fresh engine with metering matching `config`.
pub fn build_engine(config: &BridgeConfig) -> BridgeResult<Engine> {
    let mut engine_config = Config::new();
    engine_config.consume_fuel(config.fuel_limit.is_some());
    engine_config.epoch_interruption(config.timeout_ms.is_some());
    Engine::new(&engine_config).map_err(|e| BridgeError::EngineError(format!("{:#}", e)))
}

/// Turn WAT text into binary wasm. Binary input passes through untouched.
pub fn assemble(source: &[u8]) -> BridgeResult<Vec<u8>> {
    wat::parse_bytes(source)
        .map(|bytes| bytes.into_owned())
        .map_err(|e| BridgeError::CompileError(e.to_string()))
}

/// Assemble and compile `source` against `engine`.
pub fn compile(engine: &Engine, source: &[u8]) -> BridgeResult<Module> {
    let wasm = assemble(source)?;
    Module::from_binary(engine, &wasm).map_err(|e| BridgeError::CompileError(format!("{:#}", e)))
}

/// Instantiate `module` with no imports in a new store. The returned
/// context takes ownership of the module.
///
/// The store is seeded with the fuel budget and epoch deadline before the
/// start function (if any) runs, so a runaway start routine is bounded too.
pub fn instantiate(
    engine: &Engine,
    module: Module,
    config: &BridgeConfig,
) -> BridgeResult<ExecutionContext> {
    let imports = module.imports().len();
    if imports > 0 {
        return Err(BridgeError::InstantiationError(format!(
            "module declares {} import(s) but no host functions are provided",
            imports
        )));
    }

    let budget = Budget::from_config(config);
    let mut store = Store::new(engine, ());
    if let Some(fuel) = budget.fuel {
        store
            .set_fuel(fuel)
            .map_err(|e| BridgeError::EngineError(format!("failed to set fuel: {:#}", e)))?;
    }
    let watchdog = config.timeout().map(|deadline| {
        store.set_epoch_deadline(1);
        Watchdog::arm(engine, deadline)
    });

    let instance = Instance::new(&mut store, &module, &[])
        .map_err(|e| budget.classify(e, BridgeError::InstantiationError))?;

    Ok(ExecutionContext {
        module,
        store,
        instance,
        budget,
        _watchdog: watchdog,
    })
}

/// Compile and instantiate `source` on a fresh engine.
pub fn load(source: &[u8], config: &BridgeConfig) -> BridgeResult<ExecutionContext> {
    let engine = build_engine(config)?;
    let module = compile(&engine, source)?;
    instantiate(&engine, module, config)
}

// =============================================================================
// Tests
// =============================================================================
