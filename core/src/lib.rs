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

pub mod bridge;
pub mod config;
pub mod error;
pub mod invoke;
pub mod loader;
pub mod marshal;
pub mod samples;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod value;

pub use bridge::{call, CallState, WasmBridge};
pub use config::BridgeConfig;
pub use error::{BridgeError, BridgeResult};
pub use value::{CallRequest, ScalarValue, WasmScalar};
