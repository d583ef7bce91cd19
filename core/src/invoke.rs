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

use crate::error::{BridgeError, BridgeResult};
use crate::loader::ExecutionContext;
use crate::marshal::{from_val, to_val};
use crate::value::WasmScalar;
use wasmtime::{Extern, Func, Val};

fn extern_kind(export: &Extern) -> &'static str {
    match export {
        Extern::Func(_) => "function",
        Extern::Global(_) => "global",
        Extern::Table(_) => "table",
        Extern::Memory(_) => "memory",
        _ => "non-function export",
    }
}

/// Find the export `name` and make sure it is a function.
pub fn lookup_export(ctx: &mut ExecutionContext, name: &str) -> BridgeResult<Func> {
    match ctx.instance.get_export(&mut ctx.store, name) {
        Some(Extern::Func(func)) => Ok(func),
        Some(other) => Err(BridgeError::NotCallable {
            name: name.to_string(),
            kind: extern_kind(&other),
        }),
        None => Err(BridgeError::ExportNotFound(name.to_string())),
    }
}

/// Call `func` with `params` and return its single result.
///
/// Functions declaring anything other than one result are rejected before
/// they run. A parameter mismatch, or any trap raised while running,
/// comes back as `Trap` (or `FuelExhausted`/`Timeout` when the budget is
/// what stopped it).
pub fn invoke(
    ctx: &mut ExecutionContext,
    func: &Func,
    params: &[WasmScalar],
) -> BridgeResult<WasmScalar> {
    let result_count = func.ty(&ctx.store).results().len();
    if result_count != 1 {
        return Err(BridgeError::ResultArityError(result_count));
    }

    let params: Vec<Val> = params.iter().map(to_val).collect();
    let mut results = vec![Val::I64(0); result_count];

    let budget = ctx.budget;
    func.call(&mut ctx.store, &params, &mut results)
        .map_err(|e| budget.classify(e, BridgeError::Trap))?;

    if let Some(left) = ctx.remaining_fuel() {
        tracing::trace!(
            fuel_used = budget.fuel.unwrap_or_default().saturating_sub(left),
            "invocation returned"
        );
    }

    match results.first() {
        Some(val) => from_val(val),
        None => Err(BridgeError::ResultArityError(0)),
    }
}
