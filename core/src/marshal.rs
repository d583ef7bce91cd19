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

//! Conversions between the SQL value model and the wasm numeric ABI.
//!
//! The mapping is fixed: the function's declared parameter types are not
//! consulted. A mismatch surfaces later, when the call itself fails.

use crate::error::{BridgeError, BridgeResult};
use crate::value::{ScalarValue, WasmScalar, FIRST_CALL_ARG};
use wasmtime::Val;

/// Convert the call argument at `index` (counting from 0 after the source
/// and export name).
///
/// | caller  | wasm      |
/// |---------|-----------|
/// | integer | `i64`     |
/// | float   | `f64`     |
/// | null    | `i32` 0   |
/// | text    | rejected  |
/// | blob    | rejected  |
pub fn marshal_argument(index: usize, value: &ScalarValue) -> BridgeResult<WasmScalar> {
    match value {
        ScalarValue::Integer(v) => Ok(WasmScalar::I64(*v)),
        ScalarValue::Float(v) => Ok(WasmScalar::F64(*v)),
        ScalarValue::Null => Ok(WasmScalar::I32(0)),
        // Passing these needs a copy into linear memory plus a pointer.
        ScalarValue::Text(_) | ScalarValue::Blob(_) => Err(BridgeError::UnsupportedArgumentType {
            index: index + FIRST_CALL_ARG,
            kind: value.kind_name(),
        }),
    }
}

/// Convert all call arguments, left to right. Fails on the first
/// unsupported one.
pub fn marshal_arguments(args: &[ScalarValue]) -> BridgeResult<Vec<WasmScalar>> {
    args.iter()
        .enumerate()
        .map(|(i, v)| marshal_argument(i, v))
        .collect()
}

/// Convert the function's single result back into a caller value.
pub fn unmarshal_result(result: WasmScalar) -> BridgeResult<ScalarValue> {
    match result {
        WasmScalar::I64(v) => Ok(ScalarValue::Integer(v)),
        WasmScalar::F64(v) => Ok(ScalarValue::Float(v)),
        WasmScalar::I32(_) | WasmScalar::F32(_) => {
            Err(BridgeError::UnsupportedResultType(result.type_name()))
        }
    }
}

pub(crate) fn to_val(value: &WasmScalar) -> Val {
    match value {
        WasmScalar::I32(v) => Val::I32(*v),
        WasmScalar::I64(v) => Val::I64(*v),
        WasmScalar::F32(v) => Val::F32(v.to_bits()),
        WasmScalar::F64(v) => Val::F64(v.to_bits()),
    }
}

pub(crate) fn from_val(value: &Val) -> BridgeResult<WasmScalar> {
    match value {
        Val::I32(v) => Ok(WasmScalar::I32(*v)),
        Val::I64(v) => Ok(WasmScalar::I64(*v)),
        Val::F32(bits) => Ok(WasmScalar::F32(f32::from_bits(*bits))),
        Val::F64(bits) => Ok(WasmScalar::F64(f64::from_bits(*bits))),
        Val::V128(_) => Err(BridgeError::UnsupportedResultType("v128")),
        _ => Err(BridgeError::UnsupportedResultType("reference")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_arguments() {
        let args = vec![
            ScalarValue::Integer(-7),
            ScalarValue::Float(2.25),
            ScalarValue::Null,
        ];
        let params = marshal_arguments(&args).unwrap();
        assert_eq!(
            params,
            vec![WasmScalar::I64(-7), WasmScalar::F64(2.25), WasmScalar::I32(0)]
        );
    }

    #[test]
    fn test_integer_extremes_survive() {
        for v in [i64::MIN, -1, 0, 1, i64::MAX] {
            let param = marshal_argument(0, &ScalarValue::Integer(v)).unwrap();
            assert_eq!(unmarshal_result(param).unwrap(), ScalarValue::Integer(v));
        }
    }

    #[test]
    fn test_text_argument_rejected() {
        let args = vec![ScalarValue::Integer(1), ScalarValue::Text("hi".into())];
        let err = marshal_arguments(&args).unwrap_err();
        assert_eq!(
            err,
            BridgeError::UnsupportedArgumentType {
                index: 3,
                kind: "text"
            }
        );
    }

    #[test]
    fn test_blob_argument_rejected() {
        let err = marshal_argument(0, &ScalarValue::Blob(vec![1, 2, 3])).unwrap_err();
        assert_eq!(
            err,
            BridgeError::UnsupportedArgumentType {
                index: 2,
                kind: "blob"
            }
        );
    }

    #[test]
    fn test_narrow_results_rejected() {
        assert_eq!(
            unmarshal_result(WasmScalar::I32(5)),
            Err(BridgeError::UnsupportedResultType("i32"))
        );
        assert_eq!(
            unmarshal_result(WasmScalar::F32(1.5)),
            Err(BridgeError::UnsupportedResultType("f32"))
        );
    }

    #[test]
    fn test_float_bits_preserved_through_val() {
        let v = WasmScalar::F64(-0.0);
        match from_val(&to_val(&v)).unwrap() {
            WasmScalar::F64(f) => assert!(f == 0.0 && f.is_sign_negative()),
            other => panic!("expected f64, got {:?}", other),
        }
    }
}
