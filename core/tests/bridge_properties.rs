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

use ark_wasm_udf::{call, BridgeConfig, BridgeError, ScalarValue, WasmBridge};
use std::thread;
use std::time::{Duration, Instant};

const ID_WAT: &str = r#"(module
    (func (export "id") (param i64) (result i64) local.get 0)
    (func (export "idf") (param f64) (result f64) local.get 0))"#;

const COUNTER_WAT: &str = r#"(module
    (global $n (mut i64) (i64.const 0))
    (func (export "bump") (param i64) (result i64)
        global.get $n
        local.get 0
        i64.add
        global.set $n
        global.get $n))"#;

const OOB_WAT: &str = r#"(module
    (memory 1)
    (func (export "oob") (param i64) (result i64)
        i32.const 70000
        i64.load))"#;

const SPIN_WAT: &str = r#"(module
    (func (export "spin") (param i64) (result i64)
        (loop $forever
            br $forever)
        i64.const 0))"#;

fn run(source: &str, export: &str, rest: Vec<ScalarValue>) -> Result<ScalarValue, BridgeError> {
    let mut args = vec![source.into(), export.into()];
    args.extend(rest);
    call(args)
}

#[test]
fn integers_round_trip_unchanged() {
    for v in [i64::MIN, i64::MIN + 1, -1_000_000_007, -1, 0, 1, 42, i64::MAX] {
        assert_eq!(
            run(ID_WAT, "id", vec![v.into()]),
            Ok(ScalarValue::Integer(v))
        );
    }
}

#[test]
fn float_identity() {
    assert_eq!(
        run(ID_WAT, "idf", vec![3.5f64.into()]),
        Ok(ScalarValue::Float(3.5))
    );
}

#[test]
fn binary_source_is_accepted() {
    let wasm = wat::parse_str(ID_WAT).expect("bad WAT");
    let result = call(vec![wasm.into(), "id".into(), 9i64.into()]);
    assert_eq!(result, Ok(ScalarValue::Integer(9)));
}

#[test]
fn zero_and_one_argument_calls_fail_with_arity() {
    assert_eq!(call(vec![]), Err(BridgeError::ArityError { given: 0 }));
    assert_eq!(
        call(vec![ID_WAT.into()]),
        Err(BridgeError::ArityError { given: 1 })
    );
}

#[test]
fn blob_arguments_are_rejected() {
    let err = run(ID_WAT, "id", vec![ScalarValue::Blob(vec![1, 2, 3])]).unwrap_err();
    assert_eq!(
        err,
        BridgeError::UnsupportedArgumentType {
            index: 2,
            kind: "blob"
        }
    );
}

#[test]
fn repeated_calls_do_not_share_state() {
    let first = run(COUNTER_WAT, "bump", vec![5i64.into()]);
    let second = run(COUNTER_WAT, "bump", vec![5i64.into()]);
    assert_eq!(first, Ok(ScalarValue::Integer(5)));
    assert_eq!(first, second);
}

#[test]
fn concurrent_calls_are_isolated() {
    let bridge = WasmBridge::default();
    let handles: Vec<_> = (0..8i64)
        .map(|i| {
            let bridge = bridge.clone();
            thread::spawn(move || {
                let (source, export) = if i % 2 == 0 {
                    (COUNTER_WAT, "bump")
                } else {
                    (ID_WAT, "id")
                };
                let mut results = Vec::new();
                for _ in 0..5 {
                    results.push(bridge.call(vec![source.into(), export.into(), i.into()]));
                }
                (i, results)
            })
        })
        .collect();

    for handle in handles {
        let (i, results) = handle.join().expect("worker panicked");
        for result in results {
            assert_eq!(result, Ok(ScalarValue::Integer(i)));
        }
    }
}

#[test]
fn missing_export_produces_no_result() {
    let err = run(ID_WAT, "double", vec![21i64.into()]).unwrap_err();
    assert_eq!(err, BridgeError::ExportNotFound("double".to_string()));
}

#[test]
fn out_of_bounds_access_traps_with_message() {
    let err = run(OOB_WAT, "oob", vec![0i64.into()]).unwrap_err();
    match err {
        BridgeError::Trap(msg) => assert!(!msg.is_empty()),
        other => panic!("expected Trap, got {:?}", other),
    }
}

#[test]
fn runaway_module_is_stopped_by_fuel() {
    let bridge = WasmBridge::new(BridgeConfig {
        fuel_limit: Some(50_000),
        ..BridgeConfig::default()
    });
    let err = bridge
        .call(vec![SPIN_WAT.into(), "spin".into(), 0i64.into()])
        .unwrap_err();
    assert_eq!(err, BridgeError::FuelExhausted(50_000));
}

#[test]
fn runaway_module_is_stopped_by_deadline() {
    let bridge = WasmBridge::new(BridgeConfig {
        fuel_limit: None,
        timeout_ms: Some(50),
        ..BridgeConfig::default()
    });
    let started = Instant::now();
    let err = bridge
        .call(vec![SPIN_WAT.into(), "spin".into(), 0i64.into()])
        .unwrap_err();
    assert_eq!(err, BridgeError::Timeout(50));
    assert!(started.elapsed() < Duration::from_secs(30));
}

#[test]
fn deadline_does_not_affect_fast_calls() {
    let bridge = WasmBridge::new(BridgeConfig {
        timeout_ms: Some(5_000),
        ..BridgeConfig::default()
    });
    let started = Instant::now();
    let result = bridge.call(vec![ID_WAT.into(), "id".into(), 3i64.into()]);
    assert_eq!(result, Ok(ScalarValue::Integer(3)));
    // Disarming the watchdog must not wait out the deadline.
    assert!(started.elapsed() < Duration::from_secs(5));
}
