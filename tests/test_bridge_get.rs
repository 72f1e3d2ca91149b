//! Tests for the read path of the attribute bridge.


use std::sync::Arc;

use attr_bridge::bridge::{AttributeBridge, BridgeConfig, DispatchSiteCache, Outcome, PrimitiveConverter};
use attr_bridge::host::{ErrorKind, HostError, HostObject, HostValue};
use bridge_util::*;

#[test_log::test]
fn test_static_hit_never_touches_engine() {
    let engine = CountingEngine::new();
    let bridge = private_bridge(&engine);
    let obj = sensor_object("intake", 10);

    assert_eq!(bridge.get_attribute(&obj, "unit"), Ok(HostValue::str("kPa")));
    assert_eq!(engine.total(), 0);
    assert_eq!(bridge.sites().stats().read_negotiations, 0);
}

#[test_log::test]
fn test_dynamic_only_member_is_converted() {
    let engine = CountingEngine::new();
    let bridge = private_bridge(&engine);
    let obj = sensor_object("intake", 10);

    assert_eq!(bridge.get_attribute(&obj, "reading"), Ok(HostValue::int(10)));
    assert_eq!(bridge.get_attribute(&obj, "label"), Ok(HostValue::str("intake")));
    assert_eq!(bridge.get_attribute(&obj, "ratio"), Ok(HostValue::float(0.25)));
}

#[test]
fn test_second_read_reuses_negotiated_site() {
    let engine = CountingEngine::new();
    let bridge = private_bridge(&engine);
    let first = sensor_object("a", 1);
    let second = sensor_object("b", 2);

    assert_eq!(bridge.get_attribute(&first, "reading"), Ok(HostValue::int(1)));
    assert_eq!(bridge.get_attribute(&second, "reading"), Ok(HostValue::int(2)));
    assert_eq!(bridge.get_attribute(&first, "reading"), Ok(HostValue::int(1)));

    assert_eq!(engine.reads::<Sensor>("reading"), 1);
    let stats = bridge.sites().stats();
    assert_eq!(stats.read_negotiations, 1);
    assert_eq!(stats.read_hits, 2);
}

#[test]
fn test_sites_are_per_type() {
    let engine = CountingEngine::new();
    let bridge = private_bridge(&engine);

    // Relay has no `reading`, Sensor has no `closed`.
    assert!(bridge.get_attribute(&relay_object(true), "reading").is_err());
    assert_eq!(bridge.get_attribute(&sensor_object("s", 3), "reading"), Ok(HostValue::int(3)));
    assert_eq!(bridge.get_attribute(&relay_object(true), "closed"), Ok(HostValue::Boolean(true)));

    assert_eq!(engine.reads::<Relay>("reading"), 1);
    assert_eq!(engine.reads::<Sensor>("reading"), 1);
    assert_eq!(engine.reads::<Relay>("closed"), 1);
}

#[test_log::test]
fn test_missing_under_both_protocols_is_static_signal() {
    let engine = CountingEngine::new();
    let bridge = private_bridge(&engine);
    let obj = sensor_object("intake", 10);

    let outcome = bridge.lookup(&obj, "altitude");
    assert_eq!(
        outcome,
        Outcome::NotFound(HostError::missing_attribute("Sensor", "altitude"))
    );
    // The binder failure is cached like any other negotiated site.
    assert!(bridge.get_attribute(&obj, "altitude").is_err());
    assert_eq!(engine.reads::<Sensor>("altitude"), 1);
}

#[test_log::test]
fn test_raising_getter_is_attribute_error_with_message() {
    let engine = CountingEngine::new();
    let bridge = private_bridge(&engine);
    let obj = sensor_object("intake", 10);

    match bridge.lookup(&obj, "broken") {
        Outcome::Failed(e) => {
            assert_eq!(e.kind(), ErrorKind::AttributeError);
            assert_eq!(e.message(), "sensor offline");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_lookup_consults_static_getter_once_per_outcome() {
    let resolver = CountingResolver::new();
    let engine = CountingEngine::new();
    let bridge = counted_bridge(&resolver, &engine);
    let obj = sensor_object("intake", 10);

    assert_eq!(bridge.lookup(&obj, "reading"), Outcome::Value(HostValue::int(10)));
    assert_eq!(resolver.gets(), 1);

    assert!(bridge.lookup(&obj, "altitude").is_not_found());
    assert_eq!(resolver.gets(), 2);

    match bridge.lookup(&obj, "broken") {
        Outcome::Failed(e) => assert_eq!(e.message(), "sensor offline"),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(resolver.gets(), 3);
    assert_eq!(resolver.sets(), 0);
}

#[test]
fn test_unconvertible_result_is_attribute_error() {
    let engine = CountingEngine::new();
    let bridge = private_bridge(&engine);
    let obj = sensor_object("intake", 10);

    let err = bridge.get_attribute(&obj, "opaque").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AttributeError);
    assert_eq!(err.message(), "dynamic value has no host representation");
}

#[test]
fn test_other_static_error_propagates_untouched() {
    let engine = CountingEngine::new();
    let bridge = AttributeBridge::with_cache(
        Box::new(LockingResolver),
        Box::new(engine.clone()),
        Box::new(PrimitiveConverter),
        Arc::new(DispatchSiteCache::new()),
    );
    let obj = sensor_object("intake", 10);

    assert_eq!(
        bridge.lookup(&obj, "locked"),
        Outcome::Failed(HostError::type_error("attribute 'locked' is locked"))
    );
    assert_eq!(engine.total(), 0);
}

#[test]
fn test_plain_object_has_no_dynamic_path() {
    let engine = CountingEngine::new();
    let bridge = private_bridge(&engine);
    let obj = HostObject::new("Plain");

    assert!(bridge.lookup(&obj, "reading").is_not_found());
    assert_eq!(engine.total(), 0);
}

#[test]
fn test_empty_key_is_not_found() {
    let engine = CountingEngine::new();
    let bridge = private_bridge(&engine);

    assert!(bridge.lookup(&sensor_object("s", 1), "").is_not_found());
    assert_eq!(engine.total(), 0);
}

#[test]
fn test_dynamic_get_disabled() {
    let engine = CountingEngine::new();
    let bridge = AttributeBridge::with_config(
        Box::new(attr_bridge::host::DeclaredAttributes),
        Box::new(engine.clone()),
        Box::new(PrimitiveConverter),
        BridgeConfig {
            dynamic_get: false,
            shared_cache: false,
            ..BridgeConfig::default()
        },
    );
    let obj = sensor_object("intake", 10);

    assert!(bridge.lookup(&obj, "reading").is_not_found());
    assert_eq!(bridge.get_attribute(&obj, "unit"), Ok(HostValue::str("kPa")));
    assert_eq!(engine.total(), 0);
}

#[test]
fn test_has_attribute() {
    let engine = CountingEngine::new();
    let bridge = private_bridge(&engine);
    let obj = sensor_object("intake", 10);

    assert_eq!(bridge.has_attribute(&obj, "unit"), Ok(true));
    assert_eq!(bridge.has_attribute(&obj, "reading"), Ok(true));
    assert_eq!(bridge.has_attribute(&obj, "altitude"), Ok(false));
    assert_eq!(bridge.has_attribute(&obj, "broken"), Ok(false));
}

#[test]
fn test_has_attribute_propagates_other_kinds() {
    let bridge = AttributeBridge::with_cache(
        Box::new(LockingResolver),
        Box::new(CountingEngine::new()),
        Box::new(PrimitiveConverter),
        Arc::new(DispatchSiteCache::new()),
    );
    let err = bridge.has_attribute(&sensor_object("s", 1), "locked").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeError);
}
