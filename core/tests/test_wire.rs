// Wire-format coverage: canonical round trips, within-record identity
// sharing, and strict rejection of malformed input.

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use proptest::prelude::*;

    use logwire_core::constants::{tags, MAX_VALUE_DEPTH, STREAM_HEADER_LEN, WIRE_MAGIC};
    use logwire_core::event::{Level, LogEvent, Value};
    use logwire_core::wire::{ObjectDecoder, ObjectEncoder, WireError};

    fn sample_event() -> LogEvent {
        LogEvent::new(1_700_000_000_123, Level::Info, "app::db", "connection pool ready")
            .with_attr("pool_size", 32i64)
            .with_attr("latency_ms", 1.5f64)
            .with_attr("primary", true)
            .with_attr("replica", Value::Null)
            .with_attr("region", "eu-west-1")
            .with_attr("token", Value::Bytes(Arc::from(&b"\x00\x01\x02\xFF"[..])))
            .with_attr(
                "shards",
                Value::List(Arc::new(vec![Value::Int(1), Value::Int(2), Value::Int(3)])),
            )
    }

    fn encode_stream(events: &[LogEvent]) -> Vec<u8> {
        let mut encoder = ObjectEncoder::new(Vec::new()).unwrap();
        for event in events {
            encoder.encode_event(event).unwrap();
            encoder.reset().unwrap();
        }
        encoder.finish().unwrap()
    }

    #[test]
    fn encode_decode_roundtrip() {
        let event = sample_event();
        let wire = encode_stream(std::slice::from_ref(&event));

        let mut decoder = ObjectDecoder::new(Cursor::new(&wire)).unwrap();
        let decoded = decoder.decode_event().unwrap().unwrap();
        assert_eq!(decoded, event);
        assert!(decoder.decode_event().unwrap().is_none());
    }

    #[test]
    fn within_record_sharing_is_preserved() {
        let shared: Arc<str> = Arc::from("hot-path");
        let event = LogEvent::new(7, Level::Debug, "app", "dup")
            .with_attr("first", Value::Str(shared.clone()))
            .with_attr("second", Value::Str(shared));

        let wire = encode_stream(std::slice::from_ref(&event));
        let mut decoder = ObjectDecoder::new(Cursor::new(&wire)).unwrap();
        let decoded = decoder.decode_event().unwrap().unwrap();

        let (Value::Str(a), Value::Str(b)) = (&decoded.attrs[0].1, &decoded.attrs[1].1) else {
            panic!("expected string attributes");
        };
        assert_eq!(a, b);
        assert!(Arc::ptr_eq(a, b), "shared allocation must decode to one allocation");
    }

    #[test]
    fn shared_allocation_encodes_once() {
        let shared: Arc<str> = Arc::from("repeated-payload");
        let sharing = LogEvent::new(7, Level::Debug, "app", "dup")
            .with_attr("first", Value::Str(shared.clone()))
            .with_attr("second", Value::Str(shared));
        // Same content, distinct allocations: no back-reference possible.
        let duplicated = LogEvent::new(7, Level::Debug, "app", "dup")
            .with_attr("first", "repeated-payload")
            .with_attr("second", "repeated-payload");

        let shared_wire = encode_stream(std::slice::from_ref(&sharing));
        let duplicated_wire = encode_stream(std::slice::from_ref(&duplicated));
        assert!(shared_wire.len() < duplicated_wire.len());
    }

    #[test]
    fn truncated_input_is_rejected() {
        let mut encoder = ObjectEncoder::new(Vec::new()).unwrap();
        encoder.encode_event(&sample_event()).unwrap();
        let wire = encoder.finish().unwrap();

        let mut decoder = ObjectDecoder::new(Cursor::new(&wire[..wire.len() - 1])).unwrap();
        assert!(matches!(decoder.decode_event(), Err(WireError::Truncated)));
    }

    #[test]
    fn invalid_magic_is_rejected() {
        let mut wire = encode_stream(&[sample_event()]);
        wire[..4].copy_from_slice(b"NOPE");

        let err = ObjectDecoder::new(Cursor::new(&wire)).unwrap_err();
        assert!(matches!(err, WireError::InvalidMagic { have, .. } if have == *b"NOPE"));
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let mut wire = Vec::new();
        wire.extend_from_slice(&WIRE_MAGIC);
        wire.extend_from_slice(&99u16.to_le_bytes());

        let err = ObjectDecoder::new(Cursor::new(&wire)).unwrap_err();
        assert!(matches!(err, WireError::UnsupportedVersion { have: 99 }));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let mut wire = encode_stream(&[]);
        wire.push(0xFF);

        let mut decoder = ObjectDecoder::new(Cursor::new(&wire)).unwrap();
        assert!(matches!(decoder.decode_event(), Err(WireError::UnknownTag { raw: 0xFF })));
    }

    #[test]
    fn unknown_level_is_rejected() {
        let mut wire = encode_stream(&[sample_event()]);
        // header (6) + EVENT tag (1) + timestamp (8) puts the level byte at 15.
        wire[STREAM_HEADER_LEN + 9] = 0x6F;

        let mut decoder = ObjectDecoder::new(Cursor::new(&wire)).unwrap();
        assert!(matches!(decoder.decode_event(), Err(WireError::UnknownLevel { raw: 0x6F })));
    }

    #[test]
    fn out_of_range_backref_is_rejected() {
        let mut wire = encode_stream(&[]);
        wire.push(tags::EVENT);
        wire.extend_from_slice(&1u64.to_le_bytes());
        wire.push(Level::Info as u8);
        // Target encoded as a back-reference into an empty identity table.
        wire.push(tags::REF);
        wire.extend_from_slice(&5u32.to_le_bytes());

        let mut decoder = ObjectDecoder::new(Cursor::new(&wire)).unwrap();
        assert!(matches!(
            decoder.decode_event(),
            Err(WireError::UnknownBackRef { index: 5, len: 0 })
        ));
    }

    #[test]
    fn backref_of_wrong_kind_is_rejected() {
        let list = Value::List(Arc::new(vec![Value::Int(1)]));
        let event = LogEvent::new(1, Level::Info, "t", "m").with_attr("k", list);
        let mut wire = encode_stream(std::slice::from_ref(&event));
        // Splice a second event whose target back-references the list slot.
        wire.pop(); // drop the RESET so the table survives
        wire.push(tags::EVENT);
        wire.extend_from_slice(&2u64.to_le_bytes());
        wire.push(Level::Info as u8);
        wire.push(tags::REF);
        wire.extend_from_slice(&3u32.to_le_bytes()); // slot 3 = the list

        let mut decoder = ObjectDecoder::new(Cursor::new(&wire)).unwrap();
        decoder.decode_event().unwrap().unwrap();
        assert!(matches!(
            decoder.decode_event(),
            Err(WireError::BackRefKind { index: 3, expected: "string" })
        ));
    }

    #[test]
    fn oversized_length_is_rejected_before_allocation() {
        let mut wire = encode_stream(&[]);
        wire.push(tags::EVENT);
        wire.extend_from_slice(&1u64.to_le_bytes());
        wire.push(Level::Info as u8);
        wire.push(tags::STR);
        wire.extend_from_slice(&u32::MAX.to_le_bytes());

        let mut decoder = ObjectDecoder::new(Cursor::new(&wire)).unwrap();
        assert!(matches!(decoder.decode_event(), Err(WireError::ValueTooLarge { .. })));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut wire = encode_stream(&[]);
        wire.push(tags::EVENT);
        wire.extend_from_slice(&1u64.to_le_bytes());
        wire.push(Level::Info as u8);
        wire.push(tags::STR);
        wire.extend_from_slice(&1u32.to_le_bytes());
        wire.push(0xFF);

        let mut decoder = ObjectDecoder::new(Cursor::new(&wire)).unwrap();
        assert!(matches!(decoder.decode_event(), Err(WireError::InvalidUtf8)));
    }

    #[test]
    fn nesting_beyond_depth_bound_fails_encode() {
        let mut value = Value::Int(0);
        for _ in 0..(MAX_VALUE_DEPTH + 2) {
            value = Value::List(Arc::new(vec![value]));
        }
        let event = LogEvent::new(1, Level::Warn, "t", "deep").with_attr("graph", value);

        let mut encoder = ObjectEncoder::headerless(Vec::new());
        assert!(matches!(
            encoder.encode_event(&event),
            Err(WireError::DepthExceeded { .. })
        ));
    }

    // --- property: the round-trip law over generated events -----------------

    fn value_strategy() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            prop::num::f64::NORMAL.prop_map(Value::Float),
            "[a-z0-9 ]{0,16}".prop_map(|s| Value::Str(Arc::from(s.as_str()))),
            prop::collection::vec(any::<u8>(), 0..24)
                .prop_map(|b| Value::Bytes(Arc::from(b.as_slice()))),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop::collection::vec(inner, 0..4).prop_map(|v| Value::List(Arc::new(v)))
        })
    }

    fn level_strategy() -> impl Strategy<Value = Level> {
        prop_oneof![
            Just(Level::Trace),
            Just(Level::Debug),
            Just(Level::Info),
            Just(Level::Warn),
            Just(Level::Error),
            Just(Level::Fatal),
        ]
    }

    fn event_strategy() -> impl Strategy<Value = LogEvent> {
        (
            any::<u64>(),
            level_strategy(),
            "[a-z:]{1,20}",
            "[ -~]{0,40}",
            prop::collection::vec(("[a-z_]{1,12}", value_strategy()), 0..6),
        )
            .prop_map(|(timestamp_ms, level, target, message, attrs)| LogEvent {
                timestamp_ms,
                level,
                target: Arc::from(target.as_str()),
                message: Arc::from(message.as_str()),
                attrs: attrs
                    .into_iter()
                    .map(|(k, v)| (Arc::from(k.as_str()), v))
                    .collect(),
            })
    }

    proptest! {
        #[test]
        fn roundtrip_law(events in prop::collection::vec(event_strategy(), 1..4)) {
            let wire = encode_stream(&events);
            let mut decoder = ObjectDecoder::new(Cursor::new(&wire)).unwrap();
            for event in &events {
                prop_assert_eq!(&decoder.decode_event().unwrap().unwrap(), event);
            }
            prop_assert!(decoder.decode_event().unwrap().is_none());
        }
    }
}
