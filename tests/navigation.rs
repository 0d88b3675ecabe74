use proptest::prelude::*;
use vpack::prelude::{Layout, VPackError, VPackSlice};
use vpack_strategy::*;

/// Walks `slice` and `value` together, asserting they agree everywhere.
fn check(slice: &VPackSlice, value: &Value) {
    let size = slice.byte_size().unwrap();
    assert_eq!(slice.byte_size().unwrap(), size);
    assert!(slice.start() + size <= slice.buffer().len());

    match value {
        Value::Null => assert!(slice.is_null()),
        Value::Bool(b) => assert_eq!(slice.get_as_bool().unwrap(), *b),
        Value::Int(i) => assert_eq!(slice.get_as_i64().unwrap(), *i),
        Value::UInt(u) => assert_eq!(slice.get_as_u64().unwrap(), *u),
        Value::Double(d) => assert_eq!(slice.get_as_f64().unwrap(), *d),
        Value::Date(ms) => assert_eq!(slice.get_utc_date_millis().unwrap(), *ms),
        Value::Str(s) => assert_eq!(slice.get_as_str().unwrap(), s),
        Value::Binary(b) => assert_eq!(&slice.get_as_binary().unwrap()[..], &b[..]),
        Value::Custom(p) => assert_eq!(&slice.custom_payload().unwrap()[..], &p[..]),
        Value::Array(items) => check_array(slice, items),
        Value::Object(members) => check_object(slice, members),
    }
}

fn check_array(slice: &VPackSlice, items: &[Value]) {
    assert!(slice.is_array());
    assert_eq!(slice.length().unwrap(), items.len());

    let end = slice.start() + slice.byte_size().unwrap();
    let mut it = slice.array_iter().unwrap();
    let mut last = slice.start();
    for (i, item) in items.iter().enumerate() {
        assert!(it.has_next());
        let member = it.next_slice().unwrap();
        let random = slice.get_nth(i).unwrap();

        assert!(member.start() > last);
        assert!(member.start() + member.byte_size().unwrap() <= end);
        assert_eq!(member.start(), random.start());
        assert_eq!(member.byte_size().unwrap(), random.byte_size().unwrap());
        last = member.start();

        check(&member, item);
    }
    assert!(!it.has_next());
    assert_eq!(it.next_slice().unwrap_err(), VPackError::ExhaustedIterator);
    assert_eq!(
        slice.get_nth(items.len()).unwrap_err(),
        VPackError::IndexOutOfRange {
            index: items.len(),
            size: items.len()
        }
    );
}

fn check_object(slice: &VPackSlice, members: &[(String, Value)]) {
    assert!(slice.is_object());
    assert_eq!(slice.length().unwrap(), members.len());

    let mut it = slice.object_iter().unwrap();
    for (key, value) in members {
        let (k, v) = it.next_entry().unwrap();
        assert_eq!(k.get_as_str().unwrap(), key);
        check(&v, value);

        let found = slice.get(key).unwrap().unwrap();
        assert_eq!(found.start(), v.start());
    }
    assert!(!it.has_next());

    // every index position names some member, and its value follows its key
    for i in 0..members.len() {
        let key = slice.key_at(i).unwrap();
        let value = slice.value_at(i).unwrap();
        assert_eq!(value.start(), key.start() + key.byte_size().unwrap());
        assert!(members.iter().any(|(k, _)| k == key.get_as_str().unwrap()));
    }

    assert!(!slice.has_key("not a generated key").unwrap());
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 500, ..ProptestConfig::default() })]

    #[test]
    fn reads_back_what_was_written(value in arb_value(), builder in arb_builder()) {
        let encoded = builder.encode(&value);
        let slice = VPackSlice::from_vec(encoded.clone());
        prop_assert_eq!(slice.byte_size().unwrap(), encoded.len());
        check(&slice, &value);
    }

    #[test]
    fn layouts_agree(value in arb_value()) {
        let compact = VPackSlice::from_vec(Builder::new().encode(&value));
        let indexed = VPackSlice::from_vec(
            Builder::new()
                .array_layout(ArrayLayout::Indexed)
                .object_layout(ObjectLayout::Sorted)
                .min_width(8)
                .encode(&value),
        );
        prop_assert_eq!(compact.value_type(), indexed.value_type());
        if compact.is_array() || compact.is_object() {
            prop_assert_eq!(compact.length().unwrap(), indexed.length().unwrap());
        }
        check(&indexed, &value);
    }

    #[test]
    fn narrowing_never_wraps(i in any::<i64>()) {
        let slice = VPackSlice::from_vec(Builder::new().encode(&Value::Int(i)));
        match slice.get_as_i8() {
            Ok(n) => prop_assert_eq!(i64::from(n), i),
            Err(e) => {
                prop_assert!(i < i64::from(i8::min_value()) || i > i64::from(i8::max_value()));
                prop_assert_eq!(e, VPackError::NumericOverflow { target: "i8" });
            }
        }
        match slice.get_as_i32() {
            Ok(n) => prop_assert_eq!(i64::from(n), i),
            Err(_) => prop_assert!(i < i64::from(i32::min_value()) || i > i64::from(i32::max_value())),
        }
    }

    #[test]
    fn truncated_buffers_fail_cleanly(value in arb_value(), cut in any::<prop::sample::Index>()) {
        let encoded = Builder::new().encode(&value);
        let truncated = encoded[..cut.index(encoded.len())].to_vec();
        let slice = VPackSlice::from_vec(truncated);
        // a prefix is never mistaken for the whole value
        prop_assert!(slice.byte_size().is_err());
    }
}

#[test]
fn empty_compounds() {
    for value in &[Value::Array(vec![]), Value::Object(vec![])] {
        let slice = VPackSlice::from_vec(Builder::new().encode(value));
        assert_eq!(slice.length().unwrap(), 0);
        assert_eq!(
            slice.get_nth(0).unwrap_err(),
            VPackError::IndexOutOfRange { index: 0, size: 0 }
        );
    }
    let array = VPackSlice::from_vec(Builder::new().encode(&Value::Array(vec![])));
    assert!(!array.array_iter().unwrap().has_next());
}

#[test]
fn wide_offsets() {
    let items: Vec<Value> = (0..400).map(|i| Value::Str(format!("member {}", i))).collect();
    let value = Value::Array(items);
    for width in &[1, 2, 4, 8] {
        let encoded = Builder::new()
            .array_layout(ArrayLayout::Indexed)
            .min_width(*width)
            .encode(&value);
        let slice = VPackSlice::from_vec(encoded);
        let layout = slice.layout().unwrap();
        // 400 members do not fit single byte offsets
        assert_eq!(
            layout,
            Layout::Indexed {
                width: (*width).max(2),
                sorted: false
            }
        );
        assert_eq!(
            slice.get_nth(399).unwrap().get_as_str().unwrap(),
            "member 399"
        );
        check(&slice, &value);
    }
}

#[test]
fn concurrent_readers() {
    let value = Value::Array((0..100).map(Value::Int).collect());
    let slice = VPackSlice::from_vec(Builder::new().encode(&value));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let slice = slice.clone();
            std::thread::spawn(move || {
                slice
                    .array_iter()
                    .unwrap()
                    .map(|m| m.unwrap().get_as_i64().unwrap())
                    .sum::<i64>()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), (0..100).sum::<i64>());
    }
}
