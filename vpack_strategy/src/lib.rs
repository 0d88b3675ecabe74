//! Test support for `vpack`: a small VelocyPack encoder and `proptest` strategies.
//!
//! The [`Builder`] writes every compound layout the reader understands, so properties can
//! be checked against each of them.

use proptest::prelude::*;
use smallvec::SmallVec;

/// A value tree, the input of the [`Builder`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Double(f64),
    /// Milliseconds since the Unix epoch.
    Date(i64),
    Str(String),
    Binary(Vec<u8>),
    /// Payload of a custom value, at most 255 bytes.
    Custom(Vec<u8>),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
}

/// How arrays are written.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArrayLayout {
    Compact,
    Indexed,
    /// Falls back to `Indexed` when members differ in size.
    EqualSize,
}

/// How objects are written.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ObjectLayout {
    Compact,
    Sorted,
    Unsorted,
}

const WIDTHS: [usize; 4] = [1, 2, 4, 8];
const MAX_SHORT_STRING: usize = 126;

type VarInt = SmallVec<[u8; 10]>;

/// Encodes [`Value`]s.
#[derive(Copy, Clone, Debug)]
pub struct Builder {
    array: ArrayLayout,
    object: ObjectLayout,
    min_width: usize,
    padded: bool,
}

impl Default for Builder {
    fn default() -> Builder {
        Builder {
            array: ArrayLayout::Compact,
            object: ObjectLayout::Compact,
            min_width: 1,
            padded: false,
        }
    }
}

impl Builder {
    pub fn new() -> Builder { Builder::default() }

    pub fn array_layout(mut self, layout: ArrayLayout) -> Builder {
        self.array = layout;
        self
    }

    pub fn object_layout(mut self, layout: ObjectLayout) -> Builder {
        self.object = layout;
        self
    }

    /// Smallest offset width used by indexed layouts, one of 1, 2, 4 and 8.
    pub fn min_width(mut self, width: usize) -> Builder {
        self.min_width = width.min(8);
        self
    }

    /// Pads every indexed header to 9 bytes with zeros.
    pub fn padded(mut self, padded: bool) -> Builder {
        self.padded = padded;
        self
    }

    pub fn encode(&self, value: &Value) -> Vec<u8> {
        let mut out = Vec::new();
        self.put(&mut out, value);
        out
    }

    fn put(&self, out: &mut Vec<u8>, value: &Value) {
        match value {
            Value::Null => out.push(0x18),
            Value::Bool(b) => out.push(if *b { 0x1a } else { 0x19 }),
            Value::Int(i) => put_int(out, *i),
            Value::UInt(u) => put_uint(out, *u),
            Value::Double(d) => {
                out.push(0x1b);
                out.extend_from_slice(&d.to_bits().to_le_bytes());
            }
            Value::Date(ms) => {
                out.push(0x1c);
                out.extend_from_slice(&ms.to_le_bytes());
            }
            Value::Str(s) => put_string(out, s),
            Value::Binary(b) => {
                let width = uint_width(b.len() as u64);
                out.push(0xbf + width as u8);
                put_le(out, b.len() as u64, width);
                out.extend_from_slice(b);
            }
            Value::Custom(payload) => {
                out.push(0xf4);
                out.push(payload.len() as u8);
                out.extend_from_slice(payload);
            }
            Value::Array(items) => self.put_array(out, items),
            Value::Object(members) => self.put_object(out, members),
        }
    }

    fn put_array(&self, out: &mut Vec<u8>, items: &[Value]) {
        if items.is_empty() {
            return out.push(0x01);
        }
        let encoded: Vec<Vec<u8>> = items.iter().map(|v| self.encode(v)).collect();
        let mut offsets = Vec::with_capacity(items.len());
        let mut body = Vec::new();
        for e in &encoded {
            offsets.push(body.len());
            body.extend_from_slice(e);
        }

        let equal = encoded.iter().all(|e| e.len() == encoded[0].len());
        match self.array {
            ArrayLayout::Compact => put_compact(out, 0x13, &body, items.len()),
            ArrayLayout::EqualSize if equal => self.put_equal_size(out, &body),
            _ => self.put_indexed(out, 0x06, &body, &offsets),
        }
    }

    fn put_object(&self, out: &mut Vec<u8>, members: &[(String, Value)]) {
        if members.is_empty() {
            return out.push(0x0a);
        }
        let mut offsets = Vec::with_capacity(members.len());
        let mut body = Vec::new();
        for (key, value) in members {
            offsets.push(body.len());
            put_string(&mut body, key);
            self.put(&mut body, value);
        }

        match self.object {
            ObjectLayout::Compact => put_compact(out, 0x14, &body, members.len()),
            ObjectLayout::Unsorted => self.put_indexed(out, 0x0f, &body, &offsets),
            ObjectLayout::Sorted => {
                let mut order: Vec<usize> = (0..members.len()).collect();
                order.sort_by(|&a, &b| members[a].0.as_bytes().cmp(members[b].0.as_bytes()));
                let table: Vec<usize> = order.iter().map(|&i| offsets[i]).collect();
                self.put_indexed(out, 0x0b, &body, &table)
            }
        }
    }

    fn header_len(&self, width: usize, indexed: bool) -> usize {
        match (self.padded, width, indexed) {
            (true, _, _) | (_, 8, _) => 9,
            (false, w, true) => 1 + 2 * w,
            (false, w, false) => 1 + w,
        }
    }

    /// Picks the smallest allowed width whose length field can hold the total size.
    fn pick_width<F: Fn(usize) -> usize>(&self, total_for: F) -> (usize, usize) {
        for &w in WIDTHS.iter().filter(|&&w| w >= self.min_width) {
            let total = total_for(w);
            if w == 8 || (total as u64) < 1u64 << (8 * w as u64) {
                return (w, total);
            }
        }
        (8, total_for(8))
    }

    fn put_equal_size(&self, out: &mut Vec<u8>, body: &[u8]) {
        let (w, total) = self.pick_width(|w| self.header_len(w, false) + body.len());
        let start = out.len();
        out.push(0x02 + w.trailing_zeros() as u8);
        put_le(out, total as u64, w);
        pad_to(out, start + total - body.len());
        out.extend_from_slice(body);
    }

    fn put_indexed(&self, out: &mut Vec<u8>, base_tag: u8, body: &[u8], table: &[usize]) {
        let n = table.len();
        let (w, total) = self.pick_width(|w| {
            let trailer = if w == 8 { 8 } else { 0 };
            self.header_len(w, true) + body.len() + n * w + trailer
        });
        let header = self.header_len(w, true);
        let start = out.len();

        out.push(base_tag + w.trailing_zeros() as u8);
        put_le(out, total as u64, w);
        if w < 8 {
            put_le(out, n as u64, w);
        }
        pad_to(out, start + header);
        out.extend_from_slice(body);
        for offset in table {
            put_le(out, (header + offset) as u64, w);
        }
        if w == 8 {
            put_le(out, n as u64, 8);
        }
    }
}

fn pad_to(out: &mut Vec<u8>, len: usize) {
    while out.len() < len {
        out.push(0);
    }
}

fn put_le(out: &mut Vec<u8>, value: u64, width: usize) { out.extend_from_slice(&value.to_le_bytes()[..width]); }

fn put_string(out: &mut Vec<u8>, s: &str) {
    if s.len() <= MAX_SHORT_STRING {
        out.push(0x40 + s.len() as u8);
    } else {
        out.push(0xbf);
        put_le(out, s.len() as u64, 8);
    }
    out.extend_from_slice(s.as_bytes());
}

fn put_int(out: &mut Vec<u8>, i: i64) {
    match i {
        0..=9 => out.push(0x30 + i as u8),
        -6..=-1 => out.push((0x40 + i) as u8),
        _ => {
            let width = (1..8)
                .find(|&w| {
                    let bound = 1i64 << (8 * w - 1);
                    i >= -bound && i < bound
                })
                .unwrap_or(8);
            out.push(0x1f + width as u8);
            put_le(out, i as u64, width);
        }
    }
}

fn put_uint(out: &mut Vec<u8>, u: u64) {
    if u <= 9 {
        out.push(0x30 + u as u8);
    } else {
        let width = uint_width(u);
        out.push(0x27 + width as u8);
        put_le(out, u, width);
    }
}

fn uint_width(u: u64) -> usize { (1..8).find(|&w| u < 1u64 << (8 * w)).unwrap_or(8) }

/// Variable-length integer, lowest group first, continuation bit on all but the last byte.
fn varint(mut value: u64) -> VarInt {
    let mut bytes = VarInt::new();
    loop {
        let group = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            bytes.push(group);
            return bytes;
        }
        bytes.push(group | 0x80);
    }
}

fn put_compact(out: &mut Vec<u8>, tag: u8, body: &[u8], n: usize) {
    let mut count = varint(n as u64);
    count.reverse();

    let base = 1 + body.len() + count.len();
    let mut len_bytes = 1;
    while varint((base + len_bytes) as u64).len() > len_bytes {
        len_bytes += 1;
    }

    out.push(tag);
    out.extend_from_slice(&varint((base + len_bytes) as u64));
    out.extend_from_slice(body);
    out.extend_from_slice(&count);
}

/// arbitrary scalar for use with proptest
pub fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-6i64..10).prop_map(Value::Int),
        any::<i64>().prop_map(Value::Int),
        any::<u64>().prop_map(Value::UInt),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(Value::Double),
        any::<i64>().prop_map(Value::Date),
        ".{0,20}".prop_map(Value::Str),
        "[a-z]{120,300}".prop_map(Value::Str),
        prop::collection::vec(any::<u8>(), 0..300).prop_map(Value::Binary),
        prop::collection::vec(any::<u8>(), 0..20).prop_map(Value::Custom),
    ]
}

/// arbitrary key for use with proptest
pub fn arb_key() -> impl Strategy<Value = String> { "[a-z]{0,6}" }

/// arbitrary value tree for use with proptest; object keys are unique
pub fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(
        4,  // max depth
        64, // max nodes
        12, // max items per collection
        |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..12).prop_map(Value::Array),
                prop::collection::btree_map(arb_key(), inner, 0..12)
                    .prop_map(|m| m.into_iter().collect::<Vec<_>>())
                    .prop_shuffle()
                    .prop_map(Value::Object),
            ]
        },
    )
}

/// arbitrary encoder settings for use with proptest
pub fn arb_builder() -> impl Strategy<Value = Builder> {
    (
        prop_oneof![
            Just(ArrayLayout::Compact),
            Just(ArrayLayout::Indexed),
            Just(ArrayLayout::EqualSize),
        ],
        prop_oneof![
            Just(ObjectLayout::Compact),
            Just(ObjectLayout::Sorted),
            Just(ObjectLayout::Unsorted),
        ],
        prop::sample::select(WIDTHS.to_vec()),
        any::<bool>(),
    )
        .prop_map(|(array, object, width, padded)| {
            Builder::new()
                .array_layout(array)
                .object_layout(object)
                .min_width(width)
                .padded(padded)
        })
}
