use super::{DeserializationContext, DeserializerRegistry};
use crate::{
    decimal::BigDecimal,
    errors::{Result, VPackError},
    number::Number,
    slice::VPackSlice,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use num_bigint::BigInt;
use uuid::Uuid;

/// Hyphen positions of the canonical textual UUID form.
const UUID_HYPHENS: [usize; 4] = [8, 13, 18, 23];
const UUID_TEXT_LEN: usize = 36;

macro_rules! accessors {
    ($registry:ident, $($t:ty => $accessor:ident),* $(,)?) => {
        $(
            $registry.register_fn(|_, v: &VPackSlice, _| -> Result<$t> { v.$accessor() });
        )*
    };
}

pub(super) fn register_all(registry: &mut DeserializerRegistry) {
    accessors! {
        registry,
        String => get_as_string,
        bool => get_as_bool,
        i8 => get_as_i8,
        u8 => get_as_u8,
        i16 => get_as_i16,
        i32 => get_as_i32,
        i64 => get_as_i64,
        u64 => get_as_u64,
        f32 => get_as_f32,
        f64 => get_as_f64,
        char => get_as_char,
        BigInt => get_as_big_integer,
        BigDecimal => get_as_big_decimal,
        Number => get_as_number,
    }

    registry
        .register_fn(date)
        .register_fn(sql_date)
        .register_fn(sql_timestamp)
        .register_fn(uuid)
        .register_fn(base64_bytes)
        .register_fn(binary)
        .register_fn(|_, v: &VPackSlice, _| Ok(v.clone()));
}

/// Parses a textual date with the configured format. Formats without a time of day
/// produce midnight.
fn parse_date_text(text: &str, ctx: &DeserializationContext) -> Result<NaiveDateTime> {
    let format = ctx.options().date_format();
    NaiveDateTime::parse_from_str(text, format).or_else(|err| {
        NaiveDate::parse_from_str(text, format)
            .ok()
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .ok_or_else(|| VPackError::parse("date", format!("{:?} with format {:?}: {}", text, format, err)))
    })
}

fn date(_: Option<&VPackSlice>, v: &VPackSlice, ctx: &DeserializationContext) -> Result<DateTime<Utc>> {
    if v.is_string() {
        Ok(Utc.from_utc_datetime(&parse_date_text(v.get_as_str()?, ctx)?))
    } else {
        v.get_as_date()
    }
}

fn sql_date(_: Option<&VPackSlice>, v: &VPackSlice, ctx: &DeserializationContext) -> Result<NaiveDate> {
    if v.is_string() {
        Ok(parse_date_text(v.get_as_str()?, ctx)?.date())
    } else {
        v.get_as_sql_date()
    }
}

fn sql_timestamp(
    _: Option<&VPackSlice>,
    v: &VPackSlice,
    ctx: &DeserializationContext,
) -> Result<NaiveDateTime> {
    if v.is_string() {
        parse_date_text(v.get_as_str()?, ctx)
    } else {
        v.get_as_sql_timestamp()
    }
}

fn uuid(_: Option<&VPackSlice>, v: &VPackSlice, _: &DeserializationContext) -> Result<Uuid> {
    let text = v.get_as_str()?;
    let hyphenated = text.len() == UUID_TEXT_LEN
        && text
            .bytes()
            .enumerate()
            .all(|(i, b)| (b == b'-') == UUID_HYPHENS.contains(&i));
    if !hyphenated {
        return Err(VPackError::parse(
            "UUID",
            format!("{:?} is not in hyphenated form", text),
        ));
    }
    Uuid::parse_str(text).map_err(|e| VPackError::parse("UUID", e))
}

fn base64_bytes(_: Option<&VPackSlice>, v: &VPackSlice, _: &DeserializationContext) -> Result<Vec<u8>> {
    STANDARD
        .decode(v.get_as_str()?)
        .map_err(|e| VPackError::parse("Base64", e))
}

/// Binary values are shared with the buffer, Base64 text is decoded.
fn binary(parent: Option<&VPackSlice>, v: &VPackSlice, ctx: &DeserializationContext) -> Result<Bytes> {
    if v.is_binary() {
        v.get_as_binary()
    } else {
        base64_bytes(parent, v, ctx).map(Bytes::from)
    }
}
