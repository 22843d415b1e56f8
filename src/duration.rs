//! Text codec for [`std::time::Duration`] fields.
//!
//! Accepts a sequence of `<number><unit>` terms such as `"1h30m"`, `"250ms"`
//! or `"1.5s"`. Units: `ns`, `us`/`µs`, `ms`, `s`, `m`, `h`. A bare `"0"` is
//! zero. Rendering produces the same format, largest unit first.

use std::time::Duration;

use crate::coerce::TextCodec;
use crate::types::Kind;

const UNITS: &[(&str, f64)] = &[
    ("ns", 1.0),
    ("us", 1e3),
    ("µs", 1e3),
    ("ms", 1e6),
    ("s", 1e9),
    ("m", 60e9),
    ("h", 3600e9),
];

impl TextCodec for Duration {
    const KIND: Kind = Kind::Integer;

    fn decode(raw: &str) -> Result<Self, String> {
        parse_duration(raw)
    }

    fn encode(&self) -> String {
        format_duration(*self)
    }

    fn is_empty(&self) -> bool {
        Duration::is_zero(self)
    }
}

/// Parse duration text into a [`Duration`].
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    if raw == "0" {
        return Ok(Duration::ZERO);
    }
    if raw.is_empty() {
        return Err("empty duration".into());
    }

    let mut rest = raw;
    let mut nanos = 0f64;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| format!("missing unit in duration '{raw}'"))?;
        if number_len == 0 {
            return Err(format!("expected a number in duration '{raw}'"));
        }
        let value: f64 = rest[..number_len]
            .parse()
            .map_err(|_| format!("invalid number in duration '{raw}'"))?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        let scale = UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(|| format!("unknown unit '{unit}' in duration '{raw}'"))?;
        nanos += value * scale;
        rest = &rest[unit_len..];
    }

    if !nanos.is_finite() || nanos > u64::MAX as f64 {
        return Err(format!("duration '{raw}' is out of range"));
    }
    Ok(Duration::from_nanos(nanos.round() as u64))
}

/// Render a [`Duration`] in the format [`parse_duration`] accepts.
pub fn format_duration(d: Duration) -> String {
    if d.is_zero() {
        return "0s".into();
    }

    let mut out = String::new();
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    let subsec_nanos = d.subsec_nanos();

    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    if secs > 0 {
        out.push_str(&format!("{secs}s"));
    }
    if subsec_nanos > 0 {
        if subsec_nanos % 1_000_000 == 0 {
            out.push_str(&format!("{}ms", subsec_nanos / 1_000_000));
        } else if subsec_nanos % 1_000 == 0 {
            out.push_str(&format!("{}us", subsec_nanos / 1_000));
        } else {
            out.push_str(&format!("{subsec_nanos}ns"));
        }
    }
    out
}
