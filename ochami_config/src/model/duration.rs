//! Request timeout values written as duration strings.
//!
//! Accepts the compact `1h30m`, `45s`, `1.5s`, `250ms` notation. A bare
//! integer is read as a number of seconds. Values are written back in the
//! same notation, always ending in the smallest non-zero unit.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ConfigError;

const NANOS_PER_SEC: u128 = 1_000_000_000;
pub(crate) const EXPECTED_DURATION: &str = "a duration such as 30s, 1m30s or 500ms";

/// Request timeout stored as a [`Duration`].
///
/// # Examples
///
/// ```
/// use ochami_config::Timeout;
/// use std::time::Duration;
///
/// let timeout: Timeout = "1m30s".parse()?;
/// assert_eq!(timeout.as_duration(), Duration::from_secs(90));
/// assert_eq!(timeout.to_string(), "1m30s");
/// # Ok::<_, ochami_config::ConfigError>(())
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Timeout(Duration);

impl Timeout {
    /// Timeout of `secs` whole seconds.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    /// Underlying duration.
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        self.0
    }
}

impl From<Duration> for Timeout {
    fn from(value: Duration) -> Self {
        Self(value)
    }
}

impl From<Timeout> for Duration {
    fn from(value: Timeout) -> Self {
        value.0
    }
}

impl FromStr for Timeout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_duration(s)
            .map(Self)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "timeout".to_owned(),
                value: format!("'{s}'"),
                expected: EXPECTED_DURATION.to_owned(),
            })
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.as_secs();
        let nanos = self.0.subsec_nanos();
        if secs == 0 {
            return match nanos {
                0 => f.write_str("0s"),
                1..1_000 => write!(f, "{nanos}ns"),
                1_000..1_000_000 => {
                    write_unit(f, nanos.div_euclid(1_000), nanos.rem_euclid(1_000), 3, "µs")
                }
                _ => write_unit(
                    f,
                    nanos.div_euclid(1_000_000),
                    nanos.rem_euclid(1_000_000),
                    6,
                    "ms",
                ),
            };
        }

        let hours = secs.div_euclid(3_600);
        let minutes = secs.rem_euclid(3_600).div_euclid(60);
        if hours > 0 {
            write!(f, "{hours}h")?;
        }
        if hours > 0 || minutes > 0 {
            write!(f, "{minutes}m")?;
        }
        write_unit(f, secs.rem_euclid(60), nanos, 9, "s")
    }
}

fn write_unit(
    f: &mut fmt::Formatter<'_>,
    whole: impl fmt::Display,
    fraction: u32,
    width: usize,
    unit: &str,
) -> fmt::Result {
    if fraction == 0 {
        return write!(f, "{whole}{unit}");
    }
    let digits = format!("{fraction:0width$}");
    write!(f, "{whole}.{}{unit}", digits.trim_end_matches('0'))
}

impl Serialize for Timeout {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timeout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimeoutVisitor)
    }
}

struct TimeoutVisitor;

impl Visitor<'_> for TimeoutVisitor {
    type Value = Timeout;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(EXPECTED_DURATION)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        parse_duration(v)
            .map(Timeout)
            .ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Timeout::from_secs(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(Timeout::from_secs)
            .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
    }
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3_600 * NANOS_PER_SEC),
        _ => None,
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn parse_duration(text: &str) -> Option<Duration> {
    let trimmed = text.trim();
    if let Ok(secs) = trimmed.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    let mut rest = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if rest.is_empty() {
        return None;
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, after_whole) = split_digits(rest);
        let (fraction, after_fraction) = after_whole
            .strip_prefix('.')
            .map_or(("", after_whole), split_digits);
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        let unit_end = after_fraction
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_fraction.len());
        let (unit, tail) = after_fraction.split_at(unit_end);
        let per_unit = unit_nanos(unit)?;

        if !whole.is_empty() {
            let value: u128 = whole.parse().ok()?;
            total = total.checked_add(value.checked_mul(per_unit)?)?;
        }
        if !fraction.is_empty() {
            let digits = fraction.get(..18).unwrap_or(fraction);
            let scale = 10_u128.checked_pow(u32::try_from(digits.len()).ok()?)?;
            let value: u128 = digits.parse().ok()?;
            total = total.checked_add(value.checked_mul(per_unit)?.checked_div(scale)?)?;
        }
        rest = tail;
    }

    let secs = u64::try_from(total.div_euclid(NANOS_PER_SEC)).ok()?;
    let nanos = u32::try_from(total.rem_euclid(NANOS_PER_SEC)).ok()?;
    Some(Duration::new(secs, nanos))
}
