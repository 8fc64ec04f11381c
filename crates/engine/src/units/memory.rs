//! Memory-size literals with explicit units.
//!
//! Collector output mixes suffixes freely ("8192K", "24.0M", "0.0B");
//! arithmetic and comparison always go through whole bytes. Values are
//! never negative, which `u64` makes unrepresentable.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Bytes,
    Kilobytes,
    Megabytes,
    Gigabytes,
}

impl SizeUnit {
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "B" => Some(SizeUnit::Bytes),
            "K" | "KB" => Some(SizeUnit::Kilobytes),
            "M" | "MB" => Some(SizeUnit::Megabytes),
            "G" | "GB" => Some(SizeUnit::Gigabytes),
            _ => None,
        }
    }

    pub fn bytes_per_unit(self) -> u64 {
        match self {
            SizeUnit::Bytes => 1,
            SizeUnit::Kilobytes => 1024,
            SizeUnit::Megabytes => 1024 * 1024,
            SizeUnit::Gigabytes => 1024 * 1024 * 1024,
        }
    }
}

/// A memory quantity normalized to whole bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MemSize {
    bytes: u64,
}

impl MemSize {
    pub fn new(value: u64, unit: SizeUnit) -> Self {
        Self {
            bytes: value * unit.bytes_per_unit(),
        }
    }

    /// Parse a literal like `8192K`, `24.0M` or `0.0B`. Fractional parts
    /// truncate to whole bytes.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let suffix_at = raw.find(|c: char| c.is_ascii_alphabetic())?;
        let (number, suffix) = raw.split_at(suffix_at);
        let unit = SizeUnit::from_suffix(suffix)?;

        let normalized = number.replace(',', ".");
        let (int_part, frac_part) = match normalized.split_once('.') {
            Some((i, f)) => (i, f),
            None => (normalized.as_str(), ""),
        };
        if int_part.is_empty() || !int_part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        if !frac_part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let whole: u64 = int_part.parse().ok()?;
        let mut bytes = whole.checked_mul(unit.bytes_per_unit())?;

        if !frac_part.is_empty() {
            // Scale the fraction into bytes, truncating below one byte.
            let frac: u64 = frac_part.parse().ok()?;
            let denom = 10u64.checked_pow(frac_part.len() as u32)?;
            bytes = bytes.checked_add(frac * unit.bytes_per_unit() / denom)?;
        }

        Some(Self { bytes })
    }

    pub fn bytes(self) -> u64 {
        self.bytes
    }

    /// Whole kilobytes, truncating.
    pub fn kilobytes(self) -> u64 {
        self.bytes / 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_kilobytes() {
        let size = MemSize::parse("8192K").unwrap();
        assert_eq!(size.bytes(), 8192 * 1024);
        assert_eq!(size.kilobytes(), 8192);
    }

    #[test]
    fn parses_decimal_megabytes() {
        let size = MemSize::parse("24.0M").unwrap();
        assert_eq!(size.bytes(), 24 * 1024 * 1024);
        assert_eq!(MemSize::parse("1.5M").unwrap().kilobytes(), 1536);
    }

    #[test]
    fn parses_zero_bytes() {
        assert_eq!(MemSize::parse("0.0B").unwrap().bytes(), 0);
    }

    #[test]
    fn comparison_crosses_units() {
        let k = MemSize::parse("2048K").unwrap();
        let m = MemSize::parse("2M").unwrap();
        assert_eq!(k, m);
        assert!(MemSize::parse("3000K").unwrap() > m);
    }

    #[test]
    fn fraction_truncates_below_a_byte() {
        // 0.3B would be fractional; truncates to 0.
        assert_eq!(MemSize::parse("0.3B").unwrap().bytes(), 0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(MemSize::parse("K").is_none());
        assert!(MemSize::parse("12Q").is_none());
        assert!(MemSize::parse("12").is_none());
        assert!(MemSize::parse("-5K").is_none());
    }
}
