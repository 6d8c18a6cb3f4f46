// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Pure formatting helpers: byte sizes, transfer speeds, ETAs, truncation.

use regex::Regex;
use std::sync::LazyLock;

use crate::api::Quantity;

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
const SPEED_UNITS: [&str; 5] = ["B/s", "KB/s", "MB/s", "GB/s", "TB/s"];

/// Strings that already carry a size unit ("4.6MB", "700 kb", "1.2 GiB").
static PRE_SIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[\d.,\s]*(?:[KMGT]i?)?B$").expect("valid size regex"));

/// Placeholder for an unknown ETA.
pub const ETA_PLACEHOLDER: &str = "--:--";

/// Scale `value` by 1024 until it drops below 1024, one decimal place.
fn scale_1024(value: f64, units: &[&str]) -> String {
    let mut index = 0;
    let mut scaled = value;
    while scaled >= 1024.0 && index + 1 < units.len() {
        scaled /= 1024.0;
        index += 1;
    }
    format!("{:.1} {}", scaled, units[index])
}

/// Human-readable size for a raw byte count.
pub fn format_byte_count(bytes: f64) -> String {
    if !bytes.is_finite() || bytes <= 0.0 {
        return "0 B".to_string();
    }
    scale_1024(bytes, &SIZE_UNITS)
}

/// Human-readable size for a server-supplied size field.
///
/// Already-formatted strings pass through unchanged; anything else is read
/// as a byte count. Unparsable values render as `0 B`.
pub fn format_bytes(size: &str) -> String {
    let trimmed = size.trim();
    if PRE_SIZED.is_match(trimmed) && trimmed.chars().any(|c| c.is_ascii_digit()) {
        return size.to_string();
    }
    format_byte_count(trimmed.parse().unwrap_or(0.0))
}

/// [`format_bytes`] for a [`Quantity`] field.
pub fn format_size(size: &Quantity) -> String {
    match size {
        Quantity::Number(n) => format_byte_count(*n),
        Quantity::Text(s) => format_bytes(s),
    }
}

/// Transfer speed with a `/s` unit.
pub fn format_speed(bytes_per_second: f64) -> String {
    if !bytes_per_second.is_finite() || bytes_per_second <= 0.0 {
        return "0 B/s".to_string();
    }
    scale_1024(bytes_per_second, &SPEED_UNITS)
}

/// Speed field as the server sent it: text passes through, numbers are
/// formatted, absent renders as zero.
pub fn format_speed_field(speed: Option<&Quantity>) -> String {
    match speed {
        Some(Quantity::Text(s)) if !s.trim().is_empty() => s.clone(),
        Some(Quantity::Number(n)) => format_speed(*n),
        _ => format_speed(0.0),
    }
}

/// `h:mm:ss` for an hour or more, else `m:ss`. Negative or non-finite
/// input yields [`ETA_PLACEHOLDER`].
pub fn format_eta(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return ETA_PLACEHOLDER.to_string();
    }
    let total = seconds.floor() as u64;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;

    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

/// ETA field as the server sent it.
pub fn format_eta_field(eta: Option<&Quantity>) -> String {
    match eta {
        Some(Quantity::Number(n)) => format_eta(*n),
        Some(Quantity::Text(s)) if !s.trim().is_empty() => match s.trim().parse::<f64>() {
            Ok(n) => format_eta(n),
            Err(_) => s.clone(),
        },
        _ => ETA_PLACEHOLDER.to_string(),
    }
}

/// First `max_chars` characters of `text`.
pub fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_bytes() {
        assert_eq!(format_bytes("0"), "0 B");
        assert_eq!(format_byte_count(0.0), "0 B");
        assert_eq!(format_bytes(""), "0 B");
        assert_eq!(format_bytes("unknown"), "0 B");
    }

    #[test]
    fn test_byte_scaling() {
        assert_eq!(format_bytes("512"), "512.0 B");
        assert_eq!(format_bytes("1024"), "1.0 KB");
        assert_eq!(format_bytes("1536"), "1.5 KB");
        assert_eq!(format_bytes("1048576"), "1.0 MB");
        assert_eq!(format_byte_count(5.0 * 1024.0 * 1024.0 * 1024.0), "5.0 GB");
        assert_eq!(format_byte_count(2.0 * 1024f64.powi(4)), "2.0 TB");
    }

    #[test]
    fn test_chosen_unit_keeps_mantissa_in_range() {
        for exp in 0..40 {
            let bytes = 1.7f64.powi(exp) * 3.0;
            let rendered = format_byte_count(bytes);
            let (mantissa, unit) = rendered.split_once(' ').unwrap();
            let k = SIZE_UNITS.iter().position(|u| *u == unit).unwrap() as i32;
            let exact = bytes / 1024f64.powi(k);
            assert!((1.0..1024.0).contains(&exact), "{} -> {}", bytes, rendered);
            assert!(mantissa.parse::<f64>().is_ok());
        }
    }

    #[test]
    fn test_pre_sized_strings_pass_through() {
        for s in ["4.6MB", "700 kb", "1.2 GB", "12B", "3TB", "1.2 GiB", "700 KiB", "5mib"] {
            assert_eq!(format_bytes(s), s);
            assert_eq!(format_bytes(&format_bytes(s)), s);
        }
    }

    #[test]
    fn test_size_quantity() {
        assert_eq!(format_size(&Quantity::Number(2048.0)), "2.0 KB");
        assert_eq!(format_size(&Quantity::Text("4.6MB".into())), "4.6MB");
    }

    #[test]
    fn test_speed() {
        assert_eq!(format_speed(0.0), "0 B/s");
        assert_eq!(format_speed(1536.0), "1.5 KB/s");
        assert_eq!(format_speed(3.0 * 1024.0 * 1024.0), "3.0 MB/s");
        assert_eq!(format_speed_field(None), "0 B/s");
        assert_eq!(format_speed_field(Some(&Quantity::Text("2.1 MB/s".into()))), "2.1 MB/s");
        assert_eq!(format_speed_field(Some(&Quantity::Number(2048.0))), "2.0 KB/s");
    }

    #[test]
    fn test_eta() {
        assert_eq!(format_eta(-1.0), "--:--");
        assert_eq!(format_eta(f64::INFINITY), "--:--");
        assert_eq!(format_eta(f64::NAN), "--:--");
        assert_eq!(format_eta(3661.0), "1:01:01");
        assert_eq!(format_eta(61.0), "1:01");
        assert_eq!(format_eta(0.0), "0:00");
        assert_eq!(format_eta_field(Some(&Quantity::Text("90".into()))), "1:30");
        assert_eq!(format_eta_field(Some(&Quantity::Text("soon".into()))), "soon");
        assert_eq!(format_eta_field(None), "--:--");
    }

    #[test]
    fn test_truncate_is_char_aware() {
        assert_eq!(truncate("Der Zauberberg", 3), "Der");
        assert_eq!(truncate("Ångström", 2), "Ån");
        assert_eq!(truncate("short", 40), "short");
    }
}
