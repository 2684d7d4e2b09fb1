//! Color parsing and formatting for indicator lights.
//!
//! Colors use the packed driver format `0xAARRGGBB`.

/// Expand an 8-bit brightness into an opaque grayscale color.
///
/// Only the low byte of `brightness` is used.
pub fn brightness_to_argb(brightness: u32) -> u32 {
    let c = brightness & 0x0000_00ff;
    0xff00_0000 | (c << 16) | (c << 8) | c
}

/// Parse a color string into the packed format `0xAARRGGBB`.
///
/// Accepts:
/// - Hex: `"#FF0000"` (opaque), `"#80FF0000"` (explicit alpha), with or without `#`
/// - Named: `"red"`, `"green"`, `"blue"`, `"white"`, `"orange"`, `"yellow"`, `"purple"`,
///   `"cyan"`, `"off"`
pub fn parse_color(s: &str) -> crate::error::Result<u32> {
    let s = s.trim();

    match s.to_lowercase().as_str() {
        "red" => return Ok(0xFFFF_0000),
        "green" => return Ok(0xFF00_FF00),
        "blue" => return Ok(0xFF00_00FF),
        "white" => return Ok(0xFFFF_FFFF),
        "orange" => return Ok(0xFFFF_8000),
        "yellow" => return Ok(0xFFFF_FF00),
        "purple" => return Ok(0xFF80_00FF),
        "cyan" => return Ok(0xFF00_FFFF),
        "off" | "black" => return Ok(0x0000_0000),
        _ => {}
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    let invalid = || {
        crate::HwsvcError::Color(format!(
            "Invalid color: {s} (use #RRGGBB, #AARRGGBB or a color name)"
        ))
    };
    // from_str_radix alone would accept a leading sign.
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let val = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
    match hex.len() {
        6 => Ok(0xFF00_0000 | val),
        8 => Ok(val),
        _ => Err(invalid()),
    }
}

/// Format a packed color as `#AARRGGBB`.
pub fn format_color(val: u32) -> String {
    format!("#{val:08X}")
}

/// Split a packed color into `(a, r, g, b)`.
pub fn components(val: u32) -> (u8, u8, u8, u8) {
    (
        (val >> 24) as u8,
        (val >> 16) as u8,
        (val >> 8) as u8,
        val as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_expands_to_gray() {
        assert_eq!(brightness_to_argb(0), 0xFF00_0000);
        assert_eq!(brightness_to_argb(2), 0xFF02_0202);
        assert_eq!(brightness_to_argb(255), 0xFFFF_FFFF);
    }

    #[test]
    fn brightness_uses_low_byte_only() {
        assert_eq!(brightness_to_argb(0x1FF), 0xFFFF_FFFF);
        assert_eq!(brightness_to_argb(0x100), 0xFF00_0000);
    }

    #[test]
    fn parse_named() {
        assert_eq!(parse_color("red").unwrap(), 0xFFFF_0000);
        assert_eq!(parse_color("  Blue ").unwrap(), 0xFF00_00FF);
        assert_eq!(parse_color("off").unwrap(), 0);
        assert_eq!(parse_color("black").unwrap(), 0);
    }

    #[test]
    fn parse_six_digit_hex_is_opaque() {
        assert_eq!(parse_color("#00FF00").unwrap(), 0xFF00_FF00);
        assert_eq!(parse_color("abcdef").unwrap(), 0xFFAB_CDEF);
    }

    #[test]
    fn parse_eight_digit_hex_keeps_alpha() {
        assert_eq!(parse_color("#00FFFFFF").unwrap(), 0x00FF_FFFF);
        assert_eq!(parse_color("80102030").unwrap(), 0x8010_2030);
    }

    #[test]
    fn parse_invalid() {
        assert!(parse_color("").is_err());
        assert!(parse_color("#FFF").is_err());
        assert!(parse_color("#GGGGGG").is_err());
        assert!(parse_color("chartreuse").is_err());
    }

    #[test]
    fn parse_rejects_signed_hex() {
        assert!(parse_color("+FFFFF").is_err());
        assert!(parse_color("#+FFFFF").is_err());
        assert!(parse_color("+FFFFFFF").is_err());
    }

    #[test]
    fn format_round_trips_alpha() {
        assert_eq!(format_color(0x00FF_FFFF), "#00FFFFFF");
        assert_eq!(format_color(0xFF02_0202), "#FF020202");
    }

    #[test]
    fn components_split() {
        assert_eq!(components(0x8010_2030), (0x80, 0x10, 0x20, 0x30));
    }
}
