//! core/tags/util.rs
//! Small formatting/parsing helpers shared by the encoders and stores.

/// Format a TRCK/TPOS-style pair: (3, 12) -> "3/12".
pub(crate) fn format_slash_pair(n: u32, total: u32) -> String {
    format!("{n}/{total}")
}

/// Parse common "boolean-ish" tag values.
/// Accepts: "1", "0", "true", "false", "yes", "no", "y", "n"
pub(crate) fn parse_boolish(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Parse a variable-length big-endian integer into u64 (MP4 `BeSigned` data).
pub(crate) fn parse_be_u64(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }

    // If it's longer than 8 bytes, keep the least-significant 8.
    let bytes = if bytes.len() > 8 {
        &bytes[bytes.len() - 8..]
    } else {
        bytes
    };

    let mut v: u64 = 0;
    for &b in bytes {
        v = (v << 8) | (b as u64);
    }
    Some(v)
}

/// Render a four-byte atom key for humans. Atom keys are Latin-1, so
/// `\xa9nam` shows up as "©nam".
pub(crate) fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolish_accepts_common_spellings() {
        assert_eq!(parse_boolish(" Yes "), Some(true));
        assert_eq!(parse_boolish("0"), Some(false));
        assert_eq!(parse_boolish("maybe"), None);
    }

    #[test]
    fn be_integers_keep_low_bytes() {
        assert_eq!(parse_be_u64(&[]), None);
        assert_eq!(parse_be_u64(&[0x01]), Some(1));
        assert_eq!(parse_be_u64(&[0x01, 0x00]), Some(256));
        assert_eq!(parse_be_u64(&[0xff, 0, 0, 0, 0, 0, 0, 0, 0x02]), Some(2));
    }

    #[test]
    fn atom_keys_render_as_latin1() {
        assert_eq!(latin1_to_string(b"\xa9nam"), "©nam");
        assert_eq!(format_slash_pair(3, 12), "3/12");
    }
}
