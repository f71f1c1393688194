/// Decode the character references that static-site generators actually emit.
///
/// Contract:
/// - Named references are decoded only when semicolon-terminated and listed in
///   `NAMED_ENTITIES` (the XML five, `&nbsp;`, and common typographic names).
/// - Numeric references are decoded only when well-formed and semicolon-terminated:
///   `&#123;` (decimal) and `&#x1F4A9;` (hex).
/// - `&#0;`, surrogates and code points past U+10FFFF decode to U+FFFD.
/// - Anything else (unknown names, missing semicolons, overlong digit runs) is left as-is.
pub(crate) fn decode_entities(s: &str) -> String {
    let bytes = s.as_bytes();
    if memchr::memchr(b'&', bytes).is_none() {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    let mut copy_start = 0;

    while i < bytes.len() {
        if bytes[i] != b'&' {
            i += 1;
            continue;
        }

        // Flush bytes up to '&' unchanged (preserves UTF-8).
        if copy_start < i {
            out.push_str(&s[copy_start..i]);
        }

        match decode_reference(s, i) {
            Some((ch, next)) => {
                out.push(ch);
                i = next;
            }
            None => {
                out.push('&');
                i += 1;
            }
        }
        copy_start = i;
    }

    if copy_start < bytes.len() {
        out.push_str(&s[copy_start..]);
    }

    out
}

const MAX_HEX_DIGITS: usize = 6; // 0x10FFFF
const MAX_DEC_DIGITS: usize = 7; // 1114111
const MAX_NAME_LEN: usize = 8;

const NAMED_ENTITIES: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{00A0}'),
    ("copy", '\u{00A9}'),
    ("reg", '\u{00AE}'),
    ("trade", '\u{2122}'),
    ("hellip", '\u{2026}'),
    ("mdash", '\u{2014}'),
    ("ndash", '\u{2013}'),
    ("lsquo", '\u{2018}'),
    ("rsquo", '\u{2019}'),
    ("ldquo", '\u{201C}'),
    ("rdquo", '\u{201D}'),
    ("laquo", '\u{00AB}'),
    ("raquo", '\u{00BB}'),
    ("middot", '\u{00B7}'),
    ("times", '\u{00D7}'),
    ("euro", '\u{20AC}'),
];

/// Decode the reference starting at `start` (which points at `&`).
/// Returns the character and the index just past the terminating `;`.
fn decode_reference(s: &str, start: usize) -> Option<(char, usize)> {
    let bytes = s.as_bytes();
    match bytes.get(start + 1)? {
        b'#' => {
            let (digits_start, radix, max_digits) = match bytes.get(start + 2) {
                Some(b'x') | Some(b'X') => (start + 3, 16, MAX_HEX_DIGITS),
                _ => (start + 2, 10, MAX_DEC_DIGITS),
            };
            let end = scan_terminated(bytes, digits_start, max_digits, |b| {
                if radix == 16 {
                    b.is_ascii_hexdigit()
                } else {
                    b.is_ascii_digit()
                }
            })?;
            let code = u32::from_str_radix(&s[digits_start..end], radix).ok()?;
            let ch = match code {
                0 => char::REPLACEMENT_CHARACTER,
                _ => char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER),
            };
            Some((ch, end + 1))
        }
        _ => {
            let name_start = start + 1;
            let end = scan_terminated(bytes, name_start, MAX_NAME_LEN, |b| {
                b.is_ascii_alphanumeric()
            })?;
            let name = &s[name_start..end];
            NAMED_ENTITIES
                .iter()
                .find(|(candidate, _)| *candidate == name)
                .map(|(_, ch)| (*ch, end + 1))
        }
    }
}

// Bounded scan to avoid quadratic behavior on adversarial input.
fn scan_terminated(
    bytes: &[u8],
    start: usize,
    max_len: usize,
    accept: impl Fn(u8) -> bool,
) -> Option<usize> {
    let mut j = start;
    while j < bytes.len() {
        let b = bytes[j];
        if b == b';' {
            return (j > start).then_some(j);
        }
        if j - start == max_len || !accept(b) {
            return None;
        }
        j += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_entities_preserves_utf8() {
        assert_eq!(decode_entities("120×32"), "120×32");
    }

    #[test]
    fn decode_entities_decodes_named_entities() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&lt;tag&gt;"), "<tag>");
        assert_eq!(decode_entities("&quot;hi&quot;"), "\"hi\"");
        assert_eq!(decode_entities("a&nbsp;b"), "a\u{00A0}b");
        assert_eq!(decode_entities("&copy; 2024"), "\u{00A9} 2024");
        assert_eq!(decode_entities("wait&hellip;"), "wait\u{2026}");
    }

    #[test]
    fn decode_entities_decodes_numeric_entities() {
        assert_eq!(decode_entities("&#215;"), "×");
        assert_eq!(decode_entities("&#xD7;"), "×");
        assert_eq!(decode_entities("&#XD7;"), "×");
    }

    #[test]
    fn decode_entities_passes_through_unknown_and_missing_semicolon() {
        assert_eq!(
            decode_entities("before &notanentity; after"),
            "before &notanentity; after"
        );
        assert_eq!(decode_entities("&amp"), "&amp");
        assert_eq!(decode_entities("loose &amp space"), "loose &amp space");
        assert_eq!(decode_entities("&#215 "), "&#215 ");
        assert_eq!(decode_entities("fish & chips"), "fish & chips");
    }

    #[test]
    fn decode_entities_replaces_invalid_scalars_and_skips_overlong_digits() {
        assert_eq!(decode_entities("&#0;"), "\u{FFFD}");
        assert_eq!(decode_entities("&#x0000;"), "\u{FFFD}");
        assert_eq!(decode_entities("&#xD800;"), "\u{FFFD}");
        assert_eq!(decode_entities("&#x110000;"), "\u{FFFD}");
        assert_eq!(decode_entities("&#11141111;"), "&#11141111;");
        assert_eq!(decode_entities("&#1114111;"), "\u{10FFFF}");
        assert_eq!(decode_entities("&#;"), "&#;");
        assert_eq!(decode_entities("&#x;"), "&#x;");
    }

    #[test]
    fn decode_entities_is_stable_on_adversarial_inputs() {
        let samples = ["&", "&&", "&;", "&#xFFFFFFFF;", "&unknown;", "&#99999999;"];
        for s in samples {
            let out = decode_entities(s);
            assert_eq!(out, s);
        }
        let noisy = "&#123456789;".repeat(100);
        assert_eq!(decode_entities(&noisy), noisy);
    }
}
