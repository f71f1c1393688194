//! Lenient HTML tokenizer with a constrained, practical tag-name character set.
//!
//! Supported tag-name characters (ASCII only): `[A-Za-z0-9:_-]`, starting with a letter.
//! Attribute names use the same ASCII character class.
//!
//! Recoverable quirks are normalized here or in the tree builder: a NUL byte becomes U+FFFD,
//! a `<` that does not start a tag is text, duplicate attributes keep the first occurrence, and
//! a raw-text element without a close tag runs to end of input. Input that cannot be split into
//! tokens at all is a [`ParseError`]: a comment, doctype, or tag still open at end of input.
use crate::entities::decode_entities;
use crate::error::{ParseError, ParseErrorCode};
use crate::types::{Attribute, Token};
use memchr::memchr;

const HTML_COMMENT_START: &str = "<!--";
const HTML_COMMENT_END: &str = "-->";

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

fn is_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'_' || c == b':'
}

// Matches only at ASCII `<`, which never appears inside a UTF-8 continuation byte.
fn find_rawtext_close_tag(haystack: &str, name: &str) -> Option<(usize, usize)> {
    let hay_bytes = haystack.as_bytes();
    let len = hay_bytes.len();
    let n = name.len() + 2;
    let mut i = 0;
    while i + n <= len {
        let rel = memchr(b'<', &hay_bytes[i..])?;
        i += rel;
        if i + n > len {
            return None;
        }
        if hay_bytes[i + 1] == b'/'
            && starts_with_ignore_ascii_case_at(hay_bytes, i + 2, name.as_bytes())
        {
            let mut k = i + n;
            // Only ASCII whitespace may sit between the name and `>`.
            while k < len && hay_bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < len && hay_bytes[k] == b'>' {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

pub(crate) fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose content is not markup. `title` and `textarea` still decode entities.
pub(crate) fn is_raw_text_element(name: &str) -> bool {
    matches!(
        name,
        "script" | "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript"
    )
}

fn is_escapable_raw_text_element(name: &str) -> bool {
    matches!(name, "title" | "textarea")
}

fn push_text(out: &mut Vec<Token>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Token::Text(prev)) = out.last_mut() {
        prev.push_str(text);
    } else {
        out.push(Token::Text(text.to_string()));
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    if memchr(0, input.as_bytes()).is_some() {
        return tokenize_str(&input.replace('\0', "\u{FFFD}"));
    }
    tokenize_str(input)
}

fn tokenize_str(input: &str) -> Result<Vec<Token>, ParseError> {
    let bytes = input.as_bytes();

    let mut out = Vec::new();
    let mut i = 0;
    // Invariant: we scan by byte, but any slice endpoints must be UTF-8 char boundaries.
    // We only cut slices at ASCII structural bytes or at positions reached by scanning
    // ASCII-only tokens; therefore slice endpoints remain UTF-8 boundaries.
    while i < bytes.len() {
        if bytes[i] != b'<' {
            let start = i;
            i = memchr(b'<', &bytes[i..]).map_or(bytes.len(), |rel| i + rel);
            debug_assert!(input.is_char_boundary(start));
            debug_assert!(input.is_char_boundary(i));
            push_text(&mut out, &decode_entities(&input[start..i]));
            continue;
        }

        let tag_start = i;
        if input[i..].starts_with(HTML_COMMENT_START) {
            let body_start = i + HTML_COMMENT_START.len();
            let Some(end) = input[body_start..].find(HTML_COMMENT_END) else {
                return Err(ParseError::new(ParseErrorCode::UnterminatedComment, tag_start));
            };
            out.push(Token::Comment(input[body_start..body_start + end].to_string()));
            i = body_start + end + HTML_COMMENT_END.len();
            continue;
        }

        if starts_with_ignore_ascii_case_at(bytes, i, b"<!doctype") {
            let rest = &input[i + b"<!doctype".len()..];
            let Some(end) = rest.find('>') else {
                return Err(ParseError::new(ParseErrorCode::UnterminatedDoctype, tag_start));
            };
            out.push(Token::Doctype(rest[..end].trim().to_string()));
            i += b"<!doctype".len() + end + 1;
            continue;
        }

        // `<!...>` and `<?...>` become bogus comments.
        if matches!(bytes.get(i + 1), Some(b'!') | Some(b'?')) {
            let body_start = i + 2;
            let Some(end) = memchr(b'>', &bytes[body_start..]) else {
                return Err(ParseError::new(ParseErrorCode::UnterminatedComment, tag_start));
            };
            out.push(Token::Comment(input[body_start..body_start + end].to_string()));
            i = body_start + end + 1;
            continue;
        }

        if bytes.get(i + 1) == Some(&b'/') {
            let start = i + 2;
            if !bytes.get(start).is_some_and(|b| b.is_ascii_alphabetic()) {
                // `</>` is dropped, `</ 3` is text.
                if bytes.get(start) == Some(&b'>') {
                    i = start + 1;
                } else {
                    push_text(&mut out, "</");
                    i = start;
                }
                continue;
            }
            let mut j = start;
            while j < bytes.len() && is_name_char(bytes[j]) {
                j += 1;
            }
            let name = input[start..j].to_ascii_lowercase();
            let Some(rel) = memchr(b'>', &bytes[j..]) else {
                return Err(ParseError::new(ParseErrorCode::UnterminatedTag, tag_start));
            };
            out.push(Token::EndTag(name));
            i = j + rel + 1;
            continue;
        }

        if !bytes.get(i + 1).is_some_and(|b| b.is_ascii_alphabetic()) {
            push_text(&mut out, "<");
            i += 1;
            continue;
        }

        let (name, attributes, self_closing, content_start) = read_start_tag(input, i)?;
        let raw = is_raw_text_element(&name);
        let escapable = is_escapable_raw_text_element(&name);
        // `<script/>` still opens a raw text element.
        out.push(Token::StartTag {
            name: name.clone(),
            attributes,
            self_closing: self_closing && !(raw || escapable),
        });
        i = content_start;

        if raw || escapable {
            let body = &input[i..];
            let (text, consumed) = match find_rawtext_close_tag(body, &name) {
                Some((rel_start, rel_end)) => (&body[..rel_start], rel_end),
                // A missing close tag swallows the rest of the input, as browsers do.
                None => (body, body.len()),
            };
            if escapable {
                push_text(&mut out, &decode_entities(text));
            } else if !text.is_empty() {
                out.push(Token::Text(text.to_string()));
            }
            out.push(Token::EndTag(name));
            i += consumed;
        }
    }
    Ok(out)
}

/// Read a start tag beginning at `lt` (the `<`).
/// Returns name, attributes, self-closing flag, and the index after `>`.
fn read_start_tag(
    input: &str,
    lt: usize,
) -> Result<(String, Vec<Attribute>, bool, usize), ParseError> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let start = lt + 1;
    let mut k = start;
    while k < len && is_name_char(bytes[k]) {
        k += 1;
    }
    let name = input[start..k].to_ascii_lowercase();
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut self_closing = false;

    let skip_whitespace = |k: &mut usize| {
        while *k < len && bytes[*k].is_ascii_whitespace() {
            *k += 1;
        }
    };

    loop {
        skip_whitespace(&mut k);
        if k >= len {
            return Err(ParseError::new(ParseErrorCode::UnterminatedTag, lt));
        }
        if bytes[k] == b'>' {
            k += 1;
            break;
        }
        if bytes[k] == b'/' {
            if k + 1 < len && bytes[k + 1] == b'>' {
                self_closing = true;
                k += 2;
                break;
            }
            k += 1;
            continue;
        }
        let name_start = k;
        while k < len && !bytes[k].is_ascii_whitespace() && !matches!(bytes[k], b'=' | b'>' | b'/')
        {
            k += 1;
        }
        if name_start == k {
            // Stray `=`: skip it like any other unusable byte.
            k += 1;
            continue;
        }
        let attribute_name = input[name_start..k].to_ascii_lowercase();

        skip_whitespace(&mut k);
        let value = if k < len && bytes[k] == b'=' {
            k += 1;
            skip_whitespace(&mut k);
            if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                let quote = bytes[k];
                k += 1;
                let vstart = k;
                let Some(rel) = memchr(quote, &bytes[k..]) else {
                    return Err(ParseError::new(ParseErrorCode::UnterminatedTag, lt));
                };
                k += rel;
                let raw = &input[vstart..k];
                k += 1;
                Some(decode_entities(raw))
            } else {
                let vstart = k;
                while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                    k += 1;
                }
                Some(decode_entities(&input[vstart..k]))
            }
        } else {
            None
        };
        if !attributes.iter().any(|(existing, _)| *existing == attribute_name) {
            attributes.push((attribute_name, value));
        }
    }

    if is_void_element(&name) {
        self_closing = true;
    }

    Ok((name, attributes, self_closing, k))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(name: &str, attributes: &[(&str, Option<&str>)]) -> Token {
        Token::StartTag {
            name: name.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
                .collect(),
            self_closing: false,
        }
    }

    #[test]
    fn tokenize_preserves_utf8_text_nodes() {
        let tokens = tokenize("<p>120×32</p>").unwrap();
        assert!(
            tokens
                .iter()
                .any(|t| matches!(t, Token::Text(s) if s == "120×32")),
            "expected UTF-8 text token, got: {tokens:?}"
        );
    }

    #[test]
    fn tokenize_handles_mixed_case_doctype() {
        let tokens = tokenize("<!DoCtYpE html>").unwrap();
        assert_eq!(tokens, vec![Token::Doctype("html".to_string())]);
    }

    #[test]
    fn tokenize_lowercases_names_and_keeps_attribute_order() {
        let tokens = tokenize(r#"<DIV Class="a b" ID=x hidden></Div>"#).unwrap();
        assert_eq!(
            tokens,
            vec![
                start("div", &[("class", Some("a b")), ("id", Some("x")), ("hidden", None)]),
                Token::EndTag("div".to_string()),
            ]
        );
    }

    #[test]
    fn tokenize_keeps_first_duplicate_attribute() {
        let tokens = tokenize(r#"<a href="1" href="2">"#).unwrap();
        assert_eq!(tokens, vec![start("a", &[("href", Some("1"))])]);
    }

    #[test]
    fn tokenize_finds_script_end_tag_case_insensitive() {
        let tokens = tokenize("<script>if (a < b) { x(); }</ScRiPt >").unwrap();
        assert_eq!(
            tokens,
            vec![
                start("script", &[]),
                Token::Text("if (a < b) { x(); }".to_string()),
                Token::EndTag("script".to_string()),
            ]
        );
    }

    #[test]
    fn rawtext_close_tag_does_not_accept_near_matches() {
        let tokens = tokenize("<script>ok</scriptx >no</script>").unwrap();
        assert!(
            matches!(&tokens[1], Token::Text(body) if body == "ok</scriptx >no"),
            "expected near-match not to close rawtext, got: {tokens:?}"
        );
    }

    #[test]
    fn tokenize_handles_rawtext_without_close_tag() {
        let tokens = tokenize("<style>body { color: red }").unwrap();
        assert_eq!(
            tokens,
            vec![
                start("style", &[]),
                Token::Text("body { color: red }".to_string()),
                Token::EndTag("style".to_string()),
            ]
        );
    }

    #[test]
    fn tokenize_decodes_entities_in_title_but_not_script() {
        let tokens = tokenize("<title>a &amp; b</title><script>a &amp; b</script>").unwrap();
        assert!(matches!(&tokens[1], Token::Text(t) if t == "a & b"));
        assert!(matches!(&tokens[4], Token::Text(t) if t == "a &amp; b"));
    }

    #[test]
    fn stray_angle_bracket_is_text() {
        let tokens = tokenize("<p>1 < 2 <3</p>").unwrap();
        assert_eq!(
            tokens,
            vec![
                start("p", &[]),
                Token::Text("1 < 2 <3".to_string()),
                Token::EndTag("p".to_string()),
            ]
        );
    }

    #[test]
    fn void_elements_are_self_closing() {
        let tokens = tokenize(r#"<img src="a.png"><br/>"#).unwrap();
        assert!(tokens.iter().all(|t| matches!(
            t,
            Token::StartTag {
                self_closing: true,
                ..
            }
        )));
    }

    #[test]
    fn bogus_comment_is_a_comment() {
        let tokens = tokenize("<?xml version=\"1.0\"?><p>").unwrap();
        assert!(matches!(&tokens[0], Token::Comment(c) if c.starts_with("xml")));
    }

    #[test]
    fn unterminated_constructs_are_errors() {
        let cases = [
            ("<p>ok<!-- never", ParseErrorCode::UnterminatedComment, 5),
            ("<!DOCTYPE html", ParseErrorCode::UnterminatedDoctype, 0),
            ("<div class=\"a>", ParseErrorCode::UnterminatedTag, 0),
            ("<p></p", ParseErrorCode::UnterminatedTag, 3),
        ];
        for (input, code, position) in cases {
            assert_eq!(
                tokenize(input),
                Err(ParseError { code, position }),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn nul_bytes_are_replaced_everywhere() {
        let tokens = tokenize("<p title=\"\0\">a\0b<!--\0-->").unwrap();
        assert_eq!(
            tokens,
            vec![
                start("p", &[("title", Some("\u{FFFD}"))]),
                Token::Text("a\u{FFFD}b".to_string()),
                Token::Comment("\u{FFFD}".to_string()),
            ]
        );
    }

    #[test]
    fn tokenize_handles_many_simple_tags_linearly() {
        let input = "<a></a>".repeat(20_000);
        assert_eq!(tokenize(&input).unwrap().len(), 40_000);
    }

    #[test]
    fn tokenize_handles_tons_of_angle_brackets() {
        let input = "<".repeat(200_000);
        let tokens = tokenize(&input).unwrap();
        assert_eq!(tokens, vec![Token::Text(input)]);
    }
}
