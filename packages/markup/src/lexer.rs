//! Markup tokenizer.
//!
//! Produces a flat event stream (start tag, end tag, text) from an HTML
//! fragment. Comments and declarations are dropped, text is entity-decoded.
//! The tokenizer never fails: anything it cannot classify becomes text.

use logos::{Lexer, Logos};

#[derive(Logos, Debug, Clone, PartialEq)]
enum Token<'src> {
    #[token("<!--", comment)]
    Comment(&'src str),

    #[regex(r"<![a-zA-Z][^>]*>", |lex| lex.slice())]
    Declaration(&'src str),

    #[regex(r#"<[a-zA-Z][a-zA-Z0-9:-]*([^>"']|"[^"]*"|'[^']*')*>"#, |lex| lex.slice())]
    StartTag(&'src str),

    #[regex(r"</[a-zA-Z][a-zA-Z0-9:-]*[^>]*>", |lex| lex.slice())]
    EndTag(&'src str),

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),

    #[token("<")]
    Lt,
}

fn comment<'s>(lex: &mut Lexer<'s, Token<'s>>) -> &'s str {
    let rest = lex.remainder();
    let end = rest.find("-->").map(|i| i + 3).unwrap_or(rest.len());
    lex.bump(end);
    lex.slice()
}

/// Parsed start tag
#[derive(Debug, Clone, PartialEq)]
pub struct TagToken {
    /// Lowercased tag name
    pub name: String,
    /// Attributes in source order, names lowercased, values entity-decoded
    pub attributes: Vec<(String, String)>,
    pub self_closing: bool,
}

impl TagToken {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkupEvent {
    Start(TagToken),
    End(String),
    Text(String),
}

/// Tokenize an HTML fragment into events
pub fn tokenize(source: &str) -> Vec<MarkupEvent> {
    let mut events = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(token) = lexer.next() {
        match token {
            Ok(Token::Comment(_)) | Ok(Token::Declaration(_)) => {}
            Ok(Token::StartTag(slice)) => events.push(MarkupEvent::Start(parse_start_tag(slice))),
            Ok(Token::EndTag(slice)) => events.push(MarkupEvent::End(parse_end_tag(slice))),
            Ok(Token::Text(slice)) => push_text(&mut events, &decode_entities(slice)),
            Ok(Token::Lt) => push_text(&mut events, "<"),
            Err(()) => push_text(&mut events, lexer.slice()),
        }
    }

    events
}

fn push_text(events: &mut Vec<MarkupEvent>, text: &str) {
    if let Some(MarkupEvent::Text(last)) = events.last_mut() {
        last.push_str(text);
    } else {
        events.push(MarkupEvent::Text(text.to_string()));
    }
}

fn parse_end_tag(slice: &str) -> String {
    slice
        .trim_start_matches("</")
        .trim_end_matches('>')
        .split(|c: char| c.is_whitespace())
        .next()
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn parse_start_tag(slice: &str) -> TagToken {
    let inner = &slice[1..slice.len() - 1];
    let self_closing = inner.trim_end().ends_with('/');
    let inner = inner.trim_end().trim_end_matches('/');

    let name_end = inner
        .find(|c: char| c.is_whitespace())
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_ascii_lowercase();

    TagToken {
        name,
        attributes: parse_attributes(&inner[name_end..]),
        self_closing,
    }
}

fn parse_attributes(source: &str) -> Vec<(String, String)> {
    let chars: Vec<char> = source.chars().collect();
    let mut attributes = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        while i < chars.len() && (chars[i].is_whitespace() || chars[i] == '/') {
            i += 1;
        }
        if i >= chars.len() {
            break;
        }

        let name_start = i;
        while i < chars.len() && !chars[i].is_whitespace() && chars[i] != '=' && chars[i] != '/' {
            i += 1;
        }
        let name: String = chars[name_start..i].iter().collect::<String>().to_ascii_lowercase();

        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }

        let mut value = String::new();
        if i < chars.len() && chars[i] == '=' {
            i += 1;
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            if i < chars.len() && (chars[i] == '"' || chars[i] == '\'') {
                let quote = chars[i];
                i += 1;
                let value_start = i;
                while i < chars.len() && chars[i] != quote {
                    i += 1;
                }
                value = chars[value_start..i].iter().collect();
                i += 1;
            } else {
                let value_start = i;
                while i < chars.len() && !chars[i].is_whitespace() {
                    i += 1;
                }
                value = chars[value_start..i].iter().collect();
            }
        }

        if !name.is_empty() {
            attributes.push((name, decode_entities(&value)));
        }
    }

    attributes
}

/// Decode the common named entities and numeric character references
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        let decoded = rest.find(';').filter(|&end| end <= 10).and_then(|end| {
            let entity = &rest[1..end];
            decode_entity(entity).map(|c| (c, end + 1))
        });

        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                entity.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(name: &str) -> TagToken {
        TagToken {
            name: name.to_string(),
            attributes: Vec::new(),
            self_closing: false,
        }
    }

    #[test]
    fn test_tokenize_simple_fragment() {
        let events = tokenize("<p>Hello <b>world</b></p>");
        assert_eq!(
            events,
            vec![
                MarkupEvent::Start(start("p")),
                MarkupEvent::Text("Hello ".to_string()),
                MarkupEvent::Start(start("b")),
                MarkupEvent::Text("world".to_string()),
                MarkupEvent::End("b".to_string()),
                MarkupEvent::End("p".to_string()),
            ]
        );
    }

    #[test]
    fn test_attributes_quoted_and_bare() {
        let events = tokenize(r#"<a HREF="/x?a=1&amp;b=2" target=_blank data-x='y > z'>"#);
        match &events[0] {
            MarkupEvent::Start(tag) => {
                assert_eq!(tag.name, "a");
                assert_eq!(tag.attr("href"), Some("/x?a=1&b=2"));
                assert_eq!(tag.attr("target"), Some("_blank"));
                assert_eq!(tag.attr("data-x"), Some("y > z"));
            }
            other => panic!("Expected start tag, got {:?}", other),
        }
    }

    #[test]
    fn test_self_closing_tag() {
        let events = tokenize("<br/><img src=\"a.png\" />");
        match (&events[0], &events[1]) {
            (MarkupEvent::Start(br), MarkupEvent::Start(img)) => {
                assert!(br.self_closing);
                assert!(img.self_closing);
                assert_eq!(img.attr("src"), Some("a.png"));
            }
            other => panic!("Unexpected events {:?}", other),
        }
    }

    #[test]
    fn test_comments_and_doctype_dropped() {
        let events = tokenize("<!DOCTYPE html><!-- a > b -->text");
        assert_eq!(events, vec![MarkupEvent::Text("text".to_string())]);
    }

    #[test]
    fn test_stray_angle_bracket_is_text() {
        let events = tokenize("a < b");
        assert_eq!(events, vec![MarkupEvent::Text("a < b".to_string())]);
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("&lt;b&gt; &amp; &#65;&#x42;"), "<b> & AB");
        assert_eq!(decode_entities("fish & chips"), "fish & chips");
        assert_eq!(decode_entities("&unknown;"), "&unknown;");
    }
}
