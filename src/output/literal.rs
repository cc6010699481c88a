//! Structured-literal codec for the `content:` field of batch files
//!
//! Content is written as a single-line literal mapping in the style of a
//! Python `repr` of a dict:
//!
//! ```text
//! {'text': ['Intro', "It's fast"], 'code_blocks': [{'language': 'python', 'code': 'print(1)\n'}]}
//! ```
//!
//! Strings use single quotes unless they contain `'` and no `"`. Backslashes,
//! the active quote, line breaks, tabs and other control characters are
//! escaped, so a record never spans more than one line.

use crate::document::{CodeBlock, PageContent};
use crate::output::traits::{OutputError, OutputResult};
use std::fmt::Write;

/// Encodes page content as a one-line literal mapping
pub fn encode_content(content: &PageContent) -> String {
    let mut out = String::from("{'text': [");
    for (i, fragment) in content.text.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        push_quoted(&mut out, fragment);
    }
    out.push_str("], 'code_blocks': [");
    for (i, block) in content.code_blocks.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str("{'language': ");
        push_quoted(&mut out, &block.language);
        out.push_str(", 'code': ");
        push_quoted(&mut out, &block.code);
        out.push('}');
    }
    out.push_str("]}");
    out
}

/// Quotes and escapes a string literal
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    push_quoted(&mut out, s);
    out
}

fn push_quoted(out: &mut String, s: &str) {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c == '\x7f' => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            '\u{2028}' | '\u{2029}' | '\u{85}' => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}

/// A parsed literal value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Str(String),
    List(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a string key in a dict literal
    fn get(&self, key: &str) -> Option<&Literal> {
        match self {
            Self::Dict(entries) => entries
                .iter()
                .find(|(k, _)| k.as_str() == Some(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Dict(_) => "dict",
        }
    }
}

/// Parses a literal (dict, list or string), rejecting trailing input
pub fn parse_literal(input: &str) -> OutputResult<Literal> {
    let mut parser = Parser::new(input);
    let value = parser.value()?;
    parser.skip_whitespace();
    if parser.pos < parser.chars.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

/// Decodes a `content:` literal back into page content
///
/// Missing `text` or `code_blocks` keys decode as empty lists, as do missing
/// `language` / `code` keys inside a block.
pub fn decode_content(input: &str) -> OutputResult<PageContent> {
    let literal = parse_literal(input)?;
    if !matches!(literal, Literal::Dict(_)) {
        return Err(shape_error(format!("expected dict, found {}", literal.kind())));
    }

    let text = match literal.get("text") {
        None => Vec::new(),
        Some(Literal::List(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| shape_error(format!("text item is a {}", item.kind())))
            })
            .collect::<OutputResult<Vec<_>>>()?,
        Some(other) => return Err(shape_error(format!("'text' is a {}", other.kind()))),
    };

    let code_blocks = match literal.get("code_blocks") {
        None => Vec::new(),
        Some(Literal::List(items)) => items
            .iter()
            .map(decode_code_block)
            .collect::<OutputResult<Vec<_>>>()?,
        Some(other) => {
            return Err(shape_error(format!("'code_blocks' is a {}", other.kind())))
        }
    };

    Ok(PageContent { text, code_blocks })
}

fn decode_code_block(item: &Literal) -> OutputResult<CodeBlock> {
    if !matches!(item, Literal::Dict(_)) {
        return Err(shape_error(format!("code block is a {}", item.kind())));
    }
    let field = |key: &str| -> OutputResult<String> {
        match item.get(key) {
            None => Ok(String::new()),
            Some(Literal::Str(s)) => Ok(s.clone()),
            Some(other) => Err(shape_error(format!("'{}' is a {}", key, other.kind()))),
        }
    };
    Ok(CodeBlock {
        language: field("language")?,
        code: field("code")?,
    })
}

fn shape_error(message: String) -> OutputError {
    OutputError::Literal {
        position: 0,
        message,
    }
}

/// Recursive-descent parser over the input's characters
struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> OutputError {
        OutputError::Literal {
            position: self.pos,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> OutputResult<()> {
        match self.next() {
            Some(c) if c == expected => Ok(()),
            Some(c) => {
                self.pos -= 1;
                Err(self.error(format!("expected '{}', found '{}'", expected, c)))
            }
            None => Err(self.error(format!("expected '{}', found end of input", expected))),
        }
    }

    fn value(&mut self) -> OutputResult<Literal> {
        self.skip_whitespace();
        match self.peek() {
            Some('{') => self.dict(),
            Some('[') => self.list(),
            Some('\'') | Some('"') => self.string().map(Literal::Str),
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    /// Parses `open item (, item)* ,? close`, calling `item` for each element
    fn sequence<T>(
        &mut self,
        open: char,
        close: char,
        mut item: impl FnMut(&mut Self) -> OutputResult<T>,
    ) -> OutputResult<Vec<T>> {
        self.expect(open)?;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(items);
            }
            items.push(item(self)?);
            self.skip_whitespace();
            match self.next() {
                Some(',') => continue,
                Some(c) if c == close => return Ok(items),
                Some(c) => {
                    self.pos -= 1;
                    return Err(self.error(format!("expected ',' or '{}', found '{}'", close, c)));
                }
                None => return Err(self.error(format!("unterminated '{}'", open))),
            }
        }
    }

    fn list(&mut self) -> OutputResult<Literal> {
        self.sequence('[', ']', Self::value).map(Literal::List)
    }

    fn dict(&mut self) -> OutputResult<Literal> {
        self.sequence('{', '}', |p| {
            let key = p.value()?;
            p.skip_whitespace();
            p.expect(':')?;
            let value = p.value()?;
            Ok((key, value))
        })
        .map(Literal::Dict)
    }

    fn string(&mut self) -> OutputResult<String> {
        let quote = self.next().ok_or_else(|| self.error("expected string"))?;
        let mut out = String::new();
        loop {
            match self.next() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => self.escape(&mut out)?,
                Some(c) => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> OutputResult<()> {
        let c = self
            .next()
            .ok_or_else(|| self.error("unterminated escape sequence"))?;
        match c {
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            '0' => out.push('\0'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'v' => out.push('\x0b'),
            '\n' => {}
            'x' => out.push(self.hex_char(2)?),
            'u' => out.push(self.hex_char(4)?),
            'U' => out.push(self.hex_char(8)?),
            // Unknown escapes are kept verbatim
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_char(&mut self, digits: usize) -> OutputResult<char> {
        let start = self.pos;
        let end = start + digits;
        if end > self.chars.len() {
            return Err(self.error("truncated hex escape"));
        }
        let hex: String = self.chars[start..end].iter().collect();
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(self.error(format!("invalid hex escape '{}'", hex)));
        }
        let code = u32::from_str_radix(&hex, 16)
            .map_err(|_| self.error(format!("invalid hex escape '{}'", hex)))?;
        self.pos = end;
        char::from_u32(code).ok_or_else(|| self.error(format!("invalid code point {:#x}", code)))
    }
}
