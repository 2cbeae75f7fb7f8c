//! A scanner for the PostScript found in Type 1 font programs.
//!
//! Only tokens are produced, nothing is executed. Binary charstring data
//! following `RD` has to be read explicitly with [`Scanner::read_binary`].

use crate::stream::Stream;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token<'a> {
    Integer(i32),
    Real(f64),
    /// A literal name, without the leading slash.
    Name(&'a [u8]),
    /// An executable name.
    Operator(&'a [u8]),
    String(Vec<u8>),
    Boolean(bool),
    ArrayStart,
    ArrayEnd,
    ProcStart,
    ProcEnd,
    DictStart,
    DictEnd,
}

impl Token<'_> {
    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(f64::from(*i)),
            Self::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub(crate) fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub(crate) fn is_operator(&self, name: &[u8]) -> bool {
        matches!(self, Self::Operator(op) if *op == name)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Scanner<'a> {
    s: Stream<'a>,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self {
            s: Stream::new(data),
        }
    }

    pub(crate) fn peek_token(&self) -> Option<Token<'a>> {
        self.clone().next_token()
    }

    pub(crate) fn next_token(&mut self) -> Option<Token<'a>> {
        self.skip_whitespace_and_comments();

        let token = match self.s.peek_byte()? {
            b'/' => {
                self.s.advance(1);
                Token::Name(self.read_regular())
            }
            b'(' => {
                self.s.advance(1);
                Token::String(self.read_literal_string()?)
            }
            b'<' => {
                self.s.advance(1);

                if self.s.peek_byte() == Some(b'<') {
                    self.s.advance(1);
                    Token::DictStart
                } else {
                    Token::String(self.read_hex_string()?)
                }
            }
            b'>' => {
                self.s.advance(1);

                if self.s.peek_byte() == Some(b'>') {
                    self.s.advance(1);
                    Token::DictEnd
                } else {
                    Token::Operator(b">")
                }
            }
            b'[' => self.single(Token::ArrayStart),
            b']' => self.single(Token::ArrayEnd),
            b'{' => self.single(Token::ProcStart),
            b'}' => self.single(Token::ProcEnd),
            b')' => self.single(Token::Operator(b")")),
            _ => {
                let token = self.read_regular();

                if let Some(number) = parse_number(token) {
                    number
                } else {
                    match token {
                        b"true" => Token::Boolean(true),
                        b"false" => Token::Boolean(false),
                        _ => Token::Operator(token),
                    }
                }
            }
        };

        Some(token)
    }

    /// Reads the binary data following an `RD` operator. The single space
    /// separating the operator from the data is skipped.
    pub(crate) fn read_binary(&mut self, len: usize) -> Option<&'a [u8]> {
        self.s.advance(1);
        self.s.read_bytes(len)
    }

    /// Skips tokens until the operator `name` has been consumed.
    pub(crate) fn skip_past_operator(&mut self, name: &[u8]) -> bool {
        while let Some(token) = self.next_token() {
            if token.is_operator(name) {
                return true;
            }
        }

        false
    }

    fn single(&mut self, token: Token<'a>) -> Token<'a> {
        self.s.advance(1);
        token
    }

    fn read_regular(&mut self) -> &'a [u8] {
        let start = self.s.offset();
        self.s.forward_while(is_regular);

        self.s.range(start, self.s.offset()).unwrap_or_default()
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.s.forward_while(is_whitespace);

            if self.s.peek_byte() == Some(b'%') {
                self.s.forward_while(|b| !is_eol(b));
            } else {
                break;
            }
        }
    }

    fn read_literal_string(&mut self) -> Option<Vec<u8>> {
        let mut out = vec![];
        let mut depth = 0;

        loop {
            let b = self.s.read_byte()?;

            match b {
                b'(' => {
                    depth += 1;
                    out.push(b);
                }
                b')' => {
                    if depth == 0 {
                        return Some(out);
                    }

                    depth -= 1;
                    out.push(b);
                }
                b'\\' => {
                    let escaped = self.s.read_byte()?;

                    match escaped {
                        b'n' => out.push(b'\n'),
                        b'r' => out.push(b'\r'),
                        b't' => out.push(b'\t'),
                        b'b' => out.push(0x08),
                        b'f' => out.push(0x0C),
                        b'\r' => {
                            if self.s.peek_byte() == Some(b'\n') {
                                self.s.advance(1);
                            }
                        }
                        b'\n' => {}
                        b'0'..=b'7' => {
                            let mut value = u32::from(escaped - b'0');

                            for _ in 0..2 {
                                match self.s.peek_byte() {
                                    Some(d @ b'0'..=b'7') => {
                                        value = value * 8 + u32::from(d - b'0');
                                        self.s.advance(1);
                                    }
                                    _ => break,
                                }
                            }

                            out.push((value & 0xFF) as u8);
                        }
                        other => out.push(other),
                    }
                }
                _ => out.push(b),
            }
        }
    }

    fn read_hex_string(&mut self) -> Option<Vec<u8>> {
        let mut out = vec![];
        let mut high = None;

        loop {
            let b = self.s.read_byte()?;

            let nibble = match b {
                b'>' => break,
                b'0'..=b'9' => b - b'0',
                b'A'..=b'F' => b - b'A' + 10,
                b'a'..=b'f' => b - b'a' + 10,
                b if is_whitespace(b) => continue,
                _ => return None,
            };

            match high.take() {
                None => high = Some(nibble),
                Some(h) => out.push((h << 4) | nibble),
            }
        }

        if let Some(h) = high {
            out.push(h << 4);
        }

        Some(out)
    }
}

fn parse_number(token: &[u8]) -> Option<Token<'static>> {
    let str = core::str::from_utf8(token).ok()?;

    if let Some((base, digits)) = str.split_once('#') {
        let base = base.parse::<u32>().ok().filter(|b| (2..=36).contains(b))?;

        return i32::from_str_radix(digits, base).ok().map(Token::Integer);
    }

    let valid = token
        .iter()
        .all(|b| matches!(b, b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E'));

    if !valid || !token.iter().any(u8::is_ascii_digit) {
        return None;
    }

    if let Ok(i) = str.parse::<i32>() {
        return Some(Token::Integer(i));
    }

    // Integers that overflow become reals.
    str.parse::<f64>().ok().map(Token::Real)
}

#[inline(always)]
fn is_whitespace(b: u8) -> bool {
    matches!(b, 0x00 | 0x09 | 0x0a | 0x0c | 0x0d | 0x20)
}

#[inline(always)]
fn is_eol(b: u8) -> bool {
    matches!(b, 0x0a | 0x0d)
}

#[inline(always)]
fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

#[inline(always)]
fn is_regular(b: u8) -> bool {
    !is_whitespace(b) && !is_delimiter(b)
}
