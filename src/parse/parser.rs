//! Recursive-descent parser for processes and domain length declarations
//!
//! Process grammar:
//!
//! ```text
//! process ::= strand | '(' strand { '|' strand }* ')'
//! strand  ::= '<' domain+ '>'
//! domain  ::= name [ '^' ] [ '*' ] [ '!' label ]
//! ```
//!
//! Length declarations are a flat sequence of
//! `toeholdDomain NAME length INT` / `longDomain NAME length INT`.

use super::lexer::{tokenize, Lexeme, Token};
use super::ParseError;
use crate::graph::{Domain, DomainLengths, Process, Strand};

struct TokenStream {
    lexemes: Vec<Lexeme>,
    pos: usize,
}

impl TokenStream {
    fn new(input: &str) -> Result<Self, ParseError> {
        Ok(Self { lexemes: tokenize(input)?, pos: 0 })
    }

    fn peek(&self) -> Option<&Lexeme> {
        self.lexemes.get(self.pos)
    }

    fn next(&mut self) -> Option<Lexeme> {
        let lexeme = self.lexemes.get(self.pos).cloned();
        if lexeme.is_some() {
            self.pos += 1;
        }
        lexeme
    }

    fn expect(&mut self, token: &Token, expected: &str) -> Result<Lexeme, ParseError> {
        match self.next() {
            Some(l) if &l.token == token => Ok(l),
            Some(l) => Err(ParseError::Syntax {
                found: l.token.to_string(),
                expected: expected.to_string(),
                line: l.line,
            }),
            None => Err(ParseError::UnexpectedEof { expected: expected.to_string() }),
        }
    }

    fn expect_name(&mut self, expected: &str) -> Result<(String, usize), ParseError> {
        match self.next() {
            Some(Lexeme { token: Token::Name(name), line }) => Ok((name, line)),
            Some(l) => Err(ParseError::Syntax {
                found: l.token.to_string(),
                expected: expected.to_string(),
                line: l.line,
            }),
            None => Err(ParseError::UnexpectedEof { expected: expected.to_string() }),
        }
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek().map(|l| &l.token) == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        match self.peek() {
            None => Ok(()),
            Some(l) => Err(ParseError::Syntax {
                found: l.token.to_string(),
                expected: "end of input".to_string(),
                line: l.line,
            }),
        }
    }
}

/// Parse a process from its textual notation
pub fn parse_process(input: &str) -> Result<Process, ParseError> {
    let mut stream = TokenStream::new(input)?;
    let process = parse_process_inner(&mut stream)?;
    stream.expect_end()?;
    Ok(process)
}

fn parse_process_inner(stream: &mut TokenStream) -> Result<Process, ParseError> {
    if stream.eat(&Token::LParen) {
        let mut strands = vec![parse_strand(stream)?];
        while stream.eat(&Token::Bar) {
            strands.push(parse_strand(stream)?);
        }
        stream.expect(&Token::RParen, "')'")?;
        Ok(Process::new(strands))
    } else {
        let strand = parse_strand(stream)?;
        Ok(Process::new(vec![strand]))
    }
}

fn parse_strand(stream: &mut TokenStream) -> Result<Strand, ParseError> {
    stream.expect(&Token::LAngle, "'<'")?;
    let mut domains = vec![parse_domain(stream)?];
    while matches!(stream.peek().map(|l| &l.token), Some(Token::Name(_))) {
        domains.push(parse_domain(stream)?);
    }
    stream.expect(&Token::RAngle, "'>'")?;
    Ok(Strand::new(domains))
}

fn parse_domain(stream: &mut TokenStream) -> Result<Domain, ParseError> {
    let (name, _) = stream.expect_name("domain name")?;
    let is_toehold = stream.eat(&Token::Caret);
    let is_complement = stream.eat(&Token::Asterisk);
    let bond = if stream.eat(&Token::Bang) {
        let (label, _) = stream.expect_name("bond label")?;
        Some(label)
    } else {
        None
    };
    Ok(Domain::new(name, is_toehold, is_complement, bond))
}

/// Parse a whitespace-separated sequence of domain length declarations
pub fn parse_domain_lengths(input: &str) -> Result<DomainLengths, ParseError> {
    let mut stream = TokenStream::new(input)?;
    let mut lengths = DomainLengths::new();
    while stream.peek().is_some() {
        let (keyword, line) = stream.expect_name("'toeholdDomain' or 'longDomain'")?;
        let is_toehold = match keyword.as_str() {
            "toeholdDomain" => true,
            "longDomain" => false,
            other => {
                return Err(ParseError::Syntax {
                    found: format!("\"{}\"", other),
                    expected: "'toeholdDomain' or 'longDomain'".to_string(),
                    line,
                })
            }
        };
        let (name, _) = stream.expect_name("domain name")?;
        let (length_kw, kw_line) = stream.expect_name("'length'")?;
        if length_kw != "length" {
            return Err(ParseError::Syntax {
                found: format!("\"{}\"", length_kw),
                expected: "'length'".to_string(),
                line: kw_line,
            });
        }
        let (digits, digits_line) = stream.expect_name("nucleotide count")?;
        let nt: u32 = digits
            .parse()
            .map_err(|_| ParseError::BadLength { text: digits.clone(), line: digits_line })?;
        lengths.declare(name, nt, is_toehold);
    }
    Ok(lengths)
}
