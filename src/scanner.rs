use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};

use crate::error::{Reporter, ScanError};
use crate::literal::Literal;
use crate::token::{Kind, Location, Token};

/// Converts source text into a flat token stream. Lines and columns are
/// 1-based throughout, matching the `[line:column]` error prefixes in
/// SPEC_FULL.md §6. Comments (`//` and `/* */`) are emitted as `Kind::Comment`
/// tokens rather than silently dropped, so every byte of source is accounted
/// for by some token's lexeme; the driver filters them out before parsing.
pub struct Scanner<'a> {
    source: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
    column_offset: usize,
    reporter: &'a Reporter,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, reporter: &'a Reporter) -> Scanner<'a> {
        Scanner {
            source: source.chars().peekmore(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
            column_offset: 0,
            reporter,
        }
    }

    pub fn scan_tokens(mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens.push(Token::new(
            Kind::EOF,
            String::new(),
            None,
            Location::new(self.line, self.current - self.column_offset + 1),
        ));

        self.tokens
    }

    fn advance(&mut self) -> char {
        let c = self.source.next().expect("advance past end of source");
        self.current += 1;
        c
    }

    fn peek(&mut self) -> char {
        self.source.peek().copied().unwrap_or('\0')
    }

    fn peek_next(&mut self) -> char {
        self.source.peek_next().copied().unwrap_or('\0')
    }

    fn match_next(&mut self, expected: char) -> bool {
        if self.peek_next() == expected {
            true
        } else {
            false
        }
    }

    fn column(&self) -> usize {
        self.start - self.column_offset + 1
    }

    fn add_token(&mut self, kind: Kind, lexeme: String, literal: Option<Literal>) {
        let location = Location::new(self.line, self.column());
        self.tokens.push(Token::new(kind, lexeme, literal, location));
    }

    fn add_single_char_token(&mut self, kind: Kind) {
        let c = self.advance();
        self.add_token(kind, c.to_string(), None);
    }

    fn add_double_char_token(&mut self, kind: Kind) {
        let first = self.advance();
        let second = self.advance();
        self.add_token(kind, format!("{first}{second}"), None);
    }

    fn is_at_end(&mut self) -> bool {
        self.source.peek().is_none()
    }

    fn string(&mut self) {
        self.advance(); // opening quote
        let location = Location::new(self.line, self.column());

        let mut value = Vec::new();
        while !self.is_at_end() && self.peek() != '"' {
            let c = self.advance();
            if c == '\n' {
                self.line += 1;
                self.column_offset = self.current;
            }
            value.push(c);
        }

        if self.is_at_end() {
            self.reporter.report_scan(&ScanError::new(location, "Unterminated string."));
            return;
        }

        self.advance(); // closing quote

        let value: String = value.into_iter().collect();
        let lexeme = format!("\"{value}\"");
        self.add_token(Kind::String, lexeme, Some(Literal::String(value)));
    }

    fn number(&mut self) {
        let mut value = Vec::new();

        while self.peek().is_ascii_digit() {
            value.push(self.advance());
        }

        // A trailing dot with no fractional digits is not part of this
        // number — leave it for the parser to scan as `Dot` (e.g. `123.`
        // followed by a method call is legal on numbers-as-objects in some
        // Lox dialects, and is at worst a clean separate token here).
        if self.peek() == '.' {
            if self.peek_next().is_ascii_digit() {
                value.push(self.advance()); // consume the dot
                while self.peek().is_ascii_digit() {
                    value.push(self.advance());
                }
            } else {
                self.source.reset_cursor();
            }
        }

        let lexeme: String = value.into_iter().collect();
        let number: f64 = lexeme.parse().expect("scanned digits form a valid f64");
        self.add_token(Kind::Number, lexeme, Some(Literal::Number(number)));
    }

    fn identifier(&mut self) {
        let mut value = Vec::new();

        while self.peek().is_alphanumeric() || self.peek() == '_' {
            value.push(self.advance());
        }

        let lexeme: String = value.into_iter().collect();
        let kind = match lexeme.as_str() {
            "and" => Kind::And,
            "class" => Kind::Class,
            "else" => Kind::Else,
            "false" => Kind::False,
            "for" => Kind::For,
            "fun" => Kind::Fun,
            "if" => Kind::If,
            "nil" => Kind::Nil,
            "or" => Kind::Or,
            "print" => Kind::Print,
            "return" => Kind::Return,
            "super" => Kind::Super,
            "this" => Kind::This,
            "true" => Kind::True,
            "var" => Kind::Var,
            "while" => Kind::While,
            _ => Kind::Identifier,
        };

        self.add_token(kind, lexeme, None);
    }

    fn line_comment(&mut self) {
        let mut lexeme = String::new();
        while self.peek() != '\n' && !self.is_at_end() {
            lexeme.push(self.advance());
        }
        self.add_token(Kind::Comment, lexeme, None);
    }

    fn block_comment(&mut self) {
        let location = Location::new(self.line, self.column());
        let mut lexeme = String::from("/*");
        self.advance();
        self.advance();

        loop {
            if self.is_at_end() {
                self.reporter.report_scan(&ScanError::new(location, "Unterminated block comment."));
                return;
            }
            if self.peek() == '*' && self.peek_next() == '/' {
                lexeme.push(self.advance());
                lexeme.push(self.advance());
                break;
            }
            let c = self.advance();
            if c == '\n' {
                self.line += 1;
                self.column_offset = self.current;
            }
            lexeme.push(c);
        }

        self.add_token(Kind::Comment, lexeme, None);
    }

    fn scan_token(&mut self) {
        let c = self.peek();
        match c {
            '(' => self.add_single_char_token(Kind::LeftParen),
            ')' => self.add_single_char_token(Kind::RightParen),
            '{' => self.add_single_char_token(Kind::LeftBrace),
            '}' => self.add_single_char_token(Kind::RightBrace),
            ',' => self.add_single_char_token(Kind::Comma),
            '.' => self.add_single_char_token(Kind::Dot),
            '-' => self.add_single_char_token(Kind::Minus),
            '+' => self.add_single_char_token(Kind::Plus),
            ';' => self.add_single_char_token(Kind::Semicolon),
            '*' => self.add_single_char_token(Kind::Star),

            '!' => {
                if self.match_next('=') {
                    self.add_double_char_token(Kind::BangEqual);
                } else {
                    self.add_single_char_token(Kind::Bang);
                }
            }
            '=' => {
                if self.match_next('=') {
                    self.add_double_char_token(Kind::EqualEqual);
                } else {
                    self.add_single_char_token(Kind::Equal);
                }
            }
            '<' => {
                if self.match_next('=') {
                    self.add_double_char_token(Kind::LessEqual);
                } else {
                    self.add_single_char_token(Kind::Less);
                }
            }
            '>' => {
                if self.match_next('=') {
                    self.add_double_char_token(Kind::GreaterEqual);
                } else {
                    self.add_single_char_token(Kind::Greater);
                }
            }
            '/' => {
                if self.match_next('/') {
                    self.line_comment();
                } else if self.match_next('*') {
                    self.block_comment();
                } else {
                    self.add_single_char_token(Kind::Slash);
                }
            }

            ' ' | '\r' | '\t' => {
                self.advance();
            }

            '\n' => {
                self.advance();
                self.line += 1;
                self.column_offset = self.current;
            }

            '"' => self.string(),

            c if c.is_ascii_digit() => self.number(),
            c if c.is_alphabetic() || c == '_' => self.identifier(),

            _ => {
                let location = Location::new(self.line, self.column());
                self.advance();
                self.reporter.report_scan(&ScanError::new(location, format!("Unexpected character: {c}")));
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn scan(source: &str) -> (Vec<Token>, Reporter) {
        let reporter = Reporter::new();
        let tokens = Scanner::new(source, &reporter).scan_tokens();
        (tokens, reporter)
    }

    #[test]
    fn scans_single_and_double_char_tokens() {
        let (tokens, reporter) = scan("(){}!=<=!");
        assert!(!reporter.had_error());
        let kinds: Vec<Kind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                Kind::LeftParen, Kind::RightParen, Kind::LeftBrace, Kind::RightBrace,
                Kind::BangEqual, Kind::LessEqual, Kind::Bang, Kind::EOF,
            ]
        );
    }

    #[test]
    fn scans_numbers_as_f64() {
        let (tokens, _) = scan("123.45");
        assert_eq!(tokens[0].literal, Some(Literal::Number(123.45)));
    }

    #[test]
    fn trailing_dot_does_not_error_or_consume() {
        let (tokens, reporter) = scan("123.");
        assert!(!reporter.had_error());
        let kinds: Vec<Kind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![Kind::Number, Kind::Dot, Kind::EOF]);
    }

    #[test]
    fn line_comment_is_emitted_as_comment_token() {
        let (tokens, _) = scan("// hello\nvar");
        assert_eq!(tokens[0].kind, Kind::Comment);
        assert_eq!(tokens[1].kind, Kind::Var);
        assert_eq!(tokens[1].location.line, 2);
    }

    #[test]
    fn block_comment_spans_multiple_lines() {
        let (tokens, reporter) = scan("/* one\ntwo */ var");
        assert!(!reporter.had_error());
        assert_eq!(tokens[0].kind, Kind::Comment);
        assert_eq!(tokens[1].kind, Kind::Var);
        assert_eq!(tokens[1].location.line, 2);
    }

    #[test]
    fn unterminated_string_reports_error() {
        let (_, reporter) = scan("\"unterminated");
        assert!(reporter.had_error());
    }

    #[test]
    fn unexpected_character_reports_with_colon_format() {
        let (_, reporter) = scan("@");
        assert!(reporter.had_error());
    }

    #[test]
    fn keywords_are_recognized() {
        let (tokens, _) = scan("and class nil");
        let kinds: Vec<Kind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![Kind::And, Kind::Class, Kind::Nil, Kind::EOF]);
    }

    #[test]
    fn locations_are_one_based() {
        let (tokens, _) = scan("var");
        assert_eq!(tokens[0].location, Location::new(1, 1));
    }
}
