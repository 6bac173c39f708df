//! Lossless C# scanner
//!
//! Produces a flat token stream in which every byte of the input belongs to exactly
//! one token text or trivia piece, so concatenating the stream reproduces the input.
//! The scanner never fails: unterminated literals and comments simply run to the
//! end of the line or file.

use super::token::{Token, TokenKind};
use super::trivia::{Trivia, TriviaPiece};

/// Operators that must not be split, longest first
const COMPOUND_PUNCTUATION: &[&str] = &[
  "??=", "=>", "==", "!=", "<=", "&&", "||", "??", "::", "->", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
  "|=", "^=",
];

/// Tokenize `source`; the last token is always `TokenKind::EndOfFile`
pub fn tokenize(source: &str) -> Vec<Token> {
  Lexer { src: source, pos: 0 }.run()
}

struct Lexer<'a> {
  src: &'a str,
  pos: usize,
}

impl<'a> Lexer<'a> {
  fn rest(&self) -> &'a str {
    &self.src[self.pos..]
  }

  fn peek(&self) -> Option<char> {
    self.rest().chars().next()
  }

  fn peek_nth(&self, n: usize) -> Option<char> {
    self.rest().chars().nth(n)
  }

  fn bump(&mut self) -> Option<char> {
    let c = self.peek()?;
    self.pos += c.len_utf8();
    Some(c)
  }

  fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
    while let Some(c) = self.peek() {
      if !pred(c) {
        break;
      }
      self.pos += c.len_utf8();
    }
  }

  fn slice_from(&self, start: usize) -> String {
    self.src[start..self.pos].to_string()
  }

  fn run(mut self) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut line_start = true;

    loop {
      let leading = self.leading_trivia(line_start);

      if self.pos >= self.src.len() {
        tokens.push(Token {
          kind: TokenKind::EndOfFile,
          leading,
          text: String::new(),
          trailing: Trivia::none(),
        });
        break;
      }

      let start = self.pos;
      let kind = self.scan_token();
      let text = self.slice_from(start);
      let (trailing, ended_line) = self.trailing_trivia();
      line_start = ended_line;

      tokens.push(Token {
        kind,
        leading,
        text,
        trailing,
      });
    }

    tokens
  }

  // ==========================================================================
  // Trivia
  // ==========================================================================

  fn scan_end_of_line(&mut self) -> Option<TriviaPiece> {
    let start = self.pos;
    if self.rest().starts_with("\r\n") {
      self.pos += 2;
    } else if matches!(self.peek(), Some('\n') | Some('\r')) {
      self.pos += 1;
    } else {
      return None;
    }
    Some(TriviaPiece::EndOfLine(self.slice_from(start)))
  }

  fn scan_whitespace(&mut self) -> Option<TriviaPiece> {
    let start = self.pos;
    self.eat_while(is_inline_whitespace);
    (self.pos > start).then(|| TriviaPiece::Whitespace(self.slice_from(start)))
  }

  fn scan_comment(&mut self) -> Option<TriviaPiece> {
    let start = self.pos;
    if self.rest().starts_with("//") {
      self.eat_while(|c| c != '\n' && c != '\r');
      return Some(TriviaPiece::SingleLineComment(self.slice_from(start)));
    }
    if self.rest().starts_with("/*") {
      self.pos += 2;
      match self.rest().find("*/") {
        Some(end) => self.pos += end + 2,
        None => self.pos = self.src.len(),
      }
      return Some(TriviaPiece::MultiLineComment(self.slice_from(start)));
    }
    None
  }

  /// Trivia up to the next token; directives are only recognized at line start
  fn leading_trivia(&mut self, mut line_start: bool) -> Trivia {
    let mut trivia = Trivia::none();
    loop {
      if let Some(ws) = self.scan_whitespace() {
        trivia.push(ws);
      } else if let Some(eol) = self.scan_end_of_line() {
        trivia.push(eol);
        line_start = true;
      } else if let Some(comment) = self.scan_comment() {
        trivia.push(comment);
        line_start = false;
      } else if line_start && self.peek() == Some('#') {
        let start = self.pos;
        self.eat_while(|c| c != '\n' && c != '\r');
        trivia.push(TriviaPiece::Directive(self.slice_from(start)));
      } else {
        return trivia;
      }
    }
  }

  /// Same-line trivia after a token, including the line break that ends it
  fn trailing_trivia(&mut self) -> (Trivia, bool) {
    let mut trivia = Trivia::none();
    loop {
      if let Some(ws) = self.scan_whitespace() {
        trivia.push(ws);
      } else if let Some(eol) = self.scan_end_of_line() {
        trivia.push(eol);
        return (trivia, true);
      } else if let Some(comment) = self.scan_comment() {
        trivia.push(comment);
      } else {
        return (trivia, false);
      }
    }
  }

  // ==========================================================================
  // Tokens
  // ==========================================================================

  fn scan_token(&mut self) -> TokenKind {
    let Some(c) = self.peek() else {
      return TokenKind::EndOfFile;
    };
    let next = self.peek_nth(1);

    if is_string_start(c, next) {
      self.scan_string();
      return TokenKind::StringLiteral;
    }
    if c == '\'' {
      self.scan_char();
      return TokenKind::CharLiteral;
    }
    if is_identifier_start(c) || (c == '@' && next.is_some_and(is_identifier_start)) {
      self.bump();
      self.eat_while(is_identifier_part);
      return TokenKind::Identifier;
    }
    if c.is_ascii_digit() || (c == '.' && next.is_some_and(|n| n.is_ascii_digit())) {
      self.scan_number();
      return TokenKind::NumericLiteral;
    }
    if let Some(op) = COMPOUND_PUNCTUATION.iter().find(|op| self.rest().starts_with(*op)) {
      self.pos += op.len();
      return TokenKind::Punctuation;
    }

    self.bump();
    if c.is_ascii_punctuation() {
      TokenKind::Punctuation
    } else {
      TokenKind::Unknown
    }
  }

  fn scan_number(&mut self) {
    self.bump();
    loop {
      match self.peek() {
        Some(c) if c.is_ascii_alphanumeric() || c == '_' => {
          self.bump();
        }
        Some('.') if self.peek_nth(1).is_some_and(|n| n.is_ascii_digit()) => {
          self.bump();
        }
        _ => break,
      }
    }
  }

  fn scan_char(&mut self) {
    self.bump();
    loop {
      match self.peek() {
        None | Some('\n') | Some('\r') => break,
        Some('\\') => {
          self.bump();
          if !matches!(self.peek(), Some('\n') | Some('\r')) {
            self.bump();
          }
        }
        Some('\'') => {
          self.bump();
          break;
        }
        Some(_) => {
          self.bump();
        }
      }
    }
  }

  /// Regular, verbatim (`@`), interpolated (`$`) and raw (`"""`) strings
  fn scan_string(&mut self) {
    let mut verbatim = false;
    let mut interpolated = false;
    loop {
      match self.peek() {
        Some('@') => verbatim = true,
        Some('$') => interpolated = true,
        _ => break,
      }
      self.bump();
    }

    let quotes = self.rest().chars().take_while(|&c| c == '"').count();
    if quotes >= 3 && !verbatim {
      self.scan_raw_string(quotes);
      return;
    }

    self.bump();
    loop {
      match self.peek() {
        None => break,
        Some('"') => {
          self.bump();
          if verbatim && self.peek() == Some('"') {
            self.bump();
            continue;
          }
          break;
        }
        Some('\\') if !verbatim => {
          self.bump();
          if !matches!(self.peek(), Some('\n') | Some('\r')) {
            self.bump();
          }
        }
        Some('\n') | Some('\r') if !verbatim => break,
        Some('{') if interpolated => {
          self.bump();
          if self.peek() == Some('{') {
            self.bump();
          } else {
            self.scan_interpolation_hole();
          }
        }
        Some(_) => {
          self.bump();
        }
      }
    }
  }

  fn scan_raw_string(&mut self, quotes: usize) {
    let delimiter = "\"".repeat(quotes);
    self.pos += quotes;
    match self.rest().find(&delimiter) {
      Some(end) => {
        self.pos += end;
        // A raw literal closes on the longest quote run at its end
        self.eat_while(|c| c == '"');
      }
      None => self.pos = self.src.len(),
    }
  }

  /// Skip `{ expr }` inside an interpolated string, including nested literals
  fn scan_interpolation_hole(&mut self) {
    let mut depth = 1usize;
    while let Some(c) = self.peek() {
      let next = self.peek_nth(1);
      if is_string_start(c, next) {
        self.scan_string();
        continue;
      }
      match c {
        '\'' => self.scan_char(),
        '{' => {
          depth += 1;
          self.bump();
        }
        '}' => {
          depth -= 1;
          self.bump();
          if depth == 0 {
            return;
          }
        }
        _ => {
          self.bump();
        }
      }
    }
  }
}

fn is_inline_whitespace(c: char) -> bool {
  (c.is_whitespace() && c != '\n' && c != '\r') || c == '\u{feff}'
}

fn is_identifier_start(c: char) -> bool {
  c.is_alphabetic() || c == '_'
}

fn is_identifier_part(c: char) -> bool {
  c.is_alphanumeric() || c == '_'
}

fn is_string_start(c: char, next: Option<char>) -> bool {
  match c {
    '"' => true,
    '@' | '$' => matches!(next, Some('"') | Some('$') | Some('@')),
    _ => false,
  }
}
