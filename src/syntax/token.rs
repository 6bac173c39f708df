//! Tokens with their attached trivia

use super::trivia::Trivia;
use std::fmt;

/// Coarse token classification
///
/// The scanner only needs enough detail to find declaration boundaries; keywords
/// are identifiers and are recognized by text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
  Identifier,
  Punctuation,
  StringLiteral,
  CharLiteral,
  NumericLiteral,
  /// Zero-width token carrying the trivia at the end of the document
  EndOfFile,
  /// Placeholder for a token the source never closed (e.g. a missing `}`)
  Missing,
  /// Anything the scanner could not classify (stray `\` or non-ASCII punctuation)
  Unknown,
}

/// A token: text plus leading and trailing trivia
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
  pub kind: TokenKind,
  pub leading: Trivia,
  pub text: String,
  pub trailing: Trivia,
}

impl Token {
  /// A synthesized token with no trivia
  pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
    Self {
      kind,
      leading: Trivia::none(),
      text: text.into(),
      trailing: Trivia::none(),
    }
  }

  pub fn identifier(text: impl Into<String>) -> Self {
    Self::new(TokenKind::Identifier, text)
  }

  pub fn punct(text: impl Into<String>) -> Self {
    Self::new(TokenKind::Punctuation, text)
  }

  pub fn missing() -> Self {
    Self::new(TokenKind::Missing, "")
  }

  pub fn is(&self, text: &str) -> bool {
    self.text == text && !matches!(self.kind, TokenKind::StringLiteral | TokenKind::CharLiteral)
  }

  pub fn is_identifier(&self) -> bool {
    self.kind == TokenKind::Identifier
  }

  pub fn with_leading(mut self, leading: Trivia) -> Self {
    self.leading = leading;
    self
  }

  pub fn with_trailing(mut self, trailing: Trivia) -> Self {
    self.trailing = trailing;
    self
  }
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}{}", self.leading, self.text, self.trailing)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_string_literal_is_never_punctuation() {
    let literal = Token::new(TokenKind::StringLiteral, "=");
    assert!(!literal.is("="));
    assert!(Token::punct("=").is("="));
  }
}
