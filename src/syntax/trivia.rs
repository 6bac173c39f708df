//! Trivia: the whitespace, comments and directives that ride along with tokens
//!
//! Ownership follows the Roslyn convention so that removing a node never strands
//! formatting belonging to its neighbours:
//!
//! - **trailing trivia** of a token is everything on the same line after it, up to
//!   and including the end-of-line
//! - **leading trivia** of a token is everything between the previous token's
//!   trailing trivia and the token itself (blank lines, indentation, doc comments,
//!   `#region` directives)

use std::fmt;

/// A single piece of trivia
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TriviaPiece {
  /// Spaces and tabs
  Whitespace(String),
  /// `\n`, `\r\n` or `\r`
  EndOfLine(String),
  /// `// ...` up to (not including) the line break
  SingleLineComment(String),
  /// `/* ... */`, possibly spanning lines
  MultiLineComment(String),
  /// `#region`, `#if`, `#pragma` ... up to (not including) the line break
  Directive(String),
}

impl TriviaPiece {
  pub fn text(&self) -> &str {
    match self {
      TriviaPiece::Whitespace(s)
      | TriviaPiece::EndOfLine(s)
      | TriviaPiece::SingleLineComment(s)
      | TriviaPiece::MultiLineComment(s)
      | TriviaPiece::Directive(s) => s,
    }
  }
}

/// An ordered run of trivia pieces
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Trivia {
  pieces: Vec<TriviaPiece>,
}

impl Trivia {
  pub fn new(pieces: Vec<TriviaPiece>) -> Self {
    Self { pieces }
  }

  /// Empty trivia
  pub fn none() -> Self {
    Self::default()
  }

  /// A single space, the separator used after synthesized commas
  pub fn space() -> Self {
    Self::new(vec![TriviaPiece::Whitespace(" ".to_string())])
  }

  pub fn pieces(&self) -> &[TriviaPiece] {
    &self.pieces
  }

  pub fn is_empty(&self) -> bool {
    self.pieces.is_empty()
  }

  pub fn push(&mut self, piece: TriviaPiece) {
    self.pieces.push(piece);
  }

  /// True when the run finishes with a line break
  pub fn ends_line(&self) -> bool {
    matches!(self.pieces.last(), Some(TriviaPiece::EndOfLine(_)))
  }

  /// The run without the spaces and tabs at its end (the indentation in front of
  /// the token that owns it)
  pub fn without_indentation(&self) -> Trivia {
    let keep = self
      .pieces
      .iter()
      .rposition(|p| !matches!(p, TriviaPiece::Whitespace(_)))
      .map_or(0, |i| i + 1);
    Self::new(self.pieces[..keep].to_vec())
  }

  /// `self` followed by `rest`
  pub fn concat(&self, rest: &Trivia) -> Trivia {
    let mut pieces = self.pieces.clone();
    pieces.extend(rest.pieces.iter().cloned());
    Self::new(pieces)
  }

  /// Total length in bytes of the rendered trivia
  pub fn len(&self) -> usize {
    self.pieces.iter().map(|p| p.text().len()).sum()
  }
}

impl fmt::Display for Trivia {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for piece in &self.pieces {
      f.write_str(piece.text())?;
    }
    Ok(())
  }
}
