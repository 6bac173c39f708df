//! Lossless C# surface syntax
//!
//! A deliberately small syntax model: declarations down to attribute arguments
//! are structured, everything below is a token run. Trivia is attached to tokens
//! so any tree renders back to its exact source with `to_string()`.

pub mod lexer;
pub mod nodes;
pub mod parser;
pub mod token;
pub mod trivia;

#[cfg(test)]
pub(crate) mod testing;

pub use nodes::{
  Attribute, AttributeArgument, AttributeArgumentList, AttributeList, ClassDeclaration, CompilationUnit, Declaration,
  Member, MethodDeclaration, NamespaceDeclaration, SeparatedList, VerbatimMember,
};
pub use parser::parse;
pub use token::{Token, TokenKind};
pub use trivia::{Trivia, TriviaPiece};
