//! Tree lookups shared by unit tests

use super::{ClassDeclaration, CompilationUnit, Declaration, MethodDeclaration, Trivia, TriviaPiece};
use std::sync::Arc;

/// First method with the given name, depth-first
pub fn find_method<'a>(unit: &'a CompilationUnit, name: &str) -> Option<&'a Arc<MethodDeclaration>> {
  unit.methods().into_iter().find(|m| m.name == name)
}

/// First class with the given name, depth-first
pub fn find_class<'a>(unit: &'a CompilationUnit, name: &str) -> Option<&'a Arc<ClassDeclaration>> {
  unit.classes().into_iter().find(|c| c.name == name)
}

/// Trivia in front of the whole declaration, attribute lists included
pub fn leading_trivia<D: Declaration>(decl: &D) -> Trivia {
  match decl.attribute_lists().first() {
    Some(list) => list.leading_trivia().clone(),
    None => decl.signature_leading(),
  }
}

pub fn has_comments(trivia: &Trivia) -> bool {
  trivia
    .pieces()
    .iter()
    .any(|p| matches!(p, TriviaPiece::SingleLineComment(_) | TriviaPiece::MultiLineComment(_)))
}
