//! Immutable syntax nodes
//!
//! Every node is a plain value with structural equality (`PartialEq`). Nodes that
//! can be replaced during a rewrite live behind an `Arc`, so a rewrite that
//! touches one method rebuilds only that method and its ancestors; everything
//! else is shared with the original tree. `Arc::ptr_eq` on the root is the
//! "nothing changed" signal the driver relies on.
//!
//! `with_*` methods never mutate: they return a new node.

use super::token::Token;
use super::trivia::Trivia;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Separated lists
// ============================================================================

/// Items separated by comma tokens
///
/// Invariant: `separators.len()` is `items.len() - 1`, or `items.len()` when the
/// source carries a trailing separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatedList<T> {
  items: Vec<T>,
  separators: Vec<Token>,
}

impl<T: Clone> SeparatedList<T> {
  pub fn new(items: Vec<T>, separators: Vec<Token>) -> Self {
    debug_assert!(
      separators.len() + 1 == items.len() || separators.len() == items.len(),
      "separator count out of range"
    );
    Self { items, separators }
  }

  pub fn single(item: T) -> Self {
    Self {
      items: vec![item],
      separators: Vec::new(),
    }
  }

  pub fn items(&self) -> &[T] {
    &self.items
  }

  pub fn separators(&self) -> &[Token] {
    &self.separators
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, T> {
    self.items.iter()
  }

  /// Remove every item matching `remove`, together with one adjacent separator
  ///
  /// The separator following a removed item goes with it; a removed last item
  /// takes the separator before it instead. Trivia on removed tokens is dropped
  /// (Roslyn's `KeepNoTrivia`), so `[Ignore, Fact]` becomes `[Fact]`.
  pub fn remove_where(&self, remove: impl Fn(&T) -> bool) -> Self {
    let mut kept: Vec<(T, Option<Token>)> = Vec::with_capacity(self.items.len());
    for (i, item) in self.items.iter().enumerate() {
      let separator = self.separators.get(i).cloned();
      if remove(item) {
        if separator.is_none()
          && let Some(previous) = kept.last_mut()
        {
          previous.1 = None;
        }
      } else {
        kept.push((item.clone(), separator));
      }
    }

    let mut items = Vec::with_capacity(kept.len());
    let mut separators = Vec::with_capacity(kept.len());
    for (item, separator) in kept {
      items.push(item);
      separators.extend(separator);
    }

    Self { items, separators }
  }

  /// Replace the item at `index`
  pub fn replace(&self, index: usize, item: T) -> Self {
    let mut items = self.items.clone();
    items[index] = item;
    Self {
      items,
      separators: self.separators.clone(),
    }
  }

  /// Append an item, inserting `separator` unless a trailing one already exists
  pub fn push(&self, item: T, separator: Token) -> Self {
    let mut items = self.items.clone();
    let mut separators = self.separators.clone();
    if !items.is_empty() && separators.len() < items.len() {
      separators.push(separator);
    }
    items.push(item);
    Self { items, separators }
  }
}

impl<T: fmt::Display> fmt::Display for SeparatedList<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, item) in self.items.iter().enumerate() {
      write!(f, "{}", item)?;
      if let Some(sep) = self.separators.get(i) {
        write!(f, "{}", sep)?;
      }
    }
    Ok(())
  }
}

fn write_tokens(f: &mut fmt::Formatter<'_>, tokens: &[Token]) -> fmt::Result {
  for token in tokens {
    write!(f, "{}", token)?;
  }
  Ok(())
}

// ============================================================================
// Attributes
// ============================================================================

/// One argument of an attribute, kept as its source tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeArgument {
  pub tokens: Vec<Token>,
}

impl AttributeArgument {
  pub fn new(tokens: Vec<Token>) -> Self {
    Self { tokens }
  }

  /// `Skip` for `Skip = "reason"`; `None` for positional arguments
  pub fn name_equals(&self) -> Option<&str> {
    match self.tokens.as_slice() {
      [name, equals, ..] if name.is_identifier() && equals.is("=") => Some(name.text.as_str()),
      _ => None,
    }
  }

  /// The same argument without the trivia around its first and last tokens
  pub fn trimmed(&self) -> Self {
    let mut tokens = self.tokens.clone();
    if let Some(first) = tokens.first_mut() {
      first.leading = Trivia::none();
    }
    if let Some(last) = tokens.last_mut() {
      last.trailing = Trivia::none();
    }
    Self { tokens }
  }
}

impl fmt::Display for AttributeArgument {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write_tokens(f, &self.tokens)
  }
}

/// `( arg, arg, ... )`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeArgumentList {
  pub open: Token,
  pub arguments: SeparatedList<AttributeArgument>,
  pub close: Token,
}

impl AttributeArgumentList {
  pub fn len(&self) -> usize {
    self.arguments.len()
  }

  /// True when some argument is written `name = ...`
  pub fn has_named(&self, name: &str) -> bool {
    self.arguments.iter().any(|arg| arg.name_equals() == Some(name))
  }
}

impl fmt::Display for AttributeArgumentList {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}{}", self.open, self.arguments, self.close)
  }
}

/// A single attribute: a (possibly dotted) name and optional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
  pub name: Vec<Token>,
  pub argument_list: Option<AttributeArgumentList>,
}

impl Attribute {
  /// The name as written, without trivia (`Ignore`, `TestTools.Ignore`)
  pub fn name_text(&self) -> String {
    self.name.iter().map(|t| t.text.as_str()).collect()
  }

  /// `None` when the attribute has no argument list at all
  pub fn argument_count(&self) -> Option<usize> {
    self.argument_list.as_ref().map(AttributeArgumentList::len)
  }

  /// Rename, keeping the trivia around the old name
  pub fn with_name(&self, name: &str) -> Self {
    let leading = self.name.first().map(|t| t.leading.clone()).unwrap_or_default();
    let trailing = self.name.last().map(|t| t.trailing.clone()).unwrap_or_default();
    Self {
      name: vec![Token::identifier(name).with_leading(leading).with_trailing(trailing)],
      argument_list: self.argument_list.clone(),
    }
  }

  pub fn with_argument_list(&self, argument_list: Option<AttributeArgumentList>) -> Self {
    Self {
      name: self.name.clone(),
      argument_list,
    }
  }
}

impl fmt::Display for Attribute {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write_tokens(f, &self.name)?;
    if let Some(args) = &self.argument_list {
      write!(f, "{}", args)?;
    }
    Ok(())
  }
}

/// `assembly:` in `[assembly: InternalsVisibleTo("x")]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTarget {
  pub identifier: Token,
  pub colon: Token,
}

/// `[ target: attr, attr ]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeList {
  pub open: Token,
  pub target: Option<AttributeTarget>,
  pub attributes: SeparatedList<Attribute>,
  pub close: Token,
}

impl AttributeList {
  pub fn leading_trivia(&self) -> &Trivia {
    &self.open.leading
  }

  /// Same list with different attributes; brackets and target untouched
  pub fn with_attributes(&self, attributes: SeparatedList<Attribute>) -> Self {
    Self {
      open: self.open.clone(),
      target: self.target.clone(),
      attributes,
      close: self.close.clone(),
    }
  }

  pub fn with_leading_trivia(&self, leading: Trivia) -> Self {
    Self {
      open: self.open.clone().with_leading(leading),
      target: self.target.clone(),
      attributes: self.attributes.clone(),
      close: self.close.clone(),
    }
  }

  pub fn with_close_trailing(&self, trailing: Trivia) -> Self {
    Self {
      open: self.open.clone(),
      target: self.target.clone(),
      attributes: self.attributes.clone(),
      close: self.close.clone().with_trailing(trailing),
    }
  }

  /// `[assembly: ...]` and `[module: ...]` belong to the compilation unit
  pub fn is_global(&self) -> bool {
    self
      .target
      .as_ref()
      .is_some_and(|t| t.identifier.text == "assembly" || t.identifier.text == "module")
  }
}

impl fmt::Display for AttributeList {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.open)?;
    if let Some(target) = &self.target {
      write!(f, "{}{}", target.identifier, target.colon)?;
    }
    write!(f, "{}{}", self.attributes, self.close)
  }
}

fn write_attribute_lists(f: &mut fmt::Formatter<'_>, lists: &[Arc<AttributeList>]) -> fmt::Result {
  for list in lists {
    write!(f, "{}", list)?;
  }
  Ok(())
}

// ============================================================================
// Declarations
// ============================================================================

/// Shared surface of attribute-bearing declarations
///
/// A declaration is its attribute lists followed by its signature (modifiers,
/// keyword, name ...). Trivia in front of the declaration belongs to whichever
/// of the two comes first.
pub trait Declaration: Sized {
  fn attribute_lists(&self) -> &[Arc<AttributeList>];

  /// Replace the attribute lists; trivia travels with the lists themselves
  fn with_attribute_lists(&self, lists: Vec<Arc<AttributeList>>) -> Self;

  /// Leading trivia of the first signature token
  fn signature_leading(&self) -> Trivia;

  /// Replace the leading trivia of the first signature token
  fn with_signature_leading(&self, leading: Trivia) -> Self;
}

fn leading_of(tokens: &[Token]) -> Trivia {
  tokens.first().map(|t| t.leading.clone()).unwrap_or_default()
}

fn set_leading(tokens: &mut [Token], leading: Trivia) {
  if let Some(token) = tokens.first_mut() {
    token.leading = leading;
  }
}

/// A method: attribute lists followed by the untouched signature and body tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDeclaration {
  pub attribute_lists: Vec<Arc<AttributeList>>,
  pub name: String,
  pub tokens: Vec<Token>,
}

impl Declaration for MethodDeclaration {
  fn attribute_lists(&self) -> &[Arc<AttributeList>] {
    &self.attribute_lists
  }

  fn with_attribute_lists(&self, lists: Vec<Arc<AttributeList>>) -> Self {
    Self {
      attribute_lists: lists,
      name: self.name.clone(),
      tokens: self.tokens.clone(),
    }
  }

  fn signature_leading(&self) -> Trivia {
    leading_of(&self.tokens)
  }

  fn with_signature_leading(&self, leading: Trivia) -> Self {
    let mut node = self.clone();
    set_leading(&mut node.tokens, leading);
    node
  }
}

impl fmt::Display for MethodDeclaration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write_attribute_lists(f, &self.attribute_lists)?;
    write_tokens(f, &self.tokens)
  }
}

/// A class with a braced body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDeclaration {
  pub attribute_lists: Vec<Arc<AttributeList>>,
  pub name: String,
  /// Modifiers, `class`, name, type parameters, base list, constraints
  pub header: Vec<Token>,
  pub open_brace: Token,
  pub members: Vec<Member>,
  pub close_brace: Token,
  pub semicolon: Option<Token>,
}

impl ClassDeclaration {
  pub fn with_members(&self, members: Vec<Member>) -> Self {
    Self {
      attribute_lists: self.attribute_lists.clone(),
      name: self.name.clone(),
      header: self.header.clone(),
      open_brace: self.open_brace.clone(),
      members,
      close_brace: self.close_brace.clone(),
      semicolon: self.semicolon.clone(),
    }
  }
}

impl Declaration for ClassDeclaration {
  fn attribute_lists(&self) -> &[Arc<AttributeList>] {
    &self.attribute_lists
  }

  fn with_attribute_lists(&self, lists: Vec<Arc<AttributeList>>) -> Self {
    let mut node = self.clone();
    node.attribute_lists = lists;
    node
  }

  fn signature_leading(&self) -> Trivia {
    leading_of(&self.header)
  }

  fn with_signature_leading(&self, leading: Trivia) -> Self {
    let mut node = self.clone();
    set_leading(&mut node.header, leading);
    node
  }
}

impl fmt::Display for ClassDeclaration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write_attribute_lists(f, &self.attribute_lists)?;
    write_tokens(f, &self.header)?;
    write!(f, "{}", self.open_brace)?;
    for member in &self.members {
      write!(f, "{}", member)?;
    }
    write!(f, "{}", self.close_brace)?;
    if let Some(semicolon) = &self.semicolon {
      write!(f, "{}", semicolon)?;
    }
    Ok(())
  }
}

/// `namespace N { ... }` (block form; file-scoped namespaces stay verbatim)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDeclaration {
  pub header: Vec<Token>,
  pub open_brace: Token,
  pub members: Vec<Member>,
  pub close_brace: Token,
  pub semicolon: Option<Token>,
}

impl NamespaceDeclaration {
  pub fn with_members(&self, members: Vec<Member>) -> Self {
    Self {
      header: self.header.clone(),
      open_brace: self.open_brace.clone(),
      members,
      close_brace: self.close_brace.clone(),
      semicolon: self.semicolon.clone(),
    }
  }
}

impl fmt::Display for NamespaceDeclaration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write_tokens(f, &self.header)?;
    write!(f, "{}", self.open_brace)?;
    for member in &self.members {
      write!(f, "{}", member)?;
    }
    write!(f, "{}", self.close_brace)?;
    if let Some(semicolon) = &self.semicolon {
      write!(f, "{}", semicolon)?;
    }
    Ok(())
  }
}

/// Anything the rewriters never look inside: fields, properties, constructors,
/// usings, structs, enums, top-level statements, `[assembly: ...]` lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbatimMember {
  pub attribute_lists: Vec<Arc<AttributeList>>,
  pub tokens: Vec<Token>,
}

impl fmt::Display for VerbatimMember {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write_attribute_lists(f, &self.attribute_lists)?;
    write_tokens(f, &self.tokens)
  }
}

/// A member of a compilation unit, namespace or class body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
  Namespace(Arc<NamespaceDeclaration>),
  Class(Arc<ClassDeclaration>),
  Method(Arc<MethodDeclaration>),
  Verbatim(Arc<VerbatimMember>),
}

impl Member {
  /// Reference identity: both sides point at the same allocation
  pub fn ptr_eq(&self, other: &Member) -> bool {
    match (self, other) {
      (Member::Namespace(a), Member::Namespace(b)) => Arc::ptr_eq(a, b),
      (Member::Class(a), Member::Class(b)) => Arc::ptr_eq(a, b),
      (Member::Method(a), Member::Method(b)) => Arc::ptr_eq(a, b),
      (Member::Verbatim(a), Member::Verbatim(b)) => Arc::ptr_eq(a, b),
      _ => false,
    }
  }
}

impl fmt::Display for Member {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Member::Namespace(ns) => write!(f, "{}", ns),
      Member::Class(class) => write!(f, "{}", class),
      Member::Method(method) => write!(f, "{}", method),
      Member::Verbatim(verbatim) => write!(f, "{}", verbatim),
    }
  }
}

/// Root of a parsed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
  pub members: Vec<Member>,
  /// Zero-width token whose leading trivia is whatever trails the last member
  pub end_of_file: Token,
}

impl CompilationUnit {
  pub fn with_members(&self, members: Vec<Member>) -> Self {
    Self {
      members,
      end_of_file: self.end_of_file.clone(),
    }
  }

  /// Every class in document order, nested classes included
  pub fn classes(&self) -> Vec<&Arc<ClassDeclaration>> {
    let mut out = Vec::new();
    collect_classes(&self.members, &mut out);
    out
  }

  /// Every method in document order
  pub fn methods(&self) -> Vec<&Arc<MethodDeclaration>> {
    let mut out = Vec::new();
    collect_methods(&self.members, &mut out);
    out
  }
}

fn collect_classes<'a>(members: &'a [Member], out: &mut Vec<&'a Arc<ClassDeclaration>>) {
  for member in members {
    match member {
      Member::Namespace(ns) => collect_classes(&ns.members, out),
      Member::Class(class) => {
        out.push(class);
        collect_classes(&class.members, out);
      }
      _ => {}
    }
  }
}

fn collect_methods<'a>(members: &'a [Member], out: &mut Vec<&'a Arc<MethodDeclaration>>) {
  for member in members {
    match member {
      Member::Namespace(ns) => collect_methods(&ns.members, out),
      Member::Class(class) => collect_methods(&class.members, out),
      Member::Method(method) => out.push(method),
      Member::Verbatim(_) => {}
    }
  }
}

impl fmt::Display for CompilationUnit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for member in &self.members {
      write!(f, "{}", member)?;
    }
    write!(f, "{}", self.end_of_file)
  }
}
