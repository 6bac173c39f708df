//! Declaration-level C# parser
//!
//! Builds just enough structure for attribute rewriting: namespaces, classes,
//! methods and the attribute lists in front of them. Everything else is kept as
//! verbatim token runs. Parsing is infallible and lossless: for every input,
//! `parse(source).to_string() == source`. Malformed regions degrade to verbatim
//! members instead of failing.

use super::lexer::tokenize;
use super::nodes::{
  Attribute, AttributeArgument, AttributeArgumentList, AttributeList, AttributeTarget, ClassDeclaration,
  CompilationUnit, Member, MethodDeclaration, NamespaceDeclaration, SeparatedList, VerbatimMember,
};
use super::token::{Token, TokenKind};
use std::sync::Arc;

/// Modifiers that can precede a method name without being a return type
const MODIFIERS: &[&str] = &[
  "public",
  "private",
  "protected",
  "internal",
  "static",
  "virtual",
  "override",
  "abstract",
  "sealed",
  "async",
  "extern",
  "unsafe",
  "new",
  "partial",
  "readonly",
  "file",
  "required",
];

/// Parse a whole document
pub fn parse(source: &str) -> CompilationUnit {
  Parser::new(tokenize(source)).parse_compilation_unit()
}

/// Where a member list lives; methods are only recognized inside classes
#[derive(Debug, Clone)]
enum Scope {
  Unit,
  Namespace,
  Class(String),
}

/// What the tokens at the cursor look like, decided by lookahead
enum Shape {
  Namespace,
  Class,
  Method(String),
  Other,
}

struct Parser {
  tokens: Vec<Token>,
  pos: usize,
}

impl Parser {
  fn new(tokens: Vec<Token>) -> Self {
    debug_assert!(tokens.last().is_some_and(|t| t.kind == TokenKind::EndOfFile));
    Self { tokens, pos: 0 }
  }

  fn last_index(&self) -> usize {
    self.tokens.len() - 1
  }

  fn peek(&self) -> &Token {
    &self.tokens[self.pos]
  }

  fn nth(&self, n: usize) -> &Token {
    &self.tokens[(self.pos + n).min(self.last_index())]
  }

  fn at_eof(&self) -> bool {
    self.peek().kind == TokenKind::EndOfFile
  }

  /// Take the current token; the end-of-file token is never consumed
  fn bump(&mut self) -> Token {
    let token = self.tokens[self.pos].clone();
    if !self.at_eof() {
      self.pos += 1;
    }
    token
  }

  fn parse_compilation_unit(mut self) -> CompilationUnit {
    let members = self.parse_members(&Scope::Unit);
    let end_of_file = self.bump();
    CompilationUnit { members, end_of_file }
  }

  fn parse_members(&mut self, scope: &Scope) -> Vec<Member> {
    let mut members = Vec::new();
    loop {
      if self.at_eof() || (self.peek().is("}") && !matches!(scope, Scope::Unit)) {
        break;
      }

      let start = self.pos;
      let member = self.parse_member(scope);
      if self.pos == start {
        let tokens = vec![self.bump()];
        members.push(Member::Verbatim(Arc::new(VerbatimMember {
          attribute_lists: Vec::new(),
          tokens,
        })));
      } else {
        members.push(member);
      }
    }
    members
  }

  fn parse_member(&mut self, scope: &Scope) -> Member {
    let (lists, global) = self.parse_attribute_lists();
    if global {
      return Member::Verbatim(Arc::new(VerbatimMember {
        attribute_lists: lists,
        tokens: Vec::new(),
      }));
    }

    match self.classify(scope) {
      Shape::Namespace if lists.is_empty() => self.parse_namespace(),
      Shape::Class => self.parse_class(lists),
      Shape::Method(name) => {
        let tokens = self.consume_member_tokens(true);
        Member::Method(Arc::new(MethodDeclaration {
          attribute_lists: lists,
          name,
          tokens,
        }))
      }
      _ => {
        let tokens = self.consume_member_tokens(!matches!(scope, Scope::Unit));
        Member::Verbatim(Arc::new(VerbatimMember {
          attribute_lists: lists,
          tokens,
        }))
      }
    }
  }

  // ==========================================================================
  // Classification
  // ==========================================================================

  fn classify(&self, scope: &Scope) -> Shape {
    let mut depth = 0usize;
    let mut parameters = None;
    let mut terminator = None;

    for i in self.pos..self.tokens.len() {
      let token = &self.tokens[i];
      if token.kind == TokenKind::EndOfFile {
        break;
      }

      if depth == 0 {
        if i == self.pos && token.is("namespace") {
          return Shape::Namespace;
        }
        if token.is_identifier() && parameters.is_none() {
          match token.text.as_str() {
            "class" => return Shape::Class,
            "struct" | "interface" | "enum" | "record" | "delegate" => return Shape::Other,
            _ => {}
          }
        }
        if ["{", ";", "=>", "=", "}"].iter().any(|t| token.is(t)) {
          terminator = Some(token.text.as_str());
          break;
        }
        if token.is("(") && parameters.is_none() && self.opens_parameters(i) {
          parameters = Some(i);
        }
      }

      if is_opener(token) {
        depth += 1;
      } else if is_closer(token) {
        depth = depth.saturating_sub(1);
      }
    }

    match (scope, parameters, terminator) {
      (Scope::Class(class_name), Some(paren), Some("{" | ";" | "=>")) => self
        .method_name(paren, class_name)
        .map(Shape::Method)
        .unwrap_or(Shape::Other),
      _ => Shape::Other,
    }
  }

  /// A `(` directly after a name or a type-argument list opens parameters; one
  /// after a modifier (or first in the declaration) opens a tuple return type
  fn opens_parameters(&self, paren: usize) -> bool {
    if paren <= self.pos {
      return false;
    }
    let previous = &self.tokens[paren - 1];
    previous.is(">") || (previous.is_identifier() && !MODIFIERS.contains(&previous.text.as_str()))
  }

  /// Name of the method whose parameter list opens at `paren`, if the tokens
  /// before it read as `modifiers return-type name<T>`
  fn method_name(&self, paren: usize, class_name: &str) -> Option<String> {
    let start = self.pos;
    let signature = &self.tokens[start..paren];
    if signature
      .iter()
      .any(|t| ["operator", "event", "delegate", "this", "implicit", "explicit"].contains(&t.text.as_str()))
    {
      return None;
    }

    let mut name_index = paren.checked_sub(1).filter(|&i| i >= start)?;
    if self.tokens[name_index].is(">") {
      let mut angle = 0i32;
      loop {
        let token = &self.tokens[name_index];
        if token.is(">") {
          angle += 1;
        } else if token.is("<") {
          angle -= 1;
        }
        if angle == 0 {
          break;
        }
        if name_index == start {
          return None;
        }
        name_index -= 1;
      }
      name_index = name_index.checked_sub(1).filter(|&i| i >= start)?;
    }

    let name = &self.tokens[name_index];
    if !name.is_identifier() || name.text == class_name {
      return None;
    }
    if name_index > start && self.tokens[name_index - 1].is("~") {
      return None;
    }

    let has_return_type = self.tokens[start..name_index]
      .iter()
      .any(|t| !MODIFIERS.contains(&t.text.as_str()));
    has_return_type.then(|| name.text.clone())
  }

  // ==========================================================================
  // Declarations
  // ==========================================================================

  fn parse_namespace(&mut self) -> Member {
    let header = self.consume_header();
    if !self.peek().is("{") {
      let mut tokens = header;
      if self.peek().is(";") {
        tokens.push(self.bump());
      }
      return Member::Verbatim(Arc::new(VerbatimMember {
        attribute_lists: Vec::new(),
        tokens,
      }));
    }

    let open_brace = self.bump();
    let members = self.parse_members(&Scope::Namespace);
    let close_brace = self.expect_close_brace();
    let semicolon = self.peek().is(";").then(|| self.bump());

    Member::Namespace(Arc::new(NamespaceDeclaration {
      header,
      open_brace,
      members,
      close_brace,
      semicolon,
    }))
  }

  fn parse_class(&mut self, attribute_lists: Vec<Arc<AttributeList>>) -> Member {
    let header = self.consume_header();
    if !self.peek().is("{") {
      // `class C;` or a header cut off by the end of the file
      let mut tokens = header;
      if self.peek().is(";") {
        tokens.push(self.bump());
      }
      return Member::Verbatim(Arc::new(VerbatimMember { attribute_lists, tokens }));
    }

    let name = header
      .iter()
      .skip_while(|t| !t.is("class"))
      .skip(1)
      .find(|t| t.is_identifier())
      .map(|t| t.text.clone())
      .unwrap_or_default();

    let open_brace = self.bump();
    let members = self.parse_members(&Scope::Class(name.clone()));
    let close_brace = self.expect_close_brace();
    let semicolon = self.peek().is(";").then(|| self.bump());

    Member::Class(Arc::new(ClassDeclaration {
      attribute_lists,
      name,
      header,
      open_brace,
      members,
      close_brace,
      semicolon,
    }))
  }

  fn expect_close_brace(&mut self) -> Token {
    if self.peek().is("}") {
      self.bump()
    } else {
      Token::missing()
    }
  }

  /// Tokens up to (not including) the `{` or `;` that ends a declaration header
  fn consume_header(&mut self) -> Vec<Token> {
    let mut header = Vec::new();
    let mut depth = 0usize;
    while !self.at_eof() {
      let token = self.peek();
      if depth == 0 && (token.is("{") || token.is(";") || token.is("}")) {
        break;
      }
      if is_opener(token) {
        depth += 1;
      } else if is_closer(token) {
        depth = depth.saturating_sub(1);
      }
      header.push(self.bump());
    }
    header
  }

  /// Tokens of one member up to its end: a `;`, a braced body, or an
  /// expression body / initializer ending in `;`
  fn consume_member_tokens(&mut self, in_block: bool) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut in_expression = false;

    while !self.at_eof() {
      let token = self.peek();
      if depth == 0 {
        if token.is("}") {
          if !in_block {
            tokens.push(self.bump());
          }
          break;
        }
        if token.is(";") {
          tokens.push(self.bump());
          break;
        }
        if token.is("=>") || token.is("=") {
          in_expression = true;
        }
        if token.is("{") && !in_expression {
          tokens.extend(self.consume_braced());
          // `{ get; set; } = value;`
          if self.peek().is("=") {
            continue;
          }
          break;
        }
      }

      if is_opener(token) {
        depth += 1;
      } else if is_closer(token) {
        depth = depth.saturating_sub(1);
      }
      tokens.push(self.bump());
    }

    tokens
  }

  /// A `{ ... }` block with nested braces
  fn consume_braced(&mut self) -> Vec<Token> {
    let mut tokens = vec![self.bump()];
    let mut depth = 1usize;
    while depth > 0 && !self.at_eof() {
      let token = self.bump();
      if token.is("{") {
        depth += 1;
      } else if token.is("}") {
        depth -= 1;
      }
      tokens.push(token);
    }
    tokens
  }

  // ==========================================================================
  // Attributes
  // ==========================================================================

  /// Attribute lists in front of a member; the flag is set when the first list is
  /// an `[assembly: ...]`/`[module: ...]` list, which stands alone
  fn parse_attribute_lists(&mut self) -> (Vec<Arc<AttributeList>>, bool) {
    let mut lists = Vec::new();
    while self.peek().is("[") {
      let Some(list) = self.try_parse_attribute_list() else {
        break;
      };
      if list.is_global() && lists.is_empty() {
        return (vec![Arc::new(list)], true);
      }
      lists.push(Arc::new(list));
    }
    (lists, false)
  }

  fn try_parse_attribute_list(&mut self) -> Option<AttributeList> {
    let start = self.pos;
    let list = self.parse_attribute_list_inner();
    if list.is_none() {
      self.pos = start;
    }
    list
  }

  fn parse_attribute_list_inner(&mut self) -> Option<AttributeList> {
    let open = self.bump();
    let target = if self.nth(0).is_identifier() && self.nth(1).is(":") {
      Some(AttributeTarget {
        identifier: self.bump(),
        colon: self.bump(),
      })
    } else {
      None
    };

    let mut attributes = Vec::new();
    let mut separators = Vec::new();
    loop {
      attributes.push(self.parse_attribute()?);
      if self.peek().is(",") {
        separators.push(self.bump());
        if self.peek().is("]") {
          break;
        }
        continue;
      }
      if self.peek().is("]") {
        break;
      }
      return None;
    }
    let close = self.bump();

    Some(AttributeList {
      open,
      target,
      attributes: SeparatedList::new(attributes, separators),
      close,
    })
  }

  fn parse_attribute(&mut self) -> Option<Attribute> {
    let mut name: Vec<Token> = Vec::new();
    loop {
      let token = self.peek();
      let after_dot = name.last().is_none_or(|t| t.is(".") || t.is("::"));
      let after_identifier = name.last().is_some_and(Token::is_identifier);
      if (token.is_identifier() && after_dot) || ((token.is(".") || token.is("::")) && after_identifier) {
        name.push(self.bump());
      } else {
        break;
      }
    }
    if !name.last().is_some_and(Token::is_identifier) {
      return None;
    }

    // Generic attributes: `[Theory<T>]`
    if self.peek().is("<") {
      let mut angle = 0usize;
      loop {
        if self.at_eof() || self.peek().is("]") {
          return None;
        }
        let token = self.bump();
        if token.is("<") {
          angle += 1;
        } else if token.is(">") {
          angle -= 1;
        }
        name.push(token);
        if angle == 0 {
          break;
        }
      }
    }

    let argument_list = if self.peek().is("(") {
      Some(self.parse_argument_list()?)
    } else {
      None
    };

    Some(Attribute { name, argument_list })
  }

  fn parse_argument_list(&mut self) -> Option<AttributeArgumentList> {
    let open = self.bump();
    let mut arguments = Vec::new();
    let mut separators = Vec::new();

    if !self.peek().is(")") {
      loop {
        let mut tokens = Vec::new();
        let mut depth = 0usize;
        loop {
          if self.at_eof() {
            return None;
          }
          let token = self.peek();
          if depth == 0 {
            if token.is(",") || token.is(")") {
              break;
            }
            if token.is("]") || token.is("}") || token.is(";") {
              return None;
            }
          }
          if is_opener(token) {
            depth += 1;
          } else if is_closer(token) {
            depth = depth.saturating_sub(1);
          }
          tokens.push(self.bump());
        }
        if tokens.is_empty() {
          return None;
        }
        arguments.push(AttributeArgument::new(tokens));
        if self.peek().is(",") {
          separators.push(self.bump());
          continue;
        }
        break;
      }
    }
    let close = self.bump();

    Some(AttributeArgumentList {
      open,
      arguments: SeparatedList::new(arguments, separators),
      close,
    })
  }
}

fn is_opener(token: &Token) -> bool {
  token.is("(") || token.is("[") || token.is("{")
}

fn is_closer(token: &Token) -> bool {
  token.is(")") || token.is("]") || token.is("}")
}
