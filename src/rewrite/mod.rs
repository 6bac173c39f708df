//! Attribute rewriting over the syntax tree
//!
//! Each converter implements [`Rewriter`]; the walk in this module visits
//! namespaces, classes and methods depth-first and rebuilds only the path to a
//! changed node. A converter that finds nothing to do hands back the very same
//! `Arc` it was given, which is how callers tell "unchanged" from "rewritten".
//!
//! Converters:
//! - **ignore-to-skip**: `[Ignore]` is removed; the `[Fact]` of an ignored method,
//!   or of any method in an ignored class, gains `Skip="Ignored in MSTest"`
//! - **test-category-to-trait**: `[TestCategory(x)]` becomes `[Trait("Category", x)]`

pub mod category;
pub mod ignore;
pub mod matcher;

pub use category::TestCategoryToTrait;
pub use ignore::{ClassState, IgnoreToSkip};
pub use matcher::Marker;

use crate::syntax::{AttributeList, ClassDeclaration, CompilationUnit, Declaration, Member, MethodDeclaration, Trivia};
use matcher::find_attributes_by_name;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Failure to rewrite a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
  /// An attribute that must carry exactly `expected` arguments does not
  MalformedArity {
    attribute: Marker,
    method: String,
    expected: usize,
    /// `None` when the attribute has no argument list at all
    found: Option<usize>,
    /// The attribute as written
    text: String,
  },
}

impl fmt::Display for RewriteError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RewriteError::MalformedArity {
        attribute,
        method,
        expected,
        found,
        text,
      } => {
        let found = match found {
          Some(n) => format!("{} argument(s)", n),
          None => "no argument list".to_string(),
        };
        write!(
          f,
          "[{}] on method '{}' must have exactly {} argument(s), found {}: {}",
          attribute, method, expected, found, text
        )
      }
    }
  }
}

impl std::error::Error for RewriteError {}

pub type RewriteResult<T> = Result<T, RewriteError>;

/// Whether a converter pass touched the document
#[derive(Debug, Clone)]
pub enum Rewrite {
  Unchanged,
  Replaced(Arc<CompilationUnit>),
}

impl Rewrite {
  /// Compare by reference: a pass that built anything new counts as a replacement
  pub fn of(original: &Arc<CompilationUnit>, rewritten: Arc<CompilationUnit>) -> Self {
    if Arc::ptr_eq(original, &rewritten) {
      Rewrite::Unchanged
    } else {
      Rewrite::Replaced(rewritten)
    }
  }
}

/// A single-pass attribute converter
///
/// The walk calls [`Rewriter::enter_class`] before descending into a class body
/// and hands the context it returns to every direct member. Contexts are plain
/// values: a nested class gets its own, and siblings never see each other's.
pub trait Rewriter {
  type Context: Default;

  /// Rewrite a class's own attribute lists and compute the context for its members
  fn enter_class(
    &self,
    class: &Arc<ClassDeclaration>,
    _outer: &Self::Context,
  ) -> RewriteResult<(Arc<ClassDeclaration>, Self::Context)> {
    Ok((Arc::clone(class), Self::Context::default()))
  }

  /// Rewrite a method's attribute lists; return the same `Arc` when nothing changed
  fn rewrite_method(&self, method: &Arc<MethodDeclaration>, ctx: &Self::Context)
  -> RewriteResult<Arc<MethodDeclaration>>;
}

/// Run one converter over a whole document
pub fn rewrite_unit<R: Rewriter>(rewriter: &R, unit: &Arc<CompilationUnit>) -> RewriteResult<Arc<CompilationUnit>> {
  let ctx = R::Context::default();
  Ok(match rewrite_members(rewriter, &unit.members, &ctx)? {
    Some(members) => Arc::new(unit.with_members(members)),
    None => Arc::clone(unit),
  })
}

/// `None` when every member came back unchanged
fn rewrite_members<R: Rewriter>(rewriter: &R, members: &[Member], ctx: &R::Context) -> RewriteResult<Option<Vec<Member>>> {
  let mut changed = false;
  let mut out = Vec::with_capacity(members.len());
  for member in members {
    let rewritten = rewrite_member(rewriter, member, ctx)?;
    changed |= !rewritten.ptr_eq(member);
    out.push(rewritten);
  }
  Ok(changed.then_some(out))
}

fn rewrite_member<R: Rewriter>(rewriter: &R, member: &Member, ctx: &R::Context) -> RewriteResult<Member> {
  match member {
    Member::Namespace(ns) => Ok(match rewrite_members(rewriter, &ns.members, ctx)? {
      Some(members) => Member::Namespace(Arc::new(ns.with_members(members))),
      None => member.clone(),
    }),
    Member::Class(class) => {
      let (class, inner) = rewriter.enter_class(class, ctx)?;
      let class = match rewrite_members(rewriter, &class.members, &inner)? {
        Some(members) => Arc::new(class.with_members(members)),
        None => class,
      };
      Ok(Member::Class(class))
    }
    Member::Method(method) => Ok(Member::Method(rewriter.rewrite_method(method, ctx)?)),
    Member::Verbatim(_) => Ok(member.clone()),
  }
}

/// Attribute lists with one marker stripped out
pub(crate) struct Stripped {
  pub lists: Vec<Arc<AttributeList>>,
  /// Whether any attribute was removed
  pub removed: bool,
  /// Trivia left by dropped lists that no surviving list follows; it belongs in
  /// front of the signature
  pub orphaned: Option<Trivia>,
}

/// Remove every `marker` attribute from `lists`
///
/// Lists left empty are dropped. Comments and directives in front of a dropped
/// list move to whatever comes next, so only the list itself disappears.
pub(crate) fn strip_marker(lists: &[Arc<AttributeList>], marker: Marker) -> Stripped {
  let mut removed = false;
  let mut out: Vec<Arc<AttributeList>> = Vec::with_capacity(lists.len());
  let mut carry: Option<Trivia> = None;

  for list in lists {
    let hits = find_attributes_by_name(list, marker.name()).len();
    if hits > 0 && hits == list.attributes.len() {
      removed = true;
      let leading = match &carry {
        Some(prefix) => prefix.concat(list.leading_trivia()),
        None => list.leading_trivia().clone(),
      };
      carry = Some(drop_list(&mut out, list, leading));
      continue;
    }

    let survivor = if hits == 0 {
      Arc::clone(list)
    } else {
      removed = true;
      Arc::new(list.with_attributes(list.attributes.remove_where(|a| marker.matches(a))))
    };
    out.push(match carry.take() {
      Some(prefix) => Arc::new(survivor.with_leading_trivia(prefix.concat(survivor.leading_trivia()))),
      None => survivor,
    });
  }

  Stripped {
    lists: out,
    removed,
    orphaned: carry,
  }
}

/// The trivia a dropped list hands to whatever follows it
///
/// A list on a line of its own takes its indentation and line break with it. A
/// list sharing its line with the list before gives that list its line break.
fn drop_list(kept: &mut [Arc<AttributeList>], list: &AttributeList, leading: Trivia) -> Trivia {
  if !list.close.trailing.ends_line() {
    return leading;
  }
  match kept.last_mut() {
    Some(previous) if !previous.close.trailing.ends_line() => {
      let trailing = previous.close.trailing.without_indentation().concat(&list.close.trailing);
      *previous = Arc::new(previous.with_close_trailing(trailing));
      leading
    }
    _ => leading.without_indentation(),
  }
}

/// Swap in new attribute lists; trivia orphaned by dropped lists goes in front
/// of the signature's own leading trivia
pub(crate) fn replace_attribute_lists<D: Declaration>(
  decl: &D,
  lists: Vec<Arc<AttributeList>>,
  orphaned: Option<Trivia>,
) -> D {
  let node = decl.with_attribute_lists(lists);
  match orphaned {
    Some(prefix) => {
      let leading = prefix.concat(&node.signature_leading());
      node.with_signature_leading(leading)
    }
    None => node,
  }
}

/// The converters, in the order a full run applies them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ConverterKind {
  IgnoreToSkip,
  TestCategoryToTrait,
}

impl ConverterKind {
  pub const ALL: [ConverterKind; 2] = [ConverterKind::IgnoreToSkip, ConverterKind::TestCategoryToTrait];

  pub fn name(self) -> &'static str {
    match self {
      ConverterKind::IgnoreToSkip => "ignore-to-skip",
      ConverterKind::TestCategoryToTrait => "test-category-to-trait",
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      ConverterKind::IgnoreToSkip => {
        "Remove [Ignore]; add Skip=\"Ignored in MSTest\" to the [Fact] of ignored methods and of every method in an ignored class"
      }
      ConverterKind::TestCategoryToTrait => "Rewrite [TestCategory(x)] to [Trait(\"Category\", x)]",
    }
  }

  /// Run this converter over one document
  pub fn convert(self, unit: &Arc<CompilationUnit>) -> RewriteResult<Arc<CompilationUnit>> {
    match self {
      ConverterKind::IgnoreToSkip => rewrite_unit(&IgnoreToSkip, unit),
      ConverterKind::TestCategoryToTrait => rewrite_unit(&TestCategoryToTrait, unit),
    }
  }
}

impl fmt::Display for ConverterKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Run `converters` in order; the first failure aborts the document
///
/// Returns the converters that changed something alongside the final tree.
pub fn run_pipeline(
  converters: &[ConverterKind],
  unit: &Arc<CompilationUnit>,
) -> RewriteResult<(Arc<CompilationUnit>, Vec<ConverterKind>)> {
  let mut current = Arc::clone(unit);
  let mut applied = Vec::new();
  for &converter in converters {
    match Rewrite::of(&current, converter.convert(&current)?) {
      Rewrite::Replaced(next) => {
        debug!("{} rewrote the document", converter);
        applied.push(converter);
        current = next;
      }
      Rewrite::Unchanged => debug!("{} left the document unchanged", converter),
    }
  }
  Ok((current, applied))
}
