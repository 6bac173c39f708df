//! `[Ignore]` to xUnit `Skip`
//!
//! xUnit has no class-level disable, so an ignored class is expressed by skipping
//! each of its tests. The class visit strips the class's `Ignore` and records the
//! fact in a [`ClassState`] that the walk passes to every method of that class.

use super::matcher::{Marker, first_marker};
use super::{RewriteResult, Rewriter, replace_attribute_lists, strip_marker};
use crate::syntax::{
  Attribute, AttributeArgument, AttributeArgumentList, AttributeList, ClassDeclaration, MethodDeclaration,
  SeparatedList, Token, TokenKind, Trivia,
};
use log::debug;
use std::sync::Arc;

/// Reason written into every generated `Skip`
pub const SKIP_REASON: &str = "Ignored in MSTest";

/// What a method needs to know about the class it sits in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassState {
  pub class_ignored: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreToSkip;

impl Rewriter for IgnoreToSkip {
  type Context = ClassState;

  fn enter_class(
    &self,
    class: &Arc<ClassDeclaration>,
    _outer: &ClassState,
  ) -> RewriteResult<(Arc<ClassDeclaration>, ClassState)> {
    let stripped = strip_marker(&class.attribute_lists, Marker::Ignore);
    let state = ClassState {
      class_ignored: stripped.removed,
    };
    if !stripped.removed {
      return Ok((Arc::clone(class), state));
    }

    // Survivors such as `TestClass` keep their arguments as written
    debug!("class {} is ignored; its tests will be skipped", class.name);
    let rewritten = replace_attribute_lists(class.as_ref(), stripped.lists, stripped.orphaned);
    Ok((Arc::new(rewritten), state))
  }

  fn rewrite_method(&self, method: &Arc<MethodDeclaration>, state: &ClassState) -> RewriteResult<Arc<MethodDeclaration>> {
    let stripped = strip_marker(&method.attribute_lists, Marker::Ignore);
    let method_ignored = stripped.removed;
    let mut changed = method_ignored;

    let lists = if method_ignored || state.class_ignored {
      stripped
        .lists
        .into_iter()
        .map(|list| match skip_first_fact(&list) {
          Some(skipped) => {
            changed = true;
            Arc::new(skipped)
          }
          None => list,
        })
        .collect()
    } else {
      stripped.lists
    };

    if !changed {
      return Ok(Arc::clone(method));
    }

    debug!(
      "method {}: ignored={} class_ignored={}",
      method.name, method_ignored, state.class_ignored
    );
    Ok(Arc::new(replace_attribute_lists(method.as_ref(), lists, stripped.orphaned)))
  }
}

/// The list with its first `Fact` skipped, or `None` when there is no `Fact` or it
/// already names a `Skip`
fn skip_first_fact(list: &AttributeList) -> Option<AttributeList> {
  let (index, fact) = first_marker(list, Marker::Fact)?;
  if fact.argument_list.as_ref().is_some_and(|args| args.has_named("Skip")) {
    return None;
  }
  Some(list.with_attributes(list.attributes.replace(index, with_skip(fact))))
}

/// `Skip="Ignored in MSTest"` as a named argument
fn skip_argument() -> AttributeArgument {
  AttributeArgument::new(vec![
    Token::identifier("Skip"),
    Token::punct("="),
    Token::new(TokenKind::StringLiteral, format!("\"{}\"", SKIP_REASON)),
  ])
}

/// Append the skip argument after any existing arguments
fn with_skip(fact: &Attribute) -> Attribute {
  match &fact.argument_list {
    Some(args) => fact.with_argument_list(Some(AttributeArgumentList {
      open: args.open.clone(),
      arguments: args
        .arguments
        .push(skip_argument(), Token::punct(",").with_trailing(Trivia::space())),
      close: args.close.clone(),
    })),
    None => {
      // `[Fact ]` keeps its space, after the new `)`
      let mut name = fact.name.clone();
      let trailing = name
        .last_mut()
        .map(|token| std::mem::take(&mut token.trailing))
        .unwrap_or_default();
      Attribute {
        name,
        argument_list: Some(AttributeArgumentList {
          open: Token::punct("("),
          arguments: SeparatedList::single(skip_argument()),
          close: Token::punct(")").with_trailing(trailing),
        }),
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::rewrite::rewrite_unit;
  use crate::syntax::testing::{find_method, leading_trivia};
  use crate::syntax::{CompilationUnit, parse};

  fn rewrite(source: &str) -> String {
    let unit = Arc::new(parse(source));
    rewrite_unit(&IgnoreToSkip, &unit).unwrap().to_string()
  }

  fn rewrite_tree(source: &str) -> (Arc<CompilationUnit>, Arc<CompilationUnit>) {
    let unit = Arc::new(parse(source));
    let rewritten = rewrite_unit(&IgnoreToSkip, &unit).unwrap();
    (unit, rewritten)
  }

  #[test]
  fn test_ignored_class_propagates_skip() {
    assert_eq!(
      rewrite("[Ignore] class C { [Fact] void M(){} }"),
      "class C { [Fact(Skip=\"Ignored in MSTest\")] void M(){} }"
    );
  }

  #[test]
  fn test_ignored_class_skips_every_method() {
    let source = "[TestClass, Ignore]\npublic class C\n{\n    [Fact]\n    public void A() { }\n\n    [Fact]\n    public void B() { }\n}\n";
    let expected = "[TestClass]\npublic class C\n{\n    [Fact(Skip=\"Ignored in MSTest\")]\n    public void A() { }\n\n    [Fact(Skip=\"Ignored in MSTest\")]\n    public void B() { }\n}\n";
    assert_eq!(rewrite(source), expected);
  }

  #[test]
  fn test_mixed_list() {
    assert_eq!(
      rewrite("class C { [Ignore, Fact] void M() {} }"),
      "class C { [Fact(Skip=\"Ignored in MSTest\")] void M() {} }"
    );
    assert_eq!(
      rewrite("class C { [Fact, Ignore] void M() {} }"),
      "class C { [Fact(Skip=\"Ignored in MSTest\")] void M() {} }"
    );
  }

  #[test]
  fn test_ignore_only_list_is_removed() {
    let source = "class C\n{\n    /// <summary>Doc</summary>\n    [Ignore]\n    [Fact]\n    public void M() { }\n}\n";
    let expected =
      "class C\n{\n    /// <summary>Doc</summary>\n    [Fact(Skip=\"Ignored in MSTest\")]\n    public void M() { }\n}\n";
    assert_eq!(rewrite(source), expected);
  }

  #[test]
  fn test_directives_around_removed_list_survive() {
    let source = "class C\n{\n#if DEBUG\n    [Ignore]\n#endif\n    [Fact]\n    public void M() { }\n}\n";
    let expected = "class C\n{\n#if DEBUG\n#endif\n    [Fact(Skip=\"Ignored in MSTest\")]\n    public void M() { }\n}\n";
    assert_eq!(rewrite(source), expected);
  }

  #[test]
  fn test_comment_after_removed_list_survives() {
    let source = "class C\n{\n    [Ignore]\n    // why this test matters\n    [Fact]\n    public void M() { }\n}\n";
    let expected =
      "class C\n{\n    // why this test matters\n    [Fact(Skip=\"Ignored in MSTest\")]\n    public void M() { }\n}\n";
    assert_eq!(rewrite(source), expected);
  }

  #[test]
  fn test_comment_above_removed_middle_list_survives() {
    let source =
      "class C\n{\n    [Fact]\n    // flaky\n    [Ignore]\n    [Trait(\"a\", \"b\")]\n    public void M() { }\n}\n";
    let expected = "class C\n{\n    [Fact(Skip=\"Ignored in MSTest\")]\n    // flaky\n    [Trait(\"a\", \"b\")]\n    public void M() { }\n}\n";
    assert_eq!(rewrite(source), expected);
  }

  #[test]
  fn test_removed_list_on_shared_line_keeps_line_break() {
    assert_eq!(
      rewrite("class C\n{\n    [Fact] [Ignore]\n    public void M() { }\n}\n"),
      "class C\n{\n    [Fact(Skip=\"Ignored in MSTest\")]\n    public void M() { }\n}\n"
    );
  }

  #[test]
  fn test_comment_before_removed_last_list_moves_to_signature() {
    let source = "class C\n{\n    [Fact]\n    // disabled on CI\n    [Ignore]\n    public void M() { }\n}\n";
    let expected =
      "class C\n{\n    [Fact(Skip=\"Ignored in MSTest\")]\n    // disabled on CI\n    public void M() { }\n}\n";
    assert_eq!(rewrite(source), expected);
  }

  #[test]
  fn test_ignore_without_fact_only_strips() {
    let source = "class C\n{\n    // keep me\n    [Ignore]\n    public void M() { }\n}\n";
    let expected = "class C\n{\n    // keep me\n    public void M() { }\n}\n";
    assert_eq!(rewrite(source), expected);
  }

  #[test]
  fn test_leading_trivia_is_preserved() {
    let (before, after) = rewrite_tree("class C {\n  // note\n  [Ignore] [Fact] public void M() {}\n}");
    let old = find_method(&before, "M").unwrap();
    let new = find_method(&after, "M").unwrap();
    assert_eq!(leading_trivia(old.as_ref()), leading_trivia(new.as_ref()));
    assert_eq!(new.attribute_lists.len(), 1);
  }

  #[test]
  fn test_only_first_fact_per_list() {
    assert_eq!(
      rewrite("class C { [Ignore] [Fact, Fact] void M() {} }"),
      "class C { [Fact(Skip=\"Ignored in MSTest\"), Fact] void M() {} }"
    );
  }

  #[test]
  fn test_first_fact_of_each_list() {
    assert_eq!(
      rewrite("[Ignore] class C { [Fact] [Fact] void M() {} }"),
      "class C { [Fact(Skip=\"Ignored in MSTest\")] [Fact(Skip=\"Ignored in MSTest\")] void M() {} }"
    );
  }

  #[test]
  fn test_existing_arguments_are_kept() {
    assert_eq!(
      rewrite("class C { [Ignore] [Fact(DisplayName = \"d\")] void M() {} }"),
      "class C { [Fact(DisplayName = \"d\", Skip=\"Ignored in MSTest\")] void M() {} }"
    );
    assert_eq!(
      rewrite("class C { [Ignore] [Fact()] void M() {} }"),
      "class C { [Fact(Skip=\"Ignored in MSTest\")] void M() {} }"
    );
  }

  #[test]
  fn test_existing_skip_is_left_alone() {
    assert_eq!(
      rewrite("class C { [Ignore] [Fact(Skip = \"flaky\")] void M() {} }"),
      "class C { [Fact(Skip = \"flaky\")] void M() {} }"
    );
  }

  #[test]
  fn test_fact_not_skipped_without_ignore() {
    let (before, after) = rewrite_tree("class C { [Fact] void M() {} }");
    assert!(Arc::ptr_eq(&before, &after));
  }

  #[test]
  fn test_sibling_classes_do_not_share_state() {
    let source = "[Ignore] class A { [Fact] void M() {} }\nclass B { [Fact] void N() {} }\n";
    let (before, after) = rewrite_tree(source);
    assert_eq!(
      after.to_string(),
      "class A { [Fact(Skip=\"Ignored in MSTest\")] void M() {} }\nclass B { [Fact] void N() {} }\n"
    );
    assert!(after.members[1].ptr_eq(&before.members[1]));
  }

  #[test]
  fn test_nested_class_computes_its_own_state() {
    let source = "[Ignore] class Outer {\n  class Inner { [Fact] void A() {} }\n  [Fact] void B() {}\n}\nclass Other {\n  [Ignore] class Inner { [Fact] void C() {} }\n  [Fact] void D() {}\n}\n";
    let expected = "class Outer {\n  class Inner { [Fact] void A() {} }\n  [Fact(Skip=\"Ignored in MSTest\")] void B() {}\n}\nclass Other {\n  class Inner { [Fact(Skip=\"Ignored in MSTest\")] void C() {} }\n  [Fact] void D() {}\n}\n";
    assert_eq!(rewrite(source), expected);
  }

  #[test]
  fn test_qualified_or_differently_cased_names_are_ignored() {
    let (before, after) =
      rewrite_tree("[TestTools.Ignore] class C { [ignore] [Fact] void M() {} [IgnoreAttribute] void N() {} }");
    assert!(Arc::ptr_eq(&before, &after));
  }

  #[test]
  fn test_second_run_is_a_no_op() {
    let source = "[Ignore]\npublic class C\n{\n    [Ignore, Fact]\n    public void M() { }\n}\n";
    let once = Arc::new(parse(&rewrite(source)));
    let twice = rewrite_unit(&IgnoreToSkip, &once).unwrap();
    assert!(Arc::ptr_eq(&once, &twice));
  }

  #[test]
  fn test_fact_trailing_space_moves_after_arguments() {
    assert_eq!(
      rewrite("class C { [Ignore][Fact ] void M() {} }"),
      "class C { [Fact(Skip=\"Ignored in MSTest\") ] void M() {} }"
    );
  }
}
