//! `[TestCategory(x)]` to `[Trait("Category", x)]`

use super::matcher::{Marker, first_marker, has_marker};
use super::{RewriteError, RewriteResult, Rewriter, replace_attribute_lists};
use crate::syntax::{
  Attribute, AttributeArgument, AttributeArgumentList, MethodDeclaration, SeparatedList, Token, TokenKind, Trivia,
};
use log::debug;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default)]
pub struct TestCategoryToTrait;

impl Rewriter for TestCategoryToTrait {
  type Context = ();

  fn rewrite_method(&self, method: &Arc<MethodDeclaration>, _ctx: &()) -> RewriteResult<Arc<MethodDeclaration>> {
    if !has_marker(&method.attribute_lists, Marker::TestCategory) {
      return Ok(Arc::clone(method));
    }

    let mut changed = false;
    let mut lists = Vec::with_capacity(method.attribute_lists.len());

    for list in &method.attribute_lists {
      let Some((index, category)) = first_marker(list, Marker::TestCategory) else {
        lists.push(Arc::clone(list));
        continue;
      };
      let replacement = to_trait(category, &method.name)?;
      let rewritten = list.with_attributes(list.attributes.replace(index, replacement));
      lists.push(Arc::new(rewritten));
      changed = true;
    }

    if !changed {
      return Ok(Arc::clone(method));
    }

    debug!("method {}: TestCategory rewritten to Trait", method.name);
    Ok(Arc::new(replace_attribute_lists(method.as_ref(), lists, None)))
  }
}

/// `Trait("Category", <arg>)` with the argument text carried over verbatim
fn to_trait(category: &Attribute, method: &str) -> RewriteResult<Attribute> {
  let args = match &category.argument_list {
    Some(args) if args.len() == 1 => args,
    _ => {
      return Err(RewriteError::MalformedArity {
        attribute: Marker::TestCategory,
        method: method.to_string(),
        expected: 1,
        found: category.argument_count(),
        text: category.to_string().trim().to_string(),
      });
    }
  };

  let value = args.arguments.items()[0].trimmed();

  let arguments = SeparatedList::new(
    vec![
      AttributeArgument::new(vec![Token::new(TokenKind::StringLiteral, "\"Category\"")]),
      value,
    ],
    vec![Token::punct(",").with_trailing(Trivia::space())],
  );

  Ok(
    category
      .with_name(Marker::Trait.name())
      .with_argument_list(Some(AttributeArgumentList {
        open: args.open.clone(),
        arguments,
        close: args.close.clone(),
      })),
  )
}
