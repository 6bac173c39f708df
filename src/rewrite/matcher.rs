//! Attribute lookup by name
//!
//! Matching is exact and case-sensitive on the name as written: `Ignore` matches
//! `[Ignore]` but not `[IgnoreAttribute]`, `[ignore]` or `[TestTools.Ignore]`.

use crate::syntax::{Attribute, AttributeList};
use std::fmt;
use std::sync::Arc;

/// The attribute vocabulary the converters recognize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
  /// MSTest `[Ignore]`, on a class or a method
  Ignore,
  /// xUnit `[Fact]`
  Fact,
  /// MSTest `[TestCategory("x")]`
  TestCategory,
  /// xUnit `[Trait("Category", "x")]`
  Trait,
}

impl Marker {
  pub const fn name(self) -> &'static str {
    match self {
      Marker::Ignore => "Ignore",
      Marker::Fact => "Fact",
      Marker::TestCategory => "TestCategory",
      Marker::Trait => "Trait",
    }
  }

  pub fn matches(self, attribute: &Attribute) -> bool {
    attribute.name_text() == self.name()
  }
}

impl fmt::Display for Marker {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Every attribute in `list` whose name is exactly `name`, in list order
pub fn find_attributes_by_name<'a>(list: &'a AttributeList, name: &str) -> Vec<&'a Attribute> {
  list.attributes.iter().filter(|a| a.name_text() == name).collect()
}

/// First attribute in `list` carrying `marker`, with its index
pub fn first_marker(list: &AttributeList, marker: Marker) -> Option<(usize, &Attribute)> {
  let first = *find_attributes_by_name(list, marker.name()).first()?;
  let index = list.attributes.iter().position(|a| std::ptr::eq(a, first))?;
  Some((index, first))
}

/// True when any list carries `marker`
pub fn has_marker(lists: &[Arc<AttributeList>], marker: Marker) -> bool {
  lists
    .iter()
    .any(|list| !find_attributes_by_name(list, marker.name()).is_empty())
}
