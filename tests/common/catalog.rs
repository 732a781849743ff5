//! Catalog service fixture
//!
//! Each method body returns its raw result and knows nothing about tags.
//! The tags live in `DECLARATIONS`; `Catalog::bind` wires the two together.

use listward::{DeclarationResult, Interceptor, Outcome, TagRegistry};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::debug;

/// Tags for every catalog method. `catalog::characters` is deliberately
/// undeclared.
pub const DECLARATIONS: &str = r#"
policy: reject
functions:
  catalog::items_in_order:
    tags: [reverse]
  catalog::numbers:
    tags: [reverse]
  catalog::items_with_duplicates:
    tags: [deduplicate]
  catalog::numbers_with_duplicates:
    tags: [deduplicate]
  catalog::nullable_strings:
    tags: [not_null_default]
  catalog::nullable_integers:
    tags: ["not_null_default(modifiable = false)"]
  catalog::empty_flags:
    tags: [not_null_default]
  catalog::flags:
    tags: [not_null_default]
  catalog::nothing_at_all:
    tags: [reverse, deduplicate, not_null_default]
  catalog::shuffled_tags:
    tags: [reverse, deduplicate]
"#;

/// A bound catalog method taking no arguments.
pub type Method<R> = listward::Intercepted<fn(()) -> Result<R, Infallible>, (), R, Infallible>;

pub fn catalog_interceptor() -> Interceptor {
    let registry = TagRegistry::from_yaml_str(DECLARATIONS).expect("fixture declarations are valid");
    Interceptor::new(Arc::new(registry))
}

fn bind<R: Outcome>(
    interceptor: &Interceptor,
    id: &str,
    body: fn(()) -> Result<R, Infallible>,
) -> DeclarationResult<Method<R>> {
    interceptor.bind(id, body)
}

pub struct Catalog {
    pub items_in_order: Method<Vec<&'static str>>,
    pub numbers: Method<Vec<i32>>,
    pub characters: Method<Vec<char>>,
    pub items_with_duplicates: Method<Vec<&'static str>>,
    pub numbers_with_duplicates: Method<Vec<i32>>,
    pub nullable_strings: Method<Option<Vec<String>>>,
    pub nullable_integers: Method<Option<Vec<i32>>>,
    pub empty_flags: Method<Option<Vec<bool>>>,
    pub flags: Method<Option<Vec<bool>>>,
    pub nothing_at_all: Method<Option<Vec<String>>>,
    pub shuffled_tags: Method<Vec<u8>>,
}

impl Catalog {
    pub fn bind(interceptor: &Interceptor) -> DeclarationResult<Self> {
        Ok(Self {
            items_in_order: bind(interceptor, "catalog::items_in_order", items_in_order)?,
            numbers: bind(interceptor, "catalog::numbers", numbers)?,
            characters: bind(interceptor, "catalog::characters", characters)?,
            items_with_duplicates: bind(
                interceptor,
                "catalog::items_with_duplicates",
                items_with_duplicates,
            )?,
            numbers_with_duplicates: bind(
                interceptor,
                "catalog::numbers_with_duplicates",
                numbers_with_duplicates,
            )?,
            nullable_strings: bind(interceptor, "catalog::nullable_strings", nullable_strings)?,
            nullable_integers: bind(interceptor, "catalog::nullable_integers", nullable_integers)?,
            empty_flags: bind(interceptor, "catalog::empty_flags", empty_flags)?,
            flags: bind(interceptor, "catalog::flags", flags)?,
            nothing_at_all: bind(interceptor, "catalog::nothing_at_all", nothing_at_all)?,
            shuffled_tags: bind(interceptor, "catalog::shuffled_tags", shuffled_tags)?,
        })
    }
}

fn items_in_order(_: ()) -> Result<Vec<&'static str>, Infallible> {
    debug!("catalog: items_in_order");
    Ok(vec!["Apple", "Banana", "Cherry", "Date"])
}

fn numbers(_: ()) -> Result<Vec<i32>, Infallible> {
    debug!("catalog: numbers");
    Ok(vec![1, 2, 3, 4, 5])
}

fn characters(_: ()) -> Result<Vec<char>, Infallible> {
    debug!("catalog: characters (undeclared)");
    Ok(vec!['a', 'b', 'c'])
}

fn items_with_duplicates(_: ()) -> Result<Vec<&'static str>, Infallible> {
    Ok(vec!["Red", "Blue", "Green", "Red", "Blue", "Yellow", "Green"])
}

fn numbers_with_duplicates(_: ()) -> Result<Vec<i32>, Infallible> {
    Ok(vec![10, 20, 10, 30, 20, 40, 10])
}

fn nullable_strings(_: ()) -> Result<Option<Vec<String>>, Infallible> {
    debug!("catalog: nullable_strings (returning absent)");
    Ok(None)
}

fn nullable_integers(_: ()) -> Result<Option<Vec<i32>>, Infallible> {
    debug!("catalog: nullable_integers (returning absent)");
    Ok(None)
}

fn empty_flags(_: ()) -> Result<Option<Vec<bool>>, Infallible> {
    Ok(Some(Vec::new()))
}

fn flags(_: ()) -> Result<Option<Vec<bool>>, Infallible> {
    Ok(Some(vec![true, false]))
}

fn nothing_at_all(_: ()) -> Result<Option<Vec<String>>, Infallible> {
    Ok(None)
}

fn shuffled_tags(_: ()) -> Result<Vec<u8>, Infallible> {
    Ok(vec![1, 2, 1, 3])
}
