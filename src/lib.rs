//! Listward: Declarative Post-Processing for Collection Results
//!
//! Functions that return ordered collections are declared with tags, and an
//! interceptor applies the tagged behaviors to each result so the function
//! body never has to.
//!
//! # Core Concepts
//!
//! - **Tags**: `Reverse`, `Deduplicate`, `NotNullDefault { modifiable }`
//! - **Registry**: maps function identity to its tags, frozen at startup
//! - **Interceptor**: binds a function to its tags and runs them, always in
//!   the order substitution, deduplication, reversal
//!
//! # Example
//!
//! ```
//! use listward::{Interceptor, Tag, TagRegistry};
//! use std::sync::Arc;
//!
//! let registry = TagRegistry::builder()
//!     .declare("fruit::in_order", [Tag::Reverse])
//!     .unwrap()
//!     .build();
//! let interceptor = Interceptor::new(Arc::new(registry));
//!
//! let in_order = interceptor
//!     .bind_infallible("fruit::in_order", |_: ()| vec!["Apple", "Banana", "Cherry"])
//!     .unwrap();
//! assert_eq!(in_order.invoke(()), ["Cherry", "Banana", "Apple"]);
//! ```

mod error;
pub mod interceptor;
mod list;
pub mod outcome;
pub mod registry;
mod tag;
pub mod transform;

pub use error::{DeclarationError, DeclarationResult, MutationError};
pub use interceptor::{Intercepted, InterceptedAsync, Interceptor};
pub use list::{List, Mutability};
pub use outcome::Outcome;
pub use registry::{
    Declaration, FunctionId, MisdeclarationPolicy, RegistryBuilder, ReturnShape, TagRegistry,
};
pub use tag::{Step, Tag, TagKind, TagSet, TransformPlan};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
