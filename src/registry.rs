//! Tag registry — which tags apply to which function
//!
//! Declarations are made once at startup, either in code through
//! `RegistryBuilder` or from a YAML declaration file. `build()` freezes the
//! registry; afterwards it is only read, so lookups need no locking and the
//! registry is shared across threads behind an `Arc`.

use crate::error::{DeclarationError, DeclarationResult};
use crate::tag::{Tag, TagSet, TransformPlan};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

/// Identity of a tagged function, e.g. `"catalog::items_in_order"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(String);

impl FunctionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for FunctionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FunctionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The declared shape of a function's return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnShape {
    /// An ordered sequence, possibly absent.
    #[default]
    Sequence,
    /// A single value that sequence transforms never touch.
    Scalar,
    /// Shape is only known per call (e.g. JSON values).
    Dynamic,
}

impl ReturnShape {
    /// Whether tags may be declared on a function of this shape.
    pub fn accepts_tags(&self) -> bool {
        !matches!(self, ReturnShape::Scalar)
    }

    /// Whether a body of shape `bound` may implement a declaration of this
    /// shape. `Dynamic` is compatible with everything.
    pub fn admits(&self, bound: ReturnShape) -> bool {
        *self == bound || *self == ReturnShape::Dynamic || bound == ReturnShape::Dynamic
    }
}

impl fmt::Display for ReturnShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReturnShape::Sequence => "sequence",
            ReturnShape::Scalar => "scalar",
            ReturnShape::Dynamic => "dynamic",
        };
        f.pad(name)
    }
}

/// What to do with tags declared on a scalar-returning function, and with a
/// body whose return shape differs from its declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MisdeclarationPolicy {
    /// Fail with `DeclarationError::TypeMismatch`.
    #[default]
    Reject,
    /// Drop the tags (or accept the body) and log a warning.
    Ignore,
}

/// Everything declared about one function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub id: FunctionId,
    pub returns: ReturnShape,
    pub tags: TagSet,
}

impl Declaration {
    pub fn plan(&self) -> TransformPlan {
        self.tags.plan()
    }
}

/// Apply `policy` to tags declared on a function of the given shape.
///
/// Returns the tags to keep: all of them when the shape accepts tags, none
/// when the policy ignores the mismatch.
pub(crate) fn check_shape(
    function: &FunctionId,
    shape: ReturnShape,
    tags: TagSet,
    policy: MisdeclarationPolicy,
) -> DeclarationResult<TagSet> {
    if shape.accepts_tags() || tags.is_empty() {
        return Ok(tags);
    }
    match policy {
        MisdeclarationPolicy::Reject => Err(DeclarationError::TypeMismatch {
            function: function.to_string(),
            shape,
            tags: tags.to_string(),
        }),
        MisdeclarationPolicy::Ignore => {
            tracing::warn!(
                function = %function,
                shape = %shape,
                tags = %tags,
                "ignoring sequence tags on non-sequence function"
            );
            Ok(TagSet::empty())
        }
    }
}

/// Apply `policy` when a body of shape `bound` is bound to a declaration of
/// shape `declared`.
pub(crate) fn check_returns(
    function: &FunctionId,
    declared: ReturnShape,
    bound: ReturnShape,
    policy: MisdeclarationPolicy,
) -> DeclarationResult<()> {
    if declared.admits(bound) {
        return Ok(());
    }
    match policy {
        MisdeclarationPolicy::Reject => Err(DeclarationError::ShapeMismatch {
            function: function.to_string(),
            declared,
            bound,
        }),
        MisdeclarationPolicy::Ignore => {
            tracing::warn!(
                function = %function,
                declared = %declared,
                bound = %bound,
                "body return shape differs from declaration"
            );
            Ok(())
        }
    }
}

/// Collects declarations before freezing them into a `TagRegistry`.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    declarations: HashMap<FunctionId, Declaration>,
    policy: MisdeclarationPolicy,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the misdeclaration policy for subsequent declarations.
    pub fn with_policy(mut self, policy: MisdeclarationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Declare tags on a sequence-returning function.
    pub fn declare(
        self,
        id: impl Into<FunctionId>,
        tags: impl IntoIterator<Item = Tag>,
    ) -> DeclarationResult<Self> {
        self.declare_returning(id, ReturnShape::Sequence, tags)
    }

    /// Declare tags on a function with an explicit return shape.
    pub fn declare_returning(
        mut self,
        id: impl Into<FunctionId>,
        returns: ReturnShape,
        tags: impl IntoIterator<Item = Tag>,
    ) -> DeclarationResult<Self> {
        let id = id.into();
        if self.declarations.contains_key(&id) {
            return Err(DeclarationError::DuplicateFunction(id.to_string()));
        }
        let tags = TagSet::new(id.as_str(), tags)?;
        let tags = check_shape(&id, returns, tags, self.policy)?;

        self.declarations.insert(
            id.clone(),
            Declaration { id, returns, tags },
        );
        Ok(self)
    }

    pub fn build(self) -> TagRegistry {
        TagRegistry {
            declarations: self.declarations,
            policy: self.policy,
        }
    }
}

/// Immutable map from function identity to its declaration.
#[derive(Debug, Default)]
pub struct TagRegistry {
    declarations: HashMap<FunctionId, Declaration>,
    policy: MisdeclarationPolicy,
}

impl TagRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// A registry with no declarations.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load declarations from YAML text.
    pub fn from_yaml_str(yaml: &str) -> DeclarationResult<Self> {
        let file: DeclarationFile = serde_yaml::from_str(yaml)?;
        file.into_registry()
    }

    /// Load declarations from a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> DeclarationResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn get(&self, id: &FunctionId) -> Option<&Declaration> {
        self.declarations.get(id)
    }

    /// The canonical plan for `id`; empty if the function is undeclared.
    pub fn plan_for(&self, id: &FunctionId) -> TransformPlan {
        self.get(id).map(Declaration::plan).unwrap_or_default()
    }

    /// The policy the registry was built with; binding reuses it.
    pub fn policy(&self) -> MisdeclarationPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// All declarations, sorted by function id.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        let mut all: Vec<&Declaration> = self.declarations.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all.into_iter()
    }
}

// ---------------------------------------------------------------------------
// Declaration file
// ---------------------------------------------------------------------------

/// On-disk form of a registry.
///
/// ```yaml
/// policy: reject
/// functions:
///   catalog::items_in_order:
///     tags: [reverse]
///   catalog::count:
///     returns: scalar
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeclarationFile {
    #[serde(default)]
    policy: MisdeclarationPolicy,
    #[serde(default)]
    functions: BTreeMap<String, FunctionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FunctionEntry {
    #[serde(default)]
    returns: ReturnShape,
    #[serde(default)]
    tags: Vec<Tag>,
}

impl DeclarationFile {
    fn into_registry(self) -> DeclarationResult<TagRegistry> {
        let mut builder = RegistryBuilder::new().with_policy(self.policy);
        for (name, entry) in self.functions {
            builder = builder.declare_returning(name, entry.returns, entry.tags)?;
        }
        Ok(builder.build())
    }
}
