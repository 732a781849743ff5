//! Behavior tags and the canonical transform plan
//!
//! A tag names one post-processing step applied to a function's result.
//! Tags are declared per function, collected into a `TagSet`, and compiled
//! into a `TransformPlan` whose execution order is fixed: substitution,
//! then deduplication, then reversal.

use crate::error::{DeclarationError, DeclarationResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A declared post-processing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Tag {
    /// Return the sequence in reverse order.
    Reverse,
    /// Drop repeated elements, keeping each first occurrence.
    Deduplicate,
    /// Substitute an empty sequence for an absent result.
    NotNullDefault {
        /// Whether the substituted sequence accepts mutation.
        modifiable: bool,
    },
}

/// The parameter-free discriminant of a `Tag`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagKind {
    NotNullDefault,
    Deduplicate,
    Reverse,
}

impl Tag {
    /// `NotNullDefault` with the default `modifiable = true`.
    pub fn not_null_default() -> Self {
        Tag::NotNullDefault { modifiable: true }
    }

    pub fn kind(&self) -> TagKind {
        match self {
            Tag::Reverse => TagKind::Reverse,
            Tag::Deduplicate => TagKind::Deduplicate,
            Tag::NotNullDefault { .. } => TagKind::NotNullDefault,
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagKind::Reverse => write!(f, "reverse"),
            TagKind::Deduplicate => write!(f, "deduplicate"),
            TagKind::NotNullDefault => write!(f, "not_null_default"),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::NotNullDefault { modifiable: false } => {
                write!(f, "not_null_default(modifiable = false)")
            }
            other => write!(f, "{}", other.kind()),
        }
    }
}

impl FromStr for Tag {
    type Err = DeclarationError;

    /// Parse the textual form used by declaration files and the CLI.
    ///
    /// Accepts `reverse`, `deduplicate` (or `unique`), `not_null_default`
    /// (or `not_null`), optionally followed by `(modifiable = true|false)`
    /// for the latter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || DeclarationError::UnknownTag(s.to_string());
        let trimmed = s.trim();

        let (name, params) = match trimmed.split_once('(') {
            Some((name, rest)) => {
                let inner = rest.strip_suffix(')').ok_or_else(unknown)?;
                (name.trim(), Some(inner.trim()))
            }
            None => (trimmed, None),
        };

        match (name, params) {
            ("reverse", None) => Ok(Tag::Reverse),
            ("deduplicate" | "unique", None) => Ok(Tag::Deduplicate),
            ("not_null_default" | "not_null", None) => Ok(Tag::not_null_default()),
            ("not_null_default" | "not_null", Some(params)) => {
                if params.is_empty() {
                    return Ok(Tag::not_null_default());
                }
                let (key, value) = params.split_once('=').ok_or_else(unknown)?;
                if key.trim() != "modifiable" {
                    return Err(unknown());
                }
                let modifiable = value.trim().parse::<bool>().map_err(|_| unknown())?;
                Ok(Tag::NotNullDefault { modifiable })
            }
            _ => Err(unknown()),
        }
    }
}

impl TryFrom<String> for Tag {
    type Error = DeclarationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.to_string()
    }
}

/// The tags declared on one function, in declaration order.
///
/// A set never holds two tags of the same kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<Tag>,
}

impl TagSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collect tags, rejecting any kind declared more than once.
    ///
    /// `function` only labels the error.
    pub fn new(function: &str, tags: impl IntoIterator<Item = Tag>) -> DeclarationResult<Self> {
        let mut set = Self::empty();
        for tag in tags {
            if set.contains(tag.kind()) {
                return Err(DeclarationError::DuplicateTag {
                    function: function.to_string(),
                    tag: tag.kind(),
                });
            }
            set.tags.push(tag);
        }
        Ok(set)
    }

    pub fn contains(&self, kind: TagKind) -> bool {
        self.tags.iter().any(|t| t.kind() == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Tags in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    /// Compile into the canonical execution plan.
    pub fn plan(&self) -> TransformPlan {
        let mut plan = TransformPlan::default();
        for tag in &self.tags {
            match *tag {
                Tag::NotNullDefault { modifiable } => plan.substitute = Some(modifiable),
                Tag::Deduplicate => plan.deduplicate = true,
                Tag::Reverse => plan.reverse = true,
            }
        }
        plan
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.tags.iter().map(Tag::to_string).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// A single step of a `TransformPlan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Substitute { modifiable: bool },
    Deduplicate,
    Reverse,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Substitute { .. } => "not_null_default",
            Step::Deduplicate => "deduplicate",
            Step::Reverse => "reverse",
        }
    }
}

/// Which transforms run for a function, in canonical order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformPlan {
    /// `Some(modifiable)` when an absent result is replaced.
    pub substitute: Option<bool>,
    pub deduplicate: bool,
    pub reverse: bool,
}

impl TransformPlan {
    /// True if no transform is declared.
    pub fn is_noop(&self) -> bool {
        self.substitute.is_none() && !self.deduplicate && !self.reverse
    }

    /// Steps in execution order: substitution, deduplication, reversal.
    pub fn steps(&self) -> Vec<Step> {
        let mut steps = Vec::with_capacity(3);
        if let Some(modifiable) = self.substitute {
            steps.push(Step::Substitute { modifiable });
        }
        if self.deduplicate {
            steps.push(Step::Deduplicate);
        }
        if self.reverse {
            steps.push(Step::Reverse);
        }
        steps
    }
}

impl fmt::Display for TransformPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_noop() {
            return write!(f, "(none)");
        }
        let names: Vec<&str> = self.steps().iter().map(Step::name).collect();
        write!(f, "{}", names.join(" -> "))
    }
}
