//! Return-shape dispatch
//!
//! `Outcome` is implemented by every type a tagged function may return. The
//! implementation decides, from the static type and the runtime value, which
//! parts of a `TransformPlan` can apply:
//!
//! - `Option<Vec<T>>`, `Option<List<T>>`: absent or a sequence
//! - `Vec<T>`: always a sequence, substitution never fires
//! - `serde_json::Value`: `null` is absent, arrays are sequences, anything
//!   else passes through untouched
//! - primitive scalars and `String`: never transformed

use crate::list::List;
use crate::registry::{FunctionId, ReturnShape};
use crate::tag::{Step, TransformPlan};
use crate::transform;
use serde_json::Value;
use tracing::{debug, warn};

/// A value produced by a tagged function.
pub trait Outcome: Sized {
    /// What the caller receives after the plan runs.
    type Output;

    /// Static shape, checked against the declaration at bind time.
    const SHAPE: ReturnShape;

    /// Run `plan` over this value.
    fn apply(self, plan: &TransformPlan, function: &FunctionId) -> Self::Output;
}

/// A concrete ordered sequence the plan can operate on.
trait Sequence: Sized {
    fn len(&self) -> usize;
    /// The value itself if present, otherwise a new empty sequence.
    fn or_empty(value: Option<Self>, modifiable: bool) -> Self;
    fn deduplicated(self) -> Self;
    fn reversed(self) -> Self;
}

impl<T: PartialEq> Sequence for List<T> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn or_empty(value: Option<Self>, modifiable: bool) -> Self {
        transform::not_null_default(value, modifiable)
    }

    fn deduplicated(self) -> Self {
        self.map_items(transform::deduplicate)
    }

    fn reversed(self) -> Self {
        self.map_items(transform::reverse)
    }
}

/// JSON array contents. `Value` has no `Hash`, so duplicates are found by
/// comparing serialized forms.
struct JsonArray(Vec<Value>);

impl Sequence for JsonArray {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn or_empty(value: Option<Self>, _modifiable: bool) -> Self {
        value.unwrap_or_else(|| JsonArray(Vec::new()))
    }

    fn deduplicated(self) -> Self {
        JsonArray(transform::deduplicate_by_key(self.0, Value::to_string))
    }

    fn reversed(self) -> Self {
        JsonArray(transform::reverse(self.0))
    }
}

/// Execute the plan's steps in canonical order.
///
/// Substitution only fires on an absent value. Deduplication and reversal
/// only fire on a present one; an absent value with no substitution declared
/// reaches the caller as absent.
fn run_plan<S: Sequence>(value: Option<S>, plan: &TransformPlan, function: &FunctionId) -> Option<S> {
    let mut value = value;
    for step in plan.steps() {
        let name = step.name();
        value = match (step, value) {
            (Step::Substitute { modifiable }, value) => {
                if value.is_some() {
                    debug!(function = %function, transform = name, "skipped: result present");
                } else {
                    debug!(function = %function, transform = name, modifiable, "substituting empty sequence for absent result");
                }
                Some(S::or_empty(value, modifiable))
            }
            (Step::Deduplicate, Some(seq)) => {
                let before = seq.len();
                let seq = seq.deduplicated();
                debug!(function = %function, transform = name, before, len = seq.len(), "applied");
                Some(seq)
            }
            (Step::Reverse, Some(seq)) => {
                debug!(function = %function, transform = name, len = seq.len(), "applied");
                Some(seq.reversed())
            }
            (_, None) => {
                debug!(function = %function, transform = name, "skipped: result absent");
                None
            }
        };
    }
    value
}

impl<T: PartialEq> Outcome for Option<List<T>> {
    type Output = Option<List<T>>;
    const SHAPE: ReturnShape = ReturnShape::Sequence;

    fn apply(self, plan: &TransformPlan, function: &FunctionId) -> Self::Output {
        run_plan(self, plan, function)
    }
}

impl<T: PartialEq> Outcome for Option<Vec<T>> {
    type Output = Option<List<T>>;
    const SHAPE: ReturnShape = ReturnShape::Sequence;

    fn apply(self, plan: &TransformPlan, function: &FunctionId) -> Self::Output {
        run_plan(self.map(List::from), plan, function)
    }
}

impl<T: PartialEq> Outcome for Vec<T> {
    type Output = List<T>;
    const SHAPE: ReturnShape = ReturnShape::Sequence;

    fn apply(self, plan: &TransformPlan, function: &FunctionId) -> Self::Output {
        // A present input never comes back absent.
        run_plan(Some(List::from(self)), plan, function).unwrap_or_default()
    }
}

impl Outcome for Value {
    type Output = Value;
    const SHAPE: ReturnShape = ReturnShape::Dynamic;

    fn apply(self, plan: &TransformPlan, function: &FunctionId) -> Self::Output {
        let raw = match self {
            Value::Null => None,
            Value::Array(items) => Some(JsonArray(items)),
            scalar => {
                if !plan.is_noop() {
                    warn!(function = %function, plan = %plan, "result is not a sequence, transforms skipped");
                }
                return scalar;
            }
        };
        match run_plan(raw, plan, function) {
            Some(JsonArray(items)) => Value::Array(items),
            None => Value::Null,
        }
    }
}

macro_rules! scalar_outcome {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Outcome for $ty {
                type Output = $ty;
                const SHAPE: ReturnShape = ReturnShape::Scalar;

                fn apply(self, _plan: &TransformPlan, _function: &FunctionId) -> Self::Output {
                    self
                }
            }
        )*
    };
}

scalar_outcome!(
    (), bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String,
);
