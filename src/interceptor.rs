//! Invocation interceptor — wraps functions so their results pass through
//! the declared transforms
//!
//! Binding resolves a function's tags once, checks them against the
//! function's static return shape, and returns a wrapper with the same
//! argument type as the original. Calling the wrapper runs the original
//! body, then the canonical plan. A failing body short-circuits: its error
//! reaches the caller verbatim and no transform runs.
//!
//! Wrappers hold only immutable data. Concurrent calls, to the same wrapper
//! or different ones, share no mutable state.

use crate::error::DeclarationResult;
use crate::outcome::Outcome;
use crate::registry::{check_returns, check_shape, FunctionId, MisdeclarationPolicy, TagRegistry};
use crate::tag::{Tag, TagSet, TransformPlan};
use std::convert::Infallible;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Binds functions to the tags declared for them in a `TagRegistry`.
#[derive(Debug, Clone)]
pub struct Interceptor {
    registry: Arc<TagRegistry>,
}

impl Interceptor {
    pub fn new(registry: Arc<TagRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    /// Wrap a fallible function.
    ///
    /// Fails with `DeclarationError::TypeMismatch` when tags are declared for
    /// `id` but `R` is a scalar type, and with `DeclarationError::ShapeMismatch`
    /// when `R`'s shape contradicts the declared `returns` (unless the
    /// registry's policy ignores misdeclarations). An undeclared `id` binds
    /// with no transforms.
    pub fn bind<A, R, E, F>(
        &self,
        id: impl Into<FunctionId>,
        func: F,
    ) -> DeclarationResult<Intercepted<F, A, R, E>>
    where
        F: Fn(A) -> Result<R, E>,
        R: Outcome,
    {
        let id = id.into();
        let plan = self.resolve::<R>(&id)?;
        Ok(Intercepted::from_plan(id, plan, func))
    }

    /// Wrap a function that cannot fail.
    pub fn bind_infallible<A, R, F>(
        &self,
        id: impl Into<FunctionId>,
        func: F,
    ) -> DeclarationResult<Intercepted<impl Fn(A) -> Result<R, Infallible>, A, R, Infallible>>
    where
        F: Fn(A) -> R,
        R: Outcome,
    {
        self.bind(id, move |args: A| Ok::<R, Infallible>(func(args)))
    }

    /// Wrap an async function. The wrapper awaits the body's future and adds
    /// no suspension points of its own.
    pub fn bind_async<A, R, E, F, Fut>(
        &self,
        id: impl Into<FunctionId>,
        func: F,
    ) -> DeclarationResult<InterceptedAsync<F, A, R, E>>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        R: Outcome,
    {
        let id = id.into();
        let plan = self.resolve::<R>(&id)?;
        Ok(InterceptedAsync {
            id,
            plan,
            func,
            _signature: PhantomData,
        })
    }

    fn resolve<R: Outcome>(&self, id: &FunctionId) -> DeclarationResult<TransformPlan> {
        match self.registry.get(id) {
            Some(declaration) => {
                let policy = self.registry.policy();
                let tags = check_shape(id, R::SHAPE, declaration.tags.clone(), policy)?;
                check_returns(id, declaration.returns, R::SHAPE, policy)?;
                let plan = tags.plan();
                debug!(function = %id, plan = %plan, "bound");
                Ok(plan)
            }
            None => {
                debug!(function = %id, "bound without declaration");
                Ok(TransformPlan::default())
            }
        }
    }
}

/// A synchronous function wrapped with its transform plan.
pub struct Intercepted<F, A, R, E> {
    id: FunctionId,
    plan: TransformPlan,
    func: F,
    _signature: PhantomData<fn(A) -> Result<R, E>>,
}

impl<F, A, R, E> Intercepted<F, A, R, E>
where
    F: Fn(A) -> Result<R, E>,
    R: Outcome,
{
    /// Wrap `func` with tags given inline, without a registry.
    ///
    /// Misdeclared tags are always rejected here.
    pub fn with_tags(
        id: impl Into<FunctionId>,
        tags: impl IntoIterator<Item = Tag>,
        func: F,
    ) -> DeclarationResult<Self> {
        let id = id.into();
        let tags = TagSet::new(id.as_str(), tags)?;
        let tags = check_shape(&id, R::SHAPE, tags, MisdeclarationPolicy::Reject)?;
        Ok(Self::from_plan(id, tags.plan(), func))
    }

    fn from_plan(id: FunctionId, plan: TransformPlan, func: F) -> Self {
        Self {
            id,
            plan,
            func,
            _signature: PhantomData,
        }
    }

    /// Call the wrapped function and transform its result.
    pub fn call(&self, args: A) -> Result<R::Output, E> {
        debug!(function = %self.id, plan = %self.plan, "intercepting call");
        match (self.func)(args) {
            Ok(raw) => Ok(raw.apply(&self.plan, &self.id)),
            Err(err) => {
                debug!(function = %self.id, "call failed, no transforms applied");
                Err(err)
            }
        }
    }

    pub fn id(&self) -> &FunctionId {
        &self.id
    }

    pub fn plan(&self) -> &TransformPlan {
        &self.plan
    }
}

impl<F, A, R> Intercepted<F, A, R, Infallible>
where
    F: Fn(A) -> Result<R, Infallible>,
    R: Outcome,
{
    /// `call` for bodies that cannot fail.
    pub fn invoke(&self, args: A) -> R::Output {
        match self.call(args) {
            Ok(out) => out,
            Err(never) => match never {},
        }
    }
}

/// An async function wrapped with its transform plan.
pub struct InterceptedAsync<F, A, R, E> {
    id: FunctionId,
    plan: TransformPlan,
    func: F,
    _signature: PhantomData<fn(A) -> Result<R, E>>,
}

impl<F, A, R, E> InterceptedAsync<F, A, R, E>
where
    R: Outcome,
{
    /// Await the wrapped function and transform its result.
    pub async fn call<Fut>(&self, args: A) -> Result<R::Output, E>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        debug!(function = %self.id, plan = %self.plan, "intercepting async call");
        match (self.func)(args).await {
            Ok(raw) => Ok(raw.apply(&self.plan, &self.id)),
            Err(err) => {
                debug!(function = %self.id, "call failed, no transforms applied");
                Err(err)
            }
        }
    }

    pub fn id(&self) -> &FunctionId {
        &self.id
    }

    pub fn plan(&self) -> &TransformPlan {
        &self.plan
    }
}
