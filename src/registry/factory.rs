use std::marker::PhantomData;
use std::sync::Arc;

use crate::registry::builder::Builder;
use crate::registry::key::{DefaultTag, DependencyKey};
use crate::registry::shared::Shared;
use crate::registry::types::{BuildFn, InjectResult, SharingMode};

/// Process-wide access point for the dependency `D` under tag `T`.
///
/// `Factory` is never instantiated; all of its operations are associated
/// functions that locate the single builder slot for `(D, T)` and forward to
/// it. The slot is created on first reference, whether that is a declaration
/// or a retrieval.
///
/// ```
/// use depinject::registry::Factory;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".into()
///     }
/// }
///
/// fn english() -> Option<Box<dyn Greeter>> {
///     Some(Box::new(English))
/// }
///
/// Factory::<dyn Greeter>::declare(english).unwrap();
/// assert_eq!(Factory::<dyn Greeter>::get().unwrap().greet(), "hello");
/// ```
pub struct Factory<D: ?Sized, T: ?Sized = DefaultTag> {
    _marker: PhantomData<fn() -> (*const D, *const T)>,
}

impl<D, T> Factory<D, T>
where
    D: ?Sized + Send + Sync + 'static,
    T: ?Sized + 'static,
{
    pub fn key() -> DependencyKey {
        DependencyKey::of::<D, T>()
    }

    /// The builder slot for this dependency and tag.
    pub fn builder() -> Builder<D> {
        crate::registry::builder_for::<D, T>()
    }

    /// Declares a shared dependency: the first `get` builds it, later calls
    /// return the same instance.
    pub fn declare<F>(build: F) -> InjectResult<()>
    where
        F: Fn() -> Option<Box<D>> + Send + Sync + 'static,
    {
        let build: BuildFn<D> = Arc::new(build);
        Self::builder().declare(Some(build), SharingMode::Shared)
    }

    /// Declares a unique dependency: every `get_unique` builds a new instance
    /// owned by the caller.
    pub fn declare_unique<F>(build: F) -> InjectResult<()>
    where
        F: Fn() -> Option<Box<D>> + Send + Sync + 'static,
    {
        let build: BuildFn<D> = Arc::new(build);
        Self::builder().declare(Some(build), SharingMode::Unique)
    }

    pub fn get() -> InjectResult<Shared<D>> {
        Self::builder().get_shared()
    }

    pub fn get_unique() -> InjectResult<Box<D>> {
        Self::builder().get_unique()
    }

    pub fn is_declared() -> bool {
        Self::builder().is_declared()
    }

    /// Clears the declaration and cached instance for this dependency.
    /// Test-only; see [`Builder::testing_reset`].
    #[cfg(any(test, feature = "testing"))]
    pub fn testing_reset() {
        Self::builder().testing_reset();
    }
}
