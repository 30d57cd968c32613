use std::sync::{Arc, Mutex, MutexGuard};

use crate::registry::key::DependencyKey;
use crate::registry::settings::{redeclare_policy, RedeclarePolicy};
use crate::registry::shared::Shared;
use crate::registry::types::{BuildFn, InjectError, InjectResult, Instance, SharingMode};

/// Builds instances of one dependency slot.
///
/// A builder is a cheap handle; clones share the same slot state. The
/// registry keeps exactly one slot per [`DependencyKey`] for the life of the
/// process, so every handle obtained for a key sees the same declaration and
/// the same cached instance.
pub struct Builder<D: ?Sized> {
    inner: Arc<BuilderInner<D>>,
}

struct BuilderInner<D: ?Sized> {
    key: DependencyKey,
    state: Mutex<BuilderState<D>>,
}

struct BuilderState<D: ?Sized> {
    build: Option<BuildFn<D>>,
    mode: SharingMode,
    shared: Option<Arc<D>>,
}

impl<D: ?Sized> BuilderState<D> {
    fn empty() -> Self {
        Self {
            build: None,
            mode: SharingMode::Shared,
            shared: None,
        }
    }
}

impl<D: ?Sized> Clone for Builder<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D> Builder<D>
where
    D: ?Sized + Send + Sync + 'static,
{
    pub(crate) fn new(key: DependencyKey) -> Self {
        Self {
            inner: Arc::new(BuilderInner {
                key,
                state: Mutex::new(BuilderState::empty()),
            }),
        }
    }

    pub fn key(&self) -> &DependencyKey {
        &self.inner.key
    }

    pub fn is_declared(&self) -> bool {
        self.state().build.is_some()
    }

    /// True once a shared instance has been built and cached.
    pub fn is_instantiated(&self) -> bool {
        self.state().shared.is_some()
    }

    pub fn sharing_mode(&self) -> Option<SharingMode> {
        let state = self.state();
        state.build.as_ref().map(|_| state.mode)
    }

    /// Stores the construction function and sharing mode for this slot.
    ///
    /// The outcome for an already declared slot depends on the process-wide
    /// [`RedeclarePolicy`]: `Strict` rejects with `AlreadyDeclared` and keeps
    /// the first declaration, `Permissive` replaces it and drops any cached
    /// shared instance.
    pub fn declare(&self, build: Option<BuildFn<D>>, mode: SharingMode) -> InjectResult<()> {
        let policy = redeclare_policy();
        let mut state = self.state();

        if state.build.is_some() && policy == RedeclarePolicy::Strict {
            return Err(InjectError::AlreadyDeclared {
                key: *self.key(),
            });
        }

        let build = match build {
            Some(build) => build,
            None => {
                return Err(InjectError::NullBuilder {
                    key: *self.key(),
                })
            }
        };

        if state.build.is_some() {
            log::warn!(
                "{}",
                redeclared_message(self.key(), mode, state.mode, state.shared.is_some())
            );
        } else {
            log::debug!("{} declared as {mode}", self.key());
        }

        state.build = Some(build);
        state.mode = mode;
        state.shared = None;
        Ok(())
    }

    /// Produces an instance in the requested sharing mode.
    ///
    /// Shared slots build their instance on first use and hand out the cached
    /// one afterwards. Unique slots build a new instance on every call and
    /// give up ownership of it.
    pub fn get(&self, requested: SharingMode) -> InjectResult<Instance<D>> {
        let mut state = self.state();

        let build = match state.build.as_ref() {
            Some(build) => Arc::clone(build),
            None => {
                return Err(InjectError::NotDeclared {
                    key: *self.key(),
                })
            }
        };

        if requested != state.mode {
            return Err(InjectError::ModeMismatch {
                key: *self.key(),
                requested,
                declared: state.mode,
            });
        }

        match state.mode {
            SharingMode::Unique => {
                drop(state);
                let instance = self.construct(&build)?;
                Ok(Instance::Unique(instance))
            }
            SharingMode::Shared => {
                if let Some(instance) = state.shared.as_ref() {
                    return Ok(Instance::Shared(Shared::new(Arc::clone(instance))));
                }
                // Built under the slot lock so concurrent first retrievals
                // construct exactly once.
                let instance: Arc<D> = Arc::from(self.construct(&build)?);
                state.shared = Some(Arc::clone(&instance));
                log::debug!("{} shared instance created", self.key());
                Ok(Instance::Shared(Shared::new(instance)))
            }
        }
    }

    pub fn get_shared(&self) -> InjectResult<Shared<D>> {
        match self.get(SharingMode::Shared)? {
            Instance::Shared(shared) => Ok(shared),
            Instance::Unique(_) => Err(self.mode_mismatch(SharingMode::Shared)),
        }
    }

    pub fn get_unique(&self) -> InjectResult<Box<D>> {
        match self.get(SharingMode::Unique)? {
            Instance::Unique(instance) => Ok(instance),
            Instance::Shared(_) => Err(self.mode_mismatch(SharingMode::Unique)),
        }
    }

    /// Returns the slot to its just-created state: no construction function,
    /// no cached instance, shared mode.
    ///
    /// Only for tests of code that declares dependencies. Outstanding
    /// [`Shared`] handles keep their instance alive.
    #[cfg(any(test, feature = "testing"))]
    pub fn testing_reset(&self) {
        *self.state() = BuilderState::empty();
        log::debug!("{} reset", self.key());
    }

    fn construct(&self, build: &BuildFn<D>) -> InjectResult<Box<D>> {
        match build() {
            Some(instance) => Ok(instance),
            None => {
                log::warn!("{} construction function returned nothing", self.key());
                Err(InjectError::AllocationFailed {
                    key: *self.key(),
                })
            }
        }
    }

    fn mode_mismatch(&self, requested: SharingMode) -> InjectError {
        InjectError::ModeMismatch {
            key: *self.key(),
            requested,
            declared: requested.opposite(),
        }
    }

    fn state(&self) -> MutexGuard<'_, BuilderState<D>> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

fn redeclared_message(
    key: &DependencyKey,
    mode: SharingMode,
    previous: SharingMode,
    had_instance: bool,
) -> String {
    let mut message = format!("{key} redeclared as {mode} (was {previous})");
    if had_instance {
        message.push_str("; cached instance discarded");
    }
    message
}
