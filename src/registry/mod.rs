#![doc = include_str!("README.md")]

mod builder;
mod factory;
mod key;
mod macros;
mod settings;
mod shared;
mod types;

pub use builder::Builder;
pub use factory::Factory;
pub use key::{DefaultTag, DependencyKey};
pub use settings::{
    configure, redeclare_policy, set_redeclare_policy, InjectSettings, IntoRedeclarePolicy,
    RedeclarePolicy, REDECLARE_POLICY_ENV,
};
pub use shared::Shared;
pub use types::{BuildFn, InjectError, InjectResult, Instance, SharingMode};

use std::any::Any;
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, MutexGuard};


/// Type-erased view of a builder slot, so the table can hold slots for
/// every dependency type side by side.
trait Slot: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn handle(&self) -> Box<dyn Slot>;
    fn is_declared(&self) -> bool;
    #[cfg(any(test, feature = "testing"))]
    fn testing_reset(&self);
}

impl<D> Slot for Builder<D>
where
    D: ?Sized + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn handle(&self) -> Box<dyn Slot> {
        Box::new(self.clone())
    }

    fn is_declared(&self) -> bool {
        Builder::is_declared(self)
    }

    #[cfg(any(test, feature = "testing"))]
    fn testing_reset(&self) {
        Builder::testing_reset(self)
    }
}

static GLOBAL_BUILDERS: LazyLock<Mutex<HashMap<DependencyKey, Box<dyn Slot>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn builders_guard() -> MutexGuard<'static, HashMap<DependencyKey, Box<dyn Slot>>> {
    GLOBAL_BUILDERS
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

pub(crate) fn builder_for<D, T>() -> Builder<D>
where
    D: ?Sized + Send + Sync + 'static,
    T: ?Sized + 'static,
{
    let key = DependencyKey::of::<D, T>();
    let mut builders = builders_guard();
    let slot = builders
        .entry(key)
        .or_insert_with(|| Box::new(Builder::<D>::new(key)) as Box<dyn Slot>);
    match slot.as_any().downcast_ref::<Builder<D>>() {
        Some(builder) => builder.clone(),
        None => unreachable!("slot {key} holds a builder for another type"),
    }
}

// Slot state is never locked while the table is held: a construction
// function runs under its slot lock and may look up other slots.
fn snapshot() -> Vec<(DependencyKey, Box<dyn Slot>)> {
    builders_guard()
        .iter()
        .map(|(key, slot)| (*key, slot.handle()))
        .collect()
}

/// Keys of every slot that currently holds a declaration, in display order.
pub fn declared_keys() -> Vec<DependencyKey> {
    let mut keys: Vec<DependencyKey> = snapshot()
        .into_iter()
        .filter(|(_, slot)| slot.is_declared())
        .map(|(key, _)| key)
        .collect();
    keys.sort();
    keys
}

/// Resets every slot referenced so far. Test-only.
#[cfg(any(test, feature = "testing"))]
pub fn testing_reset_all() {
    for (_, slot) in snapshot() {
        slot.testing_reset();
    }
}
