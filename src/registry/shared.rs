use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Handle to the instance cached by a shared dependency slot.
///
/// The slot stays the owner of the instance. A `Shared` only lends access:
/// it derefs to the dependency and can be cloned, but it offers no way to
/// take the instance out or free it. Handles stay valid after the slot drops
/// its copy (permissive redeclaration, test reset); the slot just stops
/// handing that instance out.
pub struct Shared<D: ?Sized> {
    instance: Arc<D>,
}

impl<D: ?Sized> Shared<D> {
    pub(crate) fn new(instance: Arc<D>) -> Self {
        Self { instance }
    }

    /// True when both handles point at the same instance.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.instance, &other.instance)
    }
}

impl<D: ?Sized> Clone for Shared<D> {
    fn clone(&self) -> Self {
        Self {
            instance: Arc::clone(&self.instance),
        }
    }
}

impl<D: ?Sized> Deref for Shared<D> {
    type Target = D;

    fn deref(&self) -> &D {
        &self.instance
    }
}

impl<D: ?Sized> AsRef<D> for Shared<D> {
    fn as_ref(&self) -> &D {
        &self.instance
    }
}

impl<D: ?Sized + fmt::Debug> fmt::Debug for Shared<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Shared").field(&&*self.instance).finish()
    }
}
