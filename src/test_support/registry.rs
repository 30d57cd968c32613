use std::sync::{LazyLock, Mutex, MutexGuard};

use crate::registry::{configure, testing_reset_all, InjectSettings};

static TEST_GUARD: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Runs the calling test alone against a pristine registry.
///
/// Holds a process-wide lock for as long as the returned guard lives, and
/// before returning puts the redeclare policy back to its default and resets
/// every slot, so state left by an earlier (possibly panicked) test never
/// leaks into the next one.
pub fn serialized() -> MutexGuard<'static, ()> {
    let guard = TEST_GUARD
        .lock()
        .unwrap_or_else(|poison| poison.into_inner());
    configure(&InjectSettings::default());
    testing_reset_all();
    guard
}
