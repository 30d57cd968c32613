use std::fmt;
use std::sync::Arc;

use crate::registry::key::DependencyKey;
use crate::registry::shared::Shared;

/// Zero-argument construction function registered for a dependency.
///
/// Returning `None` reports a failed allocation; the registry surfaces it as
/// [`InjectError::AllocationFailed`].
pub type BuildFn<D> = Arc<dyn Fn() -> Option<Box<D>> + Send + Sync>;

pub type InjectResult<T> = Result<T, InjectError>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SharingMode {
    /// One lazily built instance, handed out by reference on every retrieval.
    #[default]
    Shared,
    /// A fresh instance per retrieval, owned by the caller.
    Unique,
}

impl SharingMode {
    pub fn from_unique(unique: bool) -> Self {
        if unique {
            SharingMode::Unique
        } else {
            SharingMode::Shared
        }
    }

    pub fn is_unique(self) -> bool {
        self == SharingMode::Unique
    }

    pub fn opposite(self) -> Self {
        match self {
            SharingMode::Shared => SharingMode::Unique,
            SharingMode::Unique => SharingMode::Shared,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SharingMode::Shared => "shared",
            SharingMode::Unique => "unique",
        }
    }
}

impl fmt::Display for SharingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a builder hands back: a borrow-like handle for shared slots, an
/// owned box for unique ones.
pub enum Instance<D: ?Sized> {
    Shared(Shared<D>),
    Unique(Box<D>),
}

impl<D: ?Sized> Instance<D> {
    pub fn mode(&self) -> SharingMode {
        match self {
            Instance::Shared(_) => SharingMode::Shared,
            Instance::Unique(_) => SharingMode::Unique,
        }
    }
}

impl<D: ?Sized> std::ops::Deref for Instance<D> {
    type Target = D;

    fn deref(&self) -> &D {
        match self {
            Instance::Shared(shared) => shared,
            Instance::Unique(boxed) => boxed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InjectError {
    NotDeclared {
        key: DependencyKey,
    },
    ModeMismatch {
        key: DependencyKey,
        requested: SharingMode,
        declared: SharingMode,
    },
    AllocationFailed {
        key: DependencyKey,
    },
    AlreadyDeclared {
        key: DependencyKey,
    },
    NullBuilder {
        key: DependencyKey,
    },
    InvalidPolicy {
        value: String,
    },
    InvalidSettings {
        message: String,
    },
}

impl InjectError {
    /// The dependency slot the failure concerns, if any.
    pub fn key(&self) -> Option<&DependencyKey> {
        match self {
            InjectError::NotDeclared { key }
            | InjectError::ModeMismatch { key, .. }
            | InjectError::AllocationFailed { key }
            | InjectError::AlreadyDeclared { key }
            | InjectError::NullBuilder { key } => Some(key),
            InjectError::InvalidPolicy { .. } | InjectError::InvalidSettings { .. } => None,
        }
    }
}

impl fmt::Display for InjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjectError::NotDeclared { key } => {
                write!(f, "DepInject: get: object type+tag not declared ({key})")
            }
            InjectError::ModeMismatch { key, requested, .. } => {
                let qualifier = if requested.is_unique() { "" } else { "non-" };
                write!(
                    f,
                    "DepInject: get: request for {qualifier}unique instance doesn't match declaration ({key})"
                )
            }
            InjectError::AllocationFailed { key } => {
                write!(f, "DepInject: get: object allocation failed ({key})")
            }
            InjectError::AlreadyDeclared { key } => {
                write!(f, "DepInject: declare: redeclaration for same type ({key})")
            }
            InjectError::NullBuilder { key } => {
                write!(
                    f,
                    "DepInject: declare: no allocation function provided ({key})"
                )
            }
            InjectError::InvalidPolicy { value } => {
                write!(f, "DepInject: unknown redeclare policy '{value}'")
            }
            InjectError::InvalidSettings { message } => {
                write!(f, "DepInject: invalid settings: {message}")
            }
        }
    }
}

impl std::error::Error for InjectError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::key::{DefaultTag, DependencyKey};

    trait Gadget {}

    #[test]
    fn mode_mismatch_message_names_requested_mode() {
        let key = DependencyKey::of::<dyn Gadget, DefaultTag>();
        let unique_request = InjectError::ModeMismatch {
            key,
            requested: SharingMode::Unique,
            declared: SharingMode::Shared,
        };
        let shared_request = InjectError::ModeMismatch {
            key,
            requested: SharingMode::Shared,
            declared: SharingMode::Unique,
        };

        assert!(unique_request
            .to_string()
            .starts_with("DepInject: get: request for unique instance doesn't match declaration"));
        assert!(shared_request
            .to_string()
            .starts_with("DepInject: get: request for non-unique instance doesn't match declaration"));
    }

    #[test]
    fn key_is_reported_for_slot_errors_only() {
        let key = DependencyKey::of::<dyn Gadget, DefaultTag>();
        assert_eq!(
            InjectError::NotDeclared { key }.key(),
            Some(&key)
        );
        assert_eq!(
            InjectError::InvalidPolicy {
                value: "lenient".into()
            }
            .key(),
            None
        );
    }

    #[test]
    fn sharing_mode_from_unique_flag() {
        assert_eq!(SharingMode::from_unique(true), SharingMode::Unique);
        assert_eq!(SharingMode::from_unique(false), SharingMode::Shared);
        assert_eq!(SharingMode::Unique.to_string(), "unique");
    }
}
