use std::any::{type_name, TypeId};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Tag used when a dependency is declared or retrieved without one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DefaultTag;

/// Identity of one dependency slot: the abstract type plus its tag.
///
/// Keys only come from generic parameters, so two keys are equal exactly when
/// both type parameters are the same types. The type names are carried for
/// diagnostics and take no part in comparisons.
#[derive(Clone, Copy)]
pub struct DependencyKey {
    dependency: TypeId,
    tag: TypeId,
    dependency_name: &'static str,
    tag_name: &'static str,
}

impl DependencyKey {
    pub fn of<D, T>() -> Self
    where
        D: ?Sized + 'static,
        T: ?Sized + 'static,
    {
        Self {
            dependency: TypeId::of::<D>(),
            tag: TypeId::of::<T>(),
            dependency_name: type_name::<D>(),
            tag_name: type_name::<T>(),
        }
    }

    pub fn dependency_name(&self) -> &'static str {
        self.dependency_name
    }

    pub fn tag_name(&self) -> &'static str {
        self.tag_name
    }

    pub fn is_default_tag(&self) -> bool {
        self.tag == TypeId::of::<DefaultTag>()
    }
}

impl PartialEq for DependencyKey {
    fn eq(&self, other: &Self) -> bool {
        self.dependency == other.dependency && self.tag == other.tag
    }
}

impl Eq for DependencyKey {}

impl Hash for DependencyKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dependency.hash(state);
        self.tag.hash(state);
    }
}

impl PartialOrd for DependencyKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Orders by display name first so listings are readable; ties fall back to
// the type ids to stay consistent with `Eq`.
impl Ord for DependencyKey {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.dependency_name, self.tag_name, self.dependency, self.tag).cmp(&(
            other.dependency_name,
            other.tag_name,
            other.dependency,
            other.tag,
        ))
    }
}

impl fmt::Debug for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyKey")
            .field("dependency", &self.dependency_name)
            .field("tag", &self.tag_name)
            .finish()
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default_tag() {
            f.write_str(self.dependency_name)
        } else {
            write!(f, "{}[{}]", self.dependency_name, self.tag_name)
        }
    }
}
