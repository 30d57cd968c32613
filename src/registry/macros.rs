/// Declares `$concrete::default()` as the shared implementation of `$dep`.
///
/// Shorthand for the common case of a concrete type with a `Default`
/// constructor. The optional third argument is the tag; it defaults to
/// [`DefaultTag`](crate::registry::DefaultTag). Evaluates to the
/// `InjectResult<()>` of the underlying [`Factory::declare`] call.
///
/// [`Factory::declare`]: crate::registry::Factory::declare
///
/// ```
/// use depinject::basic_declaration;
/// use depinject::registry::Factory;
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// #[derive(Default)]
/// struct Frozen;
///
/// impl Clock for Frozen {
///     fn now(&self) -> u64 {
///         42
///     }
/// }
///
/// struct TestTag;
///
/// basic_declaration!(dyn Clock, Frozen).unwrap();
/// basic_declaration!(dyn Clock, Frozen, TestTag).unwrap();
/// assert_eq!(Factory::<dyn Clock, TestTag>::get().unwrap().now(), 42);
/// ```
#[macro_export]
macro_rules! basic_declaration {
    ($dep:ty, $concrete:ty $(,)?) => {
        $crate::basic_declaration!($dep, $concrete, $crate::registry::DefaultTag)
    };
    ($dep:ty, $concrete:ty, $tag:ty $(,)?) => {
        $crate::registry::Factory::<$dep, $tag>::declare(|| {
            ::std::option::Option::Some(::std::boxed::Box::new(
                <$concrete as ::std::default::Default>::default(),
            ) as ::std::boxed::Box<$dep>)
        })
    };
}
