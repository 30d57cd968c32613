//! Lamp scenarios run against the public registry API.
//!
//! Every test declares its bulbs under a tag type local to that test, so the
//! tests share no registry slots and can run in parallel without resets.

#[path = "../demos/lighting/mod.rs"]
mod lighting;

use depinject::basic_declaration;
use depinject::registry::{Factory, InjectError, Shared};
use lighting::{
    burnt_out_bulb, clear_bulb, declare_for, destroyed_lamps, gaudy_bulb, Bulb, ClearBulb,
    GaudyLamp, Lamp, LampWithUniqueBulb, Lighting,
};

fn exercise_lamp_wiring<L: Lighting>() {
    let mut lamp = L::new().expect("lamp should find its bulb");
    assert!(!lamp.is_lit());
    lamp.toggle_switch();
    assert!(lamp.is_lit());
    lamp.toggle_switch();
    assert!(!lamp.is_lit());
}

macro_rules! common_scenarios {
    ($($module:ident => $lamp:ident),* $(,)?) => {
        $(
            mod $module {
                use super::*;

                #[test]
                fn get_before_declare_fails() {
                    struct Tag;
                    let err = $lamp::<Tag>::new().err().expect("lamp must not be built");
                    assert!(matches!(err, InjectError::NotDeclared { .. }));
                    assert!(err
                        .to_string()
                        .starts_with("DepInject: get: object type+tag not declared"));
                }

                #[test]
                fn failing_allocator_prevents_lamp() {
                    struct Tag;
                    declare_for::<$lamp<Tag>>(burnt_out_bulb).unwrap();
                    let err = $lamp::<Tag>::new().err().expect("lamp must not be built");
                    assert_eq!(
                        err,
                        InjectError::AllocationFailed {
                            key: Factory::<dyn Bulb, Tag>::key()
                        }
                    );
                }

                #[test]
                fn working_allocator_builds_lamp() {
                    struct Tag;
                    declare_for::<$lamp<Tag>>(clear_bulb).unwrap();
                    exercise_lamp_wiring::<$lamp<Tag>>();
                }

                #[test]
                fn declaration_under_wrong_tag_is_not_seen() {
                    struct Tag;
                    struct WrongTag;
                    Factory::<dyn Bulb, WrongTag>::declare(clear_bulb).unwrap();
                    assert!(matches!(
                        $lamp::<Tag>::new(),
                        Err(InjectError::NotDeclared { .. })
                    ));
                }

                #[test]
                fn second_declaration_is_rejected() {
                    struct Tag;
                    declare_for::<$lamp<Tag>>(clear_bulb).unwrap();
                    assert!(matches!(
                        declare_for::<$lamp<Tag>>(burnt_out_bulb),
                        Err(InjectError::AlreadyDeclared { .. })
                    ));
                    exercise_lamp_wiring::<$lamp<Tag>>();
                }

                #[test]
                fn dropping_lamp_is_recorded() {
                    struct Tag;
                    declare_for::<$lamp<Tag>>(clear_bulb).unwrap();
                    let lamp = $lamp::<Tag>::new().unwrap();

                    // Other tests drop lamps concurrently; the count only grows.
                    let before = destroyed_lamps();
                    drop(lamp);
                    assert!(destroyed_lamps() > before);
                }
            }
        )*
    };
}

common_scenarios!(
    lamp => Lamp,
    lamp_with_unique_bulb => LampWithUniqueBulb,
    gaudy_lamp => GaudyLamp,
);

#[test]
fn shared_lamp_rejects_unique_declaration() {
    struct Tag;
    Factory::<dyn Bulb, Tag>::declare_unique(clear_bulb).unwrap();

    let err = Lamp::<Tag>::new().err().expect("lamp must not be built");
    assert!(err
        .to_string()
        .starts_with("DepInject: get: request for non-unique instance doesn't match declaration"));
}

#[test]
fn unique_lamp_rejects_shared_declaration() {
    struct Tag;
    Factory::<dyn Bulb, Tag>::declare(clear_bulb).unwrap();

    let err = LampWithUniqueBulb::<Tag>::new()
        .err()
        .expect("lamp must not be built");
    assert!(err
        .to_string()
        .starts_with("DepInject: get: request for unique instance doesn't match declaration"));
}

#[test]
fn lamps_sharing_a_bulb_see_each_other() {
    struct Tag;
    basic_declaration!(dyn Bulb, ClearBulb, Tag).unwrap();

    let mut first = Lamp::<Tag>::new().unwrap();
    let second = Lamp::<Tag>::new().unwrap();
    first.toggle_switch();

    assert!(second.is_lit());
    assert!(Shared::ptr_eq(
        &Factory::<dyn Bulb, Tag>::get().unwrap(),
        &Factory::<dyn Bulb, Tag>::get().unwrap()
    ));
}

#[test]
fn lamps_with_unique_bulbs_are_independent() {
    struct Tag;
    Factory::<dyn Bulb, Tag>::declare_unique(clear_bulb).unwrap();

    let mut first = LampWithUniqueBulb::<Tag>::new().unwrap();
    let mut second = LampWithUniqueBulb::<Tag>::new().unwrap();
    first.toggle_switch();
    assert!(first.is_lit());
    assert!(!second.is_lit());

    drop(first);
    second.toggle_switch();
    assert!(second.is_lit());
}

#[test]
fn default_wiring_lights_every_lamp_kind() {
    // The only test using the lamps' own tags.
    basic_declaration!(dyn Bulb, ClearBulb).unwrap();
    Factory::<dyn Bulb, lighting::UniqueTag>::declare_unique(clear_bulb).unwrap();
    Factory::<dyn Bulb, lighting::GaudyTag>::declare(gaudy_bulb).unwrap();

    exercise_lamp_wiring::<Lamp>();
    exercise_lamp_wiring::<LampWithUniqueBulb>();
    exercise_lamp_wiring::<GaudyLamp>();

    let keys = depinject::registry::declared_keys();
    assert!(keys.contains(&Factory::<dyn Bulb>::key()));
    assert!(keys.contains(&Factory::<dyn Bulb, lighting::GaudyTag>::key()));
}
