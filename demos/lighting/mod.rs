//! Bulbs and lamps wired through the registry.
//!
//! Lamps only know the [`Bulb`] trait. Which bulb they get, and whether it
//! is shared with other lamps, is decided by whoever declared the bulb
//! dependency under the lamp's tag.

#![allow(dead_code)]

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use depinject::registry::{BuildFn, DefaultTag, Factory, InjectResult, SharingMode, Shared};

pub trait Bulb: Send + Sync {
    fn electrified(&self, receiving_current: bool);
    fn is_lit(&self) -> bool;
}

#[derive(Debug, Default)]
pub struct ClearBulb {
    lit: AtomicBool,
}

impl Bulb for ClearBulb {
    fn electrified(&self, receiving_current: bool) {
        self.lit.store(receiving_current, Ordering::SeqCst);
    }

    fn is_lit(&self) -> bool {
        self.lit.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
pub struct GaudyBulb {
    lit: AtomicBool,
}

impl Bulb for GaudyBulb {
    fn electrified(&self, receiving_current: bool) {
        self.lit.store(receiving_current, Ordering::SeqCst);
    }

    fn is_lit(&self) -> bool {
        self.lit.load(Ordering::SeqCst)
    }
}

pub fn clear_bulb() -> Option<Box<dyn Bulb>> {
    println!("bulb created");
    Some(Box::new(ClearBulb::default()))
}

pub fn gaudy_bulb() -> Option<Box<dyn Bulb>> {
    println!("gaudy bulb created");
    Some(Box::new(GaudyBulb::default()))
}

pub fn burnt_out_bulb() -> Option<Box<dyn Bulb>> {
    None
}

/// Tag under which [`LampWithUniqueBulb`] asks for its bulb.
pub struct UniqueTag;

/// Tag under which [`GaudyLamp`] asks for its bulb.
pub struct GaudyTag;

static LAMPS: AtomicUsize = AtomicUsize::new(0);
static UNIQUE_BULB_LAMPS: AtomicUsize = AtomicUsize::new(0);
static GAUDY_LAMPS: AtomicUsize = AtomicUsize::new(0);
static DESTROYED_LAMPS: AtomicUsize = AtomicUsize::new(0);

/// Common lamp surface so scenarios can be written once for every lamp kind.
pub trait Lighting: Sized {
    /// Tag the lamp retrieves its bulb under.
    type Tag: 'static;
    /// Whether the lamp asks for a unique bulb.
    const UNIQUE: bool;

    fn new() -> InjectResult<Self>;
    fn toggle_switch(&mut self);
    fn is_lit(&self) -> bool;
}

/// A lamp sharing the bulb declared for `T` with every other such lamp.
pub struct Lamp<T: 'static = DefaultTag> {
    bulb: Shared<dyn Bulb>,
    serial: usize,
    current_flowing: bool,
    _tag: PhantomData<T>,
}

impl<T: 'static> Lighting for Lamp<T> {
    type Tag = T;
    const UNIQUE: bool = false;

    fn new() -> InjectResult<Self> {
        let bulb = Factory::<dyn Bulb, T>::get()?;
        let serial = LAMPS.fetch_add(1, Ordering::SeqCst) + 1;
        println!("lamp #{serial} created");
        Ok(Self {
            bulb,
            serial,
            current_flowing: false,
            _tag: PhantomData,
        })
    }

    fn toggle_switch(&mut self) {
        self.current_flowing = !self.current_flowing;
        self.bulb.electrified(self.current_flowing);
        println!("lamp turned {}", if self.bulb.is_lit() { "on" } else { "off" });
    }

    fn is_lit(&self) -> bool {
        self.bulb.is_lit()
    }
}

impl<T: 'static> Drop for Lamp<T> {
    fn drop(&mut self) {
        DESTROYED_LAMPS.fetch_add(1, Ordering::SeqCst);
        println!("lamp #{} destroyed", self.serial);
    }
}

/// A lamp owning a bulb nobody else can reach.
pub struct LampWithUniqueBulb<T: 'static = UniqueTag> {
    bulb: Box<dyn Bulb>,
    serial: usize,
    current_flowing: bool,
    _tag: PhantomData<T>,
}

impl<T: 'static> Lighting for LampWithUniqueBulb<T> {
    type Tag = T;
    const UNIQUE: bool = true;

    fn new() -> InjectResult<Self> {
        let bulb = Factory::<dyn Bulb, T>::get_unique()?;
        let serial = UNIQUE_BULB_LAMPS.fetch_add(1, Ordering::SeqCst) + 1;
        println!("lamp with unique bulb #{serial} created");
        Ok(Self {
            bulb,
            serial,
            current_flowing: false,
            _tag: PhantomData,
        })
    }

    fn toggle_switch(&mut self) {
        self.current_flowing = !self.current_flowing;
        self.bulb.electrified(self.current_flowing);
        println!("lamp turned {}", if self.bulb.is_lit() { "on" } else { "off" });
    }

    fn is_lit(&self) -> bool {
        self.bulb.is_lit()
    }
}

impl<T: 'static> Drop for LampWithUniqueBulb<T> {
    fn drop(&mut self) {
        DESTROYED_LAMPS.fetch_add(1, Ordering::SeqCst);
        println!("lamp with unique bulb #{} destroyed", self.serial);
    }
}

pub struct GaudyLamp<T: 'static = GaudyTag> {
    bulb: Shared<dyn Bulb>,
    serial: usize,
    current_flowing: bool,
    _tag: PhantomData<T>,
}

impl<T: 'static> Lighting for GaudyLamp<T> {
    type Tag = T;
    const UNIQUE: bool = false;

    fn new() -> InjectResult<Self> {
        let bulb = Factory::<dyn Bulb, T>::get()?;
        let serial = GAUDY_LAMPS.fetch_add(1, Ordering::SeqCst) + 1;
        println!("gaudy lamp #{serial} created");
        Ok(Self {
            bulb,
            serial,
            current_flowing: false,
            _tag: PhantomData,
        })
    }

    fn toggle_switch(&mut self) {
        self.current_flowing = !self.current_flowing;
        self.bulb.electrified(self.current_flowing);
        println!(
            "gaudy lamp turned {}",
            if self.bulb.is_lit() { "on" } else { "off" }
        );
    }

    fn is_lit(&self) -> bool {
        self.bulb.is_lit()
    }
}

impl<T: 'static> Drop for GaudyLamp<T> {
    fn drop(&mut self) {
        DESTROYED_LAMPS.fetch_add(1, Ordering::SeqCst);
        println!("gaudy lamp #{} destroyed", self.serial);
    }
}

/// Declares `build` under the tag lamp kind `L` uses, in the sharing mode
/// that lamp expects.
pub fn declare_for<L: Lighting>(build: fn() -> Option<Box<dyn Bulb>>) -> InjectResult<()> {
    let build: BuildFn<dyn Bulb> = Arc::new(build);
    Factory::<dyn Bulb, L::Tag>::builder().declare(Some(build), SharingMode::from_unique(L::UNIQUE))
}

pub fn lamp_count() -> usize {
    LAMPS.load(Ordering::SeqCst)
}

/// Lamps of any kind dropped so far.
pub fn destroyed_lamps() -> usize {
    DESTROYED_LAMPS.load(Ordering::SeqCst)
}
