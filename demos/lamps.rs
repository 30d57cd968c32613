mod lighting;

use depinject::basic_declaration;
use depinject::registry::{declared_keys, Factory, InjectResult};

use lighting::{clear_bulb, gaudy_bulb, Bulb, ClearBulb, GaudyLamp, Lamp, LampWithUniqueBulb, Lighting};

fn main() -> InjectResult<()> {
    // Startup wiring: lamps never name a concrete bulb, this is the only
    // place that does.
    basic_declaration!(dyn Bulb, ClearBulb)?;
    Factory::<dyn Bulb, lighting::UniqueTag>::declare_unique(clear_bulb)?;
    Factory::<dyn Bulb, lighting::GaudyTag>::declare(gaudy_bulb)?;

    println!("declared dependencies:");
    for key in declared_keys() {
        println!(" - {key}");
    }

    // Both plain lamps hold the same bulb, so switching one lights the other.
    let mut hall = Lamp::<depinject::registry::DefaultTag>::new()?;
    let porch = Lamp::<depinject::registry::DefaultTag>::new()?;
    hall.toggle_switch();
    println!("porch lamp lit through the hall switch: {}", porch.is_lit());
    println!("plain lamps built: {}", lighting::lamp_count());

    // Each of these owns its bulb and releases it when dropped.
    {
        let mut desk = LampWithUniqueBulb::<lighting::UniqueTag>::new()?;
        let bedside = LampWithUniqueBulb::<lighting::UniqueTag>::new()?;
        desk.toggle_switch();
        println!("bedside lamp lit through the desk switch: {}", bedside.is_lit());
    }

    let mut disco = GaudyLamp::<lighting::GaudyTag>::new()?;
    disco.toggle_switch();
    disco.toggle_switch();

    // Asking for the wrong mode is reported, not fatal.
    match Factory::<dyn Bulb>::get_unique() {
        Ok(_) => println!("unexpected: shared bulb handed out as unique"),
        Err(err) => println!("{err}"),
    }

    Ok(())
}
