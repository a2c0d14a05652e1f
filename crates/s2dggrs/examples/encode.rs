//! Encode a position, walk up its ancestry, and list its neighbours.

use std::error::Error;

use s2dggrs::{Length, Position, ReferenceSystem};

fn main() -> Result<(), Box<dyn Error>> {
    let rs = ReferenceSystem::shared();
    let mut coder = rs.create_coder();
    coder.set_precision(Length::kilometres(10.0));
    println!(
        "{} grid, level {} (~{})",
        rs.metadata().identifier,
        coder.precision_level(),
        coder.precision()
    );

    let paris = Position::geodetic(48.8566, 2.3522);
    let token = coder.encode(&paris)?;
    println!("Paris encodes to {token}");

    let zone = coder.decode(token.as_str())?;
    println!(
        "Zone {zone}: {:.1} km², centre {:?}",
        zone.area() / 1.0e6,
        zone.position()
    );

    let mut current = zone;
    while let Some(parent) = current.parent() {
        println!("  level {:2}: {parent}", parent.level());
        current = parent;
    }

    for neighbor in zone.neighbors() {
        println!("Neighbour {neighbor}");
    }

    Ok(())
}
