//! Switch and diode placement, and parking of unused matrix slots.

use tracing::debug;

use crate::board::Board;
use crate::config::PlacerConfig;
use crate::error::Error;
use crate::walker::KeyPlan;

/// Move every walked key's switch to its planned center and tuck the diode
/// beside it on the back side of the board.
pub fn place_keys(board: &mut dyn Board, plan: &KeyPlan, config: &PlacerConfig) -> Result<(), Error> {
    for key in plan.keys() {
        let switch_ref = config.refs.switch(key.index);
        debug!(
            index = key.index,
            label = %key.label,
            x = key.center.x,
            y = key.center.y,
            "placing key"
        );
        board.set_position(&switch_ref, key.center)?;

        let diode_ref = config.refs.diode(key.index);
        board.set_position(&diode_ref, key.center + config.diode_offset)?;
        if !board.is_flipped(&diode_ref)? {
            board.flip(&diode_ref)?;
        }
        board.set_orientation(&diode_ref, config.diode_rotation_deg)?;
    }
    Ok(())
}

/// Park the switch and diode of every matrix slot the walk never produced at
/// the fixed off-board coordinate, so a maximal board template ends up with
/// no stray footprints inside the outline.
pub fn park_unused(board: &mut dyn Board, plan: &KeyPlan, config: &PlacerConfig) -> Result<(), Error> {
    for index in 1..=config.matrix.slot_count() {
        if plan.used.contains(&index) {
            continue;
        }
        debug!(index, "parking unused slot");
        board.set_position(&config.refs.switch(index), config.park_at)?;
        board.set_position(&config.refs.diode(index), config.park_at)?;
    }
    Ok(())
}
