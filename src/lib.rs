//! Deterministic switch, diode and LED placement and routing for keyboard
//! PCBs.
//!
//! A declarative row/column layout (key labels interleaved with `x`/`y`/`w`
//! spacing directives, all in key units) is walked once into a [`KeyPlan`]:
//! per-key matrix indices, millimeter centers and widths. The plan is then
//! applied against an external [`board::Board`] model, positioning switches,
//! diodes and the serpentine LED chain and creating the net-checked tracks
//! and fanout vias that wire them up.
//!
//! The whole computation is stateless across runs; applying the same layout
//! to the same board template always yields the same result. Routing is
//! additive with no deduplication, so [`apply`] insists on an unrouted board.

pub mod board;
pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod leds;
pub mod matrix;
pub mod place;
pub mod route;
pub mod walker;

use tracing::info_span;

pub use crate::board::Board;
pub use crate::config::PlacerConfig;
pub use crate::error::Error;
pub use crate::layout::Layout;
pub use crate::walker::{KeyPlan, PlannedKey};

/// Walk the layout into a placement plan. Pure; touches no board state.
pub fn plan(layout: &Layout, config: &PlacerConfig) -> Result<KeyPlan, Error> {
    walker::walk(layout, config)
}

/// Apply a plan to a board: place switches and diodes, route every key, lay
/// the LED chain and the edge LEDs, then park all unused matrix slots.
///
/// Fails up front with [`Error::AlreadyRouted`] when the board already
/// carries copper, since a second pass would duplicate every track and via.
/// There is no rollback; a mid-run failure leaves prior mutations in place.
pub fn apply(board: &mut dyn Board, plan: &KeyPlan, config: &PlacerConfig) -> Result<(), Error> {
    if board.has_routes() {
        return Err(Error::AlreadyRouted);
    }

    {
        let _span = info_span!("place_keys").entered();
        place::place_keys(board, plan, config)?;
    }
    {
        let _span = info_span!("route_keys").entered();
        route::route_keys(board, plan, config)?;
    }
    {
        let _span = info_span!("led_chain").entered();
        leds::place_key_led_chain(board, plan, config)?;
        leds::place_edge_leds(board, config)?;
    }
    {
        let _span = info_span!("park_unused").entered();
        place::park_unused(board, plan, config)?;
    }

    board.refresh();
    Ok(())
}
