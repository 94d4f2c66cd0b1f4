//! Electrical routing primitives.
//!
//! Two reusable operations: a net-checked direct track between two pads, and
//! a fanout via that brings a surface pad's signal to the opposite layer
//! through a via next to the pad. Both are additive; nothing here checks for
//! pre-existing copper, so the caller must start from an unrouted board.

use tracing::debug;

use crate::board::{Board, Layer, Track, Via};
use crate::config::{PlacerConfig, RoutingConfig};
use crate::error::Error;
use crate::geometry::PointMm;
use crate::walker::KeyPlan;

/// Create a straight track between two pads that already share a net.
///
/// A net mismatch means the schematic and the footprint references disagree;
/// drawing the track anyway would silently produce a wrong board, so it is a
/// fatal error instead.
pub fn connect_pads(
    board: &mut dyn Board,
    routing: &RoutingConfig,
    a_ref: &str,
    a_pad: &str,
    b_ref: &str,
    b_pad: &str,
) -> Result<(), Error> {
    let a = board.pad(a_ref, a_pad)?;
    let b = board.pad(b_ref, b_pad)?;
    if a.net != b.net {
        return Err(Error::NetMismatch {
            a_ref: a_ref.to_string(),
            a_pad: a_pad.to_string(),
            a_net: a.net,
            b_ref: b_ref.to_string(),
            b_pad: b_pad.to_string(),
            b_net: b.net,
        });
    }
    board.add_track(Track {
        start: a.center,
        end: b.center,
        layer: Layer::BCu,
        width_mm: routing.track_width_mm,
        net: a.net,
    })
}

/// Drop a through via at `pad center + offset` and connect the pad to it.
pub fn fanout_via(
    board: &mut dyn Board,
    routing: &RoutingConfig,
    reference: &str,
    pad: &str,
    offset: PointMm,
) -> Result<(), Error> {
    let info = board.pad(reference, pad)?;
    let at = info.center + offset;
    board.add_via(Via {
        at,
        layers: (Layer::FCu, Layer::BCu),
        drill_mm: routing.via_drill_mm,
        diameter_mm: routing.via_diameter_mm,
        net: info.net,
    })?;
    board.add_track(Track {
        start: info.center,
        end: at,
        layer: Layer::BCu,
        width_mm: routing.track_width_mm,
        net: info.net,
    })
}

/// Per-key routing: the switch-to-diode return path plus the column and row
/// signal fanouts.
pub fn route_keys(
    board: &mut dyn Board,
    plan: &KeyPlan,
    config: &PlacerConfig,
) -> Result<(), Error> {
    for key in plan.keys() {
        let switch_ref = config.refs.switch(key.index);
        let diode_ref = config.refs.diode(key.index);
        debug!(index = key.index, "routing key");
        connect_pads(board, &config.routing, &switch_ref, "1", &diode_ref, "2")?;
        fanout_via(
            board,
            &config.routing,
            &switch_ref,
            "2",
            config.routing.switch_fanout,
        )?;
        fanout_via(
            board,
            &config.routing,
            &diode_ref,
            "1",
            config.routing.diode_fanout,
        )?;
    }
    Ok(())
}
