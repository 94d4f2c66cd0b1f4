//! Per-key LED chain and edge LED placement.
//!
//! The key LEDs form a single data chain that snakes through the lit keys in
//! serpentine order: even rows left to right, odd rows right to left. On
//! reversed rows the LED and capacitor orientations flip and the fanout via
//! offsets change sign, keeping the vias on the same physical side of every
//! LED no matter which way the chain runs.

use tracing::debug;

use crate::board::Board;
use crate::config::PlacerConfig;
use crate::error::Error;
use crate::geometry::PointMm;
use crate::route::fanout_via;
use crate::walker::KeyPlan;

/// Place and fan out the per-key LEDs and their companion capacitors,
/// assigning chain indices in serpentine order.
pub fn place_key_led_chain(
    board: &mut dyn Board,
    plan: &KeyPlan,
    config: &PlacerConfig,
) -> Result<(), Error> {
    let leds = &config.leds;
    let mut led_index = 1usize;
    let mut reversed = false;

    for row in plan.lit_rows() {
        let ordered: Vec<_> = if reversed {
            row.into_iter().rev().collect()
        } else {
            row
        };
        let sign = if reversed { -1.0 } else { 1.0 };

        for key in ordered {
            let led_ref = config.refs.led(led_index);
            debug!(led = %led_ref, key = key.index, reversed, "placing chain LED");
            board.set_position(&led_ref, key.center + leds.led_offset)?;
            board.set_orientation(&led_ref, if reversed { 0.0 } else { 180.0 })?;
            fanout_via(
                board,
                &config.routing,
                &led_ref,
                "1",
                PointMm::new(sign * leds.led_fanout_x, 0.0),
            )?;
            fanout_via(
                board,
                &config.routing,
                &led_ref,
                "3",
                PointMm::new(sign * -leds.led_fanout_x, 0.0),
            )?;

            let cap_ref = config.refs.led_cap(led_index);
            board.set_position(&cap_ref, key.center + leds.cap_offset)?;
            board.set_orientation(&cap_ref, if reversed { 90.0 } else { 270.0 })?;
            // The rotated capacitor swaps which pad faces the via, so the
            // offset stays fixed and the pad name changes with direction.
            let cap_pad = if reversed { "2" } else { "1" };
            fanout_via(
                board,
                &config.routing,
                &cap_ref,
                cap_pad,
                PointMm::new(leds.cap_fanout_x, 0.0),
            )?;

            led_index += 1;
        }

        reversed = !reversed;
    }
    Ok(())
}

/// Place the fixed edge LED columns along the left and right case edges.
///
/// Each side carries `edge_count_per_side` LEDs spread over a vertical span
/// centered on the case, walked bottom to top; the right-hand column mirrors
/// the left one (flipped orientations, offset signs and via pads).
pub fn place_edge_leds(board: &mut dyn Board, config: &PlacerConfig) -> Result<(), Error> {
    let leds = &config.leds;
    let case = &config.case;
    let per_side = leds.edge_count_per_side;
    let step_mm = leds.edge_span_mm / (per_side - 1) as f64;

    for i in 0..2 * per_side {
        let index = leds.edge_base_index + i;
        let right = i >= per_side;
        let step = (i % per_side) as f64;

        let x = if right {
            case.origin.x + case.width_mm - leds.edge_inset_mm
        } else {
            case.origin.x + leds.edge_inset_mm
        };
        let y = case.origin.y + case.height_mm / 2.0 + leds.edge_span_mm / 2.0 - step * step_mm;

        let led_ref = config.refs.led(index);
        debug!(led = %led_ref, right, "placing edge LED");
        board.set_position(&led_ref, PointMm::new(x, y))?;
        board.set_orientation(&led_ref, if right { 270.0 } else { 90.0 })?;

        let cap_ref = config.refs.led_cap(index);
        board.set_orientation(&cap_ref, if right { 90.0 } else { 270.0 })?;
        let cap_x = if right {
            x - leds.edge_cap_x_mm
        } else {
            x + leds.edge_cap_x_mm
        };
        board.set_position(&cap_ref, PointMm::new(cap_x, y))?;

        let fanout_y = if right {
            leds.edge_cap_fanout_y
        } else {
            -leds.edge_cap_fanout_y
        };
        fanout_via(board, &config.routing, &cap_ref, "1", PointMm::new(0.0, fanout_y))?;
        fanout_via(board, &config.routing, &cap_ref, "2", PointMm::new(0.0, -fanout_y))?;
    }
    Ok(())
}
