//! The external board model the placement algorithm drives.
//!
//! The algorithm never owns the board; it borrows a [`Board`] handle for the
//! duration of one run. [`MemoryBoard`] is a serde-backed in-memory
//! implementation used by the CLI and the tests; [`DryRun`] wraps any board,
//! answers lookups from it and logs every would-be mutation instead of
//! applying it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::PlacerConfig;
use crate::error::Error;
use crate::geometry::PointMm;

pub type NetId = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layer {
    #[serde(rename = "F.Cu")]
    FCu,
    #[serde(rename = "B.Cu")]
    BCu,
}

/// A straight copper segment on one layer, carrying one net.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub start: PointMm,
    pub end: PointMm,
    pub layer: Layer,
    pub width_mm: f64,
    pub net: NetId,
}

/// A through-board connector spanning two layers, carrying one net.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Via {
    pub at: PointMm,
    pub layers: (Layer, Layer),
    pub drill_mm: f64,
    pub diameter_mm: f64,
    pub net: NetId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PadDef {
    pub name: String,
    pub net: NetId,
    /// Pad center relative to the unrotated, unflipped footprint center.
    pub offset: PointMm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Footprint {
    pub position: PointMm,
    pub orientation_deg: f64,
    pub flipped: bool,
    pub pads: Vec<PadDef>,
}

impl Footprint {
    fn pad_center(&self, pad: &PadDef) -> PointMm {
        let mut offset = pad.offset;
        if self.flipped {
            offset.x = -offset.x;
        }
        self.position + offset.rotated(self.orientation_deg)
    }
}

/// Resolved view of one pad: its net identity and absolute center.
#[derive(Debug, Clone, Copy)]
pub struct PadInfo {
    pub net: NetId,
    pub center: PointMm,
}

/// Minimal surface the placement and routing phases need from a CAD board.
pub trait Board {
    fn set_position(&mut self, reference: &str, at: PointMm) -> Result<(), Error>;
    fn set_orientation(&mut self, reference: &str, degrees: f64) -> Result<(), Error>;
    fn flip(&mut self, reference: &str) -> Result<(), Error>;
    fn is_flipped(&self, reference: &str) -> Result<bool, Error>;
    fn pad(&self, reference: &str, pad: &str) -> Result<PadInfo, Error>;
    fn add_track(&mut self, track: Track) -> Result<(), Error>;
    fn add_via(&mut self, via: Via) -> Result<(), Error>;
    /// Whether the board already carries any tracks or vias.
    fn has_routes(&self) -> bool;
    /// Cosmetic view refresh; best effort.
    fn refresh(&mut self) {}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryBoard {
    pub footprints: IndexMap<String, Footprint>,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub vias: Vec<Via>,
}

impl MemoryBoard {
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn footprint(&self, reference: &str) -> Result<&Footprint, Error> {
        self.footprints
            .get(reference)
            .ok_or_else(|| Error::FootprintNotFound {
                reference: reference.to_string(),
            })
    }

    fn footprint_mut(&mut self, reference: &str) -> Result<&mut Footprint, Error> {
        self.footprints
            .get_mut(reference)
            .ok_or_else(|| Error::FootprintNotFound {
                reference: reference.to_string(),
            })
    }

    /// Build a board carrying the full matrix complement of footprints, the
    /// way the PCB template is laid out before this tool runs: one switch
    /// and diode per matrix slot, plus the LED/capacitor chain, all parked
    /// at the origin with electrically consistent nets.
    #[must_use]
    pub fn matrix_template(config: &PlacerConfig) -> Self {
        let mut footprints = IndexMap::new();

        let vdd: NetId = 401;
        let gnd: NetId = 402;

        for index in 1..=config.matrix.slot_count() {
            let col = (index - 1) % config.matrix.grid_width;
            let row = (index - 1) / config.matrix.grid_width;
            // The switch's pad 1 and the diode's pad 2 share the per-key net
            // that the diode isolates from the row line.
            let key_net = 10_000 + index as NetId;
            let col_net = 200 + col as NetId;
            let row_net = 300 + row as NetId;

            footprints.insert(
                config.refs.switch(index),
                Footprint {
                    position: PointMm::new(0.0, 0.0),
                    orientation_deg: 0.0,
                    flipped: false,
                    pads: vec![
                        PadDef {
                            name: "1".to_string(),
                            net: key_net,
                            offset: PointMm::new(-3.81, -2.54),
                        },
                        PadDef {
                            name: "2".to_string(),
                            net: col_net,
                            offset: PointMm::new(2.54, -5.08),
                        },
                    ],
                },
            );
            footprints.insert(
                config.refs.diode(index),
                Footprint {
                    position: PointMm::new(0.0, 0.0),
                    orientation_deg: 0.0,
                    flipped: false,
                    pads: vec![
                        PadDef {
                            name: "1".to_string(),
                            net: row_net,
                            offset: PointMm::new(0.0, -1.65),
                        },
                        PadDef {
                            name: "2".to_string(),
                            net: key_net,
                            offset: PointMm::new(0.0, 1.65),
                        },
                    ],
                },
            );
        }

        let led_total = config.leds.edge_base_index + 2 * config.leds.edge_count_per_side - 1;
        for index in 1..=led_total {
            let din = 500 + index as NetId;
            let dout = din + 1;
            footprints.insert(
                config.refs.led(index),
                Footprint {
                    position: PointMm::new(0.0, 0.0),
                    orientation_deg: 0.0,
                    flipped: false,
                    pads: vec![
                        PadDef {
                            name: "1".to_string(),
                            net: vdd,
                            offset: PointMm::new(-2.45, -1.6),
                        },
                        PadDef {
                            name: "2".to_string(),
                            net: din,
                            offset: PointMm::new(-2.45, 1.6),
                        },
                        PadDef {
                            name: "3".to_string(),
                            net: gnd,
                            offset: PointMm::new(2.45, 1.6),
                        },
                        PadDef {
                            name: "4".to_string(),
                            net: dout,
                            offset: PointMm::new(2.45, -1.6),
                        },
                    ],
                },
            );
            footprints.insert(
                config.refs.led_cap(index),
                Footprint {
                    position: PointMm::new(0.0, 0.0),
                    orientation_deg: 0.0,
                    flipped: false,
                    pads: vec![
                        PadDef {
                            name: "1".to_string(),
                            net: vdd,
                            offset: PointMm::new(-0.48, 0.0),
                        },
                        PadDef {
                            name: "2".to_string(),
                            net: gnd,
                            offset: PointMm::new(0.48, 0.0),
                        },
                    ],
                },
            );
        }

        Self {
            footprints,
            tracks: Vec::new(),
            vias: Vec::new(),
        }
    }
}

impl Board for MemoryBoard {
    fn set_position(&mut self, reference: &str, at: PointMm) -> Result<(), Error> {
        self.footprint_mut(reference)?.position = at;
        Ok(())
    }

    fn set_orientation(&mut self, reference: &str, degrees: f64) -> Result<(), Error> {
        self.footprint_mut(reference)?.orientation_deg = degrees;
        Ok(())
    }

    fn flip(&mut self, reference: &str) -> Result<(), Error> {
        let fp = self.footprint_mut(reference)?;
        fp.flipped = !fp.flipped;
        Ok(())
    }

    fn is_flipped(&self, reference: &str) -> Result<bool, Error> {
        Ok(self.footprint(reference)?.flipped)
    }

    fn pad(&self, reference: &str, pad: &str) -> Result<PadInfo, Error> {
        let fp = self.footprint(reference)?;
        let def = fp
            .pads
            .iter()
            .find(|p| p.name == pad)
            .ok_or_else(|| Error::PadNotFound {
                reference: reference.to_string(),
                pad: pad.to_string(),
            })?;
        Ok(PadInfo {
            net: def.net,
            center: fp.pad_center(def),
        })
    }

    fn add_track(&mut self, track: Track) -> Result<(), Error> {
        self.tracks.push(track);
        Ok(())
    }

    fn add_via(&mut self, via: Via) -> Result<(), Error> {
        self.vias.push(via);
        Ok(())
    }

    fn has_routes(&self) -> bool {
        !self.tracks.is_empty() || !self.vias.is_empty()
    }
}

/// Preview mode: lookups come from the wrapped board, mutations are logged
/// and discarded. Lets the whole pipeline run, checks included, without
/// touching persisted state.
#[derive(Debug)]
pub struct DryRun<'a, B: Board> {
    inner: &'a B,
}

impl<'a, B: Board> DryRun<'a, B> {
    #[must_use]
    pub fn new(inner: &'a B) -> Self {
        Self { inner }
    }
}

impl<B: Board> Board for DryRun<'_, B> {
    fn set_position(&mut self, reference: &str, at: PointMm) -> Result<(), Error> {
        info!(reference, x = at.x, y = at.y, "would set position");
        Ok(())
    }

    fn set_orientation(&mut self, reference: &str, degrees: f64) -> Result<(), Error> {
        info!(reference, degrees, "would set orientation");
        Ok(())
    }

    fn flip(&mut self, reference: &str) -> Result<(), Error> {
        info!(reference, "would flip to the other side");
        Ok(())
    }

    fn is_flipped(&self, reference: &str) -> Result<bool, Error> {
        self.inner.is_flipped(reference)
    }

    fn pad(&self, reference: &str, pad: &str) -> Result<PadInfo, Error> {
        self.inner.pad(reference, pad)
    }

    fn add_track(&mut self, track: Track) -> Result<(), Error> {
        info!(
            net = track.net,
            "would add track ({}, {}) -> ({}, {})",
            track.start.x,
            track.start.y,
            track.end.x,
            track.end.y
        );
        Ok(())
    }

    fn add_via(&mut self, via: Via) -> Result<(), Error> {
        info!(net = via.net, "would add via at ({}, {})", via.at.x, via.at.y);
        Ok(())
    }

    fn has_routes(&self) -> bool {
        self.inner.has_routes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn template() -> MemoryBoard {
        MemoryBoard::matrix_template(&PlacerConfig::default())
    }

    #[test]
    fn template_has_full_matrix_complement() {
        let board = template();
        for index in 1..=96 {
            assert!(board.footprints.contains_key(&format!("SW{index}")));
            assert!(board.footprints.contains_key(&format!("D{index}")));
        }
        assert!(board.footprints.contains_key("E103"));
        assert!(board.footprints.contains_key("CS103"));
        assert!(!board.has_routes());
    }

    #[test]
    fn pad_center_follows_position_and_rotation() {
        let mut board = template();
        board.set_position("SW1", PointMm::new(50.0, 60.0)).unwrap();
        let pad = board.pad("SW1", "1").unwrap();
        assert_abs_diff_eq!(pad.center.x, 50.0 - 3.81, epsilon = 1e-9);
        assert_abs_diff_eq!(pad.center.y, 60.0 - 2.54, epsilon = 1e-9);

        board.set_orientation("SW1", 180.0).unwrap();
        let pad = board.pad("SW1", "1").unwrap();
        assert_abs_diff_eq!(pad.center.x, 50.0 + 3.81, epsilon = 1e-9);
        assert_abs_diff_eq!(pad.center.y, 60.0 + 2.54, epsilon = 1e-9);
    }

    #[test]
    fn flip_mirrors_pad_x() {
        let mut board = template();
        board.set_position("D1", PointMm::new(10.0, 0.0)).unwrap();
        board.flip("D1").unwrap();
        assert!(board.is_flipped("D1").unwrap());
        // Diode pads sit on the y axis, so use a switch pad instead.
        board.set_position("SW1", PointMm::new(10.0, 0.0)).unwrap();
        board.flip("SW1").unwrap();
        let pad = board.pad("SW1", "1").unwrap();
        assert_abs_diff_eq!(pad.center.x, 10.0 + 3.81, epsilon = 1e-9);
    }

    #[test]
    fn missing_footprint_and_pad_are_reported() {
        let board = template();
        assert!(matches!(
            board.pad("SW999", "1"),
            Err(Error::FootprintNotFound { .. })
        ));
        assert!(matches!(
            board.pad("SW1", "9"),
            Err(Error::PadNotFound { .. })
        ));
    }

    #[test]
    fn dry_run_discards_mutations() {
        let board = template();
        let mut preview = DryRun::new(&board);
        preview.set_position("SW1", PointMm::new(1.0, 2.0)).unwrap();
        preview
            .add_via(Via {
                at: PointMm::new(0.0, 0.0),
                layers: (Layer::FCu, Layer::BCu),
                drill_mm: 0.5,
                diameter_mm: 1.0,
                net: 1,
            })
            .unwrap();
        assert!(!board.has_routes());
        assert_abs_diff_eq!(board.footprints["SW1"].position.x, 0.0);
    }
}
