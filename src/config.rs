//! Physical-board configuration.
//!
//! Every constant of one concrete PCB lives here as data: the case outline,
//! the unit pitch, the matrix correction table, component offsets and the
//! track/via dimensions. The default values describe the board this tool was
//! written for; a different board supplies a different `PlacerConfig`
//! (deserializable from JSON) without touching the algorithms.

use serde::{Deserialize, Serialize};

use crate::geometry::PointMm;
use crate::matrix::{Correction, MatrixMap};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseOutline {
    /// Top-left corner of the case on the board sheet.
    pub origin: PointMm,
    pub width_mm: f64,
    pub height_mm: f64,
}

/// Forces the center-x of one logical position to an absolute millimeter
/// value, overriding the computed one. Applied after projection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AbsoluteX {
    pub row: usize,
    pub col: usize,
    pub x_mm: f64,
}

/// Marks a span of a logical row as present in the matrix but not part of
/// the visible, lit switch set (no LED chain slot).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UnlitSpan {
    pub row: usize,
    pub from_col: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    pub track_width_mm: f64,
    pub via_drill_mm: f64,
    pub via_diameter_mm: f64,
    /// Via offset from switch pad "2", bringing the column signal down.
    pub switch_fanout: PointMm,
    /// Via offset from diode pad "1", bringing the row signal down.
    pub diode_fanout: PointMm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedConfig {
    /// LED center relative to the key center.
    pub led_offset: PointMm,
    /// Companion capacitor center relative to the key center.
    pub cap_offset: PointMm,
    /// Fanout offset for LED pads "1" and "3"; x sign flips on reversed rows.
    pub led_fanout_x: f64,
    /// Fanout offset for the capacitor pad ("1" forward, "2" reversed).
    pub cap_fanout_x: f64,
    /// First reference index of the edge LEDs.
    pub edge_base_index: usize,
    /// Edge LEDs per case side.
    pub edge_count_per_side: usize,
    /// Vertical span covered by each edge LED column.
    pub edge_span_mm: f64,
    /// Horizontal inset of the edge LED columns from the case edges.
    pub edge_inset_mm: f64,
    /// Capacitor offset from an edge LED; sign flips on the right side.
    pub edge_cap_x_mm: f64,
    /// Fanout offset for edge capacitor pads; sign flips on the right side.
    pub edge_cap_fanout_y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefPrefixes {
    pub switch: String,
    pub diode: String,
    pub led: String,
    pub led_cap: String,
}

impl RefPrefixes {
    #[must_use]
    pub fn switch(&self, index: usize) -> String {
        format!("{}{index}", self.switch)
    }

    #[must_use]
    pub fn diode(&self, index: usize) -> String {
        format!("{}{index}", self.diode)
    }

    #[must_use]
    pub fn led(&self, index: usize) -> String {
        format!("{}{index}", self.led)
    }

    #[must_use]
    pub fn led_cap(&self, index: usize) -> String {
        format!("{}{index}", self.led_cap)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacerConfig {
    pub case: CaseOutline,
    /// Overall layout bounding box, in key units.
    pub layout_width_units: f64,
    pub layout_height_units: f64,
    /// Key unit pitch.
    pub unit_mm: f64,
    pub matrix: MatrixMap,
    pub absolute_x: Vec<AbsoluteX>,
    pub unlit: Vec<UnlitSpan>,
    /// Diode center relative to its switch center.
    pub diode_offset: PointMm,
    pub diode_rotation_deg: f64,
    /// Where unused matrix slots are parked, off the board.
    pub park_at: PointMm,
    pub routing: RoutingConfig,
    pub leds: LedConfig,
    pub refs: RefPrefixes,
}

impl PlacerConfig {
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            case: CaseOutline {
                origin: PointMm::new(100.0, 100.0),
                width_mm: 365.0,
                height_mm: 130.0,
            },
            layout_width_units: 18.25,
            layout_height_units: 6.5,
            unit_mm: 19.05,
            matrix: MatrixMap::new(
                16,
                6,
                vec![
                    // Last keys of the second and third rows overflow into
                    // spare slots two rows down.
                    Correction::Remap {
                        from: (1, 16),
                        to: (3, 15),
                    },
                    Correction::Remap {
                        from: (2, 16),
                        to: (4, 15),
                    },
                    // Space bar occupies columns 3..=8; its switch sits on
                    // column 5 and everything after it shifts right.
                    Correction::Remap {
                        from: (5, 3),
                        to: (5, 5),
                    },
                    Correction::ShiftCols {
                        row: 5,
                        after: 3,
                        by: 5,
                    },
                    // Up arrow.
                    Correction::Remap {
                        from: (4, 12),
                        to: (4, 14),
                    },
                ],
            ),
            // The wireless toggle switch sits at the case edge, off the grid.
            absolute_x: vec![AbsoluteX {
                row: 3,
                col: 14,
                x_mm: 461.75,
            }],
            unlit: vec![UnlitSpan { row: 3, from_col: 13 }],
            diode_offset: PointMm::new(-7.085, 3.75),
            diode_rotation_deg: 90.0,
            park_at: PointMm::new(0.0, 0.0),
            routing: RoutingConfig {
                track_width_mm: 0.4,
                via_drill_mm: 0.5,
                via_diameter_mm: 1.0,
                switch_fanout: PointMm::new(2.5, 0.0),
                diode_fanout: PointMm::new(0.0, 2.0),
            },
            leds: LedConfig {
                led_offset: PointMm::new(0.0, 5.08),
                cap_offset: PointMm::new(6.106, 4.34),
                led_fanout_x: 2.0,
                cap_fanout_x: -1.6,
                edge_base_index: 88,
                edge_count_per_side: 8,
                edge_span_mm: 70.0,
                edge_inset_mm: 6.0,
                edge_cap_x_mm: 1.0,
                edge_cap_fanout_y: 2.0,
            },
            refs: RefPrefixes {
                switch: "SW".to_string(),
                diode: "D".to_string(),
                led: "E".to_string(),
                led_cap: "CS".to_string(),
            },
        }
    }
}
