//! Single-pass walk over the layout, producing the key placement plan.
//!
//! The cursor starts each row at x = 0 with a pending width of 1; the y
//! offset persists across the whole layout and advances by one unit after
//! every row on top of any directive-driven offsets. The logical column
//! counter only advances on key labels, never on spacing directives.

use std::collections::BTreeSet;

use crate::config::PlacerConfig;
use crate::error::Error;
use crate::geometry::{PointMm, Projector, UnitPoint};
use crate::layout::{Entry, Layout};

#[derive(Debug, Clone)]
pub struct PlannedKey {
    /// 1-based matrix slot index, after topology correction.
    pub index: usize,
    pub label: String,
    /// Logical position in reading order, before correction.
    pub row: usize,
    pub col: usize,
    pub center: PointMm,
    /// Key cap width in units.
    pub width: f64,
    /// Whether this key belongs to the visible, lit switch set.
    pub lit: bool,
}

#[derive(Debug, Clone)]
pub struct KeyPlan {
    /// One entry per layout row, every walked key, in place order.
    pub rows: Vec<Vec<PlannedKey>>,
    /// All key indices instantiated by the walk.
    pub used: BTreeSet<usize>,
}

impl KeyPlan {
    pub fn keys(&self) -> impl Iterator<Item = &PlannedKey> {
        self.rows.iter().flatten()
    }

    /// Per-row lit keys, the set the LED chain snakes through.
    #[must_use]
    pub fn lit_rows(&self) -> Vec<Vec<&PlannedKey>> {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|k| k.lit).collect())
            .collect()
    }
}

pub fn walk(layout: &Layout, config: &PlacerConfig) -> Result<KeyPlan, Error> {
    let projector = Projector::centered(
        config.case.origin,
        config.case.width_mm,
        config.case.height_mm,
        config.layout_width_units,
        config.layout_height_units,
        config.unit_mm,
    );

    let mut rows = Vec::with_capacity(layout.rows.len());
    let mut used = BTreeSet::new();
    let mut y_units = 0.0;

    for (row_i, row) in layout.rows.iter().enumerate() {
        let mut x_units = 0.0;
        let mut width = 1.0;
        let mut col = 0usize;
        let mut planned = Vec::new();

        for entry in row {
            match entry {
                Entry::Gap(gap) => {
                    if let Some(y) = gap.y {
                        y_units += y;
                    }
                    if let Some(w) = gap.w {
                        width = w;
                    }
                    if let Some(x) = gap.x {
                        x_units += x;
                    }
                }
                Entry::Key(label) => {
                    let index = config.matrix.key_index(row_i, col);
                    if !used.insert(index) {
                        return Err(Error::DuplicateKeyIndex {
                            index,
                            row: row_i,
                            col,
                        });
                    }

                    let unit_center = UnitPoint::new(x_units + width / 2.0, y_units + 0.5);
                    let mut center = projector.to_mm(unit_center);
                    if let Some(o) = config
                        .absolute_x
                        .iter()
                        .find(|o| o.row == row_i && o.col == col)
                    {
                        center.x = o.x_mm;
                    }

                    let lit = !config
                        .unlit
                        .iter()
                        .any(|u| u.row == row_i && col >= u.from_col);

                    planned.push(PlannedKey {
                        index,
                        label: label.clone(),
                        row: row_i,
                        col,
                        center,
                        width,
                        lit,
                    });

                    x_units += width;
                    width = 1.0;
                    col += 1;
                }
            }
        }

        rows.push(planned);
        y_units += 1.0;
    }

    Ok(KeyPlan { rows, used })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn plan_of(json: &str) -> KeyPlan {
        let layout = Layout::from_json_str(json).unwrap();
        walk(&layout, &PlacerConfig::default()).unwrap()
    }

    fn start_x(config: &PlacerConfig) -> f64 {
        config.case.origin.x
            + (config.case.width_mm - config.layout_width_units * config.unit_mm) / 2.0
    }

    #[test]
    fn single_row_indices_and_centers() {
        let config = PlacerConfig::default();
        let plan = plan_of(r#"[["Q", "W", "E"]]"#);
        let keys: Vec<_> = plan.keys().collect();
        assert_eq!(keys.iter().map(|k| k.index).collect::<Vec<_>>(), [1, 2, 3]);
        for (i, key) in keys.iter().enumerate() {
            let expected = (i as f64 + 0.5) * config.unit_mm + start_x(&config);
            assert_abs_diff_eq!(key.center.x, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn width_directive_widens_one_key_only() {
        let config = PlacerConfig::default();
        let plan = plan_of(r#"[["A", {"w": 2}, "B", "C"]]"#);
        let keys: Vec<_> = plan.keys().collect();
        // The directive does not advance the logical column counter.
        assert_eq!(keys.iter().map(|k| k.index).collect::<Vec<_>>(), [1, 2, 3]);
        let sx = start_x(&config);
        assert_abs_diff_eq!(keys[0].center.x, 0.5 * config.unit_mm + sx, epsilon = 1e-9);
        // B is 2u wide: centered at 1 + 1, advancing the cursor to 3.
        assert_abs_diff_eq!(keys[1].center.x, 2.0 * config.unit_mm + sx, epsilon = 1e-9);
        assert_abs_diff_eq!(keys[1].width, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(keys[2].center.x, 3.5 * config.unit_mm + sx, epsilon = 1e-9);
        assert_abs_diff_eq!(keys[2].width, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn y_offset_persists_across_rows() {
        let config = PlacerConfig::default();
        let plan = plan_of(r#"[["A"], [{"y": 0.5}, "B"], ["C"]]"#);
        let keys: Vec<_> = plan.keys().collect();
        let start_y = config.case.origin.y
            + (config.case.height_mm - config.layout_height_units * config.unit_mm) / 2.0;
        assert_abs_diff_eq!(keys[0].center.y, 0.5 * config.unit_mm + start_y, epsilon = 1e-9);
        assert_abs_diff_eq!(keys[1].center.y, 2.0 * config.unit_mm + start_y, epsilon = 1e-9);
        // The extra half-unit gap stays in effect for all later rows.
        assert_abs_diff_eq!(keys[2].center.y, 3.0 * config.unit_mm + start_y, epsilon = 1e-9);
    }

    #[test]
    fn x_offset_resets_per_row() {
        let config = PlacerConfig::default();
        let plan = plan_of(r#"[[{"x": 1.5}, "A"], ["B"]]"#);
        let keys: Vec<_> = plan.keys().collect();
        let sx = start_x(&config);
        assert_abs_diff_eq!(keys[0].center.x, 2.0 * config.unit_mm + sx, epsilon = 1e-9);
        assert_abs_diff_eq!(keys[1].center.x, 0.5 * config.unit_mm + sx, epsilon = 1e-9);
    }

    #[test]
    fn duplicate_key_index_is_fatal() {
        // Row 0 column 16 is uncorrected and collides with row 1 column 0.
        let row0: Vec<String> = (0..17).map(|i| format!("k{i}")).collect();
        let json = serde_json::to_string(&vec![row0, vec!["x".to_string()]]).unwrap();
        let layout = Layout::from_json_str(&json).unwrap();
        let err = walk(&layout, &PlacerConfig::default()).unwrap_err();
        assert!(matches!(err, Error::DuplicateKeyIndex { index: 17, .. }));
    }

    #[test]
    fn walk_is_deterministic() {
        let json = r#"[["Q", {"w": 2}, "W"], [{"y": 0.25}, "A", "S"]]"#;
        let a = plan_of(json);
        let b = plan_of(json);
        for (ka, kb) in a.keys().zip(b.keys()) {
            assert_eq!(ka.index, kb.index);
            assert_eq!(ka.center, kb.center);
            assert_eq!(ka.width, kb.width);
        }
    }

    #[test]
    fn unlit_span_and_absolute_x_override() {
        let mut rows: Vec<Vec<String>> = vec![vec![], vec![], vec![]];
        rows.push((0..15).map(|i| format!("k{i}")).collect());
        let json = serde_json::to_string(&rows).unwrap();
        let plan = plan_of(&json);

        let row3: Vec<_> = plan.rows[3].iter().collect();
        assert!(row3[12].lit);
        assert!(!row3[13].lit);
        assert!(!row3[14].lit);
        // The wireless toggle is pinned to an absolute x, off the key grid.
        assert_abs_diff_eq!(row3[14].center.x, 461.75, epsilon = 1e-9);

        // Unlit keys still occupy matrix slots.
        assert!(plan.used.contains(&row3[13].index));
        let lit = plan.lit_rows();
        assert_eq!(lit[3].len(), 13);
    }
}
