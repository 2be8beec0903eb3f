use serde::Serialize;

/// Row/column partition and cell geometry for one layout pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GridLayout {
    pub columns: usize,
    pub rows: usize,
    /// Uniform scale applied to every template copy.
    pub scale: f64,
    pub cell_width: f64,
    pub cell_height: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

/// Pack `instance_count` cells of `desired_cell_width` into rows no wider than
/// `page_width`.
///
/// `template_width` must be positive; callers validate it before packing.
/// A page narrower than one cell still gets one column. A non-finite column
/// count (an unbounded page) puts every instance on a single row.
pub fn compute_layout(
    instance_count: usize,
    desired_cell_width: f64,
    template_width: f64,
    template_height: f64,
    page_width: f64,
) -> GridLayout {
    let scale = desired_cell_width / template_width;
    let cell_width = desired_cell_width;
    let cell_height = template_height * scale;

    let per_row = (page_width / cell_width).floor();
    let columns = if !per_row.is_finite() {
        instance_count.max(1)
    } else if per_row < 1.0 {
        1
    } else {
        per_row as usize
    };
    let rows = instance_count.div_ceil(columns);

    GridLayout {
        columns,
        rows,
        scale,
        cell_width,
        cell_height,
        canvas_width: columns as f64 * cell_width,
        canvas_height: rows as f64 * cell_height,
    }
}

impl GridLayout {
    /// Row-major slot for the `index`-th name.
    pub fn position(&self, index: usize) -> CellPosition {
        CellPosition {
            row: index / self.columns,
            col: index % self.columns,
        }
    }

    /// Top-left corner of the `index`-th cell in canvas coordinates.
    pub fn cell_origin(&self, index: usize) -> (f64, f64) {
        let p = self.position(index);
        (
            p.col as f64 * self.cell_width,
            p.row as f64 * self.cell_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn five_names_on_a_220_wide_page() {
        let layout = compute_layout(5, 50.0, 100.0, 30.0, 220.0);
        assert_eq!(layout.scale, 0.5);
        assert_eq!(layout.columns, 4);
        assert_eq!(layout.rows, 2);
        assert_eq!(layout.cell_height, 15.0);
        assert_eq!(layout.canvas_width, 200.0);
        assert_eq!(layout.canvas_height, 30.0);
        assert_eq!(layout.position(4), CellPosition { row: 1, col: 0 });
        assert_eq!(layout.cell_origin(4), (0.0, 15.0));
        assert_eq!(layout.cell_origin(3), (150.0, 0.0));
    }

    #[test]
    fn no_instances_means_no_rows() {
        let layout = compute_layout(0, 50.0, 100.0, 30.0, 220.0);
        assert_eq!(layout.rows, 0);
        assert_eq!(layout.canvas_height, 0.0);
        assert_eq!(layout.columns, 4);
    }

    #[test]
    fn narrow_page_still_gets_one_column() {
        let layout = compute_layout(3, 500.0, 100.0, 30.0, 20.0);
        assert_eq!(layout.columns, 1);
        assert_eq!(layout.rows, 3);
        assert_eq!(layout.canvas_width, 500.0);
        assert_eq!(layout.canvas_height, 450.0);
    }

    #[test]
    fn unbounded_page_keeps_one_row() {
        let layout = compute_layout(7, 10.0, 100.0, 30.0, f64::INFINITY);
        assert_eq!(layout.columns, 7);
        assert_eq!(layout.rows, 1);
        assert_eq!(layout.canvas_width, 70.0);
    }

    proptest! {
        #[test]
        fn packing_invariant(
            n in 1usize..500,
            cell in 0.5f64..400.0,
            page in 0.1f64..5000.0,
            tw in 1.0f64..1000.0,
            th in 1.0f64..1000.0,
        ) {
            let layout = compute_layout(n, cell, tw, th, page);
            prop_assert!(layout.columns >= 1);
            prop_assert_eq!(layout.rows, n.div_ceil(layout.columns));
            prop_assert_eq!(layout.canvas_width, layout.columns as f64 * cell);
            prop_assert_eq!(layout.canvas_height, layout.rows as f64 * layout.cell_height);
            if page >= cell {
                prop_assert!(layout.canvas_width <= page * (1.0 + 1e-9));
            }
        }

        #[test]
        fn placement_is_row_major(n in 1usize..200, cell in 1.0f64..100.0, page in 1.0f64..1000.0) {
            let layout = compute_layout(n, cell, 100.0, 30.0, page);
            for i in 0..n {
                let p = layout.position(i);
                prop_assert_eq!(p.row * layout.columns + p.col, i);
                prop_assert!(p.row < layout.rows);
            }
        }
    }
}
