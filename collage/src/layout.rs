// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Grid geometry of the collage.
//!
//! Cells are square, [`CELL_INCHES`] on each side, and are filled
//! left-to-right, top-to-bottom. Distances are expressed in points (1/72
//! inch) so font sizes can be used as-is.

use crate::error::Error;

/// Points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;
/// Side of a grid cell in inches.
pub const CELL_INCHES: f32 = 4.0;
/// Padding kept around the cropped content, in inches.
pub const PAD_INCHES: f32 = 0.1;

/// Row/column arrangement for a roster of a given length.
///
/// # Examples
///
/// ```
/// use collage::GridLayout;
///
/// let layout = GridLayout::new(10, 7,)?;
/// assert_eq!(layout.rows(), 2);
/// assert_eq!(layout.cell_count(), 14);
/// assert!(layout.is_populated(9));
/// assert!(!layout.is_populated(10));
/// # Ok::<(), collage::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub struct GridLayout
{
    columns:   usize,
    rows:      usize,
    populated: usize,
}

/// Position of a cell within the grid, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub struct CellPosition
{
    /// Row index, top to bottom.
    pub row:    usize,
    /// Column index, left to right.
    pub column: usize,
}

/// Axis-aligned rectangle in points.
#[derive(Debug, Clone, Copy, PartialEq,)]
pub struct Rect
{
    /// Left edge.
    pub x:      f32,
    /// Top edge.
    pub y:      f32,
    /// Horizontal extent.
    pub width:  f32,
    /// Vertical extent.
    pub height: f32,
}

impl GridLayout
{
    /// Computes the grid for `len` handles over `columns` columns.
    ///
    /// The row count is `ceil(len / columns)`; an empty roster yields zero
    /// rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when `columns` is zero.
    pub fn new(len: usize, columns: usize,) -> Result<Self, Error,>
    {
        if columns == 0 {
            return Err(Error::validation("ncols must be at least 1",),);
        }

        Ok(Self {
            columns, rows: len.div_ceil(columns,), populated: len,
        },)
    }

    /// Number of columns.
    pub fn columns(&self,) -> usize
    {
        self.columns
    }

    /// Number of rows.
    pub fn rows(&self,) -> usize
    {
        self.rows
    }

    /// Total number of cells, including trailing blank ones.
    pub fn cell_count(&self,) -> usize
    {
        self.rows * self.columns
    }

    /// Number of cells holding a handle.
    pub fn populated(&self,) -> usize
    {
        self.populated
    }

    /// Returns `true` when cell `index` holds a handle.
    pub fn is_populated(&self, index: usize,) -> bool
    {
        index < self.populated
    }

    /// Grid position of cell `index`, or `None` past the last cell.
    pub fn position(&self, index: usize,) -> Option<CellPosition,>
    {
        (index < self.cell_count()).then(|| CellPosition {
            row: index / self.columns, column: index % self.columns,
        },)
    }

    /// Area of cell `index` on the full, uncropped canvas.
    pub fn cell_rect(&self, index: usize,) -> Option<Rect,>
    {
        let side = CELL_INCHES * POINTS_PER_INCH;
        self.position(index,).map(|position| Rect {
            x:      position.column as f32 * side,
            y:      position.row as f32 * side,
            width:  side,
            height: side,
        },)
    }

    /// Size of the full canvas in points, blank cells included.
    pub fn canvas_size(&self,) -> (f32, f32,)
    {
        let side = CELL_INCHES * POINTS_PER_INCH;
        (self.columns as f32 * side, self.rows as f32 * side,)
    }

    /// Tight bounding box around the populated cells, padded by
    /// [`PAD_INCHES`] on every side.
    ///
    /// Blank cells draw nothing, so a single partial row is cropped to its
    /// populated columns. An empty layout reduces to the padding alone.
    pub fn content_bounds(&self,) -> Rect
    {
        let side = CELL_INCHES * POINTS_PER_INCH;
        let pad = PAD_INCHES * POINTS_PER_INCH;
        let used_columns = self.populated.min(self.columns,);

        Rect {
            x:      -pad,
            y:      -pad,
            width:  used_columns as f32 * side + 2.0 * pad,
            height: self.rows as f32 * side + 2.0 * pad,
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn ten_handles_over_seven_columns()
    {
        let layout = GridLayout::new(10, 7,).expect("layout",);
        assert_eq!(layout.rows(), 2);
        assert_eq!(layout.cell_count(), 14);

        // Cells 8..=14 in one-based numbering form the second row.
        for index in 7..14 {
            let position = layout.position(index,).expect("cell in grid",);
            assert_eq!(position.row, 1);
            assert_eq!(position.column, index - 7);
        }
        let populated: Vec<usize,> = (7..14).filter(|index| layout.is_populated(*index,),).collect();
        assert_eq!(populated, [7, 8, 9]);
    }

    #[test]
    fn exact_multiple_has_no_blank_cells()
    {
        let layout = GridLayout::new(14, 7,).expect("layout",);
        assert_eq!(layout.rows(), 2);
        assert!((0..layout.cell_count()).all(|index| layout.is_populated(index,)));
    }

    #[test]
    fn empty_roster_has_no_rows()
    {
        let layout = GridLayout::new(0, 7,).expect("layout",);
        assert_eq!(layout.rows(), 0);
        assert_eq!(layout.cell_count(), 0);
        assert_eq!(layout.position(0,), None);

        let bounds = layout.content_bounds();
        assert!((bounds.width - 14.4).abs() < 1e-3);
        assert!((bounds.height - 14.4).abs() < 1e-3);
    }

    #[test]
    fn zero_columns_is_rejected()
    {
        let error = GridLayout::new(3, 0,).expect_err("expected validation error",);
        assert!(matches!(error, Error::Validation { .. }));
    }

    #[test]
    fn canvas_grows_linearly()
    {
        let layout = GridLayout::new(10, 7,).expect("layout",);
        assert_eq!(layout.canvas_size(), (7.0 * 288.0, 2.0 * 288.0));
        assert_eq!(layout.cell_rect(8,), Some(Rect {
            x: 288.0, y: 288.0, width: 288.0, height: 288.0,
        }));
    }

    #[test]
    fn single_partial_row_is_cropped_to_populated_columns()
    {
        let layout = GridLayout::new(3, 7,).expect("layout",);
        let bounds = layout.content_bounds();
        assert!((bounds.width - (3.0 * 288.0 + 14.4)).abs() < 1e-3);
        assert!((bounds.height - (288.0 + 14.4)).abs() < 1e-3);
        assert!((bounds.x + 7.2).abs() < 1e-3);
    }
}
