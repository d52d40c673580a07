//! Raw per-region output of the detection network.

use ndarray::{Array2, ArrayView1, Axis};

use crate::error::{Error, Result};

/// Columns before the per-class scores: cx, cy, w, h, objectness.
pub const BOX_COLUMNS: usize = 5;

/// One output tensor of the network.
///
/// Each row is `[cx, cy, w, h, objectness, score_0, .., score_K]` with the box
/// in fractions of the frame size.
#[derive(Debug, Clone)]
pub struct DetectionOutputLayer {
    data: Array2<f32>,
}

/// Borrowed view of one decoded row.
#[derive(Debug, Clone, Copy)]
pub struct OutputRow<'a> {
    pub cx: f32,
    pub cy: f32,
    pub w: f32,
    pub h: f32,
    pub objectness: f32,
    pub scores: ArrayView1<'a, f32>,
}

impl OutputRow<'_> {
    /// Best class and its score. The first maximum wins on ties.
    pub fn best_class(&self) -> Option<(usize, f32)> {
        self.scores
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (idx, score)| match best {
                Some((_, b)) if b >= score => best,
                _ => Some((idx, score)),
            })
    }
}

impl DetectionOutputLayer {
    /// Wrap a `rows x (5 + classes)` tensor. Layers with no class columns are
    /// rejected; `index` only labels the error.
    pub fn new(data: Array2<f32>, index: usize) -> Result<Self> {
        let columns = data.ncols();
        if columns <= BOX_COLUMNS {
            return Err(Error::MalformedOutput {
                layer: index,
                columns,
            });
        }
        Ok(Self { data })
    }

    /// Build from a flat row-major buffer with `columns` values per row.
    pub fn from_flat(values: Vec<f32>, columns: usize, index: usize) -> Result<Self> {
        if columns == 0 || values.len() % columns != 0 {
            return Err(Error::MalformedOutput {
                layer: index,
                columns,
            });
        }
        let rows = values.len() / columns;
        let data = Array2::from_shape_vec((rows, columns), values).map_err(|_| {
            Error::MalformedOutput {
                layer: index,
                columns,
            }
        })?;
        Self::new(data, index)
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.data.nrows()
    }

    #[inline]
    pub fn num_classes(&self) -> usize {
        self.data.ncols() - BOX_COLUMNS
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    pub fn rows(&self) -> impl Iterator<Item = OutputRow<'_>> {
        self.data.axis_iter(Axis(0)).map(|row| {
            let (head, scores) = row.split_at(Axis(0), BOX_COLUMNS);
            OutputRow {
                cx: head[0],
                cy: head[1],
                w: head[2],
                h: head[3],
                objectness: head[4],
                scores,
            }
        })
    }
}
