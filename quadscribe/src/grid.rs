/// A dense row-major 2D array.
///
/// Everything that needs to agree on how a 2D sample grid maps onto a flat
/// vertex list (the sampler and the triangulator) goes through [`Grid::index`].
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Build a grid by evaluating `f(row, col)` for every cell in row-major order.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                cells.push(f(r, c));
            }
        }
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat position of `(row, col)` in the row-major cell list.
    pub fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.cells.get(self.index(row, col))
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn into_vec(self) -> Vec<T> {
        self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let grid = Grid::from_fn(2, 3, |r, c| (r, c));
        assert_eq!((grid.rows(), grid.cols()), (2, 3));
        assert_eq!(grid.len(), 6);
        assert_eq!(grid.index(1, 2), 5);
        assert_eq!(grid.as_slice()[4], (1, 1));
        assert_eq!(grid.get(0, 2), Some(&(0, 2)));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 3), None);
    }
}
