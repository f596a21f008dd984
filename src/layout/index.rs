// Occupancy grid over placed word boxes
use crate::layout::Rect;
use ahash::{HashMap, HashMapExt};

/// Smallest allowed bucket edge
const MIN_CELL: f64 = 8.0;

/// Uniform bucket grid for fast overlap queries during placement
///
/// Every stored box is registered in each cell it touches, so a query only
/// visits boxes sharing at least one cell with the candidate.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    cell: f64,
    /// Grid cell (ix, iy) -> indices into `boxes`
    cells: HashMap<(i64, i64), Vec<usize>>,
    boxes: Vec<Rect>,
}

impl OccupancyGrid {
    pub fn new(cell: f64) -> Self {
        Self {
            cell: cell.max(MIN_CELL),
            cells: HashMap::new(),
            boxes: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn boxes(&self) -> &[Rect] {
        &self.boxes
    }

    fn cell_span(&self, rect: &Rect) -> (i64, i64, i64, i64) {
        (
            (rect.x / self.cell).floor() as i64,
            (rect.y / self.cell).floor() as i64,
            (rect.right() / self.cell).floor() as i64,
            (rect.bottom() / self.cell).floor() as i64,
        )
    }

    /// Register a box as occupied
    pub fn insert(&mut self, rect: Rect) {
        let idx = self.boxes.len();
        let (x0, y0, x1, y1) = self.cell_span(&rect);
        for ix in x0..=x1 {
            for iy in y0..=y1 {
                self.cells.entry((ix, iy)).or_default().push(idx);
            }
        }
        self.boxes.push(rect);
    }

    /// Whether `rect` overlaps any stored box
    pub fn collides(&self, rect: &Rect) -> bool {
        let (x0, y0, x1, y1) = self.cell_span(rect);
        for ix in x0..=x1 {
            for iy in y0..=y1 {
                let Some(indices) = self.cells.get(&(ix, iy)) else {
                    continue;
                };
                if indices.iter().any(|&i| self.boxes[i].intersects(rect)) {
                    return true;
                }
            }
        }
        false
    }
}
