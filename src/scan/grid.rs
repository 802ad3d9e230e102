use crate::math::{Kernel, Point3, Real};

/// Lattice coordinates of a cell. Cell `i` spans `[i, i + 1)` steps along its
/// axis, so indices run from `-steps_on_edge` to `steps_on_edge - 1`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct CellIndex {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl CellIndex {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Shifts the index to be non-negative, given the grid's half-width.
    pub fn offset(&self, steps_on_edge: i64) -> (u32, u32, u32) {
        let shift = |i: i64| (i + steps_on_edge).max(0) as u32;
        (shift(self.x), shift(self.y), shift(self.z))
    }
}

/// The cubic lattice laid over the spinning object.
/// Largest divisor whose (2n)³ candidate count still fits in a u64.
pub const MAX_DIVISOR: u32 = 1_000_000;

#[derive(Debug, Clone)]
pub struct Grid {
    center: Point3,
    radius_squared: Real,
    step: Real,
    half_step: Real,
    steps_on_edge: i64,
}

impl Grid {
    /// A grid with cells of edge `radius / divisor`.
    pub fn new(kernel: &Kernel, center: Point3, radius: &Real, divisor: u32) -> Self {
        assert!(
            (1..=MAX_DIVISOR).contains(&divisor),
            "grid divisor must be between 1 and {}",
            MAX_DIVISOR
        );
        let step = radius / kernel.int(i64::from(divisor));

        // radius / step lands on the divisor only up to rounding
        let steps_on_edge = (radius / &step + kernel.epsilon())
            .trunc_to_i64()
            .unwrap_or_else(|| i64::from(divisor));

        Self {
            center,
            radius_squared: radius.square(),
            half_step: &step / kernel.int(2),
            step,
            steps_on_edge,
        }
    }

    pub fn step(&self) -> &Real {
        &self.step
    }

    pub fn steps_on_edge(&self) -> i64 {
        self.steps_on_edge
    }

    pub fn candidate_count(&self) -> u64 {
        let edge = 2 * self.steps_on_edge as u64;
        edge * edge * edge
    }

    /// Every cell of the bounding cube, x outermost.
    pub fn cells(&self) -> impl Iterator<Item = CellIndex> {
        let n = self.steps_on_edge;
        (-n..n).flat_map(move |x| (-n..n).flat_map(move |y| (-n..n).map(move |z| CellIndex::new(x, y, z))))
    }

    pub fn centroid(&self, kernel: &Kernel, index: CellIndex) -> Point3 {
        let coordinate = |i: i64| kernel.int(2 * i + 1) * &self.half_step;
        let offset = Point3::new(coordinate(index.x), coordinate(index.y), coordinate(index.z));
        &self.center + &offset
    }

    /// Whether a point is inside the object, boundary included.
    pub fn contains(&self, point: &Point3) -> bool {
        point.is_inside_sphere(&self.center, &self.radius_squared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(k: &Kernel, divisor: u32) -> Grid {
        Grid::new(k, Point3::origin(k), &k.parse("0.0002").unwrap(), divisor)
    }

    #[test]
    fn test_dimensions() {
        let k = Kernel::new(40);
        for divisor in [1, 2, 3, 10] {
            let g = grid(&k, divisor);
            assert_eq!(g.steps_on_edge(), i64::from(divisor));
            assert_eq!(g.candidate_count(), 8 * u64::from(divisor).pow(3));
            assert_eq!(g.cells().count() as u64, g.candidate_count());
        }
        // Thirds don't divide evenly, but still give three steps
        assert_eq!(grid(&k, 3).step(), &(k.parse("0.0002").unwrap() / k.int(3)));
    }

    #[test]
    fn test_largest_divisor_fits() {
        let k = Kernel::new(40);
        let g = grid(&k, MAX_DIVISOR);
        assert_eq!(g.steps_on_edge(), i64::from(MAX_DIVISOR));
        assert_eq!(g.candidate_count(), 8_000_000_000_000_000_000);
    }

    #[test]
    #[should_panic(expected = "grid divisor")]
    fn test_divisor_out_of_range() {
        let k = Kernel::new(40);
        grid(&k, MAX_DIVISOR + 1);
    }

    #[test]
    fn test_centroids() {
        let k = Kernel::new(40);
        let g = grid(&k, 2);
        let first = g.cells().next().unwrap();
        assert_eq!(first, CellIndex::new(-2, -2, -2));
        assert_eq!(first.offset(2), (0, 0, 0));

        let c = g.centroid(&k, CellIndex::new(-2, 0, 1));
        assert_eq!(c.x, k.parse("-0.00015").unwrap());
        assert_eq!(c.y, k.parse("0.00005").unwrap());
        assert_eq!(c.z, k.parse("0.00015").unwrap());
    }

    #[test]
    fn test_cells_inside() {
        let k = Kernel::new(40);
        let count_inside = |divisor| {
            let g = grid(&k, divisor);
            g.cells().filter(|i| g.contains(&g.centroid(&k, *i))).count()
        };
        assert_eq!(count_inside(1), 8);
        assert_eq!(count_inside(2), 32);
        assert_eq!(count_inside(10), 4224);
    }
}
