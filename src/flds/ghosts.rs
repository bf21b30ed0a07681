use crate::flds::mesh::MeshDims;
use crate::flds::Component;
use crate::Float;
use std::ops::Range;

/// Offset from a tile to one of its neighbours, each component in {-1, 0, 1}.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Direction {
    pub dx: isize,
    pub dy: isize,
    pub dz: isize,
}

impl Direction {
    pub const fn new(dx: isize, dy: isize, dz: isize) -> Direction {
        Direction { dx, dy, dz }
    }

    /// The 8 in-plane neighbours (faces and corners in x-y).
    pub fn in_plane() -> Vec<Direction> {
        Direction::all().into_iter().filter(|d| d.dz == 0).collect()
    }

    /// All 26 neighbours of the 3D halo: 6 faces, 12 edges and 8 corners.
    pub fn all() -> Vec<Direction> {
        let mut dirs = Vec::with_capacity(26);
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if dx != 0 || dy != 0 || dz != 0 {
                        dirs.push(Direction { dx, dy, dz });
                    }
                }
            }
        }
        dirs
    }

    pub fn opposite(&self) -> Direction {
        Direction::new(-self.dx, -self.dy, -self.dz)
    }

    #[inline(always)]
    fn axis(&self, axis: usize) -> isize {
        match axis {
            0 => self.dx,
            1 => self.dy,
            _ => self.dz,
        }
    }
}

/// Box of signed local mesh indices, iterated z, then y, then x (x fastest).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: Range<isize>,
    pub y: Range<isize>,
    pub z: Range<isize>,
}

impl Region {
    fn build<F>(dir: Direction, dims: MeshDims, axis_range: F) -> Region
    where
        F: Fn(isize, isize) -> Range<isize>,
    {
        let n = |axis| dims.axis(axis) as isize;
        Region {
            x: axis_range(dir.axis(0), n(0)),
            y: axis_range(dir.axis(1), n(1)),
            z: axis_range(dir.axis(2), n(2)),
        }
    }

    /// Guard cells on side `dir` of a mesh.
    pub fn guard(dir: Direction, dims: MeshDims) -> Region {
        Region::build(dir, dims, |d, n| match d {
            -1 => -1..0,
            0 => 0..n,
            _ => n..n + 1,
        })
    }

    /// Owned cells of the neighbour lying at `dir` that mirror into
    /// `Region::guard(dir, ..)`: the neighbour's face pointing back at us.
    pub fn source(dir: Direction, dims: MeshDims) -> Region {
        Region::build(dir, dims, |d, n| match d {
            -1 => n - 1..n,
            0 => 0..n,
            _ => 0..1,
        })
    }

    #[inline(always)]
    pub fn x_len(&self) -> usize {
        (self.x.end - self.x.start) as usize
    }

    pub fn len(&self) -> usize {
        self.x_len() * (self.y.end - self.y.start) as usize * (self.z.end - self.z.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Owned boundary data of one tile for all six field components, cut to fill
/// the guard band of the tile on the other side of `dir`.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundarySlice {
    pub dir: Direction,
    pub values: Vec<Vec<Float>>,
}

impl BoundarySlice {
    /// True when the slice carries one correctly sized buffer per component.
    pub fn fits(&self, dims: MeshDims) -> bool {
        let len = Region::guard(self.dir, dims).len();
        self.values.len() == Component::ALL.len() && self.values.iter().all(|v| v.len() == len)
    }
}
