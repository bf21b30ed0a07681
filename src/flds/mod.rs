use crate::Float;
use itertools::izip;
pub mod ghosts;
pub mod mesh;
use crate::flds::ghosts::{BoundarySlice, Direction, Region};
use crate::flds::mesh::{Mesh, MeshDims};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    Ex,
    Ey,
    Ez,
    Bx,
    By,
    Bz,
}

impl Component {
    pub const ALL: [Component; 6] = [
        Component::Ex,
        Component::Ey,
        Component::Ez,
        Component::Bx,
        Component::By,
        Component::Bz,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Component::Ex => "ex",
            Component::Ey => "ey",
            Component::Ez => "ez",
            Component::Bx => "bx",
            Component::By => "by",
            Component::Bz => "bz",
        }
    }
}

/// The staggered electromagnetic field state of one tile.
#[derive(Clone, Debug, PartialEq)]
pub struct YeeLattice {
    pub ex: Mesh,
    pub ey: Mesh,
    pub ez: Mesh,
    pub bx: Mesh,
    pub by: Mesh,
    pub bz: Mesh,
}

impl YeeLattice {
    pub fn new(dims: MeshDims) -> YeeLattice {
        YeeLattice {
            ex: Mesh::new(dims),
            ey: Mesh::new(dims),
            ez: Mesh::new(dims),
            bx: Mesh::new(dims),
            by: Mesh::new(dims),
            bz: Mesh::new(dims),
        }
    }

    pub fn dims(&self) -> MeshDims {
        self.ex.dims()
    }

    pub fn component(&self, c: Component) -> &Mesh {
        match c {
            Component::Ex => &self.ex,
            Component::Ey => &self.ey,
            Component::Ez => &self.ez,
            Component::Bx => &self.bx,
            Component::By => &self.by,
            Component::Bz => &self.bz,
        }
    }

    pub fn component_mut(&mut self, c: Component) -> &mut Mesh {
        match c {
            Component::Ex => &mut self.ex,
            Component::Ey => &mut self.ey,
            Component::Ez => &mut self.ez,
            Component::Bx => &mut self.bx,
            Component::By => &mut self.by,
            Component::Bz => &mut self.bz,
        }
    }

    pub fn clear(&mut self) {
        for c in Component::ALL.iter() {
            self.component_mut(*c).clear();
        }
    }

    /// Cut the owned cells a neighbour at the far side of `dir` needs for its
    /// guard band on side `dir`.
    pub fn boundary_slice(&self, dir: Direction) -> BoundarySlice {
        let region = Region::source(dir, self.dims());
        let values = Component::ALL
            .iter()
            .map(|&c| {
                let mut buf = Vec::with_capacity(region.len());
                self.component(c).read_region(&region, &mut buf);
                buf
            })
            .collect();
        BoundarySlice { dir, values }
    }

    /// Overwrite the guard band on side `slice.dir` for every component.
    pub fn apply_slice(&mut self, slice: &BoundarySlice) {
        if !cfg!(feature = "unchecked") {
            assert!(slice.fits(self.dims()));
        }
        let region = Region::guard(slice.dir, self.dims());
        for (&c, vals) in izip!(Component::ALL.iter(), &slice.values) {
            self.component_mut(c).write_region(&region, vals);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_init() {
        let dims = MeshDims::new(3, 2, 1).unwrap();
        let yee = YeeLattice::new(dims);
        for c in Component::ALL.iter() {
            let mesh = yee.component(*c);
            assert_eq!(mesh.dims(), dims);
            assert_eq!(mesh.as_slice().len(), 5 * 4 * 3);
            assert!(mesh.as_slice().iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn components_are_distinct() {
        let dims = MeshDims::new(2, 2, 2).unwrap();
        let mut yee = YeeLattice::new(dims);
        for (n, c) in Component::ALL.iter().enumerate() {
            yee.component_mut(*c).set(0, 0, 0, n as Float).unwrap();
        }
        assert_eq!(yee.ex.get(0, 0, 0).unwrap(), 0.0);
        assert_eq!(yee.bz.get(0, 0, 0).unwrap(), 5.0);
        yee.clear();
        assert_eq!(yee.bz.get(0, 0, 0).unwrap(), 0.0);
    }

    #[test]
    fn self_wrap_through_slices() {
        // a lone lattice acting as its own neighbour on the -x side
        let dims = MeshDims::new(3, 2, 1).unwrap();
        let mut yee = YeeLattice::new(dims);
        yee.ey
            .fill_interior(|i, j, _| (1 + i + 3 * j) as Float);
        let slice = yee.boundary_slice(Direction::new(-1, 0, 0));
        assert_eq!(slice.values[1], vec![3.0, 6.0]);
        yee.apply_slice(&slice);
        assert_eq!(yee.ey.get(-1, 0, 0).unwrap(), 3.0);
        assert_eq!(yee.ey.get(-1, 1, 0).unwrap(), 6.0);
        // nothing else in the guard band moved
        assert_eq!(yee.ey.get(3, 0, 0).unwrap(), 0.0);
        assert_eq!(yee.ey.get(-1, -1, 0).unwrap(), 0.0);
    }
}
