use crate::error::{PicError, Result};
use crate::flds::ghosts::Region;
use crate::Float;

/// Width of the guard band on every side of a mesh.
pub const HALO: usize = 1;

/// Owned resolution of one tile's mesh, excluding guard cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshDims {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl MeshDims {
    pub fn new(nx: usize, ny: usize, nz: usize) -> Result<MeshDims> {
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(PicError::ConfigError(format!(
                "mesh resolution must be positive, got {}x{}x{}",
                nx, ny, nz
            )));
        }
        Ok(MeshDims { nx, ny, nz })
    }

    #[inline(always)]
    pub fn axis(&self, axis: usize) -> usize {
        match axis {
            0 => self.nx,
            1 => self.ny,
            _ => self.nz,
        }
    }

    pub fn owned_cells(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    pub fn storage_len(&self) -> usize {
        (self.nx + 2 * HALO) * (self.ny + 2 * HALO) * (self.nz + 2 * HALO)
    }
}

/// One field component over the owned cells plus a one cell guard band.
///
/// Every axis is addressed with signed local indices in `[-1, n]`, where
/// `-1` and `n` are guard cells. The storage is a single flat buffer with x
/// running fastest. For a 3x3 slab (nz ignored) with its guard band the
/// layout is
/// ```text
/// ---------------------------------------------
/// | (-1,-1) [0] | (0,-1) [1] | ... | (3,-1) [4] |
/// ---------------------------------------------
/// | (-1, 0) [5] | (0, 0) [6] | ... | (3, 0) [9] |
/// ---------------------------------------------
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    dims: MeshDims,
    data: Vec<Float>,
}

impl Mesh {
    pub fn new(dims: MeshDims) -> Mesh {
        Mesh {
            dims,
            data: vec![0.0; dims.storage_len()],
        }
    }

    pub fn dims(&self) -> MeshDims {
        self.dims
    }

    #[inline(always)]
    fn index(&self, i: isize, j: isize, k: isize) -> usize {
        let h = HALO as isize;
        let sx = (self.dims.nx + 2 * HALO) as isize;
        let sy = (self.dims.ny + 2 * HALO) as isize;
        if !cfg!(feature = "unchecked") {
            assert!(i >= -h && i < self.dims.nx as isize + h);
            assert!(j >= -h && j < self.dims.ny as isize + h);
            assert!(k >= -h && k < self.dims.nz as isize + h);
        }
        (((k + h) * sy + (j + h)) * sx + (i + h)) as usize
    }

    fn check(&self, i: isize, j: isize, k: isize) -> Result<()> {
        for (axis, index) in [i, j, k].iter().enumerate() {
            let n = self.dims.axis(axis);
            if *index < -(HALO as isize) || *index > (n + HALO - 1) as isize {
                return Err(PicError::IndexOutOfRange {
                    axis,
                    index: *index,
                    n,
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, i: isize, j: isize, k: isize) -> Result<Float> {
        self.check(i, j, k)?;
        Ok(self.data[self.index(i, j, k)])
    }

    pub fn set(&mut self, i: isize, j: isize, k: isize, val: Float) -> Result<()> {
        self.check(i, j, k)?;
        let ind = self.index(i, j, k);
        self.data[ind] = val;
        Ok(())
    }

    /// Zero the whole mesh, guard band included.
    pub fn clear(&mut self) {
        for v in self.data.iter_mut() {
            *v = 0.0;
        }
    }

    /// Overwrite every owned cell with `f(i, j, k)`. Guard cells are untouched.
    pub fn fill_interior<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, usize, usize) -> Float,
    {
        for k in 0..self.dims.nz {
            for j in 0..self.dims.ny {
                for i in 0..self.dims.nx {
                    let ind = self.index(i as isize, j as isize, k as isize);
                    self.data[ind] = f(i, j, k);
                }
            }
        }
    }

    /// Owned cells only, x fastest.
    pub fn interior(&self) -> Vec<Float> {
        let mut out = Vec::with_capacity(self.dims.owned_cells());
        for k in 0..self.dims.nz as isize {
            for j in 0..self.dims.ny as isize {
                let start = self.index(0, j, k);
                out.extend(self.data.iter().skip(start).take(self.dims.nx));
            }
        }
        out
    }

    pub fn as_slice(&self) -> &[Float] {
        &self.data
    }

    pub(crate) fn read_region(&self, region: &Region, out: &mut Vec<Float>) {
        out.reserve(region.len());
        for k in region.z.clone() {
            for j in region.y.clone() {
                let start = self.index(region.x.start, j, k);
                out.extend(self.data.iter().skip(start).take(region.x_len()));
            }
        }
    }

    pub(crate) fn write_region(&mut self, region: &Region, vals: &[Float]) {
        if !cfg!(feature = "unchecked") {
            assert_eq!(region.len(), vals.len());
        }
        let row = region.x_len();
        let mut rows = vals.chunks(row);
        for k in region.z.clone() {
            for j in region.y.clone() {
                let start = self.index(region.x.start, j, k);
                if let Some(src) = rows.next() {
                    self.data[start..start + row].copy_from_slice(src);
                }
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    fn dims() -> MeshDims {
        MeshDims::new(4, 3, 2).unwrap()
    }

    #[test]
    fn mesh_init() {
        let mesh = Mesh::new(dims());
        assert_eq!(mesh.as_slice().len(), 6 * 5 * 4);
        for v in mesh.as_slice() {
            assert_eq!(*v, 0.0);
        }
    }

    #[test]
    fn zero_resolution_rejected() {
        assert!(matches!(
            MeshDims::new(0, 3, 3),
            Err(PicError::ConfigError(_))
        ));
        assert!(MeshDims::new(3, 3, 0).is_err());
    }

    #[test]
    fn x_fastest_order() {
        // walking the full index range in k, j, i order must visit the
        // flat buffer sequentially
        let mesh = Mesh::new(dims());
        let mut index = 0;
        for k in -1..3 {
            for j in -1..4 {
                for i in -1..5 {
                    assert_eq!(mesh.index(i, j, k), index);
                    index += 1;
                }
            }
        }
    }

    #[test]
    fn guard_indices_accessible() {
        let mut mesh = Mesh::new(dims());
        mesh.set(-1, -1, -1, 1.5).unwrap();
        mesh.set(4, 3, 2, 2.5).unwrap();
        assert_eq!(mesh.get(-1, -1, -1).unwrap(), 1.5);
        assert_eq!(mesh.get(4, 3, 2).unwrap(), 2.5);
        assert_eq!(mesh.as_slice()[0], 1.5);
        assert_eq!(*mesh.as_slice().last().unwrap(), 2.5);
    }

    #[test]
    fn out_of_range_rejected() {
        let mut mesh = Mesh::new(dims());
        assert_eq!(
            mesh.get(-2, 0, 0),
            Err(PicError::IndexOutOfRange {
                axis: 0,
                index: -2,
                n: 4
            })
        );
        assert_eq!(
            mesh.set(0, 4, 0, 1.0),
            Err(PicError::IndexOutOfRange {
                axis: 1,
                index: 4,
                n: 3
            })
        );
        assert!(mesh.get(0, 0, 3).is_err());
    }

    #[test]
    fn fill_and_interior() {
        let mut mesh = Mesh::new(dims());
        mesh.fill_interior(|i, j, k| (i + 10 * j + 100 * k) as Float);
        mesh.set(-1, 0, 0, 99.0).unwrap();
        let inner = mesh.interior();
        assert_eq!(inner.len(), 24);
        assert_eq!(inner[0], 0.0);
        assert_eq!(inner[1], 1.0);
        assert_eq!(inner[4], 10.0);
        assert_eq!(inner[12], 100.0);
        assert_eq!(inner[23], 123.0);

        mesh.clear();
        assert_eq!(mesh.get(-1, 0, 0).unwrap(), 0.0);
        assert_eq!(mesh.get(3, 2, 1).unwrap(), 0.0);
    }
}
