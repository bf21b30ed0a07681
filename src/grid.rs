use crate::comm::{Placement, SingleUnit};
use crate::error::{PicError, Result};
use crate::flds::mesh::MeshDims;
use crate::tile::Tile;
use crate::Float;
use log::debug;

/// Total periodic wrap of `x` onto `0..n`.
#[inline(always)]
pub fn wrap(x: isize, n: usize) -> usize {
    let n = n as isize;
    (((x % n) + n) % n) as usize
}

/// Number of tiles along each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridDims {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl GridDims {
    pub fn new(nx: usize, ny: usize, nz: usize) -> Result<GridDims> {
        if nx == 0 || ny == 0 {
            return Err(PicError::ConfigError(format!(
                "grid must hold at least one tile per axis, got {}x{}",
                nx, ny
            )));
        }
        if nz != 1 {
            return Err(PicError::ConfigError(format!(
                "only a single tile layer in z is supported, got nz = {}",
                nz
            )));
        }
        Ok(GridDims { nx, ny, nz })
    }

    pub fn n_tiles(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    #[inline(always)]
    pub fn id(&self, i: usize, j: usize) -> usize {
        i * self.ny + j
    }

    #[inline(always)]
    pub fn index_of(&self, cid: usize) -> (usize, usize) {
        (cid / self.ny, cid % self.ny)
    }
}

/// Tile counts plus the per-tile mesh resolution; fixed for a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub tiles: GridDims,
    pub mesh: MeshDims,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extents {
    pub xmin: Float,
    pub xmax: Float,
    pub ymin: Float,
    pub ymax: Float,
}

/// Result of asking the grid for a tile coordinate.
#[derive(Debug)]
pub enum TileRef<'a> {
    Local(&'a Tile),
    /// Held by another execution unit.
    Remote(usize),
    /// Owned here but never registered.
    Missing,
}

pub struct Grid {
    layout: Layout,
    rank: usize,
    owners: Vec<usize>,
    tiles: Vec<Option<Tile>>,
    extents: Option<Extents>,
}

impl Grid {
    /// A grid where this unit owns every tile.
    pub fn new(dims: GridDims, mesh: MeshDims) -> Result<Grid> {
        Grid::with_placement(dims, mesh, 0, &SingleUnit)
    }

    pub fn with_placement(
        dims: GridDims,
        mesh: MeshDims,
        rank: usize,
        placement: &dyn Placement,
    ) -> Result<Grid> {
        let dims = GridDims::new(dims.nx, dims.ny, dims.nz)?;
        let mesh = MeshDims::new(mesh.nx, mesh.ny, mesh.nz)?;
        let owners: Vec<usize> = (0..dims.n_tiles())
            .map(|cid| {
                let (i, j) = dims.index_of(cid);
                placement.owner_of(i, j)
            })
            .collect();
        debug!(
            "grid {}x{} on unit {}: {} of {} tiles local",
            dims.nx,
            dims.ny,
            rank,
            owners.iter().filter(|&&o| o == rank).count(),
            owners.len()
        );
        Ok(Grid {
            layout: Layout { tiles: dims, mesh },
            rank,
            owners,
            tiles: (0..dims.n_tiles()).map(|_| None).collect(),
            extents: None,
        })
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn nx(&self) -> usize {
        self.layout.tiles.nx
    }

    pub fn ny(&self) -> usize {
        self.layout.tiles.ny
    }

    pub fn nz(&self) -> usize {
        self.layout.tiles.nz
    }

    pub fn mesh(&self) -> MeshDims {
        self.layout.mesh
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn set_grid_lims(
        &mut self,
        xmin: Float,
        xmax: Float,
        ymin: Float,
        ymax: Float,
    ) -> Result<()> {
        if !(xmin < xmax) || !(ymin < ymax) {
            return Err(PicError::ConfigError(format!(
                "invalid extents x: [{}, {}], y: [{}, {}]",
                xmin, xmax, ymin, ymax
            )));
        }
        if self.extents.is_some() {
            return Err(PicError::ConfigError(
                "grid extents can only be set once".to_string(),
            ));
        }
        self.extents = Some(Extents {
            xmin,
            xmax,
            ymin,
            ymax,
        });
        Ok(())
    }

    pub fn extents(&self) -> Option<Extents> {
        self.extents
    }

    pub fn id(&self, i: usize, j: usize) -> usize {
        self.layout.tiles.id(i, j)
    }

    pub fn index_of(&self, cid: usize) -> (usize, usize) {
        self.layout.tiles.index_of(cid)
    }

    /// Every cell id of the domain, local or not.
    pub fn cell_ids(&self) -> Vec<usize> {
        (0..self.tiles.len()).collect()
    }

    /// Ids of the tiles registered on this unit, ascending.
    pub fn local_cell_ids(&self) -> Vec<usize> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_some())
            .map(|(cid, _)| cid)
            .collect()
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter_map(|t| t.as_ref())
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut().filter_map(|t| t.as_mut())
    }

    pub(crate) fn slots(&self) -> &[Option<Tile>] {
        &self.tiles
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Option<Tile>] {
        &mut self.tiles
    }

    fn in_range(&self, i: usize, j: usize) -> bool {
        i < self.nx() && j < self.ny()
    }

    pub fn owner_of(&self, i: usize, j: usize) -> Result<usize> {
        if !self.in_range(i, j) {
            return Err(PicError::NotFound(format!("({}, {}) outside the grid", i, j)));
        }
        Ok(self.owners[self.id(i, j)])
    }

    pub fn is_local(&self, i: usize, j: usize) -> bool {
        self.owner_of(i, j).map_or(false, |o| o == self.rank)
    }

    pub fn add_tile(&mut self, tile: Tile) -> Result<()> {
        let (i, j) = tile.index();
        if !self.in_range(i, j) || tile.id() != self.id(i, j) {
            return Err(PicError::ConfigError(format!(
                "tile ({}, {}) does not belong to a {}x{} grid",
                i,
                j,
                self.nx(),
                self.ny()
            )));
        }
        if tile.mesh() != self.mesh() {
            return Err(PicError::ConfigError(format!(
                "tile ({}, {}) mesh {:?} differs from grid mesh {:?}",
                i,
                j,
                tile.mesh(),
                self.mesh()
            )));
        }
        let slot = &mut self.tiles[tile.id()];
        if slot.is_some() {
            return Err(PicError::DuplicateTile { i, j });
        }
        *slot = Some(tile);
        Ok(())
    }

    pub fn get_tile(&self, i: usize, j: usize) -> Result<&Tile> {
        if !self.in_range(i, j) {
            return Err(PicError::NotFound(format!("({}, {}) outside the grid", i, j)));
        }
        self.get_tile_by_id(self.id(i, j))
    }

    pub fn get_tile_mut(&mut self, i: usize, j: usize) -> Result<&mut Tile> {
        if !self.in_range(i, j) {
            return Err(PicError::NotFound(format!("({}, {}) outside the grid", i, j)));
        }
        let cid = self.id(i, j);
        self.get_tile_by_id_mut(cid)
    }

    pub fn get_tile_by_id(&self, cid: usize) -> Result<&Tile> {
        self.tiles
            .get(cid)
            .and_then(|t| t.as_ref())
            .ok_or_else(|| PicError::NotFound(format!("cell id {}", cid)))
    }

    pub fn get_tile_by_id_mut(&mut self, cid: usize) -> Result<&mut Tile> {
        self.tiles
            .get_mut(cid)
            .and_then(|t| t.as_mut())
            .ok_or_else(|| PicError::NotFound(format!("cell id {}", cid)))
    }

    /// Local, remote or missing; the coordinate is wrapped first.
    pub fn lookup(&self, i: usize, j: usize) -> TileRef<'_> {
        let (i, j) = self.neighbor_coord(i, j, 0, 0);
        let cid = self.id(i, j);
        match &self.tiles[cid] {
            Some(tile) => TileRef::Local(tile),
            None if self.owners[cid] != self.rank => TileRef::Remote(self.owners[cid]),
            None => TileRef::Missing,
        }
    }

    /// The one periodic neighbour primitive of the grid.
    pub fn neighbor_coord(&self, i: usize, j: usize, di: isize, dj: isize) -> (usize, usize) {
        (
            wrap(i as isize + di, self.nx()),
            wrap(j as isize + dj, self.ny()),
        )
    }

    /// Global mesh index of the first owned cell of tile `(i, j)`.
    pub fn global_offset(&self, i: usize, j: usize) -> (usize, usize, usize) {
        (i * self.mesh().nx, j * self.mesh().ny, 0)
    }

    fn require_extents(&self) -> Result<Extents> {
        self.extents
            .ok_or_else(|| PicError::ConfigError("grid extents have not been set".to_string()))
    }

    /// Physical size of one mesh cell.
    pub fn cell_size(&self) -> Result<(Float, Float)> {
        let ext = self.require_extents()?;
        Ok((
            (ext.xmax - ext.xmin) / (self.nx() * self.mesh().nx) as Float,
            (ext.ymax - ext.ymin) / (self.ny() * self.mesh().ny) as Float,
        ))
    }

    /// Physical lower corner of tile `(i, j)`.
    pub fn tile_origin(&self, i: usize, j: usize) -> Result<(Float, Float)> {
        let ext = self.require_extents()?;
        let (dx, dy) = self.cell_size()?;
        let (ox, oy, _) = self.global_offset(i, j);
        Ok((ext.xmin + ox as Float * dx, ext.ymin + oy as Float * dy))
    }
}
