//! Seams to the outside world: which unit owns a tile, and how boundary data
//! of tiles owned elsewhere reaches this unit.

use crate::error::{PicError, Result, TransportError};
use crate::flds::ghosts::{BoundarySlice, Direction};
use crate::flds::YeeLattice;
use crate::grid::{Grid, GridDims};
use std::collections::HashMap;

/// Maps a tile coordinate to the execution unit that owns it. Must be a pure
/// function of the grid shape and unit count.
pub trait Placement {
    fn owner_of(&self, i: usize, j: usize) -> usize;
}

/// Everything lives on unit 0.
pub struct SingleUnit;

impl Placement for SingleUnit {
    fn owner_of(&self, _i: usize, _j: usize) -> usize {
        0
    }
}

/// Contiguous runs of cell ids, as even as possible, one run per unit.
pub struct BlockPlacement {
    dims: GridDims,
    units: usize,
}

impl BlockPlacement {
    pub fn new(dims: GridDims, units: usize) -> Result<BlockPlacement> {
        if units == 0 || units > dims.n_tiles() {
            return Err(PicError::ConfigError(format!(
                "cannot spread {} tiles over {} units",
                dims.n_tiles(),
                units
            )));
        }
        Ok(BlockPlacement { dims, units })
    }

    pub fn units(&self) -> usize {
        self.units
    }
}

impl Placement for BlockPlacement {
    fn owner_of(&self, i: usize, j: usize) -> usize {
        self.dims.id(i, j) * self.units / self.dims.n_tiles()
    }
}

/// Delivers the owned boundary data of a tile held by another unit.
///
/// `fetch_remote_boundary(owner, i, j, dir)` must return what
/// `YeeLattice::boundary_slice(dir)` returns on tile `(i, j)` for the current
/// step. It may block until that data is available.
pub trait Transport: Sync {
    fn fetch_remote_boundary(
        &self,
        owner: usize,
        i: usize,
        j: usize,
        dir: Direction,
    ) -> std::result::Result<BoundarySlice, TransportError>;
}

/// Transport for single-unit runs; any remote request is a construction bug.
pub struct NoTransport;

impl Transport for NoTransport {
    fn fetch_remote_boundary(
        &self,
        owner: usize,
        i: usize,
        j: usize,
        _dir: Direction,
    ) -> std::result::Result<BoundarySlice, TransportError> {
        Err(TransportError::Unreachable { owner, i, j })
    }
}

/// Same-process transport: a copy of the lattices of every unit taken at the
/// step boundary.
pub struct SnapshotTransport {
    dims: GridDims,
    lattices: HashMap<usize, (usize, YeeLattice)>,
}

impl SnapshotTransport {
    /// Copy the local lattices of `grids`. Call after every unit has filled
    /// its interiors and before any of them exchanges.
    pub fn capture(grids: &[Grid]) -> Result<SnapshotTransport> {
        let first = grids
            .first()
            .ok_or_else(|| PicError::ConfigError("no grids to snapshot".to_string()))?;
        let dims = first.layout().tiles;
        let mut lattices = HashMap::new();
        for grid in grids {
            if grid.layout() != first.layout() {
                return Err(PicError::ConfigError(
                    "all units must share the same layout".to_string(),
                ));
            }
            for tile in grid.tiles() {
                lattices.insert(tile.id(), (grid.rank(), tile.yee().clone()));
            }
        }
        Ok(SnapshotTransport { dims, lattices })
    }
}

impl Transport for SnapshotTransport {
    fn fetch_remote_boundary(
        &self,
        owner: usize,
        i: usize,
        j: usize,
        dir: Direction,
    ) -> std::result::Result<BoundarySlice, TransportError> {
        match self.lattices.get(&self.dims.id(i, j)) {
            Some((rank, yee)) if *rank == owner => Ok(yee.boundary_slice(dir)),
            _ => Err(TransportError::Unreachable { owner, i, j }),
        }
    }
}
