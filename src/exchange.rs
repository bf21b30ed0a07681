use crate::comm::{NoTransport, Transport};
use crate::error::{PicError, Result, TransportError};
use crate::flds::ghosts::{BoundarySlice, Direction};
use crate::grid::{Grid, TileRef};
use crate::tile::Tile;
use log::debug;
use rayon::prelude::*;

/// Collect the boundary data every guard cell of `tile` needs.
fn gather<T: Transport + ?Sized>(
    grid: &Grid,
    tile: &Tile,
    transport: &T,
    dirs: &[Direction],
) -> Result<Vec<BoundarySlice>> {
    let (i, j) = tile.index();
    dirs.iter()
        .map(|&dir| {
            // the tile layer is one deep in z, so dz wraps onto the same tile
            let (ni, nj) = grid.neighbor_coord(i, j, dir.dx, dir.dy);
            match grid.lookup(ni, nj) {
                TileRef::Local(neigh) => Ok(neigh.yee().boundary_slice(dir)),
                TileRef::Remote(owner) => {
                    let slice = transport.fetch_remote_boundary(owner, ni, nj, dir)?;
                    if slice.dir != dir || !slice.fits(grid.mesh()) {
                        return Err(PicError::Transport(TransportError::Fatal(format!(
                            "malformed boundary slice from unit {} for tile ({}, {})",
                            owner, ni, nj
                        ))));
                    }
                    Ok(slice)
                }
                TileRef::Missing => Err(PicError::Topology { i: ni, j: nj }),
            }
        })
        .collect()
}

/// Refresh the guard band of every local tile from its periodic neighbours,
/// for all six field components and all 26 halo directions.
///
/// All slices are gathered before any guard cell is written, so a failed
/// fetch leaves every tile exactly as it was.
pub fn update_boundaries<T: Transport + ?Sized>(grid: &mut Grid, transport: &T) -> Result<()> {
    let dirs = Direction::all();
    let halos: Vec<Option<Vec<BoundarySlice>>> = {
        let grid: &Grid = grid;
        grid.slots()
            .par_iter()
            .map(|slot| match slot {
                Some(tile) => gather(grid, tile, transport, &dirs).map(Some),
                None => Ok(None),
            })
            .collect::<Result<_>>()?
    };

    grid.slots_mut()
        .par_iter_mut()
        .zip(halos.into_par_iter())
        .for_each(|(slot, halo)| {
            if let (Some(tile), Some(halo)) = (slot.as_mut(), halo) {
                let yee = tile.yee_mut();
                for slice in halo.iter() {
                    yee.apply_slice(slice);
                }
            }
        });
    debug!("updated guard bands on unit {}", grid.rank());
    Ok(())
}

impl Grid {
    /// Boundary update for grids that hold every tile themselves.
    pub fn update_boundaries(&mut self) -> Result<()> {
        update_boundaries(self, &NoTransport)
    }
}
