#![allow(dead_code)]

use pic_tiles::flds::mesh::MeshDims;
use pic_tiles::flds::Component;
use pic_tiles::grid::{wrap, Grid, GridDims};
use pic_tiles::tile::Tile;
use pic_tiles::Float;

pub fn setup_grid(nx: usize, ny: usize, mesh: (usize, usize, usize)) -> Grid {
    // This sets up a small single unit grid with every tile
    // registered so that it can be used in testing;
    let mut grid = Grid::new(
        GridDims::new(nx, ny, 1).unwrap(),
        MeshDims::new(mesh.0, mesh.1, mesh.2).unwrap(),
    )
    .unwrap();
    grid.set_grid_lims(0.0, 1.0, 0.0, 1.0).unwrap();
    for i in 0..nx {
        for j in 0..ny {
            let tile = Tile::new(i, j, grid.layout(), 1).unwrap();
            grid.add_tile(tile).unwrap();
        }
    }
    grid
}

/// Put a running value 1, 2, 3, ... into every owned cell, looping over
/// tiles (i then j) and inside a tile over x, y, then z. All six components
/// get the same value, offset by 0.125 per component.
pub fn fill_running(grid: &mut Grid) {
    let mesh = grid.mesh();
    let mut val: Float = 1.0;
    for i in 0..grid.nx() {
        for j in 0..grid.ny() {
            let yee = grid.get_tile_mut(i, j).unwrap().yee_mut();
            for q in 0..mesh.nx as isize {
                for k in 0..mesh.ny as isize {
                    for r in 0..mesh.nz as isize {
                        for (n, &c) in Component::ALL.iter().enumerate() {
                            yee.component_mut(c)
                                .set(q, k, r, val + 0.125 * n as Float)
                                .unwrap();
                        }
                        val += 1.0;
                    }
                }
            }
        }
    }
}

/// The owned value that the (possibly guard) cell `(q, k, r)` of tile
/// `(i, j)` must mirror, found by wrapping in global mesh coordinates.
pub fn expected(
    grid: &Grid,
    c: Component,
    i: usize,
    j: usize,
    q: isize,
    k: isize,
    r: isize,
) -> Float {
    let mesh = grid.mesh();
    let gx = wrap((i * mesh.nx) as isize + q, grid.nx() * mesh.nx);
    let gy = wrap((j * mesh.ny) as isize + k, grid.ny() * mesh.ny);
    let gz = wrap(r, mesh.nz);
    let owner = grid.get_tile(gx / mesh.nx, gy / mesh.ny).unwrap();
    owner
        .yee()
        .component(c)
        .get((gx % mesh.nx) as isize, (gy % mesh.ny) as isize, gz as isize)
        .unwrap()
}

/// Every cell of every tile, guard band included, for every component.
pub fn assert_halo_consistent(grid: &Grid) {
    let mesh = grid.mesh();
    for tile in grid.tiles() {
        let (i, j) = tile.index();
        for &c in Component::ALL.iter() {
            for r in -1..=mesh.nz as isize {
                for k in -1..=mesh.ny as isize {
                    for q in -1..=mesh.nx as isize {
                        let got = tile.yee().component(c).get(q, k, r).unwrap();
                        assert_eq!(
                            got,
                            expected(grid, c, i, j, q, k, r),
                            "{} of tile ({}, {}) at ({}, {}, {})",
                            c.name(),
                            i,
                            j,
                            q,
                            k,
                            r
                        );
                    }
                }
            }
        }
    }
}

pub fn halo_snapshot(grid: &Grid) -> Vec<Vec<Float>> {
    let comps: &'static [Component] = &Component::ALL;
    grid.tiles()
        .flat_map(|t| {
            comps
                .iter()
                .map(move |&c| t.yee().component(c).as_slice().to_vec())
        })
        .collect()
}
