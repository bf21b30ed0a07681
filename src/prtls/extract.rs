use crate::error::{PicError, Result};
use crate::grid::Grid;
use crate::Float;
use rand::seq::index;
use rand::Rng;

/// Flattened particles of one species gathered from several tiles.
///
/// `origin[n]` names the `(cell id, local index)` the n-th entry was read
/// from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleSample {
    pub x: Vec<Float>,
    pub y: Vec<Float>,
    pub z: Vec<Float>,
    pub ux: Vec<Float>,
    pub uy: Vec<Float>,
    pub uz: Vec<Float>,
    pub origin: Vec<(usize, usize)>,
}

impl ParticleSample {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn columns(&self) -> [(&'static str, &[Float]); 6] {
        [
            ("x", self.x.as_slice()),
            ("y", self.y.as_slice()),
            ("z", self.z.as_slice()),
            ("ux", self.ux.as_slice()),
            ("uy", self.uy.as_slice()),
            ("uz", self.uz.as_slice()),
        ]
    }

    fn push_from(&mut self, other: &ParticleSample, n: usize) {
        self.x.push(other.x[n]);
        self.y.push(other.y[n]);
        self.z.push(other.z[n]);
        self.ux.push(other.ux[n]);
        self.uy.push(other.uy[n]);
        self.uz.push(other.uz[n]);
        self.origin.push(other.origin[n]);
    }

    /// Random subset of `round(fraction * len)` entries drawn without
    /// replacement, kept in their original order. `self` is left untouched.
    pub fn downsample<R: Rng + ?Sized>(
        &self,
        fraction: f64,
        rng: &mut R,
    ) -> Result<ParticleSample> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(PicError::ConfigError(format!(
                "sampling fraction must lie in (0, 1], got {}",
                fraction
            )));
        }
        let n = self.len();
        let amount = ((fraction * n as f64).round() as usize).min(n);
        let mut picked = index::sample(rng, n, amount).into_vec();
        picked.sort_unstable();

        let mut out = ParticleSample::default();
        for i in picked {
            out.push_from(self, i);
        }
        Ok(out)
    }
}

/// Concatenate species `species` of the tiles at `coords`, in the order given.
/// Every coordinate must be a locally present tile.
pub fn extract_particles(
    grid: &Grid,
    coords: &[(usize, usize)],
    species: usize,
) -> Result<ParticleSample> {
    let mut total = 0;
    let mut containers = Vec::with_capacity(coords.len());
    for &(i, j) in coords {
        let tile = grid.get_tile(i, j)?;
        let prtls = tile.container(species)?;
        total += prtls.len();
        containers.push((tile.id(), prtls));
    }

    let mut out = ParticleSample::default();
    for col in [
        &mut out.x,
        &mut out.y,
        &mut out.z,
        &mut out.ux,
        &mut out.uy,
        &mut out.uz,
    ]
    .iter_mut()
    {
        col.reserve(total);
    }
    out.origin.reserve(total);

    for (cid, prtls) in containers {
        let [x, y, z, ux, uy, uz] = prtls.columns();
        out.x.extend_from_slice(x);
        out.y.extend_from_slice(y);
        out.z.extend_from_slice(z);
        out.ux.extend_from_slice(ux);
        out.uy.extend_from_slice(uy);
        out.uz.extend_from_slice(uz);
        out.origin.extend((0..prtls.len()).map(|n| (cid, n)));
    }
    Ok(out)
}

/// Species `species` of every local tile, in ascending cell id order.
pub fn extract_all(grid: &Grid, species: usize) -> Result<ParticleSample> {
    let coords: Vec<(usize, usize)> = grid
        .local_cell_ids()
        .into_iter()
        .map(|cid| grid.index_of(cid))
        .collect();
    extract_particles(grid, &coords, species)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flds::mesh::MeshDims;
    use crate::grid::{Grid, GridDims};
    use crate::tile::Tile;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid_with_counts(counts: &[usize]) -> Grid {
        let mut grid = Grid::new(
            GridDims::new(counts.len(), 1, 1).unwrap(),
            MeshDims::new(2, 2, 1).unwrap(),
        )
        .unwrap();
        for (i, &n) in counts.iter().enumerate() {
            let mut tile = Tile::new(i, 0, grid.layout(), 2).unwrap();
            let prtls = tile.container_mut(0).unwrap();
            for k in 0..n {
                let v = (100 * i + k) as Float;
                prtls.add_particle([v, v + 0.25, 0.0], [-v, 0.0, 1.0]);
            }
            grid.add_tile(tile).unwrap();
        }
        grid
    }

    #[test]
    fn concatenation_traces_back() {
        let grid = grid_with_counts(&[3, 0, 2]);
        let sample = extract_all(&grid, 0).unwrap();
        assert_eq!(sample.len(), 5);
        assert_eq!(sample.origin.len(), 5);
        assert_eq!(sample.origin[3], (2, 0));
        for (n, &(cid, k)) in sample.origin.iter().enumerate() {
            let (i, j) = grid.index_of(cid);
            let prtls = grid.get_tile(i, j).unwrap().container(0).unwrap();
            assert_eq!(sample.x[n], prtls.loc(0)[k]);
            assert_eq!(sample.ux[n], prtls.vel(0)[k]);
        }
        let total: Float = sample.y.iter().sum();
        assert_eq!(total, 0.0 + 1.0 + 2.0 + 200.0 + 201.0 + 5.0 * 0.25);
    }

    #[test]
    fn tile_order_is_respected() {
        let grid = grid_with_counts(&[1, 1]);
        let sample = extract_particles(&grid, &[(1, 0), (0, 0)], 0).unwrap();
        assert_eq!(sample.x, vec![100.0, 0.0]);
    }

    #[test]
    fn unknown_species_or_tile() {
        let grid = grid_with_counts(&[1]);
        assert!(matches!(
            extract_particles(&grid, &[(0, 0)], 5),
            Err(PicError::NotFound(_))
        ));
        assert!(matches!(
            extract_particles(&grid, &[(3, 0)], 0),
            Err(PicError::NotFound(_))
        ));
    }

    #[test]
    fn downsample_counts() {
        let grid = grid_with_counts(&[7, 3]);
        let sample = extract_all(&grid, 0).unwrap();
        let before = sample.clone();
        let mut rng = StdRng::seed_from_u64(42);

        let half = sample.downsample(0.5, &mut rng).unwrap();
        assert_eq!(half.len(), 5);
        let mut seen = half.origin.clone();
        seen.dedup();
        assert_eq!(seen.len(), 5);
        assert!(half.origin.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(sample.downsample(1.0, &mut rng).unwrap(), sample);
        assert_eq!(sample.downsample(0.04, &mut rng).unwrap().len(), 0);
        assert_eq!(sample.downsample(0.25, &mut rng).unwrap().len(), 3);
        assert_eq!(sample, before);

        assert!(sample.downsample(0.0, &mut rng).is_err());
        assert!(sample.downsample(1.5, &mut rng).is_err());

        let empty = ParticleSample::default();
        assert!(empty.downsample(0.3, &mut rng).unwrap().is_empty());
    }
}
