use crate::error::{PicError, Result};
use crate::flds::mesh::MeshDims;
use crate::flds::YeeLattice;
use crate::grid::Layout;
use crate::prtls::ParticleContainer;

/// One rectangular piece of the domain: its field lattice and one particle
/// container per species.
#[derive(Clone, Debug)]
pub struct Tile {
    index: (usize, usize),
    cid: usize,
    yee: YeeLattice,
    species: Vec<ParticleContainer>,
}

impl Tile {
    pub fn new(i: usize, j: usize, layout: Layout, n_species: usize) -> Result<Tile> {
        let mesh = MeshDims::new(layout.mesh.nx, layout.mesh.ny, layout.mesh.nz)?;
        if i >= layout.tiles.nx || j >= layout.tiles.ny {
            return Err(PicError::ConfigError(format!(
                "tile ({}, {}) lies outside a {}x{} grid",
                i, j, layout.tiles.nx, layout.tiles.ny
            )));
        }
        Ok(Tile {
            index: (i, j),
            cid: layout.tiles.id(i, j),
            yee: YeeLattice::new(mesh),
            species: (0..n_species).map(|_| ParticleContainer::new()).collect(),
        })
    }

    pub fn index(&self) -> (usize, usize) {
        self.index
    }

    pub fn id(&self) -> usize {
        self.cid
    }

    pub fn mesh(&self) -> MeshDims {
        self.yee.dims()
    }

    pub fn yee(&self) -> &YeeLattice {
        &self.yee
    }

    pub fn yee_mut(&mut self) -> &mut YeeLattice {
        &mut self.yee
    }

    pub fn n_species(&self) -> usize {
        self.species.len()
    }

    pub fn container(&self, species: usize) -> Result<&ParticleContainer> {
        let cid = self.cid;
        self.species
            .get(species)
            .ok_or_else(|| PicError::NotFound(format!("species {} in tile {}", species, cid)))
    }

    pub fn container_mut(&mut self, species: usize) -> Result<&mut ParticleContainer> {
        let cid = self.cid;
        self.species
            .get_mut(species)
            .ok_or_else(|| PicError::NotFound(format!("species {} in tile {}", species, cid)))
    }

    pub fn containers_mut(&mut self) -> impl Iterator<Item = &mut ParticleContainer> {
        self.species.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridDims;

    fn layout() -> Layout {
        Layout {
            tiles: GridDims::new(4, 3, 1).unwrap(),
            mesh: MeshDims::new(5, 5, 1).unwrap(),
        }
    }

    #[test]
    fn tile_bookkeeping() {
        let tile = Tile::new(2, 1, layout(), 2).unwrap();
        assert_eq!(tile.index(), (2, 1));
        assert_eq!(tile.id(), 2 * 3 + 1);
        assert_eq!(tile.n_species(), 2);
        assert_eq!(tile.mesh(), layout().mesh);
        assert!(tile.container(1).unwrap().is_empty());
        assert!(matches!(tile.container(2), Err(PicError::NotFound(_))));
    }

    #[test]
    fn malformed_tiles_rejected() {
        let mut bad = layout();
        bad.mesh.nx = 0;
        assert!(matches!(
            Tile::new(0, 0, bad, 1),
            Err(PicError::ConfigError(_))
        ));
        assert!(Tile::new(4, 0, layout(), 1).is_err());
        assert!(Tile::new(0, 3, layout(), 1).is_err());
    }
}
