use log::{debug, info};
use rand::prelude::*;
use serde::Deserialize;
use std::fs;

use anyhow::{Context, Result};

pub mod comm;
pub mod error;
pub mod exchange;
pub mod flds;
pub mod grid;
pub mod prtls;
pub mod save;
pub mod tile;

use crate::comm::{BlockPlacement, SnapshotTransport};
use crate::exchange::update_boundaries;
use crate::flds::mesh::MeshDims;
use crate::flds::Component;
use crate::grid::{Grid, GridDims};
use crate::tile::Tile;

// We use a type alias for f64/Float to easily support
// double and single precision.
#[cfg(feature = "dprec")]
pub type Float = f64;

#[cfg(not(feature = "dprec"))]
pub type Float = f32;

const PI: Float = std::f64::consts::PI as Float;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub grid: GridParams,
    pub mesh: MeshParams,
    pub extents: ExtentParams,
    pub setup: Setup,
    pub output: Output,
}

#[derive(Deserialize, Clone, Debug)]
pub struct GridParams {
    pub nx: usize,
    pub ny: usize,
    #[serde(default = "one")]
    pub nz: usize,
}

#[derive(Deserialize, Clone, Debug)]
pub struct MeshParams {
    pub nx: usize,
    pub ny: usize,
    #[serde(default = "one")]
    pub nz: usize,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ExtentParams {
    pub xmin: Float,
    pub xmax: Float,
    pub ymin: Float,
    pub ymax: Float,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Setup {
    pub t_final: u32,
    pub n_species: usize,
    pub ppc: usize, // particles per mesh cell and species
    pub vth: Float,
    #[serde(default = "one")]
    pub units: usize, // execution units sharing the grid
    #[serde(default)]
    pub seed: u64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Output {
    pub write_output: bool,
    pub output_interval: u32,
    pub downsample: f64,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn one() -> usize {
    1
}

fn default_prefix() -> String {
    "output".to_string()
}

impl Config {
    pub fn new() -> Result<Config> {
        Config::from_path("config.toml")
    }

    pub fn from_path(path: &str) -> Result<Config> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Could not open {}", path))?;
        Config::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Config> {
        let cfg: Config = toml::from_str(contents).context("Could not parse Config file")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn grid_dims(&self) -> error::Result<GridDims> {
        GridDims::new(self.grid.nx, self.grid.ny, self.grid.nz)
    }

    pub fn mesh_dims(&self) -> error::Result<MeshDims> {
        MeshDims::new(self.mesh.nx, self.mesh.ny, self.mesh.nz)
    }

    pub fn validate(&self) -> Result<()> {
        let dims = self.grid_dims().context("Invalid [grid] section")?;
        self.mesh_dims().context("Invalid [mesh] section")?;
        BlockPlacement::new(dims, self.setup.units).context("Invalid unit count")?;
        let ext = &self.extents;
        if !(ext.xmin < ext.xmax) || !(ext.ymin < ext.ymax) {
            return Err(anyhow::Error::msg("Extents must satisfy min < max"));
        }
        if self.output.output_interval == 0 {
            return Err(anyhow::Error::msg("output_interval must be positive"));
        }
        if !(self.output.downsample > 0.0 && self.output.downsample <= 1.0) {
            return Err(anyhow::Error::msg("downsample must lie in (0, 1]"));
        }
        Ok(())
    }
}

/// All units of a run living in one process, one `Grid` per unit.
pub struct Sim {
    pub config: Config,
    pub grids: Vec<Grid>,
    t: u32,
}

impl Sim {
    pub fn new(cfg: &Config) -> Result<Sim> {
        cfg.validate()?;
        let dims = cfg.grid_dims()?;
        let mesh = cfg.mesh_dims()?;
        let placement = BlockPlacement::new(dims, cfg.setup.units)?;

        let mut grids = Vec::with_capacity(cfg.setup.units);
        for rank in 0..cfg.setup.units {
            let mut grid = Grid::with_placement(dims, mesh, rank, &placement)?;
            let ext = &cfg.extents;
            grid.set_grid_lims(ext.xmin, ext.xmax, ext.ymin, ext.ymax)?;
            load_tiles(&mut grid, cfg.setup.n_species)?;
            info!(
                "unit {} holds {} tiles",
                rank,
                grid.local_cell_ids().len()
            );
            grids.push(grid);
        }
        Ok(Sim {
            config: cfg.clone(),
            grids,
            t: 0,
        })
    }

    pub fn t(&self) -> u32 {
        self.t
    }

    /// Seed every species of every local tile with `ppc` particles per cell.
    pub fn load_particles<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        let setup = &self.config.setup;
        let mesh = self.grids[0].mesh();
        let n = setup.ppc * mesh.owned_cells();
        for grid in self.grids.iter_mut() {
            let (dx, dy) = grid.cell_size()?;
            let mut origins = Vec::new();
            for tile in grid.tiles() {
                let (i, j) = tile.index();
                origins.push(grid.tile_origin(i, j)?);
            }
            for (tile, (x0, y0)) in grid.tiles_mut().zip(origins) {
                let hi = [
                    x0 + mesh.nx as Float * dx,
                    y0 + mesh.ny as Float * dy,
                    mesh.nz as Float,
                ];
                for prtls in tile.containers_mut() {
                    prtls.load_uniform(rng, n, [x0, y0, 0.0], hi, setup.vth);
                }
            }
        }
        Ok(())
    }

    /// Stand-in for the field solver: a travelling plane wave in every
    /// component, interior cells only.
    pub fn drive_fields(&mut self) {
        let t = self.t as Float;
        for grid in self.grids.iter_mut() {
            let lx = (grid.nx() * grid.mesh().nx) as Float;
            let ly = (grid.ny() * grid.mesh().ny) as Float;
            let offsets: Vec<_> = grid
                .tiles()
                .map(|tile| {
                    let (i, j) = tile.index();
                    grid.global_offset(i, j)
                })
                .collect();
            for (tile, (ox, oy, _)) in grid.tiles_mut().zip(offsets) {
                for (n, &c) in Component::ALL.iter().enumerate() {
                    let phase = 0.1 * t + n as Float;
                    tile.yee_mut().component_mut(c).fill_interior(|i, j, _| {
                        let kx = 2.0 * PI * (ox + i) as Float / lx;
                        let ky = 2.0 * PI * (oy + j) as Float / ly;
                        (kx + ky + phase).sin()
                    });
                }
            }
        }
    }

    /// Snapshot every unit, then let each unit refresh its guard bands.
    pub fn exchange(&mut self) -> Result<()> {
        let transport = SnapshotTransport::capture(&self.grids)?;
        for grid in self.grids.iter_mut() {
            update_boundaries(grid, &transport)
                .with_context(|| format!("Boundary update failed on unit {}", grid.rank()))?;
        }
        Ok(())
    }

    pub fn step(&mut self) -> Result<()> {
        self.drive_fields();
        self.exchange()?;
        self.t += 1;
        Ok(())
    }
}

fn load_tiles(grid: &mut Grid, n_species: usize) -> Result<()> {
    for i in 0..grid.nx() {
        for j in 0..grid.ny() {
            if grid.is_local(i, j) {
                let tile = Tile::new(i, j, grid.layout(), n_species)?;
                grid.add_tile(tile)?;
            }
        }
    }
    Ok(())
}

pub fn run(cfg: Config) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(cfg.setup.seed);
    let mut sim = Sim::new(&cfg)?;
    info!("initializing prtls");
    sim.load_particles(&mut rng)?;

    while sim.t() <= cfg.setup.t_final {
        debug!("step {}", sim.t());
        if cfg.output.write_output && sim.t() % cfg.output.output_interval == 0 {
            save::save_output(&sim, &mut rng)?;
        }
        sim.step()?;
    }
    info!("finished {} steps", cfg.setup.t_final + 1);
    Ok(())
}

#[cfg(test)]
pub(crate) fn build_test_config() -> Config {
    Config::from_toml(
        r#"
        [grid]
        nx = 3
        ny = 2

        [mesh]
        nx = 4
        ny = 3
        nz = 2

        [extents]
        xmin = 0.0
        xmax = 12.0
        ymin = -3.0
        ymax = 3.0

        [setup]
        t_final = 2
        n_species = 2
        ppc = 1
        vth = 0.1
        units = 2

        [output]
        write_output = false
        output_interval = 1
        downsample = 0.5
        "#,
    )
    .unwrap()
}
