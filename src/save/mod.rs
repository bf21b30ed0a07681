use crate::{
    flds::{mesh::Mesh, Component},
    prtls::extract::extract_all,
    Float, Sim,
};
use anyhow::{Context, Result};
use log::info;
use rand::Rng;

pub(crate) fn save_fld_interior(fld: &Mesh, name: &str, outdir: &str) -> Result<()> {
    let out_vec: Vec<Float> = fld.interior();
    npy::to_file(format!("{}/flds/{}.npy", outdir, name), out_vec)
        .context(format!("Could not save {} data to file", name))?;
    Ok(())
}

/// Write the down-sampled particles and the owned field cells of every unit
/// under `<prefix>/dat_XXXXX/unit_XXX/`.
pub fn save_output<R: Rng>(sim: &Sim, rng: &mut R) -> Result<()> {
    let cfg = &sim.config.output;
    let output_prefix = format!(
        "{}/dat_{:05}",
        cfg.prefix,
        sim.t() / cfg.output_interval
    );
    for grid in sim.grids.iter() {
        let unit_dir = format!("{}/unit_{:03}", output_prefix, grid.rank());
        std::fs::create_dir_all(format!("{}/flds", unit_dir))
            .context("Unable to create output directory")?;

        info!("saving prtls of unit {}", grid.rank());
        for species in 0..sim.config.setup.n_species {
            let sample = extract_all(grid, species)?.downsample(cfg.downsample, rng)?;
            for (name, col) in sample.columns().iter() {
                npy::to_file(
                    format!("{}/prtl_{}_{}.npy", unit_dir, species, name),
                    col.iter().cloned(),
                )
                .with_context(|| format!("Could not save {} prtl data", name))?;
            }
        }

        for tile in grid.tiles() {
            for &c in Component::ALL.iter() {
                let name = format!("{}_{:04}", c.name(), tile.id());
                save_fld_interior(tile.yee().component(c), &name, &unit_dir)?;
            }
        }
    }
    Ok(())
}
