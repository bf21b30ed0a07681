use crate::Float;
use itertools::izip;
use rand::prelude::*;
use rand_distr::{Standard, StandardNormal};

pub mod extract;

/// Particles of one species inside one tile, stored as parallel columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleContainer {
    x: Vec<Float>,
    y: Vec<Float>,
    z: Vec<Float>,
    ux: Vec<Float>,
    uy: Vec<Float>,
    uz: Vec<Float>,
}

impl ParticleContainer {
    pub fn new() -> ParticleContainer {
        ParticleContainer::default()
    }

    pub fn with_capacity(n: usize) -> ParticleContainer {
        let mut prtls = ParticleContainer::new();
        prtls.reserve(n);
        prtls
    }

    pub fn reserve(&mut self, n: usize) {
        for col in self.columns_mut().iter_mut() {
            col.reserve(n);
        }
    }

    pub fn add_particle(&mut self, loc: [Float; 3], vel: [Float; 3]) {
        self.x.push(loc[0]);
        self.y.push(loc[1]);
        self.z.push(loc[2]);
        self.ux.push(vel[0]);
        self.uy.push(vel[1]);
        self.uz.push(vel[2]);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn clear(&mut self) {
        for col in self.columns_mut().iter_mut() {
            col.clear();
        }
    }

    /// Position column for dimension 0, 1 or 2.
    pub fn loc(&self, dim: usize) -> &[Float] {
        match dim {
            0 => &self.x,
            1 => &self.y,
            _ => &self.z,
        }
    }

    /// Velocity column for dimension 0, 1 or 2.
    pub fn vel(&self, dim: usize) -> &[Float] {
        match dim {
            0 => &self.ux,
            1 => &self.uy,
            _ => &self.uz,
        }
    }

    /// Columns in x, y, z, ux, uy, uz order.
    pub fn columns(&self) -> [&[Float]; 6] {
        [&self.x, &self.y, &self.z, &self.ux, &self.uy, &self.uz]
    }

    fn columns_mut(&mut self) -> [&mut Vec<Float>; 6] {
        [
            &mut self.x,
            &mut self.y,
            &mut self.z,
            &mut self.ux,
            &mut self.uy,
            &mut self.uz,
        ]
    }

    /// Replace the contents with `n` particles spread uniformly over the box
    /// `lo..hi` with normally distributed velocities of width `vth`.
    pub fn load_uniform<R: Rng>(
        &mut self,
        rng: &mut R,
        n: usize,
        lo: [Float; 3],
        hi: [Float; 3],
        vth: Float,
    ) {
        self.clear();
        self.reserve(n);
        for _ in 0..n {
            let mut loc = [0.0; 3];
            let mut vel = [0.0; 3];
            for (l, v, &a, &b) in izip!(loc.iter_mut(), vel.iter_mut(), lo.iter(), hi.iter()) {
                let r: Float = rng.sample(Standard);
                *l = a + r * (b - a);
                let g: Float = rng.sample(StandardNormal);
                *v = g * vth;
            }
            self.add_particle(loc, vel);
        }
    }
}
