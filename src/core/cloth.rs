use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::topology::{GridCoord, Spring, SpringKind};
use crate::config::{DEFAULT_TOTAL_MASS, MAX_SAMPLE_COUNT, MIN_SAMPLE_COUNT};
use crate::error::{ClothError, Result};

/// Placement of the flat rest configuration.
///
/// Particle `(ku, kv)` rests at `origin + ku * h * down + kv * h * across`
/// with `h = edge_length / (N - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothLayout {
    pub origin: Vec3,
    pub across: Vec3,
    pub down: Vec3,
    pub edge_length: f32,
}

impl Default for ClothLayout {
    fn default() -> Self {
        Self {
            origin: Vec3::new(-0.5, 0.0, 0.0),
            across: Vec3::X,
            down: Vec3::NEG_Y,
            edge_length: 1.0,
        }
    }
}

impl ClothLayout {
    fn validate(&self) -> Result<()> {
        if !(self.edge_length.is_finite() && self.edge_length > 0.0) {
            return Err(ClothError::InvalidLayout("edge length must be positive"));
        }
        if !self.origin.is_finite() {
            return Err(ClothError::InvalidLayout("origin must be finite"));
        }
        let across = self.across.try_normalize();
        let down = self.down.try_normalize();
        match (across, down) {
            (Some(a), Some(d)) if a.cross(d).length_squared() > 1e-6 => Ok(()),
            _ => Err(ClothError::InvalidLayout(
                "axes must be non-zero and not parallel",
            )),
        }
    }
}

/// Particle grid of the cloth, stored as structure-of-arrays.
///
/// Flat index of `(ku, kv)` is `ku * N + kv`. Topology is fixed for the
/// lifetime of the value; a new sample count means a new `ClothState`.
#[derive(Debug, Clone)]
pub struct ClothState {
    pub position: Vec<Vec3>,
    pub velocity: Vec<Vec3>,
    /// Net force of the last force evaluation.
    pub force: Vec<Vec3>,
    pub normal: Vec<Vec3>,
    /// Zero for pinned particles.
    pub inverse_mass: Vec<f32>,
    sample_count: usize,
    spacing: f32,
    particle_mass: f32,
    pinned: Vec<usize>,
    triangles: Vec<[u32; 3]>,
}

impl ClothState {
    /// Builds a flat `n x n` cloth with the default layout and mass.
    pub fn new(sample_count: usize) -> Result<Self> {
        Self::with_layout(sample_count, &ClothLayout::default(), DEFAULT_TOTAL_MASS)
    }

    pub fn with_layout(sample_count: usize, layout: &ClothLayout, mass_total: f32) -> Result<Self> {
        if !(MIN_SAMPLE_COUNT..=MAX_SAMPLE_COUNT).contains(&sample_count) {
            return Err(ClothError::InvalidSampleCount {
                requested: sample_count,
                min: MIN_SAMPLE_COUNT,
                max: MAX_SAMPLE_COUNT,
            });
        }
        if !(mass_total.is_finite() && mass_total > 0.0) {
            return Err(ClothError::InvalidMass(mass_total));
        }
        layout.validate()?;

        let n = sample_count;
        let count = n * n;
        let spacing = layout.edge_length / (n - 1) as f32;
        let across = layout.across.normalize() * spacing;
        let down = layout.down.normalize() * spacing;

        let mut position = Vec::with_capacity(count);
        for ku in 0..n {
            for kv in 0..n {
                position.push(layout.origin + down * ku as f32 + across * kv as f32);
            }
        }

        let particle_mass = mass_total / count as f32;
        let mut cloth = Self {
            position,
            velocity: vec![Vec3::ZERO; count],
            force: vec![Vec3::ZERO; count],
            normal: vec![Vec3::ZERO; count],
            inverse_mass: vec![1.0 / particle_mass; count],
            sample_count: n,
            spacing,
            particle_mass,
            pinned: Vec::new(),
            triangles: Self::build_triangles(n),
        };
        cloth.update_normals();
        Ok(cloth)
    }

    fn build_triangles(n: usize) -> Vec<[u32; 3]> {
        let mut triangles = Vec::with_capacity(2 * (n - 1) * (n - 1));
        for ku in 0..n - 1 {
            for kv in 0..n - 1 {
                let i00 = (ku * n + kv) as u32;
                let i01 = (ku * n + kv + 1) as u32;
                let i10 = ((ku + 1) * n + kv) as u32;
                let i11 = ((ku + 1) * n + kv + 1) as u32;
                triangles.push([i00, i10, i11]);
                triangles.push([i00, i11, i01]);
            }
        }
        triangles
    }

    /// Number of samples along one edge.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn particle_count(&self) -> usize {
        self.position.len()
    }

    /// Grid spacing of the rest configuration.
    pub fn rest_spacing(&self) -> f32 {
        self.spacing
    }

    pub fn particle_mass(&self) -> f32 {
        self.particle_mass
    }

    pub fn index(&self, ku: usize, kv: usize) -> Option<usize> {
        (ku < self.sample_count && kv < self.sample_count).then(|| ku * self.sample_count + kv)
    }

    pub fn coord(&self, index: usize) -> GridCoord {
        GridCoord::new(index / self.sample_count, index % self.sample_count)
    }

    pub fn position_at(&self, ku: usize, kv: usize) -> Option<Vec3> {
        self.index(ku, kv).map(|i| self.position[i])
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Flat indices of the neighbours of `(ku, kv)` linked by `kind` springs.
    pub fn neighbors(&self, ku: usize, kv: usize, kind: SpringKind) -> impl Iterator<Item = usize> + '_ {
        let n = self.sample_count;
        let origin = GridCoord::new(ku, kv);
        let inside = ku < n && kv < n;
        kind.offsets()
            .iter()
            .filter(move |_| inside)
            .filter_map(move |&(du, dv)| origin.offset(du, dv, n))
            .map(move |c| c.ku * n + c.kv)
    }

    pub fn neighbor_count(&self, ku: usize, kv: usize, kind: SpringKind) -> usize {
        self.neighbors(ku, kv, kind).count()
    }

    /// Every spring of the grid, each listed once.
    pub fn springs(&self) -> Vec<Spring> {
        let n = self.sample_count;
        let mut springs = Vec::new();
        for kind in SpringKind::ALL {
            let rest_length = self.spacing * kind.rest_factor();
            for ku in 0..n {
                for kv in 0..n {
                    let here = GridCoord::new(ku, kv);
                    for (du, dv) in kind.forward_offsets() {
                        if let Some(other) = here.offset(du, dv, n) {
                            springs.push(Spring {
                                a: ku * n + kv,
                                b: other.ku * n + other.kv,
                                rest_length,
                                kind,
                            });
                        }
                    }
                }
            }
        }
        springs
    }

    pub fn spring_count(&self, kind: SpringKind) -> usize {
        kind.count_in_grid(self.sample_count)
    }

    /// Re-derives particle mass from the total; pinned particles stay at zero inverse mass.
    pub fn set_total_mass(&mut self, mass_total: f32) -> Result<()> {
        if !(mass_total.is_finite() && mass_total > 0.0) {
            return Err(ClothError::InvalidMass(mass_total));
        }
        self.particle_mass = mass_total / self.particle_count() as f32;
        let inverse = 1.0 / self.particle_mass;
        self.inverse_mass.fill(inverse);
        for &index in &self.pinned {
            self.inverse_mass[index] = 0.0;
        }
        Ok(())
    }

    /// Moves a particle to `target` and removes it from integration.
    pub fn pin(&mut self, index: usize, target: Vec3) {
        self.position[index] = target;
        self.velocity[index] = Vec3::ZERO;
        self.inverse_mass[index] = 0.0;
        if !self.pinned.contains(&index) {
            self.pinned.push(index);
        }
    }

    /// Restores the inverse mass of every pinned particle.
    pub fn release_pins(&mut self) {
        let inverse = 1.0 / self.particle_mass;
        for index in self.pinned.drain(..) {
            self.inverse_mass[index] = inverse;
        }
    }

    pub fn is_pinned(&self, index: usize) -> bool {
        self.inverse_mass.get(index).is_some_and(|&w| w == 0.0)
    }

    pub fn pinned(&self) -> &[usize] {
        &self.pinned
    }

    /// Recomputes area-weighted vertex normals from the current positions.
    pub fn update_normals(&mut self) {
        self.normal.fill(Vec3::ZERO);
        for &[a, b, c] in &self.triangles {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let face = (self.position[b] - self.position[a]).cross(self.position[c] - self.position[a]);
            self.normal[a] += face;
            self.normal[b] += face;
            self.normal[c] += face;
        }
        for normal in &mut self.normal {
            *normal = normal.normalize_or_zero();
        }
    }

    /// Total kinetic energy of the free particles.
    pub fn kinetic_energy(&self) -> f32 {
        self.velocity
            .iter()
            .zip(&self.inverse_mass)
            .filter(|(_, &w)| w > 0.0)
            .map(|(v, _)| 0.5 * self.particle_mass * v.length_squared())
            .sum()
    }
}
