use std::f64::consts::{FRAC_PI_2, PI};

use glam::{DMat3, DVec3};
use thiserror::Error;
use tracing::debug;

use crate::grid::Grid;

pub const DEFAULT_RESOLUTION: usize = 100;

#[derive(Error, Debug, PartialEq)]
pub enum ShapeError {
    #[error("Invalid resolution {0}, a superquadric grid needs at least 2 samples per axis")]
    InvalidResolution(usize),
    #[error("Invalid scale {value} along axis {axis}, expected a positive finite number")]
    NonPositiveScale { axis: usize, value: f64 },
    #[error("Invalid exponent epsilon{index} = {value}, expected a positive finite number")]
    NonPositiveExponent { index: usize, value: f64 },
}

/// Signed power: `sign(x) * |x|^p`.
///
/// Cosines and sines of the sample angles go negative, and the exponents are
/// usually fractional, so the sign has to be pulled out before `powf`.
pub fn spow(x: f64, p: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x.signum() * x.abs().powf(p)
    }
}

/// `n` evenly spaced values over `[start, end]`, both ends included.
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![start];
    }
    let last = (n - 1) as f64;
    (0..n)
        .map(|k| {
            let t = k as f64 / last;
            start * (1.0 - t) + end * t
        })
        .collect()
}

/// Size, shape and sampling density of one superquadric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeParameters {
    scale: DVec3,
    exponents: [f64; 2],
    resolution: usize,
}

impl Default for ShapeParameters {
    fn default() -> Self {
        Self {
            scale: DVec3::ONE,
            exponents: [2.0, 2.0],
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl ShapeParameters {
    pub fn new(scale: [f64; 3], exponents: [f64; 2], resolution: usize) -> Result<Self, ShapeError> {
        if resolution < 2 {
            return Err(ShapeError::InvalidResolution(resolution));
        }
        for (axis, &value) in scale.iter().enumerate() {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ShapeError::NonPositiveScale { axis, value });
            }
        }
        for (i, &value) in exponents.iter().enumerate() {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ShapeError::NonPositiveExponent { index: i + 1, value });
            }
        }
        Ok(Self {
            scale: DVec3::from_array(scale),
            exponents,
            resolution,
        })
    }

    pub fn scale(&self) -> DVec3 {
        self.scale
    }

    pub fn exponents(&self) -> [f64; 2] {
        self.exponents
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Surface point at latitude `eta` and longitude `omega`.
    pub fn surface_point(&self, eta: f64, omega: f64) -> DVec3 {
        let [e1, e2] = self.exponents;
        let ring = spow(eta.cos(), e1);
        DVec3::new(
            self.scale.x * ring * spow(omega.cos(), e2),
            self.scale.y * ring * spow(omega.sin(), e2),
            self.scale.z * spow(eta.sin(), e1),
        )
    }
}

/// Surface samples together with the angles they were taken at.
///
/// Rows follow `omega` over `[-pi, pi]`, columns follow `eta` over
/// `[-pi/2, pi/2]`.
#[derive(Debug, Clone)]
pub struct SampledSurface {
    pub points: Grid<DVec3>,
    pub eta: Grid<f64>,
    pub omega: Grid<f64>,
}

pub fn sample(params: &ShapeParameters) -> SampledSurface {
    let n = params.resolution;
    let etas = linspace(-FRAC_PI_2, FRAC_PI_2, n);
    let omegas = linspace(-PI, PI, n);

    let eta = Grid::from_fn(n, n, |_, c| etas[c]);
    let omega = Grid::from_fn(n, n, |r, _| omegas[r]);
    let points = Grid::from_fn(n, n, |r, c| params.surface_point(etas[c], omegas[r]));

    SampledSurface { points, eta, omega }
}

/// Two triangles per grid cell, indices into the row-major vertex list of an
/// `n` x `n` sample grid.
pub fn triangulate(n: usize) -> Result<Vec<[usize; 3]>, ShapeError> {
    if n < 2 {
        return Err(ShapeError::InvalidResolution(n));
    }
    // zero-sized cells, only the indexing is needed
    let lattice = Grid::from_fn(n, n, |_, _| ());
    let mut triangles = Vec::with_capacity(2 * (n - 1) * (n - 1));
    for i in 0..n - 1 {
        for j in 0..n - 1 {
            triangles.push([
                lattice.index(i, j),
                lattice.index(i + 1, j + 1),
                lattice.index(i + 1, j),
            ]);
            triangles.push([
                lattice.index(i, j),
                lattice.index(i, j + 1),
                lattice.index(i + 1, j + 1),
            ]);
        }
    }
    Ok(triangles)
}

/// Rotate then translate: `R * p + t` for every point.
///
/// The rotation is taken as given; a non-orthonormal matrix will shear the
/// output.
pub fn place(points: &[DVec3], rotation: &DMat3, translation: DVec3) -> Vec<DVec3> {
    points
        .iter()
        .map(|&p| rotation.mul_vec3(p) + translation)
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<DVec3>,
    pub triangles: Vec<[usize; 3]>,
}

impl Mesh {
    pub fn from_params(params: &ShapeParameters) -> Result<Self, ShapeError> {
        let triangles = triangulate(params.resolution)?;
        let vertices = sample(params).points.into_vec();
        debug!(
            vertices = vertices.len(),
            triangles = triangles.len(),
            "tessellated superquadric"
        );
        Ok(Self { vertices, triangles })
    }

    /// Move the mesh into world space.
    pub fn placed(self, rotation: &DMat3, translation: DVec3) -> Self {
        Self {
            vertices: place(&self.vertices, rotation, translation),
            triangles: self.triangles,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn triangle_vertices(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        self.triangles
            .iter()
            .map(|t| [self.vertices[t[0]], self.vertices[t[1]], self.vertices[t[2]]])
    }
}
