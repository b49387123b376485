//! Superquadric shape abstractions: tessellation, input loading and SVG
//! rendering of point clouds next to the primitives fitted to them.

pub mod colormap;
pub mod error;
pub mod grid;
pub mod model;
pub mod pointcloud;
pub mod scriber;
pub mod superquadric;
pub mod view;

pub use error::LoadError;
pub use model::{Abstraction, Primitive};
pub use pointcloud::PointCloud;
pub use superquadric::{place, sample, spow, triangulate, Mesh, ShapeError, ShapeParameters};
pub use view::Camera;

#[cfg(test)]
#[macro_use]
extern crate is_close;
