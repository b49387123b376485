use std::fs;
use std::path::Path;

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::LoadError;
use crate::superquadric::{Mesh, ShapeError, ShapeParameters};

/// One superquadric of a shape abstraction, as written by the fitting code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub scale: [f64; 3],
    /// Row-major rotation matrix
    pub rotation: [[f64; 3]; 3],
    pub position: [f64; 3],
    pub epsilon1: f64,
    pub epsilon2: f64,
}

impl Primitive {
    pub fn shape(&self, resolution: usize) -> Result<ShapeParameters, ShapeError> {
        ShapeParameters::new(self.scale, [self.epsilon1, self.epsilon2], resolution)
    }

    pub fn rotation(&self) -> DMat3 {
        // glam builds from columns, the file stores rows
        DMat3::from_cols_array_2d(&self.rotation).transpose()
    }

    pub fn translation(&self) -> DVec3 {
        DVec3::from_array(self.position)
    }

    /// World-space mesh of this primitive.
    pub fn mesh(&self, resolution: usize) -> Result<Mesh, ShapeError> {
        let params = self.shape(resolution)?;
        Ok(Mesh::from_params(&params)?.placed(&self.rotation(), self.translation()))
    }
}

/// A set of primitives approximating one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Abstraction {
    pub components: Vec<Primitive>,
}

impl Abstraction {
    pub fn from_json(contents: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let abstraction = Self::from_json(&fs::read_to_string(path)?)?;
        info!(
            path = %path.display(),
            components = abstraction.components.len(),
            "loaded abstraction"
        );
        Ok(abstraction)
    }

    /// Placed meshes for every component, in file order.
    pub fn meshes(&self, resolution: usize) -> Result<Vec<Mesh>, ShapeError> {
        self.components
            .iter()
            .enumerate()
            .map(|(i, component)| {
                debug!(component = i, "meshing component");
                component.mesh(resolution)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_fixture() {
        let abstraction = Abstraction::from_file("tests/chair.json").expect("valid abstraction");
        assert_eq!(abstraction.components.len(), 3);

        let seat = &abstraction.components[0];
        assert_eq!(seat.scale, [0.3, 0.3, 0.05]);
        assert_eq!(seat.epsilon1, 0.1);
        assert_eq!(seat.translation(), DVec3::new(0.0, 0.0, 0.1));

        let meshes = abstraction.meshes(10).unwrap();
        assert_eq!(meshes.len(), 3);
        assert!(meshes.iter().all(|m| m.vertex_count() == 100));
    }

    #[test]
    fn test_rotation_rows() {
        // quarter turn about z, written row by row
        let primitive = Primitive {
            scale: [1.0, 1.0, 1.0],
            rotation: [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            position: [0.0, 0.0, 0.0],
            epsilon1: 1.0,
            epsilon2: 1.0,
        };
        let r = primitive.rotation();
        assert!((r * DVec3::X).abs_diff_eq(DVec3::Y, 1e-12));
        assert!((r * DVec3::Y).abs_diff_eq(DVec3::NEG_X, 1e-12));
    }

    #[test]
    fn test_mesh_is_placed() {
        let primitive = Primitive {
            scale: [1.0, 2.0, 0.5],
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            position: [10.0, -4.0, 2.0],
            epsilon1: 1.0,
            epsilon2: 1.0,
        };
        let mesh = primitive.mesh(9).unwrap();
        let centre = mesh.vertices.iter().fold(DVec3::ZERO, |acc, v| acc + *v)
            / mesh.vertex_count() as f64;
        assert!(centre.abs_diff_eq(DVec3::new(10.0, -4.0, 2.0), 0.5));
        assert!(mesh.vertices.iter().all(|v| (v.x - 10.0).abs() <= 1.0 + 1e-9));
    }

    #[test]
    fn test_invalid_components() {
        let contents = r#"{"components": [{"scale": [1, 1, 0], "rotation": [[1,0,0],[0,1,0],[0,0,1]],
            "position": [0, 0, 0], "epsilon1": 1, "epsilon2": 1}]}"#;
        let abstraction = Abstraction::from_json(contents).unwrap();
        assert_eq!(
            abstraction.meshes(10).unwrap_err(),
            ShapeError::NonPositiveScale { axis: 2, value: 0.0 }
        );

        assert!(matches!(
            Abstraction::from_json(r#"{"components": [{"scale": [1, 1]}]}"#),
            Err(LoadError::Json(_))
        ));
        assert!(matches!(
            Abstraction::from_file("tests/missing.json"),
            Err(LoadError::Io(_))
        ));
    }
}
