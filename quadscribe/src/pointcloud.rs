use std::fs::{self, File};
use std::path::Path;

use glam::DVec3;
use npyz::{NpyFile, Order};
use obj::Obj;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};
use tracing::info;

use crate::error::LoadError;

/// Points sampled from an object surface, optionally with per-point colours.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    pub points: Vec<DVec3>,
    pub colors: Option<Vec<[u8; 3]>>,
}

impl PointCloud {
    pub fn new(points: Vec<DVec3>) -> Self {
        Self {
            points,
            colors: None,
        }
    }

    /// Load a cloud, choosing the reader from the file extension
    /// (`npy`, `ply`, `csv` or `obj`).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let cloud = match extension.as_deref() {
            Some("npy") => read_npy(path)?,
            Some("ply") => read_ply(path)?,
            Some("csv") => read_csv(path)?,
            Some("obj") => read_obj(path)?,
            _ => return Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        };
        info!(path = %path.display(), points = cloud.len(), "loaded point cloud");
        Ok(cloud)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Axis-aligned (min, max) corners, `None` for an empty cloud.
    pub fn bounds(&self) -> Option<(DVec3, DVec3)> {
        let first = *self.points.first()?;
        Some(
            self.points
                .iter()
                .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
        )
    }
}

// Two-dimensional float arrays, one point per row. Extra columns (normals)
// are ignored.
fn read_npy(path: &Path) -> Result<PointCloud, LoadError> {
    let bytes = fs::read(path)?;
    let npy = NpyFile::new(&bytes[..])?;
    let column_major = matches!(npy.order(), Order::Fortran);
    let shape = npy.shape().to_vec();
    let (rows, cols) = match shape.as_slice() {
        [rows, cols] if *cols >= 3 => (*rows as usize, *cols as usize),
        _ => return Err(LoadError::NotEnoughColumns(shape)),
    };

    let values: Vec<f64> = match npy.into_vec::<f64>() {
        Ok(values) => values,
        // single precision arrays are common, anything else is an error
        Err(_) => NpyFile::new(&bytes[..])?
            .into_vec::<f32>()?
            .into_iter()
            .map(f64::from)
            .collect(),
    };

    let at = |r: usize, c: usize| {
        if column_major {
            values[c * rows + r]
        } else {
            values[r * cols + c]
        }
    };
    let points = (0..rows)
        .map(|r| DVec3::new(at(r, 0), at(r, 1), at(r, 2)))
        .collect();
    Ok(PointCloud::new(points))
}

fn ply_scalar(property: Option<&Property>) -> Option<f64> {
    match property? {
        Property::Float(v) => Some(f64::from(*v)),
        Property::Double(v) => Some(*v),
        Property::Char(v) => Some(f64::from(*v)),
        Property::UChar(v) => Some(f64::from(*v)),
        Property::Short(v) => Some(f64::from(*v)),
        Property::UShort(v) => Some(f64::from(*v)),
        Property::Int(v) => Some(f64::from(*v)),
        Property::UInt(v) => Some(f64::from(*v)),
        _ => None,
    }
}

fn ply_channel(property: Option<&Property>) -> Option<u8> {
    match property? {
        Property::UChar(v) => Some(*v),
        // float colours in [0, 1]
        Property::Float(v) => Some((v.clamp(0.0, 1.0) * 255.0).round() as u8),
        Property::Double(v) => Some((v.clamp(0.0, 1.0) * 255.0).round() as u8),
        _ => None,
    }
}

fn read_ply(path: &Path) -> Result<PointCloud, LoadError> {
    let mut file = File::open(path)?;
    let ply = Parser::<DefaultElement>::new().read_ply(&mut file)?;
    let vertices = ply.payload.get("vertex").ok_or(LoadError::Missing("vertex"))?;

    let mut points = Vec::with_capacity(vertices.len());
    let mut colors = Vec::with_capacity(vertices.len());
    for (row, vertex) in vertices.iter().enumerate() {
        let coord = |name: &str| {
            ply_scalar(vertex.get(name)).ok_or_else(|| LoadError::Malformed {
                row,
                reason: format!("vertex has no numeric `{name}` property"),
            })
        };
        points.push(DVec3::new(coord("x")?, coord("y")?, coord("z")?));

        let rgb = (
            ply_channel(vertex.get("red")),
            ply_channel(vertex.get("green")),
            ply_channel(vertex.get("blue")),
        );
        if let (Some(r), Some(g), Some(b)) = rgb {
            colors.push([r, g, b]);
        }
    }

    let colors = (!colors.is_empty() && colors.len() == points.len()).then_some(colors);
    Ok(PointCloud { points, colors })
}

fn read_csv(path: &Path) -> Result<PointCloud, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut points = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() < 3 {
            return Err(LoadError::Malformed {
                row,
                reason: format!("expected at least 3 fields, got {}", record.len()),
            });
        }
        let coords: Result<Vec<f64>, _> = record
            .iter()
            .take(3)
            .map(|field| field.trim().parse::<f64>())
            .collect();
        match coords {
            Ok(c) => points.push(DVec3::new(c[0], c[1], c[2])),
            // a leading non-numeric row is a header
            Err(_) if row == 0 => continue,
            Err(e) => {
                return Err(LoadError::Malformed {
                    row,
                    reason: e.to_string(),
                })
            }
        }
    }
    Ok(PointCloud::new(points))
}

fn read_obj(path: &Path) -> Result<PointCloud, LoadError> {
    let model = Obj::load(path)?;
    let points = model
        .data
        .position
        .iter()
        .map(|p| DVec3::new(p[0].into(), p[1].into(), p[2].into()))
        .collect();
    Ok(PointCloud::new(points))
}
