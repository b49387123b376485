use std::io;
use std::path::Path;

use quadscribe::scriber::{compose_side_by_side, Panel, RecordedPainter, RenderOptions, Scriber};
use quadscribe::{Abstraction, Camera, LoadError, PointCloud, ShapeError};
use thiserror::Error;
use tracing::info;

use crate::cli::RenderArgs;

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error("Failed to write {path}: {source}")]
    Save { path: String, source: io::Error },
    #[error("Failed to list {path}: {source}")]
    List { path: String, source: io::Error },
}

pub fn save(path: &Path, document: &svg::Document) -> Result<(), RunError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| RunError::Save {
            path: parent.display().to_string(),
            source,
        })?;
    }
    svg::save(path, document).map_err(|source| RunError::Save {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), "wrote image");
    Ok(())
}

fn cloud_scriber(render: &RenderArgs, options: RenderOptions) -> Scriber {
    let scriber = Scriber::new(options);
    if render.recorded_colors {
        scriber.with_painter(RecordedPainter)
    } else {
        scriber
    }
}

pub fn cloud_panel(
    path: &Path,
    camera: Camera,
    title: Option<String>,
    render: &RenderArgs,
) -> Result<Panel, RunError> {
    let cloud = PointCloud::from_file(path)?;
    Ok(cloud_scriber(render, render.options(camera, title)).scribe_cloud(&cloud))
}

pub fn primitive_panel(
    path: &Path,
    camera: Camera,
    title: Option<String>,
    render: &RenderArgs,
) -> Result<Panel, RunError> {
    let abstraction = Abstraction::from_file(path)?;
    Ok(Scriber::new(render.options(camera, title)).scribe_abstraction(&abstraction)?)
}

pub fn pointcloud(
    input: &Path,
    output: &Path,
    camera: Camera,
    title: Option<String>,
    render: &RenderArgs,
) -> Result<(), RunError> {
    let panel = cloud_panel(input, camera, title, render)?;
    save(output, &panel.document())
}

pub fn primitives(
    input: &Path,
    output: &Path,
    camera: Camera,
    title: Option<String>,
    render: &RenderArgs,
) -> Result<(), RunError> {
    let panel = primitive_panel(input, camera, title, render)?;
    save(output, &panel.document())
}

/// Point cloud on the left, primitives on the right.
pub fn compare(
    cloud: &Path,
    abstraction: &Path,
    output: &Path,
    cloud_view: Camera,
    primitive_view: Camera,
    render: &RenderArgs,
) -> Result<(), RunError> {
    let left = cloud_panel(cloud, cloud_view, Some("Input Point Cloud".to_string()), render)?;
    let right = primitive_panel(abstraction, primitive_view, None, render)?;
    save(output, &compose_side_by_side(&[left, right]))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;

    use super::*;
    use crate::cli::{Args, Command};

    fn render_args(extra: &[&str]) -> RenderArgs {
        let mut argv = vec!["quadcli", "pointcloud", "-i", "in.ply", "-o", "out.svg"];
        argv.extend_from_slice(extra);
        match Args::try_parse_from(argv).expect("valid arguments").command {
            Command::Pointcloud { render, .. } => render,
            _ => panic!("Expected the pointcloud command"),
        }
    }

    #[test]
    fn test_compare_writes_combined_image() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nested/comparison.svg");
        let render = render_args(&["--resolution", "6", "--size", "300x200"]);

        compare(
            Path::new("../quadscribe/tests/segments.ply"),
            Path::new("../quadscribe/tests/chair.json"),
            &output,
            Camera::new(-90.0, 90.0),
            Camera::default(),
            &render,
        )
        .unwrap();

        let svg = fs::read_to_string(output).unwrap();
        assert!(svg.contains("width=\"600\""));
        assert_eq!(svg.matches("<circle").count(), 4);
        assert!(svg.contains("<polygon"));
    }

    #[test]
    fn test_recorded_colors_flag() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("cloud.svg");
        let render = render_args(&["--recorded-colors"]);
        pointcloud(
            Path::new("../quadscribe/tests/segments.ply"),
            &output,
            Camera::default(),
            None,
            &render,
        )
        .unwrap();
        let svg = fs::read_to_string(output).unwrap();
        assert_eq!(svg.matches("rgb(0,0,255)").count(), 2);
    }

    #[test]
    fn test_load_errors_surface() {
        let dir = tempfile::tempdir().unwrap();
        let render = render_args(&["--resolution", "1"]);
        let err = primitives(
            Path::new("../quadscribe/tests/chair.json"),
            &dir.path().join("out.svg"),
            Camera::default(),
            None,
            &render,
        )
        .unwrap_err();
        assert!(matches!(err, RunError::Shape(ShapeError::InvalidResolution(1))));

        let err = pointcloud(
            Path::new("../quadscribe/tests/flat.npy"),
            &dir.path().join("out.svg"),
            Camera::default(),
            None,
            &render,
        )
        .unwrap_err();
        assert!(matches!(err, RunError::Load(LoadError::NotEnoughColumns(_))));
        assert!(!dir.path().join("out.svg").exists());
    }
}
