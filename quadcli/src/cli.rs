use std::num::ParseIntError;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use quadscribe::scriber::RenderOptions;
use quadscribe::superquadric::DEFAULT_RESOLUTION;
use quadscribe::Camera;
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CliError {
    #[error("Invalid int specification for size")]
    InvalidSizeInt(ParseIntError),
    #[error("Invalid size specification, please use the format: width[xheight]")]
    InvalidSize,
    #[error("Invalid view specification, please use the format: elevation,azimuth (degrees)")]
    InvalidView,
    #[error("Invalid color channel, expected 0-255")]
    InvalidColorInt(ParseIntError),
    #[error("Invalid color specification, please use the format: r,g,b")]
    InvalidColor,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
/// A command line utility that renders point clouds and the superquadric
/// abstractions fitted to them as .svg images, alone or side by side
pub struct Args {
    /// Log meshing and rendering details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render a point cloud (.npy, .ply, .csv or .obj)
    Pointcloud {
        /// Input point file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file. Expects a .svg file
        #[arg(short, long)]
        output: PathBuf,

        /// Camera placement: elevation,azimuth in degrees
        #[arg(long, value_parser = parse_view, default_value = "20,30", allow_hyphen_values = true)]
        view: Camera,

        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        render: RenderArgs,
    },
    /// Render the superquadrics of an abstraction .json file
    Primitives {
        /// Input file. Expects a .json file with a `components` list
        #[arg(short, long)]
        input: PathBuf,

        /// Output file. Expects a .svg file
        #[arg(short, long)]
        output: PathBuf,

        /// Camera placement: elevation,azimuth in degrees
        #[arg(long, value_parser = parse_view, default_value = "20,30", allow_hyphen_values = true)]
        view: Camera,

        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        render: RenderArgs,
    },
    /// Render a point cloud and its abstraction next to each other
    Compare {
        /// Input point file
        #[arg(long)]
        cloud: PathBuf,

        /// Abstraction .json file
        #[arg(long)]
        primitives: PathBuf,

        /// Output file. Expects a .svg file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        views: ViewArgs,

        #[command(flatten)]
        render: RenderArgs,
    },
    /// Compare a random sample of objects of one category
    Batch(BatchArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct BatchArgs {
    /// Object category, used as a sub-directory of every root
    #[arg(long, value_enum)]
    pub class: ObjectClass,

    /// Root holding <class>/<id>.npy point clouds
    #[arg(long)]
    pub clouds: PathBuf,

    /// Root holding <class>/<id>.json abstractions
    #[arg(long)]
    pub abstractions: PathBuf,

    /// Root receiving <class>/input{i}.svg, cuboids{i}.svg and combined/combined{i}.svg
    #[arg(long)]
    pub results: PathBuf,

    /// Number of objects to sample
    #[arg(long, default_value_t = 10)]
    pub count: usize,

    /// Seed for the object sample. Random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Point cloud camera: elevation,azimuth in degrees. Dataset clouds are y-up.
    #[arg(long, value_parser = parse_view, default_value = "-90,90", allow_hyphen_values = true)]
    pub cloud_view: Camera,

    /// Primitive camera: elevation,azimuth in degrees
    #[arg(long, value_parser = parse_view, default_value = "20,30", allow_hyphen_values = true)]
    pub primitive_view: Camera,

    #[command(flatten)]
    pub render: RenderArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ViewArgs {
    /// Point cloud camera: elevation,azimuth in degrees
    #[arg(long, value_parser = parse_view, default_value = "20,30", allow_hyphen_values = true)]
    pub cloud_view: Camera,

    /// Primitive camera: elevation,azimuth in degrees
    #[arg(long, value_parser = parse_view, default_value = "20,30", allow_hyphen_values = true)]
    pub primitive_view: Camera,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Size of each image in pixels. Takes the format: width[xheight]
    #[arg(short, long, value_parser = parse_size, default_value = "550")]
    pub size: CanvasSize,

    /// Samples per angular axis when meshing superquadrics
    #[arg(long, default_value_t = DEFAULT_RESOLUTION)]
    pub resolution: usize,

    /// Primitive colour. Takes the format: r,g,b
    #[arg(long, value_parser = parse_color, default_value = "0,255,0")]
    pub color: Rgb,

    /// Paint points with the colours stored in the point file
    #[arg(long)]
    pub recorded_colors: bool,
}

impl RenderArgs {
    pub fn options(&self, camera: Camera, title: Option<String>) -> RenderOptions {
        RenderOptions {
            width: self.size.width,
            height: self.size.height,
            camera,
            base_color: self.color.0,
            resolution: self.resolution,
            title,
            ..RenderOptions::default()
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectClass {
    Chair,
    Table,
    Airplane,
}

impl ObjectClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectClass::Chair => "chair",
            ObjectClass::Table => "table",
            ObjectClass::Airplane => "airplane",
        }
    }
}

/// Represents a size in pixels
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub [u8; 3]);

fn parse_size(arg: &str) -> Result<CanvasSize, CliError> {
    let re = Regex::new(r"^(\d+)(?:x(\d+))?$").expect("valid size regex");
    let cap = re.captures(arg).ok_or(CliError::InvalidSize)?;
    let width = cap[1].parse::<u32>().map_err(CliError::InvalidSizeInt)?;
    let height = match cap.get(2) {
        Some(h) => h.as_str().parse::<u32>().map_err(CliError::InvalidSizeInt)?,
        None => width,
    };
    if width == 0 || height == 0 {
        return Err(CliError::InvalidSize);
    }
    Ok(CanvasSize { width, height })
}

fn parse_view(arg: &str) -> Result<Camera, CliError> {
    let re = Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*$").expect("valid view regex");
    let cap = re.captures(arg).ok_or(CliError::InvalidView)?;
    let elevation = cap[1].parse::<f64>().map_err(|_| CliError::InvalidView)?;
    let azimuth = cap[2].parse::<f64>().map_err(|_| CliError::InvalidView)?;
    Ok(Camera::new(elevation, azimuth))
}

fn parse_color(arg: &str) -> Result<Rgb, CliError> {
    let re = Regex::new(r"^(\d+),(\d+),(\d+)$").expect("valid color regex");
    let cap = re.captures(arg).ok_or(CliError::InvalidColor)?;
    let mut rgb = [0u8; 3];
    for (channel, value) in rgb.iter_mut().enumerate() {
        *value = cap[channel + 1]
            .parse::<u8>()
            .map_err(CliError::InvalidColorInt)?;
    }
    Ok(Rgb(rgb))
}
