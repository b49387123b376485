mod compose;

pub use compose::{compose_side_by_side, Panel};

use svg::node::element::{Circle, Group, Polygon, Rectangle, Text, SVG};
use svg::node::Text as TextNode;
use tracing::debug;

use crate::colormap::{css, normalize, shade, viridis};
use crate::model::Abstraction;
use crate::pointcloud::PointCloud;
use crate::superquadric::{Mesh, ShapeError, DEFAULT_RESOLUTION};
use crate::view::{Camera, ScreenPoint};

type Num = f64;

/// Picks the fill colour of each scattered point.
pub trait PointPainter {
    fn color(&self, cloud: &PointCloud, index: usize, z_range: (Num, Num)) -> [u8; 3];
}

/// Colours points by world height through viridis.
pub struct DepthPainter;

impl PointPainter for DepthPainter {
    fn color(&self, cloud: &PointCloud, index: usize, z_range: (Num, Num)) -> [u8; 3] {
        viridis(normalize(cloud.points[index].z, z_range.0, z_range.1))
    }
}

/// Uses the colours stored with the cloud (segmentation output), falling
/// back to height colouring for clouds without them.
pub struct RecordedPainter;

impl PointPainter for RecordedPainter {
    fn color(&self, cloud: &PointCloud, index: usize, z_range: (Num, Num)) -> [u8; 3] {
        cloud
            .colors
            .as_ref()
            .and_then(|colors| colors.get(index).copied())
            .unwrap_or_else(|| DepthPainter.color(cloud, index, z_range))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Output size in pixels
    pub width: u32,
    pub height: u32,
    pub camera: Camera,
    /// Space around the drawing, as a fraction of its larger extent
    pub margin: Num,
    /// Scatter point radius, as a fraction of the drawing's larger extent
    pub point_radius: Num,
    /// Fill colour of primitives before shading
    pub base_color: [u8; 3],
    /// Samples per angular axis when meshing primitives
    pub resolution: usize,
    pub title: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 550,
            height: 550,
            camera: Camera::default(),
            margin: 0.05,
            point_radius: 0.004,
            base_color: [0, 255, 0],
            resolution: DEFAULT_RESOLUTION,
            title: None,
        }
    }
}

// screen-space extents, y already flipped to point down
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    x_min: Num,
    x_max: Num,
    y_min: Num,
    y_max: Num,
}

impl Bounds {
    fn of(points: impl IntoIterator<Item = (Num, Num)>) -> Option<Self> {
        points.into_iter().fold(None, |acc, (x, y)| {
            Some(match acc {
                None => Bounds {
                    x_min: x,
                    x_max: x,
                    y_min: y,
                    y_max: y,
                },
                Some(b) => Bounds {
                    x_min: b.x_min.min(x),
                    x_max: b.x_max.max(x),
                    y_min: b.y_min.min(y),
                    y_max: b.y_max.max(y),
                },
            })
        })
    }

    fn extent(&self) -> Num {
        let e = (self.x_max - self.x_min).max(self.y_max - self.y_min);
        if e > 0.0 {
            e
        } else {
            1.0
        }
    }
}

pub struct Scriber {
    options: RenderOptions,
    point_painter: Box<dyn PointPainter>,
}

impl Scriber {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            point_painter: Box::new(DepthPainter),
        }
    }

    pub fn with_painter(mut self, painter: impl PointPainter + 'static) -> Self {
        self.point_painter = Box::new(painter);
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /*
    Screen convention:
    - x points right
    - y points down (svg), so projected heights are negated
    - points and triangles are drawn far to near
    */
    pub fn scribe_cloud(&self, cloud: &PointCloud) -> Panel {
        let camera = &self.options.camera;
        let projected: Vec<ScreenPoint> = cloud.points.iter().map(|p| camera.project(*p)).collect();
        let bounds = Bounds::of(projected.iter().map(|s| (s.x, -s.y)));
        let extent = bounds.map_or(1.0, |b| b.extent());
        let radius = self.options.point_radius * extent;
        let z_range = cloud
            .bounds()
            .map_or((0.0, 0.0), |(lo, hi)| (lo.z, hi.z));

        let mut order: Vec<usize> = (0..projected.len()).collect();
        order.sort_by(|&a, &b| projected[a].depth.total_cmp(&projected[b].depth));

        let group = order.into_iter().fold(Group::new(), |group, i| {
            let s = projected[i];
            let color = self.point_painter.color(cloud, i, z_range);
            group.add(
                Circle::new()
                    .set("cx", s.x)
                    .set("cy", -s.y)
                    .set("r", radius)
                    .set("fill", css(color)),
            )
        });
        debug!(points = cloud.len(), "scribed point cloud");
        self.frame(bounds, group)
    }

    pub fn scribe_meshes(&self, meshes: &[Mesh]) -> Panel {
        let camera = &self.options.camera;
        let towards_viewer = camera.direction();

        let mut faces: Vec<([ScreenPoint; 3], [u8; 3])> = Vec::new();
        for mesh in meshes {
            for [a, b, c] in mesh.triangle_vertices() {
                let normal = (b - a).cross(c - a);
                // collapsed rows at the poles give zero-area triangles
                if normal.length_squared() <= Num::EPSILON * Num::EPSILON {
                    continue;
                }
                let lambert = normal.normalize().dot(towards_viewer).abs();
                let color = shade(self.options.base_color, 0.25 + 0.75 * lambert);
                faces.push(([a, b, c].map(|v| camera.project(v)), color));
            }
        }
        let mean_depth = |f: &[ScreenPoint; 3]| (f[0].depth + f[1].depth + f[2].depth) / 3.0;
        faces.sort_by(|a, b| mean_depth(&a.0).total_cmp(&mean_depth(&b.0)));

        let bounds = Bounds::of(
            faces
                .iter()
                .flat_map(|(tri, _)| tri.iter().map(|s| (s.x, -s.y))),
        );
        let seam = 0.001 * bounds.map_or(1.0, |b| b.extent());

        let face_count = faces.len();
        let group = faces.into_iter().fold(Group::new(), |group, (tri, color)| {
            let points = tri
                .iter()
                .map(|s| format!("{:.5},{:.5}", s.x, -s.y))
                .collect::<Vec<_>>()
                .join(" ");
            let fill = css(color);
            group.add(
                Polygon::new()
                    .set("points", points)
                    .set("fill", fill.clone())
                    .set("stroke", fill)
                    .set("stroke-width", seam)
                    .set("stroke-linejoin", "round"),
            )
        });
        debug!(meshes = meshes.len(), faces = face_count, "scribed meshes");
        self.frame(bounds, group)
    }

    pub fn scribe_abstraction(&self, abstraction: &Abstraction) -> Result<Panel, ShapeError> {
        let meshes = abstraction.meshes(self.options.resolution)?;
        Ok(self.scribe_meshes(&meshes))
    }

    // fit the viewBox around the drawing and add background and title
    fn frame(&self, bounds: Option<Bounds>, content: Group) -> Panel {
        let bounds = bounds.unwrap_or(Bounds {
            x_min: -0.5,
            x_max: 0.5,
            y_min: -0.5,
            y_max: 0.5,
        });
        let m = self.options.margin * bounds.extent();
        let font_size = 0.05 * bounds.extent();
        let title_band = if self.options.title.is_some() {
            2.0 * font_size
        } else {
            0.0
        };
        let (x, y) = (bounds.x_min - m, bounds.y_min - m - title_band);
        let (w, h) = (
            bounds.x_max - bounds.x_min + 2.0 * m,
            bounds.y_max - bounds.y_min + 2.0 * m + title_band,
        );

        let mut view = SVG::new()
            .set("width", self.options.width)
            .set("height", self.options.height)
            .set("viewBox", (x, y, w, h))
            .add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", y)
                    .set("width", w)
                    .set("height", h)
                    .set("fill", "white"),
            );
        if let Some(title) = &self.options.title {
            view = view.add(
                Text::new()
                    .set("x", x + w / 2.0)
                    .set("y", y + 1.5 * font_size)
                    .set("text-anchor", "middle")
                    .set("font-family", "sans-serif")
                    .set("font-size", font_size)
                    .add(TextNode::new(title.clone())),
            );
        }
        Panel {
            width: self.options.width,
            height: self.options.height,
            content: view.add(content),
        }
    }
}
