use svg::node::element::{Rectangle, SVG};
use svg::Document;

/// A rendered image: a nested `<svg>` with its own viewBox and pixel size.
#[derive(Debug, Clone)]
pub struct Panel {
    pub width: u32,
    pub height: u32,
    pub content: SVG,
}

impl Panel {
    /// Standalone document for this panel alone.
    pub fn document(&self) -> Document {
        Document::new()
            .set("width", self.width)
            .set("height", self.height)
            .set("viewBox", (0, 0, self.width, self.height))
            .add(self.placed(0))
    }

    fn placed(&self, x: u32) -> SVG {
        self.content.clone().set("x", x).set("y", 0)
    }
}

/// Lay panels out left to right on a white canvas as wide as all of them
/// together and as tall as the tallest.
pub fn compose_side_by_side(panels: &[Panel]) -> Document {
    let width: u32 = panels.iter().map(|p| p.width).sum();
    let height = panels.iter().map(|p| p.height).max().unwrap_or(0);

    let canvas = Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", (0, 0, width, height))
        .add(
            Rectangle::new()
                .set("width", width)
                .set("height", height)
                .set("fill", "white"),
        );

    panels
        .iter()
        .scan(0u32, |offset, panel| {
            let x = *offset;
            *offset += panel.width;
            Some(panel.placed(x))
        })
        .fold(canvas, |doc, view| doc.add(view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointcloud::PointCloud;
    use crate::scriber::{RenderOptions, Scriber};

    fn panel(width: u32, height: u32) -> Panel {
        let options = RenderOptions {
            width,
            height,
            ..RenderOptions::default()
        };
        let cloud = PointCloud::from_file("tests/square.csv").unwrap();
        Scriber::new(options).scribe_cloud(&cloud)
    }

    #[test]
    fn test_side_by_side_size() {
        let combined = compose_side_by_side(&[panel(1000, 1000), panel(550, 550)]).to_string();
        assert!(combined.contains("width=\"1550\""));
        assert!(combined.contains("height=\"1000\""));
        assert!(combined.contains("x=\"1000\""));
        assert_eq!(combined.matches("<circle").count(), 8);
    }

    #[test]
    fn test_nothing_to_compose() {
        let combined = compose_side_by_side(&[]).to_string();
        assert!(combined.contains("width=\"0\""));
        assert_eq!(combined.matches("<svg").count(), 1);
    }
}
