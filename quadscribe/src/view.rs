use glam::DVec3;

/// Orthographic view of a z-up scene, placed by elevation and azimuth in
/// degrees like a matplotlib 3D axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub elevation: f64,
    pub azimuth: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            elevation: 20.0,
            azimuth: 30.0,
        }
    }
}

/// A projected point. `x` points right, `y` points up and larger `depth` is
/// closer to the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

impl Camera {
    pub fn new(elevation: f64, azimuth: f64) -> Self {
        Self {
            elevation,
            azimuth,
        }
    }

    /// Unit vector from the scene towards the viewer.
    pub fn direction(&self) -> DVec3 {
        let (el, az) = (self.elevation.to_radians(), self.azimuth.to_radians());
        DVec3::new(el.cos() * az.cos(), el.cos() * az.sin(), el.sin())
    }

    fn right(&self) -> DVec3 {
        let az = self.azimuth.to_radians();
        DVec3::new(-az.sin(), az.cos(), 0.0)
    }

    fn up(&self) -> DVec3 {
        let (el, az) = (self.elevation.to_radians(), self.azimuth.to_radians());
        DVec3::new(-el.sin() * az.cos(), -el.sin() * az.sin(), el.cos())
    }

    pub fn project(&self, point: DVec3) -> ScreenPoint {
        ScreenPoint {
            x: point.dot(self.right()),
            y: point.dot(self.up()),
            depth: point.dot(self.direction()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_is_orthonormal() {
        for (el, az) in [(20.0, 30.0), (-90.0, 90.0), (180.0, 0.0), (45.0, -120.0)] {
            let camera = Camera::new(el, az);
            let (d, r, u) = (camera.direction(), camera.right(), camera.up());
            assert!(is_close!(d.length(), 1.0));
            assert!(is_close!(r.length(), 1.0));
            assert!(is_close!(u.length(), 1.0));
            assert!(is_close!(d.dot(r), 0.0, abs_tol = 1e-12));
            assert!(is_close!(d.dot(u), 0.0, abs_tol = 1e-12));
            // right-handed: right x up points at the viewer
            assert!(r.cross(u).abs_diff_eq(d, 1e-12));
        }
    }

    #[test]
    fn test_front_view() {
        // looking along -x from +x
        let camera = Camera::new(0.0, 0.0);
        let p = camera.project(DVec3::new(2.0, 3.0, 4.0));
        assert!(is_close!(p.x, 3.0));
        assert!(is_close!(p.y, 4.0));
        assert!(is_close!(p.depth, 2.0));
    }

    #[test]
    fn test_top_view_depth() {
        let camera = Camera::new(90.0, 0.0);
        let low = camera.project(DVec3::new(0.0, 0.0, -1.0));
        let high = camera.project(DVec3::new(0.0, 0.0, 1.0));
        assert!(high.depth > low.depth);
    }
}
