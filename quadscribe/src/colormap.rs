// viridis sampled at nine evenly spaced stops
const VIRIDIS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [71, 44, 122],
    [59, 82, 139],
    [44, 114, 142],
    [33, 145, 140],
    [40, 174, 128],
    [94, 201, 98],
    [173, 220, 48],
    [253, 231, 37],
];

/// Map `t` in `[0, 1]` onto the viridis colour map. Values outside are clamped.
pub fn viridis(t: f64) -> [u8; 3] {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - lower as f64;
    let (a, b) = (VIRIDIS[lower], VIRIDIS[lower + 1]);
    let mut out = [0u8; 3];
    for i in 0..3 {
        let v = f64::from(a[i]) + (f64::from(b[i]) - f64::from(a[i])) * frac;
        out[i] = v.round() as u8;
    }
    out
}

/// Position of `value` within `[min, max]`, 0.5 for an empty range.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        (value - min) / (max - min)
    } else {
        0.5
    }
}

pub fn css(rgb: [u8; 3]) -> String {
    format!("rgb({},{},{})", rgb[0], rgb[1], rgb[2])
}

/// Scale a colour towards black by `intensity` in `[0, 1]`.
pub fn shade(rgb: [u8; 3], intensity: f64) -> [u8; 3] {
    let k = intensity.clamp(0.0, 1.0);
    rgb.map(|c| (f64::from(c) * k).round() as u8)
}
