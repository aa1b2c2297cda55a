//! Geospatial primitives: points, bounding boxes, distance functions.
//!
//! Coordinates are stored as `(lon, lat)` pairs of `f32`, matching the
//! precision GeoJSON sources actually carry. [`Point::haversine`] is the
//! real-world distance in metres; [`Point::distance`]/[`distance_sq`] are
//! cheap planar approximations meant only for heuristics, never for
//! user-facing distances.

use std::hash::{Hash, Hasher};

use crate::error::CoreError;

/// Earth's average meridional radius, in metres.
pub const EARTH_RADIUS_M: f32 = 6_367_449.0;

const PI: f32 = std::f32::consts::PI;

#[inline]
fn rad(deg: f32) -> f32 {
    deg * PI / 180.0
}

#[inline]
fn pow2(x: f32) -> f32 {
    x * x
}

/// A geospatial point, `(lon, lat)`.
///
/// `lon` must lie in `-180..=180`, `lat` in `-90..=90`. Construction does not
/// enforce this — callers that parse untrusted input should validate
/// separately; every in-tree producer (GeoJSON parsing, DMS parsing) already
/// yields values in range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub lon: f32,
    pub lat: f32,
}

impl Point {
    pub fn new(lon: f32, lat: f32) -> Self {
        Self { lon, lat }
    }

    pub const ORIGIN: Point = Point { lon: 0.0, lat: 0.0 };

    /// Quantised hash at 1e-8 degree precision, so that two points that
    /// differ only in float rounding noise still hash identically.
    pub fn quantized_hash(&self) -> u64 {
        const PRECISION: f64 = 1e8;

        let h1 = (self.lon as f64 * PRECISION).round() as i64;
        let h2 = (self.lat as f64 * PRECISION).round() as i64;

        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        h1.hash(&mut hasher);
        let hash1 = hasher.finish();

        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        h2.hash(&mut hasher);
        let hash2 = hasher.finish();

        hash1 ^ (hash2 << 1)
    }

    /// *Squared* planar distance between two points. Heuristic use only.
    pub fn distance_sq(p1: Point, p2: Point) -> f32 {
        pow2(p1.lon - p2.lon) + pow2(p1.lat - p2.lat)
    }

    /// Planar distance between two points. Heuristic use only.
    pub fn distance(p1: Point, p2: Point) -> f32 {
        Self::distance_sq(p1, p2).sqrt()
    }

    /// Real-world distance in metres, via the haversine formula.
    ///
    /// Source: <https://en.wikipedia.org/wiki/Haversine_formula#Formulation>
    pub fn haversine(p1: Point, p2: Point) -> f32 {
        let x1 = rad(p1.lat);
        let y1 = rad(p1.lon);
        let x2 = rad(p2.lat);
        let y2 = rad(p2.lon);

        let h = pow2(((x2 - x1) / 2.0).sin()) + x1.cos() * x2.cos() * pow2(((y2 - y1) / 2.0).sin());

        2.0 * EARTH_RADIUS_M * h.sqrt().asin()
    }

    /// `true` if `p1` and `p2` are within `distance_m` metres of each other.
    ///
    /// Computed directly from the haversine central angle rather than calling
    /// [`haversine`](Self::haversine) and comparing, so the comparison stays
    /// monotone even right at the limit.
    pub fn within(p1: Point, p2: Point, distance_m: f32) -> bool {
        let h_limit = pow2((distance_m / (2.0 * EARTH_RADIUS_M)).sin());

        let x1 = rad(p1.lat);
        let y1 = rad(p1.lon);
        let x2 = rad(p2.lat);
        let y2 = rad(p2.lon);

        let h = pow2(((x2 - x1) / 2.0).sin()) + x1.cos() * x2.cos() * pow2(((y2 - y1) / 2.0).sin());

        h <= h_limit
    }

    /// Parse a point from either decimal (`"19.0527,47.4634"`) or DMS
    /// (`"47°27'00.0\"N 19°10'49.0\"E"`) notation.
    ///
    /// `lon_lat`: when `true`, the first decimal component (or first DMS
    /// pair) is interpreted as longitude. GeoJSON itself always uses
    /// `lon,lat` order; coordinates copied from a map UI are usually
    /// `lat,lon`, so callers reading user input should leave this `false`.
    pub fn parse(line: &str, lon_lat: bool) -> Result<Point, CoreError> {
        let line = line.trim();

        if let Some((a, b)) = parse_decimal_pair(line) {
            return Ok(if lon_lat {
                Point::new(b, a)
            } else {
                Point::new(a, b)
            });
        }

        if let Some((a, b)) = parse_dms_pair(line) {
            return Ok(if lon_lat {
                Point::new(b, a)
            } else {
                Point::new(a, b)
            });
        }

        Err(CoreError::InvalidFormat {
            fragment: line.to_string(),
        })
    }

    /// Encode as two little-endian `f32`s, `[lon, lat]` — the layout the
    /// on-disk road cache expects per coordinate.
    pub fn to_bytes(&self) -> [u8; 8] {
        let mut buf = [0u8; 8];
        buf[0..4].copy_from_slice(&self.lon.to_le_bytes());
        buf[4..8].copy_from_slice(&self.lat.to_le_bytes());
        buf
    }

    pub fn from_bytes(buf: [u8; 8]) -> Point {
        let lon = f32::from_le_bytes(buf[0..4].try_into().unwrap());
        let lat = f32::from_le_bytes(buf[4..8].try_into().unwrap());
        Point::new(lon, lat)
    }
}

impl Default for Point {
    fn default() -> Self {
        Point::ORIGIN
    }
}

fn parse_decimal_pair(line: &str) -> Option<(f32, f32)> {
    let (a, b) = line.split_once(',')?;
    let a: f32 = a.trim().parse().ok()?;
    let b: f32 = b.trim().parse().ok()?;
    Some((a, b))
}

/// Parses `DDD°MM'SS.S"H` followed by whitespace and a second such group.
fn parse_dms_pair(line: &str) -> Option<(f32, f32)> {
    let (first, second) = split_dms_halves(line)?;
    let a = parse_dms_component(first)?;
    let b = parse_dms_component(second)?;
    Some((a, b))
}

/// Splits on the boundary between the hemisphere letter of the first
/// component (`N`/`S`) and the start of the second.
fn split_dms_halves(line: &str) -> Option<(&str, &str)> {
    let hemi_idx = line.find(|c| c == 'N' || c == 'S')?;
    let (first, rest) = line.split_at(hemi_idx + 1);
    Some((first, rest.trim()))
}

fn parse_dms_component(s: &str) -> Option<f32> {
    let dir = s.chars().last()?;
    let body = &s[..s.len() - dir.len_utf8()];

    let deg_idx = body.find('°')?;
    let (deg_str, rest) = body.split_at(deg_idx);
    let rest = &rest['°'.len_utf8()..];

    let min_idx = rest.find('\'')?;
    let (min_str, rest) = rest.split_at(min_idx);
    let rest = &rest['\''.len_utf8()..];

    let sec_str = rest.trim_end_matches('"');

    let deg: f32 = deg_str.trim().parse().ok()?;
    let min: f32 = min_str.trim().parse().ok()?;
    let sec: f32 = sec_str.trim().parse().ok()?;

    let sign = if dir == 'S' || dir == 'W' { -1.0 } else { 1.0 };
    Some(sign * (deg + min / 60.0 + sec / 3600.0))
}

/// Axis-aligned bounding box, `(top-left, width, height)` in `(lon, lat)`
/// space — `w`/`h` may be negative while the box is being grown via
/// [`include`](Self::include).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl BBox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_points(p0: Point, p1: Point) -> Self {
        Self {
            x: p0.lon,
            y: p0.lat,
            w: p1.lon - p0.lon,
            h: p1.lat - p0.lat,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.x + self.w, self.y + self.h)
    }

    pub fn contains(&self, p: Point) -> bool {
        (self.x <= p.lon && p.lon <= self.x + self.w) && (self.y <= p.lat && p.lat <= self.y + self.h)
    }

    /// Approximate surface area enclosed by this box, in square metres.
    pub fn area(&self) -> f32 {
        pow2(EARTH_RADIUS_M)
            * (rad(self.y + self.h).sin() - rad(self.y).sin()).abs()
            * (rad(self.x + self.w) - rad(self.x)).abs()
    }

    /// Grow the box, if necessary, so `p` falls within its bounds.
    pub fn include(&mut self, p: Point) {
        if p.lon < self.x {
            self.x = p.lon;
        }
        if p.lon > self.x + self.w {
            self.w = p.lon - self.x;
        }
        if p.lat < self.y {
            self.y = p.lat;
        }
        if p.lat > self.y + self.h {
            self.h = p.lat - self.y;
        }
    }

    /// Smallest box enclosing every point in `points`.
    pub fn bounds(points: &[Point]) -> BBox {
        let mut bbox = BBox::max();
        for &p in points {
            bbox.include(p);
        }
        bbox
    }

    /// A degenerate box whose bounds are inverted, ready to be grown by
    /// repeated [`include`](Self::include) calls.
    pub fn max() -> BBox {
        BBox::new(f32::MAX, f32::MAX, f32::MIN, f32::MIN)
    }
}
