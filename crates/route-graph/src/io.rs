//! Loading roads from GeoJSONL maps, with an optional binary cache.
//!
//! # Map format
//!
//! Input is newline-delimited GeoJSON (GeoJSONL): one `Feature` per line,
//! `geometry.coordinates` holding a `LineString`/`MultiLineString`/
//! `Polygon`/`MultiPolygon`, and OSM tags under `properties`. Parsing a line
//! is in scope as part of building a [`Road`]; the wire-level regex/string
//! scanning the reference implementation hand-rolls is replaced here with
//! `serde_json`, which every GeoJSON-touching crate in this workspace's
//! lineage already uses.
//!
//! # Cache format
//!
//! `u64` road count, followed by each [`Road`] in [`Road::write`] layout.
//! Stored alongside the source file as `<path>.cache.bin`.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;

use route_core::{HighwayKind, Point, Road, RoadId};

use crate::error::{GraphError, GraphResult};

/// Parse one GeoJSONL line into a [`Road`].
///
/// `fallback_id` is used as the road's [`RoadId`] only when `properties.id`
/// is absent or doesn't parse as an integer (string or number, matching the
/// reference implementation's id regex) — otherwise the parsed tag wins.
/// Note that this id is purely informational: [`crate::builder::GraphBuilder`]
/// tracks each road's position in its own arena separately, so a sparse or
/// out-of-order id here doesn't affect graph construction.
pub fn parse_geojson_line(line: &str, fallback_id: RoadId) -> GraphResult<Road> {
    let value: Value = serde_json::from_str(line).map_err(|e| {
        GraphError::Parse(route_core::CoreError::InvalidFormat {
            fragment: e.to_string(),
        })
    })?;

    let geometry = value
        .get("geometry")
        .ok_or_else(|| invalid(line, "missing geometry"))?;
    let geom_type = geometry.get("type").and_then(Value::as_str).unwrap_or("");
    let coordinates = geometry
        .get("coordinates")
        .ok_or_else(|| invalid(line, "missing geometry.coordinates"))?;

    let points = find_coordinate_ring(coordinates).ok_or_else(|| invalid(line, "no coordinate ring found"))?;

    let properties = value.get("properties");
    let tag = |key: &str| -> &str {
        properties
            .and_then(|p| p.get(key))
            .and_then(Value::as_str)
            .unwrap_or("")
    };
    let tag_yes = |key: &str| -> bool { tag(key) == "yes" };

    let id = parse_id_property(properties).unwrap_or(fallback_id);
    let highway = HighwayKind::from_osm_tag(tag("highway"));
    let junction_roundabout = tag("junction") == "roundabout" || geom_type == "MultiPolygon";

    Ok(Road {
        id,
        points,
        highway,
        name: tag("name").to_string(),
        reference: tag("ref").to_string(),
        roundabout: junction_roundabout,
        oneway: tag_yes("oneway"),
        bridge: tag_yes("bridge"),
        maxspeed: tag("maxspeed").parse().unwrap_or(-1),
        lanes: tag("lanes").parse().unwrap_or(1),
        toll: tag_yes("toll"),
        lit: tag_yes("lit"),
    })
}

/// Reads `properties.id`, accepted as a JSON number or a numeric string (the
/// reference implementation extracts it from a quoted or bare integer via
/// regex, so both spellings show up in real maps).
fn parse_id_property(properties: Option<&Value>) -> Option<RoadId> {
    let id = properties?.get("id")?;
    if let Some(n) = id.as_u64() {
        return u32::try_from(n).ok().map(RoadId);
    }
    id.as_str()?.trim().parse().ok().map(RoadId)
}

fn invalid(line: &str, why: &str) -> GraphError {
    let snippet: String = line.chars().take(80).collect();
    GraphError::Parse(route_core::CoreError::InvalidFormat {
        fragment: format!("{why}: {snippet}"),
    })
}

/// Finds the first nested array whose elements are themselves `[lon, lat]`
/// pairs, descending through `LineString`/`MultiLineString`/`Polygon`/
/// `MultiPolygon` wrapping levels uniformly.
fn find_coordinate_ring(v: &Value) -> Option<Vec<Point>> {
    let arr = v.as_array()?;

    if let Some(first) = arr.first() {
        if is_coord_pair(first) {
            return arr.iter().map(coord_pair_to_point).collect();
        }
    }

    for item in arr {
        if let Some(found) = find_coordinate_ring(item) {
            return Some(found);
        }
    }

    None
}

fn is_coord_pair(v: &Value) -> bool {
    v.as_array()
        .map(|a| a.len() == 2 && a[0].is_number() && a[1].is_number())
        .unwrap_or(false)
}

fn coord_pair_to_point(v: &Value) -> Option<Point> {
    let pair = v.as_array()?;
    let lon = pair[0].as_f64()? as f32;
    let lat = pair[1].as_f64()? as f32;
    Some(Point::new(lon, lat))
}

/// Write the binary cache: `u64` road count, then each road via
/// [`Road::write`].
pub fn write_cache<W: Write>(w: &mut W, roads: &[Road]) -> GraphResult<()> {
    w.write_all(&(roads.len() as u64).to_le_bytes())?;
    for road in roads {
        road.write(w)?;
    }
    Ok(())
}

/// Read the binary cache produced by [`write_cache`].
pub fn read_cache<R: Read>(r: &mut R) -> GraphResult<Vec<Road>> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    let count = u64::from_le_bytes(buf);

    let mut roads = Vec::with_capacity(count as usize);
    for _ in 0..count {
        roads.push(Road::read(r)?);
    }
    Ok(roads)
}

fn cache_path_for(map_path: &Path) -> PathBuf {
    let mut s = map_path.as_os_str().to_os_string();
    s.push(".cache.bin");
    PathBuf::from(s)
}

fn parse_geojsonl_file(path: &Path) -> GraphResult<Vec<Road>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut roads = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let fallback_id = RoadId(roads.len() as u32);
        roads.push(parse_geojson_line(&line, fallback_id)?);

        if roads.len() % 1000 == 0 {
            println!("read {:>6} records", roads.len());
        }
    }
    Ok(roads)
}

/// Load roads from `path`, a GeoJSONL map file.
///
/// When `use_cache` is `true`: reuse `<path>.cache.bin` if it already
/// exists, otherwise parse the source file and write the cache for next
/// time. When `false`: always parse, never touch the cache file.
pub fn load_roads(path: &Path, use_cache: bool) -> GraphResult<Vec<Road>> {
    let cache_path = cache_path_for(path);

    if use_cache && cache_path.exists() {
        let mut file = File::open(&cache_path)?;
        return read_cache(&mut file);
    }

    let roads = parse_geojsonl_file(path)?;

    if use_cache {
        let mut file = File::create(&cache_path)?;
        write_cache(&mut file, &roads)?;
    }

    Ok(roads)
}
