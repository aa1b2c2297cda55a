//! The OSM road model: [`HighwayKind`] and [`Road`].
//!
//! For more information on individual tags, see
//! <https://wiki.openstreetmap.org/wiki/Key:highway>.

use std::io::{Read, Write};

use crate::error::CoreResult;
use crate::geo::Point;
use crate::ids::RoadId;

/// Closed set of OSM `highway=*` values this planner understands. Anything
/// else (or a missing tag) becomes `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum HighwayKind {
    Unknown = 0,

    // Major roads
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Unclassified,
    Residential,
    Service,
    LivingStreet,
    Road,

    // Link roads
    MotorwayLink,
    TrunkLink,
    PrimaryLink,
    SecondaryLink,
    TertiaryLink,

    // Non-motorized paths
    Pedestrian,
    Footway,
    Cycleway,
    Path,
    Bridleway,
    Steps,

    // Other
    Track,
    Busway,
    Escape,
    Raceway,

    // Construction and planning
    Construction,
    Proposed,
}

impl HighwayKind {
    /// Matches an OSM `highway` tag value. Returns `Unknown` for anything
    /// unrecognised rather than failing — an unrecognised highway tag is not
    /// a parse error, just a road we can't classify.
    pub fn from_osm_tag(tag: &str) -> HighwayKind {
        match tag {
            "motorway" => HighwayKind::Motorway,
            "trunk" => HighwayKind::Trunk,
            "primary" => HighwayKind::Primary,
            "secondary" => HighwayKind::Secondary,
            "tertiary" => HighwayKind::Tertiary,
            "unclassified" => HighwayKind::Unclassified,
            "residential" => HighwayKind::Residential,
            "service" => HighwayKind::Service,
            "living_street" => HighwayKind::LivingStreet,
            "road" => HighwayKind::Road,

            "motorway_link" => HighwayKind::MotorwayLink,
            "trunk_link" => HighwayKind::TrunkLink,
            "primary_link" => HighwayKind::PrimaryLink,
            "secondary_link" => HighwayKind::SecondaryLink,
            "tertiary_link" => HighwayKind::TertiaryLink,

            "pedestrian" => HighwayKind::Pedestrian,
            "footway" => HighwayKind::Footway,
            "cycleway" => HighwayKind::Cycleway,
            "path" => HighwayKind::Path,
            "bridleway" => HighwayKind::Bridleway,
            "steps" => HighwayKind::Steps,

            "track" => HighwayKind::Track,
            "busway" => HighwayKind::Busway,
            "escape" => HighwayKind::Escape,
            "raceway" => HighwayKind::Raceway,

            "construction" => HighwayKind::Construction,
            "proposed" => HighwayKind::Proposed,

            _ => HighwayKind::Unknown,
        }
    }

    fn from_u32(n: u32) -> HighwayKind {
        // Safety net for corrupt cache files: fall back to Unknown rather
        // than transmuting garbage into an enum discriminant.
        const VARIANTS: [HighwayKind; 28] = [
            HighwayKind::Unknown,
            HighwayKind::Motorway,
            HighwayKind::Trunk,
            HighwayKind::Primary,
            HighwayKind::Secondary,
            HighwayKind::Tertiary,
            HighwayKind::Unclassified,
            HighwayKind::Residential,
            HighwayKind::Service,
            HighwayKind::LivingStreet,
            HighwayKind::Road,
            HighwayKind::MotorwayLink,
            HighwayKind::TrunkLink,
            HighwayKind::PrimaryLink,
            HighwayKind::SecondaryLink,
            HighwayKind::TertiaryLink,
            HighwayKind::Pedestrian,
            HighwayKind::Footway,
            HighwayKind::Cycleway,
            HighwayKind::Path,
            HighwayKind::Bridleway,
            HighwayKind::Steps,
            HighwayKind::Track,
            HighwayKind::Busway,
            HighwayKind::Escape,
            HighwayKind::Raceway,
            HighwayKind::Construction,
            HighwayKind::Proposed,
        ];
        VARIANTS.get(n as usize).copied().unwrap_or(HighwayKind::Unknown)
    }
}

/// A single OSM way, as read from a GeoJSONL map file (or the binary cache).
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    pub id: RoadId,
    pub points: Vec<Point>,

    pub highway: HighwayKind,
    pub name: String,
    pub reference: String,

    /// First and last point should be treated as connected. Roundabouts are
    /// implicitly one-way.
    pub roundabout: bool,
    /// The coordinate array determines the direction of travel.
    pub oneway: bool,
    /// An overpass; should not be merged with intersecting points at grade.
    pub bridge: bool,

    /// `-1` means no known speed limit.
    pub maxspeed: i32,
    pub lanes: i32,
    pub toll: bool,
    pub lit: bool,
}

impl Road {
    /// `name` if set, else `reference`, else a generic placeholder.
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.reference.is_empty() {
            &self.reference
        } else {
            "unknown road"
        }
    }

    /// Preferability of this road: higher-class roads get a higher rating.
    /// Scales exponentially from footpaths (1) to motorways (64); anything
    /// not in the known highway set rates far below even footpaths (0.01) so
    /// it only gets used as a last resort.
    pub fn rating(&self) -> f32 {
        use HighwayKind::*;
        match self.highway {
            Motorway => 64.0,

            Primary | MotorwayLink => 32.0,

            Secondary | PrimaryLink => 16.0,

            Trunk | SecondaryLink => 8.0,

            Tertiary | TrunkLink => 4.0,

            // basic roads
            TertiaryLink | Unclassified | Residential | Service | LivingStreet | Road => 2.0,

            // non-motorized paths
            Pedestrian | Footway | Cycleway | Path => 1.0,

            _ => 0.01,
        }
    }

    /// Zoom visibility, derived from `rating()` and the road's capacity.
    pub fn visibility(&self) -> f32 {
        (self.maxspeed as f32 / 50.0 * self.lanes as f32).max(0.5) * self.rating()
    }

    /// Write this road in the fixed binary cache layout: `u32` id, `u64`
    /// point count, `[f32;2]` per point, `u32` highway discriminant, `u64`
    /// name length + bytes, `u64` reference length + bytes, `u8` each for
    /// roundabout/oneway/bridge, `i32` each for maxspeed/lanes, `u8` each for
    /// toll/lit.
    pub fn write<W: Write>(&self, w: &mut W) -> CoreResult<()> {
        w.write_all(&self.id.0.to_le_bytes())?;

        w.write_all(&(self.points.len() as u64).to_le_bytes())?;
        for p in &self.points {
            w.write_all(&p.to_bytes())?;
        }

        w.write_all(&(self.highway as u32).to_le_bytes())?;

        write_string(w, &self.name)?;
        write_string(w, &self.reference)?;

        w.write_all(&[self.roundabout as u8, self.oneway as u8, self.bridge as u8])?;
        w.write_all(&self.maxspeed.to_le_bytes())?;
        w.write_all(&self.lanes.to_le_bytes())?;
        w.write_all(&[self.toll as u8, self.lit as u8])?;

        Ok(())
    }

    /// Read a road back from the fixed binary cache layout, the inverse of
    /// [`write`](Self::write).
    pub fn read<R: Read>(r: &mut R) -> CoreResult<Road> {
        let id = RoadId(read_u32(r)?);

        let point_count = read_u64(r)?;
        let mut points = Vec::with_capacity(point_count as usize);
        for _ in 0..point_count {
            let mut buf = [0u8; 8];
            r.read_exact(&mut buf)?;
            points.push(Point::from_bytes(buf));
        }

        let highway = HighwayKind::from_u32(read_u32(r)?);
        let name = read_string(r)?;
        let reference = read_string(r)?;

        let mut flags = [0u8; 3];
        r.read_exact(&mut flags)?;
        let [roundabout, oneway, bridge] = flags;

        let maxspeed = read_i32(r)?;
        let lanes = read_i32(r)?;

        let mut tail = [0u8; 2];
        r.read_exact(&mut tail)?;
        let [toll, lit] = tail;

        Ok(Road {
            id,
            points,
            highway,
            name,
            reference,
            roundabout: roundabout != 0,
            oneway: oneway != 0,
            bridge: bridge != 0,
            maxspeed,
            lanes,
            toll: toll != 0,
            lit: lit != 0,
        })
    }
}

fn write_string<W: Write>(w: &mut W, s: &str) -> CoreResult<()> {
    w.write_all(&(s.len() as u64).to_le_bytes())?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

fn read_string<R: Read>(r: &mut R) -> CoreResult<String> {
    let len = read_u64(r)?;
    let mut buf = vec![0u8; len as usize];
    r.read_exact(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn read_u32<R: Read>(r: &mut R) -> CoreResult<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_i32<R: Read>(r: &mut R) -> CoreResult<i32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

fn read_u64<R: Read>(r: &mut R) -> CoreResult<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}
