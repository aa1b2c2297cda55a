use crate::diagnostics::Counter;
use crate::geo::{BBox, Point};
use crate::ids::{RoadId, VertexId};
use crate::road::{HighwayKind, Road};

fn budapest() -> Point {
    Point::new(19.0402, 47.4979)
}

fn vienna() -> Point {
    Point::new(16.3738, 48.2082)
}

#[test]
fn haversine_budapest_vienna_is_roughly_correct() {
    // Straight-line distance is ~213 km; allow generous tolerance for the
    // f32 haversine implementation.
    let d = Point::haversine(budapest(), vienna());
    assert!((200_000.0..230_000.0).contains(&d), "got {d}");
}

#[test]
fn haversine_same_point_is_zero() {
    let p = budapest();
    assert_eq!(Point::haversine(p, p), 0.0);
}

#[test]
fn within_is_consistent_with_haversine() {
    let p1 = Point::new(19.0, 47.5);
    let p2 = Point::new(19.0005, 47.5);
    let d = Point::haversine(p1, p2);

    assert!(Point::within(p1, p2, d + 1.0));
    assert!(!Point::within(p1, p2, d - 1.0));
}

#[test]
fn quantized_hash_is_stable_for_equal_points() {
    let a = Point::new(19.0572901, 47.4733817);
    let b = Point::new(19.0572901, 47.4733817);
    assert_eq!(a.quantized_hash(), b.quantized_hash());
}

#[test]
fn quantized_hash_differs_for_distinct_points() {
    let a = Point::new(19.0572901, 47.4733817);
    let b = Point::new(19.0572902, 47.4733817);
    assert_ne!(a.quantized_hash(), b.quantized_hash());
}

#[test]
fn parse_decimal_lat_lon_order() {
    let p = Point::parse("47.4733817,19.0572901", false).unwrap();
    assert!((p.lon - 19.0572901).abs() < 1e-4);
    assert!((p.lat - 47.4733817).abs() < 1e-4);
}

#[test]
fn parse_decimal_lon_lat_order() {
    let p = Point::parse("19.0572901,47.4733817", true).unwrap();
    assert!((p.lon - 19.0572901).abs() < 1e-4);
    assert!((p.lat - 47.4733817).abs() < 1e-4);
}

#[test]
fn parse_dms_matches_equivalent_decimal() {
    let dec = Point::parse("47.4552,19.1258", false).unwrap();
    let dms = Point::parse("47°27'18.9\"N 19°07'33.1\"E", false).unwrap();

    assert!((dec.lat - dms.lat).abs() < 0.01);
    assert!((dec.lon - dms.lon).abs() < 0.01);
}

#[test]
fn parse_rejects_garbage() {
    assert!(Point::parse("not a coordinate", false).is_err());
}

#[test]
fn point_byte_round_trip() {
    let p = Point::new(19.0572901, -47.4733817);
    let bytes = p.to_bytes();
    let back = Point::from_bytes(bytes);
    assert_eq!(p, back);
}

#[test]
fn bbox_include_grows_bounds() {
    let mut bbox = BBox::max();
    bbox.include(Point::new(19.0, 47.0));
    bbox.include(Point::new(19.5, 47.5));

    assert!(bbox.contains(Point::new(19.2, 47.2)));
    assert!(!bbox.contains(Point::new(20.0, 47.0)));
}

#[test]
fn bbox_center_is_midpoint() {
    let bbox = BBox::new(0.0, 0.0, 10.0, 4.0);
    let c = bbox.center();
    assert_eq!(c.lon, 5.0);
    assert_eq!(c.lat, 2.0);
}

#[test]
fn road_rating_is_monotone_by_class() {
    let make = |h: HighwayKind| Road {
        id: RoadId(0),
        points: vec![],
        highway: h,
        name: String::new(),
        reference: String::new(),
        roundabout: false,
        oneway: false,
        bridge: false,
        maxspeed: -1,
        lanes: 1,
        toll: false,
        lit: false,
    };

    assert!(make(HighwayKind::Motorway).rating() > make(HighwayKind::Primary).rating());
    assert!(make(HighwayKind::Primary).rating() > make(HighwayKind::Residential).rating());
    assert!(make(HighwayKind::Residential).rating() > make(HighwayKind::Footway).rating());
    assert!(make(HighwayKind::Footway).rating() > make(HighwayKind::Unknown).rating());
}

#[test]
fn road_display_name_falls_back_to_ref_then_placeholder() {
    let mut road = Road {
        id: RoadId(0),
        points: vec![],
        highway: HighwayKind::Residential,
        name: String::new(),
        reference: String::new(),
        roundabout: false,
        oneway: false,
        bridge: false,
        maxspeed: -1,
        lanes: 1,
        toll: false,
        lit: false,
    };
    assert_eq!(road.display_name(), "unknown road");

    road.reference = "M1".to_string();
    assert_eq!(road.display_name(), "M1");

    road.name = "Main Street".to_string();
    assert_eq!(road.display_name(), "Main Street");
}

#[test]
fn road_binary_round_trip_preserves_all_fields() {
    let road = Road {
        id: RoadId(42),
        points: vec![Point::new(19.0, 47.5), Point::new(19.01, 47.51)],
        highway: HighwayKind::Primary,
        name: "Main Street".to_string(),
        reference: "M1".to_string(),
        roundabout: true,
        oneway: false,
        bridge: true,
        maxspeed: 90,
        lanes: 2,
        toll: true,
        lit: false,
    };

    let mut buf = Vec::new();
    road.write(&mut buf).unwrap();

    let back = Road::read(&mut &buf[..]).unwrap();
    assert_eq!(road, back);
}

#[test]
fn road_binary_round_trip_preserves_the_last_highway_variant() {
    // Proposed is the highest discriminant in HighwayKind; a regression in
    // from_u32's lookup table silently turns it into Unknown on read-back.
    let road = Road {
        id: RoadId(7),
        points: vec![Point::new(19.0, 47.5)],
        highway: HighwayKind::Proposed,
        name: String::new(),
        reference: String::new(),
        roundabout: false,
        oneway: false,
        bridge: false,
        maxspeed: -1,
        lanes: 1,
        toll: false,
        lit: false,
    };

    let mut buf = Vec::new();
    road.write(&mut buf).unwrap();

    let back = Road::read(&mut &buf[..]).unwrap();
    assert_eq!(back.highway, HighwayKind::Proposed);
}

#[test]
fn vertex_id_sentinel_is_invalid() {
    assert_eq!(VertexId::default(), VertexId::INVALID);
    assert_ne!(VertexId(0), VertexId::INVALID);
}

#[test]
fn counter_accumulates_independently() {
    let mut c = Counter::new();
    c.step(3);
    c.mem(2);
    c.comp(1);

    assert_eq!(c.steps, 3);
    assert_eq!(c.memops, 2);
    assert_eq!(c.comparisons, 1);

    c.reset();
    assert_eq!(c, Counter::default());
}
