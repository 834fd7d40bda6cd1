//! Spatial summaries from GeoJSON geometry extras
//!
//! A geometry is parsed, checked for structural validity and for rings
//! sharing more than one coordinate, stripped of repeated vertices, and then
//! reduced to three values:
//! - `boundingbox`: the simplified geometry as a GeoJSON geometry object
//! - `spatial_area`: spherical area in square metres, never negative
//! - `spatial_center`: planar centroid of the simplified geometry
//!
//! The validity rules are lenient on purpose and match what the index
//! consumers have always received; in particular the shared-coordinate
//! check only compares every later member with the first one.

use geo::{Centroid, ChamberlainDuquetteArea, Geometry, LineString, Polygon, RemoveRepeatedPoints};
use geojson::{GeoJson, Position, Value as GeoValue};
use serde_json::Value;
use thiserror::Error;

use crate::models::SpatialCenter;

/// Area reported instead of a negative one; rankings divide by it
const MIN_AREA: f64 = 1.0;

/// Rejected geometry input
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("not parseable as GeoJSON: {0}")]
    Parse(String),

    #[error("GeoJSON object is not a geometry")]
    NotAGeometry,

    #[error("invalid geometry: {0}")]
    Invalid(String),

    #[error("More than one shared coordinate!")]
    SharedCoordinates,

    #[error("geometry conversion failed: {0}")]
    Conversion(String),

    #[error("geometry has no centroid")]
    NoCentroid,
}

/// Values derived from one geometry
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialSummary {
    pub boundingbox: Value,
    pub area: f64,
    pub center: SpatialCenter,
}

/// Replace the lower-case `polygon` type literal some publishers send
pub fn fix_polygon_type(raw: &str) -> String {
    raw.replace("polygon", "Polygon")
}

/// Parse, validate and summarize a geometry
///
/// `repair` applies [`fix_polygon_type`] before parsing.
pub fn summarize(raw: &str, repair: bool) -> Result<SpatialSummary, GeometryError> {
    let source = if repair {
        fix_polygon_type(raw)
    } else {
        raw.to_string()
    };

    let value = parse_geometry(&source)?;
    validate(&value)?;
    check_shared_coordinates(&value)?;

    let geometry = Geometry::<f64>::try_from(value)
        .map_err(|e| GeometryError::Conversion(e.to_string()))?;
    let simplified = geometry.remove_repeated_points();
    check_simplified(&simplified)?;

    let boundingbox = serde_json::to_value(geojson::Geometry::new(GeoValue::from(&simplified)))
        .map_err(|e| GeometryError::Conversion(e.to_string()))?;

    let area = spherical_area(&simplified);
    let area = if area < 0.0 { MIN_AREA } else { area };

    let centroid = simplified.centroid().ok_or(GeometryError::NoCentroid)?;

    Ok(SpatialSummary {
        boundingbox,
        area,
        center: SpatialCenter {
            lat: centroid.y(),
            lon: centroid.x(),
        },
    })
}

fn parse_geometry(source: &str) -> Result<GeoValue, GeometryError> {
    let parsed: GeoJson = source
        .parse()
        .map_err(|e: geojson::Error| GeometryError::Parse(e.to_string()))?;

    match parsed {
        GeoJson::Geometry(geometry) => Ok(geometry.value),
        _ => Err(GeometryError::NotAGeometry),
    }
}

/// Structural GeoJSON rules for positions, lines and rings
fn validate(value: &GeoValue) -> Result<(), GeometryError> {
    match value {
        GeoValue::Point(position) => check_position(position),
        GeoValue::MultiPoint(positions) => positions.iter().try_for_each(|p| check_position(p)),
        GeoValue::LineString(line) => check_line(line),
        GeoValue::MultiLineString(lines) => lines.iter().try_for_each(|l| check_line(l)),
        GeoValue::Polygon(rings) => check_polygon(rings),
        GeoValue::MultiPolygon(polygons) => polygons.iter().try_for_each(|p| check_polygon(p)),
        GeoValue::GeometryCollection(geometries) => {
            geometries.iter().try_for_each(|g| validate(&g.value))
        }
    }
}

fn check_position(position: &Position) -> Result<(), GeometryError> {
    if !(2..=3).contains(&position.len()) {
        return Err(GeometryError::Invalid(
            "a position must have exactly 2 or 3 values".to_string(),
        ));
    }
    if position.iter().any(|c| !c.is_finite()) {
        return Err(GeometryError::Invalid("a position must be finite".to_string()));
    }
    Ok(())
}

fn check_line(line: &[Position]) -> Result<(), GeometryError> {
    if line.len() < 2 {
        return Err(GeometryError::Invalid(
            "a LineString must have at least two positions".to_string(),
        ));
    }
    line.iter().try_for_each(|p| check_position(p))
}

fn check_polygon(rings: &[Vec<Position>]) -> Result<(), GeometryError> {
    for ring in rings {
        if ring.len() < 4 {
            return Err(GeometryError::Invalid(
                "a linear ring must have four or more positions".to_string(),
            ));
        }
        if ring.first() != ring.last() {
            return Err(GeometryError::Invalid(
                "the first and last positions of a linear ring must be equal".to_string(),
            ));
        }
        ring.iter().try_for_each(|p| check_position(p))?;
    }
    Ok(())
}

/// Reject geometries whose later members share more than one element with
/// the first member
///
/// Members are the top-level coordinate entries: rings of a polygon, lines
/// of a multi-line, polygons of a multi-polygon, positions of a line. A point
/// has no list members and a collection has no coordinates at all.
fn check_shared_coordinates(value: &GeoValue) -> Result<(), GeometryError> {
    match value {
        GeoValue::Point(_) => Ok(()),
        GeoValue::MultiPoint(positions) | GeoValue::LineString(positions) => {
            check_members(positions)
        }
        GeoValue::Polygon(rings) | GeoValue::MultiLineString(rings) => check_members(rings),
        GeoValue::MultiPolygon(polygons) => check_members(polygons),
        GeoValue::GeometryCollection(_) => Err(GeometryError::Invalid(
            "a geometry collection has no coordinates".to_string(),
        )),
    }
}

fn check_members<E: PartialEq>(members: &[Vec<E>]) -> Result<(), GeometryError> {
    let Some((first, rest)) = members.split_first() else {
        return Ok(());
    };

    for member in rest {
        let mut shared = 0;
        for element in first {
            if member.contains(element) {
                shared += 1;
            }
            if shared > 1 {
                return Err(GeometryError::SharedCoordinates);
            }
        }
    }
    Ok(())
}

/// Removing repeated points must not collapse a line or ring below its minimum size
fn check_simplified(geometry: &Geometry<f64>) -> Result<(), GeometryError> {
    match geometry {
        Geometry::LineString(line) => check_simplified_line(line),
        Geometry::MultiLineString(lines) => lines.iter().try_for_each(check_simplified_line),
        Geometry::Polygon(polygon) => check_simplified_polygon(polygon),
        Geometry::MultiPolygon(polygons) => {
            polygons.iter().try_for_each(check_simplified_polygon)
        }
        _ => Ok(()),
    }
}

fn check_simplified_line(line: &LineString<f64>) -> Result<(), GeometryError> {
    if line.0.len() < 2 {
        return Err(GeometryError::Invalid(
            "a line string collapses to a single position".to_string(),
        ));
    }
    Ok(())
}

fn check_simplified_polygon(polygon: &Polygon<f64>) -> Result<(), GeometryError> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .try_for_each(|ring| {
            if ring.0.len() < 4 {
                Err(GeometryError::Invalid(
                    "a linear ring collapses below 4 positions".to_string(),
                ))
            } else {
                Ok(())
            }
        })
}

/// Chamberlain-Duquette area; holes are subtracted, so the result may be negative
fn spherical_area(geometry: &Geometry<f64>) -> f64 {
    match geometry {
        Geometry::Polygon(polygon) => polygon_area(polygon),
        Geometry::MultiPolygon(polygons) => polygons.iter().map(polygon_area).sum(),
        Geometry::Rect(rect) => polygon_area(&rect.to_polygon()),
        Geometry::Triangle(triangle) => polygon_area(&triangle.to_polygon()),
        Geometry::GeometryCollection(collection) => collection.iter().map(spherical_area).sum(),
        _ => 0.0,
    }
}

fn polygon_area(polygon: &Polygon<f64>) -> f64 {
    let holes: f64 = polygon.interiors().iter().map(ring_area).sum();
    ring_area(polygon.exterior()) - holes
}

fn ring_area(ring: &LineString<f64>) -> f64 {
    Polygon::new(ring.clone(), vec![]).chamberlain_duquette_unsigned_area()
}
