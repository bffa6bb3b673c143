//! Planar spatial operations: union, validity repair, buffering, clipping.
//!
//! Distances are planar, so callers must reproject into a suitable projected
//! CRS before buffering. Buffers are round (32 segments per full circle),
//! built from capsules unioned through the boolean kernel.

use geo::{
    Area, BooleanOps, ConvexHull, Coord, Geometry, HasDimensions, Intersects, Line, LineString,
    MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};

const CIRCLE_SEGMENTS: usize = 32;

/// Collect the polygonal parts of a geometry.
pub fn flatten_polygons(geometry: &Geometry<f64>) -> Vec<Polygon<f64>> {
    match geometry {
        Geometry::Polygon(p) => vec![p.clone()],
        Geometry::MultiPolygon(mp) => mp.0.clone(),
        Geometry::Rect(r) => vec![r.to_polygon()],
        Geometry::Triangle(t) => vec![t.to_polygon()],
        Geometry::GeometryCollection(gc) => gc.iter().flat_map(flatten_polygons).collect(),
        _ => Vec::new(),
    }
}

/// Union a set of polygons into one (multi)polygon.
pub fn union_all(polygons: &[Polygon<f64>]) -> MultiPolygon<f64> {
    polygons.iter().fold(MultiPolygon::new(Vec::new()), |acc, p| {
        acc.union(&MultiPolygon::new(vec![p.clone()]))
    })
}

/// Resolve self-intersections by re-noding the polygon through the boolean
/// kernel. Valid input comes back unchanged in shape.
pub fn repair(polygon: &Polygon<f64>) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![polygon.clone()]).union(&MultiPolygon::new(Vec::new()))
}

/// Buffer a geometry outward by `distance` (same planar units as the
/// coordinates). Non-positive distances return only the polygonal parts.
pub fn buffer(geometry: &Geometry<f64>, distance: f64) -> MultiPolygon<f64> {
    if distance <= 0.0 {
        return union_all(&flatten_polygons(geometry));
    }

    match geometry {
        Geometry::Point(p) => MultiPolygon::new(vec![circle(p.0, distance)]),
        Geometry::MultiPoint(mp) => {
            union_parts(mp.0.iter().map(|p| MultiPolygon::new(vec![circle(p.0, distance)])))
        }
        Geometry::Line(line) => MultiPolygon::new(vec![capsule(line, distance)]),
        Geometry::LineString(ls) => buffer_line_string(ls, distance),
        Geometry::MultiLineString(mls) => {
            union_parts(mls.0.iter().map(|ls| buffer_line_string(ls, distance)))
        }
        Geometry::Polygon(p) => buffer_polygon(p, distance),
        Geometry::MultiPolygon(mp) => {
            union_parts(mp.0.iter().map(|p| buffer_polygon(p, distance)))
        }
        Geometry::Rect(r) => buffer_polygon(&r.to_polygon(), distance),
        Geometry::Triangle(t) => buffer_polygon(&t.to_polygon(), distance),
        Geometry::GeometryCollection(gc) => {
            union_parts(gc.iter().map(|g| buffer(g, distance)))
        }
    }
}

/// Buffer every geometry of a set and union the results.
pub fn buffer_union(geometries: &[Geometry<f64>], distance: f64) -> MultiPolygon<f64> {
    union_parts(geometries.iter().map(|g| buffer(g, distance)))
}

/// Clip a geometry to a polygonal mask, keeping only the portions inside.
/// Returns `None` when nothing is left.
pub fn clip(geometry: &Geometry<f64>, mask: &MultiPolygon<f64>) -> Option<Geometry<f64>> {
    match geometry {
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => {
            let parts = union_all(&flatten_polygons(geometry));
            let clipped = mask.intersection(&parts);
            (!clipped.is_empty()).then_some(Geometry::MultiPolygon(clipped))
        }
        Geometry::LineString(ls) => {
            let clipped = mask.clip(&MultiLineString::new(vec![ls.clone()]), false);
            (!clipped.is_empty()).then_some(Geometry::MultiLineString(clipped))
        }
        Geometry::MultiLineString(mls) => {
            let clipped = mask.clip(mls, false);
            (!clipped.is_empty()).then_some(Geometry::MultiLineString(clipped))
        }
        Geometry::Line(line) => clip(
            &Geometry::LineString(LineString::from(vec![line.start, line.end])),
            mask,
        ),
        Geometry::Point(p) => mask.intersects(p).then(|| geometry.clone()),
        Geometry::MultiPoint(mp) => {
            let kept: Vec<Point<f64>> =
                mp.0.iter().filter(|p| mask.intersects(*p)).cloned().collect();
            (!kept.is_empty()).then(|| Geometry::MultiPoint(MultiPoint::new(kept)))
        }
        Geometry::GeometryCollection(gc) => {
            let kept: Vec<Geometry<f64>> =
                gc.iter().filter_map(|g| clip(g, mask)).collect();
            (!kept.is_empty())
                .then(|| Geometry::GeometryCollection(geo::GeometryCollection::new_from(kept)))
        }
    }
}

fn union_parts(parts: impl Iterator<Item = MultiPolygon<f64>>) -> MultiPolygon<f64> {
    parts.fold(MultiPolygon::new(Vec::new()), |acc, mp| acc.union(&mp))
}

fn buffer_line_string(ls: &LineString<f64>, distance: f64) -> MultiPolygon<f64> {
    if ls.0.len() < 2 {
        return match ls.0.first() {
            Some(c) => MultiPolygon::new(vec![circle(*c, distance)]),
            None => MultiPolygon::new(Vec::new()),
        };
    }
    union_parts(
        ls.lines()
            .map(|line| MultiPolygon::new(vec![capsule(&line, distance)])),
    )
}

/// Polygon buffer = the polygon itself unioned with a round buffer along
/// every ring.
fn buffer_polygon(polygon: &Polygon<f64>, distance: f64) -> MultiPolygon<f64> {
    let mut result = repair(polygon);
    result = result.union(&buffer_line_string(polygon.exterior(), distance));
    for interior in polygon.interiors() {
        result = result.union(&buffer_line_string(interior, distance));
    }
    result
}

fn circle(center: Coord<f64>, radius: f64) -> Polygon<f64> {
    let ring: Vec<Coord<f64>> = (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let angle = 2.0 * std::f64::consts::PI * (i as f64) / (CIRCLE_SEGMENTS as f64);
            Coord {
                x: center.x + radius * angle.cos(),
                y: center.y + radius * angle.sin(),
            }
        })
        .collect();
    Polygon::new(LineString::new(ring), vec![])
}

/// Rounded buffer of a single segment: the convex hull of discs at both
/// endpoints.
fn capsule(line: &Line<f64>, radius: f64) -> Polygon<f64> {
    let mut points: Vec<Point<f64>> = circle(line.start, radius)
        .exterior()
        .points()
        .collect();
    points.extend(circle(line.end, radius).exterior().points());
    MultiPoint::new(points).convex_hull()
}

/// Area-based containment check: `inner` is contained in `outer` when
/// clipping against `outer` removes (almost) none of it.
pub fn covers(outer: &MultiPolygon<f64>, inner: &MultiPolygon<f64>) -> bool {
    let inner_area = inner.unsigned_area();
    if inner_area == 0.0 {
        return true;
    }
    let kept = outer.intersection(inner).unsigned_area();
    (inner_area - kept).abs() / inner_area < 1e-6
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square(x: f64, y: f64, size: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (x, y),
                (x + size, y),
                (x + size, y + size),
                (x, y + size),
                (x, y),
            ]),
            vec![],
        )
    }

    #[test]
    fn union_merges_overlapping_squares() {
        let union = union_all(&[unit_square(0.0, 0.0, 2.0), unit_square(1.0, 0.0, 2.0)]);
        assert_eq!(union.0.len(), 1);
        assert!((union.unsigned_area() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn repair_resolves_bowtie() {
        // Self-intersecting "bowtie" ring
        let bowtie = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0), (0.0, 0.0)]),
            vec![],
        );
        let repaired = repair(&bowtie);
        assert!(repaired.unsigned_area() > 0.0);
        for polygon in &repaired {
            assert!(polygon.unsigned_area() > 0.0);
        }
    }

    #[test]
    fn point_buffer_is_a_disc() {
        let buffered = buffer(&Geometry::Point(Point::new(0.0, 0.0)), 10.0);
        let area = buffered.unsigned_area();
        let disc = std::f64::consts::PI * 100.0;
        // 32-gon approximation sits just under the true disc area
        assert!(area > 0.97 * disc && area <= disc);
    }

    #[test]
    fn line_buffer_reaches_exactly_the_distance() {
        let line = Geometry::LineString(LineString::from(vec![(0.0, 0.0), (100.0, 0.0)]));
        let buffered = buffer(&line, 10.0);

        assert!(buffered.intersects(&Point::new(50.0, 9.0)));
        assert!(!buffered.intersects(&Point::new(50.0, 11.0)));
        assert!(!buffered.intersects(&Point::new(120.0, 0.0)));
    }

    #[test]
    fn polygon_buffer_contains_the_polygon() {
        let square = unit_square(0.0, 0.0, 10.0);
        let buffered = buffer(&Geometry::Polygon(square.clone()), 5.0);
        assert!(covers(&buffered, &MultiPolygon::new(vec![square])));
    }

    #[test]
    fn wider_buffer_covers_narrower_buffer() {
        let source = Geometry::MultiPolygon(MultiPolygon::new(vec![
            unit_square(0.0, 0.0, 10.0),
            unit_square(50.0, 50.0, 5.0),
        ]));
        let narrow = buffer(&source, 160.934);
        let wide = buffer(&source, 402.335);
        assert!(covers(&wide, &narrow));
        assert!(wide.unsigned_area() > narrow.unsigned_area());
    }

    #[test]
    fn clip_keeps_only_overlap() {
        let mask = MultiPolygon::new(vec![unit_square(0.0, 0.0, 10.0)]);
        let inside = Geometry::Polygon(unit_square(1.0, 1.0, 2.0));
        let straddling = Geometry::Polygon(unit_square(8.0, 8.0, 4.0));
        let outside = Geometry::Polygon(unit_square(20.0, 20.0, 2.0));

        assert!(clip(&inside, &mask).is_some());
        assert!(clip(&outside, &mask).is_none());

        let Some(Geometry::MultiPolygon(part)) = clip(&straddling, &mask) else {
            panic!("straddling polygon should keep its overlap");
        };
        assert!((part.unsigned_area() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn clip_lines_and_points() {
        let mask = MultiPolygon::new(vec![unit_square(0.0, 0.0, 10.0)]);

        let river = Geometry::LineString(LineString::from(vec![(-5.0, 5.0), (15.0, 5.0)]));
        let Some(Geometry::MultiLineString(kept)) = clip(&river, &mask) else {
            panic!("crossing line should keep its inside portion");
        };
        assert!(!kept.is_empty());

        assert!(clip(&Geometry::Point(Point::new(5.0, 5.0)), &mask).is_some());
        assert!(clip(&Geometry::Point(Point::new(50.0, 5.0)), &mask).is_none());
    }
}
