//! JSON records for primitives and sketch documents
//!
//! Records are lenient on input: derived fields are optional and are
//! recomputed from the picked points whenever those are present. Stored
//! derived values are only used when the points are missing.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{
    ArcGeometry, ArcMode, ArcPrimitive, CircleMode, CirclePrimitive, LinePrimitive, PlaneName,
    PointPrimitive, Primitive, RectMode, RectPrimitive, Sketch, SketchConstraint, SketchError,
    SketchItem, SketchPlane, SketchResult, SplinePrimitive,
};
use crate::config::{Precision, ToleranceConfig};
use crate::geometry::{PlaneBasis, spline};

const PRIMITIVE_TYPES: [&str; 6] = ["point", "line", "arc", "circle", "rect", "spline"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointRecord {
    pub position: DVec3,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineRecord {
    pub start: DVec3,
    #[serde(default)]
    pub end: Option<DVec3>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ArcRecord {
    pub mode: Option<String>,
    pub point1: Option<DVec3>,
    pub point2: Option<DVec3>,
    pub point3: Option<DVec3>,
    /// Older documents list the picked points as an array
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<DVec3>>,
    pub center: Option<DVec3>,
    pub radius: Option<f64>,
    pub start_angle: Option<f64>,
    pub end_angle: Option<f64>,
    pub arc_length: Option<f64>,
    pub plane_normal: Option<DVec3>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CircleRecord {
    pub mode: Option<String>,
    pub point1: Option<DVec3>,
    pub point2: Option<DVec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point3: Option<DVec3>,
    pub plane_normal: Option<DVec3>,
    pub center: Option<DVec3>,
    pub radius: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RectRecord {
    pub mode: Option<String>,
    pub start: Option<DVec3>,
    pub end: Option<DVec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p3: Option<DVec3>,
    pub plane_normal: Option<DVec3>,
    pub corners: Option<Vec<DVec3>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SplineRecord {
    pub points: Vec<DVec3>,
    #[serde(default = "default_tension")]
    pub tension: f64,
    #[serde(default)]
    pub closed: bool,
    #[serde(default = "default_segments")]
    pub segments: u32,
    #[serde(default = "default_true")]
    pub handles_visible: bool,
}

fn default_tension() -> f64 {
    spline::DEFAULT_TENSION
}

fn default_segments() -> u32 {
    spline::DEFAULT_SEGMENTS
}

fn default_true() -> bool {
    true
}

/// Wire form of a primitive, tagged by `type`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PrimitiveRecord {
    Point(PointRecord),
    Line(LineRecord),
    Arc(ArcRecord),
    Circle(CircleRecord),
    Rect(RectRecord),
    Spline(SplineRecord),
}

fn invalid(kind: &'static str, field: &'static str, reason: impl Into<String>) -> SketchError {
    SketchError::InvalidField {
        kind,
        field,
        reason: reason.into(),
    }
}

impl PrimitiveRecord {
    /// Build the record of a complete primitive
    pub fn from_primitive(primitive: &Primitive) -> SketchResult<Self> {
        if !primitive.is_complete() {
            return Err(invalid(
                kind_of(primitive),
                "points",
                "primitive is still pending",
            ));
        }

        Ok(match primitive {
            Primitive::Point(p) => PrimitiveRecord::Point(PointRecord {
                position: p.position,
            }),
            Primitive::Line(l) => PrimitiveRecord::Line(LineRecord {
                start: l.start,
                end: l.end,
            }),
            Primitive::Arc(a) => {
                let g = a.geometry;
                PrimitiveRecord::Arc(ArcRecord {
                    mode: Some(a.mode.as_str().to_string()),
                    point1: a.points.first().copied(),
                    point2: a.points.get(1).copied(),
                    point3: a.points.get(2).copied(),
                    points: None,
                    center: g.map(|g| g.center),
                    radius: g.map(|g| g.radius),
                    start_angle: g.map(|g| g.start_angle),
                    end_angle: g.map(|g| g.end_angle),
                    arc_length: g.map(|g| g.length()),
                    plane_normal: Some(a.plane_normal),
                })
            }
            Primitive::Circle(c) => PrimitiveRecord::Circle(CircleRecord {
                mode: Some(c.mode.as_str().to_string()),
                point1: Some(c.point1),
                point2: c.point2,
                point3: c.point3,
                plane_normal: Some(c.plane_normal),
                center: Some(c.center),
                radius: Some(c.radius),
            }),
            Primitive::Rect(r) => PrimitiveRecord::Rect(RectRecord {
                mode: Some(r.mode.as_str().to_string()),
                start: Some(r.start),
                end: r.end,
                p3: r.p3,
                plane_normal: Some(r.plane_normal),
                corners: r.corners.map(|c| c.to_vec()),
            }),
            Primitive::Spline(s) => PrimitiveRecord::Spline(SplineRecord {
                points: s.control_points.clone(),
                tension: s.tension,
                closed: s.closed,
                segments: s.segments,
                handles_visible: s.handles_visible,
            }),
        })
    }

    /// Rebuild the primitive, recomputing derived fields
    pub fn into_primitive(self, tolerances: &ToleranceConfig) -> SketchResult<Primitive> {
        match self {
            PrimitiveRecord::Point(r) => Ok(Primitive::Point(PointPrimitive {
                position: r.position,
            })),
            PrimitiveRecord::Line(r) => {
                let end = r.end.ok_or(SketchError::MissingField {
                    kind: "line",
                    field: "end",
                })?;
                Ok(Primitive::Line(LinePrimitive {
                    start: r.start,
                    end: Some(end),
                }))
            }
            PrimitiveRecord::Arc(r) => arc_from_record(r, tolerances),
            PrimitiveRecord::Circle(r) => circle_from_record(r, tolerances),
            PrimitiveRecord::Rect(r) => rect_from_record(r, tolerances),
            PrimitiveRecord::Spline(r) => {
                if r.points.len() < 2 {
                    return Err(invalid("spline", "points", "needs at least two points"));
                }
                Ok(Primitive::Spline(SplinePrimitive {
                    control_points: r.points,
                    tension: r.tension,
                    closed: r.closed,
                    segments: r.segments,
                    handles_visible: r.handles_visible,
                }))
            }
        }
    }
}

fn kind_of(primitive: &Primitive) -> &'static str {
    match primitive {
        Primitive::Point(_) => "point",
        Primitive::Line(_) => "line",
        Primitive::Arc(_) => "arc",
        Primitive::Circle(_) => "circle",
        Primitive::Rect(_) => "rect",
        Primitive::Spline(_) => "spline",
    }
}

fn arc_from_record(r: ArcRecord, tolerances: &ToleranceConfig) -> SketchResult<Primitive> {
    let mode = match r.mode.as_deref() {
        Some(name) => {
            ArcMode::parse(name).ok_or_else(|| invalid("arc", "mode", format!("'{name}'")))?
        }
        None => ArcMode::ThreePoints,
    };
    let normal = r.plane_normal.unwrap_or(DVec3::Z);

    let points = match (r.point1, r.point2, r.point3) {
        (Some(a), Some(b), Some(c)) => Some(vec![a, b, c]),
        _ => r.points.filter(|p| p.len() == 3),
    };
    let stored = match (r.center, r.radius, r.start_angle, r.end_angle) {
        (Some(center), Some(radius), Some(start_angle), Some(end_angle)) => Some(ArcGeometry {
            center,
            radius,
            start_angle,
            end_angle,
        }),
        _ => None,
    };

    if let Some(points) = points {
        let mut arc = ArcPrimitive::new(mode, points, normal);
        if arc.recompute(tolerances, Precision::Commit) {
            return Ok(Primitive::Arc(arc));
        }
        return match stored {
            Some(g) => {
                tracing::warn!("Arc points are degenerate, keeping stored geometry");
                arc.geometry = Some(g);
                Ok(Primitive::Arc(arc))
            }
            None => Err(invalid("arc", "points", "degenerate arc")),
        };
    }

    // no points: rebuild them from the stored circle, measured in the plane basis
    let g = stored.ok_or(SketchError::MissingField {
        kind: "arc",
        field: "point1",
    })?;
    let basis = PlaneBasis::from_normal(normal);
    let points = vec![
        g.center,
        basis.point_at(g.center, g.radius, g.start_angle),
        basis.point_at(g.center, g.radius, g.end_angle),
    ];
    let mut arc = ArcPrimitive::new(ArcMode::CenterStartEnd, points, normal);
    arc.geometry = Some(g);
    Ok(Primitive::Arc(arc))
}

fn circle_from_record(r: CircleRecord, tolerances: &ToleranceConfig) -> SketchResult<Primitive> {
    let mode = match r.mode.as_deref() {
        Some(name) => {
            CircleMode::parse(name).ok_or_else(|| invalid("circle", "mode", format!("'{name}'")))?
        }
        None => CircleMode::TwoPoint,
    };
    let normal = r.plane_normal.unwrap_or(DVec3::Z);

    let mut circle = match (r.point1, r.point2) {
        (Some(p1), Some(p2)) => {
            let mut c = CirclePrimitive::new(mode, p1, normal);
            c.point2 = Some(p2);
            c.point3 = r.point3;
            c
        }
        _ => {
            // center and radius only: place the rim point along the plane's u axis
            let (center, radius) = r.center.zip(r.radius).ok_or(SketchError::MissingField {
                kind: "circle",
                field: "point1",
            })?;
            let mut c = CirclePrimitive::new(CircleMode::TwoPoint, center, normal);
            c.point2 = Some(center + c.basis().u * radius);
            c
        }
    };

    if !Primitive::Circle(circle.clone()).is_complete() {
        return Err(SketchError::MissingField {
            kind: "circle",
            field: "point3",
        });
    }
    if circle.recompute(tolerances, Precision::Commit) {
        return Ok(Primitive::Circle(circle));
    }
    match (r.center, r.radius) {
        (Some(center), Some(radius)) if radius > 0.0 && radius.is_finite() => {
            tracing::warn!("Circle points are degenerate, keeping stored center and radius");
            circle.center = center;
            circle.radius = radius;
            Ok(Primitive::Circle(circle))
        }
        _ => Err(invalid("circle", "radius", "degenerate circle")),
    }
}

fn rect_from_record(r: RectRecord, tolerances: &ToleranceConfig) -> SketchResult<Primitive> {
    let mode = match r.mode.as_deref() {
        Some(name) => {
            RectMode::parse(name).ok_or_else(|| invalid("rect", "mode", format!("'{name}'")))?
        }
        None => RectMode::TwoPoint,
    };
    let normal = r.plane_normal.unwrap_or(DVec3::Z);

    let stored: Option<[DVec3; 4]> = r.corners.and_then(|c| c.try_into().ok());

    let Some(start) = r.start else {
        // corners only: treat the first and third corner as the diagonal
        let corners = stored.ok_or(SketchError::MissingField {
            kind: "rect",
            field: "start",
        })?;
        let mut rect = RectPrimitive::new(RectMode::TwoPoint, corners[0], normal);
        rect.end = Some(corners[2]);
        rect.corners = Some(corners);
        return Ok(Primitive::Rect(rect));
    };

    let mut rect = RectPrimitive::new(mode, start, normal);
    rect.end = r.end;
    rect.p3 = r.p3;
    if !Primitive::Rect(rect.clone()).is_complete() {
        return Err(SketchError::MissingField {
            kind: "rect",
            field: if rect.end.is_none() { "end" } else { "p3" },
        });
    }
    if rect.recompute(tolerances) {
        return Ok(Primitive::Rect(rect));
    }
    Err(invalid("rect", "corners", "zero-length edge"))
}

impl Primitive {
    /// Serialize a complete primitive
    pub fn to_json(&self) -> SketchResult<Value> {
        let record = PrimitiveRecord::from_primitive(self)?;
        Ok(serde_json::to_value(record)?)
    }

    /// Deserialize a primitive, recomputing derived fields with default tolerances
    pub fn from_json(value: &Value) -> SketchResult<Self> {
        Self::from_json_with(value, &ToleranceConfig::default())
    }

    pub fn from_json_with(value: &Value, tolerances: &ToleranceConfig) -> SketchResult<Self> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(SketchError::MissingField {
                kind: "primitive",
                field: "type",
            })?;
        if !PRIMITIVE_TYPES.contains(&kind) {
            return Err(SketchError::UnknownPrimitive(kind.to_string()));
        }
        let record: PrimitiveRecord = serde_json::from_value(value.clone())?;
        record.into_primitive(tolerances)
    }
}

/// Wire form of a sketch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SketchDocument {
    #[serde(rename = "type", default = "sketch_type")]
    pub kind: String,
    /// Item-style UUID string; older documents carry a numeric backend id
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub plane: Option<String>,
    #[serde(default)]
    pub plane_normal: Option<DVec3>,
    #[serde(default, alias = "origin")]
    pub plane_origin: Option<DVec3>,
    #[serde(default)]
    pub items: Vec<Value>,
    /// Decoded one by one so a malformed constraint only drops itself
    #[serde(default)]
    pub constraints: Vec<Value>,
}

fn sketch_type() -> String {
    "Sketch".to_string()
}

impl SketchItem {
    /// The primitive record plus the item's id and name
    pub fn to_json(&self) -> SketchResult<Value> {
        let mut value = self.primitive.to_json()?;
        if let Value::Object(map) = &mut value {
            map.insert("id".into(), Value::String(self.id.to_string()));
            map.insert("name".into(), Value::String(self.name.clone()));
        }
        Ok(value)
    }

    pub fn from_json(value: &Value, tolerances: &ToleranceConfig) -> SketchResult<Self> {
        let primitive = Primitive::from_json_with(value, tolerances)?;
        let mut item = SketchItem::new(primitive);
        if let Some(id) = value
            .get("id")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
        {
            item.id = id;
        }
        if let Some(name) = value.get("name").and_then(Value::as_str) {
            item.name = name.to_string();
        }
        Ok(item)
    }
}

impl Sketch {
    pub fn to_document(&self) -> SketchResult<SketchDocument> {
        let items = self
            .items()
            .iter()
            .map(SketchItem::to_json)
            .collect::<SketchResult<Vec<_>>>()?;
        Ok(SketchDocument {
            kind: sketch_type(),
            id: Value::String(self.id.to_string()),
            name: self.name.clone(),
            plane: Some(self.plane.name().as_str().to_string()),
            plane_normal: Some(self.plane.normal),
            plane_origin: Some(self.plane.origin),
            items,
            constraints: self
                .constraints()
                .iter()
                .map(serde_json::to_value)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    /// Serialize the sketch document
    pub fn to_json(&self) -> SketchResult<Value> {
        Ok(serde_json::to_value(self.to_document()?)?)
    }

    /// Load a sketch document with default tolerances
    pub fn from_json(value: &Value) -> SketchResult<Self> {
        Self::from_json_with(value, &ToleranceConfig::default())
    }

    /// Load a sketch document.
    ///
    /// Items that fail to decode are logged and skipped; the rest load.
    /// Loaded items are not drawn.
    pub fn from_json_with(value: &Value, tolerances: &ToleranceConfig) -> SketchResult<Self> {
        let doc: SketchDocument = serde_json::from_value(value.clone())?;
        Ok(Self::from_document(doc, tolerances))
    }

    pub fn from_document(doc: SketchDocument, tolerances: &ToleranceConfig) -> Self {
        let origin = doc.plane_origin.unwrap_or(DVec3::ZERO);
        let plane = match (doc.plane_normal, doc.plane.as_deref().and_then(PlaneName::parse)) {
            (Some(normal), _) => SketchPlane::new(origin, normal),
            (None, Some(name)) => SketchPlane::new(origin, name.plane().normal),
            (None, None) => SketchPlane::new(origin, DVec3::Z),
        };

        let id = match doc.id.as_str().map(Uuid::parse_str) {
            Some(Ok(id)) => id,
            _ => {
                if !doc.id.is_null() {
                    tracing::debug!("Sketch id {} is not a UUID, assigning a new one", doc.id);
                }
                Uuid::new_v4()
            }
        };

        let mut sketch = Sketch::with_id(id, doc.name, plane);
        for (index, value) in doc.items.iter().enumerate() {
            match SketchItem::from_json(value, tolerances) {
                Ok(item) => {
                    sketch.add_item(item);
                }
                Err(e) => tracing::warn!("Skipping sketch item {}: {}", index, e),
            }
        }
        for (index, value) in doc.constraints.into_iter().enumerate() {
            match serde_json::from_value::<SketchConstraint>(value) {
                Ok(constraint) => sketch.add_constraint(constraint),
                Err(e) => tracing::warn!("Skipping sketch constraint {}: {}", index, e),
            }
        }
        tracing::debug!(
            "Loaded sketch '{}' with {} of {} items",
            sketch.name,
            sketch.items().len(),
            doc.items.len()
        );
        sketch
    }
}
