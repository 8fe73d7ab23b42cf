use extents_core::document::{
    Arc, Attribute, AttributeDefinition, BlockDefinition, Circle, Dimension, DimensionKind,
    Document, EdgeFlags, Ellipse, Entity, Face3d, Hatch, Insert, LightWeightPolyline,
    LightWeightPolylineVertex, NurbsCurve, NurbsVertex, Point, PolyfaceMesh, PolyfaceMeshFace,
    PolyfaceMeshVertex, Polyline, Polyline3d, Polyline3dVertex, PolylineVertex, Solid, Text,
};
use extents_core::geometry::{Point2, Point3, Vector2};
use tracing::debug;

/// 内置演示图纸：顶层放置各类常见实体，另有一个两层嵌套的块参照。
pub fn build_demo_document() -> Document {
    let mut doc = Document::new();

    doc.add_block_definition(BlockDefinition::new(
        "BOLT",
        vec![
            Entity::Circle(Circle {
                center: Point3::new(0.0, 0.0, 0.0),
                radius: 1.0,
                thickness: 0.0,
                layer: "PARTS".to_string(),
            }),
            Entity::AttributeDefinition(AttributeDefinition {
                tag: "SIZE".to_string(),
                prompt: Some("Bolt size".to_string()),
                default_value: "M8".to_string(),
                position: Point3::new(1.5, 0.0, 0.0),
                height: 0.5,
                layer: "PARTS".to_string(),
            }),
        ],
    ));
    doc.add_block_definition(BlockDefinition::new(
        "PLATE",
        vec![
            Entity::LightWeightPolyline(LightWeightPolyline {
                vertices: [(0.0, 0.0), (20.0, 0.0), (20.0, 10.0), (0.0, 10.0)]
                    .into_iter()
                    .map(|(x, y)| LightWeightPolylineVertex::new(Point2::new(x, y)))
                    .collect(),
                is_closed: true,
                thickness: 0.0,
                layer: "PARTS".to_string(),
            }),
            Entity::Insert(Insert {
                block: "BOLT".to_string(),
                insertion_point: Point3::new(3.0, 3.0, 0.0),
                scale: Vector2::new(1.0, 1.0),
                rotation: 0.0,
                layer: "PARTS".to_string(),
            }),
            Entity::Insert(Insert {
                block: "BOLT".to_string(),
                insertion_point: Point3::new(17.0, 7.0, 0.0),
                scale: Vector2::new(1.0, 1.0),
                rotation: 0.0,
                layer: "PARTS".to_string(),
            }),
        ],
    ));

    doc.add_line(Point3::new(0.0, 0.0, 0.0), Point3::new(100.0, 0.0, 0.0), "0");
    doc.add_circle(Point3::new(50.0, 25.0, 0.0), 12.5, "ANNOT");
    doc.add_entity(Entity::Arc(Arc {
        center: Point3::new(20.0, 10.0, 0.0),
        radius: 7.5,
        start_angle: 0.0,
        end_angle: 90.0,
        thickness: 0.0,
        layer: "ANNOT".to_string(),
    }));
    doc.add_entity(Entity::Ellipse(Ellipse {
        center: Point3::new(80.0, 40.0, 0.0),
        major_axis: 6.0,
        minor_axis: 3.0,
        rotation: 0.0,
        start_angle: 0.0,
        end_angle: 360.0,
        thickness: 0.0,
        layer: "GEOM".to_string(),
    }));
    doc.add_entity(Entity::Point(Point {
        location: Point3::new(-5.0, -5.0, 0.0),
        thickness: 0.0,
        layer: "GEOM".to_string(),
    }));
    doc.add_entity(Entity::Polyline(Polyline {
        vertices: vec![
            PolylineVertex::new(Point2::new(0.0, 10.0)),
            PolylineVertex::with_bulge(Point2::new(10.0, 20.0), 0.5),
            PolylineVertex::new(Point2::new(25.0, 5.0)),
        ],
        is_closed: false,
        thickness: 1.0,
        layer: "SKETCH".to_string(),
    }));
    doc.add_entity(Entity::Polyline3d(Polyline3d {
        vertices: vec![
            Polyline3dVertex::new(Point3::new(60.0, 0.0, 0.0)),
            Polyline3dVertex::new(Point3::new(65.0, 5.0, 10.0)),
        ],
        is_closed: false,
        layer: "3D".to_string(),
    }));
    doc.add_entity(Entity::PolyfaceMesh(PolyfaceMesh {
        vertices: vec![
            PolyfaceMeshVertex::new(Point3::new(70.0, 0.0, 0.0)),
            PolyfaceMeshVertex::new(Point3::new(75.0, 0.0, 0.0)),
            PolyfaceMeshVertex::new(Point3::new(72.5, 4.0, 3.0)),
        ],
        faces: vec![PolyfaceMeshFace {
            vertex_indexes: vec![1, 2, 3],
            layer: "3D".to_string(),
        }],
        layer: "3D".to_string(),
    }));
    doc.add_entity(Entity::NurbsCurve(NurbsCurve {
        control_points: [(30.0, 30.0), (35.0, 45.0), (40.0, 30.0)]
            .into_iter()
            .map(|(x, y)| NurbsVertex::new(Point2::new(x, y)))
            .collect(),
        order: 3,
        layer: "SKETCH".to_string(),
    }));
    doc.add_entity(Entity::Text(Text {
        base_point: Point3::new(5.0, 12.0, 0.0),
        value: "EXTENTS".to_string(),
        height: 3.5,
        width_factor: 0.8,
        rotation: 45.0,
        layer: "ANNOT".to_string(),
    }));
    doc.add_entity(Entity::Face3d(Face3d {
        vertices: [
            Point3::new(0.0, 50.0, 0.0),
            Point3::new(10.0, 50.0, 0.0),
            Point3::new(10.0, 60.0, 5.0),
            Point3::new(0.0, 60.0, 5.0),
        ],
        edge_flags: EdgeFlags::FIRST | EdgeFlags::SECOND | EdgeFlags::THIRD,
        layer: "3D".to_string(),
    }));
    doc.add_entity(Entity::Solid(Solid {
        vertices: [
            Point3::new(90.0, 10.0, 0.0),
            Point3::new(95.0, 10.0, 0.0),
            Point3::new(95.0, 15.0, 0.0),
            Point3::new(90.0, 15.0, 0.0),
        ],
        thickness: 0.5,
        layer: "GEOM".to_string(),
    }));
    doc.add_insert(
        "PLATE",
        Point3::new(40.0, -30.0, 0.0),
        Vector2::new(1.5, 1.0),
        30.0,
        "PARTS",
    );
    doc.add_entity(Entity::Hatch(Hatch {
        pattern_name: "ANSI31".to_string(),
        is_solid: false,
        boundary_paths: vec![vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
        ]],
        layer: "FILL".to_string(),
    }));
    doc.add_entity(Entity::Attribute(Attribute {
        tag: "TITLE".to_string(),
        value: "Demo".to_string(),
        position: Point3::new(0.0, -10.0, 0.0),
        height: 2.0,
        layer: "ANNOT".to_string(),
    }));
    doc.add_entity(Entity::Dimension(Dimension {
        kind: DimensionKind::Linear,
        definition_point: Point3::new(0.0, -2.0, 0.0),
        text_midpoint: Point3::new(50.0, -2.0, 0.0),
        measurement: Some(100.0),
        layer: "DIM".to_string(),
    }));

    debug!(
        entity_count = doc.entities().count(),
        block_count = doc.blocks().count(),
        "已创建演示图纸"
    );
    doc
}
