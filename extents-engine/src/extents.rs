use std::collections::HashMap;

use extents_core::document::{
    BlockDefinition, Document, EdgeFlags, Entity, EntityId, Face3d, Insert, Text,
};
use extents_core::geometry::{BoundingBox, Point3, Vector2};
use tracing::{debug, warn};

use crate::errors::ExtentsError;

/// 块嵌套层数的默认上限。
pub const DEFAULT_MAX_BLOCK_DEPTH: usize = 64;

/// 按名称查找块定义。计算器只读借用块表，不会修改共享定义。
pub trait BlockLookup {
    fn block(&self, name: &str) -> Option<&BlockDefinition>;
}

impl BlockLookup for Document {
    fn block(&self, name: &str) -> Option<&BlockDefinition> {
        Document::block(self, name)
    }
}

impl BlockLookup for HashMap<String, BlockDefinition> {
    fn block(&self, name: &str) -> Option<&BlockDefinition> {
        self.get(name)
    }
}

/// 实体范围计算器：按实体类型分派，块参照递归展开子实体。
///
/// 不支持的实体类型返回空包围盒而不是错误；只有块定义循环引用或嵌套过深才会失败。
#[derive(Debug)]
pub struct ExtentsComputer<'a, B: ?Sized = Document> {
    blocks: &'a B,
    max_block_depth: usize,
}

impl<B: ?Sized> Clone for ExtentsComputer<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: ?Sized> Copy for ExtentsComputer<'_, B> {}

impl<'a, B: BlockLookup + ?Sized> ExtentsComputer<'a, B> {
    pub fn new(blocks: &'a B) -> Self {
        Self {
            blocks,
            max_block_depth: DEFAULT_MAX_BLOCK_DEPTH,
        }
    }

    /// 设置块嵌套上限。顶层块参照展开一次记为一层。
    pub fn with_max_block_depth(mut self, max_block_depth: usize) -> Self {
        self.max_block_depth = max_block_depth;
        self
    }

    #[inline]
    pub fn max_block_depth(&self) -> usize {
        self.max_block_depth
    }

    pub fn compute(&self, entity: &Entity) -> Result<BoundingBox, ExtentsError> {
        let mut chain = Vec::new();
        self.compute_nested(entity, &mut chain)
    }

    /// 逐个计算实体范围，保留实体 ID 以便输出报告。
    pub fn compute_all<'e, I>(&self, entities: I) -> Result<Vec<(EntityId, BoundingBox)>, ExtentsError>
    where
        I: IntoIterator<Item = &'e (EntityId, Entity)>,
    {
        entities
            .into_iter()
            .map(|(id, entity)| self.compute(entity).map(|bounds| (*id, bounds)))
            .collect()
    }

    fn compute_nested(
        &self,
        entity: &Entity,
        chain: &mut Vec<&'a BlockDefinition>,
    ) -> Result<BoundingBox, ExtentsError> {
        let bounds = match entity {
            Entity::Line(line) => {
                let mut bounds = BoundingBox::from_point(line.start);
                bounds.add_point(line.end);
                inflate_non_empty(bounds, line.thickness / 2.0)
            }
            Entity::Circle(circle) => radial_extents(circle.center, circle.radius, circle.thickness),
            Entity::Arc(arc) => radial_extents(arc.center, arc.radius, arc.thickness),
            Entity::Ellipse(ellipse) => {
                radial_extents(ellipse.center, ellipse.major_axis, ellipse.thickness)
            }
            Entity::Point(point) => {
                inflate_non_empty(BoundingBox::from_point(point.location), point.thickness / 2.0)
            }
            Entity::Polyline(polyline) => inflate_non_empty(
                points_extents(polyline.vertices.iter().map(|v| v.location.extend(0.0))),
                polyline.thickness / 2.0,
            ),
            Entity::LightWeightPolyline(polyline) => inflate_non_empty(
                points_extents(polyline.vertices.iter().map(|v| v.location.extend(0.0))),
                polyline.thickness / 2.0,
            ),
            Entity::Polyline3d(polyline) => {
                points_extents(polyline.vertices.iter().map(|v| v.location))
            }
            Entity::PolyfaceMesh(mesh) => points_extents(mesh.vertices.iter().map(|v| v.location)),
            Entity::NurbsCurve(curve) => points_extents(
                curve
                    .control_points
                    .iter()
                    .map(|point| point.location.extend(0.0)),
            ),
            Entity::Text(text) => text_extents(text),
            Entity::Face3d(face) => face_extents(face),
            Entity::Solid(solid) => {
                inflate_non_empty(points_extents(solid.vertices), solid.thickness)
            }
            Entity::Insert(insert) => self.insert_extents(insert, chain)?,
            Entity::PolylineVertex(vertex) => BoundingBox::from_point(vertex.location.extend(0.0)),
            Entity::Polyline3dVertex(vertex) => BoundingBox::from_point(vertex.location),
            Entity::PolyfaceMeshVertex(vertex) => BoundingBox::from_point(vertex.location),
            Entity::Vertex(vertex) => BoundingBox::from_point(vertex.location),
            Entity::LightWeightPolylineVertex(_)
            | Entity::PolyfaceMeshFace(_)
            | Entity::Hatch(_)
            | Entity::Attribute(_)
            | Entity::AttributeDefinition(_)
            | Entity::Dimension(_) => {
                debug!(kind = %entity.kind(), "实体类型不参与范围计算");
                BoundingBox::empty()
            }
        };
        Ok(bounds)
    }

    /// 块参照：合并子实体范围 → 按插入点平移 → 展开为 XY 四角 → 缩放 → 旋转。
    /// 缩放与旋转都以插入点为基点，顺序不可交换。
    fn insert_extents(
        &self,
        insert: &Insert,
        chain: &mut Vec<&'a BlockDefinition>,
    ) -> Result<BoundingBox, ExtentsError> {
        let blocks: &'a B = self.blocks;
        let Some(definition) = blocks.block(&insert.block) else {
            warn!(block = %insert.block, "块定义不存在，块参照不贡献范围");
            return Ok(BoundingBox::empty());
        };
        if chain.iter().any(|open| std::ptr::eq(*open, definition)) {
            return Err(ExtentsError::CyclicBlockReference {
                block: definition.name.clone(),
            });
        }
        if chain.len() >= self.max_block_depth {
            return Err(ExtentsError::NestingTooDeep {
                block: definition.name.clone(),
                limit: self.max_block_depth,
            });
        }

        chain.push(definition);
        debug!(block = %definition.name, depth = chain.len(), "展开块参照");
        let local = self.union_of(&definition.entities, chain);
        chain.pop();
        let local = local?;
        if local.is_empty() {
            return Ok(local);
        }

        let origin = insert.insertion_point;
        let offset = Vector2::new(origin.x(), origin.y());
        let min = local.min().translated_2d(offset);
        let max = local.max().translated_2d(offset);
        let corners = [
            Point3::new(min.x(), min.y(), 0.0),
            Point3::new(min.x(), max.y(), 0.0),
            Point3::new(max.x(), max.y(), 0.0),
            Point3::new(max.x(), min.y(), 0.0),
        ];

        let angle = insert.rotation.to_radians();
        let mut bounds = BoundingBox::empty();
        for corner in corners {
            let placed = corner
                .scaled_2d_about(origin, insert.scale)
                .rotated_2d_about(origin, angle);
            bounds.add_point(placed);
        }
        Ok(bounds)
    }

    fn union_of(
        &self,
        entities: &[Entity],
        chain: &mut Vec<&'a BlockDefinition>,
    ) -> Result<BoundingBox, ExtentsError> {
        let mut bounds = BoundingBox::empty();
        for entity in entities {
            let child = self.compute_nested(entity, chain)?;
            if !child.is_empty() {
                bounds.add_box(&child);
            }
        }
        Ok(bounds)
    }
}

impl<'a> ExtentsComputer<'a, Document> {
    /// 计算文档中指定实体的范围。
    pub fn entity_extents(&self, id: EntityId) -> Result<BoundingBox, ExtentsError> {
        let entity = self
            .blocks
            .entity(id)
            .ok_or(ExtentsError::EntityNotFound(id.get()))?;
        self.compute(entity)
    }

    /// 合并所有顶层实体的非空范围；文档无几何时返回空包围盒。
    pub fn document_extents(&self) -> Result<BoundingBox, ExtentsError> {
        let mut bounds = BoundingBox::empty();
        for (_, entity) in self.blocks.entities() {
            let extents = self.compute(entity)?;
            if !extents.is_empty() {
                bounds.add_box(&extents);
            }
        }
        Ok(bounds)
    }
}

fn points_extents(points: impl IntoIterator<Item = Point3>) -> BoundingBox {
    let mut bounds = BoundingBox::empty();
    for point in points {
        bounds.add_point(point);
    }
    bounds
}

/// 圆、圆弧与椭圆共用：中心点三个轴向各加减半径，再外扩半个厚度。
fn radial_extents(center: Point3, radius: f64, thickness: f64) -> BoundingBox {
    let min = Point3::new(center.x() - radius, center.y() - radius, center.z() - radius);
    let max = Point3::new(center.x() + radius, center.y() + radius, center.z() + radius);
    inflate_non_empty(BoundingBox::new(min, max), thickness / 2.0)
}

// 空哨兵盒外扩后会偏离极值，保持原样。
fn inflate_non_empty(mut bounds: BoundingBox, amount: f64) -> BoundingBox {
    if !bounds.is_empty() {
        bounds.inflate(amount);
    }
    bounds
}

fn text_extents(text: &Text) -> BoundingBox {
    let base = text.base_point;
    let width = text.height * text.width_factor * text.value.chars().count() as f64;
    let angle = text.rotation.to_radians();
    let corners = [
        Point3::new(base.x(), base.y() + text.height, 0.0),
        Point3::new(base.x() + width, base.y() + text.height, 0.0),
        Point3::new(base.x() + width, base.y(), 0.0),
    ];

    let mut bounds = BoundingBox::from_point(base);
    for corner in corners {
        bounds.add_point(corner.rotated_2d_about(base, angle));
    }
    bounds
}

fn face_extents(face: &Face3d) -> BoundingBox {
    points_extents(
        EdgeFlags::ALL
            .into_iter()
            .zip(face.vertices)
            .filter(|(flag, _)| face.edge_flags.contains(*flag))
            .map(|(_, vertex)| vertex),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use extents_core::document::{
        Arc, Circle, Ellipse, Hatch, LightWeightPolyline, LightWeightPolylineVertex, Line,
        NurbsCurve, NurbsVertex, Point, PolyfaceMesh, PolyfaceMeshVertex, Polyline, Polyline3d,
        Polyline3dVertex, PolylineVertex, Solid, Vertex,
    };
    use extents_core::geometry::Point2;

    fn assert_point(actual: Point3, x: f64, y: f64, z: f64) {
        assert!(
            (actual.x() - x).abs() < 1e-9 && (actual.y() - y).abs() < 1e-9 && (actual.z() - z).abs() < 1e-9,
            "expected ({x}, {y}, {z}), got {actual:?}"
        );
    }

    fn compute(entity: Entity) -> BoundingBox {
        let document = Document::new();
        ExtentsComputer::new(&document)
            .compute(&entity)
            .expect("extents should compute")
    }

    fn text(value: &str, rotation: f64) -> Entity {
        Entity::Text(Text {
            base_point: Point3::new(0.0, 0.0, 0.0),
            value: value.to_string(),
            height: 1.0,
            width_factor: 1.0,
            rotation,
            layer: "0".to_string(),
        })
    }

    #[test]
    fn line_is_inflated_by_half_thickness() {
        let bounds = compute(Entity::Line(Line {
            start: Point3::new(2.0, 4.0, 1.0),
            end: Point3::new(0.0, 0.0, 0.0),
            thickness: 1.0,
            layer: "0".to_string(),
        }));
        assert_point(bounds.min(), -0.5, -0.5, -0.5);
        assert_point(bounds.max(), 2.5, 4.5, 1.5);
    }

    #[test]
    fn arc_bounds_the_whole_circle() {
        let arc = compute(Entity::Arc(Arc {
            center: Point3::new(1.0, 1.0, 0.0),
            radius: 2.0,
            start_angle: 0.0,
            end_angle: 45.0,
            thickness: 0.0,
            layer: "0".to_string(),
        }));
        let circle = compute(Entity::Circle(Circle {
            center: Point3::new(1.0, 1.0, 0.0),
            radius: 2.0,
            thickness: 0.0,
            layer: "0".to_string(),
        }));
        assert_eq!(arc, circle);
        assert_point(arc.min(), -1.0, -1.0, -2.0);
        assert_point(arc.max(), 3.0, 3.0, 2.0);
    }

    #[test]
    fn ellipse_uses_major_axis_only() {
        let bounds = compute(Entity::Ellipse(Ellipse {
            center: Point3::new(0.0, 0.0, 0.0),
            major_axis: 4.0,
            minor_axis: 1.0,
            rotation: 30.0,
            start_angle: 0.0,
            end_angle: 360.0,
            thickness: 2.0,
            layer: "0".to_string(),
        }));
        assert_point(bounds.min(), -5.0, -5.0, -5.0);
        assert_point(bounds.max(), 5.0, 5.0, 5.0);
    }

    #[test]
    fn point_is_degenerate_box() {
        let bounds = compute(Entity::Point(Point {
            location: Point3::new(3.0, 4.0, 5.0),
            thickness: 0.0,
            layer: "0".to_string(),
        }));
        assert_eq!(bounds, BoundingBox::from_point(Point3::new(3.0, 4.0, 5.0)));
    }

    #[test]
    fn planar_polylines_flatten_z() {
        let polyline = compute(Entity::Polyline(Polyline {
            vertices: vec![
                PolylineVertex::with_bulge(Point2::new(0.0, 0.0), 1.0),
                PolylineVertex::new(Point2::new(4.0, 2.0)),
            ],
            is_closed: false,
            thickness: 2.0,
            layer: "0".to_string(),
        }));
        assert_point(polyline.min(), -1.0, -1.0, -1.0);
        assert_point(polyline.max(), 5.0, 3.0, 1.0);

        let lightweight = compute(Entity::LightWeightPolyline(LightWeightPolyline {
            vertices: vec![
                LightWeightPolylineVertex::new(Point2::new(-1.0, 2.0)),
                LightWeightPolylineVertex::new(Point2::new(3.0, -2.0)),
            ],
            is_closed: true,
            thickness: 0.0,
            layer: "0".to_string(),
        }));
        assert_point(lightweight.min(), -1.0, -2.0, 0.0);
        assert_point(lightweight.max(), 3.0, 2.0, 0.0);
    }

    #[test]
    fn empty_polyline_stays_empty() {
        let bounds = compute(Entity::Polyline(Polyline {
            vertices: Vec::new(),
            is_closed: false,
            thickness: 4.0,
            layer: "0".to_string(),
        }));
        assert_eq!(bounds, BoundingBox::empty());
    }

    #[test]
    fn spatial_polylines_keep_z() {
        let polyline = compute(Entity::Polyline3d(Polyline3d {
            vertices: vec![
                Polyline3dVertex::new(Point3::new(0.0, 0.0, -3.0)),
                Polyline3dVertex::new(Point3::new(1.0, 2.0, 3.0)),
            ],
            is_closed: false,
            layer: "0".to_string(),
        }));
        assert_point(polyline.min(), 0.0, 0.0, -3.0);
        assert_point(polyline.max(), 1.0, 2.0, 3.0);

        let mesh = compute(Entity::PolyfaceMesh(PolyfaceMesh {
            vertices: vec![
                PolyfaceMeshVertex::new(Point3::new(-1.0, 0.0, 0.0)),
                PolyfaceMeshVertex::new(Point3::new(0.0, 1.0, 0.0)),
                PolyfaceMeshVertex::new(Point3::new(0.0, 0.0, 8.0)),
            ],
            faces: Vec::new(),
            layer: "0".to_string(),
        }));
        assert_point(mesh.min(), -1.0, 0.0, 0.0);
        assert_point(mesh.max(), 0.0, 1.0, 8.0);
    }

    #[test]
    fn nurbs_uses_control_polygon() {
        let bounds = compute(Entity::NurbsCurve(NurbsCurve {
            control_points: vec![
                NurbsVertex::new(Point2::new(0.0, 0.0)),
                NurbsVertex::new(Point2::new(5.0, 10.0)),
                NurbsVertex::new(Point2::new(10.0, 0.0)),
            ],
            order: 3,
            layer: "0".to_string(),
        }));
        assert_point(bounds.min(), 0.0, 0.0, 0.0);
        assert_point(bounds.max(), 10.0, 10.0, 0.0);
    }

    #[test]
    fn text_rectangle_follows_rotation() {
        let upright = compute(text("abc", 0.0));
        assert_point(upright.min(), 0.0, 0.0, 0.0);
        assert_point(upright.max(), 3.0, 1.0, 0.0);

        let turned = compute(text("abc", 90.0));
        assert_point(turned.min(), -1.0, 0.0, 0.0);
        assert_point(turned.max(), 0.0, 3.0, 0.0);
    }

    #[test]
    fn face_uses_only_flagged_vertices() {
        let vertices = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 10.0, 5.0),
            Point3::new(0.0, 10.0, 0.0),
        ];
        let flagged = compute(Entity::Face3d(Face3d {
            vertices,
            edge_flags: EdgeFlags::SECOND | EdgeFlags::THIRD,
            layer: "0".to_string(),
        }));
        assert_point(flagged.min(), 10.0, 0.0, 0.0);
        assert_point(flagged.max(), 10.0, 10.0, 5.0);

        let hidden = compute(Entity::Face3d(Face3d {
            vertices,
            edge_flags: EdgeFlags::empty(),
            layer: "0".to_string(),
        }));
        assert!(hidden.is_empty());
    }

    #[test]
    fn solid_uses_full_thickness() {
        let bounds = compute(Entity::Solid(Solid {
            vertices: [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            thickness: 1.0,
            layer: "0".to_string(),
        }));
        assert_point(bounds.min(), -1.0, -1.0, -1.0);
        assert_point(bounds.max(), 2.0, 2.0, 1.0);
    }

    #[test]
    fn standalone_vertices_are_points() {
        let planar = compute(Entity::PolylineVertex(PolylineVertex::new(Point2::new(1.0, 2.0))));
        assert_eq!(planar, BoundingBox::from_point(Point3::new(1.0, 2.0, 0.0)));

        let spatial = compute(Entity::Vertex(Vertex {
            location: Point3::new(1.0, 2.0, 3.0),
            layer: "0".to_string(),
        }));
        assert_eq!(spatial, BoundingBox::from_point(Point3::new(1.0, 2.0, 3.0)));

        let lightweight = compute(Entity::LightWeightPolylineVertex(
            LightWeightPolylineVertex::new(Point2::new(1.0, 2.0)),
        ));
        assert!(lightweight.is_empty());
    }

    #[test]
    fn unsupported_kinds_yield_sentinel() {
        let bounds = compute(Entity::Hatch(Hatch {
            pattern_name: "SOLID".to_string(),
            is_solid: true,
            boundary_paths: vec![vec![Point2::new(0.0, 0.0), Point2::new(5.0, 5.0)]],
            layer: "0".to_string(),
        }));
        assert_eq!(bounds, BoundingBox::empty());
        assert!(bounds.width() < 0.0);
    }

    #[test]
    fn missing_block_contributes_nothing() {
        let document = Document::new();
        let insert = Entity::Insert(Insert {
            block: "GHOST".to_string(),
            insertion_point: Point3::new(1.0, 1.0, 0.0),
            scale: Vector2::new(1.0, 1.0),
            rotation: 0.0,
            layer: "0".to_string(),
        });
        let bounds = ExtentsComputer::new(&document).compute(&insert).unwrap();
        assert!(bounds.is_empty());
    }

    #[test]
    fn insert_scales_then_rotates_about_insertion_point() {
        let mut blocks = HashMap::new();
        blocks.insert(
            "BAR".to_string(),
            BlockDefinition::new(
                "BAR",
                vec![Entity::Line(Line {
                    start: Point3::new(0.0, 0.0, 0.0),
                    end: Point3::new(1.0, 1.0, 0.0),
                    thickness: 0.0,
                    layer: "0".to_string(),
                })],
            ),
        );
        let insert = Entity::Insert(Insert {
            block: "BAR".to_string(),
            insertion_point: Point3::new(5.0, 5.0, 0.0),
            scale: Vector2::new(2.0, 1.0),
            rotation: 90.0,
            layer: "0".to_string(),
        });

        let bounds = ExtentsComputer::new(&blocks).compute(&insert).unwrap();
        // 缩放后局部范围为 [0,2]×[0,1]，再绕插入点旋转 90°。
        assert_point(bounds.min(), 4.0, 5.0, 0.0);
        assert_point(bounds.max(), 5.0, 7.0, 0.0);
    }

    #[test]
    fn computer_is_reusable_and_copyable() {
        let document = Document::new();
        let computer = ExtentsComputer::new(&document).with_max_block_depth(3);
        let copy = computer;
        assert_eq!(computer.max_block_depth(), 3);
        assert_eq!(copy.max_block_depth(), 3);
        assert_eq!(
            computer.entity_extents(EntityId::new(7)),
            Err(ExtentsError::EntityNotFound(7))
        );
    }
}
