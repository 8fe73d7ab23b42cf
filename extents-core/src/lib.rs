pub mod geometry {
    use glam::{DVec2, DVec3};
    use serde::{Deserialize, Serialize};

    /// 二维点，内部以 `glam::DVec2` 表示。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point2(pub DVec2);

    impl Point2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        /// 补上 Z 分量得到三维点。二维实体统一以 `z = 0` 参与范围计算。
        #[inline]
        pub fn extend(self, z: f64) -> Point3 {
            Point3(self.0.extend(z))
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }
    }

    impl From<DVec2> for Point2 {
        fn from(value: DVec2) -> Self {
            Self(value)
        }
    }

    /// 二维向量，块参照的缩放系数也以此表示。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Vector2(pub DVec2);

    impl Vector2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }
    }

    impl From<DVec2> for Vector2 {
        fn from(value: DVec2) -> Self {
            Self(value)
        }
    }

    /// 三维点。所有范围计算都在三维空间中进行。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point3(pub DVec3);

    impl Point3 {
        #[inline]
        pub fn new(x: f64, y: f64, z: f64) -> Self {
            Self(DVec3::new(x, y, z))
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn z(self) -> f64 {
            self.0.z
        }

        #[inline]
        pub fn as_vec3(self) -> DVec3 {
            self.0
        }

        /// 仅平移 X/Y，Z 保持不变。
        #[inline]
        pub fn translated_2d(self, offset: Vector2) -> Self {
            Self::new(self.x() + offset.x(), self.y() + offset.y(), self.z())
        }

        /// 绕 `origin` 在 XY 平面内旋转 `radians`，Z 保持不变。
        pub fn rotated_2d_about(self, origin: Point3, radians: f64) -> Self {
            let pivot = origin.0.truncate();
            let local = self.0.truncate() - pivot;
            let rotated = pivot + DVec2::from_angle(radians).rotate(local);
            Self::new(rotated.x, rotated.y, self.z())
        }

        /// 以 `origin` 为基点做 XY 非等比缩放，Z 保持不变。
        pub fn scaled_2d_about(self, origin: Point3, scale: Vector2) -> Self {
            let pivot = origin.0.truncate();
            let scaled = pivot + (self.0.truncate() - pivot) * scale.0;
            Self::new(scaled.x, scaled.y, self.z())
        }
    }

    impl From<DVec3> for Point3 {
        fn from(value: DVec3) -> Self {
            Self(value)
        }
    }

    /// 三维轴对齐包围盒。
    ///
    /// 空包围盒以 `f64::MAX` / `f64::MIN` 作为哨兵值，首个加入的点即可建立正确的范围；
    /// 未加入任何点时宽高为负数。负厚度外扩后同样可能出现 `min > max`，
    /// 但那仍是有效几何，只有哨兵状态才算空。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct BoundingBox {
        min: Point3,
        max: Point3,
    }

    impl BoundingBox {
        /// 以显式角点构造，不做合法性校验。
        #[inline]
        pub fn new(min: Point3, max: Point3) -> Self {
            Self { min, max }
        }

        #[inline]
        pub fn empty() -> Self {
            Self {
                min: Point3::new(f64::MAX, f64::MAX, f64::MAX),
                max: Point3::new(f64::MIN, f64::MIN, f64::MIN),
            }
        }

        #[inline]
        pub fn from_point(point: Point3) -> Self {
            Self::new(point, point)
        }

        /// 是否仍为未加入任何点的哨兵盒。
        #[inline]
        pub fn is_empty(&self) -> bool {
            *self == Self::empty()
        }

        #[inline]
        pub fn min(&self) -> Point3 {
            self.min
        }

        #[inline]
        pub fn max(&self) -> Point3 {
            self.max
        }

        #[inline]
        pub fn width(&self) -> f64 {
            self.max.x() - self.min.x()
        }

        /// Y 方向跨度（不是 Z）。
        #[inline]
        pub fn height(&self) -> f64 {
            self.max.y() - self.min.y()
        }

        pub fn add_point(&mut self, point: Point3) {
            self.min = Point3(self.min.as_vec3().min(point.as_vec3()));
            self.max = Point3(self.max.as_vec3().max(point.as_vec3()));
        }

        /// 等价于依次加入 `other` 的两个角点。对空哨兵盒调用会把范围撑到极值，
        /// 合并前需先用 [`BoundingBox::is_empty`] 过滤。
        pub fn add_box(&mut self, other: &BoundingBox) {
            self.add_point(other.min);
            self.add_point(other.max);
        }

        /// 三个轴向同时外扩 `amount`（负值收缩）。
        pub fn inflate(&mut self, amount: f64) {
            let delta = glam::DVec3::splat(amount);
            self.min = Point3(self.min.as_vec3() - delta);
            self.max = Point3(self.max.as_vec3() + delta);
        }
    }

    impl Default for BoundingBox {
        fn default() -> Self {
            Self::empty()
        }
    }

}

pub mod document {
    use std::collections::HashMap;
    use std::fmt;
    use std::ops::BitOr;

    use serde::{Deserialize, Serialize};

    use crate::geometry::{Point2, Point3, Vector2};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct EntityId(u64);

    impl EntityId {
        #[inline]
        pub fn new(raw: u64) -> Self {
            Self(raw)
        }

        /// 提供原始数值，便于序列化或日志输出。
        #[inline]
        pub fn get(self) -> u64 {
            self.0
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Layer {
        pub name: String,
    }

    impl Layer {
        #[inline]
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
            }
        }
    }

    /// 实体类型判别值，对应封闭的实体集合。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum EntityKind {
        Line,
        Circle,
        Arc,
        Ellipse,
        Point,
        Polyline,
        LightWeightPolyline,
        Polyline3d,
        PolyfaceMesh,
        NurbsCurve,
        Text,
        Face3d,
        Solid,
        Insert,
        PolylineVertex,
        Polyline3dVertex,
        PolyfaceMeshVertex,
        Vertex,
        LightWeightPolylineVertex,
        PolyfaceMeshFace,
        Hatch,
        Attribute,
        AttributeDefinition,
        Dimension,
    }

    impl EntityKind {
        /// DXF 中的实体类型名。多段线的各变体共用 `POLYLINE`，各类顶点共用 `VERTEX`。
        pub fn dxf_name(self) -> &'static str {
            match self {
                EntityKind::Line => "LINE",
                EntityKind::Circle => "CIRCLE",
                EntityKind::Arc => "ARC",
                EntityKind::Ellipse => "ELLIPSE",
                EntityKind::Point => "POINT",
                EntityKind::Polyline | EntityKind::Polyline3d | EntityKind::PolyfaceMesh => {
                    "POLYLINE"
                }
                EntityKind::LightWeightPolyline => "LWPOLYLINE",
                EntityKind::NurbsCurve => "SPLINE",
                EntityKind::Text => "TEXT",
                EntityKind::Face3d => "3DFACE",
                EntityKind::Solid => "SOLID",
                EntityKind::Insert => "INSERT",
                EntityKind::PolylineVertex
                | EntityKind::Polyline3dVertex
                | EntityKind::PolyfaceMeshVertex
                | EntityKind::Vertex
                | EntityKind::LightWeightPolylineVertex
                | EntityKind::PolyfaceMeshFace => "VERTEX",
                EntityKind::Hatch => "HATCH",
                EntityKind::Attribute => "ATTRIB",
                EntityKind::AttributeDefinition => "ATTDEF",
                EntityKind::Dimension => "DIMENSION",
            }
        }
    }

    impl fmt::Display for EntityKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub enum Entity {
        Line(Line),
        Circle(Circle),
        Arc(Arc),
        Ellipse(Ellipse),
        Point(Point),
        Polyline(Polyline),
        LightWeightPolyline(LightWeightPolyline),
        Polyline3d(Polyline3d),
        PolyfaceMesh(PolyfaceMesh),
        NurbsCurve(NurbsCurve),
        Text(Text),
        Face3d(Face3d),
        Solid(Solid),
        Insert(Insert),
        PolylineVertex(PolylineVertex),
        Polyline3dVertex(Polyline3dVertex),
        PolyfaceMeshVertex(PolyfaceMeshVertex),
        Vertex(Vertex),
        LightWeightPolylineVertex(LightWeightPolylineVertex),
        PolyfaceMeshFace(PolyfaceMeshFace),
        Hatch(Hatch),
        Attribute(Attribute),
        AttributeDefinition(AttributeDefinition),
        Dimension(Dimension),
    }

    impl Entity {
        pub fn kind(&self) -> EntityKind {
            match self {
                Entity::Line(_) => EntityKind::Line,
                Entity::Circle(_) => EntityKind::Circle,
                Entity::Arc(_) => EntityKind::Arc,
                Entity::Ellipse(_) => EntityKind::Ellipse,
                Entity::Point(_) => EntityKind::Point,
                Entity::Polyline(_) => EntityKind::Polyline,
                Entity::LightWeightPolyline(_) => EntityKind::LightWeightPolyline,
                Entity::Polyline3d(_) => EntityKind::Polyline3d,
                Entity::PolyfaceMesh(_) => EntityKind::PolyfaceMesh,
                Entity::NurbsCurve(_) => EntityKind::NurbsCurve,
                Entity::Text(_) => EntityKind::Text,
                Entity::Face3d(_) => EntityKind::Face3d,
                Entity::Solid(_) => EntityKind::Solid,
                Entity::Insert(_) => EntityKind::Insert,
                Entity::PolylineVertex(_) => EntityKind::PolylineVertex,
                Entity::Polyline3dVertex(_) => EntityKind::Polyline3dVertex,
                Entity::PolyfaceMeshVertex(_) => EntityKind::PolyfaceMeshVertex,
                Entity::Vertex(_) => EntityKind::Vertex,
                Entity::LightWeightPolylineVertex(_) => EntityKind::LightWeightPolylineVertex,
                Entity::PolyfaceMeshFace(_) => EntityKind::PolyfaceMeshFace,
                Entity::Hatch(_) => EntityKind::Hatch,
                Entity::Attribute(_) => EntityKind::Attribute,
                Entity::AttributeDefinition(_) => EntityKind::AttributeDefinition,
                Entity::Dimension(_) => EntityKind::Dimension,
            }
        }

        pub fn layer_name(&self) -> &str {
            match self {
                Entity::Line(line) => &line.layer,
                Entity::Circle(circle) => &circle.layer,
                Entity::Arc(arc) => &arc.layer,
                Entity::Ellipse(ellipse) => &ellipse.layer,
                Entity::Point(point) => &point.layer,
                Entity::Polyline(polyline) => &polyline.layer,
                Entity::LightWeightPolyline(polyline) => &polyline.layer,
                Entity::Polyline3d(polyline) => &polyline.layer,
                Entity::PolyfaceMesh(mesh) => &mesh.layer,
                Entity::NurbsCurve(curve) => &curve.layer,
                Entity::Text(text) => &text.layer,
                Entity::Face3d(face) => &face.layer,
                Entity::Solid(solid) => &solid.layer,
                Entity::Insert(insert) => &insert.layer,
                Entity::PolylineVertex(vertex) => &vertex.layer,
                Entity::Polyline3dVertex(vertex) => &vertex.layer,
                Entity::PolyfaceMeshVertex(vertex) => &vertex.layer,
                Entity::Vertex(vertex) => &vertex.layer,
                Entity::LightWeightPolylineVertex(vertex) => &vertex.layer,
                Entity::PolyfaceMeshFace(face) => &face.layer,
                Entity::Hatch(hatch) => &hatch.layer,
                Entity::Attribute(attribute) => &attribute.layer,
                Entity::AttributeDefinition(definition) => &definition.layer,
                Entity::Dimension(dimension) => &dimension.layer,
            }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Line {
        pub start: Point3,
        pub end: Point3,
        pub thickness: f64,
        pub layer: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Circle {
        pub center: Point3,
        pub radius: f64,
        pub thickness: f64,
        pub layer: String,
    }

    /// 圆弧实体，角度以度为单位（DXF 约定）。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Arc {
        pub center: Point3,
        pub radius: f64,
        pub start_angle: f64,
        pub end_angle: f64,
        pub thickness: f64,
        pub layer: String,
    }

    /// 椭圆实体：主/次轴为长度，`rotation` 为主轴方向角（度）。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Ellipse {
        pub center: Point3,
        pub major_axis: f64,
        pub minor_axis: f64,
        pub rotation: f64,
        pub start_angle: f64,
        pub end_angle: f64,
        pub thickness: f64,
        pub layer: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Point {
        pub location: Point3,
        pub thickness: f64,
        pub layer: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PolylineVertex {
        pub location: Point2,
        pub bulge: f64,
        pub layer: String,
    }

    impl PolylineVertex {
        #[inline]
        pub fn new(location: Point2) -> Self {
            Self::with_bulge(location, 0.0)
        }

        #[inline]
        pub fn with_bulge(location: Point2, bulge: f64) -> Self {
            Self {
                location,
                bulge,
                layer: "0".to_string(),
            }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Polyline {
        pub vertices: Vec<PolylineVertex>,
        pub is_closed: bool,
        pub thickness: f64,
        pub layer: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct LightWeightPolylineVertex {
        pub location: Point2,
        pub bulge: f64,
        pub layer: String,
    }

    impl LightWeightPolylineVertex {
        #[inline]
        pub fn new(location: Point2) -> Self {
            Self {
                location,
                bulge: 0.0,
                layer: "0".to_string(),
            }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct LightWeightPolyline {
        pub vertices: Vec<LightWeightPolylineVertex>,
        pub is_closed: bool,
        pub thickness: f64,
        pub layer: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Polyline3dVertex {
        pub location: Point3,
        pub layer: String,
    }

    impl Polyline3dVertex {
        #[inline]
        pub fn new(location: Point3) -> Self {
            Self {
                location,
                layer: "0".to_string(),
            }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Polyline3d {
        pub vertices: Vec<Polyline3dVertex>,
        pub is_closed: bool,
        pub layer: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PolyfaceMeshVertex {
        pub location: Point3,
        pub layer: String,
    }

    impl PolyfaceMeshVertex {
        #[inline]
        pub fn new(location: Point3) -> Self {
            Self {
                location,
                layer: "0".to_string(),
            }
        }
    }

    /// 多面网格的面记录，顶点索引从 1 开始，负值表示该边不可见。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PolyfaceMeshFace {
        pub vertex_indexes: Vec<i16>,
        pub layer: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PolyfaceMesh {
        pub vertices: Vec<PolyfaceMeshVertex>,
        pub faces: Vec<PolyfaceMeshFace>,
        pub layer: String,
    }

    #[derive(Debug, Clone, Copy, Serialize, Deserialize)]
    pub struct NurbsVertex {
        pub location: Point2,
        pub weight: f64,
    }

    impl NurbsVertex {
        #[inline]
        pub fn new(location: Point2) -> Self {
            Self {
                location,
                weight: 1.0,
            }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct NurbsCurve {
        pub control_points: Vec<NurbsVertex>,
        pub order: u16,
        pub layer: String,
    }

    /// 单行文字。`rotation` 以度为单位，宽度按 `height × width_factor × 字符数` 估算。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Text {
        pub base_point: Point3,
        pub value: String,
        pub height: f64,
        pub width_factor: f64,
        pub rotation: f64,
        pub layer: String,
    }

    /// 3DFACE 的边标记（DXF 组码 70），每一位对应一个顶点。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct EdgeFlags(u8);

    impl EdgeFlags {
        pub const FIRST: EdgeFlags = EdgeFlags(1);
        pub const SECOND: EdgeFlags = EdgeFlags(2);
        pub const THIRD: EdgeFlags = EdgeFlags(4);
        pub const FOURTH: EdgeFlags = EdgeFlags(8);
        pub const ALL: [EdgeFlags; 4] = [Self::FIRST, Self::SECOND, Self::THIRD, Self::FOURTH];

        #[inline]
        pub fn empty() -> Self {
            Self(0)
        }

        /// 从原始组码值构造，忽略高位。
        #[inline]
        pub fn from_bits_truncate(bits: u8) -> Self {
            Self(bits & 0b1111)
        }

        #[inline]
        pub fn bits(self) -> u8 {
            self.0
        }

        #[inline]
        pub fn contains(self, other: EdgeFlags) -> bool {
            self.0 & other.0 == other.0
        }

        #[inline]
        pub fn is_empty(self) -> bool {
            self.0 == 0
        }
    }

    impl BitOr for EdgeFlags {
        type Output = EdgeFlags;

        fn bitor(self, rhs: Self) -> Self::Output {
            Self(self.0 | rhs.0)
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Face3d {
        pub vertices: [Point3; 4],
        pub edge_flags: EdgeFlags,
        pub layer: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Solid {
        pub vertices: [Point3; 4],
        pub thickness: f64,
        pub layer: String,
    }

    /// 块参照。块定义通过名称在文档的块表中查找，参照本身不持有定义副本。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Insert {
        pub block: String,
        pub insertion_point: Point3,
        pub scale: Vector2,
        /// 旋转角，单位为度。
        pub rotation: f64,
        pub layer: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Vertex {
        pub location: Point3,
        pub layer: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Hatch {
        pub pattern_name: String,
        pub is_solid: bool,
        pub boundary_paths: Vec<Vec<Point2>>,
        pub layer: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Attribute {
        pub tag: String,
        pub value: String,
        pub position: Point3,
        pub height: f64,
        pub layer: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AttributeDefinition {
        pub tag: String,
        pub prompt: Option<String>,
        pub default_value: String,
        pub position: Point3,
        pub height: f64,
        pub layer: String,
    }

    #[derive(Debug, Clone, Copy, Serialize, Deserialize)]
    pub enum DimensionKind {
        Linear,
        Aligned,
        Angular,
        Diameter,
        Radius,
        Angular3Point,
        Ordinate,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Dimension {
        pub kind: DimensionKind,
        pub definition_point: Point3,
        pub text_midpoint: Point3,
        pub measurement: Option<f64>,
        pub layer: String,
    }

    /// 块定义：一组按顺序排列的子实体，被所有同名块参照共享。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct BlockDefinition {
        pub name: String,
        pub entities: Vec<Entity>,
    }

    impl BlockDefinition {
        pub fn new(name: impl Into<String>, entities: Vec<Entity>) -> Self {
            Self {
                name: name.into(),
                entities,
            }
        }
    }

    #[derive(Debug, Default, Clone, Serialize, Deserialize)]
    pub struct Document {
        layers: HashMap<String, Layer>,
        entities: Vec<(EntityId, Entity)>,
        next_entity_id: u64,
        blocks: HashMap<String, BlockDefinition>,
    }

    impl Document {
        pub fn new() -> Self {
            let mut doc = Self::default();
            doc.ensure_layer("0");
            doc
        }

        pub fn ensure_layer(&mut self, name: impl AsRef<str>) {
            let key = name.as_ref();
            self.layers
                .entry(key.to_string())
                .or_insert_with(|| Layer::new(key));
        }

        pub fn add_entity(&mut self, entity: Entity) -> EntityId {
            self.ensure_layer(entity.layer_name());
            let id = self.next_id();
            self.entities.push((id, entity));
            id
        }

        pub fn add_line(&mut self, start: Point3, end: Point3, layer: impl Into<String>) -> EntityId {
            self.add_entity(Entity::Line(Line {
                start,
                end,
                thickness: 0.0,
                layer: layer.into(),
            }))
        }

        pub fn add_circle(
            &mut self,
            center: Point3,
            radius: f64,
            layer: impl Into<String>,
        ) -> EntityId {
            self.add_entity(Entity::Circle(Circle {
                center,
                radius,
                thickness: 0.0,
                layer: layer.into(),
            }))
        }

        pub fn add_insert(
            &mut self,
            block: impl Into<String>,
            insertion_point: Point3,
            scale: Vector2,
            rotation: f64,
            layer: impl Into<String>,
        ) -> EntityId {
            self.add_entity(Entity::Insert(Insert {
                block: block.into(),
                insertion_point,
                scale,
                rotation,
                layer: layer.into(),
            }))
        }

        /// 注册块定义；同名定义会被替换。
        pub fn add_block_definition(&mut self, definition: BlockDefinition) {
            for entity in &definition.entities {
                self.ensure_layer(entity.layer_name());
            }
            self.blocks.insert(definition.name.clone(), definition);
        }

        #[inline]
        pub fn block(&self, name: &str) -> Option<&BlockDefinition> {
            self.blocks.get(name)
        }

        #[inline]
        pub fn blocks(&self) -> impl Iterator<Item = &BlockDefinition> {
            self.blocks.values()
        }

        #[inline]
        pub fn layers(&self) -> impl Iterator<Item = &Layer> {
            self.layers.values()
        }

        #[inline]
        pub fn entities(&self) -> impl Iterator<Item = &(EntityId, Entity)> {
            self.entities.iter()
        }

        pub fn entity(&self, id: EntityId) -> Option<&Entity> {
            self.entities
                .iter()
                .find_map(|(entity_id, entity)| (*entity_id == id).then_some(entity))
        }

        #[inline]
        fn next_id(&mut self) -> EntityId {
            let id = self.next_entity_id;
            self.next_entity_id += 1;
            EntityId(id)
        }
    }

}
