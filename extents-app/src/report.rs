use std::fmt::Write as _;

use extents_config::ReportFormat;
use extents_core::document::{Document, EntityKind};
use extents_core::geometry::{BoundingBox, Point3};
use extents_engine::ExtentsComputer;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;

/// 单个实体的范围记录；不贡献几何的实体 `bounds` 为 `None`。
#[derive(Debug, Clone, Serialize)]
pub struct EntityExtents {
    pub id: u64,
    pub kind: EntityKind,
    pub dxf_name: &'static str,
    pub layer: String,
    pub bounds: Option<BoundsSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundsSnapshot {
    pub min: [f64; 3],
    pub max: [f64; 3],
    pub width: f64,
    pub height: f64,
}

impl BoundsSnapshot {
    fn capture(bounds: &BoundingBox) -> Option<Self> {
        if bounds.is_empty() {
            return None;
        }
        Some(Self {
            min: coords(bounds.min()),
            max: coords(bounds.max()),
            width: bounds.width(),
            height: bounds.height(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtentsReport {
    pub entities: Vec<EntityExtents>,
    pub document: Option<BoundsSnapshot>,
}

impl ExtentsReport {
    pub fn build(document: &Document, max_block_depth: usize) -> Result<Self, AppError> {
        let computer = ExtentsComputer::new(document).with_max_block_depth(max_block_depth);
        let entities = computer
            .compute_all(document.entities())?
            .into_iter()
            .zip(document.entities())
            .map(|((id, bounds), (_, entity))| EntityExtents {
                id: id.get(),
                kind: entity.kind(),
                dxf_name: entity.kind().dxf_name(),
                layer: entity.layer_name().to_string(),
                bounds: BoundsSnapshot::capture(&bounds),
            })
            .collect::<Vec<_>>();
        let document_bounds = computer.document_extents()?;

        let contributing = entities.iter().filter(|e| e.bounds.is_some()).count();
        info!(
            entity_count = entities.len(),
            contributing,
            "范围计算完成"
        );

        Ok(Self {
            entities,
            document: BoundsSnapshot::capture(&document_bounds),
        })
    }

    pub fn render(&self, format: ReportFormat, precision: usize) -> Result<String, AppError> {
        match format {
            ReportFormat::Text => Ok(self.render_text(precision)),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    fn render_text(&self, precision: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "实体范围：");
        for entry in &self.entities {
            let _ = write!(
                out,
                "  - #{} {} ({}), Layer={}: ",
                entry.id, entry.kind, entry.dxf_name, entry.layer
            );
            match &entry.bounds {
                Some(bounds) => {
                    let _ = writeln!(out, "{}", format_bounds(bounds, precision));
                }
                None => {
                    let _ = writeln!(out, "<无几何>");
                }
            }
        }
        match &self.document {
            Some(bounds) => {
                let _ = writeln!(out, "图纸范围：{}", format_bounds(bounds, precision));
            }
            None => {
                let _ = writeln!(out, "图纸范围：<空>");
            }
        }
        out
    }
}

fn coords(point: Point3) -> [f64; 3] {
    [point.x(), point.y(), point.z()]
}

fn format_bounds(bounds: &BoundsSnapshot, precision: usize) -> String {
    format!(
        "min={}, max={}, 宽={:.p$}, 高={:.p$}",
        format_coords(bounds.min, precision),
        format_coords(bounds.max, precision),
        bounds.width,
        bounds.height,
        p = precision
    )
}

fn format_coords(value: [f64; 3], precision: usize) -> String {
    format!(
        "({:.p$}, {:.p$}, {:.p$})",
        value[0],
        value[1],
        value[2],
        p = precision
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use extents_core::document::{BlockDefinition, Entity, Hatch, Insert};
    use extents_core::geometry::Vector2;

    fn sample_document() -> Document {
        let mut doc = Document::new();
        doc.add_line(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, 0.0), "0");
        doc.add_entity(Entity::Hatch(Hatch {
            pattern_name: "SOLID".to_string(),
            is_solid: true,
            boundary_paths: Vec::new(),
            layer: "FILL".to_string(),
        }));
        doc
    }

    #[test]
    fn text_report_lists_each_entity() {
        let report = ExtentsReport::build(&sample_document(), 8).expect("build report");
        assert_eq!(report.entities.len(), 2);
        assert!(report.entities[1].bounds.is_none());

        let text = report.render(ReportFormat::Text, 1).expect("render text");
        assert!(text.contains("#0 Line (LINE), Layer=0: min=(0.0, 0.0, 0.0), max=(2.0, 4.0, 0.0)"));
        assert!(text.contains("#1 Hatch (HATCH), Layer=FILL: <无几何>"));
        assert!(text.contains("图纸范围：min=(0.0, 0.0, 0.0), max=(2.0, 4.0, 0.0), 宽=2.0, 高=4.0"));
    }

    #[test]
    fn json_report_omits_empty_bounds() {
        let report = ExtentsReport::build(&sample_document(), 8).expect("build report");
        let json = report.render(ReportFormat::Json, 3).expect("render json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["entities"][0]["kind"], "line");
        assert_eq!(value["entities"][0]["bounds"]["max"][1], 4.0);
        assert!(value["entities"][1]["bounds"].is_null());
        assert_eq!(value["document"]["width"], 2.0);
    }

    #[test]
    fn rows_follow_document_order() {
        let mut doc = sample_document();
        doc.add_circle(Point3::new(5.0, 5.0, 0.0), 1.0, "GEOM");

        let report = ExtentsReport::build(&doc, 8).expect("build report");
        let rows: Vec<(u64, EntityKind, &str)> = report
            .entities
            .iter()
            .map(|row| (row.id, row.kind, row.layer.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![
                (0, EntityKind::Line, "0"),
                (1, EntityKind::Hatch, "FILL"),
                (2, EntityKind::Circle, "GEOM"),
            ]
        );
    }

    #[test]
    fn cyclic_blocks_surface_as_errors() {
        let mut doc = Document::new();
        doc.add_block_definition(BlockDefinition::new(
            "SELF",
            vec![Entity::Insert(Insert {
                block: "SELF".to_string(),
                insertion_point: Point3::new(0.0, 0.0, 0.0),
                scale: Vector2::new(1.0, 1.0),
                rotation: 0.0,
                layer: "0".to_string(),
            })],
        ));
        doc.add_insert("SELF", Point3::new(0.0, 0.0, 0.0), Vector2::new(1.0, 1.0), 0.0, "0");

        let err = ExtentsReport::build(&doc, 8).unwrap_err();
        assert!(matches!(err, AppError::Extents(_)));
    }
}
