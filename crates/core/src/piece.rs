//! Piece module - shape templates, the validated catalog, and live instances.
//!
//! Shapes are catalog data, not code: a template is a named set of relative
//! cell offsets plus a spawn offset that lines its rotation pivot up with the
//! common spawn reference point. Catalogs come from Rust data or JSON.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use blox_types::{KindId, Rotation, Vec2, MAX_PIECE_CELLS};

/// Immutable shape definition for one piece kind.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceTemplate {
    /// Display/diagnostic name, e.g. "i" or "square".
    pub name: String,
    /// Relative cell offsets around the rotation pivot. Integer 2D, not
    /// required to be centered at the origin.
    pub cells: Vec<(i32, i32)>,
    /// Offset added to the spawn reference point so the pivot lands where
    /// this shape expects it.
    pub spawn_offset: Vec2,
    /// Opaque rendering hint for the drop preview; passed through untouched.
    pub ghost_hint: Option<String>,
}

/// Serialized form of a template. Kind ids are catalog positions, so the
/// data carries no explicit id.
#[derive(Debug, Serialize, Deserialize)]
struct TemplateSpec {
    name: String,
    cells: Vec<(i32, i32)>,
    spawn_offset: (f32, f32),
    #[serde(default)]
    ghost_hint: Option<String>,
}

impl From<TemplateSpec> for PieceTemplate {
    fn from(spec: TemplateSpec) -> Self {
        PieceTemplate {
            name: spec.name,
            cells: spec.cells,
            spawn_offset: Vec2::new(spec.spawn_offset.0, spec.spawn_offset.1),
            ghost_hint: spec.ghost_hint,
        }
    }
}

impl From<&PieceTemplate> for TemplateSpec {
    fn from(template: &PieceTemplate) -> Self {
        TemplateSpec {
            name: template.name.clone(),
            cells: template.cells.clone(),
            spawn_offset: (template.spawn_offset.x, template.spawn_offset.y),
            ghost_hint: template.ghost_hint.clone(),
        }
    }
}

/// Catalog construction failures. These are configuration mistakes and are
/// reported before any session starts.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    Empty,
    NoCells { name: String },
    TooManyCells { name: String, count: usize },
    TooManyKinds { count: usize },
    Parse(String),
}

impl core::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CatalogError::Empty => write!(f, "piece catalog must contain at least one template"),
            CatalogError::NoCells { name } => {
                write!(f, "piece template '{name}' has no cells")
            }
            CatalogError::TooManyCells { name, count } => write!(
                f,
                "piece template '{name}' has {count} cells, maximum is {MAX_PIECE_CELLS}"
            ),
            CatalogError::TooManyKinds { count } => {
                write!(f, "piece catalog has {count} templates, maximum is 256")
            }
            CatalogError::Parse(msg) => write!(f, "piece catalog parse error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Read-only set of piece templates. `KindId` values index into it.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceCatalog {
    templates: Vec<PieceTemplate>,
}

impl PieceCatalog {
    /// Validate and seal a set of templates.
    pub fn new(templates: Vec<PieceTemplate>) -> Result<Self, CatalogError> {
        if templates.is_empty() {
            return Err(CatalogError::Empty);
        }
        if templates.len() > 256 {
            return Err(CatalogError::TooManyKinds {
                count: templates.len(),
            });
        }
        for template in &templates {
            if template.cells.is_empty() {
                return Err(CatalogError::NoCells {
                    name: template.name.clone(),
                });
            }
            if template.cells.len() > MAX_PIECE_CELLS {
                return Err(CatalogError::TooManyCells {
                    name: template.name.clone(),
                    count: template.cells.len(),
                });
            }
        }
        Ok(Self { templates })
    }

    /// Parse a catalog from its JSON form: an array of template objects.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let specs: Vec<TemplateSpec> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(specs.into_iter().map(PieceTemplate::from).collect())
    }

    /// Serialize the catalog back to JSON, for authoring tools.
    pub fn to_json_string(&self) -> String {
        let specs: Vec<TemplateSpec> = self.templates.iter().map(TemplateSpec::from).collect();
        serde_json::to_string_pretty(&specs).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn template(&self, kind: KindId) -> &PieceTemplate {
        &self.templates[kind.index()]
    }

    pub fn kinds(&self) -> impl Iterator<Item = KindId> {
        (0..self.templates.len() as u8).map(KindId)
    }

    /// The seven classic tetrominoes. Spawn offsets are chosen so pieces land
    /// on whole-cell positions in the top rows of a field with the spawn
    /// reference at (W/2 - 0.5, H - 0.5).
    pub fn standard() -> Self {
        fn template(
            name: &str,
            cells: &[(i32, i32)],
            spawn_offset: (f32, f32),
        ) -> PieceTemplate {
            PieceTemplate {
                name: name.to_string(),
                cells: cells.to_vec(),
                spawn_offset: Vec2::new(spawn_offset.0, spawn_offset.1),
                ghost_hint: Some(format!("ghost/{name}")),
            }
        }

        let templates = vec![
            template("i", &[(-2, 0), (-1, 0), (0, 0), (1, 0)], (0.5, -0.5)),
            template("o", &[(0, 0), (1, 0), (0, 1), (1, 1)], (-0.5, -1.5)),
            template("t", &[(-1, 0), (0, 0), (1, 0), (0, 1)], (-0.5, -1.5)),
            template("s", &[(-1, 0), (0, 0), (0, 1), (1, 1)], (-0.5, -1.5)),
            template("z", &[(-1, 1), (0, 1), (0, 0), (1, 0)], (-0.5, -1.5)),
            template("j", &[(-1, 1), (-1, 0), (0, 0), (1, 0)], (-0.5, -1.5)),
            template("l", &[(1, 1), (-1, 0), (0, 0), (1, 0)], (-0.5, -1.5)),
        ];

        // Static data within the validated bounds.
        Self::new(templates).expect("standard catalog is valid")
    }
}

/// A live, positioned, rotatable piece. Exists from spawn until it locks into
/// the grid or is discarded by a hold swap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceInstance {
    pub kind: KindId,
    /// Continuous position of the rotation pivot, grid-snapped by rounding.
    pub position: Vec2,
    pub rotation: Rotation,
}

impl PieceInstance {
    pub fn new(kind: KindId, position: Vec2) -> Self {
        Self {
            kind,
            position,
            rotation: Rotation::ZERO,
        }
    }

    /// Absolute grid coordinates currently occupied by this piece's cells:
    /// round(position + rotation * offset) per template cell, ties away from
    /// zero.
    pub fn cell_positions(
        &self,
        template: &PieceTemplate,
    ) -> ArrayVec<(i32, i32), MAX_PIECE_CELLS> {
        let mut cells = ArrayVec::new();
        for &offset in &template.cells {
            let (rx, ry) = self.rotation.apply(offset);
            let x = (self.position.x + rx as f32).round() as i32;
            let y = (self.position.y + ry as f32).round() as i32;
            cells.push((x, y));
        }
        cells
    }
}
