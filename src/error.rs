use thiserror::Error;

/// Configuration rejected while building a [`HexGrid`](crate::grid::HexGrid).
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("grid needs at least one tile, got {x}×{z}")]
    EmptyGrid { x: u32, z: u32 },
    #[error("tiles need at least one cell, got {x}×{z}")]
    EmptyChunk { x: u32, z: u32 },
    #[error("outer radius must be positive, got {0}")]
    InvalidRadius(f32),
    #[error("solid factor must lie in (0, 1], got {0}")]
    InvalidSolidFactor(f32),
    #[error("terraces per slope must be at least one")]
    NoTerraces,
    #[error("hash grid size must be positive")]
    EmptyHashGrid,
}
