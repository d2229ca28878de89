use thiserror::Error;

/// Configuration rejected before any rebuild is attempted.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),
    #[error("world bounds are degenerate on the {axis} axis (min {min}, max {max})")]
    DegenerateBounds { axis: char, min: f32, max: f32 },
    #[error("chunks_per_object must be at least 1")]
    ZeroChunksPerObject,
    #[error("grid of {0} chunks exceeds the addressable chunk key range")]
    GridTooLarge(u64),
    #[error("{primitives} primitives at {chunks_per_object} chunks each exceed the addressable entry range")]
    CapacityTooLarge {
        primitives: usize,
        chunks_per_object: u32,
    },
    #[error("sphere {index} has invalid radius {radius}")]
    InvalidRadius { index: usize, radius: f32 },
    #[error("object {object} has triangle range {start}..{end} outside 0..{num_triangles}")]
    InvalidTriangleRange {
        object: usize,
        start: i32,
        end: i32,
        num_triangles: usize,
    },
    #[error("triangle {triangle} names parent object {parent} but {num_objects} objects exist")]
    InvalidParent {
        triangle: usize,
        parent: i32,
        num_objects: usize,
    },
    #[error("failed to read scene description: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scene description: {0}")]
    Parse(#[from] serde_json::Error),
}
