use std::fmt;

/// Which index table a face corner points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexTable {
    Positions,
    Texcoords,
    Normals,
}

impl fmt::Display for IndexTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexTable::Positions => write!(f, "positions"),
            IndexTable::Texcoords => write!(f, "texcoords"),
            IndexTable::Normals => write!(f, "normals"),
        }
    }
}

/// Load-time or compute-time validation failure.
///
/// All variants are authoring-time bugs (bad mesh file, degenerate camera
/// configuration); callers abort the load or render attempt with the
/// diagnostic instead of retrying.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A face corner indexes past the end of its table.
    MalformedMesh {
        face: usize,
        corner: usize,
        table: IndexTable,
        /// 0-based index as resolved, `len` the table size it missed.
        index: usize,
        len: usize,
    },
    /// The mesh has no faces at all.
    EmptyMesh,
    /// An OBJ record could not be parsed. `line` is 1-based.
    ObjSyntax { line: usize, message: String },
    /// Camera position coincides with the look-at target, or the up vector
    /// is parallel to the viewing direction.
    DegenerateCamera,
    /// near == far leaves the frustum with zero depth range.
    DegenerateFrustum,
    /// Adjacency groups passed to normal smoothing do not partition the
    /// corner index range.
    InvalidAdjacencyGroups { message: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedMesh {
                face,
                corner,
                table,
                index,
                len,
            } => write!(
                f,
                "malformed mesh: face {face} corner {corner} indexes {table}[{index}] \
                 but the table holds {len} entries"
            ),
            Error::EmptyMesh => write!(f, "mesh has no faces"),
            Error::ObjSyntax { line, message } => {
                write!(f, "OBJ syntax error at line {line}: {message}")
            }
            Error::DegenerateCamera => write!(
                f,
                "degenerate camera: eye coincides with target or up is parallel \
                 to the view direction"
            ),
            Error::DegenerateFrustum => write!(f, "degenerate frustum: near == far"),
            Error::InvalidAdjacencyGroups { message } => {
                write!(f, "invalid adjacency groups: {message}")
            }
        }
    }
}

impl std::error::Error for Error {}
