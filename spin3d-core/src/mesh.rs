/// Face-indexed mesh model and flattening into per-corner vertex streams
use nalgebra::{Point2, Point3, Vector3};

use crate::error::{Error, IndexTable};

const EPSILON: f32 = 1e-6;

/// One vertex reference inside a face: independent 0-based indices into the
/// position/texcoord/normal tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    pub position: usize,
    pub texcoord: usize,
    pub normal: usize,
}

impl Corner {
    pub fn new(position: usize, texcoord: usize, normal: usize) -> Self {
        Self {
            position,
            texcoord,
            normal,
        }
    }
}

/// A triangular face: three corners in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub corners: [Corner; 3],
}

impl Face {
    pub fn new(a: Corner, b: Corner, c: Corner) -> Self {
        Self { corners: [a, b, c] }
    }
}

/// A mesh as the OBJ format describes it: shared attribute tables plus faces
/// referencing them by index.
#[derive(Debug, Clone, Default)]
pub struct RawMesh {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub texcoords: Vec<Point2<f32>>,
    pub faces: Vec<Face>,
}

/// Mesh with the shared-vertex indirection flattened away: three parallel
/// streams of length 3 × face count, one entry per triangle corner, ready for
/// a non-indexed triangle-list draw.
///
/// A vertex referenced by N faces is emitted N times. The duplication is
/// deliberate: it trades buffer size for a trivial draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatMesh {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub texcoords: Vec<Point2<f32>>,
}

impl RawMesh {
    /// Flatten the indexed faces into per-corner streams.
    ///
    /// Fails with [`Error::EmptyMesh`] when there are no faces and with
    /// [`Error::MalformedMesh`] on the first corner whose index falls outside
    /// its table.
    pub fn flatten(&self) -> Result<FlatMesh, Error> {
        if self.faces.is_empty() {
            return Err(Error::EmptyMesh);
        }

        let corner_count = self.faces.len() * 3;
        let mut positions = Vec::with_capacity(corner_count);
        let mut normals = Vec::with_capacity(corner_count);
        let mut texcoords = Vec::with_capacity(corner_count);

        for (face, f) in self.faces.iter().enumerate() {
            for (corner, c) in f.corners.iter().enumerate() {
                self.check_corner(face, corner, c)?;
                positions.push(self.positions[c.position]);
                normals.push(self.normals[c.normal]);
                texcoords.push(self.texcoords[c.texcoord]);
            }
        }

        Ok(FlatMesh {
            positions,
            normals,
            texcoords,
        })
    }

    pub(crate) fn check_corner(&self, face: usize, corner: usize, c: &Corner) -> Result<(), Error> {
        let tables = [
            (c.position, self.positions.len(), IndexTable::Positions),
            (c.texcoord, self.texcoords.len(), IndexTable::Texcoords),
            (c.normal, self.normals.len(), IndexTable::Normals),
        ];
        for (index, len, table) in tables {
            if index >= len {
                return Err(Error::MalformedMesh {
                    face,
                    corner,
                    table,
                    index,
                    len,
                });
            }
        }
        Ok(())
    }

    /// Map every position-table entry to the flat corner indices that share
    /// it: entry `p` lists all `3 * face + corner` where the corner references
    /// position `p`. The groups always partition the corner index range, so
    /// the result feeds [`smooth_normals`] directly.
    pub fn position_adjacency(&self) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); self.positions.len()];
        for (face, f) in self.faces.iter().enumerate() {
            for (corner, c) in f.corners.iter().enumerate() {
                if let Some(group) = groups.get_mut(c.position) {
                    group.push(face * 3 + corner);
                }
            }
        }
        groups
    }

    /// Eight-triangle octahedron spanning [-1, 1], one flat normal per face.
    /// Used by the demo front-end when no mesh file is given.
    pub fn octahedron() -> Self {
        let s = std::f32::consts::FRAC_1_SQRT_2;
        let positions = vec![
            Point3::new(-1.0, 0.0, 1.0),  // ring: front left
            Point3::new(1.0, 0.0, 1.0),   // ring: front right
            Point3::new(1.0, 0.0, -1.0),  // ring: back right
            Point3::new(-1.0, 0.0, -1.0), // ring: back left
            Point3::new(0.0, 1.0, 0.0),   // apex
            Point3::new(0.0, -1.0, 0.0),  // nadir
        ];
        let normals = vec![
            Vector3::new(0.0, s, s),
            Vector3::new(s, s, 0.0),
            Vector3::new(0.0, s, -s),
            Vector3::new(-s, s, 0.0),
            Vector3::new(0.0, -s, s),
            Vector3::new(s, -s, 0.0),
            Vector3::new(0.0, -s, -s),
            Vector3::new(-s, -s, 0.0),
        ];
        let texcoords = vec![
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(0.5, 0.5),
            Point2::new(0.5, 0.5),
        ];
        // (ring, ring, pole) triples, counter-clockwise seen from outside
        let tris: [[usize; 3]; 8] = [
            [0, 1, 4],
            [1, 2, 4],
            [2, 3, 4],
            [3, 0, 4],
            [1, 0, 5],
            [2, 1, 5],
            [3, 2, 5],
            [0, 3, 5],
        ];
        let faces = tris
            .iter()
            .enumerate()
            .map(|(i, t)| {
                Face::new(
                    Corner::new(t[0], t[0], i),
                    Corner::new(t[1], t[1], i),
                    Corner::new(t[2], t[2], i),
                )
            })
            .collect();

        Self {
            positions,
            normals,
            texcoords,
            faces,
        }
    }
}

impl FlatMesh {
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Positions of triangle `k`, corners in face order.
    pub fn triangle(&self, k: usize) -> [Point3<f32>; 3] {
        [
            self.positions[k * 3],
            self.positions[k * 3 + 1],
            self.positions[k * 3 + 2],
        ]
    }

    /// Replace every corner normal with its triangle's geometric face normal,
    /// cross(v2 - v1, v3 - v1) normalized. Zero-area triangles keep their
    /// current normals.
    pub fn recompute_face_normals(&mut self) {
        for k in 0..self.triangle_count() {
            let [v1, v2, v3] = self.triangle(k);
            let n = (v2 - v1).cross(&(v3 - v1));
            if n.norm() < EPSILON {
                continue;
            }
            let n = n.normalize();
            self.normals[k * 3] = n;
            self.normals[k * 3 + 1] = n;
            self.normals[k * 3 + 2] = n;
        }
    }
}

/// Average and re-normalize the normals of every adjacency group, writing the
/// averaged normal back to all members. Approximates smooth shading on a mesh
/// whose shared vertices were duplicated by flattening.
///
/// `groups` must partition `[0, normals.len())`: a corner appearing twice or
/// not at all fails with [`Error::InvalidAdjacencyGroups`]. Empty groups
/// (positions no face references) are allowed. Idempotent: normals that are
/// already the group average are a fixed point.
pub fn smooth_normals(
    normals: &[Vector3<f32>],
    groups: &[Vec<usize>],
) -> Result<Vec<Vector3<f32>>, Error> {
    let mut seen = vec![false; normals.len()];
    for group in groups {
        for &corner in group {
            if corner >= normals.len() {
                return Err(Error::InvalidAdjacencyGroups {
                    message: format!(
                        "corner {corner} is out of range for {} corners",
                        normals.len()
                    ),
                });
            }
            if seen[corner] {
                return Err(Error::InvalidAdjacencyGroups {
                    message: format!("corner {corner} appears in more than one group"),
                });
            }
            seen[corner] = true;
        }
    }
    if let Some(missing) = seen.iter().position(|covered| !covered) {
        return Err(Error::InvalidAdjacencyGroups {
            message: format!("corner {missing} is not covered by any group"),
        });
    }

    let mut smoothed = normals.to_vec();
    for group in groups {
        if group.is_empty() {
            continue;
        }
        let sum: Vector3<f32> = group.iter().map(|&corner| normals[corner]).sum();
        // Opposing normals can cancel out; leave such a group untouched
        // rather than writing NaNs.
        if sum.norm() < EPSILON {
            continue;
        }
        let averaged = sum.normalize();
        for &corner in group {
            smoothed[corner] = averaged;
        }
    }
    Ok(smoothed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_face_mesh() -> RawMesh {
        RawMesh {
            positions: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ],
            normals: vec![Vector3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 1.0, 0.0)],
            texcoords: vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(0.0, 1.0),
                Point2::new(1.0, 1.0),
            ],
            faces: vec![
                Face::new(
                    Corner::new(0, 0, 0),
                    Corner::new(1, 1, 0),
                    Corner::new(2, 2, 0),
                ),
                Face::new(
                    Corner::new(1, 1, 1),
                    Corner::new(3, 3, 1),
                    Corner::new(2, 2, 1),
                ),
            ],
        }
    }

    #[test]
    fn flatten_duplicates_shared_corners_in_face_order() {
        let raw = two_face_mesh();
        let flat = raw.flatten().unwrap();

        assert_eq!(flat.positions.len(), 6);
        assert_eq!(flat.normals.len(), 6);
        assert_eq!(flat.texcoords.len(), 6);

        for (k, (face, corner)) in [(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
            .iter()
            .enumerate()
        {
            let c = raw.faces[*face].corners[*corner];
            assert_eq!(flat.positions[k], raw.positions[c.position]);
            assert_eq!(flat.normals[k], raw.normals[c.normal]);
            assert_eq!(flat.texcoords[k], raw.texcoords[c.texcoord]);
        }

        // Position 1 and 2 are shared between the two faces and emitted twice.
        assert_eq!(flat.positions[1], flat.positions[3]);
        assert_eq!(flat.positions[2], flat.positions[5]);
    }

    #[test]
    fn flatten_rejects_out_of_range_index() {
        let mut raw = two_face_mesh();
        raw.faces[1].corners[2].normal = 2; // one past the table
        match raw.flatten() {
            Err(Error::MalformedMesh {
                face,
                corner,
                table,
                index,
                len,
            }) => {
                assert_eq!(face, 1);
                assert_eq!(corner, 2);
                assert_eq!(table, IndexTable::Normals);
                assert_eq!(index, 2);
                assert_eq!(len, 2);
            }
            other => panic!("expected MalformedMesh, got {other:?}"),
        }
    }

    #[test]
    fn flatten_rejects_empty_face_list() {
        let mut raw = two_face_mesh();
        raw.faces.clear();
        assert_eq!(raw.flatten(), Err(Error::EmptyMesh));
    }

    #[test]
    fn adjacency_partitions_corner_range() {
        let raw = RawMesh::octahedron();
        let groups = raw.position_adjacency();
        assert_eq!(groups.len(), 6);

        let mut corners: Vec<usize> = groups.iter().flatten().copied().collect();
        corners.sort_unstable();
        assert_eq!(corners, (0..24).collect::<Vec<_>>());

        // Each pole is shared by four faces, each ring vertex by four.
        assert!(groups.iter().all(|g| g.len() == 4));
    }

    #[test]
    fn face_normals_follow_winding() {
        let raw = two_face_mesh();
        let mut flat = raw.flatten().unwrap();
        flat.normals[0] = Vector3::new(1.0, 0.0, 0.0); // stale on purpose
        flat.recompute_face_normals();
        // Both triangles are counter-clockwise in the XY plane: +Z.
        for n in &flat.normals {
            assert_relative_eq!(*n, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
        }
    }

    #[test]
    fn smoothing_averages_within_groups() {
        let raw = RawMesh::octahedron();
        let mut flat = raw.flatten().unwrap();
        flat.recompute_face_normals();
        let groups = raw.position_adjacency();

        let smoothed = smooth_normals(&flat.normals, &groups).unwrap();

        // The apex is shared by the four top faces whose normals average
        // straight up.
        let apex_corner = groups[4][0];
        assert_relative_eq!(
            smoothed[apex_corner],
            Vector3::new(0.0, 1.0, 0.0),
            epsilon = 1e-6
        );
        // Every member of a group carries the same normal.
        for group in &groups {
            for &corner in group {
                assert_eq!(smoothed[corner], smoothed[group[0]]);
            }
        }
    }

    #[test]
    fn smoothing_is_idempotent() {
        let raw = RawMesh::octahedron();
        let mut flat = raw.flatten().unwrap();
        flat.recompute_face_normals();
        let groups = raw.position_adjacency();

        let once = smooth_normals(&flat.normals, &groups).unwrap();
        let twice = smooth_normals(&once, &groups).unwrap();
        for (a, b) in once.iter().zip(&twice) {
            assert_relative_eq!(*a, *b, epsilon = 1e-6);
        }
    }

    #[test]
    fn smoothing_rejects_overlap_and_omission() {
        let normals = vec![Vector3::new(0.0, 0.0, 1.0); 3];

        let overlapping = vec![vec![0, 1], vec![1, 2]];
        assert!(matches!(
            smooth_normals(&normals, &overlapping),
            Err(Error::InvalidAdjacencyGroups { .. })
        ));

        let incomplete = vec![vec![0, 2]];
        assert!(matches!(
            smooth_normals(&normals, &incomplete),
            Err(Error::InvalidAdjacencyGroups { .. })
        ));
    }
}
