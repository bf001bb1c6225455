//! Indexed triangle meshes and the merge step used by mesh-combining batchers.
use glam::{Mat3, Mat4, Vec2, Vec3};

use crate::error::{Error, Result};
use crate::geometry::Aabb;

/// Triangle-list mesh with 32-bit indices.
///
/// `normals` and `uvs` are either empty or have one entry per position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a mesh from positions and triangle indices. Bounds are computed.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let mut mesh = Self {
            positions,
            normals: Vec::new(),
            uvs: Vec::new(),
            indices,
            bounds: Aabb::EMPTY,
        };
        mesh.recalculate_bounds();
        mesh
    }

    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = normals;
        self
    }

    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        self.uvs = uvs;
        self
    }

    /// A single upright quad of the given size, standing on the origin and facing +Z.
    pub fn upright_quad(width: f32, height: f32) -> Self {
        let hw = width * 0.5;
        Self::new(
            vec![
                Vec3::new(-hw, 0.0, 0.0),
                Vec3::new(hw, 0.0, 0.0),
                Vec3::new(hw, height, 0.0),
                Vec3::new(-hw, height, 0.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
        .with_normals(vec![Vec3::Z; 4])
        .with_uvs(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ])
    }

    /// Two upright quads crossed at 90 degrees, the usual grass-tuft card.
    pub fn crossed_quads(width: f32, height: f32) -> Self {
        let a = Self::upright_quad(width, height);
        let b = a.clone();
        Self::combine([
            (&a, Mat4::IDENTITY),
            (&b, Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2)),
        ])
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn recalculate_bounds(&mut self) {
        self.bounds = Aabb::from_points(self.positions.iter().copied());
    }

    /// Check index ranges and attribute lengths.
    pub fn validate(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(Error::InvalidMesh(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        let n = self.positions.len();
        if let Some(bad) = self.indices.iter().find(|&&i| i as usize >= n) {
            return Err(Error::InvalidMesh(format!(
                "index {bad} out of range for {n} vertices"
            )));
        }
        if !self.normals.is_empty() && self.normals.len() != n {
            return Err(Error::InvalidMesh(format!(
                "{} normals for {n} vertices",
                self.normals.len()
            )));
        }
        if !self.uvs.is_empty() && self.uvs.len() != n {
            return Err(Error::InvalidMesh(format!(
                "{} uvs for {n} vertices",
                self.uvs.len()
            )));
        }
        if self.positions.iter().any(|p| !p.is_finite()) {
            return Err(Error::InvalidMesh("non-finite vertex position".into()));
        }
        Ok(())
    }

    /// Merge meshes placed by local-to-world matrices into one mesh.
    ///
    /// Positions are transformed by the matrix and normals by its inverse
    /// transpose. Mirroring matrices flip the triangle winding. Normals and
    /// uvs survive only if every non-empty part carries them. An empty input
    /// yields an empty mesh.
    pub fn combine<'m, I>(parts: I) -> Mesh
    where
        I: IntoIterator<Item = (&'m Mesh, Mat4)>,
    {
        let parts: Vec<(&Mesh, Mat4)> = parts
            .into_iter()
            .filter(|(m, _)| !m.is_empty())
            .collect();

        let vertex_total: usize = parts.iter().map(|(m, _)| m.vertex_count()).sum();
        let index_total: usize = parts.iter().map(|(m, _)| m.indices.len()).sum();
        let keep_normals = !parts.is_empty() && parts.iter().all(|(m, _)| !m.normals.is_empty());
        let keep_uvs = !parts.is_empty() && parts.iter().all(|(m, _)| !m.uvs.is_empty());

        let mut out = Mesh {
            positions: Vec::with_capacity(vertex_total),
            normals: Vec::with_capacity(if keep_normals { vertex_total } else { 0 }),
            uvs: Vec::with_capacity(if keep_uvs { vertex_total } else { 0 }),
            indices: Vec::with_capacity(index_total),
            bounds: Aabb::EMPTY,
        };

        for (mesh, matrix) in parts {
            let base = out.positions.len() as u32;
            let linear = Mat3::from_mat4(matrix);
            let det = linear.determinant();
            let normal_matrix = if det.abs() > f32::EPSILON {
                linear.inverse().transpose()
            } else {
                linear
            };

            for p in &mesh.positions {
                let wp = matrix.transform_point3(*p);
                out.bounds.extend(wp);
                out.positions.push(wp);
            }
            if keep_normals {
                out.normals.extend(
                    mesh.normals
                        .iter()
                        .map(|n| (normal_matrix * *n).normalize_or_zero()),
                );
            }
            if keep_uvs {
                out.uvs.extend_from_slice(&mesh.uvs);
            }

            if det < 0.0 {
                for tri in mesh.indices.chunks_exact(3) {
                    out.indices
                        .extend_from_slice(&[base + tri[0], base + tri[2], base + tri[1]]);
                }
            } else {
                out.indices.extend(mesh.indices.iter().map(|i| base + i));
            }
        }

        out
    }

    /// Drop degenerate triangles and unreferenced vertices, then reorder
    /// vertices by first use in the index buffer.
    pub fn optimize(&mut self) {
        let vertex_count = self.positions.len();
        let mut indices = Vec::with_capacity(self.indices.len());
        for tri in self.indices.chunks_exact(3) {
            let in_range = tri.iter().all(|&i| (i as usize) < vertex_count);
            if in_range && tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2] {
                indices.extend_from_slice(tri);
            }
        }

        let mut remap: Vec<Option<u32>> = vec![None; vertex_count];
        let mut order: Vec<usize> = Vec::with_capacity(vertex_count);
        for idx in indices.iter_mut() {
            let old = *idx as usize;
            let new = match remap[old] {
                Some(n) => n,
                None => {
                    let n = order.len() as u32;
                    remap[old] = Some(n);
                    order.push(old);
                    n
                }
            };
            *idx = new;
        }

        self.positions = order.iter().map(|&i| self.positions[i]).collect();
        if !self.normals.is_empty() {
            self.normals = order.iter().filter_map(|&i| self.normals.get(i).copied()).collect();
        }
        if !self.uvs.is_empty() {
            self.uvs = order.iter().filter_map(|&i| self.uvs.get(i).copied()).collect();
        }
        self.indices = indices;
        self.recalculate_bounds();
    }
}
