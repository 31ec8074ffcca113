//! Triangle-list accumulation for one tile, backed by recycled vectors.

use bevy::prelude::*;

use crate::math;

/// Free list of cleared vectors.
pub struct ListPool<T> {
    free: Vec<Vec<T>>,
}

impl<T> Default for ListPool<T> {
    fn default() -> Self {
        Self { free: Vec::new() }
    }
}

impl<T> ListPool<T> {
    /// A recycled empty vector, or a new one.
    pub fn get(&mut self) -> Vec<T> {
        self.free.pop().unwrap_or_default()
    }

    /// Clears `list` and keeps its allocation for the next [`ListPool::get`].
    pub fn add(&mut self, mut list: Vec<T>) {
        list.clear();
        self.free.push(list);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.free.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.free.is_empty()
    }
}

/// One pool per vertex attribute type.
#[derive(Default)]
pub struct BufferPool {
    pub positions: ListPool<Vec3>,
    pub indices: ListPool<u32>,
    pub colors: ListPool<LinearRgba>,
    pub uvs: ListPool<Vec2>,
}

/// Flat triangle-list buffers. Terrain fills `colors`, rivers fill `uvs`.
#[derive(Debug, Default)]
pub struct MeshBuffer {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub colors: Vec<LinearRgba>,
    pub uvs: Vec<Vec2>,
}

impl MeshBuffer {
    pub fn from_pool(pool: &mut BufferPool) -> Self {
        Self {
            positions: pool.positions.get(),
            indices: pool.indices.get(),
            colors: pool.colors.get(),
            uvs: pool.uvs.get(),
        }
    }

    pub fn release(self, pool: &mut BufferPool) {
        pool.positions.add(self.positions);
        pool.indices.add(self.indices);
        pool.colors.add(self.colors);
        pool.uvs.add(self.uvs);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    // ── Geometry ────────────────────────────────────────────────────

    pub fn add_triangle_unperturbed(&mut self, v1: Vec3, v2: Vec3, v3: Vec3) {
        let i = self.positions.len() as u32;
        self.positions.extend([v1, v2, v3]);
        self.indices.extend([i, i + 1, i + 2]);
    }

    /// Two triangles: `v1 v3 v2` and `v2 v3 v4`.
    pub fn add_quad_unperturbed(&mut self, v1: Vec3, v2: Vec3, v3: Vec3, v4: Vec3) {
        let i = self.positions.len() as u32;
        self.positions.extend([v1, v2, v3, v4]);
        self.indices.extend([i, i + 2, i + 1, i + 1, i + 2, i + 3]);
    }

    // ── Colors ──────────────────────────────────────────────────────

    pub fn add_triangle_color(&mut self, c: LinearRgba) {
        self.colors.extend([c; 3]);
    }

    pub fn add_triangle_colors(&mut self, c1: LinearRgba, c2: LinearRgba, c3: LinearRgba) {
        self.colors.extend([c1, c2, c3]);
    }

    pub fn add_quad_color(&mut self, c: LinearRgba) {
        self.colors.extend([c; 4]);
    }

    /// First pair of vertices gets `c1`, second pair `c2`.
    pub fn add_quad_color2(&mut self, c1: LinearRgba, c2: LinearRgba) {
        self.colors.extend([c1, c1, c2, c2]);
    }

    pub fn add_quad_colors(&mut self, c1: LinearRgba, c2: LinearRgba, c3: LinearRgba, c4: LinearRgba) {
        self.colors.extend([c1, c2, c3, c4]);
    }

    // ── UVs ─────────────────────────────────────────────────────────

    pub fn add_triangle_uv(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2) {
        self.uvs.extend([uv1, uv2, uv3]);
    }

    pub fn add_quad_uv(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2, uv4: Vec2) {
        self.uvs.extend([uv1, uv2, uv3, uv4]);
    }

    pub fn add_quad_uv_rect(&mut self, u_min: f32, u_max: f32, v_min: f32, v_max: f32) {
        self.add_quad_uv(
            Vec2::new(u_min, v_min),
            Vec2::new(u_max, v_min),
            Vec2::new(u_min, v_max),
            Vec2::new(u_max, v_max),
        );
    }

    /// Smooth per-vertex normals.
    ///
    /// Each triangle's unnormalized face normal is accumulated at its three
    /// vertices, so larger triangles weigh more. Vertices with no contribution
    /// default to `+Y`.
    pub fn normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let n = math::face_normal(self.positions[i0], self.positions[i1], self.positions[i2]);
            normals[i0] += n;
            normals[i1] += n;
            normals[i2] += n;
        }
        normals.into_iter().map(|n| n.try_normalize().unwrap_or(Vec3::Y)).collect()
    }
}

/// The two output streams of one rebuilt tile.
#[derive(Debug, Default)]
pub struct TileMeshes {
    /// Position + color; suitable for collision.
    pub terrain: MeshBuffer,
    /// Position + UV, at the river surface.
    pub rivers: MeshBuffer,
}

impl TileMeshes {
    pub fn from_pool(pool: &mut BufferPool) -> Self {
        Self {
            terrain: MeshBuffer::from_pool(pool),
            rivers: MeshBuffer::from_pool(pool),
        }
    }

    pub fn release(self, pool: &mut BufferPool) {
        self.terrain.release(pool);
        self.rivers.release(pool);
    }
}
