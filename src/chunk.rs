//! Tiles of cells that are triangulated together.
//!
//! Every cell belongs to exactly one tile for the lifetime of the grid. Edits
//! only mark tiles dirty; [`ChunkScheduler::triangulate_dirty`] rebuilds each
//! dirty tile once, however many edits touched it.

use std::collections::BTreeSet;

use bevy::prelude::*;

use crate::cell::{CellId, HexCell};
use crate::config::GridSettings;
use crate::mesh_buffer::{BufferPool, TileMeshes};
use crate::metrics::HexMetrics;
use crate::triangulator::Triangulator;

/// Cells of one tile and how often it has been rebuilt.
#[derive(Debug, Default)]
pub struct HexGridChunk {
    cells: Vec<CellId>,
    rebuilds: u32,
}

impl HexGridChunk {
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }
}

pub struct ChunkScheduler {
    chunk_count_x: usize,
    chunk_size_x: usize,
    chunk_size_z: usize,
    chunks: Vec<HexGridChunk>,
    dirty: BTreeSet<usize>,
    pool: BufferPool,
}

impl ChunkScheduler {
    pub fn new(g: &GridSettings) -> Self {
        let count = (g.chunk_count_x * g.chunk_count_z) as usize;
        let per_chunk = (g.chunk_size_x * g.chunk_size_z) as usize;
        Self {
            chunk_count_x: g.chunk_count_x as usize,
            chunk_size_x: g.chunk_size_x as usize,
            chunk_size_z: g.chunk_size_z as usize,
            chunks: (0..count)
                .map(|_| HexGridChunk {
                    cells: Vec::with_capacity(per_chunk),
                    rebuilds: 0,
                })
                .collect(),
            dirty: BTreeSet::new(),
            pool: BufferPool::default(),
        }
    }

    /// Tile containing the cell at offset `(col, row)`.
    pub fn chunk_index_for_offset(&self, col: usize, row: usize) -> usize {
        col / self.chunk_size_x + (row / self.chunk_size_z) * self.chunk_count_x
    }

    pub fn add_cell(&mut self, chunk: usize, id: CellId) {
        self.chunks[chunk].cells.push(id);
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunk(&self, index: usize) -> Option<&HexGridChunk> {
        self.chunks.get(index)
    }

    // ── Invalidation ────────────────────────────────────────────────

    /// Schedules `chunk` for the next rebuild pass.
    pub fn refresh(&mut self, chunk: usize) {
        self.dirty.insert(chunk);
    }

    pub fn refresh_all(&mut self) {
        self.dirty.extend(0..self.chunks.len());
    }

    pub fn is_dirty(&self, chunk: usize) -> bool {
        self.dirty.contains(&chunk)
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Completed rebuilds of `chunk` since the grid was built.
    pub fn rebuild_count(&self, chunk: usize) -> u32 {
        self.chunks.get(chunk).map_or(0, |c| c.rebuilds)
    }

    // ── Rebuild ─────────────────────────────────────────────────────

    /// Rebuilds every dirty tile and hands its buffers to `sink`.
    ///
    /// Buffers are borrowed from the pool for the duration of one tile and
    /// returned right after `sink` sees them. Returns the number of tiles rebuilt.
    pub fn triangulate_dirty(
        &mut self,
        cells: &[HexCell],
        metrics: &HexMetrics,
        mut sink: impl FnMut(usize, &TileMeshes),
    ) -> usize {
        let dirty = std::mem::take(&mut self.dirty);
        for &index in &dirty {
            let mut meshes = TileMeshes::from_pool(&mut self.pool);
            let chunk = &mut self.chunks[index];
            Triangulator::new(cells, metrics, &mut meshes).triangulate(&chunk.cells);
            chunk.rebuilds += 1;

            debug!(
                "rebuilt tile {index}: {} terrain triangles, {} river triangles, {} vertices",
                meshes.terrain.triangle_count(),
                meshes.rivers.triangle_count(),
                meshes.terrain.vertex_count() + meshes.rivers.vertex_count(),
            );
            sink(index, &meshes);
            meshes.release(&mut self.pool);
        }
        dirty.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;

    fn scheduler() -> ChunkScheduler {
        ChunkScheduler::new(&MapConfig::default().grid)
    }

    #[test]
    fn offsets_map_to_row_major_tiles() {
        let s = scheduler();
        assert_eq!(s.chunk_count(), 12);
        assert_eq!(s.chunk_index_for_offset(0, 0), 0);
        assert_eq!(s.chunk_index_for_offset(4, 4), 0);
        assert_eq!(s.chunk_index_for_offset(5, 0), 1);
        assert_eq!(s.chunk_index_for_offset(0, 5), 4);
        assert_eq!(s.chunk_index_for_offset(19, 14), 11);
    }

    #[test]
    fn repeated_refreshes_coalesce() {
        let mut s = scheduler();
        s.refresh(3);
        s.refresh(3);
        s.refresh(7);
        s.refresh(3);
        assert_eq!(s.dirty_count(), 2);
        assert!(s.is_dirty(3) && s.is_dirty(7));
        assert!(!s.is_dirty(0));
    }

    #[test]
    fn rebuild_drains_the_dirty_set() {
        let mut s = scheduler();
        let cfg = MapConfig::default();
        let metrics = HexMetrics::new(&cfg.metrics, Box::new(crate::metrics::ConstantNoise::NEUTRAL), 0);
        s.refresh_all();

        let mut seen = Vec::new();
        let rebuilt = s.triangulate_dirty(&[], &metrics, |index, meshes| {
            assert!(meshes.terrain.is_empty());
            seen.push(index);
        });
        assert_eq!(rebuilt, 12);
        assert_eq!(seen, (0..12).collect::<Vec<_>>());
        assert_eq!(s.dirty_count(), 0);
        assert_eq!(s.rebuild_count(5), 1);
        assert_eq!(s.triangulate_dirty(&[], &metrics, |_, _| {}), 0);
    }
}
