use serde::Deserialize;

/// How an index buffer is grouped into triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveTopology {
    /// Independent triples: `[0,1,2], [3,4,5], ...`
    #[default]
    #[serde(alias = "list")]
    TriangleList,
    /// Sliding window of three, flipping every odd triangle to keep the winding.
    #[serde(alias = "strip")]
    TriangleStrip,
}

impl PrimitiveTopology {
    /// Number of candidate triangles encoded by `index_count` indices.
    pub fn triangle_count(self, index_count: usize) -> usize {
        match self {
            PrimitiveTopology::TriangleList => index_count / 3,
            PrimitiveTopology::TriangleStrip => index_count.saturating_sub(2),
        }
    }
}

/// Iterator over the vertex indices of every candidate triangle.
///
/// Degenerate triangles are still yielded; rejecting them is the
/// rasterizer's job so strip restarts stay visible to callers.
pub struct Triangles<'a> {
    indices: &'a [u32],
    topology: PrimitiveTopology,
    next: usize,
    count: usize,
}

impl<'a> Triangles<'a> {
    pub fn new(indices: &'a [u32], topology: PrimitiveTopology) -> Self {
        Self {
            indices,
            topology,
            next: 0,
            count: topology.triangle_count(indices.len()),
        }
    }
}

impl Iterator for Triangles<'_> {
    type Item = [u32; 3];

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let triangle = self.next;
        self.next += 1;

        let item = match self.topology {
            PrimitiveTopology::TriangleList => {
                let i = triangle * 3;
                [self.indices[i], self.indices[i + 1], self.indices[i + 2]]
            }
            PrimitiveTopology::TriangleStrip => {
                let i = triangle;
                if i % 2 == 0 {
                    [self.indices[i], self.indices[i + 1], self.indices[i + 2]]
                } else {
                    [self.indices[i + 2], self.indices[i + 1], self.indices[i]]
                }
            }
        };
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Triangles<'_> {}

/// True when two of the three indices coincide (zero-area by construction).
#[inline]
pub fn is_degenerate(triangle: &[u32; 3]) -> bool {
    triangle[0] == triangle[1] || triangle[1] == triangle[2] || triangle[2] == triangle[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_consumes_triples() {
        let indices = [0, 1, 2, 3, 4, 5, 6];
        let tris: Vec<_> = Triangles::new(&indices, PrimitiveTopology::TriangleList).collect();
        assert_eq!(tris, vec![[0, 1, 2], [3, 4, 5]]);
    }

    #[test]
    fn strip_alternates_winding() {
        let indices = [10, 11, 12, 13, 14];
        let tris: Vec<_> = Triangles::new(&indices, PrimitiveTopology::TriangleStrip).collect();
        assert_eq!(tris.len(), indices.len() - 2);
        assert_eq!(tris, vec![[10, 11, 12], [13, 12, 11], [12, 13, 14]]);
    }

    #[test]
    fn strip_with_restart_yields_degenerates() {
        // 3x3 grid strip with a doubled index joining the two rows.
        let indices = [3, 0, 4, 1, 5, 2, 2, 6, 6, 3, 7, 4, 8, 5];
        let tris: Vec<_> = Triangles::new(&indices, PrimitiveTopology::TriangleStrip).collect();
        assert_eq!(tris.len(), 12);
        let degenerate = tris.iter().filter(|t| is_degenerate(t)).count();
        assert_eq!(degenerate, 4);
    }

    #[test]
    fn short_buffers_yield_nothing() {
        assert_eq!(Triangles::new(&[0, 1], PrimitiveTopology::TriangleStrip).count(), 0);
        assert_eq!(Triangles::new(&[], PrimitiveTopology::TriangleList).count(), 0);
    }

    #[test]
    fn topology_parses_from_config_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            topology: PrimitiveTopology,
        }
        let w: Wrapper = toml::from_str("topology = \"strip\"").unwrap();
        assert_eq!(w.topology, PrimitiveTopology::TriangleStrip);
        let w: Wrapper = toml::from_str("topology = \"triangle_list\"").unwrap();
        assert_eq!(w.topology, PrimitiveTopology::TriangleList);
    }
}
