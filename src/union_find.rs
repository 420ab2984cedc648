// union_find.rs - bond-percolation forest for Swendsen-Wang

/// Disjoint-set forest over node ids `0..n`.
///
/// Roots are always the smallest id of their component, so labels do not
/// depend on the order in which unions were applied.
#[derive(Debug, Clone, Default)]
pub struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self { parent: (0..n).collect() }
    }

    /// Every node back to its own root, resizing to `n` if needed.
    pub fn reset(&mut self, n: usize) {
        self.parent.clear();
        self.parent.extend(0..n);
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root of `s`, compressing the path from `s` to it.
    pub fn find(&mut self, mut s: usize) -> usize {
        let mut root = self.parent[s];
        while root != self.parent[root] {
            root = self.parent[root];
        }
        while s != root {
            let next = self.parent[s];
            self.parent[s] = root;
            s = next;
        }
        root
    }

    /// Merge the components of `a` and `b` under the smaller root.
    /// Returns false if they were already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        let r = ra.min(rb);
        self.parent[ra] = r;
        self.parent[rb] = r;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roots_are_smallest_ids() {
        let mut uf = UnionFind::new(6);
        assert!(uf.union(4, 5));
        assert!(uf.union(5, 2));
        assert!(!uf.union(2, 4));
        assert_eq!(uf.find(5), 2);
        assert_eq!(uf.find(4), 2);
        assert_eq!(uf.find(0), 0);
    }

    #[test]
    fn reset_splits_everything() {
        let mut uf = UnionFind::new(3);
        uf.union(0, 1);
        uf.union(1, 2);
        uf.reset(4);
        assert_eq!(uf.len(), 4);
        assert!((0..4).all(|s| uf.find(s) == s));
    }
}
