//! Sparse term vectors and cosine similarity.

/// A sparse vector with strictly increasing term indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl SparseVector {
    /// Build from parallel index/value lists.
    ///
    /// Indices must be strictly increasing and the lists equally long.
    pub fn new(indices: Vec<u32>, values: Vec<f32>) -> Self {
        debug_assert_eq!(indices.len(), values.len());
        debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        Self { indices, values }
    }

    /// The all-zero vector
    pub fn zero() -> Self {
        Self::default()
    }

    /// Number of stored (non-zero) entries
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Weight at a term index, zero when absent
    pub fn get(&self, index: u32) -> f32 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Dot product by merge-joining the two index lists.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f32;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Computed through [`dot`](Self::dot) so `v.dot(&v) == v.squared_norm()`
    /// holds bit for bit.
    pub fn squared_norm(&self) -> f32 {
        self.dot(self)
    }

    pub fn norm(&self) -> f32 {
        self.squared_norm().sqrt()
    }

    /// Scale to unit L2 length; zero vectors are left untouched.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for value in &mut self.values {
                *value /= norm;
            }
        }
    }
}

/// Cosine similarity: `a·b / sqrt(|a|² |b|²)`.
///
/// Zero vectors score 0. The result is clamped to `[0, 1]`; every weight in
/// this crate is non-negative so only rounding is clipped. For any non-zero
/// `v`, `cosine_similarity(v, v)` is exactly `1.0`.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    let na = a.squared_norm();
    let nb = b.squared_norm();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (a.dot(b) / (na * nb).sqrt()).clamp(0.0, 1.0)
}

/// Cosine distance, `1 - cosine_similarity`.
pub fn cosine_distance(a: &SparseVector, b: &SparseVector) -> f32 {
    1.0 - cosine_similarity(a, b)
}
