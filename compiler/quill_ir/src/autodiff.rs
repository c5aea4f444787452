//! Automatic differentiation configuration.

use smallvec::SmallVec;

use crate::GenericSigId;

/// A subset of `0..capacity`, used for differentiability parameter and
/// result indices.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IndexSubset {
    capacity: u32,
    words: SmallVec<[u64; 1]>,
}

impl IndexSubset {
    /// An empty subset of `0..capacity`.
    pub fn empty(capacity: u32) -> Self {
        let word_count = (capacity as usize).div_ceil(64);
        Self {
            capacity,
            words: SmallVec::from_elem(0, word_count),
        }
    }

    /// A subset of `0..capacity` containing `indices`; out-of-range indices
    /// are ignored.
    pub fn new(capacity: u32, indices: impl IntoIterator<Item = u32>) -> Self {
        let mut subset = Self::empty(capacity);
        for index in indices {
            subset.insert(index);
        }
        subset
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    fn insert(&mut self, index: u32) {
        if index < self.capacity {
            self.words[(index / 64) as usize] |= 1 << (index % 64);
        }
    }

    pub fn contains(&self, index: u32) -> bool {
        index < self.capacity && self.words[(index / 64) as usize] & (1 << (index % 64)) != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.capacity).filter(|&index| self.contains(index))
    }
}

/// Which parameters and results a derivative is taken with respect to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AutoDiffConfig {
    pub parameters: IndexSubset,
    pub results: IndexSubset,
    /// Generic signature of the derivative when it is more constrained than
    /// the original function.
    pub derivative_signature: Option<GenericSigId>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DerivativeFunctionKind {
    /// Forward-mode derivative.
    Jvp,
    /// Reverse-mode derivative.
    Vjp,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LinearMapKind {
    Differential,
    Pullback,
}

/// Declarations synthesized to hold intermediate derivative data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeneratedDeclKind {
    LinearMapStruct,
    BranchingTraceEnum,
}

/// Kind of a differentiability witness.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DifferentiabilityWitnessKind {
    Normal,
    Linear,
    Forward,
    Reverse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn subset_membership() {
        let subset = IndexSubset::new(70, [0, 3, 69, 200]);
        assert!(subset.contains(0));
        assert!(subset.contains(69));
        assert!(!subset.contains(1));
        assert!(!subset.contains(200));
        assert_eq!(subset.iter().collect::<Vec<_>>(), vec![0, 3, 69]);
    }

    #[test]
    fn empty_subset_with_zero_capacity() {
        let subset = IndexSubset::empty(0);
        assert_eq!(subset.capacity(), 0);
        assert_eq!(subset.iter().count(), 0);
    }
}
