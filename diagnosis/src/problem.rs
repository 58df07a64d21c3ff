use std::fmt::{Debug, Formatter};

use itertools::Itertools;

use crate::error::InvalidInput;

/// Input of a diagnosis: an ordered sequence of `soft` constraints to diagnose, and `hard`
/// background constraints that are always enforced and never part of a diagnosis.
#[derive(Debug)]
pub struct Problem<'a, C> {
    pub soft: &'a [C],
    pub hard: &'a [C],
}

impl<C> Clone for Problem<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<C> Copy for Problem<'_, C> {}

impl<'a, C> Problem<'a, C> {
    pub fn new(soft: &'a [C]) -> Self {
        Problem { soft, hard: &[] }
    }

    pub fn with_hard(self, hard: &'a [C]) -> Self {
        Problem { soft: self.soft, hard }
    }

    pub(crate) fn check_non_empty(&self) -> Result<(), InvalidInput> {
        if self.soft.is_empty() {
            Err(InvalidInput::Empty)
        } else {
            Ok(())
        }
    }
}

impl<C: Clone> Problem<'_, C> {
    /// The hard constraints followed by the soft constraints at the given positions.
    pub(crate) fn query(&self, positions: impl IntoIterator<Item = usize>) -> Vec<C> {
        self.hard
            .iter()
            .cloned()
            .chain(positions.into_iter().map(|i| self.soft[i].clone()))
            .collect()
    }
}

/// A subsequence of the soft constraints of a [`Problem`], identified by its positions.
pub struct Diagnosis<'a, C> {
    source: &'a [C],
    positions: Vec<usize>,
}

impl<'a, C> Diagnosis<'a, C> {
    /// # Panics
    /// If the positions are not strictly increasing or out of the bounds of `source`.
    pub fn new(source: &'a [C], positions: Vec<usize>) -> Self {
        assert!(positions.iter().tuple_windows().all(|(a, b)| a < b));
        assert!(positions.last().is_none_or(|&last| last < source.len()));
        Diagnosis { source, positions }
    }

    /// Positions of the diagnosis in the original sequence, in increasing order.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a C> + '_ {
        self.positions.iter().map(|&i| &self.source[i])
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, position: usize) -> bool {
        self.positions.binary_search(&position).is_ok()
    }

    /// Positions of the original sequence that are not part of the diagnosis.
    pub fn complement(&self) -> Vec<usize> {
        (0..self.source.len()).filter(|&i| !self.contains(i)).collect()
    }

    pub fn to_vec(&self) -> Vec<C>
    where
        C: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<C: Debug> Debug for Diagnosis<'_, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<C> PartialEq for Diagnosis<'_, C> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.source, other.source) && self.positions == other.positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnosis_accessors() {
        let source = ["a", "b", "c", "d"];
        let d = Diagnosis::new(&source, vec![1, 3]);
        assert_eq!(d.len(), 2);
        assert!(d.contains(3));
        assert!(!d.contains(0));
        assert_eq!(d.complement(), vec![0, 2]);
        assert_eq!(d.to_vec(), vec!["b", "d"]);
        assert_eq!(format!("{d:?}"), "[\"b\", \"d\"]");
    }

    #[test]
    #[should_panic]
    fn test_diagnosis_rejects_unordered_positions() {
        let source = [1, 2, 3];
        let _ = Diagnosis::new(&source, vec![2, 1]);
    }

    #[test]
    fn test_query_puts_hard_constraints_first() {
        let soft = [10, 11, 12];
        let hard = [1];
        let pb = Problem::new(&soft).with_hard(&hard);
        assert_eq!(pb.query([0, 2]), vec![1, 10, 12]);
        assert_eq!(Problem::<u8>::new(&[]).check_non_empty(), Err(InvalidInput::Empty));
    }
}
