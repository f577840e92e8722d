use serde::{Deserialize, Serialize};

use crate::edit::policy::TrackedRange;
use crate::text::TextRange;

/// Arbitrarily nested group of ranges that must keep its shape across a
/// batch.
///
/// Leaves are visited depth-first, left to right. That order is the flat
/// position a leaf takes while the batch remaps it, and [`map_leaves`]
/// hands the leaves to its closure in the same order, so a flat result can
/// be poured back into the original shape.
///
/// [`map_leaves`]: RangeBundle::map_leaves
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeBundle<T = TrackedRange> {
    Leaf(T),
    Group(Vec<RangeBundle<T>>),
}

impl<T> RangeBundle<T> {
    pub fn leaf(value: T) -> Self {
        Self::Leaf(value)
    }

    pub fn group(children: impl IntoIterator<Item = RangeBundle<T>>) -> Self {
        Self::Group(children.into_iter().collect())
    }

    /// A flat group of leaves.
    pub fn from_leaves(leaves: impl IntoIterator<Item = T>) -> Self {
        Self::Group(leaves.into_iter().map(Self::Leaf).collect())
    }

    /// Leaves in depth-first order.
    pub fn leaves(&self) -> Vec<&T> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a T>) {
        match self {
            Self::Leaf(value) => out.push(value),
            Self::Group(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Group(children) => children.iter().map(Self::leaf_count).sum(),
        }
    }

    /// Rebuild the same shape with every leaf passed through `f`, in
    /// depth-first order.
    pub fn map_leaves<U>(&self, f: &mut impl FnMut(&T) -> U) -> RangeBundle<U> {
        match self {
            Self::Leaf(value) => RangeBundle::Leaf(f(value)),
            Self::Group(children) => {
                RangeBundle::Group(children.iter().map(|child| child.map_leaves(f)).collect())
            }
        }
    }

    /// Whether `other` has the same nesting and length at every level.
    pub fn same_shape<U>(&self, other: &RangeBundle<U>) -> bool {
        match (self, other) {
            (Self::Leaf(_), RangeBundle::Leaf(_)) => true,
            (Self::Group(left), RangeBundle::Group(right)) => {
                left.len() == right.len()
                    && left.iter().zip(right).all(|(l, r)| l.same_shape(r))
            }
            _ => false,
        }
    }
}

impl RangeBundle<TrackedRange> {
    /// Plain ranges of the leaves, depth-first.
    pub fn ranges(&self) -> Vec<TextRange> {
        self.leaves().into_iter().map(|tracked| tracked.range).collect()
    }
}
