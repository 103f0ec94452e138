//! Ordering policies for tree elements.
//!
//! A tree orders its elements either by their natural order ([`NaturalOrder`], backed by
//! [`PartialOrd`]) or by a caller supplied three-way comparison. Any closure of the shape
//! `Fn(&T, &T) -> Ordering` is accepted directly as a comparator.

use std::cmp::Ordering;

pub trait Comparator<T: ?Sized> {
    /// Three-way comparison of `a` against `b`. `None` means the two elements cannot be ordered
    /// against each other under this policy.
    fn compare(&self, a: &T, b: &T) -> Option<Ordering>;

    /// Whether `element` can take part in ordering at all. An element that does not compare equal
    /// to itself (a floating point NaN, for example) has no place in the tree.
    fn admits(&self, element: &T) -> bool {
        matches!(self.compare(element, element), Some(Ordering::Equal))
    }
}

/// The elements' own ordering.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NaturalOrder;

impl<T: PartialOrd + ?Sized> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Option<Ordering> {
        a.partial_cmp(b)
    }
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Option<Ordering> {
        Some(self(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_order() {
        assert_eq!(NaturalOrder.compare(&1, &2), Some(Ordering::Less));
        assert_eq!(NaturalOrder.compare("b", "a"), Some(Ordering::Greater));
        assert!(NaturalOrder.admits(&3));
    }

    #[test]
    fn test_nan_is_not_admitted() {
        assert!(!NaturalOrder.admits(&f64::NAN));
        assert_eq!(NaturalOrder.compare(&1.0, &f64::NAN), None);
        assert!(NaturalOrder.admits(&1.5f64));
    }

    #[test]
    fn test_closure_comparator() {
        let descending = |a: &i32, b: &i32| b.cmp(a);
        assert_eq!(descending.compare(&1, &2), Some(Ordering::Greater));
        assert!(descending.admits(&7));
    }
}
