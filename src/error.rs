use thiserror::Error;

/// Failures reported by tree operations. None of them leave the tree altered: validation happens
/// before any structural change begins.
#[derive(Debug, Clone, Copy, Error, Eq, PartialEq)]
pub enum TreeError {
    /// The element cannot be ordered even against itself, so it has no position in the tree.
    #[error("element is not representable under the active ordering")]
    InvalidElement,
    /// Two elements turned out to be incomparable while descending the tree.
    #[error("elements are not comparable under the active ordering")]
    Incomparable,
    /// The traversal has no further element.
    #[error("traversal is exhausted")]
    Exhausted,
    /// "Remove current" without a preceding successful advance, or a second time for the same
    /// position.
    #[error("no current element to remove")]
    NoCurrent,
}
