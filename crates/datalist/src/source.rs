//! Record sources handed to the pipeline.
//!
//! A source produces a fresh borrowing iterator on every call, so the
//! pipeline can walk it once for the main rows and again for the selected
//! records. Whether a source is already ordered is declared explicitly:
//! wrap it in [`Ordered`] when the producer sorted it on purpose.

/// A sequence of records the pipeline can iterate.
pub trait RecordSource<T> {
    type Iter<'a>: Iterator<Item = &'a T>
    where
        Self: 'a,
        T: 'a;

    /// Returns an iterator over the records.
    fn records(&self) -> Self::Iter<'_>;

    /// Returns `true` if the producer imposed an explicit ordering that
    /// must survive when the request has no sort key.
    fn is_ordered(&self) -> bool {
        false
    }
}

impl<T> RecordSource<T> for [T] {
    type Iter<'a>
        = std::slice::Iter<'a, T>
    where
        T: 'a;

    fn records(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<T> RecordSource<T> for Vec<T> {
    type Iter<'a>
        = std::slice::Iter<'a, T>
    where
        T: 'a;

    fn records(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<T, S: RecordSource<T> + ?Sized> RecordSource<T> for &S {
    type Iter<'a>
        = S::Iter<'a>
    where
        Self: 'a,
        T: 'a;

    fn records(&self) -> Self::Iter<'_> {
        (**self).records()
    }

    fn is_ordered(&self) -> bool {
        (**self).is_ordered()
    }
}

/// Marks a source as explicitly ordered by its producer.
///
/// ```
/// use datalist::{Ordered, RecordSource};
///
/// let mut names = vec!["b", "c", "a"];
/// names.sort();
/// let source = Ordered(names);
/// assert!(source.is_ordered());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Ordered<S>(pub S);

impl<T, S: RecordSource<T>> RecordSource<T> for Ordered<S> {
    type Iter<'a>
        = S::Iter<'a>
    where
        Self: 'a,
        T: 'a;

    fn records(&self) -> Self::Iter<'_> {
        self.0.records()
    }

    fn is_ordered(&self) -> bool {
        true
    }
}
