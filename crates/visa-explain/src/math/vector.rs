use std::fmt;
use std::iter::FromIterator;
use std::ops::{Index, IndexMut};
use std::slice::{Iter, IterMut};

use num_traits::{Float, Zero};
use serde::{Deserialize, Serialize};

/// One-dimensional container used for label vectors and per-interval series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Array1<T> {
    data: Vec<T>,
}

impl<T> Array1<T> {
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.data.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn mapv<U, F>(&self, mut f: F) -> Array1<U>
    where
        F: FnMut(&T) -> U,
    {
        Array1::from_vec(self.data.iter().map(|v| f(v)).collect())
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.data.clone()
    }

    /// Append `other` after `self`.
    pub fn concat(&self, other: &Array1<T>) -> Array1<T>
    where
        T: Clone,
    {
        let mut data = Vec::with_capacity(self.len() + other.len());
        data.extend_from_slice(&self.data);
        data.extend_from_slice(&other.data);
        Array1::from_vec(data)
    }
}

impl<T> Array1<T>
where
    T: Clone,
{
    pub fn from_elem(len: usize, value: T) -> Self {
        Array1::from_vec(vec![value; len])
    }
}

impl<T> Array1<T>
where
    T: Clone + Zero,
{
    pub fn zeros(len: usize) -> Self {
        Array1::from_vec(vec![T::zero(); len])
    }
}

impl<T> Array1<T>
where
    T: Float,
{
    /// Smallest and largest value, ignoring NaN. `None` when nothing is left.
    pub fn min_max(&self) -> Option<(T, T)> {
        self.data
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

impl<T> From<Vec<T>> for Array1<T> {
    fn from(value: Vec<T>) -> Self {
        Array1::from_vec(value)
    }
}

impl<T> From<Array1<T>> for Vec<T> {
    fn from(value: Array1<T>) -> Self {
        value.data
    }
}

impl<T> FromIterator<T> for Array1<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Array1::from_vec(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a Array1<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<T> Index<usize> for Array1<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for Array1<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl<T: fmt::Display> fmt::Display for Array1<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, value) in self.data.iter().enumerate() {
            write!(f, "{}", value)?;
            if idx + 1 != self.data.len() {
                write!(f, ", ")?;
            }
        }
        write!(f, "]")
    }
}
