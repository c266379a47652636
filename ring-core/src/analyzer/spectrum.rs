//! Spectrum storage type

/// Type alias for spectral magnitudes.
///
/// Magnitudes are byte-scaled: every bucket lies in `0.0..=255.0`.
pub type Magnitude = f32;

/// Largest magnitude a bucket can hold.
pub const MAX_MAGNITUDE: Magnitude = 255.0;

/// Trait for types that can be used as storage for a spectrum
pub trait Storage: std::ops::Deref<Target = [Magnitude]> {}

/// Trait for types that can be used as mutable storage for a spectrum
pub trait StorageMut: std::ops::Deref<Target = [Magnitude]> + std::ops::DerefMut {}

impl<T> Storage for T where T: std::ops::Deref<Target = [Magnitude]> {}

impl<T> StorageMut for T where T: Storage + std::ops::DerefMut {}

/// A magnitude spectrum.
///
/// Buckets are addressed by index only; consumers carve the array into
/// regions by fractions of its length, so no frequency mapping is kept.
#[derive(Debug, Clone)]
pub struct Spectrum<S: Storage> {
    buckets: S,
}

impl<S: Storage> std::ops::Index<usize> for Spectrum<S> {
    type Output = Magnitude;

    fn index(&self, index: usize) -> &Self::Output {
        &self.buckets[index]
    }
}

impl<S: StorageMut> std::ops::IndexMut<usize> for Spectrum<S> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.buckets[index]
    }
}

impl Default for Spectrum<Vec<Magnitude>> {
    fn default() -> Self {
        Spectrum { buckets: vec![0.0] }
    }
}

impl<S: Storage> Spectrum<S> {
    /// Create a new spectrum from a storage buffer.
    ///
    /// # Example
    /// ```
    /// # use ring_core::analyzer;
    /// const N: usize = 512;
    /// let spectrum = analyzer::Spectrum::new(vec![0.0; N]);
    /// ```
    pub fn new(data: S) -> Spectrum<S> {
        Spectrum { buckets: data }
    }

    /// Iterate over the buckets of this spectrum
    pub fn iter(&self) -> std::slice::Iter<'_, Magnitude> {
        self.buckets.iter()
    }

    /// Return the number of buckets in this spectrum
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn as_ref(&self) -> Spectrum<&[Magnitude]> {
        Spectrum {
            buckets: &self.buckets,
        }
    }

    /// Return the highest magnitude in this spectrum.
    ///
    /// An empty spectrum yields `0.0`.
    pub fn max(&self) -> Magnitude {
        self.buckets.iter().fold(0.0, |a, &b| a.max(b))
    }

    /// Return the average magnitude over the whole spectrum.
    pub fn mean(&self) -> Magnitude {
        if self.buckets.is_empty() {
            return 0.0;
        }
        self.buckets.iter().sum::<Magnitude>() / self.len() as f32
    }

    /// Return the average magnitude over a range of buckets.
    ///
    /// Bounds are clamped to the spectrum length; an empty range yields
    /// `0.0`.
    ///
    /// # Example
    /// ```
    /// # use ring_core::analyzer;
    /// let mut spectrum = analyzer::Spectrum::new(vec![0.0; 8]);
    /// spectrum[0] = 100.0;
    /// spectrum[1] = 200.0;
    ///
    /// assert_eq!(spectrum.mean_range(0..2), 150.0);
    /// ```
    pub fn mean_range(&self, range: std::ops::Range<usize>) -> Magnitude {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        if start == end {
            return 0.0;
        }

        self.buckets[start..end].iter().sum::<Magnitude>() / (end - start) as f32
    }
}

impl<S: StorageMut> Spectrum<S> {
    /// Iterate over this spectrums buckets mutably
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Magnitude> {
        self.buckets.iter_mut()
    }

    /// Fill this spectrum with values from another one
    pub fn fill_from<S2: Storage>(&mut self, other: &Spectrum<S2>) {
        assert_eq!(self.len(), other.len(), "Spectrums have different sizes!");

        for (s, o) in self.iter_mut().zip(other.iter()) {
            *s = *o;
        }
    }
}
