use crate::conversions::Sample;

/// Fixed-capacity history of the most recent samples, oldest first.
#[derive(Debug, Clone)]
pub(crate) struct SampleRing<T> {
    buf: Box<[T]>,
    head: usize,
    len: usize,
}

impl<T: Sample> SampleRing<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![T::zero(); capacity].into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// The `index`-th oldest sample.
    #[inline]
    pub fn get(&self, index: usize) -> T {
        debug_assert!(index < self.len);
        let mut pos = self.head + index;
        if pos >= self.capacity() {
            pos -= self.capacity();
        }
        self.buf[pos]
    }

    /// Appends a sample, dropping the oldest one when full.
    #[inline]
    pub fn push(&mut self, sample: T) {
        let capacity = self.capacity();
        if capacity == 0 {
            return;
        }
        if self.len < capacity {
            let pos = (self.head + self.len) % capacity;
            self.buf[pos] = sample;
            self.len += 1;
        } else {
            self.buf[self.head] = sample;
            self.head = (self.head + 1) % capacity;
        }
    }

    /// Appends samples, keeping at most the newest `capacity` of them.
    pub fn extend_from_slice(&mut self, samples: &[T]) {
        let capacity = self.capacity();
        if samples.len() >= capacity {
            self.buf.copy_from_slice(&samples[samples.len() - capacity..]);
            self.head = 0;
            self.len = capacity;
        } else {
            for &sample in samples {
                self.push(sample);
            }
        }
    }

    pub fn push_zeros(&mut self, count: usize) {
        let capacity = self.capacity();
        if count >= capacity {
            self.buf.fill(T::zero());
            self.head = 0;
            self.len = capacity;
        } else {
            for _ in 0..count {
                self.push(T::zero());
            }
        }
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len).map(|index| self.get(index))
    }

    pub fn is_silent(&self) -> bool {
        self.iter().all(|sample| sample.is_zero())
    }
}
