use ndarray::{Array1, ArrayView1, Axis};
use rand::{seq::SliceRandom, Rng};

use super::SampleSet;

/// Owned training buffers for a single fit, laid out for mini-batch iteration.
///
/// The buffers live exactly as long as the fit that created them and are released on every
/// exit path when this value goes out of scope.
pub(crate) struct Batches {
    source_xs: Array1<f64>,
    source_ys: Array1<f64>,
    /// Indices into the source buffers, in the current epoch's order.
    order: Vec<usize>,
    xs: Array1<f64>,
    ys: Array1<f64>,
}

impl Batches {
    pub fn new(set: &SampleSet) -> Self {
        let (xs, ys) = set.to_arrays();
        Self {
            order: (0..xs.len()).collect(),
            source_xs: xs.clone(),
            source_ys: ys.clone(),
            xs,
            ys,
        }
    }

    /// Reorders the samples, keeping every (x, y) pair together.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.order.shuffle(rng);
        self.xs = self.source_xs.select(Axis(0), &self.order);
        self.ys = self.source_ys.select(Axis(0), &self.order);
    }

    /// Iterates over consecutive batches of at most `batch_size` samples, the last one
    /// possibly shorter.
    pub fn iter(
        &self,
        batch_size: usize,
    ) -> impl Iterator<Item = (ArrayView1<'_, f64>, ArrayView1<'_, f64>)> {
        let batch_size = batch_size.max(1);
        self.xs
            .axis_chunks_iter(Axis(0), batch_size)
            .zip(self.ys.axis_chunks_iter(Axis(0), batch_size))
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn set() -> SampleSet {
        let xs: Vec<f64> = (0..10).map(f64::from).collect();
        let ys = xs.iter().map(|x| 10.0 * x).collect();
        SampleSet::new(xs, ys).unwrap()
    }

    #[test]
    fn batches_cover_every_sample_once() {
        let batches = Batches::new(&set());
        let sizes: Vec<_> = batches.iter(4).map(|(x, _)| x.len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
    }

    #[test]
    fn shuffle_keeps_pairs_together() {
        let mut batches = Batches::new(&set());
        batches.shuffle(&mut StdRng::seed_from_u64(3));

        let mut seen = Vec::new();
        for (x, y) in batches.iter(3) {
            for (x, y) in x.iter().zip(y) {
                assert_eq!(*y, 10.0 * x);
                seen.push(*x as usize);
            }
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn order_indexes_the_source_set() {
        let mut batches = Batches::new(&set());
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..3 {
            batches.shuffle(&mut rng);
            for (pos, &idx) in batches.order.iter().enumerate() {
                assert_eq!(batches.xs[pos], idx as f64);
                assert_eq!(batches.ys[pos], 10.0 * idx as f64);
            }
        }
    }
}
