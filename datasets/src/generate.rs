//! Utility functions for randomly generating datasets

use ndarray::{s, Array, Array2, ArrayBase, Data, Ix1, Ix2};
use ndarray_rand::{
    rand::Rng,
    rand_distr::{Distribution, StandardNormal},
    RandomExt,
};
use sylva::{Attribute, Instance, InstanceList};

/// Special case of `blobs_with_distribution` with a standard normal distribution.
pub fn blobs(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    rng: &mut impl Rng,
) -> InstanceList {
    blobs_with_distribution(blob_size, blob_centroids, StandardNormal, rng)
}

/// Given an input matrix `blob_centroids`, with shape `(n_blobs, n_features)`,
/// generate `blob_size` instances (a "blob") around each of the blob centroids.
///
/// Every instance has one continuous attribute per feature and is labelled with the index of
/// its blob. Blobs far apart from each other make a best-case input for tree learners, which is
/// what benchmarks of training time need.
pub fn blobs_with_distribution(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    distribution: impl Distribution<f64> + Clone,
    rng: &mut impl Rng,
) -> InstanceList {
    let (n_centroids, n_features) = blob_centroids.dim();
    let mut blobs: Array2<f64> = Array2::zeros((n_centroids * blob_size, n_features));

    for (blob_index, blob_centroid) in blob_centroids.rows().into_iter().enumerate() {
        let blob = make_blob(blob_size, &blob_centroid, distribution.clone(), rng);

        let indexes = s![blob_index * blob_size..(blob_index + 1) * blob_size, ..];
        blobs.slice_mut(indexes).assign(&blob);
    }

    blobs
        .rows()
        .into_iter()
        .enumerate()
        .map(|(row_index, row)| {
            let attributes = row.iter().map(|value| Attribute::Continuous(*value)).collect();
            Instance::new((row_index / blob_size).to_string(), attributes)
        })
        .collect()
}

/// Generate `blob_size` data points (a "blob") around `blob_centroid` using the given distribution.
fn make_blob(
    blob_size: usize,
    blob_centroid: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    distribution: impl Distribution<f64>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let shape = (blob_size, blob_centroid.len());
    let origin_blob: Array2<f64> = Array::random_using(shape, distribution, rng);
    origin_blob + blob_centroid
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn blobs_are_labelled_by_centroid() {
        let mut rng = SmallRng::seed_from_u64(42);
        let centroids = array![[-100., -100.], [100., 100.]];
        let data = blobs(5, &centroids, &mut rng);

        assert_eq!(data.len(), 10);
        assert_eq!(data.attribute_count(), 2);
        for instance in data.iter() {
            let x = instance.attribute(0).and_then(Attribute::continuous_value);
            match instance.class_label() {
                "0" => assert!(x.map_or(false, |x| x < 0.)),
                "1" => assert!(x.map_or(false, |x| x > 0.)),
                label => panic!("unexpected label {}", label),
            }
        }
    }
}
