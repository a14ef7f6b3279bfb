//! `sylva-datasets` provides a collection of commonly used datasets ready to be used in tests and examples.
//!
//! ## The Big Picture
//!
//! `sylva-datasets` is a crate in the `sylva` workspace. Datasets are returned as
//! [`sylva::InstanceList`]s whose instances carry typed attributes and a class label.
//!
//! ## Current State
//!
//! Currently the following datasets are provided:
//!
//! * `["iris"]` : iris flower dataset, four continuous attributes
//! * `["weather"]` : play tennis dataset, three discrete and one binary attribute
//!
//! along with [generators](generate) for synthetic data.
//!
//! ## Using a dataset
//!
//! To use one of the provided datasets in your project add the crate to your Cargo.toml with the corresponding feature enabled:
//! ```ignore
//! sylva-datasets = { version = "0.3.0", features = ["iris"] }
//! ```
//! and then use it in your example or tests as
//! ```ignore
//! let (train, valid) = sylva_datasets::iris().stratified_split(0.8, 1);
//! /// ...
//! ```

pub mod generate;

use std::io::Read;

use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use ndarray::prelude::*;
use ndarray_csv::{Array2Reader, ReadError};
#[cfg(any(feature = "iris", feature = "weather"))]
use sylva::{Attribute, Instance, InstanceList};

/// Convert Gzipped CSV bytes into 2D array
pub fn array_from_gz_csv<R: Read>(
    gz: R,
    has_headers: bool,
    separator: u8,
) -> Result<Array2<f64>, ReadError> {
    // unzip file
    let file = GzDecoder::new(gz);
    array_from_csv(file, has_headers, separator)
}

/// Convert CSV bytes into 2D array
pub fn array_from_csv<R: Read>(
    csv: R,
    has_headers: bool,
    separator: u8,
) -> Result<Array2<f64>, ReadError> {
    // parse CSV
    let mut reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .delimiter(separator)
        .from_reader(csv);

    // extract ndarray
    reader.deserialize_array2_dynamic()
}

/// Class labels of the iris dataset, in the order of their numeric code in the data file
pub const IRIS_LABELS: [&str; 3] = ["Iris-setosa", "Iris-versicolor", "Iris-virginica"];

#[cfg(feature = "iris")]
/// Read in the iris-flower dataset from dataset path.
///
/// 150 instances with the continuous attributes sepal length, sepal width, petal length and
/// petal width, 50 per class.
// The `.csv` data is two dimensional: Axis(0) denotes y-axis (rows), Axis(1) denotes x-axis (columns)
pub fn iris() -> InstanceList {
    let data = include_bytes!("../data/iris.csv.gz");
    let array = array_from_gz_csv(&data[..], true, b',').unwrap();

    array
        .rows()
        .into_iter()
        .map(|row| {
            let attributes = row
                .slice(s![0..4])
                .iter()
                .map(|value| Attribute::Continuous(*value))
                .collect();
            Instance::new(IRIS_LABELS[row[4] as usize], attributes)
        })
        .collect()
}

#[cfg(feature = "weather")]
/// Read in the weather dataset, deciding whether to play tennis.
///
/// 14 instances with the discrete attributes outlook (`sunny`, `overcast`, `rainy`),
/// temperature (`hot`, `mild`, `cool`) and humidity (`high`, `normal`), the binary attribute
/// windy and the class labels `yes` and `no`.
pub fn weather() -> InstanceList {
    let data = include_bytes!("../data/weather.csv");
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(&data[..]);

    reader
        .records()
        .map(|record| {
            let record = record.unwrap();
            let attributes = vec![
                Attribute::from(&record[0]),
                Attribute::from(&record[1]),
                Attribute::from(&record[2]),
                Attribute::Binary(&record[3] == "true"),
            ];
            Instance::new(&record[4], attributes)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[cfg(feature = "iris")]
    #[test]
    fn test_iris() {
        let ds = iris();

        // check that we have the right amount of data
        assert_eq!(ds.len(), 150);
        assert_eq!(ds.attribute_count(), 4);

        // check for balanced classes
        let classes = ds.class_distribution();
        for label in IRIS_LABELS.iter() {
            assert_eq!(classes.count(label), 50);
        }
        assert_eq!(ds.class_labels(), IRIS_LABELS.to_vec());

        // the first flower
        assert_eq!(ds[0].class_label(), "Iris-setosa");
        assert_abs_diff_eq!(
            ds[0].to_vector(),
            array![5.1, 3.5, 1.4, 0.2],
            epsilon = 1e-10
        );
    }

    #[cfg(feature = "weather")]
    #[test]
    fn test_weather() {
        let ds = weather();

        assert_eq!(ds.len(), 14);
        assert_eq!(ds.attribute_count(), 4);
        assert_eq!(ds.class_distribution().count("yes"), 9);
        assert_eq!(ds.class_distribution().count("no"), 5);

        assert_eq!(
            ds.attribute_value_list(0),
            vec!["sunny", "overcast", "rainy"]
        );
        assert_eq!(ds[1].attribute(3), Some(&Attribute::Binary(true)));
        // the entropy of the class distribution, a classic textbook value
        assert_abs_diff_eq!(ds.class_distribution().entropy(), 0.940, epsilon = 1e-3);
    }

    #[test]
    fn parses_plain_csv() {
        let array = array_from_csv("a,b\n1,2\n3,4\n".as_bytes(), true, b',').unwrap();
        assert_eq!(array, array![[1., 2.], [3., 4.]]);
    }
}
