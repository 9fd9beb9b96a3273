//! Dataset container handed to criterion functions.
use ndarray::{Array1, Array2};

/// A labeled sample matrix: one row per sample, one column per feature.
///
/// The search algorithms themselves only ever look at `dimension()`; the
/// matrix and labels are passed through untouched to the caller's criterion
/// during `initialize`.
#[derive(Debug, Clone)]
pub struct DataSet {
    /// Feature matrix, shape (n_samples, n_features)
    pub x: Array2<f64>,
    /// Class labels (crate convention: 1 for the positive class, -1 for the
    /// negative class in two-class problems)
    pub y: Array1<i32>,
}

impl DataSet {
    pub fn new(x: Array2<f64>, y: Array1<i32>) -> Self {
        DataSet { x, y }
    }

    /// A dataset carrying only a dimension and no samples. Useful for
    /// synthetic criteria that ignore the data entirely.
    pub fn empty(dimension: usize) -> Self {
        DataSet {
            x: Array2::zeros((0, dimension)),
            y: Array1::zeros(0),
        }
    }

    /// Number of features.
    pub fn dimension(&self) -> usize {
        self.x.ncols()
    }

    /// Number of samples.
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    /// Log a short summary of the input data.
    pub fn log_input_data_summary(&self) {
        log::info!(
            "Input data: {} samples with {} features",
            self.n_samples(),
            self.dimension()
        );
        let positives = self.y.iter().filter(|&&v| v == 1).count();
        let negatives = self.y.iter().filter(|&&v| v == -1).count();
        if positives + negatives > 0 {
            log::info!("Class balance: {} positives, {} negatives", positives, negatives);
        }
    }
}
