//! Data preparation: labeled datasets, census frames, transforms, splitting.

pub mod dataset;
pub mod frame;
pub mod split;
pub mod transform;

pub use dataset::{DatasetView, LabeledDataset};
pub use frame::{CensusFrame, IncomeSummary, encode_income};
pub use split::train_test_split;
pub use transform::{MinMaxScaler, Preprocessor, TransformPipeline, TransformStep, one_hot};
