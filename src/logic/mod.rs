pub mod adapter;
pub mod analysis;
pub mod blending;
pub mod catalog;
pub mod estimator;
pub mod feasibility;
pub mod messages;
pub mod ranker;

pub use adapter::FeatureAdapter;
pub use analysis::AnalysisService;
pub use catalog::CropCatalog;
pub use estimator::train_estimator;
