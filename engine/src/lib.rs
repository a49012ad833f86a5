pub mod classify;
pub mod dataset;
pub mod density;
pub mod eigen;
pub mod linalg;
pub mod metrics;
pub mod pca;
pub mod report;
pub mod stats;
pub mod synthetic;
pub mod table;
mod util;
