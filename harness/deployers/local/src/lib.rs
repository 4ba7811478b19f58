mod runner;

pub use runner::{LocalDeployer, LocalDeployerError};
