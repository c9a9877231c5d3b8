pub mod math;
pub mod activation;
pub mod network;
pub mod loss;
pub mod train;
pub mod errors;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::{Activation, SIGMOID, TANH};
pub use network::network::Network;
pub use network::saved::SavedNetwork;
pub use loss::mse::MseLoss;
pub use train::sample::Sample;
pub use train::train_config::TrainConfig;
pub use train::trainer::{evaluate, train_network};
pub use errors::network_error::{NetworkError, Result};
