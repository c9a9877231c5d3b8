pub mod sample;
pub mod train_config;
pub mod trainer;

pub use sample::Sample;
pub use train_config::TrainConfig;
pub use trainer::{evaluate, train_network};
