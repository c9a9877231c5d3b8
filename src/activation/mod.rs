pub mod activation;

pub use activation::{Activation, SIGMOID, TANH};
