use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::errors::{NetworkError, Result};
use crate::math::Matrix;
use crate::network::network::Network;

/// On-disk form of a trained network.
///
/// The activation strategy is not stored. Loading with a different
/// activation than the one used for training silently changes the outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedNetwork {
    pub inputs: usize,
    pub weights: Vec<Vec<Vec<f64>>>,
    pub biases: Vec<Vec<Vec<f64>>>,
    pub learning_rate: f64,
}

impl SavedNetwork {
    pub fn from_network(network: &Network) -> SavedNetwork {
        SavedNetwork {
            inputs: network.input_size(),
            weights: network.weights().iter().map(|m| m.data().to_vec()).collect(),
            biases: network.biases().iter().map(|m| m.data().to_vec()).collect(),
            learning_rate: network.learning_rate(),
        }
    }

    /// Rebuilds the network; the layer sizes are `inputs` followed by the row
    /// count of each weight grid.
    pub fn into_network(self, activation: Activation) -> Result<Network> {
        if self.inputs == 0 {
            return Err(NetworkError::Format("input layer size must be positive".into()));
        }
        if self.weights.is_empty() {
            return Err(NetworkError::Format("no weight grids".into()));
        }
        if self.weights.len() != self.biases.len() {
            return Err(NetworkError::Format(format!(
                "{} weight grids but {} bias grids",
                self.weights.len(),
                self.biases.len()
            )));
        }

        let weights = to_matrices(self.weights, "weights")?;
        let biases = to_matrices(self.biases, "biases")?;

        if weights[0].cols() != self.inputs {
            return Err(NetworkError::Format(format!(
                "declared {} inputs but the first weight grid has {} columns",
                self.inputs,
                weights[0].cols()
            )));
        }

        Network::from_parts(weights, biases, self.learning_rate, activation)
            .map_err(|e| NetworkError::Format(e.to_string()))
    }
}

fn to_matrices(grids: Vec<Vec<Vec<f64>>>, field: &str) -> Result<Vec<Matrix>> {
    grids
        .into_iter()
        .enumerate()
        .map(|(i, grid)| {
            Matrix::from_data(grid).map_err(|e| NetworkError::Format(format!("{}[{}]: {}", field, i, e)))
        })
        .collect()
}

impl Network {
    /// Serializes weights, biases, input size and learning rate to JSON.
    pub fn save(&self) -> Result<String> {
        Ok(serde_json::to_string(&SavedNetwork::from_network(self))?)
    }

    /// Restores a network written by `save`. `activation` must be the one the
    /// network was trained with.
    pub fn load(serialized: &str, activation: Activation) -> Result<Network> {
        let saved: SavedNetwork =
            serde_json::from_str(serialized).map_err(|e| NetworkError::Format(e.to_string()))?;
        let network = saved.into_network(activation)?;
        debug!("loaded network with layers {:?}", network.layers());
        Ok(network)
    }

    /// Writes the saved form to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &SavedNetwork::from_network(self))?;
        Ok(())
    }

    /// Reads a network from a JSON file written by `save_json`.
    pub fn load_json<P: AsRef<Path>>(path: P, activation: Activation) -> Result<Network> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let saved: SavedNetwork =
            serde_json::from_reader(reader).map_err(|e| NetworkError::Format(e.to_string()))?;
        saved.into_network(activation)
    }
}
