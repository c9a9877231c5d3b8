use log::debug;
use rand::Rng;

use crate::activation::Activation;
use crate::errors::{NetworkError, Result};
use crate::math::Matrix;
use crate::train::{train_network, Sample, TrainConfig};

/// Fully-connected feed-forward network.
///
/// `weights[i]` has shape `[layers[i + 1] x layers[i]]` and `biases[i]` has
/// shape `[layers[i + 1] x 1]`. The activation cache holds the column
/// activations of the most recent `feed_forward` (input first) and is
/// consumed by `back_propagate`.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<usize>,
    weights: Vec<Matrix>,
    biases: Vec<Matrix>,
    learning_rate: f64,
    activation: Activation,
    cache: Vec<Matrix>,
}

impl Network {
    /// Builds a network with weights and biases drawn uniformly from `[-1, 1]`.
    pub fn new(layers: Vec<usize>, learning_rate: f64, activation: Activation) -> Result<Network> {
        Network::with_rng(layers, learning_rate, activation, &mut rand::thread_rng())
    }

    /// Same as `new`, drawing the initial parameters from `rng`.
    pub fn with_rng<R: Rng>(
        layers: Vec<usize>,
        learning_rate: f64,
        activation: Activation,
        rng: &mut R,
    ) -> Result<Network> {
        validate_topology(&layers)?;
        validate_learning_rate(learning_rate)?;

        let (weights, biases): (Vec<Matrix>, Vec<Matrix>) = layers
            .windows(2)
            .map(|pair| {
                (
                    Matrix::random_with(pair[1], pair[0], &mut *rng),
                    Matrix::random_with(pair[1], 1, &mut *rng),
                )
            })
            .unzip();

        debug!("built network with layers {:?}, learning rate {}", layers, learning_rate);

        Ok(Network {
            layers,
            weights,
            biases,
            learning_rate,
            activation,
            cache: Vec::new(),
        })
    }

    /// Assembles a network from explicit parameter matrices. The layer sizes
    /// are derived from the weight shapes, which must chain.
    pub fn from_parts(
        weights: Vec<Matrix>,
        biases: Vec<Matrix>,
        learning_rate: f64,
        activation: Activation,
    ) -> Result<Network> {
        validate_learning_rate(learning_rate)?;

        if weights.is_empty() {
            return Err(NetworkError::InvalidTopology("no weight matrices".into()));
        }
        if weights.len() != biases.len() {
            return Err(NetworkError::InvalidTopology(format!(
                "{} weight matrices but {} bias matrices",
                weights.len(),
                biases.len()
            )));
        }

        let mut layers = vec![weights[0].cols()];
        for (i, (w, b)) in weights.iter().zip(biases.iter()).enumerate() {
            if w.cols() != layers[i] {
                return Err(NetworkError::InvalidTopology(format!(
                    "weights[{}] expects {} inputs but the previous layer has {} units",
                    i,
                    w.cols(),
                    layers[i]
                )));
            }
            if b.shape() != (w.rows(), 1) {
                return Err(NetworkError::InvalidTopology(format!(
                    "biases[{}] has shape {:?}, expected {:?}",
                    i,
                    b.shape(),
                    (w.rows(), 1)
                )));
            }
            layers.push(w.rows());
        }
        validate_topology(&layers)?;

        Ok(Network {
            layers,
            weights,
            biases,
            learning_rate,
            activation,
            cache: Vec::new(),
        })
    }

    pub fn layers(&self) -> &[usize] {
        &self.layers
    }

    pub fn weights(&self) -> &[Matrix] {
        &self.weights
    }

    pub fn biases(&self) -> &[Matrix] {
        &self.biases
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) -> Result<()> {
        validate_learning_rate(learning_rate)?;
        self.learning_rate = learning_rate;
        Ok(())
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn input_size(&self) -> usize {
        self.layers[0]
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1]
    }

    /// Forward pass; replaces the activation cache with this call's layer
    /// activations and returns the output layer as a flat vector.
    pub fn feed_forward(&mut self, inputs: &[f64]) -> Result<Vec<f64>> {
        let activations = self.forward_pass(inputs)?;
        let output = activations[activations.len() - 1].to_vec();
        self.cache = activations;
        Ok(output)
    }

    /// Forward pass that leaves the activation cache untouched.
    pub fn predict(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        let activations = self.forward_pass(inputs)?;
        Ok(activations[activations.len() - 1].to_vec())
    }

    /// One stochastic gradient descent step on the sample whose forward pass
    /// produced `outputs`.
    ///
    /// Must directly follow the `feed_forward` that returned `outputs`. Every
    /// new weight and bias is computed before any is written, so a failed call
    /// leaves the network unchanged.
    pub fn back_propagate(&mut self, outputs: &[f64], targets: &[f64]) -> Result<()> {
        if targets.len() != self.output_size() {
            return Err(NetworkError::InvalidTargetSize {
                expected: self.output_size(),
                actual: targets.len(),
            });
        }
        if self.cache.len() != self.layers.len() {
            return Err(NetworkError::Precondition(
                "back_propagate requires a preceding feed_forward".into(),
            ));
        }
        let cached = self.cache[self.cache.len() - 1].to_vec();
        let same_bits = cached.len() == outputs.len()
            && cached.iter().zip(outputs).all(|(a, b)| a.to_bits() == b.to_bits());
        if !same_bits {
            return Err(NetworkError::Precondition(
                "outputs do not match the most recent feed_forward".into(),
            ));
        }

        let activation = self.activation;
        let rate = self.learning_rate;

        let outputs = Matrix::column(outputs)?;
        let error = Matrix::column(targets)?.subtract(&outputs)?;
        let mut gradient = outputs
            .map(|y| activation.derivative(y))
            .dot_multiply(&error)?;

        let mut updates = Vec::with_capacity(self.weights.len());
        for i in (0..self.weights.len()).rev() {
            let scaled = gradient.map(|g| g * rate);
            let weights = self.weights[i].add(&scaled.multiply(&self.cache[i].transpose())?)?;
            let biases = self.biases[i].add(&scaled)?;

            if i > 0 {
                // Propagate through the weights as they were before this step.
                let error = self.weights[i].transpose().multiply(&gradient)?;
                gradient = self.cache[i]
                    .map(|y| activation.derivative(y))
                    .dot_multiply(&error)?;
            }

            updates.push((i, weights, biases));
        }

        for (i, weights, biases) in updates {
            self.weights[i] = weights;
            self.biases[i] = biases;
        }
        self.cache.clear();

        Ok(())
    }

    /// Runs `iterations` in-order passes over `dataset`, one
    /// `feed_forward`/`back_propagate` pair per sample.
    pub fn train(&mut self, dataset: &[Sample], iterations: usize) -> Result<()> {
        self.train_with_config(dataset, &TrainConfig::new(iterations))
    }

    pub fn train_with_config(&mut self, dataset: &[Sample], config: &TrainConfig) -> Result<()> {
        train_network(self, dataset, config)
    }

    fn forward_pass(&self, inputs: &[f64]) -> Result<Vec<Matrix>> {
        if inputs.len() != self.input_size() {
            return Err(NetworkError::InvalidInputSize {
                expected: self.input_size(),
                actual: inputs.len(),
            });
        }

        let mut activations = Vec::with_capacity(self.layers.len());
        activations.push(Matrix::column(inputs)?);

        for (weights, biases) in self.weights.iter().zip(self.biases.iter()) {
            let current = weights
                .multiply(&activations[activations.len() - 1])?
                .add(biases)?
                .map(|x| self.activation.function(x));
            activations.push(current);
        }

        Ok(activations)
    }
}

fn validate_topology(layers: &[usize]) -> Result<()> {
    if layers.len() < 2 {
        return Err(NetworkError::InvalidTopology(format!(
            "need at least an input and an output layer, got {} layer(s)",
            layers.len()
        )));
    }
    if let Some(i) = layers.iter().position(|&size| size == 0) {
        return Err(NetworkError::InvalidTopology(format!("layer {} has zero units", i)));
    }
    Ok(())
}

fn validate_learning_rate(learning_rate: f64) -> Result<()> {
    if learning_rate.is_finite() && learning_rate > 0.0 {
        Ok(())
    } else {
        Err(NetworkError::InvalidLearningRate(learning_rate))
    }
}
