use log::info;

use crate::errors::{NetworkError, Result};
use crate::loss::mse::MseLoss;
use crate::network::network::Network;
use crate::train::sample::Sample;
use crate::train::train_config::TrainConfig;

/// Trains `network` in place with per-sample gradient descent.
///
/// Each of `config.iterations` passes visits `dataset` in order and runs
/// `feed_forward` followed by `back_propagate` on every sample. There is no
/// shuffling and no early stopping. All samples are checked against the
/// network's input and output sizes before the first update.
pub fn train_network(network: &mut Network, dataset: &[Sample], config: &TrainConfig) -> Result<()> {
    for sample in dataset {
        check_sample(network, sample)?;
    }

    let total = config.iterations;
    for iteration in 1..=total {
        if config.report_progress && should_report(iteration, total) {
            let percent = (iteration as f64 / total as f64 * 100.0).round();
            info!("Iteration {} of {} ({}%)", iteration, total, percent);
        }

        for sample in dataset {
            let outputs = network.feed_forward(&sample.inputs)?;
            network.back_propagate(&outputs, &sample.targets)?;
        }
    }

    Ok(())
}

/// Mean squared error of `network` over `dataset`. Does not modify the network.
pub fn evaluate(network: &Network, dataset: &[Sample]) -> Result<f64> {
    if dataset.is_empty() {
        return Ok(0.0);
    }

    let mut total = 0.0;
    for sample in dataset {
        check_sample(network, sample)?;
        let outputs = network.predict(&sample.inputs)?;
        total += MseLoss::loss(&outputs, &sample.targets);
    }

    Ok(total / dataset.len() as f64)
}

fn check_sample(network: &Network, sample: &Sample) -> Result<()> {
    if sample.inputs.len() != network.input_size() {
        return Err(NetworkError::InvalidInputSize {
            expected: network.input_size(),
            actual: sample.inputs.len(),
        });
    }
    if sample.targets.len() != network.output_size() {
        return Err(NetworkError::InvalidTargetSize {
            expected: network.output_size(),
            actual: sample.targets.len(),
        });
    }
    Ok(())
}

/// Every iteration for short runs, otherwise whenever `iteration` is a
/// multiple of `total / 100` (fractional steps included).
fn should_report(iteration: usize, total: usize) -> bool {
    total < 100 || (iteration as f64 % (total as f64 / 100.0)) == 0.0
}
