use kai_nn::{evaluate, Network, Sample, SIGMOID};

fn main() -> kai_nn::Result<()> {
    let mut network = Network::new(vec![2, 4, 1], 0.1, SIGMOID)?;

    let dataset = vec![
        Sample::new(vec![0.0, 0.0], vec![0.0]),
        Sample::new(vec![0.0, 1.0], vec![1.0]),
        Sample::new(vec![1.0, 0.0], vec![1.0]),
        Sample::new(vec![1.0, 1.0], vec![0.0]),
    ];

    let iterations = 20_000;
    network.train(&dataset, iterations)?;
    println!("After {iterations} iterations: mse = {:.6}", evaluate(&network, &dataset)?);

    for sample in &dataset {
        println!("Input: {:?} -> Output: {:.4}", sample.inputs, network.predict(&sample.inputs)?[0]);
    }

    println!("{}", network.save()?);
    Ok(())
}
