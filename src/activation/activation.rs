use std::f64::consts::E;
use std::fmt;

/// Activation strategy: a forward function paired with its derivative.
///
/// The derivative is expressed in terms of the forward **output** `y`, not the
/// pre-activation input. Backpropagation only has the cached outputs at hand,
/// so `derivative(y)` must equal `f'(x)` where `y = f(x)`.
///
/// Activations are not part of the saved network format; callers must supply
/// the same strategy again when loading.
#[derive(Clone, Copy)]
pub enum Activation {
    Sigmoid,
    Tanh,
    Custom {
        func: fn(f64) -> f64,
        dfunc: fn(f64) -> f64,
    },
}

pub const SIGMOID: Activation = Activation::Sigmoid;
pub const TANH: Activation = Activation::Tanh;

impl Activation {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            Activation::Tanh => x.tanh(),
            Activation::Custom { func, .. } => func(x),
        }
    }

    /// Derivative evaluated at the forward output `y`.
    pub fn derivative(&self, y: f64) -> f64 {
        match self {
            Activation::Sigmoid => y * (1.0 - y),
            Activation::Tanh => 1.0 - y * y,
            Activation::Custom { dfunc, .. } => dfunc(y),
        }
    }
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activation::Sigmoid => f.write_str("Sigmoid"),
            Activation::Tanh => f.write_str("Tanh"),
            Activation::Custom { .. } => f.write_str("Custom"),
        }
    }
}
