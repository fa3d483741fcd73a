use crate::specs::ActFnSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActFn {
    Relu,
    Sigmoid,
    Tanh,
}
use ActFn::*;

impl ActFn {
    pub fn f(&self, x: f64) -> f64 {
        match self {
            Relu => x.max(0.0),
            Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Tanh => x.tanh(),
        }
    }
}

impl From<ActFnSpec> for ActFn {
    fn from(value: ActFnSpec) -> Self {
        match value {
            ActFnSpec::Relu => Relu,
            ActFnSpec::Sigmoid => Sigmoid,
            ActFnSpec::Tanh => Tanh,
        }
    }
}
