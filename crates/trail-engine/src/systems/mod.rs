pub mod cleanup;
pub mod rng;
