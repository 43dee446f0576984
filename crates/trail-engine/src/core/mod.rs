pub mod gate;
pub mod pool;
pub mod schedule;
pub mod zones;
