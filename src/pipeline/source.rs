/*!
 * Temperature Sources
 * Where generator threads get their readings from
 */

use crate::core::types::Temperature;
use rand::Rng;
use std::ops::RangeInclusive;

/// Reading source shared by every generator thread
pub trait TemperatureSource: Send + Sync {
    /// Next reading for generator `sensor` (1-based)
    fn read(&self, sensor: usize) -> Temperature;
}

/// Uniformly distributed readings over an inclusive range
#[derive(Debug, Clone)]
pub struct UniformTemperature {
    range: RangeInclusive<Temperature>,
}

impl UniformTemperature {
    pub fn new(range: RangeInclusive<Temperature>) -> Self {
        Self { range }
    }
}

impl TemperatureSource for UniformTemperature {
    fn read(&self, _sensor: usize) -> Temperature {
        rand::thread_rng().gen_range(self.range.clone())
    }
}

impl<F> TemperatureSource for F
where
    F: Fn(usize) -> Temperature + Send + Sync,
{
    fn read(&self, sensor: usize) -> Temperature {
        self(sensor)
    }
}
