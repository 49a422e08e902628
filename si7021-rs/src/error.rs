#[derive(Debug, PartialEq)]
/// Represents errors that can occur while interacting with the SI7021 sensor.
pub enum Error<E> {
    /// An error occurred while communicating with the I2C bus.
    I2c(E),
    /// The sensor did not deliver a response within the configured number of read attempts.
    Timeout,
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::I2c(e)
    }
}
