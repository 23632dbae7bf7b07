#[derive(Debug, PartialEq)]
/// Represents errors that can occur while interacting with the ENS210 sensor.
pub enum Error<E> {
    /// An error occurred while communicating with the I2C bus.
    I2c(E),
    /// The device answered with a part identifier other than `0x0210`.
    InvalidId(u16),
    /// Attempted to write to a register that is not writable.
    ReadOnly,
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::I2c(e)
    }
}
