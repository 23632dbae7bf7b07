use core::fmt;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Outcome of a single temperature or humidity reading.
///
/// The numeric codes are stable and can be stored or transmitted.
pub enum Status {
    /// The reading passed the CRC check and is marked valid.
    Ok = 1,
    /// The CRC matched but the device flagged the reading as not valid.
    Invalid = 2,
    /// The transmitted CRC does not match the payload; the data is untrustworthy.
    CrcError = 3,
    /// The I2C transfer failed; no data was received.
    I2cError = 4,
}

impl Status {
    /// Returns a short human readable description of the status.
    pub const fn as_str(&self) -> &'static str {
        use Status::*;
        match self {
            Ok => "ok",
            Invalid => "data-invalid",
            CrcError => "crc-error",
            I2cError => "i2c-error",
        }
    }

    /// Returns `true` if the accompanying data can be used.
    pub const fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i32> for Status {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Status::Ok),
            2 => Ok(Status::Invalid),
            3 => Ok(Status::CrcError),
            4 => Ok(Status::I2cError),
            other => Err(other),
        }
    }
}

/// Description returned by [`status_str`] for codes that are not a [`Status`].
pub const UNKNOWN_STATUS: &str = "unknown-status";

/// Converts a numeric status code into a human readable string.
///
/// Codes that do not correspond to a [`Status`] map to [`UNKNOWN_STATUS`].
pub fn status_str(code: i32) -> &'static str {
    Status::try_from(code)
        .map(|s| s.as_str())
        .unwrap_or(UNKNOWN_STATUS)
}
