use bitfield_struct::bitfield;
use embedded_hal::i2c::{I2c, SevenBitAddress};

use crate::{
    Error, Status,
    crc::{PAYLOAD_MASK, crc7},
    device::Ens210,
};

/// Value of the `PART_ID` register of an ENS210.
pub const ENS210_PART_ID: u16 = 0x0210;

pub(crate) trait Ens210Register: Default {
    const ADDRESS: u8;
    const REGISTER_LEN: usize;

    fn read<T: I2c<SevenBitAddress>>(
        &mut self,
        ens: &Ens210,
        i2c: &mut T,
    ) -> Result<(), Error<T::Error>>;
    fn write<T: I2c<SevenBitAddress>>(
        &mut self,
        _ens: &Ens210,
        _i2c: &mut T,
    ) -> Result<(), Error<T::Error>> {
        Err(Error::ReadOnly)
    }
}

fn read_bytes<T: I2c<SevenBitAddress>>(
    ens: &Ens210,
    i2c: &mut T,
    address: u8,
    buffer: &mut [u8],
) -> Result<(), Error<T::Error>> {
    i2c.write_read(ens.address, &[address], buffer)?;
    Ok(())
}

#[derive(Debug, Default)]
/// The `PART_ID` register.
pub(crate) struct PartId {
    pub(crate) value: u16,
}

impl Ens210Register for PartId {
    const ADDRESS: u8 = 0x00;
    const REGISTER_LEN: usize = 2;

    fn read<T: I2c<SevenBitAddress>>(
        &mut self,
        ens: &Ens210,
        i2c: &mut T,
    ) -> Result<(), Error<T::Error>> {
        let mut buffer = [0u8; Self::REGISTER_LEN];
        read_bytes(ens, i2c, Self::ADDRESS, &mut buffer)?;
        self.value = u16::from_le_bytes(buffer);
        Ok(())
    }
}

#[derive(Debug, Default)]
/// The `UID` register.
pub(crate) struct Uid {
    pub(crate) value: u64,
}

impl Ens210Register for Uid {
    const ADDRESS: u8 = 0x04;
    const REGISTER_LEN: usize = 8;

    fn read<T: I2c<SevenBitAddress>>(
        &mut self,
        ens: &Ens210,
        i2c: &mut T,
    ) -> Result<(), Error<T::Error>> {
        let mut buffer = [0u8; Self::REGISTER_LEN];
        read_bytes(ens, i2c, Self::ADDRESS, &mut buffer)?;
        self.value = u64::from_le_bytes(buffer);
        Ok(())
    }
}

#[bitfield(u8)]
/// The `SYS_CTRL` register.
pub(crate) struct SysCtrl {
    /// Enter low power mode whenever no measurement is running.
    #[bits(1, default = false)]
    pub low_power: bool,
    #[bits(6, default = 0x0)]
    rsvd: u8,
    /// Reset the device. Self-clearing.
    #[bits(1, default = false)]
    pub reset: bool,
}

impl Ens210Register for SysCtrl {
    const ADDRESS: u8 = 0x10;
    const REGISTER_LEN: usize = 1;

    fn read<T: I2c<SevenBitAddress>>(
        &mut self,
        ens: &Ens210,
        i2c: &mut T,
    ) -> Result<(), Error<T::Error>> {
        let mut buffer = [0u8; Self::REGISTER_LEN];
        read_bytes(ens, i2c, Self::ADDRESS, &mut buffer)?;
        *self = Self::from_bits(buffer[0]);
        Ok(())
    }

    fn write<T: I2c<SevenBitAddress>>(
        &mut self,
        ens: &Ens210,
        i2c: &mut T,
    ) -> Result<(), Error<T::Error>> {
        i2c.write(ens.address, &[Self::ADDRESS, self.into_bits()])?;
        Ok(())
    }
}

#[bitfield(u8)]
/// The `SENS_RUN` register. A cleared bit selects single shot mode.
pub(crate) struct SensRun {
    #[bits(1, default = false)]
    pub t_run: bool,
    #[bits(1, default = false)]
    pub h_run: bool,
    #[bits(6, default = 0x0)]
    rsvd: u8,
}

#[bitfield(u8)]
/// The `SENS_START` register.
pub(crate) struct SensStart {
    #[bits(1, default = false)]
    pub t_start: bool,
    #[bits(1, default = false)]
    pub h_start: bool,
    #[bits(6, default = 0x0)]
    rsvd: u8,
}

#[derive(Debug)]
/// `SENS_RUN` followed by `SENS_START`, written in one auto-increment transfer.
pub(crate) struct SensorControl {
    pub(crate) run: SensRun,
    pub(crate) start: SensStart,
}

impl SensorControl {
    const ADDRESS: u8 = 0x21;

    /// Single shot conversion of both temperature and humidity.
    pub(crate) fn single_shot() -> Self {
        Self {
            run: SensRun::new().with_t_run(false).with_h_run(false),
            start: SensStart::new().with_t_start(true).with_h_start(true),
        }
    }

    /// Writes `SENS_RUN` and `SENS_START` in one transfer.
    pub(crate) fn write<T: I2c<SevenBitAddress>>(
        &self,
        ens: &Ens210,
        i2c: &mut T,
    ) -> Result<(), Error<T::Error>> {
        i2c.write(
            ens.address,
            &[Self::ADDRESS, self.run.into_bits(), self.start.into_bits()],
        )?;
        Ok(())
    }
}

#[bitfield(u32)]
#[derive(PartialEq, Eq)]
/// A packed measurement word as read from `T_VAL` or `H_VAL`.
///
/// Only the low 24 bits are transmitted by the device, least significant
/// byte first.
pub struct RawValue {
    /// Measurement data, 1/64 K for temperature and 1/512 %RH for humidity.
    #[bits(16)]
    pub data: u16,
    /// Set when `data` holds a completed measurement.
    #[bits(1)]
    pub valid: bool,
    /// CRC-7 over `data` and `valid`.
    #[bits(7)]
    pub crc: u8,
    #[bits(8, default = 0x0)]
    rsvd: u8,
}

impl RawValue {
    /// Builds a word from the three bytes transmitted by the device.
    pub const fn from_le_bytes(bytes: [u8; 3]) -> Self {
        Self::from_bits(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0]))
    }

    /// Builds a word carrying `data` and `valid` with a matching CRC.
    pub const fn with_checksum(data: u16, valid: bool) -> Self {
        let payload = data as u32 | (valid as u32) << 16;
        Self::from_bits(payload | (crc7(payload) as u32) << 17)
    }

    /// The 17 bits protected by the CRC.
    pub const fn payload(&self) -> u32 {
        self.into_bits() & PAYLOAD_MASK
    }

    /// Returns `true` if the transmitted CRC matches the payload.
    pub const fn crc_ok(&self) -> bool {
        crc7(self.payload()) == self.crc()
    }

    /// Validates the word and splits it into data and status.
    ///
    /// A CRC mismatch takes precedence over the valid bit, since a corrupted
    /// transfer may have flipped the valid bit too.
    pub const fn extract(&self) -> Reading {
        let status = if !self.crc_ok() {
            Status::CrcError
        } else if !self.valid() {
            Status::Invalid
        } else {
            Status::Ok
        };
        Reading {
            data: self.data(),
            status,
        }
    }
}

#[derive(Debug, Default)]
/// A measurement register holding one [`RawValue`].
pub(crate) struct ValueRegister<const A: u8> {
    pub(crate) raw: RawValue,
}

/// The `T_VAL` register.
pub(crate) type TVal = ValueRegister<0x30>;
/// The `H_VAL` register.
pub(crate) type HVal = ValueRegister<0x33>;

impl<const A: u8> Ens210Register for ValueRegister<A> {
    const ADDRESS: u8 = A;
    const REGISTER_LEN: usize = 3;

    fn read<T: I2c<SevenBitAddress>>(
        &mut self,
        ens: &Ens210,
        i2c: &mut T,
    ) -> Result<(), Error<T::Error>> {
        let mut buffer = [0u8; 3];
        read_bytes(ens, i2c, Self::ADDRESS, &mut buffer)?;
        self.raw = RawValue::from_le_bytes(buffer);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Data and status of one temperature or humidity reading.
pub struct Reading {
    /// Raw data in the sensor's native scale. Only meaningful if `status` is [`Status::Ok`].
    pub data: u16,
    /// Outcome of the reading.
    pub status: Status,
}

impl Reading {
    /// A reading for which no data could be transferred.
    pub const fn i2c_error() -> Self {
        Self {
            data: 0,
            status: Status::I2cError,
        }
    }

    /// Returns the data if the reading is usable.
    pub const fn ok(&self) -> Option<u16> {
        if self.status.is_ok() {
            Some(self.data)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Result of one single shot measurement.
pub struct Measurement {
    /// Temperature, data in 1/64 K.
    pub temperature: Reading,
    /// Relative humidity, data in 1/512 %RH.
    pub humidity: Reading,
}

impl Measurement {
    pub(crate) const fn i2c_error() -> Self {
        Self {
            temperature: Reading::i2c_error(),
            humidity: Reading::i2c_error(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Identification read from the `PART_ID` and `UID` registers.
pub struct Identity {
    /// Part identifier, [`ENS210_PART_ID`] for an ENS210.
    pub part_id: u16,
    /// Unique device identifier.
    pub uid: u64,
}
