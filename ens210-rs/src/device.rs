use core::time::Duration;

use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};

use crate::{
    Error, Identity, Measurement, RawValue, Reading,
    convert::{self, DEFAULT_SOLDER_CORRECTION},
    register::{
        ENS210_PART_ID, Ens210Register, HVal, PartId, SensorControl, SysCtrl, TVal, Uid,
    },
};

/// I2C address of the ENS210. The device has no address select pins.
pub const ENS210_ADDRESS: u8 = 0x43;

/// Time needed by one single shot conversion of both temperature and humidity.
pub const CONVERSION_TIME: Duration = Duration::from_millis(130);

const BOOTING_MS: u32 = 2;
const RESET_WAIT_MS: u32 = 2;

#[derive(Debug)]
/// Represents an initialized ENS210 sensor.
///
/// The I2C bus is passed to every operation, so several drivers can share
/// one bus. The solder correction is fixed for the lifetime of the handle;
/// use [`Ens210::to_builder`] to initialize again with another value.
pub struct Ens210 {
    pub(crate) address: u8,
    pub(crate) correction: i16,
}

#[derive(Debug)]
/// Builder for an ENS210 sensor.
pub struct Ens210Builder {
    pub(crate) correction: i16,
}

impl Default for Ens210Builder {
    fn default() -> Self {
        Self {
            correction: DEFAULT_SOLDER_CORRECTION,
        }
    }
}

impl Ens210Builder {
    /// Set the solder correction in 1/64 K, subtracted from every temperature conversion.
    ///
    /// Defaults to [`DEFAULT_SOLDER_CORRECTION`] (50 mK).
    pub fn with_solder_correction(mut self, correction: i16) -> Self {
        self.correction = correction;
        self
    }

    /// Initialize the ENS210 sensor.
    ///
    /// Resets the device, reads its identity and leaves it in low power mode.
    /// Fails on any bus error, or with [`Error::InvalidId`] if the part
    /// identifier is not that of an ENS210.
    pub fn build<T: I2c<SevenBitAddress>, D: DelayNs>(
        self,
        i2c: &mut T,
        delay: &mut D,
    ) -> Result<Ens210, Error<T::Error>> {
        self.build_identified(i2c, delay).map(|(dev, _)| dev)
    }

    /// Initialize the ENS210 sensor like [`Ens210Builder::build`], also
    /// returning the identity read during initialization.
    pub fn build_identified<T: I2c<SevenBitAddress>, D: DelayNs>(
        self,
        i2c: &mut T,
        delay: &mut D,
    ) -> Result<(Ens210, Identity), Error<T::Error>> {
        let mut dev = Ens210 {
            address: ENS210_ADDRESS,
            correction: self.correction,
        };
        dev.reset(i2c, delay)?;
        // identity registers are only readable while the device is active
        dev.set_low_power(i2c, delay, false)?;
        let id = dev.read_identity(i2c)?;
        dev.set_low_power(i2c, delay, true)?;
        if id.part_id != ENS210_PART_ID {
            return Err(Error::InvalidId(id.part_id));
        }
        Ok((dev, id))
    }
}

impl Ens210 {
    /// Get the address of the device.
    pub fn get_address(&self) -> u8 {
        self.address
    }

    /// Get the solder correction in 1/64 K.
    pub fn solder_correction(&self) -> i16 {
        self.correction
    }

    /// Send a reset to the ENS210.
    pub fn reset<T: I2c<SevenBitAddress>, D: DelayNs>(
        &mut self,
        i2c: &mut T,
        delay: &mut D,
    ) -> Result<(), Error<T::Error>> {
        SysCtrl::new().with_reset(true).write(self, i2c)?;
        delay.delay_ms(RESET_WAIT_MS);
        Ok(())
    }

    /// Set the ENS210 to low (`true`) or high (`false`) power.
    pub fn set_low_power<T: I2c<SevenBitAddress>, D: DelayNs>(
        &mut self,
        i2c: &mut T,
        delay: &mut D,
        enable: bool,
    ) -> Result<(), Error<T::Error>> {
        let mut ctrl = SysCtrl::default();
        ctrl.read(self, i2c)?;
        ctrl.set_reset(false);
        ctrl.set_low_power(enable);
        ctrl.write(self, i2c)?;
        delay.delay_ms(BOOTING_MS);
        Ok(())
    }

    /// Read the part identifier and the unique identifier.
    ///
    /// The content is not checked. The device must not be in low power mode.
    pub fn read_identity<T: I2c<SevenBitAddress>>(
        &mut self,
        i2c: &mut T,
    ) -> Result<Identity, Error<T::Error>> {
        let mut part_id = PartId::default();
        part_id.read(self, i2c)?;
        let mut uid = Uid::default();
        uid.read(self, i2c)?;
        Ok(Identity {
            part_id: part_id.value,
            uid: uid.value,
        })
    }

    /// Start one single shot measurement of temperature and humidity.
    ///
    /// # Returns:
    /// - [`Duration`]: The duration to wait before calling [`Ens210::read`].
    pub fn start_single<T: I2c<SevenBitAddress>>(
        &mut self,
        i2c: &mut T,
    ) -> Result<Duration, Error<T::Error>> {
        SensorControl::single_shot().write(self, i2c)?;
        Ok(CONVERSION_TIME)
    }

    /// Read the temperature and humidity words.
    ///
    /// Each word is fetched in its own transfer, so a bus error on one does
    /// not hide the other.
    pub fn read<T: I2c<SevenBitAddress>>(
        &mut self,
        i2c: &mut T,
    ) -> (
        Result<RawValue, Error<T::Error>>,
        Result<RawValue, Error<T::Error>>,
    ) {
        let mut t = TVal::default();
        let t = t.read(self, i2c).map(|_| t.raw);
        let mut h = HVal::default();
        let h = h.read(self, i2c).map(|_| h.raw);
        (t, h)
    }

    /// Perform one single shot measurement of temperature and humidity.
    ///
    /// Blocks for [`CONVERSION_TIME`] between triggering and reading. Bus
    /// errors are reported as [`Status::I2cError`](crate::Status::I2cError)
    /// in the affected readings; nothing is retried, and a failed trigger
    /// returns immediately without waiting.
    pub fn measure<T: I2c<SevenBitAddress>, D: DelayNs>(
        &mut self,
        i2c: &mut T,
        delay: &mut D,
    ) -> Measurement {
        let Ok(wait) = self.start_single(i2c) else {
            return Measurement::i2c_error();
        };
        delay.delay_ms(wait.as_millis() as u32);
        let (t, h) = self.read(i2c);
        Measurement {
            temperature: extract(t),
            humidity: extract(h),
        }
    }

    /// Converts temperature data to `multiplier` × Kelvin.
    pub fn to_kelvin(&self, t_data: u16, multiplier: i32) -> i32 {
        convert::to_kelvin(t_data, multiplier, self.correction)
    }

    /// Converts temperature data to `multiplier` × degrees Celsius.
    pub fn to_celsius(&self, t_data: u16, multiplier: i32) -> i32 {
        convert::to_celsius(t_data, multiplier, self.correction)
    }

    /// Converts temperature data to `multiplier` × degrees Fahrenheit.
    pub fn to_fahrenheit(&self, t_data: u16, multiplier: i32) -> i32 {
        convert::to_fahrenheit(t_data, multiplier, self.correction)
    }

    /// Converts humidity data to `multiplier` × %RH.
    pub fn to_percentage_h(&self, h_data: u16, multiplier: i32) -> i32 {
        convert::to_percentage_h(h_data, multiplier)
    }

    /// Exact temperature in Kelvin after solder correction.
    pub fn kelvin(&self, t_data: u16) -> convert::Kelvin {
        convert::kelvin(t_data, self.correction)
    }

    /// Get the builder for the ENS210 sensor.
    /// This allows you to initialize again with a different solder correction.
    pub fn to_builder(self) -> Ens210Builder {
        Ens210Builder {
            correction: self.correction,
        }
    }
}

fn extract<E>(word: Result<RawValue, Error<E>>) -> Reading {
    match word {
        Ok(raw) => raw.extract(),
        Err(_) => Reading::i2c_error(),
    }
}
