use core::time::Duration;

use embedded_hal::{
    delay::DelayNs,
    i2c::{Error as _, ErrorKind, I2c, SevenBitAddress},
};

use crate::{
    Error,
    command::{Command, SI7021_ADDRESS},
    register::{DeviceKind, Environment, Humidity, SerialNumber, Temperature, UserRegister},
};

/// Time the sensor needs after a soft reset before it accepts commands.
const RESET_DELAY_MS: u32 = 15;

/// Represents the SI7021 sensor.
pub struct Si7021<I2C, D> {
    pub(crate) i2c: I2C,
    pub(crate) delay: D,
    pub(crate) address: u8,
    pub(crate) exists: bool,
    pub(crate) read_attempts: u8,
    pub(crate) poll_interval_us: u32,
}

#[derive(Debug, Clone)]
/// Builder for a SI7021 sensor.
pub struct Si7021Builder {
    pub(crate) read_attempts: u8,
    pub(crate) poll_interval: Duration,
}

impl Default for Si7021Builder {
    fn default() -> Self {
        Self {
            read_attempts: 10,
            poll_interval: Duration::from_millis(2),
        }
    }
}

impl Si7021Builder {
    /// Set how many times a NACKed response read is attempted before giving up.
    ///
    /// At least one attempt is always made.
    pub fn with_read_attempts(mut self, attempts: u8) -> Self {
        self.read_attempts = attempts.max(1);
        self
    }

    /// Set the delay between response read attempts.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Build the SI7021 driver. The bus is not touched until [`Si7021::initialize`] is called.
    pub fn build<T: I2c<SevenBitAddress>, D: DelayNs>(self, i2c: T, delay: D) -> Si7021<T, D> {
        Si7021 {
            i2c,
            delay,
            address: SI7021_ADDRESS,
            exists: false,
            read_attempts: self.read_attempts,
            poll_interval_us: self.poll_interval.as_micros().min(u32::MAX as u128) as u32,
        }
    }
}

impl<T: I2c<SevenBitAddress>, D: DelayNs> Si7021<T, D> {
    /// Create a driver with the default read timeout settings.
    pub fn new(i2c: T, delay: D) -> Self {
        Si7021Builder::default().build(i2c, delay)
    }

    /// Probe the sensor address once.
    ///
    /// Returns whether the sensor acknowledged. A successful probe marks the sensor
    /// as present for the lifetime of the driver.
    pub fn initialize(&mut self) -> bool {
        match self.i2c.write(self.address, &[]) {
            Ok(()) => {
                log::debug!("SI7021 acknowledged at 0x{:02x}", self.address);
                self.exists = true;
                true
            }
            Err(e) => {
                log::debug!(
                    "SI7021 probe at 0x{:02x} failed: {:?}",
                    self.address,
                    e.kind()
                );
                false
            }
        }
    }

    /// Whether a previous [`Si7021::initialize`] found the sensor.
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Get the address of the device.
    pub fn get_address(&self) -> u8 {
        self.address
    }

    /// Release the bus and delay provider.
    pub fn release(self) -> (T, D) {
        (self.i2c, self.delay)
    }

    /// Read the temperature in hundredths of a degree Celsius.
    pub fn read_temperature_celsius_hundredths(&mut self) -> Result<i32, Error<T::Error>> {
        Ok(self.read_temperature()?.celsius_hundredths())
    }

    /// Read the temperature in hundredths of a degree Fahrenheit.
    pub fn read_temperature_fahrenheit_hundredths(&mut self) -> Result<i32, Error<T::Error>> {
        Ok(self.read_temperature()?.fahrenheit_hundredths())
    }

    /// Read the relative humidity in whole percent.
    pub fn read_humidity_percent(&mut self) -> Result<i32, Error<T::Error>> {
        Ok(self.read_humidity()?.percent())
    }

    /// Read the relative humidity in basis points.
    ///
    /// This performs its own measurement; it does not share a sample with
    /// [`Si7021::read_humidity_percent`].
    pub fn read_humidity_basis_points(&mut self) -> Result<i32, Error<T::Error>> {
        Ok(self.read_humidity()?.basis_points())
    }

    /// Measure temperature.
    pub fn read_temperature(&mut self) -> Result<Temperature, Error<T::Error>> {
        Ok(Temperature::from_raw(
            self.read_raw(Command::ReadTemperature)?,
        ))
    }

    /// Measure relative humidity.
    pub fn read_humidity(&mut self) -> Result<Humidity, Error<T::Error>> {
        Ok(Humidity::from_raw(self.read_raw(Command::ReadHumidity)?))
    }

    /// Measure humidity, then fetch the temperature the sensor took during that same
    /// measurement. The two values are from one sampling cycle.
    pub fn read_humidity_and_temperature(&mut self) -> Result<Environment, Error<T::Error>> {
        let humidity = self.read_humidity()?;
        let temperature =
            Temperature::from_raw(self.read_raw(Command::ReadTemperaturePostHumidity)?);
        Ok(Environment::new(humidity, temperature))
    }

    /// Read the electronic serial number, dropping the interleaved CRC bytes.
    pub fn read_serial_number(&mut self) -> Result<SerialNumber, Error<T::Error>> {
        let mut serial = [0u8; 8];

        let mut sna = [0u8; Command::ReadSerialA.response_len()];
        self.command(Command::ReadSerialA, &mut sna)?;
        serial[0] = sna[0];
        serial[1] = sna[2];
        serial[2] = sna[4];
        serial[3] = sna[6];

        let mut snb = [0u8; Command::ReadSerialB.response_len()];
        self.command(Command::ReadSerialB, &mut snb)?;
        serial[4] = snb[0];
        serial[5] = snb[1];
        serial[6] = snb[3];
        serial[7] = snb[4];

        Ok(SerialNumber(serial))
    }

    /// Read both serial number responses undecoded, CRC bytes included.
    ///
    /// Only the first six bytes of the first response are kept.
    #[deprecated(note = "use `read_serial_number`, which strips the CRC bytes")]
    pub fn read_serial_bytes(&mut self) -> Result<[u8; 12], Error<T::Error>> {
        let mut buf = [0u8; 12];
        let (sna, snb) = buf.split_at_mut(6);
        self.command(Command::ReadSerialA, sna)?;
        self.command(Command::ReadSerialB, snb)?;
        Ok(buf)
    }

    /// Read the part family identifier from the serial number.
    pub fn read_device_id(&mut self) -> Result<u8, Error<T::Error>> {
        Ok(self.read_serial_number()?.device_id())
    }

    /// Read and decode the part family.
    pub fn read_device_kind(&mut self) -> Result<DeviceKind, Error<T::Error>> {
        Ok(DeviceKind::from(self.read_device_id()?))
    }

    /// Turn the on-chip heater on or off.
    ///
    /// The whole user register is overwritten with its default value plus the heater bit,
    /// so any resolution setting made through other means is lost.
    pub fn set_heater_enabled(&mut self, enable: bool) -> Result<(), Error<T::Error>> {
        let value = UserRegister::default()
            .with_heater_enable(enable)
            .into_bits();
        let cmd = Command::WriteUserRegister.bytes();
        self.i2c.write(self.address, &[cmd[0], value])?;
        Ok(())
    }

    /// Read user register 1.
    pub fn read_user_register(&mut self) -> Result<UserRegister, Error<T::Error>> {
        let mut buf = [0u8; Command::ReadUserRegister.response_len()];
        self.command(Command::ReadUserRegister, &mut buf)?;
        Ok(UserRegister::from_bits(buf[0]))
    }

    /// Get the heater state of the SI7021 sensor.
    pub fn heater_enabled(&mut self) -> Result<bool, Error<T::Error>> {
        Ok(self.read_user_register()?.heater_enable())
    }

    /// Perform a soft reset and wait for the sensor to come back up.
    pub fn reset(&mut self) -> Result<(), Error<T::Error>> {
        self.i2c.write(self.address, Command::Reset.bytes())?;
        self.delay.delay_ms(RESET_DELAY_MS);
        Ok(())
    }

    fn read_raw(&mut self, cmd: Command) -> Result<u16, Error<T::Error>> {
        let mut buf = [0u8; 2];
        self.command(cmd, &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Write `cmd`, then read exactly `buf.len()` response bytes.
    fn command(&mut self, cmd: Command, buf: &mut [u8]) -> Result<(), Error<T::Error>> {
        self.i2c.write(self.address, cmd.bytes())?;
        if buf.is_empty() {
            return Ok(());
        }
        self.read_response(buf)
    }

    /// Read a response, retrying while the sensor NACKs because it is still converting.
    fn read_response(&mut self, buf: &mut [u8]) -> Result<(), Error<T::Error>> {
        for attempt in 1..=self.read_attempts {
            match self.i2c.read(self.address, buf) {
                Ok(()) => return Ok(()),
                Err(e) if matches!(e.kind(), ErrorKind::NoAcknowledge(_)) => {
                    log::trace!(
                        "SI7021 busy, attempt {attempt}/{}",
                        self.read_attempts
                    );
                    if attempt < self.read_attempts {
                        self.delay.delay_us(self.poll_interval_us);
                    }
                }
                Err(e) => return Err(Error::I2c(e)),
            }
        }
        log::debug!(
            "SI7021 at 0x{:02x}: no response after {} attempts",
            self.address,
            self.read_attempts
        );
        Err(Error::Timeout)
    }
}
