/// Seven bit I2C address of the SI7021. The part has no address select pins.
pub const SI7021_ADDRESS: u8 = 0x40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Commands understood by the SI7021, as listed in the datasheet command table.
pub enum Command {
    /// Measure relative humidity, hold master mode.
    ReadHumidity,
    /// Measure temperature, hold master mode.
    ReadTemperature,
    /// Read the temperature value taken during the previous humidity measurement.
    ReadTemperaturePostHumidity,
    /// Soft reset.
    Reset,
    /// Read user register 1.
    ReadUserRegister,
    /// Write user register 1. The register value follows the command byte.
    WriteUserRegister,
    /// Read the first half of the electronic serial number.
    ReadSerialA,
    /// Read the second half of the electronic serial number.
    ReadSerialB,
}

impl Command {
    /// Bytes written to the bus to issue this command.
    pub const fn bytes(self) -> &'static [u8] {
        match self {
            Command::ReadHumidity => &[0xE5],
            Command::ReadTemperature => &[0xE3],
            Command::ReadTemperaturePostHumidity => &[0xE0],
            Command::Reset => &[0xFE],
            Command::ReadUserRegister => &[0xE7],
            Command::WriteUserRegister => &[0xE6],
            Command::ReadSerialA => &[0xFA, 0x0F],
            Command::ReadSerialB => &[0xFC, 0xC9],
        }
    }

    /// Number of bytes the sensor returns in response to this command.
    pub const fn response_len(self) -> usize {
        match self {
            Command::ReadHumidity
            | Command::ReadTemperature
            | Command::ReadTemperaturePostHumidity => 2,
            Command::Reset | Command::WriteUserRegister => 0,
            Command::ReadUserRegister => 1,
            Command::ReadSerialA => 8,
            Command::ReadSerialB => 6,
        }
    }
}
