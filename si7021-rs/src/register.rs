use bitfield_struct::bitfield;

/// Convert hundredths of a degree Celsius to hundredths of a degree Fahrenheit.
///
/// Equivalent to `1.8 * c + 3200` truncated toward zero, computed without floating point.
pub const fn celsius_to_fahrenheit_hundredths(celsius_hundredths: i32) -> i32 {
    (9 * celsius_hundredths + 16000) / 5
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Represents a temperature measurement from the SI7021 sensor.
pub struct Temperature {
    pub(crate) value: u16,
}

impl Temperature {
    /// Wrap a raw temperature code as returned by the sensor.
    pub const fn from_raw(value: u16) -> Self {
        Self { value }
    }

    /// The raw temperature code.
    pub const fn raw(&self) -> u16 {
        self.value
    }

    /// Temperature in hundredths of a degree Celsius.
    pub const fn celsius_hundredths(&self) -> i32 {
        ((17572 * self.value as i32) >> 16) - 4685
    }

    /// Temperature in hundredths of a degree Fahrenheit.
    pub const fn fahrenheit_hundredths(&self) -> i32 {
        celsius_to_fahrenheit_hundredths(self.celsius_hundredths())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Represents a relative humidity measurement from the SI7021 sensor.
pub struct Humidity {
    pub(crate) value: u16,
}

impl Humidity {
    /// Wrap a raw humidity code as returned by the sensor.
    pub const fn from_raw(value: u16) -> Self {
        Self { value }
    }

    /// The raw humidity code.
    pub const fn raw(&self) -> u16 {
        self.value
    }

    /// Relative humidity in whole percent.
    ///
    /// Codes near the bottom of the range produce negative values; they are not clamped.
    pub const fn percent(&self) -> i32 {
        ((125 * self.value as i32) >> 16) - 6
    }

    /// Relative humidity in basis points (percent * 100).
    pub const fn basis_points(&self) -> i32 {
        ((12500 * self.value as i32) >> 16) - 600
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Humidity and temperature taken from the same measurement cycle.
pub struct Environment {
    /// Temperature in hundredths of a degree Celsius.
    pub celsius_hundredths: i32,
    /// Temperature in hundredths of a degree Fahrenheit.
    pub fahrenheit_hundredths: i32,
    /// Relative humidity in basis points.
    pub humidity_basis_points: i32,
}

impl Environment {
    pub(crate) const fn new(humidity: Humidity, temperature: Temperature) -> Self {
        Self {
            celsius_hundredths: temperature.celsius_hundredths(),
            fahrenheit_hundredths: temperature.fahrenheit_hundredths(),
            humidity_basis_points: humidity.basis_points(),
        }
    }
}

#[bitfield(u8)]
#[derive(PartialEq, Eq)]
/// User register 1 of the SI7021.
///
/// The default value matches the power-on state of the register (0x3A).
pub struct UserRegister {
    /// Low bit of the measurement resolution.
    #[bits(1, default = false)]
    pub res0: bool,
    #[bits(1, default = true)]
    rsvd: bool,
    /// On-chip heater enable.
    #[bits(1, default = false)]
    pub heater_enable: bool,
    #[bits(3, default = 0b111)]
    rsvd2: u8,
    /// Set when the supply voltage is below the operating threshold.
    #[bits(1, default = false, access = RO)]
    pub vdd_low: bool,
    /// High bit of the measurement resolution.
    #[bits(1, default = false)]
    pub res1: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// The 64 bit electronic serial number with CRC bytes removed.
pub struct SerialNumber(pub(crate) [u8; 8]);

impl SerialNumber {
    /// Serial number bytes, most significant first (SNA_3..SNA_0, SNB_3..SNB_0).
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Serial number as a single integer.
    pub fn value(&self) -> u64 {
        u64::from_be_bytes(self.0)
    }

    /// The part family identifier embedded in the serial number (SNB_3).
    pub fn device_id(&self) -> u8 {
        self.0[4]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Part family decoded from the device identifier.
pub enum DeviceKind {
    /// Engineering sample (identifier 0x00 or 0xFF).
    EngineeringSample,
    /// Si7013.
    Si7013,
    /// Si7020.
    Si7020,
    /// Si7021.
    Si7021,
    /// Identifier not listed in the datasheet.
    Unknown(u8),
}

impl From<u8> for DeviceKind {
    fn from(id: u8) -> Self {
        match id {
            0x00 | 0xFF => DeviceKind::EngineeringSample,
            0x0D => DeviceKind::Si7013,
            0x14 => DeviceKind::Si7020,
            0x15 => DeviceKind::Si7021,
            other => DeviceKind::Unknown(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humidity_at_zero_is_below_floor() {
        let h = Humidity::from_raw(0);
        assert_eq!(h.percent(), -6);
        assert_eq!(h.basis_points(), -600);
    }

    #[test]
    fn humidity_scaling_is_consistent() {
        let h = Humidity::from_raw(0x6E90);
        assert_eq!(h.percent(), 47);
        assert_eq!(h.basis_points(), 4798);
        assert!((h.basis_points() - h.percent() * 100).abs() < 100);
    }

    #[test]
    fn temperature_conversion() {
        let t = Temperature::from_raw(0x6722);
        assert_eq!(t.celsius_hundredths(), 2394);
        assert_eq!(t.fahrenheit_hundredths(), 7509);

        let t = Temperature::from_raw(0x7A64);
        assert_eq!(t.celsius_hundredths(), 3715);
        assert_eq!(t.fahrenheit_hundredths(), 9887);
    }

    #[test]
    fn fahrenheit_truncates_like_float() {
        // 1.8 * -1 + 3200 = 3198.2
        assert_eq!(celsius_to_fahrenheit_hundredths(-1), 3198);
        assert_eq!(celsius_to_fahrenheit_hundredths(0), 3200);
        assert_eq!(celsius_to_fahrenheit_hundredths(-4685), -5233);
        // 1.8 * -4684 + 3200 = -5231.2
        assert_eq!(celsius_to_fahrenheit_hundredths(-4684), -5231);
    }

    #[test]
    fn fahrenheit_matches_float_over_full_range() {
        for raw in 0..=u16::MAX {
            let c = Temperature::from_raw(raw).celsius_hundredths();
            let expected = (1.8f64 * c as f64 + 3200.0) as i32;
            assert_eq!(celsius_to_fahrenheit_hundredths(c), expected, "raw {raw:#06x}");
        }
    }

    #[test]
    fn environment_uses_basis_points() {
        let env = Environment::new(Humidity::from_raw(0x6E90), Temperature::from_raw(0x6722));
        assert_eq!(
            env,
            Environment {
                celsius_hundredths: 2394,
                fahrenheit_hundredths: 7509,
                humidity_basis_points: 4798,
            }
        );
    }

    #[test]
    fn user_register_heater_values() {
        assert_eq!(UserRegister::default().into_bits(), 0x3A);
        assert_eq!(
            UserRegister::default().with_heater_enable(true).into_bits(),
            0x3E
        );
        let reg = UserRegister::from_bits(0x7E);
        assert!(reg.heater_enable());
        assert!(reg.vdd_low());
        assert!(!reg.res1());
    }

    #[test]
    fn serial_number_layout() {
        let sn = SerialNumber([0x11, 0x22, 0x33, 0x44, 0x15, 0x66, 0x77, 0x88]);
        assert_eq!(sn.value(), 0x1122_3344_1566_7788);
        assert_eq!(sn.device_id(), 0x15);
        assert_eq!(DeviceKind::from(sn.device_id()), DeviceKind::Si7021);
    }

    #[test]
    fn device_kinds() {
        assert_eq!(DeviceKind::from(0x00), DeviceKind::EngineeringSample);
        assert_eq!(DeviceKind::from(0xFF), DeviceKind::EngineeringSample);
        assert_eq!(DeviceKind::from(0x0D), DeviceKind::Si7013);
        assert_eq!(DeviceKind::from(0x14), DeviceKind::Si7020);
        assert_eq!(DeviceKind::from(0x42), DeviceKind::Unknown(0x42));
    }
}
