use serde::Serialize;
use smcprims_codec::{bytes_to_uint, Key, TypeDescriptor};
use smcprims_transport::Transport;
use tracing::warn;

use crate::client::SmcClient;
use crate::error::{Result, SmcError};

/// Whether a fan follows the controller's curve or a forced target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FanMode {
    Auto,
    Forced,
}

/// Readings for one fan. A `None` field could not be read or decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FanReading {
    pub index: u32,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub safe: Option<f64>,
    pub target: Option<f64>,
    pub actual: Option<f64>,
    pub mode: Option<FanMode>,
}

/// All fans the controller reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FanReport {
    pub total: u32,
    pub fans: Vec<FanReading>,
}

impl<T: Transport> SmcClient<T> {
    /// Number of fans, read from `FNum`.
    pub fn total_fans(&mut self) -> Result<u32> {
        let value = self.read_key(Key::FAN_COUNT)?;
        Ok(value.decode_unsigned()?)
    }

    /// Read every fan's speeds and mode.
    ///
    /// Only a failure to read the fan count is fatal; a failed slot is
    /// reported as `None`.
    pub fn fan_report(&mut self) -> Result<FanReport> {
        let total = self.total_fans()?;
        let fans = (0..total).map(|index| self.fan_reading(index)).collect();
        Ok(FanReport { total, fans })
    }

    fn fan_reading(&mut self, index: u32) -> FanReading {
        FanReading {
            index,
            minimum: self.fan_speed(index, "Mn"),
            maximum: self.fan_speed(index, "Mx"),
            safe: self.fan_speed(index, "Sf"),
            target: self.fan_speed(index, "Tg"),
            actual: self.fan_speed(index, "Ac"),
            mode: self.fan_mode(index),
        }
    }

    fn fan_speed(&mut self, index: u32, field: &str) -> Option<f64> {
        let read = Key::fan(index, field)
            .map_err(SmcError::from)
            .and_then(|key| self.read_fixed_point(key));
        match read {
            Ok(speed) => Some(speed),
            Err(err) => {
                warn!(fan = index, field, error = %err, "fan speed unavailable");
                None
            }
        }
    }

    fn read_fixed_point(&mut self, key: Key) -> Result<f64> {
        let value = self.read_key(key)?;
        match value.data_type().descriptor()? {
            TypeDescriptor::FixedPoint(layout) => Ok(value.decode_fixed_point(&layout)?),
            _ => Err(SmcError::UnexpectedType {
                key,
                data_type: value.data_type(),
            }),
        }
    }

    fn fan_mode(&mut self, index: u32) -> Option<FanMode> {
        match self.read_key(Key::FAN_FORCE_BITS) {
            Ok(value) => {
                let bits = bytes_to_uint(value.payload(), 2);
                let forced = 1u32.checked_shl(index).is_some_and(|mask| bits & mask != 0);
                Some(if forced {
                    FanMode::Forced
                } else {
                    FanMode::Auto
                })
            }
            Err(err) => {
                warn!(fan = index, error = %err, "fan mode unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use smcprims_codec::DataType;

    use super::*;
    use crate::sim::SimulatedSmc;

    fn key(name: &str) -> Key {
        name.parse().unwrap()
    }

    #[test]
    fn missing_fan_count_is_fatal() {
        let mut client = SmcClient::new(SimulatedSmc::new());
        assert!(matches!(client.fan_report(), Err(SmcError::NotFound(_))));
    }

    #[test]
    fn non_fixed_point_speed_is_unavailable() {
        let sim = SimulatedSmc::new()
            .with_key(Key::FAN_COUNT, DataType::UINT8, &[1])
            .with_key(key("F0Ac"), DataType::UINT16, &[0x07, 0xd0])
            .with_key(key("F0Tg"), DataType::FPE2, &[0x1f, 0x40])
            .with_key(Key::FAN_FORCE_BITS, DataType::UINT16, &[0x00, 0x01]);
        let mut client = SmcClient::new(sim);
        let report = client.fan_report().unwrap();

        let fan = &report.fans[0];
        assert_eq!(fan.actual, None);
        assert_eq!(fan.target, Some(2000.0));
        assert_eq!(fan.minimum, None);
        assert_eq!(fan.mode, Some(FanMode::Forced));
    }

    #[test]
    fn mode_bits_beyond_bitfield_are_auto() {
        let sim = SimulatedSmc::new()
            .with_key(Key::FAN_FORCE_BITS, DataType::UINT16, &[0xff, 0xff]);
        let mut client = SmcClient::new(sim);
        assert_eq!(client.fan_mode(15), Some(FanMode::Forced));
        assert_eq!(client.fan_mode(16), Some(FanMode::Auto));
        assert_eq!(client.fan_mode(40), Some(FanMode::Auto));
    }
}
