use crate::device::{Capabilities, Control, RadioDevice};
use crate::types::Error;

/// Frequency band limits in MHz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Lower band edge
    pub min_mhz: f32,
    /// Upper band edge
    pub max_mhz: f32,
}

impl Default for Band {
    /// 87.5-108 MHz (USA, Europe)
    fn default() -> Self {
        Band {
            min_mhz: 87.5,
            max_mhz: 108.0,
        }
    }
}

/// Tuner facade over an opened radio device.
///
/// Captures the band and the device's frequency divider at construction
/// and keeps the last-known frequency, so the decoding loop can tag
/// incoming data without an ioctl per block.
#[derive(Debug)]
pub struct Tuner<D> {
    device: D,
    band: Band,
    capabilities: Capabilities,
    divider: f32,
    current_mhz: f32,
}

impl<D, E> Tuner<D>
where
    D: RadioDevice<Error = E>,
{
    /// Create the facade, querying capabilities and the current frequency.
    pub fn new(mut device: D, band: Band) -> Result<Self, Error<E>> {
        let capabilities = device.capabilities().map_err(Error::Device)?;
        let divider = if capabilities.low_range { 16.0 } else { 16000.0 };
        let mut tuner = Tuner {
            device,
            band,
            capabilities,
            divider,
            current_mhz: 0.0,
        };
        tuner.frequency()?;
        Ok(tuner)
    }

    /// Destroy the facade, returning the device handle.
    pub fn destroy(self) -> D {
        self.device
    }

    /// Capabilities queried at construction.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// The band this tuner operates in.
    pub fn band(&self) -> Band {
        self.band
    }

    /// Last frequency read from or written to the device, in MHz.
    pub fn current(&self) -> f32 {
        self.current_mhz
    }

    /// Direct access to the device handle, for reading the RDS stream.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Read the current frequency from the device, in MHz.
    pub fn frequency(&mut self) -> Result<f32, Error<E>> {
        let raw = self.device.frequency().map_err(Error::Device)?;
        self.current_mhz = raw as f32 / self.divider;
        Ok(self.current_mhz)
    }

    /// Tune to a frequency in MHz. Fails with `Error::OutOfRange` outside
    /// the band.
    pub fn set_frequency(&mut self, mhz: f32) -> Result<(), Error<E>> {
        if !(mhz >= self.band.min_mhz && mhz <= self.band.max_mhz) {
            return Err(Error::OutOfRange);
        }
        let raw = (mhz * self.divider).round() as u32;
        self.device.set_frequency(raw).map_err(Error::Device)?;
        self.current_mhz = mhz;
        Ok(())
    }

    /// Hardware seek with wrap-around; returns the frequency the seek
    /// landed on.
    pub fn seek(&mut self, upward: bool) -> Result<f32, Error<E>> {
        self.device.hw_seek(upward, true).map_err(Error::Device)?;
        let mhz = self.frequency()?;
        if mhz < self.band.min_mhz || mhz > self.band.max_mhz {
            return Err(Error::OutOfRange);
        }
        Ok(mhz)
    }

    /// Set the volume as a percentage. Values above 100 are clamped;
    /// 0 mutes, anything above unmutes. The percentage is mapped linearly
    /// into the control range the device advertises.
    pub fn set_volume(&mut self, percent: u8) -> Result<(), Error<E>> {
        let percent = i64::from(percent.min(100));
        self.set_mute(percent == 0)?;
        let range = self
            .device
            .control_range(Control::Volume)
            .map_err(Error::Device)?;
        let span = i64::from(range.max) - i64::from(range.min);
        let value = i64::from(range.min) + span * percent / 100;
        self.device
            .set_control(Control::Volume, value as i32)
            .map_err(Error::Device)
    }

    /// Mute or unmute the device output.
    pub fn set_mute(&mut self, mute: bool) -> Result<(), Error<E>> {
        self.device
            .set_control(Control::Mute, i32::from(mute))
            .map_err(Error::Device)
    }
}
