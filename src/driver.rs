//! Blocking driver for MAX31865 and MAX31856 converters

use embedded_hal::{delay::DelayNs, spi::SpiDevice};

use crate::{
    error::Error,
    profile::{DeviceProfile, MAX_FRAME_LEN},
    reading::{RegisterFrame, TemperatureReading, decode_frame},
};

/// Converter driver instance (blocking)
///
/// Every bus operation takes `&mut self`, so a conversion command and the
/// frame read that follows it cannot interleave with another caller.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Max318xx<SPI, D> {
    spi: SPI,
    delay: D,
    profile: DeviceProfile,
}

impl<SPI, D, E> Max318xx<SPI, D>
where
    SPI: SpiDevice<u8, Error = E>,
    D: DelayNs,
{
    /// Create a new driver instance for `profile`
    pub fn new(spi: SPI, delay: D, profile: DeviceProfile) -> Self {
        Self {
            spi,
            delay,
            profile,
        }
    }

    /// Release the SPI device and delay, consuming the driver
    pub fn release(self) -> (SPI, D) {
        (self.spi, self.delay)
    }

    /// Profile the driver decodes with
    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    fn write_command(&mut self, command: &[u8]) -> Result<(), Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("Writing command {:02X}", command);

        self.spi.write(command).map_err(Error::Communication)
    }

    /// Write the idle configuration and clear latched faults
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn init(&mut self) -> Result<(), Error<E>> {
        let profile = self.profile;
        self.write_command(profile.init_command())
    }

    /// Clear latched faults
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn clear_faults(&mut self) -> Result<(), Error<E>> {
        let profile = self.profile;
        self.write_command(profile.clear_faults_command())
    }

    /// Read the current register frame without starting a conversion
    ///
    /// The read address and frame share one transfer, the first received
    /// byte is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn read_frame(&mut self) -> Result<RegisterFrame, Error<E>> {
        let len = self.profile.frame_len();
        let mut buf = [0u8; MAX_FRAME_LEN + 1];
        buf[0] = self.profile.read_address();

        #[cfg(feature = "defmt")]
        defmt::trace!("Reading {} bytes from 0x{:02X}", len, buf[0]);

        self.spi
            .transfer_in_place(&mut buf[..=len])
            .map_err(Error::Communication)?;

        #[cfg(feature = "defmt")]
        defmt::trace!("Received frame {:02X}", &buf[1..=len]);

        Ok(RegisterFrame::new(&buf[1..=len], &self.profile)?)
    }

    /// Run a single conversion and decode it
    ///
    /// Sends the conversion command, blocks for the profile's settle time,
    /// then reads and decodes the frame. Faults are returned inside the
    /// reading; no retry is attempted.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails or the frame cannot be
    /// converted
    pub fn read(&mut self) -> Result<TemperatureReading, Error<E>> {
        let profile = self.profile;
        self.write_command(profile.conversion_command())?;

        self.delay.delay_ms(self.profile.settle_ms());

        let frame = self.read_frame()?;
        let reading = decode_frame(&frame, &self.profile)?;

        #[cfg(feature = "defmt")]
        {
            if !reading.faults().is_empty() {
                defmt::warn!("Fault status 0x{:02X}", reading.faults().bits());
            }
            defmt::debug!("Decoded {}", reading);
        }

        Ok(reading)
    }
}
