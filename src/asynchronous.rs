//! Asynchronous driver for MAX31865 and MAX31856 converters

use embedded_hal_async::{delay::DelayNs, spi::SpiDevice};

use crate::{
    error::Error,
    profile::{DeviceProfile, MAX_FRAME_LEN},
    reading::{RegisterFrame, TemperatureReading, decode_frame},
};

/// Converter driver instance (asynchronous)
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Max318xxAsync<SPI, D> {
    spi: SPI,
    delay: D,
    profile: DeviceProfile,
}

impl<SPI, D, E> Max318xxAsync<SPI, D>
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

    async fn write_command(&mut self, command: &[u8]) -> Result<(), Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("Writing command {:02X}", command);

        self.spi.write(command).await.map_err(Error::Communication)
    }

    /// Write the idle configuration and clear latched faults
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub async fn init(&mut self) -> Result<(), Error<E>> {
        let profile = self.profile;
        self.write_command(profile.init_command()).await
    }

    /// Clear latched faults
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub async fn clear_faults(&mut self) -> Result<(), Error<E>> {
        let profile = self.profile;
        self.write_command(profile.clear_faults_command()).await
    }

    /// Read the current register frame without starting a conversion
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub async fn read_frame(&mut self) -> Result<RegisterFrame, Error<E>> {
        let len = self.profile.frame_len();
        let mut buf = [0u8; MAX_FRAME_LEN + 1];
        buf[0] = self.profile.read_address();

        self.spi
            .transfer_in_place(&mut buf[..=len])
            .await
            .map_err(Error::Communication)?;

        #[cfg(feature = "defmt")]
        defmt::trace!("Received frame {:02X}", &buf[1..=len]);

        Ok(RegisterFrame::new(&buf[1..=len], &self.profile)?)
    }

    /// Run a single conversion and decode it
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails or the frame cannot be
    /// converted
    pub async fn read(&mut self) -> Result<TemperatureReading, Error<E>> {
        let profile = self.profile;
        self.write_command(profile.conversion_command()).await?;

        self.delay.delay_ms(profile.settle_ms()).await;

        let frame = self.read_frame().await?;
        let reading = decode_frame(&frame, &profile)?;

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
