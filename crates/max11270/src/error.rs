/// A raw code that does not name a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidSetting {
    /// Not a PGA gain code.
    #[error("gain code {0} is outside 0..=7")]
    Gain(u8),
    /// Not a data rate code.
    #[error("data rate code {0} is outside 0..=15")]
    DataRate(u8),
}

/// Errors reported by [`Max11270`](crate::Max11270).
///
/// The chip has no checksum or acknowledge, so the only failures are the transport's own
/// and requests the driver refuses to put on the wire.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error<SPI> {
    /// The SPI device reported an error.
    #[error("SPI transfer failed: {0:?}")]
    Spi(SPI),
    /// The register number does not address a register of the requested kind.
    #[error("register {0:#04x} is not addressable for this access")]
    InvalidRegister(u8),
    /// A raw code was rejected, see [`InvalidSetting`].
    #[error(transparent)]
    InvalidSetting(#[from] InvalidSetting),
}
