use crate::error::{CommandError, ConnectError};

pub mod libusb;

/// Raw interrupt transfers to and from the amplifier. Implementations know nothing about the
/// packet layout, they move bytes.
pub trait AmpTransport {
    /// Opens the first attached device matching the vendor ID and any of the product IDs, tried
    /// in the order given.
    fn open(&mut self, vendor_id: u16, product_ids: &[u16]) -> Result<(), ConnectError>;

    /// Releases the device. Safe to call when already closed.
    fn close(&mut self);

    fn is_open(&self) -> bool;

    fn interrupt_write(&mut self, endpoint: u8, data: &[u8]) -> Result<usize, CommandError>;

    /// An empty result is a valid, zero-length read.
    fn interrupt_read(&mut self, endpoint: u8, length: usize) -> Result<Vec<u8>, CommandError>;
}
