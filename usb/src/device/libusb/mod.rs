pub mod device;

pub use device::{find_devices, LibUsbTransport};
