use strum::{Display, EnumIter};

pub use mustang_types as types;
pub use rusb;

pub mod device;
pub mod error;
pub mod mustang;
pub mod packet;

pub use device::libusb::{find_devices, LibUsbTransport};
pub use device::AmpTransport;
pub use mustang::{AmpState, Mustang, SessionConfig, SessionState};

pub const VID_MUSTANG: u16 = 0x1ed8;
pub const PID_MUSTANG_SMALL: u16 = 0x0004;
pub const PID_MUSTANG_LARGE: u16 = 0x0005;
pub const PID_MUSTANG_SMALL_V2: u16 = 0x0014;
pub const PID_MUSTANG_LARGE_V2: u16 = 0x0016;
pub const PID_MUSTANG_MINI: u16 = 0x0010;
pub const PID_MUSTANG_FLOOR: u16 = 0x0012;

/// Tried in this order when connecting.
pub const PRODUCT_IDS: [u16; 6] = [
    PID_MUSTANG_SMALL,
    PID_MUSTANG_LARGE,
    PID_MUSTANG_SMALL_V2,
    PID_MUSTANG_LARGE_V2,
    PID_MUSTANG_MINI,
    PID_MUSTANG_FLOOR,
];

pub const ENDPOINT_SEND: u8 = 0x01;
pub const ENDPOINT_RECEIVE: u8 = 0x81;

#[derive(Debug, Copy, Clone, Display, EnumIter, PartialEq, Eq)]
pub enum DeviceVariant {
    #[strum(to_string = "Mustang I/II")]
    MustangSmall,
    #[strum(to_string = "Mustang III/IV/V")]
    MustangLarge,
    #[strum(to_string = "Mustang I/II (v2)")]
    MustangSmallV2,
    #[strum(to_string = "Mustang III/IV/V (v2)")]
    MustangLargeV2,
    #[strum(to_string = "Mustang Mini")]
    Mini,
    #[strum(to_string = "Mustang Floor")]
    Floor,
}

impl DeviceVariant {
    pub fn product_id(&self) -> u16 {
        match self {
            DeviceVariant::MustangSmall => PID_MUSTANG_SMALL,
            DeviceVariant::MustangLarge => PID_MUSTANG_LARGE,
            DeviceVariant::MustangSmallV2 => PID_MUSTANG_SMALL_V2,
            DeviceVariant::MustangLargeV2 => PID_MUSTANG_LARGE_V2,
            DeviceVariant::Mini => PID_MUSTANG_MINI,
            DeviceVariant::Floor => PID_MUSTANG_FLOOR,
        }
    }

    pub fn from_product_id(product_id: u16) -> Option<DeviceVariant> {
        match product_id {
            PID_MUSTANG_SMALL => Some(DeviceVariant::MustangSmall),
            PID_MUSTANG_LARGE => Some(DeviceVariant::MustangLarge),
            PID_MUSTANG_SMALL_V2 => Some(DeviceVariant::MustangSmallV2),
            PID_MUSTANG_LARGE_V2 => Some(DeviceVariant::MustangLargeV2),
            PID_MUSTANG_MINI => Some(DeviceVariant::Mini),
            PID_MUSTANG_FLOOR => Some(DeviceVariant::Floor),
            _ => None,
        }
    }
}

// We primarily need the bus number, and address for comparison..
#[derive(Debug, Clone)]
pub struct MustangDevice {
    pub(crate) bus_number: u8,
    pub(crate) address: u8,
    pub(crate) variant: DeviceVariant,
}

impl MustangDevice {
    pub fn bus_number(&self) -> u8 {
        self.bus_number
    }
    pub fn address(&self) -> u8 {
        self.address
    }
    pub fn variant(&self) -> DeviceVariant {
        self.variant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn variants_cover_every_product_id() {
        let ids: Vec<u16> = DeviceVariant::iter().map(|v| v.product_id()).collect();
        assert_eq!(ids, PRODUCT_IDS);
        for variant in DeviceVariant::iter() {
            assert_eq!(
                DeviceVariant::from_product_id(variant.product_id()),
                Some(variant)
            );
        }
        assert_eq!(DeviceVariant::from_product_id(0x8fe0), None);
    }
}
