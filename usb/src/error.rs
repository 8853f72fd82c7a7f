/// Operator-facing code for "no suitable amplifier is attached".
pub const DEVICE_NOT_FOUND_CODE: i32 = -100;

#[derive(thiserror::Error, Debug)]
pub enum ConnectError {
    #[error("Suitable device not found")]
    DeviceNotFound,

    #[error("USB error: {0}")]
    UsbError(#[from] rusb::Error),

    #[error("Initialisation failed: {0}")]
    Command(#[from] CommandError),
}

#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    #[error("USB error: {0}")]
    UsbError(#[from] rusb::Error),

    #[error("Amplifier is not connected")]
    NotConnected,

    #[error("Amplifier sent more than {0} packets without terminating the response")]
    ResponseOverflow(usize),

    #[error("Slot {slot} out of range, the amplifier has {max} slots")]
    InvalidSlot { slot: u8, max: u8 },

    #[error("Invalid effect batch: {0}")]
    InvalidEffectBatch(&'static str),
}

impl ConnectError {
    pub fn code(&self) -> i32 {
        match self {
            ConnectError::DeviceNotFound => DEVICE_NOT_FOUND_CODE,
            ConnectError::UsbError(error) => usb_error_code(error),
            ConnectError::Command(error) => error.code(),
        }
    }

    pub fn is_device_not_found(&self) -> bool {
        matches!(self, ConnectError::DeviceNotFound)
    }
}

impl CommandError {
    pub fn code(&self) -> i32 {
        match self {
            CommandError::UsbError(error) => usb_error_code(error),
            CommandError::NotConnected => usb_error_code(&rusb::Error::NoDevice),
            CommandError::ResponseOverflow(_) => usb_error_code(&rusb::Error::Overflow),
            CommandError::InvalidSlot { .. } | CommandError::InvalidEffectBatch(_) => {
                usb_error_code(&rusb::Error::InvalidParam)
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, CommandError::UsbError(rusb::Error::Timeout))
    }
}

/// The numeric codes libusb itself reports, these are what the operator gets to see.
pub fn usb_error_code(error: &rusb::Error) -> i32 {
    match error {
        rusb::Error::Io => -1,
        rusb::Error::InvalidParam => -2,
        rusb::Error::Access => -3,
        rusb::Error::NoDevice => -4,
        rusb::Error::NotFound => -5,
        rusb::Error::Busy => -6,
        rusb::Error::Timeout => -7,
        rusb::Error::Overflow => -8,
        rusb::Error::Pipe => -9,
        rusb::Error::Interrupted => -10,
        rusb::Error::NoMem => -11,
        rusb::Error::NotSupported => -12,
        _ => -99,
    }
}
