use crate::device::AmpTransport;
use crate::error::{CommandError, ConnectError};
use crate::{DeviceVariant, MustangDevice, PRODUCT_IDS, VID_MUSTANG};
use log::{debug, info, warn};
use rusb::{Device, DeviceHandle, GlobalContext};
use std::time::Duration;

const INTERFACE: u8 = 0;

pub struct LibUsbTransport {
    handle: Option<DeviceHandle<GlobalContext>>,
    timeout: Duration,

    // Set when we had to pull the kernel driver off the interface, so we can hand it back.
    kernel_driver_detached: bool,
}

impl LibUsbTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            handle: None,
            timeout,
            kernel_driver_detached: false,
        }
    }

    fn find_device(
        vendor_id: u16,
        product_ids: &[u16],
    ) -> Result<Option<Device<GlobalContext>>, rusb::Error> {
        let devices = rusb::devices()?;
        for product_id in product_ids {
            for device in devices.iter() {
                if let Ok(descriptor) = device.device_descriptor() {
                    if descriptor.vendor_id() == vendor_id && descriptor.product_id() == *product_id
                    {
                        return Ok(Some(device));
                    }
                }
            }
        }
        Ok(None)
    }

    fn handle(&mut self) -> Result<&mut DeviceHandle<GlobalContext>, CommandError> {
        self.handle.as_mut().ok_or(CommandError::NotConnected)
    }
}

impl AmpTransport for LibUsbTransport {
    fn open(&mut self, vendor_id: u16, product_ids: &[u16]) -> Result<(), ConnectError> {
        let device =
            Self::find_device(vendor_id, product_ids)?.ok_or(ConnectError::DeviceNotFound)?;
        let mut handle = device.open()?;
        info!("Connected to possible Mustang device at {:?}", device);

        self.kernel_driver_detached = claim_interface(&mut handle)?;
        self.handle = Some(handle);
        Ok(())
    }

    fn close(&mut self) {
        let Some(mut handle) = self.handle.take() else {
            return;
        };

        if let Err(error) = handle.release_interface(INTERFACE) {
            warn!("Unable to release interface: {}", error);
        }

        if self.kernel_driver_detached {
            reattach_kernel_driver(&mut handle);
            self.kernel_driver_detached = false;
        }

        info!("Closed Mustang device {:?}", handle.device());
    }

    fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    fn interrupt_write(&mut self, endpoint: u8, data: &[u8]) -> Result<usize, CommandError> {
        let timeout = self.timeout;
        Ok(self.handle()?.write_interrupt(endpoint, data, timeout)?)
    }

    fn interrupt_read(&mut self, endpoint: u8, length: usize) -> Result<Vec<u8>, CommandError> {
        let timeout = self.timeout;
        let mut buf = vec![0; length];
        let read = self.handle()?.read_interrupt(endpoint, &mut buf, timeout)?;
        buf.truncate(read);
        Ok(buf)
    }
}

/// The parts of a device handle needed to take over the interface from the kernel.
trait InterfaceClaim {
    fn kernel_driver_active(&self, interface: u8) -> rusb::Result<bool>;
    fn detach_kernel_driver(&mut self, interface: u8) -> rusb::Result<()>;
    fn attach_kernel_driver(&mut self, interface: u8) -> rusb::Result<()>;
    fn claim_interface(&mut self, interface: u8) -> rusb::Result<()>;
}

impl InterfaceClaim for DeviceHandle<GlobalContext> {
    fn kernel_driver_active(&self, interface: u8) -> rusb::Result<bool> {
        DeviceHandle::kernel_driver_active(self, interface)
    }

    fn detach_kernel_driver(&mut self, interface: u8) -> rusb::Result<()> {
        DeviceHandle::detach_kernel_driver(self, interface)
    }

    fn attach_kernel_driver(&mut self, interface: u8) -> rusb::Result<()> {
        DeviceHandle::attach_kernel_driver(self, interface)
    }

    fn claim_interface(&mut self, interface: u8) -> rusb::Result<()> {
        DeviceHandle::claim_interface(self, interface)
    }
}

/// Claims the interface, detaching the kernel driver first if one is bound. Returns whether the
/// driver was detached. If the claim fails the driver is handed back before returning.
fn claim_interface<H: InterfaceClaim>(handle: &mut H) -> rusb::Result<bool> {
    // Not every platform can report (or detach) kernel drivers, that's not fatal.
    let mut detached = false;
    match handle.kernel_driver_active(INTERFACE) {
        Ok(true) => {
            debug!("Detaching kernel driver from interface {}", INTERFACE);
            handle.detach_kernel_driver(INTERFACE)?;
            detached = true;
        }
        Ok(false) => {}
        Err(error) => debug!("Unable to query kernel driver: {}", error),
    }

    if let Err(error) = handle.claim_interface(INTERFACE) {
        warn!("Unable to claim interface {}: {}", INTERFACE, error);
        if detached {
            reattach_kernel_driver(handle);
        }
        return Err(error);
    }

    Ok(detached)
}

fn reattach_kernel_driver<H: InterfaceClaim>(handle: &mut H) {
    match handle.attach_kernel_driver(INTERFACE) {
        Ok(()) => debug!("Reattached kernel driver to interface {}", INTERFACE),
        Err(error) => warn!("Unable to reattach kernel driver: {}", error),
    }
}

impl Drop for LibUsbTransport {
    fn drop(&mut self) {
        self.close();
    }
}

pub fn find_devices() -> Vec<MustangDevice> {
    let mut found_devices: Vec<MustangDevice> = Vec::new();

    if let Ok(devices) = rusb::devices() {
        for device in devices.iter() {
            if let Ok(descriptor) = device.device_descriptor() {
                if descriptor.vendor_id() != VID_MUSTANG
                    || !PRODUCT_IDS.contains(&descriptor.product_id())
                {
                    continue;
                }

                if let Some(variant) = DeviceVariant::from_product_id(descriptor.product_id()) {
                    found_devices.push(MustangDevice {
                        bus_number: device.bus_number(),
                        address: device.address(),
                        variant,
                    });
                }
            }
        }
    }

    found_devices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeHandle {
        driver_bound: bool,
        claim_error: Option<rusb::Error>,
        calls: Vec<&'static str>,
    }

    impl InterfaceClaim for FakeHandle {
        fn kernel_driver_active(&self, _interface: u8) -> rusb::Result<bool> {
            Ok(self.driver_bound)
        }

        fn detach_kernel_driver(&mut self, _interface: u8) -> rusb::Result<()> {
            self.calls.push("detach");
            self.driver_bound = false;
            Ok(())
        }

        fn attach_kernel_driver(&mut self, _interface: u8) -> rusb::Result<()> {
            self.calls.push("attach");
            self.driver_bound = true;
            Ok(())
        }

        fn claim_interface(&mut self, _interface: u8) -> rusb::Result<()> {
            self.calls.push("claim");
            match self.claim_error {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }
    }

    #[test]
    fn claim_detaches_bound_driver() {
        let mut handle = FakeHandle {
            driver_bound: true,
            ..Default::default()
        };

        assert_eq!(claim_interface(&mut handle), Ok(true));
        assert_eq!(handle.calls, ["detach", "claim"]);
        assert!(!handle.driver_bound);
    }

    #[test]
    fn failed_claim_hands_driver_back() {
        let mut handle = FakeHandle {
            driver_bound: true,
            claim_error: Some(rusb::Error::Busy),
            ..Default::default()
        };

        assert_eq!(claim_interface(&mut handle), Err(rusb::Error::Busy));
        assert_eq!(handle.calls, ["detach", "claim", "attach"]);
        assert!(handle.driver_bound);
    }

    #[test]
    fn failed_claim_without_driver_leaves_it_alone() {
        let mut handle = FakeHandle {
            claim_error: Some(rusb::Error::Access),
            ..Default::default()
        };

        assert_eq!(claim_interface(&mut handle), Err(rusb::Error::Access));
        assert_eq!(handle.calls, ["claim"]);
        assert!(!handle.driver_bound);
    }
}
