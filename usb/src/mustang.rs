use std::time::Duration;

use log::{debug, info, warn};
use mustang_types::{AmpSettings, EffectCategory, EffectSettings, EffectType, MemoryBank};
use strum::Display;

use crate::device::AmpTransport;
use crate::error::{CommandError, ConnectError};
use crate::packet::{
    decode_memory_bank, decode_name, serialise_amp_settings, serialise_amp_settings_usb_gain,
    serialise_apply_command, serialise_clear_effect_settings, serialise_effect_settings,
    serialise_init_command, serialise_load_command, serialise_load_slot_command, serialise_name,
    serialise_save_effect_name, serialise_save_effect_packets, to_packet, Packet, PresetWindow,
    PACKET_SIZE, PRESET_WINDOW,
};
use crate::{LibUsbTransport, ENDPOINT_RECEIVE, ENDPOINT_SEND, PRODUCT_IDS, VID_MUSTANG};

// Firmware revisions differ in how large the preset directory is, anything beyond this many
// packets means the larger one.
const SMALL_DIRECTORY_CUTOFF: usize = 143;
const SMALL_DIRECTORY: usize = 48;
const LARGE_DIRECTORY: usize = 200;

const MAX_EFFECT_BATCH: usize = 2;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Applied to every interrupt transfer.
    pub timeout: Duration,

    /// Upper bound on a single multi-packet reply, the largest directory plus one preset
    /// and some margin.
    pub max_response_packets: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(500),
            max_response_packets: 296,
        }
    }
}

#[derive(Debug, Copy, Clone, Display, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
}

/// What the amplifier reported when the session started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmpState {
    pub current: MemoryBank,

    /// One name per preset slot, empty slots have empty names.
    pub presets: Vec<String>,
}

/// A session with a single amplifier. Calls block until the amplifier has acknowledged every
/// packet, and must not overlap.
pub struct Mustang<T: AmpTransport> {
    transport: T,
    config: SessionConfig,
    state: SessionState,
    preset_slots: u8,
}

impl Mustang<LibUsbTransport> {
    pub fn new(config: SessionConfig) -> Self {
        let transport = LibUsbTransport::new(config.timeout);
        Self::with_transport(transport, config)
    }
}

impl<T: AmpTransport> Mustang<T> {
    pub fn with_transport(transport: T, config: SessionConfig) -> Self {
        Self {
            transport,
            config,
            state: SessionState::Disconnected,
            preset_slots: (LARGE_DIRECTORY / 2) as u8,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Number of preset slots, known once the session has started.
    pub fn preset_slots(&self) -> u8 {
        self.preset_slots
    }

    /// Opens the amplifier (if needed), performs the handshake and reads back the preset
    /// directory along with the currently active preset.
    pub fn start(&mut self) -> Result<AmpState, ConnectError> {
        self.state = SessionState::Connecting;

        if !self.transport.is_open() {
            if let Err(error) = self.transport.open(VID_MUSTANG, &PRODUCT_IDS) {
                self.state = SessionState::Disconnected;
                return Err(error);
            }
        }

        match self.initialise() {
            Ok(state) => {
                info!(
                    "Mustang ready, {} preset slots, current preset '{}'",
                    self.preset_slots, state.current.name
                );
                self.state = SessionState::Connected;
                Ok(state)
            }
            Err(error) => {
                warn!("Handshake failed, closing device: {}", error);
                self.transport.close();
                self.state = SessionState::Disconnected;
                Err(error.into())
            }
        }
    }

    pub fn stop(&mut self) {
        if self.state != SessionState::Disconnected {
            info!("Disconnecting from Mustang");
        }
        self.transport.close();
        self.state = SessionState::Disconnected;
    }

    /// Replaces whatever occupies the effect's slot. An empty effect just clears the slot.
    pub fn set_effect(&mut self, effect: &EffectSettings) -> Result<(), CommandError> {
        self.check_connected()?;

        self.send_command(&serialise_clear_effect_settings())?;
        self.send_apply(None)?;

        if effect.effect == EffectType::Empty {
            debug!("Cleared effect slot {}", effect.logical_slot());
            return Ok(());
        }

        self.send_command(&serialise_effect_settings(&effect.normalised()))?;
        self.send_apply(None)
    }

    pub fn set_amplifier(&mut self, settings: &AmpSettings) -> Result<(), CommandError> {
        self.check_connected()?;

        self.send_command(&serialise_amp_settings(settings))?;
        self.send_apply(None)?;

        self.send_command(&serialise_amp_settings_usb_gain(settings))?;
        self.send_apply(None)
    }

    /// Stores the current settings under `name` in `slot`, returns the slot as the amplifier
    /// now reports it.
    pub fn save_on_amp(&mut self, name: &str, slot: u8) -> Result<MemoryBank, CommandError> {
        self.check_connected()?;
        self.check_slot(slot)?;

        self.send_command(&serialise_name(slot, name))?;
        self.load_bank(slot)
    }

    pub fn load_memory_bank(&mut self, slot: u8) -> Result<MemoryBank, CommandError> {
        self.check_connected()?;
        self.check_slot(slot)?;
        self.load_bank(slot)
    }

    /// Stores an effect preset. The batch is either a single modulation effect, or up to two
    /// delay / reverb effects.
    pub fn save_effects(
        &mut self,
        slot: u8,
        name: &str,
        effects: &[EffectSettings],
    ) -> Result<(), CommandError> {
        self.check_connected()?;
        self.check_slot(slot)?;

        let Some(first) = effects.first() else {
            return Err(CommandError::InvalidEffectBatch("no effects given"));
        };
        if effects.len() > MAX_EFFECT_BATCH {
            return Err(CommandError::InvalidEffectBatch("at most two effects can be saved"));
        }
        if first.category() == Some(EffectCategory::Modulation) && effects.len() > 1 {
            return Err(CommandError::InvalidEffectBatch(
                "a modulation effect has to be saved on its own",
            ));
        }

        let effects: Vec<EffectSettings> = effects.iter().map(|e| e.normalised()).collect();

        self.send_command(&serialise_save_effect_name(slot, name, &effects))?;
        for packet in serialise_save_effect_packets(slot, &effects) {
            self.send_command(&packet)?;
        }
        self.send_apply(effects.first())
    }

    fn initialise(&mut self) -> Result<AmpState, CommandError> {
        debug!("Sending handshake");
        for packet in serialise_init_command() {
            self.send_command(&packet)?;
        }

        self.send_packet(&serialise_load_command())?;
        let packets = self.receive_until_empty()?;

        let directory = match packets.len() {
            count if count > SMALL_DIRECTORY_CUTOFF => LARGE_DIRECTORY,
            _ => SMALL_DIRECTORY,
        };
        debug!(
            "Received {} packets, using a directory of {}",
            packets.len(),
            directory
        );
        self.preset_slots = (directory / 2) as u8;

        let mut presets: Vec<String> = packets
            .iter()
            .take(directory)
            .step_by(2)
            .map(decode_name)
            .collect();
        presets.resize(self.preset_slots as usize, String::new());

        let current = decode_window(packets.get(directory..).unwrap_or_default());
        Ok(AmpState { current, presets })
    }

    fn load_bank(&mut self, slot: u8) -> Result<MemoryBank, CommandError> {
        self.send_packet(&serialise_load_slot_command(slot))?;
        let packets = self.receive_until_empty()?;
        if packets.len() > PRESET_WINDOW {
            debug!("Ignoring {} trailing packets", packets.len() - PRESET_WINDOW);
        }
        Ok(decode_window(&packets))
    }

    fn check_connected(&self) -> Result<(), CommandError> {
        match self.state {
            SessionState::Connected => Ok(()),
            _ => Err(CommandError::NotConnected),
        }
    }

    fn check_slot(&self, slot: u8) -> Result<(), CommandError> {
        if slot >= self.preset_slots {
            return Err(CommandError::InvalidSlot {
                slot,
                max: self.preset_slots,
            });
        }
        Ok(())
    }

    fn send_packet(&mut self, packet: &Packet) -> Result<usize, CommandError> {
        debug!("Sending {:02x?}", &packet[..8]);
        self.transport.interrupt_write(ENDPOINT_SEND, packet)
    }

    fn receive_packet(&mut self) -> Result<Vec<u8>, CommandError> {
        self.transport.interrupt_read(ENDPOINT_RECEIVE, PACKET_SIZE)
    }

    /// Sends a packet and consumes the amplifier's acknowledgement.
    fn send_command(&mut self, packet: &Packet) -> Result<(), CommandError> {
        self.send_packet(packet)?;
        self.receive_packet()?;
        Ok(())
    }

    fn send_apply(&mut self, effect: Option<&EffectSettings>) -> Result<(), CommandError> {
        self.send_command(&serialise_apply_command(effect))
    }

    /// Reads until the amplifier sends a zero-length packet. A timeout once the reply has
    /// started counts as the end of it.
    fn receive_until_empty(&mut self) -> Result<Vec<Packet>, CommandError> {
        let limit = self.config.max_response_packets;
        let mut packets = Vec::new();

        loop {
            match self.receive_packet() {
                Ok(data) if data.is_empty() => break,
                Ok(data) => {
                    if packets.len() == limit {
                        return Err(CommandError::ResponseOverflow(limit));
                    }
                    if data.len() < PACKET_SIZE {
                        warn!("Short packet of {} bytes, padding", data.len());
                    }
                    packets.push(to_packet(&data));
                }
                Err(error) if error.is_timeout() && !packets.is_empty() => {
                    debug!("Timed out after {} packets, treating as end", packets.len());
                    break;
                }
                Err(error) => return Err(error),
            }
        }

        Ok(packets)
    }
}

impl<T: AmpTransport> Drop for Mustang<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Decodes the first preset window worth of packets. Nothing received means nothing to decode,
/// a short window is padded out with zeroes.
fn decode_window(packets: &[Packet]) -> MemoryBank {
    if packets.is_empty() {
        debug!("No preset data received");
        return MemoryBank::default();
    }

    if packets.len() < PRESET_WINDOW {
        warn!(
            "Expected {} preset packets, received {}",
            PRESET_WINDOW,
            packets.len()
        );
    }

    let mut window: PresetWindow = [[0; PACKET_SIZE]; PRESET_WINDOW];
    for (target, packet) in window.iter_mut().zip(packets) {
        *target = *packet;
    }
    decode_memory_bank(&window)
}
