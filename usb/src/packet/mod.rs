// Packet layout, reverse engineered from traffic between the amplifier and Fender FUSE. Offsets
// are the wire format, the names are our best guess at what they do.

mod decode;
mod serialise;

pub use decode::{
    decode_amp_from_data, decode_effects_from_data, decode_memory_bank, decode_name,
    decode_name_from_data, PresetWindow, PRESET_WINDOW,
};
pub use serialise::{
    fx_knob, serialise_amp_settings, serialise_amp_settings_usb_gain, serialise_apply_command,
    serialise_clear_effect_settings, serialise_effect_settings, serialise_init_command,
    serialise_load_command, serialise_load_slot_command, serialise_name,
    serialise_save_effect_name, serialise_save_effect_packets,
};

pub const PACKET_SIZE: usize = 64;

pub type Packet = [u8; PACKET_SIZE];

// Header
pub(crate) const COMMAND: usize = 0;
pub(crate) const DIRECTION: usize = 1;
pub(crate) const DSP: usize = 2;
pub(crate) const FX_KNOB: usize = 3;
pub(crate) const SAVE_SLOT: usize = 4;

// Body, shared by the amp and effect packets
pub(crate) const MODEL: usize = 16;
pub(crate) const FX_SLOT: usize = 18;
pub(crate) const EFFECT_FLAGS: usize = 19;
pub(crate) const KNOB1: usize = 32;

pub(crate) const NAME: usize = 16;
pub(crate) const NAME_LENGTH: usize = 32;
pub(crate) const EFFECT_NAME_LENGTH: usize = 24;

// Amp packet
pub(crate) const VOLUME: usize = 32;
pub(crate) const GAIN: usize = 33;
pub(crate) const GAIN2: usize = 34;
pub(crate) const MASTER_VOLUME: usize = 35;
pub(crate) const TREBLE: usize = 36;
pub(crate) const MIDDLE: usize = 37;
pub(crate) const BASS: usize = 38;
pub(crate) const PRESENCE: usize = 39;
pub(crate) const DEPTH: usize = 41;
pub(crate) const BIAS: usize = 42;
pub(crate) const NOISE_GATE: usize = 47;
pub(crate) const THRESHOLD: usize = 48;
pub(crate) const CABINET: usize = 49;
pub(crate) const SAG: usize = 51;
pub(crate) const BRIGHT: usize = 52;

pub(crate) const AUXILIARY: [usize; 2] = [40, 43];
pub(crate) const CONTROL: [usize; 4] = [44, 45, 46, 50];
pub(crate) const VOICING: usize = 54;

pub(crate) const USB_GAIN: usize = 16;

// DSP numbers outside of the effect categories
pub(crate) const DSP_NONE: u8 = 0x00;
pub(crate) const DSP_NAME: u8 = 0x03;
pub(crate) const DSP_EFFECT_NAME: u8 = 0x04;
pub(crate) const DSP_AMP: u8 = 0x05;
pub(crate) const DSP_USB_GAIN: u8 = 0x0d;

pub(crate) const COMMAND_DATA: u8 = 0x1c;
pub(crate) const DIRECTION_STORE: u8 = 0x01;
pub(crate) const DIRECTION_SET: u8 = 0x03;

/// Builds a zeroed packet starting with the given header bytes.
pub(crate) fn packet(header: &[u8]) -> Packet {
    let mut packet = [0; PACKET_SIZE];
    packet[..header.len()].copy_from_slice(header);
    packet
}

/// Copies a received transfer into a packet, short transfers are zero padded.
pub fn to_packet(data: &[u8]) -> Packet {
    let length = data.len().min(PACKET_SIZE);
    packet(&data[..length])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_transfers_are_padded() {
        let packet = to_packet(&[0x1c, 0x03]);
        assert_eq!(packet[COMMAND], 0x1c);
        assert_eq!(packet[DIRECTION], 0x03);
        assert!(packet[2..].iter().all(|b| *b == 0));

        let long = [0xaa; PACKET_SIZE + 8];
        assert_eq!(to_packet(&long), [0xaa; PACKET_SIZE]);
    }
}
