use log::warn;
use mustang_types::{
    AmpModel, AmpSettings, Cabinet, EffectSettings, EffectType, MemoryBank, NoiseGate,
    EFFECT_KNOBS, EFFECT_SLOTS,
};

use crate::packet::{
    Packet, BASS, BIAS, BRIGHT, CABINET, DEPTH, FX_SLOT, GAIN, GAIN2, KNOB1, MASTER_VOLUME,
    MIDDLE, MODEL, NAME, NAME_LENGTH, NOISE_GATE, PRESENCE, SAG, THRESHOLD, TREBLE, USB_GAIN,
    VOLUME,
};

/// Packets describing a single preset, as sent after a slot load or the preset directory.
pub const PRESET_WINDOW: usize = 7;

pub type PresetWindow = [Packet; PRESET_WINDOW];

const NAME_PACKET: usize = 0;
const AMP_PACKET: usize = 1;
const FIRST_EFFECT_PACKET: usize = 2;
const USB_GAIN_PACKET: usize = 6;

/// Reads a NUL terminated name from a name or directory packet.
pub fn decode_name(data: &Packet) -> String {
    let name = &data[NAME..NAME + NAME_LENGTH];
    let length = name.iter().position(|b| *b == 0).unwrap_or(NAME_LENGTH);
    String::from_utf8_lossy(&name[..length]).into_owned()
}

pub fn decode_name_from_data(window: &PresetWindow) -> String {
    decode_name(&window[NAME_PACKET])
}

pub fn decode_amp_from_data(window: &PresetWindow) -> AmpSettings {
    let data = &window[AMP_PACKET];

    let model = match AmpModel::lookup(data[MODEL]) {
        Some(model) => model,
        None => {
            warn!("Unknown amp model ID: {:#04x}", data[MODEL]);
            AmpModel::Unknown
        }
    };

    if Cabinet::from_repr(data[CABINET]).is_none() {
        warn!("Unknown cabinet: {:#04x}", data[CABINET]);
    }
    if NoiseGate::from_repr(data[NOISE_GATE]).is_none() {
        warn!("Unknown noise gate: {:#04x}", data[NOISE_GATE]);
    }

    AmpSettings {
        model,
        volume: data[VOLUME],
        gain: data[GAIN],
        gain2: data[GAIN2],
        master_volume: data[MASTER_VOLUME],
        treble: data[TREBLE],
        middle: data[MIDDLE],
        bass: data[BASS],
        presence: data[PRESENCE],
        depth: data[DEPTH],
        bias: data[BIAS],
        noise_gate: NoiseGate::from_byte(data[NOISE_GATE]),
        threshold: data[THRESHOLD],
        cabinet: Cabinet::from_byte(data[CABINET]),
        sag: data[SAG],
        bright: data[BRIGHT] != 0,
        usb_gain: window[USB_GAIN_PACKET][USB_GAIN],
    }
}

/// Folds the four effect packets onto their logical slots. Should two packets claim the same
/// slot, an actual effect wins over an empty one.
pub fn decode_effects_from_data(window: &PresetWindow) -> [EffectSettings; EFFECT_SLOTS] {
    let mut effects = [0, 1, 2, 3].map(EffectSettings::empty);

    for data in &window[FIRST_EFFECT_PACKET..FIRST_EFFECT_PACKET + EFFECT_SLOTS] {
        let effect = match EffectType::lookup(data[MODEL]) {
            Some(effect) => effect,
            None => {
                warn!("Unknown effect ID: {:#04x}", data[MODEL]);
                EffectType::Empty
            }
        };

        let physical = data[FX_SLOT];
        let slot = physical as usize % EFFECT_SLOTS;
        if effect == EffectType::Empty && effects[slot].effect != EffectType::Empty {
            continue;
        }

        let mut knobs = [0; EFFECT_KNOBS];
        knobs.copy_from_slice(&data[KNOB1..KNOB1 + EFFECT_KNOBS]);

        effects[slot] = EffectSettings {
            slot: slot as u8,
            effect,
            knobs,
            post_amp: physical as usize >= EFFECT_SLOTS,
        };
    }

    effects
}

pub fn decode_memory_bank(window: &PresetWindow) -> MemoryBank {
    MemoryBank {
        name: decode_name_from_data(window),
        amp: decode_amp_from_data(window),
        effects: decode_effects_from_data(window),
    }
}
