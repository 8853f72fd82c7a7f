use mustang_types::{AmpSettings, EffectCategory, EffectSettings, NoiseGate, EFFECT_KNOBS};

use crate::packet::{
    packet, Packet, AUXILIARY, BASS, BIAS, BRIGHT, CABINET, COMMAND_DATA, CONTROL, DEPTH,
    DIRECTION, DIRECTION_SET, DIRECTION_STORE, DSP, DSP_AMP, DSP_EFFECT_NAME, DSP_NAME,
    DSP_NONE, DSP_USB_GAIN, EFFECT_FLAGS, EFFECT_NAME_LENGTH, FX_KNOB, FX_SLOT, GAIN, GAIN2,
    KNOB1, MASTER_VOLUME, MIDDLE, MODEL, NAME, NAME_LENGTH, NOISE_GATE, PRESENCE, SAG,
    SAVE_SLOT, THRESHOLD, TREBLE, USB_GAIN, VOICING, VOLUME,
};

const FX_KNOB_MODULATION: u8 = 0x01;
const FX_KNOB_DELAY_REVERB: u8 = 0x02;

const DEFAULT_DEPTH: u8 = 0x80;
const MAX_THRESHOLD: u8 = 0x09;
const MAX_SAG: u8 = 0x02;
const DEFAULT_SAG: u8 = 0x01;

fn set_header(dsp: u8) -> Packet {
    packet(&[COMMAND_DATA, DIRECTION_SET, dsp, 0x00, 0x00, 0x00, 0x01, 0x01])
}

fn store_header(dsp: u8, fx_knob: u8, slot: u8) -> Packet {
    packet(&[COMMAND_DATA, DIRECTION_STORE, dsp, fx_knob, slot, 0x00, 0x01, 0x01])
}

fn write_name(data: &mut Packet, name: &str, max_length: usize) {
    let mut length = name.len().min(max_length);
    while !name.is_char_boundary(length) {
        length -= 1;
    }
    data[NAME..NAME + length].copy_from_slice(&name.as_bytes()[..length]);
}

fn write_effect(data: &mut Packet, effect: &EffectSettings) {
    if let Some(descriptor) = effect.effect.descriptor() {
        data[DSP] = descriptor.category.dsp();
        data[MODEL] = descriptor.id;
        data[EFFECT_FLAGS..EFFECT_FLAGS + 2].copy_from_slice(&descriptor.flags);
    }
    data[FX_SLOT] = effect.physical_slot();
    data[KNOB1..KNOB1 + EFFECT_KNOBS].copy_from_slice(&effect.knobs);
}

/// The selector the amplifier uses to tell modulation presets apart from delay / reverb ones.
pub fn fx_knob(effect: &EffectSettings) -> u8 {
    match effect.category() {
        Some(EffectCategory::Modulation) => FX_KNOB_MODULATION,
        _ => FX_KNOB_DELAY_REVERB,
    }
}

pub fn serialise_amp_settings(settings: &AmpSettings) -> Packet {
    let mut data = set_header(DSP_AMP);

    // An unknown model leaves the model bytes zeroed, the amplifier ignores the packet.
    if let Some(descriptor) = settings.model.descriptor() {
        data[MODEL] = descriptor.id;
        for index in AUXILIARY {
            data[index] = descriptor.auxiliary;
        }
        for index in CONTROL {
            data[index] = descriptor.control;
        }
        data[VOICING] = descriptor.voicing;
    }

    data[VOLUME] = settings.volume;
    data[GAIN] = settings.gain;
    data[GAIN2] = settings.gain2;
    data[MASTER_VOLUME] = settings.master_volume;
    data[TREBLE] = settings.treble;
    data[MIDDLE] = settings.middle;
    data[BASS] = settings.bass;
    data[PRESENCE] = settings.presence;
    data[BIAS] = settings.bias;

    data[NOISE_GATE] = settings.noise_gate as u8;
    data[DEPTH] = DEFAULT_DEPTH;
    if settings.noise_gate == NoiseGate::Custom {
        data[THRESHOLD] = match settings.threshold {
            threshold if threshold > MAX_THRESHOLD => 0x00,
            threshold => threshold,
        };
        data[DEPTH] = settings.depth;
    }

    data[CABINET] = settings.cabinet as u8;
    data[SAG] = match settings.sag {
        sag if sag > MAX_SAG => DEFAULT_SAG,
        sag => sag,
    };
    data[BRIGHT] = settings.bright as u8;

    data
}

/// The USB input gain can't ride along with the rest of the amp settings, it has its own packet.
pub fn serialise_amp_settings_usb_gain(settings: &AmpSettings) -> Packet {
    let mut data = set_header(DSP_USB_GAIN);
    data[USB_GAIN] = settings.usb_gain;
    data
}

pub fn serialise_effect_settings(effect: &EffectSettings) -> Packet {
    let mut data = set_header(DSP_NONE);
    write_effect(&mut data, effect);
    data
}

pub fn serialise_clear_effect_settings() -> Packet {
    set_header(DSP_NONE)
}

pub fn serialise_name(slot: u8, name: &str) -> Packet {
    let mut data = store_header(DSP_NAME, 0x00, slot);
    write_name(&mut data, name, NAME_LENGTH);
    data
}

/// Name packet for an effect preset, `effects` decides which effect bank the slot belongs to.
pub fn serialise_save_effect_name(slot: u8, name: &str, effects: &[EffectSettings]) -> Packet {
    let knob = effects.first().map(fx_knob).unwrap_or(FX_KNOB_DELAY_REVERB);
    let mut data = store_header(DSP_EFFECT_NAME, knob, slot);
    write_name(&mut data, name, EFFECT_NAME_LENGTH);
    data
}

pub fn serialise_save_effect_packets(slot: u8, effects: &[EffectSettings]) -> Vec<Packet> {
    let knob = effects.first().map(fx_knob).unwrap_or(FX_KNOB_DELAY_REVERB);
    effects
        .iter()
        .map(|effect| {
            let mut data = serialise_effect_settings(effect);
            data[DIRECTION] = DIRECTION_STORE;
            data[FX_KNOB] = knob;
            data[SAVE_SLOT] = slot;
            data
        })
        .collect()
}

pub fn serialise_load_command() -> Packet {
    packet(&[0xff, 0xc1])
}

pub fn serialise_load_slot_command(slot: u8) -> Packet {
    packet(&[COMMAND_DATA, DIRECTION_STORE, 0x01, 0x00, slot, 0x00, 0x01])
}

/// Sent in order, once, straight after the device is opened.
pub fn serialise_init_command() -> [Packet; 2] {
    [packet(&[0x00, 0xc3]), packet(&[0x1a, 0x03])]
}

/// Commits whatever was sent last. After an effect preset the amplifier needs to know which
/// effect bank to re-apply, so the first effect of the batch is passed along.
pub fn serialise_apply_command(effect: Option<&EffectSettings>) -> Packet {
    let knob = effect.map(fx_knob).unwrap_or(0x00);
    packet(&[COMMAND_DATA, DIRECTION_SET, DSP_NONE, knob])
}
