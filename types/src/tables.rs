// The amplifier, its memory dump and the FUSE preset files all refer to amp models and effects
// by the same module ID, so every lookup in either direction goes through the tables below.
use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{AmpModel, EffectCategory, EffectType, EFFECT_KNOBS};

/// Everything the amplifier needs to know about an amp model beyond the knob values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmpDescriptor {
    pub model: AmpModel,
    pub id: u8,

    /// Written to bytes 44, 45, 46 and 50 of the settings packet.
    pub control: u8,

    /// Written to byte 54 of the settings packet.
    pub voicing: u8,

    /// Written to bytes 40 and 43 of the settings packet.
    pub auxiliary: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectDescriptor {
    pub effect: EffectType,
    pub id: u8,
    pub category: EffectCategory,

    /// Bytes 19 and 20 of the settings packet, their meaning is unknown but the amplifier
    /// refuses the effect without them.
    pub flags: [u8; 2],

    /// Highest value each knob accepts, 0 for knobs the effect doesn't have.
    pub knob_limits: [u8; EFFECT_KNOBS],
}

const FIVE_KNOBS: [u8; EFFECT_KNOBS] = [0xff, 0xff, 0xff, 0xff, 0xff, 0x00];
const SIX_KNOBS: [u8; EFFECT_KNOBS] = [0xff; EFFECT_KNOBS];

const fn amp(model: AmpModel, id: u8, control: u8, voicing: u8) -> AmpDescriptor {
    AmpDescriptor {
        model,
        id,
        control,
        voicing,
        auxiliary: 0x80,
    }
}

const fn effect(
    effect: EffectType,
    id: u8,
    category: EffectCategory,
    flags: [u8; 2],
    knob_limits: [u8; EFFECT_KNOBS],
) -> EffectDescriptor {
    EffectDescriptor {
        effect,
        id,
        category,
        flags,
        knob_limits,
    }
}

pub static AMPS: [AmpDescriptor; 12] = [
    amp(AmpModel::Fender57Deluxe, 0x67, 0x01, 0x53),
    amp(AmpModel::Fender59Bassman, 0x64, 0x02, 0x6a),
    amp(AmpModel::Fender57Champ, 0x7c, 0x0c, 0x00),
    AmpDescriptor {
        model: AmpModel::Fender65DeluxeReverb,
        id: 0x53,
        control: 0x03,
        voicing: 0x6a,
        auxiliary: 0x00,
    },
    amp(AmpModel::Fender65Princeton, 0x6a, 0x04, 0x61),
    amp(AmpModel::Fender65TwinReverb, 0x75, 0x05, 0x72),
    amp(AmpModel::FenderSuperSonic, 0x72, 0x06, 0x79),
    amp(AmpModel::British60s, 0x61, 0x07, 0x5e),
    amp(AmpModel::British70s, 0x79, 0x0b, 0x7c),
    amp(AmpModel::British80s, 0x5e, 0x09, 0x5d),
    amp(AmpModel::American90s, 0x5d, 0x0a, 0x6d),
    amp(AmpModel::Metal2000, 0x6d, 0x08, 0x75),
];

pub static EFFECTS: [EffectDescriptor; 37] = {
    use EffectCategory::*;
    use EffectType::*;

    [
        effect(Overdrive, 0x3c, Stompbox, [0x00, 0x00], FIVE_KNOBS),
        effect(Wah, 0x49, Stompbox, [0x01, 0x00], FIVE_KNOBS),
        effect(TouchWah, 0x4a, Stompbox, [0x01, 0x00], FIVE_KNOBS),
        effect(Fuzz, 0x1a, Stompbox, [0x00, 0x00], FIVE_KNOBS),
        effect(FuzzTouchWah, 0x1c, Stompbox, [0x00, 0x00], FIVE_KNOBS),
        effect(SimpleComp, 0x88, Stompbox, [0x08, 0x00], [0x03, 0, 0, 0, 0, 0]),
        effect(Compressor, 0x07, Stompbox, [0x00, 0x00], FIVE_KNOBS),
        effect(SineChorus, 0x12, Modulation, [0x01, 0x01], FIVE_KNOBS),
        effect(TriangleChorus, 0x13, Modulation, [0x00, 0x01], FIVE_KNOBS),
        effect(SineFlanger, 0x18, Modulation, [0x00, 0x01], FIVE_KNOBS),
        effect(TriangleFlanger, 0x19, Modulation, [0x00, 0x01], FIVE_KNOBS),
        effect(Vibratone, 0x2d, Modulation, [0x01, 0x01], FIVE_KNOBS),
        effect(VintageTremolo, 0x40, Modulation, [0x01, 0x01], FIVE_KNOBS),
        effect(SineTremolo, 0x41, Modulation, [0x01, 0x01], FIVE_KNOBS),
        effect(RingModulator, 0x22, Modulation, [0x01, 0x00], [0xff, 0xff, 0xff, 0x01, 0xff, 0x00]),
        effect(StepFilter, 0x29, Modulation, [0x01, 0x01], FIVE_KNOBS),
        effect(Phaser, 0x4f, Modulation, [0x01, 0x01], [0xff, 0xff, 0xff, 0xff, 0x01, 0x00]),
        effect(PitchShifter, 0x1f, Modulation, [0x01, 0x00], FIVE_KNOBS),
        effect(MonoDelay, 0x16, Delay, [0x02, 0x01], FIVE_KNOBS),
        effect(MonoEchoFilter, 0x43, Delay, [0x01, 0x00], SIX_KNOBS),
        effect(StereoEchoFilter, 0x48, Delay, [0x02, 0x00], SIX_KNOBS),
        effect(MultitapDelay, 0x44, Delay, [0x02, 0x01], [0xff, 0xff, 0xff, 0xff, 0x03, 0x00]),
        effect(PingPongDelay, 0x45, Delay, [0x02, 0x01], FIVE_KNOBS),
        effect(DuckingDelay, 0x15, Delay, [0x02, 0x01], FIVE_KNOBS),
        effect(ReverseDelay, 0x46, Delay, [0x02, 0x01], FIVE_KNOBS),
        effect(TapeDelay, 0x2b, Delay, [0x02, 0x01], SIX_KNOBS),
        effect(StereoTapeDelay, 0x2a, Delay, [0x02, 0x01], SIX_KNOBS),
        effect(SmallHallReverb, 0x24, Reverb, [0x00, 0x00], FIVE_KNOBS),
        effect(LargeHallReverb, 0x3a, Reverb, [0x00, 0x00], FIVE_KNOBS),
        effect(SmallRoomReverb, 0x26, Reverb, [0x00, 0x00], FIVE_KNOBS),
        effect(LargeRoomReverb, 0x3b, Reverb, [0x00, 0x00], FIVE_KNOBS),
        effect(SmallPlateReverb, 0x4e, Reverb, [0x00, 0x00], FIVE_KNOBS),
        effect(LargePlateReverb, 0x4b, Reverb, [0x00, 0x00], FIVE_KNOBS),
        effect(AmbientReverb, 0x4c, Reverb, [0x00, 0x00], FIVE_KNOBS),
        effect(ArenaReverb, 0x4d, Reverb, [0x00, 0x00], FIVE_KNOBS),
        effect(Fender63SpringReverb, 0x21, Reverb, [0x00, 0x00], FIVE_KNOBS),
        effect(Fender65SpringReverb, 0x0b, Reverb, [0x00, 0x00], FIVE_KNOBS),
    ]
};

lazy_static! {
    static ref AMPS_BY_ID: HashMap<u8, &'static AmpDescriptor> =
        AMPS.iter().map(|amp| (amp.id, amp)).collect();
    static ref AMPS_BY_MODEL: HashMap<AmpModel, &'static AmpDescriptor> =
        AMPS.iter().map(|amp| (amp.model, amp)).collect();
    static ref EFFECTS_BY_ID: HashMap<u8, &'static EffectDescriptor> =
        EFFECTS.iter().map(|effect| (effect.id, effect)).collect();
    static ref EFFECTS_BY_TYPE: HashMap<EffectType, &'static EffectDescriptor> =
        EFFECTS.iter().map(|effect| (effect.effect, effect)).collect();
}

/// Module ID used for an empty effect slot.
pub const EMPTY_EFFECT_ID: u8 = 0x00;

impl AmpModel {
    pub fn descriptor(&self) -> Option<&'static AmpDescriptor> {
        AMPS_BY_MODEL.get(self).copied()
    }

    pub fn id(&self) -> Option<u8> {
        self.descriptor().map(|amp| amp.id)
    }

    /// Returns `None` for IDs which aren't in the table.
    pub fn lookup(id: u8) -> Option<AmpModel> {
        AMPS_BY_ID.get(&id).map(|amp| amp.model)
    }

    pub fn from_id(id: u8) -> AmpModel {
        AmpModel::lookup(id).unwrap_or(AmpModel::Unknown)
    }
}

impl EffectType {
    pub fn descriptor(&self) -> Option<&'static EffectDescriptor> {
        EFFECTS_BY_TYPE.get(self).copied()
    }

    pub fn id(&self) -> u8 {
        self.descriptor()
            .map(|effect| effect.id)
            .unwrap_or(EMPTY_EFFECT_ID)
    }

    pub fn category(&self) -> Option<EffectCategory> {
        self.descriptor().map(|effect| effect.category)
    }

    /// Returns `None` for IDs which aren't in the table, `Some(Empty)` for the empty ID.
    pub fn lookup(id: u8) -> Option<EffectType> {
        if id == EMPTY_EFFECT_ID {
            return Some(EffectType::Empty);
        }
        EFFECTS_BY_ID.get(&id).map(|effect| effect.effect)
    }

    pub fn from_id(id: u8) -> EffectType {
        EffectType::lookup(id).unwrap_or(EffectType::Empty)
    }
}
