use enum_map::Enum;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, FromRepr};

pub mod tables;

pub use tables::{AmpDescriptor, EffectDescriptor};

/// Number of concurrently active effect engines on the amplifier.
pub const EFFECT_SLOTS: usize = 4;

/// Number of knobs an effect packet carries, whether the effect uses them or not.
pub const EFFECT_KNOBS: usize = 6;

#[derive(Copy, Clone, Debug, Default, Display, EnumIter, EnumCount, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AmpModel {
    #[default]
    #[strum(to_string = "Fender '57 Deluxe")]
    Fender57Deluxe,
    #[strum(to_string = "Fender '59 Bassman")]
    Fender59Bassman,
    #[strum(to_string = "Fender '57 Champ")]
    Fender57Champ,
    #[strum(to_string = "Fender '65 Deluxe Reverb")]
    Fender65DeluxeReverb,
    #[strum(to_string = "Fender '65 Princeton")]
    Fender65Princeton,
    #[strum(to_string = "Fender '65 Twin Reverb")]
    Fender65TwinReverb,
    #[strum(to_string = "Fender Super-Sonic")]
    FenderSuperSonic,
    #[strum(to_string = "British '60s")]
    British60s,
    #[strum(to_string = "British '70s")]
    British70s,
    #[strum(to_string = "British '80s")]
    British80s,
    #[strum(to_string = "American '90s")]
    American90s,
    #[strum(to_string = "Metal 2000")]
    Metal2000,

    /// Any model ID the amplifier reports that isn't in the lookup table.
    #[strum(to_string = "Unknown")]
    Unknown,
}

#[derive(
    Copy, Clone, Debug, Display, EnumString, EnumIter, EnumCount, Enum, PartialEq, Eq, Hash,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EffectCategory {
    Stompbox,
    Modulation,
    Delay,
    Reverb,
}

impl EffectCategory {
    /// The DSP engine number the amplifier uses for this category.
    pub fn dsp(&self) -> u8 {
        match self {
            EffectCategory::Stompbox => 0x06,
            EffectCategory::Modulation => 0x07,
            EffectCategory::Delay => 0x08,
            EffectCategory::Reverb => 0x09,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Display, EnumIter, EnumCount, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EffectType {
    #[default]
    Empty,

    // Stompbox
    Overdrive,
    Wah,
    #[strum(to_string = "Touch Wah")]
    TouchWah,
    Fuzz,
    #[strum(to_string = "Fuzz Touch Wah")]
    FuzzTouchWah,
    #[strum(to_string = "Simple Comp")]
    SimpleComp,
    Compressor,

    // Modulation
    #[strum(to_string = "Sine Chorus")]
    SineChorus,
    #[strum(to_string = "Triangle Chorus")]
    TriangleChorus,
    #[strum(to_string = "Sine Flanger")]
    SineFlanger,
    #[strum(to_string = "Triangle Flanger")]
    TriangleFlanger,
    Vibratone,
    #[strum(to_string = "Vintage Tremolo")]
    VintageTremolo,
    #[strum(to_string = "Sine Tremolo")]
    SineTremolo,
    #[strum(to_string = "Ring Modulator")]
    RingModulator,
    #[strum(to_string = "Step Filter")]
    StepFilter,
    Phaser,
    #[strum(to_string = "Pitch Shifter")]
    PitchShifter,

    // Delay
    #[strum(to_string = "Mono Delay")]
    MonoDelay,
    #[strum(to_string = "Mono Echo Filter")]
    MonoEchoFilter,
    #[strum(to_string = "Stereo Echo Filter")]
    StereoEchoFilter,
    #[strum(to_string = "Multitap Delay")]
    MultitapDelay,
    #[strum(to_string = "Ping Pong Delay")]
    PingPongDelay,
    #[strum(to_string = "Ducking Delay")]
    DuckingDelay,
    #[strum(to_string = "Reverse Delay")]
    ReverseDelay,
    #[strum(to_string = "Tape Delay")]
    TapeDelay,
    #[strum(to_string = "Stereo Tape Delay")]
    StereoTapeDelay,

    // Reverb
    #[strum(to_string = "Small Hall")]
    SmallHallReverb,
    #[strum(to_string = "Large Hall")]
    LargeHallReverb,
    #[strum(to_string = "Small Room")]
    SmallRoomReverb,
    #[strum(to_string = "Large Room")]
    LargeRoomReverb,
    #[strum(to_string = "Small Plate")]
    SmallPlateReverb,
    #[strum(to_string = "Large Plate")]
    LargePlateReverb,
    #[strum(to_string = "Ambient")]
    AmbientReverb,
    #[strum(to_string = "Arena")]
    ArenaReverb,
    #[strum(to_string = "'63 Fender Spring")]
    Fender63SpringReverb,
    #[strum(to_string = "'65 Fender Spring")]
    Fender65SpringReverb,
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Display, EnumIter, FromRepr, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Cabinet {
    #[default]
    Off = 0x00,
    #[strum(to_string = "'57 Deluxe 1x12")]
    Cab57Dlx = 0x01,
    #[strum(to_string = "Bassman 4x10")]
    CabBassman = 0x02,
    #[strum(to_string = "'65 Deluxe 1x12")]
    Cab65Dlx = 0x03,
    #[strum(to_string = "'65 Princeton 1x10")]
    Cab65Prn = 0x04,
    #[strum(to_string = "Champ 1x8")]
    CabChamp = 0x05,
    #[strum(to_string = "4x12 Modern")]
    Cab4x12M = 0x06,
    #[strum(to_string = "2x12 Closed")]
    Cab2x12C = 0x07,
    #[strum(to_string = "4x12 Greenback")]
    Cab4x12G = 0x08,
    #[strum(to_string = "'65 Twin 2x12")]
    Cab65Twn = 0x09,
    #[strum(to_string = "4x12 Vintage")]
    Cab4x12V = 0x0a,
    #[strum(to_string = "Super-Sonic 2x12")]
    CabSs212 = 0x0b,
    #[strum(to_string = "Super-Sonic 1x12")]
    CabSs112 = 0x0c,
}

impl Cabinet {
    /// Bytes the amplifier doesn't recognise as a cabinet are treated as no cabinet.
    pub fn from_byte(value: u8) -> Cabinet {
        Cabinet::from_repr(value).unwrap_or_default()
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Display, EnumIter, FromRepr, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NoiseGate {
    #[default]
    Off = 0x00,
    Low = 0x01,
    Medium = 0x02,
    Heavy = 0x03,
    Super = 0x04,

    /// The only mode where threshold and depth are honoured.
    Custom = 0x05,
}

impl NoiseGate {
    pub fn from_byte(value: u8) -> NoiseGate {
        NoiseGate::from_repr(value).unwrap_or_default()
    }
}

/// Preset files store levels as 16 bit values, the amplifier only uses the high byte.
pub fn level_from_wide(value: i64) -> u8 {
    (value >> 8).clamp(0, u8::MAX as i64) as u8
}

pub fn level_to_wide(value: u8) -> u16 {
    (value as u16) << 8
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AmpSettings {
    pub model: AmpModel,
    pub volume: u8,
    pub gain: u8,
    pub gain2: u8,
    pub master_volume: u8,
    pub treble: u8,
    pub middle: u8,
    pub bass: u8,
    pub presence: u8,
    pub depth: u8,
    pub bias: u8,
    pub noise_gate: NoiseGate,
    pub threshold: u8,
    pub cabinet: Cabinet,
    pub sag: u8,
    pub bright: bool,
    pub usb_gain: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EffectSettings {
    /// The logical slot (0-3), physical slots 4-7 fold onto this via `post_amp`.
    pub slot: u8,
    pub effect: EffectType,
    pub knobs: [u8; EFFECT_KNOBS],
    pub post_amp: bool,
}

impl EffectSettings {
    pub fn empty(slot: u8) -> Self {
        Self {
            slot,
            ..Default::default()
        }
    }

    /// Position in the signal chain as the amplifier addresses it (0-7).
    pub fn physical_slot(&self) -> u8 {
        let slot = self.slot % EFFECT_SLOTS as u8;
        match self.post_amp {
            true => slot + EFFECT_SLOTS as u8,
            false => slot,
        }
    }

    pub fn logical_slot(&self) -> usize {
        self.slot as usize % EFFECT_SLOTS
    }

    pub fn category(&self) -> Option<EffectCategory> {
        self.effect.category()
    }

    /// Returns a copy with every knob limited to what the effect accepts, unused knobs are zeroed.
    pub fn normalised(&self) -> Self {
        let mut normalised = self.clone();
        if let Some(descriptor) = self.effect.descriptor() {
            for (knob, limit) in normalised.knobs.iter_mut().zip(descriptor.knob_limits) {
                *knob = (*knob).min(limit);
            }
        }
        normalised
    }
}

/// A single preset, as stored in one of the amplifier's memory slots.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MemoryBank {
    pub name: String,
    pub amp: AmpSettings,
    pub effects: [EffectSettings; EFFECT_SLOTS],
}

impl Default for MemoryBank {
    fn default() -> Self {
        Self {
            name: String::new(),
            amp: AmpSettings::default(),
            effects: [0, 1, 2, 3].map(EffectSettings::empty),
        }
    }
}

impl MemoryBank {
    pub fn effect(&self, slot: usize) -> &EffectSettings {
        &self.effects[slot % EFFECT_SLOTS]
    }

    /// Effects which are actually doing something, in logical slot order.
    pub fn active_effects(&self) -> impl Iterator<Item = &EffectSettings> {
        self.effects
            .iter()
            .filter(|effect| effect.effect != EffectType::Empty)
    }
}
