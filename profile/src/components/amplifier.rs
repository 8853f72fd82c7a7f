use std::io::Write;

use log::{debug, warn};
use mustang_types::{level_from_wide, level_to_wide, AmpModel, AmpSettings, Cabinet, NoiseGate};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::components::{byte, write_param};
use crate::error::{ParseError, SaveError};
use crate::preset::Attribute;

// Params which hold a 16 bit level, in the order the amplifier lists them.
const LEVELS: [u8; 10] = [0, 1, 2, 3, 4, 5, 6, 7, 9, 10];

const NOISE_GATE: u8 = 15;
const THRESHOLD: u8 = 16;
const CABINET: u8 = 17;
const SAG: u8 = 19;
const BRIGHT: u8 = 20;

/**
 * The <Amplifier> section, a single module whose ID is the amp model, with one param per
 * control.
 */
#[derive(Debug, Default)]
pub struct AmplifierElement {
    settings: AmpSettings,
}

impl AmplifierElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_module(&mut self, attributes: &[Attribute]) -> Result<(), ParseError> {
        for attr in attributes {
            if attr.name == "ID" {
                let id: i64 = attr.value.parse()?;
                self.settings.model = match u8::try_from(id).ok().and_then(AmpModel::lookup) {
                    Some(model) => model,
                    None => {
                        warn!("[Amplifier] Unknown model ID: {}", id);
                        AmpModel::Unknown
                    }
                };
            }
        }
        Ok(())
    }

    pub fn parse_param(&mut self, index: u8, value: i64) {
        let settings = &mut self.settings;
        match index {
            0 => settings.volume = level_from_wide(value),
            1 => settings.gain = level_from_wide(value),
            2 => settings.gain2 = level_from_wide(value),
            3 => settings.master_volume = level_from_wide(value),
            4 => settings.treble = level_from_wide(value),
            5 => settings.middle = level_from_wide(value),
            6 => settings.bass = level_from_wide(value),
            7 => settings.presence = level_from_wide(value),
            9 => settings.depth = level_from_wide(value),
            10 => settings.bias = level_from_wide(value),
            NOISE_GATE => settings.noise_gate = NoiseGate::from_byte(byte(value)),
            THRESHOLD => settings.threshold = byte(value),
            CABINET => settings.cabinet = Cabinet::from_byte(byte(value)),
            SAG => settings.sag = byte(value),
            BRIGHT => settings.bright = value != 0,
            _ => debug!("[Amplifier] Unparsed Param: {}", index),
        }
    }

    pub fn into_settings(self) -> AmpSettings {
        self.settings
    }
}

pub fn write_amplifier<W: Write>(
    settings: &AmpSettings,
    writer: &mut Writer<W>,
) -> Result<(), SaveError> {
    writer.write_event(Event::Start(BytesStart::new("Amplifier")))?;

    let id = settings.model.id().unwrap_or_default().to_string();
    let mut module = BytesStart::new("Module");
    module.push_attribute(("ID", id.as_str()));
    module.push_attribute(("POS", "0"));
    module.push_attribute(("BypassState", "1"));
    writer.write_event(Event::Start(module))?;

    let levels = [
        settings.volume,
        settings.gain,
        settings.gain2,
        settings.master_volume,
        settings.treble,
        settings.middle,
        settings.bass,
        settings.presence,
        settings.depth,
        settings.bias,
    ];
    for (index, level) in LEVELS.iter().zip(levels) {
        write_param(writer, *index, level_to_wide(level) as i64)?;
    }

    write_param(writer, NOISE_GATE, settings.noise_gate as i64)?;
    write_param(writer, THRESHOLD, settings.threshold as i64)?;
    write_param(writer, CABINET, settings.cabinet as i64)?;
    write_param(writer, SAG, settings.sag as i64)?;
    write_param(writer, BRIGHT, settings.bright as i64)?;

    writer.write_event(Event::End(BytesEnd::new("Module")))?;
    writer.write_event(Event::End(BytesEnd::new("Amplifier")))?;
    Ok(())
}
