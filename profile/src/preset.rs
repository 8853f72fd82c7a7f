use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use log::debug;
use mustang_types::{AmpSettings, EffectCategory, EffectSettings, MemoryBank, EFFECT_SLOTS};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::components::amplifier::{write_amplifier, AmplifierElement};
use crate::components::byte;
use crate::components::fx::{write_fx, FxElement};
use crate::components::info::{write_info, InfoElement};
use crate::error::{ParseError, SaveError};

/// An unescaped attribute, as handed to the component parsers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Section {
    None,
    Amplifier,
    Fx,
    Fuse,
    UsbGain,
}

/// A FUSE preset file, holding the same settings a memory bank on the amplifier does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub name: String,
    pub amp: AmpSettings,
    pub effects: [EffectSettings; EFFECT_SLOTS],
}

impl Default for Preset {
    fn default() -> Self {
        MemoryBank::default().into()
    }
}

impl From<MemoryBank> for Preset {
    fn from(bank: MemoryBank) -> Self {
        Self {
            name: bank.name,
            amp: bank.amp,
            effects: bank.effects,
        }
    }
}

impl From<Preset> for MemoryBank {
    fn from(preset: Preset) -> Self {
        Self {
            name: preset.name,
            amp: preset.amp,
            effects: preset.effects,
        }
    }
}

impl Preset {
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let file = File::open(path)?;
        Self::load(BufReader::new(file))
    }

    pub fn load<R: BufRead>(read: R) -> Result<Self, ParseError> {
        let mut reader = Reader::from_reader(read);
        reader.config_mut().trim_text(true);

        let mut amplifier = AmplifierElement::new();
        let mut fx = FxElement::new();
        let mut info = InfoElement::new();
        let mut usb_gain = None;

        let mut section = Section::None;
        let mut group: Option<EffectCategory> = None;
        let mut param: Option<u8> = None;

        let mut buf = Vec::new();
        loop {
            let event = reader.read_event_into(&mut buf)?;
            match event {
                Event::Start(ref element) | Event::Empty(ref element) => {
                    let empty = matches!(event, Event::Empty(_));
                    let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
                    let attributes = attributes(element)?;

                    match name.as_str() {
                        "Amplifier" => section = Section::Amplifier,
                        "FX" => section = Section::Fx,
                        "FUSE" => section = Section::Fuse,
                        "UsbGain" => section = Section::UsbGain,
                        "Module" if section == Section::Amplifier => {
                            amplifier.parse_module(&attributes)?;
                        }
                        "Module" if section == Section::Fx => {
                            fx.parse_module(group, &attributes)?;
                            if empty {
                                fx.end_module();
                            }
                        }
                        "Param" if !empty => param = Some(control_index(&attributes)?),
                        "Info" if section == Section::Fuse => info.parse_info(&attributes),
                        other if section == Section::Fx => {
                            group = EffectCategory::from_str(other).ok();
                        }
                        other => debug!("Unparsed Element: {}", other),
                    }
                }
                Event::Text(ref text) => {
                    let text = String::from_utf8_lossy(text);
                    let text = text.trim();

                    if let Some(index) = param {
                        let value: i64 = text.parse()?;
                        match section {
                            Section::Amplifier => amplifier.parse_param(index, value),
                            Section::Fx => fx.parse_param(index, value),
                            _ => debug!("Param {} outside of a module", index),
                        }
                    } else if section == Section::UsbGain && !text.is_empty() {
                        usb_gain = Some(byte(text.parse()?));
                    }
                }
                Event::End(ref element) => {
                    match element.local_name().as_ref() {
                        b"Param" => param = None,
                        b"Module" => fx.end_module(),
                        b"Amplifier" | b"FX" | b"FUSE" | b"UsbGain" => {
                            section = Section::None;
                            group = None;
                        }
                        _ if section == Section::Fx => group = None,
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        let mut amp = amplifier.into_settings();
        if let Some(usb_gain) = usb_gain {
            amp.usb_gain = usb_gain;
        }

        Ok(Self {
            name: info.into_name(),
            amp,
            effects: fx.into_effects(),
        })
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), SaveError> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))
    }

    pub fn write_to<W: Write>(&self, sink: W) -> Result<(), SaveError> {
        let mut writer = Writer::new_with_indent(sink, b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let mut root = BytesStart::new("Preset");
        root.push_attribute(("amplifier", "Mustang"));
        writer.write_event(Event::Start(root))?;

        write_amplifier(&self.amp, &mut writer)?;
        write_fx(&self.effects, &mut writer)?;
        write_info(&self.name, &mut writer)?;

        let usb_gain = self.amp.usb_gain.to_string();
        writer.write_event(Event::Start(BytesStart::new("UsbGain")))?;
        writer.write_event(Event::Text(BytesText::new(&usb_gain)))?;
        writer.write_event(Event::End(BytesEnd::new("UsbGain")))?;

        writer.write_event(Event::End(BytesEnd::new("Preset")))?;

        let mut sink = writer.into_inner();
        sink.flush()?;
        Ok(())
    }
}

fn attributes(element: &BytesStart) -> Result<Vec<Attribute>, ParseError> {
    let mut attributes = Vec::new();
    for attribute in element.attributes() {
        let attribute = attribute?;
        let name = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
        let value = String::from_utf8_lossy(&attribute.value);
        let value = quick_xml::escape::unescape(&value)?.into_owned();
        attributes.push(Attribute { name, value });
    }
    Ok(attributes)
}

fn control_index(attributes: &[Attribute]) -> Result<u8, ParseError> {
    let attribute = attributes
        .iter()
        .find(|attr| attr.name == "ControlIndex")
        .ok_or(ParseError::MissingAttribute {
            element: "Param",
            attribute: "ControlIndex",
        })?;
    Ok(attribute.value.parse()?)
}
