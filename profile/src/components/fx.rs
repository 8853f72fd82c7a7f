use std::io::Write;

use enum_map::EnumMap;
use log::{debug, warn};
use mustang_types::{
    level_from_wide, level_to_wide, EffectCategory, EffectSettings, EffectType, EFFECT_SLOTS,
};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::components::write_param;
use crate::error::{ParseError, SaveError};
use crate::preset::Attribute;

/**
 * The <FX> section holds one group per effect category, each with a module whose POS is the
 * physical slot (0-7). Anything past 3 sits after the amp, and folds back onto a logical slot.
 */
#[derive(Debug)]
pub struct FxElement {
    effects: [EffectSettings; EFFECT_SLOTS],

    // Logical slot of the module currently being parsed, params land here.
    current: Option<usize>,
}

impl Default for FxElement {
    fn default() -> Self {
        Self::new()
    }
}

impl FxElement {
    pub fn new() -> Self {
        Self {
            effects: [0, 1, 2, 3].map(EffectSettings::empty),
            current: None,
        }
    }

    pub fn parse_module(
        &mut self,
        group: Option<EffectCategory>,
        attributes: &[Attribute],
    ) -> Result<(), ParseError> {
        let mut id = None;
        let mut position = None;

        for attr in attributes {
            if attr.name == "ID" {
                id = Some(attr.value.parse::<i64>()?);
                continue;
            }
            if attr.name == "POS" {
                position = Some(attr.value.parse::<u8>()?);
                continue;
            }
        }

        let id = id.ok_or(ParseError::MissingAttribute {
            element: "Module",
            attribute: "ID",
        })?;
        let position = position.ok_or(ParseError::MissingAttribute {
            element: "Module",
            attribute: "POS",
        })?;

        let effect = match u8::try_from(id).ok().and_then(EffectType::lookup) {
            Some(effect) => effect,
            None => {
                warn!("[FX] Unknown effect ID: {}", id);
                EffectType::Empty
            }
        };

        if let (Some(group), Some(category)) = (group, effect.category()) {
            if group != category {
                debug!("[FX] {} found in the {} group", effect, group);
            }
        }

        let slot = position as usize % EFFECT_SLOTS;
        if effect == EffectType::Empty && self.effects[slot].effect != EffectType::Empty {
            self.current = None;
            return Ok(());
        }

        self.effects[slot] = EffectSettings {
            slot: slot as u8,
            effect,
            knobs: Default::default(),
            post_amp: position as usize >= EFFECT_SLOTS,
        };
        self.current = Some(slot);
        Ok(())
    }

    pub fn parse_param(&mut self, index: u8, value: i64) {
        let Some(slot) = self.current else {
            return;
        };

        match self.effects[slot].knobs.get_mut(index as usize) {
            Some(knob) => *knob = level_from_wide(value),
            None => debug!("[FX] Unparsed Param: {}", index),
        }
    }

    pub fn end_module(&mut self) {
        self.current = None;
    }

    pub fn into_effects(self) -> [EffectSettings; EFFECT_SLOTS] {
        self.effects
    }
}

pub fn write_fx<W: Write>(
    effects: &[EffectSettings; EFFECT_SLOTS],
    writer: &mut Writer<W>,
) -> Result<(), SaveError> {
    let mut groups: EnumMap<EffectCategory, Vec<&EffectSettings>> = EnumMap::default();
    for effect in effects {
        if let Some(category) = effect.category() {
            groups[category].push(effect);
        }
    }

    writer.write_event(Event::Start(BytesStart::new("FX")))?;
    for (index, (category, group)) in groups.iter().enumerate() {
        let name = category.to_string();
        let group_id = (index + 1).to_string();

        let mut element = BytesStart::new(name.as_str());
        element.push_attribute(("ID", group_id.as_str()));
        writer.write_event(Event::Start(element))?;

        // FUSE expects a module in every group, empty ones point at their own position
        if group.is_empty() {
            let position = index.to_string();
            let mut module = BytesStart::new("Module");
            module.push_attribute(("ID", "0"));
            module.push_attribute(("POS", position.as_str()));
            module.push_attribute(("BypassState", "1"));
            writer.write_event(Event::Empty(module))?;
        }

        for effect in group {
            write_module(effect, writer)?;
        }

        writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
    }
    writer.write_event(Event::End(BytesEnd::new("FX")))?;
    Ok(())
}

fn write_module<W: Write>(
    effect: &EffectSettings,
    writer: &mut Writer<W>,
) -> Result<(), SaveError> {
    let id = effect.effect.id().to_string();
    let position = effect.physical_slot().to_string();

    let mut module = BytesStart::new("Module");
    module.push_attribute(("ID", id.as_str()));
    module.push_attribute(("POS", position.as_str()));
    module.push_attribute(("BypassState", "1"));
    writer.write_event(Event::Start(module))?;

    for (index, knob) in effect.knobs.iter().enumerate() {
        write_param(writer, index as u8, level_to_wide(*knob) as i64)?;
    }

    writer.write_event(Event::End(BytesEnd::new("Module")))?;
    Ok(())
}
