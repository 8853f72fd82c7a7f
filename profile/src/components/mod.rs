use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::SaveError;

pub mod amplifier;
pub mod fx;
pub mod info;

/// Values stored directly (rather than as a 16 bit level) still arrive as arbitrary integers.
pub(crate) fn byte(value: i64) -> u8 {
    value.clamp(0, u8::MAX as i64) as u8
}

pub(crate) fn write_param<W: Write>(
    writer: &mut Writer<W>,
    index: u8,
    value: i64,
) -> Result<(), SaveError> {
    let index = index.to_string();
    let value = value.to_string();

    let mut param = BytesStart::new("Param");
    param.push_attribute(("ControlIndex", index.as_str()));
    writer.write_event(Event::Start(param))?;
    writer.write_event(Event::Text(BytesText::new(&value)))?;
    writer.write_event(Event::End(BytesEnd::new("Param")))?;
    Ok(())
}
