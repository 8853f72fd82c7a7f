use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::error::SaveError;
use crate::preset::Attribute;

/**
 * The <FUSE> section, we only care about the preset name held in <Info>. FUSE also stores
 * author, rating and genres here, which the amplifier has no use for.
 */
#[derive(Debug, Default)]
pub struct InfoElement {
    name: String,
}

impl InfoElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_info(&mut self, attributes: &[Attribute]) {
        for attr in attributes {
            if attr.name == "name" {
                self.name = attr.value.clone();
            }
        }
    }

    pub fn into_name(self) -> String {
        self.name
    }
}

pub fn write_info<W: Write>(name: &str, writer: &mut Writer<W>) -> Result<(), SaveError> {
    writer.write_event(Event::Start(BytesStart::new("FUSE")))?;

    let mut info = BytesStart::new("Info");
    info.push_attribute(("name", name));
    info.push_attribute(("author", ""));
    info.push_attribute(("rating", "0"));
    writer.write_event(Event::Empty(info))?;

    writer.write_event(Event::End(BytesEnd::new("FUSE")))?;
    Ok(())
}
