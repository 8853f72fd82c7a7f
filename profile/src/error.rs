#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("Expected int: {0}")]
    ExpectedInt(#[from] std::num::ParseIntError),

    #[error("Invalid XML: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Invalid attribute: {0}")]
    AttributeError(#[from] quick_xml::events::attributes::AttrError),

    #[error("Invalid escape sequence: {0}")]
    EscapeError(#[from] quick_xml::escape::EscapeError),

    #[error("Missing attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum SaveError {
    #[error("XML Writing Error {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
}
