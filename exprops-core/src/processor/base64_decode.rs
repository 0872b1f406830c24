use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::error::{Error, Result};

use super::{ProcessingContext, Processor};

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const BASIC: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Base64 flavours accepted by [`Base64DecodeProcessor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Base64Encoding {
    #[default]
    Basic,
    Url,
    /// Basic alphabet, line breaks and other whitespace ignored.
    Mime,
}

impl Base64Encoding {
    fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "basic" => Some(Base64Encoding::Basic),
            "url" => Some(Base64Encoding::Url),
            "mime" => Some(Base64Encoding::Mime),
            _ => None,
        }
    }

    fn decode(self, value: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
        match self {
            Base64Encoding::Basic => BASIC.decode(value),
            Base64Encoding::Url => URL_SAFE.decode(value),
            Base64Encoding::Mime => {
                let compact: String = value.chars().filter(|c| !c.is_ascii_whitespace()).collect();
                BASIC.decode(compact)
            }
        }
    }
}

/// Decodes base64 values into UTF-8 text.
///
/// `#[process(base64_decode)]` uses the processor's default encoding,
/// `#[process(base64_decode = "url")]` picks one per method.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64DecodeProcessor {
    encoding: Base64Encoding,
}

impl Base64DecodeProcessor {
    pub const NAME: &'static str = "base64_decode";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encoding(encoding: Base64Encoding) -> Self {
        Base64DecodeProcessor { encoding }
    }
}

impl Processor for Base64DecodeProcessor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn process(&self, ctx: &ProcessingContext<'_>, value: &str) -> Result<String> {
        let encoding = match ctx.argument() {
            Some(name) => Base64Encoding::parse(name).ok_or_else(|| {
                Error::processing(Self::NAME, format!("unknown base64 encoding '{name}'"))
            })?,
            None => self.encoding,
        };
        let bytes = encoding
            .decode(value)
            .map_err(|e| Error::processing(Self::NAME, e))?;
        String::from_utf8(bytes).map_err(|e| Error::processing(Self::NAME, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_flavours() {
        assert_eq!(Base64Encoding::Basic.decode("aGk=").unwrap(), b"hi");
        assert_eq!(Base64Encoding::Basic.decode("aGk").unwrap(), b"hi");
        assert_eq!(Base64Encoding::Url.decode("-_8").unwrap(), vec![0xfb, 0xff]);
        assert_eq!(Base64Encoding::Mime.decode("aGVs\r\nbG8=").unwrap(), b"hello");
    }
}
