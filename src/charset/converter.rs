use encoding::EncodingRef;
use encoding::all::{
    ASCII, GB18030, GBK, ISO_2022_JP, ISO_8859_1, ISO_8859_2, ISO_8859_3, ISO_8859_4, ISO_8859_5,
    ISO_8859_6, ISO_8859_7, ISO_8859_8, UTF_8, WINDOWS_31J, WINDOWS_874, WINDOWS_949,
    WINDOWS_1254,
};
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("No converter for text encoding {0}")]
    UnsupportedEncoding(String),

    #[error("Invalid {encoding} text at byte {offset}: {cause}")]
    Malformed {
        encoding: String,
        offset: usize,
        cause: Cow<'static, str>,
    },
}

/// Byte to UTF-8 conversion, addressed by encoding name.
///
/// This is the only text primitive the charset resolver needs, so tests
/// and embedders can swap in their own.
pub trait TextConverter {
    /// Convert `input` from `encoding` and append the result to `output`.
    ///
    /// On a malformed sequence everything before it must already have been
    /// appended when the error is returned.
    fn convert(&self, input: &[u8], encoding: &str, output: &mut String)
    -> Result<(), ConvertError>;
}

impl<T: ?Sized> TextConverter for &T
where
    T: TextConverter,
{
    fn convert(
        &self,
        input: &[u8],
        encoding: &str,
        output: &mut String,
    ) -> Result<(), ConvertError> {
        (**self).convert(input, encoding, output)
    }
}

/// [`TextConverter`] backed by the `encoding` crate.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub struct EncodingConverter;

impl EncodingConverter {
    /// Find the codec for one of the encoding names produced by
    /// [`DefinedTerm::encoding_name`](super::DefinedTerm::encoding_name).
    pub fn lookup(encoding: &str) -> Option<EncodingRef> {
        let codec: EncodingRef = match encoding {
            "ASCII" => ASCII,
            "ISO-8859-1" => ISO_8859_1,
            "ISO-8859-2" => ISO_8859_2,
            "ISO-8859-3" => ISO_8859_3,
            "ISO-8859-4" => ISO_8859_4,
            "ISO-8859-5" => ISO_8859_5,
            "ISO-8859-6" => ISO_8859_6,
            "ISO-8859-7" => ISO_8859_7,
            "ISO-8859-8" => ISO_8859_8,
            // windows-1254 only differs from latin 5 in the C1 range
            "ISO-8859-9" => WINDOWS_1254,
            "SHIFT_JIS" => WINDOWS_31J,
            "TIS-620" => WINDOWS_874,
            // the decoder also understands the JIS X 0212 designation
            "ISO-2022-JP" | "ISO-2022-JP-1" => ISO_2022_JP,
            "EUC-KR" => WINDOWS_949,
            "EUC-CN" | "GBK" => GBK,
            "GB18030" => GB18030,
            "UTF-8" => UTF_8,
            _ => return None,
        };
        Some(codec)
    }
}

impl TextConverter for EncodingConverter {
    fn convert(
        &self,
        input: &[u8],
        encoding: &str,
        output: &mut String,
    ) -> Result<(), ConvertError> {
        let codec = Self::lookup(encoding)
            .ok_or_else(|| ConvertError::UnsupportedEncoding(encoding.to_string()))?;
        let mut decoder = codec.raw_decoder();

        let (processed, error) = decoder.raw_feed(input, &mut *output);
        if let Some(error) = error {
            return Err(ConvertError::Malformed {
                encoding: encoding.to_string(),
                offset: processed,
                cause: error.cause,
            });
        }
        if let Some(error) = decoder.raw_finish(&mut *output) {
            return Err(ConvertError::Malformed {
                encoding: encoding.to_string(),
                offset: input.len(),
                cause: error.cause,
            });
        }
        Ok(())
    }
}
