use std::fmt;

/// A defined term of the Specific Character Set (0008,0005) attribute.
///
/// The set is closed: every variant maps to exactly one target encoding
/// name, and [`DefinedTerm::from_term`] rejects anything not listed here.
/// Terms with and without code extensions are distinct values, so
/// `ISO_IR 100` and `ISO 2022 IR 100` never compare equal.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum DefinedTerm {
    /// **ISO_IR 6**: the default repertoire (ASCII).
    IsoIr6,
    /// **ISO 2022 IR 6**: ASCII, designated through an escape sequence.
    Iso2022Ir6,
    /// **ISO_IR 100**: Latin alphabet no. 1.
    IsoIr100,
    Iso2022Ir100,
    /// **ISO_IR 101**: Latin alphabet no. 2.
    IsoIr101,
    Iso2022Ir101,
    /// **ISO_IR 109**: Latin alphabet no. 3.
    IsoIr109,
    Iso2022Ir109,
    /// **ISO_IR 110**: Latin alphabet no. 4.
    IsoIr110,
    Iso2022Ir110,
    /// **ISO_IR 144**: Cyrillic.
    IsoIr144,
    Iso2022Ir144,
    /// **ISO_IR 127**: Arabic.
    IsoIr127,
    Iso2022Ir127,
    /// **ISO_IR 126**: Greek.
    IsoIr126,
    Iso2022Ir126,
    /// **ISO_IR 138**: Hebrew.
    IsoIr138,
    Iso2022Ir138,
    /// **ISO_IR 148**: Latin alphabet no. 5 (Turkish).
    IsoIr148,
    Iso2022Ir148,
    /// **ISO_IR 13**: JIS X 0201 (Katakana and Romaji).
    IsoIr13,
    Iso2022Ir13,
    /// **ISO_IR 166**: Thai.
    IsoIr166,
    Iso2022Ir166,
    /// **ISO 2022 IR 87**: JIS X 0208 Kanji.
    Iso2022Ir87,
    /// **ISO 2022 IR 159**: JIS X 0212 supplementary Kanji.
    Iso2022Ir159,
    /// **ISO 2022 IR 149**: KS X 1001 Hangul and Hanja.
    Iso2022Ir149,
    /// **ISO 2022 IR 58**: GB 2312 simplified Chinese.
    Iso2022Ir58,
    /// **ISO_IR 192**: Unicode in UTF-8.
    IsoIr192,
    /// **GB18030**
    Gb18030,
    /// **GBK**
    Gbk,
}

impl DefinedTerm {
    /// The term assumed when the attribute is absent or its first value is empty.
    pub const DEFAULT: DefinedTerm = DefinedTerm::IsoIr6;

    /// Look up a defined term by its exact code string.
    ///
    /// ```
    /// # use dicom_volume_import::charset::DefinedTerm;
    /// assert_eq!(DefinedTerm::from_term("ISO_IR 100"), Some(DefinedTerm::IsoIr100));
    /// assert_eq!(DefinedTerm::from_term("ISO_IR_100"), None);
    /// ```
    pub fn from_term(term: &str) -> Option<Self> {
        use DefinedTerm::*;
        // strict comparison, no normalization beyond what the caller did
        let term = match term {
            "ISO_IR 6" => IsoIr6,
            "ISO 2022 IR 6" => Iso2022Ir6,
            "ISO_IR 100" => IsoIr100,
            "ISO 2022 IR 100" => Iso2022Ir100,
            "ISO_IR 101" => IsoIr101,
            "ISO 2022 IR 101" => Iso2022Ir101,
            "ISO_IR 109" => IsoIr109,
            "ISO 2022 IR 109" => Iso2022Ir109,
            "ISO_IR 110" => IsoIr110,
            "ISO 2022 IR 110" => Iso2022Ir110,
            "ISO_IR 144" => IsoIr144,
            "ISO 2022 IR 144" => Iso2022Ir144,
            "ISO_IR 127" => IsoIr127,
            "ISO 2022 IR 127" => Iso2022Ir127,
            "ISO_IR 126" => IsoIr126,
            "ISO 2022 IR 126" => Iso2022Ir126,
            "ISO_IR 138" => IsoIr138,
            "ISO 2022 IR 138" => Iso2022Ir138,
            "ISO_IR 148" => IsoIr148,
            "ISO 2022 IR 148" => Iso2022Ir148,
            "ISO_IR 13" => IsoIr13,
            "ISO 2022 IR 13" => Iso2022Ir13,
            "ISO_IR 166" => IsoIr166,
            "ISO 2022 IR 166" => Iso2022Ir166,
            "ISO 2022 IR 87" => Iso2022Ir87,
            "ISO 2022 IR 159" => Iso2022Ir159,
            "ISO 2022 IR 149" => Iso2022Ir149,
            "ISO 2022 IR 58" => Iso2022Ir58,
            "ISO_IR 192" => IsoIr192,
            "GB18030" => Gb18030,
            "GBK" => Gbk,
            _ => return None,
        };
        Some(term)
    }

    /// The code string of this term, as it appears in (0008,0005).
    pub fn term(self) -> &'static str {
        use DefinedTerm::*;
        match self {
            IsoIr6 => "ISO_IR 6",
            Iso2022Ir6 => "ISO 2022 IR 6",
            IsoIr100 => "ISO_IR 100",
            Iso2022Ir100 => "ISO 2022 IR 100",
            IsoIr101 => "ISO_IR 101",
            Iso2022Ir101 => "ISO 2022 IR 101",
            IsoIr109 => "ISO_IR 109",
            Iso2022Ir109 => "ISO 2022 IR 109",
            IsoIr110 => "ISO_IR 110",
            Iso2022Ir110 => "ISO 2022 IR 110",
            IsoIr144 => "ISO_IR 144",
            Iso2022Ir144 => "ISO 2022 IR 144",
            IsoIr127 => "ISO_IR 127",
            Iso2022Ir127 => "ISO 2022 IR 127",
            IsoIr126 => "ISO_IR 126",
            Iso2022Ir126 => "ISO 2022 IR 126",
            IsoIr138 => "ISO_IR 138",
            Iso2022Ir138 => "ISO 2022 IR 138",
            IsoIr148 => "ISO_IR 148",
            Iso2022Ir148 => "ISO 2022 IR 148",
            IsoIr13 => "ISO_IR 13",
            Iso2022Ir13 => "ISO 2022 IR 13",
            IsoIr166 => "ISO_IR 166",
            Iso2022Ir166 => "ISO 2022 IR 166",
            Iso2022Ir87 => "ISO 2022 IR 87",
            Iso2022Ir159 => "ISO 2022 IR 159",
            Iso2022Ir149 => "ISO 2022 IR 149",
            Iso2022Ir58 => "ISO 2022 IR 58",
            IsoIr192 => "ISO_IR 192",
            Gb18030 => "GB18030",
            Gbk => "GBK",
        }
    }

    /// Name of the encoding a converter must be opened with to read text in
    /// this repertoire.
    pub fn encoding_name(self) -> &'static str {
        use DefinedTerm::*;
        match self {
            IsoIr6 | Iso2022Ir6 => "ASCII",
            IsoIr100 | Iso2022Ir100 => "ISO-8859-1",
            IsoIr101 | Iso2022Ir101 => "ISO-8859-2",
            IsoIr109 | Iso2022Ir109 => "ISO-8859-3",
            IsoIr110 | Iso2022Ir110 => "ISO-8859-4",
            IsoIr144 | Iso2022Ir144 => "ISO-8859-5",
            IsoIr127 | Iso2022Ir127 => "ISO-8859-6",
            IsoIr126 | Iso2022Ir126 => "ISO-8859-7",
            IsoIr138 | Iso2022Ir138 => "ISO-8859-8",
            IsoIr148 | Iso2022Ir148 => "ISO-8859-9",
            // Shift_JIS extends JIS X 0201, which is all that IR 13 carries
            IsoIr13 | Iso2022Ir13 => "SHIFT_JIS",
            IsoIr166 | Iso2022Ir166 => "TIS-620",
            Iso2022Ir87 => "ISO-2022-JP",
            Iso2022Ir159 => "ISO-2022-JP-1",
            Iso2022Ir149 => "EUC-KR",
            Iso2022Ir58 => "EUC-CN",
            IsoIr192 => "UTF-8",
            Gb18030 => "GB18030",
            Gbk => "GBK",
        }
    }

    /// Whether this term stands for plain ASCII.
    pub fn is_ascii(self) -> bool {
        matches!(self, DefinedTerm::IsoIr6 | DefinedTerm::Iso2022Ir6)
    }

    /// Whether the converter needs to see the designating escape sequence
    /// in order to interpret the bytes that follow it.
    pub(crate) fn needs_designation(self) -> bool {
        matches!(self, DefinedTerm::Iso2022Ir87 | DefinedTerm::Iso2022Ir159)
    }
}

impl fmt::Display for DefinedTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.term())
    }
}
