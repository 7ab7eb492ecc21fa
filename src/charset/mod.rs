//! Decoding of DICOM text values into UTF-8.
//!
//! The value of the Specific Character Set (0008,0005) attribute is resolved
//! into a [`CharsetList`]. The first entry is active at the start of every
//! text value; the remaining entries can only be reached through ISO 2022
//! escape sequences embedded in the value itself.
//!
//! The declared list acts as a whitelist. An escape sequence selecting a
//! character set that was not declared stops decoding, and whatever was
//! decoded up to that point is returned.
//!
//! ```
//! # use dicom_volume_import::charset::CharsetList;
//! let charsets = CharsetList::configure("\\ISO 2022 IR 87");
//! let text = charsets.decode(b"Yamada^Tarou=\x1b$B;3ED\x1b(B^\x1b$BB@O:\x1b(B");
//! assert_eq!(text, "Yamada^Tarou=山田^太郎");
//! ```

mod converter;
mod defined_term;
pub mod escape;

pub use converter::{ConvertError, EncodingConverter, TextConverter};
pub use defined_term::DefinedTerm;

use tracing::{debug, warn};

/// Separator of the values in a multi-valued attribute.
const VALUE_SEPARATOR: char = '\\';

/// The character sets declared for one text attribute, in declaration order.
///
/// Never empty, and free of duplicates.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CharsetList {
    terms: Vec<DefinedTerm>,
}

impl Default for CharsetList {
    fn default() -> Self {
        Self {
            terms: vec![DefinedTerm::DEFAULT],
        }
    }
}

impl CharsetList {
    /// Resolve the raw value of a Specific Character Set attribute.
    ///
    /// An empty value, or an empty first value, selects the default
    /// repertoire. Unknown terms and duplicates are dropped with a warning.
    pub fn configure(value: &str) -> Self {
        let mut terms = Vec::new();

        if !value.is_empty() {
            for (index, field) in value.split(VALUE_SEPARATOR).enumerate() {
                let field = field.trim_matches(' ');

                // an empty first value is the explicit marker for the default
                if index == 0 && field.is_empty() {
                    terms.push(DefinedTerm::DEFAULT);
                    continue;
                }

                let Some(term) = DefinedTerm::from_term(field) else {
                    if !field.is_empty() {
                        warn!("Unrecognized character set '{}'; ignoring", field);
                    }
                    continue;
                };

                if terms.contains(&term) {
                    warn!("Found duplicate character set '{}'; ignoring", field);
                    continue;
                }

                if term.is_ascii() {
                    // ASCII is implied, it only matters as the initial set
                    if index == 0 {
                        terms.push(DefinedTerm::DEFAULT);
                    }
                    continue;
                }

                terms.push(term);
            }
        }

        if terms.is_empty() {
            terms.push(DefinedTerm::DEFAULT);
        }

        Self { terms }
    }

    /// The declared terms, the initial one first.
    pub fn terms(&self) -> &[DefinedTerm] {
        &self.terms
    }

    /// The term active at the start of a text value.
    pub fn initial(&self) -> DefinedTerm {
        self.terms[0]
    }

    /// Whether an escape sequence may switch to `term`.
    ///
    /// Returning to ASCII is always allowed.
    pub fn allows(&self, term: DefinedTerm) -> bool {
        term.is_ascii() || self.terms.contains(&term)
    }

    /// Decode a text value with the [`EncodingConverter`].
    pub fn decode(&self, text: &[u8]) -> String {
        self.decode_with(text, &EncodingConverter)
    }

    /// Decode a text value, converting each fragment with `converter`.
    ///
    /// This never fails: an unusable initial encoding gives an empty string,
    /// and an undeclared escape sequence or a conversion error truncates the
    /// output at that point.
    pub fn decode_with<C>(&self, text: &[u8], converter: &C) -> String
    where
        C: TextConverter + ?Sized,
    {
        let mut output = String::with_capacity(text.len());
        let mut active = self.initial();

        if self.terms.len() == 1 {
            if let Err(e) = converter.convert(text, active.encoding_name(), &mut output) {
                debug!("Text decoding stopped: {}", e);
            }
            return finish(output);
        }

        let mut fragment_start = 0;
        let mut scan_from = 0;
        while fragment_start < text.len() {
            let esc = escape::find_esc(text, scan_from);
            if let Err(e) =
                converter.convert(&text[fragment_start..esc], active.encoding_name(), &mut output)
            {
                debug!("Text decoding stopped: {}", e);
                break;
            }
            if esc == text.len() {
                break;
            }

            let seq = &text[esc + 1..];
            let next = match escape::select(seq) {
                Some(term) if self.allows(term) => term,
                Some(term) => {
                    debug!("Escape to undeclared character set {}; stopping", term);
                    break;
                }
                None => {
                    debug!("Unrecognized escape sequence at byte {}; stopping", esc);
                    break;
                }
            };

            active = next;
            scan_from = (esc + 1 + escape::sequence_len(seq)).min(text.len());
            fragment_start = if active.needs_designation() {
                esc
            } else {
                scan_from
            };
        }

        finish(output)
    }
}

fn finish(mut output: String) -> String {
    let len = output.trim_end_matches('\0').len();
    output.truncate(len);
    output
}
