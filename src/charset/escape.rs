//! ISO 2022 escape sequences recognized in DICOM text values.
//!
//! Every function here takes the bytes immediately following the ESC
//! control byte.

use super::DefinedTerm;

/// The ESC control byte that introduces a code extension.
pub const ESC: u8 = 0x1b;

/// Find the next ESC byte at or after `from`, or `text.len()` if there is none.
pub(crate) fn find_esc(text: &[u8], from: usize) -> usize {
    text.get(from..)
        .and_then(|rest| rest.iter().position(|&b| b == ESC))
        .map_or(text.len(), |offset| from + offset)
}

/// Resolve the defined term selected by an escape sequence.
///
/// The sequences listed in DICOM PS3.3 C.12.1.1.2 are recognized, along with
/// `ESC - I` and `ESC - J` for JIS X 0201 as some writers emit them.
/// Anything else, including a sequence cut short by the end of the value,
/// yields `None`.
pub fn select(seq: &[u8]) -> Option<DefinedTerm> {
    use DefinedTerm::*;
    let term = match seq {
        [b'(', b'B', ..] => Iso2022Ir6,
        [b'-', b'A', ..] => Iso2022Ir100,
        [b'-', b'B', ..] => Iso2022Ir101,
        [b'-', b'C', ..] => Iso2022Ir109,
        [b'-', b'D', ..] => Iso2022Ir110,
        [b'-', b'L', ..] => Iso2022Ir144,
        [b'-', b'G', ..] => Iso2022Ir127,
        [b'-', b'F', ..] => Iso2022Ir126,
        [b'-', b'H', ..] => Iso2022Ir138,
        [b'-', b'M', ..] => Iso2022Ir148,
        [b'-', b'T', ..] => Iso2022Ir166,
        // G1 katakana and G0 romaji halves of JIS X 0201
        [b')', b'I', ..] | [b'(', b'J', ..] => Iso2022Ir13,
        [b'-', b'I', ..] | [b'-', b'J', ..] => Iso2022Ir13,
        [b'$', b'B', ..] => Iso2022Ir87,
        [b'$', b'(', b'D', ..] => Iso2022Ir159,
        [b'$', b')', b'C', ..] => Iso2022Ir149,
        [b'$', b')', b'A', ..] => Iso2022Ir58,
        _ => return None,
    };
    Some(term)
}

/// Length of an escape sequence, not counting the ESC byte itself.
///
/// Multi-byte designations carry an extra intermediate byte in the
/// `(`..=`/` range; every other sequence is two bytes long.
pub fn sequence_len(seq: &[u8]) -> usize {
    match seq {
        [b'$', b'('..=b'/', ..] => 3,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"(B", Some(DefinedTerm::Iso2022Ir6), 2)]
    #[case(b"-A", Some(DefinedTerm::Iso2022Ir100), 2)]
    #[case(b"-L", Some(DefinedTerm::Iso2022Ir144), 2)]
    #[case(b")I", Some(DefinedTerm::Iso2022Ir13), 2)]
    #[case(b"(J", Some(DefinedTerm::Iso2022Ir13), 2)]
    #[case(b"-I", Some(DefinedTerm::Iso2022Ir13), 2)]
    #[case(b"-J", Some(DefinedTerm::Iso2022Ir13), 2)]
    #[case(b"$B", Some(DefinedTerm::Iso2022Ir87), 2)]
    #[case(b"$(D", Some(DefinedTerm::Iso2022Ir159), 3)]
    #[case(b"$)C", Some(DefinedTerm::Iso2022Ir149), 3)]
    #[case(b"$)A", Some(DefinedTerm::Iso2022Ir58), 3)]
    #[case(b"$)Z", None, 3)]
    #[case(b"-Z", None, 2)]
    #[case(b"-", None, 2)]
    fn escape_table(
        #[case] seq: &[u8],
        #[case] term: Option<DefinedTerm>,
        #[case] len: usize,
    ) {
        assert_eq!(select(seq), term);
        assert_eq!(sequence_len(seq), len);
    }

    #[test]
    fn finds_escape_bytes() {
        let text = b"ab\x1b$Bcd\x1b(B";
        assert_eq!(find_esc(text, 0), 2);
        assert_eq!(find_esc(text, 3), 7);
        assert_eq!(find_esc(text, 8), text.len());
        assert_eq!(find_esc(text, 42), text.len());
    }
}
