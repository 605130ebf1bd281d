//! ANSEL (ANSI Z39.47) to Unicode mapping tables.
//!
//! ANSEL is an 8-bit extension of ASCII historically used by library and
//! genealogy systems. Bytes below 0x80 are ASCII; bytes 0xA0-0xDF are
//! spacing characters; bytes 0xE0-0xFE are combining diacritics that ANSEL
//! stores *before* the base character they modify. Unicode places them
//! after; the reader does the re-ordering.
//!
//! The table covers the MARC 21 extended-Latin repertoire plus the
//! characters the GEDCOM standard added on top of stock ANSEL (the empty
//! and black box symbols, es-zet at 0xCF).
//!
//! Everything here is an immutable constant; unmapped bytes yield `None`
//! and the reader substitutes U+FFFD with a warning.

/// Look up an ANSEL high byte (>= 0x80).
///
/// Returns the Unicode character and whether it is a combining mark, or
/// `None` when the byte has no ANSEL assignment.
#[must_use]
pub fn lookup(byte: u8) -> Option<(char, bool)> {
    let (code, combining) = match byte {
        // Spacing characters, 0xA0-0xCF.
        0xA0 => (0x0020, false), // unassigned in practice; files use it as space
        0xA1 => (0x0141, false), // L with stroke
        0xA2 => (0x00D8, false), // O with stroke
        0xA3 => (0x0110, false), // D with stroke
        0xA4 => (0x00DE, false), // thorn
        0xA5 => (0x00C6, false), // AE
        0xA6 => (0x0152, false), // OE
        0xA7 => (0x02B9, false), // modifier prime (soft sign)
        0xA8 => (0x00B7, false), // middle dot
        0xA9 => (0x266D, false), // music flat
        0xAA => (0x00AE, false), // registered
        0xAB => (0x00B1, false), // plus-minus
        0xAC => (0x01A0, false), // O with horn
        0xAD => (0x01AF, false), // U with horn
        0xAE => (0x02BC, false), // modifier apostrophe (alif)
        0xB0 => (0x02BB, false), // modifier turned comma (ayn)
        0xB1 => (0x0142, false), // l with stroke
        0xB2 => (0x00F8, false), // o with stroke
        0xB3 => (0x0111, false), // d with stroke
        0xB4 => (0x00FE, false), // thorn, small
        0xB5 => (0x00E6, false), // ae
        0xB6 => (0x0153, false), // oe
        0xB7 => (0x02BA, false), // modifier double prime (hard sign)
        0xB8 => (0x0131, false), // dotless i
        0xB9 => (0x00A3, false), // pound sign
        0xBA => (0x00F0, false), // eth
        0xBC => (0x01A1, false), // o with horn
        0xBD => (0x01B0, false), // u with horn
        0xBE => (0x25A1, false), // empty box (GEDCOM addition)
        0xBF => (0x25A0, false), // black box (GEDCOM addition)
        0xC0 => (0x00B0, false), // degree sign
        0xC1 => (0x2113, false), // script small l
        0xC2 => (0x2117, false), // sound recording copyright
        0xC3 => (0x00A9, false), // copyright
        0xC4 => (0x266F, false), // music sharp
        0xC5 => (0x00BF, false), // inverted question mark
        0xC6 => (0x00A1, false), // inverted exclamation mark
        0xC7 => (0x00DF, false), // sharp s (MARC 21 addition)
        0xC8 => (0x20AC, false), // euro sign (MARC 21 addition)
        0xCF => (0x00DF, false), // sharp s (GEDCOM addition)
        // Combining diacritics, 0xE0-0xFE.
        0xE0 => (0x0309, true), // hook above
        0xE1 => (0x0300, true), // grave
        0xE2 => (0x0301, true), // acute
        0xE3 => (0x0302, true), // circumflex
        0xE4 => (0x0303, true), // tilde
        0xE5 => (0x0304, true), // macron
        0xE6 => (0x0306, true), // breve
        0xE7 => (0x0307, true), // dot above
        0xE8 => (0x0308, true), // diaeresis
        0xE9 => (0x030C, true), // caron
        0xEA => (0x030A, true), // ring above
        0xEB => (0xFE20, true), // ligature left half
        0xEC => (0xFE21, true), // ligature right half
        0xED => (0x0315, true), // comma above right
        0xEE => (0x030B, true), // double acute
        0xEF => (0x0310, true), // candrabindu
        0xF0 => (0x0327, true), // cedilla
        0xF1 => (0x0328, true), // ogonek
        0xF2 => (0x0323, true), // dot below
        0xF3 => (0x0324, true), // double dot below
        0xF4 => (0x0325, true), // ring below
        0xF5 => (0x0333, true), // double low line
        0xF6 => (0x0332, true), // low line
        0xF7 => (0x0326, true), // comma below
        0xF8 => (0x031C, true), // left half ring below
        0xF9 => (0x032E, true), // breve below
        0xFA => (0xFE22, true), // double tilde left half
        0xFB => (0xFE23, true), // double tilde right half
        0xFE => (0x0313, true), // comma above
        _ => return None,
    };
    char::from_u32(code).map(|c| (c, combining))
}

/// Whether an ANSEL byte is a combining diacritic.
#[must_use]
pub fn is_combining(byte: u8) -> bool {
    matches!(lookup(byte), Some((_, true)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing_characters() {
        assert_eq!(lookup(0xA5), Some(('\u{00C6}', false))); // AE
        assert_eq!(lookup(0xB2), Some(('\u{00F8}', false))); // o-slash
        assert_eq!(lookup(0xC3), Some(('\u{00A9}', false))); // copyright
        assert_eq!(lookup(0xC8), Some(('\u{20AC}', false))); // euro
    }

    #[test]
    fn test_combining_range_is_flagged() {
        for byte in 0xE0..=0xFE_u8 {
            if let Some((_, combining)) = lookup(byte) {
                assert!(combining, "byte {byte:#X} should be combining");
            }
        }
        assert!(is_combining(0xE2));
        assert!(!is_combining(0xA5));
    }

    #[test]
    fn test_acute_and_grave() {
        assert_eq!(lookup(0xE2), Some(('\u{0301}', true)));
        assert_eq!(lookup(0xE1), Some(('\u{0300}', true)));
    }

    #[test]
    fn test_unmapped_bytes() {
        assert_eq!(lookup(0x80), None);
        assert_eq!(lookup(0xBB), None);
        assert_eq!(lookup(0xFF), None);
        assert!(!is_combining(0xFF));
    }

    #[test]
    fn test_gedcom_additions() {
        assert_eq!(lookup(0xBE), Some(('\u{25A1}', false)));
        assert_eq!(lookup(0xBF), Some(('\u{25A0}', false)));
        assert_eq!(lookup(0xCF), Some(('\u{00DF}', false)));
    }
}
