//! Substructures shared across record types.
//!
//! The GEDCOM grammar repeats the same clusters everywhere: notes, source
//! citations, multimedia links, addresses, change dates, user reference
//! numbers. They are modeled once here and embedded by value in each record
//! type that carries them.
//!
//! Structures that the format allows either as a pointer to a level-0
//! record or as inline content ([`NoteStructure`], [`Citation`],
//! [`MultimediaLink`]) are enums over the two shapes; the interpreter picks
//! the variant by testing the value against the xref pattern.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Contact lists appear in several record types; most entries hold one or
/// two values, so they stay inline.
pub type ContactList = SmallVec<[String; 2]>;

/// A preserved subtree for tags the interpreter does not recognize.
///
/// Unknown standard tags and `_`-prefixed extension tags both land here, on
/// the nearest typed ancestor, so no input is lost.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomFact {
    /// The unrecognized tag.
    pub tag: String,
    /// Xref on the line, if any.
    pub xref: Option<String>,
    /// Value on the line, if any.
    pub value: Option<String>,
    /// The full subtree beneath the line, preserved verbatim.
    pub children: Vec<CustomFact>,
}

/// A postal address (`ADDR` and its subtags).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    /// The free-form address value, with continuation lines joined by `\n`.
    pub value: Option<String>,
    /// Address line 1 (`ADR1`).
    pub line1: Option<String>,
    /// Address line 2 (`ADR2`).
    pub line2: Option<String>,
    /// Address line 3 (`ADR3`).
    pub line3: Option<String>,
    /// City (`CITY`).
    pub city: Option<String>,
    /// State or province (`STAE`).
    pub state: Option<String>,
    /// Postal code (`POST`).
    pub postal_code: Option<String>,
    /// Country (`CTRY`).
    pub country: Option<String>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

/// A change date (`CHAN`). The date stays a raw string; interpreting date
/// values is the date parser's concern, not this library's.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChangeDate {
    /// Date value, raw (`DATE`).
    pub date: Option<String>,
    /// Time value (`TIME`).
    pub time: Option<String>,
    /// Attached notes.
    pub notes: Vec<NoteStructure>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

/// A user-defined reference number (`REFN`, with optional `TYPE`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserReference {
    /// The user-defined reference text.
    pub reference: String,
    /// Reference type (`TYPE`).
    pub ref_type: Option<String>,
}

/// A note: either a pointer to a level-0 `NOTE` record or inline text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteStructure {
    /// `n NOTE @N1@`
    Record {
        /// Xref of the note record.
        xref: String,
    },
    /// `n NOTE some text`, possibly continued over `CONT`/`CONC` lines.
    Inline {
        /// The note text with continuations folded in.
        text: String,
        /// Citations attached to the inline note.
        citations: Vec<Citation>,
        /// Unrecognized subtags, preserved.
        custom_facts: Vec<CustomFact>,
    },
}

/// A source citation: either against a `SOUR` record or free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Citation {
    /// `n SOUR @S1@` with the record-citation substructure.
    Record(SourceCitation),
    /// `n SOUR free text` (pre-5.5 style), possibly continued.
    Text(TextCitation),
}

/// Citation of a `SOUR` record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceCitation {
    /// Xref of the source record.
    pub xref: String,
    /// Where within the source (`PAGE`).
    pub page: Option<String>,
    /// Event type cited from (`EVEN`).
    pub event: Option<String>,
    /// Role in the cited event (`EVEN`/`ROLE`).
    pub role: Option<String>,
    /// Entry date and text extracts (`DATA`).
    pub data: Option<CitationData>,
    /// Certainty assessment (`QUAY`).
    pub certainty: Option<String>,
    /// Multimedia links.
    pub multimedia: Vec<MultimediaLink>,
    /// Attached notes.
    pub notes: Vec<NoteStructure>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

/// The `DATA` substructure of a record citation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CitationData {
    /// Entry recording date, raw.
    pub date: Option<String>,
    /// Text extracts; each `TEXT` is one entry with continuations folded.
    pub text: Vec<String>,
}

/// Free-text citation with no source record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextCitation {
    /// The describing text, continuations folded.
    pub description: String,
    /// `TEXT` extracts.
    pub text: Vec<String>,
    /// Attached notes.
    pub notes: Vec<NoteStructure>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

/// A place (`PLAC`) as recorded on an event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Place {
    /// The place name, a comma-separated jurisdiction list in most files.
    pub name: String,
    /// Jurisdiction hierarchy declaration (`FORM`).
    pub form: Option<String>,
    /// Source citations.
    pub citations: Vec<Citation>,
    /// Attached notes.
    pub notes: Vec<NoteStructure>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

/// A multimedia link: a pointer to an `OBJE` record or an inline object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MultimediaLink {
    /// `n OBJE @M1@`
    Record {
        /// Xref of the multimedia record.
        xref: String,
    },
    /// Inline object with its own file/format/title lines.
    Inline(InlineMultimedia),
}

/// The inline (linked-file) form of a multimedia link.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InlineMultimedia {
    /// File reference (`FILE`).
    pub file: Option<String>,
    /// File format (`FORM`).
    pub format: Option<String>,
    /// Title (`TITL`).
    pub title: Option<String>,
    /// Attached notes.
    pub notes: Vec<NoteStructure>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

/// Shared detail carried by every event and attribute: classification,
/// when, where, who recorded it, and the usual annotations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventDetail {
    /// Event classification (`TYPE`).
    pub event_type: Option<String>,
    /// Date value, raw (`DATE`).
    pub date: Option<String>,
    /// Where it happened (`PLAC`).
    pub place: Option<Place>,
    /// Postal address (`ADDR`).
    pub address: Option<Address>,
    /// Phone numbers (`PHON`).
    pub phone_numbers: ContactList,
    /// Email addresses (`EMAIL`).
    pub emails: ContactList,
    /// Fax numbers (`FAX`).
    pub fax_numbers: ContactList,
    /// Web addresses (`WWW`).
    pub www_urls: ContactList,
    /// Responsible agency (`AGNC`).
    pub agency: Option<String>,
    /// Religious affiliation (`RELI`).
    pub religion: Option<String>,
    /// Cause of the event (`CAUS`).
    pub cause: Option<String>,
    /// Age of the principal at the event (`AGE`).
    pub age: Option<String>,
    /// Restriction notice (`RESN`).
    pub restriction: Option<String>,
    /// Source citations.
    pub citations: Vec<Citation>,
    /// Multimedia links.
    pub multimedia: Vec<MultimediaLink>,
    /// Attached notes.
    pub notes: Vec<NoteStructure>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_structure_variants() {
        let record = NoteStructure::Record {
            xref: "@N1@".to_string(),
        };
        let inline = NoteStructure::Inline {
            text: "line one\nline two".to_string(),
            citations: Vec::new(),
            custom_facts: Vec::new(),
        };
        assert_ne!(record, inline);
    }

    #[test]
    fn test_event_detail_defaults_empty() {
        let detail = EventDetail::default();
        assert!(detail.date.is_none());
        assert!(detail.citations.is_empty());
        assert!(detail.phone_numbers.is_empty());
    }

    #[test]
    fn test_custom_fact_tree() {
        let fact = CustomFact {
            tag: "_MILT".to_string(),
            xref: None,
            value: Some("WWII".to_string()),
            children: vec![CustomFact {
                tag: "DATE".to_string(),
                xref: None,
                value: Some("1942".to_string()),
                children: Vec::new(),
            }],
        };
        assert_eq!(fact.children[0].value.as_deref(), Some("1942"));
    }
}
