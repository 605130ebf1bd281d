//! Multimedia, note, source, and repository records.

use crate::structures::{
    Address, Citation, ContactList, CustomFact, ChangeDate, MultimediaLink, NoteStructure,
    UserReference,
};
use serde::{Deserialize, Serialize};

/// A multimedia record (`0 @X@ OBJE`).
///
/// Covers both dialects: 5.5.1 file references (`FILE` with `FORM`/`TITL`
/// subtags) and the 5.5 embedded form (`BLOB` lines plus an optional
/// continuation object).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Multimedia {
    /// This record's xref.
    pub xref: String,
    /// File references, in input order (5.5.1).
    pub file_references: Vec<FileReference>,
    /// Embedded object data lines (5.5 `BLOB`).
    pub blob_lines: Vec<String>,
    /// Continuation object (5.5 `OBJE` pointer at the record level).
    pub continued_xref: Option<String>,
    /// Record-level title (5.5 `TITL`).
    pub title: Option<String>,
    /// Source citations.
    pub citations: Vec<Citation>,
    /// Attached notes.
    pub notes: Vec<NoteStructure>,
    /// User reference numbers (`REFN`).
    pub user_references: Vec<UserReference>,
    /// Automated record id (`RIN`).
    pub record_id: Option<String>,
    /// Last change date (`CHAN`).
    pub change_date: Option<ChangeDate>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

impl Multimedia {
    /// A fresh multimedia record for an xref, registered during discovery.
    #[must_use]
    pub fn new(xref: impl Into<String>) -> Self {
        Multimedia {
            xref: xref.into(),
            ..Multimedia::default()
        }
    }
}

/// One `FILE` reference inside a multimedia record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileReference {
    /// The file path or URL.
    pub file: String,
    /// File format (`FORM`).
    pub format: Option<String>,
    /// Source media type (`FORM`/`TYPE` in 5.5.1, `MEDI` in older files).
    pub media_type: Option<String>,
    /// Title of this file (`TITL`).
    pub title: Option<String>,
}

/// A note record (`0 @X@ NOTE`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Note {
    /// This record's xref.
    pub xref: String,
    /// The note text with all `CONT`/`CONC` continuations folded in.
    pub text: String,
    /// Source citations.
    pub citations: Vec<Citation>,
    /// User reference numbers (`REFN`).
    pub user_references: Vec<UserReference>,
    /// Automated record id (`RIN`).
    pub record_id: Option<String>,
    /// Last change date (`CHAN`).
    pub change_date: Option<ChangeDate>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

impl Note {
    /// A fresh note record for an xref, registered during discovery.
    #[must_use]
    pub fn new(xref: impl Into<String>) -> Self {
        Note {
            xref: xref.into(),
            ..Note::default()
        }
    }
}

/// A source record (`0 @X@ SOUR`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Source {
    /// This record's xref.
    pub xref: String,
    /// What the source records (`DATA`).
    pub data: Option<SourceRecordData>,
    /// Originator/author, continuations folded (`AUTH`).
    pub originators: Option<String>,
    /// Title, continuations folded (`TITL`).
    pub title: Option<String>,
    /// Short label for filing (`ABBR`).
    pub filed_by: Option<String>,
    /// Publication facts, continuations folded (`PUBL`).
    pub publication: Option<String>,
    /// Verbatim source text, continuations folded (`TEXT`).
    pub text: Option<String>,
    /// Where the source is held (`REPO`).
    pub repository_citation: Option<RepositoryCitation>,
    /// Multimedia links.
    pub multimedia: Vec<MultimediaLink>,
    /// Attached notes.
    pub notes: Vec<NoteStructure>,
    /// User reference numbers (`REFN`).
    pub user_references: Vec<UserReference>,
    /// Automated record id (`RIN`).
    pub record_id: Option<String>,
    /// Last change date (`CHAN`).
    pub change_date: Option<ChangeDate>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

impl Source {
    /// A fresh source record for an xref, registered during discovery.
    #[must_use]
    pub fn new(xref: impl Into<String>) -> Self {
        Source {
            xref: xref.into(),
            ..Source::default()
        }
    }
}

/// The `DATA` substructure of a source record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceRecordData {
    /// Event coverage declarations (`EVEN`), in input order.
    pub events: Vec<EventsRecorded>,
    /// Responsible agency (`AGNC`).
    pub agency: Option<String>,
    /// Attached notes.
    pub notes: Vec<NoteStructure>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

/// One `EVEN` coverage declaration inside source data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventsRecorded {
    /// The recorded event types, comma-separated as written.
    pub event_types: String,
    /// Period covered (`DATE`), raw.
    pub date_period: Option<String>,
    /// Jurisdiction covered (`PLAC`).
    pub jurisdiction: Option<String>,
}

/// A citation from a source record to the repository holding it (`REPO`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepositoryCitation {
    /// Xref of the repository record; absent for the anonymous inline form.
    pub xref: Option<String>,
    /// Call numbers within the repository (`CALN`, each with optional
    /// `MEDI`).
    pub call_numbers: Vec<CallNumber>,
    /// Attached notes.
    pub notes: Vec<NoteStructure>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

/// One `CALN` entry of a repository citation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallNumber {
    /// The call number text.
    pub number: String,
    /// Source media type (`MEDI`).
    pub media_type: Option<String>,
}

/// A repository record (`0 @X@ REPO`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Repository {
    /// This record's xref.
    pub xref: String,
    /// Name of the repository (`NAME`).
    pub name: Option<String>,
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
    /// Attached notes.
    pub notes: Vec<NoteStructure>,
    /// User reference numbers (`REFN`).
    pub user_references: Vec<UserReference>,
    /// Automated record id (`RIN`).
    pub record_id: Option<String>,
    /// Last change date (`CHAN`).
    pub change_date: Option<ChangeDate>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

impl Repository {
    /// A fresh repository record for an xref, registered during discovery.
    #[must_use]
    pub fn new(xref: impl Into<String>) -> Self {
        Repository {
            xref: xref.into(),
            ..Repository::default()
        }
    }
}
