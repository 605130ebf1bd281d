//! The root object model: the [`Gedcom`] aggregate, header types, and the
//! submitter/submission records.
//!
//! All per-kind record maps preserve input order using `IndexMap`, so a file
//! round-trips through the model in the order its author wrote it. Records
//! are owned by their kind's map; every in-graph link to another record is a
//! stored xref string resolved through these maps, which is what keeps the
//! family/individual cycles ownership-free.

use crate::family::Family;
use crate::individual::Individual;
use crate::records::{Multimedia, Note, Repository, Source};
use crate::structures::{Address, ContactList, CustomFact, ChangeDate, NoteStructure};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A fully parsed GEDCOM file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Gedcom {
    /// The file header (exactly one per file).
    pub header: Header,
    /// The submission record, at most one.
    pub submission: Option<Submission>,
    /// Individuals by xref, in input order.
    pub individuals: IndexMap<String, Individual>,
    /// Families by xref, in input order.
    pub families: IndexMap<String, Family>,
    /// Multimedia records by xref, in input order.
    pub multimedia: IndexMap<String, Multimedia>,
    /// Note records by xref, in input order.
    pub notes: IndexMap<String, Note>,
    /// Source records by xref, in input order.
    pub sources: IndexMap<String, Source>,
    /// Repository records by xref, in input order.
    pub repositories: IndexMap<String, Repository>,
    /// Submitters by xref, in input order.
    pub submitters: IndexMap<String, Submitter>,
    /// Level-0 records with unrecognized tags, preserved as subtrees.
    pub custom_records: Vec<CustomFact>,
    /// The trailer sentinel; present on every successfully parsed file.
    pub trailer: Trailer,
}

impl Gedcom {
    /// Look up an individual by xref (`@I1@` form).
    #[must_use]
    pub fn individual(&self, xref: &str) -> Option<&Individual> {
        self.individuals.get(xref)
    }

    /// Look up a family by xref.
    #[must_use]
    pub fn family(&self, xref: &str) -> Option<&Family> {
        self.families.get(xref)
    }

    /// Look up a source by xref.
    #[must_use]
    pub fn source(&self, xref: &str) -> Option<&Source> {
        self.sources.get(xref)
    }

    /// Look up a note record by xref.
    #[must_use]
    pub fn note(&self, xref: &str) -> Option<&Note> {
        self.notes.get(xref)
    }

    /// Look up a repository by xref.
    #[must_use]
    pub fn repository(&self, xref: &str) -> Option<&Repository> {
        self.repositories.get(xref)
    }

    /// The submitter named by the header, when present and resolvable.
    #[must_use]
    pub fn submitter(&self) -> Option<&Submitter> {
        match self.header.submitter_xref.as_deref() {
            Some(xref) => self.submitters.get(xref),
            // A single-submitter file with no header pointer still has an
            // unambiguous submitter.
            None if self.submitters.len() == 1 => self.submitters.values().next(),
            None => None,
        }
    }
}

/// The trailer record (`0 TRLR`). Carries no data; it closes the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Trailer;

/// The file header (`0 HEAD`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Header {
    /// The producing system (`SOUR`).
    pub source_system: Option<SourceSystem>,
    /// Receiving system name (`DEST`).
    pub destination: Option<String>,
    /// Transmission date, raw (`DATE`).
    pub date: Option<String>,
    /// Transmission time, raw (`DATE`/`TIME`).
    pub time: Option<String>,
    /// Xref of the submitter record (`SUBM`).
    pub submitter_xref: Option<String>,
    /// Xref of the submission record (`SUBN`).
    pub submission_xref: Option<String>,
    /// File name as recorded in the file (`FILE`).
    pub file_name: Option<String>,
    /// Copyright statement, continuations folded (`COPR`).
    pub copyright: Option<String>,
    /// GEDCOM version declaration (`GEDC`).
    pub gedcom_version: Option<GedcomVersion>,
    /// Character set declaration (`CHAR`).
    pub character_set: Option<CharacterSet>,
    /// Language of the text (`LANG`).
    pub language: Option<String>,
    /// Place hierarchy declaration (`PLAC`/`FORM`).
    pub place_hierarchy: Option<String>,
    /// Attached notes.
    pub notes: Vec<NoteStructure>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

/// The producing system described in the header (`HEAD`/`SOUR`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceSystem {
    /// Registered system id (the `SOUR` value).
    pub system_id: String,
    /// Product version (`VERS`).
    pub version_num: Option<String>,
    /// Product name (`NAME`).
    pub product_name: Option<String>,
    /// The producing business (`CORP`).
    pub corporation: Option<Corporation>,
    /// Description of the data source (`DATA`).
    pub source_data: Option<HeaderSourceData>,
}

/// The business behind the producing system (`CORP`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Corporation {
    /// Business name (the `CORP` value).
    pub business_name: String,
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
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

/// Description of the data source in the header (`HEAD`/`SOUR`/`DATA`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeaderSourceData {
    /// Name of the source data (the `DATA` value).
    pub name: String,
    /// Publication date, raw (`DATE`).
    pub publish_date: Option<String>,
    /// Copyright of the source data (`COPR`).
    pub copyright: Option<String>,
}

/// GEDCOM version declaration (`HEAD`/`GEDC`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GedcomVersion {
    /// Version number, e.g. `5.5.1` (`VERS`).
    pub version_number: Option<String>,
    /// Transmission form, `LINEAGE-LINKED` in practice (`FORM`).
    pub gedcom_form: Option<String>,
}

/// Character set declaration (`HEAD`/`CHAR`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterSet {
    /// Declared set name, e.g. `ANSEL`.
    pub value: String,
    /// Declared set version (`VERS`).
    pub version: Option<String>,
}

/// A submitter record (`0 @X@ SUBM`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Submitter {
    /// This record's xref.
    pub xref: String,
    /// Submitter name (`NAME`). Mandatory in the standard; tolerated absent.
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
    /// Multimedia links.
    pub multimedia: Vec<crate::structures::MultimediaLink>,
    /// Language preferences, up to three in the standard (`LANG`).
    pub language_prefs: Vec<String>,
    /// Registered file number (`RFN`).
    pub registration_file_number: Option<String>,
    /// Automated record id (`RIN`).
    pub record_id: Option<String>,
    /// Attached notes.
    pub notes: Vec<NoteStructure>,
    /// Last change date (`CHAN`).
    pub change_date: Option<ChangeDate>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

impl Submitter {
    /// A fresh submitter for an xref, registered during discovery.
    #[must_use]
    pub fn new(xref: impl Into<String>) -> Self {
        Submitter {
            xref: xref.into(),
            ..Submitter::default()
        }
    }
}

/// A submission record (`0 @X@ SUBN`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Submission {
    /// This record's xref.
    pub xref: String,
    /// Xref of the submitter (`SUBM`).
    pub submitter_xref: Option<String>,
    /// Name of the family file (`FAMF`).
    pub family_file: Option<String>,
    /// Temple code (`TEMP`).
    pub temple_code: Option<String>,
    /// Generations of ancestors in the file (`ANCE`).
    pub ancestors_generations: Option<i32>,
    /// Generations of descendants in the file (`DESC`).
    pub descendants_generations: Option<i32>,
    /// Ordinance process flag (`ORDI`).
    pub ordinance_flag: Option<String>,
    /// Automated record id (`RIN`).
    pub record_id: Option<String>,
    /// Attached notes.
    pub notes: Vec<NoteStructure>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

impl Submission {
    /// A fresh submission for an xref, registered during discovery.
    #[must_use]
    pub fn new(xref: impl Into<String>) -> Self {
        Submission {
            xref: xref.into(),
            ..Submission::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submitter_lookup_through_header() {
        let mut gedcom = Gedcom::default();
        gedcom
            .submitters
            .insert("@U1@".to_string(), Submitter::new("@U1@"));
        gedcom.submitters.get_mut("@U1@").unwrap().name = Some("H. Eichmann".to_string());

        // No header pointer, single submitter: still found.
        assert_eq!(
            gedcom.submitter().and_then(|s| s.name.as_deref()),
            Some("H. Eichmann")
        );

        gedcom.header.submitter_xref = Some("@U1@".to_string());
        assert!(gedcom.submitter().is_some());

        gedcom.header.submitter_xref = Some("@U9@".to_string());
        assert!(gedcom.submitter().is_none());
    }

    #[test]
    fn test_kind_maps_preserve_insertion_order() {
        let mut gedcom = Gedcom::default();
        for xref in ["@I3@", "@I1@", "@I2@"] {
            gedcom
                .individuals
                .insert(xref.to_string(), crate::individual::Individual::new(xref));
        }
        let keys: Vec<&str> = gedcom.individuals.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["@I3@", "@I1@", "@I2@"]);
    }
}
