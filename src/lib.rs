#![warn(missing_docs)]

//! # gedrc: GEDCOM Rust Crate
//!
//! A Rust library for reading GEDCOM 5.5/5.5.1 genealogy files into a typed,
//! queryable object model.
//!
//! GEDCOM is a line-oriented, hierarchically nested, tag-based text format
//! with several permissible character encodings (ASCII, ANSEL, UTF-8, and
//! UTF-16 in both byte orders), fixed-position line prefixes, and
//! cross-reference identifiers linking records. This crate handles the
//! encoding zoo, tolerates the malformations real files contain, and reports
//! everything it tolerated as structured diagnostics.
//!
//! ## Quick Start
//!
//! ```no_run
//! use gedrc::GedcomParser;
//!
//! let mut parser = GedcomParser::new();
//! let outcome = parser.load_file("family.ged")?;
//!
//! for (xref, individual) in &outcome.gedcom.individuals {
//!     if let Some(name) = individual.primary_name() {
//!         println!("{xref}: {}", name.basic);
//!     }
//! }
//! for warning in &outcome.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! # Ok::<(), gedrc::ParseFailure>(())
//! ```
//!
//! ## Pipeline
//!
//! A load runs: byte source → encoding detection (BOM or the `1 CHAR`
//! declaration) → encoding-specific line reader → line tokenizer → tree
//! builder → two-pass interpreter (discover xrefs, then hydrate records) →
//! cross-reference resolution. Progress observers fire while lines are read
//! and after each record is hydrated; an `Arc<AtomicBool>` cancels a load
//! from any thread.
//!
//! ## Error handling
//!
//! Only a handful of conditions abort a load (I/O failure, unknown encoding,
//! missing `HEAD`/`TRLR`, an unparseable level number, cancellation); they
//! surface as [`ParseFailure`] carrying everything recorded up to the abort.
//! Everything else, from dangling cross-references to unknown tags to
//! invalid byte sequences, is recorded in the `errors` and `warnings` lists
//! and parsing continues.
//!
//! ## Modules
//!
//! - [`parser`] — the [`GedcomParser`] entry point and its state machine
//! - [`model`] — the root [`Gedcom`] aggregate, header, submitter, submission
//! - [`individual`], [`family`], [`records`] — the record types
//! - [`structures`] — substructures shared across records
//! - [`encoding`] — encoding detection ([`GedcomEncoding`])
//! - [`ansel_tables`] — the ANSEL→Unicode mapping
//! - [`line`], [`tree`] — the raw layer (tokenized lines, tag trees)
//! - [`progress`] — progress events and observers
//! - [`diagnostics`], [`error`] — diagnostics and fatal errors

pub mod ansel_tables;
mod ansel_reader;
mod ascii_reader;
pub mod diagnostics;
pub mod encoding;
pub mod error;
pub mod family;
pub mod individual;
mod intern;
mod interpreter;
pub mod line;
pub mod model;
pub mod parser;
pub mod progress;
mod reader;
pub mod records;
mod source;
pub mod structures;
pub mod tree;
mod utf16_reader;
mod utf8_reader;

pub use diagnostics::Diagnostic;
pub use encoding::GedcomEncoding;
pub use error::{GedcomError, ParseFailure, Result};
pub use family::{Family, FamilyEvent, FamilyEventKind};
pub use individual::{
    Association, FamilyChild, FamilySpouse, Individual, IndividualAttribute,
    IndividualAttributeKind, IndividualEvent, IndividualEventKind, PersonalName,
};
pub use line::GedcomLine;
pub use model::{
    CharacterSet, Corporation, Gedcom, GedcomVersion, Header, HeaderSourceData, SourceSystem,
    Submission, Submitter, Trailer,
};
pub use parser::{GedcomParser, ParseOutcome, ParserState, DEFAULT_READ_NOTIFICATION_RATE};
pub use progress::{FileProgressEvent, ParseProgressEvent};
pub use records::{
    CallNumber, EventsRecorded, FileReference, Multimedia, Note, Repository, RepositoryCitation,
    Source, SourceRecordData,
};
pub use structures::{
    Address, ChangeDate, Citation, CitationData, CustomFact, EventDetail, InlineMultimedia,
    MultimediaLink, NoteStructure, Place, SourceCitation, TextCitation, UserReference,
};
pub use tree::TagNode;
