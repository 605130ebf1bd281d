//! Walking the tag tree into the typed object graph.
//!
//! Interpretation makes two passes over the level-0 records:
//!
//! - **Pass A (discovery)**: every xref-bearing record gets an empty typed
//!   entity registered in its kind's map. Nothing else is read. After this
//!   pass, forward references resolve.
//! - **Pass B (hydration)**: each record dispatches by tag to its handler,
//!   which walks the children and fills the entity in. Reference-valued
//!   subtags push `(xref, kind)` pairs onto a pending queue.
//!
//! When hydration finishes, the pending queue is checked against the kind
//! maps; every miss is recorded as a `dangling cross-reference` error. Links
//! stay stored as xref strings looked up through the root's maps, which is
//! how the family/individual cycles remain ownership-free.
//!
//! Level-0 dispatch goes through a handler map built once; child tags
//! dispatch with `match`.

use crate::diagnostics::Diagnostic;
use crate::encoding::GedcomEncoding;
use crate::family::{Family, FamilyEvent, FamilyEventKind};
use crate::individual::{
    Association, FamilyChild, FamilySpouse, Individual, IndividualAttribute,
    IndividualAttributeKind, IndividualEvent, IndividualEventKind, PersonalName,
};
use crate::model::{
    CharacterSet, Corporation, Gedcom, GedcomVersion, Header, HeaderSourceData, SourceSystem,
    Submission, Submitter,
};
use crate::progress::{notify_parse_observers, ParseObserver, ParseProgressEvent};
use crate::records::{
    CallNumber, EventsRecorded, FileReference, Multimedia, Note, Repository, RepositoryCitation,
    Source, SourceRecordData,
};
use crate::structures::{
    Address, Citation, CustomFact, ChangeDate, EventDetail, InlineMultimedia, MultimediaLink,
    NoteStructure, Place, SourceCitation, TextCitation, UserReference,
};
use crate::tree::TagNode;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// The kinds of level-0 records that carry xrefs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum RecordKind {
    Individual,
    Family,
    Multimedia,
    Note,
    Source,
    Repository,
    Submitter,
    Submission,
}

impl RecordKind {
    fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "INDI" => RecordKind::Individual,
            "FAM" => RecordKind::Family,
            "OBJE" => RecordKind::Multimedia,
            "NOTE" => RecordKind::Note,
            "SOUR" => RecordKind::Source,
            "REPO" => RecordKind::Repository,
            "SUBM" => RecordKind::Submitter,
            "SUBN" => RecordKind::Submission,
            _ => return None,
        };
        Some(kind)
    }

    fn name(self) -> &'static str {
        match self {
            RecordKind::Individual => "individual",
            RecordKind::Family => "family",
            RecordKind::Multimedia => "multimedia",
            RecordKind::Note => "note",
            RecordKind::Source => "source",
            RecordKind::Repository => "repository",
            RecordKind::Submitter => "submitter",
            RecordKind::Submission => "submission",
        }
    }
}

/// A reference waiting for end-of-hydration resolution.
#[derive(Debug)]
struct PendingXref {
    xref: String,
    kind: RecordKind,
}

/// Hydration handler for one record kind.
type RecordHandler = fn(&mut Interpreter<'_>, &TagNode, &str);

/// Level-0 tag dispatch, built once per process.
static RECORD_HANDLERS: Lazy<HashMap<&'static str, RecordHandler>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, RecordHandler> = HashMap::new();
    map.insert("INDI", |s, n, x| s.hydrate_individual(n, x));
    map.insert("FAM", |s, n, x| s.hydrate_family(n, x));
    map.insert("OBJE", |s, n, x| s.hydrate_multimedia(n, x));
    map.insert("NOTE", |s, n, x| s.hydrate_note(n, x));
    map.insert("SOUR", |s, n, x| s.hydrate_source(n, x));
    map.insert("REPO", |s, n, x| s.hydrate_repository(n, x));
    map.insert("SUBM", |s, n, x| s.hydrate_submitter(n, x));
    map.insert("SUBN", |s, n, x| s.hydrate_submission(n, x));
    map
});

/// State threaded through hydration.
pub(crate) struct Interpreter<'a> {
    gedcom: Gedcom,
    pending: Vec<PendingXref>,
    errors: &'a mut Vec<Diagnostic>,
    warnings: &'a mut Vec<Diagnostic>,
    strict_custom_tags: bool,
    detected_encoding: GedcomEncoding,
    bom_present: bool,
    /// Root indices whose xref lost a duplicate race; their trees are kept
    /// under `custom_records` instead of being hydrated.
    skipped_duplicates: HashSet<usize>,
}

impl<'a> Interpreter<'a> {
    pub(crate) fn new(
        errors: &'a mut Vec<Diagnostic>,
        warnings: &'a mut Vec<Diagnostic>,
        strict_custom_tags: bool,
        detected_encoding: GedcomEncoding,
        bom_present: bool,
    ) -> Self {
        Interpreter {
            gedcom: Gedcom::default(),
            pending: Vec::new(),
            errors,
            warnings,
            strict_custom_tags,
            detected_encoding,
            bom_present,
            skipped_duplicates: HashSet::new(),
        }
    }

    /// Run both passes and resolution; returns the finished graph. The
    /// parser drives the passes one by one instead, to surface its state
    /// transitions.
    #[cfg(test)]
    pub(crate) fn run(
        mut self,
        roots: &[TagNode],
        parse_observers: &mut Vec<ParseObserver>,
    ) -> Gedcom {
        self.discover(roots);
        self.hydrate(roots, parse_observers);
        self.resolve_pending();
        self.finish()
    }

    /// Hand the finished graph to the caller.
    pub(crate) fn finish(self) -> Gedcom {
        self.gedcom
    }

    // ---- Pass A: discovery -------------------------------------------------

    pub(crate) fn discover(&mut self, roots: &[TagNode]) {
        for (index, node) in roots.iter().enumerate() {
            let tag = node.tag();
            if tag == "HEAD" || tag == "TRLR" {
                continue;
            }
            let Some(kind) = RecordKind::from_tag(tag) else {
                continue; // preserved as a custom record in pass B
            };
            let Some(xref) = node.line.xref.clone() else {
                self.warnings.push(Diagnostic::at_tag(
                    format!("{} record has no xref; preserved as a custom record", tag),
                    0,
                    tag.to_string(),
                ));
                self.skipped_duplicates.insert(index);
                continue;
            };
            if !self.register(kind, &xref) {
                self.errors.push(
                    Diagnostic::at_tag(
                        format!("duplicate xref within kind {}; first record wins", kind.name()),
                        0,
                        tag.to_string(),
                    )
                    .with_xref(xref),
                );
                self.skipped_duplicates.insert(index);
            }
        }
    }

    /// Register an empty entity; false if the xref is already taken in this
    /// kind.
    fn register(&mut self, kind: RecordKind, xref: &str) -> bool {
        match kind {
            RecordKind::Individual => {
                if self.gedcom.individuals.contains_key(xref) {
                    return false;
                }
                self.gedcom
                    .individuals
                    .insert(xref.to_string(), Individual::new(xref));
            }
            RecordKind::Family => {
                if self.gedcom.families.contains_key(xref) {
                    return false;
                }
                self.gedcom
                    .families
                    .insert(xref.to_string(), Family::new(xref));
            }
            RecordKind::Multimedia => {
                if self.gedcom.multimedia.contains_key(xref) {
                    return false;
                }
                self.gedcom
                    .multimedia
                    .insert(xref.to_string(), Multimedia::new(xref));
            }
            RecordKind::Note => {
                if self.gedcom.notes.contains_key(xref) {
                    return false;
                }
                self.gedcom.notes.insert(xref.to_string(), Note::new(xref));
            }
            RecordKind::Source => {
                if self.gedcom.sources.contains_key(xref) {
                    return false;
                }
                self.gedcom
                    .sources
                    .insert(xref.to_string(), Source::new(xref));
            }
            RecordKind::Repository => {
                if self.gedcom.repositories.contains_key(xref) {
                    return false;
                }
                self.gedcom
                    .repositories
                    .insert(xref.to_string(), Repository::new(xref));
            }
            RecordKind::Submitter => {
                if self.gedcom.submitters.contains_key(xref) {
                    return false;
                }
                self.gedcom
                    .submitters
                    .insert(xref.to_string(), Submitter::new(xref));
            }
            RecordKind::Submission => {
                if self.gedcom.submission.is_some() {
                    return false;
                }
                self.gedcom.submission = Some(Submission::new(xref));
            }
        }
        true
    }

    // ---- Pass B: hydration -------------------------------------------------

    pub(crate) fn hydrate(&mut self, roots: &[TagNode], parse_observers: &mut Vec<ParseObserver>) {
        let mut processed = 0usize;
        for (index, node) in roots.iter().enumerate() {
            let tag = node.tag().to_string();
            if index == 0 && tag == "HEAD" {
                self.hydrate_header(node);
            } else if tag == "TRLR" {
                // The sentinel; nothing to read.
            } else if self.skipped_duplicates.contains(&index) {
                let fact = Self::to_custom_fact(node);
                self.gedcom.custom_records.push(fact);
            } else if let Some(handler) = RECORD_HANDLERS.get(tag.as_str()) {
                let xref = node.line.xref.clone().unwrap_or_default();
                handler(self, node, &xref);
            } else {
                self.warn_unknown(node);
                let fact = Self::to_custom_fact(node);
                self.gedcom.custom_records.push(fact);
            }
            processed += 1;
            notify_parse_observers(
                parse_observers,
                &ParseProgressEvent {
                    records_processed: processed,
                    complete: false,
                },
            );
        }
        notify_parse_observers(
            parse_observers,
            &ParseProgressEvent {
                records_processed: processed,
                complete: true,
            },
        );
    }

    // ---- Resolution --------------------------------------------------------

    pub(crate) fn resolve_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for p in pending {
            let found = match p.kind {
                RecordKind::Individual => self.gedcom.individuals.contains_key(&p.xref),
                RecordKind::Family => self.gedcom.families.contains_key(&p.xref),
                RecordKind::Multimedia => self.gedcom.multimedia.contains_key(&p.xref),
                RecordKind::Note => self.gedcom.notes.contains_key(&p.xref),
                RecordKind::Source => self.gedcom.sources.contains_key(&p.xref),
                RecordKind::Repository => self.gedcom.repositories.contains_key(&p.xref),
                RecordKind::Submitter => self.gedcom.submitters.contains_key(&p.xref),
                RecordKind::Submission => self
                    .gedcom
                    .submission
                    .as_ref()
                    .is_some_and(|s| s.xref == p.xref),
            };
            if !found {
                self.errors.push(Diagnostic::at_xref(
                    format!(
                        "dangling cross-reference {} of kind {}",
                        p.xref,
                        p.kind.name()
                    ),
                    p.xref,
                ));
            }
        }
    }

    fn refer(&mut self, xref: &str, kind: RecordKind) {
        self.pending.push(PendingXref {
            xref: xref.to_string(),
            kind,
        });
    }

    // ---- Shared helpers ----------------------------------------------------

    /// Fold a node's value with its `CONT`/`CONC` children into one string.
    fn text_value(node: &TagNode) -> String {
        let mut text = node.value().unwrap_or("").to_string();
        for child in &node.children {
            match child.tag() {
                "CONT" => {
                    text.push('\n');
                    text.push_str(child.value().unwrap_or(""));
                }
                "CONC" => text.push_str(child.value().unwrap_or("")),
                _ => {}
            }
        }
        text
    }

    /// Take a leaf subtag's folded text; children other than continuations
    /// are preserved as custom facts.
    fn leaf(&mut self, node: &TagNode, custom: &mut Vec<CustomFact>) -> String {
        let text = Self::text_value(node);
        for child in &node.children {
            if child.tag() != "CONT" && child.tag() != "CONC" {
                self.unknown_child(child, custom);
            }
        }
        text
    }

    /// Assign a 0:1 field, warning when the file repeats it. Last wins.
    fn set_scalar(&mut self, slot: &mut Option<String>, node: &TagNode, value: String) {
        if slot.is_some() {
            self.warnings.push(Diagnostic::at_tag(
                format!("{} appears more than once; the last value wins", node.tag()),
                node.line.level,
                node.tag().to_string(),
            ));
        }
        *slot = Some(value);
    }

    /// Parse a numeric subtag as a 32-bit signed value; a failed parse warns
    /// and leaves the field unset.
    fn numeric_value(&mut self, node: &TagNode) -> Option<i32> {
        let raw = node.value().unwrap_or("").trim();
        match raw.parse::<i32>() {
            Ok(n) => Some(n),
            Err(_) => {
                self.warnings.push(Diagnostic::at_tag(
                    format!("{} value {raw:?} is not a number; ignored", node.tag()),
                    node.line.level,
                    node.tag().to_string(),
                ));
                None
            }
        }
    }

    fn warn_unknown(&mut self, node: &TagNode) {
        self.warnings.push(Diagnostic::at_tag(
            format!("unrecognized tag {}; preserved as a custom fact", node.tag()),
            node.line.level,
            node.tag().to_string(),
        ));
    }

    /// Preserve an unrecognized subtree on the nearest typed ancestor.
    /// Standard-looking tags always warn; `_`-prefixed extensions warn only
    /// under `strict_custom_tags`.
    fn unknown_child(&mut self, node: &TagNode, custom: &mut Vec<CustomFact>) {
        if !node.tag().starts_with('_') || self.strict_custom_tags {
            self.warn_unknown(node);
        }
        custom.push(Self::to_custom_fact(node));
    }

    fn to_custom_fact(node: &TagNode) -> CustomFact {
        CustomFact {
            tag: node.tag().to_string(),
            xref: node.line.xref.clone(),
            value: node.line.value.clone(),
            children: node.children.iter().map(Self::to_custom_fact).collect(),
        }
    }

    fn parse_change_date(&mut self, node: &TagNode) -> ChangeDate {
        let mut change = ChangeDate::default();
        for child in &node.children {
            match child.tag() {
                "DATE" => {
                    let date = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut change.date, child, date);
                    for sub in &child.children {
                        match sub.tag() {
                            "TIME" => {
                                let time = sub.value().unwrap_or("").to_string();
                                self.set_scalar(&mut change.time, sub, time);
                            }
                            _ => self.unknown_child(sub, &mut change.custom_facts),
                        }
                    }
                }
                "NOTE" => {
                    let note = self.parse_note_structure(child);
                    change.notes.push(note);
                }
                _ => self.unknown_child(child, &mut change.custom_facts),
            }
        }
        change
    }

    fn parse_user_reference(&mut self, node: &TagNode) -> UserReference {
        let mut user_ref = UserReference {
            reference: node.value().unwrap_or("").to_string(),
            ref_type: None,
        };
        for child in &node.children {
            if child.tag() == "TYPE" {
                let t = child.value().unwrap_or("").to_string();
                self.set_scalar(&mut user_ref.ref_type, child, t);
            }
        }
        user_ref
    }

    fn parse_address(&mut self, node: &TagNode) -> Address {
        let mut address = Address::default();
        let folded = Self::text_value(node);
        if !folded.is_empty() {
            address.value = Some(folded);
        }
        for child in &node.children {
            match child.tag() {
                "CONT" | "CONC" => {}
                "ADR1" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut address.line1, child, v);
                }
                "ADR2" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut address.line2, child, v);
                }
                "ADR3" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut address.line3, child, v);
                }
                "CITY" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut address.city, child, v);
                }
                "STAE" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut address.state, child, v);
                }
                "POST" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut address.postal_code, child, v);
                }
                "CTRY" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut address.country, child, v);
                }
                _ => self.unknown_child(child, &mut address.custom_facts),
            }
        }
        address
    }

    fn parse_note_structure(&mut self, node: &TagNode) -> NoteStructure {
        if node.line.value_is_pointer() {
            let xref = node.value().unwrap_or("").to_string();
            self.refer(&xref, RecordKind::Note);
            NoteStructure::Record { xref }
        } else {
            let text = Self::text_value(node);
            let mut citations = Vec::new();
            let mut custom_facts = Vec::new();
            for child in &node.children {
                match child.tag() {
                    "CONT" | "CONC" => {}
                    "SOUR" => {
                        let citation = self.parse_citation(child);
                        citations.push(citation);
                    }
                    _ => self.unknown_child(child, &mut custom_facts),
                }
            }
            NoteStructure::Inline {
                text,
                citations,
                custom_facts,
            }
        }
    }

    fn parse_citation(&mut self, node: &TagNode) -> Citation {
        if node.line.value_is_pointer() {
            let mut citation = SourceCitation {
                xref: node.value().unwrap_or("").to_string(),
                ..SourceCitation::default()
            };
            self.refer(&citation.xref, RecordKind::Source);
            for child in &node.children {
                match child.tag() {
                    "PAGE" => {
                        let v = child.value().unwrap_or("").to_string();
                        self.set_scalar(&mut citation.page, child, v);
                    }
                    "EVEN" => {
                        let v = child.value().unwrap_or("").to_string();
                        self.set_scalar(&mut citation.event, child, v);
                        for sub in &child.children {
                            match sub.tag() {
                                "ROLE" => {
                                    let role = sub.value().unwrap_or("").to_string();
                                    self.set_scalar(&mut citation.role, sub, role);
                                }
                                _ => self.unknown_child(sub, &mut citation.custom_facts),
                            }
                        }
                    }
                    "DATA" => {
                        let mut data = citation.data.take().unwrap_or_default();
                        for sub in &child.children {
                            match sub.tag() {
                                "DATE" => {
                                    let date = sub.value().unwrap_or("").to_string();
                                    self.set_scalar(&mut data.date, sub, date);
                                }
                                "TEXT" => {
                                    let text = self.leaf(sub, &mut citation.custom_facts);
                                    data.text.push(text);
                                }
                                _ => self.unknown_child(sub, &mut citation.custom_facts),
                            }
                        }
                        citation.data = Some(data);
                    }
                    "QUAY" => {
                        let v = child.value().unwrap_or("").to_string();
                        self.set_scalar(&mut citation.certainty, child, v);
                    }
                    "OBJE" => {
                        let link = self.parse_multimedia_link(child);
                        citation.multimedia.push(link);
                    }
                    "NOTE" => {
                        let note = self.parse_note_structure(child);
                        citation.notes.push(note);
                    }
                    _ => self.unknown_child(child, &mut citation.custom_facts),
                }
            }
            Citation::Record(citation)
        } else {
            let mut citation = TextCitation {
                description: Self::text_value(node),
                ..TextCitation::default()
            };
            for child in &node.children {
                match child.tag() {
                    "CONT" | "CONC" => {}
                    "TEXT" => {
                        let text = self.leaf(child, &mut citation.custom_facts);
                        citation.text.push(text);
                    }
                    "NOTE" => {
                        let note = self.parse_note_structure(child);
                        citation.notes.push(note);
                    }
                    _ => self.unknown_child(child, &mut citation.custom_facts),
                }
            }
            Citation::Text(citation)
        }
    }

    fn parse_multimedia_link(&mut self, node: &TagNode) -> MultimediaLink {
        if node.line.value_is_pointer() {
            let xref = node.value().unwrap_or("").to_string();
            self.refer(&xref, RecordKind::Multimedia);
            MultimediaLink::Record { xref }
        } else {
            let mut inline = InlineMultimedia::default();
            for child in &node.children {
                match child.tag() {
                    "FILE" => {
                        let v = child.value().unwrap_or("").to_string();
                        self.set_scalar(&mut inline.file, child, v);
                    }
                    "FORM" => {
                        let v = child.value().unwrap_or("").to_string();
                        self.set_scalar(&mut inline.format, child, v);
                    }
                    "TITL" => {
                        let v = child.value().unwrap_or("").to_string();
                        self.set_scalar(&mut inline.title, child, v);
                    }
                    "NOTE" => {
                        let note = self.parse_note_structure(child);
                        inline.notes.push(note);
                    }
                    _ => self.unknown_child(child, &mut inline.custom_facts),
                }
            }
            MultimediaLink::Inline(inline)
        }
    }

    fn parse_place(&mut self, node: &TagNode) -> Place {
        let mut place = Place {
            name: node.value().unwrap_or("").to_string(),
            ..Place::default()
        };
        for child in &node.children {
            match child.tag() {
                "FORM" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut place.form, child, v);
                }
                "SOUR" => {
                    let citation = self.parse_citation(child);
                    place.citations.push(citation);
                }
                "NOTE" => {
                    let note = self.parse_note_structure(child);
                    place.notes.push(note);
                }
                _ => self.unknown_child(child, &mut place.custom_facts),
            }
        }
        place
    }

    /// Consume one child that belongs to the shared event detail; false if
    /// the tag is not an event-detail tag.
    fn try_event_detail_child(&mut self, child: &TagNode, detail: &mut EventDetail) -> bool {
        match child.tag() {
            "TYPE" => {
                let v = child.value().unwrap_or("").to_string();
                self.set_scalar(&mut detail.event_type, child, v);
            }
            "DATE" => {
                let v = child.value().unwrap_or("").to_string();
                self.set_scalar(&mut detail.date, child, v);
            }
            "PLAC" => {
                let place = self.parse_place(child);
                if detail.place.is_some() {
                    self.warnings.push(Diagnostic::at_tag(
                        "PLAC appears more than once; the last value wins",
                        child.line.level,
                        "PLAC",
                    ));
                }
                detail.place = Some(place);
            }
            "ADDR" => {
                let address = self.parse_address(child);
                detail.address = Some(address);
            }
            "PHON" => detail
                .phone_numbers
                .push(child.value().unwrap_or("").to_string()),
            "EMAIL" => detail.emails.push(child.value().unwrap_or("").to_string()),
            "FAX" => detail
                .fax_numbers
                .push(child.value().unwrap_or("").to_string()),
            "WWW" => detail.www_urls.push(child.value().unwrap_or("").to_string()),
            "AGNC" => {
                let v = child.value().unwrap_or("").to_string();
                self.set_scalar(&mut detail.agency, child, v);
            }
            "RELI" => {
                let v = child.value().unwrap_or("").to_string();
                self.set_scalar(&mut detail.religion, child, v);
            }
            "CAUS" => {
                let v = child.value().unwrap_or("").to_string();
                self.set_scalar(&mut detail.cause, child, v);
            }
            "AGE" => {
                let v = child.value().unwrap_or("").to_string();
                self.set_scalar(&mut detail.age, child, v);
            }
            "RESN" => {
                let v = child.value().unwrap_or("").to_string();
                self.set_scalar(&mut detail.restriction, child, v);
            }
            "SOUR" => {
                let citation = self.parse_citation(child);
                detail.citations.push(citation);
            }
            "OBJE" => {
                let link = self.parse_multimedia_link(child);
                detail.multimedia.push(link);
            }
            "NOTE" => {
                let note = self.parse_note_structure(child);
                detail.notes.push(note);
            }
            _ => return false,
        }
        true
    }

    // ---- Header ------------------------------------------------------------

    fn hydrate_header(&mut self, node: &TagNode) {
        let mut header = Header::default();
        for child in &node.children {
            match child.tag() {
                "SOUR" => {
                    let system = self.parse_source_system(child, &mut header.custom_facts);
                    header.source_system = Some(system);
                }
                "DEST" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut header.destination, child, v);
                }
                "DATE" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut header.date, child, v);
                    for sub in &child.children {
                        match sub.tag() {
                            "TIME" => {
                                let time = sub.value().unwrap_or("").to_string();
                                self.set_scalar(&mut header.time, sub, time);
                            }
                            _ => self.unknown_child(sub, &mut header.custom_facts),
                        }
                    }
                }
                "SUBM" => {
                    let xref = child.value().unwrap_or("").to_string();
                    self.refer(&xref, RecordKind::Submitter);
                    self.set_scalar(&mut header.submitter_xref, child, xref);
                }
                "SUBN" => {
                    let xref = child.value().unwrap_or("").to_string();
                    self.refer(&xref, RecordKind::Submission);
                    self.set_scalar(&mut header.submission_xref, child, xref);
                }
                "FILE" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut header.file_name, child, v);
                }
                "COPR" => {
                    let text = self.leaf(child, &mut header.custom_facts);
                    self.set_scalar(&mut header.copyright, child, text);
                }
                "GEDC" => {
                    let version = self.parse_gedcom_version(child, &mut header.custom_facts);
                    header.gedcom_version = Some(version);
                }
                "CHAR" => {
                    let set = self.parse_character_set(child, &mut header.custom_facts);
                    header.character_set = Some(set);
                }
                "LANG" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut header.language, child, v);
                }
                "PLAC" => {
                    for sub in &child.children {
                        match sub.tag() {
                            "FORM" => {
                                let form = sub.value().unwrap_or("").to_string();
                                self.set_scalar(&mut header.place_hierarchy, sub, form);
                            }
                            _ => self.unknown_child(sub, &mut header.custom_facts),
                        }
                    }
                }
                "NOTE" => {
                    let note = self.parse_note_structure(child);
                    header.notes.push(note);
                }
                _ => self.unknown_child(child, &mut header.custom_facts),
            }
        }
        self.gedcom.header = header;
    }

    fn parse_source_system(
        &mut self,
        node: &TagNode,
        custom: &mut Vec<CustomFact>,
    ) -> SourceSystem {
        let mut system = SourceSystem {
            system_id: node.value().unwrap_or("").to_string(),
            ..SourceSystem::default()
        };
        for child in &node.children {
            match child.tag() {
                "VERS" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut system.version_num, child, v);
                }
                "NAME" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut system.product_name, child, v);
                }
                "CORP" => {
                    let corp = self.parse_corporation(child);
                    system.corporation = Some(corp);
                }
                "DATA" => {
                    let mut data = HeaderSourceData {
                        name: child.value().unwrap_or("").to_string(),
                        ..HeaderSourceData::default()
                    };
                    for sub in &child.children {
                        match sub.tag() {
                            "DATE" => {
                                let date = sub.value().unwrap_or("").to_string();
                                self.set_scalar(&mut data.publish_date, sub, date);
                            }
                            "COPR" => {
                                let copr = Self::text_value(sub);
                                self.set_scalar(&mut data.copyright, sub, copr);
                            }
                            _ => {}
                        }
                    }
                    system.source_data = Some(data);
                }
                // The header's SOUR block has no custom-fact slot of its
                // own; strays land on the header.
                _ => self.unknown_child(child, custom),
            }
        }
        system
    }

    fn parse_corporation(&mut self, node: &TagNode) -> Corporation {
        let mut corp = Corporation {
            business_name: node.value().unwrap_or("").to_string(),
            ..Corporation::default()
        };
        for child in &node.children {
            match child.tag() {
                "ADDR" => {
                    let address = self.parse_address(child);
                    corp.address = Some(address);
                }
                "PHON" => corp
                    .phone_numbers
                    .push(child.value().unwrap_or("").to_string()),
                "EMAIL" => corp.emails.push(child.value().unwrap_or("").to_string()),
                "FAX" => corp
                    .fax_numbers
                    .push(child.value().unwrap_or("").to_string()),
                "WWW" => corp.www_urls.push(child.value().unwrap_or("").to_string()),
                _ => self.unknown_child(child, &mut corp.custom_facts),
            }
        }
        corp
    }

    fn parse_gedcom_version(
        &mut self,
        node: &TagNode,
        custom: &mut Vec<CustomFact>,
    ) -> GedcomVersion {
        let mut version = GedcomVersion::default();
        for child in &node.children {
            match child.tag() {
                "VERS" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut version.version_number, child, v);
                }
                "FORM" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut version.gedcom_form, child, v);
                }
                _ => self.unknown_child(child, custom),
            }
        }
        version
    }

    fn parse_character_set(
        &mut self,
        node: &TagNode,
        custom: &mut Vec<CustomFact>,
    ) -> CharacterSet {
        let mut set = CharacterSet {
            value: node.value().unwrap_or("").to_string(),
            ..CharacterSet::default()
        };
        for child in &node.children {
            match child.tag() {
                "VERS" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut set.version, child, v);
                }
                _ => self.unknown_child(child, custom),
            }
        }
        // A BOM (or a bare UTF-16 first line) overrides the declaration;
        // note the conflict when the file contradicts itself.
        if let Ok(declared) = GedcomEncoding::from_char_declaration(&set.value) {
            let matches = declared == self.detected_encoding
                || (declared.is_utf16() && self.detected_encoding.is_utf16());
            if !matches && (self.bom_present || self.detected_encoding.is_utf16()) {
                self.warnings.push(Diagnostic::at_tag(
                    format!(
                        "CHAR declares {} but the byte stream is {}; the byte order mark wins",
                        set.value, self.detected_encoding
                    ),
                    node.line.level,
                    "CHAR",
                ));
            }
        }
        set
    }

    // ---- Individuals -------------------------------------------------------

    fn hydrate_individual(&mut self, node: &TagNode, xref: &str) {
        let mut indi = Individual::new(xref);
        for child in &node.children {
            let tag = child.tag();
            if let Some(kind) = IndividualEventKind::from_tag(tag) {
                let event = self.parse_individual_event(child, kind);
                indi.events.push(event);
                continue;
            }
            if let Some(kind) = IndividualAttributeKind::from_tag(tag) {
                let attribute = self.parse_individual_attribute(child, kind);
                indi.attributes.push(attribute);
                continue;
            }
            match tag {
                "NAME" => {
                    let name = self.parse_personal_name(child);
                    indi.names.push(name);
                }
                "SEX" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut indi.sex, child, v);
                }
                "FAMC" => {
                    let link = self.parse_family_child(child);
                    indi.child_to_families.push(link);
                }
                "FAMS" => {
                    let link = self.parse_family_spouse(child);
                    indi.spouse_to_families.push(link);
                }
                "ASSO" => {
                    let assoc = self.parse_association(child);
                    indi.associations.push(assoc);
                }
                "ALIA" => {
                    let alias = child.value().unwrap_or("").to_string();
                    self.refer(&alias, RecordKind::Individual);
                    indi.aliases.push(alias);
                }
                "ANCI" => {
                    let subm = child.value().unwrap_or("").to_string();
                    self.refer(&subm, RecordKind::Submitter);
                    indi.ancestor_interest.push(subm);
                }
                "DESI" => {
                    let subm = child.value().unwrap_or("").to_string();
                    self.refer(&subm, RecordKind::Submitter);
                    indi.descendant_interest.push(subm);
                }
                "SUBM" => {
                    let subm = child.value().unwrap_or("").to_string();
                    self.refer(&subm, RecordKind::Submitter);
                    indi.submitters.push(subm);
                }
                "RFN" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut indi.permanent_record_file_number, child, v);
                }
                "AFN" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut indi.ancestral_file_number, child, v);
                }
                "RESN" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut indi.restriction, child, v);
                }
                "REFN" => {
                    let user_ref = self.parse_user_reference(child);
                    indi.user_references.push(user_ref);
                }
                "RIN" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut indi.record_id, child, v);
                }
                "CHAN" => {
                    let change = self.parse_change_date(child);
                    indi.change_date = Some(change);
                }
                "SOUR" => {
                    let citation = self.parse_citation(child);
                    indi.citations.push(citation);
                }
                "OBJE" => {
                    let link = self.parse_multimedia_link(child);
                    indi.multimedia.push(link);
                }
                "NOTE" => {
                    let note = self.parse_note_structure(child);
                    indi.notes.push(note);
                }
                _ => self.unknown_child(child, &mut indi.custom_facts),
            }
        }
        self.gedcom.individuals.insert(xref.to_string(), indi);
    }

    fn parse_personal_name(&mut self, node: &TagNode) -> PersonalName {
        let mut name = PersonalName {
            basic: node.value().unwrap_or("").to_string(),
            ..PersonalName::default()
        };
        for child in &node.children {
            match child.tag() {
                "NPFX" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut name.prefix, child, v);
                }
                "GIVN" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut name.given, child, v);
                }
                "NICK" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut name.nickname, child, v);
                }
                "SPFX" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut name.surname_prefix, child, v);
                }
                "SURN" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut name.surname, child, v);
                }
                "NSFX" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut name.suffix, child, v);
                }
                "SOUR" => {
                    let citation = self.parse_citation(child);
                    name.citations.push(citation);
                }
                "NOTE" => {
                    let note = self.parse_note_structure(child);
                    name.notes.push(note);
                }
                _ => self.unknown_child(child, &mut name.custom_facts),
            }
        }
        name
    }

    fn parse_individual_event(
        &mut self,
        node: &TagNode,
        kind: IndividualEventKind,
    ) -> IndividualEvent {
        let mut event = IndividualEvent::new(kind);
        event.value = node.value().map(str::to_string);
        for child in &node.children {
            if child.tag() == "FAMC" {
                let family = child.value().unwrap_or("").to_string();
                self.refer(&family, RecordKind::Family);
                event.family_xref = Some(family);
                for sub in &child.children {
                    match sub.tag() {
                        "ADOP" => {
                            let by = sub.value().unwrap_or("").to_string();
                            self.set_scalar(&mut event.adopted_by, sub, by);
                        }
                        _ => self.unknown_child(sub, &mut event.detail.custom_facts),
                    }
                }
                continue;
            }
            if !self.try_event_detail_child(child, &mut event.detail) {
                self.unknown_child(child, &mut event.detail.custom_facts);
            }
        }
        event
    }

    fn parse_individual_attribute(
        &mut self,
        node: &TagNode,
        kind: IndividualAttributeKind,
    ) -> IndividualAttribute {
        let mut attribute = IndividualAttribute::new(kind);
        let folded = Self::text_value(node);
        if !folded.is_empty() {
            attribute.value = Some(folded);
        }
        for child in &node.children {
            if child.tag() == "CONT" || child.tag() == "CONC" {
                continue;
            }
            if !self.try_event_detail_child(child, &mut attribute.detail) {
                self.unknown_child(child, &mut attribute.detail.custom_facts);
            }
        }
        attribute
    }

    fn parse_family_child(&mut self, node: &TagNode) -> FamilyChild {
        let mut link = FamilyChild {
            family_xref: node.value().unwrap_or("").to_string(),
            ..FamilyChild::default()
        };
        self.refer(&link.family_xref, RecordKind::Family);
        for child in &node.children {
            match child.tag() {
                "PEDI" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut link.pedigree, child, v);
                }
                "STAT" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut link.status, child, v);
                }
                "NOTE" => {
                    let note = self.parse_note_structure(child);
                    link.notes.push(note);
                }
                _ => self.unknown_child(child, &mut link.custom_facts),
            }
        }
        link
    }

    fn parse_family_spouse(&mut self, node: &TagNode) -> FamilySpouse {
        let mut link = FamilySpouse {
            family_xref: node.value().unwrap_or("").to_string(),
            ..FamilySpouse::default()
        };
        self.refer(&link.family_xref, RecordKind::Family);
        for child in &node.children {
            match child.tag() {
                "NOTE" => {
                    let note = self.parse_note_structure(child);
                    link.notes.push(note);
                }
                _ => self.unknown_child(child, &mut link.custom_facts),
            }
        }
        link
    }

    fn parse_association(&mut self, node: &TagNode) -> Association {
        let mut assoc = Association {
            xref: node.value().unwrap_or("").to_string(),
            ..Association::default()
        };
        self.refer(&assoc.xref, RecordKind::Individual);
        for child in &node.children {
            match child.tag() {
                "RELA" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut assoc.relation, child, v);
                }
                "SOUR" => {
                    let citation = self.parse_citation(child);
                    assoc.citations.push(citation);
                }
                "NOTE" => {
                    let note = self.parse_note_structure(child);
                    assoc.notes.push(note);
                }
                _ => self.unknown_child(child, &mut assoc.custom_facts),
            }
        }
        assoc
    }

    // ---- Families ----------------------------------------------------------

    fn hydrate_family(&mut self, node: &TagNode, xref: &str) {
        let mut family = Family::new(xref);
        for child in &node.children {
            let tag = child.tag();
            if let Some(kind) = FamilyEventKind::from_tag(tag) {
                let event = self.parse_family_event(child, kind);
                family.events.push(event);
                continue;
            }
            match tag {
                "HUSB" => {
                    let husband = child.value().unwrap_or("").to_string();
                    self.refer(&husband, RecordKind::Individual);
                    self.set_scalar(&mut family.husband_xref, child, husband);
                }
                "WIFE" => {
                    let wife = child.value().unwrap_or("").to_string();
                    self.refer(&wife, RecordKind::Individual);
                    self.set_scalar(&mut family.wife_xref, child, wife);
                }
                "CHIL" => {
                    let child_xref = child.value().unwrap_or("").to_string();
                    self.refer(&child_xref, RecordKind::Individual);
                    family.children_xrefs.push(child_xref);
                }
                "NCHI" => {
                    family.num_children = self.numeric_value(child);
                }
                "SUBM" => {
                    let subm = child.value().unwrap_or("").to_string();
                    self.refer(&subm, RecordKind::Submitter);
                    family.submitters.push(subm);
                }
                "RESN" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut family.restriction, child, v);
                }
                "REFN" => {
                    let user_ref = self.parse_user_reference(child);
                    family.user_references.push(user_ref);
                }
                "RIN" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut family.record_id, child, v);
                }
                "CHAN" => {
                    let change = self.parse_change_date(child);
                    family.change_date = Some(change);
                }
                "SOUR" => {
                    let citation = self.parse_citation(child);
                    family.citations.push(citation);
                }
                "OBJE" => {
                    let link = self.parse_multimedia_link(child);
                    family.multimedia.push(link);
                }
                "NOTE" => {
                    let note = self.parse_note_structure(child);
                    family.notes.push(note);
                }
                _ => self.unknown_child(child, &mut family.custom_facts),
            }
        }
        self.gedcom.families.insert(xref.to_string(), family);
    }

    fn parse_family_event(&mut self, node: &TagNode, kind: FamilyEventKind) -> FamilyEvent {
        let mut event = FamilyEvent::new(kind);
        event.value = node.value().map(str::to_string);
        for child in &node.children {
            match child.tag() {
                // HUSB/WIFE inside an event carry only the spouse's age.
                "HUSB" | "WIFE" => {
                    for sub in &child.children {
                        match sub.tag() {
                            "AGE" => {
                                let age = sub.value().unwrap_or("").to_string();
                                let slot = if child.tag() == "HUSB" {
                                    &mut event.husband_age
                                } else {
                                    &mut event.wife_age
                                };
                                self.set_scalar(slot, sub, age);
                            }
                            _ => self.unknown_child(sub, &mut event.detail.custom_facts),
                        }
                    }
                }
                _ => {
                    if !self.try_event_detail_child(child, &mut event.detail) {
                        self.unknown_child(child, &mut event.detail.custom_facts);
                    }
                }
            }
        }
        event
    }

    // ---- Multimedia, notes, sources, repositories --------------------------

    fn hydrate_multimedia(&mut self, node: &TagNode, xref: &str) {
        let mut media = Multimedia::new(xref);
        for child in &node.children {
            match child.tag() {
                "FILE" => {
                    let reference = self.parse_file_reference(child);
                    media.file_references.push(reference);
                }
                "TITL" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut media.title, child, v);
                }
                "BLOB" => {
                    for sub in &child.children {
                        match sub.tag() {
                            "CONT" => media
                                .blob_lines
                                .push(sub.value().unwrap_or("").to_string()),
                            _ => self.unknown_child(sub, &mut media.custom_facts),
                        }
                    }
                }
                "OBJE" => {
                    let continued = child.value().unwrap_or("").to_string();
                    self.refer(&continued, RecordKind::Multimedia);
                    self.set_scalar(&mut media.continued_xref, child, continued);
                }
                "SOUR" => {
                    let citation = self.parse_citation(child);
                    media.citations.push(citation);
                }
                "NOTE" => {
                    let note = self.parse_note_structure(child);
                    media.notes.push(note);
                }
                "REFN" => {
                    let user_ref = self.parse_user_reference(child);
                    media.user_references.push(user_ref);
                }
                "RIN" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut media.record_id, child, v);
                }
                "CHAN" => {
                    let change = self.parse_change_date(child);
                    media.change_date = Some(change);
                }
                _ => self.unknown_child(child, &mut media.custom_facts),
            }
        }
        self.gedcom.multimedia.insert(xref.to_string(), media);
    }

    fn parse_file_reference(&mut self, node: &TagNode) -> FileReference {
        let mut reference = FileReference {
            file: node.value().unwrap_or("").to_string(),
            ..FileReference::default()
        };
        for child in &node.children {
            match child.tag() {
                "FORM" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut reference.format, child, v);
                    for sub in &child.children {
                        match sub.tag() {
                            "TYPE" | "MEDI" => {
                                let media = sub.value().unwrap_or("").to_string();
                                self.set_scalar(&mut reference.media_type, sub, media);
                            }
                            _ => {}
                        }
                    }
                }
                "TITL" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut reference.title, child, v);
                }
                _ => {}
            }
        }
        reference
    }

    fn hydrate_note(&mut self, node: &TagNode, xref: &str) {
        let mut note = Note::new(xref);
        note.text = Self::text_value(node);
        for child in &node.children {
            match child.tag() {
                "CONT" | "CONC" => {}
                "SOUR" => {
                    let citation = self.parse_citation(child);
                    note.citations.push(citation);
                }
                "REFN" => {
                    let user_ref = self.parse_user_reference(child);
                    note.user_references.push(user_ref);
                }
                "RIN" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut note.record_id, child, v);
                }
                "CHAN" => {
                    let change = self.parse_change_date(child);
                    note.change_date = Some(change);
                }
                _ => self.unknown_child(child, &mut note.custom_facts),
            }
        }
        self.gedcom.notes.insert(xref.to_string(), note);
    }

    fn hydrate_source(&mut self, node: &TagNode, xref: &str) {
        let mut source = Source::new(xref);
        for child in &node.children {
            match child.tag() {
                "DATA" => {
                    let data = self.parse_source_record_data(child);
                    source.data = Some(data);
                }
                "AUTH" => {
                    let text = self.leaf(child, &mut source.custom_facts);
                    self.set_scalar(&mut source.originators, child, text);
                }
                "TITL" => {
                    let text = self.leaf(child, &mut source.custom_facts);
                    self.set_scalar(&mut source.title, child, text);
                }
                "ABBR" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut source.filed_by, child, v);
                }
                "PUBL" => {
                    let text = self.leaf(child, &mut source.custom_facts);
                    self.set_scalar(&mut source.publication, child, text);
                }
                "TEXT" => {
                    let text = self.leaf(child, &mut source.custom_facts);
                    self.set_scalar(&mut source.text, child, text);
                }
                "REPO" => {
                    let citation = self.parse_repository_citation(child);
                    source.repository_citation = Some(citation);
                }
                "OBJE" => {
                    let link = self.parse_multimedia_link(child);
                    source.multimedia.push(link);
                }
                "NOTE" => {
                    let note = self.parse_note_structure(child);
                    source.notes.push(note);
                }
                "REFN" => {
                    let user_ref = self.parse_user_reference(child);
                    source.user_references.push(user_ref);
                }
                "RIN" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut source.record_id, child, v);
                }
                "CHAN" => {
                    let change = self.parse_change_date(child);
                    source.change_date = Some(change);
                }
                _ => self.unknown_child(child, &mut source.custom_facts),
            }
        }
        self.gedcom.sources.insert(xref.to_string(), source);
    }

    fn parse_source_record_data(&mut self, node: &TagNode) -> SourceRecordData {
        let mut data = SourceRecordData::default();
        for child in &node.children {
            match child.tag() {
                "EVEN" => {
                    let mut recorded = EventsRecorded {
                        event_types: child.value().unwrap_or("").to_string(),
                        ..EventsRecorded::default()
                    };
                    for sub in &child.children {
                        match sub.tag() {
                            "DATE" => {
                                let date = sub.value().unwrap_or("").to_string();
                                self.set_scalar(&mut recorded.date_period, sub, date);
                            }
                            "PLAC" => {
                                let plac = sub.value().unwrap_or("").to_string();
                                self.set_scalar(&mut recorded.jurisdiction, sub, plac);
                            }
                            _ => self.unknown_child(sub, &mut data.custom_facts),
                        }
                    }
                    data.events.push(recorded);
                }
                "AGNC" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut data.agency, child, v);
                }
                "NOTE" => {
                    let note = self.parse_note_structure(child);
                    data.notes.push(note);
                }
                _ => self.unknown_child(child, &mut data.custom_facts),
            }
        }
        data
    }

    fn parse_repository_citation(&mut self, node: &TagNode) -> RepositoryCitation {
        let mut citation = RepositoryCitation::default();
        if node.line.value_is_pointer() {
            let xref = node.value().unwrap_or("").to_string();
            self.refer(&xref, RecordKind::Repository);
            citation.xref = Some(xref);
        }
        for child in &node.children {
            match child.tag() {
                "CALN" => {
                    let mut call = CallNumber {
                        number: child.value().unwrap_or("").to_string(),
                        media_type: None,
                    };
                    for sub in &child.children {
                        match sub.tag() {
                            "MEDI" => {
                                let media = sub.value().unwrap_or("").to_string();
                                self.set_scalar(&mut call.media_type, sub, media);
                            }
                            _ => self.unknown_child(sub, &mut citation.custom_facts),
                        }
                    }
                    citation.call_numbers.push(call);
                }
                "NOTE" => {
                    let note = self.parse_note_structure(child);
                    citation.notes.push(note);
                }
                _ => self.unknown_child(child, &mut citation.custom_facts),
            }
        }
        citation
    }

    fn hydrate_repository(&mut self, node: &TagNode, xref: &str) {
        let mut repo = Repository::new(xref);
        for child in &node.children {
            match child.tag() {
                "NAME" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut repo.name, child, v);
                }
                "ADDR" => {
                    let address = self.parse_address(child);
                    repo.address = Some(address);
                }
                "PHON" => repo
                    .phone_numbers
                    .push(child.value().unwrap_or("").to_string()),
                "EMAIL" => repo.emails.push(child.value().unwrap_or("").to_string()),
                "FAX" => repo
                    .fax_numbers
                    .push(child.value().unwrap_or("").to_string()),
                "WWW" => repo.www_urls.push(child.value().unwrap_or("").to_string()),
                "NOTE" => {
                    let note = self.parse_note_structure(child);
                    repo.notes.push(note);
                }
                "REFN" => {
                    let user_ref = self.parse_user_reference(child);
                    repo.user_references.push(user_ref);
                }
                "RIN" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut repo.record_id, child, v);
                }
                "CHAN" => {
                    let change = self.parse_change_date(child);
                    repo.change_date = Some(change);
                }
                _ => self.unknown_child(child, &mut repo.custom_facts),
            }
        }
        self.gedcom.repositories.insert(xref.to_string(), repo);
    }

    // ---- Submitters and submissions ----------------------------------------

    fn hydrate_submitter(&mut self, node: &TagNode, xref: &str) {
        let mut submitter = Submitter::new(xref);
        for child in &node.children {
            match child.tag() {
                "NAME" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut submitter.name, child, v);
                }
                "ADDR" => {
                    let address = self.parse_address(child);
                    submitter.address = Some(address);
                }
                "PHON" => submitter
                    .phone_numbers
                    .push(child.value().unwrap_or("").to_string()),
                "EMAIL" => submitter
                    .emails
                    .push(child.value().unwrap_or("").to_string()),
                "FAX" => submitter
                    .fax_numbers
                    .push(child.value().unwrap_or("").to_string()),
                "WWW" => submitter
                    .www_urls
                    .push(child.value().unwrap_or("").to_string()),
                "OBJE" => {
                    let link = self.parse_multimedia_link(child);
                    submitter.multimedia.push(link);
                }
                "LANG" => submitter
                    .language_prefs
                    .push(child.value().unwrap_or("").to_string()),
                "RFN" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut submitter.registration_file_number, child, v);
                }
                "RIN" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut submitter.record_id, child, v);
                }
                "NOTE" => {
                    let note = self.parse_note_structure(child);
                    submitter.notes.push(note);
                }
                "CHAN" => {
                    let change = self.parse_change_date(child);
                    submitter.change_date = Some(change);
                }
                _ => self.unknown_child(child, &mut submitter.custom_facts),
            }
        }
        self.gedcom.submitters.insert(xref.to_string(), submitter);
    }

    fn hydrate_submission(&mut self, node: &TagNode, xref: &str) {
        let mut submission = Submission::new(xref);
        for child in &node.children {
            match child.tag() {
                "SUBM" => {
                    let subm = child.value().unwrap_or("").to_string();
                    self.refer(&subm, RecordKind::Submitter);
                    self.set_scalar(&mut submission.submitter_xref, child, subm);
                }
                "FAMF" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut submission.family_file, child, v);
                }
                "TEMP" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut submission.temple_code, child, v);
                }
                "ANCE" => {
                    submission.ancestors_generations = self.numeric_value(child);
                }
                "DESC" => {
                    submission.descendants_generations = self.numeric_value(child);
                }
                "ORDI" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut submission.ordinance_flag, child, v);
                }
                "RIN" => {
                    let v = child.value().unwrap_or("").to_string();
                    self.set_scalar(&mut submission.record_id, child, v);
                }
                "NOTE" => {
                    let note = self.parse_note_structure(child);
                    submission.notes.push(note);
                }
                _ => self.unknown_child(child, &mut submission.custom_facts),
            }
        }
        self.gedcom.submission = Some(submission);
    }
}
