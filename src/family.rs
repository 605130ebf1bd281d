//! Family records.

use crate::structures::{
    Citation, CustomFact, ChangeDate, EventDetail, MultimediaLink, NoteStructure, UserReference,
};
use serde::{Deserialize, Serialize};

/// A family record (`0 @X@ FAM`).
///
/// The husband/wife/children links are xrefs into
/// [`Gedcom::individuals`](crate::Gedcom::individuals); the individuals
/// point back through their `FAMS`/`FAMC` links. The root's maps own both
/// sides, so the cycle carries no ownership.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Family {
    /// This record's xref.
    pub xref: String,
    /// Xref of the husband individual (`HUSB`).
    pub husband_xref: Option<String>,
    /// Xref of the wife individual (`WIFE`).
    pub wife_xref: Option<String>,
    /// Xrefs of the children, in input order (`CHIL`).
    pub children_xrefs: Vec<String>,
    /// Declared number of children (`NCHI`), when it parses as a number.
    pub num_children: Option<i32>,
    /// Family events, in input order. Duplicate kinds are allowed.
    pub events: Vec<FamilyEvent>,
    /// Submitter xrefs attached to this family (`SUBM`).
    pub submitters: Vec<String>,
    /// Automated record id (`RIN`).
    pub record_id: Option<String>,
    /// Restriction notice (`RESN`).
    pub restriction: Option<String>,
    /// Source citations.
    pub citations: Vec<Citation>,
    /// Multimedia links.
    pub multimedia: Vec<MultimediaLink>,
    /// Attached notes.
    pub notes: Vec<NoteStructure>,
    /// User reference numbers (`REFN`).
    pub user_references: Vec<UserReference>,
    /// Last change date (`CHAN`).
    pub change_date: Option<ChangeDate>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

impl Family {
    /// A fresh family for an xref, registered during discovery.
    #[must_use]
    pub fn new(xref: impl Into<String>) -> Self {
        Family {
            xref: xref.into(),
            ..Family::default()
        }
    }

    /// Events of one kind, in input order.
    pub fn events_of_kind(&self, kind: FamilyEventKind) -> impl Iterator<Item = &FamilyEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }
}

/// The event kinds a family can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FamilyEventKind {
    /// `ANUL`.
    Annulment,
    /// `CENS`.
    Census,
    /// `DIV`.
    Divorce,
    /// `DIVF`.
    DivorceFiled,
    /// `ENGA`.
    Engagement,
    /// `MARB`.
    MarriageBanns,
    /// `MARC`.
    MarriageContract,
    /// `MARR`.
    Marriage,
    /// `MARL`.
    MarriageLicense,
    /// `MARS`.
    MarriageSettlement,
    /// Generic event (`EVEN`), classified by its `TYPE` subtag.
    Event,
}

impl FamilyEventKind {
    /// Map a tag to an event kind, or `None` for non-event tags.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "ANUL" => FamilyEventKind::Annulment,
            "CENS" => FamilyEventKind::Census,
            "DIV" => FamilyEventKind::Divorce,
            "DIVF" => FamilyEventKind::DivorceFiled,
            "ENGA" => FamilyEventKind::Engagement,
            "MARB" => FamilyEventKind::MarriageBanns,
            "MARC" => FamilyEventKind::MarriageContract,
            "MARR" => FamilyEventKind::Marriage,
            "MARL" => FamilyEventKind::MarriageLicense,
            "MARS" => FamilyEventKind::MarriageSettlement,
            "EVEN" => FamilyEventKind::Event,
            _ => return None,
        };
        Some(kind)
    }

    /// The tag this kind serializes to.
    #[must_use]
    pub fn as_tag(self) -> &'static str {
        match self {
            FamilyEventKind::Annulment => "ANUL",
            FamilyEventKind::Census => "CENS",
            FamilyEventKind::Divorce => "DIV",
            FamilyEventKind::DivorceFiled => "DIVF",
            FamilyEventKind::Engagement => "ENGA",
            FamilyEventKind::MarriageBanns => "MARB",
            FamilyEventKind::MarriageContract => "MARC",
            FamilyEventKind::Marriage => "MARR",
            FamilyEventKind::MarriageLicense => "MARL",
            FamilyEventKind::MarriageSettlement => "MARS",
            FamilyEventKind::Event => "EVEN",
        }
    }
}

/// One event on a family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyEvent {
    /// Which kind this is.
    pub kind: FamilyEventKind,
    /// The line value: `Y`, or a description on generic `EVEN` lines.
    pub value: Option<String>,
    /// Husband's age at the event (`HUSB`/`AGE`).
    pub husband_age: Option<String>,
    /// Wife's age at the event (`WIFE`/`AGE`).
    pub wife_age: Option<String>,
    /// The shared event detail.
    pub detail: EventDetail,
}

impl FamilyEvent {
    /// A bare event of a kind.
    #[must_use]
    pub fn new(kind: FamilyEventKind) -> Self {
        FamilyEvent {
            kind,
            value: None,
            husband_age: None,
            wife_age: None,
            detail: EventDetail::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_tag_roundtrip() {
        for tag in [
            "ANUL", "CENS", "DIV", "DIVF", "ENGA", "MARB", "MARC", "MARR", "MARL", "MARS", "EVEN",
        ] {
            let kind = FamilyEventKind::from_tag(tag).unwrap();
            assert_eq!(kind.as_tag(), tag);
        }
        assert_eq!(FamilyEventKind::from_tag("HUSB"), None);
    }

    #[test]
    fn test_children_preserve_order() {
        let mut family = Family::new("@F1@");
        for xref in ["@I5@", "@I2@", "@I9@"] {
            family.children_xrefs.push(xref.to_string());
        }
        assert_eq!(family.children_xrefs, vec!["@I5@", "@I2@", "@I9@"]);
    }
}
