//! Individual records and their substructures.

use crate::structures::{
    Citation, CustomFact, ChangeDate, EventDetail, MultimediaLink, NoteStructure, UserReference,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// An individual record (`0 @X@ INDI`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Individual {
    /// This record's xref.
    pub xref: String,
    /// Personal names, in input order. Most individuals have one; variants
    /// and aliases add more.
    pub names: SmallVec<[PersonalName; 1]>,
    /// Sex value, raw (`M`, `F`, `U`, or whatever the file says).
    pub sex: Option<String>,
    /// Life events, in input order. Duplicate kinds are allowed.
    pub events: Vec<IndividualEvent>,
    /// Attributes (occupation, residence, ...), in input order.
    pub attributes: Vec<IndividualAttribute>,
    /// Families this individual belongs to as a child (`FAMC`).
    pub child_to_families: Vec<FamilyChild>,
    /// Families this individual belongs to as a spouse (`FAMS`).
    pub spouse_to_families: Vec<FamilySpouse>,
    /// Associations with other individuals (`ASSO`).
    pub associations: Vec<Association>,
    /// Alias xrefs (`ALIA`).
    pub aliases: Vec<String>,
    /// Submitters interested in this individual's ancestors (`ANCI`).
    pub ancestor_interest: Vec<String>,
    /// Submitters interested in this individual's descendants (`DESI`).
    pub descendant_interest: Vec<String>,
    /// Submitter xrefs attached to this individual (`SUBM`).
    pub submitters: Vec<String>,
    /// Permanent record file number (`RFN`).
    pub permanent_record_file_number: Option<String>,
    /// Ancestral File Number (`AFN`).
    pub ancestral_file_number: Option<String>,
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

impl Individual {
    /// A fresh individual for an xref, registered during discovery.
    #[must_use]
    pub fn new(xref: impl Into<String>) -> Self {
        Individual {
            xref: xref.into(),
            ..Individual::default()
        }
    }

    /// The first recorded name, the conventional display name.
    #[must_use]
    pub fn primary_name(&self) -> Option<&PersonalName> {
        self.names.first()
    }

    /// Events of one kind, in input order.
    pub fn events_of_kind(
        &self,
        kind: IndividualEventKind,
    ) -> impl Iterator<Item = &IndividualEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }
}

/// A personal name (`NAME`) with its parsed-out pieces.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonalName {
    /// The full name value as written, surname between slashes
    /// (`John /Doe/`).
    pub basic: String,
    /// Name prefix (`NPFX`).
    pub prefix: Option<String>,
    /// Given names (`GIVN`).
    pub given: Option<String>,
    /// Nickname (`NICK`).
    pub nickname: Option<String>,
    /// Surname prefix (`SPFX`).
    pub surname_prefix: Option<String>,
    /// Surname (`SURN`).
    pub surname: Option<String>,
    /// Name suffix (`NSFX`).
    pub suffix: Option<String>,
    /// Source citations.
    pub citations: Vec<Citation>,
    /// Attached notes.
    pub notes: Vec<NoteStructure>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

/// The event kinds an individual can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndividualEventKind {
    /// `BIRT`.
    Birth,
    /// `CHR`.
    Christening,
    /// `DEAT`.
    Death,
    /// `BURI`.
    Burial,
    /// `CREM`.
    Cremation,
    /// `ADOP`.
    Adoption,
    /// `BAPM`.
    Baptism,
    /// `BARM`.
    BarMitzvah,
    /// `BASM`.
    BasMitzvah,
    /// `BLES`.
    Blessing,
    /// `CHRA`.
    AdultChristening,
    /// `CONF`.
    Confirmation,
    /// `FCOM`.
    FirstCommunion,
    /// `ORDN`.
    Ordination,
    /// `NATU`.
    Naturalization,
    /// `EMIG`.
    Emigration,
    /// `IMMI`.
    Immigration,
    /// `CENS`.
    Census,
    /// `PROB`.
    Probate,
    /// `WILL`.
    Will,
    /// `GRAD`.
    Graduation,
    /// `RETI`.
    Retirement,
    /// Generic event (`EVEN`), classified by its `TYPE` subtag.
    Event,
}

impl IndividualEventKind {
    /// Map a tag to an event kind, or `None` for non-event tags.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        use IndividualEventKind::{
            AdultChristening, Adoption, Baptism, BarMitzvah, BasMitzvah, Birth, Blessing, Burial,
            Census, Christening, Confirmation, Cremation, Death, Emigration, Event, FirstCommunion,
            Graduation, Immigration, Naturalization, Ordination, Probate, Retirement, Will,
        };
        let kind = match tag {
            "BIRT" => Birth,
            "CHR" => Christening,
            "DEAT" => Death,
            "BURI" => Burial,
            "CREM" => Cremation,
            "ADOP" => Adoption,
            "BAPM" => Baptism,
            "BARM" => BarMitzvah,
            "BASM" => BasMitzvah,
            "BLES" => Blessing,
            "CHRA" => AdultChristening,
            "CONF" => Confirmation,
            "FCOM" => FirstCommunion,
            "ORDN" => Ordination,
            "NATU" => Naturalization,
            "EMIG" => Emigration,
            "IMMI" => Immigration,
            "CENS" => Census,
            "PROB" => Probate,
            "WILL" => Will,
            "GRAD" => Graduation,
            "RETI" => Retirement,
            "EVEN" => Event,
            _ => return None,
        };
        Some(kind)
    }

    /// The tag this kind serializes to.
    #[must_use]
    pub fn as_tag(self) -> &'static str {
        match self {
            IndividualEventKind::Birth => "BIRT",
            IndividualEventKind::Christening => "CHR",
            IndividualEventKind::Death => "DEAT",
            IndividualEventKind::Burial => "BURI",
            IndividualEventKind::Cremation => "CREM",
            IndividualEventKind::Adoption => "ADOP",
            IndividualEventKind::Baptism => "BAPM",
            IndividualEventKind::BarMitzvah => "BARM",
            IndividualEventKind::BasMitzvah => "BASM",
            IndividualEventKind::Blessing => "BLES",
            IndividualEventKind::AdultChristening => "CHRA",
            IndividualEventKind::Confirmation => "CONF",
            IndividualEventKind::FirstCommunion => "FCOM",
            IndividualEventKind::Ordination => "ORDN",
            IndividualEventKind::Naturalization => "NATU",
            IndividualEventKind::Emigration => "EMIG",
            IndividualEventKind::Immigration => "IMMI",
            IndividualEventKind::Census => "CENS",
            IndividualEventKind::Probate => "PROB",
            IndividualEventKind::Will => "WILL",
            IndividualEventKind::Graduation => "GRAD",
            IndividualEventKind::Retirement => "RETI",
            IndividualEventKind::Event => "EVEN",
        }
    }
}

/// One event on an individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualEvent {
    /// Which kind this is.
    pub kind: IndividualEventKind,
    /// The line value: `Y` ("known to have happened"), or a description on
    /// generic `EVEN` lines.
    pub value: Option<String>,
    /// Birth/christening/adoption family link (`FAMC`).
    pub family_xref: Option<String>,
    /// Which parent adopted, on adoption events (`FAMC`/`ADOP`).
    pub adopted_by: Option<String>,
    /// The shared event detail.
    pub detail: EventDetail,
}

impl IndividualEvent {
    /// A bare event of a kind.
    #[must_use]
    pub fn new(kind: IndividualEventKind) -> Self {
        IndividualEvent {
            kind,
            value: None,
            family_xref: None,
            adopted_by: None,
            detail: EventDetail::default(),
        }
    }
}

/// The attribute kinds an individual can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndividualAttributeKind {
    /// `CAST`.
    Caste,
    /// `DSCR`.
    PhysicalDescription,
    /// `EDUC`.
    Education,
    /// `IDNO`.
    IdNumber,
    /// `NATI`.
    NationalOrigin,
    /// `NCHI`.
    ChildCount,
    /// `NMR`.
    MarriageCount,
    /// `OCCU`.
    Occupation,
    /// `PROP`.
    Property,
    /// `RELI`.
    Religion,
    /// `RESI`.
    Residence,
    /// `SSN`.
    SocialSecurityNumber,
    /// `TITL`.
    NobilityTitle,
    /// Generic fact (`FACT`, 5.5.1).
    Fact,
}

impl IndividualAttributeKind {
    /// Map a tag to an attribute kind, or `None` for non-attribute tags.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        use IndividualAttributeKind::{
            Caste, ChildCount, Education, Fact, IdNumber, MarriageCount, NationalOrigin,
            NobilityTitle, Occupation, PhysicalDescription, Property, Religion, Residence,
            SocialSecurityNumber,
        };
        let kind = match tag {
            "CAST" => Caste,
            "DSCR" => PhysicalDescription,
            "EDUC" => Education,
            "IDNO" => IdNumber,
            "NATI" => NationalOrigin,
            "NCHI" => ChildCount,
            "NMR" => MarriageCount,
            "OCCU" => Occupation,
            "PROP" => Property,
            "RELI" => Religion,
            "RESI" => Residence,
            "SSN" => SocialSecurityNumber,
            "TITL" => NobilityTitle,
            "FACT" => Fact,
            _ => return None,
        };
        Some(kind)
    }

    /// The tag this kind serializes to.
    #[must_use]
    pub fn as_tag(self) -> &'static str {
        match self {
            IndividualAttributeKind::Caste => "CAST",
            IndividualAttributeKind::PhysicalDescription => "DSCR",
            IndividualAttributeKind::Education => "EDUC",
            IndividualAttributeKind::IdNumber => "IDNO",
            IndividualAttributeKind::NationalOrigin => "NATI",
            IndividualAttributeKind::ChildCount => "NCHI",
            IndividualAttributeKind::MarriageCount => "NMR",
            IndividualAttributeKind::Occupation => "OCCU",
            IndividualAttributeKind::Property => "PROP",
            IndividualAttributeKind::Religion => "RELI",
            IndividualAttributeKind::Residence => "RESI",
            IndividualAttributeKind::SocialSecurityNumber => "SSN",
            IndividualAttributeKind::NobilityTitle => "TITL",
            IndividualAttributeKind::Fact => "FACT",
        }
    }
}

/// One attribute on an individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualAttribute {
    /// Which kind this is.
    pub kind: IndividualAttributeKind,
    /// The attribute value (e.g. the occupation text), continuations folded.
    pub value: Option<String>,
    /// The shared event detail.
    pub detail: EventDetail,
}

impl IndividualAttribute {
    /// A bare attribute of a kind.
    #[must_use]
    pub fn new(kind: IndividualAttributeKind) -> Self {
        IndividualAttribute {
            kind,
            value: None,
            detail: EventDetail::default(),
        }
    }
}

/// Membership in a family as a child (`FAMC`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FamilyChild {
    /// Xref of the family record.
    pub family_xref: String,
    /// Pedigree linkage type (`PEDI`: `birth`, `adopted`, ...).
    pub pedigree: Option<String>,
    /// Child linkage status (`STAT`, 5.5.1).
    pub status: Option<String>,
    /// Attached notes.
    pub notes: Vec<NoteStructure>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

/// Membership in a family as a spouse (`FAMS`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FamilySpouse {
    /// Xref of the family record.
    pub family_xref: String,
    /// Attached notes.
    pub notes: Vec<NoteStructure>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

/// An association with another individual (`ASSO`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Association {
    /// Xref of the associated individual.
    pub xref: String,
    /// Relationship description (`RELA`).
    pub relation: Option<String>,
    /// Source citations.
    pub citations: Vec<Citation>,
    /// Attached notes.
    pub notes: Vec<NoteStructure>,
    /// Unrecognized subtags, preserved.
    pub custom_facts: Vec<CustomFact>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_tag_roundtrip() {
        for tag in [
            "BIRT", "CHR", "DEAT", "BURI", "CREM", "ADOP", "BAPM", "BARM", "BASM", "BLES", "CHRA",
            "CONF", "FCOM", "ORDN", "NATU", "EMIG", "IMMI", "CENS", "PROB", "WILL", "GRAD", "RETI",
            "EVEN",
        ] {
            let kind = IndividualEventKind::from_tag(tag).unwrap();
            assert_eq!(kind.as_tag(), tag);
        }
        assert_eq!(IndividualEventKind::from_tag("NAME"), None);
    }

    #[test]
    fn test_attribute_kind_tag_roundtrip() {
        for tag in [
            "CAST", "DSCR", "EDUC", "IDNO", "NATI", "NCHI", "NMR", "OCCU", "PROP", "RELI", "RESI",
            "SSN", "TITL", "FACT",
        ] {
            let kind = IndividualAttributeKind::from_tag(tag).unwrap();
            assert_eq!(kind.as_tag(), tag);
        }
        assert_eq!(IndividualAttributeKind::from_tag("BIRT"), None);
    }

    #[test]
    fn test_events_of_kind_filters_in_order() {
        let mut indi = Individual::new("@I1@");
        let mut birth = IndividualEvent::new(IndividualEventKind::Birth);
        birth.detail.date = Some("1 JAN 1900".to_string());
        indi.events.push(birth);
        indi.events
            .push(IndividualEvent::new(IndividualEventKind::Census));
        let mut second_census = IndividualEvent::new(IndividualEventKind::Census);
        second_census.detail.date = Some("1910".to_string());
        indi.events.push(second_census);

        let censuses: Vec<_> = indi.events_of_kind(IndividualEventKind::Census).collect();
        assert_eq!(censuses.len(), 2);
        assert_eq!(censuses[1].detail.date.as_deref(), Some("1910"));
    }

    #[test]
    fn test_primary_name() {
        let mut indi = Individual::new("@I1@");
        assert!(indi.primary_name().is_none());
        indi.names.push(PersonalName {
            basic: "John /Doe/".to_string(),
            ..PersonalName::default()
        });
        assert_eq!(indi.primary_name().unwrap().basic, "John /Doe/");
    }
}
