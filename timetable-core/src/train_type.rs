//! Train type classification.
//!
//! Train types arrive as raw identifiers such as
//! `odpt.TrainType:JR-East.ChuoSpecialRapid` or as whatever a user typed
//! (`Local`, `special-rapid`). They are reduced to a fixed set of display
//! buckets, each with one color and a sort priority.

use std::fmt;

use tracing::debug;

/// Display color of a train type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrainTypeColor {
    White,
    YellowGreen,
    Yellow,
    Orange,
    Pink,
    LightBlue,
}

impl TrainTypeColor {
    /// RGB hex, without a leading `#`.
    pub fn hex(&self) -> &'static str {
        match self {
            TrainTypeColor::White => "FFFFFF",
            TrainTypeColor::YellowGreen => "9ACD32",
            TrainTypeColor::Yellow => "FFD700",
            TrainTypeColor::Orange => "FF8C00",
            TrainTypeColor::Pink => "FF69B4",
            TrainTypeColor::LightBlue => "87CEFA",
        }
    }
}

/// Known train type buckets.
///
/// Declaration order is display order; [`TrainTypeBucket::Unknown`] is last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrainTypeBucket {
    Local,
    // Rapid family
    SemiRapid,
    Rapid,
    SectionRapid,
    CommuterRapid,
    RegionalRapid,
    // Express family
    SectionSemiExpress,
    SemiExpress,
    CommuterSemiExpress,
    SectionExpress,
    Express,
    CommuterExpress,
    RapidExpress,
    // Special rapid and limited-access family
    SpecialRapid,
    CommuterSpecialRapid,
    ChuoSpecialRapid,
    OmeSpecialRapid,
    RapidLimitedExpress,
    AccessExpress,
    AirportRapidLimitedExpress,
    // Limited express family
    SemiSpecialExpress,
    SpecialExpress,
    LimitedExpress,
    CommuterLimitedExpress,
    Skyliner,
    // Paid liner family
    Liner,
    HomeLiner,
    MorningLiner,
    EveningLiner,
    TjLiner,
    SLiner,
    KeioLiner,
    Unknown,
}

impl TrainTypeBucket {
    const KNOWN: [TrainTypeBucket; 32] = [
        TrainTypeBucket::Local,
        TrainTypeBucket::SemiRapid,
        TrainTypeBucket::Rapid,
        TrainTypeBucket::SectionRapid,
        TrainTypeBucket::CommuterRapid,
        TrainTypeBucket::RegionalRapid,
        TrainTypeBucket::SectionSemiExpress,
        TrainTypeBucket::SemiExpress,
        TrainTypeBucket::CommuterSemiExpress,
        TrainTypeBucket::SectionExpress,
        TrainTypeBucket::Express,
        TrainTypeBucket::CommuterExpress,
        TrainTypeBucket::RapidExpress,
        TrainTypeBucket::SpecialRapid,
        TrainTypeBucket::CommuterSpecialRapid,
        TrainTypeBucket::ChuoSpecialRapid,
        TrainTypeBucket::OmeSpecialRapid,
        TrainTypeBucket::RapidLimitedExpress,
        TrainTypeBucket::AccessExpress,
        TrainTypeBucket::AirportRapidLimitedExpress,
        TrainTypeBucket::SemiSpecialExpress,
        TrainTypeBucket::SpecialExpress,
        TrainTypeBucket::LimitedExpress,
        TrainTypeBucket::CommuterLimitedExpress,
        TrainTypeBucket::Skyliner,
        TrainTypeBucket::Liner,
        TrainTypeBucket::HomeLiner,
        TrainTypeBucket::MorningLiner,
        TrainTypeBucket::EveningLiner,
        TrainTypeBucket::TjLiner,
        TrainTypeBucket::SLiner,
        TrainTypeBucket::KeioLiner,
    ];

    /// The bucket name, matching the ODPT identifier suffix.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainTypeBucket::Local => "Local",
            TrainTypeBucket::SemiRapid => "SemiRapid",
            TrainTypeBucket::Rapid => "Rapid",
            TrainTypeBucket::SectionRapid => "SectionRapid",
            TrainTypeBucket::CommuterRapid => "CommuterRapid",
            TrainTypeBucket::RegionalRapid => "RegionalRapid",
            TrainTypeBucket::SectionSemiExpress => "SectionSemiExpress",
            TrainTypeBucket::SemiExpress => "SemiExpress",
            TrainTypeBucket::CommuterSemiExpress => "CommuterSemiExpress",
            TrainTypeBucket::SectionExpress => "SectionExpress",
            TrainTypeBucket::Express => "Express",
            TrainTypeBucket::CommuterExpress => "CommuterExpress",
            TrainTypeBucket::RapidExpress => "RapidExpress",
            TrainTypeBucket::SpecialRapid => "SpecialRapid",
            TrainTypeBucket::CommuterSpecialRapid => "CommuterSpecialRapid",
            TrainTypeBucket::ChuoSpecialRapid => "ChuoSpecialRapid",
            TrainTypeBucket::OmeSpecialRapid => "OmeSpecialRapid",
            TrainTypeBucket::RapidLimitedExpress => "RapidLimitedExpress",
            TrainTypeBucket::AccessExpress => "AccessExpress",
            TrainTypeBucket::AirportRapidLimitedExpress => "AirportRapidLimitedExpress",
            TrainTypeBucket::SemiSpecialExpress => "SemiSpecialExpress",
            TrainTypeBucket::SpecialExpress => "SpecialExpress",
            TrainTypeBucket::LimitedExpress => "LimitedExpress",
            TrainTypeBucket::CommuterLimitedExpress => "CommuterLimitedExpress",
            TrainTypeBucket::Skyliner => "Skyliner",
            TrainTypeBucket::Liner => "Liner",
            TrainTypeBucket::HomeLiner => "HomeLiner",
            TrainTypeBucket::MorningLiner => "MorningLiner",
            TrainTypeBucket::EveningLiner => "EveningLiner",
            TrainTypeBucket::TjLiner => "TJLiner",
            TrainTypeBucket::SLiner => "SLiner",
            TrainTypeBucket::KeioLiner => "KeioLiner",
            TrainTypeBucket::Unknown => "Unknown",
        }
    }

    pub fn color(&self) -> TrainTypeColor {
        use TrainTypeBucket::*;
        match self {
            Local | Unknown => TrainTypeColor::White,
            SectionSemiExpress | SemiExpress | CommuterSemiExpress | SectionExpress | Express
            | CommuterExpress | RapidExpress => TrainTypeColor::YellowGreen,
            SemiRapid | Rapid | SectionRapid | CommuterRapid | RegionalRapid => {
                TrainTypeColor::Yellow
            }
            SpecialRapid | CommuterSpecialRapid | ChuoSpecialRapid | OmeSpecialRapid
            | RapidLimitedExpress | AccessExpress | AirportRapidLimitedExpress => {
                TrainTypeColor::Orange
            }
            SemiSpecialExpress | SpecialExpress | LimitedExpress | CommuterLimitedExpress
            | Skyliner => TrainTypeColor::Pink,
            Liner | HomeLiner | MorningLiner | EveningLiner | TjLiner | SLiner | KeioLiner => {
                TrainTypeColor::LightBlue
            }
        }
    }

    /// Sort key for display lists; unknown sorts last.
    pub fn priority(&self) -> u8 {
        match self {
            TrainTypeBucket::Unknown => u8::MAX,
            known => *known as u8,
        }
    }
}

impl fmt::Display for TrainTypeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase the final identifier component and drop separators.
fn normalize(raw: &str) -> String {
    let last = raw.rsplit('.').next().unwrap_or(raw);
    let last = last.rsplit(':').next().unwrap_or(last);
    last.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Classify a raw train type identifier.
///
/// # Examples
///
/// ```
/// use timetable_core::train_type::{classify, TrainTypeBucket, TrainTypeColor};
///
/// let b = classify("odpt.TrainType:JR-East.ChuoSpecialRapid");
/// assert_eq!(b, TrainTypeBucket::ChuoSpecialRapid);
/// assert_eq!(b.color(), TrainTypeColor::Orange);
///
/// assert_eq!(classify("limited_express"), TrainTypeBucket::LimitedExpress);
/// assert_eq!(classify("Hovercraft"), TrainTypeBucket::Unknown);
/// ```
pub fn classify(raw: &str) -> TrainTypeBucket {
    let normalized = normalize(raw);
    let found = TrainTypeBucket::KNOWN
        .into_iter()
        .find(|b| b.as_str().to_ascii_lowercase() == normalized);
    match found {
        Some(bucket) => bucket,
        None => {
            debug!(train_type = raw, "unrecognised train type");
            TrainTypeBucket::Unknown
        }
    }
}

/// Sort priority of a raw train type.
pub fn priority(raw: &str) -> u8 {
    classify(raw).priority()
}

/// Sort train types by priority then alphabetically, dropping duplicates.
pub fn sort_train_types(types: &mut Vec<String>) {
    types.sort_by(|a, b| priority(a).cmp(&priority(b)).then_with(|| a.cmp(b)));
    types.dedup();
}
