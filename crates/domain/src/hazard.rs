// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Hazard suitability flags.
//!
//! Each shelter records, per disaster kind, whether it is designated for that
//! kind. Source data frequently leaves cells blank, so every flag is
//! tri-state and blank is kept distinct from an explicit "no".

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A single tri-state hazard designation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardFlag {
    /// The source did not say.
    #[default]
    Unknown,
    /// Explicitly not designated.
    No,
    /// Designated for this hazard.
    Yes,
}

impl HazardFlag {
    /// Converts the stored nullable integer into a flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither NULL, 0 nor 1.
    pub const fn from_db(value: Option<i32>) -> Result<Self, DomainError> {
        match value {
            None => Ok(Self::Unknown),
            Some(0) => Ok(Self::No),
            Some(1) => Ok(Self::Yes),
            Some(other) => Err(DomainError::InvalidHazardFlag(other)),
        }
    }

    /// Returns the nullable integer representation used in storage.
    #[must_use]
    pub const fn to_db(self) -> Option<i32> {
        match self {
            Self::Unknown => None,
            Self::No => Some(0),
            Self::Yes => Some(1),
        }
    }

    /// Returns true only for an explicit designation.
    #[must_use]
    pub const fn is_yes(self) -> bool {
        matches!(self, Self::Yes)
    }
}

/// The eight disaster kinds a shelter can be designated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    Flood,
    Landslide,
    HighTide,
    Earthquake,
    Tsunami,
    Fire,
    InlandFlooding,
    Volcano,
}

impl HazardKind {
    /// Every kind, in the column order of the public shelter datasets.
    pub const ALL: [Self; 8] = [
        Self::Flood,
        Self::Landslide,
        Self::HighTide,
        Self::Earthquake,
        Self::Tsunami,
        Self::Fire,
        Self::InlandFlooding,
        Self::Volcano,
    ];

    /// The column header used for this kind in the national shelter CSV format.
    #[must_use]
    pub const fn source_column(self) -> &'static str {
        match self {
            Self::Flood => "災害種別_洪水",
            Self::Landslide => "災害種別_崖崩れ、土石流及び地滑り",
            Self::HighTide => "災害種別_高潮",
            Self::Earthquake => "災害種別_地震",
            Self::Tsunami => "災害種別_津波",
            Self::Fire => "災害種別_大規模な火事",
            Self::InlandFlooding => "災害種別_内水氾濫",
            Self::Volcano => "災害種別_火山現象",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flood => "flood",
            Self::Landslide => "landslide",
            Self::HighTide => "high_tide",
            Self::Earthquake => "earthquake",
            Self::Tsunami => "tsunami",
            Self::Fire => "fire",
            Self::InlandFlooding => "inland_flooding",
            Self::Volcano => "volcano",
        }
    }
}

/// The full set of hazard designations for one shelter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardFlags {
    pub flood: HazardFlag,
    pub landslide: HazardFlag,
    pub high_tide: HazardFlag,
    pub earthquake: HazardFlag,
    pub tsunami: HazardFlag,
    pub fire: HazardFlag,
    pub inland_flooding: HazardFlag,
    pub volcano: HazardFlag,
}

impl HazardFlags {
    /// All eight flags set to the same value.
    #[must_use]
    pub const fn uniform(flag: HazardFlag) -> Self {
        Self {
            flood: flag,
            landslide: flag,
            high_tide: flag,
            earthquake: flag,
            tsunami: flag,
            fire: flag,
            inland_flooding: flag,
            volcano: flag,
        }
    }

    #[must_use]
    pub const fn get(&self, kind: HazardKind) -> HazardFlag {
        match kind {
            HazardKind::Flood => self.flood,
            HazardKind::Landslide => self.landslide,
            HazardKind::HighTide => self.high_tide,
            HazardKind::Earthquake => self.earthquake,
            HazardKind::Tsunami => self.tsunami,
            HazardKind::Fire => self.fire,
            HazardKind::InlandFlooding => self.inland_flooding,
            HazardKind::Volcano => self.volcano,
        }
    }

    pub const fn set(&mut self, kind: HazardKind, flag: HazardFlag) {
        match kind {
            HazardKind::Flood => self.flood = flag,
            HazardKind::Landslide => self.landslide = flag,
            HazardKind::HighTide => self.high_tide = flag,
            HazardKind::Earthquake => self.earthquake = flag,
            HazardKind::Tsunami => self.tsunami = flag,
            HazardKind::Fire => self.fire = flag,
            HazardKind::InlandFlooding => self.inland_flooding = flag,
            HazardKind::Volcano => self.volcano = flag,
        }
    }

    /// Kinds explicitly designated `Yes`, in canonical order.
    #[must_use]
    pub fn designated(&self) -> Vec<HazardKind> {
        HazardKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind).is_yes())
            .collect()
    }
}
