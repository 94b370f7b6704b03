//! County FIPS code utilities.
//!
//! A county FIPS code is five digits: the two-digit state code followed by
//! the three-digit county code. North Carolina is state `37`, and its 100
//! counties use the odd county codes `001` through `199` in alphabetical
//! order. State codes map to abbreviations and names via [`STATES`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Two-digit FIPS code for North Carolina.
pub const NC_STATE_FIPS: &str = "37";

/// `(state FIPS, abbreviation, name)` for the 50 states and DC.
pub const STATES: &[(&str, &str, &str)] = &[
    ("01", "AL", "Alabama"),
    ("02", "AK", "Alaska"),
    ("04", "AZ", "Arizona"),
    ("05", "AR", "Arkansas"),
    ("06", "CA", "California"),
    ("08", "CO", "Colorado"),
    ("09", "CT", "Connecticut"),
    ("10", "DE", "Delaware"),
    ("11", "DC", "District of Columbia"),
    ("12", "FL", "Florida"),
    ("13", "GA", "Georgia"),
    ("15", "HI", "Hawaii"),
    ("16", "ID", "Idaho"),
    ("17", "IL", "Illinois"),
    ("18", "IN", "Indiana"),
    ("19", "IA", "Iowa"),
    ("20", "KS", "Kansas"),
    ("21", "KY", "Kentucky"),
    ("22", "LA", "Louisiana"),
    ("23", "ME", "Maine"),
    ("24", "MD", "Maryland"),
    ("25", "MA", "Massachusetts"),
    ("26", "MI", "Michigan"),
    ("27", "MN", "Minnesota"),
    ("28", "MS", "Mississippi"),
    ("29", "MO", "Missouri"),
    ("30", "MT", "Montana"),
    ("31", "NE", "Nebraska"),
    ("32", "NV", "Nevada"),
    ("33", "NH", "New Hampshire"),
    ("34", "NJ", "New Jersey"),
    ("35", "NM", "New Mexico"),
    ("36", "NY", "New York"),
    ("37", "NC", "North Carolina"),
    ("38", "ND", "North Dakota"),
    ("39", "OH", "Ohio"),
    ("40", "OK", "Oklahoma"),
    ("41", "OR", "Oregon"),
    ("42", "PA", "Pennsylvania"),
    ("44", "RI", "Rhode Island"),
    ("45", "SC", "South Carolina"),
    ("46", "SD", "South Dakota"),
    ("47", "TN", "Tennessee"),
    ("48", "TX", "Texas"),
    ("49", "UT", "Utah"),
    ("50", "VT", "Vermont"),
    ("51", "VA", "Virginia"),
    ("53", "WA", "Washington"),
    ("54", "WV", "West Virginia"),
    ("55", "WI", "Wisconsin"),
    ("56", "WY", "Wyoming"),
];

/// The 100 North Carolina counties as `(county code, name)` pairs.
pub const NC_COUNTIES: &[(&str, &str)] = &[
    ("001", "Alamance"),
    ("003", "Alexander"),
    ("005", "Alleghany"),
    ("007", "Anson"),
    ("009", "Ashe"),
    ("011", "Avery"),
    ("013", "Beaufort"),
    ("015", "Bertie"),
    ("017", "Bladen"),
    ("019", "Brunswick"),
    ("021", "Buncombe"),
    ("023", "Burke"),
    ("025", "Cabarrus"),
    ("027", "Caldwell"),
    ("029", "Camden"),
    ("031", "Carteret"),
    ("033", "Caswell"),
    ("035", "Catawba"),
    ("037", "Chatham"),
    ("039", "Cherokee"),
    ("041", "Chowan"),
    ("043", "Clay"),
    ("045", "Cleveland"),
    ("047", "Columbus"),
    ("049", "Craven"),
    ("051", "Cumberland"),
    ("053", "Currituck"),
    ("055", "Dare"),
    ("057", "Davidson"),
    ("059", "Davie"),
    ("061", "Duplin"),
    ("063", "Durham"),
    ("065", "Edgecombe"),
    ("067", "Forsyth"),
    ("069", "Franklin"),
    ("071", "Gaston"),
    ("073", "Gates"),
    ("075", "Graham"),
    ("077", "Granville"),
    ("079", "Greene"),
    ("081", "Guilford"),
    ("083", "Halifax"),
    ("085", "Harnett"),
    ("087", "Haywood"),
    ("089", "Henderson"),
    ("091", "Hertford"),
    ("093", "Hoke"),
    ("095", "Hyde"),
    ("097", "Iredell"),
    ("099", "Jackson"),
    ("101", "Johnston"),
    ("103", "Jones"),
    ("105", "Lee"),
    ("107", "Lenoir"),
    ("109", "Lincoln"),
    ("111", "McDowell"),
    ("113", "Macon"),
    ("115", "Madison"),
    ("117", "Martin"),
    ("119", "Mecklenburg"),
    ("121", "Mitchell"),
    ("123", "Montgomery"),
    ("125", "Moore"),
    ("127", "Nash"),
    ("129", "New Hanover"),
    ("131", "Northampton"),
    ("133", "Onslow"),
    ("135", "Orange"),
    ("137", "Pamlico"),
    ("139", "Pasquotank"),
    ("141", "Pender"),
    ("143", "Perquimans"),
    ("145", "Person"),
    ("147", "Pitt"),
    ("149", "Polk"),
    ("151", "Randolph"),
    ("153", "Richmond"),
    ("155", "Robeson"),
    ("157", "Rockingham"),
    ("159", "Rowan"),
    ("161", "Rutherford"),
    ("163", "Sampson"),
    ("165", "Scotland"),
    ("167", "Stanly"),
    ("169", "Stokes"),
    ("171", "Surry"),
    ("173", "Swain"),
    ("175", "Transylvania"),
    ("177", "Tyrrell"),
    ("179", "Union"),
    ("181", "Vance"),
    ("183", "Wake"),
    ("185", "Warren"),
    ("187", "Washington"),
    ("189", "Watauga"),
    ("191", "Wayne"),
    ("193", "Wilkes"),
    ("195", "Wilson"),
    ("197", "Yadkin"),
    ("199", "Yancey"),
];

/// Two-letter abbreviation for a two-digit state FIPS code.
#[must_use]
pub fn state_abbr(state_fips: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(fips, _, _)| *fips == state_fips)
        .map(|(_, abbr, _)| *abbr)
}

/// Full state name for a two-digit state FIPS code.
#[must_use]
pub fn state_name(state_fips: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(fips, _, _)| *fips == state_fips)
        .map(|(_, _, name)| *name)
}

/// Error returned when a string is not a well-formed five-digit county FIPS
/// code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid county FIPS code '{value}': expected 5 digits")]
pub struct InvalidFipsError {
    /// The rejected input.
    pub value: String,
}

/// A validated five-digit county FIPS code (e.g. `"37183"` for Wake County).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CountyFips(String);

impl CountyFips {
    /// Parses and validates a county FIPS code.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFipsError`] unless the trimmed input is exactly five
    /// ASCII digits.
    pub fn new(value: &str) -> Result<Self, InvalidFipsError> {
        let trimmed = value.trim();
        if trimmed.len() == 5 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(InvalidFipsError {
                value: value.to_string(),
            })
        }
    }

    /// The full five-digit code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The two-digit state portion.
    #[must_use]
    pub fn state_fips(&self) -> &str {
        &self.0[..2]
    }

    /// The three-digit county portion.
    #[must_use]
    pub fn county_code(&self) -> &str {
        &self.0[2..]
    }

    /// Whether this code belongs to North Carolina.
    #[must_use]
    pub fn is_north_carolina(&self) -> bool {
        self.state_fips() == NC_STATE_FIPS
    }

    /// Two-letter abbreviation of the county's state.
    #[must_use]
    pub fn state_abbr(&self) -> Option<&'static str> {
        state_abbr(self.state_fips())
    }

    /// Name of the county if it is one of the 100 North Carolina counties.
    #[must_use]
    pub fn nc_county_name(&self) -> Option<&'static str> {
        if !self.is_north_carolina() {
            return None;
        }
        NC_COUNTIES
            .iter()
            .find(|(code, _)| *code == self.county_code())
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for CountyFips {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CountyFips {
    type Err = InvalidFipsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CountyFips {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for CountyFips {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CountyFips {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// Looks up a North Carolina county's FIPS code by name (case-insensitive,
/// an optional trailing "County" is ignored).
#[must_use]
pub fn nc_fips_for_name(name: &str) -> Option<CountyFips> {
    let wanted = name.trim();
    let wanted = wanted
        .strip_suffix(" County")
        .or_else(|| wanted.strip_suffix(" county"))
        .unwrap_or(wanted);
    NC_COUNTIES
        .iter()
        .find(|(_, n)| n.eq_ignore_ascii_case(wanted))
        .map(|(code, _)| CountyFips(format!("{NC_STATE_FIPS}{code}")))
}
