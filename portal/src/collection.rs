//! Collections.
//!
//! ## Revisions
//!
//! A collection is identified by its ID together with its visibility.
//! The PRIVATE row is the draft that the owner edits, the PUBLIC row is
//! the published revision. Publishing replaces the PUBLIC revision with
//! the contents of the draft and removes the draft.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PortalError, PortalResult};

/// The visibility of a collection revision.
///
/// Stored as a plain string since it is part of composite keys.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    /// The published revision.
    #[default]
    Public,

    /// The draft revision, only visible to its owner.
    Private,
}

/// The kind of an external link attached to a collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum))]
#[cfg_attr(feature = "database", sea_orm(rs_type = "String", db_type = "Text"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkType {
    #[cfg_attr(feature = "database", sea_orm(string_value = "DOI"))]
    Doi,

    #[cfg_attr(feature = "database", sea_orm(string_value = "RAW_DATA"))]
    RawData,

    #[cfg_attr(feature = "database", sea_orm(string_value = "PROTOCOL"))]
    Protocol,

    #[cfg_attr(feature = "database", sea_orm(string_value = "LAB_WEBSITE"))]
    LabWebsite,

    #[cfg_attr(feature = "database", sea_orm(string_value = "OTHER"))]
    Other,

    #[cfg_attr(feature = "database", sea_orm(string_value = "DATA_SOURCE"))]
    DataSource,
}

impl Visibility {
    /// Returns the canonical string representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Private => "PRIVATE",
        }
    }
}

impl FromStr for Visibility {
    type Err = PortalError;

    fn from_str(s: &str) -> PortalResult<Self> {
        match s {
            "PUBLIC" => Ok(Self::Public),
            "PRIVATE" => Ok(Self::Private),
            _ => Err(PortalError::InvalidVisibility {
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_round_trip() {
        assert_eq!(Visibility::Public, "PUBLIC".parse().unwrap());
        assert_eq!(Visibility::Private, "PRIVATE".parse().unwrap());
        assert_eq!("PRIVATE", Visibility::Private.to_string());

        assert_eq!(
            Err(PortalError::InvalidVisibility {
                value: "public".to_string()
            }),
            "public".parse::<Visibility>(),
        );
    }

    #[test]
    fn test_visibility_serde() {
        assert_eq!(
            "\"PUBLIC\"",
            serde_json::to_string(&Visibility::Public).unwrap()
        );
        assert_eq!(
            LinkType::RawData,
            serde_json::from_str::<LinkType>("\"RAW_DATA\"").unwrap()
        );
    }
}
