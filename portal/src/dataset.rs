//! Datasets and their artifacts.

use serde::{Deserialize, Serialize};

/// A human-readable label paired with an ontology term.
///
/// For example, `{"label": "Homo sapiens", "ontology_term_id": "NCBITaxon:9606"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyTerm {
    pub label: String,
    pub ontology_term_id: String,
}

/// The file format of a dataset artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum))]
#[cfg_attr(feature = "database", sea_orm(rs_type = "String", db_type = "Text"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtifactFileType {
    /// AnnData.
    #[cfg_attr(feature = "database", sea_orm(string_value = "H5AD"))]
    H5ad,

    /// Seurat.
    #[cfg_attr(feature = "database", sea_orm(string_value = "RDS"))]
    Rds,

    /// Loom.
    #[cfg_attr(feature = "database", sea_orm(string_value = "LOOM"))]
    Loom,

    /// The explorer's TileDB-based format.
    #[cfg_attr(feature = "database", sea_orm(string_value = "CXG"))]
    Cxg,
}

/// Where an artifact came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum))]
#[cfg_attr(feature = "database", sea_orm(rs_type = "String", db_type = "Text"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtifactType {
    /// The file as submitted.
    #[cfg_attr(feature = "database", sea_orm(string_value = "ORIGINAL"))]
    Original,

    /// A file derived from the original by conversion.
    #[cfg_attr(feature = "database", sea_orm(string_value = "REMIX"))]
    Remix,
}
