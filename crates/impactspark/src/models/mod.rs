//! Data models for OpenAlex and Crossref entities and dashboard inputs.
//!
//! API schemas use `#[serde(default)]` for optional fields so sparse
//! records still parse; everything is normalized into [`Publication`].

mod author;
mod crossref;
mod enums;
mod inputs;
mod openalex;
mod publication;

pub use author::{Author, ConceptDetail, Institution, SummaryStats};
pub use crossref::{
    CrossrefAffiliation, CrossrefAuthor, CrossrefEnvelope, CrossrefWork, CrossrefWorkList,
    DateParts,
};
pub use enums::{
    AnalysisType, AuthorSortKey, CrossrefSearchKind, ExportFormat, GroupBy, Language,
    PublicationType, ResearchField, ResponseFormat, SearchMethod, SortKey, SortOrder, TimePeriod,
    TrackerMode,
};
pub use inputs::*;
pub use openalex::{
    Authorship, CitationPercentile, Concept, DehydratedAuthor, DehydratedInstitution, Keyword,
    Location, Meta, OpenAccess, Source, Topic, TopicNode, Work, WorksPage,
};
pub use publication::{Publication, UNKNOWN_AUTHOR, normalize_doi};
