//! Enumeration types for API filters and dashboard view parameters.

use serde::{Deserialize, Serialize};

/// Output format for view responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Human-readable Markdown format.
    #[default]
    Markdown,
    /// Machine-readable JSON format.
    Json,
}

impl ResponseFormat {
    /// Check if this is markdown format.
    #[must_use]
    pub const fn is_markdown(self) -> bool {
        matches!(self, Self::Markdown)
    }

    /// Check if this is JSON format.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Export format for result sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values, one row per publication.
    #[default]
    Csv,
    /// Research Information Systems format.
    Ris,
    /// BibTeX format.
    Bibtex,
    /// EndNote format.
    Endnote,
}

impl ExportFormat {
    /// Get the file extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Ris => "ris",
            Self::Bibtex => "bib",
            Self::Endnote => "enw",
        }
    }

    /// Get the MIME type for this format.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Ris => "application/x-research-info-systems",
            Self::Bibtex => "application/x-bibtex",
            Self::Endnote => "application/x-endnote-refer",
        }
    }

    /// Parse a query-string value (`csv`, `ris`, `bibtex`/`bib`, `endnote`/`enw`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "ris" => Some(Self::Ris),
            "bibtex" | "bib" => Some(Self::Bibtex),
            "endnote" | "enw" => Some(Self::Endnote),
            _ => None,
        }
    }
}

/// How the main search interprets its query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMethod {
    /// Full-text topic/keyword search.
    #[default]
    Keyword,
    /// Direct DOI lookup.
    Doi,
}

/// OpenAlex work types offered as filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublicationType {
    /// Journal article.
    Article,
    /// Book.
    Book,
    /// Book chapter.
    BookChapter,
    /// Thesis or dissertation.
    Dissertation,
    /// Preprint.
    PostedContent,
    /// Conference proceedings.
    Proceedings,
    /// Encyclopedia or dictionary entry.
    ReferenceEntry,
    /// Report.
    Report,
    /// Peer review.
    PeerReview,
}

impl PublicationType {
    /// Every type, in dashboard order.
    pub const ALL: [Self; 9] = [
        Self::Article,
        Self::Book,
        Self::BookChapter,
        Self::Dissertation,
        Self::PostedContent,
        Self::Proceedings,
        Self::ReferenceEntry,
        Self::Report,
        Self::PeerReview,
    ];

    /// Value used in the OpenAlex `type` filter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Book => "book",
            Self::BookChapter => "book-chapter",
            Self::Dissertation => "dissertation",
            Self::PostedContent => "posted-content",
            Self::Proceedings => "proceedings",
            Self::ReferenceEntry => "reference-entry",
            Self::Report => "report",
            Self::PeerReview => "peer-review",
        }
    }
}

/// Research fields matched against OpenAlex concept names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResearchField {
    /// Biology.
    Biology,
    /// Chemistry.
    Chemistry,
    /// Computer Science.
    #[serde(rename = "Computer Science")]
    ComputerScience,
    /// Economics.
    Economics,
    /// Engineering.
    Engineering,
    /// Environmental Science.
    #[serde(rename = "Environmental Science")]
    EnvironmentalScience,
    /// Mathematics.
    Mathematics,
    /// Medicine.
    Medicine,
    /// Physics.
    Physics,
    /// Psychology.
    Psychology,
    /// Social Sciences.
    #[serde(rename = "Social Sciences")]
    SocialSciences,
}

impl ResearchField {
    /// Every field, in dashboard order.
    pub const ALL: [Self; 11] = [
        Self::Biology,
        Self::Chemistry,
        Self::ComputerScience,
        Self::Economics,
        Self::Engineering,
        Self::EnvironmentalScience,
        Self::Mathematics,
        Self::Medicine,
        Self::Physics,
        Self::Psychology,
        Self::SocialSciences,
    ];

    /// Concept display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Biology => "Biology",
            Self::Chemistry => "Chemistry",
            Self::ComputerScience => "Computer Science",
            Self::Economics => "Economics",
            Self::Engineering => "Engineering",
            Self::EnvironmentalScience => "Environmental Science",
            Self::Mathematics => "Mathematics",
            Self::Medicine => "Medicine",
            Self::Physics => "Physics",
            Self::Psychology => "Psychology",
            Self::SocialSciences => "Social Sciences",
        }
    }
}

/// Publication languages offered as filters.
///
/// Accepts either the English name or the ISO 639-1 code on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    /// English.
    #[serde(alias = "en")]
    English,
    /// Chinese.
    #[serde(alias = "zh")]
    Chinese,
    /// Spanish.
    #[serde(alias = "es")]
    Spanish,
    /// German.
    #[serde(alias = "de")]
    German,
    /// French.
    #[serde(alias = "fr")]
    French,
    /// Japanese.
    #[serde(alias = "ja")]
    Japanese,
}

impl Language {
    /// Every language, in dashboard order.
    pub const ALL: [Self; 6] =
        [Self::English, Self::Chinese, Self::Spanish, Self::German, Self::French, Self::Japanese];

    /// ISO 639-1 code used by the OpenAlex `language` filter.
    #[must_use]
    pub const fn iso_code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Chinese => "zh",
            Self::Spanish => "es",
            Self::German => "de",
            Self::French => "fr",
            Self::Japanese => "ja",
        }
    }

    /// English name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Chinese => "Chinese",
            Self::Spanish => "Spanish",
            Self::German => "German",
            Self::French => "French",
            Self::Japanese => "Japanese",
        }
    }
}

/// Column used to sort the result table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Citation count.
    #[default]
    Citations,
    /// Publication year.
    Year,
    /// Publication date.
    PublicationDate,
    /// Title (case-insensitive).
    Title,
    /// Field-weighted citation impact.
    Fwci,
    /// Normalized citation percentile.
    CitationPercentile,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Largest first.
    #[default]
    Descending,
    /// Smallest first.
    Ascending,
}

/// Time window for the citation distribution page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePeriod {
    /// No restriction.
    #[default]
    AllTime,
    /// Publication year ≥ current year − 5.
    #[serde(rename = "last_5_years", alias = "last5_years")]
    Last5Years,
    /// Publication year ≥ current year − 10.
    #[serde(rename = "last_10_years", alias = "last10_years")]
    Last10Years,
    /// Explicit `startYear..=endYear`.
    Custom,
}

impl TimePeriod {
    /// Earliest year included, if the period fixes one relative to `current_year`.
    #[must_use]
    pub const fn cutoff_year(self, current_year: i32) -> Option<i32> {
        match self {
            Self::Last5Years => Some(current_year - 5),
            Self::Last10Years => Some(current_year - 10),
            Self::AllTime | Self::Custom => None,
        }
    }
}

/// Grouping variable for distribution views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// One overall group.
    #[default]
    None,
    /// Source/journal, for journals with at least three papers.
    Journal,
    /// Publication year.
    Year,
    /// Work type.
    ArticleType,
}

/// Section of the impact analysis page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    /// Headline metrics, yearly breakdown and most cited.
    #[default]
    Overview,
    /// Author productivity and co-authorship.
    Authors,
    /// Keyword frequency, impact and trends.
    Keywords,
    /// Yearly metrics, citation windows and normalized trends.
    Temporal,
}

/// Sort key for the author table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorSortKey {
    /// Number of publications.
    #[default]
    Publications,
    /// Total citations.
    Citations,
    /// Mean citations per publication.
    AvgCitations,
    /// Author h-index within the result set.
    HIndex,
}

/// Crossref search flavour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossrefSearchKind {
    /// Free-text bibliographic query.
    #[default]
    Query,
    /// `query.author`.
    Author,
    /// Journal title or ISSN.
    Journal,
}

/// Article tracker selection mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerMode {
    /// One article compared against the rest.
    #[default]
    Individual,
    /// A filtered subset of articles.
    Multiple,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_format_default() {
        assert_eq!(ResponseFormat::default(), ResponseFormat::Markdown);
        assert!(ResponseFormat::Markdown.is_markdown());
        assert!(!ResponseFormat::Markdown.is_json());
    }

    #[test]
    fn test_export_format_extensions() {
        assert_eq!(ExportFormat::default(), ExportFormat::Csv);
        assert_eq!(ExportFormat::Ris.extension(), "ris");
        assert_eq!(ExportFormat::Bibtex.extension(), "bib");
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Endnote.extension(), "enw");
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!(ExportFormat::parse("CSV"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("bib"), Some(ExportFormat::Bibtex));
        assert_eq!(ExportFormat::parse("xml"), None);
    }

    #[test]
    fn test_publication_type_serde() {
        let json = serde_json::to_string(&PublicationType::BookChapter).unwrap();
        assert_eq!(json, r#""book-chapter""#);
        for t in PublicationType::ALL {
            let parsed: PublicationType =
                serde_json::from_str(&format!("\"{}\"", t.as_str())).unwrap();
            assert_eq!(parsed, t);
        }
    }

    #[test]
    fn test_research_field_names() {
        let parsed: ResearchField = serde_json::from_str(r#""Computer Science""#).unwrap();
        assert_eq!(parsed, ResearchField::ComputerScience);
        assert_eq!(parsed.display_name(), "Computer Science");
    }

    #[test]
    fn test_language_accepts_name_or_code() {
        let by_name: Language = serde_json::from_str(r#""German""#).unwrap();
        let by_code: Language = serde_json::from_str(r#""de""#).unwrap();
        assert_eq!(by_name, by_code);
        assert_eq!(by_name.iso_code(), "de");
    }

    #[test]
    fn test_time_period_cutoff() {
        assert_eq!(TimePeriod::Last5Years.cutoff_year(2024), Some(2019));
        assert_eq!(TimePeriod::AllTime.cutoff_year(2024), None);
    }
}
