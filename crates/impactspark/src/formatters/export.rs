//! Reference manager export (CSV, RIS, BibTeX, EndNote).

use crate::models::{ExportFormat, Publication};

/// CSV columns, in order.
pub const CSV_COLUMNS: [&str; 22] = [
    "title",
    "authors",
    "year",
    "publication_date",
    "source",
    "institutions",
    "country_codes",
    "citations",
    "cited_by",
    "related_count",
    "fwci",
    "citation_percentile",
    "h_index_contribution",
    "type",
    "topic",
    "subfield",
    "field",
    "domain",
    "open_access_status",
    "doi",
    "doi_url",
    "abstract",
];

/// Download filename for an export.
#[must_use]
pub fn export_filename(format: ExportFormat) -> String {
    format!("impactspark_results.{}", format.extension())
}

/// Render publications in the requested format.
#[must_use]
pub fn export_publications(publications: &[Publication], format: ExportFormat) -> String {
    match format {
        ExportFormat::Csv => format_csv(publications),
        ExportFormat::Ris => format_ris(publications),
        ExportFormat::Bibtex => format_bibtex(publications),
        ExportFormat::Endnote => format_endnote(publications),
    }
}

fn single_line(text: &str) -> String {
    text.replace('\r', "").replace('\n', " ")
}

/// RIS entry type for a work type.
fn ris_type(work_type: &str) -> &'static str {
    match work_type {
        "book" => "BOOK",
        "book-chapter" => "CHAP",
        "dissertation" => "THES",
        "proceedings" | "proceedings-article" => "CONF",
        "report" => "RPRT",
        _ => "JOUR",
    }
}

/// Format publications as RIS.
fn format_ris(publications: &[Publication]) -> String {
    let mut output = String::new();

    for publication in publications {
        output.push_str(&format!("TY  - {}\n", ris_type(&publication.work_type)));
        output.push_str(&format!("TI  - {}\n", publication.title));

        for author in &publication.authors {
            output.push_str(&format!("AU  - {author}\n"));
        }

        if let Some(year) = publication.year {
            output.push_str(&format!("PY  - {year}\n"));
        }
        if let Some(date) = publication.publication_date {
            output.push_str(&format!("DA  - {}\n", date.format("%Y/%m/%d")));
        }
        if !publication.source.is_empty() {
            output.push_str(&format!("JO  - {}\n", publication.source));
        }
        for keyword in &publication.keywords {
            output.push_str(&format!("KW  - {keyword}\n"));
        }
        if let Some(abs) = &publication.abstract_text {
            output.push_str(&format!("AB  - {}\n", single_line(abs)));
        }
        if let Some(doi) = &publication.doi {
            output.push_str(&format!("DO  - {doi}\n"));
        }
        if let Some(url) = publication.doi_url() {
            output.push_str(&format!("UR  - {url}\n"));
        }

        output.push_str(&format!("ID  - {}\n", publication.id));
        output.push_str("ER  - \n\n");
    }

    output
}

/// BibTeX citation key: last name of the first author plus year.
fn bibtex_key(publication: &Publication, used: &mut Vec<String>) -> String {
    let last_name: String = publication
        .authors
        .first()
        .and_then(|a| a.split_whitespace().last())
        .unwrap_or("Unknown")
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    let base = format!(
        "{}{}",
        if last_name.is_empty() { "Unknown" } else { &last_name },
        publication.year.unwrap_or(0)
    );

    // a..z, then numbered
    let mut key = base.clone();
    let mut n = 0usize;
    while used.contains(&key) {
        key = match u8::try_from(n).ok().filter(|i| *i < 26) {
            Some(i) => format!("{base}{}", char::from(b'a' + i)),
            None => format!("{base}_{}", n - 25),
        };
        n += 1;
    }
    used.push(key.clone());
    key
}

/// Format publications as BibTeX.
fn format_bibtex(publications: &[Publication]) -> String {
    let mut output = String::new();
    let mut used = Vec::with_capacity(publications.len());

    for publication in publications {
        let key = bibtex_key(publication, &mut used);

        output.push_str(&format!("@article{{{key},\n"));
        output.push_str(&format!("  title = {{{}}},\n", escape_bibtex(&publication.title)));
        output.push_str(&format!(
            "  author = {{{}}},\n",
            escape_bibtex(&publication.authors.join(" and "))
        ));

        if let Some(year) = publication.year {
            output.push_str(&format!("  year = {{{year}}},\n"));
        }
        if !publication.source.is_empty() {
            output.push_str(&format!("  journal = {{{}}},\n", escape_bibtex(&publication.source)));
        }
        if let Some(abs) = &publication.abstract_text {
            output.push_str(&format!("  abstract = {{{}}},\n", escape_bibtex(abs)));
        }
        if let Some(doi) = &publication.doi {
            output.push_str(&format!("  doi = {{{doi}}},\n"));
        }
        output.push_str(&format!("  note = {{Cited by {}}},\n", publication.citations));

        output.push_str("}\n\n");
    }

    output
}

/// Format publications as CSV with a header row.
fn format_csv(publications: &[Publication]) -> String {
    let mut output = CSV_COLUMNS.join(",");
    output.push('\n');

    for p in publications {
        let fields: [String; 22] = [
            p.title.clone(),
            p.authors_joined(),
            p.year.map(|y| y.to_string()).unwrap_or_default(),
            p.publication_date.map(|d| d.to_string()).unwrap_or_default(),
            p.source.clone(),
            p.institutions.join(", "),
            p.country_codes.join(", "),
            p.citations.to_string(),
            p.cited_by().to_string(),
            p.related_count.to_string(),
            p.fwci.to_string(),
            p.citation_percentile.to_string(),
            p.h_index_contribution().to_string(),
            p.work_type.clone(),
            p.topic.clone(),
            p.subfield.clone(),
            p.field.clone(),
            p.domain.clone(),
            p.open_access_status().to_string(),
            p.doi.clone().unwrap_or_default(),
            p.doi_url().unwrap_or_default(),
            p.abstract_text.clone().unwrap_or_default(),
        ];
        let row: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
        output.push_str(&row.join(","));
        output.push('\n');
    }

    output
}

/// Format publications as EndNote.
fn format_endnote(publications: &[Publication]) -> String {
    let mut output = String::new();

    for publication in publications {
        output.push_str("%0 Journal Article\n");
        output.push_str(&format!("%T {}\n", publication.title));

        for author in &publication.authors {
            output.push_str(&format!("%A {author}\n"));
        }
        if let Some(year) = publication.year {
            output.push_str(&format!("%D {year}\n"));
        }
        if !publication.source.is_empty() {
            output.push_str(&format!("%J {}\n", publication.source));
        }
        for keyword in &publication.keywords {
            output.push_str(&format!("%K {keyword}\n"));
        }
        if let Some(abs) = &publication.abstract_text {
            output.push_str(&format!("%X {}\n", single_line(abs)));
        }
        if let Some(doi) = &publication.doi {
            output.push_str(&format!("%R {doi}\n"));
        }
        if let Some(url) = publication.doi_url() {
            output.push_str(&format!("%U {url}\n"));
        }

        output.push('\n');
    }

    output
}

/// Escape a string for BibTeX output.
fn escape_bibtex(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '{' | '}' | '&' | '%' | '$' | '#' | '_' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn is_formula(s: &str) -> bool {
    s.starts_with(['=', '+', '-', '@'])
}

/// Escape a field for CSV output.
///
/// Fields that a spreadsheet would evaluate as a formula get a leading quote.
fn csv_escape(s: &str) -> String {
    let guarded = if is_formula(s) { format!("'{s}") } else { s.to_string() };
    if guarded.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", guarded.replace('"', "\"\""))
    } else {
        guarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Publication {
        Publication {
            id: "https://openalex.org/W1".into(),
            title: "Graphs, Trees & More".into(),
            authors: vec!["Ada Lovelace".into(), "Alan Turing".into()],
            year: Some(2020),
            source: "Nature".into(),
            citations: 12,
            doi: Some("10.1/x".into()),
            abstract_text: Some("Line one\nline two".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_csv_header_and_quoting() {
        let csv = export_publications(&[sample()], ExportFormat::Csv);
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), CSV_COLUMNS.join(","));
        let row = lines.next().unwrap();
        assert!(row.starts_with("\"Graphs, Trees & More\",\"Ada Lovelace, Alan Turing\",2020,"));
        assert!(row.contains("https://doi.org/10.1/x"));
    }

    #[test]
    fn test_csv_formula_guard() {
        assert_eq!(csv_escape("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(csv_escape("-1,2"), "\"'-1,2\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("plain"), "plain");
    }

    #[test]
    fn test_ris() {
        let ris = export_publications(&[sample()], ExportFormat::Ris);
        assert!(ris.starts_with("TY  - JOUR\n"));
        assert!(ris.contains("AU  - Alan Turing\n"));
        assert!(ris.contains("AB  - Line one line two\n"));
        assert!(ris.contains("DO  - 10.1/x\n"));
        assert!(ris.trim_end().ends_with("ER  -"));
    }

    #[test]
    fn test_bibtex_keys_unique() {
        let bib = export_publications(&[sample(), sample()], ExportFormat::Bibtex);
        assert!(bib.contains("@article{Lovelace2020,"));
        assert!(bib.contains("@article{Lovelace2020a,"));
        assert!(bib.contains("title = {Graphs, Trees \\& More}"));
        assert!(bib.contains("author = {Ada Lovelace and Alan Turing}"));
    }

    #[test]
    fn test_bibtex_escaping_single_pass() {
        assert_eq!(escape_bibtex("A\\B"), "A\\textbackslash{}B");
        assert_eq!(escape_bibtex("{x}_1 & 50%"), "\\{x\\}\\_1 \\& 50\\%");
        assert_eq!(escape_bibtex("a^b~c"), "a\\textasciicircum{}b\\textasciitilde{}c");

        let mut publication = sample();
        publication.title = "A\\B".into();
        let bib = export_publications(&[publication], ExportFormat::Bibtex);
        assert!(bib.contains("title = {A\\textbackslash{}B},"));
    }

    #[test]
    fn test_bibtex_keys_past_alphabet() {
        let publications = vec![sample(); 30];
        let bib = export_publications(&publications, ExportFormat::Bibtex);
        let keys: Vec<&str> = bib
            .lines()
            .filter_map(|l| l.strip_prefix("@article{"))
            .map(|l| l.trim_end_matches(','))
            .collect();
        assert_eq!(keys.len(), 30);
        let unique: std::collections::HashSet<&str> = keys.iter().copied().collect();
        assert_eq!(unique.len(), 30);
        assert_eq!(keys[26], "Lovelace2020z");
        assert_eq!(keys[27], "Lovelace2020_1");
        assert_eq!(keys[29], "Lovelace2020_3");
    }

    #[test]
    fn test_endnote() {
        let enw = export_publications(&[sample()], ExportFormat::Endnote);
        assert!(enw.starts_with("%0 Journal Article\n%T Graphs, Trees & More\n"));
        assert!(enw.contains("%R 10.1/x\n"));
    }

    #[test]
    fn test_filename() {
        assert_eq!(export_filename(ExportFormat::Csv), "impactspark_results.csv");
    }
}
