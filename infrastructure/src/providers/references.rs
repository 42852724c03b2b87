//! Reference search prompt and response parsing
//!
//! The search model is asked for a JSON array of publications. Its answer
//! is screened twice: entries that look made up are dropped, and the rest
//! are marked verified only if they carry enough bibliographic detail.

use chrono::Datelike;
use regex::Regex;
use roundtable_domain::{Reference, Role, Topic};
use serde::Deserialize;
use std::sync::LazyLock;

const MIN_TITLE_CHARS: usize = 10;
const VERIFIED_TITLE_CHARS: std::ops::RangeInclusive<usize> = 15..=200;
const EARLIEST_YEAR: i32 = 1950;
/// Relevance given to an entry that comes without a score
const DEFAULT_RELEVANCE: f32 = 7.0;

const PLACEHOLDER_TITLES: [&str; 5] = [
    "example paper",
    "sample study",
    "hypothetical research",
    "placeholder",
    "lorem ipsum",
];
const PLACEHOLDER_SOURCES: [&str; 3] = ["sample journal", "example publication", "test journal"];

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(1[89]\d{2}|2\d{3})\b").expect("static regex"));

/// One entry as the search model writes it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawReference {
    pub title: String,
    pub authors: Vec<String>,
    #[serde(alias = "abstract")]
    pub summary: String,
    pub published_date: String,
    pub key_findings: String,
    pub relevance_score: Option<f32>,
    pub source: String,
    pub url: String,
}

/// Messages asking for references supporting `role` on `topic`
pub fn search_prompt(role: &Role, topic: &Topic, max_results: usize) -> (String, String) {
    let system = "You are a research librarian. You only cite publications you are \
                  confident exist, and you answer with JSON only."
        .to_string();
    let user = format!(
        "Find up to {max} published studies, reports or papers that a {title} could cite \
         on the topic below.\n\n\
         Topic: {topic}\n\
         Search focus: {query}\n\n\
         Answer with a JSON array. Each element has the fields: \
         \"title\", \"authors\" (array of names), \"abstract\", \"published_date\", \
         \"key_findings\", \"relevance_score\" (0 to 10), \"source\" (journal or publisher), \
         \"url\".\n\
         If you are not sure a publication exists, leave it out. Return [] if nothing fits.",
        max = max_results,
        title = role.title,
        topic = topic.as_str(),
        query = role.focused_query(topic.as_str()),
    );
    (system, user)
}

/// The JSON array between the first `[` and the last `]`
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse and screen a search answer, best first, at most `max_results`.
pub fn parse_references(text: &str, max_results: usize) -> Result<Vec<Reference>, String> {
    let Some(array) = extract_json_array(text) else {
        return Err("no JSON array in search response".to_string());
    };
    let raw: Vec<RawReference> = serde_json::from_str(array).map_err(|e| e.to_string())?;

    let mut references: Vec<Reference> = raw
        .into_iter()
        .filter(|r| !looks_fabricated(r))
        .map(into_reference)
        .collect();
    references.sort_by(|a, b| {
        b.verified
            .cmp(&a.verified)
            .then(b.relevance.total_cmp(&a.relevance))
    });
    references.truncate(max_results);
    Ok(references)
}

/// Placeholder titles, missing or dummy authors, and test venues
pub fn looks_fabricated(raw: &RawReference) -> bool {
    let title = raw.title.trim().to_lowercase();
    if title.chars().count() < MIN_TITLE_CHARS {
        return true;
    }
    if PLACEHOLDER_TITLES.iter().any(|p| title.contains(p)) {
        return true;
    }

    let authors: Vec<&str> = raw
        .authors
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();
    if authors.is_empty() {
        return true;
    }
    if authors.iter().any(|a| {
        let lower = a.to_lowercase();
        a.chars().count() < 3 || lower.starts_with("author") || lower == "john doe"
    }) {
        return true;
    }

    let source = raw.source.trim().to_lowercase();
    PLACEHOLDER_SOURCES.iter().any(|s| source.contains(s))
}

/// Enough detail to trust the entry
pub fn looks_authentic(raw: &RawReference, current_year: i32) -> bool {
    let title_len = raw.title.trim().chars().count();
    if !VERIFIED_TITLE_CHARS.contains(&title_len) {
        return false;
    }
    if raw.authors.iter().all(|a| a.trim().is_empty()) {
        return false;
    }
    if raw.summary.trim().is_empty() && raw.key_findings.trim().is_empty() {
        return false;
    }
    if !raw.published_date.trim().is_empty() {
        let plausible = YEAR
            .captures(&raw.published_date)
            .and_then(|c| c[1].parse::<i32>().ok())
            .is_some_and(|year| (EARLIEST_YEAR..=current_year).contains(&year));
        if !plausible {
            return false;
        }
    }
    raw.source.trim().chars().count() >= 3
}

/// Score on the 0-10 scale. Answers between 0 and 1 are read as fractions.
fn relevance_out_of_ten(score: Option<f32>) -> f32 {
    match score {
        Some(score) if score.is_nan() => DEFAULT_RELEVANCE,
        Some(score) if score > 0.0 && score <= 1.0 => score * 10.0,
        Some(score) => score.clamp(0.0, 10.0),
        None => DEFAULT_RELEVANCE,
    }
}

fn into_reference(raw: RawReference) -> Reference {
    let verified = looks_authentic(&raw, chrono::Utc::now().year());
    let summary = if raw.key_findings.trim().is_empty() {
        raw.summary.trim().to_string()
    } else {
        raw.key_findings.trim().to_string()
    };

    let mut reference = Reference::new(raw.title.trim())
        .with_authors(raw.authors.iter().map(|a| a.trim()).filter(|a| !a.is_empty()))
        .with_source(raw.source.trim(), raw.published_date.trim())
        .with_summary(summary)
        .with_relevance(relevance_out_of_ten(raw.relevance_score));
    reference.url = raw.url.trim().to_string();
    if verified {
        reference = reference.verified();
    }
    reference
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::RetrievalPayload;

    fn raw(title: &str) -> RawReference {
        RawReference {
            title: title.to_string(),
            authors: vec!["Nicholas Stern".to_string()],
            summary: "Estimates the cost of unmitigated warming.".to_string(),
            published_date: "2007-01-01".to_string(),
            key_findings: String::new(),
            relevance_score: Some(0.8),
            source: "Cambridge University Press".to_string(),
            url: String::new(),
        }
    }

    #[test]
    fn test_extract_json_array_from_prose() {
        let text = "Here you go:\n[{\"title\": \"a\"}]\nHope this helps [sic].";
        assert_eq!(
            extract_json_array(text),
            Some("[{\"title\": \"a\"}]\nHope this helps [sic]")
        );
        assert_eq!(extract_json_array("no array here"), None);
        assert_eq!(extract_json_array("] backwards ["), None);
    }

    #[test]
    fn test_placeholder_entries_are_fabricated() {
        assert!(looks_fabricated(&raw("Short")));
        assert!(looks_fabricated(&raw("An Example Paper on Carbon Pricing")));

        let mut no_authors = raw("The Economics of Climate Change");
        no_authors.authors.clear();
        assert!(looks_fabricated(&no_authors));

        let mut dummy_author = raw("The Economics of Climate Change");
        dummy_author.authors = vec!["Author1".to_string()];
        assert!(looks_fabricated(&dummy_author));

        let mut test_venue = raw("The Economics of Climate Change");
        test_venue.source = "Test Journal of Things".to_string();
        assert!(looks_fabricated(&test_venue));

        assert!(!looks_fabricated(&raw("The Economics of Climate Change")));
    }

    #[test]
    fn test_authenticity_checks() {
        let good = raw("The Economics of Climate Change");
        assert!(looks_authentic(&good, 2026));

        let mut future = good.clone();
        future.published_date = "2031".to_string();
        assert!(!looks_authentic(&future, 2026));

        let mut ancient = good.clone();
        ancient.published_date = "1901".to_string();
        assert!(!looks_authentic(&ancient, 2026));

        let mut undated = good.clone();
        undated.published_date = String::new();
        assert!(looks_authentic(&undated, 2026));

        let mut no_body = good.clone();
        no_body.summary = String::new();
        assert!(!looks_authentic(&no_body, 2026));

        let mut short_title = good.clone();
        short_title.title = "Climate Costs".to_string();
        assert!(!looks_authentic(&short_title, 2026));

        let mut bare_source = good;
        bare_source.source = "X".to_string();
        assert!(!looks_authentic(&bare_source, 2026));
    }

    #[test]
    fn test_parse_references_filters_and_orders() {
        let text = r#"Sure:
[
  {"title": "Sample Study of Nothing Much", "authors": ["A. Smith"], "source": "Nature"},
  {"title": "Carbon taxes and emissions", "authors": ["Jane Roe"], "source": "Energy Policy",
   "relevance_score": 0.95},
  {"title": "The Economics of Climate Change", "authors": ["Nicholas Stern"],
   "abstract": "Review of costs.", "published_date": "2007", "source": "Cambridge University Press",
   "relevance_score": 0.6, "url": "https://example.org/stern"}
]"#;
        let refs = parse_references(text, 5).unwrap();
        assert_eq!(refs.len(), 2);
        // Verified entries first, even when less relevant
        assert_eq!(refs[0].title, "The Economics of Climate Change");
        assert!(refs[0].verified);
        assert_eq!(refs[0].summary, "Review of costs.");
        assert_eq!(refs[0].url, "https://example.org/stern");
        assert!(!refs[1].verified);

        let capped = parse_references(text, 1).unwrap();
        assert_eq!(capped.len(), 1);
    }

    #[test]
    fn test_relevance_is_reported_out_of_ten() {
        let text = r#"[
  {"title": "The Economics of Climate Change", "authors": ["Nicholas Stern"],
   "abstract": "Review of costs.", "published_date": "2007",
   "source": "Cambridge University Press", "relevance_score": 0.8},
  {"title": "Carbon Pricing and Household Welfare", "authors": ["Jane Roe"],
   "abstract": "Distributional effects.", "published_date": "2019",
   "source": "Energy Policy", "relevance_score": 9},
  {"title": "Emissions Trading in Practice", "authors": ["Tom Tietenberg"],
   "abstract": "Lessons from cap and trade.", "published_date": "2006",
   "source": "Resources for the Future"}
]"#;
        let refs = parse_references(text, 5).unwrap();
        let scores: Vec<(&str, f32)> = refs
            .iter()
            .map(|r| (r.title.as_str(), r.relevance))
            .collect();
        assert_eq!(scores[0].0, "Carbon Pricing and Household Welfare");
        assert!((scores[0].1 - 9.0).abs() < 1e-4);
        assert_eq!(scores[1].0, "The Economics of Climate Change");
        assert!((scores[1].1 - 8.0).abs() < 1e-4);
        assert_eq!(scores[2].0, "Emissions Trading in Practice");
        assert!((scores[2].1 - DEFAULT_RELEVANCE).abs() < 1e-4);

        let payload = RetrievalPayload::new(refs, 5);
        let text = payload.as_prompt_text();
        assert!(text.contains("Relevance: 9/10"));
        assert!(text.contains("Relevance: 8/10"));
        assert!(text.contains("Relevance: 7/10"));
    }

    #[test]
    fn test_relevance_out_of_ten() {
        assert_eq!(relevance_out_of_ten(Some(0.0)), 0.0);
        assert_eq!(relevance_out_of_ten(Some(1.0)), 10.0);
        assert_eq!(relevance_out_of_ten(Some(6.5)), 6.5);
        assert_eq!(relevance_out_of_ten(Some(42.0)), 10.0);
        assert_eq!(relevance_out_of_ten(Some(-3.0)), 0.0);
        assert_eq!(relevance_out_of_ten(Some(f32::NAN)), DEFAULT_RELEVANCE);
        assert_eq!(relevance_out_of_ten(None), DEFAULT_RELEVANCE);
    }

    #[test]
    fn test_parse_references_errors() {
        assert!(parse_references("I could not find anything.", 3).is_err());
        assert!(parse_references("[{not json}]", 3).is_err());
        assert!(parse_references("[]", 3).unwrap().is_empty());
    }

    #[test]
    fn test_search_prompt_mentions_focus() {
        let role = Role::new("economist", "Economist", "persona", "david")
            .with_title("Economic Analyst")
            .with_focus_keywords(["cost-benefit"]);
        let topic = Topic::new("carbon tax").unwrap();
        let (_system, user) = search_prompt(&role, &topic, 3);
        assert!(user.contains("up to 3"));
        assert!(user.contains("Economic Analyst"));
        assert!(user.contains("carbon tax cost-benefit"));
    }
}
