//! Heuristic enrichment: industry, L&D signal and a rough headcount, then
//! de-duplication by website domain.

use std::collections::HashSet;

use leadgen_core::Record;

use crate::keywords::{
    INFORMATION_TECHNOLOGY, LD_SIGNAL_KEYWORDS, MID_SIZE_ESTIMATE, NAME_IT_KEYWORDS,
    SIZE_NAME_KEYWORDS, TYPE_INDUSTRY_RULES,
};

/// Industry from type tags first, then from the name; `None` when neither
/// says anything.
#[must_use]
pub fn infer_industry(name: Option<&str>, types: &[String]) -> Option<&'static str> {
    if !types.is_empty() {
        let joined = types.join(" ").to_lowercase();
        if let Some(rule) = TYPE_INDUSTRY_RULES
            .iter()
            .find(|rule| rule.table.matches_lowered(&joined))
        {
            return Some(rule.industry);
        }
    }

    name.filter(|n| NAME_IT_KEYWORDS.matches(n))
        .map(|_| INFORMATION_TECHNOLOGY)
}

/// `true` when the name or website mentions learning, training or HR.
#[must_use]
pub fn has_ld_signals(name: Option<&str>, website: Option<&str>) -> bool {
    let text = format!("{} {}", name.unwrap_or_default(), website.unwrap_or_default());
    LD_SIGNAL_KEYWORDS.matches(&text)
}

/// Placeholder headcount: [`MID_SIZE_ESTIMATE`] for names that sound like a
/// mid-size firm, otherwise unknown.
#[must_use]
pub fn estimate_employees(name: Option<&str>) -> Option<u32> {
    name.filter(|n| SIZE_NAME_KEYWORDS.matches(n))
        .map(|_| MID_SIZE_ESTIMATE)
}

/// Host part of a website for de-duplication: lower-cased, scheme removed,
/// path, query and fragment dropped. `None` when nothing is left.
#[must_use]
pub fn website_domain(website: &str) -> Option<String> {
    let lowered = website.trim().to_lowercase();
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    (!host.is_empty()).then(|| host.to_string())
}

/// Recompute the heuristic fields from name, types and website.
#[must_use]
pub fn enrich_record(mut record: Record) -> Record {
    let name = record.name.as_deref();
    record.industry = infer_industry(name, &record.types).map(str::to_string);
    record.employees_est = estimate_employees(name);
    record.has_ld_signals = has_ld_signals(name, record.website.as_deref());
    record
}

/// Enrich every record and drop later records whose website domain was
/// already seen. Records without a website are always kept.
#[must_use]
pub fn enrich_records(records: Vec<Record>) -> Vec<Record> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(records.len());

    for record in records {
        if let Some(domain) = record.website.as_deref().and_then(website_domain) {
            if !seen.insert(domain.clone()) {
                tracing::debug!(
                    domain = %domain,
                    name = record.name.as_deref().unwrap_or_default(),
                    "dropping duplicate website"
                );
                continue;
            }
        }
        out.push(enrich_record(record));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, website: Option<&str>, types: &[&str]) -> Record {
        Record {
            name: Some(name.to_string()),
            website: website.map(str::to_string),
            types: types.iter().map(|t| (*t).to_string()).collect(),
            city: "Delhi NCR".to_string(),
            ..Record::default()
        }
    }

    #[test]
    fn acme_learning_solutions_is_fully_enriched() {
        let out = enrich_records(vec![record(
            "Acme Learning Solutions",
            Some("https://acmelearning.com"),
            &["school"],
        )]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].industry.as_deref(), Some("Education"));
        assert!(out[0].has_ld_signals);
        assert_eq!(out[0].employees_est, Some(200));
    }

    #[test]
    fn types_win_over_name() {
        let types = vec!["bank".to_string(), "finance".to_string()];
        assert_eq!(
            infer_industry(Some("Cloud Data Software"), &types),
            Some("Financial Services")
        );
    }

    #[test]
    fn education_rule_precedes_healthcare() {
        let types = vec!["university".to_string(), "hospital".to_string()];
        assert_eq!(infer_industry(None, &types), Some("Education"));
    }

    #[test]
    fn name_fallback_finds_it_keywords() {
        let types = vec!["point_of_interest".to_string(), "establishment".to_string()];
        assert_eq!(
            infer_industry(Some("Nimbus Cloud Partners"), &types),
            Some("Information Technology")
        );
        assert_eq!(infer_industry(Some("Corner Cafe"), &types), None);
        assert_eq!(infer_industry(None, &[]), None);
    }

    #[test]
    fn short_it_keywords_match_inside_longer_words() {
        assert_eq!(
            infer_industry(Some("Digital Learning Institute"), &[]),
            Some("Information Technology")
        );
        let types = vec!["city_hall".to_string()];
        assert_eq!(infer_industry(None, &types), Some("Information Technology"));
    }

    #[test]
    fn signal_checks_name_and_website() {
        assert!(has_ld_signals(Some("Bright Minds"), Some("https://brightminds-training.in")));
        assert!(has_ld_signals(Some("Acme HR Services"), None));
        assert!(has_ld_signals(Some("PeopleHR Consulting"), Some("https://peoplehr.in")));
        assert!(!has_ld_signals(Some("Corner Cafe"), Some("https://cafe.example")));
        assert!(!has_ld_signals(None, None));
    }

    #[test]
    fn size_estimate_is_placeholder_only() {
        assert_eq!(estimate_employees(Some("Zen Labs")), Some(200));
        assert_eq!(estimate_employees(Some("Global Traders")), Some(200));
        assert_eq!(estimate_employees(Some("Corner Cafe")), None);
        assert_eq!(estimate_employees(None), None);
    }

    #[test]
    fn domain_normalization() {
        assert_eq!(
            website_domain("https://Acme.com/about").as_deref(),
            Some("acme.com")
        );
        assert_eq!(
            website_domain("HTTP://ACME.COM").as_deref(),
            Some("acme.com")
        );
        assert_eq!(
            website_domain("acme.com?ref=maps").as_deref(),
            Some("acme.com")
        );
        assert_eq!(website_domain("https://"), None);
        assert_eq!(website_domain("  "), None);
    }

    #[test]
    fn same_domain_with_different_casing_and_path_is_dropped() {
        let first = record("Acme One", Some("https://acme.com/"), &[]);
        let second = record("Acme Two", Some("http://ACME.com/contact"), &[]);

        let out = enrich_records(vec![first.clone(), second]);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name.as_deref(), Some("Acme One"));
        assert_eq!(out[0].website, first.website);
    }

    #[test]
    fn records_without_website_never_dedupe() {
        let out = enrich_records(vec![
            record("Same Name", None, &[]),
            record("Same Name", None, &[]),
            record("Blank Site", Some(""), &[]),
        ]);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn order_is_preserved_apart_from_drops() {
        let out = enrich_records(vec![
            record("A", Some("a.com"), &[]),
            record("B", Some("b.com"), &[]),
            record("A again", Some("https://a.com/x"), &[]),
            record("C", None, &[]),
        ]);
        let names: Vec<_> = out.iter().filter_map(|r| r.name.as_deref()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn enrichment_is_idempotent() {
        let input = vec![
            record("Acme Learning Solutions", Some("https://acmelearning.com"), &["school"]),
            record("Acme Duplicate", Some("acmelearning.com/about"), &[]),
            record("Pixel Data Labs", None, &["point_of_interest"]),
            record("Corner Cafe", Some("https://cafe.example"), &["cafe"]),
        ];
        let once = enrich_records(input);
        let twice = enrich_records(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }
}
