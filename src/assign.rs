//! Region-assignment drivers: append region columns to the locations list,
//! fill missing regions in the store database export, validate existing
//! assignments, and print distribution reports.

use crate::dataset::{
    self, is_missing_region, DatasetError, LocationRecord, RawLocationRecord, StoreRecord,
};
use crate::region::RegionClassifier;
use std::collections::HashMap;
use std::path::Path;

// ─── add-regions ────────────────────────────────────────────────

/// Classify one pre-region locations row into the nine-column shape.
/// The locations list predates international rows, so the country is US.
pub fn assign_row(raw: &RawLocationRecord, classifier: &RegionClassifier) -> LocationRecord {
    let country = "US";
    let region = classifier.classify(country, raw.state.trim(), raw.city.trim());
    LocationRecord {
        store_name: raw.store_name.clone(),
        address: raw.address.clone(),
        city: raw.city.clone(),
        state: raw.state.clone(),
        zipcode: raw.zipcode.clone(),
        phone: raw.phone.clone(),
        url: raw.url.clone(),
        country: country.to_string(),
        region,
    }
}

/// Append `Country` and `Region` columns to a seven-column locations CSV.
pub fn add_regions<P: AsRef<Path>>(input: P, output: P) -> Result<(), DatasetError> {
    eprintln!("Adding regions to store locations");
    eprintln!("=================================");

    let raw = dataset::read_raw_location_records(&input)?;
    eprintln!("Processing {} locations...", raw.len());

    let classifier = RegionClassifier::new();
    let mut records = Vec::with_capacity(raw.len());
    for (i, row) in raw.iter().enumerate() {
        let record = assign_row(row, &classifier);
        let n = i + 1;
        if n <= 5 || n % 50 == 0 {
            eprintln!(
                "  {}: {} ({}, {}) -> {}",
                n, record.store_name, record.city, record.state, record.region
            );
        }
        records.push(record);
    }

    dataset::write_location_records(&output, &records)?;
    eprintln!();
    eprintln!("Processed {} locations", records.len());
    eprintln!("Output saved to {}", output.as_ref().display());

    print_location_distribution(&records);
    Ok(())
}

fn print_location_distribution(records: &[LocationRecord]) {
    let mut by_country: HashMap<&str, usize> = HashMap::new();
    let mut by_region: HashMap<&str, usize> = HashMap::new();
    for r in records {
        *by_country.entry(r.country.as_str()).or_default() += 1;
        *by_region.entry(r.region.as_str()).or_default() += 1;
    }

    eprintln!();
    eprintln!("Regional distribution");
    eprintln!("---------------------");
    eprintln!("By country:");
    for (country, count) in sorted_desc(by_country) {
        eprintln!("  {}: {} locations", country, count);
    }
    eprintln!("By region:");
    for (region, count) in sorted_desc(by_region) {
        eprintln!("  {}: {} locations", region, count);
    }
}

// ─── fill-regions ───────────────────────────────────────────────

pub struct FillSummary {
    pub updated: usize,
    pub already_assigned: usize,
}

/// Fill empty/NULL region cells in place; rows that already carry a region
/// are left untouched.
pub fn fill_missing_regions(
    records: &mut [StoreRecord],
    classifier: &RegionClassifier,
) -> FillSummary {
    let mut summary = FillSummary {
        updated: 0,
        already_assigned: 0,
    };
    for record in records {
        if is_missing_region(&record.region_code) {
            record.region_code = classifier.classify(
                record.country.trim(),
                record.state.trim(),
                record.city.trim(),
            );
            summary.updated += 1;
        } else {
            summary.already_assigned += 1;
        }
    }
    summary
}

/// Read the store export, assign regions where missing, write a new file.
pub fn fill_regions<P: AsRef<Path>>(input: P, output: P) -> Result<FillSummary, DatasetError> {
    eprintln!("Assigning regions to store locations...");

    let mut records = dataset::read_store_records(&input)?;
    let classifier = RegionClassifier::new();
    let summary = fill_missing_regions(&mut records, &classifier);
    dataset::write_store_records(&output, &records)?;

    eprintln!("Processing complete");
    eprintln!("  Updated:             {} locations", summary.updated);
    eprintln!("  Already had regions: {} locations", summary.already_assigned);
    eprintln!("  Output file:         {}", output.as_ref().display());
    Ok(summary)
}

// ─── validate ───────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
pub enum IssueKind {
    MissingRegion,
    Mismatch { current: String, expected: String },
}

#[derive(Debug)]
pub struct Issue {
    /// 1-based CSV line (header is line 1).
    pub line: usize,
    pub name: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub kind: IssueKind,
}

/// Re-derive every row's region and collect rows that disagree.
pub fn find_issues(records: &[StoreRecord], classifier: &RegionClassifier) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (i, record) in records.iter().enumerate() {
        let line = i + 2;
        let region = record.region_code.trim();

        if is_missing_region(region) {
            issues.push(Issue {
                line,
                name: record.loc_name.clone(),
                country: record.country.clone(),
                state: record.state.clone(),
                city: record.city.clone(),
                kind: IssueKind::MissingRegion,
            });
            continue;
        }

        let expected = classifier.classify(
            record.country.trim(),
            record.state.trim(),
            record.city.trim(),
        );
        if region != expected {
            issues.push(Issue {
                line,
                name: record.loc_name.clone(),
                country: record.country.clone(),
                state: record.state.clone(),
                city: record.city.clone(),
                kind: IssueKind::Mismatch {
                    current: region.to_string(),
                    expected,
                },
            });
        }
    }
    issues
}

/// Validate a store export and print the first issues found.
pub fn validate<P: AsRef<Path>>(input: P) -> Result<Vec<Issue>, DatasetError> {
    eprintln!("Validating regional assignments");
    eprintln!("===============================");

    let records = dataset::read_store_records(&input)?;
    let classifier = RegionClassifier::new();
    let issues = find_issues(&records, &classifier);
    let validated = records.len() - issues.len();

    eprintln!("Validated:    {} locations", validated);
    eprintln!("Issues found: {}", issues.len());

    if !issues.is_empty() {
        eprintln!();
        eprintln!("Issues detected:");
        for issue in issues.iter().take(10) {
            match &issue.kind {
                IssueKind::MissingRegion => eprintln!(
                    "  line {}: {} ({}, {}, {}) - missing region",
                    issue.line, issue.name, issue.city, issue.state, issue.country
                ),
                IssueKind::Mismatch { current, expected } => eprintln!(
                    "  line {}: {} - region \"{}\" should be \"{}\"",
                    issue.line, issue.name, current, expected
                ),
            }
        }
        if issues.len() > 10 {
            eprintln!("  ... and {} more issues", issues.len() - 10);
        }
    }

    Ok(issues)
}

// ─── report / reference ─────────────────────────────────────────

/// Per-country and per-(country, region) counts for a store export.
pub fn distribution(records: &[StoreRecord]) -> (Vec<(String, usize)>, Vec<(String, Vec<(String, usize)>)>) {
    let mut by_country: HashMap<String, usize> = HashMap::new();
    let mut by_region: HashMap<String, HashMap<String, usize>> = HashMap::new();

    for record in records {
        let country = or_unknown(&record.country);
        let region = if is_missing_region(&record.region_code) {
            "NULL".to_string()
        } else {
            record.region_code.trim().to_string()
        };
        *by_country.entry(country.clone()).or_default() += 1;
        *by_region.entry(country).or_default().entry(region).or_insert(0) += 1;
    }

    let countries = sorted_desc(by_country);
    let mut regions: Vec<(String, Vec<(String, usize)>)> = by_region
        .into_iter()
        .map(|(country, counts)| (country, sorted_desc(counts)))
        .collect();
    regions.sort_by(|a, b| a.0.cmp(&b.0));
    (countries, regions)
}

fn or_unknown(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() {
        "Unknown".to_string()
    } else {
        v.to_string()
    }
}

fn sorted_desc<K: Ord>(counts: HashMap<K, usize>) -> Vec<(K, usize)> {
    let mut entries: Vec<(K, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}

/// Print the regional distribution report for a store export.
pub fn report<P: AsRef<Path>>(input: P) -> Result<(), DatasetError> {
    eprintln!("Regional distribution report");
    eprintln!("============================");

    let records = dataset::read_store_records(&input)?;
    let classifier = RegionClassifier::new();
    let (countries, regions) = distribution(&records);

    eprintln!();
    eprintln!("Locations by country:");
    for (country, count) in &countries {
        eprintln!("  {}: {} locations", country, count);
    }

    eprintln!();
    eprintln!("Regional breakdown:");
    for (country, counts) in &regions {
        eprintln!();
        eprintln!("{}:", country);
        for (region, count) in counts {
            eprintln!(
                "  {} ({}): {} locations",
                region,
                classifier.region_name(country, region),
                count
            );
        }
    }
    Ok(())
}

/// Print the full region mapping table.
pub fn reference() {
    eprintln!("Regional reference guide");
    eprintln!("========================");

    let classifier = RegionClassifier::new();
    for country in classifier.countries() {
        eprintln!();
        eprintln!("{}:", country.country);
        for region in country.regions {
            eprintln!("  {} - {}", region.code, region.name);
            if !region.members.is_empty() {
                eprintln!("    States/Provinces: {}", region.members.join(", "));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(country: &str, state: &str, city: &str, region: &str) -> StoreRecord {
        StoreRecord {
            loc_name: format!("{} {}", city, state),
            city: city.to_string(),
            state: state.to_string(),
            country: country.to_string(),
            region_code: region.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_assign_row_is_us_scoped() {
        let classifier = RegionClassifier::new();
        let raw = RawLocationRecord {
            store_name: "Downtown".into(),
            city: "Seattle".into(),
            state: "WA".into(),
            ..Default::default()
        };
        let record = assign_row(&raw, &classifier);
        assert_eq!(record.country, "US");
        assert_eq!(record.region, "NW");
    }

    #[test]
    fn test_assign_row_california_uses_city() {
        let classifier = RegionClassifier::new();
        let raw = RawLocationRecord {
            city: "San Diego".into(),
            state: "CA".into(),
            ..Default::default()
        };
        assert_eq!(assign_row(&raw, &classifier).region, "SD");
    }

    #[test]
    fn test_fill_only_touches_missing() {
        let classifier = RegionClassifier::new();
        let mut records = vec![
            store("US", "TX", "Austin", ""),
            store("US", "NY", "Albany", "NULL"),
            store("US", "WA", "Seattle", "NW"),
            store("JP", "Osaka", "Osaka", "  "),
        ];
        let summary = fill_missing_regions(&mut records, &classifier);
        assert_eq!(summary.updated, 3);
        assert_eq!(summary.already_assigned, 1);
        assert_eq!(records[0].region_code, "TE");
        assert_eq!(records[1].region_code, "NE");
        assert_eq!(records[2].region_code, "NW");
        assert_eq!(records[3].region_code, "JP-KI");
    }

    #[test]
    fn test_find_issues() {
        let classifier = RegionClassifier::new();
        let records = vec![
            store("US", "TX", "Austin", "TE"),   // fine
            store("US", "TX", "Austin", "NULL"), // missing
            store("US", "TX", "Austin", "NE"),   // mismatch
        ];
        let issues = find_issues(&records, &classifier);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].line, 3);
        assert_eq!(issues[0].kind, IssueKind::MissingRegion);
        assert_eq!(
            issues[1].kind,
            IssueKind::Mismatch {
                current: "NE".into(),
                expected: "TE".into()
            }
        );
    }

    #[test]
    fn test_distribution_counts() {
        let records = vec![
            store("US", "TX", "Austin", "TE"),
            store("US", "TX", "Houston", "TE"),
            store("US", "NY", "Albany", "NE"),
            store("JP", "Tokyo", "Tokyo", ""),
        ];
        let (countries, regions) = distribution(&records);
        assert_eq!(countries[0], ("US".to_string(), 3));
        assert_eq!(countries[1], ("JP".to_string(), 1));

        let us = regions.iter().find(|(c, _)| c == "US").unwrap();
        assert_eq!(us.1[0], ("TE".to_string(), 2));
        let jp = regions.iter().find(|(c, _)| c == "JP").unwrap();
        assert_eq!(jp.1[0], ("NULL".to_string(), 1));
    }
}
