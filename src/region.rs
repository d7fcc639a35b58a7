//! Region classification for store locations.
//!
//! A static country → region → membership-token table plus a small decision
//! procedure mapping (country, state, city) to a region code. California is
//! special-cased: its stores are split into Bay Area / Los Angeles /
//! San Diego by city-name substring matching rather than by state token.

// ─── Region table ───────────────────────────────────────────────

/// One region within a country: code, display name, member tokens.
///
/// Member tokens are state/province abbreviations or full names; the
/// vocabulary is country-specific and deliberately not normalized.
pub struct RegionDef {
    pub code: &'static str,
    pub name: &'static str,
    pub members: &'static [&'static str],
}

/// All regions of one country, in lookup order.
pub struct CountryRegions {
    pub country: &'static str,
    pub regions: &'static [RegionDef],
}

/// The region mapping table. Slice order is lookup order: the first region
/// whose member set contains the state wins, and the first region is the
/// default when no member set matches.
pub const REGION_TABLE: &[CountryRegions] = &[
    CountryRegions {
        country: "US",
        regions: &[
            RegionDef {
                code: "NE",
                name: "Northeast",
                members: &[
                    "CT", "DC", "DE", "MA", "MD", "ME", "NH", "NJ", "NY", "PA",
                    "RI", "VA", "VT", "WV",
                ],
            },
            RegionDef {
                code: "SE",
                name: "Southeast",
                members: &["AL", "FL", "GA", "KY", "MS", "NC", "PR", "SC", "TN"],
            },
            RegionDef {
                code: "MW",
                name: "Midwest",
                members: &[
                    "IA", "IL", "IN", "KS", "MI", "MN", "MO", "ND", "NE", "OH",
                    "SD", "WI",
                ],
            },
            RegionDef {
                code: "NW",
                name: "Northwest",
                members: &["AK", "ID", "MT", "OR", "WA"],
            },
            RegionDef {
                code: "TE",
                name: "Texas",
                members: &["AR", "LA", "OK", "TX"],
            },
            // The CA-* placeholder tokens are never matched directly; stores
            // in California route through the city sub-classifier instead.
            RegionDef {
                code: "BA",
                name: "Bay Area",
                members: &["CA-BAY"],
            },
            RegionDef {
                code: "LA",
                name: "Los Angeles",
                members: &["CA-LA", "HI"],
            },
            RegionDef {
                code: "SD",
                name: "San Diego",
                members: &["CA-SD"],
            },
            RegionDef {
                code: "SW",
                name: "Southwest",
                members: &["AZ", "CO", "NM", "NV", "UT", "WY"],
            },
            RegionDef {
                code: "CC",
                name: "Central California",
                members: &["CA-OTHER"],
            },
        ],
    },
    CountryRegions {
        country: "CA",
        regions: &[
            RegionDef {
                code: "EC",
                name: "Eastern Canada",
                members: &["NB", "NL", "NS", "PE", "QC"],
            },
            RegionDef {
                code: "WC",
                name: "Western Canada",
                members: &["BC"],
            },
            RegionDef {
                code: "CB",
                name: "Central Canada",
                members: &["AB", "SK", "MB"],
            },
            RegionDef {
                code: "ON",
                name: "Ontario & Territories",
                members: &["ON", "NU", "NT", "YT"],
            },
        ],
    },
    CountryRegions {
        country: "MX",
        regions: &[
            RegionDef {
                code: "MX-NO",
                name: "Northern Mexico",
                members: &[
                    "Baja California Norte", "Baja California Sur", "Chihuahua",
                    "Sonora", "Sinaloa",
                ],
            },
            RegionDef {
                code: "MX-CE",
                name: "Central Mexico",
                members: &[
                    "Aguascalientes", "Coahuila", "Distrito Federal", "Durango",
                    "Guanajuato", "Hidalgo", "Jalisco", "Mexico", "Michoacan",
                    "Morelos", "Nayarit", "Nuevo Leon", "Puebla", "Queretaro",
                    "San Luis Potosi", "Tamaulipas", "Tlaxcala", "Zacatecas",
                ],
            },
            RegionDef {
                code: "MX-SU",
                name: "Southern Mexico",
                members: &[
                    "Campeche", "Chiapas", "Guerrero", "Oaxaca", "Quintana Roo",
                    "Tabasco", "Veracruz", "Yucatan",
                ],
            },
        ],
    },
    CountryRegions {
        country: "JP",
        regions: &[
            RegionDef {
                code: "JP-KA",
                name: "Kanto Region",
                members: &[
                    "Tokyo", "Kanagawa", "Chiba", "Saitama", "Gunma", "Tochigi",
                    "Ibaraki",
                ],
            },
            RegionDef {
                code: "JP-KI",
                name: "Kansai Region",
                members: &[
                    "Osaka", "Kyoto", "Hyogo", "Nara", "Wakayama", "Shiga", "Mie",
                ],
            },
            RegionDef {
                code: "JP-CH",
                name: "Chubu Region",
                members: &["Aichi", "Gifu", "Shizuoka", "Nagano", "Yamanashi"],
            },
            RegionDef {
                code: "JP-KY",
                name: "Kyushu Region",
                members: &[
                    "Fukuoka", "Kumamoto", "Kagoshima", "Saga", "Nagasaki",
                    "Oita", "Miyazaki",
                ],
            },
            RegionDef {
                code: "JP-TO",
                name: "Tohoku/Chugoku",
                members: &["Hiroshima", "Okayama", "Yamaguchi", "Shimane", "Tottori"],
            },
            RegionDef {
                code: "JP-HO",
                name: "Hokkaido",
                members: &["Hokkaido"],
            },
            RegionDef {
                code: "JP-OT",
                name: "Other Regions",
                members: &["Hitachinaka"],
            },
        ],
    },
    CountryRegions {
        country: "KO",
        regions: &[
            RegionDef {
                code: "KO-SE",
                name: "Seoul Metro",
                members: &["Seoul", "Gyeonggi Province", "Incheon"],
            },
            RegionDef {
                code: "KO-BS",
                name: "Busan/Southeast",
                members: &["Busan", "Ulsan", "Gyeongsangnam-do", "Gyeongsangbuk-do"],
            },
            RegionDef {
                code: "KO-CE",
                name: "Central Korea",
                members: &[
                    "Daejeon", "Daegu", "Chungcheongnam-do", "Chungcheongbuk-do",
                ],
            },
        ],
    },
    CountryRegions {
        country: "TW",
        regions: &[
            RegionDef {
                code: "TW-NO",
                name: "Northern Taiwan",
                members: &["Taipei", "New Taipei", "Taoyuan", "Hsinchu"],
            },
            RegionDef {
                code: "TW-CE",
                name: "Central Taiwan",
                members: &["Taichung", "Changhua", "Nantou"],
            },
            RegionDef {
                code: "TW-SO",
                name: "Southern Taiwan",
                members: &["Kaohsiung", "Tainan", "Pingtung", "Chiayi"],
            },
            RegionDef {
                code: "TW-EA",
                name: "Eastern Taiwan",
                members: &["Hualien", "Taitung", "Yilan"],
            },
        ],
    },
    CountryRegions {
        country: "AU",
        regions: &[
            RegionDef {
                code: "AU-EA",
                name: "Eastern Australia",
                members: &["New South Wales", "ACT", "Queensland"],
            },
            RegionDef {
                code: "AU-SO",
                name: "Southern Australia",
                members: &["Victoria", "Tasmania", "South Australia"],
            },
            RegionDef {
                code: "AU-WE",
                name: "Western Australia",
                members: &["Western Australia", "Northern Territory"],
            },
        ],
    },
    CountryRegions {
        country: "GB",
        regions: &[RegionDef {
            code: "UK",
            name: "United Kingdom",
            members: &["England", "Scotland", "Wales", "Northern Ireland"],
        }],
    },
    CountryRegions {
        country: "ES",
        regions: &[RegionDef {
            code: "ES",
            name: "Spain",
            members: &["Madrid", "Barcelona", "Sevilla", "Valencia"],
        }],
    },
    CountryRegions {
        country: "FR",
        regions: &[RegionDef {
            code: "FR",
            name: "France",
            members: &["Paris", "Lyon", "Marseille"],
        }],
    },
    CountryRegions {
        country: "CH",
        regions: &[RegionDef {
            code: "CH",
            name: "Switzerland",
            members: &["Zurich", "Geneva", "Basel"],
        }],
    },
    CountryRegions {
        country: "IS",
        regions: &[RegionDef {
            code: "IS",
            name: "Iceland",
            members: &["Kauptun", "Reykjavik"],
        }],
    },
    CountryRegions {
        country: "NZ",
        regions: &[RegionDef {
            code: "NZ",
            name: "New Zealand",
            members: &["Auckland", "Wellington", "Christchurch"],
        }],
    },
];

// ─── California city index ──────────────────────────────────────

/// Cities grouped under one California sub-region code.
pub struct CityArea {
    pub code: &'static str,
    pub cities: &'static [&'static str],
}

/// California sub-regions, scanned in order. Matching is uppercase
/// substring containment, not equality: "NORTH HOLLYWOOD" matches the
/// "HOLLYWOOD" token. First list wins.
pub const CALIFORNIA_AREAS: &[CityArea] = &[
    CityArea {
        code: "BA",
        cities: &[
            "SAN FRANCISCO", "SAN JOSE", "OAKLAND", "FREMONT", "HAYWARD",
            "MOUNTAIN VIEW", "SUNNYVALE", "SANTA CLARA", "FOSTER CITY",
            "REDWOOD CITY", "NOVATO", "DANVILLE", "LIVERMORE", "ANTIOCH",
            "CONCORD", "FAIRFIELD", "VACAVILLE", "VALLEJO", "RICHMOND",
            "SAN LEANDRO", "NEWARK", "ROHNERT PARK",
        ],
    },
    CityArea {
        code: "LA",
        cities: &[
            "LOS ANGELES", "BURBANK", "NORTH HOLLYWOOD", "HOLLYWOOD",
            "ALHAMBRA", "HAWTHORNE", "INGLEWOOD", "CULVER CITY",
            "MARINA DEL REY", "PACOIMA", "NORTHRIDGE", "VAN NUYS",
            "WOODLAND HILLS", "WESTLAKE VILLAGE", "SANTA CLARITA", "LANCASTER",
            "PALMDALE", "SIMI VALLEY", "OXNARD", "VENTURA", "THOUSAND OAKS",
            "TORRANCE", "LAKEWOOD", "SIGNAL HILL", "NORWALK", "LA HABRA",
            "FULLERTON", "GARDEN GROVE", "CYPRESS", "FOUNTAIN VALLEY",
            "HUNTINGTON BEACH", "SANTA ANA", "IRVINE", "TUSTIN", "WESTMINSTER",
        ],
    },
    CityArea {
        code: "SD",
        cities: &[
            "SAN DIEGO", "CHULA VISTA", "LA MESA", "SANTEE", "CARLSBAD",
            "VISTA", "SAN MARCOS", "POWAY", "EL CAJON", "ESCONDIDO",
        ],
    },
];

/// Catch-all for California cities outside every area list.
const CALIFORNIA_DEFAULT: &str = "CC";

// ─── Classifier ─────────────────────────────────────────────────

/// Maps (country, state, city) to a region code over the static tables.
///
/// Total over its domain: every input produces a deterministic code, never
/// an error. Unknown countries get a synthesized `{country}-GE` code.
pub struct RegionClassifier {
    table: &'static [CountryRegions],
    california: &'static [CityArea],
}

impl RegionClassifier {
    pub fn new() -> Self {
        Self {
            table: REGION_TABLE,
            california: CALIFORNIA_AREAS,
        }
    }

    /// Classifier over alternative tables (for testing tie-break order).
    pub fn with_tables(
        table: &'static [CountryRegions],
        california: &'static [CityArea],
    ) -> Self {
        Self { table, california }
    }

    /// Classify a location into a region code.
    pub fn classify(&self, country: &str, state: &str, city: &str) -> String {
        let Some(entry) = self.country_entry(country) else {
            return format!("{}-GE", country);
        };

        if country == "US" && state == "CA" {
            return self.classify_california(city).to_string();
        }

        for region in entry.regions {
            if region.members.iter().any(|m| *m == state) {
                return region.code.to_string();
            }
        }

        // Unmatched states fall back to the country's first region, an
        // arbitrary but deterministic default.
        match entry.regions.first() {
            Some(region) => region.code.to_string(),
            None => format!("{}-GE", country),
        }
    }

    /// Sub-classify a California city by area list, in list order.
    pub fn classify_california(&self, city: &str) -> &'static str {
        let city_upper = city.to_uppercase();
        for area in self.california {
            if area.cities.iter().any(|c| city_upper.contains(c)) {
                return area.code;
            }
        }
        CALIFORNIA_DEFAULT
    }

    /// Human-readable name for a region code; unknown codes echo the code.
    pub fn region_name<'a>(&self, country: &str, code: &'a str) -> &'a str {
        self.country_entry(country)
            .and_then(|entry| entry.regions.iter().find(|r| r.code == code))
            .map(|r| r.name)
            .unwrap_or(code)
    }

    /// The full table, for reference listings.
    pub fn countries(&self) -> &'static [CountryRegions] {
        self.table
    }

    fn country_entry(&self, country: &str) -> Option<&'static CountryRegions> {
        self.table.iter().find(|c| c.country == country)
    }
}

impl Default for RegionClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_state_pairs() {
        let c = RegionClassifier::new();
        assert_eq!(c.classify("US", "NY", ""), "NE");
        assert_eq!(c.classify("US", "FL", ""), "SE");
        assert_eq!(c.classify("US", "OH", ""), "MW");
        assert_eq!(c.classify("US", "WA", ""), "NW");
        assert_eq!(c.classify("US", "TX", ""), "TE");
        assert_eq!(c.classify("US", "AZ", ""), "SW");
        assert_eq!(c.classify("CA", "QC", ""), "EC");
        assert_eq!(c.classify("CA", "BC", ""), "WC");
        assert_eq!(c.classify("CA", "SK", ""), "CB");
        assert_eq!(c.classify("CA", "YT", ""), "ON");
        assert_eq!(c.classify("MX", "Sonora", ""), "MX-NO");
        assert_eq!(c.classify("MX", "Jalisco", ""), "MX-CE");
        assert_eq!(c.classify("MX", "Yucatan", ""), "MX-SU");
        assert_eq!(c.classify("JP", "Tokyo", ""), "JP-KA");
        assert_eq!(c.classify("JP", "Hokkaido", ""), "JP-HO");
        assert_eq!(c.classify("JP", "Hitachinaka", ""), "JP-OT");
        assert_eq!(c.classify("KO", "Busan", ""), "KO-BS");
        assert_eq!(c.classify("TW", "Tainan", ""), "TW-SO");
        assert_eq!(c.classify("AU", "Queensland", ""), "AU-EA");
        assert_eq!(c.classify("GB", "Scotland", ""), "UK");
    }

    #[test]
    fn test_hawaii_routes_to_la() {
        // HI sits in the LA region's member set, not a region of its own.
        let c = RegionClassifier::new();
        assert_eq!(c.classify("US", "HI", "Honolulu"), "LA");
    }

    #[test]
    fn test_unknown_country_generic_fallback() {
        let c = RegionClassifier::new();
        assert_eq!(c.classify("DE", "Bavaria", "Munich"), "DE-GE");
        assert_eq!(c.classify("", "", ""), "-GE");
    }

    #[test]
    fn test_unknown_state_defaults_to_first_region() {
        let c = RegionClassifier::new();
        assert_eq!(c.classify("US", "XX", ""), "NE");
        assert_eq!(c.classify("JP", "Okinawa", ""), "JP-KA");
        assert_eq!(c.classify("CA", "", ""), "EC");
    }

    #[test]
    fn test_california_cities() {
        let c = RegionClassifier::new();
        assert_eq!(c.classify("US", "CA", "San Francisco"), "BA");
        assert_eq!(c.classify("US", "CA", "Burbank"), "LA");
        assert_eq!(c.classify("US", "CA", "San Diego"), "SD");
        assert_eq!(c.classify("US", "CA", "Fresno"), "CC");
    }

    #[test]
    fn test_california_substring_match() {
        let c = RegionClassifier::new();
        // "NORTH HOLLYWOOD" contains the "HOLLYWOOD" token.
        assert_eq!(c.classify_california("North Hollywood"), "LA");
        // Case-insensitive via uppercasing.
        assert_eq!(c.classify_california("sAn JoSe"), "BA");
        assert_eq!(c.classify_california("El Cajon"), "SD");
    }

    #[test]
    fn test_california_first_list_wins() {
        // A contrived city containing both a Bay Area and an LA token
        // resolves to the Bay Area, which is scanned first.
        let c = RegionClassifier::new();
        assert_eq!(c.classify_california("Oakland Burbank Junction"), "BA");
    }

    #[test]
    fn test_idempotent() {
        let c = RegionClassifier::new();
        let first = c.classify("JP", "Osaka", "Osaka");
        let second = c.classify("JP", "Osaka", "Osaka");
        assert_eq!(first, "JP-KI");
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_token_first_region_wins() {
        // "ZZ" is deliberately present in both regions; the region that
        // appears first in the table takes it.
        static DUP_TABLE: &[CountryRegions] = &[CountryRegions {
            country: "XX",
            regions: &[
                RegionDef { code: "R1", name: "First", members: &["ZZ"] },
                RegionDef { code: "R2", name: "Second", members: &["ZZ", "YY"] },
            ],
        }];
        let c = RegionClassifier::with_tables(DUP_TABLE, CALIFORNIA_AREAS);
        assert_eq!(c.classify("XX", "ZZ", ""), "R1");
        assert_eq!(c.classify("XX", "YY", ""), "R2");
    }

    #[test]
    fn test_state_match_is_exact_and_case_sensitive() {
        let c = RegionClassifier::new();
        // Lowercase "tx" is not a member token; falls to the default.
        assert_eq!(c.classify("US", "tx", ""), "NE");
        assert_eq!(c.classify("JP", "tokyo", ""), "JP-KA"); // default, not a match
    }

    #[test]
    fn test_region_name() {
        let c = RegionClassifier::new();
        assert_eq!(c.region_name("US", "NE"), "Northeast");
        assert_eq!(c.region_name("MX", "MX-SU"), "Southern Mexico");
        assert_eq!(c.region_name("US", "ZZ"), "ZZ");
        assert_eq!(c.region_name("DE", "DE-GE"), "DE-GE");
    }

    #[test]
    fn test_region_codes_unique_within_country() {
        for country in REGION_TABLE {
            for (i, a) in country.regions.iter().enumerate() {
                for b in &country.regions[i + 1..] {
                    assert_ne!(
                        a.code, b.code,
                        "duplicate region code in {}",
                        country.country
                    );
                }
            }
        }
    }
}
