use std::collections::HashSet;
use std::env;

use once_cell::sync::Lazy;

/// Home-federation country codes (the athletes reports are generated for).
const DEFAULT_HOME_CODES: &[&str] = &["KSA", "SAU", "SAUDI"];

/// Asian-federation codes forming the default scouting pool.
const DEFAULT_REGION_CODES: &[&str] = &[
    "KSA", "SAU", "UAE", "KAZ", "UZB", "JPN", "KOR", "CHN", "MNG", "MGL", "THA", "VIE", "INA",
    "MAS", "SGP", "PHI", "IND", "PAK", "IRN", "IRI", "JOR", "KUW", "BRN", "QAT", "OMA", "YEM",
    "SYR", "LBN", "IRQ",
];

static DEFAULT_HOME: Lazy<CountrySet> = Lazy::new(|| CountrySet::from_codes(DEFAULT_HOME_CODES));
static DEFAULT_REGION: Lazy<CountrySet> =
    Lazy::new(|| CountrySet::from_codes(DEFAULT_REGION_CODES));

/// Case-insensitive membership over three-letter country codes.
#[derive(Debug, Clone, Default)]
pub struct CountrySet {
    codes: HashSet<String>,
}

impl CountrySet {
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let codes = codes
            .into_iter()
            .map(|code| code.as_ref().trim().to_uppercase())
            .filter(|code| !code.is_empty())
            .collect();
        Self { codes }
    }

    /// Parses a comma-separated env var, e.g. `SCOUT_HOME_CODES=KSA,SAU`.
    /// Returns None when the var is unset or holds no codes.
    pub fn from_env(var: &str) -> Option<Self> {
        let raw = env::var(var).ok()?;
        let set = Self::from_codes(raw.split(','));
        if set.is_empty() { None } else { Some(set) }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(&code.trim().to_uppercase())
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }
}

/// Home federation codes, overridable via `SCOUT_HOME_CODES`.
pub fn home_codes() -> CountrySet {
    CountrySet::from_env("SCOUT_HOME_CODES").unwrap_or_else(|| DEFAULT_HOME.clone())
}

/// Scouting pool codes, overridable via `SCOUT_REGION_CODES`.
pub fn region_codes() -> CountrySet {
    CountrySet::from_env("SCOUT_REGION_CODES").unwrap_or_else(|| DEFAULT_REGION.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_is_case_and_whitespace_insensitive() {
        let set = CountrySet::from_codes(["ksa", " UAE "]);
        assert!(set.contains("KSA"));
        assert!(set.contains("uae"));
        assert!(set.contains(" Ksa "));
        assert!(!set.contains("JPN"));
    }

    #[test]
    fn defaults_cover_home_inside_region() {
        let home = CountrySet::from_codes(DEFAULT_HOME_CODES);
        let region = CountrySet::from_codes(DEFAULT_REGION_CODES);
        assert!(home.contains("KSA"));
        assert!(region.contains("KSA"));
        assert!(region.contains("JPN"));
        assert!(!region.contains("USA"));
    }

    #[test]
    fn empty_codes_are_dropped() {
        let set = CountrySet::from_codes(["KSA", "", "  "]);
        assert_eq!(set.len(), 1);
    }
}
