//! Registry view: search and status filters over a camp snapshot.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::camps::Camp;

/// Unknown filter name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown registry filter: {0}")]
pub struct UnknownFilter(pub String);

/// Status filter offered on the registry table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegistryFilter {
    /// Every camp
    #[default]
    All,

    /// Included in the registry
    Verified,

    /// Awaiting verification
    Pending,

    /// Needs attention, see [`Camp::is_problematic`]
    Problematic,
}

impl RegistryFilter {
    /// Whether `camp` passes the filter.
    pub fn matches(self, camp: &Camp) -> bool {
        match self {
            Self::All => true,
            Self::Verified => camp.is_verified,
            Self::Pending => !camp.is_verified,
            Self::Problematic => camp.is_problematic(),
        }
    }

    /// Filter name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Verified => "verified",
            Self::Pending => "pending",
            Self::Problematic => "problematic",
        }
    }
}

impl fmt::Display for RegistryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistryFilter {
    type Err = UnknownFilter;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "all" => Ok(Self::All),
            "verified" => Ok(Self::Verified),
            "pending" => Ok(Self::Pending),
            "problematic" => Ok(Self::Problematic),
            other => Err(UnknownFilter(other.to_string())),
        }
    }
}

/// Search term plus status filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryQuery {
    /// Case-insensitive name fragment, or an INN / registry code fragment
    pub search: String,

    /// Status filter
    pub filter: RegistryFilter,
}

impl RegistryQuery {
    /// Whether `camp` matches both the search term and the filter.
    pub fn matches(&self, camp: &Camp) -> bool {
        self.filter.matches(camp) && self.matches_search(camp)
    }

    /// Select the matching camps, preserving snapshot order.
    pub fn apply<'a>(&self, camps: &'a [Camp]) -> Vec<&'a Camp> {
        camps.iter().filter(|camp| self.matches(camp)).collect()
    }

    fn matches_search(&self, camp: &Camp) -> bool {
        let term = self.search.trim();

        if term.is_empty() {
            return true;
        }

        camp.name.to_lowercase().contains(&term.to_lowercase())
            || camp.inn.contains(term)
            || camp.registry_code.contains(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camps() -> Vec<Camp> {
        vec![
            Camp {
                name: "ДОЛ \"Звездный\"".to_string(),
                inn: "4826001111".to_string(),
                sanitary_number: "48.ОЦ.01.000.М.000111.05.23".to_string(),
                sanitary_date: "25.05.2023".to_string(),
                medical_license: "ЛО-48-01-001234".to_string(),
                is_verified: true,
                ..Camp::default()
            },
            Camp {
                name: "ДОЛ \"Березка\"".to_string(),
                inn: "4826002222".to_string(),
                ..Camp::default()
            },
        ]
    }

    #[test]
    fn search_is_case_insensitive_on_name() {
        let camps = camps();
        let query = RegistryQuery {
            search: "березка".to_string(),
            ..RegistryQuery::default()
        };

        let found = query.apply(&camps);

        assert_eq!(found.len(), 1);
        assert!(found.iter().all(|camp| camp.inn == "4826002222"));
    }

    #[test]
    fn search_matches_inn_fragment() {
        let camps = camps();
        let query = RegistryQuery {
            search: "001111".to_string(),
            ..RegistryQuery::default()
        };

        assert_eq!(query.apply(&camps).len(), 1);
    }

    #[test]
    fn pending_filter_excludes_verified() {
        let camps = camps();
        let query = RegistryQuery {
            filter: RegistryFilter::Pending,
            ..RegistryQuery::default()
        };

        let found = query.apply(&camps);

        assert!(found.iter().all(|camp| !camp.is_verified));
        assert_eq!(found.len(), 1);
    }
}
