//! Registry statistics

use crate::camps::Camp;

/// Aggregate counts over a camp snapshot. Derived on demand, never cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CampStats {
    /// Number of camps
    pub total: usize,

    /// Camps included in the registry
    pub verified: usize,

    /// Camps awaiting verification
    pub pending: usize,

    /// Camps that submitted a periodic report
    pub with_reports: usize,

    /// Documents across all camps
    pub documents_uploaded: usize,
}

impl CampStats {
    /// Compute statistics for `camps`.
    pub fn from_camps(camps: &[Camp]) -> Self {
        let verified = camps.iter().filter(|camp| camp.is_verified).count();

        Self {
            total: camps.len(),
            verified,
            pending: camps.len() - verified,
            with_reports: camps.iter().filter(|camp| camp.has_report()).count(),
            documents_uploaded: camps.iter().map(|camp| camp.documents.len()).sum(),
        }
    }
}
