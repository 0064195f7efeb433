//! Replacement records for inactivated concepts.

use amt_types::SctId;
use serde::{Deserialize, Serialize};

/// One historical association: an inactivated concept, the kind of
/// association, and the replacement concept.
///
/// The ordering (inactive id, association type, replacement, date) drives
/// the sorted, de-duplicated replacement output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Replacement {
    /// The inactivated concept.
    pub inactive_id: SctId,
    /// The association type concept (e.g. REPLACED BY).
    pub type_id: SctId,
    /// The replacement concept.
    pub active_id: SctId,
    /// Effective date of the association, YYYYMMDD.
    pub effective_time: u32,
}
