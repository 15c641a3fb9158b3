//! Demand builder.

use std::collections::HashMap;

use crate::models::{DemandUnit, Quota, QuotaId};

/// Expands quotas into the units still owed.
///
/// A quota with `count` lessons, `n` of which are already bound to it,
/// yields `count - n` units. Over-fulfilled quotas yield none.
///
/// Output order follows `quotas`; the run reorders it afterwards.
pub fn build_demands(quotas: &[Quota], fulfilled: &HashMap<QuotaId, u32>) -> Vec<DemandUnit> {
    let mut demands = Vec::new();
    for quota in quotas {
        let done = fulfilled.get(&quota.id).copied().unwrap_or(0);
        let remaining = quota.count.saturating_sub(done);
        demands.extend((0..remaining).map(|_| DemandUnit::from_quota(quota)));
    }
    demands
}
