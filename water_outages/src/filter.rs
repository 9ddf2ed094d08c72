use itertools::Itertools;

use crate::outage::Outage;

/// Returns the outages whose district or neighborhoods contain `query`, ignoring case.
///
/// An empty query keeps every outage. Relative order is preserved.
pub fn apply<'a>(outages: &'a [Outage], query: &str) -> Vec<&'a Outage> {
    if query.is_empty() {
        return outages.iter().collect_vec();
    }
    let query = query.to_lowercase();
    outages
        .iter()
        .filter(|outage| matches(outage, &query))
        .collect_vec()
}

fn matches(outage: &Outage, lowercase_query: &str) -> bool {
    outage
        .searchable_district()
        .to_lowercase()
        .contains(lowercase_query)
        || outage
            .searchable_neighborhoods()
            .to_lowercase()
            .contains(lowercase_query)
}
