// # Intra-Area-Prefix Processor Trait
//
// Prefix changes inside a stable topology are applied incrementally,
// without rerunning SPF. The LSA's `scope` names the area it belongs to.

use crate::lsa::Lsa;

/// Trait for incremental Intra-Area-Prefix-LSA processing
pub trait IntraPrefixProcessor: Send + Sync {
    /// An Intra-Area-Prefix-LSA entered an area database
    fn add(&self, lsa: &Lsa);

    /// An Intra-Area-Prefix-LSA left an area database
    fn remove(&self, lsa: &Lsa);
}
