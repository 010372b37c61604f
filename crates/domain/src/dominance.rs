use crate::entities::Product;

/// Whether `candidate` beats `reference` on price without regressing on any
/// other tracked specification.
///
/// Strict on price, non-strict everywhere else: the candidate must be
/// cheaper, and must match or exceed screen size, graphics card, processor,
/// RAM and storage. The predicate is identity-agnostic; callers are
/// responsible for excluding the reference product from the candidate set.
pub fn dominates(reference: &Product, candidate: &Product) -> bool {
    let r = &reference.spec;
    let c = &candidate.spec;

    c.price < r.price
        && c.screen_size >= r.screen_size
        && c.graphics_card >= r.graphics_card
        && c.processor >= r.processor
        && c.ram >= r.ram
        && c.storage >= r.storage
}
