//! Scripts built directly from text.
//!
//! Some stores reject the list expressions the translator would emit for
//! `repeat()`/`until()` child traversals, so reachability searches are
//! written out by hand. Callers must sanitize ids before calling in here.

use crate::translator::string_literal;

/// Search outgoing edges from `root` until `target` is reached, following
/// paths of at most `max_hops` hops. Paths may revisit vertices, so `root`
/// can be its own target through a cycle. Yields the target vertex at most
/// once.
pub fn reachable(alias: &str, root: &str, target: &str, max_hops: u32) -> String {
    let root = string_literal(root);
    let target = string_literal(target);
    format!(
        "{alias}.V({root}).repeat(out())\
         .until(or(hasId({target}), loops().is(gte({max_hops}))))\
         .hasId({target}).limit(1)"
    )
}

/// [`reachable`] followed by `drop()`.
pub fn drop_reachable(alias: &str, root: &str, target: &str, max_hops: u32) -> String {
    format!("{}.drop()", reachable(alias, root, target, max_hops))
}
