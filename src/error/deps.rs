//! Dependency errors

use super::OcxError;

/// Creates a cyclic dependency error
///
/// `stack` is the chain of identity keys currently being resolved; the
/// cycle closes when `key` is visited again.
pub fn cyclic(key: impl Into<String>, stack: &[String]) -> OcxError {
    let key = key.into();
    let mut chain = stack.to_vec();
    chain.push(key.clone());
    OcxError::CyclicDependency {
        key,
        chain: chain.join(" -> "),
    }
}
