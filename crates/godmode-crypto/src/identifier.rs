//! RFC 4122 version 4 identifiers.
//!
//! Randomness comes from the `uuid` crate's OS-backed generator, which is
//! safe to call from any number of threads at once.

use godmode_core::{Result, ToolError};
use uuid::Uuid;

/// Largest batch [`new_v4_batch`] will produce.
pub const MAX_BATCH: usize = 1000;

/// A fresh v4 UUID, lowercase `8-4-4-4-12`.
pub fn new_v4() -> String {
    Uuid::new_v4().hyphenated().to_string()
}

/// A fresh v4 UUID, uppercase.
pub fn new_v4_upper() -> String {
    new_v4().to_ascii_uppercase()
}

/// `count` fresh v4 UUIDs.
///
/// # Errors
///
/// [`ToolError::Range`] if `count` is zero or above [`MAX_BATCH`].
pub fn new_v4_batch(count: usize, uppercase: bool) -> Result<Vec<String>> {
    if count == 0 || count > MAX_BATCH {
        return Err(ToolError::Range(format!(
            "batch size {count} is outside 1..={MAX_BATCH}"
        )));
    }
    tracing::trace!(count, "generating uuids");
    Ok((0..count)
        .map(|_| if uppercase { new_v4_upper() } else { new_v4() })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn is_v4_shape(id: &str) -> bool {
        let groups: Vec<&str> = id.split('-').collect();
        let lens: Vec<usize> = groups.iter().map(|g| g.len()).collect();
        lens == [8, 4, 4, 4, 12]
            && groups.iter().all(|g| g.chars().all(|c| c.is_ascii_hexdigit()))
            && groups[2].starts_with('4')
            && matches!(groups[3].chars().next(), Some('8' | '9' | 'a' | 'b' | 'A' | 'B'))
    }

    #[test]
    fn v4_format_and_version_nibble() {
        for _ in 0..64 {
            let id = new_v4();
            assert_eq!(id.len(), 36);
            assert!(is_v4_shape(&id), "{id}");
            assert_eq!(id, id.to_ascii_lowercase());
        }
    }

    #[test]
    fn uppercase_variant() {
        let id = new_v4_upper();
        assert!(is_v4_shape(&id));
        assert_eq!(id, id.to_ascii_uppercase());
    }

    #[test]
    fn batch_is_unique() {
        let ids = new_v4_batch(200, false).unwrap();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 200);
    }

    #[test]
    fn batch_bounds() {
        assert_eq!(new_v4_batch(0, false).unwrap_err().kind(), "range_error");
        assert!(new_v4_batch(MAX_BATCH + 1, false).is_err());
        assert_eq!(new_v4_batch(MAX_BATCH, true).unwrap().len(), MAX_BATCH);
    }
}
