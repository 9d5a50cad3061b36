//! ID generation utilities.

use uuid::Uuid;

/// ID generator for entities.
///
/// All rows are keyed by random UUID v4 strings. IDs are opaque: nothing in
/// the system may infer ordering or creation time from them, so the feed's
/// `id ASC` tie-break is stable but deliberately meaningless.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new UUID v4 ID.
    #[must_use]
    pub fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
