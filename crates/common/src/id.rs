//! ID generation utilities.

use uuid::Uuid;

/// ID generator for entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new random UUID v4 primary key.
    #[must_use]
    pub fn generate(&self) -> Uuid {
        Uuid::new_v4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_ne!(id1, id2);
        assert_eq!(id1.get_version_num(), 4);
    }
}
