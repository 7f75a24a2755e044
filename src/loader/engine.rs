//! One-time SQLite engine bootstrap
//!
//! The bundled SQLite library is probed exactly once per process, through an
//! explicit lazily-initialized singleton rather than ad-hoc module state.
//! There is no explicit teardown: bundled SQLite requires none beyond process
//! exit, and the singleton holds no OS resources.

use once_cell::sync::Lazy;

static ENGINE: Lazy<Engine> = Lazy::new(Engine::bootstrap);

/// Handle to the process-wide SQLite engine.
///
/// All database opens go through [`Engine::global`], which guarantees the
/// bootstrap ran before any connection exists. The handle is immutable after
/// initialization, so concurrent access needs no locking.
pub struct Engine {
    version: String,
}

impl Engine {
    fn bootstrap() -> Self {
        let version = rusqlite::version().to_string();
        tracing::debug!("SQLite engine initialized (version {})", version);
        Self { version }
    }

    /// Access the lazily-initialized global engine
    pub fn global() -> &'static Engine {
        &ENGINE
    }

    /// The version string of the linked SQLite library
    pub fn version(&self) -> &str {
        &self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_is_memoized() {
        let a = Engine::global() as *const Engine;
        let b = Engine::global() as *const Engine;
        assert_eq!(a, b);
        assert!(!Engine::global().version().is_empty());
    }
}
