pub mod backends;

pub use backends::memory::MemoryStore;

use std::sync::Arc;

use ng_core::{ArticleStore, Error, Result};

/// Backend factory keyed by the CLI's `--storage` flag.
pub fn create_store(kind: &str) -> Result<Arc<dyn ArticleStore>> {
    match kind {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        other => Err(Error::Storage(format!("unknown storage backend: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_store() {
        assert!(create_store("memory").is_ok());
        assert!(create_store("postgres").is_err());
    }
}
