//! Tenant scoping for repository queries
//!
//! The surrounding platform owns tenancy. This crate only makes sure every
//! query it issues carries the caller's tenant id.

use coursegraph_core::errors::{ExError, ExErrorKind};

use crate::errors::Result;

/// Tenant every repository query is filtered by
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantScope(String);

impl TenantScope {
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank tenant id.
    pub fn new(tenant_id: impl Into<String>) -> Result<Self> {
        let tenant_id = tenant_id.into();
        if tenant_id.trim().is_empty() {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("tenant_scope")
                .with_message("Tenant id cannot be empty"));
        }
        Ok(Self(tenant_id))
    }

    pub fn tenant_id(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
