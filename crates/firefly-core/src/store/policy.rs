//! Auto-refresh policy for registry operations.

use crate::config::SessionPolicyConfig;
use serde::Serialize;

/// Registry operations that may be followed by a list refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegistryOperation {
    Create,
    Load,
    Delete,
    Rename,
}

/// Whether each registry operation refreshes the session list on success.
///
/// The default keeps rename without an automatic refresh: callers must call
/// `refresh()` themselves to see the committed title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefreshPolicy {
    pub create: bool,
    pub load: bool,
    pub delete: bool,
    pub rename: bool,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            create: true,
            load: false,
            delete: true,
            rename: false,
        }
    }
}

impl RefreshPolicy {
    pub fn refresh_after(&self, operation: RegistryOperation) -> bool {
        match operation {
            RegistryOperation::Create => self.create,
            RegistryOperation::Load => self.load,
            RegistryOperation::Delete => self.delete,
            RegistryOperation::Rename => self.rename,
        }
    }

    pub fn from_config(config: &SessionPolicyConfig) -> Self {
        Self {
            rename: config.refresh_after_rename,
            ..Self::default()
        }
    }
}
