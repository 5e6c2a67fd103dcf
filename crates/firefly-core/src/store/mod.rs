//! State stores consumed by the presentation layer.
//!
//! - `conversation`: the active message sequence and send status (`ConversationStore`)
//! - `registry`: the session list and lifecycle operations (`SessionRegistry`)
//! - `slot`: single in-flight operation token (`OperationSlot`)
//! - `policy`: per-operation auto-refresh table (`RefreshPolicy`)
//! - `outcome`: result type shared by store operations (`Outcome`)

mod conversation;
mod outcome;
mod policy;
mod registry;
mod slot;

pub use conversation::ConversationStore;
pub use outcome::Outcome;
pub use policy::{RefreshPolicy, RegistryOperation};
pub use registry::SessionRegistry;
pub use slot::{OperationKind, OperationSlot, SlotGuard};
