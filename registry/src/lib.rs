//! Role-to-endpoint resolution for a fleet of Ollama servers.
//!
//! A small set of named roles (a fast general model, a reasoning model, and
//! so on) is pinned to fixed ports and model names in a [`RoleTable`]. The
//! [`RoleRegistry`] resolves a role to a network [`Target`], probes each
//! server's liveness, queries the models it has loaded, and merges the
//! results into a [`StatusReport`]. All probe failures fold into documented
//! fallback values so the registry is safe to poll in a loop.

pub mod probe;
pub mod registry;
pub mod role;

pub use probe::{HttpProbe, Probe, ProbeError};
pub use registry::{RoleRegistry, RoleStatus, StatusReport, Target};
pub use role::{RoleEntry, RoleSpec, RoleTable, RoleTableError};
