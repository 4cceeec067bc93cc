//! Bind-time half of scriptbind.
//!
//! ```text
//! HostVm         - class-declaration primitives the embedding VM provides
//! ClassRegistry  - TypeId -> ClassInfo (VM class, lifecycle hooks, members)
//! ClassBuilder   - binders synthesising entry points for one class
//! Overloads      - candidate sets selected by an explicit Signature
//! ```
//!
//! Everything here runs during setup. The entry points it produces run at
//! script call time on top of `scriptbind-core`.

mod builder;
mod class_info;
mod entry;
mod host;
mod overload;
mod registry;

pub use builder::{ClassBuilder, ScriptFields};
pub use class_info::{ClassInfo, MemberEntry, MemberKind};
pub use host::{Finalizer, HostVm, finalize_instance};
pub use overload::{Overloads, Signature};
pub use registry::ClassRegistry;
