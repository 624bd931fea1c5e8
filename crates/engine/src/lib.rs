//! # Declutter engine
//!
//! Finds and neutralises page annoyances (scroll locks, blur veils,
//! translucent overlays, floating popups) using only tag names and resolved
//! style, with no knowledge of any particular site.
//!
//! Start-up order: [`Engine::start`] consults the run mode and the
//! [`SiteGate`], installs the [`MutationReactor`], then runs one
//! [`TreeWalker`] sweep. Both walkers defer every per-element decision to the
//! [`Classifier`].

pub mod classifier;
pub mod config;
pub mod context;
pub mod error;
pub mod gate;
pub mod guard;
pub mod predicates;
pub mod reactor;
pub mod runtime;
pub mod tags;
pub mod walker;

pub use classifier::{Classifier, Corrections, Outcome};
pub use config::{ConfigLoader, EngineConfig, ReactorConfig, RunMode, SiteLists, TagSets};
pub use context::DocumentContext;
pub use error::{EngineError, Result};
pub use gate::{NoopOverride, SiteGate, SiteMode, SiteOverride};
pub use guard::{ancestor_check, descendant_check};
pub use predicates::{Correction, StylePredicates};
pub use reactor::{MutationReactor, ReactorStats};
pub use runtime::{Engine, RunningEngine, Startup};
pub use tags::{TagCaps, TagTable};
pub use walker::{SweepStats, TreeWalker};
