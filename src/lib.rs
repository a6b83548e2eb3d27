//! Walkthrough script resolution and overlay core for CDL training.
//!
//! Defaults and the school overlay registry are immutable values built once
//! and injected into a [`resolve::Resolver`]; custom scripts are read and
//! written through the [`store`] traits.
pub mod authoring;
pub mod cli;
pub mod commands;
pub mod config;
pub mod defaults;
pub mod error;
pub mod overlay;
pub mod registry;
pub mod resolve;
pub mod schema;
pub mod store;
pub mod validate;

pub use defaults::DefaultsStore;
pub use error::{
    AuthoringError, PersistenceError, ResolveError, UnknownClassToken, ValidationFailure,
};
pub use overlay::{apply_overlays, OverlayCategory, OverlayKind, OverlaySpec};
pub use registry::OverlayRegistry;
pub use resolve::{ResolveRequest, Resolver};
pub use schema::{
    ClassToken, CustomWalkthroughRecord, Phase, ResolvedWalkthrough, SchoolId, WalkthroughScript,
    WalkthroughSection, WalkthroughStep,
};
pub use validate::{parse_script, validate_script, ValidationReport};
