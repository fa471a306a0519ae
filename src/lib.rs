// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! First-person viewer for GLB maps built on wgpu.
//!
//! A map is named by a page location (`/view/<map>` or
//! `?map=<map>&texture_scale=..&textures=..`), streamed as a GLB, and
//! explored with pointer-lock mouse look plus WASD / arrow-key movement
//! that ramps up to a sprint while keys are held.
//!
//! # Key entry points
//!
//! - [`session::ViewerSession`] - owns all per-session state and maps each
//!   external event to one handler
//! - [`camera::motion`] - the accelerating first-person movement model
//! - [`loader::LoadTarget`] - resolves the map to fetch from a location
//! - [`options::Options`] - TOML-backed configuration
//!
//! # Front-ends
//!
//! The `viewer` feature provides a winit window ([`Viewer`]); the `web`
//! feature provides a browser entry point that drives the same session
//! from DOM events and `requestAnimationFrame`.

pub mod camera;
pub mod error;
pub mod gpu;
pub mod input;
pub mod loader;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod session;
pub mod ui;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use error::ViewerError;
pub use input::InputEvent;
pub use session::ViewerSession;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
