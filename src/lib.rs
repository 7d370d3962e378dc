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
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Float casts between precisions are pervasive in rendering math
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

//! GPU-accelerated interactive volume renderer built on wgpu.
//!
//! Volray draws raw scalar volumes by ray marching a 3D texture and
//! classifying samples through an editable transfer function. The two
//! central pieces are:
//!
//! - [`transfer::TransferFunction`] - a sorted control-point list that
//!   derives the 256-entry color lookup table
//! - [`camera::CameraController`] - fly, mouse-look, and arcball
//!   navigation over a single camera state
//!
//! [`engine::VolumeRenderEngine`] ties them to the GPU: it owns the
//! surface, uploads the volume and lookup-table textures, and turns
//! platform-agnostic input events into camera and editor mutations.
//! Everything runs on one thread; state changed by an event is simply
//! read by the next frame.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod options;
pub mod renderer;
pub mod transfer;
pub mod volume;
