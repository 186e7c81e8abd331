//! # Marcher
//!
//! Real-time rendering of signed distance field primitives combined with
//! smooth CSG operators. Every frame the host serializes the scene into
//! fixed-capacity storage buffers and dispatches two compute kernels: one
//! that poses animated shapes and one that marches a ray per pixel.
//!
//! ## The Crates
//!
//! -   **[`scene`]:** Shapes, the per-kind scene store, render settings and
//!     JSON presets. Also decides the order shapes are composed in.
//! -   **[`compute`]:** The host/shader contract: bind group layout, buffer
//!     sizes, workgroup planning and the backends that execute a frame.
//! -   **[`render`]:** The frame loop, camera, command vocabulary, GPU wire
//!     types, presentation and screenshot/scene export.
//! -   **`marcher`:** This crate. Command line configuration, logging and
//!     shader hot reload.
//!
//! ## Controls
//!
//! | keys | action |
//! |---|---|
//! | W/S, A/D, Q/E | fly forward/back, left/right, down/up |
//! | arrows, Z/X | move the look target |
//! | F1/F2/F3 | add a sphere / box / torus |
//! | F5 / F6 / F7 | reset scene / reset camera / new scene |
//! | F9 / F12 | export scene JSON / save a PNG |
//! | G, M, N, O | toggle floor, mandelbulb, domain repetition, outline |
//! | 1..9 | load preset by index |

pub mod app;
pub mod config;
pub mod watcher;

pub use config::Cli;
