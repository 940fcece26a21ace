//! Whiteboard canvas engine for the mock-interview workspace.
//!
//! This crate is compiled to WebAssembly and runs in the browser, one board per
//! interview question. It turns raw pointer input into edits of an ordered
//! list of drawn paths, hit-tests those paths for selection and text editing,
//! renders the scene, and persists the board to `localStorage` after every
//! change. The host JavaScript layer wires DOM events to [`engine::Engine`]
//! and answers its [`engine::Action::TextRequested`] prompts.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Path and shape types and the per-question [`doc::Document`] |
//! | [`geom`] | Points, bounds, and segment/triangle geometry |
//! | [`input`] | Tools, stroke style, and the gesture state machine |
//! | [`hit`] | Hit-testing, bounds, and resize handles |
//! | [`render`] | Scene rendering to a 2D canvas context |
//! | [`config`] | Tunable tolerances and stroke defaults |
//! | [`consts`] | Shared numeric constants |

pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod render;
