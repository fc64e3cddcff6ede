//! Internal library for the `asciimath-core` crate for rendering MathML.
//!
//! This library allows you to construct an AST representing MathML and then render it to a string.
//!
//! # Example
//!
//! ```rust
//! use asciimath_renderer_internal::ast::{MathMLEmitter, Node};
//! use asciimath_renderer_internal::attribute::ScriptPlacement;
//!
//! let ast = Node::SubSup {
//!     base: &Node::Operator("&#x2211;"),
//!     sub: Some(&Node::Identifier("i")),
//!     sup: Some(&Node::Identifier("n")),
//!     placement: ScriptPlacement::Limits,
//! };
//!
//! let mut emitter = MathMLEmitter::new();
//! emitter.emit(&ast, 0).unwrap();
//! assert_eq!(
//!     emitter.into_inner(),
//!     "<munderover><mo>&#x2211;</mo><mi>i</mi><mi>n</mi></munderover>"
//! );
//! ```
pub mod arena;
pub mod ast;
pub mod attribute;
pub mod fmt;
pub mod html_utils;

static_assertions::const_assert!(std::mem::size_of::<ast::Node<'static>>() <= 80);
