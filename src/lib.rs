// Copyright 2026 the Regula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Classification and regularization of freeform 2D polylines.
//!
//! The regula library takes noisy, hand drawn or traced point sequences and
//! recognizes the geometric primitive they approximate: a line, triangle,
//! square or rectangle, regular polygon, circle, ellipse or star. It then
//! replaces the input with an idealized version of that primitive, and
//! closes it by taking the convex hull.
//!
//! The pipeline has four stages, each usable on its own:
//!
//! 1. [`approximate`] reduces a [`Polyline`] to a minimal vertex set
//!    (Ramer–Douglas–Peucker, tolerance relative to the perimeter).
//! 2. [`classify()`] assigns a [`ShapeLabel`] from the vertex count, the
//!    circularity and a least-squares [`Ellipse`] fit.
//! 3. [`regularize()`] builds the canonical outline for that label.
//! 4. [`complete`] takes its convex hull.
//!
//! [`process`] runs them all, and [`process_groups`] runs a batch.
//!
//! # Examples
//!
//! ```
//! use regula::{process, Point, Polyline, ShapeLabel, ShapeOptions};
//!
//! let square = Polyline::closed([
//!     Point::new(10.0, 10.0),
//!     Point::new(110.0, 10.0),
//!     Point::new(110.0, 110.0),
//!     Point::new(10.0, 110.0),
//! ]);
//! let outcome = process(&square, &ShapeOptions::default()).unwrap();
//! assert_eq!(outcome.label(), ShapeLabel::Square);
//! assert_eq!(outcome.completed.points(), outcome.regularized.points);
//! ```
//!
//! The stages can also be run one by one:
//!
//! ```
//! use regula::{approximate, classify, Circle, ClassifyOptions, Polyline, ShapeLabel};
//!
//! let samples = Circle::new((100.0, 100.0), 50.0).sample(60);
//! let outline = Polyline::closed(samples);
//! let approx = approximate(&outline, 0.02).unwrap();
//! assert!(approx.vertex_count() > 6);
//! let classification = classify(&outline, &approx, &ClassifyOptions::default());
//! assert_eq!(classification.label, ShapeLabel::Circle);
//! ```
//!
//! # Features
//!
//! This crate either uses the standard library or the [`libm`] crate for
//! math functionality. The `std` feature is enabled by default, but can be
//! disabled, as long as the `libm` feature is enabled. This is useful for
//! `no_std` environments. The `alloc` crate is used regardless.
//!
//! The `serde` feature derives `Serialize` and `Deserialize` for the value
//! types, options and results. The `rayon` feature processes batches in
//! parallel.
//!
//! [`libm`]: https://docs.rs/libm

#![forbid(unsafe_code)]
#![deny(missing_docs, clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::doc_markdown, rustdoc::broken_intra_doc_links)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(unused_qualifications)]
#![allow(
    clippy::unreadable_literal,
    clippy::many_single_char_names,
    clippy::excessive_precision,
    clippy::neg_cmp_op_on_partial_ord
)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("regula requires either the `std` or `libm` feature");

extern crate alloc;

mod circle;
mod classify;
pub mod common;
mod ellipse;
mod error;
mod hull;
mod pipeline;
mod point;
mod polyline;
mod rect;
mod regularize;
pub mod simplify;
mod vec2;

pub use crate::circle::*;
pub use crate::classify::*;
pub use crate::ellipse::*;
pub use crate::error::*;
pub use crate::hull::*;
pub use crate::pipeline::*;
pub use crate::point::*;
pub use crate::polyline::*;
pub use crate::rect::*;
pub use crate::regularize::*;
pub use crate::simplify::{approximate, ApproxPolygon};
pub use crate::vec2::*;

/// The fewest points a circle or ellipse may be sampled with.
pub const MIN_SAMPLE_POINTS: usize = 36;
