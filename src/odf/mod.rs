// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The O-DF data model: paths, values, nodes and the two tree containers.
//!
//! # Representations
//!
//! * [`ImmutableOdf`] - persistent, structurally shared; safe to hand to
//!   many concurrent readers.
//! * [`MutableOdf`] - hash indexed, edited in place; for a single owner.
//!
//! Both implement [`crate::traits::Odf`] and can be merged into each other.

pub mod factory;
mod immutable;
mod mutable;
mod nodes;
mod path;
pub(crate) mod tree;
mod value;

pub use immutable::ImmutableOdf;
pub use mutable::MutableOdf;
pub use nodes::{Description, InfoItem, MetaData, Node, Object, Objects, QlmId};
pub use path::{Path, ROOT_SEGMENT};
pub use value::{Coercion, OdfValue, Value, XS_STRING};
