//! # worldgate-proto
//!
//! Protocol vocabulary shared between the worldgate session layer and
//! transport implementations.
//!
//! The native transport exposes callback payloads as typed attribute
//! registers rather than decoded structures. This crate defines that
//! vocabulary: the attribute names ([`IntAttribute`], [`FloatAttribute`],
//! [`StringAttribute`], [`DataAttribute`]), the numeric reason-code domain
//! ([`ReasonCode`]), the native event and callback slots ([`Event`],
//! [`Callback`]) and the small geometry type ([`Vector3`]) threaded through
//! avatar and object payloads.
//!
//! Nothing in here performs I/O; the session layer in the root crate owns
//! all behavior.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod attributes;
pub mod kinds;
pub mod reason;
pub mod vector;

pub use attributes::{
    AttributeError, DataAttribute, FloatAttribute, IntAttribute, StringAttribute,
};
pub use kinds::{Callback, Event};
pub use reason::ReasonCode;
pub use vector::Vector3;
