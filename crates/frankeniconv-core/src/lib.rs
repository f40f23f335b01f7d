//! # frankeniconv-core
//!
//! Safe Rust character set conversion.
//!
//! A [`Registry`] maps charset names to codecs; an [`IconvDescriptor`] owns
//! the decoder and encoder shift state of one conversion stream; the engine
//! in [`iconv`] drives decode → encode per call and classifies failures.
//! No `unsafe` code is permitted at the crate level.

#![deny(unsafe_code)]

pub mod charset;
pub mod codec;
pub mod config;
pub mod errno;
pub mod error;
pub mod iconv;

pub use codec::{Charset, Registry};
pub use config::FallbackPolicy;
pub use error::IconvError;
pub use iconv::{
    ConversionResult, IconvDescriptor, close, conv, conv_detailed, convert, finalize, open,
    supported_charsets, with_descriptor,
};
