//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
use thiserror::Error;

/// Errors raised by loading and configuration APIs.
///
/// Runtime conditions (missing glyphs, malformed markup, zero-sized widgets) never produce an
/// error; they degrade to empty output instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Font bytes could not be turned into a usable face.
    #[error("font load error: {0}")]
    FontLoad(String),
    /// The widget type has no property with this name.
    #[error("could not set property '{property}', widget of type '{widget}' does not have this property")]
    UnknownProperty {
        /// Widget type that owns the renderer.
        widget: &'static str,
        /// Property name as passed by the caller.
        property: String,
    },
    /// The value could not be converted into the property's kind.
    #[error("invalid value '{value}' for property '{property}': {reason}")]
    InvalidValue {
        /// Property name.
        property: String,
        /// Offending value, as text.
        value: String,
        /// Why conversion failed.
        reason: String,
    },
    /// An image could not be decoded or located.
    #[error("failed to load texture '{path}': {reason}")]
    TextureLoad {
        /// Path or identifier of the image.
        path: String,
        /// Why loading failed.
        reason: String,
    },
    /// PNG encoding or decoding failed.
    #[error("png error: {0}")]
    Png(String),
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_value(property: &str, value: &str, reason: impl Into<String>) -> Self {
        Error::InvalidValue {
            property: property.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
