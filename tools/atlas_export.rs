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
//! Rasterizes a set of characters and writes the resulting glyph atlas as a PNG.
//!
//! ```text
//! atlas_export --font face.ttf --size 18 --text "abc" --output atlas.png [--bold] [--outline 1.5]
//! ```

use std::{env, error::Error, fs, path::PathBuf};

use log::info;
use tgui_redux::{color4b, encode_png, FontHandle};

struct Options {
    font: PathBuf,
    size: u32,
    text: String,
    output: PathBuf,
    bold: bool,
    outline: f32,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let options = parse_args()?;
    export_atlas(&options)?;
    Ok(())
}

fn parse_args() -> Result<Options, Box<dyn Error>> {
    let mut font = None;
    let mut size = 18;
    let mut text = String::new();
    let mut output = None;
    let mut bold = false;
    let mut outline = 0.0;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = |name: &str| args.next().ok_or_else(|| format!("{} requires a value", name));
        match arg.as_str() {
            "--font" => font = Some(PathBuf::from(value("--font")?)),
            "--size" => size = value("--size")?.parse()?,
            "--text" => text = value("--text")?,
            "--output" => output = Some(PathBuf::from(value("--output")?)),
            "--outline" => outline = value("--outline")?.parse()?,
            "--bold" => bold = true,
            other => return Err(format!("unknown argument {}", other).into()),
        }
    }

    if text.is_empty() {
        // printable ascii
        text = (0x20u8..0x7f).map(char::from).collect();
    }
    Ok(Options {
        font: font.ok_or("missing --font <path>")?,
        size,
        text,
        output: output.ok_or("missing --output <path>")?,
        bold,
        outline,
    })
}

fn export_atlas(options: &Options) -> Result<(), Box<dyn Error>> {
    let font = FontHandle::from_memory(fs::read(&options.font)?)?;
    for c in options.text.chars() {
        if !font.has_glyph(c) {
            info!("{:?} is not in the face, skipping", c);
            continue;
        }
        font.glyph(c, options.size, options.bold, 0.0);
        if options.outline > 0.0 {
            font.glyph(c, options.size, options.bold, options.outline);
        }
    }

    let (texture, version) = font.texture(options.size).ok_or("the font produced no texture")?;
    let size = texture.size();
    let pixels: Vec<_> = texture.pixels().iter().map(|a| color4b(255, 255, 255, *a)).collect();
    let png = encode_png(size, size, &pixels)?;
    fs::write(&options.output, png)?;
    info!("wrote {}x{} atlas (version {}) to {}", size, size, version, options.output.display());
    Ok(())
}
