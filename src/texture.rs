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
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

#[cfg(feature = "png-textures")]
use png::{BitDepth, ColorType, Decoder, Transformations};
#[cfg(feature = "png-textures")]
use std::io::Cursor;

use log::debug;

use crate::{color4b, Color, Color4b, Error, Result};

struct TextureData {
    id: String,
    width: u32,
    height: u32,
    pixels: Vec<Color4b>,
}

#[derive(Clone)]
/// Immutable RGBA image shared by reference counting.
pub struct Texture(Rc<TextureData>);

impl Texture {
    /// Wraps `pixels` (row major, `width * height` entries) into a texture named `id`.
    pub fn from_pixels(id: &str, width: u32, height: u32, pixels: Vec<Color4b>) -> Result<Self> {
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(Error::TextureLoad {
                path: id.to_string(),
                reason: format!("expected {} pixels, found {}", width as usize * height as usize, pixels.len()),
            });
        }
        Ok(Self(Rc::new(TextureData {
            id: id.to_string(),
            width,
            height,
            pixels,
        })))
    }

    /// Identifier the texture was loaded under, usually its path.
    pub fn id(&self) -> &str { &self.0.id }

    /// Width and height in pixels.
    pub fn size(&self) -> (u32, u32) { (self.0.width, self.0.height) }

    /// Returns `true` if either dimension is zero.
    pub fn is_empty(&self) -> bool { self.0.width == 0 || self.0.height == 0 }

    /// Row-major pixels.
    pub fn pixels(&self) -> &[Color4b] { &self.0.pixels }

    /// Returns `true` if both handles refer to the same image.
    pub fn ptr_eq(&self, other: &Texture) -> bool { Rc::ptr_eq(&self.0, &other.0) }
}

impl PartialEq for Texture {
    fn eq(&self, other: &Self) -> bool { self.ptr_eq(other) }
}

impl Debug for Texture {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("Texture({:?}, {}x{})", self.0.id, self.0.width, self.0.height))
    }
}

/// Source of decoded images for a [`TextureManager`].
pub trait TextureLoader {
    /// Decodes the image at `path` into `(width, height, pixels)`.
    fn load(&self, path: &str) -> Result<(u32, u32, Vec<Color4b>)>;
}

/// Loader serving images registered in memory.
#[derive(Default)]
pub struct MemoryTextureLoader {
    images: HashMap<String, (u32, u32, Vec<Color4b>)>,
}

impl MemoryTextureLoader {
    /// Empty loader.
    pub fn new() -> Self { Self::default() }

    /// Registers raw pixels under `path`.
    pub fn insert(&mut self, path: &str, width: u32, height: u32, pixels: Vec<Color4b>) {
        self.images.insert(path.to_string(), (width, height, pixels));
    }

    /// Registers a single-colored image under `path`.
    pub fn insert_solid(&mut self, path: &str, width: u32, height: u32, color: Color) {
        let pixels = vec![color.to_color4b(); (width * height) as usize];
        self.insert(path, width, height, pixels);
    }
}

impl TextureLoader for MemoryTextureLoader {
    fn load(&self, path: &str) -> Result<(u32, u32, Vec<Color4b>)> {
        self.images.get(path).cloned().ok_or_else(|| Error::TextureLoad {
            path: path.to_string(),
            reason: "no such image".to_string(),
        })
    }
}

#[cfg(feature = "png-textures")]
/// Loader reading PNG files from disk.
#[derive(Default)]
pub struct PngTextureLoader;

#[cfg(feature = "png-textures")]
impl TextureLoader for PngTextureLoader {
    fn load(&self, path: &str) -> Result<(u32, u32, Vec<Color4b>)> {
        let bytes = std::fs::read(path).map_err(|e| Error::TextureLoad {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        decode_png(&bytes).map_err(|e| Error::TextureLoad {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(feature = "png-textures")]
/// Decodes PNG bytes into RGBA pixels. Gray and RGB inputs are expanded to opaque RGBA.
pub fn decode_png(bytes: &[u8]) -> Result<(u32, u32, Vec<Color4b>)> {
    let mut decoder = Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(Transformations::normalize_to_color8());
    let mut reader = decoder.read_info().map_err(|e| Error::Png(e.to_string()))?;
    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| Error::Png("decoder did not report an output size".to_string()))?;
    let mut data = vec![0; buf_size];
    let info = reader.next_frame(&mut data).map_err(|e| Error::Png(e.to_string()))?;

    if info.bit_depth != BitDepth::Eight {
        return Err(Error::Png(format!("unsupported bit depth {:?}", info.bit_depth)));
    }
    let channels = match info.color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        ColorType::Indexed => return Err(Error::Png("palette was not expanded".to_string())),
    };

    let mut pixels = Vec::with_capacity((info.width * info.height) as usize);
    for y in 0..info.height as usize {
        let line = &data[y * info.line_size..(y + 1) * info.line_size];
        for px in line.chunks_exact(channels).take(info.width as usize) {
            pixels.push(match px {
                [v] => color4b(*v, *v, *v, 0xFF),
                [v, a] => color4b(*v, *v, *v, *a),
                [r, g, b] => color4b(*r, *g, *b, 0xFF),
                [r, g, b, a] => color4b(*r, *g, *b, *a),
                _ => Color4b::default(),
            });
        }
    }
    Ok((info.width, info.height, pixels))
}

#[cfg(feature = "png-textures")]
/// Encodes RGBA pixels as an 8-bit PNG.
pub fn encode_png(width: u32, height: u32, pixels: &[Color4b]) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, width, height);
        encoder.set_color(ColorType::Rgba);
        encoder.set_depth(BitDepth::Eight);
        let mut writer = encoder.write_header().map_err(|e| Error::Png(e.to_string()))?;
        let data = pixels.iter().flat_map(|c| [c.x, c.y, c.z, c.w]).collect::<Vec<u8>>();
        writer.write_image_data(&data).map_err(|e| Error::Png(e.to_string()))?;
    }
    Ok(bytes)
}

struct TextureCache {
    loader: Box<dyn TextureLoader>,
    textures: HashMap<String, Texture>,
}

#[derive(Clone)]
/// Shared cache of textures keyed by path.
pub struct TextureManager(Rc<RefCell<TextureCache>>);

impl TextureManager {
    /// Manager loading through `loader`.
    pub fn new<L: TextureLoader + 'static>(loader: L) -> Self {
        Self(Rc::new(RefCell::new(TextureCache {
            loader: Box::new(loader),
            textures: HashMap::new(),
        })))
    }

    /// Loads `path`, or returns the cached texture from an earlier load.
    pub fn load(&self, path: &str) -> Result<Texture> {
        if let Some(texture) = self.0.borrow().textures.get(path) {
            return Ok(texture.clone());
        }
        let (width, height, pixels) = self.0.borrow().loader.load(path)?;
        let texture = Texture::from_pixels(path, width, height, pixels)?;
        debug!("loaded texture {} ({}x{})", path, width, height);
        self.0.borrow_mut().textures.insert(path.to_string(), texture.clone());
        Ok(texture)
    }

    /// Number of cached textures.
    pub fn len(&self) -> usize { self.0.borrow().textures.len() }

    /// Returns `true` if nothing was loaded yet.
    pub fn is_empty(&self) -> bool { self.0.borrow().textures.is_empty() }

    /// Drops every cached texture. Textures still referenced elsewhere stay alive.
    pub fn clear(&self) { self.0.borrow_mut().textures.clear() }
}

impl Default for TextureManager {
    #[cfg(feature = "png-textures")]
    fn default() -> Self { Self::new(PngTextureLoader) }

    #[cfg(not(feature = "png-textures"))]
    fn default() -> Self { Self::new(MemoryTextureLoader::new()) }
}

impl Debug for TextureManager {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_fmt(format_args!("TextureManager({} cached)", self.len())) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_count_is_checked() {
        assert!(Texture::from_pixels("t", 2, 2, vec![Color4b::default(); 3]).is_err());
        let texture = Texture::from_pixels("t", 2, 1, vec![Color4b::default(); 2]).unwrap();
        assert_eq!(texture.size(), (2, 1));
        assert_eq!(texture.id(), "t");
    }

    #[test]
    fn manager_caches_by_path() {
        let mut loader = MemoryTextureLoader::new();
        loader.insert_solid("icon", 3, 3, Color::RED);
        let textures = TextureManager::new(loader);
        let a = textures.load("icon").unwrap();
        let b = textures.load("icon").unwrap();
        assert!(a.ptr_eq(&b));
        assert_eq!(textures.len(), 1);
        assert_eq!(a.pixels()[4].x, 255);
        assert!(matches!(textures.load("other"), Err(Error::TextureLoad { .. })));
    }

    #[cfg(feature = "png-textures")]
    fn encode_raw(color_type: ColorType, data: &[u8], width: u32, height: u32) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buffer, width, height);
            encoder.set_color(color_type);
            encoder.set_depth(BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        buffer
    }

    #[cfg(feature = "png-textures")]
    #[test]
    fn png_gray_alpha_expands() {
        let bytes = encode_raw(ColorType::GrayscaleAlpha, &[10, 20, 30, 40], 2, 1);
        let (w, h, pixels) = decode_png(&bytes).unwrap();
        assert_eq!((w, h), (2, 1));
        assert_eq!((pixels[1].x, pixels[1].y, pixels[1].z, pixels[1].w), (30, 30, 30, 40));
    }

    #[cfg(feature = "png-textures")]
    #[test]
    fn png_encode_decode_preserves_pixels() {
        let pixels = vec![color4b(1, 2, 3, 4), color4b(5, 6, 7, 8)];
        let bytes = encode_png(1, 2, &pixels).unwrap();
        let (w, h, decoded) = decode_png(&bytes).unwrap();
        assert_eq!((w, h), (1, 2));
        assert_eq!((decoded[1].x, decoded[1].w), (5, 8));
        assert!(matches!(decode_png(&[]), Err(Error::Png(_))));
    }
}
