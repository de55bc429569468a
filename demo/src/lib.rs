//! Shared demo helpers: filesystem asset source, texture decoding with a
//! procedural fallback, and the scene source bundle both binaries use.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use render_api::{AssetSource, RenderError, SceneSources, TextureData};

/// Pointer deltas are scaled to degrees with the same factor the original
/// touch handling used.
pub const TOUCH_SCALE_FACTOR: f32 = 180.0 / 320.0;

/// Asset source backed by a directory on disk.
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirAssetSource {
    fn open(&self, name: &str) -> Result<Box<dyn BufRead>, RenderError> {
        let path = self.root.join(name);
        let file = File::open(&path).map_err(|e| RenderError::ResourceUnavailable {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Decode an image file to RGBA8; fall back to a generated checkerboard when
/// the file is missing so the demo runs without downloaded assets.
pub fn load_texture_or_checker(path: &Path, tint: [u8; 3]) -> TextureData {
    match image::open(path) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let (width, height) = rgba.dimensions();
            TextureData {
                data: rgba.into_raw(),
                width,
                height,
            }
        }
        Err(e) => {
            log::info!("{}: {e}; using generated checkerboard", path.display());
            checkerboard(tint)
        }
    }
}

/// 64x64 two-tone checkerboard with 8px squares.
pub fn checkerboard(tint: [u8; 3]) -> TextureData {
    const SIZE: u32 = 64;
    const SQUARE: u32 = 8;
    let mut data = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let dark = ((x / SQUARE) + (y / SQUARE)) % 2 == 0;
            let scale = if dark { 0.55 } else { 1.0 };
            for channel in tint {
                data.push((channel as f32 * scale) as u8);
            }
            data.push(255);
        }
    }
    TextureData {
        data,
        width: SIZE,
        height: SIZE,
    }
}

/// The demo scene: the cube model plus textures for both objects.
pub fn scene_sources(asset_dir: &Path) -> SceneSources {
    SceneSources {
        model_asset: "cube.obj".to_string(),
        model_texture: Some(load_texture_or_checker(
            &asset_dir.join("model.png"),
            [220, 130, 60],
        )),
        plane_texture: Some(load_texture_or_checker(
            &asset_dir.join("ground.png"),
            [90, 140, 90],
        )),
    }
}

/// Asset directory: next to the manifest when running via cargo, else the
/// current directory.
pub fn asset_dir() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
    if manifest.is_dir() {
        manifest
    } else {
        PathBuf::from("assets")
    }
}
