use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use crate::{AssetError, MatcapImage, Typeface};

/// Resolves and decodes assets below a root directory.
///
/// Paths are web-root style: a leading `/` means "the assets root", not the
/// filesystem root.
#[derive(Debug, Clone)]
pub struct AssetLoader {
    root: PathBuf,
}

/// A background load in flight. Dropping it detaches the task; the callback
/// still runs when decoding finishes.
#[derive(Debug)]
pub struct AssetTask {
    path: String,
    handle: JoinHandle<()>,
}

impl AssetTask {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the task and its callback have run.
    pub fn join(self) {
        if self.handle.join().is_err() {
            tracing::error!("asset task for {} panicked", self.path);
        }
    }
}

impl AssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an asset path onto the filesystem.
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    /// Read and parse a typeface JSON font.
    pub fn load_font(&self, path: &str) -> Result<Typeface, AssetError> {
        let text = std::fs::read_to_string(self.resolve(path)).map_err(|source| AssetError::Io {
            path: path.to_string(),
            source,
        })?;
        let font = Typeface::from_json(&text)?;
        tracing::debug!(
            "loaded font {:?} from {path} ({} glyphs)",
            font.family_name(),
            font.glyph_count()
        );
        Ok(font)
    }

    /// Read and decode a matcap texture.
    pub fn load_matcap(&self, path: &str) -> Result<MatcapImage, AssetError> {
        let bytes = std::fs::read(self.resolve(path)).map_err(|source| AssetError::Io {
            path: path.to_string(),
            source,
        })?;
        let image = MatcapImage::decode(&bytes)?;
        tracing::debug!("loaded matcap {path} ({}x{})", image.width, image.height);
        Ok(image)
    }

    /// Load a font on a background thread and hand the result to `done`.
    pub fn spawn_font<F>(&self, path: &str, done: F) -> Result<AssetTask, AssetError>
    where
        F: FnOnce(Result<Typeface, AssetError>) + Send + 'static,
    {
        let loader = self.clone();
        let owned = path.to_string();
        self.spawn(path, move || done(loader.load_font(&owned)))
    }

    /// Load a matcap texture on a background thread and hand the result to `done`.
    pub fn spawn_matcap<F>(&self, path: &str, done: F) -> Result<AssetTask, AssetError>
    where
        F: FnOnce(Result<MatcapImage, AssetError>) + Send + 'static,
    {
        let loader = self.clone();
        let owned = path.to_string();
        self.spawn(path, move || done(loader.load_matcap(&owned)))
    }

    fn spawn<F>(&self, path: &str, job: F) -> Result<AssetTask, AssetError>
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = std::thread::Builder::new()
            .name(format!("asset:{path}"))
            .spawn(job)
            .map_err(AssetError::TaskSpawn)?;
        Ok(AssetTask {
            path: path.to_string(),
            handle,
        })
    }
}
