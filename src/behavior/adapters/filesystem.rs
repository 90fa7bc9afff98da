//! Photo store writing PNG files into a capability directory.

use std::io::Cursor;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use image::{ImageFormat, RgbImage};
use tracing::debug;

use crate::behavior::ports::{PhotoStore, PhotoStoreError, PhotoStoreResult};
use crate::registry::domain::MarkerId;

/// Writes `<marker id>.png` files into one output directory.
#[derive(Debug)]
pub struct DirPhotoStore {
    root: Utf8PathBuf,
    dir: Dir,
}

impl DirPhotoStore {
    /// Opens `root`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while creating or opening the
    /// directory.
    pub fn open(root: &Utf8Path) -> std::io::Result<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self {
            root: root.to_owned(),
            dir,
        })
    }

    /// Returns the output directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

impl PhotoStore for DirPhotoStore {
    fn save(&self, marker: MarkerId, image: &RgbImage) -> PhotoStoreResult<String> {
        let mut encoded = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
            .map_err(PhotoStoreError::encode)?;
        let file_name = format!("{marker}.png");
        self.dir
            .write(&file_name, &encoded)
            .map_err(PhotoStoreError::io)?;
        let path = self.root.join(&file_name);
        debug!(path = %path, bytes = encoded.len(), "wrote photo");
        Ok(path.into_string())
    }
}
