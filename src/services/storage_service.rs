use image::ImageFormat;
use std::error::Error;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Folder (relatif terhadap root storage) tempat unggahan galeri disimpan.
pub const GALLERY_DIR: &str = "gallery";

/// Penyimpanan file lokal yang disajikan lewat `ServeDir` di `public_url`.
#[derive(Debug, Clone)]
pub struct StorageService {
    root: PathBuf,
    public_url: String,
    max_upload_bytes: usize,
}

impl StorageService {
    pub fn new(root: impl Into<PathBuf>, public_url: &str, max_upload_bytes: usize) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.trim_end_matches('/').to_string(),
            max_upload_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub async fn ensure_root(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(self.root.join(GALLERY_DIR)).await
    }

    /// Tebak format gambar dari isi file, bukan dari nama atau header.
    pub fn detect_image_format(data: &[u8]) -> Option<ImageFormat> {
        image::guess_format(data).ok()
    }

    /// Simpan gambar dengan nama unik, kembalikan path relatif (`gallery/<uuid>.<ext>`).
    pub async fn store_image(
        &self,
        file_data: &[u8],
        file_name: &str,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let extension = Self::detect_image_format(file_data)
            .and_then(|f| f.extensions_str().first().copied())
            .map(str::to_string)
            .or_else(|| {
                Path::new(file_name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_ascii_lowercase())
            })
            .unwrap_or_else(|| "img".to_string());

        let relative = format!("{}/{}.{}", GALLERY_DIR, Uuid::now_v7(), extension);
        let target = self.root.join(&relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, file_data).await?;

        tracing::debug!("Stored upload {} as {}", file_name, relative);
        Ok(relative)
    }

    /// Hapus file unggahan lokal. Path manual / URL eksternal diabaikan.
    pub async fn delete(&self, path: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        if !Self::is_local_upload(path) {
            return Ok(());
        }
        match tokio::fs::remove_file(self.root.join(path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_local_upload(path: &str) -> bool {
        path.starts_with(&format!("{}/", GALLERY_DIR)) && !path.contains("..")
    }

    /// URL publik untuk sebuah `image_path`.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") || path.starts_with('/') {
            path.to_string()
        } else if Self::is_local_upload(path) {
            format!("{}/{}", self.public_url, path)
        } else {
            // Aset publik situs, mis. "img/gambar1.jpg"
            format!("/{}", path)
        }
    }
}
