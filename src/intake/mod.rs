//! Client-side image intake: validate a chosen file, downscale it, and
//! re-encode it as a JPEG data URL small enough for a JSON request body.

pub mod config;
pub mod data_url;
pub mod encode;
pub mod error;

use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use tokio::sync::watch;

pub use config::IntakeConfig;
pub use data_url::{DataUrlError, decode_data_url, encode_data_url};
pub use encode::{EncodedImage, OUTPUT_MIME_TYPE, downscale_and_encode, target_dimensions};
pub use error::IntakeError;

/// A file the user picked or dropped.
#[derive(Clone)]
pub struct ImageFile {
    pub name: String,
    /// The declared MIME type.
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Builds a file whose type is sniffed from its magic bytes.
    pub fn sniffed(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mime_type = infer::get(&bytes)
            .map(|kind| kind.mime_type())
            .unwrap_or("application/octet-stream");
        Self::new(name, mime_type, bytes)
    }

    /// Reads a file from disk, sniffing its type.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::sniffed(name, bytes))
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// What the intake currently holds, as seen by subscribers.
#[derive(Debug, Clone, Default)]
pub enum Selection {
    #[default]
    Empty,
    Image {
        encoded: Arc<EncodedImage>,
        original: Arc<ImageFile>,
    },
}

impl Selection {
    /// The encoded payload, or `""` when empty.
    pub fn payload(&self) -> &str {
        match self {
            Selection::Empty => "",
            Selection::Image { encoded, .. } => encoded.as_str(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::Empty)
    }
}

/// Turns user-chosen image files into bounded JPEG data URLs and holds the
/// latest one as the preview.
///
/// When `accept` calls overlap, the last one wins: earlier calls still
/// finish decoding but return [`IntakeError::Superseded`] without touching
/// the preview.
pub struct ImageIntake {
    config: Arc<IntakeConfig>,
    preview: watch::Sender<Selection>,
    generation: AtomicU64,
}

impl Default for ImageIntake {
    fn default() -> Self {
        Self::new(IntakeConfig::default())
    }
}

impl ImageIntake {
    pub fn new(config: IntakeConfig) -> Self {
        let (preview, _) = watch::channel(Selection::Empty);
        Self {
            config: Arc::new(config),
            preview,
            generation: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    /// The held preview.
    pub fn preview(&self) -> Selection {
        self.preview.borrow().clone()
    }

    /// Watches the preview. Every `accept` success and every `clear`
    /// publishes a new value.
    pub fn subscribe(&self) -> watch::Receiver<Selection> {
        self.preview.subscribe()
    }

    fn check(&self, file: &ImageFile) -> Result<(), IntakeError> {
        if !self.config.allows(&file.mime_type) {
            return Err(IntakeError::UnsupportedType(file.mime_type.clone()));
        }

        if file.size() > self.config.max_bytes {
            return Err(IntakeError::TooLarge {
                size: file.size(),
                max: self.config.max_bytes,
            });
        }

        Ok(())
    }

    /// Validates, downscales and re-encodes `file`, then makes it the
    /// preview.
    ///
    /// Type and size are checked before any decoding. Decoding runs on a
    /// blocking thread and is the only suspension point.
    pub async fn accept(&self, file: ImageFile) -> Result<Selection, IntakeError> {
        if let Err(e) = self.check(&file) {
            tracing::warn!("🚫 Rejected {:?}: {}", file, e);
            return Err(e);
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!("📥 Processing {} ({} bytes)", file.name, file.size());

        let original = Arc::new(file);
        let job = Arc::clone(&original);
        let config = Arc::clone(&self.config);

        let encoded = tokio::task::spawn_blocking(move || downscale_and_encode(&job.bytes, &config))
            .await
            .map_err(|e| IntakeError::Decode(format!("decode task failed: {}", e)))?
            .inspect_err(|e| tracing::warn!("❌ {}: {}", original.name, e))?;

        let selection = Selection::Image {
            encoded: Arc::new(encoded),
            original,
        };

        let applied = self.preview.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) == generation {
                *current = selection.clone();
                true
            } else {
                false
            }
        });

        if !applied {
            tracing::debug!("⏭️ Discarding superseded image (generation {})", generation);
            return Err(IntakeError::Superseded);
        }

        tracing::info!("✅ Image ready ({} chars encoded)", selection.payload().len());
        Ok(selection)
    }

    /// Drops the preview and publishes an empty selection. Idempotent; also
    /// supersedes any `accept` still decoding.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.preview.send_replace(Selection::Empty);
        tracing::debug!("🧹 Image preview cleared");
    }
}
