/// Image types the intake accepts, by declared MIME type.
pub const DEFAULT_ALLOWED_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// The largest original file accepted, in bytes (10 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// The bound on the longer side of the encoded image, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 800;

/// JPEG quality on a 0–1 scale.
pub const DEFAULT_QUALITY: f32 = 0.8;

/// Limits and output settings for [`super::ImageIntake`].
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeConfig {
    pub max_dimension: u32,
    pub quality: f32,
    pub allowed_types: Vec<String>,
    pub max_bytes: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            quality: DEFAULT_QUALITY,
            allowed_types: DEFAULT_ALLOWED_TYPES.iter().map(|t| t.to_string()).collect(),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

impl IntakeConfig {
    /// Whether `mime_type` is on the allow-list. Case-insensitive.
    pub fn allows(&self, mime_type: &str) -> bool {
        self.allowed_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime_type.trim()))
    }

    /// The quality as the 1–100 factor JPEG encoders take.
    pub fn jpeg_quality(&self) -> u8 {
        let scaled = (self.quality.clamp(0.0, 1.0) * 100.0).round() as u8;
        scaled.max(1)
    }
}
