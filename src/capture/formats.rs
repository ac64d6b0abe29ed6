//! Registry of informal image format names that can be written.

use image::ImageFormat;

/// Format preferred when the caller does not ask for one.
pub const PREFERRED_FORMAT: &str = "png";

/// The set of informal format names ("png", "jpg", ...) with a compiled-in encoder.
///
/// Built once at startup and handed by reference to whatever needs it.
/// Lookups are case-insensitive; names are stored lowercase in registry order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRegistry {
    names: Vec<String>,
}

impl FormatRegistry {
    /// Query the `image` crate for every format it can encode.
    pub fn detect() -> Self {
        let names = ImageFormat::all()
            .filter(|format| format.writing_enabled())
            .flat_map(|format| format.extensions_str().iter().copied())
            .map(str::to_ascii_lowercase)
            .collect::<Vec<_>>();

        log::debug!("Detected writable image formats: {:?}", names);
        Self::from_names(names)
    }

    /// Build a registry from an explicit list of names, dropping duplicates.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim().to_ascii_lowercase();
            if !name.is_empty() && !unique.contains(&name) {
                unique.push(name);
            }
        }
        Self { names: unique }
    }

    /// All supported informal format names.
    pub fn formats(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn is_supported(&self, name: &str) -> bool {
        self.names.iter().any(|known| known.eq_ignore_ascii_case(name))
    }

    /// "png" when available, otherwise the first supported name.
    ///
    /// Empty when the registry has no formats at all.
    pub fn default_format(&self) -> &str {
        self.preferred_or_default(PREFERRED_FORMAT)
    }

    /// `preferred` when supported, otherwise [`Self::default_format`] rules apply.
    pub fn preferred_or_default(&self, preferred: &str) -> &str {
        if let Some(found) = self.lookup(preferred) {
            return found;
        }
        self.lookup(PREFERRED_FORMAT)
            .or_else(|| self.names.first().map(String::as_str))
            .unwrap_or("")
    }

    /// Encoder for a supported name.
    pub fn image_format(&self, name: &str) -> Option<ImageFormat> {
        self.lookup(name).and_then(ImageFormat::from_extension)
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|known| known.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detected_registry_contains_enabled_encoders() {
        let registry = FormatRegistry::detect();
        for name in ["png", "jpg", "jpeg", "gif", "bmp", "tiff"] {
            assert!(registry.is_supported(name), "{name} should be writable");
        }
        assert_eq!(registry.default_format(), "png");
    }

    #[test]
    fn every_listed_format_is_supported() {
        let registry = FormatRegistry::detect();
        assert!(!registry.is_empty());
        for name in registry.formats() {
            assert!(registry.is_supported(name));
            assert!(registry.image_format(name).is_some(), "{name} has no encoder");
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        let registry = FormatRegistry::detect();
        assert!(!registry.is_supported("bogusFormat"));
        assert!(!registry.is_supported(""));
        assert!(registry.image_format("bogusFormat").is_none());
    }

    #[test]
    fn lookup_ignores_case() {
        let registry = FormatRegistry::from_names(["png", "jpg"]);
        assert!(registry.is_supported("PNG"));
        assert!(registry.is_supported("Jpg"));
        assert_eq!(registry.image_format("JPG"), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn default_falls_back_to_first_format_without_png() {
        let registry = FormatRegistry::from_names(["gif", "bmp"]);
        assert_eq!(registry.default_format(), "gif");
        assert_eq!(registry.preferred_or_default("bmp"), "bmp");
        assert_eq!(registry.preferred_or_default("webp"), "gif");
    }

    #[test]
    fn empty_registry_has_empty_default() {
        let registry = FormatRegistry::from_names(Vec::<String>::new());
        assert!(registry.is_empty());
        assert_eq!(registry.default_format(), "");
    }

    #[test]
    fn duplicates_are_collapsed() {
        let registry = FormatRegistry::from_names(["png", "PNG", " png "]);
        assert_eq!(registry.formats(), ["png".to_string()]);
    }
}
