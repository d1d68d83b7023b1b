//! Extension-based content classification.
//!
//! Pure policy data: which extensions display as images, which are opaque
//! binaries, and what syntax-language label a text file gets. Lookup is by
//! the lowercased text after the last dot; a name with no dot is looked up
//! whole. Unknown extensions fall back to text with the extension itself as
//! the language label, so new file types degrade to a plain text view
//! rather than an error.

use std::collections::{HashMap, HashSet};

/// Content classification of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Decoded and displayed as text.
    Text,
    /// Linked by URL and displayed as an image; never decoded.
    Image,
    /// Linked by URL for download; never decoded.
    Binary,
}

impl FileKind {
    /// Stable lowercase label for display and logging.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Binary => "binary",
        }
    }
}

/// A file's resolved classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// How the file's content is handled.
    pub kind: FileKind,
    /// Syntax-language label. For unknown extensions this is the extension
    /// itself; empty only for empty names.
    pub language: String,
}

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "svg", "webp"];

const BINARY_EXTENSIONS: [&str; 6] = ["exe", "zip", "tar", "gz", "bin", "pdf"];

const LANGUAGES: [(&str, &str); 17] = [
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("py", "python"),
    ("java", "java"),
    ("go", "go"),
    ("rs", "rust"),
    ("cpp", "cpp"),
    ("c", "c"),
    ("cs", "csharp"),
    ("php", "php"),
    ("rb", "ruby"),
    ("swift", "swift"),
    ("kt", "kotlin"),
    ("md", "markdown"),
    ("markdown", "markdown"),
];

/// Extension lookup table behind [`classify`](Self::classify).
#[derive(Debug, Clone)]
pub struct ClassifyTable {
    image_extensions: HashSet<String>,
    binary_extensions: HashSet<String>,
    languages: HashMap<String, String>,
}

impl Default for ClassifyTable {
    fn default() -> Self {
        Self {
            image_extensions: IMAGE_EXTENSIONS.iter().map(|s| (*s).to_owned()).collect(),
            binary_extensions: BINARY_EXTENSIONS.iter().map(|s| (*s).to_owned()).collect(),
            languages: LANGUAGES
                .iter()
                .map(|(ext, lang)| ((*ext).to_owned(), (*lang).to_owned()))
                .collect(),
        }
    }
}

impl ClassifyTable {
    /// Classify a file by name.
    #[must_use]
    pub fn classify(&self, name: &str) -> Classification {
        let extension = extension_of(name);

        let kind = if self.image_extensions.contains(&extension) {
            FileKind::Image
        } else if self.binary_extensions.contains(&extension) {
            FileKind::Binary
        } else {
            FileKind::Text
        };

        let language = self
            .languages
            .get(&extension)
            .cloned()
            .unwrap_or(extension);

        Classification { kind, language }
    }

    /// Add extensions that display as images.
    pub fn add_image_extensions<I>(&mut self, extensions: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.image_extensions
            .extend(extensions.into_iter().map(|e| e.to_lowercase()));
    }

    /// Add extensions treated as opaque binaries.
    pub fn add_binary_extensions<I>(&mut self, extensions: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.binary_extensions
            .extend(extensions.into_iter().map(|e| e.to_lowercase()));
    }

    /// Add or override extension-to-language mappings.
    pub fn add_languages(&mut self, languages: HashMap<String, String>) {
        for (extension, language) in languages {
            self.languages.insert(extension.to_lowercase(), language);
        }
    }
}

/// The lowercased text after the last dot, or the whole lowercased name
/// when there is no dot.
fn extension_of(name: &str) -> String {
    name.rsplit('.').next().unwrap_or_default().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_source_extensions_map_to_languages() {
        let table = ClassifyTable::default();
        let rust = table.classify("main.rs");
        assert_eq!(rust.kind, FileKind::Text);
        assert_eq!(rust.language, "rust");

        assert_eq!(table.classify("app.tsx").language, "typescript");
        assert_eq!(table.classify("README.md").language, "markdown");
    }

    #[test]
    fn unknown_extension_is_text_with_itself_as_language() {
        let table = ClassifyTable::default();
        let classification = table.classify("config.toml");
        assert_eq!(classification.kind, FileKind::Text);
        assert_eq!(classification.language, "toml");
    }

    #[test]
    fn dotless_name_uses_the_whole_name() {
        let table = ClassifyTable::default();
        let classification = table.classify("Makefile");
        assert_eq!(classification.kind, FileKind::Text);
        assert_eq!(classification.language, "makefile");
    }

    #[test]
    fn only_the_last_extension_counts() {
        let table = ClassifyTable::default();
        assert_eq!(table.classify("dump.tar.gz").kind, FileKind::Binary);
    }

    #[test]
    fn classification_ignores_case() {
        let table = ClassifyTable::default();
        assert_eq!(table.classify("PHOTO.PNG").kind, FileKind::Image);
        assert_eq!(table.classify("Setup.EXE").kind, FileKind::Binary);
    }

    #[test]
    fn images_and_binaries_are_detected() {
        let table = ClassifyTable::default();
        for name in ["a.png", "b.jpg", "c.jpeg", "d.gif", "e.svg", "f.webp"] {
            assert_eq!(table.classify(name).kind, FileKind::Image, "{name}");
        }
        for name in ["a.exe", "b.zip", "c.tar", "d.gz", "e.bin", "f.pdf"] {
            assert_eq!(table.classify(name).kind, FileKind::Binary, "{name}");
        }
    }

    #[test]
    fn added_extensions_extend_the_defaults() {
        let mut table = ClassifyTable::default();
        table.add_image_extensions(vec!["ICO".to_owned()]);
        table.add_binary_extensions(vec!["wasm".to_owned()]);
        table.add_languages(HashMap::from([(
            "zig".to_owned(),
            "zig".to_owned(),
        )]));

        assert_eq!(table.classify("favicon.ico").kind, FileKind::Image);
        assert_eq!(table.classify("mod.wasm").kind, FileKind::Binary);
        assert_eq!(table.classify("build.zig").language, "zig");
        // Defaults survive the additions.
        assert_eq!(table.classify("photo.png").kind, FileKind::Image);
    }
}
