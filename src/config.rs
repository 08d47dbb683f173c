mod error;
mod interpolation;
mod parser;

use alloc::string::String;

use hashbrown::HashMap;
use log::{debug, warn};

pub use self::error::ParseError;
pub use self::interpolation::{InterpolationError, MAX_INTERPOLATION_DEPTH};
pub use self::parser::{ConfigFile, Section};
use crate::error::PresetError;
use crate::runtime::Runtime;

/// Values for `%(name)s` references, keyed by name.
pub type Substitutions = HashMap<String, String>;

/// The parsed preset file together with the substitutions used to read it.
#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    path: String,
    file: ConfigFile,
    substitutions: Substitutions,
}

impl Store {
    /// Load the first candidate in `files` that can be read and parsed.
    pub fn load(
        runtime: &dyn Runtime,
        files: &[String],
        substitutions: &Substitutions,
    ) -> Result<Store, PresetError> {
        for path in files {
            let data = match runtime.read_file(path) {
                Ok(data) => data,
                Err(e) => {
                    debug!("Skipping preset file {path}: {e}");
                    continue;
                }
            };
            let content = match String::from_utf8(data) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping preset file {path}: {e}");
                    continue;
                }
            };
            match Store::parse(path, &content, substitutions) {
                Ok(store) => {
                    debug!("Loaded presets from {path}");
                    return Ok(store);
                }
                Err(e) => warn!("Skipping preset file {path}: {e}"),
            }
        }

        Err(PresetError::PresetFileNotFound {
            tried: files.to_vec(),
        })
    }

    pub fn parse(
        path: impl Into<String>,
        content: &str,
        substitutions: &Substitutions,
    ) -> Result<Store, ParseError> {
        Ok(Store {
            path: path.into(),
            file: ConfigFile::parse(content)?,
            substitutions: substitutions.clone(),
        })
    }

    /// Path of the file the store was loaded from.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn substitutions(&self) -> &Substitutions {
        &self.substitutions
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.file.section_names()
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.file.section(section).is_some()
    }

    /// Keys of `section` in declaration order.
    pub fn options(&self, section: &str) -> Option<impl Iterator<Item = &str>> {
        self.file.section(section).map(Section::keys)
    }

    /// The interpolated value of `key`, `None` when the key is absent or
    /// declared without a value.
    pub fn get(&self, section: &str, key: &str) -> Result<Option<String>, InterpolationError> {
        let Some(section) = self.file.section(section) else {
            return Ok(None);
        };
        let Some(Some(raw)) = section.get(key) else {
            return Ok(None);
        };

        // Options of the section shadow the substitutions
        let lookup = |name: &str| match section.get(name) {
            Some(value) => Some(value.unwrap_or_default()),
            None => self.substitutions.get(name).map(String::as_str),
        };

        interpolation::interpolate(&lookup, key, raw).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryRuntime;

    const PRESETS: &str = r#"
[preset: release]
build-type = Release
install-prefix = %(prefix)s/release
"#;

    fn substitutions() -> Substitutions {
        Substitutions::from([("prefix".to_string(), "/opt/ode".to_string())])
    }

    #[test]
    fn test_load_first_readable_file() {
        let runtime = MemoryRuntime::new()
            .file("b.ini", "[preset: b]\nx\n")
            .file("c.ini", "[preset: c]\ny\n");
        let files = ["a.ini".to_string(), "b.ini".to_string(), "c.ini".to_string()];

        let store = Store::load(&runtime, &files, &Substitutions::new()).unwrap();

        assert_eq!(store.path(), "b.ini");
        assert_eq!(store.section_names().collect::<Vec<_>>(), vec!["preset: b"]);
    }

    #[test]
    fn test_load_skips_unparsable_file() {
        let runtime = MemoryRuntime::new()
            .file("bad.ini", "x = 1\n")
            .file("good.ini", "[preset: good]\n");
        let files = ["bad.ini".to_string(), "good.ini".to_string()];

        let store = Store::load(&runtime, &files, &Substitutions::new()).unwrap();

        assert_eq!(store.path(), "good.ini");
    }

    #[test]
    fn test_load_nothing_found() {
        let runtime = MemoryRuntime::new().file("bad.ini", "[broken\n");
        let files = ["missing.ini".to_string(), "bad.ini".to_string()];

        let err = Store::load(&runtime, &files, &Substitutions::new()).unwrap_err();

        match err {
            PresetError::PresetFileNotFound { tried } => assert_eq!(tried, files),
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_get_interpolates_lazily() {
        let store = Store::parse("presets.ini", PRESETS, &substitutions()).unwrap();

        assert_eq!(
            store.get("preset: release", "install-prefix").unwrap(),
            Some("/opt/ode/release".to_string())
        );
        assert_eq!(
            store.get("preset: release", "build-type").unwrap(),
            Some("Release".to_string())
        );
    }

    #[test]
    fn test_missing_substitution_surfaces_per_key() {
        // Parsing succeeds; only reading the key fails
        let store = Store::parse("presets.ini", PRESETS, &Substitutions::new()).unwrap();

        assert_eq!(
            store.get("preset: release", "build-type").unwrap(),
            Some("Release".to_string())
        );
        assert_eq!(
            store.get("preset: release", "install-prefix").unwrap_err(),
            InterpolationError::MissingOption {
                option: "install-prefix".into(),
                reference: "prefix".into(),
            }
        );
    }

    #[test]
    fn test_section_options_shadow_substitutions() {
        let content = "[a]\nprefix = /local\npath = %(prefix)s/bin\n";
        let store = Store::parse("presets.ini", content, &substitutions()).unwrap();

        assert_eq!(
            store.get("a", "path").unwrap(),
            Some("/local/bin".to_string())
        );
    }

    #[test]
    fn test_valueless_and_absent_keys() {
        let store = Store::parse("presets.ini", "[a]\nflag\n", &Substitutions::new()).unwrap();

        assert_eq!(store.get("a", "flag").unwrap(), None);
        assert_eq!(store.get("a", "other").unwrap(), None);
        assert_eq!(store.get("b", "flag").unwrap(), None);
        assert!(store.has_section("a"));
        assert!(!store.has_section("b"));
        assert_eq!(store.options("a").unwrap().collect::<Vec<_>>(), vec!["flag"]);
        assert!(store.options("b").is_none());
    }
}
