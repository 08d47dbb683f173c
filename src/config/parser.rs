use alloc::string::{String, ToString};
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::config::error::ParseError;

/// A named group of options, keeping the order in which keys were declared.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    pub name: String,
    entries: Vec<(String, Option<String>)>,
    index: HashMap<String, usize>,
}

impl Section {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn set(&mut self, key: &str, value: Option<String>) {
        if let Some(&n) = self.index.get(key) {
            // Key already exists, overwrite it but keep its position
            self.entries[n].1 = value;
        } else {
            self.index.insert(key.to_string(), self.entries.len());
            self.entries.push((key.to_string(), value));
        }
    }

    /// Raw value of `key`. The outer `None` means the key is absent, the inner
    /// one that it was declared without a value.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        let n = *self.index.get(key)?;
        Some(self.entries[n].1.as_deref())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    sections: Vec<Section>,
    index: HashMap<String, usize>,
}

impl ConfigFile {
    pub fn parse(content: &str) -> Result<ConfigFile, ParseError> {
        let mut parser = ConfigFileParser::new(content);
        parser.parse()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        let n = *self.index.get(name)?;
        self.sections.get(n)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    fn section_mut(&mut self, name: &str) -> &mut Section {
        let n = match self.index.get(name) {
            Some(&n) => n,
            None => {
                let n = self.sections.len();
                self.sections.push(Section::new(name));
                self.index.insert(name.to_string(), n);
                n
            }
        };
        &mut self.sections[n]
    }
}

/// The option that indented lines are appended to.
struct Cursor {
    key: String,
    indent: usize,
    blank_lines: usize,
}

struct ConfigFileParser<'a> {
    content: &'a str,
    file: ConfigFile,
    current_section: Option<String>,
    cursor: Option<Cursor>,
}

impl<'a> ConfigFileParser<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            content,
            file: ConfigFile::default(),
            current_section: None,
            cursor: None,
        }
    }

    fn parse(&mut self) -> Result<ConfigFile, ParseError> {
        let content = self.content;
        for (n, raw) in content.lines().enumerate() {
            self.parse_line(n + 1, raw)?;
        }
        Ok(core::mem::take(&mut self.file))
    }

    fn parse_line(&mut self, line: usize, raw: &str) -> Result<(), ParseError> {
        let trimmed = raw.trim();

        // Kept only if the value continues after it
        if trimmed.is_empty() {
            if let Some(cursor) = &mut self.cursor {
                cursor.blank_lines += 1;
            }
            return Ok(());
        }

        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            return Ok(());
        }

        let indent = raw.len() - raw.trim_start().len();
        if let Some(cursor) = &self.cursor {
            if indent > cursor.indent {
                return self.continue_value(line, trimmed);
            }
        }

        if let Some(header) = trimmed.strip_prefix('[') {
            let close = header
                .rfind(']')
                .ok_or(ParseError::MalformedSectionHeader { line })?;
            let name = &header[..close];
            let trailing = header[close + 1..].trim_start();
            if name.is_empty()
                || !(trailing.is_empty() || trailing.starts_with('#') || trailing.starts_with(';'))
            {
                return Err(ParseError::MalformedSectionHeader { line });
            }
            self.file.section_mut(name);
            self.current_section = Some(name.to_string());
            self.cursor = None;
            return Ok(());
        }

        let section = self
            .current_section
            .clone()
            .ok_or(ParseError::MissingSectionHeader { line })?;

        let (key, value) = match trimmed.find(['=', ':']) {
            Some(pos) => (
                trimmed[..pos].trim(),
                Some(trimmed[pos + 1..].trim().to_string()),
            ),
            None => (trimmed, None),
        };

        if key.is_empty() {
            return Err(ParseError::EmptyKey { line });
        }

        self.file.section_mut(&section).set(key, value);
        self.cursor = Some(Cursor {
            key: key.to_string(),
            indent,
            blank_lines: 0,
        });

        Ok(())
    }

    fn continue_value(&mut self, line: usize, text: &str) -> Result<(), ParseError> {
        let (Some(section), Some(cursor)) = (&self.current_section, &self.cursor) else {
            return Err(ParseError::MissingSectionHeader { line });
        };

        let section = self.file.section_mut(section);
        let value = match section.get(&cursor.key) {
            Some(Some(value)) => {
                let mut value = value.to_string();
                for _ in 0..cursor.blank_lines {
                    value.push('\n');
                }
                value.push('\n');
                value.push_str(text);
                value
            }
            _ => {
                return Err(ParseError::ContinuationWithoutValue {
                    line,
                    key: cursor.key.clone(),
                });
            }
        };
        section.set(&cursor.key, Some(value));
        if let Some(cursor) = &mut self.cursor {
            cursor.blank_lines = 0;
        }
        Ok(())
    }
}
