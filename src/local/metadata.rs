use std::collections::HashMap;

/// Header block of a core metadata file (`METADATA` / `PKG-INFO`).
///
/// Keys are stored lowercased; repeated keys keep every value in file order.
#[derive(Debug, Default, Clone)]
pub struct CoreMetadata {
    headers: HashMap<String, Vec<String>>,
}

impl CoreMetadata {
    /// Parse the RFC 822 style header section. Parsing stops at the first
    /// blank line; the long description that follows is ignored.
    pub fn parse(content: &str) -> Self {
        let mut headers: HashMap<String, Vec<String>> = HashMap::new();
        let mut current: Option<(String, String)> = None;

        for line in content.lines() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                break;
            }

            if line.starts_with(' ') || line.starts_with('\t') {
                if let Some((_, value)) = current.as_mut() {
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(line.trim_start());
                }
                continue;
            }

            if let Some((key, value)) = current.take() {
                headers.entry(key).or_default().push(value);
            }

            if let Some((key, value)) = line.split_once(':') {
                current = Some((key.trim().to_ascii_lowercase(), value.trim().to_string()));
            }
        }

        if let Some((key, value)) = current {
            headers.entry(key).or_default().push(value);
        }

        Self { headers }
    }

    /// First non-empty value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Every value of `key`, in file order.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METADATA: &str = "Metadata-Version: 2.1
Name: requests
Version: 2.31.0
Summary: Python HTTP for Humans.
Home-page: https://requests.readthedocs.io
Author: Kenneth Reitz
License: Apache 2.0
Classifier: Development Status :: 5 - Production/Stable
Classifier: License :: OSI Approved :: Apache Software License
Description-Content-Type: text/markdown

# Requests

Classifier: not a header
";

    #[test]
    fn test_parse_headers() {
        let meta = CoreMetadata::parse(METADATA);
        assert_eq!(meta.get("Name"), Some("requests"));
        assert_eq!(meta.get("version"), Some("2.31.0"));
        assert_eq!(meta.get("Home-page"), Some("https://requests.readthedocs.io"));
        assert_eq!(meta.get("Author-email"), None);
    }

    #[test]
    fn test_repeated_keys_stop_at_body() {
        let meta = CoreMetadata::parse(METADATA);
        assert_eq!(
            meta.get_all("Classifier"),
            &[
                "Development Status :: 5 - Production/Stable".to_string(),
                "License :: OSI Approved :: Apache Software License".to_string(),
            ]
        );
    }

    #[test]
    fn test_continuation_lines() {
        let meta = CoreMetadata::parse("Name: demo\nLicense: BSD 3-Clause\n        Copyright (c) Demo\nVersion: 1.0\n");
        assert_eq!(meta.get("License"), Some("BSD 3-Clause Copyright (c) Demo"));
        assert_eq!(meta.get("Version"), Some("1.0"));
    }

    #[test]
    fn test_empty_value_is_absent() {
        let meta = CoreMetadata::parse("Name: demo\nAuthor: \n");
        assert_eq!(meta.get("Author"), None);
        assert_eq!(meta.get_all("Author").len(), 1);
    }
}
