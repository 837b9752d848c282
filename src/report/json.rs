use anyhow::Result;

use super::Report;

/// Render the report as pretty-printed JSON.
pub fn render(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LicenseRisk, PackageInfo, PackageSource, PolicyVerdict, ReportEntry};

    #[test]
    fn test_unknown_fields_are_null() {
        let report = Report {
            project_license: "MIT".to_string(),
            packages: vec![ReportEntry {
                package: PackageInfo::new(
                    "six".to_string(),
                    Some("1.16.0".to_string()),
                    None,
                    None,
                    0,
                    None,
                    PackageSource::Local,
                ),
                risk: LicenseRisk::Unknown,
                verdict: PolicyVerdict::Warn,
            }],
            unresolved: vec!["ghost".to_string()],
        };

        let value: serde_json::Value = serde_json::from_str(&render(&report).unwrap()).unwrap();
        let pkg = &value["packages"][0];
        assert_eq!(pkg["name"], "six");
        assert_eq!(pkg["namever"], "six-1.16.0");
        assert!(pkg["license"].is_null());
        assert_eq!(pkg["source"], "local");
        assert_eq!(pkg["risk"], "unknown");
        assert_eq!(pkg["verdict"], "warn");
        assert_eq!(value["unresolved"][0], "ghost");
    }
}
