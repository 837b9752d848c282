use crate::license::spdx::{classify_spdx_id, normalize};
use crate::models::LicenseRisk;

const OSI_APPROVED: &str = "OSI Approved";

/// Extract the license labels from a list of trove classifiers.
///
/// Every classifier starting with `License` contributes its last
/// `" :: "` segment, except the bare `OSI Approved` category. Labels keep
/// their encounter order and are joined with `", "`. Returns `None` when
/// no license classifier is present.
pub fn license_from_classifiers<S: AsRef<str>>(classifiers: &[S]) -> Option<String> {
    let licenses: Vec<&str> = classifiers
        .iter()
        .map(AsRef::as_ref)
        .filter(|c| c.starts_with("License"))
        .filter_map(|c| c.split(" :: ").last())
        .filter(|label| *label != OSI_APPROVED)
        .collect();

    if licenses.is_empty() {
        None
    } else {
        Some(licenses.join(", "))
    }
}

/// Classify a resolved license string into a risk level.
///
/// Handles:
/// - comma-joined classifier labels (`MIT License, Apache Software License`)
///   → labels are alternatives, most permissive wins
/// - SPDX OR expressions (MIT OR Apache-2.0)  → most permissive wins
/// - SPDX AND expressions (MIT AND GPL-3.0)  → most restrictive wins
/// - Proprietary/commercial strings
/// - Empty / unknown
pub fn classify(license: &str) -> LicenseRisk {
    let trimmed = license.trim();

    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unknown") {
        return LicenseRisk::Unknown;
    }

    let lower = trimmed.to_lowercase();
    if lower.contains("proprietary") || lower.contains("commercial") {
        return LicenseRisk::Proprietary;
    }

    // Free-text licenses may contain commas ("Apache License, Version 2.0")
    let whole = classify_expression(trimmed);
    if whole != LicenseRisk::Unknown || !trimmed.contains(", ") {
        return whole;
    }

    let risks: Vec<LicenseRisk> = trimmed.split(", ").map(classify_expression).collect();
    most_permissive(risks)
}

fn classify_expression(expr: &str) -> LicenseRisk {
    // Normalize before splitting on "/" so labels like "zlib/libpng License" survive
    let normalized = normalize(expr).replace('/', " OR ");

    if normalized.contains(" OR ") {
        let risks: Vec<LicenseRisk> = normalized
            .split(" OR ")
            .map(|p| classify_single(p.trim()))
            .collect();
        return most_permissive(risks);
    }

    if normalized.contains(" AND ") {
        let risks: Vec<LicenseRisk> = normalized
            .split(" AND ")
            .map(|p| classify_single(p.trim()))
            .collect();
        return most_restrictive(risks);
    }

    classify_single(&normalized)
}

fn classify_single(id: &str) -> LicenseRisk {
    // Strip WITH exception clauses (e.g. "GPL-2.0 WITH Classpath-exception-2.0")
    let base = id.split(" WITH ").next().unwrap_or(id).trim();
    classify_spdx_id(&normalize(base))
}

fn most_permissive(risks: Vec<LicenseRisk>) -> LicenseRisk {
    [
        LicenseRisk::Permissive,
        LicenseRisk::WeakCopyleft,
        LicenseRisk::StrongCopyleft,
        LicenseRisk::Proprietary,
    ]
    .into_iter()
    .find(|r| risks.contains(r))
    .unwrap_or(LicenseRisk::Unknown)
}

fn most_restrictive(risks: Vec<LicenseRisk>) -> LicenseRisk {
    [
        LicenseRisk::Proprietary,
        LicenseRisk::StrongCopyleft,
        LicenseRisk::WeakCopyleft,
        LicenseRisk::Permissive,
    ]
    .into_iter()
    .find(|r| risks.contains(r))
    .unwrap_or(LicenseRisk::Unknown)
}
