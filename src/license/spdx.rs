use crate::models::LicenseRisk;

/// Classify a single canonical SPDX identifier into a risk level.
pub fn classify_spdx_id(id: &str) -> LicenseRisk {
    match id.trim() {
        // Permissive
        "MIT"
        | "Apache-2.0"
        | "BSD-2-Clause"
        | "BSD-3-Clause"
        | "BSD-4-Clause"
        | "ISC"
        | "0BSD"
        | "Unlicense"
        | "Zlib"
        | "CC0-1.0"
        | "WTFPL"
        | "CC-BY-4.0"
        | "CC-BY-3.0"
        | "PSF-2.0"
        | "Python-2.0"
        | "HPND"
        | "MIT-0"
        | "BlueOak-1.0.0"
        | "Artistic-2.0" => LicenseRisk::Permissive,

        // Weak copyleft
        "LGPL-2.0"
        | "LGPL-2.0-only"
        | "LGPL-2.0-or-later"
        | "LGPL-2.1"
        | "LGPL-2.1-only"
        | "LGPL-2.1-or-later"
        | "LGPL-3.0"
        | "LGPL-3.0-only"
        | "LGPL-3.0-or-later"
        | "MPL-1.1"
        | "MPL-2.0"
        | "EUPL-1.2"
        | "CDDL-1.0"
        | "EPL-1.0"
        | "EPL-2.0"
        | "APSL-2.0"
        | "OSL-3.0" => LicenseRisk::WeakCopyleft,

        // Strong copyleft
        "GPL-2.0"
        | "GPL-2.0-only"
        | "GPL-2.0-or-later"
        | "GPL-3.0"
        | "GPL-3.0-only"
        | "GPL-3.0-or-later"
        | "AGPL-3.0"
        | "AGPL-3.0-only"
        | "AGPL-3.0-or-later"
        | "EUPL-1.1" => LicenseRisk::StrongCopyleft,

        _ => LicenseRisk::Unknown,
    }
}

/// Normalize trove classifier labels and common non-SPDX strings to their
/// SPDX equivalents. Unrecognised input is returned trimmed.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed {
        "Apache 2.0"
        | "Apache License 2.0"
        | "Apache License, Version 2.0"
        | "Apache Software License"
        | "Apache-2.0 License" => "Apache-2.0".to_string(),
        "MIT License" | "The MIT License" | "MIT No Attribution License (MIT-0)" => {
            "MIT".to_string()
        }
        "BSD" | "BSD License" => "BSD-3-Clause".to_string(),
        "BSD 2-Clause" | "Simplified BSD" => "BSD-2-Clause".to_string(),
        "BSD 3-Clause" | "New BSD" | "Modified BSD" => "BSD-3-Clause".to_string(),
        "GNU GPL v2"
        | "GNU General Public License v2"
        | "GNU General Public License v2 (GPLv2)"
        | "GPL v2"
        | "GPLv2" => "GPL-2.0".to_string(),
        "GNU General Public License v2 or later (GPLv2+)" => "GPL-2.0-or-later".to_string(),
        "GNU General Public License (GPL)" => "GPL-2.0-or-later".to_string(),
        "GNU GPL v3"
        | "GNU General Public License v3"
        | "GNU General Public License v3 (GPLv3)"
        | "GPL v3"
        | "GPLv3" => "GPL-3.0".to_string(),
        "GNU General Public License v3 or later (GPLv3+)" => "GPL-3.0-or-later".to_string(),
        "GNU LGPL v2.1" | "LGPL v2.1" | "LGPLv2.1" => "LGPL-2.1".to_string(),
        "GNU Lesser General Public License v2 (LGPLv2)" => "LGPL-2.0".to_string(),
        "GNU Lesser General Public License v2 or later (LGPLv2+)"
        | "GNU Library or Lesser General Public License (LGPL)" => {
            "LGPL-2.0-or-later".to_string()
        }
        "GNU LGPL v3" | "LGPL v3" | "LGPLv3" | "GNU Lesser General Public License v3 (LGPLv3)" => {
            "LGPL-3.0".to_string()
        }
        "GNU Lesser General Public License v3 or later (LGPLv3+)" => {
            "LGPL-3.0-or-later".to_string()
        }
        "Mozilla Public License 2.0"
        | "Mozilla Public License 2.0 (MPL 2.0)"
        | "MPL 2.0"
        | "MPLv2" => "MPL-2.0".to_string(),
        "Mozilla Public License 1.1 (MPL 1.1)" => "MPL-1.1".to_string(),
        "Eclipse Public License 1.0 (EPL-1.0)" => "EPL-1.0".to_string(),
        "Eclipse Public License 2.0 (EPL-2.0)" => "EPL-2.0".to_string(),
        "ISC License" | "ISC License (ISCL)" => "ISC".to_string(),
        "CC0" | "Public Domain" | "CC0 1.0 Universal (CC0 1.0) Public Domain Dedication" => {
            "CC0-1.0".to_string()
        }
        "The Unlicense (Unlicense)" => "Unlicense".to_string(),
        "Python Software Foundation License" => "PSF-2.0".to_string(),
        "Historical Permission Notice and Disclaimer (HPND)" => "HPND".to_string(),
        "zlib/libpng License" => "Zlib".to_string(),
        "AGPL v3"
        | "AGPLv3"
        | "GNU AGPL v3"
        | "GNU Affero General Public License v3"
        | "GNU Affero General Public License v3 or later (AGPLv3+)" => "AGPL-3.0".to_string(),
        other => other.to_string(),
    }
}
