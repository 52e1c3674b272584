use crate::models::SourceType;

/// Source type implied by a canonical SPDX identifier, if it is a known one.
pub fn source_type_for_id(id: &str) -> Option<SourceType> {
    match id.trim() {
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
        | "MIT-0"
        | "BlueOak-1.0.0"
        | "Artistic-2.0" => Some(SourceType::OpensourceNoCopyleft),

        "LGPL-2.0"
        | "LGPL-2.0-only"
        | "LGPL-2.0-or-later"
        | "LGPL-2.1"
        | "LGPL-2.1-only"
        | "LGPL-2.1-or-later"
        | "LGPL-3.0"
        | "LGPL-3.0-only"
        | "LGPL-3.0-or-later"
        | "MPL-2.0"
        | "EUPL-1.1"
        | "EUPL-1.2"
        | "CDDL-1.0"
        | "EPL-1.0"
        | "EPL-2.0"
        | "APSL-2.0"
        | "OSL-3.0"
        | "GPL-2.0"
        | "GPL-2.0-only"
        | "GPL-2.0-or-later"
        | "GPL-3.0"
        | "GPL-3.0-only"
        | "GPL-3.0-or-later"
        | "AGPL-3.0"
        | "AGPL-3.0-only"
        | "AGPL-3.0-or-later" => Some(SourceType::OpensourceCopyleft),

        _ => None,
    }
}

/// Map a common non-SPDX license name to its SPDX identifier.
///
/// Returns `None` when the name is not a known alias.
pub fn normalize(raw: &str) -> Option<&'static str> {
    let id = match raw.trim() {
        "Apache 2.0" | "Apache License 2.0" | "Apache License, Version 2.0" | "ASL 2.0" => {
            "Apache-2.0"
        }
        "MIT License" | "The MIT License" => "MIT",
        "BSD" | "BSD License" | "New BSD" | "Modified BSD" | "BSD 3-Clause" => "BSD-3-Clause",
        "BSD 2-Clause" | "Simplified BSD" => "BSD-2-Clause",
        "GNU GPL v2" | "GNU General Public License v2" | "GPL v2" | "GPLv2" => "GPL-2.0",
        "GNU GPL v3" | "GNU General Public License v3" | "GPL v3" | "GPLv3" => "GPL-3.0",
        "GNU LGPL v2.1" | "LGPL v2.1" | "LGPLv2.1" => "LGPL-2.1",
        "GNU LGPL v3" | "LGPL v3" | "LGPLv3" => "LGPL-3.0",
        "Mozilla Public License 2.0" | "MPL 2.0" | "MPLv2" => "MPL-2.0",
        "Eclipse Public License 1.0" | "EPL 1.0" => "EPL-1.0",
        "Eclipse Public License 2.0" | "EPL 2.0" => "EPL-2.0",
        "ISC License" => "ISC",
        "CC0" | "Public Domain" => "CC0-1.0",
        "AGPL v3" | "AGPLv3" | "GNU AGPL v3" => "AGPL-3.0",
        _ => return None,
    };
    Some(id)
}
