//! Activity field catalogue and member tag presentation.

use serde::{Deserialize, Serialize};

/// A built-in activity field definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultField {
    /// Stable machine code.
    pub code: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Position in listings (ascending).
    pub sort_order: i32,
}

/// The activity fields every deployment carries.
pub const DEFAULT_ACTIVITY_FIELDS: [DefaultField; 5] = [
    DefaultField {
        code: "web",
        label: "Web",
        sort_order: 10,
    },
    DefaultField {
        code: PWNABLE_CODE,
        label: "Pwnable",
        sort_order: 20,
    },
    DefaultField {
        code: "reverse",
        label: "Reverse",
        sort_order: 30,
    },
    DefaultField {
        code: "forensic",
        label: "Forensic",
        sort_order: 40,
    },
    DefaultField {
        code: "dev",
        label: "Dev",
        sort_order: 50,
    },
];

/// Canonical code of the pwnable field.
pub const PWNABLE_CODE: &str = "pwnable";

/// Misspelled code used by early deployments, migrated to [`PWNABLE_CODE`].
pub const LEGACY_PWNABLE_CODE: &str = "pawnable";

/// Colour family of a member tag chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagTone {
    Ruby,
    Ember,
    Frost,
    Moss,
    Slate,
}

impl TagTone {
    /// All tones, in hash-bucket order.
    pub const ALL: [Self; 5] = [Self::Ruby, Self::Ember, Self::Frost, Self::Moss, Self::Slate];

    /// Pick a stable tone for a field.
    ///
    /// Hashes the lowercased `"code:label"` over its UTF-16 units
    /// (`hash = hash * 31 + unit`, wrapping at 32 bits) so the same field
    /// always renders in the same colour.
    #[must_use]
    pub fn for_field(code: &str, label: &str) -> Self {
        let source = format!("{code}:{label}").trim().to_lowercase();
        if source.is_empty() {
            return Self::Slate;
        }

        let hash = source
            .encode_utf16()
            .fold(0_u32, |hash, unit| hash.wrapping_mul(31).wrapping_add(u32::from(unit)));

        let index = (hash % 5) as usize;
        Self::ALL.get(index).copied().unwrap_or(Self::Slate)
    }
}

/// Decorated label for a member tag.
///
/// Known codes (or labels) get an emoji-prefixed label; anything else keeps
/// its stored label.
#[must_use]
pub fn tag_label(code: &str, label: &str) -> String {
    let by_code = decorated_label(&code.trim().to_lowercase());
    let by_label = || decorated_label(&label.trim().to_lowercase());

    by_code
        .or_else(by_label)
        .map_or_else(|| label.to_owned(), ToOwned::to_owned)
}

fn decorated_label(key: &str) -> Option<&'static str> {
    match key {
        "web" => Some("\u{1F310}Web"),
        "pwnable" | "pawnable" => Some("\u{1F4A3}Pwnable"),
        "reverse" => Some("\u{1F50D}Reverse"),
        "forensic" => Some("\u{1F4C1}Forensic"),
        "dev" => Some("\u{1F9D1}\u{200D}\u{1F4BB}Dev"),
        _ => None,
    }
}
