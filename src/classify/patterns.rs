// src/classify/patterns.rs
//! Filename and content-marker pattern tables.
//!
//! Two naming families are distinguished: saved-aside suffixes (`.bak`,
//! `.old`, `_backup`, ...) mark a deliberate backup, while OS-generated
//! duplicate suffixes (`" (1)"`, `" copy"`) mark an accidental copy. The
//! classifier weights them identically but types them differently.

use regex::Regex;
use std::sync::LazyLock;

/// `name.backup.ts`, `name_old.ts`, `name-broken.tsx`, ...
static SAVED_ASIDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<stem>.+?)[._-](backup|bak|old|orig|tmp|broken|save)(?P<ext>\.[a-z0-9]+)$")
        .expect("valid saved-aside regex")
});

/// `name.ts.bak`, `name.tsx.orig`: suffix appended after the real extension.
static TRAILING_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<orig>.+\.[a-z0-9]+)\.(backup|bak|old|orig|tmp|broken|save)$")
        .expect("valid trailing-suffix regex")
});

/// macOS `name copy.ts`, `name copy 2.ts`; explicit `name_copy.ts`.
static OS_COPY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<stem>.+?)(\s+-\s+copy|\s+copy(\s+\d+)?|[._-]copy\d*)(?P<ext>\.[a-z0-9]+)$")
        .expect("valid os-copy regex")
});

/// Windows `name (1).ts`.
static NUMBERED_COPY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<stem>.+?)\s*\(\d+\)(?P<ext>\.[a-z0-9]+)$")
        .expect("valid numbered-copy regex")
});

static TEMPLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(template|example|sample)").expect("valid template regex")
});

/// Explicit BACKUP marker inside a line comment or block comment.
static BACKUP_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(//|/\*|\*|#|<!--).*\bBACKUP\b").expect("valid backup marker regex")
});

static DEPRECATED_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i:@deprecated\b)|\bDEPRECATED\b").expect("valid deprecation marker regex")
});

/// How a filename marks its file as a duplicate of something else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameFamily {
    /// Deliberate saved-aside backup (`.bak`, `_old`, ...).
    SavedAside,
    /// OS-generated or manual duplicate (`" (1)"`, `" copy"`, `_copy`).
    OsDuplicate,
}

/// Matches `name` against both naming families and derives the probable
/// original filename by stripping the suffix.
#[must_use]
pub fn match_duplicate_name(name: &str) -> Option<(NameFamily, String)> {
    if let Some(caps) = SAVED_ASIDE_RE.captures(name) {
        return Some((
            NameFamily::SavedAside,
            format!("{}{}", &caps["stem"], &caps["ext"]),
        ));
    }
    if let Some(caps) = TRAILING_SUFFIX_RE.captures(name) {
        return Some((NameFamily::SavedAside, caps["orig"].to_string()));
    }
    if let Some(caps) = OS_COPY_RE.captures(name) {
        return Some((
            NameFamily::OsDuplicate,
            format!("{}{}", &caps["stem"], &caps["ext"]),
        ));
    }
    if let Some(caps) = NUMBERED_COPY_RE.captures(name) {
        return Some((
            NameFamily::OsDuplicate,
            format!("{}{}", &caps["stem"], &caps["ext"]),
        ));
    }
    None
}

#[must_use]
pub fn is_duplicate_named(name: &str) -> bool {
    match_duplicate_name(name).is_some()
}

#[must_use]
pub fn is_template_named(name: &str) -> bool {
    TEMPLATE_RE.is_match(name)
}

#[must_use]
pub fn has_backup_marker(content: &str) -> bool {
    BACKUP_MARKER_RE.is_match(content)
}

#[must_use]
pub fn has_deprecation_marker(content: &str) -> bool {
    DEPRECATED_MARKER_RE.is_match(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_aside_suffixes() {
        for (name, original) in [
            ("a.backup.ts", "a.ts"),
            ("service.old.ts", "service.ts"),
            ("styles_bak.css", "styles.css"),
            ("page-broken.tsx", "page.tsx"),
            ("config.json.bak", "config.json"),
        ] {
            let (family, derived) = match_duplicate_name(name).expect(name);
            assert_eq!(family, NameFamily::SavedAside, "{name}");
            assert_eq!(derived, original, "{name}");
        }
    }

    #[test]
    fn os_duplicate_suffixes() {
        for (name, original) in [
            ("Widget (1).tsx", "Widget.tsx"),
            ("Widget copy.tsx", "Widget.tsx"),
            ("Widget copy 2.tsx", "Widget.tsx"),
            ("report - Copy.ts", "report.ts"),
            ("util_copy.ts", "util.ts"),
        ] {
            let (family, derived) = match_duplicate_name(name).expect(name);
            assert_eq!(family, NameFamily::OsDuplicate, "{name}");
            assert_eq!(derived, original, "{name}");
        }
    }

    #[test]
    fn ordinary_names_do_not_match() {
        for name in ["Widget.tsx", "copyright.ts", "backup-service.ts.d", "old.ts"] {
            assert!(match_duplicate_name(name).is_none(), "{name}");
        }
    }

    #[test]
    fn template_keywords() {
        assert!(is_template_named("example-usage.ts"));
        assert!(is_template_named("config.template.json"));
        assert!(is_template_named("SampleWidget.tsx"));
        assert!(!is_template_named("Widget.tsx"));
    }

    #[test]
    fn backup_marker_requires_comment_context() {
        assert!(has_backup_marker("// BACKUP of the old login flow\ncode();\n"));
        assert!(has_backup_marker("/* BACKUP 2023-01-01 */\n"));
        assert!(!has_backup_marker("const BACKUP_LIMIT = 3;\n"));
    }

    #[test]
    fn deprecation_markers() {
        assert!(has_deprecation_marker("/** @deprecated use v2 */\n"));
        assert!(has_deprecation_marker("// DEPRECATED: remove after Q3\n"));
        assert!(!has_deprecation_marker("const fresh = true;\n"));
    }
}
