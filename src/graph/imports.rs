// src/graph/imports.rs
//! Import specifier extraction by pattern matching against the file text.
//!
//! This is deliberately not a parser: the engine only needs the string inside
//! the quotes of statically-declared imports. Files the patterns cannot make
//! sense of simply contribute no edges.

use regex::Regex;
use std::sync::LazyLock;

static ES_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*import\s+[^;'"]*?from\s*['"]([^'"]+)['"]"#).expect("valid import regex")
});
static SIDE_EFFECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*import\s*['"]([^'"]+)['"]"#).expect("valid side-effect regex")
});
static REQUIRE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#).expect("valid require regex")
});
static DYNAMIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\s*\(\s*['"]([^'"]+)['"]\s*\)"#).expect("valid dynamic import regex")
});
static REEXPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*export\s+[^;'"]*?from\s*['"]([^'"]+)['"]"#)
        .expect("valid re-export regex")
});

/// Extracts raw import/require specifiers from source text, in document order,
/// deduplicated.
#[must_use]
pub fn extract(content: &str) -> Vec<String> {
    let mut specifiers = Vec::new();

    for re in [
        &*ES_IMPORT_RE,
        &*SIDE_EFFECT_RE,
        &*REQUIRE_RE,
        &*DYNAMIC_RE,
        &*REEXPORT_RE,
    ] {
        for cap in re.captures_iter(content) {
            let spec = cap[1].to_string();
            if !specifiers.contains(&spec) {
                specifiers.push(spec);
            }
        }
    }

    specifiers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_es_imports() {
        let code = r#"
            import React from "react";
            import { Widget } from "./components/Widget";
            import "./styles.css";
        "#;
        let imports = extract(code);
        assert!(imports.contains(&"react".to_string()));
        assert!(imports.contains(&"./components/Widget".to_string()));
        assert!(imports.contains(&"./styles.css".to_string()));
    }

    #[test]
    fn extracts_require_and_dynamic() {
        let code = r"
            const fs = require('fs');
            const lazy = await import('./lazy/module');
        ";
        let imports = extract(code);
        assert!(imports.contains(&"fs".to_string()));
        assert!(imports.contains(&"./lazy/module".to_string()));
    }

    #[test]
    fn extracts_reexports() {
        let code = r#"
            export * from "./utils";
            export { Button } from './Button';
        "#;
        let imports = extract(code);
        assert!(imports.contains(&"./utils".to_string()));
        assert!(imports.contains(&"./Button".to_string()));
    }

    #[test]
    fn dedupes_repeated_specifiers() {
        let code = r#"
            import { a } from "./shared";
            import { b } from "./shared";
        "#;
        assert_eq!(extract(code), vec!["./shared".to_string()]);
    }

    #[test]
    fn plain_text_yields_nothing() {
        assert!(extract("no imports here\njust prose\n").is_empty());
    }
}
