use serde_json::json;
use std::fs;
use tailwind_manifest::{DarkMode, PluginSpec, TailwindConfig};
use tempfile::tempdir;

#[test]
fn test_esm_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tailwind.config.mjs");
    fs::write(
        &path,
        r#"
        /** @type {import('tailwindcss').Config} */
        export default {
          content: ['./index.html', './src/**/*.{vue,js,ts}'],
          darkMode: 'media',
          theme: { extend: { spacing: { 128: '32rem' } } },
        }
        "#,
    )
    .unwrap();

    let config = TailwindConfig::from_file(&path).unwrap();
    assert_eq!(config.content().len(), 2);
    assert_eq!(config.dark_mode(), DarkMode::Media);
    assert_eq!(config.theme().extend()["spacing"], json!({"128": "32rem"}));
}

#[test]
fn test_typescript_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tailwind.config.ts");
    fs::write(
        &path,
        r#"
        import type { Config } from 'tailwindcss'

        const config: Config = {
          content: ['./app/**/*.{ts,tsx}'],
          darkMode: 'class',
          theme: { extend: {} },
          plugins: [],
        }

        export default config
        "#,
    )
    .unwrap();

    let config = TailwindConfig::from_file(&path).unwrap();
    assert_eq!(config.content(), ["./app/**/*.{ts,tsx}"]);
    assert_eq!(config.dark_mode(), DarkMode::Class);
}

#[test]
fn test_commonjs_with_plugins() {
    let config = TailwindConfig::from_js_str(
        r#"
        const forms = require('@tailwindcss/forms');

        module.exports = {
          content: ['./templates/**/*.html'],
          plugins: [
            forms,
            require('@tailwindcss/typography')({ className: 'wysiwyg' }),
          ],
        };
        "#,
    )
    .unwrap();

    assert_eq!(
        config.plugins(),
        [
            PluginSpec::Module("@tailwindcss/forms".to_string()),
            PluginSpec::configured("@tailwindcss/typography", json!({"className": "wysiwyg"})),
        ]
    );
}

#[test]
fn test_theme_overrides_are_kept_apart_from_extend() {
    let config = TailwindConfig::from_js_str(
        r#"
        module.exports = {
          content: ['./src/**/*.html'],
          theme: {
            colors: { transparent: 'transparent', white: '#fff' },
            extend: { colors: { brand: '#0066cc' } },
            fontFamily: { sans: ['Inter', 'sans-serif'] },
          },
        }
        "#,
    )
    .unwrap();

    let theme = config.theme();
    assert_eq!(theme.extend().len(), 1);
    assert_eq!(theme.overrides().len(), 2);
    assert_eq!(theme.get("fontFamily"), Some(&json!({"sans": ["Inter", "sans-serif"]})));
    assert!(theme.get("extend").is_none());
}

#[test]
fn test_inline_plugin_function_is_rejected() {
    let err = TailwindConfig::from_js_str(
        r#"
        const plugin = require('tailwindcss/plugin');
        module.exports = {
          plugins: [plugin(function ({ addUtilities }) {})],
        };
        "#,
    )
    .unwrap_err();

    assert!(err.is_malformed());
    assert!(err.to_string().contains("function expression"), "{}", err);
}

#[test]
fn test_invalid_content_pattern_in_js() {
    let err = TailwindConfig::from_js_str("module.exports = { content: ['./src/**/*.{js,ts'] }").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("invalid content pattern"), "{}", msg);
    assert!(msg.contains("unbalanced braces"), "{}", msg);
}

#[test]
fn test_esm_plugin_imports() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tailwind.config.ts");
    fs::write(
        &path,
        r#"
        import type { Config } from 'tailwindcss'
        import forms from '@tailwindcss/forms'
        import * as typography from '@tailwindcss/typography'

        export default {
          content: ['./src/**/*.{ts,tsx}'],
          plugins: [forms, typography({ className: 'wysiwyg' }), forms()],
        } satisfies Config
        "#,
    )
    .unwrap();

    let config = TailwindConfig::from_file(&path).unwrap();
    assert_eq!(
        config.plugins(),
        [
            PluginSpec::Module("@tailwindcss/forms".to_string()),
            PluginSpec::configured("@tailwindcss/typography", json!({"className": "wysiwyg"})),
            PluginSpec::configured("@tailwindcss/forms", serde_json::Value::Null),
        ]
    );
}

#[test]
fn test_named_imports_are_not_plugin_references() {
    let err = TailwindConfig::from_js_str(
        r#"
        import { forms } from './plugins.js'
        export default { plugins: [forms] }
        "#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("unbound identifier 'forms'"), "{}", err);
}
