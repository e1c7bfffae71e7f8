//! Renders the generated `anim-bundle.js` script.
//!
//! Layout:
//! - header comment with the generation timestamp
//! - one global binding per index, each a pretty-printed JSON object literal
//! - a registration hook the game calls with its action registry
//! - optionally, a guarded call of that hook when the registry is loaded

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::ArtifactOptions;
use crate::index::RecordIndex;
use crate::record::RecordKind;

use super::Bundle;

/// Prefix of the header line carrying the timestamp.
pub const GENERATED_PREFIX: &str = " * Generated: ";

/// Render the complete script for `bundle`.
pub fn render(
    bundle: &Bundle,
    options: &ArtifactOptions,
    generated_at: DateTime<Utc>,
) -> serde_json::Result<String> {
    let mut out = String::new();
    out.push_str(&render_header(generated_at));
    out.push('\n');
    out.push_str(&render_binding(&options.anim_binding, &bundle.animations)?);
    out.push('\n');
    out.push_str(&render_binding(&options.vfx_binding, &bundle.vfx)?);
    out.push('\n');
    out.push_str(&render_hook(options));
    if options.auto_register {
        out.push('\n');
        out.push_str(&render_auto_register(options));
    }
    Ok(out)
}

fn render_header(generated_at: DateTime<Utc>) -> String {
    let stamp = generated_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    format!(
        r#"/**
 * DDOO Animation Bundle - generated by `ddoo bundle`, do not edit.
{GENERATED_PREFIX}{stamp}
 *
 * Load this file with a plain <script> tag to use every animation and VFX
 * definition without fetching the individual JSON files.
 */
"#
    )
}

fn render_binding(binding: &str, index: &RecordIndex) -> serde_json::Result<String> {
    let label = match index.kind() {
        RecordKind::Animation => "Animation data",
        RecordKind::Vfx => "VFX data",
    };
    Ok(format!(
        "// {label} ({count} entries)\nwindow.{binding} = {json};\n",
        count = index.len(),
        json = index.to_json_pretty()?,
    ))
}

fn render_hook(options: &ArtifactOptions) -> String {
    let ArtifactOptions {
        anim_binding,
        vfx_binding,
        hook_name,
        anim_cache,
        vfx_cache,
        ..
    } = options;
    format!(
        r#"// Copies both bundles into a registry's caches; returns the counts copied.
window.{hook_name} = function (registry) {{
    Object.entries(window.{anim_binding}).forEach(([id, data]) => registry.{anim_cache}.set(id, data));
    Object.entries(window.{vfx_binding}).forEach(([id, data]) => registry.{vfx_cache}.set(id, data));
    const anims = Object.keys(window.{anim_binding}).length;
    const vfx = Object.keys(window.{vfx_binding}).length;
    console.log('[AnimBundle] loaded: ' + anims + ' anims, ' + vfx + ' vfx');
    return {{ anims, vfx }};
}};
"#
    )
}

fn render_auto_register(options: &ArtifactOptions) -> String {
    let ArtifactOptions {
        hook_name,
        registry,
        ..
    } = options;
    format!(
        r#"// Register right away when {registry} was loaded before this bundle.
if (typeof {registry} !== 'undefined') {{
    window.{hook_name}({registry});
}}
"#
    )
}

/// Drop the timestamp line, leaving only content derived from the records.
pub fn strip_timestamp(script: &str) -> String {
    script
        .lines()
        .filter(|line| !line.starts_with(GENERATED_PREFIX))
        .collect::<Vec<_>>()
        .join("\n")
}
