//! Display names derived from LoRA identifiers.

/// File name of `identifier` without its extension.
///
/// Both `/` and `\` count as separators regardless of platform, so
/// identifiers written on Windows produce the same name everywhere.
///
/// # Examples
///
/// ```
/// use loraview_core::naming::lora_display_name;
///
/// assert_eq!(lora_display_name("sdxl/style.safetensors"), "style");
/// assert_eq!(lora_display_name("sdxl\\char.v2.safetensors"), "char.v2");
/// ```
pub fn lora_display_name(identifier: &str) -> String {
    let file_name = identifier
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(identifier);

    match file_name.rfind('.') {
        Some(idx) => file_name[..idx].to_string(),
        None => file_name.to_string(),
    }
}
