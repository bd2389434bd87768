/// Lower-cases `name` and makes it fully qualified.
///
/// The empty name and `"."` both normalize to the root, `"."`.
pub fn normalize_fqdn(name: &str) -> String {
    let mut normalized = name.to_ascii_lowercase();
    if !normalized.ends_with('.') {
        normalized.push('.');
    }
    normalized
}
