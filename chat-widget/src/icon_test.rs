use super::*;

// =============================================================
// Variant selection
// =============================================================

#[test]
fn image_with_url_renders_image() {
    let icon = resolve(IconType::Image, "", "https://cdn.example.com/logo.png", "Acme");
    assert_eq!(icon, Icon::Image("https://cdn.example.com/logo.png".into()));
}

#[test]
fn image_with_empty_url_falls_back_to_letter() {
    assert_eq!(resolve(IconType::Image, "🚀", "  ", "acme"), Icon::Letter('A'));
}

#[test]
fn emoji_with_glyph_renders_emoji() {
    assert_eq!(resolve(IconType::Emoji, "🚀", "", "Acme"), Icon::Emoji("🚀".into()));
}

#[test]
fn emoji_with_empty_glyph_falls_back_to_letter() {
    assert_eq!(resolve(IconType::Emoji, "", "https://x/y.png", "zeta"), Icon::Letter('Z'));
}

#[test]
fn default_ignores_other_sources() {
    assert_eq!(resolve(IconType::Default, "🚀", "https://x/y.png", "beta"), Icon::Letter('B'));
}

// =============================================================
// Letter avatar
// =============================================================

#[test]
fn letter_is_uppercased_first_char() {
    assert_eq!(resolve(IconType::Default, "", "", "  nimbus"), Icon::Letter('N'));
    assert_eq!(resolve(IconType::Default, "", "", "élan"), Icon::Letter('É'));
}

#[test]
fn empty_product_name_uses_fallback_letter() {
    assert_eq!(resolve(IconType::Default, "", "", ""), Icon::Letter(FALLBACK_LETTER));
    assert_eq!(resolve(IconType::Default, "", "", "   "), Icon::Letter(FALLBACK_LETTER));
}

#[test]
fn for_config_uses_resolved_defaults() {
    let config = WidgetConfig::default();
    assert_eq!(for_config(&config), Icon::Letter('S'));
}
