//! Avatar resolution: image, emoji, or the product's initial.

#[cfg(test)]
#[path = "icon_test.rs"]
mod icon_test;

use crate::config::{IconType, WidgetConfig};
use crate::consts::FALLBACK_LETTER;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Icon {
    Image(String),
    Emoji(String),
    Letter(char),
}

/// Pick the avatar for the given inputs. An image or emoji selection with an
/// empty source degrades to the letter avatar.
#[must_use]
pub fn resolve(icon_type: IconType, icon_emoji: &str, custom_icon: &str, product_name: &str) -> Icon {
    match icon_type {
        IconType::Image if !custom_icon.trim().is_empty() => Icon::Image(custom_icon.trim().to_string()),
        IconType::Emoji if !icon_emoji.trim().is_empty() => Icon::Emoji(icon_emoji.trim().to_string()),
        _ => Icon::Letter(initial(product_name)),
    }
}

#[must_use]
pub fn for_config(config: &WidgetConfig) -> Icon {
    resolve(config.icon_type, &config.icon_emoji, &config.custom_icon, &config.product_name)
}

fn initial(product_name: &str) -> char {
    product_name
        .trim()
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or(FALLBACK_LETTER)
}
