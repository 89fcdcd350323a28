//! Social-media glyphs.
//!
//! Small procedurally drawn monochrome icons, scaled to any square size.
//! Shapes are defined in a unit coordinate space (0.0..1.0) and sampled at
//! pixel centers, so they stay recognizable from 16 to 64 dots.

use serde::{Deserialize, Serialize};

/// Supported social networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialIcon {
    Facebook,
    Instagram,
    WhatsApp,
}

impl SocialIcon {
    pub fn name(self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::WhatsApp => "whatsapp",
        }
    }
}

/// Render `icon` as a row-major `size × size` mask (true = black).
pub fn icon_mask(icon: SocialIcon, size: u32) -> Vec<bool> {
    let n = size as usize;
    let mut mask = vec![false; n * n];
    if size == 0 {
        return mask;
    }
    for py in 0..n {
        for px in 0..n {
            let u = (px as f32 + 0.5) / size as f32;
            let v = (py as f32 + 0.5) / size as f32;
            mask[py * n + px] = match icon {
                SocialIcon::Facebook => facebook(u, v),
                SocialIcon::Instagram => instagram(u, v),
                SocialIcon::WhatsApp => whatsapp(u, v),
            };
        }
    }
    mask
}

/// Signed-ish distance test for a rounded square covering `inset..1-inset`.
fn in_rounded_square(u: f32, v: f32, inset: f32, radius: f32) -> bool {
    let (lo, hi) = (inset, 1.0 - inset);
    if u < lo || u > hi || v < lo || v > hi {
        return false;
    }
    let cx = u.clamp(lo + radius, hi - radius);
    let cy = v.clamp(lo + radius, hi - radius);
    (u - cx).powi(2) + (v - cy).powi(2) <= radius * radius
}

fn dist(u: f32, v: f32, cx: f32, cy: f32) -> f32 {
    ((u - cx).powi(2) + (v - cy).powi(2)).sqrt()
}

/// Filled rounded square with a knocked-out lowercase "f".
fn facebook(u: f32, v: f32) -> bool {
    if !in_rounded_square(u, v, 0.0, 0.2) {
        return false;
    }
    let stem = (0.50..0.66).contains(&u) && (0.30..1.0).contains(&v);
    let bar = (0.36..0.80).contains(&u) && (0.44..0.56).contains(&v);
    // Top hook: quarter ring bending right from the stem
    let d = dist(u, v, 0.78, 0.38);
    let hook = u >= 0.50 && v <= 0.38 && d >= 0.12 && d <= 0.28 && u <= 0.86;
    !(stem || bar || hook)
}

/// Rounded-square outline with a lens ring and a flash dot.
fn instagram(u: f32, v: f32) -> bool {
    let frame = in_rounded_square(u, v, 0.0, 0.28) && !in_rounded_square(u, v, 0.1, 0.18);
    let d = dist(u, v, 0.5, 0.5);
    let lens = (0.14..=0.24).contains(&d);
    let flash = dist(u, v, 0.76, 0.24) <= 0.06;
    frame || lens || flash
}

/// Speech-bubble ring with a tail and a handset.
fn whatsapp(u: f32, v: f32) -> bool {
    let d = dist(u, v, 0.52, 0.48);
    let ring = (0.36..=0.46).contains(&d);
    // Tail at the lower left
    let tail = u >= 0.04 && u <= 0.26 && v >= 0.74 && v <= 0.96 && (u - 0.04) >= (0.96 - v) * 0.5;
    // Handset: two earpieces joined by a diagonal grip
    let ear_top = dist(u, v, 0.38, 0.34) <= 0.08;
    let ear_bottom = dist(u, v, 0.66, 0.62) <= 0.08;
    let grip = ((u - v) + 0.04).abs() <= 0.07 && (0.32..=0.70).contains(&u);
    ring || tail || ear_top || ear_bottom || grip
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage(icon: SocialIcon, size: u32) -> f32 {
        let mask = icon_mask(icon, size);
        mask.iter().filter(|&&b| b).count() as f32 / mask.len() as f32
    }

    #[test]
    fn test_mask_dimensions() {
        for icon in [SocialIcon::Facebook, SocialIcon::Instagram, SocialIcon::WhatsApp] {
            assert_eq!(icon_mask(icon, 24).len(), 24 * 24);
            assert!(icon_mask(icon, 0).is_empty());
        }
    }

    #[test]
    fn test_icons_are_visible_but_not_solid() {
        for icon in [SocialIcon::Facebook, SocialIcon::Instagram, SocialIcon::WhatsApp] {
            let c = coverage(icon, 24);
            assert!(c > 0.15 && c < 0.9, "{:?} coverage {}", icon, c);
        }
    }

    #[test]
    fn test_icons_differ() {
        let fb = icon_mask(SocialIcon::Facebook, 24);
        let ig = icon_mask(SocialIcon::Instagram, 24);
        let wa = icon_mask(SocialIcon::WhatsApp, 24);
        assert_ne!(fb, ig);
        assert_ne!(ig, wa);
        assert_ne!(fb, wa);
    }

    #[test]
    fn test_facebook_corners_rounded() {
        let mask = icon_mask(SocialIcon::Facebook, 24);
        assert!(!mask[0]);
        // Left edge midpoint is inside the filled square
        assert!(mask[12 * 24]);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&SocialIcon::WhatsApp).unwrap(),
            "\"whatsapp\""
        );
        assert_eq!(SocialIcon::Instagram.name(), "instagram");
    }
}
