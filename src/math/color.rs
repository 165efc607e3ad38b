pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let c = v * s;
    let h_prime = (h * 6.0) % 6.0;
    let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h_prime as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [r + m, g + m, b + m]
}

/// 0xRRGGBB to linear-ish floats in 0..1
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Pulls a color toward its grey value; `amount` 1.0 yields pure grey
pub fn desaturate(rgb: [f32; 3], amount: f32) -> [f32; 3] {
    let grey = rgb[0] * 0.299 + rgb[1] * 0.587 + rgb[2] * 0.114;
    let amount = amount.clamp(0.0, 1.0);
    rgb.map(|c| c + (grey - c) * amount)
}

/// Stable hue in 0..1 for a label. Golden-ratio spacing keeps neighbouring
/// hashes visually apart.
pub fn label_hue(label: &str) -> f32 {
    // FNV-1a, stable across runs unlike the std hasher
    let hash = label.bytes().fold(0x811c_9dc5_u32, |h, b| (h ^ b as u32).wrapping_mul(0x0100_0193));
    ((hash % 1024) as f32 * 0.618_034) % 1.0
}
