/// 32-bit polynomial rolling hash (`h = h * 31 + unit`) over UTF-16 code
/// units, wrapping after every step.
pub(super) fn creator_hash(creator: &str) -> i32 {
    creator
        .encode_utf16()
        .fold(0u32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(u32::from(unit))
        }) as i32
}

/// RGB in `[0, 1]` derived from the creator name; equal names give equal colors.
pub(super) fn creator_color(creator: &str) -> [f32; 3] {
    let hash = creator_hash(creator);
    let low = hash & 0xff;
    let channel = |shift: u32| (((hash >> shift) & 0xff) ^ low) as f32 / 255.0;
    [channel(8), channel(16), channel(24)]
}
