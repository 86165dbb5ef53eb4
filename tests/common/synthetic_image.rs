use shorts_ad_detector::Bitmap;

pub const AD_YELLOW: [u8; 3] = [255, 200, 0];
pub const BACKGROUND: [u8; 3] = [20, 40, 200];

/// 100x10 bitmap whose first `percent` pixels are ad-yellow.
pub fn yellow_percent(percent: usize) -> Bitmap {
    assert!(percent <= 100, "percent must be at most 100");

    let (width, height) = (100usize, 10usize);
    let accent = width * height * percent / 100;
    let mut data = Vec::with_capacity(width * height * 3);
    for i in 0..width * height {
        let pixel = if i < accent { AD_YELLOW } else { BACKGROUND };
        data.extend_from_slice(&pixel);
    }
    Bitmap::from_rgb(width as u32, height as u32, data)
}
