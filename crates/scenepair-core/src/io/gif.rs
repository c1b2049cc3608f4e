use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};

use crate::composite::AnimatedFrames;
use crate::consts::GIF_QUANTIZER_SPEED;
use crate::error::Result;

/// Write frames as a looping GIF, each shown for `delay_ms`.
///
/// Frames are encoded whole at the slowest quantiser speed; no inter-frame
/// differencing is applied.
pub fn write_gif(animation: &AnimatedFrames, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), GIF_QUANTIZER_SPEED);
    encoder.set_repeat(Repeat::Infinite)?;

    let delay = Delay::from_numer_denom_ms(u32::from(animation.delay_ms), 1);
    let frames = animation
        .frames
        .iter()
        .map(|img| Frame::from_parts(img.clone(), 0, 0, delay));
    encoder.encode_frames(frames)?;
    Ok(())
}
