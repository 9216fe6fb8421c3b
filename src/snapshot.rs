// Write a rendered frame to disk as PNG.
// Visual: the file looks exactly like the last frame the window would show.

use crate::error::Error;
use crate::types::{unpack_rgb, FrameBuffer};
use image::{ImageBuffer, Rgb};
use std::path::Path;
use tracing::warn;

/// Write `frame` if there is something to write.
/// No frame, or a frame with no pixels (zero-sized viewport), is skipped with
/// a warning and returns `Ok(false)`.
pub fn save_snapshot(frame: Option<&FrameBuffer>, path: &Path) -> Result<bool, Error> {
    match frame {
        None => {
            warn!("no frame rendered, snapshot skipped");
            Ok(false)
        }
        Some(f) if f.width == 0 || f.height == 0 => {
            warn!(width = f.width as u64, height = f.height as u64, "empty frame, snapshot skipped");
            Ok(false)
        }
        Some(f) => {
            write_png(f, path)?;
            Ok(true)
        }
    }
}

pub fn write_png(frame: &FrameBuffer, path: &Path) -> Result<(), Error> {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_fn(frame.width as u32, frame.height as u32, |x, y| {
            let (r, g, b) = unpack_rgb(frame.pixels[y as usize * frame.width + x as usize]);
            Rgb([r, g, b])
        });
    img.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pack_rgb;

    #[test]
    fn png_keeps_pixels() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.pixels = vec![
            pack_rgb(26, 26, 26), pack_rgb(44, 95, 77), pack_rgb(0, 0, 0),
            pack_rgb(255, 255, 255), pack_rgb(80, 120, 105), pack_rgb(1, 2, 3),
        ];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        write_png(&fb, &path).unwrap();

        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back.dimensions(), (3, 2));
        assert_eq!(back.get_pixel(1, 0), &Rgb([44, 95, 77]));
        assert_eq!(back.get_pixel(2, 1), &Rgb([1, 2, 3]));
    }

    #[test]
    fn empty_frame_is_skipped_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        assert!(!save_snapshot(Some(&FrameBuffer::new(0, 0)), &path).unwrap());
        assert!(!save_snapshot(Some(&FrameBuffer::new(4, 0)), &path).unwrap());
        assert!(!save_snapshot(None, &path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn tiny_headless_viewport_does_not_fail_snapshot() {
        use crate::backdrop::{Backdrop, Effects};
        use crate::host::{run, HeadlessHost};
        use crate::mesh::RandomPoints;
        use crate::types::Viewport;

        // Half a logical pixel at ratio 1 floors to an empty buffer.
        let mut host = HeadlessHost::new(Viewport::new(0.5, 0.0, 1.0), 2);
        let mut backdrop = Backdrop::new(RandomPoints::from_seed(5), Effects::default());
        run(&mut host, &mut backdrop).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        assert!(!save_snapshot(host.last_frame(), &path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn real_frame_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.png");
        assert!(save_snapshot(Some(&FrameBuffer::new(2, 2)), &path).unwrap());
        assert!(path.exists());
    }
}
