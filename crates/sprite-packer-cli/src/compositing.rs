use image::{Rgba, RgbaImage};
use sprite_packer_core::Rect;

const OUTLINE: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// A fully transparent canvas of exactly `width x height`.
pub fn blank_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::new(width, height)
}

/// Copy `src` into `canvas` with its top-left at `frame.(x, y)`, clipped to
/// both `frame` and the canvas. With `outlines`, draw a red 1px border on the
/// frame bounds afterwards.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, frame: Rect, outlines: bool) {
    let (cw, ch) = canvas.dimensions();
    let w = frame.w.min(src.width());
    let h = frame.h.min(src.height());

    for yy in 0..h {
        let dy = frame.y + yy;
        if dy >= ch {
            break;
        }
        for xx in 0..w {
            let dx = frame.x + xx;
            if dx >= cw {
                break;
            }
            canvas.put_pixel(dx, dy, *src.get_pixel(xx, yy));
        }
    }

    if outlines {
        draw_outline(canvas, frame);
    }
}

fn draw_outline(canvas: &mut RgbaImage, frame: Rect) {
    if frame.is_empty() {
        return;
    }
    let (cw, ch) = canvas.dimensions();
    let right = frame.x + frame.w - 1;
    let bottom = frame.y + frame.h - 1;
    let mut put = |x: u32, y: u32| {
        if x < cw && y < ch {
            canvas.put_pixel(x, y, OUTLINE);
        }
    };
    for x in frame.x..=right {
        put(x, frame.y);
        put(x, bottom);
    }
    for y in frame.y..=bottom {
        put(frame.x, y);
        put(right, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(px))
    }

    #[test]
    fn canvas_starts_transparent() {
        let canvas = blank_canvas(8, 4);
        assert_eq!(canvas.dimensions(), (8, 4));
        assert!(canvas.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn blit_copies_into_frame_only() {
        let mut canvas = blank_canvas(10, 10);
        let src = solid(3, 2, [0, 0, 255, 255]);
        blit_rgba(&src, &mut canvas, Rect::new(4, 5, 3, 2), false);

        assert_eq!(canvas.get_pixel(4, 5).0, [0, 0, 255, 255]);
        assert_eq!(canvas.get_pixel(6, 6).0, [0, 0, 255, 255]);
        assert_eq!(canvas.get_pixel(7, 5).0[3], 0);
        assert_eq!(canvas.get_pixel(4, 7).0[3], 0);
        assert_eq!(canvas.get_pixel(3, 5).0[3], 0);
    }

    #[test]
    fn blit_clips_at_canvas_edge() {
        let mut canvas = blank_canvas(4, 4);
        let src = solid(4, 4, [9, 9, 9, 255]);
        blit_rgba(&src, &mut canvas, Rect::new(2, 2, 4, 4), false);
        assert_eq!(canvas.get_pixel(3, 3).0, [9, 9, 9, 255]);
        assert_eq!(canvas.get_pixel(1, 1).0[3], 0);
    }

    #[test]
    fn outline_marks_border() {
        let mut canvas = blank_canvas(6, 6);
        let src = solid(4, 4, [0, 255, 0, 255]);
        blit_rgba(&src, &mut canvas, Rect::new(1, 1, 4, 4), true);
        assert_eq!(*canvas.get_pixel(1, 1), OUTLINE);
        assert_eq!(*canvas.get_pixel(4, 4), OUTLINE);
        assert_eq!(*canvas.get_pixel(4, 2), OUTLINE);
        assert_eq!(canvas.get_pixel(2, 2).0, [0, 255, 0, 255]);
        assert_eq!(canvas.get_pixel(5, 5).0[3], 0);
    }
}
