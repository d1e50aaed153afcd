#![no_main]
use std::error::Error;

use libfuzzer_sys::{
    arbitrary::{self, Arbitrary, Unstructured},
    fuzz_target,
};
use skrift::{raw::types::Pen, Font, GlyphId, Image, Sft, SftFlags};

/// The pen for when you don't really care what gets drawn
struct NopPen;

impl Pen for NopPen {
    fn move_to(&mut self, _x: f32, _y: f32) {
        // nop
    }

    fn line_to(&mut self, _x: f32, _y: f32) {
        // nop
    }

    fn quad_to(&mut self, _cx0: f32, _cy0: f32, _x: f32, _y: f32) {
        // nop
    }

    fn close(&mut self) {
        // nop
    }
}

/// Keeps images small enough that a run never allocates much.
const MAX_IMAGE_DIMENSION: i32 = 512;

/// Scales, offsets and orientation to render with.
#[derive(Arbitrary, Debug)]
struct RenderRequest {
    x_scale: f32,
    y_scale: f32,
    x_offset: f32,
    y_offset: f32,
    downward_y: bool,
}

impl RenderRequest {
    fn apply<'a>(&self, sft: Sft<'a>) -> Sft<'a> {
        let flags = if self.downward_y {
            SftFlags::DOWNWARD_Y
        } else {
            SftFlags::empty()
        };
        sft.with_scale(self.x_scale, self.y_scale)
            .with_offset(self.x_offset, self.y_offset)
            .with_flags(flags)
    }
}

fn do_glyph_things(sft: &Sft, glyph: GlyphId) -> Result<(), Box<dyn Error>> {
    let _ = sft.glyph_bbox(glyph);
    let _ = sft.kerning(glyph, GlyphId::new(0));
    if let Ok(outline) = sft.outline(glyph) {
        outline.draw(&mut NopPen);
    }
    let metrics = sft.glyph_metrics(glyph)?;
    if !(1..=MAX_IMAGE_DIMENSION).contains(&metrics.min_width)
        || !(1..=MAX_IMAGE_DIMENSION).contains(&metrics.min_height)
    {
        return Ok(());
    }
    let mut image = Image::new(metrics.min_width as u32, metrics.min_height as u32);
    sft.render(glyph, &mut image)?;
    Ok(())
}

fn do_skrift_things(data: &[u8]) -> Result<(), Box<dyn Error>> {
    let mut unstructured = Unstructured::new(data);
    let request = RenderRequest::arbitrary(&mut unstructured)?;
    let font = Font::new(unstructured.take_rest())?;
    let sft = request.apply(Sft::new(&font));
    let _ = sft.line_metrics();

    // we don't care about the result, just that we don't panic, hang, etc
    for gid in 0..font.glyph_count().min(u16::MAX as usize) {
        let _ = do_glyph_things(&sft, GlyphId::new(gid as u16));
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = do_skrift_things(data);
});
