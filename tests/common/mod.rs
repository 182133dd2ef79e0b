#![allow(dead_code)]

use barscan::error::{Result, ScanError};
use barscan::raster::{PageRasterizer, PageSource};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use rxing::{BarcodeFormat, MultiFormatWriter, Writer};
use std::io::Cursor;
use std::sync::Mutex;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

pub fn canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, WHITE)
}

/// Draws `text` as a barcode of `format` with its top-left corner at (x, y).
/// The writer's own quiet zone is kept.
pub fn draw_code(canvas: &mut RgbaImage, format: BarcodeFormat, text: &str, x: u32, y: u32, w: u32, h: u32) {
    let matrix = MultiFormatWriter::default()
        .encode(text, &format, w as i32, h as i32)
        .expect("encode barcode");
    for my in 0..matrix.getHeight() {
        for mx in 0..matrix.getWidth() {
            let (px, py) = (x + mx, y + my);
            if px < canvas.width() && py < canvas.height() && matrix.get(mx, my) {
                canvas.put_pixel(px, py, BLACK);
            }
        }
    }
}

pub fn draw_qr(canvas: &mut RgbaImage, text: &str, x: u32, y: u32, size: u32) {
    draw_code(canvas, BarcodeFormat::QR_CODE, text, x, y, size, size);
}

pub fn png(image: &RgbaImage) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, ImageFormat::Png).expect("encode png");
    cursor.into_inner()
}

pub fn jpeg(image: &RgbaImage) -> Vec<u8> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut cursor = Cursor::new(Vec::new());
    rgb.write_to(&mut cursor, ImageFormat::Jpeg).expect("encode jpeg");
    cursor.into_inner()
}

pub const CARD_URL: &str = "https://www.ericestampa.it/prodotto/segnatavolo-con-qrcode/";

/// 480x480 card with one QR code sitting in the bottom-right quadrant.
pub fn card_with_qr_bottom_right() -> RgbaImage {
    let mut img = canvas(480, 480);
    draw_qr(&mut img, CARD_URL, 260, 260, 200);
    img
}

pub const PHONE: &str = "(444) 666-1212";

/// Two portrait pages. Page 1 has a single code; page 2 has one code near
/// the top-left and the phone number in its lower-right quarter.
pub fn two_page_document() -> Vec<Vec<u8>> {
    let mut page1 = canvas(400, 800);
    draw_qr(&mut page1, "page one", 100, 100, 200);

    let mut page2 = canvas(400, 800);
    draw_qr(&mut page2, "upper code", 20, 20, 180);
    draw_qr(&mut page2, PHONE, 210, 610, 180);

    vec![png(&page1), png(&page2)]
}

/// Stand-in for PDFium: serves pre-rendered PNG pages and records what was
/// asked of it.
pub struct MockRasterizer {
    pages: Vec<Vec<u8>>,
    fail_on: Option<u32>,
    pub opens: Mutex<u32>,
    pub renders: Mutex<Vec<(u32, f32)>>,
}

impl MockRasterizer {
    pub fn new(pages: Vec<Vec<u8>>) -> Self {
        Self {
            pages,
            fail_on: None,
            opens: Mutex::new(0),
            renders: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, page: u32) -> Self {
        self.fail_on = Some(page);
        self
    }

    pub fn rendered_pages(&self) -> Vec<u32> {
        self.renders.lock().unwrap().iter().map(|(p, _)| *p).collect()
    }

    pub fn open_count(&self) -> u32 {
        *self.opens.lock().unwrap()
    }
}

impl PageRasterizer for MockRasterizer {
    fn open(&self, _pdf_bytes: &[u8], visit: &mut dyn FnMut(&dyn PageSource) -> Result<()>) -> Result<()> {
        *self.opens.lock().unwrap() += 1;
        visit(self)
    }
}

impl PageSource for MockRasterizer {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn render_page(&self, page: u32, scale: f32) -> Result<Vec<u8>> {
        let page_count = self.pages.len() as u32;
        if page < 1 || page > page_count {
            return Err(ScanError::InvalidPage { page, page_count });
        }
        if self.fail_on == Some(page) {
            return Err(ScanError::RenderFailure {
                page,
                reason: "mock render failure".into(),
            });
        }
        self.renders.lock().unwrap().push((page, scale));
        Ok(self.pages[(page - 1) as usize].clone())
    }
}
