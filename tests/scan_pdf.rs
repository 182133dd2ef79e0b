mod common;

use barscan::{config::Config, CropRect, PdfOptions, ScanError, ScanOptions, Scanner};
use common::*;

const PDF_BYTES: &[u8] = b"%PDF-1.7 stand-in";

fn scanner(pages: Vec<Vec<u8>>) -> Scanner<MockRasterizer> {
    Scanner::new(&Config::default(), MockRasterizer::new(pages))
}

fn pdf_opts(pages: Option<Vec<u32>>) -> ScanOptions {
    let mut opts = ScanOptions::new("application/pdf");
    opts.pdf_options = Some(PdfOptions { pages, scale: None });
    opts
}

#[test]
fn second_page_lower_right_quarter() {
    let s = scanner(two_page_document());
    let mut opts = pdf_opts(Some(vec![2]));
    opts.crop = vec![CropRect::new(50.0, 75.0, 50.0, 25.0)];

    let result = s.scan(PDF_BYTES, &opts).unwrap();
    assert_eq!(result.found, 1);
    assert_eq!(result.results[0].text.as_deref(), Some(PHONE));
    assert_eq!(result.results[0].index, Some(2));
    assert_eq!(s.rasterizer().rendered_pages(), vec![2]);
}

#[test]
fn all_pages_when_none_requested() {
    let s = scanner(two_page_document());
    let result = s.scan(PDF_BYTES, &ScanOptions::new("application/pdf")).unwrap();

    assert_eq!(s.rasterizer().rendered_pages(), vec![1, 2]);
    assert_eq!(result.found, 2);
    assert_eq!(result.results[0].text.as_deref(), Some("page one"));
    let indexes: Vec<_> = result.results.iter().map(|r| r.index).collect();
    assert_eq!(indexes, vec![Some(1), Some(2)]);
}

#[test]
fn document_is_opened_once_per_scan() {
    let s = scanner(two_page_document());
    s.scan(PDF_BYTES, &ScanOptions::new("application/pdf")).unwrap();
    assert_eq!(s.rasterizer().open_count(), 1);
    assert_eq!(s.rasterizer().rendered_pages(), vec![1, 2]);
}

#[test]
fn empty_page_list_means_every_page() {
    let s = scanner(two_page_document());
    s.scan(PDF_BYTES, &pdf_opts(Some(vec![]))).unwrap();
    assert_eq!(s.rasterizer().rendered_pages(), vec![1, 2]);
}

#[test]
fn explicit_pages_run_ascending_once() {
    let s = scanner(two_page_document());
    s.scan(PDF_BYTES, &pdf_opts(Some(vec![2, 1, 2]))).unwrap();
    assert_eq!(s.rasterizer().rendered_pages(), vec![1, 2]);
}

#[test]
fn default_scale_is_two() {
    let s = scanner(two_page_document());
    s.scan(PDF_BYTES, &pdf_opts(Some(vec![1]))).unwrap();
    assert_eq!(s.rasterizer().renders.lock().unwrap()[0], (1, 2.0));
}

#[test]
fn requested_scale_is_passed_through() {
    let s = scanner(two_page_document());
    let mut opts = pdf_opts(Some(vec![1]));
    opts.pdf_options.as_mut().unwrap().scale = Some(3.5);
    s.scan(PDF_BYTES, &opts).unwrap();
    assert_eq!(s.rasterizer().renders.lock().unwrap()[0], (1, 3.5));
}

#[test]
fn non_positive_scale_is_rejected() {
    let s = scanner(two_page_document());
    let mut opts = pdf_opts(None);
    opts.pdf_options.as_mut().unwrap().scale = Some(0.0);
    assert!(matches!(s.scan(PDF_BYTES, &opts), Err(ScanError::InvalidScale(_))));
}

#[test]
fn page_past_the_end_is_invalid_before_rendering() {
    let s = scanner(two_page_document());
    let err = s.scan(PDF_BYTES, &pdf_opts(Some(vec![1, 3]))).unwrap_err();
    assert!(matches!(
        err,
        ScanError::InvalidPage {
            page: 3,
            page_count: 2
        }
    ));
    assert!(s.rasterizer().rendered_pages().is_empty());
}

#[test]
fn page_zero_is_invalid() {
    let s = scanner(two_page_document());
    let err = s.scan(PDF_BYTES, &pdf_opts(Some(vec![0]))).unwrap_err();
    assert!(matches!(err, ScanError::InvalidPage { page: 0, .. }));
}

#[test]
fn render_failure_aborts_the_whole_scan() {
    let s = Scanner::new(
        &Config::default(),
        MockRasterizer::new(two_page_document()).failing_on(2),
    );
    let err = s.scan(PDF_BYTES, &ScanOptions::new("application/pdf")).unwrap_err();
    assert!(matches!(err, ScanError::RenderFailure { page: 2, .. }));
    assert_eq!(err.status_code(), 500);
}

#[test]
fn unknown_format_fails_before_touching_the_document() {
    let s = scanner(two_page_document());
    let mut opts = ScanOptions::new("application/pdf");
    opts.formats = vec!["NOT_A_FORMAT".into()];
    assert!(matches!(s.scan(PDF_BYTES, &opts), Err(ScanError::UnsupportedFormat(_))));
    assert_eq!(s.rasterizer().open_count(), 0);
}

#[test]
fn page_limit_applies_to_whole_document_scans() {
    let mut cfg = Config::default();
    cfg.limits.max_pages = 1;
    let s = Scanner::new(&cfg, MockRasterizer::new(two_page_document()));

    let err = s.scan(PDF_BYTES, &ScanOptions::new("application/pdf")).unwrap_err();
    assert!(matches!(err, ScanError::PageLimit { page_count: 2, max_pages: 1 }));
    assert_eq!(err.status_code(), 413);

    // Naming the page explicitly is still allowed.
    let result = s.scan(PDF_BYTES, &pdf_opts(Some(vec![2]))).unwrap();
    assert_eq!(result.found, 1);
}

#[test]
fn error_body_carries_status_and_detail() {
    let s = scanner(two_page_document());
    let err = s.scan(PDF_BYTES, &pdf_opts(Some(vec![9]))).unwrap_err();
    let body = serde_json::to_value(err.to_body()).unwrap();
    assert_eq!(body["statusCode"], 400);
    assert_eq!(body["detail"]["page"], 9);
    assert_eq!(body["detail"]["pageCount"], 2);
}
