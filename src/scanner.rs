use crate::{
    config::Config,
    engine::EngineChain,
    error::{Result, ScanError},
    raster::{PageRasterizer, PageSource},
    report::{ScanAttempt, ScanResult},
    request::{ContentType, CropRect, ScanOptions},
    surface::{PixelRect, Surface},
    symbology::FormatSet,
    util::{elapsed_ms, short_digest},
};
use std::time::Instant;
use tracing::{debug, info, info_span, warn};

/// Runs one scan request end to end. Holds only read-only state, so one
/// instance can serve concurrent callers.
pub struct Scanner<R: PageRasterizer> {
    cfg: Config,
    engines: EngineChain,
    rasterizer: R,
}

impl<R: PageRasterizer> Scanner<R> {
    pub fn new(cfg: &Config, rasterizer: R) -> Self {
        Self::with_engines(cfg, EngineChain::from_config(cfg), rasterizer)
    }

    pub fn with_engines(cfg: &Config, engines: EngineChain, rasterizer: R) -> Self {
        Self {
            cfg: cfg.clone(),
            engines,
            rasterizer,
        }
    }

    /// The rasterizer this scanner renders with. Tests use it to inspect a
    /// recording rasterizer after a scan.
    #[doc(hidden)]
    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    pub fn scan(&self, bytes: &[u8], options: &ScanOptions) -> Result<ScanResult> {
        let span = info_span!("scan", input = %short_digest(bytes));
        let _enter = span.enter();

        let content_type = ContentType::parse(&options.content_type)?;
        let formats = FormatSet::resolve(options.formats.as_slice(), &self.cfg.scan.default_formats)?;

        info!(
            "scan content_type={} bytes={} formats={:?} regions={}",
            content_type.mime(),
            bytes.len(),
            formats.names(),
            options.crop.len().max(1)
        );

        let result = if content_type.is_image() {
            let surface = Surface::decode(bytes)?;
            self.scan_surface(&surface, &options.crop, &formats)?
        } else {
            self.scan_pdf(bytes, options, &formats)?
        };

        info!("scan done found={} attempts={}", result.found, result.results.len());
        Ok(result)
    }

    fn scan_pdf(&self, bytes: &[u8], options: &ScanOptions, formats: &FormatSet) -> Result<ScanResult> {
        let pdf_options = options.pdf_options.clone().unwrap_or_default();
        let scale = pdf_options.scale.unwrap_or(self.cfg.scan.default_scale);
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ScanError::InvalidScale(scale));
        }

        let mut result = ScanResult::default();
        self.rasterizer.open(bytes, &mut |doc: &dyn PageSource| {
            let page_count = doc.page_count();
            let pages = self.plan_pages(pdf_options.pages.as_deref(), page_count)?;
            info!("pdf page_count={} pages={:?} scale={}", page_count, pages, scale);

            for page in pages {
                // Only this page's raster is alive for the iteration.
                let png = doc.render_page(page, scale)?;
                let surface = Surface::decode(&png).map_err(|e| ScanError::RenderFailure {
                    page,
                    reason: e.to_string(),
                })?;
                drop(png);

                let page_result = self.scan_surface(&surface, &options.crop, formats)?;
                debug!("page {} found={}", page, page_result.found);
                result.append_page(page, page_result);
            }
            Ok(())
        })?;
        Ok(result)
    }

    /// Explicit pages are sorted, de-duplicated and checked against the
    /// document up front; otherwise every page, subject to `limits.max_pages`.
    fn plan_pages(&self, requested: Option<&[u32]>, page_count: u32) -> Result<Vec<u32>> {
        match requested {
            Some(pages) if !pages.is_empty() => {
                let mut pages = pages.to_vec();
                pages.sort_unstable();
                pages.dedup();
                if let Some(&bad) = pages.iter().find(|&&p| p < 1 || p > page_count) {
                    return Err(ScanError::InvalidPage {
                        page: bad,
                        page_count,
                    });
                }
                Ok(pages)
            }
            _ => {
                let max_pages = self.cfg.limits.max_pages;
                if max_pages > 0 && page_count > max_pages {
                    return Err(ScanError::PageLimit {
                        page_count,
                        max_pages,
                    });
                }
                Ok((1..=page_count).collect())
            }
        }
    }

    /// Scans one surface region by region. The first decoded barcode ends
    /// the call: no further engines, no further regions.
    pub fn scan_surface(&self, surface: &Surface, crop: &[CropRect], formats: &FormatSet) -> Result<ScanResult> {
        let regions: Vec<Option<PixelRect>> = if crop.is_empty() {
            vec![None]
        } else {
            crop.iter()
                .map(|rect| surface.pixel_rect(rect).map(Some))
                .collect::<Result<_>>()?
        };

        let mut result = ScanResult::default();
        for (i, region) in regions.into_iter().enumerate() {
            let cropped;
            let target = match region {
                Some(px) => {
                    cropped = surface.crop_pixels(px);
                    &cropped
                }
                None => surface,
            };
            debug!("region {} {}x{}", i, target.width(), target.height());

            if self.scan_region(target, formats, &mut result) {
                return Ok(result);
            }
        }
        Ok(result)
    }

    /// Returns true once an engine decoded something.
    fn scan_region(&self, surface: &Surface, formats: &FormatSet, result: &mut ScanResult) -> bool {
        for engine in self.engines.iter() {
            if !engine.supports(formats) {
                continue;
            }

            let started = Instant::now();
            match engine.decode(surface, formats) {
                Ok(Some(text)) => {
                    let duration_ms = elapsed_ms(started);
                    debug!("engine={} decoded in {}ms", engine.id().as_str(), duration_ms);
                    result.push(ScanAttempt::success(engine.id(), text, duration_ms));
                    return true;
                }
                Ok(None) => {
                    debug!("engine={} found nothing", engine.id().as_str());
                }
                Err(err) => {
                    let duration_ms = elapsed_ms(started);
                    warn!("engine={} failed: {}", engine.id().as_str(), err);
                    result.push(ScanAttempt::failure(engine.id(), err.to_string(), duration_ms));
                }
            }
        }
        false
    }
}
