use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use worldpreview_core::{CoreError, LayerSampler, PreviewGrid, PreviewSettings, SampleError};

use crate::buffer::PixelBuffer;
use crate::cancel::TaskCancel;
use crate::error::PipelineError;

/// Terminal state of one generation pass.
///
/// A cancelled pass yields no buffer at all — partial output is dropped
/// inside this module and never crosses the task boundary.
#[derive(Debug)]
pub enum Generated {
    Buffer(PixelBuffer),
    Cancelled,
}

/// Scan the sampling collaborator over the preview grid into an RGBA
/// buffer.
///
/// Each output pixel is the sampler's color for the `zoom × zoom`
/// world-space cell given by [`PreviewGrid::cell_rect`]. Rows are
/// processed in parallel, each row sequentially; the cancel generation
/// is checked once per row, so cancellation latency is bounded by the
/// cost of the rows already in flight.
///
/// A [`SampleError`] aborts the remaining scan and is reported as an
/// error, distinct from cancellation. If the scan was superseded while
/// it also failed, cancellation wins — the outcome would be discarded
/// anyway. No reference to the sampler is retained beyond the call.
pub fn generate<S: LayerSampler + Sync>(
    grid: &PreviewGrid,
    zoom: u32,
    layer: &str,
    sampler: &S,
    cancel: &TaskCancel,
) -> crate::Result<Generated> {
    if zoom == 0 || zoom > PreviewSettings::MAX_ZOOM {
        return Err(CoreError::InvalidZoom(zoom).into());
    }
    if layer.is_empty() {
        return Err(CoreError::EmptyLayerName.into());
    }

    let start = Instant::now();
    let generation = cancel.generation();
    let failed = AtomicBool::new(false);
    cancel.begin_rows(grid.height as usize);
    debug!(
        width = grid.width,
        height = grid.height,
        zoom,
        layer,
        "Starting preview scan"
    );

    let rows: Vec<Option<Result<Vec<u8>, SampleError>>> = (0..grid.height)
        .into_par_iter()
        .map(|y| {
            if cancel.generation() != generation || failed.load(Ordering::Relaxed) {
                return None;
            }
            let mut row = Vec::with_capacity(grid.width as usize * 4);
            for x in 0..grid.width {
                let area = grid.cell_rect(x, y, zoom);
                match sampler.sample(layer, area) {
                    Ok(color) => row.extend_from_slice(&color.to_rgba()),
                    Err(e) => {
                        failed.store(true, Ordering::Relaxed);
                        return Some(Err(e));
                    }
                }
            }
            cancel.row_done();
            Some(Ok(row))
        })
        .collect();

    let elapsed = start.elapsed();

    if cancel.generation() != generation {
        info!(elapsed_ms = elapsed.as_millis(), layer, "Preview scan cancelled");
        return Ok(Generated::Cancelled);
    }

    for slot in &rows {
        if let Some(Err(e)) = slot {
            warn!(error = %e, layer, "Sampler failed during preview scan");
            return Err(PipelineError::Sampling(e.clone()));
        }
    }

    let mut buffer = PixelBuffer::new(grid.width, grid.height);
    for (y, slot) in rows.into_iter().enumerate() {
        match slot {
            Some(Ok(row)) => buffer.blit_row(y as u32, &row),
            // A skipped row without a generation change or error means the
            // gate raced a late cancel; treat it as cancelled.
            _ => return Ok(Generated::Cancelled),
        }
    }

    info!(
        elapsed_ms = elapsed.as_millis(),
        width = grid.width,
        height = grid.height,
        layer,
        "Preview scan complete"
    );
    Ok(Generated::Buffer(buffer))
}
