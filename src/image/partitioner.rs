use std::sync::{mpsc, Arc};
use std::thread;

use clap::builder::PossibleValue;
use clap::ValueEnum;
use threadpool::ThreadPool;

use super::sampler::Sampler;
use super::{Pixel, PixelGrid, RowRange};
use crate::{error::Error, Result};

/// Splits `[0, rows)` into `workers` contiguous ranges of `rows / workers`
/// rows each. The last range absorbs the remainder and always ends at `rows`.
pub fn partition_rows(rows: usize, workers: usize) -> Result<Vec<RowRange>> {
    if workers == 0 {
        return Err(Error::InvalidWorkerCount(workers));
    }
    let chunk_size = rows / workers;
    let ranges = (0..workers)
        .map(|worker| {
            let start = worker * chunk_size;
            let end = if worker == workers - 1 {
                rows
            } else {
                start + chunk_size
            };
            RowRange::new(start, end)
        })
        .collect();
    Ok(ranges)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Fresh threads for every transform, joined before it returns.
    SpawnPerCall,
    /// One pool of threads reused by every transform.
    Pooled,
}

impl ValueEnum for ExecutionStrategy {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::SpawnPerCall, Self::Pooled]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::SpawnPerCall => Some(PossibleValue::new("spawn")),
            Self::Pooled => Some(PossibleValue::new("pooled")),
        }
    }
}

pub struct RowPartitioner {
    number_of_workers: usize,
    threadpool: Option<ThreadPool>,
}

impl RowPartitioner {
    pub fn new(number_of_workers: usize, strategy: ExecutionStrategy) -> Result<Self> {
        if number_of_workers == 0 {
            return Err(Error::InvalidWorkerCount(number_of_workers));
        }
        let threadpool = match strategy {
            ExecutionStrategy::SpawnPerCall => None,
            ExecutionStrategy::Pooled => Some(ThreadPool::new(number_of_workers)),
        };
        Ok(Self {
            number_of_workers,
            threadpool,
        })
    }

    pub fn number_of_workers(&self) -> usize {
        self.number_of_workers
    }

    /// Fills `output` by running `sampler` over every output row, one worker
    /// per row range. Returns once every worker has finished.
    pub fn run<S>(&self, source: &Arc<PixelGrid>, sampler: S, output: &mut PixelGrid) -> Result<()>
    where
        S: Sampler + Copy + 'static,
    {
        let ranges = partition_rows(output.height(), self.number_of_workers)?;
        for range in &ranges {
            log::trace!("Worker assigned rows {}..{}", range.start, range.end);
        }
        if output.width() == 0 {
            return Ok(());
        }
        match &self.threadpool {
            None => run_scoped(source, &sampler, &ranges, output),
            Some(threadpool) => run_pooled(threadpool, source, sampler, &ranges, output),
        }
    }
}

fn render_band(
    source: &PixelGrid,
    sampler: &impl Sampler,
    range: RowRange,
    width: usize,
    band: &mut [Pixel],
) {
    for (row_index, row) in range.rows().zip(band.chunks_mut(width)) {
        sampler.sample_row(source, row_index, row);
    }
}

fn run_scoped<S: Sampler>(
    source: &PixelGrid,
    sampler: &S,
    ranges: &[RowRange],
    output: &mut PixelGrid,
) -> Result<()> {
    let width = output.width();
    let bands = output.bands_mut(ranges);
    thread::scope(|scope| {
        let workers: Vec<_> = ranges
            .iter()
            .zip(bands)
            .map(|(&range, band)| {
                scope.spawn(move || render_band(source, sampler, range, width, band))
            })
            .collect();
        let mut panicked = false;
        for worker in workers {
            panicked |= worker.join().is_err();
        }
        if panicked {
            return Err(Error::WorkerPanicked);
        }
        Ok(())
    })
}

fn run_pooled<S>(
    threadpool: &ThreadPool,
    source: &Arc<PixelGrid>,
    sampler: S,
    ranges: &[RowRange],
    output: &mut PixelGrid,
) -> Result<()>
where
    S: Sampler + Copy + 'static,
{
    let width = output.width();
    let (sender, receiver) = mpsc::channel();
    for &range in ranges {
        let source = Arc::clone(source);
        let sender = sender.clone();
        threadpool.execute(move || {
            let mut band = vec![Pixel::BACKGROUND; range.len() * width];
            render_band(&source, &sampler, range, width, &mut band);
            // the receiver lives until every job has been joined
            let _ = sender.send((range, band));
        });
    }
    drop(sender);
    threadpool.join();
    let mut finished = 0;
    for (range, band) in receiver.try_iter() {
        output.write_band(range, &band);
        finished += 1;
    }
    if finished != ranges.len() {
        return Err(Error::WorkerPanicked);
    }
    Ok(())
}
