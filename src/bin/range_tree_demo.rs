//! Builds range trees over random data and reports build time, query time and memory footprint.
use std::time::Instant;

use anyhow::{ensure, Context};
use clap::Parser;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use range_tree::{OrderedRangeIndex, PlanarRangeIndex, Point};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Options {
    /// Number of random values and points to index.
    #[arg(short, long, default_value_t = 50)]
    points: usize,

    /// Seed of the random generator. Seeded from the OS if omitted.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Smallest generated coordinate.
    #[arg(long, default_value_t = 20)]
    min: i32,

    /// Largest generated coordinate.
    #[arg(long, default_value_t = 100)]
    max: i32,

    /// Inclusive x bounds of the queries. The 1D query uses these as well.
    #[arg(long, value_delimiter = ',', default_values_t = [30, 70])]
    x_range: Vec<i32>,

    /// Inclusive y bounds of the 2D query.
    #[arg(long, value_delimiter = ',', default_values_t = [40, 80])]
    y_range: Vec<i32>,

    /// Dataset sizes of the memory sweep.
    #[arg(long, value_delimiter = ',', default_values_t = [10, 50, 100, 200, 500, 1000])]
    sizes: Vec<usize>,

    /// Log filter, e.g. `debug` or `range_tree=trace`.
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> anyhow::Result<()> {
    let options = Options::parse();

    let filter = EnvFilter::try_new(&options.log)
        .with_context(|| format!("invalid log filter {:?}", options.log))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(anyhow::Error::msg)?;

    ensure!(
        options.min <= options.max,
        "--min {} is larger than --max {}",
        options.min,
        options.max
    );
    let [x_min, x_max] = bounds(&options.x_range, "--x-range")?;
    let [y_min, y_max] = bounds(&options.y_range, "--y-range")?;
    ensure!(!options.sizes.is_empty(), "--sizes must not be empty");

    let mut rng = match options.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    // gen_range is exclusive of its upper bound
    let (lo, hi) = (
        options.min,
        options.max.checked_add(1).context("--max is too large")?,
    );

    let values = (0..options.points)
        .map(|_| rng.gen_range(lo, hi))
        .collect::<Vec<_>>();
    let start = Instant::now();
    let index = OrderedRangeIndex::build(values);
    let build_time = start.elapsed();
    let start = Instant::now();
    let res = index.range_query(x_min, x_max);
    let query_time = start.elapsed();
    info!(
        n = options.points,
        ?build_time,
        ?query_time,
        found = res.len(),
        "1D range tree: [{}, {}]",
        x_min,
        x_max
    );

    let points = (0..options.points)
        .map(|_| Point::new(rng.gen_range(lo, hi), rng.gen_range(lo, hi)))
        .collect::<Vec<_>>();
    let start = Instant::now();
    let index = PlanarRangeIndex::build(points);
    let build_time = start.elapsed();
    let start = Instant::now();
    let res = index.range_query(x_min, x_max, y_min, y_max);
    let query_time = start.elapsed();
    info!(
        n = options.points,
        ?build_time,
        ?query_time,
        found = res.len(),
        "2D range tree: [{}, {}] x [{}, {}]",
        x_min,
        x_max,
        y_min,
        y_max
    );

    for &size in options.sizes.iter() {
        let ordered = OrderedRangeIndex::build((0..size).map(|_| rng.gen_range(lo, hi)));
        let planar = PlanarRangeIndex::build(
            (0..size).map(|_| Point::new(rng.gen_range(lo, hi), rng.gen_range(lo, hi))),
        );
        info!(
            size,
            ordered_bytes = ordered.heap_size(),
            planar_bytes = planar.heap_size(),
            "memory usage"
        );
    }

    Ok(())
}

fn bounds(range: &[i32], name: &str) -> anyhow::Result<[i32; 2]> {
    match *range {
        [lo, hi] => Ok([lo, hi]),
        _ => anyhow::bail!("{} expects exactly two values, got {:?}", name, range),
    }
}
