//! Basic example: the three structures over one small sequence.
//!
//! Run with `RUST_LOG=rangekit=debug` to see construction and rejection logs.

use rangekit::algebra::{Add, Max, Sum};
use rangekit::{EngineConfig, FenwickTree, LazySegmentTree, SegmentTree};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let values = [2i64, 4, 5, 7, 2, 3, 1, 6];

    let mut max = SegmentTree::build(&values, Max::new())?;
    println!("max[2, 5] = {}", max.range_query(2, 5)?);
    max.point_update(3, 10)?;
    println!("after A[3] = 10: max[0, 7] = {}", max.total());

    let mut lazy =
        LazySegmentTree::<Sum<i64>, Add>::with_config(&values, Sum::new(), EngineConfig::debug())?;
    lazy.range_update(2, 5, 3)?;
    println!("after +3 on [2, 5]: sum[0, 7] = {}", lazy.range_query(0, 7)?);
    println!("pending tags: {}", lazy.dirty_nodes());
    if let Some(profile) = lazy.profile() {
        println!("{}", profile.report());
    }

    let mut fw = FenwickTree::from_slice(&values)?;
    fw.add(4, 3)?;
    println!("fenwick prefix_sum(4) = {}", fw.prefix_sum(4)?);

    // Out-of-range bounds are errors, never clamped
    if let Err(err) = lazy.range_query(3, 8) {
        println!("rejected: {err}");
    }

    Ok(())
}
