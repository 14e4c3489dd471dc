//! Pick a backend from a workload description, then drive it through
//! the shared `RangeQuery` capability.

use rangekit::algebra::{Add, Assign, Gcd, Max, Sum};
use rangekit::{
    AggregateKind, Backend, FenwickTree, LazySegmentTree, RangeQuery, SegmentTree, UpdateMode,
    Workload,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn report<Q: RangeQuery>(name: &str, engine: &mut Q) -> anyhow::Result<()>
where
    Q::Output: std::fmt::Debug,
{
    let last = engine.len() - 1;
    println!("{name}: [0, {last}] -> {:?}", engine.query(0, last)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let values = [2i64, 4, 5, 7, 2, 3, 1, 6];
    let workloads = [
        Workload::new(AggregateKind::Sum),
        Workload::new(AggregateKind::Max),
        Workload::new(AggregateKind::Sum).with_updates(UpdateMode::RangeAdd),
        Workload::new(AggregateKind::Gcd).with_updates(UpdateMode::RangeAssign),
        Workload::new(AggregateKind::Gcd).with_updates(UpdateMode::RangeAdd),
    ];

    for workload in workloads {
        let backend = match workload.backend() {
            Ok(backend) => backend,
            Err(err) => {
                info!(%err, "workload has no backend");
                continue;
            }
        };
        info!(?workload, %backend, "building");

        match (backend, workload.aggregate) {
            (Backend::Fenwick, _) => report("fenwick", &mut FenwickTree::from_slice(&values)?)?,
            (Backend::SegmentTree, _) => {
                report("segment_tree", &mut SegmentTree::build(&values, Max::new())?)?
            }
            (Backend::LazySegmentTree, AggregateKind::Gcd) => {
                let unsigned: Vec<u64> = values.iter().map(|&v| v as u64).collect();
                let mut tree = LazySegmentTree::<Gcd<u64>, Assign>::build(&unsigned, Gcd::new())?;
                tree.range_update(0, 3, 12)?;
                report("lazy gcd/assign", &mut tree)?;
            }
            (Backend::LazySegmentTree, _) => {
                let mut tree = LazySegmentTree::<Sum<i64>, Add>::build(&values, Sum::new())?;
                tree.range_update(2, 5, 3)?;
                report("lazy sum/add", &mut tree)?;
            }
        }
    }

    Ok(())
}
