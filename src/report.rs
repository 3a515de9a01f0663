use crate::monitor::{Aggregator, CoreAccumulator};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

/// Final per-core and cross-core utilization summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Average utilization per core. A core with no samples keeps its raw sum.
    pub cpu_utils: IndexMap<i64, f64>,
    pub num_samples: IndexMap<i64, u64>,
    /// Unweighted mean of the per-core averages, `None` when no core had samples.
    pub avg_cpu_util: Option<f64>,
}

impl Report {
    pub fn from_aggregator(aggregator: Aggregator) -> Self {
        Self::from_cores(aggregator.into_cores())
    }

    /// Finalize accumulated totals. Cores with zero samples stay in both maps
    /// but are left out of the cross-core average.
    pub fn from_cores(cores: IndexMap<i64, CoreAccumulator>) -> Self {
        let mut cpu_utils = IndexMap::with_capacity(cores.len());
        let mut num_samples = IndexMap::with_capacity(cores.len());
        let mut total_util = 0.0;
        let mut num_cpus = 0usize;

        for (core, acc) in cores {
            let util = match acc.average() {
                Some(avg) => {
                    total_util += avg;
                    num_cpus += 1;
                    avg
                }
                None => {
                    warn!(core, "core has no samples, reporting raw sum");
                    acc.util_sum
                }
            };
            cpu_utils.insert(core, util);
            num_samples.insert(core, acc.samples);
        }

        let avg_cpu_util = if num_cpus > 0 {
            Some(total_util / num_cpus as f64)
        } else {
            None
        };
        info!(cores = num_cpus, avg = ?avg_cpu_util, "report ready");

        Report {
            cpu_utils,
            num_samples,
            avg_cpu_util,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cpu_utils.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cpu_utils: ")?;
        write_map(f, &self.cpu_utils, |f, v| write!(f, "{}", FloatRepr(*v)))?;
        writeln!(f)?;

        write!(f, "num_samples: ")?;
        write_map(f, &self.num_samples, |f, v| write!(f, "{}", v))?;
        writeln!(f)?;

        write!(f, "avg_cpu_util: ")?;
        if let Some(avg) = self.avg_cpu_util {
            write!(f, "{}", FloatRepr(avg))?;
        }
        Ok(())
    }
}

fn write_map<V>(
    f: &mut fmt::Formatter<'_>,
    map: &IndexMap<i64, V>,
    mut value: impl FnMut(&mut fmt::Formatter<'_>, &V) -> fmt::Result,
) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (core, v)) in map.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}: ", core)?;
        value(f, v)?;
    }
    write!(f, "}}")
}

/// Shortest round-trip float: `15.0`, `0.1`, `1e+16`, `1e-05`, `nan`, `inf`.
struct FloatRepr(f64);

impl fmt::Display for FloatRepr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.is_nan() {
            return write!(f, "nan");
        }
        if v.is_infinite() {
            return write!(f, "{}", if v > 0.0 { "inf" } else { "-inf" });
        }

        let repr = format!("{:?}", v);
        match repr.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exp),
                };
                write!(f, "{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => write!(f, "{}", repr),
        }
    }
}
