use std::collections::{BTreeSet, HashSet};
use std::sync::{LazyLock, Mutex};

use flexi_logger::{Logger, LoggerHandle};

/// A naive O(n) reference model for dynamic connectivity, cross-checked
/// against [`dynamic_connectivity::Connectivity`] in the stress tests.
/// Mirrors `examples/original_source/C/impl/sonLibNaiveConnectivity.c` and
/// the teacher's `Slow` struct in `tests/dynamic_2core.rs`: an adjacency set
/// plus BFS, no incremental bookkeeping.
#[derive(Debug, Default)]
pub struct NaiveConnectivity {
    adj: Vec<BTreeSet<usize>>,
}

impl NaiveConnectivity {
    pub fn new(n: usize) -> Self {
        Self {
            adj: vec![BTreeSet::new(); n],
        }
    }

    pub fn add_edge(&mut self, u: usize, v: usize) -> bool {
        self.adj[u].insert(v) && self.adj[v].insert(u)
    }

    pub fn remove_edge(&mut self, u: usize, v: usize) -> bool {
        self.adj[u].remove(&v) && self.adj[v].remove(&u)
    }

    pub fn connected(&self, u: usize, v: usize) -> bool {
        if u == v {
            return true;
        }
        let mut seen = HashSet::new();
        let mut stack = vec![u];
        seen.insert(u);
        while let Some(x) = stack.pop() {
            if x == v {
                return true;
            }
            for &w in &self.adj[x] {
                if seen.insert(w) {
                    stack.push(w);
                }
            }
        }
        false
    }

    /// Assigns each node a group id such that two nodes share a group iff
    /// they are connected.
    pub fn groups(&self) -> Vec<usize> {
        let n = self.adj.len();
        let mut groups = vec![0usize; n];
        let mut next_id = 0;
        for start in 0..n {
            if groups[start] != 0 {
                continue;
            }
            next_id += 1;
            groups[start] = next_id;
            let mut stack = vec![start];
            while let Some(x) = stack.pop() {
                for &w in &self.adj[x] {
                    if groups[w] == 0 {
                        groups[w] = next_id;
                        stack.push(w);
                    }
                }
            }
        }
        groups
    }
}

#[allow(dead_code)]
pub static LOGGER: LazyLock<Mutex<LoggerHandle>> = LazyLock::new(|| {
    Mutex::new(
        Logger::try_with_env_or_str("info")
            .unwrap()
            .write_mode(flexi_logger::WriteMode::SupportCapture)
            .log_to_stdout()
            .set_palette("196;208;3;7;8".to_owned())
            .format(|w, now, record| {
                let style = flexi_logger::style(record.level());
                write!(
                    w,
                    "{} {pref}[{}] {}{suf}",
                    now.format("%H:%M:%S"),
                    &record.level().as_str()[0..1],
                    record.args(),
                    pref = style.prefix(),
                    suf = style.suffix(),
                )
            })
            .start()
            .unwrap(),
    )
});

#[allow(dead_code)]
pub fn init_logger() {
    let _ = &*LOGGER;
}
