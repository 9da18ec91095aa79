use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Fibonacci index computed per request as the CPU-bound stand-in
    pub fib_n: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self { fib_n: 20 }
    }
}
