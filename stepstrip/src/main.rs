//! Main binary entry point for the stepstrip tool.
//!
//! This binary simply delegates to the shared `entry_point::run_with_args()` function.

use anyhow::Result;

fn main() -> Result<()> {
    let code = stepstrip::entry_point::run_with_args(std::env::args().skip(1).collect())?;
    std::process::exit(code);
}
