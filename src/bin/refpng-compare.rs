//! Reference render comparison CLI tool
//!
//! Compares every PNG under a reference directory with the same path under a
//! render directory, reporting missing files and images above the MSE threshold.

#[cfg(feature = "cli")]
use refpng_compare::cli;

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    cli::main()
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
