use crate::cli::actions::Console;
use anyhow::Result;

/// Prints where a navigation to `path` ends up for the stored session.
pub fn handle(console: &Console, path: &str) -> Result<()> {
    let navigation = console.router.navigate(path)?;

    for hop in &navigation.hops {
        println!("-> {hop}");
    }
    println!("{}", navigation.location);

    Ok(())
}
