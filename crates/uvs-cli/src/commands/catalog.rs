//! `uvs catalog`

use anyhow::Result;

use super::Context;

pub fn print(ctx: &Context) -> Result<()> {
    println!("🌌 Universe Store — featured products");
    println!();
    for entry in &ctx.settings.catalog {
        println!("{}", entry.name);
        println!("  {}", entry.desc);
        println!("  price: {}", entry.price);
        println!();
    }
    Ok(())
}
