use anyhow::Result;

fn main() -> Result<()> {
    archflow::run()
}
