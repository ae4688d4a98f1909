//! ShowFlow operator console.

fn main() -> anyhow::Result<()> {
    showflow_lib::run()
}
