use std::io::Write;

use env_logger::{Builder, Env};

/// Set up logging for demos and experiments. The library itself only emits
/// `log` records and never installs a logger on its own.
pub fn init_logger() -> Result<(), Box<dyn std::error::Error>> {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{:<5}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()?;

    Ok(())
}
