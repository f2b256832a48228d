use anyhow::Context;
use encore::domain::config::ApiConfig;
use encore::kernel::config::load_config;
use encore_logger::Logger;
use encore_server::Server;
use tokio::runtime::Builder;

fn main() -> anyhow::Result<()> {
    // An explicit path (first argument) must exist; otherwise `server.*` is optional.
    let path = std::env::args().nth(1);
    let cfg: ApiConfig =
        load_config(path.as_deref()).context("Critical: Configuration is malformed")?;

    let _log = Logger::from_config(env!("CARGO_PKG_NAME"), &cfg.logging)?;

    let mut runtime = Builder::new_multi_thread();
    runtime.enable_all().thread_name("encore-worker");
    if let Some(workers) = cfg.runtime.worker_threads {
        runtime.worker_threads(workers.max(1));
    }
    let runtime = runtime.build().context("Failed to build the Tokio runtime")?;

    runtime.block_on(async { Server::builder().config(cfg).build().await?.run().await })
}
