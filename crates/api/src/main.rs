use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    routegate_observability::init();

    let config = routegate_api::config::Config::from_env();

    // `--emit-contract <path>` writes the machine-readable route contract
    // and exits without serving.
    let mut args = std::env::args().skip(1);
    if let Some(flag) = args.next() {
        if flag == "--emit-contract" {
            let path = args.next().context("--emit-contract requires a path")?;
            let registry = routegate_api::app::build_registry()?;
            let contract = routegate_contract::generate(&registry);
            contract
                .write_to(std::path::Path::new(&path))
                .with_context(|| format!("failed to write contract to {path}"))?;
            tracing::info!(%path, "contract written");
            return Ok(());
        }
        anyhow::bail!("unknown argument: {flag}");
    }

    let (app, registry, _services) = routegate_api::app::build_app(&config)?;
    tracing::info!(routes = registry.len(), "registry frozen");

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
